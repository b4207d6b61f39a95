use utoipa::OpenApi;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(ToSchema)]
pub struct HealthResponse {
    pub status: String,
}

#[derive(utoipa::ToSchema)]
pub struct ArticleInputDoc {
    pub title: Option<String>,
    pub content: Option<String>,
    pub category: Option<Uuid>,
    pub tags: Vec<Uuid>,
}

#[derive(utoipa::ToSchema)]
pub struct CategoryInputDoc {
    pub title: Option<String>,
    pub slug: Option<String>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::articles::list,
        crate::routes::articles::choices,
        crate::routes::articles::store,
        crate::routes::articles::show,
        crate::routes::articles::edit,
        crate::routes::articles::update,
        crate::routes::articles::destroy,
        crate::routes::categories::list,
        crate::routes::categories::store,
        crate::routes::categories::show,
        crate::routes::categories::update,
        crate::routes::categories::destroy,
    ),
    components(
        schemas(
            HealthResponse,
            ArticleInputDoc,
            CategoryInputDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "articles"),
        (name = "categories")
    )
)]
pub struct ApiDoc;
