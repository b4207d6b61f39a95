use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use sea_orm::EntityTrait;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use common::pagination::Pagination;
use models::{article, category, tag, user};
use service::validation::{messages, ArticleInput};

use crate::errors::ApiError;
use crate::routes::ServerState;

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct ListQuery {
    pub page: Option<u32>,
}

/// Category and tag lists the article form offers as choices.
#[derive(Debug, Serialize)]
pub struct FormChoices {
    pub categories: Vec<category::Model>,
    pub tags: Vec<tag::Model>,
}

#[derive(Debug, Serialize)]
pub struct ArticleDetail {
    #[serde(flatten)]
    pub article: article::Model,
    pub tags: Vec<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct MutationOutput {
    pub message: &'static str,
    pub article: article::Model,
}

async fn load_choices(state: &ServerState) -> Result<FormChoices, ApiError> {
    let categories = category::Entity::find()
        .all(&state.db)
        .await
        .map_err(|e| ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;
    let tags = tag::Entity::find()
        .all(&state.db)
        .await
        .map_err(|e| ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;
    Ok(FormChoices { categories, tags })
}

#[utoipa::path(
    get, path = "/articles", tag = "articles",
    params(ListQuery),
    responses(
        (status = 200, description = "List OK"),
        (status = 500, description = "List Failed")
    )
)]
pub async fn list(
    State(state): State<ServerState>,
    Query(q): Query<ListQuery>,
) -> Result<Json<Vec<article::Model>>, ApiError> {
    let page = Pagination::page(q.page.unwrap_or(1));
    let items = state.articles.list(page).await?;
    info!(count = items.len(), page = page.page, "list articles");
    Ok(Json(items))
}

#[utoipa::path(
    get, path = "/articles/choices", tag = "articles",
    responses((status = 200, description = "OK"))
)]
pub async fn choices(State(state): State<ServerState>) -> Result<Json<FormChoices>, ApiError> {
    Ok(Json(load_choices(&state).await?))
}

#[utoipa::path(
    post, path = "/articles", tag = "articles",
    request_body = crate::openapi::ArticleInputDoc,
    responses(
        (status = 201, description = "Created"),
        (status = 401, description = "Missing or unknown actor"),
        (status = 403, description = "Forbidden"),
        (status = 422, description = "Validation Error")
    )
)]
pub async fn store(
    State(state): State<ServerState>,
    Extension(actor): Extension<user::Model>,
    Json(input): Json<ArticleInput>,
) -> Result<(StatusCode, Json<MutationOutput>), ApiError> {
    let created = state.articles.store(&actor, &input).await?;
    Ok((
        StatusCode::CREATED,
        Json(MutationOutput { message: messages::ARTICLE_CREATED, article: created }),
    ))
}

#[utoipa::path(
    get, path = "/articles/{id}", tag = "articles",
    params(("id" = Uuid, Path, description = "Article ID")),
    responses(
        (status = 200, description = "OK"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn show(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ArticleDetail>, ApiError> {
    match state.articles.show(id).await? {
        Some((article, tags)) => Ok(Json(ArticleDetail { article, tags })),
        None => Err(ApiError::new(StatusCode::NOT_FOUND, "article not found")),
    }
}

/// Edit payload: the article pre-fill plus the form choices.
#[derive(Debug, Serialize)]
pub struct EditOutput {
    pub article: article::Model,
    pub tags: Vec<Uuid>,
    pub choices: FormChoices,
}

#[utoipa::path(
    get, path = "/articles/{id}/edit", tag = "articles",
    params(("id" = Uuid, Path, description = "Article ID")),
    responses(
        (status = 200, description = "OK"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn edit(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<EditOutput>, ApiError> {
    let (article, tags) = match state.articles.show(id).await? {
        Some(found) => found,
        None => return Err(ApiError::new(StatusCode::NOT_FOUND, "article not found")),
    };
    let choices = load_choices(&state).await?;
    Ok(Json(EditOutput { article, tags, choices }))
}

#[utoipa::path(
    put, path = "/articles/{id}", tag = "articles",
    params(("id" = Uuid, Path, description = "Article ID")),
    request_body = crate::openapi::ArticleInputDoc,
    responses(
        (status = 200, description = "Updated"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not Found"),
        (status = 422, description = "Validation Error")
    )
)]
pub async fn update(
    State(state): State<ServerState>,
    Extension(actor): Extension<user::Model>,
    Path(id): Path<Uuid>,
    Json(input): Json<ArticleInput>,
) -> Result<Json<MutationOutput>, ApiError> {
    let updated = state.articles.update(&actor, id, &input).await?;
    Ok(Json(MutationOutput { message: messages::ARTICLE_UPDATED, article: updated }))
}

#[utoipa::path(
    delete, path = "/articles/{id}", tag = "articles",
    params(("id" = Uuid, Path, description = "Article ID")),
    responses(
        (status = 200, description = "Deleted"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn destroy(
    State(state): State<ServerState>,
    Extension(actor): Extension<user::Model>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state.articles.destroy(&actor, id).await?;
    Ok(Json(serde_json::json!({ "message": messages::ARTICLE_DELETED })))
}
