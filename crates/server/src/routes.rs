use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post, put},
    Json, Router,
};
use sea_orm::DatabaseConnection;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use common::types::Health;
use service::article::repository::SeaOrmArticleRepository;
use service::article::service::ArticleService;

use crate::openapi;

pub mod actor;
pub mod articles;
pub mod categories;

#[derive(Clone)]
pub struct ServerState {
    pub db: DatabaseConnection,
    pub articles: Arc<ArticleService<SeaOrmArticleRepository>>,
}

impl ServerState {
    pub fn new(db: DatabaseConnection) -> Self {
        let repo = Arc::new(SeaOrmArticleRepository { db: db.clone() });
        Self { db, articles: Arc::new(ArticleService::new(repo)) }
    }
}

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "OK")))]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// Build the full application router: public reads, actor-gated mutations,
/// and API docs.
pub fn build_router(cors: CorsLayer, state: ServerState) -> Router {
    // Reads stay open; the original gated nothing on the read side
    let public = Router::new()
        .route("/health", get(health))
        .route("/articles", get(articles::list))
        .route("/articles/choices", get(articles::choices))
        .route("/articles/:id", get(articles::show))
        .route("/articles/:id/edit", get(articles::edit))
        .route("/categories", get(categories::list).post(categories::store))
        .route(
            "/categories/:id",
            get(categories::show).put(categories::update).delete(categories::destroy),
        );

    // Article mutations need a resolved actor for ownership stamping/policy
    let mutating = Router::new()
        .route("/articles", post(articles::store))
        .route("/articles/:id", put(articles::update).delete(articles::destroy))
        .route_layer(middleware::from_fn_with_state(state.clone(), actor::require_actor));

    public
        .merge(mutating)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", openapi::ApiDoc::openapi()))
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
