use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use common::pagination::Pagination;
use models::category;
use service::category_service;
use service::validation::{self, messages, CategoryInput};

use crate::errors::ApiError;
use crate::routes::ServerState;

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct ListQuery {
    pub page: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct StoreOutput {
    pub message: &'static str,
    pub category: category::Model,
}

#[utoipa::path(
    get, path = "/categories", tag = "categories",
    params(ListQuery),
    responses((status = 200, description = "List OK"))
)]
pub async fn list(
    State(state): State<ServerState>,
    Query(q): Query<ListQuery>,
) -> Result<Json<Vec<category::Model>>, ApiError> {
    let page = Pagination::page(q.page.unwrap_or(1));
    let items = category_service::list_categories_page(&state.db, page).await?;
    info!(count = items.len(), page = page.page, "list categories");
    Ok(Json(items))
}

#[utoipa::path(
    post, path = "/categories", tag = "categories",
    request_body = crate::openapi::CategoryInputDoc,
    responses(
        (status = 201, description = "Created"),
        (status = 422, description = "Validation Error")
    )
)]
pub async fn store(
    State(state): State<ServerState>,
    Json(input): Json<CategoryInput>,
) -> Result<(StatusCode, Json<StoreOutput>), ApiError> {
    let data = validation::validate_category(&input).map_err(ApiError::fields)?;
    let created = category_service::store_category(&state.db, &data).await?;
    Ok((
        StatusCode::CREATED,
        Json(StoreOutput { message: messages::CATEGORY_CREATED, category: created }),
    ))
}

#[utoipa::path(
    get, path = "/categories/{id}", tag = "categories",
    params(("id" = Uuid, Path, description = "Category ID")),
    responses(
        (status = 200, description = "OK"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn show(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<category::Model>, ApiError> {
    match category_service::get_category(&state.db, id).await? {
        Some(c) => Ok(Json(c)),
        None => Err(ApiError::new(StatusCode::NOT_FOUND, "category not found")),
    }
}

#[utoipa::path(
    put, path = "/categories/{id}", tag = "categories",
    params(("id" = Uuid, Path, description = "Category ID")),
    request_body = crate::openapi::CategoryInputDoc,
    responses(
        (status = 200, description = "Updated"),
        (status = 404, description = "Not Found"),
        (status = 422, description = "Validation Error")
    )
)]
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(input): Json<CategoryInput>,
) -> Result<Json<category::Model>, ApiError> {
    let data = validation::validate_category(&input).map_err(ApiError::fields)?;
    let updated = category_service::update_category(&state.db, id, &data).await?;
    Ok(Json(updated))
}

#[utoipa::path(
    delete, path = "/categories/{id}", tag = "categories",
    params(("id" = Uuid, Path, description = "Category ID")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Not Found"),
        (status = 422, description = "Still referenced by articles")
    )
)]
pub async fn destroy(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    if category_service::delete_category(&state.db, id).await? {
        info!(category_id = %id, "deleted category");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::new(StatusCode::NOT_FOUND, "category not found"))
    }
}
