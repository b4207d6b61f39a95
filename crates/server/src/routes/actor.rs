//! Actor resolution for mutating routes.
//!
//! The acting user arrives as an `X-Actor-Id` header naming an existing user
//! row; the middleware loads it and hands it to handlers as an extension, so
//! services always receive an explicit actor rather than ambient state.

use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::Response;
use sea_orm::EntityTrait;
use uuid::Uuid;

use models::user;

use crate::errors::ApiError;
use crate::routes::ServerState;

pub const ACTOR_HEADER: &str = "x-actor-id";

pub async fn require_actor(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let raw = req
        .headers()
        .get(ACTOR_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ApiError::new(StatusCode::UNAUTHORIZED, "Missing X-Actor-Id header"))?;
    let id = Uuid::parse_str(raw)
        .map_err(|_| ApiError::new(StatusCode::BAD_REQUEST, "Malformed X-Actor-Id header"))?;

    let actor = user::Entity::find_by_id(id)
        .one(&state.db)
        .await
        .map_err(|e| ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?
        .ok_or_else(|| ApiError::new(StatusCode::UNAUTHORIZED, "Unknown actor"))?;

    req.extensions_mut().insert(actor);
    Ok(next.run(req).await)
}
