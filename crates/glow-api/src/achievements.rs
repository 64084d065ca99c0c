//! Handler for `GET /users/:id/achievements`.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
};
use glow_core::{achievement::Achievement, store::GlowStore};
use uuid::Uuid;

use crate::error::ApiError;

/// `GET /users/:id/achievements` — newest first.
pub async fn list<S>(
  State(store): State<Arc<S>>,
  Path(user_id): Path<Uuid>,
) -> Result<Json<Vec<Achievement>>, ApiError>
where
  S: GlowStore,
{
  let achievements = store
    .list_achievements(user_id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(achievements))
}
