//! Handlers for `/users/:id/scans`.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/users/:id/scans` | Newest first |
//! | `POST` | `/users/:id/scans` | Body: [`ScanBody`]; 201 + stored scan |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use glow_core::{
  scan::{NewSkinScan, SkinScan},
  store::GlowStore,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::ApiError;

/// `GET /users/:id/scans`
pub async fn list<S>(
  State(store): State<Arc<S>>,
  Path(user_id): Path<Uuid>,
) -> Result<Json<Vec<SkinScan>>, ApiError>
where
  S: GlowStore,
{
  let scans = store
    .list_scans(user_id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(scans))
}

/// JSON body accepted by `POST /users/:id/scans` — the classification fields
/// as returned by the external prediction endpoint.
#[derive(Debug, Deserialize)]
pub struct ScanBody {
  pub skin_type:      Option<String>,
  pub skin_tone:      Option<String>,
  pub skin_issues:    Option<String>,
  pub sun_damage:     Option<String>,
  pub unique_feature: Option<String>,
  pub disease:        Option<String>,
  #[serde(default)]
  pub disease_change: bool,
  pub scan_image:     Option<String>,
}

impl ScanBody {
  fn into_new(self, user_id: Uuid) -> NewSkinScan {
    NewSkinScan {
      user_id,
      skin_type: self.skin_type,
      skin_tone: self.skin_tone,
      skin_issues: self.skin_issues,
      sun_damage: self.sun_damage,
      unique_feature: self.unique_feature,
      disease: self.disease,
      disease_change: self.disease_change,
      scan_image: self.scan_image,
    }
  }
}

/// `POST /users/:id/scans` — returns 201 + the stored [`SkinScan`].
pub async fn create<S>(
  State(store): State<Arc<S>>,
  Path(user_id): Path<Uuid>,
  Json(body): Json<ScanBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: GlowStore,
{
  let scan = store
    .insert_scan(body.into_new(user_id))
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok((StatusCode::CREATED, Json(scan)))
}
