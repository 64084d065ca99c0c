//! Handlers for `/users/:id/profile`.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/users/:id/profile` | 404 if the user has no profile yet |
//! | `PUT`  | `/users/:id/profile` | Body: [`ProfileBody`]; whole-row upsert |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
};
use chrono::NaiveTime;
use glow_core::{
  profile::{NewProfile, Profile},
  store::GlowStore,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::ApiError;

/// `GET /users/:id/profile`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  Path(user_id): Path<Uuid>,
) -> Result<Json<Profile>, ApiError>
where
  S: GlowStore,
{
  let profile = store
    .get_profile(user_id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| ApiError::NotFound(format!("no profile for user {user_id}")))?;
  Ok(Json(profile))
}

/// JSON body accepted by `PUT /users/:id/profile`. Omitted fields clear the
/// corresponding column — the row is written whole.
#[derive(Debug, Deserialize)]
pub struct ProfileBody {
  pub full_name:        Option<String>,
  pub avatar_url:       Option<String>,
  pub skin_type:        Option<String>,
  pub skin_tone:        Option<String>,
  pub morning_reminder: Option<NaiveTime>,
  pub evening_reminder: Option<NaiveTime>,
  pub physician_name:   Option<String>,
  pub physician_phone:  Option<String>,
}

impl ProfileBody {
  fn into_new(self, user_id: Uuid) -> NewProfile {
    NewProfile {
      user_id,
      full_name: self.full_name,
      avatar_url: self.avatar_url,
      skin_type: self.skin_type,
      skin_tone: self.skin_tone,
      morning_reminder: self.morning_reminder,
      evening_reminder: self.evening_reminder,
      physician_name: self.physician_name,
      physician_phone: self.physician_phone,
    }
  }
}

/// `PUT /users/:id/profile`
pub async fn upsert<S>(
  State(store): State<Arc<S>>,
  Path(user_id): Path<Uuid>,
  Json(body): Json<ProfileBody>,
) -> Result<Json<Profile>, ApiError>
where
  S: GlowStore,
{
  let profile = store
    .upsert_profile(body.into_new(user_id))
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(profile))
}
