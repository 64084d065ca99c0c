//! User profile — display identity, skin characteristics, and reminder
//! preferences. One row per user, written whole via upsert.

use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The persisted profile row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
  pub user_id:          Uuid,
  pub full_name:        Option<String>,
  pub avatar_url:       Option<String>,
  /// Free-text classification, e.g. "oily", "combination".
  pub skin_type:        Option<String>,
  pub skin_tone:        Option<String>,
  /// Local times of day the user wants routine reminders.
  pub morning_reminder: Option<NaiveTime>,
  pub evening_reminder: Option<NaiveTime>,
  pub physician_name:   Option<String>,
  pub physician_phone:  Option<String>,
  /// Set once when the profile row first appears; immutable after.
  pub created_at:       DateTime<Utc>,
  /// Refreshed by the store on every upsert.
  pub updated_at:       DateTime<Utc>,
}

/// Input to [`crate::store::GlowStore::upsert_profile`].
/// Both timestamps are managed by the store.
#[derive(Debug, Clone)]
pub struct NewProfile {
  pub user_id:          Uuid,
  pub full_name:        Option<String>,
  pub avatar_url:       Option<String>,
  pub skin_type:        Option<String>,
  pub skin_tone:        Option<String>,
  pub morning_reminder: Option<NaiveTime>,
  pub evening_reminder: Option<NaiveTime>,
  pub physician_name:   Option<String>,
  pub physician_phone:  Option<String>,
}

impl NewProfile {
  /// An empty profile shell for `user_id`.
  pub fn new(user_id: Uuid) -> Self {
    Self {
      user_id,
      full_name: None,
      avatar_url: None,
      skin_type: None,
      skin_tone: None,
      morning_reminder: None,
      evening_reminder: None,
      physician_name: None,
      physician_phone: None,
    }
  }
}
