//! Skin scan history.
//!
//! The classification fields are filled from an external prediction endpoint
//! the core never calls; `scan_image` is an opaque reference to externally
//! stored image data. Records are append-only.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One persisted scan result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkinScan {
  pub scan_id:        Uuid,
  pub user_id:        Uuid,
  pub skin_type:      Option<String>,
  pub skin_tone:      Option<String>,
  pub skin_issues:    Option<String>,
  pub sun_damage:     Option<String>,
  pub unique_feature: Option<String>,
  pub disease:        Option<String>,
  /// Whether the detected condition changed since the previous scan.
  pub disease_change: bool,
  /// Opaque reference to the scanned image; no binary data lives here.
  pub scan_image:     Option<String>,
  pub created_at:     DateTime<Utc>,
}

/// Input to [`crate::store::GlowStore::insert_scan`].
#[derive(Debug, Clone)]
pub struct NewSkinScan {
  pub user_id:        Uuid,
  pub skin_type:      Option<String>,
  pub skin_tone:      Option<String>,
  pub skin_issues:    Option<String>,
  pub sun_damage:     Option<String>,
  pub unique_feature: Option<String>,
  pub disease:        Option<String>,
  pub disease_change: bool,
  pub scan_image:     Option<String>,
}
