//! Error type for `glow-store-sqlite`.

use chrono::NaiveDate;
use glow_core::store::StoreError;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  /// A stored column value could not be mapped back to its domain type.
  #[error("column decode error: {0}")]
  Decode(String),

  /// A routine log for this (user, date) pair already exists.
  #[error("routine log already exists for user {user_id} on {date}")]
  DuplicateLog { user_id: Uuid, date: NaiveDate },

  /// An achievement with this (user, name) pair already exists.
  #[error("achievement {name:?} already exists for user {user_id}")]
  DuplicateAchievement { user_id: Uuid, name: String },

  #[error("routine log not found: {0}")]
  LogNotFound(Uuid),
}

impl StoreError for Error {
  fn is_duplicate(&self) -> bool {
    matches!(
      self,
      Error::DuplicateLog { .. } | Error::DuplicateAchievement { .. }
    )
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
