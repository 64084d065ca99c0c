//! Error types for `glow-core`.

use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
  /// Routine completion can only be edited for the current day.
  #[error("routine for {requested} cannot be changed: only today ({today}) is editable")]
  DateNotEditable {
    requested: NaiveDate,
    today:     NaiveDate,
  },

  #[error("user id must not be nil")]
  NilUser,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
