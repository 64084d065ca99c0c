//! Routine log types — the fundamental unit of the glow tracker.
//!
//! One record exists per (user, calendar date). The two completion flags are
//! independent; a date with no record is semantically identical to a record
//! with both flags false, and every derived computation treats them the same.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ─── Slot ────────────────────────────────────────────────────────────────────

/// Which half of the daily routine a toggle targets.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum RoutineSlot {
  Morning,
  Evening,
}

// ─── RoutineLog ──────────────────────────────────────────────────────────────

/// Completion record for one (user, date) pair. The `(user_id, date)` pair is
/// unique; the record is created lazily on the first toggle for that date and
/// mutated in place afterwards. Never deleted by this crate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutineLog {
  pub log_id:            Uuid,
  pub user_id:           Uuid,
  /// Calendar date, no time component.
  pub date:              NaiveDate,
  pub morning_completed: bool,
  pub evening_completed: bool,
  /// Store-assigned timestamp; never changes after creation.
  pub created_at:        DateTime<Utc>,
}

impl RoutineLog {
  pub fn slot_completed(&self, slot: RoutineSlot) -> bool {
    match slot {
      RoutineSlot::Morning => self.morning_completed,
      RoutineSlot::Evening => self.evening_completed,
    }
  }

  /// At least one of the two routines was done.
  pub fn any_completed(&self) -> bool {
    self.morning_completed || self.evening_completed
  }

  /// Both routines were done.
  pub fn fully_completed(&self) -> bool {
    self.morning_completed && self.evening_completed
  }
}

// ─── NewRoutineLog ───────────────────────────────────────────────────────────

/// Input to [`crate::store::GlowStore::insert_log`].
/// `log_id` and `created_at` are always set by the store.
#[derive(Debug, Clone)]
pub struct NewRoutineLog {
  pub user_id:           Uuid,
  pub date:              NaiveDate,
  pub morning_completed: bool,
  pub evening_completed: bool,
}

impl NewRoutineLog {
  /// The record created by the first toggle of `slot` on a date with no
  /// existing record: the toggled flag true, the other false.
  pub fn for_slot(user_id: Uuid, date: NaiveDate, slot: RoutineSlot) -> Self {
    Self {
      user_id,
      date,
      morning_completed: slot == RoutineSlot::Morning,
      evening_completed: slot == RoutineSlot::Evening,
    }
  }
}

// ─── DateStatus ──────────────────────────────────────────────────────────────

/// Per-date completion category, derived fresh on every evaluation and used
/// for calendar-cell colouring. Never stored.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum DateStatus {
  None,
  Morning,
  Evening,
  Both,
}

impl DateStatus {
  /// The category of an existing record. Absent records are handled by
  /// [`crate::streak::StreakSummary::status_for`], which normalises absence
  /// to [`DateStatus::None`].
  pub fn of(log: &RoutineLog) -> Self {
    match (log.morning_completed, log.evening_completed) {
      (true, true) => Self::Both,
      (true, false) => Self::Morning,
      (false, true) => Self::Evening,
      (false, false) => Self::None,
    }
  }
}
