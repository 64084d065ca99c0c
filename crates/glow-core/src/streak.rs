//! Streak derivation over a user's routine log collection.
//!
//! [`evaluate`] is a pure function: the complete log collection in, a
//! [`StreakSummary`] out. No hidden state, no store access. Input order is
//! not significant.
//!
//! # Streak policy
//!
//! The contract implemented here, uniformly:
//!
//! - Today counts 1 toward the current streak if at least one of today's
//!   routines is done.
//! - Every earlier day in the chain needs BOTH routines done, and days must
//!   be calendar-adjacent; the first missing, partial, or non-adjacent day
//!   stops the walk.
//! - The backward walk looks at most [`MAX_LOOKBACK_DAYS`] days back in
//!   total, so the current streak is capped at 30 — the largest milestone
//!   threshold.
//! - A date with no record is identical to a record with both flags false.
//!
//! The longest streak is the longest run of consecutive fully-completed days
//! anywhere in the history, floored at the current streak so the lenient
//! today rule can never make it smaller than the current counter.

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::routine::{DateStatus, RoutineLog};

/// Total days (today included) the current-streak walk may cover.
pub const MAX_LOOKBACK_DAYS: u32 = 30;

// ─── Summary ─────────────────────────────────────────────────────────────────

/// The derived, never-persisted output of one streak evaluation.
#[derive(Debug, Clone)]
pub struct StreakSummary {
  status_by_date:     HashMap<NaiveDate, DateStatus>,
  pub current_streak: u32,
  pub longest_streak: u32,
}

impl StreakSummary {
  /// Completion category for a calendar cell. Absent dates and present-but-
  /// both-false records both come back as [`DateStatus::None`]; callers never
  /// branch on record existence.
  pub fn status_for(&self, date: NaiveDate) -> DateStatus {
    self
      .status_by_date
      .get(&date)
      .copied()
      .unwrap_or(DateStatus::None)
  }
}

// ─── Evaluation ──────────────────────────────────────────────────────────────

/// Derive the status map and both streak counters from the full log
/// collection.
pub fn evaluate(logs: &[RoutineLog], today: NaiveDate) -> StreakSummary {
  let mut status_by_date = HashMap::with_capacity(logs.len());
  for log in logs {
    status_by_date.insert(log.date, DateStatus::of(log));
  }

  let status = |date: NaiveDate| {
    status_by_date
      .get(&date)
      .copied()
      .unwrap_or(DateStatus::None)
  };

  // Today is lenient: one completed routine keeps the streak alive.
  let mut current = 0u32;
  if status(today) != DateStatus::None {
    current += 1;
  }

  // Earlier days are strict: both routines, exactly one calendar day apart.
  let mut day = today.pred_opt();
  let mut looked_back = 1u32;
  while looked_back < MAX_LOOKBACK_DAYS {
    let Some(d) = day else { break };
    if status(d) != DateStatus::Both {
      break;
    }
    current += 1;
    day = d.pred_opt();
    looked_back += 1;
  }

  let longest = longest_full_run(&status_by_date).max(current);

  StreakSummary {
    status_by_date,
    current_streak: current,
    longest_streak: longest,
  }
}

/// Length of the longest run of consecutive calendar days whose records have
/// both flags set.
fn longest_full_run(status_by_date: &HashMap<NaiveDate, DateStatus>) -> u32 {
  let mut full_days: Vec<NaiveDate> = status_by_date
    .iter()
    .filter(|(_, s)| **s == DateStatus::Both)
    .map(|(d, _)| *d)
    .collect();
  full_days.sort_unstable();

  let mut longest = 0u32;
  let mut run = 0u32;
  let mut prev: Option<NaiveDate> = None;

  for day in full_days {
    run = match prev {
      Some(p) if p.succ_opt() == Some(day) => run + 1,
      _ => 1,
    };
    longest = longest.max(run);
    prev = Some(day);
  }

  longest
}
