//! Achievement records and the fixed streak milestone table.
//!
//! An achievement is created exactly once, the instant the corresponding
//! streak milestone is first reached, and is never mutated or deleted.
//! The `(user_id, name)` pair is unique.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ─── Icon ────────────────────────────────────────────────────────────────────

/// Display tag attached to an achievement; a small closed set the UI maps to
/// badge artwork.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
  strum::Display,
  strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AchievementIcon {
  Check,
  Star,
  Award,
  Trophy,
}

// ─── Achievement ─────────────────────────────────────────────────────────────

/// A persisted milestone unlock.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Achievement {
  pub achievement_id: Uuid,
  pub user_id:        Uuid,
  /// Milestone name; unique per user.
  pub name:           String,
  pub description:    String,
  pub icon:           AchievementIcon,
  /// Store-assigned timestamp; never changes after creation.
  pub created_at:     DateTime<Utc>,
}

/// Input to [`crate::store::GlowStore::insert_achievement`].
/// `achievement_id` and `created_at` are always set by the store.
#[derive(Debug, Clone)]
pub struct NewAchievement {
  pub user_id:     Uuid,
  pub name:        String,
  pub description: String,
  pub icon:        AchievementIcon,
}

// ─── Milestones ──────────────────────────────────────────────────────────────

/// One row of the fixed milestone table. Thresholds are inclusive: a
/// milestone is earned once `current_streak >= days`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Milestone {
  pub days:        u32,
  pub name:        &'static str,
  pub description: &'static str,
  pub icon:        AchievementIcon,
}

impl Milestone {
  pub fn to_new(&self, user_id: Uuid) -> NewAchievement {
    NewAchievement {
      user_id,
      name: self.name.to_owned(),
      description: self.description.to_owned(),
      icon: self.icon,
    }
  }
}

/// The streak milestone table, ordered by threshold.
pub static MILESTONES: [Milestone; 4] = [
  Milestone {
    days:        3,
    name:        "Getting Started",
    description: "Completed routines for 3 days in a row",
    icon:        AchievementIcon::Check,
  },
  Milestone {
    days:        7,
    name:        "One Week Wonder",
    description: "Completed routines for a full week",
    icon:        AchievementIcon::Star,
  },
  Milestone {
    days:        14,
    name:        "Consistency Champion",
    description: "Two weeks of dedicated skincare",
    icon:        AchievementIcon::Award,
  },
  Milestone {
    days:        30,
    name:        "Skincare Master",
    description: "A full month of perfect routines",
    icon:        AchievementIcon::Trophy,
  },
];

/// Milestones newly earned at `current_streak`, given the achievements the
/// user has already unlocked. Several milestones can be earned in one pass
/// (a streak jumping straight to 10 yields both the 3- and 7-day rows).
/// Re-running with an unchanged streak and unchanged unlocked set yields
/// nothing.
pub fn newly_earned(
  current_streak: u32,
  unlocked: &[Achievement],
) -> Vec<&'static Milestone> {
  MILESTONES
    .iter()
    .filter(|m| m.days <= current_streak)
    .filter(|m| !unlocked.iter().any(|a| a.name == m.name))
    .collect()
}
