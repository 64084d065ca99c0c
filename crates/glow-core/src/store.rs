//! The `GlowStore` trait and the store error contract.
//!
//! The trait is implemented by storage backends (e.g. `glow-store-sqlite`).
//! Higher layers (`glow-api`, the tracker orchestration in this crate)
//! depend on this abstraction, not on any concrete backend.

use std::future::Future;

use chrono::NaiveDate;
use uuid::Uuid;

use crate::{
  achievement::{Achievement, NewAchievement},
  chat::{ChatExchange, NewChatExchange, NewRecommendedProduct, RecommendedProduct},
  profile::{NewProfile, Profile},
  routine::{NewRoutineLog, RoutineLog, RoutineSlot},
  scan::{NewSkinScan, SkinScan},
};

// ─── Error contract ──────────────────────────────────────────────────────────

/// Bound on a backend's error type.
///
/// `is_duplicate` lets callers recognise a unique-constraint conflict — a
/// record that already exists — without knowing the backend. The achievement
/// unlock pass uses it to treat a racing insert from another client as
/// "already unlocked" rather than a failure.
pub trait StoreError: std::error::Error + Send + Sync + 'static {
  fn is_duplicate(&self) -> bool;
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a glow storage backend.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait GlowStore: Send + Sync {
  type Error: StoreError;

  // ── Routine logs ──────────────────────────────────────────────────────

  /// All routine logs for a user, newest date first.
  fn list_logs(
    &self,
    user_id: Uuid,
  ) -> impl Future<Output = Result<Vec<RoutineLog>, Self::Error>> + Send + '_;

  /// The log for one (user, date) pair. `None` if no record exists.
  fn get_log(
    &self,
    user_id: Uuid,
    date: NaiveDate,
  ) -> impl Future<Output = Result<Option<RoutineLog>, Self::Error>> + Send + '_;

  /// Create a log record. A record for the same (user, date) pair already
  /// existing is a duplicate error ([`StoreError::is_duplicate`]); callers
  /// treat it as "record now exists" and fall back to an update.
  fn insert_log(
    &self,
    input: NewRoutineLog,
  ) -> impl Future<Output = Result<RoutineLog, Self::Error>> + Send + '_;

  /// Set one completion flag on an existing record, leaving the other flag
  /// untouched. Errors if the record does not exist.
  fn set_log_slot(
    &self,
    log_id: Uuid,
    slot: RoutineSlot,
    completed: bool,
  ) -> impl Future<Output = Result<RoutineLog, Self::Error>> + Send + '_;

  /// Atomically flip one completion flag for (user, date), creating the
  /// record if it does not exist (toggled flag true, the other false).
  /// This single upsert replaces the read-then-write pair and its race.
  fn toggle_log_slot(
    &self,
    user_id: Uuid,
    date: NaiveDate,
    slot: RoutineSlot,
  ) -> impl Future<Output = Result<RoutineLog, Self::Error>> + Send + '_;

  // ── Achievements ──────────────────────────────────────────────────────

  /// All achievements for a user, newest first.
  fn list_achievements(
    &self,
    user_id: Uuid,
  ) -> impl Future<Output = Result<Vec<Achievement>, Self::Error>> + Send + '_;

  /// Create an achievement. A record with the same (user, name) already
  /// existing is a duplicate error ([`StoreError::is_duplicate`]).
  fn insert_achievement(
    &self,
    input: NewAchievement,
  ) -> impl Future<Output = Result<Achievement, Self::Error>> + Send + '_;

  // ── Profiles ──────────────────────────────────────────────────────────

  fn get_profile(
    &self,
    user_id: Uuid,
  ) -> impl Future<Output = Result<Option<Profile>, Self::Error>> + Send + '_;

  /// Write the whole profile row. `created_at` is preserved across upserts;
  /// `updated_at` is refreshed on every write.
  fn upsert_profile(
    &self,
    input: NewProfile,
  ) -> impl Future<Output = Result<Profile, Self::Error>> + Send + '_;

  // ── Chat history ──────────────────────────────────────────────────────

  /// All exchanges for a user, newest first.
  fn list_chats(
    &self,
    user_id: Uuid,
  ) -> impl Future<Output = Result<Vec<ChatExchange>, Self::Error>> + Send + '_;

  fn insert_chat(
    &self,
    input: NewChatExchange,
  ) -> impl Future<Output = Result<ChatExchange, Self::Error>> + Send + '_;

  /// All recommended products for a user, newest first.
  fn list_products(
    &self,
    user_id: Uuid,
  ) -> impl Future<Output = Result<Vec<RecommendedProduct>, Self::Error>> + Send + '_;

  fn insert_product(
    &self,
    input: NewRecommendedProduct,
  ) -> impl Future<Output = Result<RecommendedProduct, Self::Error>> + Send + '_;

  // ── Skin scans ────────────────────────────────────────────────────────

  /// All scans for a user, newest first.
  fn list_scans(
    &self,
    user_id: Uuid,
  ) -> impl Future<Output = Result<Vec<SkinScan>, Self::Error>> + Send + '_;

  fn insert_scan(
    &self,
    input: NewSkinScan,
  ) -> impl Future<Output = Result<SkinScan, Self::Error>> + Send + '_;
}
