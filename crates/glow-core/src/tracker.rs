//! Orchestration of the mutation entry points.
//!
//! One shared refetch-and-recompute pass follows every mutation: the full
//! log collection is reloaded, the streak engine re-derives its summary,
//! and the achievement unlock pass runs against the recomputed streak. The
//! calendar, the streak badge, and the achievement list all read from that
//! one snapshot — there are no independent per-view fetches to race.

use chrono::NaiveDate;
use thiserror::Error;
use uuid::Uuid;

use crate::{
  achievement::{self, Achievement},
  chat::{ChatExchange, NewChatExchange, NewRecommendedProduct, RecommendedProduct},
  products,
  routine::{RoutineLog, RoutineSlot},
  store::{GlowStore, StoreError},
  streak::{self, StreakSummary},
};

// ─── Errors ──────────────────────────────────────────────────────────────────

/// Failure of a tracker operation: either a policy rejection from this crate
/// or a backend failure.
#[derive(Debug, Error)]
pub enum TrackerError<E: StoreError> {
  #[error(transparent)]
  Core(#[from] crate::Error),

  #[error("store error: {0}")]
  Store(#[source] E),
}

// ─── Toggle ──────────────────────────────────────────────────────────────────

/// Everything a display layer needs after a toggle: the refreshed record,
/// the recomputed streak summary, and any milestones unlocked by it.
#[derive(Debug, Clone)]
pub struct ToggleOutcome {
  pub log:      RoutineLog,
  pub summary:  StreakSummary,
  pub unlocked: Vec<Achievement>,
}

/// Flip one completion flag for one (user, date) pair as a single logical
/// operation, then run the shared refresh pass.
///
/// Mutation policy: only `today` is editable. Any other date is rejected
/// with [`crate::Error::DateNotEditable`] before a store write happens, so a
/// failed toggle never leaves optimistic state behind.
pub async fn toggle_routine<S: GlowStore>(
  store: &S,
  user_id: Uuid,
  date: NaiveDate,
  slot: RoutineSlot,
  today: NaiveDate,
) -> Result<ToggleOutcome, TrackerError<S::Error>> {
  if user_id.is_nil() {
    return Err(crate::Error::NilUser.into());
  }
  if date != today {
    return Err(
      crate::Error::DateNotEditable {
        requested: date,
        today,
      }
      .into(),
    );
  }

  let log = store
    .toggle_log_slot(user_id, date, slot)
    .await
    .map_err(TrackerError::Store)?;

  tracing::info!(%user_id, %date, slot = %slot, completed = log.slot_completed(slot), "routine toggled");

  let refresh = refresh_user(store, user_id, today).await?;

  Ok(ToggleOutcome {
    log,
    summary: refresh.summary,
    unlocked: refresh.unlocked,
  })
}

// ─── Refresh ─────────────────────────────────────────────────────────────────

/// The shared post-mutation snapshot.
#[derive(Debug, Clone)]
pub struct RefreshOutcome {
  pub summary:  StreakSummary,
  pub unlocked: Vec<Achievement>,
}

/// Reload the full log collection, re-derive the streak summary, and run the
/// achievement unlock pass against it.
pub async fn refresh_user<S: GlowStore>(
  store: &S,
  user_id: Uuid,
  today: NaiveDate,
) -> Result<RefreshOutcome, TrackerError<S::Error>> {
  let logs = store.list_logs(user_id).await.map_err(TrackerError::Store)?;
  let summary = streak::evaluate(&logs, today);

  let existing = store
    .list_achievements(user_id)
    .await
    .map_err(TrackerError::Store)?;
  let unlocked =
    unlock_achievements(store, user_id, summary.current_streak, &existing).await;

  Ok(RefreshOutcome { summary, unlocked })
}

// ─── Achievement unlock pass ─────────────────────────────────────────────────

/// Persist every milestone newly crossed at `current_streak` and return the
/// created records.
///
/// Each milestone is persisted independently: one failure is logged and
/// skipped without blocking the rest of the pass. A duplicate conflict means
/// another client unlocked the milestone first; it is not reported again.
pub async fn unlock_achievements<S: GlowStore>(
  store: &S,
  user_id: Uuid,
  current_streak: u32,
  existing: &[Achievement],
) -> Vec<Achievement> {
  let mut unlocked = Vec::new();

  for milestone in achievement::newly_earned(current_streak, existing) {
    match store.insert_achievement(milestone.to_new(user_id)).await {
      Ok(created) => {
        tracing::info!(%user_id, name = milestone.name, days = milestone.days, "achievement unlocked");
        unlocked.push(created);
      }
      Err(e) if e.is_duplicate() => {
        tracing::debug!(%user_id, name = milestone.name, "achievement already unlocked elsewhere");
      }
      Err(e) => {
        tracing::warn!(%user_id, name = milestone.name, error = %e, "failed to persist achievement");
      }
    }
  }

  unlocked
}

// ─── Chat recording ──────────────────────────────────────────────────────────

/// A stored exchange together with the products mined from its reply.
#[derive(Debug, Clone)]
pub struct ChatRecord {
  pub exchange: ChatExchange,
  pub products: Vec<RecommendedProduct>,
}

/// Persist a prompt/reply pair, then extract and persist any product
/// mentions from the reply. Per-product failures are logged and skipped,
/// mirroring the unlock pass.
pub async fn record_chat<S: GlowStore>(
  store: &S,
  input: NewChatExchange,
) -> Result<ChatRecord, TrackerError<S::Error>> {
  if input.user_id.is_nil() {
    return Err(crate::Error::NilUser.into());
  }

  let exchange = store
    .insert_chat(input)
    .await
    .map_err(TrackerError::Store)?;

  let mut stored = Vec::new();
  for mention in products::extract_products(&exchange.response) {
    let input = NewRecommendedProduct {
      user_id:     exchange.user_id,
      chat_id:     Some(exchange.chat_id),
      name:        mention.name,
      description: mention.description,
      link:        mention.link,
    };
    match store.insert_product(input).await {
      Ok(product) => stored.push(product),
      Err(e) => {
        tracing::warn!(user_id = %exchange.user_id, error = %e, "failed to persist recommended product");
      }
    }
  }

  Ok(ChatRecord { exchange, products: stored })
}
