//! Handlers for the routine calendar endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/users/:id/routines` | All routine logs, newest date first |
//! | `POST` | `/users/:id/routines/toggle` | Body: [`ToggleBody`]; today-only |
//! | `GET`  | `/users/:id/calendar` | Optional `?month=YYYY-MM`; per-day statuses |
//! | `GET`  | `/users/:id/streak` | Current and longest streak counters |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
};
use chrono::{Months, NaiveDate, Utc};
use glow_core::{
  achievement::Achievement,
  routine::{DateStatus, RoutineLog, RoutineSlot},
  store::GlowStore,
  streak, tracker,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ApiError;

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /users/:id/routines`
pub async fn list<S>(
  State(store): State<Arc<S>>,
  Path(user_id): Path<Uuid>,
) -> Result<Json<Vec<RoutineLog>>, ApiError>
where
  S: GlowStore,
{
  let logs = store
    .list_logs(user_id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(logs))
}

// ─── Toggle ───────────────────────────────────────────────────────────────────

/// JSON body accepted by `POST /users/:id/routines/toggle`.
#[derive(Debug, Deserialize)]
pub struct ToggleBody {
  pub date: NaiveDate,
  pub slot: RoutineSlot,
}

/// Everything the calendar view needs after a toggle.
#[derive(Debug, Serialize)]
pub struct ToggleResponse {
  pub log:            RoutineLog,
  pub current_streak: u32,
  pub longest_streak: u32,
  /// Milestones this toggle unlocked, if any.
  pub unlocked:       Vec<Achievement>,
}

/// `POST /users/:id/routines/toggle` — body: `{"date":"2025-03-10","slot":"morning"}`
///
/// Returns 422 when the date is not today.
pub async fn toggle<S>(
  State(store): State<Arc<S>>,
  Path(user_id): Path<Uuid>,
  Json(body): Json<ToggleBody>,
) -> Result<Json<ToggleResponse>, ApiError>
where
  S: GlowStore,
{
  let today = Utc::now().date_naive();
  let outcome =
    tracker::toggle_routine(store.as_ref(), user_id, body.date, body.slot, today)
      .await
      .map_err(ApiError::from_tracker)?;

  Ok(Json(ToggleResponse {
    log:            outcome.log,
    current_streak: outcome.summary.current_streak,
    longest_streak: outcome.summary.longest_streak,
    unlocked:       outcome.unlocked,
  }))
}

// ─── Calendar ─────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CalendarParams {
  /// `YYYY-MM`; defaults to the current month.
  pub month: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DayStatus {
  pub date:   NaiveDate,
  pub status: DateStatus,
}

#[derive(Debug, Serialize)]
pub struct CalendarResponse {
  pub month:          String,
  pub days:           Vec<DayStatus>,
  pub current_streak: u32,
  pub longest_streak: u32,
}

/// `GET /users/:id/calendar[?month=YYYY-MM]`
pub async fn calendar<S>(
  State(store): State<Arc<S>>,
  Path(user_id): Path<Uuid>,
  Query(params): Query<CalendarParams>,
) -> Result<Json<CalendarResponse>, ApiError>
where
  S: GlowStore,
{
  let today = Utc::now().date_naive();
  let month = params
    .month
    .unwrap_or_else(|| today.format("%Y-%m").to_string());

  let first = NaiveDate::parse_from_str(&format!("{month}-01"), "%Y-%m-%d")
    .map_err(|_| ApiError::BadRequest(format!("invalid month: {month:?}")))?;
  let next = first
    .checked_add_months(Months::new(1))
    .ok_or_else(|| ApiError::BadRequest(format!("invalid month: {month:?}")))?;

  let logs = store
    .list_logs(user_id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  let summary = streak::evaluate(&logs, today);

  let days = first
    .iter_days()
    .take_while(|d| *d < next)
    .map(|date| DayStatus {
      date,
      status: summary.status_for(date),
    })
    .collect();

  Ok(Json(CalendarResponse {
    month,
    days,
    current_streak: summary.current_streak,
    longest_streak: summary.longest_streak,
  }))
}

// ─── Streak ───────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct StreakResponse {
  pub current_streak: u32,
  pub longest_streak: u32,
}

/// `GET /users/:id/streak`
pub async fn streak<S>(
  State(store): State<Arc<S>>,
  Path(user_id): Path<Uuid>,
) -> Result<Json<StreakResponse>, ApiError>
where
  S: GlowStore,
{
  let logs = store
    .list_logs(user_id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  let summary = streak::evaluate(&logs, Utc::now().date_naive());

  Ok(Json(StreakResponse {
    current_streak: summary.current_streak,
    longest_streak: summary.longest_streak,
  }))
}
