//! Tests for the pure derivation logic and the tracker orchestration,
//! run against a small in-memory store.

use std::{
  collections::HashMap,
  sync::Mutex,
};

use chrono::{NaiveDate, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::{
  achievement::{self, Achievement, NewAchievement},
  chat::{ChatExchange, NewChatExchange, NewRecommendedProduct, RecommendedProduct},
  products::{self, ProductMention},
  profile::{NewProfile, Profile},
  routine::{DateStatus, NewRoutineLog, RoutineLog, RoutineSlot},
  scan::{NewSkinScan, SkinScan},
  store::{GlowStore, StoreError},
  streak, tracker,
};

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
  NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn log(user_id: Uuid, date: NaiveDate, morning: bool, evening: bool) -> RoutineLog {
  RoutineLog {
    log_id: Uuid::new_v4(),
    user_id,
    date,
    morning_completed: morning,
    evening_completed: evening,
    created_at: Utc::now(),
  }
}

// ─── Streak engine ───────────────────────────────────────────────────────────

#[test]
fn empty_history_has_no_streak() {
  let summary = streak::evaluate(&[], d(2025, 3, 10));
  assert_eq!(summary.current_streak, 0);
  assert_eq!(summary.longest_streak, 0);
}

#[test]
fn status_for_absent_date_is_none() {
  let summary = streak::evaluate(&[], d(2025, 3, 10));
  assert_eq!(summary.status_for(d(2025, 3, 10)), DateStatus::None);
}

#[test]
fn status_reflects_completion_flags() {
  let user = Uuid::new_v4();
  let today = d(2025, 3, 10);
  let logs = vec![
    log(user, d(2025, 3, 10), true, true),
    log(user, d(2025, 3, 9), true, false),
    log(user, d(2025, 3, 8), false, true),
    log(user, d(2025, 3, 7), false, false),
  ];
  let summary = streak::evaluate(&logs, today);

  assert_eq!(summary.status_for(d(2025, 3, 10)), DateStatus::Both);
  assert_eq!(summary.status_for(d(2025, 3, 9)), DateStatus::Morning);
  assert_eq!(summary.status_for(d(2025, 3, 8)), DateStatus::Evening);
  // A record with both flags false is indistinguishable from no record.
  assert_eq!(summary.status_for(d(2025, 3, 7)), DateStatus::None);
  assert_eq!(summary.status_for(d(2025, 3, 6)), DateStatus::None);
}

#[test]
fn single_routine_today_counts_one() {
  let user = Uuid::new_v4();
  let today = d(2025, 3, 10);
  let logs = vec![log(user, today, true, false)];
  let summary = streak::evaluate(&logs, today);
  assert_eq!(summary.current_streak, 1);
}

#[test]
fn partial_previous_day_stops_the_walk() {
  let user = Uuid::new_v4();
  let today = d(2025, 3, 10);
  // Today fully done, yesterday morning-only: the backward walk stops at
  // yesterday, so only today counts.
  let logs = vec![
    log(user, today, true, true),
    log(user, d(2025, 3, 9), true, false),
  ];
  let summary = streak::evaluate(&logs, today);
  assert_eq!(summary.current_streak, 1);
}

#[test]
fn three_full_days_make_a_three_streak() {
  let user = Uuid::new_v4();
  let today = d(2025, 3, 10);
  let logs = vec![
    log(user, today, true, true),
    log(user, d(2025, 3, 9), true, true),
    log(user, d(2025, 3, 8), true, true),
  ];
  let summary = streak::evaluate(&logs, today);
  assert_eq!(summary.current_streak, 3);
}

#[test]
fn missing_day_breaks_the_chain() {
  let user = Uuid::new_v4();
  let today = d(2025, 3, 10);
  // No record for the 9th: the run on the 7th/8th is unreachable.
  let logs = vec![
    log(user, today, true, true),
    log(user, d(2025, 3, 8), true, true),
    log(user, d(2025, 3, 7), true, true),
  ];
  let summary = streak::evaluate(&logs, today);
  assert_eq!(summary.current_streak, 1);
}

#[test]
fn incomplete_today_still_counts_finished_previous_days() {
  let user = Uuid::new_v4();
  let today = d(2025, 3, 10);
  // Nothing done today yet; yesterday and the day before were full days.
  let logs = vec![
    log(user, d(2025, 3, 9), true, true),
    log(user, d(2025, 3, 8), true, true),
  ];
  let summary = streak::evaluate(&logs, today);
  assert_eq!(summary.current_streak, 2);
}

#[test]
fn current_streak_caps_at_thirty_days() {
  let user = Uuid::new_v4();
  let today = d(2025, 3, 10);
  let mut logs = Vec::new();
  let mut day = today;
  for _ in 0..40 {
    logs.push(log(user, day, true, true));
    day = day.pred_opt().unwrap();
  }
  let summary = streak::evaluate(&logs, today);
  assert_eq!(summary.current_streak, 30);
  // The longest counter sees the whole 40-day run.
  assert_eq!(summary.longest_streak, 40);
}

#[test]
fn longest_streak_covers_older_runs() {
  let user = Uuid::new_v4();
  let today = d(2025, 3, 10);
  let logs = vec![
    log(user, today, true, false),
    // A five-day full run last month, long since broken.
    log(user, d(2025, 2, 5), true, true),
    log(user, d(2025, 2, 4), true, true),
    log(user, d(2025, 2, 3), true, true),
    log(user, d(2025, 2, 2), true, true),
    log(user, d(2025, 2, 1), true, true),
  ];
  let summary = streak::evaluate(&logs, today);
  assert_eq!(summary.current_streak, 1);
  assert_eq!(summary.longest_streak, 5);
}

#[test]
fn longest_streak_is_never_below_current() {
  let user = Uuid::new_v4();
  let today = d(2025, 3, 10);
  // Current streak is 2 with a lenient today head; no full run reaches 2.
  let logs = vec![
    log(user, today, false, true),
    log(user, d(2025, 3, 9), true, true),
  ];
  let summary = streak::evaluate(&logs, today);
  assert_eq!(summary.current_streak, 2);
  assert!(summary.longest_streak >= summary.current_streak);
}

// ─── Milestone table ─────────────────────────────────────────────────────────

#[test]
fn streak_below_first_threshold_earns_nothing() {
  assert!(achievement::newly_earned(1, &[]).is_empty());
  assert!(achievement::newly_earned(2, &[]).is_empty());
}

#[test]
fn streak_of_three_earns_getting_started() {
  let earned = achievement::newly_earned(3, &[]);
  assert_eq!(earned.len(), 1);
  assert_eq!(earned[0].name, "Getting Started");
}

#[test]
fn streak_jump_earns_every_crossed_milestone() {
  let earned = achievement::newly_earned(10, &[]);
  let names: Vec<_> = earned.iter().map(|m| m.name).collect();
  assert_eq!(names, ["Getting Started", "One Week Wonder"]);
}

#[test]
fn thirty_day_streak_earns_all_milestones() {
  assert_eq!(achievement::newly_earned(30, &[]).len(), 4);
}

#[test]
fn already_unlocked_milestones_are_not_earned_again() {
  let user = Uuid::new_v4();
  let unlocked: Vec<Achievement> = achievement::newly_earned(10, &[])
    .iter()
    .map(|m| Achievement {
      achievement_id: Uuid::new_v4(),
      user_id:        user,
      name:           m.name.to_owned(),
      description:    m.description.to_owned(),
      icon:           m.icon,
      created_at:     Utc::now(),
    })
    .collect();

  assert!(achievement::newly_earned(10, &unlocked).is_empty());
  // A higher streak still earns only the newly crossed row.
  let earned = achievement::newly_earned(14, &unlocked);
  assert_eq!(earned.len(), 1);
  assert_eq!(earned[0].name, "Consistency Champion");
}

// ─── Product extraction ──────────────────────────────────────────────────────

#[test]
fn extracts_bold_name_with_markdown_link() {
  let text = "Try **CeraVe Foaming Cleanser** - [Amazon](https://www.amazon.com/dp/B01N1LL62W)";
  let mentions = products::extract_products(text);
  assert_eq!(mentions.len(), 1);
  assert_eq!(mentions[0].name, "CeraVe Foaming Cleanser");
  assert_eq!(
    mentions[0].link.as_deref(),
    Some("https://www.amazon.com/dp/B01N1LL62W")
  );
}

#[test]
fn extracts_bold_name_with_description() {
  let text = "**La Roche-Posay Toleriane**: a gentle daily moisturizer\n";
  let mentions = products::extract_products(text);
  assert_eq!(mentions.len(), 1);
  assert_eq!(mentions[0].name, "La Roche-Posay Toleriane");
  assert_eq!(
    mentions[0].description.as_deref(),
    Some("a gentle daily moisturizer")
  );
  assert!(mentions[0].link.is_none());
}

#[test]
fn extracts_numbered_and_dashed_items() {
  let text = "1. Vanicream Gentle Cleanser: fragrance free (https://example.com/vanicream)\n\
              - Supergoop Unseen Sunscreen: SPF 40 for daily wear\n";
  let mentions = products::extract_products(text);
  assert_eq!(mentions.len(), 2);
  assert_eq!(mentions[0].name, "Vanicream Gentle Cleanser");
  assert_eq!(
    mentions[0].link.as_deref(),
    Some("https://example.com/vanicream")
  );
  assert_eq!(mentions[1].name, "Supergoop Unseen Sunscreen");
  assert_eq!(
    mentions[1].description.as_deref(),
    Some("SPF 40 for daily wear")
  );
}

#[test]
fn duplicate_mentions_collapse_to_first() {
  let text = "**Cetaphil Daily Cleanser** - https://example.com/cetaphil\n\
              1. Cetaphil Daily Cleanser: shows up again\n";
  let mentions = products::extract_products(text);
  assert_eq!(mentions.len(), 1);
  assert_eq!(
    mentions[0],
    ProductMention {
      name:        "Cetaphil Daily Cleanser".to_owned(),
      description: None,
      link:        Some("https://example.com/cetaphil".to_owned()),
    }
  );
}

#[test]
fn plain_prose_yields_no_products() {
  let mentions =
    products::extract_products("Drink plenty of water and sleep well.");
  assert!(mentions.is_empty());
}

// ─── In-memory store for tracker tests ───────────────────────────────────────

#[derive(Debug, Error)]
enum MemError {
  #[error("duplicate record")]
  Duplicate,
  #[error("record not found")]
  NotFound,
  #[error("injected failure")]
  Injected,
}

impl StoreError for MemError {
  fn is_duplicate(&self) -> bool { matches!(self, MemError::Duplicate) }
}

#[derive(Default)]
struct MemStore {
  logs:         Mutex<Vec<RoutineLog>>,
  achievements: Mutex<Vec<Achievement>>,
  profiles:     Mutex<HashMap<Uuid, Profile>>,
  chats:        Mutex<Vec<ChatExchange>>,
  products:     Mutex<Vec<RecommendedProduct>>,
  scans:        Mutex<Vec<SkinScan>>,
  /// Inserting an achievement with this name fails with `Injected`.
  fail_achievement: Mutex<Option<String>>,
}

impl MemStore {
  fn fail_achievement_named(&self, name: &str) {
    *self.fail_achievement.lock().unwrap() = Some(name.to_owned());
  }

  fn achievement_count(&self) -> usize {
    self.achievements.lock().unwrap().len()
  }
}

impl GlowStore for MemStore {
  type Error = MemError;

  async fn list_logs(&self, user_id: Uuid) -> Result<Vec<RoutineLog>, MemError> {
    let mut logs: Vec<_> = self
      .logs
      .lock()
      .unwrap()
      .iter()
      .filter(|l| l.user_id == user_id)
      .cloned()
      .collect();
    logs.sort_by(|a, b| b.date.cmp(&a.date));
    Ok(logs)
  }

  async fn get_log(
    &self,
    user_id: Uuid,
    date: NaiveDate,
  ) -> Result<Option<RoutineLog>, MemError> {
    Ok(
      self
        .logs
        .lock()
        .unwrap()
        .iter()
        .find(|l| l.user_id == user_id && l.date == date)
        .cloned(),
    )
  }

  async fn insert_log(&self, input: NewRoutineLog) -> Result<RoutineLog, MemError> {
    let mut logs = self.logs.lock().unwrap();
    if logs
      .iter()
      .any(|l| l.user_id == input.user_id && l.date == input.date)
    {
      return Err(MemError::Duplicate);
    }
    let created = RoutineLog {
      log_id: Uuid::new_v4(),
      user_id: input.user_id,
      date: input.date,
      morning_completed: input.morning_completed,
      evening_completed: input.evening_completed,
      created_at: Utc::now(),
    };
    logs.push(created.clone());
    Ok(created)
  }

  async fn set_log_slot(
    &self,
    log_id: Uuid,
    slot: RoutineSlot,
    completed: bool,
  ) -> Result<RoutineLog, MemError> {
    let mut logs = self.logs.lock().unwrap();
    let log = logs
      .iter_mut()
      .find(|l| l.log_id == log_id)
      .ok_or(MemError::NotFound)?;
    match slot {
      RoutineSlot::Morning => log.morning_completed = completed,
      RoutineSlot::Evening => log.evening_completed = completed,
    }
    Ok(log.clone())
  }

  async fn toggle_log_slot(
    &self,
    user_id: Uuid,
    date: NaiveDate,
    slot: RoutineSlot,
  ) -> Result<RoutineLog, MemError> {
    let mut logs = self.logs.lock().unwrap();
    if let Some(log) = logs
      .iter_mut()
      .find(|l| l.user_id == user_id && l.date == date)
    {
      match slot {
        RoutineSlot::Morning => log.morning_completed = !log.morning_completed,
        RoutineSlot::Evening => log.evening_completed = !log.evening_completed,
      }
      return Ok(log.clone());
    }
    let input = NewRoutineLog::for_slot(user_id, date, slot);
    let created = RoutineLog {
      log_id: Uuid::new_v4(),
      user_id: input.user_id,
      date: input.date,
      morning_completed: input.morning_completed,
      evening_completed: input.evening_completed,
      created_at: Utc::now(),
    };
    logs.push(created.clone());
    Ok(created)
  }

  async fn list_achievements(
    &self,
    user_id: Uuid,
  ) -> Result<Vec<Achievement>, MemError> {
    Ok(
      self
        .achievements
        .lock()
        .unwrap()
        .iter()
        .filter(|a| a.user_id == user_id)
        .cloned()
        .collect(),
    )
  }

  async fn insert_achievement(
    &self,
    input: NewAchievement,
  ) -> Result<Achievement, MemError> {
    if self.fail_achievement.lock().unwrap().as_deref() == Some(&input.name) {
      return Err(MemError::Injected);
    }
    let mut achievements = self.achievements.lock().unwrap();
    if achievements
      .iter()
      .any(|a| a.user_id == input.user_id && a.name == input.name)
    {
      return Err(MemError::Duplicate);
    }
    let created = Achievement {
      achievement_id: Uuid::new_v4(),
      user_id: input.user_id,
      name: input.name,
      description: input.description,
      icon: input.icon,
      created_at: Utc::now(),
    };
    achievements.push(created.clone());
    Ok(created)
  }

  async fn get_profile(&self, user_id: Uuid) -> Result<Option<Profile>, MemError> {
    Ok(self.profiles.lock().unwrap().get(&user_id).cloned())
  }

  async fn upsert_profile(&self, input: NewProfile) -> Result<Profile, MemError> {
    let mut profiles = self.profiles.lock().unwrap();
    let now = Utc::now();
    let created_at = profiles
      .get(&input.user_id)
      .map(|p| p.created_at)
      .unwrap_or(now);
    let profile = Profile {
      user_id: input.user_id,
      full_name: input.full_name,
      avatar_url: input.avatar_url,
      skin_type: input.skin_type,
      skin_tone: input.skin_tone,
      morning_reminder: input.morning_reminder,
      evening_reminder: input.evening_reminder,
      physician_name: input.physician_name,
      physician_phone: input.physician_phone,
      created_at,
      updated_at: now,
    };
    profiles.insert(profile.user_id, profile.clone());
    Ok(profile)
  }

  async fn list_chats(&self, user_id: Uuid) -> Result<Vec<ChatExchange>, MemError> {
    Ok(
      self
        .chats
        .lock()
        .unwrap()
        .iter()
        .filter(|c| c.user_id == user_id)
        .cloned()
        .collect(),
    )
  }

  async fn insert_chat(
    &self,
    input: NewChatExchange,
  ) -> Result<ChatExchange, MemError> {
    let created = ChatExchange {
      chat_id: Uuid::new_v4(),
      user_id: input.user_id,
      message: input.message,
      response: input.response,
      created_at: Utc::now(),
    };
    self.chats.lock().unwrap().push(created.clone());
    Ok(created)
  }

  async fn list_products(
    &self,
    user_id: Uuid,
  ) -> Result<Vec<RecommendedProduct>, MemError> {
    Ok(
      self
        .products
        .lock()
        .unwrap()
        .iter()
        .filter(|p| p.user_id == user_id)
        .cloned()
        .collect(),
    )
  }

  async fn insert_product(
    &self,
    input: NewRecommendedProduct,
  ) -> Result<RecommendedProduct, MemError> {
    let created = RecommendedProduct {
      product_id: Uuid::new_v4(),
      user_id: input.user_id,
      chat_id: input.chat_id,
      name: input.name,
      description: input.description,
      link: input.link,
      created_at: Utc::now(),
    };
    self.products.lock().unwrap().push(created.clone());
    Ok(created)
  }

  async fn list_scans(&self, user_id: Uuid) -> Result<Vec<SkinScan>, MemError> {
    Ok(
      self
        .scans
        .lock()
        .unwrap()
        .iter()
        .filter(|s| s.user_id == user_id)
        .cloned()
        .collect(),
    )
  }

  async fn insert_scan(&self, input: NewSkinScan) -> Result<SkinScan, MemError> {
    let created = SkinScan {
      scan_id: Uuid::new_v4(),
      user_id: input.user_id,
      skin_type: input.skin_type,
      skin_tone: input.skin_tone,
      skin_issues: input.skin_issues,
      sun_damage: input.sun_damage,
      unique_feature: input.unique_feature,
      disease: input.disease,
      disease_change: input.disease_change,
      scan_image: input.scan_image,
      created_at: Utc::now(),
    };
    self.scans.lock().unwrap().push(created.clone());
    Ok(created)
  }
}

// ─── Tracker ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn toggle_creates_record_with_only_target_flag() {
  let store = MemStore::default();
  let user = Uuid::new_v4();
  let today = d(2025, 3, 10);

  let outcome =
    tracker::toggle_routine(&store, user, today, RoutineSlot::Morning, today)
      .await
      .unwrap();

  assert!(outcome.log.morning_completed);
  assert!(!outcome.log.evening_completed);
  assert_eq!(outcome.summary.current_streak, 1);
  assert!(outcome.unlocked.is_empty());
}

#[tokio::test]
async fn toggle_flips_only_the_target_flag() {
  let store = MemStore::default();
  let user = Uuid::new_v4();
  let today = d(2025, 3, 10);

  tracker::toggle_routine(&store, user, today, RoutineSlot::Morning, today)
    .await
    .unwrap();
  let outcome =
    tracker::toggle_routine(&store, user, today, RoutineSlot::Evening, today)
      .await
      .unwrap();

  assert!(outcome.log.morning_completed);
  assert!(outcome.log.evening_completed);
}

#[tokio::test]
async fn toggle_off_reverts_a_flag() {
  let store = MemStore::default();
  let user = Uuid::new_v4();
  let today = d(2025, 3, 10);

  tracker::toggle_routine(&store, user, today, RoutineSlot::Morning, today)
    .await
    .unwrap();
  let outcome =
    tracker::toggle_routine(&store, user, today, RoutineSlot::Morning, today)
      .await
      .unwrap();

  assert!(!outcome.log.morning_completed);
  assert_eq!(outcome.summary.current_streak, 0);
}

#[tokio::test]
async fn toggle_rejects_dates_other_than_today() {
  let store = MemStore::default();
  let user = Uuid::new_v4();
  let today = d(2025, 3, 10);

  let err = tracker::toggle_routine(
    &store,
    user,
    d(2025, 3, 9),
    RoutineSlot::Morning,
    today,
  )
  .await
  .unwrap_err();

  assert!(matches!(
    err,
    tracker::TrackerError::Core(crate::Error::DateNotEditable { .. })
  ));
  // Nothing was written.
  assert!(store.logs.lock().unwrap().is_empty());
}

#[tokio::test]
async fn toggle_rejects_nil_user() {
  let store = MemStore::default();
  let today = d(2025, 3, 10);

  let err = tracker::toggle_routine(
    &store,
    Uuid::nil(),
    today,
    RoutineSlot::Morning,
    today,
  )
  .await
  .unwrap_err();

  assert!(matches!(
    err,
    tracker::TrackerError::Core(crate::Error::NilUser)
  ));
}

#[tokio::test]
async fn three_day_streak_unlocks_getting_started() {
  let store = MemStore::default();
  let user = Uuid::new_v4();
  let today = d(2025, 3, 10);

  // Two finished previous days already on record.
  store
    .insert_log(NewRoutineLog {
      user_id:           user,
      date:              d(2025, 3, 9),
      morning_completed: true,
      evening_completed: true,
    })
    .await
    .unwrap();
  store
    .insert_log(NewRoutineLog {
      user_id:           user,
      date:              d(2025, 3, 8),
      morning_completed: true,
      evening_completed: true,
    })
    .await
    .unwrap();

  let outcome =
    tracker::toggle_routine(&store, user, today, RoutineSlot::Morning, today)
      .await
      .unwrap();

  assert_eq!(outcome.summary.current_streak, 3);
  assert_eq!(outcome.unlocked.len(), 1);
  assert_eq!(outcome.unlocked[0].name, "Getting Started");
}

#[tokio::test]
async fn refresh_is_idempotent_for_achievements() {
  let store = MemStore::default();
  let user = Uuid::new_v4();
  let today = d(2025, 3, 10);

  for offset in 0u64..3 {
    let date = today - chrono::Days::new(offset);
    store
      .insert_log(NewRoutineLog {
        user_id:           user,
        date,
        morning_completed: true,
        evening_completed: true,
      })
      .await
      .unwrap();
  }

  let first = tracker::refresh_user(&store, user, today).await.unwrap();
  assert_eq!(first.unlocked.len(), 1);

  let second = tracker::refresh_user(&store, user, today).await.unwrap();
  assert_eq!(second.summary.current_streak, first.summary.current_streak);
  assert!(second.unlocked.is_empty());
  assert_eq!(store.achievement_count(), 1);
}

#[tokio::test]
async fn milestone_failure_does_not_block_other_milestones() {
  let store = MemStore::default();
  let user = Uuid::new_v4();
  let today = d(2025, 3, 10);

  for offset in 0u64..7 {
    let date = today - chrono::Days::new(offset);
    store
      .insert_log(NewRoutineLog {
        user_id:           user,
        date,
        morning_completed: true,
        evening_completed: true,
      })
      .await
      .unwrap();
  }

  store.fail_achievement_named("Getting Started");

  let outcome = tracker::refresh_user(&store, user, today).await.unwrap();
  assert_eq!(outcome.summary.current_streak, 7);
  // The 3-day milestone failed to persist; the 7-day one still landed.
  assert_eq!(outcome.unlocked.len(), 1);
  assert_eq!(outcome.unlocked[0].name, "One Week Wonder");
}

#[tokio::test]
async fn racing_duplicate_unlock_is_not_reported_again() {
  let store = MemStore::default();
  let user = Uuid::new_v4();

  let existing: Vec<Achievement> = Vec::new();
  // Another client persisted the milestone between our read and our write.
  store
    .insert_achievement(achievement::MILESTONES[0].to_new(user))
    .await
    .unwrap();

  let unlocked =
    tracker::unlock_achievements(&store, user, 3, &existing).await;
  assert!(unlocked.is_empty());
  assert_eq!(store.achievement_count(), 1);
}

#[tokio::test]
async fn record_chat_persists_extracted_products() {
  let store = MemStore::default();
  let user = Uuid::new_v4();

  let record = tracker::record_chat(&store, NewChatExchange {
    user_id:  user,
    message:  "What cleanser should I use?".to_owned(),
    response: "**CeraVe Foaming Cleanser** - https://example.com/cerave\n"
      .to_owned(),
  })
  .await
  .unwrap();

  assert_eq!(record.products.len(), 1);
  assert_eq!(record.products[0].name, "CeraVe Foaming Cleanser");
  assert_eq!(record.products[0].chat_id, Some(record.exchange.chat_id));

  let listed = store.list_products(user).await.unwrap();
  assert_eq!(listed.len(), 1);
}
