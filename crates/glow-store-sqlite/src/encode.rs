//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings, calendar dates as `YYYY-MM-DD`,
//! reminder times as `HH:MM`. UUIDs are stored as hyphenated lowercase
//! strings; the completion flags are SQLite integers.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use glow_core::{
  achievement::{Achievement, AchievementIcon},
  chat::{ChatExchange, RecommendedProduct},
  profile::Profile,
  routine::RoutineLog,
  scan::SkinScan,
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::Decode(e.to_string()))
}

// ─── NaiveDate ───────────────────────────────────────────────────────────────

pub fn encode_date(d: NaiveDate) -> String { d.format("%Y-%m-%d").to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, "%Y-%m-%d")
    .map_err(|e| Error::Decode(e.to_string()))
}

// ─── NaiveTime ───────────────────────────────────────────────────────────────

pub fn encode_time(t: NaiveTime) -> String { t.format("%H:%M").to_string() }

pub fn decode_time(s: &str) -> Result<NaiveTime> {
  NaiveTime::parse_from_str(s, "%H:%M")
    .map_err(|e| Error::Decode(e.to_string()))
}

// ─── AchievementIcon ─────────────────────────────────────────────────────────

pub fn encode_icon(icon: AchievementIcon) -> String { icon.to_string() }

pub fn decode_icon(s: &str) -> Result<AchievementIcon> {
  s.parse()
    .map_err(|_| Error::Decode(format!("unknown achievement icon: {s:?}")))
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw values read directly from a `routine_logs` row.
pub struct RawRoutineLog {
  pub log_id:            String,
  pub user_id:           String,
  pub date:              String,
  pub morning_completed: bool,
  pub evening_completed: bool,
  pub created_at:        String,
}

impl RawRoutineLog {
  pub fn into_log(self) -> Result<RoutineLog> {
    Ok(RoutineLog {
      log_id:            decode_uuid(&self.log_id)?,
      user_id:           decode_uuid(&self.user_id)?,
      date:              decode_date(&self.date)?,
      morning_completed: self.morning_completed,
      evening_completed: self.evening_completed,
      created_at:        decode_dt(&self.created_at)?,
    })
  }
}

/// Raw values read directly from an `achievements` row.
pub struct RawAchievement {
  pub achievement_id: String,
  pub user_id:        String,
  pub name:           String,
  pub description:    String,
  pub icon:           String,
  pub created_at:     String,
}

impl RawAchievement {
  pub fn into_achievement(self) -> Result<Achievement> {
    Ok(Achievement {
      achievement_id: decode_uuid(&self.achievement_id)?,
      user_id:        decode_uuid(&self.user_id)?,
      name:           self.name,
      description:    self.description,
      icon:           decode_icon(&self.icon)?,
      created_at:     decode_dt(&self.created_at)?,
    })
  }
}

/// Raw values read directly from a `profiles` row.
pub struct RawProfile {
  pub user_id:          String,
  pub full_name:        Option<String>,
  pub avatar_url:       Option<String>,
  pub skin_type:        Option<String>,
  pub skin_tone:        Option<String>,
  pub morning_reminder: Option<String>,
  pub evening_reminder: Option<String>,
  pub physician_name:   Option<String>,
  pub physician_phone:  Option<String>,
  pub created_at:       String,
  pub updated_at:       String,
}

impl RawProfile {
  pub fn into_profile(self) -> Result<Profile> {
    Ok(Profile {
      user_id:          decode_uuid(&self.user_id)?,
      full_name:        self.full_name,
      avatar_url:       self.avatar_url,
      skin_type:        self.skin_type,
      skin_tone:        self.skin_tone,
      morning_reminder: self
        .morning_reminder
        .as_deref()
        .map(decode_time)
        .transpose()?,
      evening_reminder: self
        .evening_reminder
        .as_deref()
        .map(decode_time)
        .transpose()?,
      physician_name:   self.physician_name,
      physician_phone:  self.physician_phone,
      created_at:       decode_dt(&self.created_at)?,
      updated_at:       decode_dt(&self.updated_at)?,
    })
  }
}

/// Raw values read directly from a `chat_history` row.
pub struct RawChat {
  pub chat_id:    String,
  pub user_id:    String,
  pub message:    String,
  pub response:   String,
  pub created_at: String,
}

impl RawChat {
  pub fn into_chat(self) -> Result<ChatExchange> {
    Ok(ChatExchange {
      chat_id:    decode_uuid(&self.chat_id)?,
      user_id:    decode_uuid(&self.user_id)?,
      message:    self.message,
      response:   self.response,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}

/// Raw values read directly from a `recommended_products` row.
pub struct RawProduct {
  pub product_id:  String,
  pub user_id:     String,
  pub chat_id:     Option<String>,
  pub name:        String,
  pub description: Option<String>,
  pub link:        Option<String>,
  pub created_at:  String,
}

impl RawProduct {
  pub fn into_product(self) -> Result<RecommendedProduct> {
    Ok(RecommendedProduct {
      product_id:  decode_uuid(&self.product_id)?,
      user_id:     decode_uuid(&self.user_id)?,
      chat_id:     self.chat_id.as_deref().map(decode_uuid).transpose()?,
      name:        self.name,
      description: self.description,
      link:        self.link,
      created_at:  decode_dt(&self.created_at)?,
    })
  }
}

/// Raw values read directly from a `skin_scans` row.
pub struct RawScan {
  pub scan_id:        String,
  pub user_id:        String,
  pub skin_type:      Option<String>,
  pub skin_tone:      Option<String>,
  pub skin_issues:    Option<String>,
  pub sun_damage:     Option<String>,
  pub unique_feature: Option<String>,
  pub disease:        Option<String>,
  pub disease_change: bool,
  pub scan_image:     Option<String>,
  pub created_at:     String,
}

impl RawScan {
  pub fn into_scan(self) -> Result<SkinScan> {
    Ok(SkinScan {
      scan_id:        decode_uuid(&self.scan_id)?,
      user_id:        decode_uuid(&self.user_id)?,
      skin_type:      self.skin_type,
      skin_tone:      self.skin_tone,
      skin_issues:    self.skin_issues,
      sun_damage:     self.sun_damage,
      unique_feature: self.unique_feature,
      disease:        self.disease,
      disease_change: self.disease_change,
      scan_image:     self.scan_image,
      created_at:     decode_dt(&self.created_at)?,
    })
  }
}
