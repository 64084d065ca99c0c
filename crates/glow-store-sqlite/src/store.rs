//! [`SqliteStore`] — the SQLite implementation of [`GlowStore`].

use std::path::Path;

use chrono::{NaiveDate, Utc};
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use glow_core::{
  achievement::{Achievement, NewAchievement},
  chat::{ChatExchange, NewChatExchange, NewRecommendedProduct, RecommendedProduct},
  profile::{NewProfile, Profile},
  routine::{NewRoutineLog, RoutineLog, RoutineSlot},
  scan::{NewSkinScan, SkinScan},
  store::GlowStore,
};

use crate::{
  encode::{
    RawAchievement, RawChat, RawProduct, RawProfile, RawRoutineLog, RawScan,
    encode_date, encode_dt, encode_icon, encode_time, encode_uuid,
  },
  schema::SCHEMA,
  Error, Result,
};

// ─── Helpers ─────────────────────────────────────────────────────────────────

/// The column a toggle targets.
fn slot_column(slot: RoutineSlot) -> &'static str {
  match slot {
    RoutineSlot::Morning => "morning_completed",
    RoutineSlot::Evening => "evening_completed",
  }
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
  matches!(
    err,
    rusqlite::Error::SqliteFailure(e, _)
      if e.code == rusqlite::ErrorCode::ConstraintViolation
  )
}

fn read_log_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawRoutineLog> {
  Ok(RawRoutineLog {
    log_id:            row.get(0)?,
    user_id:           row.get(1)?,
    date:              row.get(2)?,
    morning_completed: row.get(3)?,
    evening_completed: row.get(4)?,
    created_at:        row.get(5)?,
  })
}

fn read_achievement_row(
  row: &rusqlite::Row<'_>,
) -> rusqlite::Result<RawAchievement> {
  Ok(RawAchievement {
    achievement_id: row.get(0)?,
    user_id:        row.get(1)?,
    name:           row.get(2)?,
    description:    row.get(3)?,
    icon:           row.get(4)?,
    created_at:     row.get(5)?,
  })
}

fn read_profile_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawProfile> {
  Ok(RawProfile {
    user_id:          row.get(0)?,
    full_name:        row.get(1)?,
    avatar_url:       row.get(2)?,
    skin_type:        row.get(3)?,
    skin_tone:        row.get(4)?,
    morning_reminder: row.get(5)?,
    evening_reminder: row.get(6)?,
    physician_name:   row.get(7)?,
    physician_phone:  row.get(8)?,
    created_at:       row.get(9)?,
    updated_at:       row.get(10)?,
  })
}

fn read_chat_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawChat> {
  Ok(RawChat {
    chat_id:    row.get(0)?,
    user_id:    row.get(1)?,
    message:    row.get(2)?,
    response:   row.get(3)?,
    created_at: row.get(4)?,
  })
}

fn read_product_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawProduct> {
  Ok(RawProduct {
    product_id:  row.get(0)?,
    user_id:     row.get(1)?,
    chat_id:     row.get(2)?,
    name:        row.get(3)?,
    description: row.get(4)?,
    link:        row.get(5)?,
    created_at:  row.get(6)?,
  })
}

fn read_scan_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawScan> {
  Ok(RawScan {
    scan_id:        row.get(0)?,
    user_id:        row.get(1)?,
    skin_type:      row.get(2)?,
    skin_tone:      row.get(3)?,
    skin_issues:    row.get(4)?,
    sun_damage:     row.get(5)?,
    unique_feature: row.get(6)?,
    disease:        row.get(7)?,
    disease_change: row.get(8)?,
    scan_image:     row.get(9)?,
    created_at:     row.get(10)?,
  })
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A glow store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── GlowStore impl ──────────────────────────────────────────────────────────

impl GlowStore for SqliteStore {
  type Error = Error;

  // ── Routine logs ──────────────────────────────────────────────────────────

  async fn list_logs(&self, user_id: Uuid) -> Result<Vec<RoutineLog>> {
    let user_str = encode_uuid(user_id);

    let raws: Vec<RawRoutineLog> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT log_id, user_id, date, morning_completed, evening_completed, created_at
           FROM routine_logs WHERE user_id = ?1 ORDER BY date DESC",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![user_str], read_log_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawRoutineLog::into_log).collect()
  }

  async fn get_log(
    &self,
    user_id: Uuid,
    date: NaiveDate,
  ) -> Result<Option<RoutineLog>> {
    let user_str = encode_uuid(user_id);
    let date_str = encode_date(date);

    let raw: Option<RawRoutineLog> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT log_id, user_id, date, morning_completed, evening_completed, created_at
               FROM routine_logs WHERE user_id = ?1 AND date = ?2",
              rusqlite::params![user_str, date_str],
              read_log_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawRoutineLog::into_log).transpose()
  }

  async fn insert_log(&self, input: NewRoutineLog) -> Result<RoutineLog> {
    let log = RoutineLog {
      log_id:            Uuid::new_v4(),
      user_id:           input.user_id,
      date:              input.date,
      morning_completed: input.morning_completed,
      evening_completed: input.evening_completed,
      created_at:        Utc::now(),
    };

    let log_id_str  = encode_uuid(log.log_id);
    let user_str    = encode_uuid(log.user_id);
    let date_str    = encode_date(log.date);
    let morning     = log.morning_completed;
    let evening     = log.evening_completed;
    let created_str = encode_dt(log.created_at);

    let outcome = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO routine_logs
             (log_id, user_id, date, morning_completed, evening_completed, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          rusqlite::params![log_id_str, user_str, date_str, morning, evening, created_str],
        )?;
        Ok(())
      })
      .await;

    match outcome {
      Ok(()) => Ok(log),
      Err(tokio_rusqlite::Error::Rusqlite(e)) if is_unique_violation(&e) => {
        Err(Error::DuplicateLog {
          user_id: log.user_id,
          date:    log.date,
        })
      }
      Err(e) => Err(e.into()),
    }
  }

  async fn set_log_slot(
    &self,
    log_id: Uuid,
    slot: RoutineSlot,
    completed: bool,
  ) -> Result<RoutineLog> {
    let column = slot_column(slot);
    let id_str = encode_uuid(log_id);

    let raw: Option<RawRoutineLog> = self
      .conn
      .call(move |conn| {
        let updated = conn.execute(
          &format!("UPDATE routine_logs SET {column} = ?1 WHERE log_id = ?2"),
          rusqlite::params![completed, id_str],
        )?;
        if updated == 0 {
          return Ok(None);
        }
        let raw = conn.query_row(
          "SELECT log_id, user_id, date, morning_completed, evening_completed, created_at
           FROM routine_logs WHERE log_id = ?1",
          rusqlite::params![id_str],
          read_log_row,
        )?;
        Ok(Some(raw))
      })
      .await?;

    raw.ok_or(Error::LogNotFound(log_id))?.into_log()
  }

  async fn toggle_log_slot(
    &self,
    user_id: Uuid,
    date: NaiveDate,
    slot: RoutineSlot,
  ) -> Result<RoutineLog> {
    let column   = slot_column(slot);
    let user_str = encode_uuid(user_id);
    let date_str = encode_date(date);

    // Values for the lazily created row; unused when the row exists.
    let fresh       = NewRoutineLog::for_slot(user_id, date, slot);
    let log_id_str  = encode_uuid(Uuid::new_v4());
    let morning     = fresh.morning_completed;
    let evening     = fresh.evening_completed;
    let created_str = encode_dt(Utc::now());

    let raw: RawRoutineLog = self
      .conn
      .call(move |conn| {
        // Update-then-insert inside one transaction: the two-call
        // create-or-update race never reaches the database.
        let tx = conn.transaction()?;

        let updated = tx.execute(
          &format!(
            "UPDATE routine_logs SET {column} = NOT {column}
             WHERE user_id = ?1 AND date = ?2"
          ),
          rusqlite::params![user_str, date_str],
        )?;

        if updated == 0 {
          tx.execute(
            "INSERT INTO routine_logs
               (log_id, user_id, date, morning_completed, evening_completed, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            rusqlite::params![log_id_str, user_str, date_str, morning, evening, created_str],
          )?;
        }

        let raw = tx.query_row(
          "SELECT log_id, user_id, date, morning_completed, evening_completed, created_at
           FROM routine_logs WHERE user_id = ?1 AND date = ?2",
          rusqlite::params![user_str, date_str],
          read_log_row,
        )?;

        tx.commit()?;
        Ok(raw)
      })
      .await?;

    raw.into_log()
  }

  // ── Achievements ──────────────────────────────────────────────────────────

  async fn list_achievements(&self, user_id: Uuid) -> Result<Vec<Achievement>> {
    let user_str = encode_uuid(user_id);

    let raws: Vec<RawAchievement> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT achievement_id, user_id, name, description, icon, created_at
           FROM achievements WHERE user_id = ?1 ORDER BY created_at DESC",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![user_str], read_achievement_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws
      .into_iter()
      .map(RawAchievement::into_achievement)
      .collect()
  }

  async fn insert_achievement(
    &self,
    input: NewAchievement,
  ) -> Result<Achievement> {
    let achievement = Achievement {
      achievement_id: Uuid::new_v4(),
      user_id:        input.user_id,
      name:           input.name,
      description:    input.description,
      icon:           input.icon,
      created_at:     Utc::now(),
    };

    let id_str       = encode_uuid(achievement.achievement_id);
    let user_str     = encode_uuid(achievement.user_id);
    let name         = achievement.name.clone();
    let description  = achievement.description.clone();
    let icon_str     = encode_icon(achievement.icon);
    let created_str  = encode_dt(achievement.created_at);

    let outcome = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO achievements
             (achievement_id, user_id, name, description, icon, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          rusqlite::params![id_str, user_str, name, description, icon_str, created_str],
        )?;
        Ok(())
      })
      .await;

    match outcome {
      Ok(()) => Ok(achievement),
      Err(tokio_rusqlite::Error::Rusqlite(e)) if is_unique_violation(&e) => {
        Err(Error::DuplicateAchievement {
          user_id: achievement.user_id,
          name:    achievement.name,
        })
      }
      Err(e) => Err(e.into()),
    }
  }

  // ── Profiles ──────────────────────────────────────────────────────────────

  async fn get_profile(&self, user_id: Uuid) -> Result<Option<Profile>> {
    let user_str = encode_uuid(user_id);

    let raw: Option<RawProfile> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT user_id, full_name, avatar_url, skin_type, skin_tone,
                      morning_reminder, evening_reminder, physician_name,
                      physician_phone, created_at, updated_at
               FROM profiles WHERE user_id = ?1",
              rusqlite::params![user_str],
              read_profile_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawProfile::into_profile).transpose()
  }

  async fn upsert_profile(&self, input: NewProfile) -> Result<Profile> {
    let user_str    = encode_uuid(input.user_id);
    let now_str     = encode_dt(Utc::now());
    let morning_str = input.morning_reminder.map(encode_time);
    let evening_str = input.evening_reminder.map(encode_time);
    let full_name   = input.full_name;
    let avatar_url  = input.avatar_url;
    let skin_type   = input.skin_type;
    let skin_tone   = input.skin_tone;
    let phys_name   = input.physician_name;
    let phys_phone  = input.physician_phone;

    let raw: RawProfile = self
      .conn
      .call(move |conn| {
        // created_at is intentionally absent from the conflict update so the
        // first write's value survives every later upsert.
        conn.execute(
          "INSERT INTO profiles
             (user_id, full_name, avatar_url, skin_type, skin_tone,
              morning_reminder, evening_reminder, physician_name,
              physician_phone, created_at, updated_at)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
           ON CONFLICT(user_id) DO UPDATE SET
             full_name        = excluded.full_name,
             avatar_url       = excluded.avatar_url,
             skin_type        = excluded.skin_type,
             skin_tone        = excluded.skin_tone,
             morning_reminder = excluded.morning_reminder,
             evening_reminder = excluded.evening_reminder,
             physician_name   = excluded.physician_name,
             physician_phone  = excluded.physician_phone,
             updated_at       = excluded.updated_at",
          rusqlite::params![
            user_str,
            full_name,
            avatar_url,
            skin_type,
            skin_tone,
            morning_str,
            evening_str,
            phys_name,
            phys_phone,
            now_str,
            now_str,
          ],
        )?;

        let raw = conn.query_row(
          "SELECT user_id, full_name, avatar_url, skin_type, skin_tone,
                  morning_reminder, evening_reminder, physician_name,
                  physician_phone, created_at, updated_at
           FROM profiles WHERE user_id = ?1",
          rusqlite::params![user_str],
          read_profile_row,
        )?;
        Ok(raw)
      })
      .await?;

    raw.into_profile()
  }

  // ── Chat history ──────────────────────────────────────────────────────────

  async fn list_chats(&self, user_id: Uuid) -> Result<Vec<ChatExchange>> {
    let user_str = encode_uuid(user_id);

    let raws: Vec<RawChat> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT chat_id, user_id, message, response, created_at
           FROM chat_history WHERE user_id = ?1 ORDER BY created_at DESC",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![user_str], read_chat_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawChat::into_chat).collect()
  }

  async fn insert_chat(&self, input: NewChatExchange) -> Result<ChatExchange> {
    let chat = ChatExchange {
      chat_id:    Uuid::new_v4(),
      user_id:    input.user_id,
      message:    input.message,
      response:   input.response,
      created_at: Utc::now(),
    };

    let id_str      = encode_uuid(chat.chat_id);
    let user_str    = encode_uuid(chat.user_id);
    let message     = chat.message.clone();
    let response    = chat.response.clone();
    let created_str = encode_dt(chat.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO chat_history (chat_id, user_id, message, response, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5)",
          rusqlite::params![id_str, user_str, message, response, created_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(chat)
  }

  async fn list_products(
    &self,
    user_id: Uuid,
  ) -> Result<Vec<RecommendedProduct>> {
    let user_str = encode_uuid(user_id);

    let raws: Vec<RawProduct> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT product_id, user_id, chat_id, name, description, link, created_at
           FROM recommended_products WHERE user_id = ?1 ORDER BY created_at DESC",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![user_str], read_product_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawProduct::into_product).collect()
  }

  async fn insert_product(
    &self,
    input: NewRecommendedProduct,
  ) -> Result<RecommendedProduct> {
    let product = RecommendedProduct {
      product_id:  Uuid::new_v4(),
      user_id:     input.user_id,
      chat_id:     input.chat_id,
      name:        input.name,
      description: input.description,
      link:        input.link,
      created_at:  Utc::now(),
    };

    let id_str      = encode_uuid(product.product_id);
    let user_str    = encode_uuid(product.user_id);
    let chat_str    = product.chat_id.map(encode_uuid);
    let name        = product.name.clone();
    let description = product.description.clone();
    let link        = product.link.clone();
    let created_str = encode_dt(product.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO recommended_products
             (product_id, user_id, chat_id, name, description, link, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
          rusqlite::params![id_str, user_str, chat_str, name, description, link, created_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(product)
  }

  // ── Skin scans ────────────────────────────────────────────────────────────

  async fn list_scans(&self, user_id: Uuid) -> Result<Vec<SkinScan>> {
    let user_str = encode_uuid(user_id);

    let raws: Vec<RawScan> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT scan_id, user_id, skin_type, skin_tone, skin_issues, sun_damage,
                  unique_feature, disease, disease_change, scan_image, created_at
           FROM skin_scans WHERE user_id = ?1 ORDER BY created_at DESC",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![user_str], read_scan_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawScan::into_scan).collect()
  }

  async fn insert_scan(&self, input: NewSkinScan) -> Result<SkinScan> {
    let scan = SkinScan {
      scan_id:        Uuid::new_v4(),
      user_id:        input.user_id,
      skin_type:      input.skin_type,
      skin_tone:      input.skin_tone,
      skin_issues:    input.skin_issues,
      sun_damage:     input.sun_damage,
      unique_feature: input.unique_feature,
      disease:        input.disease,
      disease_change: input.disease_change,
      scan_image:     input.scan_image,
      created_at:     Utc::now(),
    };

    let id_str         = encode_uuid(scan.scan_id);
    let user_str       = encode_uuid(scan.user_id);
    let skin_type      = scan.skin_type.clone();
    let skin_tone      = scan.skin_tone.clone();
    let skin_issues    = scan.skin_issues.clone();
    let sun_damage     = scan.sun_damage.clone();
    let unique_feature = scan.unique_feature.clone();
    let disease        = scan.disease.clone();
    let disease_change = scan.disease_change;
    let scan_image     = scan.scan_image.clone();
    let created_str    = encode_dt(scan.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO skin_scans
             (scan_id, user_id, skin_type, skin_tone, skin_issues, sun_damage,
              unique_feature, disease, disease_change, scan_image, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
          rusqlite::params![
            id_str,
            user_str,
            skin_type,
            skin_tone,
            skin_issues,
            sun_damage,
            unique_feature,
            disease,
            disease_change,
            scan_image,
            created_str,
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(scan)
  }
}
