//! Chat history and recommended products.
//!
//! The assistant reply itself is produced by an external completion service;
//! this crate only persists the exchange and mines the reply text for
//! product mentions (see [`crate::products`]). Both tables are append-only.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ─── Chat ────────────────────────────────────────────────────────────────────

/// One persisted prompt/reply pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatExchange {
  pub chat_id:    Uuid,
  pub user_id:    Uuid,
  /// The user's prompt.
  pub message:    String,
  /// The assistant's reply, verbatim.
  pub response:   String,
  pub created_at: DateTime<Utc>,
}

/// Input to [`crate::store::GlowStore::insert_chat`].
#[derive(Debug, Clone)]
pub struct NewChatExchange {
  pub user_id:  Uuid,
  pub message:  String,
  pub response: String,
}

// ─── Recommended products ────────────────────────────────────────────────────

/// A product the assistant recommended, extracted from a reply and persisted
/// with a back-reference to the exchange it came from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendedProduct {
  pub product_id:  Uuid,
  pub user_id:     Uuid,
  /// The exchange this mention was extracted from, when known.
  pub chat_id:     Option<Uuid>,
  pub name:        String,
  pub description: Option<String>,
  pub link:        Option<String>,
  pub created_at:  DateTime<Utc>,
}

/// Input to [`crate::store::GlowStore::insert_product`].
#[derive(Debug, Clone)]
pub struct NewRecommendedProduct {
  pub user_id:     Uuid,
  pub chat_id:     Option<Uuid>,
  pub name:        String,
  pub description: Option<String>,
  pub link:        Option<String>,
}
