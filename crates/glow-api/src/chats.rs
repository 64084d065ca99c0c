//! Handlers for chat history and recommended products.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/users/:id/chats` | Newest first |
//! | `POST` | `/users/:id/chats` | Body: [`ChatBody`]; 201 + stored exchange and extracted products |
//! | `GET`  | `/users/:id/products` | Newest first |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use glow_core::{
  chat::{ChatExchange, NewChatExchange, RecommendedProduct},
  store::GlowStore,
  tracker,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ApiError;

/// `GET /users/:id/chats`
pub async fn list<S>(
  State(store): State<Arc<S>>,
  Path(user_id): Path<Uuid>,
) -> Result<Json<Vec<ChatExchange>>, ApiError>
where
  S: GlowStore,
{
  let chats = store
    .list_chats(user_id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(chats))
}

/// JSON body accepted by `POST /users/:id/chats`. The reply text was produced
/// by the external completion service before it reaches this API.
#[derive(Debug, Deserialize)]
pub struct ChatBody {
  pub message:  String,
  pub response: String,
}

#[derive(Debug, Serialize)]
pub struct ChatRecordResponse {
  pub exchange: ChatExchange,
  /// Products mined from the reply and persisted alongside it.
  pub products: Vec<RecommendedProduct>,
}

/// `POST /users/:id/chats` — returns 201 + the stored exchange.
pub async fn create<S>(
  State(store): State<Arc<S>>,
  Path(user_id): Path<Uuid>,
  Json(body): Json<ChatBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: GlowStore,
{
  let record = tracker::record_chat(store.as_ref(), NewChatExchange {
    user_id,
    message: body.message,
    response: body.response,
  })
  .await
  .map_err(ApiError::from_tracker)?;

  Ok((
    StatusCode::CREATED,
    Json(ChatRecordResponse {
      exchange: record.exchange,
      products: record.products,
    }),
  ))
}

/// `GET /users/:id/products`
pub async fn list_products<S>(
  State(store): State<Arc<S>>,
  Path(user_id): Path<Uuid>,
) -> Result<Json<Vec<RecommendedProduct>>, ApiError>
where
  S: GlowStore,
{
  let products = store
    .list_products(user_id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(products))
}
