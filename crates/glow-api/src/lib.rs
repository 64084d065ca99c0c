//! JSON REST API for glow.
//!
//! Exposes an axum [`Router`] backed by any [`glow_core::store::GlowStore`].
//! Auth, TLS, and transport concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", glow_api::api_router(store.clone()))
//! ```

pub mod achievements;
pub mod chats;
pub mod error;
pub mod profiles;
pub mod routines;
pub mod scans;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use glow_core::store::GlowStore;

pub use error::ApiError;

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: GlowStore + 'static,
{
  Router::new()
    // Routine calendar
    .route("/users/{user_id}/routines", get(routines::list::<S>))
    .route("/users/{user_id}/routines/toggle", post(routines::toggle::<S>))
    .route("/users/{user_id}/calendar", get(routines::calendar::<S>))
    .route("/users/{user_id}/streak", get(routines::streak::<S>))
    // Achievements
    .route("/users/{user_id}/achievements", get(achievements::list::<S>))
    // Profiles
    .route(
      "/users/{user_id}/profile",
      get(profiles::get_one::<S>).put(profiles::upsert::<S>),
    )
    // Chat history
    .route(
      "/users/{user_id}/chats",
      get(chats::list::<S>).post(chats::create::<S>),
    )
    .route("/users/{user_id}/products", get(chats::list_products::<S>))
    // Skin scans
    .route(
      "/users/{user_id}/scans",
      get(scans::list::<S>).post(scans::create::<S>),
    )
    .with_state(store)
}
