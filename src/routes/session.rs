//! Navigation summary and sign-out.

use axum::{extract::State, Json};
use serde::Serialize;
use uuid::Uuid;

use super::Notified;
use crate::auth::MaybeUser;
use crate::cart_store::SessionId;
use crate::error::Result;
use crate::notification::Notification;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct SessionUser { pub id: Uuid, pub email: Option<String> }

#[derive(Debug, Serialize)]
pub struct SessionSummary {
    pub user: Option<SessionUser>,
    pub is_admin: bool,
    /// Cart badge count.
    pub cart_items: u64,
}

pub async fn summary(State(state): State<AppState>, MaybeUser(user): MaybeUser, session: SessionId) -> Result<Json<SessionSummary>> {
    let cart_items = state.carts.snapshot(&session).await.total_items();
    let is_admin = user.as_ref().is_some_and(|u| u.is_admin);
    Ok(Json(SessionSummary { user: user.map(|u| SessionUser { id: u.id, email: u.email }), is_admin, cart_items }))
}

#[derive(Debug, Serialize)]
pub struct SignedOut { pub signed_out: bool }

/// Ends the browsing session; its cart goes with it.
#[tracing::instrument(skip(state, user))]
pub async fn sign_out(State(state): State<AppState>, MaybeUser(user): MaybeUser, session: SessionId) -> Result<Json<Notified<SignedOut>>> {
    let had_cart = state.carts.end_session(&session).await;
    tracing::info!(user_id = ?user.map(|u| u.id), had_cart, "signed out");
    Ok(Notified::redirect(SignedOut { signed_out: true }, Notification::success("Signed out", "You have been signed out."), "/"))
}
