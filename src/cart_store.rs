//! Per-session carts.
//!
//! Each browsing session, keyed by the `x-session-id` header, owns one cart
//! behind its own async mutex. Nothing is shared between sessions. Only
//! adding a product creates a cart; idle carts are evicted by [`run_reaper`].

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use chrono::Utc;
use tokio::sync::{Mutex, RwLock};

use crate::domain::aggregates::Cart;
use crate::error::AppError;

pub const SESSION_HEADER: &str = "x-session-id";
const MAX_SESSION_ID_LEN: usize = 128;

pub type SharedCart = Arc<Mutex<Cart>>;

#[derive(Clone, Default)]
pub struct CartSessions { carts: Arc<RwLock<HashMap<String, SharedCart>>> }

impl CartSessions {
    pub fn new() -> Self { Self::default() }

    /// The session's cart, created empty on first use.
    pub async fn cart(&self, session: &SessionId) -> SharedCart {
        if let Some(cart) = self.carts.read().await.get(session.as_str()) {
            return Arc::clone(cart);
        }
        let mut carts = self.carts.write().await;
        Arc::clone(carts.entry(session.as_str().to_string()).or_default())
    }

    /// The session's cart if it has one.
    pub async fn existing(&self, session: &SessionId) -> Option<SharedCart> {
        self.carts.read().await.get(session.as_str()).cloned()
    }

    /// Snapshot of the session's cart without creating one.
    pub async fn snapshot(&self, session: &SessionId) -> Cart {
        let cart = self.carts.read().await.get(session.as_str()).cloned();
        match cart {
            Some(cart) => cart.lock().await.clone(),
            None => Cart::new(),
        }
    }

    /// Forgets the session entirely. Returns whether a cart existed.
    pub async fn end_session(&self, session: &SessionId) -> bool {
        self.carts.write().await.remove(session.as_str()).is_some()
    }

    pub async fn session_count(&self) -> usize { self.carts.read().await.len() }

    /// Drops carts untouched for longer than `max_idle`. Carts locked by an
    /// in-flight request are kept. Returns how many were dropped.
    pub async fn evict_idle(&self, max_idle: Duration) -> usize {
        let Ok(max_idle) = chrono::Duration::from_std(max_idle) else { return 0 };
        let cutoff = Utc::now() - max_idle;
        let mut carts = self.carts.write().await;
        let before = carts.len();
        carts.retain(|_, cart| cart.try_lock().map_or(true, |cart| cart.updated_at() > cutoff));
        before - carts.len()
    }
}

/// Periodically evicts idle carts. Runs until the task is dropped.
pub async fn run_reaper(sessions: CartSessions, max_idle: Duration) {
    let mut tick = tokio::time::interval((max_idle / 4).max(Duration::from_secs(1)));
    loop {
        tick.tick().await;
        let evicted = sessions.evict_idle(max_idle).await;
        if evicted > 0 {
            let remaining = sessions.session_count().await;
            tracing::info!(evicted, remaining, "evicted idle carts");
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SessionId(String);

impl SessionId {
    pub fn parse(raw: &str) -> Result<Self, AppError> {
        let raw = raw.trim();
        if raw.is_empty() || raw.len() > MAX_SESSION_ID_LEN || !raw.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_') {
            return Err(AppError::Validation("Invalid session id".into()));
        }
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str { &self.0 }
}

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for SessionId {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let raw = parts.headers.get(SESSION_HEADER).and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::Validation("Missing session id".into()))?;
        Self::parse(raw)
    }
}
