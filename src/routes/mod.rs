//! HTTP routes.

use axum::{routing::{get, post, put}, Json, Router};
use serde::Serialize;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::notification::Notification;
use crate::state::AppState;

pub mod admin;
pub mod cart;
pub mod checkout;
pub mod products;
pub mod session;

/// Mutation result: the payload plus the toast to show.
#[derive(Debug, Serialize)]
pub struct Notified<T: Serialize> {
    #[serde(flatten)]
    pub data: T,
    pub notification: Notification,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect: Option<&'static str>,
}

impl<T: Serialize> Notified<T> {
    pub fn new(data: T, notification: Notification) -> Json<Self> { Json(Self { data, notification, redirect: None }) }
    pub fn redirect(data: T, notification: Notification, to: &'static str) -> Json<Self> { Json(Self { data, notification, redirect: Some(to) }) }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { Json(serde_json::json!({"status": "healthy", "service": "shopeasy"})) }))
        .route("/api/session", get(session::summary))
        .route("/api/session/sign-out", post(session::sign_out))
        .route("/api/products", get(products::list))
        .route("/api/products/:id", get(products::detail))
        .route("/api/cart", get(cart::show).delete(cart::clear))
        .route("/api/cart/items", post(cart::add))
        .route("/api/cart/items/:product_id", put(cart::update).delete(cart::remove))
        .route("/api/checkout", post(checkout::submit))
        .route("/api/admin/products", get(admin::list_products).post(admin::create_product))
        .route("/api/admin/orders", get(admin::list_orders))
        .route("/api/admin/orders/:id/status", put(admin::update_order_status))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
