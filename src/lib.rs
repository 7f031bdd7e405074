//! ShopEasy storefront service
//!
//! Storefront backend with a per-session cart and cash-on-delivery checkout.
//!
//! ## Features
//! - Product catalog and product detail
//! - Per-session shopping cart
//! - Checkout with atomic order placement
//! - Admin product creation and order status management
//! - Optional domain events over NATS

pub mod auth;
pub mod cart_store;
pub mod config;
pub mod domain;
pub mod error;
pub mod events;
pub mod notification;
pub mod routes;
pub mod services;
pub mod state;
pub mod store;

pub use config::Config;
pub use error::{AppError, Result};
pub use routes::router;
pub use state::AppState;
