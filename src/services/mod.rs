//! Storefront operations used by the route handlers.
pub mod admin;
pub mod catalog;
pub mod checkout;
