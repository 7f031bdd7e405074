//! Cart route handlers. One cart per browsing session.

use axum::{extract::{Path, State}, Json};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::Notified;
use crate::cart_store::SessionId;
use crate::domain::aggregates::{Cart, CartError, CartItem};
use crate::domain::value_objects::Money;
use crate::error::Result;
use crate::notification::Notification;
use crate::services::catalog;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct CartLineView {
    #[serde(flatten)]
    pub item: CartItem,
    pub line_total: Decimal,
}

/// Cart display data. Shipping is always free.
#[derive(Debug, Serialize)]
pub struct CartView {
    pub items: Vec<CartLineView>,
    pub total_items: u64,
    pub total_price: Decimal,
    pub subtotal: String,
    pub shipping: &'static str,
    pub total: String,
}

impl CartView {
    pub fn new(cart: &Cart, currency: &str) -> Self {
        let total = Money::new(cart.total_price(), currency).to_string();
        Self {
            items: cart.items().iter().map(|item| CartLineView { line_total: item.line_total(), item: item.clone() }).collect(),
            total_items: cart.total_items(),
            total_price: cart.total_price(),
            subtotal: total.clone(),
            shipping: "Free",
            total,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CartResponse { pub cart: CartView }

#[derive(Debug, Deserialize, Validate)]
pub struct AddToCartRequest {
    pub product_id: Uuid,
    #[validate(range(min = 1))]
    pub quantity: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateQuantityRequest { pub quantity: i64 }

pub async fn show(State(state): State<AppState>, session: SessionId) -> Result<Json<CartResponse>> {
    let cart = state.carts.snapshot(&session).await;
    Ok(Json(CartResponse { cart: CartView::new(&cart, state.currency()) }))
}

#[tracing::instrument(skip(state))]
pub async fn add(State(state): State<AppState>, session: SessionId, Json(req): Json<AddToCartRequest>) -> Result<Json<Notified<CartResponse>>> {
    req.validate()?;
    let shared = state.carts.cart(&session).await;
    let (cart, added) = catalog::add_to_cart(state.data.as_ref(), &shared, req.product_id, req.quantity).await?;
    let name = cart.items().iter().find(|i| i.product_id == req.product_id).map(|i| i.name.clone()).unwrap_or_default();
    let description = if req.quantity.is_some() {
        format!("{added} {name}(s) added to your cart.")
    } else {
        format!("{name} has been added to your cart.")
    };
    Ok(Notified::new(CartResponse { cart: CartView::new(&cart, state.currency()) }, Notification::success("Added to cart", description)))
}

/// Quantity at or below zero removes the line.
#[tracing::instrument(skip(state))]
pub async fn update(State(state): State<AppState>, session: SessionId, Path(product_id): Path<Uuid>, Json(req): Json<UpdateQuantityRequest>) -> Result<Json<CartResponse>> {
    let shared = state.carts.existing(&session).await.ok_or(CartError::ItemNotFound)?;
    let mut cart = shared.lock().await;
    cart.update_quantity(product_id, req.quantity)?;
    Ok(Json(CartResponse { cart: CartView::new(&cart, state.currency()) }))
}

#[tracing::instrument(skip(state))]
pub async fn remove(State(state): State<AppState>, session: SessionId, Path(product_id): Path<Uuid>) -> Result<Json<CartResponse>> {
    let shared = state.carts.existing(&session).await.ok_or(CartError::ItemNotFound)?;
    let mut cart = shared.lock().await;
    cart.remove_item(product_id)?;
    Ok(Json(CartResponse { cart: CartView::new(&cart, state.currency()) }))
}

#[tracing::instrument(skip(state))]
pub async fn clear(State(state): State<AppState>, session: SessionId) -> Result<Json<CartResponse>> {
    let Some(shared) = state.carts.existing(&session).await else {
        return Ok(Json(CartResponse { cart: CartView::new(&Cart::new(), state.currency()) }));
    };
    let mut cart = shared.lock().await;
    cart.clear();
    Ok(Json(CartResponse { cart: CartView::new(&cart, state.currency()) }))
}
