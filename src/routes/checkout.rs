use axum::{extract::State, Json};
use serde::Serialize;

use super::Notified;
use crate::auth::CurrentUser;
use crate::cart_store::SessionId;
use crate::domain::aggregates::{Order, OrderError};
use crate::domain::value_objects::ShippingAddress;
use crate::error::Result;
use crate::notification::Notification;
use crate::services::checkout;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct OrderPlaced { pub order: Order }

/// Places a cash-on-delivery order for the session's cart.
#[tracing::instrument(skip(state, user, address), fields(user_id = %user.id))]
pub async fn submit(State(state): State<AppState>, user: CurrentUser, session: SessionId, Json(address): Json<ShippingAddress>) -> Result<Json<Notified<OrderPlaced>>> {
    let cart = state.carts.existing(&session).await.ok_or(OrderError::NoItems)?;
    let order = checkout::place_order(state.data.as_ref(), &state.events, &cart, &user, &address).await?;
    Ok(Notified::redirect(
        OrderPlaced { order },
        Notification::success("Order placed successfully!", "Your order has been placed and will be delivered with cash on delivery."),
        "/",
    ))
}
