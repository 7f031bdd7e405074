//! Cash-on-delivery checkout.

use validator::Validate;

use crate::auth::CurrentUser;
use crate::cart_store::SharedCart;
use crate::domain::aggregates::{NewOrder, Order};
use crate::domain::events::{DomainEvent, OrderEvent};
use crate::domain::value_objects::ShippingAddress;
use crate::error::{AppError, Result};
use crate::events::EventPublisher;
use crate::store::DataService;

pub const ORDER_FAILED: &str = "Failed to place order. Please try again.";

/// Places an order for the session's cart.
///
/// The cart lock is held until the order is written, so a second submission
/// for the same session waits and then finds the cart empty. The cart is
/// cleared only after the order and its items are stored; any failure leaves
/// it untouched.
#[tracing::instrument(skip_all, fields(user_id = %user.id))]
pub async fn place_order(
    data: &dyn DataService,
    events: &EventPublisher,
    cart: &SharedCart,
    user: &CurrentUser,
    address: &ShippingAddress,
) -> Result<Order> {
    let mut cart = cart.lock().await;
    let new_order = NewOrder::from_cart(user.id, &cart, address)?;
    address.validate()?;

    let item_count = new_order.items.len();
    let order = data.place_order(new_order).await.map_err(AppError::service(ORDER_FAILED))?;
    cart.clear();
    drop(cart);

    tracing::info!(order_id = %order.id, total = %order.total_amount, item_count, "order placed");
    events.publish(DomainEvent::Order(OrderEvent::Placed {
        order_id: order.id, user_id: order.user_id, total: order.total_amount, item_count,
    })).await;
    Ok(order)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::aggregates::{Cart, CartItem, OrderStatus};
    use crate::store::MemoryStore;
    use rust_decimal::Decimal;
    use std::sync::Arc;
    use tokio::sync::Mutex;
    use uuid::Uuid;

    fn user() -> CurrentUser { CurrentUser { id: Uuid::new_v4(), email: Some("shopper@example.com".into()), is_admin: false } }

    fn address() -> ShippingAddress {
        ShippingAddress {
            full_name: "Grace Hopper".into(), phone: "555-0199".into(), street: "9 Navy Way".into(),
            city: "Arlington".into(), state: "VA".into(), zip_code: "22202".into(),
        }
    }

    fn filled_cart() -> SharedCart {
        let mut cart = Cart::new();
        cart.add_item(CartItem { product_id: Uuid::new_v4(), name: "A".into(), price: Decimal::new(1000, 2), image_url: None, quantity: 2 });
        cart.add_item(CartItem { product_id: Uuid::new_v4(), name: "B".into(), price: Decimal::new(550, 2), image_url: None, quantity: 1 });
        Arc::new(Mutex::new(cart))
    }

    #[tokio::test]
    async fn test_successful_checkout_clears_cart() {
        let store = MemoryStore::new();
        let cart = filled_cart();
        let order = place_order(&store, &EventPublisher::disabled(), &cart, &user(), &address()).await.unwrap();
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.total_amount, Decimal::new(2550, 2));
        assert_eq!(order.shipping_address, "Grace Hopper, 555-0199, 9 Navy Way, Arlington, VA 22202");
        assert!(cart.lock().await.is_empty());
        assert_eq!(store.order_count().await, 1);
        assert_eq!(store.order_item_count().await, 2);
    }

    #[tokio::test]
    async fn test_empty_cart_rejected() {
        let store = MemoryStore::new();
        let cart: SharedCart = Arc::new(Mutex::new(Cart::new()));
        let err = place_order(&store, &EventPublisher::disabled(), &cart, &user(), &address()).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(store.order_count().await, 0);
    }

    #[tokio::test]
    async fn test_missing_address_field_rejected() {
        let store = MemoryStore::new();
        let cart = filled_cart();
        let incomplete = ShippingAddress { zip_code: String::new(), ..address() };
        let err = place_order(&store, &EventPublisher::disabled(), &cart, &user(), &incomplete).await.unwrap_err();
        assert_eq!(err.public_message(), "Missing required fields: zip_code");
        assert_eq!(cart.lock().await.line_count(), 2);
    }

    #[tokio::test]
    async fn test_store_failure_keeps_cart() {
        let store = MemoryStore::new();
        store.set_unavailable(true);
        let cart = filled_cart();
        let err = place_order(&store, &EventPublisher::disabled(), &cart, &user(), &address()).await.unwrap_err();
        assert_eq!(err.public_message(), ORDER_FAILED);
        assert_eq!(cart.lock().await.total_items(), 3);
        store.set_unavailable(false);
        assert_eq!(store.order_count().await, 0);
    }

    #[tokio::test]
    async fn test_double_submit_creates_one_order() {
        let store = Arc::new(MemoryStore::new());
        let cart = filled_cart();
        let (u, a, events) = (user(), address(), EventPublisher::disabled());
        let (first, second) = tokio::join!(
            place_order(store.as_ref(), &events, &cart, &u, &a),
            place_order(store.as_ref(), &events, &cart, &u, &a),
        );
        assert_eq!(first.is_ok() as u8 + second.is_ok() as u8, 1);
        assert_eq!(store.order_count().await, 1);
    }
}
