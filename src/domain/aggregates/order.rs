//! Order Aggregate

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::domain::aggregates::cart::Cart;
use crate::domain::value_objects::ShippingAddress;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Order {
    pub id: Uuid,
    pub user_id: Uuid,
    pub total_amount: Decimal,
    pub shipping_address: String,
    #[sqlx(try_from = "String")]
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct OrderItem { pub id: Uuid, pub order_id: Uuid, pub product_id: Uuid, pub quantity: i32, pub price: Decimal }

/// Order item joined with the product's name for admin listings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct OrderItemView {
    pub id: Uuid,
    pub order_id: Uuid,
    pub product_id: Uuid,
    pub product_name: Option<String>,
    pub quantity: i32,
    pub price: Decimal,
}

impl OrderItemView {
    pub fn line_total(&self) -> Decimal { self.price * Decimal::from(self.quantity) }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OrderWithItems {
    #[serde(flatten)]
    pub order: Order,
    pub items: Vec<OrderItemView>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus { #[default] Pending, Confirmed, Shipped, Delivered, Cancelled }

impl OrderStatus {
    pub const ALL: [OrderStatus; 5] = [Self::Pending, Self::Confirmed, Self::Shipped, Self::Delivered, Self::Cancelled];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Shipped => "shipped",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

impl FromStr for OrderStatus {
    type Err = OrderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL.into_iter().find(|status| status.as_str() == s.trim()).ok_or_else(|| OrderError::InvalidStatus(s.to_string()))
    }
}

impl TryFrom<String> for OrderStatus {
    type Error = OrderError;
    fn try_from(value: String) -> Result<Self, Self::Error> { value.parse() }
}

impl Order {
    /// Applies a status change. Returns `false` when the order already had it.
    pub fn set_status(&mut self, status: OrderStatus) -> bool {
        if self.status == status { return false; }
        self.status = status;
        true
    }

    /// Short reference shown to admins, e.g. `#0190a1b2`.
    pub fn reference(&self) -> String {
        let simple = self.id.simple().to_string();
        format!("#{}", &simple[..8])
    }
}

/// Order insert: the order row plus one item per cart line.
#[derive(Clone, Debug, PartialEq)]
pub struct NewOrder {
    pub user_id: Uuid,
    pub total_amount: Decimal,
    pub shipping_address: String,
    pub items: Vec<NewOrderItem>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NewOrderItem { pub product_id: Uuid, pub quantity: i32, pub price: Decimal }

impl NewOrder {
    /// Snapshots the cart into a pending order.
    pub fn from_cart(user_id: Uuid, cart: &Cart, address: &ShippingAddress) -> Result<Self, OrderError> {
        if cart.is_empty() { return Err(OrderError::NoItems); }
        let items = cart.items().iter().map(|line| {
            let quantity = i32::try_from(line.quantity).map_err(|_| OrderError::QuantityOutOfRange(line.product_id))?;
            Ok(NewOrderItem { product_id: line.product_id, quantity, price: line.price })
        }).collect::<Result<Vec<_>, OrderError>>()?;
        Ok(Self { user_id, total_amount: cart.total_price(), shipping_address: address.to_free_text(), items })
    }

    pub fn into_records(self) -> (Order, Vec<OrderItem>) {
        let order = Order {
            id: Uuid::now_v7(),
            user_id: self.user_id,
            total_amount: self.total_amount,
            shipping_address: self.shipping_address,
            status: OrderStatus::Pending,
            created_at: Utc::now(),
        };
        let items = self.items.into_iter().map(|i| OrderItem {
            id: Uuid::now_v7(), order_id: order.id, product_id: i.product_id, quantity: i.quantity, price: i.price,
        }).collect();
        (order, items)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OrderError {
    #[error("Order has no items")]
    NoItems,
    #[error("Invalid order status: {0}")]
    InvalidStatus(String),
    #[error("Quantity out of range for product {0}")]
    QuantityOutOfRange(Uuid),
}
