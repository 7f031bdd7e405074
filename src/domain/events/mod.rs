//! Domain events
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use crate::domain::aggregates::OrderStatus;

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DomainEvent {
    Product(ProductEvent),
    Order(OrderEvent),
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProductEvent {
    Created { product_id: Uuid, name: String, stock_quantity: i32 },
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OrderEvent {
    Placed { order_id: Uuid, user_id: Uuid, total: Decimal, item_count: usize },
    StatusChanged { order_id: Uuid, from: OrderStatus, to: OrderStatus },
}

impl DomainEvent {
    /// Message bus subject the event is published on.
    pub fn subject(&self) -> &'static str {
        match self {
            Self::Product(ProductEvent::Created { .. }) => "shopeasy.product.created",
            Self::Order(OrderEvent::Placed { .. }) => "shopeasy.order.placed",
            Self::Order(OrderEvent::StatusChanged { .. }) => "shopeasy.order.status_changed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subjects_and_payload() {
        let event = DomainEvent::Order(OrderEvent::StatusChanged { order_id: Uuid::nil(), from: OrderStatus::Pending, to: OrderStatus::Shipped });
        assert_eq!(event.subject(), "shopeasy.order.status_changed");
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "status_changed");
        assert_eq!(json["to"], "shipped");
    }
}
