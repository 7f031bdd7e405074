//! Admin product and order management.

use uuid::Uuid;
use validator::Validate;

use crate::domain::aggregates::{NewProduct, Order, OrderStatus, OrderWithItems, Product, ProductForm};
use crate::domain::events::{DomainEvent, OrderEvent, ProductEvent};
use crate::error::{AppError, Result};
use crate::events::EventPublisher;
use crate::store::DataService;

pub async fn list_products(data: &dyn DataService) -> Result<Vec<Product>> {
    data.list_products().await.map_err(AppError::service("Failed to load products"))
}

pub async fn list_orders(data: &dyn DataService) -> Result<Vec<OrderWithItems>> {
    data.list_orders().await.map_err(AppError::service("Failed to load orders"))
}

/// Validates and coerces the form, then inserts the product.
pub async fn create_product(data: &dyn DataService, events: &EventPublisher, form: ProductForm) -> Result<Product> {
    form.validate()?;
    let new_product = NewProduct::try_from(form)?;
    let product = data.insert_product(new_product).await.map_err(AppError::service("Failed to add product"))?;
    tracing::info!(product_id = %product.id, name = %product.name, "product created");
    events.publish(DomainEvent::Product(ProductEvent::Created {
        product_id: product.id, name: product.name.clone(), stock_quantity: product.stock_quantity,
    })).await;
    Ok(product)
}

#[derive(Debug, Clone)]
pub struct StatusUpdate {
    pub order: Order,
    pub changed: bool,
}

/// Sets an order's status. Asking for the status it already has writes nothing.
pub async fn update_order_status(data: &dyn DataService, events: &EventPublisher, order_id: Uuid, status: OrderStatus) -> Result<StatusUpdate> {
    const FAILED: &str = "Failed to update order status";
    let mut order = data.get_order(order_id).await
        .map_err(AppError::service(FAILED))?
        .ok_or_else(|| AppError::NotFound("Order not found".into()))?;
    let previous = order.status;
    if !order.set_status(status) {
        tracing::debug!(order_id = %order_id, status = %status, "status unchanged");
        return Ok(StatusUpdate { order, changed: false });
    }
    let order = data.update_order_status(order_id, status).await
        .map_err(AppError::service(FAILED))?
        .ok_or_else(|| AppError::NotFound("Order not found".into()))?;
    tracing::info!(order_id = %order_id, from = %previous, to = %status, "order status updated");
    events.publish(DomainEvent::Order(OrderEvent::StatusChanged { order_id, from: previous, to: status })).await;
    Ok(StatusUpdate { order, changed: true })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::aggregates::{NewOrder, NewOrderItem};
    use crate::store::MemoryStore;
    use rust_decimal::Decimal;

    fn form(price: &str, stock: &str) -> ProductForm {
        ProductForm {
            name: "Desk Lamp".into(), description: "Warm light".into(), price: price.into(),
            image_url: String::new(), stock_quantity: stock.into(), category: "Home".into(),
        }
    }

    async fn pending_order(store: &MemoryStore) -> Order {
        store.place_order(NewOrder {
            user_id: Uuid::new_v4(), total_amount: Decimal::new(12, 0), shipping_address: "x".into(),
            items: vec![NewOrderItem { product_id: Uuid::new_v4(), quantity: 1, price: Decimal::new(12, 0) }],
        }).await.unwrap()
    }

    #[tokio::test]
    async fn test_create_product() {
        let store = MemoryStore::new();
        let product = create_product(&store, &EventPublisher::disabled(), form("24.50", "7")).await.unwrap();
        assert_eq!(product.price, Decimal::new(2450, 2));
        assert_eq!(product.stock_quantity, 7);
        assert_eq!(product.image_url, None);
        assert_eq!(list_products(&store).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_create_product_rejects_bad_input() {
        let store = MemoryStore::new();
        let events = EventPublisher::disabled();
        assert!(matches!(create_product(&store, &events, form("free", "7")).await, Err(AppError::Validation(_))));
        assert!(matches!(create_product(&store, &events, form("1", "")).await, Err(AppError::Validation(_))));
        assert!(list_products(&store).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_status_update_and_noop() {
        let store = MemoryStore::new();
        let events = EventPublisher::disabled();
        let order = pending_order(&store).await;

        let update = update_order_status(&store, &events, order.id, OrderStatus::Shipped).await.unwrap();
        assert!(update.changed);
        assert_eq!(update.order.status, OrderStatus::Shipped);

        let again = update_order_status(&store, &events, order.id, OrderStatus::Shipped).await.unwrap();
        assert!(!again.changed);
        assert_eq!(again.order.status, OrderStatus::Shipped);
    }

    #[tokio::test]
    async fn test_status_update_unknown_order() {
        let store = MemoryStore::new();
        let err = update_order_status(&store, &EventPublisher::disabled(), Uuid::new_v4(), OrderStatus::Confirmed).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
