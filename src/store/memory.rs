//! In-memory data service.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{DataService, StoreError};
use crate::domain::aggregates::{NewOrder, NewProduct, Order, OrderItem, OrderItemView, OrderStatus, OrderWithItems, Product};

#[derive(Default)]
struct Tables {
    products: Vec<Product>,
    orders: Vec<Order>,
    order_items: Vec<OrderItem>,
}

#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
    unavailable: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self { Self::default() }

    /// While set, every call fails as if the backend were unreachable.
    pub fn set_unavailable(&self, unavailable: bool) { self.unavailable.store(unavailable, Ordering::SeqCst); }

    pub async fn order_count(&self) -> usize { self.tables.read().await.orders.len() }
    pub async fn order_item_count(&self) -> usize { self.tables.read().await.order_items.len() }

    fn check(&self) -> Result<(), StoreError> {
        if self.unavailable.load(Ordering::SeqCst) { return Err(StoreError::Unavailable("memory store offline".into())); }
        Ok(())
    }
}

fn newest_first<T>(rows: &mut [T], created_at: impl Fn(&T) -> chrono::DateTime<chrono::Utc>) {
    rows.sort_by_key(|r| std::cmp::Reverse(created_at(r)));
}

#[async_trait]
impl DataService for MemoryStore {
    async fn list_products(&self) -> Result<Vec<Product>, StoreError> {
        self.check()?;
        let mut products = self.tables.read().await.products.clone();
        newest_first(&mut products, |p| p.created_at);
        Ok(products)
    }

    async fn get_product(&self, id: Uuid) -> Result<Option<Product>, StoreError> {
        self.check()?;
        Ok(self.tables.read().await.products.iter().find(|p| p.id == id).cloned())
    }

    async fn insert_product(&self, product: NewProduct) -> Result<Product, StoreError> {
        self.check()?;
        let product = product.into_product();
        self.tables.write().await.products.push(product.clone());
        Ok(product)
    }

    async fn place_order(&self, order: NewOrder) -> Result<Order, StoreError> {
        self.check()?;
        let (order, items) = order.into_records();
        let mut tables = self.tables.write().await;
        tables.orders.push(order.clone());
        tables.order_items.extend(items);
        Ok(order)
    }

    async fn get_order(&self, id: Uuid) -> Result<Option<Order>, StoreError> {
        self.check()?;
        Ok(self.tables.read().await.orders.iter().find(|o| o.id == id).cloned())
    }

    async fn list_orders(&self) -> Result<Vec<OrderWithItems>, StoreError> {
        self.check()?;
        let tables = self.tables.read().await;
        let mut orders = tables.orders.clone();
        newest_first(&mut orders, |o| o.created_at);
        Ok(orders.into_iter().map(|order| {
            let items = tables.order_items.iter().filter(|i| i.order_id == order.id).map(|i| OrderItemView {
                id: i.id,
                order_id: i.order_id,
                product_id: i.product_id,
                product_name: tables.products.iter().find(|p| p.id == i.product_id).map(|p| p.name.clone()),
                quantity: i.quantity,
                price: i.price,
            }).collect();
            OrderWithItems { order, items }
        }).collect())
    }

    async fn update_order_status(&self, id: Uuid, status: OrderStatus) -> Result<Option<Order>, StoreError> {
        self.check()?;
        let mut tables = self.tables.write().await;
        Ok(tables.orders.iter_mut().find(|o| o.id == id).map(|o| { o.status = status; o.clone() }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use crate::domain::aggregates::NewOrderItem;

    fn new_product(name: &str) -> NewProduct {
        NewProduct { name: name.into(), description: None, price: Decimal::new(500, 2), image_url: None, stock_quantity: 3, category: "Misc".into() }
    }

    #[tokio::test]
    async fn test_products_newest_first() {
        let store = MemoryStore::new();
        let first = store.insert_product(new_product("first")).await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(2)).await;
        let second = store.insert_product(new_product("second")).await.unwrap();
        let listed = store.list_products().await.unwrap();
        assert_eq!(listed.iter().map(|p| p.id).collect::<Vec<_>>(), vec![second.id, first.id]);
        assert_eq!(store.get_product(first.id).await.unwrap(), Some(first));
        assert_eq!(store.get_product(Uuid::new_v4()).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_orders_join_product_names() {
        let store = MemoryStore::new();
        let product = store.insert_product(new_product("Lamp")).await.unwrap();
        let order = store.place_order(NewOrder {
            user_id: Uuid::new_v4(), total_amount: Decimal::new(10, 0), shipping_address: "a".into(),
            items: vec![NewOrderItem { product_id: product.id, quantity: 2, price: Decimal::new(5, 0) }],
        }).await.unwrap();
        let orders = store.list_orders().await.unwrap();
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].order.id, order.id);
        assert_eq!(orders[0].items[0].product_name.as_deref(), Some("Lamp"));
        assert_eq!(orders[0].items[0].line_total(), Decimal::new(10, 0));

        let updated = store.update_order_status(order.id, OrderStatus::Shipped).await.unwrap().unwrap();
        assert_eq!(updated.status, OrderStatus::Shipped);
        assert!(store.update_order_status(Uuid::new_v4(), OrderStatus::Shipped).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_unavailable_store_writes_nothing() {
        let store = MemoryStore::new();
        store.set_unavailable(true);
        assert!(store.list_products().await.is_err());
        let result = store.place_order(NewOrder { user_id: Uuid::new_v4(), total_amount: Decimal::ONE, shipping_address: "a".into(), items: vec![] }).await;
        assert!(matches!(result, Err(StoreError::Unavailable(_))));
        store.set_unavailable(false);
        assert_eq!(store.order_count().await, 0);
        assert_eq!(store.order_item_count().await, 0);
    }
}
