//! Data service seam: everything the storefront persists goes through
//! [`DataService`]. PostgreSQL in production, in-memory for tests and local runs.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::aggregates::{NewOrder, NewProduct, Order, OrderStatus, OrderWithItems, Product};

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("data service unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait DataService: Send + Sync + 'static {
    /// Newest first.
    async fn list_products(&self) -> Result<Vec<Product>, StoreError>;
    async fn get_product(&self, id: Uuid) -> Result<Option<Product>, StoreError>;
    async fn insert_product(&self, product: NewProduct) -> Result<Product, StoreError>;
    /// Inserts the order and all its items, or nothing.
    async fn place_order(&self, order: NewOrder) -> Result<Order, StoreError>;
    async fn get_order(&self, id: Uuid) -> Result<Option<Order>, StoreError>;
    /// Newest first, each with its items joined to the product name.
    async fn list_orders(&self) -> Result<Vec<OrderWithItems>, StoreError>;
    /// Returns the updated order, or `None` when the id is unknown.
    async fn update_order_status(&self, id: Uuid, status: OrderStatus) -> Result<Option<Order>, StoreError>;
}
