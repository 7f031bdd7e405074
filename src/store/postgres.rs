//! PostgreSQL data service.

use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions};
use uuid::Uuid;

use super::{DataService, StoreError};
use crate::domain::aggregates::{NewOrder, NewProduct, Order, OrderItemView, OrderStatus, OrderWithItems, Product};

#[derive(Clone)]
pub struct PgStore { db: PgPool }

impl PgStore {
    /// Connects and applies the embedded migrations.
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self, StoreError> {
        let db = PgPoolOptions::new().max_connections(max_connections).connect(url).await?;
        sqlx::migrate!("./migrations").run(&db).await.map_err(|e| StoreError::Database(e.into()))?;
        Ok(Self { db })
    }
}

#[async_trait]
impl DataService for PgStore {
    async fn list_products(&self) -> Result<Vec<Product>, StoreError> {
        let products = sqlx::query_as::<_, Product>("SELECT * FROM products ORDER BY created_at DESC").fetch_all(&self.db).await?;
        Ok(products)
    }

    async fn get_product(&self, id: Uuid) -> Result<Option<Product>, StoreError> {
        Ok(sqlx::query_as::<_, Product>("SELECT * FROM products WHERE id = $1").bind(id).fetch_optional(&self.db).await?)
    }

    async fn insert_product(&self, r: NewProduct) -> Result<Product, StoreError> {
        let p = sqlx::query_as::<_, Product>("INSERT INTO products (id, name, description, price, image_url, stock_quantity, category, created_at) VALUES ($1, $2, $3, $4, $5, $6, $7, NOW()) RETURNING *")
            .bind(Uuid::now_v7()).bind(&r.name).bind(&r.description).bind(r.price).bind(&r.image_url).bind(r.stock_quantity).bind(&r.category)
            .fetch_one(&self.db).await?;
        Ok(p)
    }

    async fn place_order(&self, order: NewOrder) -> Result<Order, StoreError> {
        let (order, items) = order.into_records();
        let mut tx = self.db.begin().await?;
        let o = sqlx::query_as::<_, Order>("INSERT INTO orders (id, user_id, total_amount, shipping_address, status, created_at) VALUES ($1, $2, $3, $4, $5, NOW()) RETURNING *")
            .bind(order.id).bind(order.user_id).bind(order.total_amount).bind(&order.shipping_address).bind(order.status.as_str())
            .fetch_one(&mut *tx).await?;
        for item in &items {
            sqlx::query("INSERT INTO order_items (id, order_id, product_id, quantity, price) VALUES ($1, $2, $3, $4, $5)")
                .bind(item.id).bind(o.id).bind(item.product_id).bind(item.quantity).bind(item.price)
                .execute(&mut *tx).await?;
        }
        tx.commit().await?;
        Ok(o)
    }

    async fn get_order(&self, id: Uuid) -> Result<Option<Order>, StoreError> {
        Ok(sqlx::query_as::<_, Order>("SELECT * FROM orders WHERE id = $1").bind(id).fetch_optional(&self.db).await?)
    }

    async fn list_orders(&self) -> Result<Vec<OrderWithItems>, StoreError> {
        let orders = sqlx::query_as::<_, Order>("SELECT * FROM orders ORDER BY created_at DESC").fetch_all(&self.db).await?;
        let ids: Vec<Uuid> = orders.iter().map(|o| o.id).collect();
        let items = sqlx::query_as::<_, OrderItemView>(
            "SELECT oi.id, oi.order_id, oi.product_id, p.name AS product_name, oi.quantity, oi.price \
             FROM order_items oi LEFT JOIN products p ON p.id = oi.product_id WHERE oi.order_id = ANY($1)")
            .bind(&ids).fetch_all(&self.db).await?;
        Ok(orders.into_iter().map(|order| {
            let items = items.iter().filter(|i| i.order_id == order.id).cloned().collect();
            OrderWithItems { order, items }
        }).collect())
    }

    async fn update_order_status(&self, id: Uuid, status: OrderStatus) -> Result<Option<Order>, StoreError> {
        Ok(sqlx::query_as::<_, Order>("UPDATE orders SET status = $2 WHERE id = $1 RETURNING *")
            .bind(id).bind(status.as_str()).fetch_optional(&self.db).await?)
    }
}
