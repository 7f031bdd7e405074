//! Admin dashboard: product catalog and order management.

use axum::{extract::{Path, State}, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Notified;
use crate::auth::RequireAdmin;
use crate::domain::aggregates::{Order, OrderStatus, OrderWithItems, Product, ProductForm};
use crate::error::Result;
use crate::notification::Notification;
use crate::services::admin;
use crate::state::AppState;

/// Statuses an admin can mark an order with.
const STATUS_ACTIONS: [OrderStatus; 3] = [OrderStatus::Confirmed, OrderStatus::Shipped, OrderStatus::Delivered];

#[derive(Debug, Serialize)]
pub struct StatusAction { pub status: OrderStatus, pub enabled: bool }

#[derive(Debug, Serialize)]
pub struct AdminOrderView {
    #[serde(flatten)]
    pub order: OrderWithItems,
    pub reference: String,
    /// "Mark as ..." controls; the one matching the current status is disabled.
    pub actions: Vec<StatusAction>,
}

impl From<OrderWithItems> for AdminOrderView {
    fn from(order: OrderWithItems) -> Self {
        let current = order.order.status;
        Self {
            reference: order.order.reference(),
            actions: STATUS_ACTIONS.iter().map(|&status| StatusAction { status, enabled: status != current }).collect(),
            order,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ProductList { pub count: usize, pub products: Vec<Product> }

#[derive(Debug, Serialize)]
pub struct OrderList { pub count: usize, pub orders: Vec<AdminOrderView> }

#[derive(Debug, Serialize)]
pub struct ProductCreated { pub product: Product }

#[derive(Debug, Deserialize)]
pub struct StatusRequest { pub status: String }

#[derive(Debug, Serialize)]
pub struct StatusUpdated { pub order: Order, pub changed: bool }

pub async fn list_products(RequireAdmin(_admin): RequireAdmin, State(state): State<AppState>) -> Result<Json<ProductList>> {
    let products = admin::list_products(state.data.as_ref()).await?;
    Ok(Json(ProductList { count: products.len(), products }))
}

#[tracing::instrument(skip(admin_user, state), fields(admin_id = %admin_user.id))]
pub async fn create_product(RequireAdmin(admin_user): RequireAdmin, State(state): State<AppState>, Json(form): Json<ProductForm>) -> Result<(StatusCode, Json<Notified<ProductCreated>>)> {
    let product = admin::create_product(state.data.as_ref(), &state.events, form).await?;
    Ok((StatusCode::CREATED, Notified::new(ProductCreated { product }, Notification::success("Success", "Product added successfully"))))
}

pub async fn list_orders(RequireAdmin(_admin): RequireAdmin, State(state): State<AppState>) -> Result<Json<OrderList>> {
    let orders: Vec<AdminOrderView> = admin::list_orders(state.data.as_ref()).await?.into_iter().map(AdminOrderView::from).collect();
    Ok(Json(OrderList { count: orders.len(), orders }))
}

#[tracing::instrument(skip(admin_user, state), fields(admin_id = %admin_user.id))]
pub async fn update_order_status(RequireAdmin(admin_user): RequireAdmin, State(state): State<AppState>, Path(id): Path<Uuid>, Json(req): Json<StatusRequest>) -> Result<Json<Notified<StatusUpdated>>> {
    let status: OrderStatus = req.status.parse()?;
    let update = admin::update_order_status(state.data.as_ref(), &state.events, id, status).await?;
    let description = if update.changed { "Order status updated" } else { "Order already has this status" };
    Ok(Notified::new(StatusUpdated { order: update.order, changed: update.changed }, Notification::success("Success", description)))
}
