//! Product list and product detail.

use axum::{extract::{Path, State}, Json};
use serde::Serialize;
use uuid::Uuid;

use crate::domain::aggregates::Product;
use crate::error::Result;
use crate::services::catalog;
use crate::state::AppState;

/// Product as shown to shoppers.
#[derive(Debug, Serialize)]
pub struct ProductView {
    #[serde(flatten)]
    pub product: Product,
    /// Add-to-cart control state; false when out of stock.
    pub can_add_to_cart: bool,
    /// Upper bound for the quantity selector.
    pub max_quantity: i32,
}

impl From<Product> for ProductView {
    fn from(product: Product) -> Self {
        let can_add_to_cart = product.is_in_stock();
        let max_quantity = product.stock_quantity.max(0);
        Self { product, can_add_to_cart, max_quantity }
    }
}

#[tracing::instrument(skip(state))]
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<ProductView>>> {
    let products = catalog::list_products(state.data.as_ref()).await?;
    Ok(Json(products.into_iter().map(ProductView::from).collect()))
}

#[tracing::instrument(skip(state))]
pub async fn detail(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<Json<ProductView>> {
    Ok(Json(catalog::get_product(state.data.as_ref(), id).await?.into()))
}
