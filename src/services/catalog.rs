//! Product listing, product detail and the add-to-cart guard.

use uuid::Uuid;

use crate::cart_store::SharedCart;
use crate::domain::aggregates::{Cart, CartItem, Product};
use crate::error::{AppError, Result};
use crate::store::DataService;

pub async fn list_products(data: &dyn DataService) -> Result<Vec<Product>> {
    data.list_products().await.map_err(AppError::service("Failed to load products"))
}

pub async fn get_product(data: &dyn DataService, id: Uuid) -> Result<Product> {
    data.get_product(id).await
        .map_err(AppError::service("Failed to load product"))?
        .ok_or_else(|| AppError::NotFound("Product not found".into()))
}

/// Adds `quantity` (default 1, clamped to stock) of a product to the cart.
/// Returns the cart after the change and the quantity actually added.
pub async fn add_to_cart(data: &dyn DataService, cart: &SharedCart, product_id: Uuid, quantity: Option<u32>) -> Result<(Cart, u32)> {
    let product = get_product(data, product_id).await?;
    let quantity = product.purchasable_quantity(quantity.unwrap_or(1))?;
    let mut cart = cart.lock().await;
    cart.add_item(CartItem::from_product(&product, quantity));
    tracing::debug!(product_id = %product.id, quantity, total_items = cart.total_items(), "added to cart");
    Ok((cart.clone(), quantity))
}
