//! Product Aggregate

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

use crate::domain::value_objects::not_blank;

/// Product record as held by the data service.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub image_url: Option<String>,
    pub stock_quantity: i32,
    pub category: String,
    pub created_at: DateTime<Utc>,
}

impl Product {
    pub fn is_in_stock(&self) -> bool { self.stock_quantity > 0 }

    /// Quantity a shopper may put in the cart in one action: at least one,
    /// at most the stock on hand. Out-of-stock products can't be added.
    pub fn purchasable_quantity(&self, requested: u32) -> Result<u32, ProductError> {
        if !self.is_in_stock() { return Err(ProductError::OutOfStock); }
        let stock = u32::try_from(self.stock_quantity).unwrap_or(0);
        Ok(requested.clamp(1, stock))
    }
}

/// Validated input for a product insert.
#[derive(Clone, Debug, PartialEq)]
pub struct NewProduct {
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub image_url: Option<String>,
    pub stock_quantity: i32,
    pub category: String,
}

impl NewProduct {
    pub fn into_product(self) -> Product {
        Product {
            id: Uuid::now_v7(),
            name: self.name,
            description: self.description,
            price: self.price,
            image_url: self.image_url,
            stock_quantity: self.stock_quantity,
            category: self.category,
            created_at: Utc::now(),
        }
    }
}

/// Admin "add product" form. Numbers arrive as text and are coerced here.
#[derive(Clone, Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct ProductForm {
    #[validate(custom = "not_blank")]
    pub name: String,
    pub description: String,
    #[validate(custom = "not_blank")]
    pub price: String,
    pub image_url: String,
    #[validate(custom = "not_blank")]
    pub stock_quantity: String,
    #[validate(custom = "not_blank")]
    pub category: String,
}

impl TryFrom<ProductForm> for NewProduct {
    type Error = ProductError;

    fn try_from(form: ProductForm) -> Result<Self, Self::Error> {
        let mut price = Decimal::from_str(form.price.trim()).map_err(|_| ProductError::InvalidPrice(form.price.clone()))?;
        // Whole cents only, stored at two decimal places.
        if price.is_sign_negative() || price.normalize().scale() > 2 { return Err(ProductError::InvalidPrice(form.price)); }
        price.rescale(2);
        let stock_quantity: i32 = form.stock_quantity.trim().parse().map_err(|_| ProductError::InvalidStock(form.stock_quantity.clone()))?;
        if stock_quantity < 0 { return Err(ProductError::InvalidStock(form.stock_quantity)); }
        Ok(Self {
            name: form.name.trim().to_string(),
            description: optional(form.description),
            price,
            image_url: optional(form.image_url),
            stock_quantity,
            category: form.category.trim().to_string(),
        })
    }
}

fn optional(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() { None } else { Some(trimmed.to_string()) }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProductError {
    #[error("Out of Stock")]
    OutOfStock,
    #[error("Invalid price: {0}")]
    InvalidPrice(String),
    #[error("Invalid stock quantity: {0}")]
    InvalidStock(String),
}
