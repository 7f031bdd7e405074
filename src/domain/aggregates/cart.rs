//! Cart Aggregate

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use crate::domain::aggregates::product::Product;

/// Largest quantity a single cart line can hold; order items store it as `i32`.
pub const MAX_LINE_QUANTITY: u32 = i32::MAX as u32;

#[derive(Clone, Debug)]
pub struct Cart {
    items: Vec<CartItem>,
    total_price: Decimal,
    updated_at: DateTime<Utc>,
}

/// One cart line. `price` is a snapshot taken when the product was added.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CartItem {
    pub product_id: Uuid,
    pub name: String,
    pub price: Decimal,
    pub image_url: Option<String>,
    pub quantity: u32,
}

impl CartItem {
    pub fn from_product(product: &Product, quantity: u32) -> Self {
        Self {
            product_id: product.id,
            name: product.name.clone(),
            price: product.price,
            image_url: product.image_url.clone(),
            quantity,
        }
    }

    pub fn line_total(&self) -> Decimal { self.price * Decimal::from(self.quantity) }
}

impl Default for Cart {
    fn default() -> Self { Self::new() }
}

impl Cart {
    pub fn new() -> Self {
        Self { items: vec![], total_price: Decimal::ZERO, updated_at: Utc::now() }
    }

    pub fn items(&self) -> &[CartItem] { &self.items }
    pub fn total_price(&self) -> Decimal { self.total_price }
    pub fn total_items(&self) -> u64 { self.items.iter().map(|i| u64::from(i.quantity)).sum() }
    pub fn line_count(&self) -> usize { self.items.len() }
    pub fn is_empty(&self) -> bool { self.items.is_empty() }
    pub fn updated_at(&self) -> DateTime<Utc> { self.updated_at }

    /// Merges into an existing line for the same product, else appends.
    /// `item.quantity` is the amount to add; zero is treated as one. Line
    /// quantities stop at [`MAX_LINE_QUANTITY`].
    pub fn add_item(&mut self, mut item: CartItem) {
        item.quantity = item.quantity.clamp(1, MAX_LINE_QUANTITY);
        if let Some(existing) = self.items.iter_mut().find(|i| i.product_id == item.product_id) {
            existing.quantity = existing.quantity.saturating_add(item.quantity).min(MAX_LINE_QUANTITY);
        } else {
            self.items.push(item);
        }
        self.recalculate();
    }

    /// A quantity of zero or below removes the line; anything above
    /// [`MAX_LINE_QUANTITY`] is rejected.
    pub fn update_quantity(&mut self, product_id: Uuid, quantity: i64) -> Result<(), CartError> {
        let item = self.items.iter_mut().find(|i| i.product_id == product_id).ok_or(CartError::ItemNotFound)?;
        if quantity <= 0 { self.items.retain(|i| i.product_id != product_id); }
        else {
            item.quantity = u32::try_from(quantity).ok().filter(|q| *q <= MAX_LINE_QUANTITY)
                .ok_or(CartError::QuantityTooLarge(MAX_LINE_QUANTITY))?;
        }
        self.recalculate();
        Ok(())
    }

    pub fn remove_item(&mut self, product_id: Uuid) -> Result<(), CartError> {
        let before = self.items.len();
        self.items.retain(|i| i.product_id != product_id);
        if self.items.len() == before { return Err(CartError::ItemNotFound); }
        self.recalculate();
        Ok(())
    }

    pub fn clear(&mut self) { self.items.clear(); self.recalculate(); }

    fn recalculate(&mut self) {
        self.total_price = self.items.iter().map(CartItem::line_total).sum();
        self.updated_at = Utc::now();
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CartError {
    #[error("Item not found in cart")]
    ItemNotFound,
    #[error("Quantity cannot exceed {0}")]
    QuantityTooLarge(u32),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: Uuid, price: Decimal, quantity: u32) -> CartItem {
        CartItem { product_id: id, name: "Widget".into(), price, image_url: None, quantity }
    }

    #[test]
    fn test_cart_operations() {
        let p1 = Uuid::new_v4();
        let mut cart = Cart::new();
        cart.add_item(item(p1, Decimal::new(1000, 2), 2));
        assert_eq!(cart.line_count(), 1);
        assert_eq!(cart.total_price(), Decimal::new(20, 0));
        cart.add_item(item(p1, Decimal::new(1000, 2), 1));
        assert_eq!(cart.line_count(), 1);
        assert_eq!(cart.items()[0].quantity, 3); // Merged
        assert_eq!(cart.total_price(), Decimal::new(30, 0));
        assert_eq!(cart.total_items(), 3);
    }

    #[test]
    fn test_zero_quantity_add_counts_as_one() {
        let mut cart = Cart::new();
        cart.add_item(item(Uuid::new_v4(), Decimal::ONE, 0));
        assert_eq!(cart.total_items(), 1);
    }

    #[test]
    fn test_update_quantity_removes_at_or_below_zero() {
        let (p1, p2) = (Uuid::new_v4(), Uuid::new_v4());
        let mut cart = Cart::new();
        cart.add_item(item(p1, Decimal::new(5, 0), 1));
        cart.add_item(item(p2, Decimal::new(7, 0), 1));
        cart.update_quantity(p1, 4).unwrap();
        assert_eq!(cart.total_price(), Decimal::new(27, 0));
        cart.update_quantity(p1, 0).unwrap();
        assert_eq!(cart.line_count(), 1);
        cart.update_quantity(p2, -3).unwrap();
        assert!(cart.is_empty());
        assert_eq!(cart.total_price(), Decimal::ZERO);
        assert_eq!(cart.update_quantity(p2, 1), Err(CartError::ItemNotFound));
    }

    #[test]
    fn test_remove_and_clear() {
        let (p1, p2) = (Uuid::new_v4(), Uuid::new_v4());
        let mut cart = Cart::new();
        cart.add_item(item(p1, Decimal::new(5, 0), 1));
        cart.add_item(item(p2, Decimal::new(7, 0), 2));
        cart.remove_item(p1).unwrap();
        assert_eq!(cart.remove_item(p1), Err(CartError::ItemNotFound));
        assert_eq!(cart.total_price(), Decimal::new(14, 0));
        cart.clear();
        assert!(cart.is_empty());
        assert_eq!(cart.total_items(), 0);
    }

    #[test]
    fn test_line_quantity_is_capped() {
        let (p1, p2) = (Uuid::new_v4(), Uuid::new_v4());
        let mut cart = Cart::new();
        cart.add_item(item(p1, Decimal::ONE, 1));
        cart.add_item(item(p2, Decimal::ONE, u32::MAX));
        assert_eq!(cart.items()[1].quantity, MAX_LINE_QUANTITY);
        cart.add_item(item(p2, Decimal::ONE, 5));
        assert_eq!(cart.items()[1].quantity, MAX_LINE_QUANTITY);

        assert_eq!(cart.update_quantity(p1, 4_294_967_295), Err(CartError::QuantityTooLarge(MAX_LINE_QUANTITY)));
        assert_eq!(cart.items()[0].quantity, 1);
        cart.update_quantity(p1, i64::from(MAX_LINE_QUANTITY)).unwrap();
        assert_eq!(cart.total_items(), 2 * u64::from(MAX_LINE_QUANTITY));
        assert_eq!(cart.total_price(), Decimal::from(2 * u64::from(MAX_LINE_QUANTITY)));
    }

    #[test]
    fn test_totals_hold_over_mixed_sequences() {
        let ids: Vec<Uuid> = (0..4).map(|_| Uuid::new_v4()).collect();
        let prices = [Decimal::new(1000, 2), Decimal::new(250, 2), Decimal::new(1, 2), Decimal::new(9999, 2)];
        let mut cart = Cart::new();
        let mut seed: u64 = 0x2545_F491_4F6C_DD1D;
        for _ in 0..500 {
            seed ^= seed << 13; seed ^= seed >> 7; seed ^= seed << 17;
            let slot = (seed % 4) as usize;
            let amount = ((seed >> 8) % 6) as i64 - 1;
            match (seed >> 16) % 3 {
                0 => cart.add_item(item(ids[slot], prices[slot], amount.max(0) as u32)),
                1 => { let _ = cart.remove_item(ids[slot]); }
                _ => { let _ = cart.update_quantity(ids[slot], amount); }
            }
            let quantities: u64 = cart.items().iter().map(|i| u64::from(i.quantity)).sum();
            let total: Decimal = cart.items().iter().map(|i| i.price * Decimal::from(i.quantity)).sum();
            assert_eq!(cart.total_items(), quantities);
            assert_eq!(cart.total_price(), total);
            assert!(cart.items().iter().all(|i| i.quantity >= 1));
            let mut seen: Vec<Uuid> = cart.items().iter().map(|i| i.product_id).collect();
            seen.sort(); seen.dedup();
            assert_eq!(seen.len(), cart.line_count());
        }
    }
}
