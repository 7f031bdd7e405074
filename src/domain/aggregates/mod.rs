//! Aggregates module
pub mod product;
pub mod order;
pub mod cart;

pub use product::{NewProduct, Product, ProductError, ProductForm};
pub use order::{NewOrder, NewOrderItem, Order, OrderError, OrderItem, OrderItemView, OrderStatus, OrderWithItems};
pub use cart::{Cart, CartError, CartItem};
