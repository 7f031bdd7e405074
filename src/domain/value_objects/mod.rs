//! Value Objects for the storefront

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use validator::Validate;

/// Money value object
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Money { amount: Decimal, currency: String }

impl Money {
    pub fn new(amount: Decimal, currency: &str) -> Self { Self { amount, currency: currency.to_string() } }
}

/// Two decimal places; dollar sign for USD, ISO code suffix otherwise.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let amount = self.amount.round_dp(2);
        if self.currency == "USD" { write!(f, "${amount:.2}") } else { write!(f, "{amount:.2} {}", self.currency) }
    }
}

/// Shipping form as submitted at checkout. Every field is required.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ShippingAddress {
    #[validate(custom = "not_blank")]
    pub full_name: String,
    #[validate(custom = "not_blank")]
    pub phone: String,
    #[validate(custom = "not_blank")]
    pub street: String,
    #[validate(custom = "not_blank")]
    pub city: String,
    #[validate(custom = "not_blank")]
    pub state: String,
    #[validate(custom = "not_blank")]
    pub zip_code: String,
}

impl ShippingAddress {
    /// Free-text form stored on the order record.
    pub fn to_free_text(&self) -> String {
        format!(
            "{}, {}, {}, {}, {} {}",
            self.full_name.trim(), self.phone.trim(), self.street.trim(),
            self.city.trim(), self.state.trim(), self.zip_code.trim()
        )
    }
}

pub(crate) fn not_blank(value: &str) -> Result<(), validator::ValidationError> {
    if value.trim().is_empty() { return Err(validator::ValidationError::new("required")); }
    Ok(())
}
