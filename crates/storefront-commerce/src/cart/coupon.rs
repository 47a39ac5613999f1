//! Coupon codes.

use crate::error::CommerceError;
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// Code accepted by a default [`CouponBook`].
pub const DEFAULT_COUPON_CODE: &str = "GNSONS20";

/// A percentage-off coupon applied to the cart subtotal.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Coupon {
    /// Code the customer types, matched case-sensitively.
    pub code: String,
    /// Percentage off the subtotal (0.0 - 100.0).
    pub percent_off: f64,
    /// Shown next to the code field.
    #[serde(default)]
    pub description: Option<String>,
}

impl Coupon {
    /// Create a percentage coupon. The percentage is clamped to 0-100.
    pub fn percentage(code: impl Into<String>, percent_off: f64) -> Self {
        Self {
            code: code.into(),
            percent_off: percent_off.clamp(0.0, 100.0),
            description: None,
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Discount for a given subtotal, never more than the subtotal.
    pub fn discount_on(&self, subtotal: &Money) -> Money {
        let percent = self.percent_off.clamp(0.0, 100.0);
        subtotal.percentage(percent).min(*subtotal)
    }
}

/// The set of coupon codes the storefront accepts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CouponBook {
    coupons: Vec<Coupon>,
}

impl CouponBook {
    /// A book with no coupons.
    pub fn empty() -> Self {
        Self {
            coupons: Vec::new(),
        }
    }

    /// Build a book from a list; later entries replace earlier ones with the same code.
    pub fn from_coupons(coupons: impl IntoIterator<Item = Coupon>) -> Self {
        let mut book = Self::empty();
        for coupon in coupons {
            book.insert(coupon);
        }
        book
    }

    /// Add or replace a coupon.
    pub fn insert(&mut self, coupon: Coupon) {
        self.coupons.retain(|c| c.code != coupon.code);
        self.coupons.push(coupon);
    }

    /// Look up a code typed by the customer.
    ///
    /// Surrounding whitespace is ignored; case is not.
    pub fn redeem(&self, code: &str) -> Result<&Coupon, CommerceError> {
        let code = code.trim();
        self.coupons
            .iter()
            .find(|c| c.code == code)
            .ok_or_else(|| CommerceError::InvalidCoupon(code.to_string()))
    }

    /// All known coupons.
    pub fn coupons(&self) -> &[Coupon] {
        &self.coupons
    }
}

impl Default for CouponBook {
    fn default() -> Self {
        Self::from_coupons([Coupon::percentage(DEFAULT_COUPON_CODE, 20.0)
            .with_description("20% off")])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Currency;

    #[test]
    fn test_default_book_has_twenty_percent_code() {
        let book = CouponBook::default();
        let coupon = book.redeem("GNSONS20").unwrap();
        let discount = coupon.discount_on(&Money::new(500000, Currency::PKR));
        assert_eq!(discount.amount_cents, 100000);
    }

    #[test]
    fn test_codes_are_case_sensitive() {
        let book = CouponBook::default();
        assert!(book.redeem(" GNSONS20 ").is_ok());
        assert_eq!(
            book.redeem("gnsons20"),
            Err(CommerceError::InvalidCoupon("gnsons20".to_string()))
        );
    }

    #[test]
    fn test_discount_capped_at_subtotal() {
        let coupon = Coupon::percentage("ALL", 250.0);
        assert_eq!(coupon.percent_off, 100.0);
        let subtotal = Money::new(1234, Currency::PKR);
        assert_eq!(coupon.discount_on(&subtotal), subtotal);
    }

    #[test]
    fn test_insert_replaces_same_code() {
        let mut book = CouponBook::default();
        book.insert(Coupon::percentage(DEFAULT_COUPON_CODE, 10.0));
        assert_eq!(book.coupons().len(), 1);
        assert_eq!(book.redeem(DEFAULT_COUPON_CODE).unwrap().percent_off, 10.0);
    }
}
