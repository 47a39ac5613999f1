//! Cart summary shown on the cart and checkout pages.

use crate::cart::{Cart, Coupon};
use crate::money::Money;
use serde::Serialize;

/// Totals breakdown for a cart.
///
/// Always derived from the current cart, so a coupon discount follows
/// later quantity changes.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CartSummary {
    /// Sum of line totals.
    pub subtotal: Money,
    /// Coupon discount.
    pub discount: Money,
    /// Shipping cost. Shipping is free.
    pub shipping: Money,
    /// Amount to pay (subtotal - discount + shipping).
    pub total: Money,
    /// Code of the applied coupon, only when it yields a discount.
    pub coupon_code: Option<String>,
    /// Number of units in the cart.
    pub item_count: i64,
}

impl CartSummary {
    /// Summarize a cart with an optional coupon.
    pub fn compute(cart: &Cart, coupon: Option<&Coupon>) -> Self {
        let subtotal = cart.total();
        let currency = cart.currency();
        let discount = coupon
            .map(|c| c.discount_on(&subtotal))
            .unwrap_or_else(|| Money::zero(currency));
        let shipping = Money::zero(currency);
        let total = Money::new(
            subtotal
                .amount_cents
                .saturating_sub(discount.amount_cents)
                .saturating_add(shipping.amount_cents),
            currency,
        );

        Self {
            subtotal,
            discount,
            shipping,
            total,
            coupon_code: coupon
                .filter(|_| discount.is_positive())
                .map(|c| c.code.clone()),
            item_count: cart.item_count(),
        }
    }

    /// Check if a discount applies.
    pub fn has_discount(&self) -> bool {
        self.discount.is_positive()
    }

    /// Shipping is shown as "FREE" when zero.
    pub fn shipping_label(&self) -> String {
        if self.shipping.is_zero() {
            "FREE".to_string()
        } else {
            self.shipping.display()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::{CartStore, CouponBook};
    use crate::catalog::ProductRef;
    use crate::money::Currency;

    #[test]
    fn test_summary_without_coupon() {
        let mut store = CartStore::new(Currency::PKR);
        store.add_item(&ProductRef::new("p1", "Watch", Money::new(100000, Currency::PKR)), 2);

        let summary = CartSummary::compute(store.cart(), None);
        assert_eq!(summary.subtotal.amount_cents, 200000);
        assert!(!summary.has_discount());
        assert_eq!(summary.total.amount_cents, 200000);
        assert_eq!(summary.shipping_label(), "FREE");
        assert_eq!(summary.item_count, 2);
        assert!(summary.coupon_code.is_none());
    }

    #[test]
    fn test_discount_follows_quantity_changes() {
        let book = CouponBook::default();
        let coupon = book.redeem("GNSONS20").unwrap();
        let mut store = CartStore::new(Currency::PKR);
        let watch = ProductRef::new("p1", "Watch", Money::new(100000, Currency::PKR));
        store.add_item(&watch, 1);

        let summary = CartSummary::compute(store.cart(), Some(coupon));
        assert_eq!(summary.discount.amount_cents, 20000);
        assert_eq!(summary.total.amount_cents, 80000);
        assert_eq!(summary.coupon_code.as_deref(), Some("GNSONS20"));

        store.update_quantity(&watch.id, 3);
        let summary = CartSummary::compute(store.cart(), Some(coupon));
        assert_eq!(summary.discount.amount_cents, 60000);
        assert_eq!(summary.total.amount_cents, 240000);
    }

    #[test]
    fn test_coupon_on_empty_cart_has_no_code() {
        let store = CartStore::new(Currency::PKR);
        let book = CouponBook::default();
        let summary = CartSummary::compute(store.cart(), book.redeem("GNSONS20").ok());
        assert!(summary.total.is_zero());
        assert!(summary.coupon_code.is_none());
    }
}
