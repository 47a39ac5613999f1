//! Cart and line item types.

use crate::catalog::ProductRef;
use crate::ids::ProductId;
use crate::money::{Currency, Money};
use serde::Serialize;

/// One product's presence in the cart.
///
/// Name, price and image are copied from the product when it is first
/// added and are not refreshed afterwards.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    /// Product being purchased.
    pub product_id: ProductId,
    /// Product name at add time.
    pub product_name: String,
    /// Unit price at add time.
    pub price: Money,
    /// Thumbnail URL at add time.
    pub image: Option<String>,
    /// Quantity, always at least 1 while the line is in a cart.
    pub quantity: i64,
}

impl LineItem {
    /// Snapshot a product into a new line.
    pub fn snapshot(product: &ProductRef, quantity: i64) -> Self {
        Self {
            product_id: product.id.clone(),
            product_name: product.name.clone(),
            price: product.price,
            image: product.primary_image().map(str::to_string),
            quantity,
        }
    }

    /// Price times quantity.
    pub fn line_total(&self) -> Money {
        self.price.times(self.quantity)
    }
}

/// The cart value: line items plus their derived total.
///
/// Fields are private so the total can only change together with the
/// items, through [`CartStore`](crate::cart::CartStore).
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Cart {
    items: Vec<LineItem>,
    total: Money,
}

impl Cart {
    /// An empty cart priced in `currency`.
    pub fn empty(currency: Currency) -> Self {
        Self {
            items: Vec::new(),
            total: Money::zero(currency),
        }
    }

    /// Line items in insertion order.
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Sum of `price * quantity` over all items.
    pub fn total(&self) -> Money {
        self.total
    }

    /// Currency every line is priced in.
    pub fn currency(&self) -> Currency {
        self.total.currency
    }

    /// Total item count (sum of quantities).
    pub fn item_count(&self) -> i64 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    /// Number of distinct products.
    pub fn unique_item_count(&self) -> usize {
        self.items.len()
    }

    /// Check if cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Get the line for a product.
    pub fn get_item(&self, product_id: &ProductId) -> Option<&LineItem> {
        self.items.iter().find(|i| &i.product_id == product_id)
    }

    pub(crate) fn position(&self, product_id: &ProductId) -> Option<usize> {
        self.items.iter().position(|i| &i.product_id == product_id)
    }

    pub(crate) fn items_mut(&mut self) -> &mut Vec<LineItem> {
        &mut self.items
    }

    /// Recompute the total from scratch. Called after every mutation.
    pub(crate) fn recompute_total(&mut self) {
        let currency = self.currency();
        let line_totals: Vec<Money> = self.items.iter().map(LineItem::line_total).collect();
        self.total = Money::sum(line_totals.iter(), currency);
    }
}

impl Default for Cart {
    fn default() -> Self {
        Self::empty(Currency::default())
    }
}
