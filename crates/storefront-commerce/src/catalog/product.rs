//! Product snapshot types.

use crate::ids::ProductId;
use crate::money::{Currency, Money};
use serde::{Deserialize, Serialize};

/// A catalog product as the storefront sees it.
///
/// This is what the cart snapshots from when an item is added; the backend
/// remains the authority on price and stock.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductRef {
    /// Product identifier.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Unit price.
    pub price: Money,
    /// Image URLs, first one is the thumbnail.
    #[serde(default)]
    pub images: Vec<String>,
    /// Category name.
    #[serde(default)]
    pub category: String,
    /// Long description.
    #[serde(default)]
    pub description: Option<String>,
    /// Units in stock, if the backend reported it.
    #[serde(default)]
    pub stock: Option<i64>,
}

impl ProductRef {
    /// Create a product with no images or category.
    pub fn new(id: impl Into<ProductId>, name: impl Into<String>, price: Money) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price,
            images: Vec::new(),
            category: String::new(),
            description: None,
            stock: None,
        }
    }

    /// Set the category.
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    /// Append an image URL.
    pub fn with_image(mut self, url: impl Into<String>) -> Self {
        self.images.push(url.into());
        self
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the stock level.
    pub fn with_stock(mut self, stock: i64) -> Self {
        self.stock = Some(stock);
        self
    }

    /// First image, used as the cart thumbnail.
    pub fn primary_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }

    /// Whether the product can be added to the cart.
    ///
    /// Products without a stock figure are assumed available.
    pub fn in_stock(&self) -> bool {
        self.stock.map(|s| s > 0).unwrap_or(true)
    }
}

/// A product as returned by the backend catalog endpoints.
///
/// Prices arrive as decimal numbers in major units.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductRecord {
    pub id: String,
    pub name: String,
    pub price: f64,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub stock: Option<i64>,
}

impl ProductRecord {
    /// Convert into a product priced in `currency`.
    pub fn into_product(self, currency: Currency) -> ProductRef {
        ProductRef {
            id: ProductId::new(self.id),
            name: self.name,
            price: Money::from_decimal(self.price, currency),
            images: self.images,
            category: self.category,
            description: self.description,
            stock: self.stock,
        }
    }
}
