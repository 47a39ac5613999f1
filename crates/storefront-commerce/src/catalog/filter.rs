//! Client-side product filtering for the products page.

use crate::catalog::ProductRef;
use crate::money::{Currency, Money};
use serde::{Deserialize, Serialize};

/// Category value that disables category filtering.
pub const ALL_CATEGORIES: &str = "all";

/// Filter over an already fetched product list.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ProductFilter {
    /// Exact category match. `None` or `"all"` matches everything.
    pub category: Option<String>,
    /// Case-insensitive substring over name, category and description.
    pub search: Option<String>,
    /// Inclusive lower price bound.
    pub min_price: Option<Money>,
    /// Inclusive upper price bound.
    pub max_price: Option<Money>,
}

impl ProductFilter {
    /// An empty filter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict to a category.
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Restrict to products matching a search term.
    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    /// Restrict to a price range.
    pub fn price_range(mut self, min: Option<Money>, max: Option<Money>) -> Self {
        self.min_price = min;
        self.max_price = max;
        self
    }

    /// Build a filter from URL query parameters.
    ///
    /// Recognised keys are `category`, `search`, `minPrice` and `maxPrice`.
    /// Empty values and prices that don't parse are ignored.
    pub fn from_query_pairs<'a>(
        pairs: impl IntoIterator<Item = (&'a str, &'a str)>,
        currency: Currency,
    ) -> Self {
        let mut filter = Self::new();
        for (key, value) in pairs {
            let value = value.trim();
            if value.is_empty() {
                continue;
            }
            match key {
                "category" => filter.category = Some(value.to_string()),
                "search" => filter.search = Some(value.to_string()),
                "minPrice" => filter.min_price = parse_price(value, currency),
                "maxPrice" => filter.max_price = parse_price(value, currency),
                _ => {}
            }
        }
        filter
    }

    /// Whether a price bound is set; such results are sorted by price.
    pub fn has_price_bounds(&self) -> bool {
        self.min_price.is_some() || self.max_price.is_some()
    }

    /// Check a single product against the filter.
    pub fn matches(&self, product: &ProductRef) -> bool {
        if let Some(ref category) = self.category {
            if category != ALL_CATEGORIES && &product.category != category {
                return false;
            }
        }

        if let Some(ref term) = self.search {
            let term = term.to_lowercase();
            let in_description = product
                .description
                .as_ref()
                .map(|d| d.to_lowercase().contains(&term))
                .unwrap_or(false);
            if !product.name.to_lowercase().contains(&term)
                && !product.category.to_lowercase().contains(&term)
                && !in_description
            {
                return false;
            }
        }

        if let Some(min) = self.min_price {
            if product.price.amount_cents < min.amount_cents {
                return false;
            }
        }
        if let Some(max) = self.max_price {
            if product.price.amount_cents > max.amount_cents {
                return false;
            }
        }

        true
    }

    /// Filter a product list, keeping catalog order unless a price bound is set.
    pub fn apply(&self, products: &[ProductRef]) -> Vec<ProductRef> {
        let mut filtered: Vec<ProductRef> =
            products.iter().filter(|p| self.matches(p)).cloned().collect();
        if self.has_price_bounds() {
            // Stable, so equal prices keep catalog order.
            filtered.sort_by_key(|p| p.price.amount_cents);
        }
        filtered
    }
}

/// Distinct categories in first-seen order, skipping blanks.
pub fn categories(products: &[ProductRef]) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for product in products {
        if !product.category.is_empty() && !seen.contains(&product.category) {
            seen.push(product.category.clone());
        }
    }
    seen
}

fn parse_price(value: &str, currency: Currency) -> Option<Money> {
    value
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .map(|v| Money::from_decimal(v, currency))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Vec<ProductRef> {
        vec![
            ProductRef::new("p1", "Gold Watch", Money::new(500000, Currency::PKR))
                .with_category("watches"),
            ProductRef::new("p2", "Leather Wallet", Money::new(150000, Currency::PKR))
                .with_category("accessories")
                .with_description("Hand-stitched, fits a watch strap"),
            ProductRef::new("p3", "Steel Watch", Money::new(200000, Currency::PKR))
                .with_category("watches"),
        ]
    }

    #[test]
    fn test_all_category_matches_everything() {
        let filter = ProductFilter::new().category(ALL_CATEGORIES);
        assert_eq!(filter.apply(&catalog()).len(), 3);
    }

    #[test]
    fn test_category_filter_keeps_catalog_order() {
        let result = ProductFilter::new().category("watches").apply(&catalog());
        let ids: Vec<&str> = result.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["p1", "p3"]);
    }

    #[test]
    fn test_search_covers_description() {
        let result = ProductFilter::new().search("STRAP").apply(&catalog());
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].id.as_str(), "p2");
    }

    #[test]
    fn test_price_bounds_sort_ascending() {
        let filter = ProductFilter::new().price_range(Some(Money::new(150000, Currency::PKR)), None);
        let ids: Vec<String> = filter
            .apply(&catalog())
            .into_iter()
            .map(|p| p.id.into_inner())
            .collect();
        assert_eq!(ids, vec!["p2", "p3", "p1"]);
    }

    #[test]
    fn test_from_query_pairs_ignores_bad_prices() {
        let filter = ProductFilter::from_query_pairs(
            [("category", "watches"), ("minPrice", "abc"), ("maxPrice", "3000")],
            Currency::PKR,
        );
        assert_eq!(filter.category.as_deref(), Some("watches"));
        assert!(filter.min_price.is_none());
        assert_eq!(filter.max_price.map(|m| m.amount_cents), Some(300000));

        let ids: Vec<String> = filter
            .apply(&catalog())
            .into_iter()
            .map(|p| p.id.into_inner())
            .collect();
        assert_eq!(ids, vec!["p3"]);
    }

    #[test]
    fn test_categories_first_seen_order() {
        assert_eq!(categories(&catalog()), vec!["watches", "accessories"]);
    }
}
