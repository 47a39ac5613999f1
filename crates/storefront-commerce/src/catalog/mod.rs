//! Catalog module.
//!
//! Contains the product snapshot type and client-side filtering.

mod filter;
mod product;

pub use filter::{categories, ProductFilter, ALL_CATEGORIES};
pub use product::{ProductRecord, ProductRef};
