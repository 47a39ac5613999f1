//! Cart, checkout and widget state for the storefront.
//!
//! This crate holds the client-side state of the shop. Pricing authority,
//! inventory and order persistence live in the backend and are reached
//! through the gateway traits in [`cart`], [`checkout`], [`chat`] and
//! [`contact`].
//!
//! - **Catalog**: Product snapshots and client-side filtering
//! - **Cart**: The cart store, coupons, summaries, optimistic sync
//! - **Checkout**: Customer details, payment methods, order placement
//! - **Chat / Contact**: Support widgets
//!
//! # Example
//!
//! ```rust
//! use storefront_commerce::prelude::*;
//!
//! let watch = ProductRef::new("p1", "Watch", Money::new(1000, Currency::PKR));
//!
//! let mut store = CartStore::new(Currency::PKR);
//! store.add_item(&watch, 2);
//! assert_eq!(store.cart().total().amount_cents, 2000);
//!
//! store.update_quantity(&ProductId::new("p1"), 5);
//! assert_eq!(store.cart().total().amount_cents, 5000);
//!
//! store.remove_item(&ProductId::new("p1"));
//! assert!(store.is_empty());
//! ```

pub mod error;
pub mod ids;
pub mod money;

pub mod catalog;
pub mod cart;
pub mod chat;
pub mod checkout;
pub mod contact;

pub use error::CommerceError;
pub use ids::*;
pub use money::{Currency, Money};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::CommerceError;
    pub use crate::ids::*;
    pub use crate::money::{Currency, Money};

    // Catalog
    pub use crate::catalog::{categories, ProductFilter, ProductRef};

    // Cart
    pub use crate::cart::{
        Cart, CartCommand, CartEvent, CartGateway, CartStore, CartSummary, CartSync,
        Compensation, Coupon, CouponBook, LineItem, SubscriptionId,
    };

    // Checkout
    pub use crate::checkout::{
        Checkout, CheckoutService, CustomerInfo, OrderConfirmation, OrderGateway, OrderRequest,
        OrderResponse, PaymentAccount, PaymentMethod, PaymentScreenshot,
    };

    // Widgets
    pub use crate::chat::{ChatGateway, ChatMessage, ChatSession, SendReceipt};
    pub use crate::contact::{ContactForm, ContactGateway, ContactService};
}
