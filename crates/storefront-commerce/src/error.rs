//! Commerce error types.
//!
//! The cart store itself never fails; these errors come from the
//! operations around it (coupons, checkout, widgets, gateways).

use thiserror::Error;

/// Errors that can occur in storefront operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CommerceError {
    /// Coupon code is not known.
    #[error("Invalid coupon code: {0}")]
    InvalidCoupon(String),

    /// Checkout attempted with nothing in the cart.
    #[error("Your cart is empty")]
    EmptyCart,

    /// A form field is missing or malformed.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Payment screenshot rejected before upload.
    #[error("Invalid payment screenshot: {0}")]
    InvalidScreenshot(String),

    /// Backend answered but refused the order.
    #[error("Order rejected: {0}")]
    OrderRejected(String),

    /// Backend refused a chat message.
    #[error("{0}")]
    ChatRejected(String),

    /// Transport or backend failure.
    #[error("Gateway error: {0}")]
    Gateway(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl CommerceError {
    /// Build a validation error for a form field.
    pub fn validation(msg: impl Into<String>) -> Self {
        CommerceError::Validation(msg.into())
    }

    /// Build a gateway error.
    pub fn gateway(msg: impl Into<String>) -> Self {
        CommerceError::Gateway(msg.into())
    }
}

impl From<serde_json::Error> for CommerceError {
    fn from(e: serde_json::Error) -> Self {
        CommerceError::Serialization(e.to_string())
    }
}
