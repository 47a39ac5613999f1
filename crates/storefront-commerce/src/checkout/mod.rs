//! Checkout module.
//!
//! Contains customer details, payment methods, the order wire types and
//! the service that places an order from the cart.

mod customer;
mod order;
mod payment;
mod service;

pub use customer::{is_valid_email, CustomerInfo};
pub use order::{OrderConfirmation, OrderItem, OrderRequest, OrderResponse};
pub use payment::{
    PaymentAccount, PaymentMethod, PaymentScreenshot, ALLOWED_SCREENSHOT_TYPES,
    MAX_SCREENSHOT_BYTES,
};
pub use service::{Checkout, CheckoutService, OrderGateway};
