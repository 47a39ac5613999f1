//! Shopping cart module.
//!
//! Contains the cart value, the session store that owns it, coupons,
//! the checkout summary and optimistic backend sync.

mod cart;
mod coupon;
mod pricing;
mod store;
mod sync;

pub use cart::{Cart, LineItem};
pub use coupon::{Coupon, CouponBook, DEFAULT_COUPON_CODE};
pub use pricing::CartSummary;
pub use store::{CartCommand, CartEvent, CartStore, Compensation, SubscriptionId};
pub use sync::{CartGateway, CartSync};
