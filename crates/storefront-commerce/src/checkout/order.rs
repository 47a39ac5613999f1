//! Order wire types.
//!
//! Field names follow the backend's camelCase JSON.

use crate::cart::{Cart, CartSummary, LineItem};
use crate::checkout::{CustomerInfo, PaymentMethod, PaymentScreenshot};
use crate::ids::{OrderId, ProductId, UserId};
use serde::{Deserialize, Serialize};

/// A cart line as sent to the order endpoint. Prices are decimal major units.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub product_id: ProductId,
    pub product_name: String,
    pub price: f64,
    /// Empty string when the product had no image.
    pub image: String,
    pub quantity: i64,
}

impl From<&LineItem> for OrderItem {
    fn from(item: &LineItem) -> Self {
        Self {
            product_id: item.product_id.clone(),
            product_name: item.product_name.clone(),
            price: item.price.to_decimal(),
            image: item.image.clone().unwrap_or_default(),
            quantity: item.quantity,
        }
    }
}

/// Body of `POST /orders`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    pub user_id: UserId,
    pub customer_name: String,
    pub items: Vec<OrderItem>,
    /// Cart subtotal before the coupon.
    pub total_price: f64,
    pub discount_amount: f64,
    /// Present only when a discount applies.
    pub coupon_code: Option<String>,
    pub shipping_address: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub payment_method: PaymentMethod,
    /// Receipt as a data URL.
    pub payment_screenshot: Option<String>,
}

impl OrderRequest {
    /// Build a request from the current cart.
    pub fn build(
        user_id: UserId,
        cart: &Cart,
        summary: &CartSummary,
        customer: &CustomerInfo,
        payment_method: PaymentMethod,
        screenshot: Option<&PaymentScreenshot>,
    ) -> Self {
        Self {
            user_id,
            customer_name: customer.name.trim().to_string(),
            items: cart.items().iter().map(OrderItem::from).collect(),
            total_price: summary.subtotal.to_decimal(),
            discount_amount: summary.discount.to_decimal(),
            coupon_code: summary.coupon_code.clone(),
            shipping_address: customer.shipping_address.trim().to_string(),
            customer_email: customer.email.trim().to_string(),
            customer_phone: customer.phone.trim().to_string(),
            payment_method,
            payment_screenshot: screenshot.map(|s| s.data_url.clone()),
        }
    }
}

/// Response of `POST /orders`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub order_id: Option<OrderId>,
    /// Created order as the backend describes it.
    #[serde(default)]
    pub order: Option<serde_json::Value>,
    #[serde(default)]
    pub error: Option<String>,
}

impl OrderResponse {
    /// A successful response.
    pub fn accepted(order_id: OrderId) -> Self {
        Self {
            success: true,
            order_id: Some(order_id),
            ..Default::default()
        }
    }

    /// A refusal with a message.
    pub fn rejected(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
            ..Default::default()
        }
    }

    /// Order id, falling back to the `_id` of the embedded order.
    pub fn resolved_order_id(&self) -> Option<OrderId> {
        self.order_id.clone().or_else(|| {
            self.order
                .as_ref()
                .and_then(|o| o.get("_id").or_else(|| o.get("id")))
                .and_then(|v| v.as_str())
                .map(OrderId::new)
        })
    }
}

/// What the confirmation page shows after a successful order.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct OrderConfirmation {
    pub order_id: Option<OrderId>,
    pub order: Option<serde_json::Value>,
    /// Totals as they were when the order was placed.
    pub summary: CartSummary,
    pub payment_method: PaymentMethod,
}
