//! Backend gateways used by the CLI.
//!
//! [`HttpGateway`] talks JSON to the storefront API. [`OfflineGateway`]
//! accepts everything locally so sessions can be replayed without a backend.

use std::time::Duration;

use anyhow::{Context as _, Result};
use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::debug;

use storefront_commerce::cart::{CartCommand, CartGateway};
use storefront_commerce::chat::{ChatGateway, ChatMessage, SendReceipt};
use storefront_commerce::checkout::{OrderGateway, OrderRequest, OrderResponse};
use storefront_commerce::contact::{ContactForm, ContactGateway};
use storefront_commerce::{CommerceError, OrderId, UserId};

use crate::config::ApiConfig;

/// Gateway selected by the configuration.
#[derive(Clone)]
pub enum Gateway {
    Http(HttpGateway),
    Offline(OfflineGateway),
}

impl Gateway {
    /// Build the gateway described by `api`.
    pub fn from_config(api: &ApiConfig) -> Result<Self> {
        if api.offline {
            Ok(Gateway::Offline(OfflineGateway))
        } else {
            Ok(Gateway::Http(HttpGateway::new(&api.base_url, api.timeout_secs)?))
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Gateway::Http(http) => http.base_url.clone(),
            Gateway::Offline(_) => "offline".to_string(),
        }
    }
}

/// JSON client for the storefront API.
#[derive(Clone)]
pub struct HttpGateway {
    client: Client,
    base_url: String,
}

impl HttpGateway {
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self> {
        let mut builder = Client::builder();
        if timeout_secs > 0 {
            builder = builder.timeout(Duration::from_secs(timeout_secs));
        }
        let client = builder.build().context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// POST a JSON body and return the status and decoded JSON reply.
    async fn post(&self, path: &str, body: Option<&Value>) -> Result<(u16, Value), CommerceError> {
        let url = self.url(path);
        debug!(%url, "POST");

        let mut request = self.client.post(&url);
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = request
            .send()
            .await
            .map_err(|e| CommerceError::gateway(format!("{}: {}", url, e)))?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| CommerceError::gateway(format!("{}: {}", url, e)))?;
        let value = if text.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text).map_err(|_| {
                CommerceError::gateway(format!("{} returned HTTP {} with a non-JSON body", url, status))
            })?
        };
        Ok((status, value))
    }
}

fn is_success(status: u16) -> bool {
    (200..300).contains(&status)
}

fn to_value<T: Serialize>(body: &T) -> Result<Value, CommerceError> {
    Ok(serde_json::to_value(body)?)
}

fn error_field(value: &Value) -> Option<String> {
    value
        .get("error")
        .or_else(|| value.get("message"))
        .and_then(|v| v.as_str())
        .map(str::to_string)
}

/// Path and body of the cart endpoint for a command.
pub fn cart_request(user_id: &UserId, command: &CartCommand) -> (String, Option<Value>) {
    match command {
        CartCommand::Add { product, quantity } => (
            "/cart/add".to_string(),
            Some(json!({ "userId": user_id, "productId": product.id, "quantity": quantity })),
        ),
        CartCommand::Remove { product_id } => (
            "/cart/remove".to_string(),
            Some(json!({ "userId": user_id, "productId": product_id })),
        ),
        CartCommand::UpdateQuantity {
            product_id,
            quantity,
        } => (
            "/cart/update".to_string(),
            Some(json!({ "userId": user_id, "productId": product_id, "quantity": quantity })),
        ),
        CartCommand::Clear => (format!("/cart/clear/{}", user_id), None),
    }
}

/// Order reply of any status; the body decides success, so a 4xx with
/// `{success: false, error}` is a refusal rather than a transport error.
fn order_outcome(status: u16, value: Value) -> Result<OrderResponse, CommerceError> {
    serde_json::from_value::<OrderResponse>(value).map_err(|_| {
        CommerceError::gateway(format!("unexpected order response (HTTP {})", status))
    })
}

/// A cart change went through on 2xx unless the body says `success: false`.
fn cart_outcome(status: u16, value: &Value) -> Result<(), CommerceError> {
    let refused = value.get("success").and_then(|v| v.as_bool()) == Some(false);
    if is_success(status) && !refused {
        return Ok(());
    }
    Err(CommerceError::gateway(
        error_field(value).unwrap_or_else(|| format!("cart update failed (HTTP {})", status)),
    ))
}

fn chat_receipt(status: u16, value: &Value) -> SendReceipt {
    if !is_success(status) {
        return SendReceipt {
            success: false,
            error: error_field(value),
        };
    }
    // A 2xx reply without a `success` flag still counts as delivered.
    SendReceipt {
        success: value.get("success").and_then(|v| v.as_bool()).unwrap_or(true),
        error: error_field(value),
    }
}

fn contact_receipt(status: u16, value: Value) -> SendReceipt {
    if !is_success(status) {
        return SendReceipt {
            success: false,
            error: error_field(&value),
        };
    }
    serde_json::from_value(value).unwrap_or_default()
}

#[async_trait]
impl OrderGateway for HttpGateway {
    async fn create_order(&self, request: &OrderRequest) -> Result<OrderResponse, CommerceError> {
        let (status, value) = self.post("/orders", Some(&to_value(request)?)).await?;
        order_outcome(status, value)
    }
}

#[async_trait]
impl CartGateway for HttpGateway {
    async fn push(&self, user_id: &UserId, command: &CartCommand) -> Result<(), CommerceError> {
        let (path, body) = cart_request(user_id, command);
        let (status, value) = self.post(&path, body.as_ref()).await?;
        cart_outcome(status, &value)
    }
}

#[async_trait]
impl ChatGateway for HttpGateway {
    async fn send_message(&self, message: &ChatMessage) -> Result<SendReceipt, CommerceError> {
        let (status, value) = self.post("/chat/send", Some(&to_value(message)?)).await?;
        Ok(chat_receipt(status, &value))
    }
}

#[async_trait]
impl ContactGateway for HttpGateway {
    async fn submit(&self, form: &ContactForm) -> Result<SendReceipt, CommerceError> {
        let (status, value) = self.post("/contact", Some(&to_value(form)?)).await?;
        Ok(contact_receipt(status, value))
    }
}

/// Accepts every request without a backend. Order ids are derived from
/// the local clock.
#[derive(Clone, Copy, Default)]
pub struct OfflineGateway;

impl OfflineGateway {
    fn order_id() -> OrderId {
        OrderId::new(format!("offline-{}", Utc::now().format("%Y%m%d%H%M%S%3f")))
    }
}

#[async_trait]
impl OrderGateway for OfflineGateway {
    async fn create_order(&self, request: &OrderRequest) -> Result<OrderResponse, CommerceError> {
        let order_id = Self::order_id();
        debug!(%order_id, items = request.items.len(), "order accepted offline");
        Ok(OrderResponse::accepted(order_id))
    }
}

#[async_trait]
impl CartGateway for OfflineGateway {
    async fn push(&self, _user_id: &UserId, command: &CartCommand) -> Result<(), CommerceError> {
        debug!(?command, "cart change accepted offline");
        Ok(())
    }
}

#[async_trait]
impl ChatGateway for OfflineGateway {
    async fn send_message(&self, _message: &ChatMessage) -> Result<SendReceipt, CommerceError> {
        Ok(SendReceipt {
            success: true,
            error: None,
        })
    }
}

#[async_trait]
impl ContactGateway for OfflineGateway {
    async fn submit(&self, _form: &ContactForm) -> Result<SendReceipt, CommerceError> {
        Ok(SendReceipt {
            success: true,
            error: None,
        })
    }
}

#[async_trait]
impl OrderGateway for Gateway {
    async fn create_order(&self, request: &OrderRequest) -> Result<OrderResponse, CommerceError> {
        match self {
            Gateway::Http(http) => http.create_order(request).await,
            Gateway::Offline(offline) => offline.create_order(request).await,
        }
    }
}

#[async_trait]
impl CartGateway for Gateway {
    async fn push(&self, user_id: &UserId, command: &CartCommand) -> Result<(), CommerceError> {
        match self {
            Gateway::Http(http) => http.push(user_id, command).await,
            Gateway::Offline(offline) => offline.push(user_id, command).await,
        }
    }
}

#[async_trait]
impl ChatGateway for Gateway {
    async fn send_message(&self, message: &ChatMessage) -> Result<SendReceipt, CommerceError> {
        match self {
            Gateway::Http(http) => http.send_message(message).await,
            Gateway::Offline(offline) => offline.send_message(message).await,
        }
    }
}

#[async_trait]
impl ContactGateway for Gateway {
    async fn submit(&self, form: &ContactForm) -> Result<SendReceipt, CommerceError> {
        match self {
            Gateway::Http(http) => http.submit(form).await,
            Gateway::Offline(offline) => offline.submit(form).await,
        }
    }
}
