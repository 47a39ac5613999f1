//! CLI configuration.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use storefront_commerce::cart::{Coupon, CouponBook};
use storefront_commerce::checkout::{PaymentAccount, PaymentMethod};
use storefront_commerce::{Currency, UserId};

/// Environment variable that overrides `api.base_url`.
pub const BASE_URL_ENV: &str = "STOREFRONT_API_BASE_URL";

/// Config file names, in lookup order.
pub const CONFIG_FILE_NAMES: [&str; 3] = ["storefront.toml", ".storefront.toml", "storefront.json"];

/// CLI configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CliConfig {
    /// Backend connection.
    #[serde(default)]
    pub api: ApiConfig,

    /// Shop settings.
    #[serde(default)]
    pub store: StoreConfig,

    /// Payment instructions.
    #[serde(default)]
    pub payment: PaymentConfig,
}

impl CliConfig {
    /// Load config from a file.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path))?;

        let config: Self = if path.ends_with(".json") {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config: {}", path))?
        } else {
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse TOML config: {}", path))?
        };
        Ok(config)
    }

    /// Apply environment overrides.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(url) = std::env::var(BASE_URL_ENV) {
            if !url.trim().is_empty() {
                self.api.base_url = url.trim().to_string();
            }
        }
        self
    }

    /// Shop currency.
    pub fn currency(&self) -> Result<Currency> {
        match Currency::from_code(&self.store.currency) {
            Some(currency) => Ok(currency),
            None => bail!("Unknown currency: {}", self.store.currency),
        }
    }

    /// Coupons accepted at checkout.
    pub fn coupon_book(&self) -> CouponBook {
        CouponBook::from_coupons(self.store.coupons.iter().cloned())
    }

    /// Account details for a transfer method, if configured.
    pub fn account_for(&self, method: PaymentMethod) -> Option<&PaymentAccount> {
        self.payment.accounts.iter().find(|a| a.method == method)
    }

    /// Collect configuration problems as (errors, warnings).
    pub fn check(&self) -> (Vec<String>, Vec<String>) {
        let mut errors = Vec::new();
        let mut warnings = Vec::new();

        if !self.api.base_url.starts_with("http://") && !self.api.base_url.starts_with("https://") {
            errors.push(format!(
                "api.base_url '{}' must be an http(s) URL",
                self.api.base_url
            ));
        }
        if self.api.user_id.trim().is_empty() {
            errors.push("api.user_id must not be empty".to_string());
        }
        if self.api.timeout_secs == 0 {
            warnings.push("api.timeout_secs is 0, requests will not time out".to_string());
        }

        if Currency::from_code(&self.store.currency).is_none() {
            errors.push(format!("store.currency '{}' is not supported", self.store.currency));
        }

        for (i, coupon) in self.store.coupons.iter().enumerate() {
            if coupon.code.trim().is_empty() {
                errors.push(format!("store.coupons[{}].code is required", i));
            }
            if !(0.0..=100.0).contains(&coupon.percent_off) {
                errors.push(format!("store.coupons[{}].percent_off must be 0-100", i));
            }
        }

        for method in [
            PaymentMethod::OnlineTransfer,
            PaymentMethod::EasyPaisa,
            PaymentMethod::JazzCash,
        ] {
            if self.account_for(method).is_none() {
                warnings.push(format!(
                    "no payment account configured for {}",
                    method.as_str()
                ));
            }
        }

        (errors, warnings)
    }
}

/// Backend connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// API root, e.g. `http://localhost:5000/api`.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// User the cart and orders belong to.
    #[serde(default = "default_user_id")]
    pub user_id: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Accept everything locally instead of calling the backend.
    #[serde(default)]
    pub offline: bool,
}

fn default_base_url() -> String {
    "http://localhost:5000/api".to_string()
}

fn default_user_id() -> String {
    UserId::guest().into_inner()
}

fn default_timeout() -> u64 {
    30
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            user_id: default_user_id(),
            timeout_secs: default_timeout(),
            offline: false,
        }
    }
}

/// Shop settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// ISO currency code prices are quoted in.
    #[serde(default = "default_currency")]
    pub currency: String,

    /// Coupons accepted at checkout.
    #[serde(default = "default_coupons")]
    pub coupons: Vec<Coupon>,
}

fn default_currency() -> String {
    Currency::PKR.code().to_string()
}

fn default_coupons() -> Vec<Coupon> {
    CouponBook::default().coupons().to_vec()
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            currency: default_currency(),
            coupons: default_coupons(),
        }
    }
}

/// Payment instructions shown for transfer methods.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentConfig {
    #[serde(default)]
    pub accounts: Vec<PaymentAccount>,
}

impl Default for PaymentConfig {
    fn default() -> Self {
        Self {
            accounts: vec![
                PaymentAccount::new(PaymentMethod::OnlineTransfer, "Bank Account", "0302-0060496"),
                PaymentAccount::new(PaymentMethod::EasyPaisa, "EasyPaisa", "0302-0060496"),
                PaymentAccount::new(PaymentMethod::JazzCash, "JazzCash", "0302-0060496"),
            ],
        }
    }
}

/// Generate a default storefront.toml config file.
pub fn generate_default_config() -> String {
    r#"# Storefront CLI configuration

[api]
base_url = "http://localhost:5000/api"
user_id = "guest"
timeout_secs = 30
# Accept orders locally without a backend
offline = false

[store]
currency = "PKR"

[[store.coupons]]
code = "GNSONS20"
percent_off = 20.0
description = "20% off your order"

[[payment.accounts]]
method = "ONLINE_TRANSFER"
name = "Bank Account"
number = "0302-0060496"

[[payment.accounts]]
method = "EASYPAISA"
name = "EasyPaisa"
number = "0302-0060496"

[[payment.accounts]]
method = "JAZZCASH"
name = "JazzCash"
number = "0302-0060496"
"#
    .to_string()
}
