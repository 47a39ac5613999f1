//! Session scripts.
//!
//! A script lists the products on offer and the actions a shopper takes:
//!
//! ```toml
//! [[products]]
//! id = "p1"
//! name = "Watch"
//! price = 1000.0
//!
//! [[actions]]
//! action = "add"
//! product = "p1"
//! quantity = 2
//! ```

use std::collections::HashSet;

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use storefront_commerce::catalog::{ProductRecord, ProductRef};
use storefront_commerce::checkout::CustomerInfo;
use storefront_commerce::contact::ContactForm;
use storefront_commerce::{Currency, ProductId};

/// A parsed session script.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionScript {
    /// Overrides `api.user_id` for this session.
    #[serde(default)]
    pub user_id: Option<String>,

    /// Products the actions may refer to.
    #[serde(default)]
    pub products: Vec<ProductRecord>,

    /// Details used by `checkout`.
    #[serde(default)]
    pub customer: Option<CustomerInfo>,

    #[serde(default)]
    pub actions: Vec<Action>,
}

/// One shopper action.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    Add {
        product: String,
        #[serde(default = "one")]
        quantity: i64,
    },
    Remove {
        product: String,
    },
    Update {
        product: String,
        quantity: i64,
    },
    Clear,
    Open,
    Close,
    Coupon {
        code: String,
    },
    Checkout {
        /// Payment method code, e.g. `COD` or `JAZZCASH`.
        #[serde(default)]
        payment: Option<String>,
        /// Receipt image for transfer payments.
        #[serde(default)]
        screenshot: Option<String>,
        #[serde(default = "yes")]
        accept_terms: bool,
    },
    Chat {
        name: String,
        message: String,
    },
    Contact(ContactForm),
}

fn one() -> i64 {
    1
}

fn yes() -> bool {
    true
}

impl Action {
    /// Short label for progress output.
    pub fn label(&self) -> String {
        match self {
            Action::Add { product, quantity } => format!("add {} x{}", product, quantity),
            Action::Remove { product } => format!("remove {}", product),
            Action::Update { product, quantity } => format!("update {} -> {}", product, quantity),
            Action::Clear => "clear cart".to_string(),
            Action::Open => "open cart".to_string(),
            Action::Close => "close cart".to_string(),
            Action::Coupon { code } => format!("apply coupon {}", code),
            Action::Checkout { payment, .. } => {
                format!("checkout ({})", payment.as_deref().unwrap_or("COD"))
            }
            Action::Chat { .. } => "send chat message".to_string(),
            Action::Contact(form) => format!("contact: {}", form.subject),
        }
    }

    fn product(&self) -> Option<&str> {
        match self {
            Action::Add { product, .. }
            | Action::Remove { product }
            | Action::Update { product, .. } => Some(product),
            _ => None,
        }
    }
}

impl SessionScript {
    /// Read and check a script file.
    pub fn load(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read session script: {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("Invalid session script: {}", path.display()))
    }

    /// Parse and check script text.
    pub fn parse(content: &str) -> Result<Self> {
        let script: Self = toml::from_str(content)?;
        script.check()?;
        Ok(script)
    }

    fn check(&self) -> Result<()> {
        let mut ids = HashSet::new();
        for product in &self.products {
            if !ids.insert(product.id.as_str()) {
                bail!("product '{}' is listed twice", product.id);
            }
            if product.price < 0.0 {
                bail!("product '{}' has a negative price", product.id);
            }
        }

        for (i, action) in self.actions.iter().enumerate() {
            if let Some(product) = action.product() {
                if !ids.contains(product) {
                    bail!("actions[{}] refers to unknown product '{}'", i, product);
                }
            }
            if matches!(action, Action::Checkout { .. }) && self.customer.is_none() {
                bail!("actions[{}] is a checkout but the script has no [customer]", i);
            }
        }
        Ok(())
    }

    /// Products priced in `currency`.
    pub fn catalog(&self, currency: Currency) -> Vec<ProductRef> {
        self.products
            .iter()
            .cloned()
            .map(|record| record.into_product(currency))
            .collect()
    }
}

/// Look up a product in a catalog.
pub fn find_product<'a>(catalog: &'a [ProductRef], id: &str) -> Option<&'a ProductRef> {
    let id = ProductId::new(id);
    catalog.iter().find(|p| p.id == id)
}
