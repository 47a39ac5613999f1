//! Customer contact and shipping details.

use crate::error::CommerceError;
use serde::{Deserialize, Serialize};

/// Contact information collected on the checkout page.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CustomerInfo {
    /// Full name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// Phone number, free-form.
    pub phone: String,
    /// Complete shipping address as one text block.
    pub shipping_address: String,
}

impl CustomerInfo {
    /// Create customer info.
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        phone: impl Into<String>,
        shipping_address: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            phone: phone.into(),
            shipping_address: shipping_address.into(),
        }
    }

    /// Check every field, reporting the first problem.
    pub fn validate(&self) -> Result<(), CommerceError> {
        if self.name.trim().is_empty() {
            return Err(CommerceError::validation("Full name is required"));
        }
        if self.email.trim().is_empty() {
            return Err(CommerceError::validation("Email is required"));
        }
        if !is_valid_email(self.email.trim()) {
            return Err(CommerceError::validation("Email address is invalid"));
        }
        if self.phone.trim().is_empty() {
            return Err(CommerceError::validation("Phone number is required"));
        }
        if self.shipping_address.trim().is_empty() {
            return Err(CommerceError::validation("Shipping address is required"));
        }
        Ok(())
    }

    /// Check if all fields pass validation.
    pub fn is_complete(&self) -> bool {
        self.validate().is_ok()
    }
}

/// Loose email check: `local@domain.tld`, no whitespace, a single `@`.
pub fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') || email.chars().any(char::is_whitespace) {
        return false;
    }
    let last = domain.len().saturating_sub(1);
    domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i < last)
}
