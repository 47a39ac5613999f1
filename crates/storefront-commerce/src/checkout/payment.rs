//! Payment methods and transfer receipts.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::error::CommerceError;

/// Largest accepted receipt screenshot.
pub const MAX_SCREENSHOT_BYTES: u64 = 5 * 1024 * 1024;

/// Image types accepted for receipt screenshots.
pub const ALLOWED_SCREENSHOT_TYPES: [&str; 4] =
    ["image/jpeg", "image/png", "image/jpg", "image/webp"];

/// How the customer pays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum PaymentMethod {
    /// Cash on delivery.
    #[default]
    #[serde(rename = "COD")]
    Cod,
    /// Bank transfer.
    #[serde(rename = "ONLINE_TRANSFER")]
    OnlineTransfer,
    /// EasyPaisa mobile wallet.
    #[serde(rename = "EASYPAISA")]
    EasyPaisa,
    /// JazzCash mobile wallet.
    #[serde(rename = "JAZZCASH")]
    JazzCash,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cod => "COD",
            PaymentMethod::OnlineTransfer => "ONLINE_TRANSFER",
            PaymentMethod::EasyPaisa => "EASYPAISA",
            PaymentMethod::JazzCash => "JAZZCASH",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            PaymentMethod::Cod => "Cash on Delivery (COD)",
            PaymentMethod::OnlineTransfer => "Bank Account",
            PaymentMethod::EasyPaisa => "EasyPaisa",
            PaymentMethod::JazzCash => "JazzCash",
        }
    }

    /// Parse a wire code. Accepts `BANK` for the bank transfer tab.
    pub fn from_code(code: &str) -> Option<Self> {
        match code.to_uppercase().as_str() {
            "COD" => Some(PaymentMethod::Cod),
            "ONLINE_TRANSFER" | "BANK" => Some(PaymentMethod::OnlineTransfer),
            "EASYPAISA" => Some(PaymentMethod::EasyPaisa),
            "JAZZCASH" => Some(PaymentMethod::JazzCash),
            _ => None,
        }
    }

    /// Whether the customer sends money ahead and may attach a receipt.
    pub fn is_transfer(&self) -> bool {
        !matches!(self, PaymentMethod::Cod)
    }
}

/// Account details shown for a transfer method.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PaymentAccount {
    /// Method this account receives.
    pub method: PaymentMethod,
    /// Display name, e.g. "Bank Account".
    pub name: String,
    /// Account or wallet number.
    pub number: String,
}

impl PaymentAccount {
    /// Create an account entry.
    pub fn new(method: PaymentMethod, name: impl Into<String>, number: impl Into<String>) -> Self {
        Self {
            method,
            name: name.into(),
            number: number.into(),
        }
    }
}

/// A payment receipt image attached to an order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PaymentScreenshot {
    /// Original file name.
    pub file_name: String,
    /// MIME type.
    pub content_type: String,
    /// Size of the decoded file.
    pub size_bytes: u64,
    /// `data:<type>;base64,<payload>` URL sent to the backend.
    pub data_url: String,
}

impl PaymentScreenshot {
    /// Validate and encode an image file.
    pub fn from_bytes(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: &[u8],
    ) -> Result<Self, CommerceError> {
        let content_type = content_type.into();
        let size_bytes = bytes.len() as u64;
        validate_screenshot(&content_type, size_bytes)?;
        let data_url = format!("data:{};base64,{}", content_type, STANDARD.encode(bytes));
        Ok(Self {
            file_name: file_name.into(),
            content_type,
            size_bytes,
            data_url,
        })
    }

    /// Re-check type and size.
    pub fn validate(&self) -> Result<(), CommerceError> {
        validate_screenshot(&self.content_type, self.size_bytes)
    }

    /// Guess the MIME type from a file extension.
    pub fn content_type_for(file_name: &str) -> Option<&'static str> {
        let ext = file_name.rsplit_once('.')?.1.to_lowercase();
        match ext.as_str() {
            "jpg" | "jpeg" => Some("image/jpeg"),
            "png" => Some("image/png"),
            "webp" => Some("image/webp"),
            _ => None,
        }
    }
}

fn validate_screenshot(content_type: &str, size_bytes: u64) -> Result<(), CommerceError> {
    if !ALLOWED_SCREENSHOT_TYPES.contains(&content_type) {
        return Err(CommerceError::InvalidScreenshot(
            "Please upload a valid image file (JPG, PNG, WebP)".to_string(),
        ));
    }
    if size_bytes > MAX_SCREENSHOT_BYTES {
        return Err(CommerceError::InvalidScreenshot(
            "Image size must be less than 5MB".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payment_method_wire_codes() {
        assert_eq!(serde_json::to_string(&PaymentMethod::Cod).unwrap(), "\"COD\"");
        assert_eq!(
            serde_json::to_string(&PaymentMethod::EasyPaisa).unwrap(),
            "\"EASYPAISA\""
        );
        assert_eq!(PaymentMethod::from_code("bank"), Some(PaymentMethod::OnlineTransfer));
        assert_eq!(PaymentMethod::from_code("cheque"), None);
        assert!(!PaymentMethod::default().is_transfer());
    }

    #[test]
    fn test_screenshot_encoding() {
        let shot = PaymentScreenshot::from_bytes("receipt.png", "image/png", b"abc").unwrap();
        assert_eq!(shot.data_url, "data:image/png;base64,YWJj");
        assert_eq!(shot.size_bytes, 3);
    }

    #[test]
    fn test_screenshot_rejects_wrong_type() {
        let err = PaymentScreenshot::from_bytes("receipt.gif", "image/gif", b"abc").unwrap_err();
        assert!(matches!(err, CommerceError::InvalidScreenshot(_)));
    }

    #[test]
    fn test_screenshot_size_limit() {
        let exact = vec![0u8; MAX_SCREENSHOT_BYTES as usize];
        assert!(PaymentScreenshot::from_bytes("a.jpg", "image/jpeg", &exact).is_ok());

        let too_big = vec![0u8; MAX_SCREENSHOT_BYTES as usize + 1];
        assert!(PaymentScreenshot::from_bytes("a.jpg", "image/jpeg", &too_big).is_err());
    }

    #[test]
    fn test_content_type_for() {
        assert_eq!(PaymentScreenshot::content_type_for("a.JPG"), Some("image/jpeg"));
        assert_eq!(PaymentScreenshot::content_type_for("a.webp"), Some("image/webp"));
        assert_eq!(PaymentScreenshot::content_type_for("a.bmp"), None);
        assert_eq!(PaymentScreenshot::content_type_for("noext"), None);
    }
}
