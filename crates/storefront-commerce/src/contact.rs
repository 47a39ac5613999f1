//! Contact page form.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::chat::SendReceipt;
use crate::checkout::is_valid_email;
use crate::error::CommerceError;

/// Shown after the backend accepts a message.
pub const CONTACT_SENT: &str = "Message sent! We will get back to you soon.";

/// Shown when the message could not be delivered.
pub const CONTACT_FAILED: &str = "Error sending message. Please try again.";

/// Body of `POST /contact`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub phone: String,
    pub subject: String,
    pub message: String,
}

impl ContactForm {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        subject: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            phone: String::new(),
            subject: subject.into(),
            message: message.into(),
        }
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = phone.into();
        self
    }

    pub fn validate(&self) -> Result<(), CommerceError> {
        if self.name.trim().is_empty() {
            return Err(CommerceError::validation("Name is required"));
        }
        if self.email.trim().is_empty() {
            return Err(CommerceError::validation("Email is required"));
        }
        if !is_valid_email(self.email.trim()) {
            return Err(CommerceError::validation("Email address is invalid"));
        }
        if self.subject.trim().is_empty() {
            return Err(CommerceError::validation("Subject is required"));
        }
        if self.message.trim().is_empty() {
            return Err(CommerceError::validation("Message is required"));
        }
        Ok(())
    }

    pub fn is_blank(&self) -> bool {
        *self == Self::default()
    }
}

/// Backend contact endpoint.
#[async_trait]
pub trait ContactGateway: Send + Sync {
    async fn submit(&self, form: &ContactForm) -> Result<SendReceipt, CommerceError>;
}

/// Submits contact forms.
pub struct ContactService<G> {
    gateway: G,
}

impl<G: ContactGateway> ContactService<G> {
    pub fn new(gateway: G) -> Self {
        Self { gateway }
    }

    /// Validate and send the form. The form is reset only when the backend
    /// confirms delivery; otherwise the customer keeps what they typed.
    pub async fn submit(&self, form: &mut ContactForm) -> Result<(), CommerceError> {
        form.validate()?;

        match self.gateway.submit(form).await {
            Ok(receipt) if receipt.success => {
                info!(subject = %form.subject, "contact message sent");
                *form = ContactForm::default();
                Ok(())
            }
            Ok(receipt) => {
                let error = receipt.error.unwrap_or_else(|| CONTACT_FAILED.to_string());
                warn!(error = %error, "contact message rejected");
                Err(CommerceError::Gateway(error))
            }
            Err(e) => {
                warn!(error = %e, "contact message failed");
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FakeContact {
        accept: bool,
    }

    #[async_trait]
    impl ContactGateway for FakeContact {
        async fn submit(&self, _form: &ContactForm) -> Result<SendReceipt, CommerceError> {
            Ok(SendReceipt {
                success: self.accept,
                error: None,
            })
        }
    }

    fn form() -> ContactForm {
        ContactForm::new("Sara", "sara@example.com", "Order", "Where is my order?")
    }

    #[test]
    fn test_validation() {
        assert!(form().validate().is_ok());
        assert!(form().with_phone("0300").validate().is_ok());

        let mut missing = form();
        missing.subject = "  ".to_string();
        assert_eq!(
            missing.validate(),
            Err(CommerceError::validation("Subject is required"))
        );

        let mut bad_email = form();
        bad_email.email = "sara".to_string();
        assert!(bad_email.validate().is_err());
    }

    #[test]
    fn test_phone_omitted_when_empty() {
        let json = serde_json::to_value(form()).unwrap();
        assert!(json.get("phone").is_none());
        assert_eq!(json["subject"], "Order");
    }

    #[tokio::test]
    async fn test_success_resets_form() {
        let service = ContactService::new(FakeContact { accept: true });
        let mut form = form();

        service.submit(&mut form).await.unwrap();
        assert!(form.is_blank());
    }

    #[tokio::test]
    async fn test_failure_keeps_form() {
        let service = ContactService::new(FakeContact { accept: false });
        let mut form = form();

        let err = service.submit(&mut form).await.unwrap_err();
        assert_eq!(err, CommerceError::Gateway(CONTACT_FAILED.to_string()));
        assert_eq!(form.name, "Sara");
    }
}
