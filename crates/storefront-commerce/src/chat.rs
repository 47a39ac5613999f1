//! Customer support chat widget.
//!
//! Messages are shown as soon as they are typed and taken back out if the
//! backend does not accept them.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::CommerceError;
use crate::ids::{ConversationId, MessageId};

/// Recipient of every customer message.
pub const SUPPORT_RECIPIENT: &str = "admin";

/// A chat message in the widget.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    /// Client-side id, used to take a failed message back out.
    #[serde(skip_serializing)]
    #[serde(default = "placeholder_message_id")]
    pub id: MessageId,
    pub sender_id: String,
    pub sender_name: String,
    pub message: String,
    pub recipient_id: String,
    pub conversation_id: ConversationId,
    pub timestamp: DateTime<Utc>,
    /// Sent by this customer rather than received.
    #[serde(skip)]
    pub is_own: bool,
}

fn placeholder_message_id() -> MessageId {
    MessageId::new("remote")
}

/// Backend acknowledgement of a chat message.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SendReceipt {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
}

/// Backend chat endpoint.
#[async_trait]
pub trait ChatGateway: Send + Sync {
    async fn send_message(&self, message: &ChatMessage) -> Result<SendReceipt, CommerceError>;
}

/// State of one chat widget.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatSession {
    conversation_id: ConversationId,
    customer_name: String,
    messages: Vec<ChatMessage>,
    error: Option<String>,
    is_open: bool,
    next_message: u64,
}

impl ChatSession {
    /// Start a session; the conversation id is derived from the current time.
    pub fn new() -> Self {
        Self::with_conversation(ConversationId::for_customer(Utc::now().timestamp_millis()))
    }

    /// Start a session with a known conversation id.
    pub fn with_conversation(conversation_id: ConversationId) -> Self {
        Self {
            conversation_id,
            customer_name: String::new(),
            messages: Vec::new(),
            error: None,
            is_open: false,
            next_message: 0,
        }
    }

    pub fn conversation_id(&self) -> &ConversationId {
        &self.conversation_id
    }

    pub fn customer_name(&self) -> &str {
        &self.customer_name
    }

    pub fn set_customer_name(&mut self, name: impl Into<String>) {
        self.customer_name = name.into();
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Last send error, shown under the input.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    pub fn toggle_open(&mut self) {
        self.is_open = !self.is_open;
    }

    /// Send a message, showing it immediately.
    ///
    /// Blank input or a blank name is refused without contacting the
    /// backend. If the backend fails or refuses, the message is removed
    /// again and the error is kept for display.
    pub async fn send<G: ChatGateway + ?Sized>(
        &mut self,
        text: &str,
        gateway: &G,
    ) -> Result<(), CommerceError> {
        if text.trim().is_empty() {
            return Err(self.fail("Please enter a message"));
        }
        if self.customer_name.trim().is_empty() {
            return Err(self.fail("Please enter your name"));
        }
        self.error = None;

        let message = ChatMessage {
            id: MessageId::new(format!("{}-{}", self.conversation_id, self.next_message)),
            sender_id: self.conversation_id.to_string(),
            sender_name: self.customer_name.clone(),
            message: text.to_string(),
            recipient_id: SUPPORT_RECIPIENT.to_string(),
            conversation_id: self.conversation_id.clone(),
            timestamp: Utc::now(),
            is_own: true,
        };
        self.next_message += 1;
        let id = message.id.clone();
        self.messages.push(message.clone());

        let outcome = match gateway.send_message(&message).await {
            Ok(receipt) if receipt.success => Ok(()),
            Ok(receipt) => Err(CommerceError::ChatRejected(
                receipt
                    .error
                    .unwrap_or_else(|| "Failed to send message".to_string()),
            )),
            Err(e) => Err(e),
        };

        match outcome {
            Ok(()) => {
                debug!(conversation_id = %self.conversation_id, "chat message sent");
                Ok(())
            }
            Err(e) => {
                warn!(conversation_id = %self.conversation_id, error = %e, "chat message failed");
                self.messages.retain(|m| m.id != id);
                self.error = Some(e.to_string());
                Err(e)
            }
        }
    }

    fn fail(&mut self, msg: &str) -> CommerceError {
        self.error = Some(msg.to_string());
        CommerceError::validation(msg)
    }
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct FakeChat {
        replies: Mutex<Vec<Result<SendReceipt, CommerceError>>>,
        sent: Mutex<Vec<ChatMessage>>,
    }

    impl FakeChat {
        fn replying(replies: Vec<Result<SendReceipt, CommerceError>>) -> Self {
            Self {
                replies: Mutex::new(replies),
                sent: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl ChatGateway for FakeChat {
        async fn send_message(&self, message: &ChatMessage) -> Result<SendReceipt, CommerceError> {
            self.sent.lock().unwrap().push(message.clone());
            self.replies.lock().unwrap().remove(0)
        }
    }

    fn ok() -> Result<SendReceipt, CommerceError> {
        Ok(SendReceipt {
            success: true,
            error: None,
        })
    }

    fn session() -> ChatSession {
        let mut session = ChatSession::with_conversation(ConversationId::for_customer(42));
        session.set_customer_name("Sara");
        session
    }

    #[tokio::test]
    async fn test_successful_send_keeps_message() {
        let gateway = FakeChat::replying(vec![ok()]);
        let mut session = session();

        session.send("Is the watch in stock?", &gateway).await.unwrap();

        assert_eq!(session.messages().len(), 1);
        let msg = &session.messages()[0];
        assert!(msg.is_own);
        assert_eq!(msg.recipient_id, "admin");
        assert_eq!(msg.sender_id, "customer-42");
        assert!(session.error().is_none());
    }

    #[tokio::test]
    async fn test_failed_send_removes_only_that_message() {
        let gateway = FakeChat::replying(vec![
            ok(),
            Ok(SendReceipt {
                success: false,
                error: None,
            }),
        ]);
        let mut session = session();

        session.send("first", &gateway).await.unwrap();
        let err = session.send("second", &gateway).await.unwrap_err();

        assert_eq!(err, CommerceError::ChatRejected("Failed to send message".to_string()));
        assert_eq!(session.messages().len(), 1);
        assert_eq!(session.messages()[0].message, "first");
        assert_eq!(session.error(), Some("Failed to send message"));
    }

    #[tokio::test]
    async fn test_transport_error_rolls_back() {
        let gateway = FakeChat::replying(vec![Err(CommerceError::gateway("offline"))]);
        let mut session = session();

        assert!(session.send("hello", &gateway).await.is_err());
        assert!(session.messages().is_empty());
        assert!(session.error().unwrap().contains("offline"));
    }

    #[tokio::test]
    async fn test_blank_input_is_not_sent() {
        let gateway = FakeChat::replying(vec![]);
        let mut session = session();

        assert!(session.send("   ", &gateway).await.is_err());
        assert_eq!(session.error(), Some("Please enter a message"));

        session.set_customer_name("");
        assert!(session.send("hi", &gateway).await.is_err());
        assert_eq!(session.error(), Some("Please enter your name"));

        assert!(gateway.sent.lock().unwrap().is_empty());
        assert!(session.messages().is_empty());
    }

    #[test]
    fn test_wire_format() {
        let msg = ChatMessage {
            id: MessageId::new("local-1"),
            sender_id: "customer-1".to_string(),
            sender_name: "Sara".to_string(),
            message: "hi".to_string(),
            recipient_id: "admin".to_string(),
            conversation_id: ConversationId::new("customer-1"),
            timestamp: DateTime::from_timestamp(0, 0).unwrap(),
            is_own: true,
        };
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["senderName"], "Sara");
        assert_eq!(json["conversationId"], "customer-1");
        assert!(json.get("id").is_none());
        assert!(json.get("isOwn").is_none());
    }
}
