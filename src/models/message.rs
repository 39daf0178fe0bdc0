use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::attachment::{Attachment, AttachmentKind};
use super::role::Role;

/// One turn in a conversation. Immutable once dispatched; a turn is only ever
/// superseded by appending a new one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub created: i64,
    pub content: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub files: Vec<Attachment>,
}

impl Message {
    /// Create a new user message with the current timestamp
    pub fn user() -> Self {
        Message {
            role: Role::User,
            created: Utc::now().timestamp(),
            content: String::new(),
            files: Vec::new(),
        }
    }

    /// Create a new assistant message with the current timestamp
    pub fn assistant() -> Self {
        Message {
            role: Role::Assistant,
            created: Utc::now().timestamp(),
            content: String::new(),
            files: Vec::new(),
        }
    }

    /// Set the text content of the message
    pub fn with_text<S: Into<String>>(mut self, text: S) -> Self {
        self.content = text.into();
        self
    }

    /// Attach a file to the message
    pub fn with_file(mut self, file: Attachment) -> Self {
        self.files.push(file);
        self
    }

    /// Whether any attachment classifies as the given kind
    pub fn has_attachment(&self, kind: AttachmentKind) -> bool {
        self.files.iter().any(|f| f.kind() == kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let message = Message::user()
            .with_text("hello")
            .with_file(Attachment::url("a.png", None, "https://x/a.png"));

        assert_eq!(message.role, Role::User);
        assert_eq!(message.content, "hello");
        assert_eq!(message.files.len(), 1);
        assert!(message.has_attachment(AttachmentKind::Image));
        assert!(!message.has_attachment(AttachmentKind::Audio));
    }

    #[test]
    fn test_serialization_roles() {
        let message = Message::assistant().with_text("hi");
        let value = serde_json::to_value(&message).unwrap();
        assert_eq!(value["role"], "assistant");
        assert_eq!(value["content"], "hi");
        // empty files are omitted from the wire form
        assert!(value.get("files").is_none());
    }
}
