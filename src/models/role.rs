use serde::{Deserialize, Serialize};

/// The author of a conversation turn.
///
/// `System` is only ever synthesized by the router when it composes the
/// instruction prompt; it never appears in stored user input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}
