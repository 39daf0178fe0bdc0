pub mod configs;
pub mod dispatch;
pub mod wire;

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter};

/// The closed set of upstream providers the dispatcher can talk to.
///
/// Adding a variant will not compile until the wire formatter and the
/// dispatcher handle it, which is the point: the router's lexicon table and
/// the dispatcher must stay in sync.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ProviderKind {
    /// Baseline text chat, always configured. Fallback target for degraded
    /// capabilities.
    DeepSeek,
    /// Vision-capable chat (moonshot vision models).
    Kimi,
    /// Image generation, video discussion and audio synthesis.
    OpenAi,
    /// Audio transcription (Doubao ASR).
    Volcengine,
}

impl ProviderKind {
    /// Whether chat completions from this provider arrive as an SSE stream.
    /// Non-streaming providers are called once and their full output is
    /// delivered as a single delta.
    pub fn supports_streaming(&self) -> bool {
        match self {
            ProviderKind::DeepSeek | ProviderKind::Kimi | ProviderKind::OpenAi => true,
            ProviderKind::Volcengine => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_display_names_are_lowercase() {
        assert_eq!(ProviderKind::DeepSeek.to_string(), "deepseek");
        assert_eq!(ProviderKind::Volcengine.to_string(), "volcengine");
    }

    #[test]
    fn test_every_provider_has_a_streaming_answer() {
        // Exhaustiveness canary: iterating must cover all variants without
        // panicking once new providers are added to the match.
        for kind in ProviderKind::iter() {
            let _ = kind.supports_streaming();
        }
    }
}
