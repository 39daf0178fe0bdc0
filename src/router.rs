pub mod lexicon;
pub mod prompt;

use serde::{Deserialize, Serialize};

use crate::credentials::CredentialAvailability;
use crate::errors::RouterError;
use crate::models::attachment::AttachmentKind;
use crate::models::message::Message;
use crate::models::role::Role;
use crate::providers::ProviderKind;
use lexicon::Lexicon;

pub const DEEPSEEK_CHAT: &str = "deepseek-chat";
pub const KIMI_VISION: &str = "moonshot-v1-8k-vision";
pub const OPENAI_VIDEO: &str = "gpt-4o";
pub const OPENAI_AUDIO: &str = "gpt-4o-audio-preview";
pub const OPENAI_IMAGE: &str = "dall-e-3";
pub const DOUBAO_ASR: &str = "doubao-asr";

/// Coarse category of AI task, the unit of routing decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Capability {
    Text,
    Vision,
    Video,
    AudioSynthesis,
    AudioTranscription,
    ImageGeneration,
}

/// Why a decision ended up on the baseline provider instead of the ideal one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Degradation {
    pub reason: String,
    /// Hard degradations (vision) instruct the model to refuse rather than
    /// answer best-effort.
    pub hard: bool,
}

/// Output of the router: which provider and model to call, with what
/// instruction prompt. Computed fresh per user turn, never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteDecision {
    pub provider: ProviderKind,
    pub model: &'static str,
    pub capability: Capability,
    pub system_prompt: String,
    pub degradation: Option<Degradation>,
}

impl RouteDecision {
    pub fn is_degraded(&self) -> bool {
        self.degradation.is_some()
    }
}

/// Selects an upstream provider from message content, attachment types and
/// credential availability.
///
/// `decide` is a pure function of its inputs: no I/O, no shared state, safe
/// to call concurrently for different conversations.
#[derive(Debug, Clone, Default)]
pub struct Router {
    lexicon: Lexicon,
}

impl Router {
    pub fn new(lexicon: Lexicon) -> Self {
        Router { lexicon }
    }

    /// Route one turn. Priority order, first match wins:
    /// audio attachment, image-generation keyword, image attachment,
    /// video keyword, audio keyword, default text.
    pub fn decide(
        &self,
        messages: &[Message],
        page_id: Option<&str>,
        creds: &CredentialAvailability,
    ) -> Result<RouteDecision, RouterError> {
        if !creds.deepseek {
            return Err(RouterError::ConfigurationMissing(
                "DEEPSEEK_API_KEY 未配置。基础文本对话是必需功能，请先配置后重试。".to_string(),
            ));
        }

        let last_user = messages.iter().rev().find(|m| m.role == Role::User);
        let Some(message) = last_user else {
            return Ok(self.default_text(page_id, creds));
        };
        let content = message.content.as_str();

        // 1. Audio attachment: transcription. Checked before keywords so an
        //    uploaded recording always wins over whatever the text says.
        if message.has_attachment(AttachmentKind::Audio) {
            let decision = if creds.volcengine {
                RouteDecision {
                    provider: ProviderKind::Volcengine,
                    model: DOUBAO_ASR,
                    capability: Capability::AudioTranscription,
                    system_prompt: prompt::compose(Capability::AudioTranscription, page_id),
                    degradation: None,
                }
            } else {
                self.soft_fallback(
                    "音频识别功能需要配置 VOLCENGINE_ACCESS_KEY_ID 和 VOLCENGINE_SECRET_ACCESS_KEY，当前将使用文本模式处理您的请求。",
                    page_id,
                )
            };
            return Ok(self.traced(decision));
        }

        // 2. Image-generation keywords
        if self.lexicon.is_image_generation(content) {
            let decision = if creds.openai {
                RouteDecision {
                    provider: ProviderKind::OpenAi,
                    model: OPENAI_IMAGE,
                    capability: Capability::ImageGeneration,
                    system_prompt: prompt::compose(Capability::ImageGeneration, page_id),
                    degradation: None,
                }
            } else {
                self.soft_fallback(
                    "图像生成功能需要配置 OPENAI_API_KEY，当前将为您提供图像创作的文字描述和建议。",
                    page_id,
                )
            };
            return Ok(self.traced(decision));
        }

        // 3. Image attachment: vision. Deliberately does NOT soft-degrade:
        //    answering about an image we cannot see would be misleading, so
        //    the baseline model is told to refuse and ask for configuration.
        if message.has_attachment(AttachmentKind::Image) {
            let decision = if creds.moonshot {
                RouteDecision {
                    provider: ProviderKind::Kimi,
                    model: KIMI_VISION,
                    capability: Capability::Vision,
                    system_prompt: prompt::compose(Capability::Vision, page_id),
                    degradation: None,
                }
            } else {
                let reason =
                    "图片理解功能需要配置 MOONSHOT_API_KEY 或 KIMI_API_KEY，请配置后重试。";
                RouteDecision {
                    provider: ProviderKind::DeepSeek,
                    model: DEEPSEEK_CHAT,
                    capability: Capability::Text,
                    system_prompt: prompt::vision_failure(reason),
                    degradation: Some(Degradation {
                        reason: reason.to_string(),
                        hard: true,
                    }),
                }
            };
            return Ok(self.traced(decision));
        }

        // 4. Video keywords
        if self.lexicon.is_video(content) {
            let decision = if creds.openai {
                RouteDecision {
                    provider: ProviderKind::OpenAi,
                    model: OPENAI_VIDEO,
                    capability: Capability::Video,
                    system_prompt: prompt::compose(Capability::Video, page_id),
                    degradation: None,
                }
            } else {
                self.soft_fallback(
                    "视频处理功能需要配置 OPENAI_API_KEY，当前将为您提供视频相关的文字建议和指导。",
                    page_id,
                )
            };
            return Ok(self.traced(decision));
        }

        // 5. Audio-synthesis keywords
        if self.lexicon.is_audio(content) {
            let decision = if creds.openai {
                RouteDecision {
                    provider: ProviderKind::OpenAi,
                    model: OPENAI_AUDIO,
                    capability: Capability::AudioSynthesis,
                    system_prompt: prompt::compose(Capability::AudioSynthesis, page_id),
                    degradation: None,
                }
            } else {
                self.soft_fallback(
                    "语音合成功能需要配置 OPENAI_API_KEY，当前将为您提供语音合成的文字指导和建议。",
                    page_id,
                )
            };
            return Ok(self.traced(decision));
        }

        // 6. Default: baseline text
        Ok(self.traced(self.default_text(page_id, creds)))
    }

    fn default_text(&self, page_id: Option<&str>, creds: &CredentialAvailability) -> RouteDecision {
        let warning = prompt::missing_key_warning(&creds.missing_keys());
        RouteDecision {
            provider: ProviderKind::DeepSeek,
            model: DEEPSEEK_CHAT,
            capability: Capability::Text,
            system_prompt: format!("{}{}", warning, prompt::compose(Capability::Text, page_id)),
            degradation: None,
        }
    }

    fn soft_fallback(&self, reason: &str, page_id: Option<&str>) -> RouteDecision {
        RouteDecision {
            provider: ProviderKind::DeepSeek,
            model: DEEPSEEK_CHAT,
            capability: Capability::Text,
            system_prompt: prompt::soft_degraded(reason, page_id),
            degradation: Some(Degradation {
                reason: reason.to_string(),
                hard: false,
            }),
        }
    }

    fn traced(&self, decision: RouteDecision) -> RouteDecision {
        tracing::debug!(
            provider = %decision.provider,
            model = decision.model,
            capability = ?decision.capability,
            degraded = decision.is_degraded(),
            "routed turn"
        );
        decision
    }
}
