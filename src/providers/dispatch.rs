//! Executes a routing decision against the chosen provider.
//!
//! The dispatcher holds no cross-request state: every call builds its own
//! request and hands back a delta stream that owns all of its buffers. No
//! retries happen here; failures surface to the caller immediately.

use std::time::Duration;

use futures::stream::BoxStream;
use futures::StreamExt;
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use tokio_util::sync::CancellationToken;

use super::configs::DispatchConfig;
use super::wire;
use super::ProviderKind;
use crate::errors::TransportError;
use crate::models::attachment::{Attachment, AttachmentKind};
use crate::models::message::Message;
use crate::models::role::Role;
use crate::router::{Capability, RouteDecision};
use crate::stream::{delta_stream, Delta};

pub type DeltaStream = BoxStream<'static, Result<Delta, TransportError>>;

pub struct Dispatcher {
    client: Client,
    config: DispatchConfig,
}

impl Dispatcher {
    pub fn new(config: DispatchConfig) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(600)) // 10 minutes timeout
            .build()?;
        Ok(Self { client, config })
    }

    /// Execute one routed turn. The returned stream yields deltas until the
    /// provider finishes or `cancel` fires; starting a new turn is the
    /// caller's cue to cancel the previous one first.
    pub async fn send(
        &self,
        decision: &RouteDecision,
        messages: &[Message],
        cancel: CancellationToken,
    ) -> Result<DeltaStream, TransportError> {
        match decision.provider {
            ProviderKind::Volcengine => self.transcribe(decision, messages, cancel).await,
            ProviderKind::OpenAi if decision.capability == Capability::ImageGeneration => {
                self.generate_image(decision, messages, cancel).await
            }
            ProviderKind::DeepSeek | ProviderKind::Kimi | ProviderKind::OpenAi => {
                self.stream_chat(decision, messages, cancel).await
            }
        }
    }

    /// Streaming chat completion, the common path for all chat providers.
    async fn stream_chat(
        &self,
        decision: &RouteDecision,
        messages: &[Message],
        cancel: CancellationToken,
    ) -> Result<DeltaStream, TransportError> {
        let endpoint = self.config.endpoint(decision.provider);
        let url = format!(
            "{}/v1/chat/completions",
            endpoint.host.trim_end_matches('/')
        );
        let payload = json!({
            "model": decision.model,
            "messages": wire::format_request(decision.provider, &decision.system_prompt, messages),
            "stream": decision.provider.supports_streaming(),
            "temperature": self.config.temperature,
            "max_tokens": self.config.max_tokens,
        });

        let response = self
            .post(decision.provider, &url, &endpoint.api_key, payload, &cancel)
            .await?;

        Ok(delta_stream(response.bytes_stream(), cancel).boxed())
    }

    /// Transcription does not stream: one blocking call, with the full text
    /// delivered as a single delta so callers cannot tell it apart from a
    /// one-chunk stream.
    async fn transcribe(
        &self,
        decision: &RouteDecision,
        messages: &[Message],
        cancel: CancellationToken,
    ) -> Result<DeltaStream, TransportError> {
        let audio = last_user_attachment(messages, AttachmentKind::Audio).ok_or_else(|| {
            TransportError::InvalidRequest("no audio attachment to transcribe".to_string())
        })?;

        let endpoint = self.config.endpoint(decision.provider);
        let url = format!("{}/api/v1/asr", endpoint.host.trim_end_matches('/'));
        let payload = wire::transcription_request(decision.model, audio);

        let response = self
            .post(decision.provider, &url, &endpoint.api_key, payload, &cancel)
            .await?;
        let body = read_json(response, &cancel).await?;

        let text = body["result"]["text"]
            .as_str()
            .or_else(|| body["text"].as_str())
            .ok_or_else(|| TransportError::MalformedResponse {
                provider: decision.provider,
                detail: "missing result.text in transcription response".to_string(),
            })?;

        Ok(single_delta(Delta::content(text), cancel))
    }

    /// Image generation is a single blocking call; the result is delivered
    /// as one markdown image delta.
    async fn generate_image(
        &self,
        decision: &RouteDecision,
        messages: &[Message],
        cancel: CancellationToken,
    ) -> Result<DeltaStream, TransportError> {
        let prompt = messages
            .iter()
            .rev()
            .find(|m| m.role == Role::User)
            .map(|m| m.content.as_str())
            .unwrap_or_default();

        let endpoint = self.config.endpoint(decision.provider);
        let url = format!(
            "{}/v1/images/generations",
            endpoint.host.trim_end_matches('/')
        );
        let payload = json!({
            "model": decision.model,
            "prompt": prompt,
            "n": 1,
            "size": "1024x1024",
        });

        let response = self
            .post(decision.provider, &url, &endpoint.api_key, payload, &cancel)
            .await?;
        let body = read_json(response, &cancel).await?;

        let image_url = body["data"][0]["url"].as_str().ok_or_else(|| {
            TransportError::MalformedResponse {
                provider: decision.provider,
                detail: "missing data[0].url in image response".to_string(),
            }
        })?;

        Ok(single_delta(
            Delta::content(format!("![生成的图片]({})", image_url)),
            cancel,
        ))
    }

    async fn post(
        &self,
        provider: ProviderKind,
        url: &str,
        api_key: &str,
        payload: Value,
        cancel: &CancellationToken,
    ) -> Result<reqwest::Response, TransportError> {
        let request = self
            .client
            .post(url)
            .header("Authorization", format!("Bearer {}", api_key))
            .json(&payload);

        let response = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(TransportError::Aborted),
            result = request.send() => result.map_err(TransportError::Network)?,
        };

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(%provider, %status, url, "upstream request failed");
            return Err(status_error(provider, status));
        }
        Ok(response)
    }
}

fn status_error(provider: ProviderKind, status: StatusCode) -> TransportError {
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        TransportError::AuthRequired { provider }
    } else {
        TransportError::Provider {
            provider,
            status: status.as_u16(),
        }
    }
}

/// Reading the body of a blocking call still honors cancellation; the
/// headers may have arrived long before the body does.
async fn read_json(
    response: reqwest::Response,
    cancel: &CancellationToken,
) -> Result<Value, TransportError> {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(TransportError::Aborted),
        body = response.json::<Value>() => body.map_err(TransportError::Network),
    }
}

/// One-delta stream for blocking calls. Consults the token at poll time so
/// a turn cancelled after dispatch still resolves as aborted instead of
/// delivering its result.
fn single_delta(delta: Delta, cancel: CancellationToken) -> DeltaStream {
    futures::stream::once(async move {
        if cancel.is_cancelled() {
            Err(TransportError::Aborted)
        } else {
            Ok(delta)
        }
    })
    .boxed()
}

fn last_user_attachment(messages: &[Message], kind: AttachmentKind) -> Option<&Attachment> {
    messages
        .iter()
        .rev()
        .find(|m| m.role == Role::User)
        .and_then(|m| m.files.iter().find(|f| f.kind() == kind))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_mapping() {
        let auth = status_error(ProviderKind::Kimi, StatusCode::UNAUTHORIZED);
        assert!(matches!(auth, TransportError::AuthRequired { .. }));
        assert!(!auth.is_retryable());

        let forbidden = status_error(ProviderKind::OpenAi, StatusCode::FORBIDDEN);
        assert!(matches!(forbidden, TransportError::AuthRequired { .. }));

        let server = status_error(ProviderKind::DeepSeek, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(matches!(
            server,
            TransportError::Provider { status: 500, .. }
        ));
        assert!(server.is_retryable());
    }

    #[test]
    fn test_last_user_attachment_picks_latest_user_turn() {
        let audio = Attachment::base64("m.mp3", Some("audio/mpeg".to_string()), "AAAA");
        let messages = vec![
            Message::user().with_file(Attachment::base64(
                "old.mp3",
                Some("audio/mpeg".to_string()),
                "OLD0",
            )),
            Message::assistant().with_text("ok"),
            Message::user().with_text("听听这个").with_file(audio.clone()),
        ];
        let found = last_user_attachment(&messages, AttachmentKind::Audio).unwrap();
        assert_eq!(found, &audio);
    }

    #[test]
    fn test_last_user_attachment_none_when_absent() {
        let messages = vec![Message::user().with_text("hello")];
        assert!(last_user_attachment(&messages, AttachmentKind::Audio).is_none());
    }
}
