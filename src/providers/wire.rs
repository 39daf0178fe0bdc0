//! Conversion from internal messages to each provider family's wire format.
//!
//! All functions here are pure: identical inputs produce byte-identical
//! request bodies, so retries and tests can compare them directly.

use serde_json::{json, Value};

use super::ProviderKind;
use crate::models::attachment::{Attachment, AttachmentKind, AttachmentPayload};
use crate::models::message::Message;

/// Prompt substituted when an image arrives with no accompanying text.
const DEFAULT_VISION_PROMPT: &str = "请分析这张图片";

/// Render the conversation for one provider, with the synthesized system
/// message always first.
pub fn format_request(
    provider: ProviderKind,
    system_prompt: &str,
    messages: &[Message],
) -> Vec<Value> {
    let mut formatted = Vec::with_capacity(messages.len() + 1);
    formatted.push(json!({
        "role": "system",
        "content": system_prompt,
    }));
    for message in messages {
        formatted.push(match provider {
            // Text-only: attachment bytes are never transmitted, only a
            // bracketed note naming what the user uploaded.
            ProviderKind::DeepSeek | ProviderKind::Volcengine => text_only_value(message),
            ProviderKind::Kimi | ProviderKind::OpenAi => multimodal_value(message),
        });
    }
    formatted
}

fn text_only_value(message: &Message) -> Value {
    let mut text = message.content.clone();
    if !message.files.is_empty() {
        let categories = message
            .files
            .iter()
            .map(|file| match file.kind() {
                AttachmentKind::Image => "图片",
                AttachmentKind::Audio => "音频",
                AttachmentKind::Other => "文件",
            })
            .collect::<Vec<_>>()
            .join("、");
        text = format!("[用户上传了{}]\n\n{}", categories, text);
    }
    json!({
        "role": message.role,
        "content": text,
    })
}

fn multimodal_value(message: &Message) -> Value {
    let images: Vec<&Attachment> = message
        .files
        .iter()
        .filter(|file| file.kind() == AttachmentKind::Image)
        .collect();

    if images.is_empty() {
        return json!({
            "role": message.role,
            "content": message.content,
        });
    }

    let mut parts = Vec::with_capacity(images.len() + 1);
    let text = if message.content.trim().is_empty() {
        DEFAULT_VISION_PROMPT
    } else {
        message.content.as_str()
    };
    parts.push(json!({ "type": "text", "text": text }));
    for image in images {
        parts.push(json!({
            "type": "image_url",
            "image_url": { "url": image_url(image) },
        }));
    }

    json!({
        "role": message.role,
        "content": parts,
    })
}

/// Direct URL, or a data URI synthesized from raw base64. Payloads that
/// already carry a `data:` prefix pass through unchanged.
fn image_url(attachment: &Attachment) -> String {
    match &attachment.payload {
        AttachmentPayload::Url(url) => url.clone(),
        AttachmentPayload::Base64(data) => {
            if data.starts_with("data:") {
                data.clone()
            } else {
                let mime = attachment.mime_type.as_deref().unwrap_or("image/jpeg");
                format!("data:{};base64,{}", mime, data)
            }
        }
    }
}

/// Body for a transcription request: the audio attachment is referenced by
/// URL or carried inline.
pub fn transcription_request(model: &str, audio: &Attachment) -> Value {
    let source = match &audio.payload {
        AttachmentPayload::Url(url) => json!({ "url": url }),
        AttachmentPayload::Base64(data) => json!({ "data": data }),
    };
    json!({
        "model": model,
        "audio": source,
        "format": audio.mime_type,
    })
}
