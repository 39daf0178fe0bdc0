use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};

/// Extensions accepted as images when no MIME type is present.
const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp", "bmp"];

/// Extensions accepted as audio when no MIME type is present. Matches the
/// formats the transcription provider can decode.
const AUDIO_EXTENSIONS: &[&str] = &[
    "mp3", "wav", "opus", "ogg", "flac", "m4a", "aac", "amr", "wma",
];

/// Where the attachment bytes live. Exactly one representation exists per
/// attachment, which the enum enforces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttachmentPayload {
    /// A remote URL the provider can fetch itself.
    Url(String),
    /// Base64-encoded bytes, with or without a `data:` URI prefix.
    Base64(String),
}

/// A user-supplied file carried on a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    pub payload: AttachmentPayload,
}

/// Coarse classification used by the router and the wire formatters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachmentKind {
    Image,
    Audio,
    Other,
}

impl Attachment {
    pub fn url<S: Into<String>, T: Into<String>>(name: S, mime_type: Option<String>, url: T) -> Self {
        Attachment {
            name: name.into(),
            mime_type,
            payload: AttachmentPayload::Url(url.into()),
        }
    }

    pub fn base64<S: Into<String>, T: Into<String>>(
        name: S,
        mime_type: Option<String>,
        data: T,
    ) -> Self {
        Attachment {
            name: name.into(),
            mime_type,
            payload: AttachmentPayload::Base64(data.into()),
        }
    }

    /// Encode raw bytes handed over by the interface layer.
    pub fn from_bytes<S: Into<String>>(name: S, mime_type: Option<String>, bytes: &[u8]) -> Self {
        Attachment {
            name: name.into(),
            mime_type,
            payload: AttachmentPayload::Base64(STANDARD.encode(bytes)),
        }
    }

    /// Classify by MIME prefix first, file extension second. Decidable from
    /// `mime_type` or `name` alone; attachments matching neither are `Other`.
    pub fn kind(&self) -> AttachmentKind {
        if let Some(mime) = &self.mime_type {
            if mime.starts_with("image/") {
                return AttachmentKind::Image;
            }
            if mime.starts_with("audio/") {
                return AttachmentKind::Audio;
            }
        }
        let ext = self
            .name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_lowercase())
            .unwrap_or_default();
        if IMAGE_EXTENSIONS.contains(&ext.as_str()) {
            AttachmentKind::Image
        } else if AUDIO_EXTENSIONS.contains(&ext.as_str()) {
            AttachmentKind::Audio
        } else {
            AttachmentKind::Other
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_by_mime_prefix() {
        let image = Attachment::base64("photo", Some("image/png".to_string()), "AAAA");
        assert_eq!(image.kind(), AttachmentKind::Image);

        let audio = Attachment::base64("memo", Some("audio/mpeg".to_string()), "AAAA");
        assert_eq!(audio.kind(), AttachmentKind::Audio);

        let other = Attachment::base64("notes", Some("application/pdf".to_string()), "AAAA");
        assert_eq!(other.kind(), AttachmentKind::Other);
    }

    #[test]
    fn test_classify_by_extension_when_mime_absent() {
        let image = Attachment::url("Holiday.JPG", None, "https://example.com/a.jpg");
        assert_eq!(image.kind(), AttachmentKind::Image);

        let audio = Attachment::url("voice.m4a", None, "https://example.com/v.m4a");
        assert_eq!(audio.kind(), AttachmentKind::Audio);

        let other = Attachment::url("report.txt", None, "https://example.com/r.txt");
        assert_eq!(other.kind(), AttachmentKind::Other);
    }

    #[test]
    fn test_mime_wins_over_extension() {
        // MIME prefix is checked before the filename
        let att = Attachment::url("clip.mp3", Some("image/png".to_string()), "https://x/y");
        assert_eq!(att.kind(), AttachmentKind::Image);
    }

    #[test]
    fn test_from_bytes_encodes_base64() {
        let att = Attachment::from_bytes("a.png", Some("image/png".to_string()), &[0, 0, 0]);
        assert_eq!(att.payload, AttachmentPayload::Base64("AAAA".to_string()));
    }

    #[test]
    fn test_no_extension_is_other() {
        let att = Attachment::url("README", None, "https://example.com/readme");
        assert_eq!(att.kind(), AttachmentKind::Other);
    }
}
