//! Chat-completion request payload and image encoding.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::Serialize;

/// The question asked about every image.
pub const DEFAULT_PROMPT: &str = "What is there in the image?";

/// MIME label used for the inline image.
///
/// Every image is labelled JPEG regardless of how it is actually encoded, so a
/// PNG picked from the library goes out as `data:image/jpeg`. This is a known
/// limitation; see `image.detect_mime_type` in the config to label by
/// extension instead.
pub const DEFAULT_MIME_TYPE: &str = "image/jpeg";

/// Request body for `POST /chat/completions`.
#[derive(Debug, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
}

#[derive(Debug, Serialize)]
pub struct ChatMessage {
    pub role: &'static str,
    pub content: Vec<ContentPart>,
}

/// One part of a multimodal user turn.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Serialize)]
pub struct ImageUrl {
    pub url: String,
}

impl ChatRequest {
    /// Build a single user turn holding the prompt text and the inline image.
    pub fn describe_image(model: &str, prompt: &str, image_data_uri: String) -> Self {
        Self {
            model: model.to_string(),
            messages: vec![ChatMessage {
                role: "user",
                content: vec![
                    ContentPart::Text {
                        text: prompt.to_string(),
                    },
                    ContentPart::ImageUrl {
                        image_url: ImageUrl {
                            url: image_data_uri,
                        },
                    },
                ],
            }],
        }
    }
}

/// Encode raw image bytes as standard padded base64.
pub fn encode_image(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// Wrap base64 text in a `data:` URI.
pub fn data_uri(mime_type: &str, base64: &str) -> String {
    format!("data:{};base64,{}", mime_type, base64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_image_round_trips() {
        let samples: [&[u8]; 4] = [b"", b"\xff\xd8\xff\xe0", b"a", &[0u8, 1, 2, 253, 254, 255]];
        for bytes in samples {
            let encoded = encode_image(bytes);
            let decoded = STANDARD.decode(&encoded).unwrap();
            assert_eq!(decoded, bytes);
        }
    }

    #[test]
    fn test_data_uri_format() {
        assert_eq!(
            data_uri("image/jpeg", "QUJD"),
            "data:image/jpeg;base64,QUJD"
        );
    }

    #[test]
    fn test_request_serializes_to_expected_shape() {
        let request = ChatRequest::describe_image(
            "llama-3.2-11b-vision-preview",
            DEFAULT_PROMPT,
            data_uri(DEFAULT_MIME_TYPE, "QUJD"),
        );
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "model": "llama-3.2-11b-vision-preview",
                "messages": [{
                    "role": "user",
                    "content": [
                        {"type": "text", "text": "What is there in the image?"},
                        {"type": "image_url", "image_url": {"url": "data:image/jpeg;base64,QUJD"}}
                    ]
                }]
            })
        );
    }
}
