//! Image analysis against a hosted vision-language model.
//!
//! Reads the selected image, embeds it as a base64 `data:` URI in a single
//! chat-completion request and returns the model's description.

mod client;
mod error;
mod request;
mod response;
mod secret;

pub use client::{Analyzer, MimeLabel, DEFAULT_BASE_URL, DEFAULT_MODEL};
pub use error::AnalysisError;
pub use request::{
    data_uri, encode_image, ChatMessage, ChatRequest, ContentPart, ImageUrl, DEFAULT_MIME_TYPE,
    DEFAULT_PROMPT,
};
pub use response::extract_description;
pub use secret::{ApiKey, GROQ_API_KEY_ENV};
