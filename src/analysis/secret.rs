//! The bearer credential for the inference endpoint.

use std::fmt;

/// The environment variable name for the Groq API key.
pub const GROQ_API_KEY_ENV: &str = "GROQ_API_KEY";

/// Bearer token used to authorize requests.
///
/// Loaded once at startup and handed to the [`Analyzer`](super::Analyzer)
/// explicitly. An empty key is representable on purpose: the analyzer reports
/// it as a precondition failure instead of refusing to be constructed.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Read the key from `GROQ_API_KEY`. A missing variable yields an empty key.
    pub fn from_env() -> Self {
        Self(std::env::var(GROQ_API_KEY_ENV).unwrap_or_default())
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

// Keep the key out of debug logs.
impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            f.write_str("ApiKey(<unset>)")
        } else {
            f.write_str("ApiKey(<redacted>)")
        }
    }
}
