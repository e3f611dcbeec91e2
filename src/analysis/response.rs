//! Chat-completion response parsing.

use serde_json::Value;

use super::error::AnalysisError;

/// Pull `choices[0].message.content` out of a successful response body.
///
/// Invalid JSON is a [`AnalysisError::Json`]. Valid JSON where any step of
/// the path is missing or has the wrong type is
/// [`AnalysisError::UnexpectedResponse`].
pub fn extract_description(body: &str) -> Result<String, AnalysisError> {
    let response: Value = serde_json::from_str(body)?;

    response
        .get("choices")
        .and_then(Value::as_array)
        .and_then(|choices| choices.first())
        .and_then(|choice| choice.get("message"))
        .and_then(|message| message.get("content"))
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or(AnalysisError::UnexpectedResponse)
}
