use serde_json::Value;
use thiserror::Error;

use super::GenerationRequest;

pub const MIN_TOPIC_CHARS: usize = 3;
pub const MIN_LENGTH: f64 = 10.0;
pub const MAX_LENGTH: f64 = 2000.0;
pub const DEFAULT_LENGTH: u32 = 250;

/// First constraint an incoming story request violated.
///
/// The `Display` text is what the caller sees, word for word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Topic must be at least 3 characters long.")]
    TopicTooShort,
    #[error("Length must be a number.")]
    LengthNotNumber,
    #[error("Length must be at least 10.")]
    LengthTooSmall,
    #[error("Length must be at most 2000.")]
    LengthTooLarge,
}

/// Check an untrusted request body and normalize it.
///
/// Rules run in a fixed order and the first failure is returned; errors are
/// never aggregated.
pub fn validate(input: &Value) -> Result<GenerationRequest, ValidationError> {
    let topic = input
        .get("topic")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|t| t.chars().count() >= MIN_TOPIC_CHARS)
        .ok_or(ValidationError::TopicTooShort)?;

    let length = match input.get("length") {
        None => f64::from(DEFAULT_LENGTH),
        Some(raw) => raw.as_f64().ok_or(ValidationError::LengthNotNumber)?,
    };

    if length < MIN_LENGTH {
        return Err(ValidationError::LengthTooSmall);
    }
    if length > MAX_LENGTH {
        return Err(ValidationError::LengthTooLarge);
    }

    Ok(GenerationRequest {
        topic: topic.to_string(),
        // bounds checked above, so the cast cannot saturate
        length: length.trunc() as u32,
    })
}
