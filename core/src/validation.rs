use thiserror::Error;

pub const MAX_TEXT_LEN: usize = 500;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Todo text cannot be empty")]
    EmptyText,
    #[error("Todo text cannot exceed 500 characters")]
    TooLong,
}

/// Trims, caps at `MAX_TEXT_LEN` characters and strips `<` / `>`.
pub fn sanitize(input: &str) -> String {
    input
        .trim()
        .chars()
        .take(MAX_TEXT_LEN)
        .filter(|c| !matches!(c, '<' | '>'))
        .collect()
}

/// Validates the sanitized form of `text`.
pub fn validate(text: &str) -> Result<(), ValidationError> {
    let sanitized = sanitize(text);

    if sanitized.is_empty() {
        return Err(ValidationError::EmptyText);
    }

    // Unreachable while sanitize truncates first; kept as a second guard.
    if sanitized.chars().count() > MAX_TEXT_LEN {
        return Err(ValidationError::TooLong);
    }

    Ok(())
}
