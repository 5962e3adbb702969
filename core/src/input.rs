use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug, PartialEq)]
pub enum IdError {
    #[error("Unknown id: '{0}'")]
    Unknown(String),
    #[error("Ambiguous id: '{prefix}' matches {matches:?}")]
    Ambiguous { prefix: String, matches: Vec<String> },
}

/// Joins trailing command-line words into one task text.
pub fn join_words(words: &[String]) -> String {
    words.join(" ")
}

/// Resolves a full id or a unique, case-insensitive prefix of one.
pub fn expand_id(input: &str, candidates: &[Uuid]) -> Result<Uuid, IdError> {
    let needle = input.trim().to_ascii_lowercase();
    if needle.is_empty() {
        return Err(IdError::Unknown(input.to_string()));
    }

    // 1. Exact match
    if let Ok(id) = Uuid::parse_str(&needle) {
        if candidates.contains(&id) {
            return Ok(id);
        }
    }

    // 2. Prefix match
    let matches: Vec<Uuid> = candidates
        .iter()
        .filter(|c| c.to_string().starts_with(&needle))
        .copied()
        .collect();

    match matches.as_slice() {
        [id] => Ok(*id),
        [] => Err(IdError::Unknown(input.to_string())),
        _ => Err(IdError::Ambiguous {
            prefix: input.to_string(),
            matches: matches.iter().map(short_id).collect(),
        }),
    }
}

/// First eight hex digits, enough to tell tasks apart in a listing.
pub fn short_id(id: &Uuid) -> String {
    id.to_string()[..8].to_string()
}
