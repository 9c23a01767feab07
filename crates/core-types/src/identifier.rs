use crate::error::CoreError;
use serde::Serialize;
use sha1::{Digest, Sha1};
use std::fmt;

/// Maximum length of a database or user name on the MariaDB/MySQL server family.
pub const MAX_IDENTIFIER_LEN: usize = 64;

/// Number of hex characters taken from the SHA-1 digest when a name is truncated.
const HASH_SUFFIX_LEN: usize = 8;

/// A database/user name that has passed the strict `[A-Za-z0-9_]{1,64}` grammar.
///
/// The only ways to obtain one are [`validate_identifier`] and [`normalize`], so any
/// `Identifier` handed to the SQL layer is already known to be safe to embed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Identifier(String);

impl Identifier {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Identifier {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

fn is_identifier_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn is_raw_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-')
}

/// Validates a name against the identifier grammar.
///
/// Rejects empty names, names longer than [`MAX_IDENTIFIER_LEN`] and any character
/// outside `[A-Za-z0-9_]`, whitespace included. Operator input is trimmed by the
/// caller before it gets here.
pub fn validate_identifier(name: &str) -> Result<Identifier, CoreError> {
    if name.is_empty() {
        return Err(CoreError::InvalidIdentifier("empty name".to_string()));
    }
    if name.len() > MAX_IDENTIFIER_LEN {
        return Err(CoreError::InvalidIdentifier(format!(
            "name too long (max {MAX_IDENTIFIER_LEN})"
        )));
    }
    if !name.chars().all(is_identifier_char) {
        return Err(CoreError::InvalidIdentifier(format!(
            "invalid name '{name}' (allowed: a-z A-Z 0-9 _)"
        )));
    }
    Ok(Identifier(name.to_string()))
}

/// Checks raw operator input before it is normalized.
///
/// Only typical domain-ish input (letters, digits, `.`, `_`, `-`) is accepted so that
/// arbitrary garbage cannot collapse into a valid-looking identifier.
pub fn validate_raw_name(raw: &str) -> Result<(), CoreError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(CoreError::InvalidRawInput("empty name".to_string()));
    }
    if !trimmed.chars().all(is_raw_name_char) {
        return Err(CoreError::InvalidRawInput(format!(
            "invalid characters in name '{raw}' (allowed: a-z A-Z 0-9 . _ -)"
        )));
    }
    Ok(())
}

/// Converts common inputs such as domain names into safe identifiers.
///
/// `"WWW.Example.COM"` becomes `"www_example_com"`. When the result would exceed
/// [`MAX_IDENTIFIER_LEN`], it is cut to 55 characters and suffixed with `_` and the
/// first 8 hex characters of the SHA-1 digest of the trimmed raw input.
///
/// Re-normalizing a hash-truncated result is not a no-op: the truncated string is
/// hashed as new input and may receive a different suffix.
pub fn normalize(raw: &str) -> Result<Identifier, CoreError> {
    let trimmed = raw.trim();

    let mut collapsed = String::with_capacity(trimmed.len());
    for c in trimmed.chars().flat_map(char::to_lowercase) {
        let mapped = if c.is_ascii_lowercase() || c.is_ascii_digit() {
            c
        } else {
            '_'
        };
        if mapped == '_' && collapsed.ends_with('_') {
            continue;
        }
        collapsed.push(mapped);
    }
    let base = collapsed.trim_matches('_');

    if base.is_empty() {
        return Err(CoreError::InvalidRawInput(format!(
            "name '{raw}' normalizes to empty identifier"
        )));
    }

    if base.len() <= MAX_IDENTIFIER_LEN {
        return Ok(Identifier(base.to_string()));
    }

    let digest = hex::encode(Sha1::digest(trimmed.as_bytes()));
    let suffix = &digest[..HASH_SUFFIX_LEN];
    // `base` is pure ASCII at this point, so byte slicing is safe.
    let keep = MAX_IDENTIFIER_LEN - 1 - HASH_SUFFIX_LEN;
    let truncated = &base[..keep];

    tracing::debug!(raw = trimmed, suffix, "normalized name truncated with hash suffix");
    Ok(Identifier(format!("{truncated}_{suffix}")))
}
