use crate::error::CoreError;
use serde::Serialize;
use std::fmt;

/// Host used when the operator does not pass `--user-host`.
pub const DEFAULT_USER_HOST: &str = "localhost";

/// Longest host part accepted for a `'user'@'host'` account.
pub const MAX_HOST_LEN: usize = 255;

/// The validated host half of a `'user'@'host'` account name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct UserHost(String);

impl UserHost {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the host contains a `%` or `_` pattern character.
    pub fn is_wildcard(&self) -> bool {
        self.0.contains(['%', '_'])
    }
}

impl fmt::Display for UserHost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Validates the host part of an account.
///
/// `%` and `_` are pattern characters on the server and would silently widen the
/// account to many hosts, so they are only accepted when `allow_wildcards` is set.
pub fn validate_host(host: &str, allow_wildcards: bool) -> Result<UserHost, CoreError> {
    let host = host.trim();
    if host.is_empty() {
        return Err(CoreError::InvalidHost("empty host".to_string()));
    }
    if host.len() > MAX_HOST_LEN {
        return Err(CoreError::InvalidHost(format!(
            "host too long (max {MAX_HOST_LEN})"
        )));
    }

    if !allow_wildcards {
        if host.contains(['%', '_']) {
            return Err(CoreError::InvalidHost(
                "wildcard host not allowed ('%' or '_' found). Use --allow-wildcard-host to permit it"
                    .to_string(),
            ));
        }
        if !host.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-')) {
            return Err(CoreError::InvalidHost(format!(
                "invalid host '{host}' (allowed: a-z A-Z 0-9 . -)"
            )));
        }
    } else if !host
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '%' | '_'))
    {
        return Err(CoreError::InvalidHost(format!(
            "invalid host '{host}' (allowed: a-z A-Z 0-9 . % _ -)"
        )));
    }

    Ok(UserHost(host.to_string()))
}
