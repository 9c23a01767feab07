use crate::enums::ProvisionStatus;
use crate::host::{DEFAULT_USER_HOST, UserHost};
use crate::identifier::Identifier;
use chrono::{DateTime, Local};
use serde::{Serialize, Serializer};
use std::fmt;
use std::time::Duration;

/// Per-call server timeout used when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(6);

/// A generated account credential.
///
/// `Debug` never prints the secret, so the value can sit inside logged structs.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(String);

impl Password {
    pub fn new(secret: String) -> Self {
        Self(secret)
    }

    /// Returns the plaintext credential. Only the SQL builder, the audit row and the
    /// final operator report should need this.
    pub fn expose_secret(&self) -> &str {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(***)")
    }
}

/// Everything needed for one provisioning attempt. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisioningRequest {
    /// The operator-supplied name, before trimming or normalization.
    pub raw_name: String,
    /// Host part of the account to create, e.g. `localhost` or `10.0.0.%`.
    pub user_host: String,
    /// Permit `%`/`_` pattern characters in `user_host`.
    pub allow_wildcard_host: bool,
    /// Convert domain-like input into an identifier instead of requiring one.
    pub normalize: bool,
    /// Validate and check existence only; never mutate the server.
    pub dry_run: bool,
    /// Upper bound for every individual server call of this attempt.
    pub timeout: Duration,
}

impl ProvisioningRequest {
    pub fn new(raw_name: impl Into<String>) -> Self {
        Self {
            raw_name: raw_name.into(),
            ..Self::default()
        }
    }

    /// Returns a copy of this request targeting a different name. The batch driver
    /// uses this to apply one set of options to every record.
    pub fn for_name(&self, raw_name: impl Into<String>) -> Self {
        Self {
            raw_name: raw_name.into(),
            ..self.clone()
        }
    }
}

impl Default for ProvisioningRequest {
    fn default() -> Self {
        Self {
            raw_name: String::new(),
            user_host: DEFAULT_USER_HOST.to_string(),
            allow_wildcard_host: false,
            normalize: false,
            dry_run: false,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Whether the database and the user of an account already exist on the server.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Existence {
    pub schema: bool,
    pub principal: bool,
}

impl Existence {
    /// True when either half exists, which makes the attempt a skip.
    pub fn any(&self) -> bool {
        self.schema || self.principal
    }
}

/// The outcome of a successful (non-failed) provisioning attempt.
#[derive(Debug, Clone)]
pub struct ProvisioningResult {
    pub status: ProvisionStatus,
    /// The trimmed name as the operator typed it.
    pub requested_name: String,
    /// The identifier used for the database.
    pub resolved_name: Identifier,
    /// The identifier used for the user; always equal to `resolved_name`.
    pub username: Identifier,
    pub user_host: UserHost,
    /// Present only for `Created`.
    pub password: Option<Password>,
    pub message: String,
    /// Whether the audit row for a `Created` account reached the CSV file.
    pub audit_written: bool,
}

impl ProvisioningResult {
    /// True when normalization changed the operator's input.
    pub fn was_normalized(&self) -> bool {
        self.requested_name != self.resolved_name.as_str()
    }
}

/// One row of the accounts CSV file.
#[derive(Debug, Clone, Serialize)]
pub struct AuditRecord {
    #[serde(rename = "Timestamp", serialize_with = "serialize_minute")]
    pub timestamp: DateTime<Local>,
    #[serde(rename = "Database")]
    pub database: String,
    #[serde(rename = "Username")]
    pub username: String,
    #[serde(rename = "Password")]
    pub password: String,
}

impl AuditRecord {
    pub fn new(database: &Identifier, username: &Identifier, password: &Password) -> Self {
        Self {
            timestamp: Local::now(),
            database: database.to_string(),
            username: username.to_string(),
            password: password.expose_secret().to_string(),
        }
    }
}

fn serialize_minute<S: Serializer>(ts: &DateTime<Local>, s: S) -> Result<S::Ok, S::Error> {
    s.collect_str(&ts.format("%Y-%m-%d %H:%M"))
}
