//! # Core Types Crate
//!
//! Shared vocabulary of the provisioning workspace: validated names, request and
//! result structures, and the audit row written for every created account.
//!
//! ## Architectural Principles
//!
//! - **Validated by construction:** `Identifier` and `UserHost` can only be built by
//!   the validators in this crate, so every value that reaches the SQL layer has
//!   already passed the allow-listed grammar.
//! - **Pure logic:** nothing here touches the network, the filesystem or the environment.

pub mod enums;
pub mod error;
pub mod host;
pub mod identifier;
pub mod structs;

// Re-export the core types to provide a clean public API.
pub use enums::{ProvisionStatus, Step};
pub use error::CoreError;
pub use host::{DEFAULT_USER_HOST, MAX_HOST_LEN, UserHost, validate_host};
pub use identifier::{
    Identifier, MAX_IDENTIFIER_LEN, normalize, validate_identifier, validate_raw_name,
};
pub use structs::{
    AuditRecord, DEFAULT_TIMEOUT, Existence, Password, ProvisioningRequest, ProvisioningResult,
};
