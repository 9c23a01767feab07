//! # Database Crate
//!
//! Everything that talks to the MariaDB/MySQL server: opening the admin connection,
//! building DDL statements, checking whether an account already exists, and
//! executing statements.
//!
//! ## Architectural Principles
//!
//! - **Single SQL chokepoint:** all statement text is produced by `Statement`, which
//!   only accepts validated identifiers and hosts, quotes identifier positions and
//!   escapes literal positions.
//! - **Server abstraction:** the `AccountServer` trait lets the provisioning engine be
//!   agnostic about whether it runs against a live server or a test double.
//! - **Bounded calls:** `timed` wraps a single server call in the per-request timeout.
//!
//! ## Public API
//!
//! - `connect`: opens and pings the single admin connection.
//! - `MySqlServer`: the live `AccountServer` implementation.
//! - `check_existence`: the existence oracle behind the skip-if-exists gate.
//! - `Statement`: the DDL builder.
//! - `DbError`: the specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod connection;
pub mod error;
pub mod oracle;
pub mod server;
pub mod statement;

// Re-export the key components to create a clean, public-facing API.
pub use connection::{connect, connect_options};
pub use error::DbError;
pub use oracle::{check_existence, timed};
pub use server::{AccountServer, MySqlServer};
pub use statement::{Statement, grantee};
