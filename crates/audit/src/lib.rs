//! # Audit Crate
//!
//! The two durable records the tool keeps:
//!
//! - `CsvAuditSink`: one row per created account, including its plaintext password.
//! - `ErrorTrail`: timestamped failures and warnings, including per-line batch errors.
//!
//! Both are append-only and are created on demand with owner-only permissions.

pub mod csv_sink;
pub mod error;
mod fs;
pub mod trail;

pub use csv_sink::CsvAuditSink;
pub use error::AuditError;
pub use trail::ErrorTrail;
