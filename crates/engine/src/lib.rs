//! # Engine Crate
//!
//! The provisioning workflow. A `Provisioner` owns an `AccountServer`, the error trail
//! and the optional CSV audit sink, and turns a `ProvisioningRequest` into a
//! `ProvisioningResult`.
//!
//! ## Architectural Principles
//!
//! - **Skip, never overwrite:** if either the database or the user exists, nothing is
//!   created and the attempt reports `Skipped`.
//! - **Compensating rollback:** DDL is not transactional, so a failure after the first
//!   `CREATE` is undone by explicit `DROP` statements in reverse order.
//! - **Isolation per record:** in batch mode one failing record never stops the
//!   records after it.
//!
//! ## Public API
//!
//! - `Provisioner`: runs single attempts (`provision`) and whole batches (`run_batch`).
//! - `parse_batch_line`: the batch file line grammar.
//! - `ProvisionError`: every way an attempt can fail.

// Declare the modules that make up the engine.
pub mod batch;
pub mod error;
pub mod provisioner;

#[cfg(test)]
mod fake;

// Re-export the main components.
pub use batch::{BatchOutcome, BatchSummary, parse_batch_line};
pub use error::{ProvisionError, RollbackFailure};
pub use provisioner::{Provisioner, resolve_name};
