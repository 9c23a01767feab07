use core_types::{CoreError, Step};
use credentials::CredentialError;
use database::DbError;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProvisionError {
    #[error(transparent)]
    Validation(#[from] CoreError),

    #[error("Password generation failed: {0}")]
    Credential(#[from] CredentialError),

    #[error("Existence check failed: {0}")]
    ExistenceCheck(#[source] DbError),

    #[error("Timed out after {after:?} during {step}")]
    Timeout { step: Step, after: Duration },

    #[error("Failed to {step}: {source}")]
    Ddl {
        step: Step,
        #[source]
        source: DbError,
    },

    #[error("Database error: {0}")]
    Database(#[source] DbError),

    #[error("Could not read batch input: {0}")]
    BatchSource(#[from] std::io::Error),
}

impl From<DbError> for ProvisionError {
    fn from(error: DbError) -> Self {
        match error {
            DbError::Timeout { step, after } => ProvisionError::Timeout { step, after },
            other => match other.step() {
                Some(step) if step.is_mutation() => ProvisionError::Ddl {
                    step,
                    source: other,
                },
                Some(_) => ProvisionError::ExistenceCheck(other),
                None => ProvisionError::Database(other),
            },
        }
    }
}

impl ProvisionError {
    /// The step that failed, for errors raised after validation.
    pub fn step(&self) -> Option<Step> {
        match self {
            ProvisionError::Timeout { step, .. } | ProvisionError::Ddl { step, .. } => Some(*step),
            ProvisionError::ExistenceCheck(source) => source.step(),
            _ => None,
        }
    }

    /// Whether the attempt was rejected before any server call was made.
    pub fn is_validation(&self) -> bool {
        matches!(self, ProvisionError::Validation(_))
    }
}

/// A compensation step that itself failed. Logged and written to the error trail;
/// never returned in place of the error that triggered the rollback.
#[derive(Debug)]
pub struct RollbackFailure {
    pub step: Step,
    pub error: DbError,
}
