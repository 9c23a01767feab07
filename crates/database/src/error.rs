use core_types::Step;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Invalid connection settings: {0}")]
    ConnectionConfig(String),

    #[error("Failed to connect to the database: {0}")]
    Connection(#[source] sqlx::Error),

    #[error("No answer from the server within {0:?}")]
    ConnectTimeout(Duration),

    #[error("Timed out after {after:?} during {step}")]
    Timeout { step: Step, after: Duration },

    #[error("Query failed during {step}: {source}")]
    Query {
        step: Step,
        #[source]
        source: sqlx::Error,
    },

    #[error("Statement failed during {step}: {source}")]
    Statement {
        step: Step,
        #[source]
        source: sqlx::Error,
    },
}

impl DbError {
    /// The provisioning step the error belongs to, if any.
    pub fn step(&self) -> Option<Step> {
        match self {
            DbError::Timeout { step, .. }
            | DbError::Query { step, .. }
            | DbError::Statement { step, .. } => Some(*step),
            DbError::ConnectionConfig(_)
            | DbError::Connection(_)
            | DbError::ConnectTimeout(_) => None,
        }
    }
}
