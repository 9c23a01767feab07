use crate::error::DbError;
use crate::statement::{Statement, grantee};
use async_trait::async_trait;
use core_types::{Identifier, Step, UserHost};
use sqlx::mysql::MySqlPool;

/// The server-side operations the provisioning engine needs.
///
/// This trait lets the engine run against the live server or an in-memory fake
/// without knowing which.
#[async_trait]
pub trait AccountServer: Send + Sync {
    /// Whether a database (schema) with this exact name exists.
    async fn schema_exists(&self, schema: &Identifier) -> Result<bool, DbError>;

    /// Whether the account `'user'@'host'` exists.
    async fn principal_exists(&self, user: &Identifier, host: &UserHost) -> Result<bool, DbError>;

    /// Sends one DDL statement.
    async fn execute(&self, statement: &Statement) -> Result<(), DbError>;
}

/// `AccountServer` backed by a live MariaDB/MySQL connection.
#[derive(Debug, Clone)]
pub struct MySqlServer {
    pool: MySqlPool,
}

impl MySqlServer {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Closes the underlying connection.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl AccountServer for MySqlServer {
    async fn schema_exists(&self, schema: &Identifier) -> Result<bool, DbError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM information_schema.SCHEMATA WHERE SCHEMA_NAME = ?",
        )
        .bind(schema.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|source| DbError::Query {
            step: Step::CheckSchema,
            source,
        })?;
        Ok(count > 0)
    }

    async fn principal_exists(&self, user: &Identifier, host: &UserHost) -> Result<bool, DbError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM information_schema.USER_PRIVILEGES WHERE GRANTEE = ?",
        )
        .bind(grantee(user, host))
        .fetch_one(&self.pool)
        .await
        .map_err(|source| DbError::Query {
            step: Step::CheckPrincipal,
            source,
        })?;
        Ok(count > 0)
    }

    async fn execute(&self, statement: &Statement) -> Result<(), DbError> {
        tracing::debug!(%statement, "executing statement");
        // Text protocol: not every DDL statement can be prepared.
        sqlx::raw_sql(statement.sql())
            .execute(&self.pool)
            .await
            .map_err(|source| DbError::Statement {
                step: statement.step(),
                source,
            })?;
        Ok(())
    }
}
