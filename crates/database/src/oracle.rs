use crate::error::DbError;
use crate::server::AccountServer;
use core_types::{Existence, Identifier, Step, UserHost};
use std::future::Future;
use std::time::Duration;

/// Runs one server call under `timeout`, turning an elapsed timer into
/// [`DbError::Timeout`] tagged with `step`.
///
/// Dropping the future does not cancel a statement the server already received.
pub async fn timed<T, F>(step: Step, timeout: Duration, call: F) -> Result<T, DbError>
where
    F: Future<Output = Result<T, DbError>>,
{
    match tokio::time::timeout(timeout, call).await {
        Ok(result) => result,
        Err(_) => Err(DbError::Timeout {
            step,
            after: timeout,
        }),
    }
}

/// Queries server metadata for both halves of an account.
///
/// Each check is bounded by `timeout` on its own. Query failures are returned, never
/// read as "does not exist".
pub async fn check_existence<S>(
    server: &S,
    name: &Identifier,
    host: &UserHost,
    timeout: Duration,
) -> Result<Existence, DbError>
where
    S: AccountServer + ?Sized,
{
    let schema = timed(Step::CheckSchema, timeout, server.schema_exists(name)).await?;
    let principal = timed(
        Step::CheckPrincipal,
        timeout,
        server.principal_exists(name, host),
    )
    .await?;

    tracing::debug!(%name, %host, schema, principal, "existence check");
    Ok(Existence { schema, principal })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::statement::Statement;
    use async_trait::async_trait;
    use core_types::{validate_host, validate_identifier};

    struct StubServer {
        schema: bool,
        principal: bool,
        stall_principal: bool,
    }

    #[async_trait]
    impl AccountServer for StubServer {
        async fn schema_exists(&self, _schema: &Identifier) -> Result<bool, DbError> {
            Ok(self.schema)
        }

        async fn principal_exists(&self, _u: &Identifier, _h: &UserHost) -> Result<bool, DbError> {
            if self.stall_principal {
                tokio::time::sleep(Duration::from_secs(3600)).await;
            }
            Ok(self.principal)
        }

        async fn execute(&self, _statement: &Statement) -> Result<(), DbError> {
            unreachable!("the oracle never executes statements")
        }
    }

    fn account() -> (Identifier, UserHost) {
        (
            validate_identifier("shop").unwrap(),
            validate_host("localhost", false).unwrap(),
        )
    }

    #[tokio::test]
    async fn reports_both_halves() {
        let (name, host) = account();
        let server = StubServer {
            schema: true,
            principal: false,
            stall_principal: false,
        };
        let existence = check_existence(&server, &name, &host, Duration::from_secs(1))
            .await
            .unwrap();
        assert_eq!(
            existence,
            Existence {
                schema: true,
                principal: false
            }
        );
    }

    #[tokio::test(start_paused = true)]
    async fn stalled_check_times_out() {
        let (name, host) = account();
        let server = StubServer {
            schema: false,
            principal: false,
            stall_principal: true,
        };
        let err = check_existence(&server, &name, &host, Duration::from_secs(6))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DbError::Timeout {
                step: Step::CheckPrincipal,
                ..
            }
        ));
    }
}
