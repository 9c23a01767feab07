//! In-memory `AccountServer` for engine tests.

use async_trait::async_trait;
use core_types::{Identifier, Step, UserHost};
use database::{AccountServer, DbError, Statement};
use std::collections::HashSet;
use std::sync::Mutex;
use std::time::Duration;

#[derive(Default)]
pub(crate) struct FakeServer {
    state: Mutex<FakeState>,
    failing: HashSet<Step>,
    stalling: HashSet<Step>,
    /// Names whose `CREATE DATABASE` fails, independent of `failing`.
    failing_names: HashSet<String>,
}

#[derive(Default)]
struct FakeState {
    schemas: HashSet<String>,
    principals: HashSet<(String, String)>,
    executed: Vec<(Step, String)>,
    checks: usize,
}

impl FakeServer {
    pub(crate) fn with_schema(self, name: &str) -> Self {
        self.state.lock().unwrap().schemas.insert(name.to_string());
        self
    }

    pub(crate) fn with_principal(self, user: &str, host: &str) -> Self {
        self.state
            .lock()
            .unwrap()
            .principals
            .insert((user.to_string(), host.to_string()));
        self
    }

    pub(crate) fn failing(mut self, step: Step) -> Self {
        self.failing.insert(step);
        self
    }

    pub(crate) fn stalling(mut self, step: Step) -> Self {
        self.stalling.insert(step);
        self
    }

    pub(crate) fn failing_name(mut self, name: &str) -> Self {
        self.failing_names.insert(name.to_string());
        self
    }

    pub(crate) fn executed_steps(&self) -> Vec<Step> {
        let state = self.state.lock().unwrap();
        state.executed.iter().map(|(step, _)| *step).collect()
    }

    pub(crate) fn executed_sql(&self, step: Step) -> Option<String> {
        let state = self.state.lock().unwrap();
        state
            .executed
            .iter()
            .find(|(s, _)| *s == step)
            .map(|(_, sql)| sql.clone())
    }

    pub(crate) fn has_schema(&self, name: &str) -> bool {
        self.state.lock().unwrap().schemas.contains(name)
    }

    pub(crate) fn has_principal(&self, user: &str, host: &str) -> bool {
        self.state
            .lock()
            .unwrap()
            .principals
            .contains(&(user.to_string(), host.to_string()))
    }

    pub(crate) fn check_calls(&self) -> usize {
        self.state.lock().unwrap().checks
    }

    async fn interrupt(&self, step: Step) -> Result<(), DbError> {
        if self.stalling.contains(&step) {
            tokio::time::sleep(Duration::from_secs(24 * 3600)).await;
        }
        if self.failing.contains(&step) {
            return Err(injected(step));
        }
        Ok(())
    }
}

fn injected(step: Step) -> DbError {
    let source = sqlx::Error::Protocol(format!("injected failure at {step}"));
    if step.is_mutation() {
        DbError::Statement { step, source }
    } else {
        DbError::Query { step, source }
    }
}

/// Segments of `sql` enclosed in `delim`, in order.
fn quoted(sql: &str, delim: char) -> Vec<&str> {
    sql.split(delim).skip(1).step_by(2).collect()
}

#[async_trait]
impl AccountServer for FakeServer {
    async fn schema_exists(&self, schema: &Identifier) -> Result<bool, DbError> {
        self.state.lock().unwrap().checks += 1;
        self.interrupt(Step::CheckSchema).await?;
        Ok(self.has_schema(schema.as_str()))
    }

    async fn principal_exists(&self, user: &Identifier, host: &UserHost) -> Result<bool, DbError> {
        self.state.lock().unwrap().checks += 1;
        self.interrupt(Step::CheckPrincipal).await?;
        Ok(self.has_principal(user.as_str(), host.as_str()))
    }

    async fn execute(&self, statement: &Statement) -> Result<(), DbError> {
        let step = statement.step();
        let sql = statement.sql().to_string();
        self.state
            .lock()
            .unwrap()
            .executed
            .push((step, sql.clone()));
        self.interrupt(step).await?;

        let mut state = self.state.lock().unwrap();
        match step {
            Step::CreateSchema => {
                let name = quoted(&sql, '`')[0].to_string();
                if self.failing_names.contains(&name) {
                    return Err(injected(step));
                }
                state.schemas.insert(name);
            }
            Step::DropSchema => {
                state.schemas.remove(quoted(&sql, '`')[0]);
            }
            Step::CreatePrincipal => {
                let parts = quoted(&sql, '\'');
                state
                    .principals
                    .insert((parts[0].to_string(), parts[1].to_string()));
            }
            Step::DropPrincipal => {
                let parts = quoted(&sql, '\'');
                state
                    .principals
                    .remove(&(parts[0].to_string(), parts[1].to_string()));
            }
            Step::GrantRights | Step::CheckSchema | Step::CheckPrincipal => {}
        }
        Ok(())
    }
}
