use crate::error::{ProvisionError, RollbackFailure};
use audit::{CsvAuditSink, ErrorTrail};
use core_types::{
    AuditRecord, CoreError, Identifier, Password, ProvisionStatus, ProvisioningRequest,
    ProvisioningResult, UserHost, normalize, validate_host, validate_identifier,
    validate_raw_name,
};
use credentials::{DEFAULT_PASSWORD_LENGTH, generate_password};
use database::{AccountServer, Statement, check_existence, timed};
use std::time::Duration;

/// Runs provisioning attempts against one server.
///
/// An attempt moves through validate → existence check → password → create database
/// → create user → grant. The statements involved are not transactional on the
/// server, so a failure part-way is undone by issuing the reverse statements
/// (drop user, drop database) for whatever was already created.
pub struct Provisioner<S> {
    server: S,
    trail: ErrorTrail,
    audit: Option<CsvAuditSink>,
}

impl<S: AccountServer> Provisioner<S> {
    /// Creates a provisioner that writes failures and rollback problems to `trail`.
    /// CSV export is off until [`Provisioner::with_audit`] is called.
    pub fn new(server: S, trail: ErrorTrail) -> Self {
        Self {
            server,
            trail,
            audit: None,
        }
    }

    /// Records every created account in `sink`.
    pub fn with_audit(mut self, sink: CsvAuditSink) -> Self {
        self.audit = Some(sink);
        self
    }

    pub fn server(&self) -> &S {
        &self.server
    }

    pub fn trail(&self) -> &ErrorTrail {
        &self.trail
    }

    /// Runs one attempt to completion.
    ///
    /// Returns `Skipped` when either the database or the user already exists,
    /// `DryRunOk` when `request.dry_run` is set and nothing exists yet, and `Created`
    /// once all three statements succeeded. Any error is returned after the
    /// compensating statements have been attempted.
    pub async fn provision(
        &self,
        request: &ProvisioningRequest,
    ) -> Result<ProvisioningResult, ProvisionError> {
        let requested = request.raw_name.trim().to_string();
        let name = resolve_name(&requested, request.normalize)?;
        let host = validate_host(&request.user_host, request.allow_wildcard_host)?;
        if host.is_wildcard() {
            tracing::warn!(%name, %host, "account host is a wildcard pattern");
        }

        let mut result = ProvisioningResult {
            status: ProvisionStatus::Skipped,
            requested_name: requested,
            resolved_name: name.clone(),
            username: name.clone(),
            user_host: host.clone(),
            password: None,
            message: String::new(),
            audit_written: false,
        };

        let existence = check_existence(&self.server, &name, &host, request.timeout).await?;
        if existence.any() {
            let account = account_label(&name, &host);
            result.message = match (existence.schema, existence.principal) {
                (true, true) => {
                    format!("Skipping '{name}': database exists and user {account} exists")
                }
                (true, false) => {
                    format!("Skipping '{name}': database exists (will not create user)")
                }
                _ => format!("Skipping '{name}': user {account} exists (will not create database)"),
            };
            tracing::info!(%name, %host, ?existence, "account already present, skipping");
            return Ok(result);
        }

        if request.dry_run {
            result.status = ProvisionStatus::DryRunOk;
            result.message = format!(
                "Dry run: would create database '{name}' and user {}",
                account_label(&name, &host)
            );
            tracing::info!(%name, %host, "dry run, no statements issued");
            return Ok(result);
        }

        let password = generate_password(DEFAULT_PASSWORD_LENGTH)?;
        self.create_account(&name, &host, &password, request.timeout)
            .await?;

        result.status = ProvisionStatus::Created;
        result.message = format!(
            "Created database '{name}' and user {}",
            account_label(&name, &host)
        );
        tracing::info!(%name, %host, "account created");

        if let Some(sink) = &self.audit {
            match sink.append(&AuditRecord::new(&name, &name, &password)) {
                Ok(()) => result.audit_written = true,
                Err(e) => {
                    let warning = format!("WARNING: failed to export CSV for {name}: {e}");
                    tracing::warn!(%name, error = %e, "audit row not written");
                    self.trail.record(&warning);
                }
            }
        }

        result.password = Some(password);
        Ok(result)
    }

    /// Issues create database, create user and grant in order. Each completed step
    /// pushes its undo statement; on failure the undo statements run newest first.
    async fn create_account(
        &self,
        name: &Identifier,
        host: &UserHost,
        password: &Password,
        timeout: Duration,
    ) -> Result<(), ProvisionError> {
        let plan = [
            (
                Statement::create_database(name),
                Some(Statement::drop_database(name)),
            ),
            (
                Statement::create_user(name, host, password),
                Some(Statement::drop_user(name, host)),
            ),
            (Statement::grant_all(name, name, host), None),
        ];

        let mut undo: Vec<Statement> = Vec::with_capacity(2);
        for (statement, compensation) in plan {
            let step = statement.step();
            if let Err(e) = timed(step, timeout, self.server.execute(&statement)).await {
                tracing::error!(%name, %step, error = %e, "provisioning step failed, rolling back");
                let failures = self.compensate(undo, timeout).await;
                for failure in &failures {
                    self.trail.record(&format!(
                        "ROLLBACK FAILED for '{name}' ({}): {}",
                        failure.step, failure.error
                    ));
                }
                return Err(e.into());
            }
            undo.extend(compensation);
        }
        Ok(())
    }

    /// Runs undo statements newest first. Every statement is attempted even when an
    /// earlier one fails.
    async fn compensate(&self, undo: Vec<Statement>, timeout: Duration) -> Vec<RollbackFailure> {
        let mut failures = Vec::new();
        for statement in undo.into_iter().rev() {
            let step = statement.step();
            match timed(step, timeout, self.server.execute(&statement)).await {
                Ok(()) => tracing::info!(%statement, "rolled back"),
                Err(error) => {
                    tracing::error!(%statement, %error, "rollback step failed");
                    failures.push(RollbackFailure { step, error });
                }
            }
        }
        failures
    }
}

/// Turns the trimmed operator input into an identifier, normalizing when asked.
pub fn resolve_name(requested: &str, normalize_input: bool) -> Result<Identifier, CoreError> {
    if normalize_input {
        validate_raw_name(requested)?;
        normalize(requested)
    } else {
        validate_identifier(requested)
    }
}

fn account_label(name: &Identifier, host: &UserHost) -> String {
    database::grantee(name, host)
}
