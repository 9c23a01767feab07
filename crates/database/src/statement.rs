//! The only place SQL text is assembled.
//!
//! DDL such as `CREATE USER` cannot take bound parameters, so names and the password
//! have to be embedded in the statement text. Every constructor here only accepts
//! values that already passed the identifier/host grammars, always wraps identifier
//! positions in backticks and always escapes literal positions.

use core_types::{Identifier, Password, Step, UserHost};
use std::fmt;

/// A DDL statement ready to be sent to the server.
///
/// `Display` renders the statement with the password replaced by `'***'`, so it is
/// safe to log; [`Statement::sql`] returns the real text.
#[derive(Clone, PartialEq, Eq)]
pub struct Statement {
    step: Step,
    sql: String,
    redacted: String,
}

impl Statement {
    fn new(step: Step, sql: String) -> Self {
        Self {
            step,
            redacted: sql.clone(),
            sql,
        }
    }

    /// `CREATE DATABASE `name``
    pub fn create_database(database: &Identifier) -> Self {
        Self::new(
            Step::CreateSchema,
            format!("CREATE DATABASE {}", quote_ident(database)),
        )
    }

    /// `DROP DATABASE `name``
    pub fn drop_database(database: &Identifier) -> Self {
        Self::new(
            Step::DropSchema,
            format!("DROP DATABASE {}", quote_ident(database)),
        )
    }

    /// `CREATE USER 'name'@'host' IDENTIFIED BY '...'`
    pub fn create_user(user: &Identifier, host: &UserHost, password: &Password) -> Self {
        let prefix = format!("CREATE USER {} IDENTIFIED BY ", account(user, host));
        Self {
            step: Step::CreatePrincipal,
            sql: format!("{prefix}{}", quote_literal(password.expose_secret())),
            redacted: format!("{prefix}'***'"),
        }
    }

    /// `DROP USER 'name'@'host'`
    pub fn drop_user(user: &Identifier, host: &UserHost) -> Self {
        Self::new(Step::DropPrincipal, format!("DROP USER {}", account(user, host)))
    }

    /// `GRANT ALL PRIVILEGES ON `db`.* TO 'name'@'host'`
    pub fn grant_all(database: &Identifier, user: &Identifier, host: &UserHost) -> Self {
        Self::new(
            Step::GrantRights,
            format!(
                "GRANT ALL PRIVILEGES ON {}.* TO {}",
                quote_ident(database),
                account(user, host)
            ),
        )
    }

    pub fn step(&self) -> Step {
        self.step
    }

    /// The statement text as sent to the server. Contains the plaintext password for
    /// `CREATE USER`; never log this.
    pub fn sql(&self) -> &str {
        &self.sql
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.redacted)
    }
}

impl fmt::Debug for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Statement")
            .field("step", &self.step)
            .field("sql", &self.redacted)
            .finish()
    }
}

/// The `GRANTEE` value `information_schema` uses for an account: `'user'@'host'`.
pub fn grantee(user: &Identifier, host: &UserHost) -> String {
    account(user, host)
}

/// Delimited identifier. Backticks cannot pass the identifier grammar, but are
/// doubled anyway so the quoting stays correct on its own.
fn quote_ident(ident: &Identifier) -> String {
    format!("`{}`", ident.as_str().replace('`', "``"))
}

/// Single-quoted string literal with embedded quotes doubled.
fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

fn account(user: &Identifier, host: &UserHost) -> String {
    format!("{}@{}", quote_literal(user.as_str()), quote_literal(host.as_str()))
}
