use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Crates whose events are shown by default.
const LOG_TARGETS: &[&str] = &[
    "mariadb_tool",
    "engine",
    "database",
    "audit",
    "configuration",
    "credentials",
    "core_types",
];

/// Builds the default filter directive, e.g. `mariadb_tool=warn,engine=warn,...,sqlx=warn`.
pub fn default_filter(verbose: bool) -> String {
    let level = if verbose { "debug" } else { "warn" };
    let mut directives: Vec<String> = LOG_TARGETS
        .iter()
        .map(|target| format!("{target}={level}"))
        .collect();
    directives.push("sqlx=warn".to_string());
    directives.join(",")
}

/// Installs the global tracing subscriber, writing to stderr.
///
/// `RUST_LOG` takes precedence over the built-in defaults. Operator-facing output
/// goes to stdout, so logs never interleave with the account report.
pub fn init_tracing(verbose: bool) -> Result<(), tracing::subscriber::SetGlobalDefaultError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbose)));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
}
