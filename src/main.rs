use anyhow::Context;
use audit::{CsvAuditSink, ErrorTrail};
use clap::{ArgAction, Parser};
use configuration::{
    AppPaths, ServerConfig, init_tracing, load_server_config, resolve_default_paths,
    write_config_file,
};
use core_types::{DEFAULT_USER_HOST, ProvisionStatus, ProvisioningRequest, ProvisioningResult};
use database::{MySqlServer, connect};
use engine::{BatchOutcome, BatchSummary, Provisioner};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

/// The main entry point for the mariadb-tool account provisioner.
#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // Parse command-line arguments
    let cli = Cli::parse();

    if let Err(e) = init_tracing(cli.verbose) {
        eprintln!("Could not install logger: {e}");
    }

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Creates a MariaDB/MySQL database plus a same-named user with a generated password.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Interactively write the config file and exit.
    #[arg(long)]
    init: bool,

    /// Path of the config file (default: $XDG_CONFIG_HOME/mariadb-tool/config.ini).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Create a single database/user.
    #[arg(
        short = 'c',
        long = "create",
        value_name = "NAME",
        conflicts_with = "file",
        required_unless_present_any = ["file", "init"]
    )]
    create: Option<String>,

    /// Create one database/user per line of FILE.
    #[arg(short = 'f', long = "file", value_name = "FILE")]
    file: Option<PathBuf>,

    /// Host part of the created account.
    #[arg(long, value_name = "HOST", default_value = DEFAULT_USER_HOST)]
    user_host: String,

    /// Permit `%` and `_` wildcards in --user-host.
    #[arg(long)]
    allow_wildcard_host: bool,

    /// Upper bound for every individual server call (e.g. "6s", "500ms").
    #[arg(long, value_parser = humantime::parse_duration, default_value = "6s")]
    timeout: Duration,

    /// Validate and check existence only; create nothing.
    #[arg(long)]
    dry_run: bool,

    /// Turn domain-like input (e.g. "Example.com") into a valid name.
    #[arg(long)]
    normalize: bool,

    /// Append created accounts to the CSV audit file.
    #[arg(
        long,
        value_name = "BOOL",
        action = ArgAction::Set,
        num_args = 0..=1,
        default_value_t = true,
        default_missing_value = "true"
    )]
    export_csv: bool,

    /// Path of the CSV audit file (default: $XDG_DATA_HOME/mariadb-tool/accounts.csv).
    #[arg(long, value_name = "PATH")]
    csv_path: Option<PathBuf>,

    /// Path of the error log (default: $XDG_STATE_HOME/mariadb-tool/error.log).
    #[arg(long, value_name = "PATH")]
    error_log: Option<PathBuf>,

    /// Show debug output on stderr.
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    /// Resolves the XDG defaults and applies any path flags on top.
    fn paths(&self) -> anyhow::Result<AppPaths> {
        let mut paths = resolve_default_paths().context("could not resolve default file locations")?;
        if let Some(path) = &self.config {
            paths.config_file = path.clone();
        }
        if let Some(path) = &self.csv_path {
            paths.csv_file = path.clone();
        }
        if let Some(path) = &self.error_log {
            paths.error_log = path.clone();
        }
        Ok(paths)
    }

    /// The options every provisioning attempt of this run shares.
    fn template(&self) -> ProvisioningRequest {
        ProvisioningRequest {
            raw_name: String::new(),
            user_host: self.user_host.clone(),
            allow_wildcard_host: self.allow_wildcard_host,
            normalize: self.normalize,
            dry_run: self.dry_run,
            timeout: self.timeout,
        }
    }
}

// ==============================================================================
// Command Logic
// ==============================================================================

async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let paths = cli.paths()?;
    tracing::debug!(?paths, "resolved file locations");

    if cli.init {
        init_config(&paths.config_file)?;
        return Ok(ExitCode::SUCCESS);
    }

    if !paths.config_file.exists() {
        anyhow::bail!(
            "no config file at {}; run `mariadb-tool --init` to create one",
            paths.config_file.display()
        );
    }
    let config = load_server_config(&paths.config_file)
        .with_context(|| format!("could not load {}", paths.config_file.display()))?;

    let trail = ErrorTrail::new(&paths.error_log);
    let pool = match connect(&config, cli.timeout).await {
        Ok(pool) => pool,
        Err(e) => {
            trail.record(&format!("Connection failed: {e}"));
            return Err(e).with_context(|| {
                format!("could not connect to {}:{}", config.hostname, config.port)
            });
        }
    };

    let mut provisioner = Provisioner::new(MySqlServer::new(pool), trail);
    if cli.export_csv {
        provisioner = provisioner.with_audit(CsvAuditSink::new(&paths.csv_file));
    }

    let template = cli.template();
    let code = match (&cli.create, &cli.file) {
        (Some(name), _) => provision_one(&provisioner, &template, name).await,
        (None, Some(file)) => provision_file(&provisioner, &template, file).await,
        (None, None) => ExitCode::SUCCESS,
    };

    provisioner.server().close().await;
    Ok(code)
}

async fn provision_one(
    provisioner: &Provisioner<MySqlServer>,
    template: &ProvisioningRequest,
    name: &str,
) -> ExitCode {
    match provisioner.provision(&template.for_name(name)).await {
        Ok(result) => {
            print_result(&result, template.normalize);
            ExitCode::SUCCESS
        }
        Err(e) => {
            let message = format!("{}: {e}", name.trim());
            println!("FAILED: {message}");
            provisioner.trail().record(&message);
            ExitCode::FAILURE
        }
    }
}

async fn provision_file(
    provisioner: &Provisioner<MySqlServer>,
    template: &ProvisioningRequest,
    path: &Path,
) -> ExitCode {
    let file = match tokio::fs::File::open(path).await {
        Ok(file) => file,
        Err(e) => {
            let message = format!("Could not open batch file {}: {e}", path.display());
            eprintln!("{message}");
            provisioner.trail().record(&message);
            return ExitCode::FAILURE;
        }
    };

    let reader = tokio::io::BufReader::new(file);
    let summary = match provisioner
        .run_batch(template, reader, |outcome| print_outcome(&outcome, template.normalize))
        .await
    {
        Ok(summary) => summary,
        Err(e) => {
            let message = format!("Batch {} aborted: {e}", path.display());
            eprintln!("{message}");
            provisioner.trail().record(&message);
            return ExitCode::FAILURE;
        }
    };

    print_summary(&summary);
    if summary.failed > 0 {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

// ==============================================================================
// Reporting
// ==============================================================================

fn print_outcome(outcome: &BatchOutcome<'_>, normalize: bool) {
    match outcome.result {
        Ok(result) => print_result(result, normalize),
        Err(e) => println!("FAILED: Line {} ({}): {e}", outcome.line, outcome.raw),
    }
}

fn print_result(result: &ProvisioningResult, normalize: bool) {
    if normalize && result.was_normalized() {
        println!(
            "   Requested: {} -> Normalized: {}",
            result.requested_name, result.resolved_name
        );
    }

    match result.status {
        ProvisionStatus::Skipped => println!("SKIP: {}", result.message),
        ProvisionStatus::DryRunOk => println!("DRY-RUN OK: {}", result.resolved_name),
        ProvisionStatus::Created => {
            println!("Success: {} created.", result.resolved_name);
            println!("   Username: {}", result.username);
            println!("   Host:     {}", result.user_host);
            if let Some(password) = &result.password {
                println!("   Password: {}", password.expose_secret());
            }
        }
    }
}

fn print_summary(summary: &BatchSummary) {
    println!(
        "\n{} processed: {} created, {} skipped, {} dry-run, {} failed",
        summary.total(),
        summary.created,
        summary.skipped,
        summary.dry_run,
        summary.failed
    );
    if summary.unaudited > 0 {
        println!(
            "WARNING: {} created account(s) are missing from the CSV audit file; see the error log.",
            summary.unaudited
        );
    }
}

// ==============================================================================
// Config Bootstrap (--init)
// ==============================================================================

/// Prompts for the admin credentials on stdin and writes them to `path`.
fn init_config(path: &Path) -> anyhow::Result<()> {
    let stdin = io::stdin();
    let mut input = stdin.lock();

    if path.exists() {
        let answer = prompt(
            &mut input,
            &format!("{} already exists. Overwrite? (y/N): ", path.display()),
        )?;
        if !answer.trim().eq_ignore_ascii_case("y") {
            println!("Keeping existing {}.", path.display());
            return Ok(());
        }
    }

    let defaults = ServerConfig::default();
    let username = prompt_or_default(&mut input, "MariaDB admin username", &defaults.username)?;
    // Taken verbatim; a password may legitimately contain spaces.
    let password = prompt(&mut input, "Enter MariaDB admin password: ")?;
    let hostname = prompt_or_default(&mut input, "MariaDB hostname", &defaults.hostname)?;
    let port = prompt_or_default(&mut input, "MariaDB port", &defaults.port.to_string())?;
    let port: u16 = port
        .parse()
        .with_context(|| format!("invalid port '{port}'"))?;

    let config = ServerConfig {
        username,
        password,
        hostname,
        port,
    };
    write_config_file(path, &config)
        .with_context(|| format!("could not write {}", path.display()))?;

    println!("{} created (0600).", path.display());
    Ok(())
}

/// Prints `label` and reads one line, without its line terminator.
fn prompt(input: &mut impl BufRead, label: &str) -> anyhow::Result<String> {
    print!("{label}");
    io::stdout().flush()?;

    let mut line = String::new();
    input.read_line(&mut line).context("could not read from stdin")?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

fn prompt_or_default(input: &mut impl BufRead, label: &str, default: &str) -> anyhow::Result<String> {
    let answer = prompt(input, &format!("Enter {label} [{default}]: "))?;
    let answer = answer.trim();
    Ok(if answer.is_empty() {
        default.to_string()
    } else {
        answer.to_string()
    })
}
