use crate::error::ConfigError;
use serde::Deserialize;
use std::fmt;
use std::path::Path;

/// The INI section holding the admin connection settings.
pub const SERVER_SECTION: &str = "mariadb";

/// Admin credentials and address of the server accounts are provisioned on.
#[derive(Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub username: String,
    pub password: String,
    pub hostname: String,
    pub port: u16,
}

impl fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerConfig")
            .field("username", &self.username)
            .field("password", &"***")
            .field("hostname", &self.hostname)
            .field("port", &self.port)
            .finish()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            username: "root".to_string(),
            password: String::new(),
            hostname: "localhost".to_string(),
            port: 3306,
        }
    }
}

/// Shape of the file on disk. Every key is optional here so that missing values
/// can be reported by name instead of as a generic deserialization failure.
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    mariadb: Option<RawServerSection>,
}

#[derive(Debug, Default, Deserialize)]
struct RawServerSection {
    username: Option<String>,
    password: Option<String>,
    hostname: Option<String>,
    port: Option<String>,
}

/// Loads the `[mariadb]` section of an INI file.
///
/// `username`, `hostname` and `port` are required; `password` may be empty.
pub fn load_server_config(path: &Path) -> Result<ServerConfig, ConfigError> {
    let builder = config::Config::builder()
        .add_source(config::File::from(path).format(config::FileFormat::Ini))
        .build()?;

    let file = builder.try_deserialize::<ConfigFile>()?;
    let section = file.mariadb.ok_or_else(|| ConfigError::MissingSection {
        section: SERVER_SECTION.to_string(),
        path: path.to_path_buf(),
    })?;

    let config = section.validate()?;
    tracing::debug!(?config, path = %path.display(), "loaded server configuration");
    Ok(config)
}

impl RawServerSection {
    fn validate(self) -> Result<ServerConfig, ConfigError> {
        let required = |value: Option<String>, key: &str| {
            value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or_else(|| {
                    ConfigError::ValidationError(format!(
                        "config missing required field '{key}' in [{SERVER_SECTION}]"
                    ))
                })
        };

        let username = required(self.username, "username")?;
        let hostname = required(self.hostname, "hostname")?;
        let port = required(self.port, "port")?;
        let port = port.parse::<u16>().map_err(|_| {
            ConfigError::ValidationError(format!("invalid port '{port}' in [{SERVER_SECTION}]"))
        })?;

        Ok(ServerConfig {
            username,
            password: self.password.unwrap_or_default(),
            hostname,
            port,
        })
    }
}

/// Renders a configuration back into the INI layout `load_server_config` reads.
///
/// String values are double-quoted so the password comes back byte for byte,
/// including surrounding spaces, quotes and backslashes.
pub fn render_ini(config: &ServerConfig) -> String {
    format!(
        "[{SERVER_SECTION}]\nusername={}\npassword={}\nhostname={}\nport={}\n",
        quote_value(&config.username),
        quote_value(&config.password),
        quote_value(&config.hostname),
        config.port
    )
}

/// Double-quoted INI value with the characters the parser treats specially escaped.
fn quote_value(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for c in value.chars() {
        match c {
            '"' => quoted.push_str("\\\""),
            '\\' => quoted.push_str("\\\\"),
            '\n' => quoted.push_str("\\n"),
            '\r' => quoted.push_str("\\r"),
            _ => quoted.push(c),
        }
    }
    quoted.push('"');
    quoted
}
