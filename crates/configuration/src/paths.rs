//! XDG Base Directory compliant default locations.

use crate::error::ConfigError;
use std::path::{Path, PathBuf};

/// Directory name used under each XDG base directory.
pub const APP_NAME: &str = "mariadb-tool";

pub const CONFIG_FILE_NAME: &str = "config.ini";
pub const CSV_FILE_NAME: &str = "accounts.csv";
pub const ERROR_LOG_NAME: &str = "error.log";

/// Resolved default file locations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppPaths {
    /// `$XDG_CONFIG_HOME/mariadb-tool/config.ini`
    pub config_file: PathBuf,
    /// `$XDG_DATA_HOME/mariadb-tool/accounts.csv`
    pub csv_file: PathBuf,
    /// `$XDG_STATE_HOME/mariadb-tool/error.log`
    pub error_log: PathBuf,
}

/// Resolves the default paths from the process environment.
///
/// Uses `XDG_CONFIG_HOME`, `XDG_DATA_HOME` and `XDG_STATE_HOME` when set and
/// non-blank, otherwise `~/.config`, `~/.local/share` and `~/.local/state`.
pub fn resolve_default_paths() -> Result<AppPaths, ConfigError> {
    let home = dirs::home_dir().ok_or(ConfigError::HomeDirNotFound)?;
    let var = |name: &str| {
        std::env::var_os(name)
            .map(PathBuf::from)
            .filter(|p| !p.as_os_str().is_empty() && !p.to_string_lossy().trim().is_empty())
    };

    Ok(resolve_paths(
        &home,
        var("XDG_CONFIG_HOME"),
        var("XDG_DATA_HOME"),
        var("XDG_STATE_HOME"),
    ))
}

/// Pure path resolution used by [`resolve_default_paths`].
pub fn resolve_paths(
    home: &Path,
    config_home: Option<PathBuf>,
    data_home: Option<PathBuf>,
    state_home: Option<PathBuf>,
) -> AppPaths {
    let config_home = config_home.unwrap_or_else(|| home.join(".config"));
    let data_home = data_home.unwrap_or_else(|| home.join(".local").join("share"));
    let state_home = state_home.unwrap_or_else(|| home.join(".local").join("state"));

    tracing::debug!(
        config_home = %config_home.display(),
        data_home = %data_home.display(),
        state_home = %state_home.display(),
        "resolved XDG paths"
    );

    AppPaths {
        config_file: config_home.join(APP_NAME).join(CONFIG_FILE_NAME),
        csv_file: data_home.join(APP_NAME).join(CSV_FILE_NAME),
        error_log: state_home.join(APP_NAME).join(ERROR_LOG_NAME),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn falls_back_to_home_directories() {
        let paths = resolve_paths(Path::new("/home/op"), None, None, None);
        assert_eq!(
            paths.config_file,
            PathBuf::from("/home/op/.config/mariadb-tool/config.ini")
        );
        assert_eq!(
            paths.csv_file,
            PathBuf::from("/home/op/.local/share/mariadb-tool/accounts.csv")
        );
        assert_eq!(
            paths.error_log,
            PathBuf::from("/home/op/.local/state/mariadb-tool/error.log")
        );
    }

    #[test]
    fn xdg_overrides_win() {
        let paths = resolve_paths(
            Path::new("/home/op"),
            Some(PathBuf::from("/cfg")),
            Some(PathBuf::from("/data")),
            Some(PathBuf::from("/state")),
        );
        assert_eq!(paths.config_file, PathBuf::from("/cfg/mariadb-tool/config.ini"));
        assert_eq!(paths.csv_file, PathBuf::from("/data/mariadb-tool/accounts.csv"));
        assert_eq!(paths.error_log, PathBuf::from("/state/mariadb-tool/error.log"));
    }
}
