use crate::error::ConfigError;
use crate::settings::{ServerConfig, render_ini};
use std::fs;
use std::path::Path;

/// Writes a fresh config file for `--init`.
///
/// The parent directory is created with mode 0700 and the file with 0600 on unix,
/// since the file holds the admin password. An existing file is overwritten; the
/// caller is responsible for asking first.
pub fn write_config_file(path: &Path, config: &ServerConfig) -> Result<(), ConfigError> {
    let io_err = |source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        create_private_dir(parent).map_err(io_err)?;
    }

    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    use std::io::Write;
    let mut file = options.open(path).map_err(io_err)?;
    file.write_all(render_ini(config).as_bytes()).map_err(io_err)?;

    tracing::info!(path = %path.display(), "wrote config file");
    Ok(())
}

fn create_private_dir(dir: &Path) -> std::io::Result<()> {
    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(0o700);
    }
    builder.create(dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::load_server_config;

    #[test]
    fn writes_loadable_config_in_new_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.ini");
        let cfg = ServerConfig {
            username: "admin".to_string(),
            password: "Secret1".to_string(),
            hostname: "10.0.0.5".to_string(),
            port: 3307,
        };

        write_config_file(&path, &cfg).unwrap();
        assert_eq!(load_server_config(&path).unwrap(), cfg);
    }

    #[cfg(unix)]
    #[test]
    fn config_file_is_private() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.ini");
        write_config_file(&path, &ServerConfig::default()).unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
