use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::Path;

/// Creates the parent directory of `path` (mode 0700 on unix) if it has one.
pub(crate) fn ensure_parent_dir(path: &Path) -> io::Result<()> {
    let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) else {
        return Ok(());
    };
    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(0o700);
    }
    builder.create(parent)
}

/// Opens `path` for appending, creating it (mode 0600 on unix) if needed.
/// Both files this crate writes may contain credentials.
pub(crate) fn open_private_append(path: &Path) -> io::Result<File> {
    ensure_parent_dir(path)?;
    let mut options = OpenOptions::new();
    options.append(true).create(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    options.open(path)
}
