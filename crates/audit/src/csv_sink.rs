use crate::error::AuditError;
use crate::fs::open_private_append;
use core_types::AuditRecord;
use std::path::{Path, PathBuf};

/// Append-only CSV file of created accounts: `Timestamp,Database,Username,Password`.
///
/// The file holds plaintext credentials; it is created with owner-only permissions.
#[derive(Debug, Clone)]
pub struct CsvAuditSink {
    path: PathBuf,
}

impl CsvAuditSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends one row. The header is written first when the file is new or empty.
    pub fn append(&self, record: &AuditRecord) -> Result<(), AuditError> {
        let open_err = |source| AuditError::Open {
            path: self.path.clone(),
            source,
        };

        let file = open_private_append(&self.path).map_err(open_err)?;
        let is_empty = file.metadata().map_err(open_err)?.len() == 0;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(is_empty)
            .from_writer(file);
        writer.serialize(record)?;
        writer.flush().map_err(|source| AuditError::Flush {
            path: self.path.clone(),
            source,
        })?;

        tracing::debug!(path = %self.path.display(), database = %record.database, "audit row written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::{Password, validate_identifier};

    fn record(name: &str, password: &str) -> AuditRecord {
        let id = validate_identifier(name).unwrap();
        AuditRecord::new(&id, &id, &Password::new(password.to_string()))
    }

    #[test]
    fn header_is_written_once() {
        let dir = tempfile::tempdir().unwrap();
        let sink = CsvAuditSink::new(dir.path().join("data").join("accounts.csv"));

        sink.append(&record("first", "Abc123!#")).unwrap();
        sink.append(&record("second", "Xyz%&987")).unwrap();

        let contents = std::fs::read_to_string(sink.path()).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "Timestamp,Database,Username,Password");
        assert!(lines[1].ends_with(",first,first,Abc123!#"));
        assert!(lines[2].ends_with(",second,second,Xyz%&987"));
        assert_eq!(
            contents.matches("Timestamp").count(),
            1,
            "header must appear exactly once"
        );
    }

    #[test]
    fn timestamp_has_minute_granularity() {
        let dir = tempfile::tempdir().unwrap();
        let sink = CsvAuditSink::new(dir.path().join("accounts.csv"));
        sink.append(&record("db", "pw")).unwrap();

        let contents = std::fs::read_to_string(sink.path()).unwrap();
        let row = contents.lines().nth(1).unwrap();
        let timestamp = row.split(',').next().unwrap();
        // e.g. "2026-01-31 23:59"
        assert_eq!(timestamp.len(), 16);
        assert_eq!(&timestamp[10..11], " ");
    }

    #[test]
    fn header_is_added_to_existing_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("accounts.csv");
        std::fs::write(&path, "").unwrap();

        CsvAuditSink::new(&path).append(&record("db", "pw")).unwrap();
        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.starts_with("Timestamp,Database,Username,Password\n"));
    }

    #[test]
    fn unwritable_path_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        // A directory cannot be opened for appending.
        let sink = CsvAuditSink::new(dir.path());
        assert!(matches!(
            sink.append(&record("db", "pw")),
            Err(AuditError::Open { .. })
        ));
    }

    #[cfg(unix)]
    #[test]
    fn accounts_file_is_private() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let sink = CsvAuditSink::new(dir.path().join("accounts.csv"));
        sink.append(&record("db", "pw")).unwrap();
        let mode = std::fs::metadata(sink.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
