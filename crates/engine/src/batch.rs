use crate::error::ProvisionError;
use crate::provisioner::Provisioner;
use core_types::{ProvisionStatus, ProvisioningRequest, ProvisioningResult};
use database::AccountServer;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

/// The outcome of one batch record, handed to the caller as soon as it is known.
#[derive(Debug)]
pub struct BatchOutcome<'a> {
    /// 1-based line number in the source.
    pub line: usize,
    /// The record after comment stripping and trimming.
    pub raw: &'a str,
    pub result: &'a Result<ProvisioningResult, ProvisionError>,
}

/// Per-status counts for a finished batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub created: usize,
    pub skipped: usize,
    pub dry_run: usize,
    pub failed: usize,
    /// Created accounts whose audit row could not be written.
    pub unaudited: usize,
}

impl BatchSummary {
    pub fn total(&self) -> usize {
        self.created + self.skipped + self.dry_run + self.failed
    }

    fn count(&mut self, result: &Result<ProvisioningResult, ProvisionError>) {
        match result {
            Ok(r) => match r.status {
                ProvisionStatus::Created => {
                    self.created += 1;
                    if !r.audit_written {
                        self.unaudited += 1;
                    }
                }
                ProvisionStatus::Skipped => self.skipped += 1,
                ProvisionStatus::DryRunOk => self.dry_run += 1,
            },
            Err(_) => self.failed += 1,
        }
    }
}

/// Extracts the record from one batch line.
///
/// Returns `None` for blank lines and comment lines (`#` or `;`). Anything after an
/// inline `#` or `;` is dropped.
pub fn parse_batch_line(line: &str) -> Option<&str> {
    let record = match line.find(['#', ';']) {
        Some(idx) => &line[..idx],
        None => line,
    };
    let record = record.trim();
    (!record.is_empty()).then_some(record)
}

impl<S: AccountServer> Provisioner<S> {
    /// Provisions every record of `source` with the options of `template`.
    ///
    /// Records run one after another, in source order. A failing record is written
    /// to the error trail as `Line <n> (<record>): <error>` and the batch moves on;
    /// only a read error on `source` itself ends the batch early.
    pub async fn run_batch<R, F>(
        &self,
        template: &ProvisioningRequest,
        source: R,
        mut on_outcome: F,
    ) -> Result<BatchSummary, ProvisionError>
    where
        R: AsyncBufRead + Unpin,
        F: FnMut(BatchOutcome<'_>),
    {
        let mut summary = BatchSummary::default();
        let mut lines = source.lines();
        let mut line_no = 0usize;

        while let Some(line) = lines.next_line().await? {
            line_no += 1;
            let Some(raw) = parse_batch_line(&line) else {
                continue;
            };

            let result = self.provision(&template.for_name(raw)).await;
            if let Err(e) = &result {
                let message = format!("Line {line_no} ({raw}): {e}");
                tracing::warn!(line = line_no, record = raw, error = %e, "batch record failed");
                self.trail().record(&message);
            }

            summary.count(&result);
            on_outcome(BatchOutcome {
                line: line_no,
                raw,
                result: &result,
            });
        }

        tracing::info!(?summary, "batch finished");
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake::FakeServer;
    use audit::{CsvAuditSink, ErrorTrail};
    use core_types::Step;

    #[test]
    fn parses_records_and_comments() {
        assert_eq!(parse_batch_line("shop"), Some("shop"));
        assert_eq!(parse_batch_line("  shop  "), Some("shop"));
        assert_eq!(parse_batch_line(""), None);
        assert_eq!(parse_batch_line("   "), None);
        assert_eq!(parse_batch_line("# comment"), None);
        assert_eq!(parse_batch_line("  ; comment"), None);
        assert_eq!(parse_batch_line("shop # main store"), Some("shop"));
        assert_eq!(parse_batch_line("shop;legacy"), Some("shop"));
        assert_eq!(parse_batch_line("   # "), None);
    }

    fn provisioner(dir: &tempfile::TempDir, server: FakeServer) -> Provisioner<FakeServer> {
        Provisioner::new(server, ErrorTrail::new(dir.path().join("error.log")))
            .with_audit(CsvAuditSink::new(dir.path().join("accounts.csv")))
    }

    #[tokio::test]
    async fn bad_record_does_not_stop_the_batch() {
        let dir = tempfile::tempdir().unwrap();
        let p = provisioner(&dir, FakeServer::default().with_schema("existing"));
        let input = "# customers\nfirst\n\nbad-name\nexisting ; already there\nlast\n";

        let mut seen = Vec::new();
        let summary = p
            .run_batch(&ProvisioningRequest::default(), input.as_bytes(), |o| {
                let status = o.result.as_ref().map(|r| r.status).ok();
                seen.push((o.line, o.raw.to_string(), status));
            })
            .await
            .unwrap();

        assert_eq!(
            seen,
            vec![
                (2, "first".to_string(), Some(ProvisionStatus::Created)),
                (4, "bad-name".to_string(), None),
                (5, "existing".to_string(), Some(ProvisionStatus::Skipped)),
                (6, "last".to_string(), Some(ProvisionStatus::Created)),
            ]
        );
        assert_eq!(
            summary,
            BatchSummary {
                created: 2,
                skipped: 1,
                dry_run: 0,
                failed: 1,
                unaudited: 0,
            }
        );
        assert_eq!(summary.total(), 4);

        let trail = std::fs::read_to_string(dir.path().join("error.log")).unwrap();
        assert!(trail.contains("Line 4 (bad-name): Invalid identifier"));
        assert_eq!(trail.lines().count(), 1);
    }

    #[tokio::test]
    async fn server_failure_is_attributed_to_its_line() {
        let dir = tempfile::tempdir().unwrap();
        let p = provisioner(&dir, FakeServer::default().failing_name("second"));
        let input = "first\nsecond\nthird\n";

        let summary = p
            .run_batch(&ProvisioningRequest::default(), input.as_bytes(), |_| {})
            .await
            .unwrap();

        assert_eq!(summary.created, 2);
        assert_eq!(summary.failed, 1);
        assert!(p.server().has_schema("third"));

        let trail = std::fs::read_to_string(dir.path().join("error.log")).unwrap();
        assert!(trail.contains("Line 2 (second): Failed to create database"));
    }

    #[tokio::test]
    async fn batch_applies_template_options() {
        let dir = tempfile::tempdir().unwrap();
        let p = provisioner(&dir, FakeServer::default());
        let template = ProvisioningRequest {
            normalize: true,
            dry_run: true,
            ..ProvisioningRequest::default()
        };

        let mut resolved = Vec::new();
        let summary = p
            .run_batch(&template, "Example.com\nmy-site.se\n".as_bytes(), |o| {
                resolved.push(o.result.as_ref().unwrap().resolved_name.to_string());
            })
            .await
            .unwrap();

        assert_eq!(resolved, vec!["example_com", "my_site_se"]);
        assert_eq!(summary.dry_run, 2);
        assert!(p.server().executed_steps().is_empty());
    }

    #[tokio::test]
    async fn grant_failures_in_batch_leave_nothing_behind() {
        let dir = tempfile::tempdir().unwrap();
        let p = provisioner(&dir, FakeServer::default().failing(Step::GrantRights));

        let summary = p
            .run_batch(&ProvisioningRequest::default(), "a\nb\n".as_bytes(), |_| {})
            .await
            .unwrap();

        assert_eq!(summary.failed, 2);
        assert!(!p.server().has_schema("a"));
        assert!(!p.server().has_schema("b"));
    }
}
