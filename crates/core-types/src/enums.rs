use serde::{Deserialize, Serialize};
use std::fmt;

/// Terminal outcome of a provisioning attempt that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProvisionStatus {
    /// The database or the user (or both) already existed; nothing was touched.
    Skipped,
    /// Validation and the existence check passed; no statement was issued.
    DryRunOk,
    /// Database, user and grant were all created.
    Created,
}

impl fmt::Display for ProvisionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ProvisionStatus::Skipped => "skipped",
            ProvisionStatus::DryRunOk => "dry-run ok",
            ProvisionStatus::Created => "created",
        };
        f.write_str(label)
    }
}

/// A single server interaction of the provisioning sequence, used to tag failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Step {
    CheckSchema,
    CheckPrincipal,
    CreateSchema,
    CreatePrincipal,
    GrantRights,
    DropPrincipal,
    DropSchema,
}

impl Step {
    /// Whether this step changes server state.
    pub fn is_mutation(&self) -> bool {
        !matches!(self, Step::CheckSchema | Step::CheckPrincipal)
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Step::CheckSchema => "check database",
            Step::CheckPrincipal => "check user",
            Step::CreateSchema => "create database",
            Step::CreatePrincipal => "create user",
            Step::GrantRights => "grant privileges",
            Step::DropPrincipal => "drop user",
            Step::DropSchema => "drop database",
        };
        f.write_str(label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn steps_can_be_collected_into_sets() {
        let undo: HashSet<Step> = [Step::DropPrincipal, Step::DropSchema, Step::DropSchema]
            .into_iter()
            .collect();
        assert_eq!(undo.len(), 2);
        assert!(undo.contains(&Step::DropSchema));
        assert!(!undo.contains(&Step::CreateSchema));
    }

    #[test]
    fn only_checks_are_read_only() {
        assert!(!Step::CheckSchema.is_mutation());
        assert!(!Step::CheckPrincipal.is_mutation());
        assert!(Step::CreateSchema.is_mutation());
        assert!(Step::DropPrincipal.is_mutation());
    }

    #[test]
    fn labels_read_as_actions() {
        assert_eq!(Step::GrantRights.to_string(), "grant privileges");
        assert_eq!(ProvisionStatus::DryRunOk.to_string(), "dry-run ok");
    }
}
