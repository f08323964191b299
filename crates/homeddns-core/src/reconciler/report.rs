//! Outcome log of a reconciliation pass

use crate::record::RecordType;
use chrono::{DateTime, Utc};
use std::fmt;

/// Which provider call a record failed on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Fetch,
    Create,
    Update,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Fetch => f.write_str("fetch"),
            Stage::Create => f.write_str("create"),
            Stage::Update => f.write_str("update"),
        }
    }
}

/// What happened to one record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordAction {
    /// The record was absent and has been created
    Created { value: String },
    /// The record held a different value and has been overwritten
    Updated { previous: String, value: String },
    /// The record already held the desired value
    Unchanged { value: String },
    /// A provider call failed; the pass moved on
    Failed { stage: Stage, error: String },
}

impl RecordAction {
    /// Whether this action issued (or, in dry-run, would issue) a write
    pub fn is_write(&self) -> bool {
        matches!(self, RecordAction::Created { .. } | RecordAction::Updated { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordOutcome {
    pub name: String,
    pub record_type: RecordType,
    pub action: RecordAction,
}

#[derive(Debug, Clone, Default)]
pub struct DomainReport {
    pub domain: String,
    pub records: Vec<RecordOutcome>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderStatus {
    Processed,
    /// The provider block was not processed at all
    Skipped { reason: String },
}

#[derive(Debug, Clone)]
pub struct ProviderReport {
    pub provider: String,
    pub status: ProviderStatus,
    pub domains: Vec<DomainReport>,
}

impl ProviderReport {
    pub(crate) fn skipped(provider: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            status: ProviderStatus::Skipped {
                reason: reason.into(),
            },
            domains: Vec::new(),
        }
    }
}

/// Everything one pass did, in configuration order
#[derive(Debug, Clone)]
pub struct ReconcileReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub dry_run: bool,
    pub providers: Vec<ProviderReport>,
}

impl ReconcileReport {
    /// Iterate over every record outcome of the pass
    pub fn outcomes(&self) -> impl Iterator<Item = &RecordOutcome> {
        self.providers
            .iter()
            .flat_map(|p| &p.domains)
            .flat_map(|d| &d.records)
    }

    pub fn created(&self) -> usize {
        self.count(|a| matches!(a, RecordAction::Created { .. }))
    }

    pub fn updated(&self) -> usize {
        self.count(|a| matches!(a, RecordAction::Updated { .. }))
    }

    pub fn unchanged(&self) -> usize {
        self.count(|a| matches!(a, RecordAction::Unchanged { .. }))
    }

    pub fn failed(&self) -> usize {
        self.count(|a| matches!(a, RecordAction::Failed { .. }))
    }

    pub fn writes(&self) -> usize {
        self.count(RecordAction::is_write)
    }

    pub fn skipped_providers(&self) -> usize {
        self.providers
            .iter()
            .filter(|p| matches!(p.status, ProviderStatus::Skipped { .. }))
            .count()
    }

    /// True when a record failed or a provider block was skipped
    pub fn has_failures(&self) -> bool {
        self.failed() > 0 || self.skipped_providers() > 0
    }

    fn count(&self, predicate: impl Fn(&RecordAction) -> bool) -> usize {
        self.outcomes().filter(|o| predicate(&o.action)).count()
    }
}

impl fmt::Display for ReconcileReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} created, {} updated, {} unchanged, {} failed, {} provider(s) skipped",
            self.created(),
            self.updated(),
            self.unchanged(),
            self.failed(),
            self.skipped_providers()
        )?;
        if self.dry_run {
            f.write_str(" (dry run)")?;
        }
        Ok(())
    }
}
