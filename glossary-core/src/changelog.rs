//! Change tracking
//!
//! Compares the stored version of a metric with an edited version and turns
//! every differing tracked field into a changelog entry. The functions here
//! never touch the store.
//!
//! SQL patterns and related metric ids are not tracked: edits to them are
//! applied silently.

use chrono::{DateTime, Utc};
use std::fmt;

use crate::ids::IdGenerator;
use crate::models::{ChangelogEntry, GlossaryMetric};

/// A metric field whose edits are recorded in the changelog
///
/// `as_str` is the value stored in `ChangelogEntry::field`:
/// `name`, `description`, `category`, `dataset`, `sample_question` and
/// `synonyms`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrackedField {
    Name,
    Description,
    Category,
    Dataset,
    SampleQuestion,
    Synonyms,
}

impl TrackedField {
    /// Every tracked field, in the order entries are emitted for one edit
    pub const ALL: [TrackedField; 6] = [
        TrackedField::Name,
        TrackedField::Description,
        TrackedField::Category,
        TrackedField::Dataset,
        TrackedField::SampleQuestion,
        TrackedField::Synonyms,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TrackedField::Name => "name",
            TrackedField::Description => "description",
            TrackedField::Category => "category",
            TrackedField::Dataset => "dataset",
            TrackedField::SampleQuestion => "sample_question",
            TrackedField::Synonyms => "synonyms",
        }
    }

    /// String form of this field on `metric`; synonyms are compared as
    /// joined text
    pub fn value_of(&self, metric: &GlossaryMetric) -> String {
        match self {
            TrackedField::Name => metric.name.clone(),
            TrackedField::Description => metric.description.clone(),
            TrackedField::Category => metric.category.to_string(),
            TrackedField::Dataset => metric.dataset.to_string(),
            TrackedField::SampleQuestion => metric.sample_question.clone(),
            TrackedField::Synonyms => metric.synonyms_text(),
        }
    }
}

impl fmt::Display for TrackedField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Who made an edit and when
#[derive(Debug, Clone)]
pub struct ChangeContext<'a> {
    pub user: &'a str,
    pub timestamp: DateTime<Utc>,
}

impl<'a> ChangeContext<'a> {
    pub fn now(user: &'a str) -> Self {
        Self {
            user,
            timestamp: Utc::now(),
        }
    }
}

/// Builds a single changelog entry with a fresh id
pub fn field_change(
    field: &str,
    old_value: String,
    new_value: String,
    ctx: &ChangeContext<'_>,
    ids: &mut dyn IdGenerator,
) -> ChangelogEntry {
    ChangelogEntry {
        id: ids.next_id(),
        timestamp: ctx.timestamp,
        field: field.to_string(),
        old_value,
        new_value,
        user: ctx.user.to_string(),
    }
}

/// Computes the changelog entries describing `old` -> `new`
///
/// One entry per differing field, in `TrackedField::ALL` order. The synonym
/// list yields at most one entry.
pub fn diff_metrics(
    old: &GlossaryMetric,
    new: &GlossaryMetric,
    ctx: &ChangeContext<'_>,
    ids: &mut dyn IdGenerator,
) -> Vec<ChangelogEntry> {
    let mut changes = Vec::new();

    for field in TrackedField::ALL {
        let old_value = field.value_of(old);
        let new_value = field.value_of(new);
        if old_value != new_value {
            changes.push(field_change(field.as_str(), old_value, new_value, ctx, ids));
        }
    }

    changes
}

/// Returns `new` with its changelog set to `old`'s history followed by the
/// entries describing the edit
pub fn apply_changes(
    old: &GlossaryMetric,
    mut new: GlossaryMetric,
    ctx: &ChangeContext<'_>,
    ids: &mut dyn IdGenerator,
) -> GlossaryMetric {
    let changes = diff_metrics(old, &new, ctx, ids);
    let mut changelog = old.changelog.clone();
    changelog.extend(changes);
    new.changelog = changelog;
    new
}

/// Changelog entries most recent first; entries sharing a timestamp keep
/// their recorded order
pub fn most_recent_first(changelog: &[ChangelogEntry]) -> Vec<&ChangelogEntry> {
    let mut entries: Vec<&ChangelogEntry> = changelog.iter().collect();
    entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    entries
}
