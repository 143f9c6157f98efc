//! Error types for glossary operations

use thiserror::Error;

/// Errors surfaced by the glossary core
///
/// Store mutators never produce these: an unknown id on update or delete is
/// a silent no-op. Errors come from validating drafts before they reach the
/// store, and from parsing user-supplied vocabulary.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GlossaryError {
    #[error("Metric name is required")]
    EmptyName,

    #[error("Unknown category: {0}")]
    UnknownCategory(String),

    #[error("Unknown dataset: {0}")]
    UnknownDataset(String),

    #[error("Unknown view mode: {0} (expected table or cards)")]
    UnknownViewMode(String),

    #[error("Unknown export format: {0} (expected json, yaml or markdown)")]
    UnknownExportFormat(String),

    #[error("Metric not found: {0}")]
    MetricNotFound(String),
}
