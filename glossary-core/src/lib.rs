pub mod changelog;
pub mod config;
pub mod error;
pub mod export;
pub mod glossary;
pub mod ids;
pub mod lineage;
pub mod models;
pub mod query;
pub mod samples;
pub mod store;

// Re-export commonly used types
pub use changelog::{apply_changes, diff_metrics, ChangeContext, TrackedField};
pub use config::{get_config_path, GlossaryConfig, ViewMode, DEFAULT_ACTOR};
pub use error::GlossaryError;
pub use export::ExportFormat;
pub use glossary::Glossary;
pub use ids::{IdGenerator, SequentialIds, UuidIds};
pub use lineage::Lineage;
pub use models::{
    parse_synonyms, Category, CategoryFilter, ChangelogEntry, Dataset, DatasetFilter,
    GlossaryMetric, MetricDraft, SqlPattern,
};
pub use query::{FilterState, TableView};
pub use samples::sample_metrics;
pub use store::MetricStore;
