use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::GlossaryError;
use crate::ids::IdGenerator;

/// Normalizes user input for case-insensitive vocabulary matching
/// ("core-entity", "Core_Entity" and "core entity" are all equal)
fn normalize_label(s: &str) -> String {
    s.trim().to_lowercase().replace(['-', '_'], " ")
}

/// Business category a metric belongs to
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    Calculated,
    #[serde(rename = "Core Entity")]
    CoreEntity,
    Customer,
    Financial,
    Marketing,
    Metric,
    Product,
    Segment,
    Status,
    #[serde(rename = "Treatment Type")]
    TreatmentType,
}

impl Category {
    /// Every category, in the order the category pills are shown
    pub const ALL: [Category; 10] = [
        Category::Calculated,
        Category::CoreEntity,
        Category::Customer,
        Category::Financial,
        Category::Marketing,
        Category::Metric,
        Category::Product,
        Category::Segment,
        Category::Status,
        Category::TreatmentType,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Category::Calculated => "Calculated",
            Category::CoreEntity => "Core Entity",
            Category::Customer => "Customer",
            Category::Financial => "Financial",
            Category::Marketing => "Marketing",
            Category::Metric => "Metric",
            Category::Product => "Product",
            Category::Segment => "Segment",
            Category::Status => "Status",
            Category::TreatmentType => "Treatment Type",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for Category {
    type Err = GlossaryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = normalize_label(s);
        Category::ALL
            .into_iter()
            .find(|c| normalize_label(c.label()) == wanted)
            .ok_or_else(|| GlossaryError::UnknownCategory(s.to_string()))
    }
}

/// Source dataset a metric is computed from
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Dataset {
    Sales,
    Marketing,
    Finance,
    Operations,
    Customer,
    Product,
}

impl Dataset {
    pub const ALL: [Dataset; 6] = [
        Dataset::Sales,
        Dataset::Marketing,
        Dataset::Finance,
        Dataset::Operations,
        Dataset::Customer,
        Dataset::Product,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Dataset::Sales => "Sales",
            Dataset::Marketing => "Marketing",
            Dataset::Finance => "Finance",
            Dataset::Operations => "Operations",
            Dataset::Customer => "Customer",
            Dataset::Product => "Product",
        }
    }
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for Dataset {
    type Err = GlossaryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = normalize_label(s);
        Dataset::ALL
            .into_iter()
            .find(|d| normalize_label(d.label()) == wanted)
            .ok_or_else(|| GlossaryError::UnknownDataset(s.to_string()))
    }
}

/// Category dimension of a filter; `All` is never stored on a metric
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

impl CategoryFilter {
    /// "All" followed by every category
    pub fn choices() -> Vec<CategoryFilter> {
        std::iter::once(CategoryFilter::All)
            .chain(Category::ALL.into_iter().map(CategoryFilter::Only))
            .collect()
    }

    pub fn matches(&self, category: Category) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(c) => *c == category,
        }
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategoryFilter::All => write!(f, "All"),
            CategoryFilter::Only(c) => write!(f, "{}", c),
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = GlossaryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if normalize_label(s) == "all" {
            return Ok(CategoryFilter::All);
        }
        s.parse().map(CategoryFilter::Only)
    }
}

/// Dataset dimension of a filter; `All` is never stored on a metric
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DatasetFilter {
    #[default]
    All,
    Only(Dataset),
}

impl DatasetFilter {
    /// "All Datasets" followed by every dataset
    pub fn choices() -> Vec<DatasetFilter> {
        std::iter::once(DatasetFilter::All)
            .chain(Dataset::ALL.into_iter().map(DatasetFilter::Only))
            .collect()
    }

    pub fn matches(&self, dataset: Dataset) -> bool {
        match self {
            DatasetFilter::All => true,
            DatasetFilter::Only(d) => *d == dataset,
        }
    }
}

impl fmt::Display for DatasetFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatasetFilter::All => write!(f, "All Datasets"),
            DatasetFilter::Only(d) => write!(f, "{}", d),
        }
    }
}

impl FromStr for DatasetFilter {
    type Err = GlossaryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = normalize_label(s);
        if normalized == "all" || normalized == "all datasets" {
            return Ok(DatasetFilter::All);
        }
        s.parse().map(DatasetFilter::Only)
    }
}

/// An illustrative SQL query attached to a metric (display only)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SqlPattern {
    /// Unique within the owning metric
    pub id: String,
    pub label: String,
    pub query: String,
}

impl SqlPattern {
    /// A blank pattern with a fresh id, as seeded on the create form
    pub fn blank(ids: &mut dyn IdGenerator) -> Self {
        Self {
            id: ids.next_id(),
            label: String::new(),
            query: String::new(),
        }
    }
}

/// A single field-level change recorded against a metric
///
/// Entries are immutable once created and only ever appended.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChangelogEntry {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    /// Name of the changed attribute (e.g. "name", "synonyms")
    pub field: String,
    pub old_value: String,
    pub new_value: String,
    /// Who made the change
    pub user: String,
}

/// A named business metric or KPI
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GlossaryMetric {
    /// Unique across the store, never reassigned
    pub id: String,

    pub name: String,

    pub description: String,

    pub category: Category,

    pub dataset: Dataset,

    /// Alternate labels, used for search matching
    #[serde(default)]
    pub synonyms: Vec<String>,

    #[serde(default)]
    pub sql_patterns: Vec<SqlPattern>,

    #[serde(default)]
    pub sample_question: String,

    /// Directed edges: the metrics this one depends on. May dangle.
    #[serde(default)]
    pub related_metric_ids: Vec<String>,

    /// Append-only edit history
    #[serde(default)]
    pub changelog: Vec<ChangelogEntry>,
}

impl GlossaryMetric {
    /// Builds a stored metric from a draft, with an empty changelog
    pub fn from_draft(id: String, draft: MetricDraft) -> Self {
        Self {
            id,
            name: draft.name,
            description: draft.description,
            category: draft.category,
            dataset: draft.dataset,
            synonyms: draft.synonyms,
            sql_patterns: draft.sql_patterns,
            sample_question: draft.sample_question,
            related_metric_ids: draft.related_metric_ids,
            changelog: Vec::new(),
        }
    }

    /// Returns a copy carrying the draft's fields, keeping this metric's id
    /// and changelog untouched
    pub fn with_draft(&self, draft: MetricDraft) -> Self {
        Self {
            id: self.id.clone(),
            changelog: self.changelog.clone(),
            ..Self::from_draft(String::new(), draft)
        }
    }

    /// Synonyms as the comma-joined text shown in forms and the changelog
    pub fn synonyms_text(&self) -> String {
        self.synonyms.join(", ")
    }

    pub fn references(&self, id: &str) -> bool {
        self.related_metric_ids.iter().any(|r| r == id)
    }
}

/// The editable part of a metric, as produced by a create or edit form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricDraft {
    pub name: String,
    pub description: String,
    pub category: Category,
    pub dataset: Dataset,
    pub synonyms: Vec<String>,
    pub sql_patterns: Vec<SqlPattern>,
    pub sample_question: String,
    pub related_metric_ids: Vec<String>,
}

impl MetricDraft {
    /// An empty draft with no SQL patterns
    pub fn new(name: impl Into<String>, category: Category, dataset: Dataset) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            category,
            dataset,
            synonyms: Vec::new(),
            sql_patterns: Vec::new(),
            sample_question: String::new(),
            related_metric_ids: Vec::new(),
        }
    }

    /// The create-form starting point: Metric / Sales with one blank pattern
    pub fn blank(ids: &mut dyn IdGenerator) -> Self {
        let mut draft = Self::new("", Category::Metric, Dataset::Sales);
        draft.sql_patterns.push(SqlPattern::blank(ids));
        draft
    }

    /// The edit-form starting point for an existing metric
    pub fn from_metric(metric: &GlossaryMetric) -> Self {
        Self {
            name: metric.name.clone(),
            description: metric.description.clone(),
            category: metric.category,
            dataset: metric.dataset,
            synonyms: metric.synonyms.clone(),
            sql_patterns: metric.sql_patterns.clone(),
            sample_question: metric.sample_question.clone(),
            related_metric_ids: metric.related_metric_ids.clone(),
        }
    }

    /// A draft must carry a non-blank name before it may be saved
    pub fn validate(&self) -> Result<(), GlossaryError> {
        if self.name.trim().is_empty() {
            return Err(GlossaryError::EmptyName);
        }
        Ok(())
    }
}

/// Splits comma-separated form input into trimmed, non-empty synonyms
pub fn parse_synonyms(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::SequentialIds;

    #[test]
    fn test_category_from_str() {
        assert_eq!("financial".parse::<Category>(), Ok(Category::Financial));
        assert_eq!("Core Entity".parse::<Category>(), Ok(Category::CoreEntity));
        assert_eq!("core-entity".parse::<Category>(), Ok(Category::CoreEntity));
        assert_eq!("treatment_type".parse::<Category>(), Ok(Category::TreatmentType));
        assert_eq!(
            "All".parse::<Category>(),
            Err(GlossaryError::UnknownCategory("All".into()))
        );
    }

    #[test]
    fn test_filter_from_str() {
        assert_eq!("all".parse::<CategoryFilter>(), Ok(CategoryFilter::All));
        assert_eq!(
            "Marketing".parse::<CategoryFilter>(),
            Ok(CategoryFilter::Only(Category::Marketing))
        );
        assert_eq!("All Datasets".parse::<DatasetFilter>(), Ok(DatasetFilter::All));
        assert_eq!(
            "finance".parse::<DatasetFilter>(),
            Ok(DatasetFilter::Only(Dataset::Finance))
        );
        assert!("nowhere".parse::<DatasetFilter>().is_err());
    }

    #[test]
    fn test_filter_display() {
        assert_eq!(CategoryFilter::All.to_string(), "All");
        assert_eq!(DatasetFilter::All.to_string(), "All Datasets");
        assert_eq!(
            CategoryFilter::Only(Category::TreatmentType).to_string(),
            "Treatment Type"
        );
    }

    #[test]
    fn test_choices_start_with_all() {
        let categories = CategoryFilter::choices();
        assert_eq!(categories.len(), Category::ALL.len() + 1);
        assert_eq!(categories[0], CategoryFilter::All);

        let datasets = DatasetFilter::choices();
        assert_eq!(datasets.len(), Dataset::ALL.len() + 1);
        assert_eq!(datasets[0], DatasetFilter::All);
    }

    #[test]
    fn test_category_serde_uses_labels() {
        let yaml = serde_yaml::to_string(&Category::CoreEntity).unwrap();
        assert_eq!(yaml.trim(), "Core Entity");
        let parsed: Category = serde_yaml::from_str("Treatment Type").unwrap();
        assert_eq!(parsed, Category::TreatmentType);
    }

    #[test]
    fn test_parse_synonyms() {
        assert_eq!(
            parse_synonyms(" income, earnings ,, sales,"),
            vec!["income", "earnings", "sales"]
        );
        assert!(parse_synonyms("  ").is_empty());
    }

    #[test]
    fn test_blank_draft() {
        let mut ids = SequentialIds::new("sql");
        let draft = MetricDraft::blank(&mut ids);

        assert_eq!(draft.category, Category::Metric);
        assert_eq!(draft.dataset, Dataset::Sales);
        assert_eq!(draft.sql_patterns.len(), 1);
        assert_eq!(draft.sql_patterns[0].id, "sql-1");
        assert!(draft.sql_patterns[0].query.is_empty());
    }

    #[test]
    fn test_validate_rejects_blank_name() {
        let mut draft = MetricDraft::new("   ", Category::Metric, Dataset::Sales);
        assert_eq!(draft.validate(), Err(GlossaryError::EmptyName));

        draft.name = "Revenue".into();
        assert!(draft.validate().is_ok());
    }

    #[test]
    fn test_with_draft_keeps_id_and_changelog() {
        let mut metric = GlossaryMetric::from_draft(
            "m1".into(),
            MetricDraft::new("Revenue", Category::Financial, Dataset::Finance),
        );
        metric.changelog.push(ChangelogEntry {
            id: "c1".into(),
            timestamp: Utc::now(),
            field: "name".into(),
            old_value: "Rev".into(),
            new_value: "Revenue".into(),
            user: "Admin".into(),
        });

        let mut draft = MetricDraft::from_metric(&metric);
        draft.name = "Sales".into();
        let updated = metric.with_draft(draft);

        assert_eq!(updated.id, "m1");
        assert_eq!(updated.name, "Sales");
        assert_eq!(updated.changelog, metric.changelog);
    }
}
