//! Filtering, counting, ordering and grouping of the visible metrics
//!
//! Everything is recomputed from the full collection on each call.

use std::collections::BTreeSet;

use crate::models::{Category, CategoryFilter, DatasetFilter, GlossaryMetric};

/// The three filter dimensions of the browser
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    /// Case-insensitive substring; empty matches everything
    pub search: String,
    pub category: CategoryFilter,
    pub dataset: DatasetFilter,
}

impl FilterState {
    pub fn new(search: impl Into<String>, category: CategoryFilter, dataset: DatasetFilter) -> Self {
        Self {
            search: search.into(),
            category,
            dataset,
        }
    }

    pub fn search(search: impl Into<String>) -> Self {
        Self {
            search: search.into(),
            ..Self::default()
        }
    }

    pub fn matches(&self, metric: &GlossaryMetric) -> bool {
        matches_search(metric, &self.search)
            && self.category.matches(metric.category)
            && self.dataset.matches(metric.dataset)
    }
}

/// True if `search` is empty or occurs, ignoring case, in the metric's
/// name, description or any synonym
pub fn matches_search(metric: &GlossaryMetric, search: &str) -> bool {
    if search.is_empty() {
        return true;
    }
    let needle = search.to_lowercase();
    metric.name.to_lowercase().contains(&needle)
        || metric.description.to_lowercase().contains(&needle)
        || metric
            .synonyms
            .iter()
            .any(|s| s.to_lowercase().contains(&needle))
}

/// Metrics matching every filter dimension, in collection order
pub fn filter_metrics<'a>(all: &'a [GlossaryMetric], filter: &FilterState) -> Vec<&'a GlossaryMetric> {
    all.iter().filter(|m| filter.matches(m)).collect()
}

/// Count per category pill, ignoring the selected category
///
/// Returns "All" first, then every category in fixed order. Each count is
/// the number of metrics that would be listed if that pill were selected
/// under the current search and dataset.
pub fn category_counts(
    all: &[GlossaryMetric],
    search: &str,
    dataset: DatasetFilter,
) -> Vec<(CategoryFilter, usize)> {
    let candidates: Vec<&GlossaryMetric> = all
        .iter()
        .filter(|m| dataset.matches(m.dataset) && matches_search(m, search))
        .collect();

    CategoryFilter::choices()
        .into_iter()
        .map(|pill| {
            let count = candidates.iter().filter(|m| pill.matches(m.category)).count();
            (pill, count)
        })
        .collect()
}

/// Stable partition: favorites first, each side keeping its input order
pub fn favorites_first<'a>(
    metrics: Vec<&'a GlossaryMetric>,
    favorites: &BTreeSet<String>,
) -> Vec<&'a GlossaryMetric> {
    let (mut pinned, rest): (Vec<_>, Vec<_>) =
        metrics.into_iter().partition(|m| favorites.contains(&m.id));
    pinned.extend(rest);
    pinned
}

/// Groups metrics by category, keys in first-occurrence order
pub fn group_by_category<'a>(metrics: &[&'a GlossaryMetric]) -> Vec<(Category, Vec<&'a GlossaryMetric>)> {
    let mut groups: Vec<(Category, Vec<&'a GlossaryMetric>)> = Vec::new();

    for &metric in metrics {
        match groups.iter_mut().find(|(category, _)| *category == metric.category) {
            Some((_, members)) => members.push(metric),
            None => groups.push((metric.category, vec![metric])),
        }
    }

    groups
}

/// Table layout: a pinned section followed by the remaining metrics grouped
/// by category
#[derive(Debug, Clone, Default)]
pub struct TableView<'a> {
    pub pinned: Vec<&'a GlossaryMetric>,
    pub groups: Vec<(Category, Vec<&'a GlossaryMetric>)>,
}

impl<'a> TableView<'a> {
    pub fn build(filtered: Vec<&'a GlossaryMetric>, favorites: &BTreeSet<String>) -> Self {
        let (pinned, rest): (Vec<_>, Vec<_>) =
            filtered.into_iter().partition(|m| favorites.contains(&m.id));
        let groups = group_by_category(&rest);
        Self { pinned, groups }
    }

    pub fn is_empty(&self) -> bool {
        self.pinned.is_empty() && self.groups.is_empty()
    }
}
