//! The glossary facade used by the view layer
//!
//! Wraps the metric store with draft validation, change tracking and the
//! derived read views. Every read recomputes from the current collection.

use log::{debug, info};
use std::collections::BTreeSet;

use crate::changelog::{apply_changes, most_recent_first, ChangeContext};
use crate::config::GlossaryConfig;
use crate::error::GlossaryError;
use crate::ids::{IdGenerator, UuidIds};
use crate::lineage::{self, Lineage};
use crate::models::{CategoryFilter, ChangelogEntry, GlossaryMetric, MetricDraft, SqlPattern};
use crate::query::{self, FilterState, TableView};
use crate::samples::sample_metrics;
use crate::store::MetricStore;

/// A session's glossary: the store plus the acting user
pub struct Glossary {
    store: MetricStore,
    actor: String,
}

impl Glossary {
    /// An empty glossary with UUID ids
    pub fn new(actor: impl Into<String>) -> Self {
        Self::with_store(MetricStore::new(), actor)
    }

    /// A glossary seeded with the sample catalog
    pub fn with_samples(actor: impl Into<String>) -> Self {
        Self::with_store(
            MetricStore::with_metrics(sample_metrics(), Box::new(UuidIds)),
            actor,
        )
    }

    /// Builds the session glossary described by `config`
    pub fn from_config(config: &GlossaryConfig) -> Self {
        if config.seed_samples {
            Self::with_samples(config.actor.clone())
        } else {
            Self::new(config.actor.clone())
        }
    }

    /// Seeds with `metrics` and a caller-supplied id generator
    pub fn with_metrics(
        metrics: Vec<GlossaryMetric>,
        ids: Box<dyn IdGenerator>,
        actor: impl Into<String>,
    ) -> Self {
        Self::with_store(MetricStore::with_metrics(metrics, ids), actor)
    }

    pub fn with_store(store: MetricStore, actor: impl Into<String>) -> Self {
        Self {
            store,
            actor: actor.into(),
        }
    }

    /// Name recorded on changelog entries
    pub fn actor(&self) -> &str {
        &self.actor
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// All metrics in insertion order
    pub fn metrics(&self) -> &[GlossaryMetric] {
        self.store.metrics()
    }

    pub fn get(&self, id: &str) -> Option<&GlossaryMetric> {
        self.store.get_by_id(id)
    }

    /// Visible metrics: filtered, then favorites first
    pub fn list(&self, filter: &FilterState) -> Vec<&GlossaryMetric> {
        let filtered = query::filter_metrics(self.store.metrics(), filter);
        query::favorites_first(filtered, self.store.favorites())
    }

    /// Visible metrics arranged for the table layout
    pub fn table_view(&self, filter: &FilterState) -> TableView<'_> {
        let filtered = query::filter_metrics(self.store.metrics(), filter);
        TableView::build(filtered, self.store.favorites())
    }

    /// Category pill counts under the filter's search and dataset
    pub fn category_counts(&self, filter: &FilterState) -> Vec<(CategoryFilter, usize)> {
        query::category_counts(self.store.metrics(), &filter.search, filter.dataset)
    }

    /// Metrics the given metric depends on; empty for an unknown id
    pub fn depends_on(&self, id: &str) -> Vec<&GlossaryMetric> {
        self.store
            .get_by_id(id)
            .map(|m| lineage::depends_on(m, self.store.metrics()))
            .unwrap_or_default()
    }

    /// Metrics that list the given metric as related; empty for an unknown id
    pub fn referenced_by(&self, id: &str) -> Vec<&GlossaryMetric> {
        self.store
            .get_by_id(id)
            .map(|m| lineage::referenced_by(m, self.store.metrics()))
            .unwrap_or_default()
    }

    pub fn lineage(&self, id: &str) -> Option<Lineage<'_>> {
        self.store
            .get_by_id(id)
            .map(|m| Lineage::of(m, self.store.metrics()))
    }

    /// Change history of a metric, most recent first
    pub fn history(&self, id: &str) -> Vec<&ChangelogEntry> {
        self.store
            .get_by_id(id)
            .map(|m| most_recent_first(&m.changelog))
            .unwrap_or_default()
    }

    pub fn is_favorite(&self, id: &str) -> bool {
        self.store.is_favorite(id)
    }

    /// A copy of the favorite set
    pub fn favorites(&self) -> BTreeSet<String> {
        self.store.favorites().clone()
    }

    // =========================================================================
    // Writes
    // =========================================================================

    /// A fresh create-form draft with one blank SQL pattern
    pub fn new_draft(&mut self) -> MetricDraft {
        MetricDraft::blank(self.store.ids_mut())
    }

    /// A blank SQL pattern with a fresh id, for the edit form
    pub fn new_sql_pattern(&mut self) -> SqlPattern {
        SqlPattern::blank(self.store.ids_mut())
    }

    /// Validates and stores a new metric
    pub fn create(&mut self, draft: MetricDraft) -> Result<GlossaryMetric, GlossaryError> {
        draft.validate()?;
        let metric = self.store.create(draft);
        info!("Added metric '{}' ({})", metric.name, metric.id);
        Ok(metric)
    }

    /// Applies an edit, recording tracked field changes in the changelog
    ///
    /// Returns `Ok(None)` without touching the store if `id` is unknown.
    pub fn update(
        &mut self,
        id: &str,
        draft: MetricDraft,
    ) -> Result<Option<GlossaryMetric>, GlossaryError> {
        draft.validate()?;

        let old = match self.store.get_by_id(id) {
            Some(m) => m.clone(),
            None => {
                debug!("Edit of unknown metric {} ignored", id);
                return Ok(None);
            }
        };

        let ctx = ChangeContext::now(&self.actor);
        let updated = apply_changes(&old, old.with_draft(draft), &ctx, self.store.ids_mut());
        let recorded = updated.changelog.len() - old.changelog.len();

        self.store.update(id, updated.clone());
        info!(
            "Updated metric '{}' ({}), {} change(s) recorded",
            updated.name, id, recorded
        );
        Ok(Some(updated))
    }

    /// Removes a metric; references to it elsewhere are left dangling
    pub fn delete(&mut self, id: &str) -> bool {
        let removed = self.store.delete(id);
        if removed {
            info!("Deleted metric {}", id);
        }
        removed
    }

    /// Pins or unpins a metric; returns whether it is now pinned
    pub fn toggle_favorite(&mut self, id: &str) -> bool {
        let pinned = self.store.toggle_favorite(id);
        debug!("Metric {} pinned: {}", id, pinned);
        pinned
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::SequentialIds;
    use crate::models::{parse_synonyms, Category, Dataset};

    fn glossary() -> Glossary {
        Glossary::with_metrics(Vec::new(), Box::new(SequentialIds::new("id")), "Tester")
    }

    fn draft(name: &str) -> MetricDraft {
        MetricDraft::new(name, Category::Financial, Dataset::Finance)
    }

    #[test]
    fn test_create_rejects_empty_name() {
        let mut g = glossary();
        assert_eq!(g.create(draft("")), Err(GlossaryError::EmptyName));
        assert!(g.metrics().is_empty());
    }

    #[test]
    fn test_update_rejects_empty_name_without_change() {
        let mut g = glossary();
        let m = g.create(draft("Revenue")).unwrap();

        assert_eq!(g.update(&m.id, draft(" ")), Err(GlossaryError::EmptyName));
        assert_eq!(g.get(&m.id).unwrap().name, "Revenue");
    }

    #[test]
    fn test_update_records_changes_with_actor() {
        let mut g = glossary();
        let mut initial = draft("Revenue");
        initial.synonyms = parse_synonyms("Income");
        let m = g.create(initial).unwrap();

        let mut edit = MetricDraft::from_metric(&m);
        edit.name = "Sales".into();
        edit.synonyms = parse_synonyms("Income, Earnings");
        let updated = g.update(&m.id, edit).unwrap().unwrap();

        assert_eq!(updated.changelog.len(), 2);
        assert!(updated.changelog.iter().all(|c| c.user == "Tester"));
        assert_eq!(g.get(&m.id), Some(&updated));
    }

    #[test]
    fn test_update_unknown_id_is_silent() {
        let mut g = glossary();
        g.create(draft("Revenue")).unwrap();

        assert_eq!(g.update("missing", draft("Ghost")), Ok(None));
        assert_eq!(g.metrics().len(), 1);
    }

    #[test]
    fn test_new_draft_uses_shared_ids() {
        let mut g = glossary();
        let d = g.new_draft();
        assert_eq!(d.sql_patterns[0].id, "id-1");

        let created = g.create(draft("Revenue")).unwrap();
        assert_eq!(created.id, "id-2");
        assert_eq!(g.new_sql_pattern().id, "id-3");
    }

    #[test]
    fn test_history_most_recent_first() {
        let g = Glossary::with_samples("Admin");
        let history = g.history("3");
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].new_value, "Income, Earnings, Sales");
        assert!(g.history("missing").is_empty());
    }

    #[test]
    fn test_lineage_of_unknown_metric() {
        let g = Glossary::with_samples("Admin");
        assert!(g.lineage("missing").is_none());
        assert!(g.depends_on("missing").is_empty());
        assert!(g.referenced_by("missing").is_empty());
    }

    #[test]
    fn test_sample_lineage() {
        let g = Glossary::with_samples("Admin");
        let depends: Vec<&str> = g.depends_on("1").iter().map(|m| m.name.as_str()).collect();
        assert_eq!(depends, vec!["Revenue", "MRR"]);

        let referrers: Vec<&str> = g.referenced_by("1").iter().map(|m| m.name.as_str()).collect();
        assert_eq!(referrers, vec!["Revenue", "MRR"]);
    }

    #[test]
    fn test_from_config() {
        let mut config = GlossaryConfig::default();
        assert_eq!(Glossary::from_config(&config).metrics().len(), 12);

        config.seed_samples = false;
        config.actor = "Robin".into();
        let g = Glossary::from_config(&config);
        assert!(g.metrics().is_empty());
        assert_eq!(g.actor(), "Robin");
    }

    #[test]
    fn test_favorites_copy_is_detached() {
        let mut g = glossary();
        let m = g.create(draft("Revenue")).unwrap();
        g.toggle_favorite(&m.id);

        let mut copy = g.favorites();
        copy.clear();
        assert!(g.is_favorite(&m.id));
    }
}
