use log::debug;
use std::collections::BTreeSet;

use crate::ids::{IdGenerator, UuidIds};
use crate::models::{GlossaryMetric, MetricDraft};

/// Owns the metric collection and the favorite set
///
/// All mutation goes through here. The store does not validate drafts and
/// treats unknown ids on update or delete as no-ops.
pub struct MetricStore {
    metrics: Vec<GlossaryMetric>,
    favorites: BTreeSet<String>,
    ids: Box<dyn IdGenerator>,
}

impl MetricStore {
    /// Creates an empty store generating UUID ids
    pub fn new() -> Self {
        Self::with_ids(Box::new(UuidIds))
    }

    /// Creates an empty store with the given id generator
    pub fn with_ids(ids: Box<dyn IdGenerator>) -> Self {
        Self {
            metrics: Vec::new(),
            favorites: BTreeSet::new(),
            ids,
        }
    }

    /// Seeds the store with existing metrics, keeping the first of any
    /// metrics that share an id
    pub fn with_metrics(metrics: Vec<GlossaryMetric>, ids: Box<dyn IdGenerator>) -> Self {
        let mut store = Self::with_ids(ids);
        for metric in metrics {
            if store.get_by_id(&metric.id).is_some() {
                debug!("Skipping seed metric with duplicate id {}", metric.id);
                continue;
            }
            store.metrics.push(metric);
        }
        store
    }

    /// The id generator shared by metrics, SQL patterns and changelog entries
    pub fn ids_mut(&mut self) -> &mut dyn IdGenerator {
        self.ids.as_mut()
    }

    /// Returns an id not used by any stored metric
    fn fresh_metric_id(&mut self) -> String {
        loop {
            let id = self.ids.next_id();
            if self.get_by_id(&id).is_none() {
                return id;
            }
        }
    }

    /// Adds a metric built from `draft` under a new id and returns a copy
    pub fn create(&mut self, draft: MetricDraft) -> GlossaryMetric {
        let id = self.fresh_metric_id();
        let metric = GlossaryMetric::from_draft(id, draft);
        debug!("Created metric {} ({})", metric.id, metric.name);
        self.metrics.push(metric.clone());
        metric
    }

    /// Replaces the metric with `id` by `new_version`
    ///
    /// The stored id is kept even if `new_version` carries another one.
    /// Returns false, leaving the collection unchanged, if `id` is unknown.
    pub fn update(&mut self, id: &str, mut new_version: GlossaryMetric) -> bool {
        match self.metrics.iter_mut().find(|m| m.id == id) {
            Some(slot) => {
                new_version.id = slot.id.clone();
                *slot = new_version;
                debug!("Updated metric {}", id);
                true
            }
            None => {
                debug!("Ignoring update of unknown metric {}", id);
                false
            }
        }
    }

    /// Removes the metric with `id` and unpins it
    ///
    /// References to it from other metrics are left in place.
    pub fn delete(&mut self, id: &str) -> bool {
        let original_len = self.metrics.len();
        self.metrics.retain(|m| m.id != id);
        self.favorites.remove(id);

        let removed = self.metrics.len() != original_len;
        if !removed {
            debug!("Ignoring delete of unknown metric {}", id);
        }
        removed
    }

    /// Flips favorite membership of `id`; returns the new membership
    pub fn toggle_favorite(&mut self, id: &str) -> bool {
        if self.favorites.remove(id) {
            false
        } else {
            self.favorites.insert(id.to_string());
            true
        }
    }

    pub fn is_favorite(&self, id: &str) -> bool {
        self.favorites.contains(id)
    }

    pub fn get_by_id(&self, id: &str) -> Option<&GlossaryMetric> {
        self.metrics.iter().find(|m| m.id == id)
    }

    /// All metrics in insertion order
    pub fn metrics(&self) -> &[GlossaryMetric] {
        &self.metrics
    }

    pub fn favorites(&self) -> &BTreeSet<String> {
        &self.favorites
    }

    pub fn len(&self) -> usize {
        self.metrics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty()
    }
}

impl Default for MetricStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::SequentialIds;
    use crate::models::{Category, Dataset};
    use std::collections::HashSet;

    fn store() -> MetricStore {
        MetricStore::with_ids(Box::new(SequentialIds::new("m")))
    }

    fn draft(name: &str) -> MetricDraft {
        MetricDraft::new(name, Category::Financial, Dataset::Finance)
    }

    #[test]
    fn test_create_assigns_unique_ids() {
        let mut store = store();
        for i in 0..20 {
            store.create(draft(&format!("Metric {}", i)));
        }

        let ids: HashSet<&str> = store.metrics().iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids.len(), 20);
        assert_eq!(store.metrics()[0].id, "m-1");
    }

    #[test]
    fn test_create_skips_ids_already_in_use() {
        let seeded = GlossaryMetric::from_draft("m-1".into(), draft("Seeded"));
        let mut store = MetricStore::with_metrics(vec![seeded], Box::new(SequentialIds::new("m")));

        let created = store.create(draft("Fresh"));
        assert_eq!(created.id, "m-2");
        assert!(created.changelog.is_empty());
    }

    #[test]
    fn test_with_metrics_drops_duplicate_ids() {
        let a = GlossaryMetric::from_draft("1".into(), draft("A"));
        let b = GlossaryMetric::from_draft("1".into(), draft("B"));
        let store = MetricStore::with_metrics(vec![a, b], Box::new(SequentialIds::new("m")));

        assert_eq!(store.len(), 1);
        assert_eq!(store.metrics()[0].name, "A");
    }

    #[test]
    fn test_update_replaces_in_place() {
        let mut store = store();
        store.create(draft("A"));
        let b = store.create(draft("B"));
        store.create(draft("C"));

        let mut replacement = b.clone();
        replacement.name = "B2".into();
        replacement.id = "other".into();
        assert!(store.update(&b.id, replacement));

        let names: Vec<&str> = store.metrics().iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B2", "C"]);
        assert_eq!(store.metrics()[1].id, b.id);
    }

    #[test]
    fn test_update_unknown_is_noop() {
        let mut store = store();
        let a = store.create(draft("A"));

        let mut ghost = a.clone();
        ghost.name = "Ghost".into();
        assert!(!store.update("missing", ghost));
        assert_eq!(store.metrics(), &[a][..]);
    }

    #[test]
    fn test_delete_removes_and_unpins() {
        let mut store = store();
        let a = store.create(draft("A"));
        store.toggle_favorite(&a.id);

        assert!(store.delete(&a.id));
        assert!(store.is_empty());
        assert!(!store.is_favorite(&a.id));
        assert!(!store.delete(&a.id));
    }

    #[test]
    fn test_delete_leaves_dangling_references() {
        let mut store = store();
        let a = store.create(draft("A"));
        let mut referrer = draft("B");
        referrer.related_metric_ids = vec![a.id.clone()];
        let b = store.create(referrer);

        store.delete(&a.id);

        let b = store.get_by_id(&b.id).unwrap();
        assert_eq!(b.related_metric_ids, vec![a.id]);
        assert!(b.changelog.is_empty());
    }

    #[test]
    fn test_toggle_favorite_twice_restores() {
        let mut store = store();
        let a = store.create(draft("A"));

        assert!(store.toggle_favorite(&a.id));
        assert!(store.is_favorite(&a.id));
        assert!(!store.toggle_favorite(&a.id));
        assert!(!store.is_favorite(&a.id));
        assert!(store.favorites().is_empty());
    }

    #[test]
    fn test_get_by_id() {
        let mut store = store();
        let a = store.create(draft("A"));

        assert_eq!(store.get_by_id(&a.id).map(|m| m.name.as_str()), Some("A"));
        assert!(store.get_by_id("missing").is_none());
    }
}
