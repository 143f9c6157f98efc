//! Relationship views over the metric collection
//!
//! Lineage is derived on every call from `related_metric_ids`; nothing here
//! is cached. The graph is directed and need not be symmetric.

use crate::models::GlossaryMetric;

/// Resolves `metric.related_metric_ids` against `all`, in order
///
/// Ids with no matching metric are dropped. A repeated id yields a repeated
/// entry.
pub fn depends_on<'a>(metric: &GlossaryMetric, all: &'a [GlossaryMetric]) -> Vec<&'a GlossaryMetric> {
    metric
        .related_metric_ids
        .iter()
        .filter_map(|id| all.iter().find(|m| m.id == *id))
        .collect()
}

/// Every other metric in `all` whose related ids include `metric.id`,
/// in collection order
pub fn referenced_by<'a>(
    metric: &GlossaryMetric,
    all: &'a [GlossaryMetric],
) -> Vec<&'a GlossaryMetric> {
    all.iter()
        .filter(|m| m.id != metric.id && m.references(&metric.id))
        .collect()
}

/// Both directions of a metric's lineage
#[derive(Debug, Clone)]
pub struct Lineage<'a> {
    pub referenced_by: Vec<&'a GlossaryMetric>,
    pub depends_on: Vec<&'a GlossaryMetric>,
}

impl<'a> Lineage<'a> {
    pub fn of(metric: &GlossaryMetric, all: &'a [GlossaryMetric]) -> Self {
        Self {
            referenced_by: referenced_by(metric, all),
            depends_on: depends_on(metric, all),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.referenced_by.is_empty() && self.depends_on.is_empty()
    }
}
