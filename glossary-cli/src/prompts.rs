use anyhow::Result;
use inquire::{Confirm, MultiSelect, Select, Text};
use std::fmt;

use glossary_core::{
    parse_synonyms, Category, Dataset, Glossary, GlossaryMetric, MetricDraft, SqlPattern,
};

/// A metric as offered in selection lists
#[derive(Debug, Clone)]
pub struct MetricChoice {
    pub id: String,
    label: String,
}

impl MetricChoice {
    pub fn new(metric: &GlossaryMetric) -> Self {
        Self {
            id: metric.id.clone(),
            label: format!("{} [{} · {}]", metric.name, metric.category, metric.dataset),
        }
    }
}

impl fmt::Display for MetricChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label)
    }
}

/// Prompts the user to pick one of `metrics`; None if there is nothing to pick
pub fn prompt_select_metric(message: &str, metrics: &[&GlossaryMetric]) -> Result<Option<String>> {
    if metrics.is_empty() {
        return Ok(None);
    }

    let options: Vec<MetricChoice> = metrics.iter().map(|m| MetricChoice::new(m)).collect();
    let choice = Select::new(message, options).with_page_size(15).prompt()?;
    Ok(Some(choice.id))
}

/// Prompts for the fields of a new metric
pub fn prompt_new_metric(glossary: &mut Glossary) -> Result<MetricDraft> {
    let draft = glossary.new_draft();
    prompt_metric_fields(glossary, draft, None)
}

/// Prompts for changes to an existing metric, starting from its values
pub fn prompt_edit_metric(glossary: &mut Glossary, metric: &GlossaryMetric) -> Result<MetricDraft> {
    let draft = MetricDraft::from_metric(metric);
    prompt_metric_fields(glossary, draft, Some(metric.id.as_str()))
}

fn prompt_metric_fields(
    glossary: &mut Glossary,
    mut draft: MetricDraft,
    editing_id: Option<&str>,
) -> Result<MetricDraft> {
    draft.name = Text::new("Name:")
        .with_initial_value(&draft.name)
        .with_placeholder("e.g. Revenue, CAC, GMV")
        .prompt()?;

    draft.description = Text::new("Description:")
        .with_initial_value(&draft.description)
        .with_placeholder("What does this metric represent?")
        .prompt()?;

    let categories = Category::ALL.to_vec();
    let category_idx = categories
        .iter()
        .position(|c| *c == draft.category)
        .unwrap_or(0);
    draft.category = Select::new("Category:", categories)
        .with_starting_cursor(category_idx)
        .prompt()?;

    let datasets = Dataset::ALL.to_vec();
    let dataset_idx = datasets
        .iter()
        .position(|d| *d == draft.dataset)
        .unwrap_or(0);
    draft.dataset = Select::new("Dataset:", datasets)
        .with_starting_cursor(dataset_idx)
        .prompt()?;

    let synonyms = Text::new("Synonyms (comma-separated):")
        .with_initial_value(&draft.synonyms.join(", "))
        .with_placeholder("e.g. income, earnings, sales")
        .prompt()?;
    draft.synonyms = parse_synonyms(&synonyms);

    draft.sql_patterns = prompt_sql_patterns(glossary, draft.sql_patterns, editing_id.is_some())?;

    draft.sample_question = Text::new("Sample question:")
        .with_initial_value(&draft.sample_question)
        .with_placeholder("e.g. What is our total revenue?")
        .prompt()?;

    let relations_prompt = if draft.related_metric_ids.is_empty() {
        "Link related metrics?"
    } else {
        "Change related metrics?"
    };
    if Confirm::new(relations_prompt).with_default(false).prompt()? {
        draft.related_metric_ids =
            prompt_related_metrics(glossary, &draft.related_metric_ids, editing_id)?;
    }

    Ok(draft)
}

/// Walks the SQL patterns, letting the user edit or drop each and add more
///
/// At least one pattern is always kept on the form.
fn prompt_sql_patterns(
    glossary: &mut Glossary,
    patterns: Vec<SqlPattern>,
    editing: bool,
) -> Result<Vec<SqlPattern>> {
    if editing
        && !Confirm::new("Edit SQL patterns?")
            .with_default(false)
            .prompt()?
    {
        return Ok(patterns);
    }

    let total = patterns.len();
    let mut kept: Vec<SqlPattern> = Vec::new();

    for (idx, mut pattern) in patterns.into_iter().enumerate() {
        let remaining = total - idx;
        let can_remove = kept.len() + remaining > 1;

        if can_remove && !pattern.query.is_empty() {
            let remove = Confirm::new(&format!(
                "Remove pattern {} ({})?",
                idx + 1,
                pattern.label
            ))
            .with_default(false)
            .prompt()?;
            if remove {
                continue;
            }
        }

        pattern.label = Text::new(&format!("Pattern {} label:", idx + 1))
            .with_initial_value(&pattern.label)
            .prompt()?;
        pattern.query = Text::new(&format!("Pattern {} query:", idx + 1))
            .with_initial_value(&pattern.query)
            .with_placeholder("SELECT ...")
            .prompt()?;
        kept.push(pattern);
    }

    while Confirm::new("Add another SQL pattern?")
        .with_default(false)
        .prompt()?
    {
        let mut pattern = glossary.new_sql_pattern();
        let number = kept.len() + 1;
        pattern.label = Text::new(&format!("Pattern {} label:", number)).prompt()?;
        pattern.query = Text::new(&format!("Pattern {} query:", number))
            .with_placeholder("SELECT ...")
            .prompt()?;
        kept.push(pattern);
    }

    if kept.is_empty() {
        kept.push(glossary.new_sql_pattern());
    }

    Ok(kept)
}

/// Lets the user pick related metrics from the rest of the glossary
///
/// Ids that were not offered (dangling ones) are kept as they are.
fn prompt_related_metrics(
    glossary: &Glossary,
    current: &[String],
    editing_id: Option<&str>,
) -> Result<Vec<String>> {
    let candidates: Vec<&GlossaryMetric> = glossary
        .metrics()
        .iter()
        .filter(|m| Some(m.id.as_str()) != editing_id)
        .collect();

    let options: Vec<MetricChoice> = candidates.iter().map(|m| MetricChoice::new(m)).collect();
    let offered: Vec<String> = options.iter().map(|o| o.id.clone()).collect();
    let defaults: Vec<usize> = options
        .iter()
        .enumerate()
        .filter(|(_, o)| current.contains(&o.id))
        .map(|(idx, _)| idx)
        .collect();

    let selected: Vec<String> = MultiSelect::new("Related metrics:", options)
        .with_default(&defaults)
        .with_page_size(15)
        .prompt()?
        .into_iter()
        .map(|c| c.id)
        .collect();

    Ok(merge_related(current, &offered, &selected))
}

/// Keeps `current` in its order (duplicates included), dropping only ids
/// that were offered and deselected, then appends newly selected ids
fn merge_related(current: &[String], offered: &[String], selected: &[String]) -> Vec<String> {
    let mut merged: Vec<String> = current
        .iter()
        .filter(|id| selected.contains(id) || !offered.contains(id))
        .cloned()
        .collect();

    for id in selected {
        if !current.contains(id) {
            merged.push(id.clone());
        }
    }

    merged
}

/// Asks before deleting a metric
pub fn confirm_delete(metric: &GlossaryMetric) -> Result<bool> {
    Ok(Confirm::new(&format!("Delete '{}'? This cannot be undone.", metric.name))
        .with_default(false)
        .prompt()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_merge_related_keeps_existing_order() {
        let current = ids(&["12", "gone", "3", "12"]);
        let offered = ids(&["2", "3", "4", "12"]);
        let selected = ids(&["2", "3", "12"]);

        assert_eq!(
            merge_related(&current, &offered, &selected),
            ids(&["12", "gone", "3", "12", "2"])
        );
    }

    #[test]
    fn test_merge_related_drops_deselected() {
        let current = ids(&["3", "gone", "12"]);
        let offered = ids(&["3", "12"]);
        let selected = ids(&["12"]);

        assert_eq!(
            merge_related(&current, &offered, &selected),
            ids(&["gone", "12"])
        );
    }

    #[test]
    fn test_merge_related_unchanged_selection_is_identity() {
        let current = ids(&["3", "1"]);
        let offered = ids(&["1", "2", "3"]);
        let selected = ids(&["1", "3"]);

        assert_eq!(merge_related(&current, &offered, &selected), current);
    }
}
