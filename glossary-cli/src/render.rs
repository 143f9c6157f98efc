//! Terminal rendering of glossary views

use colored::Colorize;

use glossary_core::{
    CategoryFilter, ChangelogEntry, Glossary, GlossaryMetric, Lineage, TableView,
};

/// Shortens `text` to at most `max` characters, ending with "..." when cut
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(3)).collect();
    format!("{}...", kept)
}

fn empty_marker(value: &str) -> &str {
    if value.is_empty() {
        "(empty)"
    } else {
        value
    }
}

pub fn print_header(glossary: &Glossary) {
    println!(
        "{}  {}",
        "Business Glossary".bold(),
        format!("{} metrics & KPIs", glossary.metrics().len()).dimmed()
    );
}

/// Category pills with their counts; the active pill is highlighted
pub fn print_category_pills(counts: &[(CategoryFilter, usize)], active: CategoryFilter) {
    let pills: Vec<String> = counts
        .iter()
        .map(|(pill, count)| {
            let text = format!("{} {}", pill, count);
            if *pill == active {
                text.black().on_cyan().to_string()
            } else {
                text.normal().to_string()
            }
        })
        .collect();
    println!("{}", pills.join("  "));
}

pub fn print_no_results() {
    println!("{}", "No metrics found.".yellow());
    println!("{}", "Try adjusting your search or filters".dimmed());
}

fn print_table_header() {
    println!(
        "  {:<3}{:<22} | {:<48} | {:<10} | {}",
        "",
        "Metric / KPI",
        "Description",
        "Dataset",
        "Synonyms"
    );
    println!("  {}", "-".repeat(110));
}

fn print_table_row(metric: &GlossaryMetric, pinned: bool) {
    let star = if pinned { "★".yellow().to_string() } else { " ".to_string() };
    println!(
        "  {}  {:<22} | {:<48} | {:<10} | {}",
        star,
        truncate(&metric.name, 22).bold(),
        truncate(&metric.description, 48),
        metric.dataset.to_string().cyan(),
        truncate(&metric.synonyms_text(), 30).dimmed()
    );
}

/// Pinned section first, then one section per category
pub fn print_table(view: &TableView<'_>) {
    if view.is_empty() {
        print_no_results();
        return;
    }

    if !view.pinned.is_empty() {
        println!("\n{} {} ({})", "★".yellow(), "Pinned".bold(), view.pinned.len());
        print_table_header();
        for metric in &view.pinned {
            print_table_row(metric, true);
        }
    }

    for (category, members) in &view.groups {
        println!("\n{} ({})", category.to_string().bold(), members.len());
        print_table_header();
        for metric in members {
            print_table_row(metric, false);
        }
    }
}

/// One card per metric, in list order
pub fn print_cards(glossary: &Glossary, metrics: &[&GlossaryMetric]) {
    if metrics.is_empty() {
        print_no_results();
        return;
    }

    for metric in metrics {
        let star = if glossary.is_favorite(&metric.id) {
            format!("{} ", "★".yellow())
        } else {
            String::new()
        };

        println!("┌ {}{}", star, metric.name.bold());
        println!(
            "│ {} · {}",
            metric.category.to_string().magenta(),
            metric.dataset.to_string().cyan()
        );
        if !metric.description.is_empty() {
            println!("│ {}", metric.description);
        }
        if !metric.synonyms.is_empty() {
            println!("│ {} {}", "Synonyms:".dimmed(), metric.synonyms_text());
        }
        if !metric.sample_question.is_empty() {
            println!("│ {} \"{}\"", "Ask:".dimmed(), metric.sample_question.italic());
        }

        let related: Vec<&str> = glossary
            .depends_on(&metric.id)
            .into_iter()
            .map(|m| m.name.as_str())
            .collect();
        if !related.is_empty() {
            println!("│ {} {}", "Related:".dimmed(), related.join(", "));
        }
        println!(
            "└ {} · {} SQL pattern(s) · {} change(s)",
            metric.id.dimmed(),
            metric.sql_patterns.len(),
            metric.changelog.len()
        );
        println!();
    }
}

/// "id - name (dataset)" for each related metric that still exists
fn related_metric_lines(glossary: &Glossary, metric: &GlossaryMetric) -> Vec<String> {
    glossary
        .depends_on(&metric.id)
        .into_iter()
        .map(|related| format!("{} - {} ({})", related.id, related.name, related.dataset))
        .collect()
}

/// Full details of one metric
pub fn print_metric(glossary: &Glossary, metric: &GlossaryMetric) {
    println!("{}: {}", "ID".blue(), metric.id);
    println!("{}: {}", "Name".blue(), metric.name.bold());
    if glossary.is_favorite(&metric.id) {
        println!("{}: {}", "Pinned".blue(), "yes".yellow());
    }
    println!("{}: {}", "Description".blue(), metric.description);
    println!("{}: {}", "Category".blue(), metric.category);
    println!("{}: {}", "Dataset".blue(), metric.dataset);

    if !metric.synonyms.is_empty() {
        println!("{}: {}", "Synonyms".blue(), metric.synonyms_text());
    }
    if !metric.sample_question.is_empty() {
        println!("{}: {}", "Sample question".blue(), metric.sample_question);
    }

    if !metric.sql_patterns.is_empty() {
        println!("\n{}:", "SQL Patterns".green());
        for (idx, pattern) in metric.sql_patterns.iter().enumerate() {
            let label = if pattern.label.is_empty() {
                format!("Pattern {}", idx + 1)
            } else {
                pattern.label.clone()
            };
            println!("  {}", label.cyan());
            println!("    {}", empty_marker(&pattern.query).dimmed());
        }
    }

    let related = related_metric_lines(glossary, metric);
    if !related.is_empty() {
        println!("\n{}:", "Related Metrics".green());
        for line in related {
            println!("  {}", line);
        }
    }

    println!(
        "\n{} change(s) recorded. Use `history {}` to view them.",
        metric.changelog.len(),
        metric.id
    );
}

/// Changelog as a timeline, most recent first
pub fn print_history(metric: &GlossaryMetric, entries: &[&ChangelogEntry]) {
    println!("{} {}", "Change History -".bold(), metric.name.bold());

    if entries.is_empty() {
        println!("{}", "No changes recorded yet".dimmed());
        println!(
            "{}",
            "Changes will appear here when this metric is edited".dimmed()
        );
        return;
    }

    for entry in entries {
        println!(
            "\n{} {}",
            entry.field.magenta(),
            entry
                .timestamp
                .format("%b %d, %Y %H:%M")
                .to_string()
                .dimmed()
        );
        println!("  {} {}", "-".red(), empty_marker(&entry.old_value).strikethrough());
        println!("  {} {}", "+".green(), empty_marker(&entry.new_value));
        println!("  {} {}", "by".dimmed(), entry.user.cyan());
    }
}

fn print_lineage_nodes(nodes: &[&GlossaryMetric]) {
    for node in nodes {
        println!("    {} {}", node.name.bold(), format!("({})", node.category).dimmed());
    }
}

/// Upstream referrers, the metric itself, then what it depends on
pub fn print_lineage(metric: &GlossaryMetric, lineage: &Lineage<'_>) {
    println!("{} {}", "Metric Lineage -".bold(), metric.name.bold());

    if lineage.is_empty() {
        println!("{}", "No relationships defined yet".dimmed());
        println!("{}", "Edit this metric to add related metrics".dimmed());
        return;
    }

    if !lineage.referenced_by.is_empty() {
        println!("\n  {}", "REFERENCED BY".dimmed());
        print_lineage_nodes(&lineage.referenced_by);
        println!("      ↓");
    }

    println!(
        "\n  {} {}",
        format!("[ {} ]", metric.name).cyan().bold(),
        format!("{} · {}", metric.category, metric.dataset).dimmed()
    );

    if !lineage.depends_on.is_empty() {
        println!("      ↓");
        println!("\n  {}", "DEPENDS ON".dimmed());
        print_lineage_nodes(&lineage.depends_on);

        println!("\n{}", "Related Metrics Detail".dimmed());
        for related in &lineage.depends_on {
            println!(
                "  {} [{}] {}",
                related.name.bold(),
                related.dataset.to_string().cyan(),
                related.description
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Revenue", 10), "Revenue");
        assert_eq!(truncate("Gross Merchandise Value", 10), "Gross M...");
        assert_eq!(truncate("abc", 3), "abc");
        assert_eq!(truncate("Übersicht", 6), "Übe...");
    }

    #[test]
    fn test_related_lines_skip_deleted_metrics() {
        let mut glossary = Glossary::with_samples("Admin");
        let invoice = glossary.get("1").unwrap().clone();
        assert_eq!(
            related_metric_lines(&glossary, &invoice),
            vec!["3 - Revenue (Finance)", "12 - MRR (Finance)"]
        );

        glossary.delete("3");
        assert_eq!(
            related_metric_lines(&glossary, &invoice),
            vec!["12 - MRR (Finance)"]
        );

        glossary.delete("12");
        assert!(related_metric_lines(&glossary, &invoice).is_empty());
    }

    #[test]
    fn test_empty_marker() {
        assert_eq!(empty_marker(""), "(empty)");
        assert_eq!(empty_marker("Sales"), "Sales");
    }
}
