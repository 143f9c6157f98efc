mod cli;
mod prompts;
mod render;
mod shell;

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use std::path::Path;

use glossary_core::export::{self, ExportFormat};
use glossary_core::{
    CategoryFilter, DatasetFilter, FilterState, Glossary, GlossaryConfig, GlossaryError,
    GlossaryMetric, ViewMode,
};

use crate::cli::{Cli, Command};
use crate::shell::Session;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    let mut config = GlossaryConfig::resolve(cli.config.as_deref())?;
    if cli.empty {
        config.seed_samples = false;
    }
    log::debug!(
        "Starting session as '{}' (samples: {})",
        config.actor,
        config.seed_samples
    );

    let glossary = Glossary::from_config(&config);

    match &cli.command {
        Command::List {
            search,
            category,
            dataset,
            view,
        } => {
            let filter = parse_filter(search.as_deref(), category.as_deref(), dataset.as_deref())?;
            let view = match view {
                Some(v) => v.parse::<ViewMode>()?,
                None => config.default_view,
            };
            list_metrics(&glossary, &filter, view);
        }
        Command::Categories { search, dataset } => {
            let filter = parse_filter(search.as_deref(), None, dataset.as_deref())?;
            list_categories(&glossary, &filter);
        }
        Command::Show { id } => {
            let metric = resolve_metric(&glossary, id)?;
            render::print_metric(&glossary, metric);
        }
        Command::History { id } => {
            let metric = resolve_metric(&glossary, id)?;
            render::print_history(metric, &glossary.history(&metric.id));
        }
        Command::Lineage { id } => {
            let metric = resolve_metric(&glossary, id)?;
            if let Some(lineage) = glossary.lineage(&metric.id) {
                render::print_lineage(metric, &lineage);
            }
        }
        Command::Export { format, output } => {
            handle_export_command(&glossary, format, output.as_deref())?;
        }
        Command::Shell => {
            Session::new(glossary, config.default_view).run()?;
        }
    }

    Ok(())
}

fn parse_filter(
    search: Option<&str>,
    category: Option<&str>,
    dataset: Option<&str>,
) -> Result<FilterState> {
    let category = match category {
        Some(c) => c.parse::<CategoryFilter>()?,
        None => CategoryFilter::All,
    };
    let dataset = match dataset {
        Some(d) => d.parse::<DatasetFilter>()?,
        None => DatasetFilter::All,
    };

    Ok(FilterState::new(search.unwrap_or("").trim(), category, dataset))
}

/// Finds a metric by id, falling back to a case-insensitive name match
fn resolve_metric<'a>(glossary: &'a Glossary, id_or_name: &str) -> Result<&'a GlossaryMetric> {
    if let Some(metric) = glossary.get(id_or_name) {
        return Ok(metric);
    }

    let wanted = id_or_name.trim().to_lowercase();
    glossary
        .metrics()
        .iter()
        .find(|m| m.name.to_lowercase() == wanted)
        .ok_or_else(|| GlossaryError::MetricNotFound(id_or_name.to_string()).into())
}

fn list_metrics(glossary: &Glossary, filter: &FilterState, view: ViewMode) {
    render::print_header(glossary);
    render::print_category_pills(&glossary.category_counts(filter), filter.category);

    match view {
        ViewMode::Table => render::print_table(&glossary.table_view(filter)),
        ViewMode::Cards => render::print_cards(glossary, &glossary.list(filter)),
    }
}

fn list_categories(glossary: &Glossary, filter: &FilterState) {
    println!("{:<16} | {}", "Category", "Metrics");
    println!("{}", "-".repeat(26));
    for (pill, count) in glossary.category_counts(filter) {
        let line = format!("{:<16} | {}", pill.to_string(), count);
        if count == 0 {
            println!("{}", line.dimmed());
        } else {
            println!("{}", line);
        }
    }
}

fn handle_export_command(glossary: &Glossary, format: &str, output: Option<&Path>) -> Result<()> {
    let format: ExportFormat = format.parse()?;
    let content = export::render(glossary, format)?;

    match output {
        Some(path) => {
            export::write_export(&content, path)?;
            println!(
                "{} {} metric(s) to {}",
                "Exported".green(),
                glossary.metrics().len(),
                path.display()
            );
        }
        None => println!("{}", content),
    }

    Ok(())
}
