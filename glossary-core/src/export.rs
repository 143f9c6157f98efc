use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use crate::error::GlossaryError;
use crate::glossary::Glossary;
use crate::lineage;
use crate::models::GlossaryMetric;
use crate::query::group_by_category;

/// Supported export formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Yaml,
    Markdown,
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportFormat::Json => write!(f, "json"),
            ExportFormat::Yaml => write!(f, "yaml"),
            ExportFormat::Markdown => write!(f, "markdown"),
        }
    }
}

impl FromStr for ExportFormat {
    type Err = GlossaryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "yaml" | "yml" => Ok(ExportFormat::Yaml),
            "markdown" | "md" => Ok(ExportFormat::Markdown),
            _ => Err(GlossaryError::UnknownExportFormat(s.to_string())),
        }
    }
}

/// Point-in-time copy of the glossary for structured export
#[derive(Debug, Serialize)]
struct Snapshot<'a> {
    exported_at: DateTime<Utc>,
    metrics: &'a [GlossaryMetric],
    favorites: BTreeSet<String>,
}

/// Renders the whole glossary in the requested format
pub fn render(glossary: &Glossary, format: ExportFormat) -> Result<String> {
    let snapshot = Snapshot {
        exported_at: Utc::now(),
        metrics: glossary.metrics(),
        favorites: glossary.favorites(),
    };

    match format {
        ExportFormat::Json => {
            serde_json::to_string_pretty(&snapshot).context("Failed to serialize glossary to JSON")
        }
        ExportFormat::Yaml => {
            serde_yaml::to_string(&snapshot).context("Failed to serialize glossary to YAML")
        }
        ExportFormat::Markdown => Ok(render_markdown(glossary.metrics())),
    }
}

/// Markdown document with one section per category, in first-occurrence order
pub fn render_markdown(metrics: &[GlossaryMetric]) -> String {
    let mut output = String::new();
    output.push_str("# Business Glossary\n\n");
    output.push_str(&format!("{} metrics & KPIs\n\n", metrics.len()));

    let refs: Vec<&GlossaryMetric> = metrics.iter().collect();
    for (category, members) in group_by_category(&refs) {
        output.push_str(&format!("## {}\n\n", category));

        for metric in members {
            output.push_str(&format!("### {}\n\n", metric.name));
            output.push_str(&format!("**Dataset:** {}\n\n", metric.dataset));

            if !metric.description.is_empty() {
                output.push_str(&format!("{}\n\n", metric.description));
            }

            if !metric.synonyms.is_empty() {
                output.push_str(&format!("**Synonyms:** {}\n\n", metric.synonyms_text()));
            }

            let patterns: Vec<_> = metric
                .sql_patterns
                .iter()
                .filter(|p| !p.query.trim().is_empty())
                .collect();
            if !patterns.is_empty() {
                output.push_str("**SQL patterns:**\n\n");
                for pattern in patterns {
                    let label = if pattern.label.is_empty() {
                        "Pattern"
                    } else {
                        pattern.label.as_str()
                    };
                    output.push_str(&format!("- {}\n\n  ```sql\n  {}\n  ```\n\n", label, pattern.query));
                }
            }

            if !metric.sample_question.is_empty() {
                output.push_str(&format!("**Ask:** \"{}\"\n\n", metric.sample_question));
            }

            let related: Vec<&str> = lineage::depends_on(metric, metrics)
                .into_iter()
                .map(|m| m.name.as_str())
                .collect();
            if !related.is_empty() {
                output.push_str(&format!("**Related:** {}\n\n", related.join(", ")));
            }
        }
    }

    output
}

/// Writes rendered output to `path`, creating parent directories
pub fn write_export(content: &str, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    fs::write(path, content).with_context(|| format!("Failed to write export to {:?}", path))
}
