use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[clap(author, version, about = "Browse and edit the business glossary of metrics and KPIs")]
pub struct Cli {
    /// Path to the configuration file (defaults to $GLOSSARY_CONFIG or ~/.glossary.yaml)
    #[clap(long)]
    pub config: Option<PathBuf>,

    /// Start from an empty glossary instead of the sample catalog
    #[clap(long)]
    pub empty: bool,

    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List metrics, pinned first
    List {
        /// Case-insensitive text matched against name, description and synonyms
        #[clap(long, short = 's')]
        search: Option<String>,

        /// Category to show (e.g. financial, "core entity"); defaults to all
        #[clap(long, short = 'c')]
        category: Option<String>,

        /// Dataset to show (e.g. sales, finance); defaults to all datasets
        #[clap(long, short = 'd')]
        dataset: Option<String>,

        /// Layout: table or cards (defaults to the configured view)
        #[clap(long)]
        view: Option<String>,
    },

    /// Show how many metrics each category pill would list
    Categories {
        #[clap(long, short = 's')]
        search: Option<String>,

        #[clap(long, short = 'd')]
        dataset: Option<String>,
    },

    /// Show details for a metric
    Show {
        /// Metric id or name
        id: String,
    },

    /// Show the change history of a metric, most recent first
    History {
        /// Metric id or name
        id: String,
    },

    /// Show what a metric depends on and what references it
    Lineage {
        /// Metric id or name
        id: String,
    },

    /// Export the glossary
    Export {
        /// Output format (json, yaml, markdown)
        #[clap(long, short = 'f', default_value = "markdown")]
        format: String,

        /// Output file path (prints to stdout if omitted)
        #[clap(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Start an interactive session to search, edit and pin metrics
    Shell,
}
