//! Interactive glossary session
//!
//! Holds the glossary and the current filter for the lifetime of the
//! process. Every action re-reads the derived views from the facade.

use anyhow::Result;
use colored::Colorize;
use inquire::{InquireError, Select, Text};
use std::fmt;

use glossary_core::export::{self, ExportFormat};
use glossary_core::{DatasetFilter, FilterState, Glossary, GlossaryError, ViewMode};

use crate::prompts;
use crate::render;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuAction {
    Browse,
    Search,
    Category,
    Dataset,
    Layout,
    Show,
    Add,
    Edit,
    Delete,
    Pin,
    History,
    Lineage,
    Export,
    Quit,
}

impl MenuAction {
    const ALL: [MenuAction; 14] = [
        MenuAction::Browse,
        MenuAction::Search,
        MenuAction::Category,
        MenuAction::Dataset,
        MenuAction::Layout,
        MenuAction::Show,
        MenuAction::Add,
        MenuAction::Edit,
        MenuAction::Delete,
        MenuAction::Pin,
        MenuAction::History,
        MenuAction::Lineage,
        MenuAction::Export,
        MenuAction::Quit,
    ];
}

impl fmt::Display for MenuAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            MenuAction::Browse => "Browse metrics",
            MenuAction::Search => "Search",
            MenuAction::Category => "Filter by category",
            MenuAction::Dataset => "Filter by dataset",
            MenuAction::Layout => "Switch table / cards",
            MenuAction::Show => "Show metric",
            MenuAction::Add => "Add metric / KPI",
            MenuAction::Edit => "Edit metric",
            MenuAction::Delete => "Delete metric",
            MenuAction::Pin => "Pin / unpin metric",
            MenuAction::History => "Change history",
            MenuAction::Lineage => "Lineage",
            MenuAction::Export => "Export",
            MenuAction::Quit => "Quit",
        };
        write!(f, "{}", label)
    }
}

fn is_cancellation(err: &anyhow::Error) -> bool {
    matches!(
        err.downcast_ref::<InquireError>(),
        Some(InquireError::OperationCanceled)
    )
}

pub struct Session {
    glossary: Glossary,
    filter: FilterState,
    view: ViewMode,
}

impl Session {
    pub fn new(glossary: Glossary, view: ViewMode) -> Self {
        Self {
            glossary,
            filter: FilterState::default(),
            view,
        }
    }

    /// Runs the menu loop until the user quits or interrupts
    pub fn run(&mut self) -> Result<()> {
        render::print_header(&self.glossary);
        println!("{}", "Changes last for this session only.".dimmed());

        loop {
            println!();
            self.print_filter_summary();

            let action = match Select::new("What would you like to do?", MenuAction::ALL.to_vec())
                .with_page_size(MenuAction::ALL.len())
                .prompt()
            {
                Ok(action) => action,
                Err(InquireError::OperationCanceled) | Err(InquireError::OperationInterrupted) => {
                    break
                }
                Err(e) => return Err(e.into()),
            };

            if action == MenuAction::Quit {
                break;
            }

            match self.handle(action) {
                Ok(()) => {}
                Err(e) if is_cancellation(&e) => println!("{}", "Cancelled.".yellow()),
                Err(e) => return Err(e),
            }
        }

        Ok(())
    }

    fn print_filter_summary(&self) {
        let search = if self.filter.search.is_empty() {
            "-".to_string()
        } else {
            format!("\"{}\"", self.filter.search)
        };
        println!(
            "{} {}  {} {}  {} {}  {} {}",
            "Search:".dimmed(),
            search,
            "Category:".dimmed(),
            self.filter.category,
            "Dataset:".dimmed(),
            self.filter.dataset,
            "View:".dimmed(),
            self.view
        );
    }

    fn handle(&mut self, action: MenuAction) -> Result<()> {
        match action {
            MenuAction::Browse => self.browse(),
            MenuAction::Search => {
                self.filter.search = Text::new("Search metrics, KPIs, synonyms:")
                    .with_initial_value(&self.filter.search)
                    .prompt()?
                    .trim()
                    .to_string();
                self.browse();
            }
            MenuAction::Category => {
                let counts = self.glossary.category_counts(&self.filter);
                let labels: Vec<String> = counts
                    .iter()
                    .map(|(pill, count)| format!("{} ({})", pill, count))
                    .collect();
                let start = counts
                    .iter()
                    .position(|(pill, _)| *pill == self.filter.category)
                    .unwrap_or(0);
                let picked = Select::new("Category:", labels.clone())
                    .with_starting_cursor(start)
                    .with_page_size(counts.len())
                    .prompt()?;
                if let Some(idx) = labels.iter().position(|l| *l == picked) {
                    self.filter.category = counts[idx].0;
                }
                self.browse();
            }
            MenuAction::Dataset => {
                let choices = DatasetFilter::choices();
                let start = choices
                    .iter()
                    .position(|d| *d == self.filter.dataset)
                    .unwrap_or(0);
                self.filter.dataset = Select::new("Dataset:", choices)
                    .with_starting_cursor(start)
                    .prompt()?;
                self.browse();
            }
            MenuAction::Layout => {
                self.view = match self.view {
                    ViewMode::Table => ViewMode::Cards,
                    ViewMode::Cards => ViewMode::Table,
                };
                self.browse();
            }
            MenuAction::Show => {
                if let Some(id) = self.select_visible("Show which metric?")? {
                    if let Some(metric) = self.glossary.get(&id) {
                        render::print_metric(&self.glossary, metric);
                    }
                }
            }
            MenuAction::Add => self.add()?,
            MenuAction::Edit => self.edit()?,
            MenuAction::Delete => self.delete()?,
            MenuAction::Pin => {
                if let Some(id) = self.select_visible("Pin or unpin which metric?")? {
                    let pinned = self.glossary.toggle_favorite(&id);
                    let name = self.glossary.get(&id).map(|m| m.name.clone()).unwrap_or(id);
                    if pinned {
                        println!("{} {}", "Pinned".yellow(), name);
                    } else {
                        println!("{} {}", "Unpinned".dimmed(), name);
                    }
                }
            }
            MenuAction::History => {
                if let Some(id) = self.select_visible("History of which metric?")? {
                    if let Some(metric) = self.glossary.get(&id) {
                        render::print_history(metric, &self.glossary.history(&id));
                    }
                }
            }
            MenuAction::Lineage => {
                if let Some(id) = self.select_visible("Lineage of which metric?")? {
                    if let (Some(metric), Some(lineage)) =
                        (self.glossary.get(&id), self.glossary.lineage(&id))
                    {
                        render::print_lineage(metric, &lineage);
                    }
                }
            }
            MenuAction::Export => {
                let formats = vec![ExportFormat::Markdown, ExportFormat::Json, ExportFormat::Yaml];
                let format = Select::new("Format:", formats).prompt()?;
                println!("{}", export::render(&self.glossary, format)?);
            }
            MenuAction::Quit => {}
        }

        Ok(())
    }

    fn browse(&self) {
        println!();
        render::print_category_pills(
            &self.glossary.category_counts(&self.filter),
            self.filter.category,
        );
        match self.view {
            ViewMode::Table => render::print_table(&self.glossary.table_view(&self.filter)),
            ViewMode::Cards => render::print_cards(&self.glossary, &self.glossary.list(&self.filter)),
        }
    }

    /// Picks from the currently visible metrics
    fn select_visible(&self, message: &str) -> Result<Option<String>> {
        let visible = self.glossary.list(&self.filter);
        let picked = prompts::prompt_select_metric(message, &visible)?;
        if picked.is_none() {
            println!("{}", "No metrics match the current filters.".yellow());
        }
        Ok(picked)
    }

    fn add(&mut self) -> Result<()> {
        let draft = prompts::prompt_new_metric(&mut self.glossary)?;
        match self.glossary.create(draft) {
            Ok(metric) => {
                println!("{} {}", "Metric added:".green(), metric.name);
                println!("ID: {}", metric.id);
            }
            Err(GlossaryError::EmptyName) => {
                println!("{}", "Name is required - metric not saved.".red());
            }
            Err(e) => return Err(e.into()),
        }
        Ok(())
    }

    fn edit(&mut self) -> Result<()> {
        let id = match self.select_visible("Edit which metric?")? {
            Some(id) => id,
            None => return Ok(()),
        };
        let metric = match self.glossary.get(&id) {
            Some(m) => m.clone(),
            None => return Ok(()),
        };

        let draft = prompts::prompt_edit_metric(&mut self.glossary, &metric)?;
        match self.glossary.update(&id, draft) {
            Ok(Some(updated)) => {
                let recorded = updated.changelog.len() - metric.changelog.len();
                println!("{} {}", "Metric updated:".green(), updated.name);
                println!("{} change(s) recorded", recorded);
            }
            Ok(None) => println!("{}", "Metric no longer exists - nothing saved.".yellow()),
            Err(GlossaryError::EmptyName) => {
                println!("{}", "Name is required - changes not saved.".red());
            }
            Err(e) => return Err(e.into()),
        }
        Ok(())
    }

    fn delete(&mut self) -> Result<()> {
        let id = match self.select_visible("Delete which metric?")? {
            Some(id) => id,
            None => return Ok(()),
        };
        let metric = match self.glossary.get(&id) {
            Some(m) => m.clone(),
            None => return Ok(()),
        };

        if !prompts::confirm_delete(&metric)? {
            println!("{}", "Deletion cancelled.".yellow());
            return Ok(());
        }

        self.glossary.delete(&id);
        println!("{} {}", "Metric deleted:".green(), metric.name);

        let referrers = self.count_dangling_referrers(&id);
        if referrers > 0 {
            println!(
                "{}",
                format!("{} metric(s) still list it as related; it is hidden from their lineage.", referrers)
                    .dimmed()
            );
        }
        Ok(())
    }

    fn count_dangling_referrers(&self, deleted_id: &str) -> usize {
        self.glossary
            .metrics()
            .iter()
            .filter(|m| m.references(deleted_id))
            .count()
    }
}
