//! `artboards list`: show what an export would pick up.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use artboards_core::ArtboardDescriptor;
use artboards_ignore::IgnoreRuleSet;
use artboards_sync::{enumerate, Sketchtool};

use super::{resolve_source, source_dir, ConfigArgs};

/// Arguments for `artboards list`.
#[derive(Args, Debug)]
pub struct ListArgs {
    /// The `.sketch` file to inspect.
    pub file: PathBuf,

    #[command(flatten)]
    pub config: ConfigArgs,

    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ListedRow {
    page: String,
    artboard: String,
    qualified_name: String,
    excluded: bool,
    /// The `.sketchignore` pattern that excluded it.
    #[serde(skip_serializing_if = "Option::is_none")]
    rule: Option<String>,
}

#[derive(Tabled)]
struct ListTableRow {
    #[tabled(rename = "page")]
    page: String,
    #[tabled(rename = "artboard")]
    artboard: String,
    #[tabled(rename = "status")]
    status: String,
}

impl ListArgs {
    pub fn run(self) -> Result<()> {
        let source = resolve_source(&self.file)?;
        let layer = self.config.load_partial(&source)?;
        let tool = Sketchtool::new(layer.sketchtool_or_default());

        let rules = artboards_ignore::resolve(source_dir(&source))
            .context("failed to load .sketchignore")?;
        let enumeration = enumerate::enumerate(&tool, &source, &rules)
            .with_context(|| format!("failed to list '{}'", self.file.display()))?;

        let rows: Vec<ListedRow> = enumeration
            .included
            .iter()
            .chain(enumeration.excluded.iter())
            .map(|d| listed_row(d, &rules))
            .collect();

        if self.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&rows).context("failed to serialize listing")?
            );
            return Ok(());
        }
        print_table(rows, &rules);
        Ok(())
    }
}

fn listed_row(descriptor: &ArtboardDescriptor, rules: &IgnoreRuleSet) -> ListedRow {
    let qualified_name = descriptor.qualified_name();
    let rule = rules
        .matching_rule(&qualified_name)
        .map(|r| r.pattern().to_string());
    ListedRow {
        page: descriptor.page.clone(),
        artboard: descriptor.name.clone(),
        excluded: rule.is_some(),
        qualified_name,
        rule,
    }
}

fn print_table(rows: Vec<ListedRow>, rules: &IgnoreRuleSet) {
    let excluded = rows.iter().filter(|r| r.excluded).count();
    println!(
        "{} artboard(s), {} ignored",
        rows.len() - excluded,
        excluded
    );
    if let Some(origin) = rules.origin() {
        println!("Ignore rules: {} ({} pattern(s))", origin.display(), rules.len());
    }
    if rows.is_empty() {
        return;
    }

    let table_rows: Vec<ListTableRow> = rows
        .into_iter()
        .map(|row| ListTableRow {
            page: row.page,
            artboard: row.artboard,
            status: match row.rule {
                Some(pattern) => format!("{} {pattern}", "ignored".yellow()),
                None => "export".green().to_string(),
            },
        })
        .collect();
    let mut table = Table::new(table_rows);
    table.with(Style::rounded());
    println!("{table}");
}
