//! Gallery item commands.

use clap::{Args, Subcommand};
use serde::Serialize;

use crate::cli::common::{print_json, CliContext, CliError, CliResult};
use crate::models::CollectionItem;
use crate::services::format_file_size;

/// Inspect gallery items
#[derive(Debug, Clone, Args)]
pub struct ItemArgs {
    /// Item subcommand
    #[command(subcommand)]
    pub command: ItemCommand,
}

/// Item subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum ItemCommand {
    /// List gallery items
    List(ListItemsArgs),
}

/// List gallery items
#[derive(Debug, Clone, Args)]
pub struct ListItemsArgs {
    /// Only items in this category slug ("all" for every item)
    #[arg(long, value_name = "SLUG")]
    pub category: Option<String>,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct ListItemsResponse<'a> {
    items: &'a [CollectionItem],
    count: usize,
}

impl ItemArgs {
    /// Execute the item command
    pub fn execute(&self, ctx: &CliContext) -> CliResult<()> {
        match &self.command {
            ItemCommand::List(args) => args.execute(ctx),
        }
    }
}

impl ListItemsArgs {
    /// Execute the list command
    pub fn execute(&self, ctx: &CliContext) -> CliResult<()> {
        let services = ctx.services()?;
        let items = services
            .collections
            .load_items(self.category.as_deref())
            .map_err(|e| CliError::from_service("Failed to load items", &e))?;

        if self.json {
            return print_json(&ListItemsResponse {
                items: &items,
                count: items.len(),
            });
        }

        if items.is_empty() {
            println!("No items found.");
            return Ok(());
        }

        println!("Items ({}):", items.len());
        println!();
        for item in &items {
            let size = item.file_size.map(format_file_size).unwrap_or_default();
            println!(
                "  {:<4} {:<28} {:<20} {:<18} {}",
                item.order, item.title, item.location, item.category, size
            );
        }
        Ok(())
    }
}
