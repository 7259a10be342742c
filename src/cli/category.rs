//! Gallery category commands.
//!
//! Provides commands to list, add, and delete collection categories.

use clap::{Args, Subcommand};
use serde::Serialize;

use crate::cli::common::{print_json, CliContext, CliError, CliResult};
use crate::models::CollectionCategory;

/// Manage gallery categories
#[derive(Debug, Clone, Args)]
pub struct CategoryArgs {
    /// Category subcommand
    #[command(subcommand)]
    pub command: CategoryCommand,
}

/// Category management subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum CategoryCommand {
    /// List active categories
    List(ListCategoriesArgs),
    /// Add a new category
    Add(AddCategoryArgs),
    /// Deactivate a category
    Delete(DeleteCategoryArgs),
}

/// List active categories
#[derive(Debug, Clone, Args)]
pub struct ListCategoriesArgs {
    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

/// Add a new category
#[derive(Debug, Clone, Args)]
pub struct AddCategoryArgs {
    /// Category name; the slug is derived from it
    #[arg(long, value_name = "NAME")]
    pub name: String,

    /// Display order (defaults to after the last category)
    #[arg(long, value_name = "N")]
    pub order: Option<u32>,
}

/// Deactivate a category
#[derive(Debug, Clone, Args)]
pub struct DeleteCategoryArgs {
    /// Category ID
    #[arg(long, value_name = "ID")]
    pub id: String,
}

#[derive(Debug, Serialize)]
struct ListCategoriesResponse<'a> {
    categories: &'a [CollectionCategory],
    count: usize,
}

impl CategoryArgs {
    /// Execute the category command
    pub fn execute(&self, ctx: &CliContext) -> CliResult<()> {
        match &self.command {
            CategoryCommand::List(args) => args.execute(ctx),
            CategoryCommand::Add(args) => args.execute(ctx),
            CategoryCommand::Delete(args) => args.execute(ctx),
        }
    }
}

impl ListCategoriesArgs {
    /// Execute the list command
    pub fn execute(&self, ctx: &CliContext) -> CliResult<()> {
        let services = ctx.services()?;
        let categories = services
            .collections
            .load_categories()
            .map_err(|e| CliError::from_service("Failed to load categories", &e))?;

        if self.json {
            return print_json(&ListCategoriesResponse {
                categories: &categories,
                count: categories.len(),
            });
        }

        if categories.is_empty() {
            println!("No categories defined.");
        } else {
            println!("Categories ({}):", categories.len());
            println!();
            for category in &categories {
                println!(
                    "  {:<4} {:<24} {:<24} {}",
                    category.order, category.slug, category.name, category.id
                );
            }
        }

        Ok(())
    }
}

impl AddCategoryArgs {
    /// Execute the add command
    pub fn execute(&self, ctx: &CliContext) -> CliResult<()> {
        let services = ctx.services()?;

        let order = match self.order {
            Some(order) => order,
            None => services
                .collections
                .load_categories()
                .map_err(|e| CliError::from_service("Failed to load categories", &e))?
                .iter()
                .map(|c| c.order)
                .max()
                .unwrap_or(0)
                .saturating_add(1),
        };

        let category = services
            .collections
            .create_category(&self.name, order)
            .map_err(|e| CliError::from_service("Failed to add category", &e))?;

        println!(
            "✓ Added category '{}' ({}) with ID {}",
            category.name, category.slug, category.id
        );
        Ok(())
    }
}

impl DeleteCategoryArgs {
    /// Execute the delete command
    pub fn execute(&self, ctx: &CliContext) -> CliResult<()> {
        let services = ctx.services()?;
        services
            .collections
            .delete_category(&self.id)
            .map_err(|e| CliError::from_service("Failed to delete category", &e))?;

        println!("✓ Deactivated category {}", self.id);
        Ok(())
    }
}
