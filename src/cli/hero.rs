//! Hero image commands.

use clap::{Args, Subcommand};
use serde::Serialize;

use crate::cli::common::{print_json, CliContext, CliError, CliResult};
use crate::models::HeroImage;
use crate::services::format_file_size;

/// Inspect homepage hero images
#[derive(Debug, Clone, Args)]
pub struct HeroArgs {
    /// Hero subcommand
    #[command(subcommand)]
    pub command: HeroCommand,
}

/// Hero image subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum HeroCommand {
    /// List hero images in display order
    List(ListHeroArgs),
}

/// List hero images in display order
#[derive(Debug, Clone, Args)]
pub struct ListHeroArgs {
    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct ListHeroResponse<'a> {
    images: &'a [HeroImage],
    count: usize,
}

impl HeroArgs {
    /// Execute the hero command
    pub fn execute(&self, ctx: &CliContext) -> CliResult<()> {
        match &self.command {
            HeroCommand::List(args) => args.execute(ctx),
        }
    }
}

impl ListHeroArgs {
    /// Execute the list command
    pub fn execute(&self, ctx: &CliContext) -> CliResult<()> {
        let services = ctx.services()?;
        let images = services
            .hero_images
            .load()
            .map_err(|e| CliError::from_service("Failed to load hero images", &e))?;

        if self.json {
            return print_json(&ListHeroResponse {
                images: &images,
                count: images.len(),
            });
        }

        if images.is_empty() {
            println!("No hero images uploaded.");
            return Ok(());
        }

        println!("Hero images ({}):", images.len());
        println!();
        for image in &images {
            println!(
                "  {:<4} {:<30} {:<10} {}",
                image.order,
                image.title,
                format_file_size(image.file.file_size),
                image.file.url
            );
        }
        Ok(())
    }
}
