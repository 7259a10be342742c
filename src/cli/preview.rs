//! Terminal preview command.

use clap::Args;
use std::path::PathBuf;
use tracing::{info, warn};

use crate::cli::common::{CliContext, CliError, CliResult};
use crate::models::Slide;
use crate::tui;

/// Open the interactive carousel and booking-calendar preview
#[derive(Debug, Clone, Default, Args)]
pub struct PreviewArgs {
    /// Use uploaded hero images as slides instead of the built-in villas
    #[arg(long)]
    pub slides_from_store: bool,

    /// Write logs to this file (the terminal is owned by the preview)
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

impl PreviewArgs {
    /// Execute the preview command
    pub fn execute(&self, ctx: &CliContext) -> CliResult<()> {
        let slides = self.slides(ctx)?;
        info!(count = slides.len(), "starting preview");

        tui::run_preview(&ctx.config, slides)
            .map_err(|e| CliError::io(format!("Preview failed: {e:#}")))
    }

    fn slides(&self, ctx: &CliContext) -> CliResult<Vec<Slide>> {
        if !self.slides_from_store {
            return Ok(Slide::showcase());
        }

        let images = ctx
            .services()?
            .hero_images
            .load()
            .map_err(|e| CliError::from_service("Failed to load hero images", &e))?;

        if images.is_empty() {
            warn!("no hero images uploaded, using built-in slides");
            return Ok(Slide::showcase());
        }
        Ok(images.iter().map(Slide::from).collect())
    }
}
