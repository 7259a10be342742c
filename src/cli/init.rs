//! First-run setup.

use clap::Args;

use crate::cli::common::{CliContext, CliError, CliResult};
use crate::config::Config;

/// Seed default categories (and optionally write a default config file)
#[derive(Debug, Clone, Args)]
pub struct InitArgs {
    /// Also write the current configuration to the platform config file if
    /// none exists yet
    #[arg(long)]
    pub write_config: bool,
}

impl InitArgs {
    /// Execute the init command
    pub fn execute(&self, ctx: &CliContext) -> CliResult<()> {
        if self.write_config {
            let path = Config::config_file_path()
                .map_err(|e| CliError::io(format!("Failed to resolve config path: {e}")))?;
            if Config::exists() {
                println!("Config already exists at {}", path.display());
            } else {
                ctx.config
                    .save()
                    .map_err(|e| CliError::io(format!("Failed to write config: {e:#}")))?;
                println!("✓ Wrote {}", path.display());
            }
        }

        let services = ctx.services()?;
        let created = services
            .collections
            .initialize_default_categories()
            .map_err(|e| CliError::from_service("Failed to seed categories", &e))?;

        if created == 0 {
            println!("Categories already exist, skipping initialization.");
        } else {
            println!(
                "✓ Created {created} default categories in {}",
                ctx.data_dir.display()
            );
        }
        Ok(())
    }
}
