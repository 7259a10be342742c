//! Upload validation command.
//!
//! Checks a local file against the configured upload rules without
//! storing it.

use clap::Args;
use std::path::PathBuf;

use crate::cli::common::{print_json, CliContext, CliError, CliResult};
use crate::services::{format_file_size, UploadedFile};

/// Check whether a file would be accepted as an upload
#[derive(Debug, Clone, Args)]
pub struct ValidateArgs {
    /// File to check
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Output the `{ isValid, error }` result as JSON
    #[arg(long)]
    pub json: bool,
}

impl ValidateArgs {
    /// Execute the validate command
    pub fn execute(&self, ctx: &CliContext) -> CliResult<()> {
        let bytes = std::fs::read(&self.file).map_err(|e| {
            CliError::io(format!("Failed to read {}: {e}", self.file.display()))
        })?;
        let name = self
            .file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let upload = UploadedFile::new(name, None, bytes);
        let validation = ctx.config.file_validator().validate(&upload);

        if self.json {
            print_json(&validation)?;
        } else if validation.is_valid {
            println!(
                "✓ {} ({}, {}) is a valid upload",
                self.file.display(),
                upload.mime_type(),
                format_file_size(upload.size())
            );
        }

        match validation.error {
            Some(error) => Err(CliError::validation(error)),
            None => Ok(()),
        }
    }
}
