//! CLI command handlers.
//!
//! This module provides headless, scriptable access to the gallery data and
//! upload rules, plus the interactive terminal preview.

pub mod category;
pub mod common;
pub mod hero;
pub mod init;
pub mod item;
pub mod preview;
pub mod validate;

// Re-export types used by main.rs and tests
pub use category::CategoryArgs;
pub use common::{CliContext, CliError, CliResult, ExitCode};
pub use hero::HeroArgs;
pub use init::InitArgs;
pub use item::ItemArgs;
pub use preview::PreviewArgs;
pub use validate::ValidateArgs;
