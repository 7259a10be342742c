//! Application-wide constants.
//!
//! This module defines constants used throughout the application,
//! including the application name and version information.

/// The display name of the application (human-readable, with proper capitalization).
pub const APP_NAME: &str = "Villa Showcase";

/// The binary name of the application (used in command examples, lowercase with hyphens).
pub const APP_BINARY_NAME: &str = "villa-showcase";

/// Directory name under the platform config directory.
pub const CONFIG_DIR_NAME: &str = "VillaShowcase";

/// File holding the admin session digest, relative to the data directory.
pub const SESSION_FILE: &str = "session/admin.token";

/// Subdirectory of the data directory holding JSON collections.
pub const RECORDS_DIR: &str = "records";

/// Subdirectory of the data directory holding uploaded media.
pub const MEDIA_DIR: &str = "media";
