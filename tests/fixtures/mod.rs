//! Shared test fixtures for E2E CLI tests.
#![allow(dead_code)] // Not every test binary uses every fixture

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;
use villa_showcase::config::Config;
use villa_showcase::services::{AdminServices, UploadedFile};

/// Path to the villa-showcase binary (set by cargo at compile time)
pub fn villa_bin() -> &'static str {
    env!("CARGO_BIN_EXE_villa-showcase")
}

/// An isolated data directory plus a config path that never exists, so the
/// binary under test ignores the user's real configuration.
pub struct TestEnv {
    dir: TempDir,
}

impl TestEnv {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp dir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn data_dir(&self) -> PathBuf {
        self.dir.path().join("data")
    }

    pub fn config_path(&self) -> PathBuf {
        self.dir.path().join("missing-config.toml")
    }

    /// Runs the binary with `args` against this environment.
    pub fn run(&self, args: &[&str]) -> Output {
        self.command(args)
            .output()
            .expect("Failed to execute command")
    }

    /// Platform config home used by [`run_with_config_home`](Self::run_with_config_home).
    pub fn config_home(&self) -> PathBuf {
        self.dir.path().join("xdg-config")
    }

    /// Runs the binary with the platform config directory pointed inside
    /// this environment (honored on Linux via `XDG_CONFIG_HOME`).
    pub fn run_with_config_home(&self, args: &[&str]) -> Output {
        self.command(args)
            .env("XDG_CONFIG_HOME", self.config_home())
            .output()
            .expect("Failed to execute command")
    }

    fn command(&self, args: &[&str]) -> Command {
        let mut command = Command::new(villa_bin());
        command
            .arg("--data-dir")
            .arg(self.data_dir())
            .arg("--config")
            .arg(self.config_path())
            .args(args)
            .env_remove("RUST_LOG");
        command
    }

    /// Opens the same stores the binary uses, for seeding and inspection.
    pub fn services(&self) -> AdminServices {
        AdminServices::open(&Config::default(), &self.data_dir()).expect("Failed to open services")
    }

    /// Writes `bytes` to a file in the environment and returns its path.
    pub fn write_file(&self, name: &str, bytes: &[u8]) -> PathBuf {
        let path = self.dir.path().join(name);
        fs::write(&path, bytes).expect("Failed to write file");
        path
    }
}

/// A small fake PNG upload.
pub fn png_upload(name: &str) -> UploadedFile {
    UploadedFile::new(name, Some("image/png".to_string()), b"\x89PNG fake".to_vec())
}

pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

/// Parses the single JSON line a `--json` command prints.
pub fn stdout_json(output: &Output) -> serde_json::Value {
    serde_json::from_str(&stdout(output)).expect("Should parse JSON output")
}
