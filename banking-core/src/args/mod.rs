//! Command-line arguments shared by every binary built on the core.
//!
//! Binaries flatten `CommonArgs` into their own `clap` parser so the
//! configuration and data directories are set the same way everywhere.

use clap::Args;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Directory locations parsed from the command line.
#[derive(Args, Debug, Clone, Serialize, Deserialize)]
pub struct CommonArgs {
    /// Path to the configuration directory (looked up for `synnax.toml`)
    #[arg(long, global = true, default_value = "./config")]
    config_dir: PathBuf,

    /// Path to the data directory (session flag lives here)
    #[arg(long, global = true, default_value = "./data")]
    data_dir: PathBuf,
}

impl CommonArgs {
    pub fn new(config_dir: impl Into<PathBuf>, data_dir: impl Into<PathBuf>) -> Self {
        Self {
            config_dir: config_dir.into(),
            data_dir: data_dir.into(),
        }
    }

    /// Returns the path to the configuration directory.
    pub fn get_config_dir(&self) -> PathBuf {
        self.config_dir.clone()
    }

    /// Returns the path to the data directory.
    ///
    /// This directory is used for runtime state persistence (e.g. `session.json`).
    pub fn get_data_dir(&self) -> PathBuf {
        self.data_dir.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct Harness {
        #[command(flatten)]
        common: CommonArgs,
    }

    #[test]
    fn test_defaults() {
        let h = Harness::parse_from(["bin"]);
        assert_eq!(h.common.get_config_dir(), PathBuf::from("./config"));
        assert_eq!(h.common.get_data_dir(), PathBuf::from("./data"));
    }

    #[test]
    fn test_overrides() {
        let h = Harness::parse_from(["bin", "--data-dir", "/tmp/synnax"]);
        assert_eq!(h.common.get_data_dir(), PathBuf::from("/tmp/synnax"));
    }
}
