//! Configuration loading and representation.
//!
//! Built once at startup (by the CLI) and passed by reference into the
//! operations that need it. There is no process-global configuration.

use std::path::PathBuf;

pub const DEFAULT_CONTRACT_FILE: &str = "config/contract.json";
pub const DEFAULT_DB_PATH: &str = "data/contracts.db";
pub const DEFAULT_MARKDOWN_OUTPUT: &str = "output.md";

/// Paths used by the contract operations.
///
/// Relative paths resolve against the working directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Contract document loaded when no explicit path is given.
    pub contract_file: PathBuf,
    /// SQLite database file; parent directories are created on open.
    pub db_path: PathBuf,
    /// Target of the Markdown report when written to a file.
    pub markdown_output: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            contract_file: PathBuf::from(DEFAULT_CONTRACT_FILE),
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            markdown_output: PathBuf::from(DEFAULT_MARKDOWN_OUTPUT),
        }
    }
}

impl AppConfig {
    pub fn with_contract_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.contract_file = path.into();
        self
    }

    pub fn with_db_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.db_path = path.into();
        self
    }

    pub fn with_markdown_output(mut self, path: impl Into<PathBuf>) -> Self {
        self.markdown_output = path.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_conventional_layout() {
        let config = AppConfig::default();
        assert_eq!(config.contract_file, PathBuf::from("config/contract.json"));
        assert_eq!(config.db_path, PathBuf::from("data/contracts.db"));
        assert_eq!(config.markdown_output, PathBuf::from("output.md"));
    }

    #[test]
    fn builders_override_single_fields() {
        let config = AppConfig::default().with_db_path("/tmp/x.db");
        assert_eq!(config.db_path, PathBuf::from("/tmp/x.db"));
        assert_eq!(config.contract_file, PathBuf::from(DEFAULT_CONTRACT_FILE));
    }
}
