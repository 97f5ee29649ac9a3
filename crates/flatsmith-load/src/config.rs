use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::LoadError;

/// Configuration for one bulk-load target, typically read from TOML.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadConfig {
    /// Target table, optionally schema-qualified (`public.users`).
    pub table: String,
    /// Explicit column list; when empty the CSV header row is used.
    #[serde(default)]
    pub columns: Vec<String>,
    /// Directory pattern for archived source files. May contain placeholders.
    pub archive_dir: String,
    /// File-name pattern for archived source files. May contain placeholders.
    pub archive_mask: String,
    /// Whether the CSV carries a header record.
    #[serde(default = "default_true")]
    pub csv_has_header: bool,
    /// Move the source file into the archive after a successful load.
    #[serde(default = "default_true")]
    pub move_to_archive: bool,
    /// Extra template arguments available to the path patterns.
    #[serde(default)]
    pub format_parameters: BTreeMap<String, String>,
}

fn default_true() -> bool {
    true
}

impl LoadConfig {
    /// Read a config from a TOML file.
    pub fn from_path(path: &Path) -> Result<Self, LoadError> {
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_config_gets_defaults() {
        let config: LoadConfig = toml::from_str(
            r#"
            table = "public.users"
            archive_dir = "archive/{now:%Y}"
            archive_mask = "users-{now:%Y%m%d}.csv"
            "#,
        )
        .expect("parse config");

        assert!(config.columns.is_empty());
        assert!(config.csv_has_header);
        assert!(config.move_to_archive);
        assert!(config.format_parameters.is_empty());
    }

    #[test]
    fn full_config_roundtrips() {
        let config: LoadConfig = toml::from_str(
            r#"
            table = "staging.addresses"
            columns = ["id", "line1", "city"]
            archive_dir = "done"
            archive_mask = "{region}.csv"
            csv_has_header = false
            move_to_archive = false

            [format_parameters]
            region = "emea"
            "#,
        )
        .expect("parse config");

        assert_eq!(config.columns, ["id", "line1", "city"]);
        assert!(!config.csv_has_header);
        assert!(!config.move_to_archive);
        assert_eq!(config.format_parameters["region"], "emea");
    }
}
