//! The load pipeline itself.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;
use sqlx::postgres::PgPoolCopyExt;
use tracing::info;
use uuid::Uuid;

use flatsmith_format::{Formatter, TagTable};

use crate::config::LoadConfig;
use crate::errors::LoadError;

/// Outcome of one bulk-load run, also written as a JSON artifact next to the
/// archived source.
#[derive(Debug, Clone, Serialize)]
pub struct LoadReport {
    pub run_id: String,
    pub started_at: DateTime<Utc>,
    pub source: PathBuf,
    pub rows_loaded: u64,
    pub archived_to: Option<PathBuf>,
}

/// Streams CSV files into Postgres and archives the source afterwards.
#[derive(Debug, Clone)]
pub struct Loader {
    pool: PgPool,
    formatter: Formatter,
}

impl Loader {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            formatter: Formatter::new(),
        }
    }

    /// Run the pipeline for one source pattern.
    ///
    /// `source` and the config's archive patterns are expanded through the
    /// templating engine before any filesystem access, with the config's
    /// `format_parameters` layered over the built-in arguments.
    pub async fn process(&self, source: &str, config: &LoadConfig) -> Result<LoadReport, LoadError> {
        let run_id = Uuid::new_v4().to_string();
        let started_at = Utc::now();
        let paths = resolve_paths(&self.formatter, source, config);

        if !paths.source.is_file() {
            return Err(LoadError::MissingSource(paths.source.display().to_string()));
        }

        info!(
            run_id = %run_id,
            source = %paths.source.display(),
            table = %config.table,
            "load started"
        );

        let columns = resolve_columns(&paths.source, config)?;
        let rows_loaded = self.copy_into(&paths.source, config, &columns).await?;

        info!(run_id = %run_id, rows_loaded, "load finished");

        let archived_to = if config.move_to_archive {
            let target = paths.archive_dir.join(&paths.archive_mask);
            std::fs::create_dir_all(&paths.archive_dir)?;
            std::fs::rename(&paths.source, &target)?;
            info!(run_id = %run_id, target = %target.display(), "source archived");
            Some(target)
        } else {
            None
        };

        let report = LoadReport {
            run_id,
            started_at,
            source: paths.source,
            rows_loaded,
            archived_to,
        };

        if let Some(dir) = report.archived_to.as_ref().and_then(|path| path.parent()) {
            let report_path = dir.join(format!("load_report_{}.json", report.run_id));
            std::fs::write(&report_path, serde_json::to_vec_pretty(&report)?)?;
        }

        Ok(report)
    }

    async fn copy_into(
        &self,
        source: &Path,
        config: &LoadConfig,
        columns: &[String],
    ) -> Result<u64, LoadError> {
        let statement = copy_statement(&config.table, columns, config.csv_has_header);
        let data = std::fs::read(source)?;
        let mut copy = self.pool.copy_in_raw(&statement).await?;
        copy.send(data).await?;
        Ok(copy.finish().await?)
    }
}

pub(crate) struct ResolvedPaths {
    pub source: PathBuf,
    pub archive_dir: PathBuf,
    pub archive_mask: String,
}

pub(crate) fn resolve_paths(
    formatter: &Formatter,
    source: &str,
    config: &LoadConfig,
) -> ResolvedPaths {
    let arguments = TagTable::from_values(
        config
            .format_parameters
            .iter()
            .map(|(key, value)| (key.clone(), value.clone())),
    );

    ResolvedPaths {
        source: PathBuf::from(formatter.format(source, Some(&arguments))),
        archive_dir: PathBuf::from(formatter.format(&config.archive_dir, Some(&arguments))),
        archive_mask: formatter.format(&config.archive_mask, Some(&arguments)),
    }
}

fn resolve_columns(source: &Path, config: &LoadConfig) -> Result<Vec<String>, LoadError> {
    if !config.columns.is_empty() {
        return Ok(config.columns.clone());
    }
    if !config.csv_has_header {
        return Err(LoadError::InvalidConfig(
            "columns must be listed when the source has no header row".to_string(),
        ));
    }
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(source)?;
    let headers = reader.headers()?;
    Ok(headers.iter().map(str::to_string).collect())
}

/// Build the COPY statement with quoted identifiers.
fn copy_statement(table: &str, columns: &[String], header: bool) -> String {
    let table = table
        .split('.')
        .map(quote_ident)
        .collect::<Vec<_>>()
        .join(".");
    let columns = columns
        .iter()
        .map(|column| quote_ident(column))
        .collect::<Vec<_>>()
        .join(", ");
    format!("COPY {table} ({columns}) FROM STDIN WITH (FORMAT csv, HEADER {header})")
}

fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn config() -> LoadConfig {
        LoadConfig {
            table: "public.users".to_string(),
            columns: Vec::new(),
            archive_dir: "archive/{region}".to_string(),
            archive_mask: "{region}-users.csv".to_string(),
            csv_has_header: true,
            move_to_archive: true,
            format_parameters: BTreeMap::from([("region".to_string(), "emea".to_string())]),
        }
    }

    #[test]
    fn format_parameters_reach_path_patterns() {
        let formatter = Formatter::new();
        let paths = resolve_paths(&formatter, "in/{region}-users.csv", &config());
        assert_eq!(paths.source, PathBuf::from("in/emea-users.csv"));
        assert_eq!(paths.archive_dir, PathBuf::from("archive/emea"));
        assert_eq!(paths.archive_mask, "emea-users.csv");
    }

    #[test]
    fn builtin_tags_work_in_patterns() {
        let formatter = Formatter::new();
        let mut config = config();
        config.archive_mask = "users-{now:%Y}.csv".to_string();
        let paths = resolve_paths(&formatter, "in.csv", &config);
        assert!(!paths.archive_mask.contains("{now"));
        assert!(paths.archive_mask.starts_with("users-2"));
    }

    #[test]
    fn copy_statement_quotes_identifiers() {
        let columns = vec!["id".to_string(), "first name".to_string()];
        let statement = copy_statement("public.users", &columns, true);
        assert_eq!(
            statement,
            "COPY \"public\".\"users\" (\"id\", \"first name\") FROM STDIN WITH (FORMAT csv, HEADER true)"
        );
    }

    #[test]
    fn headerless_sources_require_columns() {
        let mut config = config();
        config.csv_has_header = false;
        let outcome = resolve_columns(Path::new("missing.csv"), &config);
        assert!(matches!(outcome, Err(LoadError::InvalidConfig(_))));
    }

    #[test]
    fn explicit_columns_skip_the_header_probe() {
        let mut config = config();
        config.columns = vec!["id".to_string()];
        // The path does not exist; explicit columns must not touch it.
        let columns = resolve_columns(Path::new("missing.csv"), &config).expect("columns");
        assert_eq!(columns, ["id"]);
    }
}
