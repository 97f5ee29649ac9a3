use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use flatsmith_format::{Formatter, TagTable, TagValue};
use flatsmith_generate::{
    FakeAddress, FakeUser, RecordKind, fake_address, fake_user, generate_addresses,
    generate_users, read_records, shuffle_records, write_records,
};
use flatsmith_load::{LoadConfig, Loader};

#[derive(Debug, Error)]
enum CliError {
    #[error("generate error: {0}")]
    Generate(#[from] flatsmith_generate::GenerateError),
    #[error("load error: {0}")]
    Load(#[from] flatsmith_load::LoadError),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

#[derive(Parser, Debug)]
#[command(name = "flatsmith", version, about = "Flatsmith CLI")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check that the CLI is wired up.
    Ping,
    /// Generate a CSV full of fake records.
    Fake(FakeArgs),
    /// Shuffle fields within an existing fake data CSV.
    Shuffle(ShuffleArgs),
    /// Expand template placeholders and print the result.
    Render(RenderArgs),
    /// Bulk-load a CSV into Postgres.
    Load(LoadArgs),
}

#[derive(Args, Debug)]
struct FakeArgs {
    /// The kind of records to generate (address or user).
    #[arg(short = 't', long = "type", default_value = "address")]
    kind: String,
    /// How many records to generate.
    #[arg(short, long, default_value_t = 1000)]
    count: u64,
    /// RNG seed; random when omitted.
    #[arg(long)]
    seed: Option<u64>,
    /// Output CSV path.
    #[arg(value_name = "PATH", default_value = "output.csv")]
    out: PathBuf,
}

#[derive(Args, Debug)]
struct ShuffleArgs {
    /// The kind of records in the CSV (address or user).
    #[arg(short = 't', long = "type")]
    kind: String,
    /// How many fields to copy into each mutated record.
    #[arg(short, long, default_value_t = 2)]
    count: usize,
    /// RNG seed; random when omitted.
    #[arg(long)]
    seed: Option<u64>,
    /// Input CSV path.
    #[arg(short, long, default_value = "output.csv")]
    input: PathBuf,
    /// Output CSV path.
    #[arg(value_name = "PATH", default_value = "output-mod.csv")]
    out: PathBuf,
}

#[derive(Args, Debug)]
struct RenderArgs {
    /// Extra template argument, `key=value`. Repeatable.
    #[arg(short = 'a', long = "arg", value_name = "KEY=VALUE")]
    args: Vec<String>,
    /// Templates to expand.
    #[arg(value_name = "TEMPLATE", required = true)]
    templates: Vec<String>,
}

#[derive(Args, Debug)]
struct LoadArgs {
    /// Path to the load config (TOML).
    #[arg(long, value_name = "FILE")]
    config: PathBuf,
    /// Postgres connection string; falls back to DATABASE_URL.
    #[arg(long, value_name = "CONNECTION_STRING")]
    database_url: Option<String>,
    /// Source file pattern; placeholders are expanded before loading.
    #[arg(value_name = "SOURCE")]
    source: String,
}

#[tokio::main]
async fn main() -> ExitCode {
    init_logging();
    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "command failed");
            ExitCode::FAILURE
        }
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::Ping => run_ping(),
        Command::Fake(args) => run_fake(args),
        Command::Shuffle(args) => run_shuffle(args),
        Command::Render(args) => run_render(args),
        Command::Load(args) => run_load(args).await,
    }
}

fn run_ping() -> Result<(), CliError> {
    info!(at = %chrono::Local::now().format("%Y-%m-%d %H:%M:%S"), "pong");
    Ok(())
}

fn rng_from_seed(seed: Option<u64>) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed.unwrap_or_else(rand::random))
}

fn run_fake(args: FakeArgs) -> Result<(), CliError> {
    let kind = RecordKind::parse(&args.kind)?;
    let mut rng = rng_from_seed(args.seed);

    let (count, bytes) = match kind {
        RecordKind::User => {
            let records = generate_users(args.count, &mut rng);
            (records.len(), write_records(&args.out, &records, true)?)
        }
        RecordKind::Address => {
            let records = generate_addresses(args.count, &mut rng);
            (records.len(), write_records(&args.out, &records, true)?)
        }
    };

    info!(
        kind = kind.as_str(),
        count,
        bytes,
        path = %args.out.display(),
        "fake data written"
    );
    Ok(())
}

fn run_shuffle(args: ShuffleArgs) -> Result<(), CliError> {
    let kind = RecordKind::parse(&args.kind)?;
    let mut rng = rng_from_seed(args.seed);

    let count = match kind {
        RecordKind::User => {
            let mut records: Vec<FakeUser> = read_records(&args.input, true)?;
            shuffle_records(
                &mut records,
                FakeUser::shuffle_slots(),
                args.count,
                |rng| fake_user(0, rng),
                &mut rng,
            );
            write_records(&args.out, &records, true)?;
            records.len()
        }
        RecordKind::Address => {
            let mut records: Vec<FakeAddress> = read_records(&args.input, true)?;
            shuffle_records(
                &mut records,
                FakeAddress::shuffle_slots(),
                args.count,
                |rng| fake_address(0, rng),
                &mut rng,
            );
            write_records(&args.out, &records, true)?;
            records.len()
        }
    };

    info!(
        kind = kind.as_str(),
        count,
        input = %args.input.display(),
        path = %args.out.display(),
        "shuffled data written"
    );
    Ok(())
}

fn run_render(args: RenderArgs) -> Result<(), CliError> {
    let mut overrides = TagTable::new();
    for pair in &args.args {
        let (key, raw) = pair.split_once('=').ok_or_else(|| {
            CliError::InvalidArgument(format!("expected key=value, got '{pair}'"))
        })?;
        let value = parse_value(raw);
        overrides.set(key.to_string(), move || value.clone());
    }

    let formatter = Formatter::new();
    for template in &args.templates {
        println!("{}", formatter.format(template, Some(&overrides)));
    }
    Ok(())
}

/// Numeric-looking override values become numbers so format specs apply.
fn parse_value(raw: &str) -> TagValue {
    if let Ok(value) = raw.parse::<i64>() {
        return TagValue::Int(value);
    }
    if let Ok(value) = raw.parse::<f64>() {
        return TagValue::Float(value);
    }
    TagValue::Text(raw.to_string())
}

async fn run_load(args: LoadArgs) -> Result<(), CliError> {
    let config = LoadConfig::from_path(&args.config)?;
    let database_url = match args.database_url {
        Some(url) => url,
        None => std::env::var("DATABASE_URL").map_err(|_| {
            CliError::InvalidArgument("--database-url or DATABASE_URL is required".to_string())
        })?,
    };

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(10))
        .connect(&database_url)
        .await?;

    let loader = Loader::new(pool);
    let report = loader.process(&args.source, &config).await?;

    let archived_to = report
        .archived_to
        .as_ref()
        .map(|path| path.display().to_string())
        .unwrap_or_default();
    info!(
        run_id = %report.run_id,
        rows_loaded = report.rows_loaded,
        archived_to = %archived_to,
        "load complete"
    );
    Ok(())
}
