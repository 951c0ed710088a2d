//! Hierarchy Integrity Audit Binary
//!
//! Opens a libsql node store, runs a full integrity sweep and prints the
//! report as JSON on stdout.
//!
//! # Usage
//!
//! ```bash
//! # Audit a database file
//! cargo run --bin hierarchy-audit -- /var/lib/infracat/catalog.db
//!
//! # With a JSON configuration file
//! cargo run --bin hierarchy-audit -- catalog.db --config hierarchy.json
//! ```
//!
//! # Environment Variables
//!
//! - `INFRACAT_DB_PATH`: Database path when no positional argument is given
//! - `INFRACAT_MAX_DEPTH`, `INFRACAT_DEFAULT_DEPTH`, `INFRACAT_UNKNOWN_NAME`:
//!   Configuration overrides
//! - `RUST_LOG`: Logging level (e.g., "info", "debug", "trace")
//!
//! Exits with status 1 when the report contains orphans, self-cycles or
//! unmapped instance types.

use std::env;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context};
use infracat_core::db::{DatabaseService, TursoStore};
use infracat_core::{HierarchyConfig, HierarchyService};

const DB_PATH_VAR: &str = "INFRACAT_DB_PATH";

struct AuditArgs {
    db_path: PathBuf,
    config_path: Option<PathBuf>,
}

fn parse_args() -> anyhow::Result<AuditArgs> {
    let mut db_path = None;
    let mut config_path = None;
    let mut args = env::args().skip(1);

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => {
                let path = args.next().context("--config requires a file path")?;
                config_path = Some(PathBuf::from(path));
            }
            flag if flag.starts_with("--") => bail!("unknown option: {}", flag),
            _ if db_path.is_none() => db_path = Some(PathBuf::from(arg)),
            _ => bail!("unexpected argument: {}", arg),
        }
    }

    let db_path = match db_path {
        Some(path) => path,
        None => env::var(DB_PATH_VAR)
            .map(PathBuf::from)
            .with_context(|| format!("no database path given and {} is not set", DB_PATH_VAR))?,
    };

    Ok(AuditArgs {
        db_path,
        config_path,
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = parse_args()?;

    let config = match &args.config_path {
        Some(path) => HierarchyConfig::from_file(path)?,
        None => HierarchyConfig::default(),
    }
    .with_overrides(|var| env::var(var).ok())?;

    tracing::info!("Database: {}", args.db_path.display());

    let db = DatabaseService::new(args.db_path.clone())
        .await
        .with_context(|| format!("failed to open {}", args.db_path.display()))?;
    let store = Arc::new(TursoStore::new(Arc::new(db)));
    let service = HierarchyService::new(store, config)?;

    let report = service.validate_integrity().await?;
    println!("{}", serde_json::to_string_pretty(&report)?);

    if !report.is_healthy() {
        tracing::warn!(
            orphans = report.orphans.len(),
            cycles = report.cycles.len(),
            unknown_types = report.unknown_instance_types.len(),
            "hierarchy has integrity problems"
        );
        std::process::exit(1);
    }

    tracing::info!("hierarchy is healthy ({} nodes)", report.total_nodes);
    Ok(())
}
