//! `rolodex`: interactive front end for the Rolodex person directory.
//!
//! # Usage
//!
//! ```
//! rolodex                         # menu over ./rolodex.db
//! rolodex --database ~/people.db
//! rolodex --config rolodex.toml --generate
//! ```
//!
//! Logging goes to stderr and is quiet by default; set `RUST_LOG=debug` to
//! see the statements the directory builds.

mod generate;
mod menu;
mod settings;
mod table;

use std::path::PathBuf;

use anyhow::Context as _;
use clap::Parser;
use rolodex_store_sqlite::SqliteDirectory;
use settings::Settings;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Interactive person directory")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "rolodex.toml")]
  config: PathBuf,

  /// SQLite database file; overrides `database_path` from the config.
  #[arg(short, long, value_name = "FILE")]
  database: Option<PathBuf>,

  /// Insert a batch of generated test people and exit.
  #[arg(long)]
  generate: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing; stdout belongs to the menu.
  tracing_subscriber::fmt()
    .with_writer(std::io::stderr)
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let mut settings = Settings::load(&cli.config)?;
  if let Some(path) = cli.database {
    settings.database_path = path;
  }

  let dir = SqliteDirectory::open(&settings.database_path)
    .await
    .with_context(|| format!("failed to open directory at {:?}", settings.database_path))?;
  tracing::info!(path = ?settings.database_path, "directory opened");

  if cli.generate {
    return menu::seed_test_data(&dir, &settings.generate).await;
  }
  menu::run(&dir, &settings.generate).await
}
