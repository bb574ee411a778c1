use std::path::PathBuf;

use clap::Parser;

use crate::cmd::Commands;
use crate::fields::Locale;

/// Household year-wheel: recurring tasks on a month calendar.
/// Storage defaults to ~/.yearwheel/tasks.json or a path passed via --db.
#[derive(Parser)]
#[command(name = "yw", version, about = "Household year-wheel task calendar")]
pub struct Cli {
    /// Path to the JSON task file.
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Label language, overriding config.toml.
    #[arg(long, global = true, value_enum)]
    pub locale: Option<Locale>,

    #[command(subcommand)]
    pub command: Commands,
}
