//! # yw - household year-wheel
//!
//! A command-line calendar for recurring household chores and errands, with an
//! interactive month view.
//!
//! ## Quick Start
//!
//! ```bash
//! # Every year on 15 April
//! yw add "Clean the gutters" --month 4 --day 15
//!
//! # Last Friday of every month
//! yw add "Empty the freezer" --weekday 4 --week-rank last --recurrence monthly
//!
//! # Every quarter on the 10th, starting in February
//! yw add "VAT return" --month 2 --day 10 --recurrence quarterly
//!
//! # Some time in autumn
//! yw add "Plant bulbs" --season autumn
//!
//! # What happens this month?
//! yw calendar
//! yw list --month 11
//!
//! # Tick something off, or browse interactively
//! yw done "VAT return"
//! yw ui
//! ```
//!
//! Data is stored in `~/.yearwheel/tasks.json`; `~/.yearwheel/config.toml` selects
//! the label language and calendar display options. Set `RUST_LOG=debug` for logs.

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use yearwheel::cli::Cli;
use yearwheel::cmd::*;
use yearwheel::config::{data_dir, Config, TASKS_FILE};
use yearwheel::db::Database;
use yearwheel::Result;

fn main() {
    // Tracing is opt-in via RUST_LOG; invalid filters are ignored.
    let filter = std::env::var("RUST_LOG")
        .ok()
        .and_then(|raw| {
            let raw = raw.trim();
            if raw.is_empty() {
                return None;
            }
            EnvFilter::try_new(raw).ok()
        })
        .unwrap_or_else(|| EnvFilter::new("off"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        eprintln!("Error: {err}");
        std::process::exit(err.exit_code());
    }
}

fn run(cli: Cli) -> Result<()> {
    // Completions need neither the task file nor the config.
    if let Commands::Completions { shell } = cli.command {
        cmd_completions(shell);
        return Ok(());
    }

    let dir = data_dir(cli.db.as_deref());
    let db_path = cli.db.clone().unwrap_or_else(|| dir.join(TASKS_FILE));
    let config = Config::load_from_dir(&dir)?;
    let ctx = Context {
        db_path: &db_path,
        config: &config,
        locale: cli.locale.unwrap_or(config.locale),
        today: local_today(),
    };

    if let Commands::Ui = cli.command {
        return cmd_ui(&ctx);
    }

    let mut db = Database::load(&db_path)?;

    match cli.command {
        Commands::Ui => unreachable!("UI command handled above"),
        Commands::Completions { .. } => unreachable!("Completions handled above"),

        Commands::Add { name, rule } => cmd_add(&mut db, &ctx, name, rule),

        Commands::Edit { id, name, rule, clear_month, clear_day, clear_weekday, clear_season } =>
            cmd_edit(&mut db, &ctx, id, name, rule, clear_month, clear_day, clear_weekday, clear_season),

        Commands::List { month, year } => cmd_list(&db, &ctx, month, year),

        Commands::Season { season } => cmd_season(&db, &ctx, season),

        Commands::Calendar { year, month } => cmd_calendar(&db, &ctx, year, month),

        Commands::View { id } => cmd_view(&db, &ctx, id),

        Commands::Delete { id } => cmd_delete(&mut db, &ctx, id),

        Commands::Done { id, year, month, whole_year } =>
            cmd_done(&mut db, &ctx, id, year, month, whole_year),
    }
}
