//! Rosterlab CLI — promotion runs and roster maintenance commands.
//!
//! Commands:
//! - `promote` — evaluate a game's roster and print the promotion summary
//! - `check` — list members with no recorded join date
//! - `join-date show|set` — inspect or record a member's join date
//! - `import` — merge a clan-members CSV export into the roster store
//! - `activity inactive|active|list` — maintain the inactivity lists

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::{NaiveDate, NaiveDateTime, Utc};
use clap::{Parser, Subcommand};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use rosterlab_runner::{
    import_file, run_promotions, ActivityRegistry, Game, GameSelection, RosterConfig,
    RosterStore,
};

/// Config file picked up from the working directory when `--config` is absent.
const DEFAULT_CONFIG_FILE: &str = "rosterlab.toml";

#[derive(Parser)]
#[command(name = "rosterlab", about = "Rosterlab CLI — clan roster promotions")]
struct Cli {
    /// Path to a TOML config file. Defaults to ./rosterlab.toml when present.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override the config's data directory.
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Log at debug level (RUST_LOG takes precedence).
    #[arg(long, short, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate a roster and print who gets promoted.
    Promote {
        /// osrs or rs3.
        game: Game,

        /// Evaluate as of this date (YYYY-MM-DD) instead of now.
        #[arg(long)]
        at: Option<NaiveDate>,
    },
    /// List members without a recorded join date.
    Check {
        game: Game,
    },
    /// Inspect or record join dates.
    JoinDate {
        #[command(subcommand)]
        action: JoinDateAction,
    },
    /// Merge a clan-members CSV export (name,rank,xp,kills) into the roster.
    Import {
        game: Game,
        file: PathBuf,
    },
    /// Maintain the inactivity lists.
    Activity {
        #[command(subcommand)]
        action: ActivityAction,
    },
}

#[derive(Subcommand)]
enum JoinDateAction {
    /// Print a member's stored join date.
    Show { game: Game, member: String },
    /// Record a member's join date (MM/DD/YYYY).
    Set {
        game: Game,
        member: String,
        date: String,
    },
}

#[derive(Subcommand)]
enum ActivityAction {
    /// Mark a member inactive.
    Inactive {
        #[arg(long)]
        user_id: String,
        /// Display name to record. Defaults to "Unknown (<id>)".
        #[arg(long)]
        name: Option<String>,
        /// osrs, rs3 or both.
        #[arg(long)]
        game: GameSelection,
    },
    /// Mark a member active again.
    Active {
        #[arg(long)]
        user_id: String,
        #[arg(long)]
        game: GameSelection,
    },
    /// Show the inactivity list.
    List {
        #[arg(long)]
        game: GameSelection,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| filter.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .without_time()
                .with_writer(std::io::stderr),
        )
        .init();

    let config = load_config(cli.config.as_deref(), cli.data_dir)?;
    tracing::debug!(data_dir = %config.data_dir.display(), "config loaded");

    match cli.command {
        Commands::Promote { game, at } => run_promote(&config, game, at),
        Commands::Check { game } => run_check(&config, game),
        Commands::JoinDate { action } => match action {
            JoinDateAction::Show { game, member } => {
                let store = RosterStore::new(config.roster_path(game));
                println!("{member}: {}", store.join_date(&member)?);
                Ok(())
            }
            JoinDateAction::Set { game, member, date } => {
                let store = RosterStore::new(config.roster_path(game));
                let stored = store.set_join_date(&member, &date)?;
                println!("Updated join date for {member} to {stored}.");
                Ok(())
            }
        },
        Commands::Import { game, file } => run_import(&config, game, &file),
        Commands::Activity { action } => run_activity(&config, action),
    }
}

fn load_config(path: Option<&Path>, data_dir: Option<PathBuf>) -> Result<RosterConfig> {
    let mut config = match path {
        Some(path) => RosterConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
            RosterConfig::from_file(Path::new(DEFAULT_CONFIG_FILE))?
        }
        None => RosterConfig::default(),
    };
    if let Some(dir) = data_dir {
        config.data_dir = dir;
    }
    Ok(config)
}

fn run_promote(config: &RosterConfig, game: Game, at: Option<NaiveDate>) -> Result<()> {
    let now: NaiveDateTime = match at {
        Some(date) => date.and_hms_opt(0, 0, 0).context("invalid --at date")?,
        None => Utc::now().naive_utc(),
    };

    let report = run_promotions(game, config, now)?;
    println!("{}", report.summary.human_or_default());
    if !report.summary.debug_trace.is_empty() {
        println!();
        println!("Debug trace:");
        println!("{}", report.summary.debug_trace);
    }
    println!();
    println!(
        "{} members evaluated, {} promoted, {} skipped (roster {})",
        report.member_count,
        report.promotions.len(),
        report.skipped.len(),
        &report.roster_hash[..12]
    );
    Ok(())
}

fn run_check(config: &RosterConfig, game: Game) -> Result<()> {
    let store = RosterStore::new(config.roster_path(game));
    let missing = store.members_without_join_date()?;
    if missing.is_empty() {
        println!("All {game} members have a join date.");
        return Ok(());
    }
    println!("{} {game} members without a join date:", missing.len());
    for name in missing {
        println!("  {name}");
    }
    Ok(())
}

fn run_import(config: &RosterConfig, game: Game, file: &Path) -> Result<()> {
    if !file.exists() {
        bail!("export file {} does not exist", file.display());
    }
    let store = RosterStore::new(config.roster_path(game));
    let summary = import_file(&store, file)?;

    println!(
        "Imported {game} roster: {} added, {} updated, {} removed.",
        summary.added.len(),
        summary.updated.len(),
        summary.removed.len()
    );
    for (label, names) in [
        ("Added", &summary.added),
        ("Updated", &summary.updated),
        ("Removed", &summary.removed),
    ] {
        if !names.is_empty() {
            println!("  {label}: {}", names.join(", "));
        }
    }
    Ok(())
}

fn run_activity(config: &RosterConfig, action: ActivityAction) -> Result<()> {
    let registry = ActivityRegistry::from_config(config);

    match action {
        ActivityAction::Inactive {
            user_id,
            name,
            game,
        } => {
            let now = Utc::now().naive_utc();
            let changed = registry.mark_inactive(game, &user_id, name.as_deref(), now)?;
            report_activity_change(&user_id, "inactive", &changed);
        }
        ActivityAction::Active { user_id, game } => {
            let changed = registry.mark_active(game, &user_id)?;
            report_activity_change(&user_id, "active", &changed);
        }
        ActivityAction::List { game } => {
            for &game in game.games() {
                let entries = registry.list(game)?;
                println!("{game}: {} inactive", entries.len());
                for entry in entries {
                    println!(
                        "  {} ({}) since {}",
                        entry.display_name, entry.user_id, entry.reported_at
                    );
                }
            }
        }
    }
    Ok(())
}

fn report_activity_change(user_id: &str, status: &str, changed: &[Game]) {
    if changed.is_empty() {
        println!("Status for {user_id} unchanged (already {status}).");
        return;
    }
    let games: Vec<String> = changed.iter().map(Game::to_string).collect();
    println!("Marked {user_id} as {status} for {}.", games.join(" and "));
}
