use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "board-cycle")]
#[command(about = "Recurring-card automation for a day-cycle kanban board")]
pub struct Cli {
    #[arg(long, short, default_value = "board-cycle.toml")]
    pub config: PathBuf,

    #[arg(long, short, help = "Enable verbose output")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Resolve one ticked card.
    Resolve {
        card_id: String,
        #[arg(long, help = "Print the planned actions without applying them")]
        dry_run: bool,
    },
    /// Resolve every ticked card in the list at this index.
    ResolveTicked { slot: usize },
    /// Advance the board by one day.
    Rotate,
    /// Undo one day of rotation.
    Rewind,
    MergeNight,
    MoveFromFuture,
    SeparateNight,
    /// Print the list a card dated DATE (RFC 3339) belongs in.
    Locate {
        #[arg(value_parser = parse_date)]
        date: DateTime<Utc>,
    },
    /// Print the board's lists and their roles.
    Slots,
    /// Feed a saved webhook payload through the filter.
    Webhook {
        payload: PathBuf,
        #[arg(long, default_value = "POST")]
        method: String,
    },
    /// Run merge-night and rotate at their configured times.
    Watch,
}

fn parse_date(value: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(value)
        .map(|date| date.with_timezone(&Utc))
        .map_err(|e| format!("expected an RFC 3339 date: {}", e))
}
