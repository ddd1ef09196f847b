pub mod capture;
pub mod heatmap;
pub mod range;
pub mod stats;

use std::path::PathBuf;

use anyhow::Result;
use capture::{
    process_backfill_command, process_hints_command, process_note_command,
    process_reprocess_command,
};
use clap::{Parser, Subcommand};
use heatmap::{process_heatmap_command, HeatmapCommand};
use stats::{process_stats_command, StatsCommand};
use tracing::level_filters::LevelFilter;

use crate::{
    storage::normalized::NormalizedLog,
    utils::{
        dir::resolve_application_path,
        logging::{enable_logging, CLI_PREFIX},
    },
};

#[derive(Parser, Debug)]
#[command(name = "HappyFruit", version, long_about = None)]
#[command(about = "Tag-based activity journal", long_about = None)]
struct Args {
    #[command(subcommand)]
    commands: Commands,
    #[arg(long, help = "Enable logging")]
    log: bool,
    #[arg(
        long,
        global = true,
        help = "Application directory. By default uses $XDG_STATE_HOME/happyfruit or $HOME/.local/state/happyfruit"
    )]
    dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
#[command(version, about, long_about = None)]
enum Commands {
    #[command(
        about = "Save a note. Use \"## category\", \"### action\", \"@ domain\", \"$reference$\" and “thoughts” to tag it"
    )]
    Note {
        #[arg(help = "Text of the note. Read from stdin when missing")]
        text: Option<String>,
    },
    #[command(about = "Add notes that happened sometime between two moments")]
    Backfill {
        #[arg(long, help = "Start of the range, \"2026-01-01 11:00\" or \"2026-01-01\"")]
        from: String,
        #[arg(
            long,
            help = "End of the range, \"2026-01-01 12:00\" or \"2026-01-01\" for the whole day"
        )]
        to: String,
        #[arg(required = true, help = "Notes to add, each gets its own random moment")]
        texts: Vec<String>,
    },
    #[command(about = "Parse the whole raw log again and rewrite the parsed records")]
    Reprocess {},
    #[command(about = "Display how often tags were used over time")]
    Heatmap {
        #[command(flatten)]
        command: HeatmapCommand,
    },
    #[command(about = "Display an overview, daily activity and recent thoughts")]
    Stats {
        #[command(flatten)]
        command: StatsCommand,
    },
    #[command(about = "Print tags used so far")]
    Hints {},
}

pub async fn run_cli() -> Result<()> {
    let args = Args::parse();
    let dir = resolve_application_path(args.dir)?;

    let logging_level = if args.log {
        Some(LevelFilter::TRACE)
    } else {
        None
    };
    enable_logging(CLI_PREFIX, &dir, logging_level, args.log)?;

    match args.commands {
        Commands::Note { text } => process_note_command(&dir, text).await,
        Commands::Backfill { from, to, texts } => {
            process_backfill_command(&dir, &from, &to, &texts).await
        }
        Commands::Reprocess {} => process_reprocess_command(&dir).await,
        Commands::Heatmap { command } => {
            process_heatmap_command(&NormalizedLog::new(&dir), command).await
        }
        Commands::Stats { command } => {
            process_stats_command(&NormalizedLog::new(&dir), command).await
        }
        Commands::Hints {} => process_hints_command(&dir).await,
    }
}
