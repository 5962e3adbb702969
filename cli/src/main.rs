mod commands;
mod config;
mod logging;
mod tui;

use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use listo_core::{open_file_state, storage_usage};
use tracing::info;

use crate::config::Overrides;

#[derive(Parser)]
#[command(name = "listo")]
#[command(about = "A small personal todo list", long_about = None)]
struct Cli {
    /// Directory holding todos.json and the log file
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Add a new todo (usage: add Buy milk)
    Add {
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        text: Vec<String>,
    },
    /// List todos, pending first
    List,
    /// Mark a todo completed, or reopen it
    Toggle {
        /// Full id or a unique prefix
        id: String,
    },
    /// Replace the text of a todo
    Edit {
        id: String,
        #[arg(trailing_var_arg = true, allow_hyphen_values = true, required = true)]
        text: Vec<String>,
    },
    /// Delete a todo
    Rm {
        id: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Remove every completed todo
    ClearCompleted {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Show totals and progress
    Stats,
    /// Open the Terminal User Interface
    Tui,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let file_config = config::load_config()?;
    let overrides = Overrides {
        data_dir: cli.data_dir,
        log_level: cli.log_level,
    };
    let settings = config::resolve(file_config, overrides, |key| std::env::var(key).ok())?;

    logging::init_logging(&settings.log_level, &settings.data_dir)?;
    info!(data_dir = %settings.data_dir.display(), "starting listo");

    let mut state = open_file_state(&settings.data_dir).with_context(|| {
        format!(
            "Failed to open todo storage in {}",
            settings.data_dir.display()
        )
    })?;

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut out = io::stdout().lock();

    match cli.command {
        Some(Commands::Add { text }) => commands::add(&mut state, &text, &mut out),
        Some(Commands::List) => commands::list(&state, &mut out),
        Some(Commands::Toggle { id }) => commands::toggle(&mut state, &id, &mut out),
        Some(Commands::Edit { id, text }) => commands::edit(&mut state, &id, &text, &mut out),
        Some(Commands::Rm { id, yes }) => {
            commands::remove(&mut state, &id, yes, &mut input, &mut out)
        }
        Some(Commands::ClearCompleted { yes }) => {
            commands::clear_completed(&mut state, yes, &mut input, &mut out)
        }
        Some(Commands::Stats) => {
            let usage = storage_usage(state.repository().store().storage());
            commands::stats(&state, usage, &mut out)
        }
        Some(Commands::Tui) | None => {
            drop(out);
            tui::run(state)
        }
    }
}
