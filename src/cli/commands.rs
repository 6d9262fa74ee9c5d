use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};

use crate::clipboard::{CaptureEngine, ImageCrateResizer, SystemClipboard};
use crate::config::{ConfigProvider, ConfigStore};
use crate::error::HistoryError;
use crate::history::{HistoryHandler, HistoryStore, load, save_history};
use crate::scheduler::TokioScheduler;
use crate::utils::{get_config_path, get_history_path, preview_line};

const PREVIEW_CHARS: usize = 60;

#[derive(Parser)]
#[command(name = "clip-history")]
#[command(version = "0.1.0")]
#[command(about = "Keep a bounded history of clipboard snapshots", long_about = None)]
pub struct Cli {
    /// History file to use instead of the default location
    #[arg(long, global = true, value_name = "PATH")]
    pub history_file: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Record clipboard changes until interrupted with Ctrl-C
    Watch,
    /// Show the stored history, newest first
    List,
    /// Put a stored entry back on the clipboard
    Restore {
        /// Position in the history (0 is the newest)
        index: usize,
    },
    /// Delete every stored entry
    Clear,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    crate::logging::init(cli.verbose);

    let history_path = match &cli.history_file {
        Some(path) => path.clone(),
        None => get_history_path()?,
    };

    match &cli.command {
        Some(Commands::Watch) => watch(history_path)?,
        Some(Commands::List) => list(&history_path),
        Some(Commands::Restore { index }) => restore(&history_path, *index)?,
        Some(Commands::Clear) => clear(&history_path)?,
        None => {
            println!("Use --help for usage information");
        }
    }

    Ok(())
}

fn watch(history_path: PathBuf) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;

    runtime.block_on(async move {
        let config = ConfigStore::load(&get_config_path()?);
        let engine =
            CaptureEngine::new(Box::new(SystemClipboard::new()?), Box::new(ImageCrateResizer));
        let handler =
            HistoryHandler::new(engine, &config, Arc::new(TokioScheduler::current()), history_path);

        match config.current().poll_interval() {
            Some(interval) => println!(
                "Watching clipboard every {:?} ({} entries stored). Press Ctrl-C to stop.",
                interval,
                handler.len()
            ),
            None => println!("Polling is disabled in settings. Press Ctrl-C to exit."),
        }

        tokio::signal::ctrl_c().await.context("Failed to listen for Ctrl-C")?;
        handler.shutdown();
        println!("Saved {} entries to {}", handler.len(), handler.history_path().display());
        Ok::<(), anyhow::Error>(())
    })
}

fn list(history_path: &Path) {
    let entries = load(history_path);

    println!("Clipboard History");
    println!("=================");
    println!("History file: {}", history_path.display());
    println!("Total entries: {}", entries.len());

    for (index, entry) in entries.iter().enumerate() {
        let kind = if entry.is_file() { "file" } else { "text" };
        let source = match entry.source_application() {
            source if source.is_empty() => String::new(),
            source => format!("  ({})", preview_line(&source, 40)),
        };
        println!(
            "{:>4}  [{}] {}{}",
            index,
            kind,
            preview_line(entry.display_text(), PREVIEW_CHARS),
            source
        );
    }
}

fn restore(history_path: &Path, index: usize) -> Result<()> {
    let entries = load(history_path);
    // Check the index before touching the clipboard so a typo fails fast
    let entry =
        entries.get(index).ok_or(HistoryError::OutOfRange { index, len: entries.len() })?;

    let mut engine =
        CaptureEngine::new(Box::new(SystemClipboard::new()?), Box::new(ImageCrateResizer));
    engine.restore(entry);

    println!("Restored entry {}: {}", index, preview_line(entry.display_text(), PREVIEW_CHARS));
    Ok(())
}

fn clear(history_path: &Path) -> Result<()> {
    let mut store = HistoryStore::with_entries(load(history_path), usize::MAX);
    let removed = store.len();
    store.clear();
    save_history(history_path, &store)?;

    println!("Cleared {} entries", removed);
    Ok(())
}
