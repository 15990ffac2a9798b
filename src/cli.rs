//! Command-line interface for tabtree.
//!
//! Each subcommand loads the store, reconciles it, issues at most one intent
//! write, then reconciles the echo and prints the resulting outline.

use crate::debug;
use crate::storage::FileStore;
use crate::tab::{TabId, TabTree};
use crate::tree_view;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::{Duration, Instant};
use tabtree_config::{Config, LogLevel};

/// tabtree - a persistent, nestable tree of tabs
#[derive(Parser)]
#[command(name = "tabtree")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Config file to use instead of ~/.config/tabtree/config.yaml
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Tab store to use instead of the configured one
    #[arg(long, value_name = "PATH", global = true)]
    pub store: Option<PathBuf>,

    /// Debug log level (off, error, warn, info, debug, trace)
    #[arg(long, value_name = "LEVEL", global = true, value_parser = parse_log_level)]
    pub log_level: Option<LogLevel>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the tab outline (default)
    List,

    /// Open a new tab
    Open {
        /// Open the tab under this parent instead of at the root
        #[arg(long, value_name = "ID")]
        parent: Option<TabId>,
    },

    /// Close a tab. Its children are left detached.
    Close {
        id: TabId,
    },

    /// Move a tab under another tab or to the root level
    Move {
        id: TabId,

        /// New parent tab
        #[arg(long, value_name = "ID", conflicts_with = "root", required_unless_present = "root")]
        parent: Option<TabId>,

        /// Move to the root level
        #[arg(long)]
        root: bool,
    },

    /// Expand or collapse a tab
    Toggle {
        id: TabId,
    },

    /// Remove every tab
    Clear,

    /// Print the outline again whenever the store changes
    Watch {
        /// Exit after the specified number of seconds
        #[arg(long, value_name = "SECONDS")]
        exit_after: Option<f64>,
    },
}

fn parse_log_level(value: &str) -> Result<LogLevel, String> {
    LogLevel::from_name(value).ok_or_else(|| format!("unknown log level '{}'", value))
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
}

/// Run the parsed command line.
pub fn run(cli: Cli) -> Result<()> {
    let config = load_config(cli.config.as_deref()).context("Failed to load config")?;
    debug::apply_config_log_level(config.log_level);

    let store_path = cli.store.clone().unwrap_or_else(|| config.store_path());
    log::info!("Using tab store {:?}", store_path);

    let command = cli.command.unwrap_or(Commands::List);
    if let Commands::Watch { exit_after } = command {
        return watch(&config, &store_path, exit_after);
    }

    let mut tree = TabTree::with_config(Box::new(FileStore::open(&store_path)), &config);
    tree.load()
        .with_context(|| format!("Failed to load tabs from {:?}", store_path))?;

    match command {
        Commands::List | Commands::Watch { .. } => {}
        Commands::Open { parent } => {
            if let Some(parent) = parent
                && tree.get(parent).is_none()
            {
                anyhow::bail!("Unknown parent tab {}", parent);
            }
            let id = tree
                .open_tab_under(parent)
                .context("Failed to write the new tab to the store")?;
            println!("Opened tab {}", id);
        }
        Commands::Close { id } => {
            tree.select(id)?;
            if tree.close_current_tab().is_some() {
                println!("Closed tab {}", id);
            }
        }
        Commands::Move { id, parent, root } => {
            let new_parent = if root { None } else { parent };
            tree.move_tab(id, new_parent)?;
        }
        Commands::Toggle { id } => {
            let expanded = tree.toggle_expanded(id)?;
            println!(
                "Tab {} {}",
                id,
                if expanded { "expanded" } else { "collapsed" }
            );
        }
        Commands::Clear => {
            tree.clear_all();
            println!("Cleared all tabs");
        }
    }

    tree.pump()?;
    print!("{}", tree_view::render(&tree));
    Ok(())
}

fn watch(config: &Config, store_path: &Path, exit_after: Option<f64>) -> Result<()> {
    let store = Rc::new(
        FileStore::open_watched(store_path, config.watch_debounce_ms)
            .with_context(|| format!("Failed to watch {:?}", store_path))?,
    );
    let mut tree = TabTree::with_config(Box::new(Rc::clone(&store)), config);
    tree.load()?;
    tree.drain_events();
    print!("{}", tree_view::render(&tree));

    let deadline = exit_after
        .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
        .map(|delay| Instant::now() + delay);
    loop {
        if deadline.is_some_and(|deadline| Instant::now() >= deadline) {
            break;
        }
        if refresh_on_change(&store, &mut tree, Duration::from_millis(250))? {
            for event in tree.drain_events() {
                println!("{:?}", event);
            }
            print!("{}", tree_view::render(&tree));
        }
    }
    Ok(())
}

/// Wait up to `timeout` for an external store change and reconcile it.
///
/// A store that cannot be read (for example a hand edit saved half way) is
/// logged and skipped; the next valid write is picked up normally.
fn refresh_on_change(store: &FileStore, tree: &mut TabTree, timeout: Duration) -> Result<bool> {
    match store.wait_for_change(timeout) {
        Ok(true) => {
            tree.pump()?;
            Ok(true)
        }
        Ok(false) => Ok(false),
        Err(e) => {
            log::warn!("Ignoring unreadable store {:?}: {}", store.path(), e);
            Ok(false)
        }
    }
}
