use anyhow::Result;
use clap::Parser;
use tabtree::cli::{self, Cli};

fn main() -> Result<()> {
    // Parse CLI arguments first so --log-level is known before logging starts
    let cli = Cli::parse();

    // Initialize unified logging: routes all log::info!() etc. to the debug log file.
    // When RUST_LOG is set, also mirrors to stderr.
    // CLI --log-level flag takes highest precedence, then RUST_LOG, then config (applied later).
    tabtree::debug::init_log_bridge(cli.log_level);

    log::info!("Starting tabtree {}", tabtree::VERSION);

    let result = cli::run(cli);
    if let Err(ref e) = result {
        log::error!("tabtree exited with error: {e:#}");
    }
    result
}
