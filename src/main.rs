//! browscap-cache - Inspect and edit a browscap JSON file cache
//!
//! browscap-cache provides:
//! - Versioned get/set/has/remove on logical keys
//! - Raw access to unversioned keys
//! - Data-version metadata lookup
//! - Entry listing and whole-cache flush

use anyhow::Result;
use clap::Parser;

mod cli;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli::init_tracing(cli.verbose);
    cli::run(cli)
}
