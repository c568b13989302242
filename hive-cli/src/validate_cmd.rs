//! Validate command - check a record action by action
//!
//! - Level 1: run() - orchestration
//! - Level 2: check_record()

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Args;

use hive_core::{GameRecord, ReplayError};

use crate::replay_cmd::load_record;

#[derive(Args)]
pub struct ValidateArgs {
    /// Game record JSON file
    #[arg(value_name = "FILE")]
    pub file: PathBuf,
}

/// Run validate command, failing on the first rejected action
pub fn run(args: ValidateArgs) -> Result<()> {
    let record = load_record(&args.file)?;

    match check_record(&record) {
        Ok(count) => {
            println!("{}: {} actions, all legal", args.file.display(), count);
            Ok(())
        }
        Err(err) => {
            tracing::warn!(index = err.index, action = %err.action, "rejected action");
            bail!("{}: {}", args.file.display(), err)
        }
    }
}

/// Number of legal actions, or the first rejection
fn check_record(record: &GameRecord) -> Result<usize, ReplayError> {
    record.replay().map(|game| game.history().len())
}
