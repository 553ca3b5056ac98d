//! The `scan` command: fingerprint a directory against the table.

use std::path::PathBuf;

use clap::Args;
use rtpfinder::{BuildMode, DirectoryIndex, PathRules};

use crate::commands::common::{EngineArg, TableArgs};
use crate::error::CliError;

/// Arguments of the `scan` command.
#[derive(Debug, Args)]
pub struct ScanArgs {
    /// Directory to fingerprint (an RTP installation candidate)
    pub path: PathBuf,

    /// Restrict matching to one engine generation
    #[arg(long, value_enum)]
    pub engine: Option<EngineArg>,

    #[command(flatten)]
    pub table: TableArgs,
}

pub fn run(args: ScanArgs) -> Result<(), CliError> {
    let table = args.table.load()?;
    if table.is_empty() {
        return Err(CliError::Usage(
            "scan needs a table document; pass --table".to_string(),
        ));
    }

    let index = DirectoryIndex::build(&args.path, BuildMode::Recursive).ok_or_else(|| {
        CliError::Usage(format!("{} is not a readable directory", args.path.display()))
    })?;

    let rules = PathRules::default();
    let hits = table.detect(&index, &rules, args.engine.map(Into::into));
    if hits.is_empty() {
        println!("no known RTP detected");
        return Ok(());
    }

    for hit in hits {
        println!(
            "{:40} {:>5}/{:<5} ({:.0}%)",
            hit.variant.to_string(),
            hit.hits,
            hit.max,
            hit.rate() * 100.0
        );
    }
    Ok(())
}
