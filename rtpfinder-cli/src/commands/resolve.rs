//! The `resolve` command: look one asset up the way the engine would.

use std::path::PathBuf;

use clap::Args;
use rtpfinder::rtp::discovery;
use rtpfinder::{FileFinder, FinderConfig};

use crate::commands::common::{EngineArg, TableArgs};
use crate::error::CliError;

/// Arguments of the `resolve` command.
#[derive(Debug, Args)]
pub struct ResolveArgs {
    /// Game project directory
    pub game: PathBuf,

    /// Asset directory inside the project (e.g. CharSet), or "" for the root
    pub directory: String,

    /// Asset name, without extension unless --ext is omitted
    pub name: String,

    /// Extensions to try, in priority order (e.g. --ext .png --ext .bmp)
    #[arg(long = "ext", value_name = "EXT")]
    pub extensions: Vec<String>,

    /// Additional RTP installation directories, highest priority first
    #[arg(long = "rtp-path", value_name = "DIR")]
    pub rtp_paths: Vec<PathBuf>,

    /// Also discover RTP installations from the environment
    #[arg(long)]
    pub discover: bool,

    /// Disable RTP fallback entirely
    #[arg(long)]
    pub no_rtp: bool,

    /// Treat the game as claiming to ship all of its assets
    #[arg(long)]
    pub full_package: bool,

    /// Engine generation of the game
    #[arg(long, value_enum, default_value = "2000")]
    pub engine: EngineArg,

    #[command(flatten)]
    pub table: TableArgs,
}

pub fn run(args: ResolveArgs) -> Result<(), CliError> {
    let config = FinderConfig::new(args.engine.into())
        .with_rtp_disabled(args.no_rtp)
        .with_full_package_flag(args.full_package);

    let mut finder = FileFinder::open(&args.game, config, args.table.load()?)?;
    for path in &args.rtp_paths {
        finder.add_rtp_path(path);
    }
    if args.discover {
        finder.init_rtp_paths(&discovery::default_sources());
    }

    let extensions: Vec<&str> = if args.extensions.is_empty() {
        vec![""]
    } else {
        args.extensions.iter().map(String::as_str).collect()
    };

    match finder.find(&args.directory, &args.name, &extensions, true) {
        Some(path) => {
            println!("{}", path.display());
            Ok(())
        }
        None => {
            eprintln!("{}/{}: no such asset", args.directory, args.name);
            Err(CliError::NotFound)
        }
    }
}
