//! Argument types shared by several commands.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, ValueEnum};
use rtpfinder::{EngineVersion, RtpTable};

use crate::error::CliError;

/// Engine generation selector.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum EngineArg {
    /// RPG Maker 2000
    #[value(name = "2000")]
    Rpg2000,
    /// RPG Maker 2003
    #[value(name = "2003")]
    Rpg2003,
}

impl From<EngineArg> for EngineVersion {
    fn from(arg: EngineArg) -> Self {
        match arg {
            EngineArg::Rpg2000 => EngineVersion::Rpg2000,
            EngineArg::Rpg2003 => EngineVersion::Rpg2003,
        }
    }
}

/// Table document selection, shared by RTP-aware commands.
#[derive(Debug, Args)]
pub struct TableArgs {
    /// Path to the JSON name-equivalence table
    #[arg(long, value_name = "FILE")]
    pub table: Option<PathBuf>,
}

impl TableArgs {
    /// Load the table, or an empty one when no document was given.
    pub fn load(&self) -> Result<Arc<RtpTable>, CliError> {
        match &self.table {
            Some(path) => Ok(Arc::new(RtpTable::from_json_file(path)?)),
            None => Ok(Arc::new(RtpTable::empty())),
        }
    }
}
