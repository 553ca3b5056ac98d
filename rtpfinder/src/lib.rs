//! rtpfinder - Game asset resolution with runtime-package inference
//!
//! This library resolves logical asset references ("the picture called
//! `Castle` in `Picture`") to physical files for RPG Maker 2000/2003 game
//! directories, independent of the filesystem's case sensitivity and path
//! separator conventions.
//!
//! # Overview
//!
//! Resolution runs over immutable directory snapshots and falls through
//! three stages:
//!
//! - **Translation overlay**: an active language pack mirrors the asset
//!   layout under `<root>/<id>/...` inside the project
//! - **Project files**: the game's own directory tree
//! - **Runtime packages (RTP)**: shared asset installations, consulted via
//!   a name-equivalence table that also drives *variant inference*, the
//!   monotonic narrowing of which package release the game was built
//!   against
//!
//! # Quick start
//!
//! ```no_run
//! use std::sync::Arc;
//! use rtpfinder::{FileFinder, FinderConfig, RtpTable};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let table = Arc::new(RtpTable::from_json_file("rtp_table.json".as_ref())?);
//! let mut finder = FileFinder::open("/games/quest", FinderConfig::default(), table)?;
//! finder.init_rtp_paths(&rtpfinder::rtp::discovery::default_sources());
//!
//! if let Some(path) = finder.find_music("Town") {
//!     println!("{}", path.display());
//! }
//! # Ok(())
//! # }
//! ```

pub mod asset;
pub mod config;
pub mod diag;
pub mod finder;
pub mod fsops;
pub mod index;
pub mod path;
pub mod rtp;
pub mod translation;

pub use asset::AssetKind;
pub use config::{EngineVersion, FinderConfig, RtpOptions};
pub use diag::{WarnOnce, WarningKind};
pub use finder::{FileFinder, FinderError};
pub use index::{BuildMode, DirectoryIndex};
pub use path::PathRules;
pub use rtp::state::{DetectedRtp, RtpLookup, RtpState};
pub use rtp::table::{RtpTable, TableData, TableError};
pub use rtp::RtpVariant;
pub use translation::{FixedTranslation, TranslationProvider};
