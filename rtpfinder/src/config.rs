//! Session configuration.
//!
//! A [`FinderConfig`] carries everything a resolution session needs to know
//! about the game it serves: which engine generation the game targets, the
//! project's escape symbol, and how shared-asset (RTP) search should behave.

use std::fmt;

use crate::path::PathRules;

/// The engine generation a game was built for.
///
/// The generation gates which shared-asset variants can apply and which
/// environment variables are consulted during discovery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EngineVersion {
    Rpg2000,
    Rpg2003,
}

impl EngineVersion {
    /// The numeric form used in paths and messages (`2000` / `2003`).
    pub fn number(self) -> u32 {
        match self {
            EngineVersion::Rpg2000 => 2000,
            EngineVersion::Rpg2003 => 2003,
        }
    }

    /// Parse the numeric form.
    pub fn from_number(number: u32) -> Option<Self> {
        match number {
            2000 => Some(EngineVersion::Rpg2000),
            2003 => Some(EngineVersion::Rpg2003),
            _ => None,
        }
    }
}

impl fmt::Display for EngineVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.number())
    }
}

/// Shared-asset (RTP) behaviour switches.
#[derive(Debug, Clone, Default)]
pub struct RtpOptions {
    /// Disable shared-asset search entirely.
    pub disable_rtp: bool,

    /// The game declares itself self-contained (its installer shipped all
    /// assets). Shared-asset search still runs, but resolving an asset
    /// through it triggers a one-shot warning.
    pub game_has_full_package_flag: bool,
}

/// Configuration for a resolution session.
#[derive(Debug, Clone)]
pub struct FinderConfig {
    /// Engine generation of the game.
    pub engine: EngineVersion,

    /// The project's escape symbol (alternate path separator).
    pub escape_symbol: String,

    /// Shared-asset behaviour.
    pub rtp: RtpOptions,
}

impl Default for FinderConfig {
    fn default() -> Self {
        Self {
            engine: EngineVersion::Rpg2000,
            escape_symbol: "\\".to_string(),
            rtp: RtpOptions::default(),
        }
    }
}

impl FinderConfig {
    /// Config for a game of the given engine generation, defaults otherwise.
    pub fn new(engine: EngineVersion) -> Self {
        Self {
            engine,
            ..Self::default()
        }
    }

    /// Set the escape symbol.
    pub fn with_escape_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.escape_symbol = symbol.into();
        self
    }

    /// Enable or disable shared-asset search.
    pub fn with_rtp_disabled(mut self, disabled: bool) -> Self {
        self.rtp.disable_rtp = disabled;
        self
    }

    /// Mark the game as claiming to ship all of its assets.
    pub fn with_full_package_flag(mut self, flag: bool) -> Self {
        self.rtp.game_has_full_package_flag = flag;
        self
    }

    /// Path rules derived from this configuration.
    pub fn path_rules(&self) -> PathRules {
        PathRules::new(self.escape_symbol.clone())
    }
}
