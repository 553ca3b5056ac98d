//! Shared-asset (RTP) variants, lookup tables, discovery, and inference.
//!
//! Games built with the 2000/2003-era engines frequently depend on a
//! *runtime package*: a separately installed bundle of common assets the
//! game does not ship itself. Several incompatible variants of these
//! packages exist (official releases in different languages plus community
//! translations), each with its own file naming. A game never declares
//! which variant it was authored against, so this module infers it:
//!
//! - [`RtpVariant`] enumerates the known package families.
//! - [`table::RtpTable`] holds the externally supplied name tables that map
//!   a variant-independent asset key to each variant's physical name.
//! - [`discovery`] gathers candidate installation paths from the
//!   environment via pluggable [`discovery::CandidateSource`] strategies.
//! - [`state::RtpState`] owns the configured search paths, the fingerprints
//!   of what is installed, and the monotonically shrinking set of variants
//!   consistent with every lookup observed so far.

pub mod discovery;
pub mod state;
pub mod table;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::EngineVersion;

/// A known runtime-package family.
///
/// The Don Miguel *addon* is special: it augments the Don Miguel 2000
/// package but can coexist with any primary variant, so it must never be
/// inferred as *the* variant a game depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RtpVariant {
    Rpg2000OfficialJapanese,
    Rpg2000OfficialEnglish,
    Rpg2000DonMiguelEnglish,
    Rpg2000DonMiguelAddon,
    Rpg2003OfficialJapanese,
    Rpg2003OfficialEnglish,
    Rpg2003RpgAdvocateEnglish,
    Rpg2003VladRussian,
    Rpg2003RpgUniverseSpanishPortuguese,
    Rpg2003Korean,
}

impl RtpVariant {
    /// All known variants, in the stable order lookups report them.
    pub const ALL: [RtpVariant; 10] = [
        RtpVariant::Rpg2000OfficialJapanese,
        RtpVariant::Rpg2000OfficialEnglish,
        RtpVariant::Rpg2000DonMiguelEnglish,
        RtpVariant::Rpg2000DonMiguelAddon,
        RtpVariant::Rpg2003OfficialJapanese,
        RtpVariant::Rpg2003OfficialEnglish,
        RtpVariant::Rpg2003RpgAdvocateEnglish,
        RtpVariant::Rpg2003VladRussian,
        RtpVariant::Rpg2003RpgUniverseSpanishPortuguese,
        RtpVariant::Rpg2003Korean,
    ];

    /// Human-readable name, as shown in diagnostics.
    pub fn name(self) -> &'static str {
        match self {
            RtpVariant::Rpg2000OfficialJapanese => "Official Japanese (2000)",
            RtpVariant::Rpg2000OfficialEnglish => "Official English (2000)",
            RtpVariant::Rpg2000DonMiguelEnglish => "Don Miguel English (2000)",
            RtpVariant::Rpg2000DonMiguelAddon => "Don Miguel RTP Addon (2000)",
            RtpVariant::Rpg2003OfficialJapanese => "Official Japanese (2003)",
            RtpVariant::Rpg2003OfficialEnglish => "Official English (2003)",
            RtpVariant::Rpg2003RpgAdvocateEnglish => "RPG Advocate English (2003)",
            RtpVariant::Rpg2003VladRussian => "Vlad Russian (2003)",
            RtpVariant::Rpg2003RpgUniverseSpanishPortuguese => {
                "RPG Universe Spanish/Portuguese (2003)"
            }
            RtpVariant::Rpg2003Korean => "Korean Translation (2003)",
        }
    }

    /// Engine generation this package variant belongs to.
    pub fn engine(self) -> EngineVersion {
        match self {
            RtpVariant::Rpg2000OfficialJapanese
            | RtpVariant::Rpg2000OfficialEnglish
            | RtpVariant::Rpg2000DonMiguelEnglish
            | RtpVariant::Rpg2000DonMiguelAddon => EngineVersion::Rpg2000,
            _ => EngineVersion::Rpg2003,
        }
    }

    /// Whether this is the addon variant (never a primary candidate).
    pub fn is_addon(self) -> bool {
        self == RtpVariant::Rpg2000DonMiguelAddon
    }
}

impl fmt::Display for RtpVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
