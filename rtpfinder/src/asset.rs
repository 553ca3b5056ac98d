//! Asset kinds and their canonical extension priority lists.
//!
//! Logical lookups never carry an extension; the engine decides which
//! physical formats are acceptable and in which order. The order matters:
//! the first extension whose file exists wins, which is how format
//! preference (modern codecs before legacy ones) is expressed.

/// The broad category of a requested asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetKind {
    /// Bitmap graphics (character sets, chipsets, pictures, ...).
    Image,
    /// Background music tracks.
    Music,
    /// Sound effects.
    Sound,
    /// Font files.
    Font,
    /// No extension is appended; the name is looked up verbatim.
    Default,
}

/// Empty extension, used for verbatim lookups.
const NO_EXTS: &[&str] = &[""];

const IMAGE_EXTS: &[&str] = &[".bmp", ".png", ".xyz"];

const MUSIC_EXTS: &[&str] = &[
    ".opus", ".oga", ".ogg", ".wav", ".mid", ".midi", ".mp3", ".wma",
];

const SOUND_EXTS: &[&str] = &[".opus", ".oga", ".ogg", ".wav", ".mp3", ".wma"];

const FONT_EXTS: &[&str] = &[".ttf", ".ttc", ".otf", ".fon"];

impl AssetKind {
    /// Accepted extensions for this kind, in priority order.
    pub fn extensions(self) -> &'static [&'static str] {
        match self {
            AssetKind::Image => IMAGE_EXTS,
            AssetKind::Music => MUSIC_EXTS,
            AssetKind::Sound => SOUND_EXTS,
            AssetKind::Font => FONT_EXTS,
            AssetKind::Default => NO_EXTS,
        }
    }
}

/// Classify a normalized directory name into an asset kind.
///
/// Used by fingerprinting to decide which extensions to try when probing a
/// shared-asset installation for a table entry.
pub fn kind_for_directory(normalized_dir: &str) -> AssetKind {
    match normalized_dir {
        "music" => AssetKind::Music,
        "sound" => AssetKind::Sound,
        "font" => AssetKind::Font,
        "backdrop" | "battle" | "battle2" | "battlecharset" | "battleweapon" | "charset"
        | "chipset" | "faceset" | "frame" | "gameover" | "monster" | "panorama" | "picture"
        | "system" | "system2" | "title" => AssetKind::Image,
        _ => AssetKind::Default,
    }
}

/// Whether a normalized directory holds audio.
///
/// Audio installations vary too much across shared-asset packages to be
/// reliable evidence, so missing-asset warnings are suppressed for them.
pub fn is_audio_directory(normalized_dir: &str) -> bool {
    normalized_dir == "music" || normalized_dir == "sound"
}
