//! The resolution session: logical asset references to physical paths.
//!
//! A [`FileFinder`] owns everything one game installation needs to resolve
//! assets: the project's directory index, the session configuration, an
//! optional translation provider, and the shared-asset ([`RtpState`])
//! fallback. Lookups run three short-circuiting stages:
//!
//! 1. the active translation overlay (skipped when none is active),
//! 2. the project's own files,
//! 3. the configured runtime packages, with variant inference.
//!
//! "Not found" is the common, recoverable case and is reported as `None`,
//! never as an error; the caller substitutes a placeholder or skips.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, warn};

use crate::asset::{self, AssetKind};
use crate::config::{EngineVersion, FinderConfig};
use crate::diag::WarningKind;
use crate::index::{BuildMode, DirectoryIndex};
use crate::path::{self, PathRules};
use crate::rtp::discovery::CandidateSource;
use crate::rtp::state::RtpState;
use crate::rtp::table::RtpTable;
use crate::translation::TranslationProvider;

/// Errors raised while opening a session.
#[derive(Debug, Error)]
pub enum FinderError {
    /// The project root does not exist or is not a directory.
    #[error("project root {0} does not exist or is not a directory")]
    InvalidRoot(PathBuf),
}

/// A resolution session over one game installation.
pub struct FileFinder {
    project: Arc<DirectoryIndex>,
    rules: PathRules,
    engine: EngineVersion,
    translation: Option<Arc<dyn TranslationProvider>>,
    rtp: RtpState,
}

impl FileFinder {
    /// Open a session over `project_root`.
    ///
    /// Indexes the whole project recursively up front; the snapshot is
    /// reused for every lookup of the session.
    pub fn open(
        project_root: impl Into<PathBuf>,
        config: FinderConfig,
        table: Arc<RtpTable>,
    ) -> Result<Self, FinderError> {
        let root = project_root.into();
        let project = DirectoryIndex::build(&root, BuildMode::Recursive)
            .ok_or(FinderError::InvalidRoot(root))?;

        let rules = config.path_rules();
        let rtp = RtpState::new(table, config.engine, config.rtp);

        Ok(Self {
            project: Arc::new(project),
            rules,
            engine: config.engine,
            translation: None,
            rtp,
        })
    }

    /// The project's directory index.
    pub fn project(&self) -> &Arc<DirectoryIndex> {
        &self.project
    }

    /// The session's path rules.
    pub fn rules(&self) -> &PathRules {
        &self.rules
    }

    /// The session's engine generation.
    pub fn engine(&self) -> EngineVersion {
        self.engine
    }

    /// The shared-asset state (search paths, fingerprints, inference).
    pub fn rtp(&self) -> &RtpState {
        &self.rtp
    }

    /// Install a translation provider.
    pub fn set_translation(&mut self, provider: Arc<dyn TranslationProvider>) {
        self.translation = Some(provider);
    }

    /// Register one shared-asset installation directory.
    pub fn add_rtp_path(&mut self, path: &Path) -> bool {
        if self.rtp.disabled() {
            return false;
        }
        let rules = self.rules.clone();
        self.rtp.add_search_path(path, &rules)
    }

    /// Run shared-asset path discovery over the given sources.
    ///
    /// A no-op when shared-asset search is disabled.
    pub fn init_rtp_paths(&mut self, sources: &[Box<dyn CandidateSource>]) {
        if self.rtp.disabled() {
            return;
        }
        let rules = self.rules.clone();
        self.rtp.discover_search_paths(sources, &rules);
    }

    /// Resolve a logical asset reference.
    ///
    /// Extensions are tried in the given order; pass `&[""]` to look the
    /// name up verbatim. With `try_translate`, the active translation
    /// overlay is consulted first (a no-op when none is active).
    pub fn find(
        &self,
        directory: &str,
        name: &str,
        extensions: &[&str],
        try_translate: bool,
    ) -> Option<PathBuf> {
        if try_translate {
            if let Some(found) = self.find_translated(directory, name, extensions) {
                return Some(found);
            }
        }

        if let Some(found) = self
            .project
            .find_file(&self.rules, directory, name, extensions)
        {
            return Some(found);
        }

        let mut result = None;
        if !self.rtp.disabled() {
            let norm_dir = path::normalize(directory);
            let norm_name = path::normalize(name);
            let lookup = self.rtp.lookup(&self.rules, &norm_dir, &norm_name, extensions);

            // Audio installations vary too much to be trusted as evidence,
            // so they are exempt from the dependency-mismatch warnings.
            let is_audio = asset::is_audio_directory(&norm_dir);
            if lookup.is_rtp_asset && !is_audio {
                if lookup.path.is_some() && self.rtp.has_full_package_flag() {
                    if self
                        .rtp
                        .diagnostics()
                        .first(WarningKind::BrokenFullPackageGame)
                    {
                        warn!(
                            "this game claims it does not need the RTP, \
                             but actually uses files from it"
                        );
                    }
                } else if lookup.path.is_none() && !self.rtp.has_full_package_flag() {
                    if self.rtp.search_paths().is_empty() {
                        warn!(
                            directory,
                            name,
                            engine = %self.engine,
                            "cannot find RTP asset; install the RTP to resolve this warning"
                        );
                    } else {
                        warn!(
                            directory,
                            name,
                            engine = %self.engine,
                            "cannot find RTP asset; the RTP was probably not installed correctly"
                        );
                    }
                }
            }

            result = lookup.path;
        }

        if result.is_none() {
            debug!(directory, name, "cannot find asset");
        }

        result
    }

    /// Resolve against the translation overlay only.
    ///
    /// The overlay mirrors the asset layout under
    /// `<translation_root>/<id>/<directory>/<name>` inside the project.
    fn find_translated(
        &self,
        directory: &str,
        name: &str,
        extensions: &[&str],
    ) -> Option<PathBuf> {
        let provider = self.translation.as_ref()?;
        let id = provider.current_translation_id();
        if id.is_empty() {
            // No active translation: skip the stage, don't search.
            return None;
        }

        let overlay_dir = provider.translation_root();
        let overlay_name = path::join(&path::join(&id, directory), name);
        self.project
            .find_file(&self.rules, &overlay_dir, &overlay_name, extensions)
    }

    /// Resolve an asset using a kind's canonical extension list.
    ///
    /// Images consult the translation overlay; other kinds do not.
    pub fn find_asset(&self, kind: AssetKind, directory: &str, name: &str) -> Option<PathBuf> {
        self.find(directory, name, kind.extensions(), kind == AssetKind::Image)
    }

    /// Resolve a bitmap asset (translation-aware).
    pub fn find_image(&self, directory: &str, name: &str) -> Option<PathBuf> {
        self.find_asset(AssetKind::Image, directory, name)
    }

    /// Resolve a music track from the `Music` directory.
    pub fn find_music(&self, name: &str) -> Option<PathBuf> {
        self.find_asset(AssetKind::Music, "Music", name)
    }

    /// Resolve a sound effect from the `Sound` directory.
    pub fn find_sound(&self, name: &str) -> Option<PathBuf> {
        self.find_asset(AssetKind::Sound, "Sound", name)
    }

    /// Resolve a font from the `Font` directory.
    pub fn find_font(&self, name: &str) -> Option<PathBuf> {
        self.find_asset(AssetKind::Font, "Font", name)
    }

    /// Resolve a name verbatim (no extension list).
    pub fn find_default(&self, directory: &str, name: &str) -> Option<PathBuf> {
        self.find(directory, name, AssetKind::Default.extensions(), false)
    }

    /// Resolve a root-level name verbatim against the project only.
    pub fn find_default_root(&self, name: &str) -> Option<PathBuf> {
        self.project.find_default(&self.rules, name)
    }

    /// Build an index over a save directory.
    ///
    /// Save directories are flat; only files are captured. Returns `None`
    /// when the directory is missing.
    pub fn create_save_index(&self, save_path: &Path) -> Option<DirectoryIndex> {
        DirectoryIndex::build(save_path, BuildMode::Files)
    }

    /// Count the occupied savegame slots (`Save01.lsd` .. `Save15.lsd`).
    pub fn count_savegames(&self, save_index: &DirectoryIndex) -> usize {
        (1..=15)
            .filter(|slot| {
                let name = format!("Save{slot:02}.lsd");
                save_index.find_default(&self.rules, &name).is_some()
            })
            .count()
    }

    /// Whether the indexed directory is a project root (has both the
    /// database and the map tree file).
    pub fn is_project(index: &DirectoryIndex) -> bool {
        index.file("rpg_rt.ldb").is_some() && index.file("rpg_rt.lmt").is_some()
    }

    /// Strip the project root from a physical path.
    pub fn path_inside_project(&self, physical: &str) -> String {
        path::path_inside(&self.project.root().to_string_lossy(), physical)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rtp::table::test_tables::small_table;
    use crate::translation::FixedTranslation;
    use tempfile::TempDir;

    fn game_fixture() -> TempDir {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("RPG_RT.ldb"), b"db").unwrap();
        std::fs::write(dir.path().join("RPG_RT.lmt"), b"mt").unwrap();
        std::fs::create_dir(dir.path().join("Picture")).unwrap();
        std::fs::write(dir.path().join("Picture").join("Castle.png"), b"x").unwrap();
        std::fs::create_dir(dir.path().join("Music")).unwrap();
        std::fs::write(dir.path().join("Music").join("Title.ogg"), b"x").unwrap();
        // Translation overlay: Language/de/Picture/Castle.png
        std::fs::create_dir_all(dir.path().join("Language").join("de").join("Picture")).unwrap();
        std::fs::write(
            dir.path()
                .join("Language")
                .join("de")
                .join("Picture")
                .join("Castle.png"),
            b"de",
        )
        .unwrap();
        dir
    }

    fn open_finder(dir: &TempDir) -> FileFinder {
        FileFinder::open(
            dir.path(),
            FinderConfig::default(),
            Arc::new(small_table()),
        )
        .unwrap()
    }

    #[test]
    fn test_open_rejects_missing_root() {
        let dir = TempDir::new().unwrap();
        let result = FileFinder::open(
            dir.path().join("missing"),
            FinderConfig::default(),
            Arc::new(RtpTable::empty()),
        );
        assert!(matches!(result, Err(FinderError::InvalidRoot(_))));
    }

    #[test]
    fn test_find_music_skips_absent_formats() {
        let dir = game_fixture();
        let finder = open_finder(&dir);

        let found = finder.find_music("Title").unwrap();
        assert!(found.ends_with("Music/Title.ogg"));
    }

    #[test]
    fn test_find_misses_report_none() {
        let dir = game_fixture();
        let finder = open_finder(&dir);

        assert!(finder.find_music("Nothing").is_none());
        assert!(finder.find_image("Picture", "Nothing").is_none());
    }

    #[test]
    fn test_translation_takes_precedence() {
        let dir = game_fixture();
        let mut finder = open_finder(&dir);
        finder.set_translation(FixedTranslation::with_active("Language", "de"));

        let found = finder.find_image("Picture", "Castle").unwrap();
        assert!(found.ends_with("Language/de/Picture/Castle.png"));
    }

    #[test]
    fn test_empty_translation_id_skips_overlay() {
        let dir = game_fixture();
        let mut finder = open_finder(&dir);
        let provider = Arc::new(FixedTranslation::new("Language"));
        finder.set_translation(provider);

        let with_flag = finder.find_image("Picture", "Castle").unwrap();
        let without_flag = finder
            .find("Picture", "Castle", AssetKind::Image.extensions(), false)
            .unwrap();
        assert_eq!(with_flag, without_flag);
        assert!(with_flag.ends_with("Picture/Castle.png"));
        assert!(!with_flag.to_string_lossy().contains("Language"));
    }

    #[test]
    fn test_untranslated_assets_fall_through_overlay() {
        let dir = game_fixture();
        let mut finder = open_finder(&dir);
        finder.set_translation(FixedTranslation::with_active("Language", "de"));

        // Title music has no translated counterpart.
        let found = finder.find("Music", "Title", &[".ogg"], true).unwrap();
        assert!(found.ends_with("Music/Title.ogg"));
    }

    #[test]
    fn test_rtp_fallback_resolves_missing_project_assets() {
        let dir = game_fixture();

        let install = TempDir::new().unwrap();
        std::fs::create_dir(install.path().join("CharSet")).unwrap();
        std::fs::write(install.path().join("CharSet").join("Hero1.png"), b"x").unwrap();

        let mut finder = open_finder(&dir);
        assert!(finder.add_rtp_path(install.path()));

        let found = finder.find_image("CharSet", "Hero1").unwrap();
        assert!(found.starts_with(install.path()));

        // That single lookup identified the game's RTP.
        assert_eq!(
            finder.rtp().game_variant_candidates(),
            vec![crate::rtp::RtpVariant::Rpg2000OfficialEnglish]
        );
    }

    #[test]
    fn test_disabled_rtp_never_searches() {
        let dir = game_fixture();

        let install = TempDir::new().unwrap();
        std::fs::create_dir(install.path().join("CharSet")).unwrap();
        std::fs::write(install.path().join("CharSet").join("Hero1.png"), b"x").unwrap();

        let config = FinderConfig::default().with_rtp_disabled(true);
        let mut finder =
            FileFinder::open(dir.path(), config, Arc::new(small_table())).unwrap();

        assert!(!finder.add_rtp_path(install.path()));
        assert!(finder.find_image("CharSet", "Hero1").is_none());
        assert!(finder.rtp().game_variant_candidates().is_empty());
    }

    #[test]
    fn test_full_package_warning_fires_once() {
        let dir = game_fixture();

        let install = TempDir::new().unwrap();
        std::fs::create_dir(install.path().join("CharSet")).unwrap();
        std::fs::write(install.path().join("CharSet").join("Hero1.png"), b"x").unwrap();

        let config = FinderConfig::default().with_full_package_flag(true);
        let mut finder =
            FileFinder::open(dir.path(), config, Arc::new(small_table())).unwrap();
        finder.add_rtp_path(install.path());

        finder.find_image("CharSet", "Hero1");
        assert!(finder
            .rtp()
            .diagnostics()
            .has_fired(WarningKind::BrokenFullPackageGame));
    }

    #[test]
    fn test_savegames_and_project_detection() {
        let dir = game_fixture();
        let finder = open_finder(&dir);

        assert!(FileFinder::is_project(finder.project()));

        let saves = TempDir::new().unwrap();
        std::fs::write(saves.path().join("Save01.lsd"), b"x").unwrap();
        std::fs::write(saves.path().join("save07.LSD"), b"x").unwrap();
        std::fs::write(saves.path().join("unrelated.txt"), b"x").unwrap();

        let save_index = finder.create_save_index(saves.path()).unwrap();
        assert_eq!(finder.count_savegames(&save_index), 2);

        assert!(finder.create_save_index(&saves.path().join("missing")).is_none());
    }

    #[test]
    fn test_path_inside_project() {
        let dir = game_fixture();
        let finder = open_finder(&dir);

        let physical = finder.find_music("Title").unwrap();
        assert_eq!(
            finder.path_inside_project(&physical.to_string_lossy()),
            "Music/Title.ogg"
        );
    }
}
