//! Shared-asset search state and variant inference.
//!
//! [`RtpState`] owns everything the resolver needs to fall back to installed
//! runtime packages: the configured search paths (each with an index and
//! fingerprint scores), and the live *candidate set*: the variants still
//! consistent with every asset lookup observed so far.
//!
//! The candidate set starts empty, meaning *unconstrained*, not "no
//! variant". The first asset known to any variant seeds it; every later
//! asset intersects it. It only ever shrinks. Once it holds a single
//! variant the game's package dependency is known and lookups translate
//! names deterministically.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::config::{EngineVersion, RtpOptions};
use crate::diag::{WarnOnce, WarningKind};
use crate::index::{BuildMode, DirectoryIndex};
use crate::path::PathRules;
use crate::rtp::discovery::{self, CandidateSource};
use crate::rtp::table::RtpTable;
use crate::rtp::RtpVariant;

/// One fingerprint retained for a search path: the variant, its score, and
/// a handle to the path's index.
#[derive(Debug, Clone)]
pub struct DetectedRtp {
    pub variant: RtpVariant,
    pub hits: usize,
    pub max: usize,
    pub index: Arc<DirectoryIndex>,
}

/// Result of a shared-asset lookup.
#[derive(Debug)]
pub struct RtpLookup {
    /// The resolved physical path, if any.
    pub path: Option<PathBuf>,
    /// Whether the requested key belongs to a runtime package at all
    /// (according to the table and the current candidate set).
    pub is_rtp_asset: bool,
}

#[derive(Debug, Default)]
struct Inference {
    /// Empty means unconstrained, never "known to use no variant".
    candidates: Vec<RtpVariant>,
    /// Evidence at some point contradicted every remaining candidate.
    conflict: bool,
}

/// Process-wide shared-asset search state for one session.
#[derive(Debug)]
pub struct RtpState {
    table: Arc<RtpTable>,
    engine: EngineVersion,
    options: RtpOptions,
    search_paths: Vec<Arc<DirectoryIndex>>,
    detected: Vec<DetectedRtp>,
    inference: Mutex<Inference>,
    diagnostics: WarnOnce,
}

impl RtpState {
    pub fn new(table: Arc<RtpTable>, engine: EngineVersion, options: RtpOptions) -> Self {
        if options.disable_rtp {
            debug!("RTP support is disabled");
        }
        Self {
            table,
            engine,
            options,
            search_paths: Vec::new(),
            detected: Vec::new(),
            inference: Mutex::new(Inference::default()),
            diagnostics: WarnOnce::new(),
        }
    }

    /// Whether shared-asset search is disabled for this session.
    pub fn disabled(&self) -> bool {
        self.options.disable_rtp
    }

    /// Whether the game claims to ship all of its assets.
    pub fn has_full_package_flag(&self) -> bool {
        self.options.game_has_full_package_flag
    }

    /// The session's one-shot diagnostic registry.
    pub fn diagnostics(&self) -> &WarnOnce {
        &self.diagnostics
    }

    /// The table this state consults.
    pub fn table(&self) -> &RtpTable {
        &self.table
    }

    /// Configured search paths, in priority order.
    pub fn search_paths(&self) -> &[Arc<DirectoryIndex>] {
        &self.search_paths
    }

    /// Retained fingerprints across all search paths.
    pub fn detected(&self) -> &[DetectedRtp] {
        &self.detected
    }

    /// Snapshot of the live candidate set (empty = unconstrained).
    pub fn game_variant_candidates(&self) -> Vec<RtpVariant> {
        self.inference.lock().candidates.clone()
    }

    /// Whether narrowing ever hit contradictory evidence.
    pub fn evidence_conflict(&self) -> bool {
        self.inference.lock().conflict
    }

    /// Register a shared-asset installation directory.
    ///
    /// The directory is indexed and fingerprinted against the table; only
    /// the best-scoring variant(s) seen so far for this path are retained
    /// (a non-strict running maximum, so ties all survive). Returns `false`
    /// when the path cannot be indexed, which merely drops the candidate.
    pub fn add_search_path(&mut self, path: &Path, rules: &PathRules) -> bool {
        let Some(index) = DirectoryIndex::build(path, BuildMode::Recursive) else {
            debug!(path = %path.display(), "RTP path is invalid, not adding");
            return false;
        };

        debug!(path = %path.display(), "adding RTP search path");
        let index = Arc::new(index);
        self.search_paths.push(Arc::clone(&index));

        let hit_info = self.table.detect(&index, rules, Some(self.engine));
        if hit_info.is_empty() {
            debug!(path = %path.display(), "the folder does not contain a known RTP");
        }

        // Keep only the best hits; a properly installed package usually
        // scores 100% and drowns out partial matches of its cousins.
        let mut best = 0.0f32;
        for hit in hit_info {
            let rate = hit.rate();
            if rate >= best {
                debug!(
                    variant = %hit.variant,
                    hits = hit.hits,
                    max = hit.max,
                    "detected RTP"
                );
                self.detected.push(DetectedRtp {
                    variant: hit.variant,
                    hits: hit.hits,
                    max: hit.max,
                    index: Arc::clone(&index),
                });
                best = rate;
            }
        }

        true
    }

    /// Gather candidate directories from the given sources and register
    /// each one, deduplicated in discovery order.
    pub fn discover_search_paths(&mut self, sources: &[Box<dyn CandidateSource>], rules: &PathRules) {
        for path in discovery::candidate_paths(sources, self.engine) {
            self.add_search_path(&path, rules);
        }
    }

    /// Fold one observed lookup into the candidate set and return a
    /// snapshot of it.
    ///
    /// The whole read-modify-write runs under one lock: narrowing is a
    /// read-then-shrink sequence that must not interleave.
    fn narrow(&self, directory: &str, name: &str) -> Vec<RtpVariant> {
        let mut inference = self.inference.lock();

        if inference.candidates.len() != 1 {
            let mut evidence = self.table.lookup_any_to_rtp(directory, name, self.engine);

            // The addon coexists with a primary package; it must never be
            // inferred as the game's package.
            evidence.retain(|variant| !variant.is_addon());

            // An asset unknown to every variant carries no evidence.
            if !evidence.is_empty() {
                if inference.candidates.is_empty() {
                    inference.candidates = evidence;
                } else {
                    let before = inference.candidates.len();
                    inference
                        .candidates
                        .retain(|variant| evidence.contains(variant));

                    if inference.candidates.is_empty() && before > 0 {
                        inference.conflict = true;
                        if self.diagnostics.first(WarningKind::NarrowingConflict) {
                            warn!(
                                directory,
                                name,
                                "asset evidence contradicts every known RTP variant; \
                                 falling back to direct search"
                            );
                        }
                    }
                }

                if inference.candidates.len() == 1
                    && self.diagnostics.first(WarningKind::GameRtpDetected)
                {
                    debug!(variant = %inference.candidates[0], "game uses RTP");
                }
            }
        }

        inference.candidates.clone()
    }

    /// Resolve `(directory, name)` against the configured runtime packages.
    ///
    /// Both arguments must already be normalized. Feeds the lookup into the
    /// candidate narrowing first, then searches each configured path with
    /// each candidate variant's name translated to the path's detected
    /// variant. Falls back to a literal direct search when unconstrained or
    /// when no translated name matched.
    pub fn lookup(
        &self,
        rules: &PathRules,
        directory: &str,
        name: &str,
        extensions: &[&str],
    ) -> RtpLookup {
        let candidates = self.narrow(directory, name);

        if candidates.is_empty() {
            // No variant has matched anything yet; the asset may still live
            // in a search path under its literal name.
            return RtpLookup {
                path: self.direct_search(rules, directory, name, extensions),
                is_rtp_asset: false,
            };
        }

        let mut is_rtp_asset = false;
        for detected in &self.detected {
            for candidate in &candidates {
                let (translated, belongs) = self.table.lookup_rtp_to_rtp(
                    directory,
                    name,
                    *candidate,
                    detected.variant,
                );
                is_rtp_asset |= belongs;

                if let Some(translated) = translated {
                    if let Some(found) =
                        detected
                            .index
                            .find_file(rules, directory, &translated, extensions)
                    {
                        return RtpLookup {
                            path: Some(found),
                            is_rtp_asset: true,
                        };
                    }
                }
            }
        }

        // Also count keys the candidates define under their own name, even
        // if no detected installation could translate them.
        is_rtp_asset |= candidates.iter().any(|candidate| {
            self.table
                .lookup_rtp_to_rtp(directory, name, *candidate, *candidate)
                .1
        });

        RtpLookup {
            path: self.direct_search(rules, directory, name, extensions),
            is_rtp_asset,
        }
    }

    /// Search every configured path for the literal requested name.
    fn direct_search(
        &self,
        rules: &PathRules,
        directory: &str,
        name: &str,
        extensions: &[&str],
    ) -> Option<PathBuf> {
        self.search_paths
            .iter()
            .find_map(|index| index.find_file(rules, directory, name, extensions))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rtp::table::test_tables::small_table;
    use crate::rtp::table::{CategoryData, EntryData, TableData};
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn state_with(table: RtpTable) -> RtpState {
        RtpState::new(
            Arc::new(table),
            EngineVersion::Rpg2000,
            RtpOptions::default(),
        )
    }

    #[test]
    fn test_candidates_start_unconstrained() {
        let state = state_with(small_table());
        assert!(state.game_variant_candidates().is_empty());
        assert!(!state.evidence_conflict());
    }

    #[test]
    fn test_first_evidence_seeds_candidates() {
        let state = state_with(small_table());
        let rules = PathRules::default();

        state.lookup(&rules, "charset", "hero1", &[".png"]);
        assert_eq!(
            state.game_variant_candidates(),
            vec![RtpVariant::Rpg2000OfficialEnglish]
        );
    }

    #[test]
    fn test_unknown_assets_carry_no_evidence() {
        let state = state_with(small_table());
        let rules = PathRules::default();

        state.lookup(&rules, "charset", "nobody", &[".png"]);
        assert!(state.game_variant_candidates().is_empty());

        // And they do not disturb an established constraint either.
        state.lookup(&rules, "charset", "主人公1", &[".png"]);
        let before = state.game_variant_candidates();
        state.lookup(&rules, "charset", "nobody", &[".png"]);
        assert_eq!(state.game_variant_candidates(), before);
    }

    /// Table where "Common" is defined by {jp, en} and "Solo" by {en} only.
    fn intersection_table() -> RtpTable {
        let mut shared = HashMap::new();
        shared.insert(RtpVariant::Rpg2000OfficialJapanese, "Common".to_string());
        shared.insert(RtpVariant::Rpg2000OfficialEnglish, "Common".to_string());
        let mut english_only = HashMap::new();
        english_only.insert(RtpVariant::Rpg2000OfficialEnglish, "Solo".to_string());
        RtpTable::from_data(TableData {
            categories: vec![CategoryData {
                directory: "Picture".to_string(),
                entries: vec![
                    EntryData { names: shared },
                    EntryData {
                        names: english_only,
                    },
                ],
            }],
        })
    }

    #[test]
    fn test_narrowing_intersects_in_any_order() {
        for order in [["common", "solo"], ["solo", "common"]] {
            let state = state_with(intersection_table());
            let rules = PathRules::default();
            for name in order {
                state.lookup(&rules, "picture", name, &[".png"]);
            }
            assert_eq!(
                state.game_variant_candidates(),
                vec![RtpVariant::Rpg2000OfficialEnglish]
            );
        }
    }

    #[test]
    fn test_addon_never_becomes_candidate() {
        let state = state_with(small_table());
        let rules = PathRules::default();

        // "extra1" is defined by the addon and the English variant.
        state.lookup(&rules, "charset", "extra1", &[".png"]);
        let candidates = state.game_variant_candidates();
        assert_eq!(candidates, vec![RtpVariant::Rpg2000OfficialEnglish]);
        assert!(!candidates.iter().any(|v| v.is_addon()));
    }

    #[test]
    fn test_singleton_never_grows_back() {
        let state = state_with(small_table());
        let rules = PathRules::default();

        state.lookup(&rules, "charset", "hero1", &[".png"]);
        assert_eq!(state.game_variant_candidates().len(), 1);

        // Evidence for a different variant arrives afterwards; the
        // singleton stays.
        state.lookup(&rules, "charset", "主人公1", &[".png"]);
        assert_eq!(
            state.game_variant_candidates(),
            vec![RtpVariant::Rpg2000OfficialEnglish]
        );
    }

    #[test]
    fn test_contradictory_evidence_is_flagged() {
        let mut shared = HashMap::new();
        shared.insert(RtpVariant::Rpg2000OfficialJapanese, "Both".to_string());
        shared.insert(RtpVariant::Rpg2000OfficialEnglish, "Both".to_string());
        let mut third_party = HashMap::new();
        third_party.insert(RtpVariant::Rpg2000DonMiguelEnglish, "Third".to_string());

        let table = RtpTable::from_data(TableData {
            categories: vec![CategoryData {
                directory: "Picture".to_string(),
                entries: vec![
                    EntryData { names: shared },
                    EntryData { names: third_party },
                ],
            }],
        });

        let state = state_with(table);
        let rules = PathRules::default();
        state.lookup(&rules, "picture", "both", &[".png"]); // seeds {jp, en}
        state.lookup(&rules, "picture", "third", &[".png"]); // intersects to {}

        assert!(state.game_variant_candidates().is_empty());
        assert!(state.evidence_conflict());
    }

    #[test]
    fn test_lookup_translates_and_finds() {
        // Installed package follows the Japanese naming; the game asks with
        // English names.
        let install = TempDir::new().unwrap();
        std::fs::create_dir(install.path().join("CharSet")).unwrap();
        std::fs::write(install.path().join("CharSet").join("主人公1.png"), b"x").unwrap();
        std::fs::create_dir(install.path().join("Music")).unwrap();
        std::fs::write(install.path().join("Music").join("町1.ogg"), b"x").unwrap();

        let mut state = state_with(small_table());
        let rules = PathRules::default();
        assert!(state.add_search_path(install.path(), &rules));

        // The installation fingerprints as the Japanese variant.
        assert!(state
            .detected()
            .iter()
            .any(|d| d.variant == RtpVariant::Rpg2000OfficialJapanese));

        let result = state.lookup(&rules, "charset", "hero1", &[".png"]);
        assert!(result.is_rtp_asset);
        let path = result.path.unwrap();
        assert!(path.ends_with("CharSet/主人公1.png"));

        // After that single lookup the game variant is known.
        assert_eq!(
            state.game_variant_candidates(),
            vec![RtpVariant::Rpg2000OfficialEnglish]
        );
    }

    #[test]
    fn test_lookup_falls_back_to_direct_search() {
        // An installation with a file no table knows about.
        let install = TempDir::new().unwrap();
        std::fs::create_dir(install.path().join("Picture")).unwrap();
        std::fs::write(install.path().join("Picture").join("Custom.png"), b"x").unwrap();

        let mut state = state_with(small_table());
        let rules = PathRules::default();
        state.add_search_path(install.path(), &rules);

        let result = state.lookup(&rules, "picture", "custom", &[".png"]);
        assert!(!result.is_rtp_asset);
        assert!(result.path.is_some());
    }

    #[test]
    fn test_missing_rtp_asset_reports_membership() {
        // No installations at all; the asset is still recognisably an RTP
        // asset once the candidate set contains its variant.
        let state = state_with(small_table());
        let rules = PathRules::default();

        let result = state.lookup(&rules, "charset", "hero1", &[".png"]);
        assert!(result.path.is_none());
        assert!(result.is_rtp_asset);
    }

    #[test]
    fn test_invalid_search_path_is_dropped() {
        let dir = TempDir::new().unwrap();
        let mut state = state_with(small_table());
        let rules = PathRules::default();

        assert!(!state.add_search_path(&dir.path().join("missing"), &rules));
        assert!(state.search_paths().is_empty());
    }

    #[test]
    fn test_fingerprint_running_maximum_keeps_ties() {
        // Two variants share every file name, so both score identically and
        // both must be retained.
        let mut twin = HashMap::new();
        twin.insert(RtpVariant::Rpg2000OfficialEnglish, "Twin".to_string());
        twin.insert(RtpVariant::Rpg2000DonMiguelEnglish, "Twin".to_string());
        let table = RtpTable::from_data(TableData {
            categories: vec![CategoryData {
                directory: "Picture".to_string(),
                entries: vec![EntryData { names: twin }],
            }],
        });

        let install = TempDir::new().unwrap();
        std::fs::create_dir(install.path().join("Picture")).unwrap();
        std::fs::write(install.path().join("Picture").join("Twin.png"), b"x").unwrap();

        let mut state = state_with(table);
        let rules = PathRules::default();
        state.add_search_path(install.path(), &rules);

        assert_eq!(state.detected().len(), 2);
    }
}
