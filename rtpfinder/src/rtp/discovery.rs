//! Discovery of candidate runtime-package installation directories.
//!
//! Where packages might be installed is inherently platform- and
//! deployment-specific: environment variables, XDG data directories,
//! distributor defaults, or (on other targets) registry keys and bridge
//! calls. The core stays platform-agnostic by consuming an ordered list of
//! [`CandidateSource`] strategies; each merely *suggests* directories, and
//! every suggestion is validated independently when it is registered.

use std::env;
use std::path::PathBuf;

use tracing::debug;

use crate::config::EngineVersion;
use crate::fsops;

/// A strategy that suggests candidate installation directories.
///
/// Sources are consulted in caller-established priority order; the paths
/// they return are concatenated and deduplicated, first occurrence winning.
pub trait CandidateSource: Send + Sync {
    fn candidate_paths(&self, engine: EngineVersion) -> Vec<PathBuf>;
}

/// Environment-variable discovery.
///
/// Consults the engine-specific variable (`RPG2K_RTP_PATH` for 2000 games,
/// `RPG2K3_RTP_PATH` for 2003 games) followed by the generic override
/// `RPG_RTP_PATH`. Each variable holds a platform-convention path list
/// (colon-separated on Unix, semicolon on Windows).
#[derive(Debug, Default)]
pub struct EnvPaths;

impl EnvPaths {
    fn split_list(value: &str) -> Vec<PathBuf> {
        env::split_paths(value)
            .filter(|p| !p.as_os_str().is_empty())
            .collect()
    }
}

impl CandidateSource for EnvPaths {
    fn candidate_paths(&self, engine: EngineVersion) -> Vec<PathBuf> {
        let version_var = match engine {
            EngineVersion::Rpg2000 => "RPG2K_RTP_PATH",
            EngineVersion::Rpg2003 => "RPG2K3_RTP_PATH",
        };

        let mut paths = Vec::new();
        if let Ok(value) = env::var(version_var) {
            paths.extend(Self::split_list(&value));
        }
        if let Ok(value) = env::var("RPG_RTP_PATH") {
            paths.extend(Self::split_list(&value));
        }
        paths
    }
}

/// XDG data-directory discovery.
///
/// Looks for `rtp/<version>` under the user data directory
/// (`XDG_DATA_HOME`, falling back to the platform's local data dir) and
/// under each entry of `XDG_DATA_DIRS` (falling back to
/// `/usr/local/share:/usr/share`). Only directories that actually exist
/// are suggested.
#[derive(Debug, Default)]
pub struct XdgDataPaths;

impl XdgDataPaths {
    fn data_home() -> Option<PathBuf> {
        match env::var("XDG_DATA_HOME") {
            Ok(value) if !value.is_empty() => Some(PathBuf::from(value)),
            _ => dirs::data_local_dir(),
        }
    }

    fn data_dirs() -> Vec<PathBuf> {
        match env::var("XDG_DATA_DIRS") {
            Ok(value) if !value.is_empty() => env::split_paths(&value)
                .filter(|p| !p.as_os_str().is_empty())
                .collect(),
            _ => vec![
                PathBuf::from("/usr/local/share"),
                PathBuf::from("/usr/share"),
            ],
        }
    }
}

impl CandidateSource for XdgDataPaths {
    fn candidate_paths(&self, engine: EngineVersion) -> Vec<PathBuf> {
        let suffix = format!("rtp/{}", engine.number());
        let mut paths = Vec::new();

        if let Some(home) = Self::data_home() {
            let candidate = home.join(&suffix);
            if fsops::exists(&candidate) {
                paths.push(candidate);
            }
        }

        for dir in Self::data_dirs() {
            let candidate = dir.join(&suffix);
            if fsops::exists(&candidate) {
                paths.push(candidate);
            }
        }

        paths
    }
}

/// A fixed list of directories, suggested as-is.
///
/// Used for distributor defaults and for paths supplied on a command line.
#[derive(Debug, Default)]
pub struct FixedPaths {
    paths: Vec<PathBuf>,
}

impl FixedPaths {
    pub fn new(paths: impl IntoIterator<Item = impl Into<PathBuf>>) -> Self {
        Self {
            paths: paths.into_iter().map(Into::into).collect(),
        }
    }
}

impl CandidateSource for FixedPaths {
    fn candidate_paths(&self, _engine: EngineVersion) -> Vec<PathBuf> {
        self.paths.clone()
    }
}

/// The default discovery chain: environment variables, then XDG data dirs.
pub fn default_sources() -> Vec<Box<dyn CandidateSource>> {
    vec![Box::new(EnvPaths), Box::new(XdgDataPaths)]
}

/// Concatenate all sources' suggestions and deduplicate them, keeping the
/// first occurrence of each path.
pub fn candidate_paths(
    sources: &[Box<dyn CandidateSource>],
    engine: EngineVersion,
) -> Vec<PathBuf> {
    let mut seen: Vec<PathBuf> = Vec::new();

    for source in sources {
        for path in source.candidate_paths(engine) {
            if seen.iter().any(|known| known == &path) {
                debug!(path = %path.display(), "skipping duplicate RTP candidate");
                continue;
            }
            seen.push(path);
        }
    }

    seen
}
