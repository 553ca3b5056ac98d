//! One-shot diagnostic bookkeeping.
//!
//! Several warnings are only useful the first time they fire (a game that
//! claims self-sufficiency but pulls shared assets does so on every lookup).
//! Instead of scattering ad hoc boolean flags, a small registry keyed by
//! warning kind records which diagnostics have already been emitted.

use std::collections::HashSet;

use parking_lot::Mutex;

/// The kinds of diagnostics emitted at most once per session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WarningKind {
    /// The candidate-variant set narrowed down to a single variant.
    GameRtpDetected,
    /// The game has the full-package flag set but resolved an asset from a
    /// shared-asset installation anyway.
    BrokenFullPackageGame,
    /// Lookup evidence contradicted every remaining candidate variant.
    NarrowingConflict,
}

/// Registry of already-emitted one-shot diagnostics.
#[derive(Debug, Default)]
pub struct WarnOnce {
    seen: Mutex<HashSet<WarningKind>>,
}

impl WarnOnce {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` exactly once per kind; callers emit on `true`.
    pub fn first(&self, kind: WarningKind) -> bool {
        self.seen.lock().insert(kind)
    }

    /// Whether a diagnostic of this kind has fired already.
    pub fn has_fired(&self, kind: WarningKind) -> bool {
        self.seen.lock().contains(&kind)
    }

    /// Forget all recorded diagnostics (session reset).
    pub fn reset(&self) {
        self.seen.lock().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_fires_once() {
        let warnings = WarnOnce::new();
        assert!(warnings.first(WarningKind::GameRtpDetected));
        assert!(!warnings.first(WarningKind::GameRtpDetected));
        assert!(warnings.has_fired(WarningKind::GameRtpDetected));
    }

    #[test]
    fn test_kinds_are_independent() {
        let warnings = WarnOnce::new();
        assert!(warnings.first(WarningKind::BrokenFullPackageGame));
        assert!(warnings.first(WarningKind::NarrowingConflict));
        assert!(!warnings.first(WarningKind::BrokenFullPackageGame));
    }

    #[test]
    fn test_reset_rearms() {
        let warnings = WarnOnce::new();
        assert!(warnings.first(WarningKind::NarrowingConflict));
        warnings.reset();
        assert!(warnings.first(WarningKind::NarrowingConflict));
    }
}
