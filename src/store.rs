//! Caller-owned, append-only collection of resolution results.
//!
//! Records are addressed by position. Names are not unique (the same company
//! can be resolved twice), so selection never keys on the company name.

use std::ops::Range;

use crate::domain::ResolvedLogo;

/// Position of a record within a [`ResultStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize)]
#[serde(transparent)]
pub struct LogoPosition(pub usize);

impl From<usize> for LogoPosition {
    fn from(position: usize) -> Self {
        LogoPosition(position)
    }
}

impl std::ops::Deref for LogoPosition {
    type Target = usize;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl std::fmt::Display for LogoPosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Results accumulated across pipeline runs until explicitly cleared.
#[derive(Debug, Clone, Default)]
pub struct ResultStore {
    entries: Vec<ResolvedLogo>,
}

impl ResultStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one run's results, returning their positions.
    pub fn append(&mut self, logos: Vec<ResolvedLogo>) -> Range<usize> {
        let start = self.entries.len();
        self.entries.extend(logos);
        start..self.entries.len()
    }

    pub fn get(&self, position: LogoPosition) -> Option<&ResolvedLogo> {
        self.entries.get(position.0)
    }

    pub fn entries(&self) -> &[ResolvedLogo] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Records that carry a downloadable asset, with their positions.
    pub fn downloadable(&self) -> impl Iterator<Item = (LogoPosition, &ResolvedLogo)> {
        self.entries
            .iter()
            .enumerate()
            .filter(|(_, logo)| logo.is_resolved())
            .map(|(position, logo)| (LogoPosition(position), logo))
    }

    /// Resolve a selection to downloadable records.
    ///
    /// Failed records, unknown positions and repeated positions are skipped;
    /// the selection order is kept.
    pub fn select(&self, positions: &[LogoPosition]) -> Vec<(LogoPosition, &ResolvedLogo)> {
        let mut seen = std::collections::HashSet::new();
        positions
            .iter()
            .filter(|position| seen.insert(**position))
            .filter_map(|position| self.get(*position).map(|logo| (*position, logo)))
            .filter(|(_, logo)| logo.is_resolved())
            .collect()
    }

    /// Every downloadable position, for "select all".
    pub fn select_all(&self) -> Vec<LogoPosition> {
        self.downloadable().map(|(position, _)| position).collect()
    }

    /// Names of companies whose logos were flagged as predominantly white.
    pub fn white_logo_companies(&self) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|logo| logo.is_white())
            .map(|logo| logo.company_name())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AssetFormat, LogoAsset};

    fn ok(name: &str, white: bool) -> ResolvedLogo {
        ResolvedLogo::resolved(
            name,
            LogoAsset {
                format: AssetFormat::Png,
                url: format!("https://x/{}.png", name),
            },
            vec![0],
            white,
        )
    }

    #[test]
    fn test_append_returns_positions() {
        let mut store = ResultStore::new();
        assert_eq!(store.append(vec![ok("Acme", false), ok("Acme", true)]), 0..2);
        assert_eq!(store.append(vec![ResolvedLogo::failed("Globex", "x")]), 2..3);
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_select_skips_failed_unknown_and_repeated() {
        let mut store = ResultStore::new();
        store.append(vec![
            ok("Acme", false),
            ResolvedLogo::failed("Globex", "No brands found"),
            ok("Acme", false),
        ]);

        let selected = store.select(&[
            LogoPosition(2),
            LogoPosition(1),
            LogoPosition(9),
            LogoPosition(2),
            LogoPosition(0),
        ]);
        let positions: Vec<usize> = selected.iter().map(|(p, _)| **p).collect();
        assert_eq!(positions, vec![2, 0]);
    }

    #[test]
    fn test_select_all_and_white_companies() {
        let mut store = ResultStore::new();
        store.append(vec![
            ok("Acme", true),
            ResolvedLogo::failed("Globex", "x"),
            ok("Initech", false),
        ]);

        assert_eq!(store.select_all(), vec![LogoPosition(0), LogoPosition(2)]);
        assert_eq!(store.white_logo_companies(), vec!["Acme"]);
    }

    #[test]
    fn test_clear_empties_store() {
        let mut store = ResultStore::new();
        store.append(vec![ok("Acme", false)]);
        store.clear();
        assert!(store.is_empty());
        assert!(store.get(LogoPosition(0)).is_none());
    }
}
