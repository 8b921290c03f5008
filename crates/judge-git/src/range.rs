//! Commit range resolution from CI environment variables
//!
//! Each CI system advertises the commits under test differently. The
//! resolver walks a fixed priority list over an explicit key/value map so
//! it never reads the process environment on its own.

use std::collections::HashMap;

/// Range used when no CI system provides one.
pub const DEFAULT_COMMIT_RANGE: &str = "origin/main...HEAD";

const TRAVIS_COMMIT_RANGE: &str = "TRAVIS_COMMIT_RANGE";
const CIRCLE_COMPARE_URL: &str = "CIRCLE_COMPARE_URL";
const GITHUB_BASE_COMMIT: &str = "GITHUB_BASE_COMMIT";

/// Where a [`CommitRange`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeSource {
    /// `TRAVIS_COMMIT_RANGE`, used verbatim
    Travis,
    /// Seventh `/`-separated field of `CIRCLE_COMPARE_URL`
    CircleCompareUrl,
    /// `GITHUB_BASE_COMMIT` joined with `...HEAD`
    GithubBaseCommit,
    /// [`DEFAULT_COMMIT_RANGE`]
    Default,
}

/// A revision range in git's `A...B`, `A..B` or single-revision syntax.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitRange {
    pub spec: String,
    pub source: RangeSource,
}

impl CommitRange {
    /// Pick the first available range in priority order.
    ///
    /// Empty values count as absent. A compare URL too short to carry a
    /// range is skipped and resolution falls through to the next source.
    pub fn resolve(env: &HashMap<String, String>) -> Self {
        let get = |key: &str| env.get(key).map(String::as_str).filter(|v| !v.is_empty());

        if let Some(range) = get(TRAVIS_COMMIT_RANGE) {
            return Self::new(range, RangeSource::Travis);
        }

        if let Some(url) = get(CIRCLE_COMPARE_URL)
            && let Some(range) = url.split('/').nth(6).filter(|s| !s.is_empty())
        {
            return Self::new(range, RangeSource::CircleCompareUrl);
        }

        if let Some(base) = get(GITHUB_BASE_COMMIT) {
            return Self::new(format!("{base}...HEAD"), RangeSource::GithubBaseCommit);
        }

        Self::new(DEFAULT_COMMIT_RANGE, RangeSource::Default)
    }

    /// Resolve against the current process environment.
    pub fn from_process_env() -> Self {
        Self::resolve(&std::env::vars().collect())
    }

    fn new(spec: impl Into<String>, source: RangeSource) -> Self {
        Self {
            spec: spec.into(),
            source,
        }
    }
}

impl std::fmt::Display for CommitRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.spec)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn empty_environment_uses_default() {
        let range = CommitRange::resolve(&HashMap::new());
        assert_eq!(range.spec, DEFAULT_COMMIT_RANGE);
        assert_eq!(range.source, RangeSource::Default);
    }

    #[test]
    fn travis_wins_over_everything() {
        let range = CommitRange::resolve(&env(&[
            ("TRAVIS_COMMIT_RANGE", "aaa...bbb"),
            ("CIRCLE_COMPARE_URL", "https://github.com/o/r/compare/ccc...ddd"),
            ("GITHUB_BASE_COMMIT", "eee"),
        ]));
        assert_eq!(range.spec, "aaa...bbb");
        assert_eq!(range.source, RangeSource::Travis);
    }

    #[test]
    fn circle_compare_url_fragment() {
        let range = CommitRange::resolve(&env(&[
            ("CIRCLE_COMPARE_URL", "https://github.com/o/r/compare/ccc...ddd"),
            ("GITHUB_BASE_COMMIT", "eee"),
        ]));
        assert_eq!(range.spec, "ccc...ddd");
        assert_eq!(range.source, RangeSource::CircleCompareUrl);
    }

    #[test]
    fn short_circle_url_falls_through() {
        let range = CommitRange::resolve(&env(&[
            ("CIRCLE_COMPARE_URL", "https://github.com/o"),
            ("GITHUB_BASE_COMMIT", "eee"),
        ]));
        assert_eq!(range.spec, "eee...HEAD");
        assert_eq!(range.source, RangeSource::GithubBaseCommit);
    }

    #[test]
    fn empty_values_are_ignored() {
        let range = CommitRange::resolve(&env(&[("TRAVIS_COMMIT_RANGE", "")]));
        assert_eq!(range.source, RangeSource::Default);
    }
}
