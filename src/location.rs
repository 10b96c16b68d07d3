//! @ai:module:intent Recover the true failure location from traceback text
//! @ai:module:layer application
//! @ai:module:public_api LocationExtractor, PathProbe, FsProbe, FixedPaths
//! @ai:module:depends_on annotation
//! @ai:module:stateless true

use crate::annotation::Location;
use regex::Regex;
use std::collections::HashSet;
use std::path::Path;

/// Matches `<file>.py:<line>:` where the file token holds no whitespace or colon.
const FRAME_PATTERN: &str = r"([^\s:]+\.py):(\d+):";

/// @ai:intent Decide whether a path named in a traceback belongs to the checked-out tree
pub trait PathProbe {
    /// @ai:intent Check whether the path exists
    fn exists(&self, path: &str) -> bool;
}

/// @ai:intent Probe the real filesystem relative to the current working directory
/// @ai:effects fs:read
#[derive(Debug, Clone, Copy, Default)]
pub struct FsProbe;

impl PathProbe for FsProbe {
    fn exists(&self, path: &str) -> bool {
        Path::new(path).exists()
    }
}

/// @ai:intent Probe backed by a fixed set of paths
#[derive(Debug, Clone, Default)]
pub struct FixedPaths {
    paths: HashSet<String>,
}

impl FixedPaths {
    /// @ai:intent Create a probe that knows exactly the given paths
    pub fn new<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            paths: paths.into_iter().map(Into::into).collect(),
        }
    }
}

impl PathProbe for FixedPaths {
    fn exists(&self, path: &str) -> bool {
        self.paths.contains(path)
    }
}

impl<F> PathProbe for F
where
    F: Fn(&str) -> bool,
{
    fn exists(&self, path: &str) -> bool {
        self(path)
    }
}

/// @ai:intent Scan failure text for `file.py:N:` frames and pick the relevant one
pub struct LocationExtractor<P> {
    pattern: Regex,
    probe: P,
}

impl LocationExtractor<FsProbe> {
    /// @ai:intent Create an extractor that checks candidates against the working directory
    pub fn with_filesystem() -> Self {
        Self::new(FsProbe)
    }
}

impl<P: PathProbe> LocationExtractor<P> {
    /// @ai:intent Create an extractor with an injected path probe
    pub fn new(probe: P) -> Self {
        Self {
            pattern: Regex::new(FRAME_PATTERN).expect("Invalid regex"),
            probe,
        }
    }

    /// @ai:intent Resolve the failure location from traceback text
    /// @ai:pre failure_text is the trimmed failure message
    /// @ai:post a candidate is accepted only if its file equals test_file or the probe knows it
    /// @ai:post the last accepted candidate in text order wins
    /// @ai:effects fs:read (through the probe)
    /// @ai:edge_cases no frames in text -> None; test_file None -> only the probe decides
    ///
    /// Deeper frames come later in a traceback, so a frame inside a shared assertion
    /// helper wins over the test body that called it when both are accepted.
    pub fn extract(&self, failure_text: &str, test_file: Option<&str>) -> Option<Location> {
        self.pattern
            .captures_iter(failure_text)
            .filter_map(|caps| {
                let file = caps.get(1)?.as_str();
                let line = caps.get(2)?.as_str().parse::<usize>().ok()?;
                Some((file, line))
            })
            .filter(|(file, _)| test_file == Some(*file) || self.probe.exists(file))
            .last()
            .map(|(file, line)| Location::new(file, line))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_paths() -> LocationExtractor<FixedPaths> {
        LocationExtractor::new(FixedPaths::default())
    }

    #[test]
    fn test_matches_declared_test_file() {
        let text = "  def test_eq():\n>       assert 1 == 2\ntests/test_x.py:10: AssertionError\nE       AssertionError: assert 1 == 2";

        let loc = no_paths().extract(text, Some("tests/test_x.py"));

        assert_eq!(loc, Some(Location::new("tests/test_x.py", 10)));
    }

    #[test]
    fn test_last_accepted_candidate_wins() {
        let text = "tests/test_x.py:5: in test_a\n    helper()\ntests/test_x.py:22: in helper\n    assert False\ntests/test_x.py:23: AssertionError";

        let loc = no_paths().extract(text, Some("tests/test_x.py"));

        assert_eq!(loc, Some(Location::new("tests/test_x.py", 23)));
    }

    #[test]
    fn test_frames_outside_the_tree_are_ignored() {
        let text = "tests/test_x.py:8: in test_call\n    json.loads(x)\n/usr/lib/python3.12/json/__init__.py:346: in loads\n    return _default_decoder.decode(s)";

        let loc = no_paths().extract(text, Some("tests/test_x.py"));

        assert_eq!(loc, Some(Location::new("tests/test_x.py", 8)));
    }

    #[test]
    fn test_probe_accepts_other_repository_files() {
        let extractor = LocationExtractor::new(FixedPaths::new(["src/app/util.py"]));
        let text = "tests/test_x.py:8: in test_call\nsrc/app/util.py:41: ValueError";

        let loc = extractor.extract(text, Some("tests/test_x.py"));

        assert_eq!(loc, Some(Location::new("src/app/util.py", 41)));
    }

    #[test]
    fn test_without_test_file_only_probe_applies() {
        let text = "tests/test_x.py:10: AssertionError";

        assert_eq!(no_paths().extract(text, None), None);

        let extractor = LocationExtractor::new(|path: &str| path == "tests/test_x.py");
        assert_eq!(
            extractor.extract(text, None),
            Some(Location::new("tests/test_x.py", 10))
        );
    }

    #[test]
    fn test_no_frames_returns_none() {
        assert_eq!(no_paths().extract("AssertionError: nope", Some("t.py")), None);
        assert_eq!(no_paths().extract("", None), None);
    }

    #[test]
    fn test_frame_requires_trailing_colon() {
        let text = "see tests/test_x.py:10 for details";
        assert_eq!(no_paths().extract(text, Some("tests/test_x.py")), None);
    }

    #[test]
    fn test_file_token_must_match_exactly() {
        let text = "./tests/test_x.py:10: AssertionError";
        assert_eq!(no_paths().extract(text, Some("tests/test_x.py")), None);
    }

    #[test]
    fn test_filesystem_probe_accepts_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("helpers.py");
        std::fs::write(&file, "def helper():\n    pass\n").unwrap();
        let text = format!("{}:2: AssertionError", file.display());

        let loc = LocationExtractor::with_filesystem().extract(&text, None);

        assert_eq!(loc, Some(Location::new(file.display().to_string(), 2)));
    }
}
