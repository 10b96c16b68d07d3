//! @ai:module:intent Isolate the assertion diagnostic block from a pytest failure message
//! @ai:module:layer application
//! @ai:module:public_api ExcerptRules, extract_assertion_block, extract_assertion_block_with, preserve_indent
//! @ai:module:stateless true

use serde::{Deserialize, Serialize};

/// Prefix pytest puts in front of the assertion report line.
pub const ASSERTION_MARKER: &str = "E       AssertionError";

const NBSP: char = '\u{00A0}';

/// @ai:intent Tunables for excerpt extraction
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExcerptRules {
    pub assertion_marker: String,
    pub tab_width: usize,
}

impl Default for ExcerptRules {
    fn default() -> Self {
        Self {
            assertion_marker: ASSERTION_MARKER.to_string(),
            tab_width: 4,
        }
    }
}

/// @ai:intent Extract the assertion excerpt using the default pytest marker
/// @ai:effects pure
pub fn extract_assertion_block(failure_text: &str) -> String {
    extract_assertion_block_with(failure_text, &ExcerptRules::default())
}

/// @ai:intent Extract the minimal `E`-prefixed block that starts at the last assertion marker
/// @ai:post result is never empty unless the input is blank
/// @ai:post without a marker the whole trimmed text is returned
/// @ai:effects pure
/// @ai:edge_cases trailing blank lines after the block are kept, they are part of the run
pub fn extract_assertion_block_with(failure_text: &str, rules: &ExcerptRules) -> String {
    let lines: Vec<&str> = failure_text.split('\n').collect();

    let start = lines.iter().enumerate().rev().find_map(|(idx, line)| {
        tracing::trace!("scan {}: {}", idx, line);
        line.trim_start()
            .starts_with(rules.assertion_marker.as_str())
            .then_some(idx)
    });

    let Some(start) = start else {
        tracing::trace!("no assertion marker, using full failure text");
        return preserve_indent(failure_text.trim(), rules.tab_width);
    };

    let block: Vec<&str> = lines[start..]
        .iter()
        .enumerate()
        .take_while(|(offset, line)| {
            tracing::trace!("collect {}: {}", start + offset, line);
            line.trim_start().starts_with('E') || line.trim().is_empty()
        })
        .map(|(_, line)| *line)
        .collect();

    preserve_indent(&block.join("\n"), rules.tab_width)
}

/// @ai:intent Make leading indentation survive CI rendering that collapses plain spaces
/// @ai:post each leading space becomes one U+00A0, each leading tab becomes tab_width U+00A0
/// @ai:effects pure
pub fn preserve_indent(text: &str, tab_width: usize) -> String {
    text.split('\n')
        .map(|line| {
            let rest = line.trim_start_matches([' ', '\t']);
            let indent = &line[..line.len() - rest.len()];

            let mut out = String::with_capacity(line.len() + indent.len());
            for c in indent.chars() {
                match c {
                    '\t' => out.extend(std::iter::repeat(NBSP).take(tab_width)),
                    _ => out.push(NBSP),
                }
            }
            out.push_str(rest);
            out
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_single_assertion_line() {
        let text = "  def test_eq():\n>       assert 1 == 2\ntests/test_x.py:10: AssertionError\nE       AssertionError: assert 1 == 2";

        assert_eq!(
            extract_assertion_block(text),
            "E       AssertionError: assert 1 == 2"
        );
    }

    #[test]
    fn test_block_stops_at_first_non_e_line() {
        let text = "\
    def test_lists():
>       assert [1, 2] == [1, 3]
E       AssertionError: assert [1, 2] == [1, 3]
E         At index 1 diff: 2 != 3

E         Use -v to get more diff
tests/test_lists.py:4: AssertionError
E       trailing noise";

        assert_eq!(
            extract_assertion_block(text),
            "E       AssertionError: assert [1, 2] == [1, 3]\n\
             E         At index 1 diff: 2 != 3\n\
             \n\
             E         Use -v to get more diff"
        );
    }

    #[test]
    fn test_last_marker_is_used() {
        let text = "E       AssertionError: first\nother\nE       AssertionError: second\nE         detail";

        assert_eq!(
            extract_assertion_block(text),
            "E       AssertionError: second\nE         detail"
        );
    }

    #[test]
    fn test_indented_marker_line_is_found_and_indent_preserved() {
        let text = "header\n  E       AssertionError: x\n\tE   more";

        assert_eq!(
            extract_assertion_block(text),
            "\u{a0}\u{a0}E       AssertionError: x\n\u{a0}\u{a0}\u{a0}\u{a0}E   more"
        );
    }

    #[test]
    fn test_without_marker_returns_trimmed_text() {
        let text = "\n\nE   KeyError: 'db'\n  during setup\n\n";

        assert_eq!(
            extract_assertion_block(text),
            "E   KeyError: 'db'\n\u{a0}\u{a0}during setup"
        );
    }

    #[test]
    fn test_custom_marker() {
        let rules = ExcerptRules {
            assertion_marker: "E   ValueError".to_string(),
            tab_width: 2,
        };
        let text = "frame\nE   ValueError: bad\n\tE extra\nend";

        assert_eq!(
            extract_assertion_block_with(text, &rules),
            "E   ValueError: bad\n\u{a0}\u{a0}E extra"
        );
    }

    #[test]
    fn test_preserve_indent_only_touches_leading_whitespace() {
        assert_eq!(
            preserve_indent("  a  b\n\tc\td\n \t e\nf", 4),
            "\u{a0}\u{a0}a  b\n\u{a0}\u{a0}\u{a0}\u{a0}c\td\n\u{a0}\u{a0}\u{a0}\u{a0}\u{a0}\u{a0}e\nf"
        );
    }
}
