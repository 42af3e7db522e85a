//! Word and character counting for strings and platform selections.
//!
//! Everything here is a pure function of its inputs.

use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::app::platform::{DocumentPosition, NodeKind, RawSelection, SelectionPlatform};

/// Letters and digits that make a whitespace-separated token count as a word.
///
/// ASCII plus extended Latin, Greek, Coptic, Cyrillic, Armenian, Hebrew, Syriac and Arabic.
static ALPHANUMERIC: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"[a-zA-Z0-9\x{00C0}-\x{00D6}\x{00D8}-\x{00F6}\x{00F8}-\x{00FF}\x{0100}-\x{024F}\x{0374}-\x{058F}\x{05D0}-\x{05F4}\x{0622}-\x{0669}\x{066E}-\x{06D3}\x{06D5}\x{06EE}-\x{06FF}\x{0710}-\x{072F}\x{074D}-\x{074F}\x{0750}-\x{077F}]",
    )
    .expect("alphanumeric class is a valid pattern")
});

/// Whitespace that separates words. Includes the byte order mark but not NEL (U+0085).
static WORD_SEPARATORS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"[\t\n\x0B\f\r \x{00A0}\x{1680}\x{2000}-\x{200A}\x{2028}\x{2029}\x{202F}\x{205F}\x{3000}\x{FEFF}]+",
    )
    .expect("separator class is a valid pattern")
});

static NEWLINE_RUNS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\n\r]+").expect("newline pattern is valid"));

static CONTROL_CHARACTERS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\x00-\x1f]").expect("control pattern is valid"));

/// Returns true if `s` contains at least one alphanumeric-class character.
pub fn contains_alphanumeric(s: &str) -> bool {
    ALPHANUMERIC.is_match(s)
}

/// Number of visible words in a string. Absent input counts as empty.
pub fn word_count_in_string<'a>(s: impl Into<Option<&'a str>>) -> usize {
    let Some(s) = s.into().filter(|s| !s.is_empty()) else {
        return 0;
    };

    let normalized = normalize(s);
    WORD_SEPARATORS
        .split(&normalized)
        .filter(|word| !word.is_empty() && contains_alphanumeric(word))
        .count()
}

/// Number of visible characters in a string. Absent input counts as empty.
pub fn character_count_in_string<'a>(s: impl Into<Option<&'a str>>) -> usize {
    let Some(s) = s.into().filter(|s| !s.is_empty()) else {
        return 0;
    };

    normalize(s).chars().count()
}

pub fn word_count_in_selection(selection: &RawSelection) -> usize {
    word_count_in_string(selection.text.as_str())
}

/// Number of characters in a selection, corrected at node boundaries.
///
/// The flattened text reported by browsers is not always faithful to the selected
/// range: a trailing space outside the range may be included, or a selected
/// leading space dropped. The endpoint offsets are used to compensate.
pub fn character_count_in_selection<P>(selection: &RawSelection, platform: &P) -> usize
where
    P: SelectionPlatform + ?Sized,
{
    let text = selection.text.as_str();
    let count = character_count_in_string(text);

    let anchor = selection.anchor;
    let focus = selection.focus;

    if platform.node_kind(focus.node) != Some(NodeKind::Text) {
        return count;
    }

    if anchor.node == focus.node {
        return focus.offset.abs_diff(anchor.offset);
    }

    let Some(focus_data) = platform.text_data(focus.node) else {
        return count;
    };

    match platform.compare_document_position(anchor.node, focus.node) {
        DocumentPosition::Following => {
            let Some(boundary) = focus
                .offset
                .checked_sub(1)
                .and_then(|index| focus_data.chars().nth(index))
            else {
                return count;
            };
            if text.chars().last() != Some(boundary) {
                count.saturating_sub(1)
            } else {
                count
            }
        }
        DocumentPosition::Preceding => {
            if let Some(leading) = focus_data.chars().nth(focus.offset)
                && text.chars().next() != Some(leading)
                && leading == ' '
            {
                count + 1
            } else {
                count
            }
        }
        DocumentPosition::Same | DocumentPosition::Disconnected => count,
    }
}

/// Collapse newline runs into a single space and drop control characters.
fn normalize(s: &str) -> Cow<'_, str> {
    match NEWLINE_RUNS.replace_all(s, " ") {
        Cow::Borrowed(unchanged) => CONTROL_CHARACTERS.replace_all(unchanged, ""),
        Cow::Owned(collapsed) => {
            Cow::Owned(CONTROL_CHARACTERS.replace_all(&collapsed, "").into_owned())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::app::platform::{Endpoint, NodeId};
    use crate::infra::document::Document;

    #[test]
    fn empty_and_absent_strings_have_no_words() {
        assert_eq!(word_count_in_string(""), 0);
        assert_eq!(word_count_in_string("   "), 0);
        assert_eq!(word_count_in_string(None), 0);
    }

    #[test]
    fn counts_whitespace_separated_words() {
        assert_eq!(word_count_in_string("hello world"), 2);
        assert_eq!(word_count_in_string("hello   world\n\nfoo"), 3);
        assert_eq!(word_count_in_string("  leading and trailing  "), 3);
    }

    #[test]
    fn drops_tokens_without_alphanumerics() {
        assert_eq!(word_count_in_string("123 !!! abc"), 2);
        assert_eq!(word_count_in_string("- -- ---"), 0);
        assert_eq!(word_count_in_string("(parenthesised) words."), 2);
    }

    #[test]
    fn counts_extended_scripts_as_words() {
        assert_eq!(word_count_in_string("café naïve"), 2);
        assert_eq!(word_count_in_string("привет мир"), 2);
        assert_eq!(word_count_in_string("שלום עולם"), 2);
        assert_eq!(word_count_in_string("αβγ"), 1);
    }

    #[test]
    fn control_characters_join_adjacent_text() {
        assert_eq!(word_count_in_string("tab\tjoined"), 1);
        assert_eq!(word_count_in_string("carriage\r\nreturn"), 2);
    }

    #[test]
    fn only_listed_separators_split_words() {
        assert_eq!(word_count_in_string("a\u{0085}b"), 1);
        assert_eq!(word_count_in_string("a\u{FEFF}b"), 2);
        assert_eq!(word_count_in_string("\u{00A0}one\u{3000}two\u{2028}"), 2);
        assert_eq!(word_count_in_string("\u{00A0}\u{202F}"), 0);
    }

    #[test]
    fn character_count_collapses_newlines_and_strips_controls() {
        assert_eq!(character_count_in_string("ab\ncd"), 5);
        assert_eq!(character_count_in_string("ab\r\n\r\ncd"), 5);
        assert_eq!(character_count_in_string("a\x01b"), 2);
        assert_eq!(character_count_in_string(""), 0);
        assert_eq!(character_count_in_string(None), 0);
        assert_eq!(character_count_in_string("naïve"), 5);
    }

    #[test]
    fn single_text_node_uses_offsets() {
        let mut doc = Document::new();
        let node = doc.push_text("the quick brown fox");
        doc.select(Endpoint::new(node, 2), Endpoint::new(node, 7))
            .unwrap();
        // Exaggerate the reported text to show it is ignored.
        doc.set_reported_text("e quick \n\n");
        let selection = doc.selection().unwrap().unwrap();

        assert_eq!(character_count_in_selection(&selection, &doc), 5);
    }

    #[test]
    fn backwards_single_node_selection_is_positive() {
        let mut doc = Document::new();
        let node = doc.push_text("backwards");
        doc.select(Endpoint::new(node, 8), Endpoint::new(node, 4))
            .unwrap();
        let selection = doc.selection().unwrap().unwrap();

        assert_eq!(character_count_in_selection(&selection, &doc), 4);
    }

    #[test]
    fn forward_selection_drops_stray_trailing_space() {
        let mut doc = Document::new();
        let first = doc.push_text("alpha ");
        let second = doc.push_text("beta gamma");
        doc.select(Endpoint::new(first, 0), Endpoint::new(second, 4))
            .unwrap();
        assert_eq!(doc.selection().unwrap().unwrap().text, "alpha beta");
        doc.set_reported_text("alpha beta ");
        let selection = doc.selection().unwrap().unwrap();

        assert_eq!(character_count_in_selection(&selection, &doc), 10);
    }

    #[test]
    fn forward_selection_matching_boundary_is_untouched() {
        let mut doc = Document::new();
        let first = doc.push_text("alpha ");
        let second = doc.push_text("beta gamma");
        doc.select(Endpoint::new(first, 0), Endpoint::new(second, 4))
            .unwrap();
        let selection = doc.selection().unwrap().unwrap();

        assert_eq!(character_count_in_selection(&selection, &doc), 10);
    }

    #[test]
    fn forward_selection_at_node_start_skips_correction() {
        let mut doc = Document::new();
        let first = doc.push_text("alpha ");
        let second = doc.push_text("beta");
        doc.select(Endpoint::new(first, 0), Endpoint::new(second, 0))
            .unwrap();
        let selection = doc.selection().unwrap().unwrap();

        assert_eq!(character_count_in_selection(&selection, &doc), 6);
    }

    #[test]
    fn backward_selection_restores_dropped_leading_space() {
        let mut doc = Document::new();
        let first = doc.push_text("one two");
        let second = doc.push_text("three");
        doc.select(Endpoint::new(second, 5), Endpoint::new(first, 3))
            .unwrap();
        assert_eq!(doc.selection().unwrap().unwrap().text, " twothree");
        doc.set_reported_text("twothree");
        let selection = doc.selection().unwrap().unwrap();

        assert_eq!(character_count_in_selection(&selection, &doc), 9);
    }

    #[test]
    fn backward_selection_with_faithful_text_is_untouched() {
        let mut doc = Document::new();
        let first = doc.push_text("one two");
        let second = doc.push_text("three");
        doc.select(Endpoint::new(second, 5), Endpoint::new(first, 3))
            .unwrap();
        let selection = doc.selection().unwrap().unwrap();

        assert_eq!(character_count_in_selection(&selection, &doc), 9);
    }

    #[test]
    fn backward_selection_keeps_count_when_focus_char_is_not_a_space() {
        let mut doc = Document::new();
        let first = doc.push_text("one two");
        let second = doc.push_text("three");
        doc.select(Endpoint::new(second, 5), Endpoint::new(first, 4))
            .unwrap();
        assert_eq!(doc.selection().unwrap().unwrap().text, "twothree");
        doc.set_reported_text("xtwothree");
        let selection = doc.selection().unwrap().unwrap();

        assert_eq!(character_count_in_selection(&selection, &doc), 9);
    }

    #[test]
    fn disconnected_anchor_uses_naive_count() {
        let mut doc = Document::new();
        doc.push_text("alpha ");
        let focus = doc.push_text("beta gamma");
        let selection = RawSelection {
            text: "alpha beta ".into(),
            anchor: Endpoint::new(NodeId(42), 0),
            focus: Endpoint::new(focus, 4),
            range_count: 1,
        };
        assert_eq!(
            doc.compare_document_position(selection.anchor.node, focus),
            DocumentPosition::Disconnected
        );

        assert_eq!(character_count_in_selection(&selection, &doc), 11);
    }

    #[test]
    fn element_focus_skips_corrections() {
        let mut doc = Document::new();
        let text = doc.push_text("words here");
        let element = doc.push_element();
        doc.select(Endpoint::new(text, 0), Endpoint::new(element, 0))
            .unwrap();
        doc.set_reported_text("words here ");
        let selection = doc.selection().unwrap().unwrap();

        assert_eq!(character_count_in_selection(&selection, &doc), 11);
        assert_eq!(word_count_in_selection(&selection), 2);
    }
}
