#![forbid(unsafe_code)]

//! Shared string constants and small text helpers used across the pipeline.

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// The empty string, returned when there is nothing to extract.
pub const EMPTY: &str = "";
/// Default word separator.
pub const SINGLE_SPACE: &str = " ";
/// Joins wrapped lines (and the nametag) in the final output.
pub const SINGLE_NEWLINE: &str = "\n";
pub const OPENING_PARENTHESIS: char = '(';
pub const CLOSING_PARENTHESIS: char = ')';

/// Build a regex alternation that matches any of `tokens` literally.
///
/// Longer tokens come first so a token that is a prefix of another never
/// wins the match. Empty tokens are skipped; `None` means nothing to match.
#[must_use]
pub fn alternation_of<S: AsRef<str>>(tokens: &[S]) -> Option<String> {
    let mut escaped: Vec<&str> = tokens
        .iter()
        .map(AsRef::as_ref)
        .filter(|t| !t.is_empty())
        .collect();
    if escaped.is_empty() {
        return None;
    }
    escaped.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
    escaped.dedup();

    let parts: Vec<String> = escaped.iter().map(|t| regex::escape(t)).collect();
    Some(parts.join("|"))
}

/// Display width of text in terminal cells.
///
/// ASCII printable text is measured by byte count; anything else goes through
/// grapheme segmentation so ZWJ sequences and combining marks count once.
#[inline]
#[must_use]
pub fn display_width(text: &str) -> usize {
    if text.bytes().all(|b| (0x20..0x7F).contains(&b)) {
        return text.len();
    }
    text.graphemes(true).map(grapheme_width).sum()
}

/// Display width of a single grapheme cluster.
#[inline]
#[must_use]
pub fn grapheme_width(grapheme: &str) -> usize {
    if grapheme.chars().all(char::is_control) {
        return 0;
    }
    // A cluster renders as one glyph; clamp so emoji sequences are not summed.
    UnicodeWidthStr::width(grapheme).min(2)
}
