#![forbid(unsafe_code)]

//! Whole-string normalization run before the text is split into lines.

use regex::Regex;

use crate::config::WrapConfig;
use crate::error::{Result, compile};
use crate::primitives::{SINGLE_NEWLINE, alternation_of};

use super::WrapRule;

/// Strips the tag that tells the nametag fetcher to leave the text alone.
///
/// The fetcher has already looked at the raw text by the time this runs; the
/// tag only has to disappear from what gets displayed.
#[derive(Debug, Clone)]
pub struct RemoveDisableNametagScanTags {
    tag: Option<Regex>,
}

impl RemoveDisableNametagScanTags {
    pub fn new(config: &WrapConfig) -> Result<Self> {
        Ok(Self {
            tag: WrapConfig::compile_optional(&config.disable_nametag_scan_tag)?,
        })
    }
}

impl WrapRule<String> for RemoveDisableNametagScanTags {
    fn name(&self) -> &'static str {
        "RemoveDisableNametagScanTags"
    }

    fn can_apply_to(&self, value: &String) -> bool {
        self.tag.as_ref().is_some_and(|tag| tag.is_match(value))
    }

    fn process_text(&self, value: String) -> Result<String> {
        match &self.tag {
            Some(tag) => Ok(tag.replace_all(&value, "").into_owned()),
            None => Ok(value),
        }
    }
}

/// Turns literal newlines into word separators, so line breaks come only from
/// the packer and from explicit markers.
#[derive(Debug, Clone)]
pub struct NewlinesToSeparators {
    separator: String,
}

impl NewlinesToSeparators {
    #[must_use]
    pub fn new(config: &WrapConfig) -> Self {
        Self {
            separator: config.word_separator.clone(),
        }
    }
}

impl WrapRule<String> for NewlinesToSeparators {
    fn name(&self) -> &'static str {
        "NewlinesToSeparators"
    }

    fn can_apply_to(&self, value: &String) -> bool {
        value.contains(SINGLE_NEWLINE) || value.contains('\r')
    }

    fn process_text(&self, value: String) -> Result<String> {
        Ok(value
            .replace("\r\n", SINGLE_NEWLINE)
            .replace(['\n', '\r'], &self.separator))
    }
}

/// Surrounds each line-break marker with separators so it splits out as a
/// word of its own: `"Yes.<br>No."` becomes `"Yes. <br> No."`.
#[derive(Debug, Clone)]
pub struct LineBreakMarkersAsWords {
    markers: Option<Regex>,
    separator: String,
}

impl LineBreakMarkersAsWords {
    pub fn new(config: &WrapConfig) -> Result<Self> {
        let markers = alternation_of(&config.line_break_markers)
            .map(|alt| compile(&alt))
            .transpose()?;
        Ok(Self {
            markers,
            separator: config.word_separator.clone(),
        })
    }
}

impl WrapRule<String> for LineBreakMarkersAsWords {
    fn name(&self) -> &'static str {
        "LineBreakMarkersAsWords"
    }

    fn can_apply_to(&self, value: &String) -> bool {
        self.markers.as_ref().is_some_and(|m| m.is_match(value))
    }

    fn process_text(&self, value: String) -> Result<String> {
        let Some(markers) = &self.markers else {
            return Ok(value);
        };
        let sep = self.separator.as_str();
        Ok(markers
            .replace_all(&value, |caps: &regex::Captures<'_>| {
                format!("{sep}{}{sep}", &caps[0])
            })
            .into_owned())
    }
}

/// Collapses runs of separators into one and trims both ends.
#[derive(Debug, Clone)]
pub struct WithoutExtraSpaces {
    runs: Regex,
    separator: String,
}

impl WithoutExtraSpaces {
    pub fn new(config: &WrapConfig) -> Result<Self> {
        let runs = compile(&format!("(?:{}){{2,}}", regex::escape(&config.word_separator)))?;
        Ok(Self {
            runs,
            separator: config.word_separator.clone(),
        })
    }

    fn needs_trim(&self, value: &str) -> bool {
        value.starts_with(self.separator.as_str())
            || value.ends_with(self.separator.as_str())
            || value.starts_with(char::is_whitespace)
            || value.ends_with(char::is_whitespace)
    }
}

impl WrapRule<String> for WithoutExtraSpaces {
    fn name(&self) -> &'static str {
        "WithoutExtraSpaces"
    }

    fn can_apply_to(&self, value: &String) -> bool {
        self.runs.is_match(value) || self.needs_trim(value)
    }

    fn process_text(&self, value: String) -> Result<String> {
        let collapsed = self.runs.replace_all(&value, self.separator.as_str());
        Ok(collapsed
            .trim_matches(|c: char| c.is_whitespace())
            .trim_start_matches(self.separator.as_str())
            .trim_end_matches(self.separator.as_str())
            .to_string())
    }
}

/// Glues color tags to a neighbouring word.
///
/// A tag standing alone as a word could be packed at the start of a line (or
/// left dangling at the end of one). A tag-only word is merged into the word
/// after it; a trailing tag, or one followed by a line-break marker, is merged
/// into the word before it instead.
#[derive(Debug, Clone)]
pub struct NoColorTagsAsFirstWords {
    tags: Vec<Regex>,
    markers: Vec<String>,
    separator: String,
}

impl NoColorTagsAsFirstWords {
    pub fn new(config: &WrapConfig) -> Result<Self> {
        Ok(Self {
            tags: WrapConfig::compile_all(&config.color_tags)?,
            markers: config.line_break_markers.clone(),
            separator: config.word_separator.clone(),
        })
    }

    /// Whether `word` consists of nothing but color tags.
    fn is_tag_only(&self, word: &str) -> bool {
        if word.is_empty() {
            return false;
        }
        let mut rest = word.to_string();
        for tag in &self.tags {
            rest = tag.replace_all(&rest, "").into_owned();
        }
        rest.is_empty()
    }

    fn is_marker(&self, word: &str) -> bool {
        self.markers.iter().any(|m| m == word)
    }
}

impl WrapRule<String> for NoColorTagsAsFirstWords {
    fn name(&self) -> &'static str {
        "NoColorTagsAsFirstWords"
    }

    fn can_apply_to(&self, value: &String) -> bool {
        self.tags.iter().any(|tag| tag.is_match(value))
    }

    fn process_text(&self, value: String) -> Result<String> {
        let mut words: Vec<String> = Vec::new();
        let mut pending_tags = String::new();

        for word in value.split(self.separator.as_str()) {
            if self.is_tag_only(word) {
                pending_tags.push_str(word);
                continue;
            }
            if !pending_tags.is_empty() {
                if word.is_empty() || self.is_marker(word) {
                    attach_to_last(&mut words, &mut pending_tags);
                } else {
                    let mut glued = std::mem::take(&mut pending_tags);
                    glued.push_str(word);
                    words.push(glued);
                    continue;
                }
            }
            words.push(word.to_string());
        }
        attach_to_last(&mut words, &mut pending_tags);

        Ok(words.join(&self.separator))
    }
}

/// Append pending tags to the last real word, or keep them as a word when
/// there is nothing to attach to.
fn attach_to_last(words: &mut Vec<String>, pending_tags: &mut String) {
    if pending_tags.is_empty() {
        return;
    }
    let tags = std::mem::take(pending_tags);
    match words.last_mut() {
        Some(last) if !last.is_empty() => last.push_str(&tags),
        _ => words.push(tags),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn apply<R: WrapRule<String>>(rule: &R, text: &str) -> String {
        let text = text.to_string();
        if rule.can_apply_to(&text) {
            rule.process_text(text).unwrap()
        } else {
            text
        }
    }

    #[test]
    fn disable_scan_tag_is_removed() {
        let rule = RemoveDisableNametagScanTags::new(&WrapConfig::default()).unwrap();
        assert_eq!(apply(&rule, "[[nonametag]]Note: hi"), "Note: hi");
        assert!(!rule.can_apply_to(&"Note: hi".to_string()));
    }

    #[test]
    fn empty_disable_tag_never_applies() {
        let config = WrapConfig::default().with_disable_nametag_scan_tag("");
        let rule = RemoveDisableNametagScanTags::new(&config).unwrap();
        assert!(!rule.can_apply_to(&"anything".to_string()));
    }

    #[test]
    fn newlines_become_separators() {
        let rule = NewlinesToSeparators::new(&WrapConfig::default());
        assert_eq!(apply(&rule, "one\ntwo\r\nthree"), "one two three");
        assert!(!rule.can_apply_to(&"flat".to_string()));
    }

    #[test]
    fn markers_become_words() {
        let rule = LineBreakMarkersAsWords::new(&WrapConfig::default()).unwrap();
        assert_eq!(apply(&rule, "Yes.<br>No."), "Yes. <br> No.");
        assert_eq!(apply(&rule, "a<br2>b"), "a <br2> b");
        assert_eq!(apply(&rule, "a<line-break>b"), "a <line-break> b");
    }

    #[test]
    fn no_markers_configured_never_applies() {
        let config = WrapConfig::default().with_line_break_markers(Vec::<String>::new());
        let rule = LineBreakMarkersAsWords::new(&config).unwrap();
        assert!(!rule.can_apply_to(&"a<br>b".to_string()));
    }

    #[test]
    fn extra_spaces_collapse_and_trim() {
        let rule = WithoutExtraSpaces::new(&WrapConfig::default()).unwrap();
        assert_eq!(apply(&rule, "  a   b  <br>  c "), "a b <br> c");
        assert!(!rule.can_apply_to(&"a b c".to_string()));
    }

    #[test]
    fn extra_separators_collapse_with_custom_separator() {
        let config = WrapConfig::default().with_word_separator("|", true);
        let rule = WithoutExtraSpaces::new(&config).unwrap();
        assert_eq!(apply(&rule, "|a|||b|"), "a|b");
    }

    #[test]
    fn color_tag_glues_to_next_word() {
        let rule = NoColorTagsAsFirstWords::new(&WrapConfig::default()).unwrap();
        assert_eq!(
            apply(&rule, "see the \u{1b}C[2] red \u{1b}C[0] door"),
            "see the \u{1b}C[2]red \u{1b}C[0]door"
        );
    }

    #[test]
    fn trailing_color_tag_glues_to_previous_word() {
        let rule = NoColorTagsAsFirstWords::new(&WrapConfig::default()).unwrap();
        assert_eq!(apply(&rule, "red \u{1b}C[0]"), "red\u{1b}C[0]");
    }

    #[test]
    fn color_tag_before_marker_stays_off_the_marker() {
        let rule = NoColorTagsAsFirstWords::new(&WrapConfig::default()).unwrap();
        assert_eq!(
            apply(&rule, "red \u{1b}C[0] <br> next"),
            "red\u{1b}C[0] <br> next"
        );
    }

    #[test]
    fn lone_color_tag_is_kept() {
        let rule = NoColorTagsAsFirstWords::new(&WrapConfig::default()).unwrap();
        assert_eq!(apply(&rule, "\u{1b}C[1]"), "\u{1b}C[1]");
    }

    #[test]
    fn stacked_color_tags_glue_together() {
        let rule = NoColorTagsAsFirstWords::new(&WrapConfig::default()).unwrap();
        assert_eq!(
            apply(&rule, "\u{1b}C[1] \u{1b}c[2] word"),
            "\u{1b}C[1]\u{1b}c[2]word"
        );
    }
}
