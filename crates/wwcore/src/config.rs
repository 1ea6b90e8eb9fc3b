#![forbid(unsafe_code)]

//! Wrap configuration.
//!
//! A [`WrapConfig`] is an explicit value handed to [`WordWrapper::new`]; no
//! component reads ambient state. The defaults mirror what a dialogue author
//! gets out of the box: three nametag formats, three line-break markers, a
//! three-word line minimum and parenthesis alignment on.
//!
//! With the `serde` feature the config can be deserialized from whatever the
//! host stores its parameters in. Missing fields fall back to the defaults.
//!
//! [`WordWrapper::new`]: crate::WordWrapper::new

use crate::error::{Result, WrapError, compile};
use crate::primitives::SINGLE_SPACE;

/// Space reserved around the text area, in the measurer's units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Spacing {
    /// Width a mugshot occupies when one is shown.
    pub mugshot_width: usize,
    /// Gap between the mugshot and the text.
    pub mugshot_padding: usize,
    /// Padding applied on each side of the message box.
    pub side_padding: usize,
}

impl Spacing {
    /// No reserved space at all.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            mugshot_width: 0,
            mugshot_padding: 0,
            side_padding: 0,
        }
    }
}

impl Default for Spacing {
    fn default() -> Self {
        Self {
            mugshot_width: 144,
            mugshot_padding: 25,
            side_padding: 5,
        }
    }
}

/// Configuration shared by every stage of the wrap pipeline.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct WrapConfig {
    /// Regexes for speaker nametags. The first format that matches wins.
    pub nametag_formats: Vec<String>,
    /// Literal tokens that force a line break.
    pub line_break_markers: Vec<String>,
    /// Minimum words per line; 0 or 1 turns the rule off.
    pub line_min_word_count: usize,
    /// Indent the continuation lines of a parenthetical aside.
    pub parenthesis_alignment: bool,
    /// Split a word across lines when it cannot fit on a line by itself.
    pub split_words_between_lines: bool,
    pub word_separator: String,
    /// Append the separator after each word when building a line.
    pub include_word_separator: bool,
    /// Cache results per raw input.
    pub remember_results: bool,
    /// Regex for the tag that bypasses wrapping entirely.
    pub no_wrap_tag: String,
    /// Regex for the tag that suppresses nametag detection.
    pub disable_nametag_scan_tag: String,
    /// Regexes for color codes that must not open or close a line alone.
    pub color_tags: Vec<String>,
    /// Regexes for text the measurer treats as zero-width.
    pub empty_text: Vec<String>,
    /// Regexes for bold/italic toggles the measurer replaces with
    /// [`bold_italic_substitute`](Self::bold_italic_substitute).
    pub bold_italic_markers: Vec<String>,
    pub bold_italic_substitute: String,
    pub spacing: Spacing,
}

impl Default for WrapConfig {
    fn default() -> Self {
        Self {
            nametag_formats: vec![
                r"^[a-zA-Z ?!()\[\]<>/]+:".to_string(),
                r"^\[[a-zA-Z ?!()<>/]+\]:".to_string(),
                r"^\n<[a-zA-Z?!()\[\]<>/]+".to_string(),
            ],
            line_break_markers: vec![
                "<br>".to_string(),
                "<br2>".to_string(),
                "<line-break>".to_string(),
            ],
            line_min_word_count: 3,
            parenthesis_alignment: true,
            split_words_between_lines: false,
            word_separator: SINGLE_SPACE.to_string(),
            include_word_separator: true,
            remember_results: true,
            no_wrap_tag: r"(?i)\[\[NOWRAP\]\]".to_string(),
            disable_nametag_scan_tag: r"(?i)\[\[NONAMETAG\]\]".to_string(),
            color_tags: vec![r"(?i)\x1bC\[\d+\]".to_string()],
            empty_text: vec![
                r"\x1bC\[[0-9]+\]".to_string(),
                r"\$".to_string(),
                r".\x1b".to_string(),
            ],
            bold_italic_markers: vec![r"\x1bFB".to_string(), r"\x1bFI".to_string()],
            bold_italic_substitute: "AA".to_string(),
            spacing: Spacing::default(),
        }
    }
}

impl WrapConfig {
    /// Replace the nametag formats.
    #[must_use]
    pub fn with_nametag_formats<S: Into<String>>(
        mut self,
        formats: impl IntoIterator<Item = S>,
    ) -> Self {
        self.nametag_formats = formats.into_iter().map(Into::into).collect();
        self
    }

    /// Replace the line-break markers.
    #[must_use]
    pub fn with_line_break_markers<S: Into<String>>(
        mut self,
        markers: impl IntoIterator<Item = S>,
    ) -> Self {
        self.line_break_markers = markers.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_line_min_word_count(mut self, count: usize) -> Self {
        self.line_min_word_count = count;
        self
    }

    #[must_use]
    pub fn with_parenthesis_alignment(mut self, enabled: bool) -> Self {
        self.parenthesis_alignment = enabled;
        self
    }

    #[must_use]
    pub fn with_split_words_between_lines(mut self, enabled: bool) -> Self {
        self.split_words_between_lines = enabled;
        self
    }

    #[must_use]
    pub fn with_word_separator(mut self, separator: impl Into<String>, include: bool) -> Self {
        self.word_separator = separator.into();
        self.include_word_separator = include;
        self
    }

    #[must_use]
    pub fn with_remember_results(mut self, remember: bool) -> Self {
        self.remember_results = remember;
        self
    }

    #[must_use]
    pub fn with_no_wrap_tag(mut self, pattern: impl Into<String>) -> Self {
        self.no_wrap_tag = pattern.into();
        self
    }

    #[must_use]
    pub fn with_disable_nametag_scan_tag(mut self, pattern: impl Into<String>) -> Self {
        self.disable_nametag_scan_tag = pattern.into();
        self
    }

    #[must_use]
    pub fn with_color_tags<S: Into<String>>(mut self, tags: impl IntoIterator<Item = S>) -> Self {
        self.color_tags = tags.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_empty_text<S: Into<String>>(
        mut self,
        patterns: impl IntoIterator<Item = S>,
    ) -> Self {
        self.empty_text = patterns.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_bold_italic<S: Into<String>>(
        mut self,
        markers: impl IntoIterator<Item = S>,
        substitute: impl Into<String>,
    ) -> Self {
        self.bold_italic_markers = markers.into_iter().map(Into::into).collect();
        self.bold_italic_substitute = substitute.into();
        self
    }

    #[must_use]
    pub fn with_spacing(mut self, spacing: Spacing) -> Self {
        self.spacing = spacing;
        self
    }

    /// Check that every field can be used by the pipeline.
    ///
    /// Compiles each pattern once; the components compile their own copies
    /// when they are built, so this is only needed for early reporting.
    pub fn validate(&self) -> Result<()> {
        if self.word_separator.is_empty() {
            return Err(WrapError::invalid_config("word separator must not be empty"));
        }
        if self.line_break_markers.iter().any(String::is_empty) {
            return Err(WrapError::invalid_config(
                "line-break markers must not be empty",
            ));
        }

        let patterns = self
            .nametag_formats
            .iter()
            .chain(&self.color_tags)
            .chain(&self.empty_text)
            .chain(&self.bold_italic_markers)
            .chain([&self.no_wrap_tag, &self.disable_nametag_scan_tag]);
        for pattern in patterns {
            compile(pattern)?;
        }
        Ok(())
    }

    /// Compile an optional single-pattern field; an empty pattern disables it.
    pub(crate) fn compile_optional(pattern: &str) -> Result<Option<regex::Regex>> {
        if pattern.is_empty() {
            Ok(None)
        } else {
            compile(pattern).map(Some)
        }
    }

    /// Compile a pattern list, dropping empty entries.
    pub(crate) fn compile_all(patterns: &[String]) -> Result<Vec<regex::Regex>> {
        patterns
            .iter()
            .filter(|p| !p.is_empty())
            .map(|p| compile(p))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        WrapConfig::default().validate().unwrap();
    }

    #[test]
    fn default_spacing_matches_message_box() {
        let spacing = Spacing::default();
        assert_eq!(spacing.mugshot_width, 144);
        assert_eq!(spacing.mugshot_padding, 25);
        assert_eq!(spacing.side_padding, 5);
    }

    #[test]
    fn empty_separator_is_rejected() {
        let config = WrapConfig::default().with_word_separator("", true);
        let error = config.validate().unwrap_err();
        assert!(matches!(error, WrapError::InvalidConfig { .. }));
    }

    #[test]
    fn empty_marker_is_rejected() {
        let config = WrapConfig::default().with_line_break_markers(["<br>", ""]);
        assert!(matches!(
            config.validate(),
            Err(WrapError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn broken_nametag_format_is_reported() {
        let config = WrapConfig::default().with_nametag_formats(["^(unclosed"]);
        match config.validate() {
            Err(WrapError::InvalidPattern { pattern, .. }) => assert_eq!(pattern, "^(unclosed"),
            other => panic!("expected InvalidPattern, got {other:?}"),
        }
    }

    #[test]
    fn default_nametag_formats_match_expected_shapes() {
        let config = WrapConfig::default();
        let formats = WrapConfig::compile_all(&config.nametag_formats).unwrap();
        assert_eq!(formats[0].find("Alice: hi").unwrap().as_str(), "Alice:");
        assert_eq!(formats[1].find("[Bob]: hi").unwrap().as_str(), "[Bob]:");
        assert_eq!(formats[2].find("\n<Carol> hi").unwrap().as_str(), "\n<Carol>");
    }

    #[test]
    fn empty_optional_pattern_disables_field() {
        assert!(WrapConfig::compile_optional("").unwrap().is_none());
        assert!(WrapConfig::compile_optional("x").unwrap().is_some());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn config_deserializes_with_defaults_for_missing_fields() {
        let config: WrapConfig =
            serde_json::from_str(r#"{"line_min_word_count": 2, "spacing": {"side_padding": 0}}"#)
                .unwrap();
        assert_eq!(config.line_min_word_count, 2);
        assert_eq!(config.spacing.side_padding, 0);
        assert_eq!(config.spacing.mugshot_width, 144);
        assert_eq!(config.line_break_markers, WrapConfig::default().line_break_markers);
    }
}
