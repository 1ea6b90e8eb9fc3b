#![forbid(unsafe_code)]

//! The "would this overflow" capability the line packer delegates to.
//!
//! The packer never measures text itself. Each time it considers appending a
//! word it builds a fresh [`OverflowFindArgs`] and asks an [`OverflowFinder`].
//! Hosts plug in whatever metric their renderer uses; closures work too:
//!
//! ```
//! use wwcore::overflow::{OverflowFindArgs, OverflowFinder};
//! use wwcore::WordWrapArgs;
//!
//! let by_chars = |find: &OverflowFindArgs<'_>| -> wwcore::Result<bool> {
//!     Ok(find.line.chars().count() + find.word.chars().count() > find.wrap_args.text_area_width)
//! };
//! let args = WordWrapArgs::new("", 8);
//! let find = OverflowFindArgs { word: "world", line: "hello ", wrap_args: &args };
//! assert!(by_chars.find(&find).unwrap());
//! ```
//!
//! [`CellWidthOverflowFinder`] is the built-in metric: terminal cells, with
//! configured markup treated as zero-width.

use std::borrow::Cow;

use regex::Regex;

use crate::args::WordWrapArgs;
use crate::config::WrapConfig;
use crate::error::{Result, WrapError};
use crate::primitives::display_width;

/// One overflow question: does `word` still fit after `line`?
///
/// `line` already carries the trailing separator when separators are
/// included, so finders measure `line + word` as it would render.
#[derive(Debug, Clone, Copy)]
pub struct OverflowFindArgs<'a> {
    pub word: &'a str,
    pub line: &'a str,
    pub wrap_args: &'a WordWrapArgs,
}

/// Answers whether appending a word to a line overflows the text area.
pub trait OverflowFinder {
    /// Returns `Ok(true)` when `args.word` does not fit after `args.line`.
    ///
    /// Configuration the finder cannot measure against (for example no width
    /// left once padding is reserved) is reported as
    /// [`WrapError::Measurement`].
    fn find(&self, args: &OverflowFindArgs<'_>) -> Result<bool>;

    /// Called once at the end of every wrap job. Finders that keep per-job
    /// state (font resets, measurement caches) clear it here.
    fn on_wrap_job_finished(&mut self) {}
}

impl<F> OverflowFinder for F
where
    F: Fn(&OverflowFindArgs<'_>) -> Result<bool>,
{
    fn find(&self, args: &OverflowFindArgs<'_>) -> Result<bool> {
        self(args)
    }
}

/// Measures in terminal cells.
///
/// Bold/italic toggles measure as the configured substitute text, then every
/// empty-text pattern is removed before the width is taken.
#[derive(Debug, Clone)]
pub struct CellWidthOverflowFinder {
    empty_text: Vec<Regex>,
    bold_italic_markers: Vec<Regex>,
    bold_italic_substitute: String,
}

impl CellWidthOverflowFinder {
    pub fn new(config: &WrapConfig) -> Result<Self> {
        Ok(Self {
            empty_text: WrapConfig::compile_all(&config.empty_text)?,
            bold_italic_markers: WrapConfig::compile_all(&config.bold_italic_markers)?,
            bold_italic_substitute: config.bold_italic_substitute.clone(),
        })
    }

    /// Plain cell widths: no zero-width markup, no substitutions.
    #[must_use]
    pub fn plain() -> Self {
        Self {
            empty_text: Vec::new(),
            bold_italic_markers: Vec::new(),
            bold_italic_substitute: String::new(),
        }
    }

    /// Width of `text` as the message box would render it.
    #[must_use]
    pub fn measure(&self, text: &str) -> usize {
        let mut measured = Cow::Borrowed(text);
        let substitute = self.bold_italic_substitute.as_str();
        let rewrites = self
            .bold_italic_markers
            .iter()
            .map(|marker| (marker, substitute))
            .chain(self.empty_text.iter().map(|pattern| (pattern, "")));

        for (pattern, replacement) in rewrites {
            // Unchanged text comes back borrowed; only a real rewrite allocates.
            let rewritten = match pattern.replace_all(&measured, replacement) {
                Cow::Borrowed(_) => continue,
                Cow::Owned(rewritten) => rewritten,
            };
            measured = Cow::Owned(rewritten);
        }
        display_width(&measured)
    }
}

impl Default for CellWidthOverflowFinder {
    fn default() -> Self {
        Self::plain()
    }
}

impl OverflowFinder for CellWidthOverflowFinder {
    fn find(&self, args: &OverflowFindArgs<'_>) -> Result<bool> {
        let available = args.wrap_args.available_width();
        if available == 0 {
            return Err(WrapError::measurement(format!(
                "no width left for text: area {} leaves nothing after padding",
                args.wrap_args.text_area_width
            )));
        }

        let mut candidate = String::with_capacity(args.line.len() + args.word.len());
        candidate.push_str(args.line);
        candidate.push_str(args.word);
        Ok(self.measure(&candidate) > available)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Spacing;

    fn args(width: usize) -> WordWrapArgs {
        WordWrapArgs::new("", width).with_spacing(Spacing::none())
    }

    #[test]
    fn fits_exactly_is_not_overflow() {
        let finder = CellWidthOverflowFinder::plain();
        let wrap_args = args(11);
        let find = OverflowFindArgs {
            word: "world",
            line: "hello ",
            wrap_args: &wrap_args,
        };
        assert!(!finder.find(&find).unwrap());
    }

    #[test]
    fn one_cell_over_is_overflow() {
        let finder = CellWidthOverflowFinder::plain();
        let wrap_args = args(10);
        let find = OverflowFindArgs {
            word: "world",
            line: "hello ",
            wrap_args: &wrap_args,
        };
        assert!(finder.find(&find).unwrap());
    }

    #[test]
    fn padding_and_mugshot_shrink_the_budget() {
        let finder = CellWidthOverflowFinder::plain();
        let wrap_args = WordWrapArgs::new("", 20)
            .with_mugshot(true)
            .with_spacing(Spacing {
                mugshot_width: 6,
                mugshot_padding: 2,
                side_padding: 1,
            });
        assert_eq!(wrap_args.available_width(), 10);
        let find = OverflowFindArgs {
            word: "world",
            line: "hello ",
            wrap_args: &wrap_args,
        };
        assert!(finder.find(&find).unwrap());
    }

    #[test]
    fn no_available_width_is_a_measurement_error() {
        let finder = CellWidthOverflowFinder::plain();
        let wrap_args = WordWrapArgs::new("", 10);
        let find = OverflowFindArgs {
            word: "a",
            line: "",
            wrap_args: &wrap_args,
        };
        assert!(matches!(
            finder.find(&find),
            Err(WrapError::Measurement { .. })
        ));
    }

    #[test]
    fn color_codes_measure_as_nothing() {
        let finder = CellWidthOverflowFinder::new(&WrapConfig::default()).unwrap();
        assert_eq!(finder.measure("\u{1b}C[2]red\u{1b}C[0]"), 3);
    }

    #[test]
    fn bold_italic_markers_measure_as_substitute() {
        let finder = CellWidthOverflowFinder::new(&WrapConfig::default()).unwrap();
        assert_eq!(finder.measure("\u{1b}FBbold"), 6);
    }

    #[test]
    fn rewrites_apply_only_where_they_match() {
        let finder = CellWidthOverflowFinder::new(&WrapConfig::default()).unwrap();
        assert_eq!(finder.measure("plain words"), 11);
        // Substitution first, then the color code is stripped.
        assert_eq!(finder.measure("\u{1b}FI\u{1b}C[1]x"), 3);
    }

    #[test]
    fn closures_are_finders() {
        let never = |_: &OverflowFindArgs<'_>| -> Result<bool> { Ok(false) };
        let wrap_args = args(1);
        let find = OverflowFindArgs {
            word: "anything",
            line: "at all",
            wrap_args: &wrap_args,
        };
        assert!(!never.find(&find).unwrap());
    }
}
