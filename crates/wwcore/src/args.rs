#![forbid(unsafe_code)]

//! Per-call wrap arguments and their validation.

use crate::config::Spacing;
use crate::error::{Result, WrapError};

/// Everything one wrap request needs beyond the shared configuration.
///
/// Built by the caller for each request and only read during the call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordWrapArgs {
    /// Text exactly as the author wrote it. Also the cache key.
    pub raw_text: String,
    /// Width of the text area, in whatever unit the overflow finder measures.
    pub text_area_width: usize,
    /// Whether a mugshot is drawn beside the text.
    pub has_mugshot: bool,
    pub spacing: Spacing,
}

impl WordWrapArgs {
    #[must_use]
    pub fn new(raw_text: impl Into<String>, text_area_width: usize) -> Self {
        Self {
            raw_text: raw_text.into(),
            text_area_width,
            has_mugshot: false,
            spacing: Spacing::default(),
        }
    }

    #[must_use]
    pub fn with_mugshot(mut self, has_mugshot: bool) -> Self {
        self.has_mugshot = has_mugshot;
        self
    }

    #[must_use]
    pub fn with_spacing(mut self, spacing: Spacing) -> Self {
        self.spacing = spacing;
        self
    }

    /// Width left for text once side padding and any mugshot are reserved.
    #[must_use]
    pub fn available_width(&self) -> usize {
        let mut reserved = self.spacing.side_padding.saturating_mul(2);
        if self.has_mugshot {
            reserved = reserved
                .saturating_add(self.spacing.mugshot_width)
                .saturating_add(self.spacing.mugshot_padding);
        }
        self.text_area_width.saturating_sub(reserved)
    }
}

/// Rejects arguments the pipeline cannot work with, before any work is done.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArgValidator;

impl ArgValidator {
    pub fn validate(&self, args: &WordWrapArgs) -> Result<()> {
        if args.text_area_width == 0 {
            return Err(WrapError::invalid_args("text area width is missing (zero)"));
        }
        if args.raw_text.contains('\0') {
            return Err(WrapError::invalid_args("raw text contains a NUL character"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn available_width_subtracts_both_side_paddings() {
        let args = WordWrapArgs::new("hi", 100);
        assert_eq!(args.available_width(), 90);
    }

    #[test]
    fn available_width_reserves_mugshot() {
        let args = WordWrapArgs::new("hi", 400).with_mugshot(true);
        assert_eq!(args.available_width(), 400 - 10 - 144 - 25);
    }

    #[test]
    fn available_width_saturates() {
        let args = WordWrapArgs::new("hi", 50).with_mugshot(true);
        assert_eq!(args.available_width(), 0);
    }

    #[test]
    fn zero_width_fails_validation() {
        let error = ArgValidator.validate(&WordWrapArgs::new("hi", 0)).unwrap_err();
        assert!(matches!(error, WrapError::InvalidArgs { .. }));
    }

    #[test]
    fn nul_in_text_fails_validation() {
        let args = WordWrapArgs::new("a\0b", 10);
        assert!(ArgValidator.validate(&args).is_err());
    }

    #[test]
    fn empty_text_is_valid() {
        ArgValidator.validate(&WordWrapArgs::new("", 10)).unwrap();
    }
}
