#![forbid(unsafe_code)]

//! Greedy line packing.
//!
//! Words are taken left to right and appended to the current line until the
//! [`OverflowFinder`] says the next one no longer fits, or the next word is a
//! line-break marker. Markers close the line and are dropped; they never
//! reach the output. [`LineWrapper::pack`] keeps the lines grouped by the
//! markers that separated them, so later repairs can respect those breaks.
//!
//! ```
//! use wwcore::{LineWrapper, WordWrapArgs, WrapConfig};
//! use wwcore::config::Spacing;
//! use wwcore::overflow::CellWidthOverflowFinder;
//!
//! let config = WrapConfig::default();
//! let wrapper = LineWrapper::new(&config, CellWidthOverflowFinder::plain()).unwrap();
//! let args = WordWrapArgs::new("", 11).with_spacing(Spacing::none());
//! let lines = wrapper.wrap_into_lines(&args, "hello world foo <br> bar").unwrap();
//! assert_eq!(lines, vec!["hello world", "foo", "bar"]);
//! ```

use unicode_segmentation::UnicodeSegmentation;

use crate::args::WordWrapArgs;
use crate::config::WrapConfig;
use crate::error::Result;
use crate::lines::WrappedLines;
use crate::overflow::{CellWidthOverflowFinder, OverflowFindArgs, OverflowFinder};
use crate::primitives::EMPTY;

type JobFinishedListener = Box<dyn FnMut()>;

/// Packs dialogue words into lines using an [`OverflowFinder`].
pub struct LineWrapper<F: OverflowFinder = CellWidthOverflowFinder> {
    finder: F,
    separator: String,
    include_separator: bool,
    line_break_markers: Vec<String>,
    split_words: bool,
    listeners: Vec<JobFinishedListener>,
}

impl<F: OverflowFinder + std::fmt::Debug> std::fmt::Debug for LineWrapper<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LineWrapper")
            .field("finder", &self.finder)
            .field("separator", &self.separator)
            .field("include_separator", &self.include_separator)
            .field("line_break_markers", &self.line_break_markers)
            .field("split_words", &self.split_words)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl<F: OverflowFinder> LineWrapper<F> {
    /// Fails when `config` does not [validate](WrapConfig::validate).
    pub fn new(config: &WrapConfig, finder: F) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            finder,
            separator: config.word_separator.clone(),
            include_separator: config.include_word_separator,
            line_break_markers: config.line_break_markers.clone(),
            split_words: config.split_words_between_lines,
            listeners: Vec::new(),
        })
    }

    /// Pack `dialogue` into lines.
    ///
    /// Always returns at least one line; empty dialogue gives `[""]`. No
    /// other line is ever empty: an overflow or marker on an empty line does
    /// not close it.
    pub fn wrap_into_lines(&self, args: &WordWrapArgs, dialogue: &str) -> Result<Vec<String>> {
        self.pack(args, dialogue).map(WrappedLines::into_lines)
    }

    /// Pack `dialogue` into lines grouped into runs, a new run starting at
    /// every line-break marker that ended a non-empty line.
    pub fn pack(&self, args: &WordWrapArgs, dialogue: &str) -> Result<WrappedLines> {
        let mut runs = Vec::new();
        let mut lines = Vec::new();
        let mut current = String::new();

        for word in dialogue.split(self.separator.as_str()) {
            if word.is_empty() {
                continue;
            }

            let overflows = self.finder.find(&OverflowFindArgs {
                word,
                line: &current,
                wrap_args: args,
            })?;
            let is_break = self.is_line_break(word);

            if (overflows || is_break) && !current.is_empty() {
                let reason = if is_break { "marker" } else { "overflow" };
                self.close_line(&mut lines, &mut current, reason);
            }
            if is_break {
                if !lines.is_empty() {
                    runs.push(std::mem::take(&mut lines));
                }
                continue;
            }

            if overflows && self.split_words && self.overflows_alone(args, word)? {
                self.push_split_word(args, word, &mut lines, &mut current)?;
                continue;
            }

            current.push_str(word);
            current.push_str(self.separator_to_include());
        }

        if !current.is_empty() {
            lines.push(self.finish_line(&current));
        }
        if !lines.is_empty() {
            runs.push(lines);
        }
        if runs.is_empty() {
            runs.push(vec![String::new()]);
        }
        Ok(WrappedLines::from_runs(runs))
    }

    /// Whether `word` is one of the configured line-break markers.
    #[must_use]
    pub fn is_line_break(&self, word: &str) -> bool {
        self.line_break_markers.iter().any(|marker| marker == word)
    }

    /// End-of-job notification. Resets the finder's per-job state and calls
    /// every registered listener once.
    pub fn on_wrap_job_finished(&mut self) {
        self.finder.on_wrap_job_finished();
        for listener in &mut self.listeners {
            listener();
        }
    }

    /// Register a callback for the end of each wrap job (a display layer
    /// resetting per-message state, for instance).
    pub fn add_job_finished_listener(&mut self, listener: impl FnMut() + 'static) {
        self.listeners.push(Box::new(listener));
    }

    #[must_use]
    pub fn finder(&self) -> &F {
        &self.finder
    }

    pub fn finder_mut(&mut self) -> &mut F {
        &mut self.finder
    }

    fn separator_to_include(&self) -> &str {
        if self.include_separator {
            &self.separator
        } else {
            EMPTY
        }
    }

    fn finish_line(&self, line: &str) -> String {
        line.trim_end_matches(self.separator.as_str())
            .trim()
            .to_string()
    }

    fn close_line(&self, lines: &mut Vec<String>, current: &mut String, reason: &'static str) {
        let line = self.finish_line(current);
        tracing::trace!(reason, line = %line, "closed line");
        lines.push(line);
        current.clear();
    }

    fn overflows_alone(&self, args: &WordWrapArgs, word: &str) -> Result<bool> {
        self.finder.find(&OverflowFindArgs {
            word,
            line: EMPTY,
            wrap_args: args,
        })
    }

    /// Break a word too wide for any line at grapheme boundaries. Full chunks
    /// become lines; the remainder starts the current line.
    fn push_split_word(
        &self,
        args: &WordWrapArgs,
        word: &str,
        lines: &mut Vec<String>,
        current: &mut String,
    ) -> Result<()> {
        if !current.is_empty() {
            self.close_line(lines, current, "overflow");
        }

        for grapheme in word.graphemes(true) {
            let overflows = self.finder.find(&OverflowFindArgs {
                word: grapheme,
                line: current.as_str(),
                wrap_args: args,
            })?;
            if overflows && !current.is_empty() {
                self.close_line(lines, current, "split");
            }
            current.push_str(grapheme);
        }
        current.push_str(self.separator_to_include());
        Ok(())
    }
}
