#![forbid(unsafe_code)]

//! Repairs applied to the packed lines.

use crate::config::WrapConfig;
use crate::error::Result;
use crate::lines::WrappedLines;
use crate::primitives::{CLOSING_PARENTHESIS, OPENING_PARENTHESIS, SINGLE_SPACE};

use super::WrapRule;

/// Merges lines holding fewer words than the configured minimum.
///
/// A short line is merged forward into the line after it; a short last line
/// is merged back into the line before it. Empty lines are left alone.
/// Merging stays inside a run of [`WrappedLines`], so a break forced by a
/// line-break marker is never undone; a run of one short line stays as is.
///
/// Merged lines are not measured again, so a merge can overflow the text
/// area slightly. Re-running the packer here would undo its own decisions.
#[derive(Debug, Clone)]
pub struct CharPerLineMin {
    min_words: usize,
    separator: String,
    /// Without separators in the lines there are no words to count.
    countable: bool,
}

impl CharPerLineMin {
    #[must_use]
    pub fn new(config: &WrapConfig) -> Self {
        Self {
            min_words: config.line_min_word_count,
            separator: config.word_separator.clone(),
            countable: config.include_word_separator,
        }
    }

    fn word_count(&self, line: &str) -> usize {
        line.split(self.separator.as_str())
            .filter(|word| !word.is_empty())
            .count()
    }

    fn is_short(&self, line: &str) -> bool {
        !line.is_empty() && self.word_count(line) < self.min_words
    }

    fn joined(&self, first: &str, second: &str) -> String {
        match (first.is_empty(), second.is_empty()) {
            (true, _) => second.to_string(),
            (_, true) => first.to_string(),
            _ => format!("{first}{}{second}", self.separator),
        }
    }

    fn has_mergeable_line(&self, run: &[String]) -> bool {
        run.len() > 1 && run.iter().any(|line| self.is_short(line))
    }

    fn merge_run(&self, run: &mut Vec<String>) {
        let mut index = 0;
        while run.len() > 1 && index < run.len() {
            if !self.is_short(&run[index]) {
                index += 1;
                continue;
            }

            let short = run.remove(index);
            if index < run.len() {
                // The merged line is checked again on the next pass.
                run[index] = self.joined(&short, &run[index]);
            } else {
                let previous = index - 1;
                run[previous] = self.joined(&run[previous], &short);
                break;
            }
        }
    }
}

impl WrapRule<WrappedLines> for CharPerLineMin {
    fn name(&self) -> &'static str {
        "CharPerLineMin"
    }

    fn can_apply_to(&self, lines: &WrappedLines) -> bool {
        self.countable
            && self.min_words > 1
            && lines.runs().iter().any(|run| self.has_mergeable_line(run))
    }

    fn process_text(&self, mut lines: WrappedLines) -> Result<WrappedLines> {
        for run in lines.runs_mut() {
            self.merge_run(run);
        }
        Ok(lines)
    }
}

/// Indents the continuation lines of a parenthetical aside by one space.
///
/// Starting after the first line that opens with `(`, each line gains a
/// leading space up to and including the first of them that ends with `)`.
/// Lines after that are untouched. Runs are ignored: an aside continues
/// across line-break markers.
#[derive(Debug, Clone)]
pub struct ParenthesisAlignment {
    enabled: bool,
}

impl ParenthesisAlignment {
    #[must_use]
    pub fn new(config: &WrapConfig) -> Self {
        Self {
            enabled: config.parenthesis_alignment,
        }
    }

    fn first_opening_line(lines: &WrappedLines) -> Option<usize> {
        lines
            .lines()
            .position(|line| line.starts_with(OPENING_PARENTHESIS))
    }
}

impl WrapRule<WrappedLines> for ParenthesisAlignment {
    fn name(&self) -> &'static str {
        "ParenthesisAlignment"
    }

    fn can_apply_to(&self, lines: &WrappedLines) -> bool {
        if !self.enabled || lines.len() <= 1 {
            return false;
        }
        Self::first_opening_line(lines).is_some_and(|index| index != lines.len() - 1)
    }

    fn process_text(&self, mut lines: WrappedLines) -> Result<WrappedLines> {
        let Some(opening) = Self::first_opening_line(&lines) else {
            return Ok(lines);
        };

        for line in lines.lines_mut().skip(opening + 1) {
            line.insert_str(0, SINGLE_SPACE);
            if line.ends_with(CLOSING_PARENTHESIS) {
                break;
            }
        }
        Ok(lines)
    }
}
