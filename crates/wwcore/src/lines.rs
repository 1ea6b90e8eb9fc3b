#![forbid(unsafe_code)]

//! Packed lines, grouped by the line-break markers that separated them.

/// Lines produced by the packer.
///
/// Lines are kept in runs: a new run starts wherever a line-break marker
/// forced a break. Post-rules that move words between lines stay inside a
/// run so a marker boundary always survives; rules that only look at line
/// order can use [`lines`](Self::lines) and ignore the grouping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WrappedLines {
    runs: Vec<Vec<String>>,
}

impl WrappedLines {
    /// Build from marker-separated runs. Empty runs are dropped.
    #[must_use]
    pub fn from_runs(runs: Vec<Vec<String>>) -> Self {
        Self {
            runs: runs.into_iter().filter(|run| !run.is_empty()).collect(),
        }
    }

    #[must_use]
    pub fn runs(&self) -> &[Vec<String>] {
        &self.runs
    }

    /// Mutable access to each run. Runs can grow or shrink but not be
    /// split or joined.
    pub fn runs_mut(&mut self) -> &mut [Vec<String>] {
        &mut self.runs
    }

    /// Total number of lines across all runs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.runs.iter().map(Vec::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn lines(&self) -> impl Iterator<Item = &String> {
        self.runs.iter().flatten()
    }

    pub fn lines_mut(&mut self) -> impl Iterator<Item = &mut String> {
        self.runs.iter_mut().flatten()
    }

    #[must_use]
    pub fn into_lines(self) -> Vec<String> {
        self.runs.into_iter().flatten().collect()
    }

    #[must_use]
    pub fn join(&self, separator: &str) -> String {
        self.lines()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(separator)
    }
}

/// A single run: the lines carry no marker boundaries.
impl From<Vec<String>> for WrappedLines {
    fn from(lines: Vec<String>) -> Self {
        Self::from_runs(vec![lines])
    }
}

impl<const N: usize> From<[&str; N]> for WrappedLines {
    fn from(lines: [&str; N]) -> Self {
        Self::from(lines.map(str::to_string).to_vec())
    }
}
