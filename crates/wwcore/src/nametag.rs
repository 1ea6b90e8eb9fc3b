#![forbid(unsafe_code)]

//! Speaker nametag detection.

use regex::Regex;

use crate::config::WrapConfig;
use crate::error::Result;
use crate::primitives::EMPTY;

/// Finds a speaker nametag at the start of raw dialogue text.
///
/// Formats are tried in configuration order and the first one matching at
/// the very start of the text wins, so more specific formats belong first.
/// A match containing a line-break marker is not a nametag.
#[derive(Debug, Clone)]
pub struct NametagFetcher {
    formats: Vec<Regex>,
    disable_scan: Option<Regex>,
    markers: Vec<String>,
}

impl NametagFetcher {
    pub fn new(config: &WrapConfig) -> Result<Self> {
        Ok(Self {
            formats: WrapConfig::compile_all(&config.nametag_formats)?,
            disable_scan: WrapConfig::compile_optional(&config.disable_nametag_scan_tag)?,
            markers: config.line_break_markers.clone(),
        })
    }

    /// Return the nametag at the start of `raw_text`, or `""` when there is
    /// none. The result is always a prefix of `raw_text`, which is not
    /// modified.
    #[must_use]
    pub fn fetch_from<'t>(&self, raw_text: &'t str) -> &'t str {
        if self
            .disable_scan
            .as_ref()
            .is_some_and(|tag| tag.is_match(raw_text))
        {
            return EMPTY;
        }

        self.formats
            .iter()
            .filter_map(|format| format.find(raw_text))
            .find(|found| found.start() == 0 && !self.contains_marker(found.as_str()))
            .map_or(EMPTY, |found| found.as_str())
    }

    fn contains_marker(&self, candidate: &str) -> bool {
        self.markers
            .iter()
            .any(|marker| !marker.is_empty() && candidate.contains(marker.as_str()))
    }
}
