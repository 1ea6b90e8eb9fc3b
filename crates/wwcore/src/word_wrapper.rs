#![forbid(unsafe_code)]

//! The top-level wrap pipeline.
//!
//! [`WordWrapper::wrap`] validates the arguments, answers from the cache when
//! it can, and otherwise runs the full job:
//!
//! 1. A no-wrap tag short-circuits everything; the text comes back verbatim
//!    minus the tag.
//! 2. The nametag is read off the start of the raw text and split off.
//! 3. Pre-rules normalize the rest of the text.
//! 4. The normalized dialogue is packed into lines.
//! 5. Post-rules repair the lines.
//! 6. The nametag (if any) is put back on a line of its own.
//!
//! The result is cached under the raw text exactly as given, so replaying
//! the same script line costs one map lookup.
//!
//! A wrapper is not meant to be shared between threads; `wrap` takes
//! `&mut self` and the cache has no synchronization of its own.

use regex::Regex;
use rustc_hash::FxHashMap;

use crate::args::{ArgValidator, WordWrapArgs};
use crate::config::WrapConfig;
use crate::error::Result;
use crate::line_wrapper::LineWrapper;
use crate::lines::WrappedLines;
use crate::nametag::NametagFetcher;
use crate::overflow::{CellWidthOverflowFinder, OverflowFinder};
use crate::primitives::SINGLE_NEWLINE;
use crate::rules::WrapRuleApplier;

/// Running counters for one wrapper instance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WrapStats {
    /// Jobs run to completion (everything except cache hits).
    pub jobs: u64,
    pub cache_hits: u64,
    pub cache_misses: u64,
    /// Jobs answered by stripping the no-wrap tag.
    pub no_wrap_bypasses: u64,
}

/// Wraps dialogue text into display lines.
pub struct WordWrapper<F: OverflowFinder = CellWidthOverflowFinder> {
    config: WrapConfig,
    validator: ArgValidator,
    rule_applier: WrapRuleApplier,
    nametag_fetcher: NametagFetcher,
    line_wrapper: LineWrapper<F>,
    no_wrap_tag: Option<Regex>,
    wrap_results: FxHashMap<String, String>,
    stats: WrapStats,
}

impl<F: OverflowFinder + std::fmt::Debug> std::fmt::Debug for WordWrapper<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WordWrapper")
            .field("rule_applier", &self.rule_applier)
            .field("line_wrapper", &self.line_wrapper)
            .field("cached", &self.wrap_results.len())
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}

impl WordWrapper<CellWidthOverflowFinder> {
    /// A wrapper measuring in terminal cells, honouring the config's
    /// zero-width and bold/italic patterns.
    pub fn with_cell_width(config: WrapConfig) -> Result<Self> {
        let finder = CellWidthOverflowFinder::new(&config)?;
        let line_wrapper = LineWrapper::new(&config, finder)?;
        Self::new(config, line_wrapper)
    }
}

impl<F: OverflowFinder> WordWrapper<F> {
    /// Build a wrapper with the standard rule chain.
    ///
    /// Fails when the configuration does not validate or one of its patterns
    /// does not compile.
    pub fn new(config: WrapConfig, line_wrapper: LineWrapper<F>) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            validator: ArgValidator,
            rule_applier: WrapRuleApplier::standard(&config)?,
            nametag_fetcher: NametagFetcher::new(&config)?,
            no_wrap_tag: WrapConfig::compile_optional(&config.no_wrap_tag)?,
            line_wrapper,
            wrap_results: FxHashMap::default(),
            stats: WrapStats::default(),
            config,
        })
    }

    /// Wrap `args.raw_text` into newline-joined display lines.
    ///
    /// Any failure aborts the call before anything is cached.
    pub fn wrap(&mut self, args: &WordWrapArgs) -> Result<String> {
        self.validator.validate(args)?;

        if self.config.remember_results {
            if let Some(cached) = self.wrap_results.get(&args.raw_text) {
                self.stats.cache_hits += 1;
                tracing::debug!(len = args.raw_text.len(), "wrap cache hit");
                return Ok(cached.clone());
            }
            self.stats.cache_misses += 1;
            tracing::debug!(len = args.raw_text.len(), "wrap cache miss");
        }

        let result = self.apply_wrap_operations(args)?;

        if self.config.remember_results {
            self.wrap_results
                .insert(args.raw_text.clone(), result.clone());
        }
        self.stats.jobs += 1;
        self.line_wrapper.on_wrap_job_finished();
        Ok(result)
    }

    fn apply_wrap_operations(&mut self, args: &WordWrapArgs) -> Result<String> {
        let raw = args.raw_text.as_str();

        if let Some(tag) = &self.no_wrap_tag
            && tag.is_match(raw)
        {
            self.stats.no_wrap_bypasses += 1;
            tracing::debug!("no-wrap tag found, returning text as written");
            return Ok(tag.replace_all(raw, "").into_owned());
        }

        let nametag = self.nametag_fetcher.fetch_from(raw);
        if !nametag.is_empty() {
            tracing::debug!(nametag = nametag.trim(), "nametag found");
        }
        let body = raw.strip_prefix(nametag).unwrap_or(raw);

        let dialogue = self.rule_applier.apply_pre_rules_to(body.to_string())?;
        let lines = self.line_wrapper.pack(args, dialogue.trim())?;
        let lines = self.rule_applier.apply_post_rules_to(lines)?;

        Ok(assemble(nametag, &lines))
    }

    #[must_use]
    pub fn config(&self) -> &WrapConfig {
        &self.config
    }

    #[must_use]
    pub fn rule_applier(&self) -> &WrapRuleApplier {
        &self.rule_applier
    }

    /// Register extra rules. Cached results are not recomputed, so clear the
    /// cache if earlier inputs should see the new rules.
    pub fn rule_applier_mut(&mut self) -> &mut WrapRuleApplier {
        &mut self.rule_applier
    }

    #[must_use]
    pub fn line_wrapper(&self) -> &LineWrapper<F> {
        &self.line_wrapper
    }

    pub fn line_wrapper_mut(&mut self) -> &mut LineWrapper<F> {
        &mut self.line_wrapper
    }

    #[must_use]
    pub fn is_cached(&self, raw_text: &str) -> bool {
        self.wrap_results.contains_key(raw_text)
    }

    #[must_use]
    pub fn cached_len(&self) -> usize {
        self.wrap_results.len()
    }

    pub fn clear_cache(&mut self) {
        self.wrap_results.clear();
    }

    #[must_use]
    pub fn stats(&self) -> WrapStats {
        self.stats
    }
}

fn assemble(nametag: &str, lines: &WrappedLines) -> String {
    let body = lines.join(SINGLE_NEWLINE);
    if nametag.is_empty() {
        body
    } else {
        format!("{nametag}{SINGLE_NEWLINE}{body}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Spacing;
    use crate::error::WrapError;
    use crate::rules::WrapRule;
    use std::cell::Cell;
    use std::rc::Rc;
    use tracing_test::traced_test;

    struct CountingRule(Rc<Cell<usize>>);

    impl WrapRule<String> for CountingRule {
        fn name(&self) -> &'static str {
            "CountingRule"
        }

        fn can_apply_to(&self, _: &String) -> bool {
            self.0.set(self.0.get() + 1);
            true
        }

        fn process_text(&self, value: String) -> Result<String> {
            Ok(value)
        }
    }

    fn plain_wrapper(config: WrapConfig) -> WordWrapper {
        let line_wrapper = LineWrapper::new(&config, CellWidthOverflowFinder::plain()).unwrap();
        WordWrapper::new(config, line_wrapper).unwrap()
    }

    fn args(text: &str, width: usize) -> WordWrapArgs {
        WordWrapArgs::new(text, width).with_spacing(Spacing::none())
    }

    #[test]
    fn assemble_skips_empty_nametag() {
        let lines = WrappedLines::from(["a", "b"]);
        assert_eq!(assemble("", &lines), "a\nb");
        assert_eq!(assemble("Bo:", &lines), "Bo:\na\nb");
    }

    #[test]
    fn second_wrap_is_served_from_cache() {
        let calls = Rc::new(Cell::new(0));
        let mut wrapper = plain_wrapper(WrapConfig::default());
        wrapper
            .rule_applier_mut()
            .register_pre_rule(Box::new(CountingRule(Rc::clone(&calls))));

        let request = args("Some words to wrap around", 10);
        let first = wrapper.wrap(&request).unwrap();
        assert_eq!(calls.get(), 1);

        let second = wrapper.wrap(&request).unwrap();
        assert_eq!(first, second);
        assert_eq!(calls.get(), 1);
        assert_eq!(
            wrapper.stats(),
            WrapStats {
                jobs: 1,
                cache_hits: 1,
                cache_misses: 1,
                no_wrap_bypasses: 0,
            }
        );
    }

    #[test]
    fn cache_disabled_reruns_rules() {
        let calls = Rc::new(Cell::new(0));
        let mut wrapper = plain_wrapper(WrapConfig::default().with_remember_results(false));
        wrapper
            .rule_applier_mut()
            .register_pre_rule(Box::new(CountingRule(Rc::clone(&calls))));

        let request = args("Hello", 10);
        wrapper.wrap(&request).unwrap();
        wrapper.wrap(&request).unwrap();
        assert_eq!(calls.get(), 2);
        assert_eq!(wrapper.cached_len(), 0);
    }

    #[test]
    fn invalid_args_fail_before_cache_lookup() {
        let mut wrapper = plain_wrapper(WrapConfig::default());
        let error = wrapper.wrap(&args("Hello", 0)).unwrap_err();
        assert!(matches!(error, WrapError::InvalidArgs { .. }));
        assert_eq!(wrapper.stats(), WrapStats::default());
        assert_eq!(wrapper.cached_len(), 0);
    }

    #[test]
    fn failed_wrap_caches_nothing() {
        let mut wrapper = WordWrapper::with_cell_width(WrapConfig::default()).unwrap();
        // Default spacing leaves no room at width 10.
        let request = WordWrapArgs::new("Hello", 10);
        let error = wrapper.wrap(&request).unwrap_err();
        assert!(matches!(error, WrapError::Measurement { .. }));
        assert!(!wrapper.is_cached("Hello"));
        assert_eq!(wrapper.stats().jobs, 0);
    }

    #[test]
    fn hook_fires_once_per_job_and_not_on_cache_hits() {
        let fired = Rc::new(Cell::new(0));
        let seen = Rc::clone(&fired);
        let mut wrapper = plain_wrapper(WrapConfig::default());
        wrapper
            .line_wrapper_mut()
            .add_job_finished_listener(move || seen.set(seen.get() + 1));

        wrapper.wrap(&args("one", 10)).unwrap();
        wrapper.wrap(&args("one", 10)).unwrap();
        wrapper.wrap(&args("[[NOWRAP]]two", 10)).unwrap();
        assert_eq!(fired.get(), 2);
    }

    #[test]
    fn clear_cache_forces_rewrap() {
        let mut wrapper = plain_wrapper(WrapConfig::default());
        wrapper.wrap(&args("one", 10)).unwrap();
        assert!(wrapper.is_cached("one"));
        wrapper.clear_cache();
        assert!(!wrapper.is_cached("one"));
        wrapper.wrap(&args("one", 10)).unwrap();
        assert_eq!(wrapper.stats().jobs, 2);
    }

    #[test]
    fn invalid_config_is_rejected_at_construction() {
        let config = WrapConfig::default().with_no_wrap_tag("[[");
        assert!(matches!(
            WordWrapper::with_cell_width(config),
            Err(WrapError::InvalidPattern { .. })
        ));
    }

    #[test]
    fn nametag_is_split_off_before_normalization() {
        let mut wrapper = plain_wrapper(WrapConfig::default());
        let out = wrapper.wrap(&args("Old  Man: Take this sword now.", 80)).unwrap();
        assert_eq!(out, "Old  Man:\nTake this sword now.");
    }

    #[test]
    fn default_config_keeps_marker_break_between_short_lines() {
        let mut wrapper = plain_wrapper(WrapConfig::default());
        assert_eq!(wrapper.wrap(&args("Yes.<br>No.", 80)).unwrap(), "Yes.\nNo.");
    }

    #[traced_test]
    #[test]
    fn cache_hits_and_misses_are_logged() {
        let mut wrapper = plain_wrapper(WrapConfig::default());
        wrapper.wrap(&args("Bob: hey", 10)).unwrap();
        wrapper.wrap(&args("Bob: hey", 10)).unwrap();
        assert!(logs_contain("wrap cache miss"));
        assert!(logs_contain("nametag found"));
        assert!(logs_contain("wrap cache hit"));
    }
}
