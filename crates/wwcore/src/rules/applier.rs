#![forbid(unsafe_code)]

use crate::config::WrapConfig;
use crate::error::Result;
use crate::lines::WrappedLines;

use super::post::{CharPerLineMin, ParenthesisAlignment};
use super::pre::{
    LineBreakMarkersAsWords, NewlinesToSeparators, NoColorTagsAsFirstWords,
    RemoveDisableNametagScanTags, WithoutExtraSpaces,
};
use super::{PostRule, PreRule, WrapRule};

/// Ordered registry of pre-rules and post-rules.
///
/// Registration order is application order. Nothing is reordered or
/// deduplicated.
#[derive(Default)]
pub struct WrapRuleApplier {
    pre_rules: Vec<PreRule>,
    post_rules: Vec<PostRule>,
}

impl std::fmt::Debug for WrapRuleApplier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WrapRuleApplier")
            .field("pre_rules", &self.pre_rule_names())
            .field("post_rules", &self.post_rule_names())
            .finish()
    }
}

impl WrapRuleApplier {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The standard rule chain for dialogue text.
    pub fn standard(config: &WrapConfig) -> Result<Self> {
        let mut applier = Self::new();

        applier.register_pre_rule(Box::new(RemoveDisableNametagScanTags::new(config)?));
        applier.register_pre_rule(Box::new(NewlinesToSeparators::new(config)));
        applier.register_pre_rule(Box::new(LineBreakMarkersAsWords::new(config)?));
        applier.register_pre_rule(Box::new(WithoutExtraSpaces::new(config)?));
        applier.register_pre_rule(Box::new(NoColorTagsAsFirstWords::new(config)?));

        applier.register_post_rule(Box::new(CharPerLineMin::new(config)));
        applier.register_post_rule(Box::new(ParenthesisAlignment::new(config)));

        Ok(applier)
    }

    pub fn register_pre_rule(&mut self, rule: PreRule) {
        self.pre_rules.push(rule);
    }

    pub fn register_post_rule(&mut self, rule: PostRule) {
        self.post_rules.push(rule);
    }

    pub fn apply_pre_rules_to(&self, text: String) -> Result<String> {
        apply_in_order(&self.pre_rules, text, "pre")
    }

    pub fn apply_post_rules_to(&self, lines: WrappedLines) -> Result<WrappedLines> {
        apply_in_order(&self.post_rules, lines, "post")
    }

    #[must_use]
    pub fn pre_rule_names(&self) -> Vec<&'static str> {
        self.pre_rules.iter().map(|rule| rule.name()).collect()
    }

    #[must_use]
    pub fn post_rule_names(&self) -> Vec<&'static str> {
        self.post_rules.iter().map(|rule| rule.name()).collect()
    }
}

fn apply_in_order<T>(rules: &[Box<dyn WrapRule<T>>], mut value: T, stage: &str) -> Result<T> {
    for rule in rules {
        if rule.can_apply_to(&value) {
            tracing::trace!(rule = rule.name(), stage, "applying wrap rule");
            value = rule.process_text(value)?;
        }
    }
    Ok(value)
}
