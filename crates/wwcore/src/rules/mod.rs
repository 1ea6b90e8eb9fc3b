#![forbid(unsafe_code)]

//! Text normalization and line repair rules.
//!
//! A rule is a guard plus a transform. Pre-rules see the whole raw string
//! before it is split into lines; post-rules see the packed
//! [`WrappedLines`](crate::lines::WrappedLines). The
//! [`WrapRuleApplier`] runs each registered rule in order, skipping any whose
//! guard rejects the current value, so every rule sees the cumulative result
//! of the rules before it.
//!
//! Rules hold only configuration. Anything a rule needs to track while it
//! works (such as whether it is inside a parenthetical) is rebuilt from the
//! input on every call.

pub mod applier;
pub mod post;
pub mod pre;

pub use applier::WrapRuleApplier;
pub use post::{CharPerLineMin, ParenthesisAlignment};
pub use pre::{
    LineBreakMarkersAsWords, NewlinesToSeparators, NoColorTagsAsFirstWords,
    RemoveDisableNametagScanTags, WithoutExtraSpaces,
};

use crate::error::Result;
use crate::lines::WrappedLines;

/// A single normalization or repair step.
pub trait WrapRule<T> {
    /// Short name used in logs and errors.
    fn name(&self) -> &'static str;

    /// Whether the rule has anything to do for `value`.
    fn can_apply_to(&self, value: &T) -> bool;

    /// Transform `value`. Only called when [`can_apply_to`](Self::can_apply_to)
    /// returned `true` for it.
    fn process_text(&self, value: T) -> Result<T>;
}

/// A rule run on the whole raw string, before line splitting.
pub type PreRule = Box<dyn WrapRule<String>>;
/// A rule run on the packed lines.
pub type PostRule = Box<dyn WrapRule<WrappedLines>>;
