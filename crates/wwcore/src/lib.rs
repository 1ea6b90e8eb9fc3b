#![forbid(unsafe_code)]

//! Rule-driven word wrapping for dialogue text.
//!
//! # Role
//! `wwcore` reflows author-written dialogue (speaker nametags, inline color
//! codes, explicit line-break markers) into lines that fit a message box.
//! It never measures text itself: every "does this word still fit" decision
//! goes through an [`OverflowFinder`], so the host's renderer stays the single
//! source of truth for widths.
//!
//! # This crate provides
//! - [`WordWrapper`], the cached top-level pipeline.
//! - [`LineWrapper`], the greedy packer, and [`WrappedLines`], its output.
//! - [`WrapRuleApplier`] and the standard pre/post [`rules`].
//! - [`NametagFetcher`] for speaker prefixes.
//! - [`WrapConfig`] and [`WordWrapArgs`] for configuration and per-call input.
//! - [`CellWidthOverflowFinder`], a terminal-cell measurer.
//!
//! # Example
//! ```
//! use wwcore::{WordWrapArgs, WordWrapper, WrapConfig};
//! use wwcore::config::Spacing;
//!
//! let mut wrapper = WordWrapper::with_cell_width(WrapConfig::default()).unwrap();
//!
//! let args = WordWrapArgs::new("Guard: Halt! Who goes there?<br>Speak!", 16)
//!     .with_spacing(Spacing::none());
//! let wrapped = wrapper.wrap(&args).unwrap();
//! // "there?" is too short for a line of its own and rejoins the line above;
//! // "Speak!" keeps the line the marker gave it.
//! assert_eq!(wrapped, "Guard:\nHalt! Who goes there?\nSpeak!");
//! ```

pub mod args;
pub mod config;
pub mod error;
pub mod line_wrapper;
pub mod lines;
pub mod nametag;
pub mod overflow;
pub mod primitives;
pub mod rules;
pub mod word_wrapper;

pub use args::{ArgValidator, WordWrapArgs};
pub use config::{Spacing, WrapConfig};
pub use error::{Result, WrapError};
pub use line_wrapper::LineWrapper;
pub use lines::WrappedLines;
pub use nametag::NametagFetcher;
pub use overflow::{CellWidthOverflowFinder, OverflowFindArgs, OverflowFinder};
pub use rules::{PostRule, PreRule, WrapRule, WrapRuleApplier};
pub use word_wrapper::{WordWrapper, WrapStats};
