//! # ass-script
//!
//! Lenient parser for ASS (Advanced `SubStation` Alpha) subtitle scripts.
//! Turns a script document into typed [`ScriptInfo`], [`Style`] and [`Event`]
//! records ready for interpretation by a renderer.
//!
//! ## Failure policy
//!
//! Parsing never fails. Lines that do not match the form expected by their
//! section are skipped and reported as [`ParseIssue`]s on the resulting
//! [`Script`]; malformed numeric fields fall back to defaults.
//!
//! ## Quick Start
//!
//! ```rust
//! use ass_script::Script;
//!
//! let script_text = r#"
//! [Script Info]
//! PlayResX: 1280
//! PlayResY: 720
//!
//! [V4+ Styles]
//! Format: Name, Fontname, Fontsize, PrimaryColour, Alignment
//! Style: Default,Arial,48,&H00FFFFFF,2
//!
//! [Events]
//! Format: Layer, Start, End, Style, Text
//! Dialogue: 0,0:00:01.00,0:00:03.50,Default,Hello, {\b1}world
//! "#;
//!
//! let script = Script::parse(script_text);
//! assert_eq!(script.info().play_resolution(), Some((1280, 720)));
//! assert_eq!(script.events()[0].text, r"Hello, {\b1}world");
//! assert!((script.events()[0].duration_ms() - 2500.0).abs() < 1e-6);
//! ```

#![deny(unsafe_code)]

pub mod parser;
pub mod utils;

pub use parser::ast::{Alignment, BorderStyle, Event, HAlign, ScriptInfo, Style, VAlign};
pub use parser::{IssueCategory, IssueSeverity, ParseIssue, Script};
pub use utils::{Color, CoreError};

/// Crate version for runtime compatibility checks
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
