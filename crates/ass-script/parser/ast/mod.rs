//! AST definitions for ASS scripts
//!
//! Nodes are owned and fully resolved: numeric fields are parsed, colors are
//! decoded and defaults are applied once at parse time, so consumers never
//! re-parse field text.
//!
//! All nodes are immutable after construction and implement `Send + Sync`.
//!
//! # Examples
//!
//! ```rust
//! use ass_script::parser::ast::{Alignment, Event, HAlign, Style, VAlign};
//!
//! let style = Style::builtin_default();
//! assert_eq!(style.name, "Default");
//! assert_eq!(style.alignment.halign(), HAlign::Center);
//! assert_eq!(style.alignment.valign(), VAlign::Bottom);
//!
//! let event = Event {
//!     start: 5.0,
//!     end: 10.0,
//!     text: "Hello World!".to_string(),
//!     ..Event::default()
//! };
//! assert!((event.duration_ms() - 5000.0).abs() < 1e-9);
//! ```

mod event;
mod script_info;
mod style;

pub use event::Event;
pub use script_info::ScriptInfo;
pub use style::{Alignment, BorderStyle, HAlign, Style, VAlign};
