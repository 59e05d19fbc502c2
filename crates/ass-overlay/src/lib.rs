//! Timed ASS subtitle overlay
//!
//! `ass-overlay` turns a parsed [`Script`] into live visual elements on a
//! host-provided [`Surface`]: it interprets override tags, splits lines whose
//! tags cannot share one element, runs transitions, karaoke, fades and
//! motion on each subtitle's own clock, and realigns split lines every time
//! one of their pieces moves.
//!
//! ```rust
//! use ass_overlay::{HeadlessSurface, Renderer};
//!
//! let document = "[Script Info]
//! PlayResX: 640
//! PlayResY: 480
//!
//! [Events]
//! Format: Layer, Start, End, Style, Text
//! Dialogue: 0,0:00:00.00,0:00:02.00,Default,{\\fad(200,200)}Hello
//! ";
//!
//! let mut surface = HeadlessSurface::new();
//! let mut renderer = Renderer::default();
//! renderer.load_str(document, &mut surface).unwrap();
//!
//! let outcome = renderer.tick(1.0, &mut surface);
//! assert_eq!(outcome.activated, 1);
//! assert_eq!(surface.element_count(), 1);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod animation;
pub mod layout;
pub mod pipeline;
pub mod renderer;
pub mod surface;
pub mod utils;

pub use animation::{Easing, Transition, Tween};
pub use pipeline::{Declarations, InterpretedRun, Interpreter};
pub use renderer::{LoadRequest, LoadState, RenderContext, Renderer, Subtitle, TickOutcome};
pub use surface::{ElementId, HeadlessSurface, Surface};
pub use utils::{IdAllocator, OverlayError};

/// Re-export of the script model
pub use ass_script::{Event, Script, Style};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
