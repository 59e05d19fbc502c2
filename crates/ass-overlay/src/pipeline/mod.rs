//! Event text processing pipeline
//!
//! Dialogue text goes through [`preprocess::prepare`], is split into
//! independently positioned pieces by [`crate::layout`], and every piece is
//! turned into styled spans and shapes by the [`Interpreter`].

pub mod declarations;
pub mod drawing;
pub mod interpreter;
pub mod preprocess;
pub mod state;
pub mod tags;
pub mod transform;

pub use declarations::{Declarations, Decoration, Paint};
pub use interpreter::{InterpretedRun, Interpreter};
pub use state::{ClipRegion, LineState, RunState, ShapeSpan, TextSpan};
pub use tags::Tag;
pub use transform::{Transform, TransformKind, TransformSet};
