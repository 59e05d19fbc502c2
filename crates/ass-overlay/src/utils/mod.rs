//! Shared utilities: errors, resource ids and geometry helpers

mod errors;
mod ids;
pub mod math;

pub use errors::OverlayError;
pub use ids::{IdAllocator, ResourceId};
pub use math::Rect;
