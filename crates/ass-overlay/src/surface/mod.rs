//! Rendering-surface contract
//!
//! The overlay never draws pixels itself. Everything visible is created and
//! updated through a [`Surface`] supplied by the host: a vector scene graph,
//! a retained-mode GPU layer, or the [`HeadlessSurface`] used in tests.
//!
//! Element ids are chosen by the host. Resource ids (gradients and clip
//! regions) come from the renderer's [`IdAllocator`](crate::utils::IdAllocator)
//! so they stay unique across reloads.

use ass_script::Color;

use crate::pipeline::{ClipRegion, Declarations, ShapeSpan, TextSpan, Transform};
use crate::utils::{Rect, ResourceId};

pub mod headless;

pub use headless::HeadlessSurface;

/// Host-assigned handle of a visual element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub u64);

/// Rendered metrics of a font at a given size
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontMetrics {
    /// Line height in script pixels
    pub height: f64,
}

/// Which point of the text box sits on the anchor's x coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAnchor {
    /// Left edge
    #[default]
    Start,
    /// Horizontal center
    Middle,
    /// Right edge
    End,
}

/// Placement of a text element
///
/// `y + dy` is the baseline; `dy` lets top and middle alignments hang the
/// text below the anchor point.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Anchor {
    /// Anchor x
    pub x: f64,
    /// Anchor y
    pub y: f64,
    /// Baseline offset below `y`
    pub dy: f64,
    /// Horizontal anchoring
    pub text_anchor: TextAnchor,
}

/// Drop-shadow compositing filter
///
/// A zero offset with a blur radius renders a glow around the element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shadow {
    /// Horizontal offset
    pub dx: f64,
    /// Vertical offset
    pub dy: f64,
    /// Blur radius
    pub blur: f64,
    /// Shadow color
    pub color: Color,
}

impl Shadow {
    /// Interpolate towards `other`
    #[must_use]
    pub fn lerp(&self, other: &Self, t: f64) -> Self {
        use crate::utils::math::lerp;
        Self {
            dx: lerp(self.dx, other.dx, t),
            dy: lerp(self.dy, other.dy, t),
            blur: lerp(self.blur, other.blur, t),
            color: self.color.lerp(other.color, t as f32),
        }
    }
}

/// Paint of an opaque border box
#[derive(Debug, Clone, PartialEq)]
pub struct BoxPaint {
    /// Box fill
    pub fill: Color,
    /// Box stroke
    pub stroke: Color,
    /// Box stroke width, also the padding around the text
    pub stroke_width: f64,
    /// Filters applied to the box
    pub filters: Vec<Shadow>,
}

/// One stop of a linear gradient
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradientStop {
    /// Offset along the gradient, `0.0..=1.0`
    pub offset: f64,
    /// Stop color
    pub color: Color,
}

/// Host rendering surface
pub trait Surface {
    /// Measure a font's rendered line height
    fn font_metrics(&mut self, family: &str, size: f64) -> FontMetrics;

    /// Create a text element made of styled spans
    fn create_text(&mut self, layer: i32, spans: &[TextSpan]) -> ElementId;

    /// Restyle one span of a text element
    fn update_span(&mut self, element: ElementId, index: usize, decl: &Declarations);

    /// Create a path shape
    fn create_shape(&mut self, layer: i32, shape: &ShapeSpan) -> ElementId;

    /// Restyle a path shape
    fn update_shape(&mut self, element: ElementId, decl: &Declarations);

    /// Create an (initially empty) border box
    fn create_box(&mut self, layer: i32) -> ElementId;

    /// Place and paint a border box
    fn set_box(&mut self, element: ElementId, rect: Rect, paint: &BoxPaint);

    /// Anchor a text element
    fn set_anchor(&mut self, element: ElementId, anchor: Anchor);

    /// Replace an element's transform list and transform origin
    fn set_transform(&mut self, element: ElementId, transforms: &[Transform], origin: (f64, f64));

    /// Replace an element's compositing filters
    fn set_filters(&mut self, element: ElementId, filters: &[Shadow]);

    /// Set an element's opacity
    fn set_opacity(&mut self, element: ElementId, opacity: f64);

    /// Show or hide an element
    fn set_visible(&mut self, element: ElementId, visible: bool);

    /// Untransformed bounds of a text element
    fn text_bounds(&self, element: ElementId) -> Rect;

    /// Untransformed bounds of one span of a text element
    fn span_bounds(&self, element: ElementId, index: usize) -> Rect;

    /// Untransformed bounds of a path shape
    fn shape_bounds(&self, element: ElementId) -> Rect;

    /// Destroy an element
    fn remove(&mut self, element: ElementId);

    /// Define a clip region
    fn define_clip(&mut self, id: ResourceId, clip: &ClipRegion);

    /// Clip an element by a defined region
    fn apply_clip(&mut self, element: ElementId, id: ResourceId);

    /// Define a linear gradient
    fn define_gradient(&mut self, id: ResourceId, stops: &[GradientStop]);

    /// Move or recolor one gradient stop
    fn set_gradient_stop(&mut self, id: ResourceId, index: usize, stop: GradientStop);

    /// Release a generated resource (gradient or clip region)
    fn release(&mut self, id: ResourceId);
}
