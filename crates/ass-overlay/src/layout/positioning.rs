//! Single-run placement
//!
//! Text is anchored by alignment: the anchor's x is the left edge, middle or
//! right edge of the text, and `dy` hangs top and middle aligned text below
//! the anchor point. Everything here works in script pixels.

use ass_script::{Alignment, Event, HAlign, Style, VAlign};

use crate::pipeline::{Transform, TransformKind, TransformSet};
use crate::surface::{Anchor, TextAnchor};
use crate::utils::Rect;

/// Resolved margins of one event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Margins {
    /// Left
    pub left: i32,
    /// Right
    pub right: i32,
    /// Top or bottom
    pub vertical: i32,
}

impl Margins {
    /// Event margins where non-zero, style margins otherwise
    #[must_use]
    pub fn resolve(style: &Style, event: &Event) -> Self {
        let pick = |event: i32, style: i32| if event == 0 { style } else { event };
        Self {
            left: pick(event.margin_l, style.margin_l),
            right: pick(event.margin_r, style.margin_r),
            vertical: pick(event.margin_v, style.margin_v),
        }
    }
}

/// Everything needed to anchor one run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacementInput {
    /// Effective alignment
    pub alignment: Alignment,
    /// `\pos` / `\move` position
    pub position: Option<(f64, f64)>,
    /// Resolved margins
    pub margins: Margins,
    /// Script canvas size
    pub canvas: (f64, f64),
    /// Line height of the style's own font size
    pub line_height: f64,
}

/// Horizontal text anchoring for an alignment
#[must_use]
pub const fn text_anchor(alignment: Alignment) -> TextAnchor {
    match alignment.halign() {
        HAlign::Left => TextAnchor::Start,
        HAlign::Center => TextAnchor::Middle,
        HAlign::Right => TextAnchor::End,
    }
}

/// Anchor of a single run
#[must_use]
pub fn anchor(input: &PlacementInput) -> Anchor {
    let alignment = input.alignment;
    let height = input.line_height;
    let dy = match alignment.valign() {
        VAlign::Top => height,
        VAlign::Middle => height / 2.0,
        VAlign::Bottom => 0.0,
    };
    let (x, y) = input.position.unwrap_or_else(|| {
        let (width, canvas_height) = input.canvas;
        let margins = input.margins;
        let x = match alignment.halign() {
            HAlign::Left => f64::from(margins.left),
            HAlign::Center => f64::from(margins.left - margins.right) / 2.0 + width / 2.0,
            HAlign::Right => width - f64::from(margins.right),
        };
        let y = match alignment.valign() {
            VAlign::Top => f64::from(margins.vertical),
            VAlign::Middle => canvas_height / 2.0,
            VAlign::Bottom => canvas_height - f64::from(margins.vertical),
        };
        (x, y)
    });
    Anchor {
        x,
        y,
        dy,
        text_anchor: text_anchor(alignment),
    }
}

/// Run transforms plus the style's own angle and scale where no tag set them
#[must_use]
pub fn with_style_transforms(style: &Style, transforms: &TransformSet) -> TransformSet {
    let mut all = transforms.clone();
    if style.angle != 0.0 && !all.contains(TransformKind::RotateZ) {
        all.set(Transform::RotateZ(style.angle));
    }
    if style.scale_x != 100.0 && !all.contains(TransformKind::ScaleX) {
        all.set(Transform::ScaleX(style.scale_x / 100.0));
    }
    if style.scale_y != 100.0 && !all.contains(TransformKind::ScaleY) {
        all.set(Transform::ScaleY(style.scale_y / 100.0));
    }
    all
}

/// Transform origin: `\org` when given, else the alignment point of `bounds`
#[must_use]
pub fn transform_origin(alignment: Alignment, bounds: Rect, explicit: Option<(f64, f64)>) -> (f64, f64) {
    explicit.unwrap_or_else(|| {
        let x = match alignment.halign() {
            HAlign::Left => bounds.x,
            HAlign::Center => bounds.x + bounds.width / 2.0,
            HAlign::Right => bounds.right(),
        };
        let y = match alignment.valign() {
            VAlign::Top => bounds.y,
            VAlign::Middle => bounds.y + bounds.height / 2.0,
            VAlign::Bottom => bounds.bottom(),
        };
        (x, y)
    })
}

/// Border box around text bounds, grown by the box stroke
#[must_use]
pub fn box_rect(bounds: Rect, stroke_width: f64) -> Rect {
    bounds.inflate(stroke_width)
}

/// Translation placing a drawing next to the run's anchor
///
/// Top-left aligned drawings sit on the anchor itself. Otherwise the drawing
/// is pulled left by the text and drawing width (halved when centered) and
/// up by its height (halved when middle aligned), all in scaled units.
#[must_use]
pub fn shape_translation(
    alignment: Alignment,
    anchor: (f64, f64),
    text_width: f64,
    shape: Rect,
    scale: (f64, f64),
) -> (f64, f64) {
    let (mut x, mut y) = anchor;
    if alignment.value() == 7 {
        return (x, y);
    }
    let (sx, sy) = scale;
    match alignment.halign() {
        HAlign::Right => x -= sx * (text_width + shape.width),
        HAlign::Center => x -= sx * (text_width + shape.width) / 2.0,
        HAlign::Left => {}
    }
    match alignment.valign() {
        VAlign::Bottom => y -= sy * shape.height,
        VAlign::Middle => y -= sy * shape.height / 2.0,
        VAlign::Top => {}
    }
    (x, y)
}
