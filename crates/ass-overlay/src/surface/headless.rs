//! In-memory surface
//!
//! Keeps every element and resource in plain maps so tests (and hosts that
//! only want geometry) can inspect what the renderer produced. Text is
//! measured with fixed metrics: every character advances half the font
//! size plus the letter spacing, and a line is one font size tall.

use ahash::AHashMap;

use super::{Anchor, BoxPaint, ElementId, FontMetrics, GradientStop, Shadow, Surface, TextAnchor};
use crate::pipeline::{ClipRegion, Declarations, ShapeSpan, TextSpan, Transform};
use crate::utils::{Rect, ResourceId};

/// What an element draws
#[derive(Debug, Clone, PartialEq)]
pub enum ElementKind {
    /// Styled text
    Text(Vec<TextSpan>),
    /// Drawing
    Shape(ShapeSpan),
    /// Border box
    Box(Option<(Rect, BoxPaint)>),
}

/// Recorded state of one element
#[derive(Debug, Clone, PartialEq)]
pub struct ElementState {
    /// Layer it was created on
    pub layer: i32,
    /// Content
    pub kind: ElementKind,
    /// Text anchor
    pub anchor: Anchor,
    /// Transform list
    pub transforms: Vec<Transform>,
    /// Transform origin
    pub origin: (f64, f64),
    /// Compositing filters
    pub filters: Vec<Shadow>,
    /// Opacity
    pub opacity: f64,
    /// Visibility
    pub visible: bool,
    /// Applied clip region
    pub clip: Option<ResourceId>,
}

impl ElementState {
    fn new(layer: i32, kind: ElementKind) -> Self {
        Self {
            layer,
            kind,
            anchor: Anchor::default(),
            transforms: Vec::new(),
            origin: (0.0, 0.0),
            filters: Vec::new(),
            opacity: 1.0,
            visible: true,
            clip: None,
        }
    }

    /// Text spans, for text elements
    #[must_use]
    pub fn spans(&self) -> Option<&[TextSpan]> {
        match &self.kind {
            ElementKind::Text(spans) => Some(spans),
            _ => None,
        }
    }
}

/// Surface recording everything in memory
#[derive(Debug, Default)]
pub struct HeadlessSurface {
    elements: AHashMap<ElementId, ElementState>,
    gradients: AHashMap<ResourceId, Vec<GradientStop>>,
    clips: AHashMap<ResourceId, ClipRegion>,
    next_element: u64,
}

fn span_width(span: &TextSpan) -> f64 {
    let chars = span.text.chars().count() as f64;
    chars * span.decl.font_size.mul_add(0.5, span.decl.letter_spacing) + span.dx
}

impl HeadlessSurface {
    /// Create an empty surface
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded state of an element
    #[must_use]
    pub fn element(&self, element: ElementId) -> Option<&ElementState> {
        self.elements.get(&element)
    }

    /// Number of live elements
    #[must_use]
    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    /// Live elements, ordered by id
    #[must_use]
    pub fn elements(&self) -> Vec<(ElementId, &ElementState)> {
        let mut all: Vec<_> = self.elements.iter().map(|(id, state)| (*id, state)).collect();
        all.sort_by_key(|(id, _)| *id);
        all
    }

    /// Stops of a defined gradient
    #[must_use]
    pub fn gradient(&self, id: ResourceId) -> Option<&[GradientStop]> {
        self.gradients.get(&id).map(Vec::as_slice)
    }

    /// A defined clip region
    #[must_use]
    pub fn clip(&self, id: ResourceId) -> Option<&ClipRegion> {
        self.clips.get(&id)
    }

    /// Number of live gradients and clip regions
    #[must_use]
    pub fn resource_count(&self) -> usize {
        self.gradients.len() + self.clips.len()
    }

    fn insert(&mut self, layer: i32, kind: ElementKind) -> ElementId {
        self.next_element += 1;
        let id = ElementId(self.next_element);
        self.elements.insert(id, ElementState::new(layer, kind));
        id
    }

    fn with_element(&mut self, element: ElementId, update: impl FnOnce(&mut ElementState)) {
        if let Some(state) = self.elements.get_mut(&element) {
            update(state);
        } else {
            log::debug!("update of unknown element {element:?}");
        }
    }
}

impl Surface for HeadlessSurface {
    fn font_metrics(&mut self, _family: &str, size: f64) -> FontMetrics {
        FontMetrics { height: size }
    }

    fn create_text(&mut self, layer: i32, spans: &[TextSpan]) -> ElementId {
        self.insert(layer, ElementKind::Text(spans.to_vec()))
    }

    fn update_span(&mut self, element: ElementId, index: usize, decl: &Declarations) {
        self.with_element(element, |state| {
            if let ElementKind::Text(spans) = &mut state.kind {
                if let Some(span) = spans.get_mut(index) {
                    span.decl = decl.clone();
                }
            }
        });
    }

    fn create_shape(&mut self, layer: i32, shape: &ShapeSpan) -> ElementId {
        self.insert(layer, ElementKind::Shape(shape.clone()))
    }

    fn update_shape(&mut self, element: ElementId, decl: &Declarations) {
        self.with_element(element, |state| {
            if let ElementKind::Shape(shape) = &mut state.kind {
                shape.decl = decl.clone();
            }
        });
    }

    fn create_box(&mut self, layer: i32) -> ElementId {
        self.insert(layer, ElementKind::Box(None))
    }

    fn set_box(&mut self, element: ElementId, rect: Rect, paint: &BoxPaint) {
        self.with_element(element, |state| {
            state.kind = ElementKind::Box(Some((rect, paint.clone())));
        });
    }

    fn set_anchor(&mut self, element: ElementId, anchor: Anchor) {
        self.with_element(element, |state| state.anchor = anchor);
    }

    fn set_transform(&mut self, element: ElementId, transforms: &[Transform], origin: (f64, f64)) {
        self.with_element(element, |state| {
            state.transforms = transforms.to_vec();
            state.origin = origin;
        });
    }

    fn set_filters(&mut self, element: ElementId, filters: &[Shadow]) {
        self.with_element(element, |state| state.filters = filters.to_vec());
    }

    fn set_opacity(&mut self, element: ElementId, opacity: f64) {
        self.with_element(element, |state| state.opacity = opacity);
    }

    fn set_visible(&mut self, element: ElementId, visible: bool) {
        self.with_element(element, |state| state.visible = visible);
    }

    fn text_bounds(&self, element: ElementId) -> Rect {
        let Some(state) = self.elements.get(&element) else {
            return Rect::default();
        };
        let Some(spans) = state.spans() else {
            return Rect::default();
        };
        let width: f64 = spans.iter().map(span_width).sum();
        let height = spans
            .iter()
            .map(|span| span.decl.font_size)
            .fold(0.0, f64::max);
        let anchor = state.anchor;
        let x = match anchor.text_anchor {
            TextAnchor::Start => anchor.x,
            TextAnchor::Middle => anchor.x - width / 2.0,
            TextAnchor::End => anchor.x - width,
        };
        Rect::new(x, anchor.y + anchor.dy - height, width, height)
    }

    fn span_bounds(&self, element: ElementId, index: usize) -> Rect {
        let text = self.text_bounds(element);
        let Some(spans) = self.elements.get(&element).and_then(ElementState::spans) else {
            return Rect::default();
        };
        let Some(span) = spans.get(index) else {
            return Rect::default();
        };
        let before: f64 = spans[..index].iter().map(span_width).sum();
        Rect::new(
            text.x + before + span.dx,
            text.y,
            span_width(span) - span.dx,
            text.height,
        )
    }

    fn shape_bounds(&self, element: ElementId) -> Rect {
        match self.elements.get(&element).map(|state| &state.kind) {
            Some(ElementKind::Shape(shape)) => shape.bounds,
            _ => Rect::default(),
        }
    }

    fn remove(&mut self, element: ElementId) {
        self.elements.remove(&element);
    }

    fn define_clip(&mut self, id: ResourceId, clip: &ClipRegion) {
        self.clips.insert(id, clip.clone());
    }

    fn apply_clip(&mut self, element: ElementId, id: ResourceId) {
        self.with_element(element, |state| state.clip = Some(id));
    }

    fn define_gradient(&mut self, id: ResourceId, stops: &[GradientStop]) {
        self.gradients.insert(id, stops.to_vec());
    }

    fn set_gradient_stop(&mut self, id: ResourceId, index: usize, stop: GradientStop) {
        if let Some(slot) = self.gradients.get_mut(&id).and_then(|stops| stops.get_mut(index)) {
            *slot = stop;
        }
    }

    fn release(&mut self, id: ResourceId) {
        self.gradients.remove(&id);
        self.clips.remove(&id);
    }
}
