//! Rendered subtitles
//!
//! A [`Subtitle`] is one event, or one piece of a split event, together with
//! the surface elements it owns while its interval is current. Activation
//! interprets the text and creates the elements; every later frame runs the
//! update steps in a fixed order:
//!
//! 1. commit transitions collected by the previous frame
//! 2. karaoke and per-span tweens
//! 3. fade
//! 4. motion
//! 5. line-level tweens (transforms, filters, box)
//! 6. collect transitions whose window opened

use ahash::AHashMap;
use ass_script::{BorderStyle, Color, Event, Script, Style};
use log::{debug, trace};

use crate::animation::{KaraokeKind, KaraokeSegment, Lerp, Transition, TransitionQueue, Tween};
use crate::layout::positioning::{self, Margins, PlacementInput};
use crate::layout::PiecePlacement;
use crate::pipeline::{Declarations, InterpretedRun, Interpreter, LineState, RunState, Transform, TransformSet};
use crate::surface::{Anchor, BoxPaint, ElementId, GradientStop, Surface};
use crate::utils::{IdAllocator, Rect};

/// Line heights by font family and size
#[derive(Debug, Default)]
pub(crate) struct MetricsCache {
    heights: AHashMap<(String, u64), f64>,
}

impl MetricsCache {
    /// Measured line height, asking the surface once per family and size
    pub(crate) fn line_height<S: Surface>(&mut self, surface: &mut S, family: &str, size: f64) -> f64 {
        *self
            .heights
            .entry((family.to_string(), size.to_bits()))
            .or_insert_with(|| surface.font_metrics(family, size).height)
    }

    pub(crate) fn len(&self) -> usize {
        self.heights.len()
    }

    pub(crate) fn clear(&mut self) {
        self.heights.clear();
    }
}

/// Everything a subtitle needs from the renderer while it builds or updates
pub(crate) struct Scene<'a> {
    pub script: &'a Script,
    pub ids: &'a mut IdAllocator,
    pub metrics: &'a mut MetricsCache,
    pub canvas: (f64, f64),
    pub border_style: Option<BorderStyle>,
}

/// Sung and unsung colors of a sweep
#[derive(Debug, Clone, Copy, PartialEq)]
struct SweepColors {
    before: Color,
    after: Color,
}

impl Lerp for SweepColors {
    fn lerp(&self, other: &Self, t: f64) -> Self {
        Self {
            before: self.before.lerp(other.before, t as f32),
            after: self.after.lerp(other.after, t as f32),
        }
    }
}

#[derive(Debug, Clone)]
struct SweepTrack {
    colors: SweepColors,
    tween: Option<Tween<SweepColors>>,
}

impl SweepTrack {
    fn colors_at(&mut self, t_ms: f64) -> SweepColors {
        let Some(tween) = &self.tween else {
            return self.colors;
        };
        let colors = tween.value_at(t_ms);
        if tween.finished(t_ms) {
            self.tween = None;
        }
        colors
    }
}

fn tween<T>(transition: &Transition, from: T, to: T) -> Tween<T> {
    Tween {
        from,
        to,
        start_ms: transition.start_ms,
        duration_ms: transition.duration_ms(),
        easing: transition.easing(),
    }
}

/// Styling of one span or shape as committed, animated and displayed
#[derive(Debug, Clone)]
struct Styled {
    style: Style,
    decl: Declarations,
    tween: Option<Tween<Declarations>>,
    shown: Declarations,
}

impl Styled {
    fn new(style: Style, decl: Declarations) -> Self {
        Self {
            style,
            shown: decl.clone(),
            decl,
            tween: None,
        }
    }

    fn current(&self, t_ms: f64) -> Declarations {
        self.tween
            .as_ref()
            .map_or_else(|| self.decl.clone(), |tween| tween.value_at(t_ms))
    }

    /// Declarations to display at `t_ms`, if they differ from the last frame
    fn frame(&mut self, t_ms: f64, karaoke: &[KaraokeSegment]) -> Option<Declarations> {
        let mut current = self.current(t_ms);
        if self.tween.as_ref().is_some_and(|tween| tween.finished(t_ms)) {
            self.tween = None;
        }
        if let Some(segment) = current.karaoke.and_then(|index| karaoke.get(index)) {
            current = segment.displayed(&current, t_ms);
        }
        if current == self.shown {
            return None;
        }
        self.shown = current.clone();
        Some(current)
    }
}

#[derive(Debug, Clone)]
struct ShapeElement {
    element: ElementId,
    styled: Styled,
}

/// Surface state of an active subtitle
#[derive(Debug)]
struct Live {
    state: RunState,
    text: ElementId,
    border_box: Option<ElementId>,
    spans: Vec<Styled>,
    shapes: Vec<ShapeElement>,
    sweeps: Vec<SweepTrack>,
    queue: TransitionQueue,
    transforms: Option<Tween<TransformSet>>,
    line: Option<Tween<LineState>>,
    /// Anchor from alignment, margins and position alone
    home: Anchor,
    /// Anchor actually applied, moved by realignment
    anchor: Anchor,
    /// Where the line sits without `\pos`
    natural: (f64, f64),
    line_height: f64,
    /// Advance left by a trailing drawing
    trailing: f64,
    opacity: f64,
}

impl Live {
    fn elements(&self) -> impl Iterator<Item = ElementId> + '_ {
        self.border_box
            .into_iter()
            .chain(core::iter::once(self.text))
            .chain(self.shapes.iter().map(|shape| shape.element))
    }

    fn current_transforms(&self, t_ms: f64) -> TransformSet {
        self.transforms
            .as_ref()
            .map_or_else(|| self.state.transforms.clone(), |tween| tween.value_at(t_ms))
    }

    fn current_line(&self, t_ms: f64) -> LineState {
        self.line
            .as_ref()
            .map_or_else(|| self.state.line.clone(), |tween| tween.value_at(t_ms))
    }

    /// Anchor the text again from alignment, margins and position
    fn reposition<S: Surface>(&mut self, margins: Margins, scene: &mut Scene<'_>, surface: &mut S) {
        let style = &self.state.style;
        self.line_height = scene
            .metrics
            .line_height(surface, &style.font_name, style.font_size);
        let input = PlacementInput {
            alignment: style.alignment,
            position: self.state.position,
            margins,
            canvas: scene.canvas,
            line_height: self.line_height,
        };
        self.home = positioning::anchor(&input);
        let natural = positioning::anchor(&PlacementInput {
            position: None,
            ..input
        });
        self.natural = (natural.x, natural.y);
        self.anchor = self.home;
        surface.set_anchor(self.text, self.anchor);
        self.state.reposition = false;
    }

    /// Push transforms, box geometry and drawing placement to the surface
    fn refresh<S: Surface>(&self, surface: &mut S) {
        let style = &self.state.style;
        let alignment = style.alignment;
        let transforms = positioning::with_style_transforms(style, &self.state.transforms);
        let bounds = surface.text_bounds(self.text);
        let origin = positioning::transform_origin(alignment, bounds, self.state.origin);
        surface.set_transform(self.text, transforms.as_slice(), origin);

        if let (Some(element), Some(paint)) = (self.border_box, &self.state.line.border_box) {
            surface.set_box(element, positioning::box_rect(bounds, paint.stroke_width), paint);
            surface.set_transform(element, transforms.as_slice(), origin);
        }

        let scale = (style.scale_x / 100.0, style.scale_y / 100.0);
        for shape in &self.shapes {
            let rect = surface.shape_bounds(shape.element);
            let (x, y) = positioning::shape_translation(
                alignment,
                (self.anchor.x, self.anchor.y),
                bounds.width,
                rect,
                scale,
            );
            let mut list = Vec::with_capacity(transforms.as_slice().len() + 1);
            list.push(Transform::Translate {
                x,
                y: y + self.state.path_offset.1,
            });
            list.extend_from_slice(transforms.as_slice());
            surface.set_transform(shape.element, &list, origin);
        }
    }

    fn apply_filters<S: Surface>(&self, surface: &mut S) {
        surface.set_filters(self.text, &self.state.line.filters);
        for shape in &self.shapes {
            surface.set_filters(shape.element, &self.state.line.shape_filters);
        }
    }

    fn restyle<S: Surface>(&mut self, t_ms: f64, surface: &mut S) {
        let karaoke = &self.state.karaoke;
        for (index, span) in self.spans.iter_mut().enumerate() {
            if let Some(shown) = span.frame(t_ms, karaoke) {
                surface.update_span(self.text, index, &shown);
            }
        }
        for shape in &mut self.shapes {
            if let Some(shown) = shape.styled.frame(t_ms, karaoke) {
                surface.update_shape(shape.element, &shown);
            }
        }
    }

    /// Move every sweep boundary to `t_ms`
    fn sweep<S: Surface>(&mut self, t_ms: f64, surface: &mut S) {
        let text = surface.text_bounds(self.text);
        if text.width <= 0.0 {
            return;
        }
        for (index, segment) in self.state.karaoke.iter().enumerate() {
            let Some(gradient) = segment.gradient() else {
                continue;
            };
            let extent = self
                .spans
                .iter()
                .enumerate()
                .filter(|(_, span)| span.decl.karaoke == Some(index))
                .map(|(i, _)| surface.span_bounds(self.text, i))
                .reduce(|a, b| a.union(&b));
            let (Some(extent), Some(track)) = (extent, self.sweeps.get_mut(index)) else {
                continue;
            };
            let start_frac = (extent.x - text.x) / text.width;
            let frac = extent.width / text.width;
            let offset = segment.sweep_offset(t_ms, start_frac, frac);
            let colors = track.colors_at(t_ms);
            surface.set_gradient_stop(
                gradient,
                0,
                GradientStop {
                    offset,
                    color: colors.after,
                },
            );
            surface.set_gradient_stop(
                gradient,
                1,
                GradientStop {
                    offset,
                    color: colors.before,
                },
            );
        }
    }

    fn fade<S: Surface>(&mut self, t_ms: f64, surface: &mut S) {
        let Some(fade) = self.state.fade else {
            return;
        };
        let opacity = fade.opacity_at(t_ms);
        if (opacity - self.opacity).abs() < f64::EPSILON {
            return;
        }
        self.opacity = opacity;
        for element in self.elements() {
            surface.set_opacity(element, opacity);
        }
    }

    /// Commit one transition
    ///
    /// Every span in the transition's scope re-applies the payload to its
    /// own style and tweens towards the result. The payload is applied once
    /// more to the line state for transforms, filters, box and clip.
    fn commit<S: Surface>(
        &mut self,
        transition: &Transition,
        t_ms: f64,
        duration_ms: f64,
        scene: &mut Scene<'_>,
        surface: &mut S,
    ) {
        trace!("committing transition {} at {t_ms}ms", transition.id);
        let mut interpreter =
            Interpreter::new(scene.script, scene.ids, duration_ms).with_border_style(scene.border_style);

        let scoped = self
            .spans
            .iter_mut()
            .chain(self.shapes.iter_mut().map(|shape| &mut shape.styled))
            .filter(|styled| styled.decl.scopes.contains(&transition.id));
        for styled in scoped {
            let mut scratch = self.state.clone();
            scratch.style = styled.style.clone();
            scratch.decl = styled.decl.clone();
            interpreter.apply_block(&transition.payload, &mut scratch);
            interpreter.update_line(&mut scratch);

            let mut to = scratch.decl;
            to.karaoke = styled.decl.karaoke;
            to.scopes = styled.decl.scopes.clone();
            to.markers = styled.decl.markers.clone();

            if let Some(index) = styled.decl.karaoke {
                let target = SweepColors {
                    before: scratch.style.secondary,
                    after: scratch.style.primary,
                };
                let changed = styled.style.primary != scratch.style.primary
                    || styled.style.secondary != scratch.style.secondary;
                match (self.state.karaoke.get_mut(index), self.sweeps.get_mut(index)) {
                    (Some(segment), Some(track)) if changed => {
                        if segment.gradient().is_some() {
                            let from = track.colors_at(t_ms);
                            track.tween = Some(tween(transition, from, target));
                            track.colors = target;
                        } else {
                            segment.before = target.before;
                            segment.after = target.after;
                        }
                    }
                    _ => {}
                }
            }

            let from = styled.current(t_ms);
            styled.style = scratch.style;
            styled.decl = to.clone();
            styled.tween = Some(tween(transition, from, to));
        }

        let from_transforms = self.current_transforms(t_ms);
        let from_line = self.current_line(t_ms);
        let old_clip = self.state.clip.clone();
        self.state.transforms = from_transforms.clone();
        self.state.line = from_line.clone();
        interpreter.apply_block(&transition.payload, &mut self.state);
        interpreter.update_line(&mut self.state);
        self.state.transitions.clear();

        if self.state.transforms != from_transforms {
            self.transforms = Some(tween(transition, from_transforms, self.state.transforms.clone()));
        }
        if self.state.line != from_line {
            self.line = Some(tween(transition, from_line, self.state.line.clone()));
        }
        if self.state.clip != old_clip {
            if let Some(old) = &old_clip {
                surface.release(old.id);
            }
            if let Some(clip) = &self.state.clip {
                surface.define_clip(clip.id, clip);
                for element in self.elements() {
                    surface.apply_clip(element, clip.id);
                }
            }
        }
    }
}

/// One event, or one piece of a split event
#[derive(Debug)]
pub struct Subtitle {
    event: usize,
    piece: usize,
    layer: i32,
    start: f64,
    end: f64,
    style: String,
    text: String,
    margins: Margins,
    live: Option<Live>,
    moved: bool,
}

impl Subtitle {
    /// Subtitle for prepared `text` of `event`
    #[must_use]
    pub fn new(index: usize, piece: usize, event: &Event, text: String, margins: Margins) -> Self {
        Self {
            event: index,
            piece,
            layer: event.layer,
            start: event.start,
            end: event.end,
            style: event.style.clone(),
            text,
            margins,
            live: None,
            moved: false,
        }
    }

    /// Index of the source event
    #[must_use]
    pub const fn event(&self) -> usize {
        self.event
    }

    /// Piece number within a split event
    #[must_use]
    pub const fn piece(&self) -> usize {
        self.piece
    }

    /// Prepared text
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Interval in seconds
    #[must_use]
    pub const fn interval(&self) -> (f64, f64) {
        (self.start, self.end)
    }

    /// Whether `time` (seconds) lies inside the interval, bounds included
    #[must_use]
    pub fn is_current(&self, time: f64) -> bool {
        self.start <= time && time <= self.end
    }

    /// Whether the subtitle currently owns surface elements
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.live.is_some()
    }

    /// Text element, while active
    #[must_use]
    pub fn text_element(&self) -> Option<ElementId> {
        self.live.as_ref().map(|live| live.text)
    }

    /// Border box element, while active
    #[must_use]
    pub fn box_element(&self) -> Option<ElementId> {
        self.live.as_ref().and_then(|live| live.border_box)
    }

    /// Drawing elements, while active
    #[must_use]
    pub fn shape_elements(&self) -> Vec<ElementId> {
        self.live
            .as_ref()
            .map(|live| live.shapes.iter().map(|shape| shape.element).collect())
            .unwrap_or_default()
    }

    /// Interpretation state, while active
    #[must_use]
    pub fn state(&self) -> Option<&RunState> {
        self.live.as_ref().map(|live| &live.state)
    }

    /// Whether the geometry changed since the last realignment
    #[must_use]
    pub const fn moved(&self) -> bool {
        self.moved
    }

    pub(crate) fn clear_moved(&mut self) {
        self.moved = false;
    }

    fn duration_ms(&self) -> f64 {
        (self.end - self.start) * 1000.0
    }

    /// Interpret the text and create the surface elements
    pub(crate) fn activate<S: Surface>(&mut self, scene: &mut Scene<'_>, surface: &mut S) {
        if self.live.is_some() {
            return;
        }
        let style = scene.script.style(&self.style).clone();
        let run = Interpreter::new(scene.script, scene.ids, self.duration_ms())
            .with_border_style(scene.border_style)
            .interpret(&self.text, &style);
        let InterpretedRun {
            spans,
            span_styles,
            shapes,
            shape_styles,
            mut state,
        } = run;

        let border_box = state
            .line
            .border_box
            .as_ref()
            .map(|_| surface.create_box(self.layer));
        let text = surface.create_text(self.layer, &spans);
        let shapes: Vec<ShapeElement> = shapes
            .into_iter()
            .zip(shape_styles)
            .map(|(shape, style)| ShapeElement {
                element: surface.create_shape(self.layer, &shape),
                styled: Styled::new(style, shape.decl),
            })
            .collect();
        let spans: Vec<Styled> = spans
            .into_iter()
            .zip(span_styles)
            .map(|(span, style)| Styled::new(style, span.decl))
            .collect();

        let sweeps = state
            .karaoke
            .iter()
            .map(|segment| SweepTrack {
                colors: SweepColors {
                    before: segment.before,
                    after: segment.after,
                },
                tween: None,
            })
            .collect();
        for segment in &state.karaoke {
            if let KaraokeKind::Sweep { gradient } = segment.kind {
                surface.define_gradient(
                    gradient,
                    &[
                        GradientStop {
                            offset: 0.0,
                            color: segment.after,
                        },
                        GradientStop {
                            offset: 0.0,
                            color: segment.before,
                        },
                    ],
                );
            }
        }

        let mut queue = TransitionQueue::new();
        for transition in state.transitions.drain(..) {
            queue.schedule(transition);
        }
        state.reposition = true;
        let trailing = state.path_offset.0;

        let mut live = Live {
            state,
            text,
            border_box,
            spans,
            shapes,
            sweeps,
            queue,
            transforms: None,
            line: None,
            home: Anchor::default(),
            anchor: Anchor::default(),
            natural: (0.0, 0.0),
            line_height: 0.0,
            trailing,
            opacity: 1.0,
        };

        if let Some(clip) = &live.state.clip {
            surface.define_clip(clip.id, clip);
            for element in live.elements() {
                surface.apply_clip(element, clip.id);
            }
        }
        live.apply_filters(surface);
        live.reposition(self.margins, scene, surface);
        live.refresh(surface);

        debug!(
            "activated event {} piece {} with {} spans, {} shapes",
            self.event,
            self.piece,
            live.spans.len(),
            live.shapes.len()
        );
        self.live = Some(live);
        self.moved = true;
    }

    /// Advance to `t_ms` milliseconds after the subtitle's start
    pub(crate) fn update<S: Surface>(&mut self, t_ms: f64, scene: &mut Scene<'_>, surface: &mut S) {
        let duration_ms = self.duration_ms();
        let margins = self.margins;
        let Some(live) = self.live.as_mut() else {
            return;
        };

        let mut dirty = false;
        for transition in live.queue.take_due() {
            live.commit(&transition, t_ms, duration_ms, scene, surface);
            dirty = true;
        }

        live.restyle(t_ms, surface);
        live.sweep(t_ms, surface);
        live.fade(t_ms, surface);

        if let Some(motion) = live.state.motion {
            let position = motion.position_at(t_ms, live.natural);
            if live.state.position != Some(position) {
                live.state.position = Some(position);
                live.state.reposition = true;
            }
        }

        if let Some(tween) = &live.transforms {
            let finished = tween.finished(t_ms);
            live.state.transforms = tween.value_at(t_ms);
            if finished {
                live.transforms = None;
            }
            dirty = true;
        }
        if let Some(tween) = &live.line {
            let finished = tween.finished(t_ms);
            live.state.line = tween.value_at(t_ms);
            if finished {
                live.line = None;
            }
            live.apply_filters(surface);
            dirty = true;
        }

        if live.state.reposition {
            live.reposition(margins, scene, surface);
            dirty = true;
        }
        if dirty {
            live.refresh(surface);
            self.moved = true;
        }

        live.queue.collect_due(t_ms);
    }

    /// Destroy the surface elements and release generated resources
    pub(crate) fn deactivate<S: Surface>(&mut self, surface: &mut S) {
        let Some(live) = self.live.take() else {
            return;
        };
        for element in live.elements() {
            surface.remove(element);
        }
        for gradient in live.state.karaoke.iter().filter_map(KaraokeSegment::gradient) {
            surface.release(gradient);
        }
        if let Some(clip) = &live.state.clip {
            surface.release(clip.id);
        }
        self.moved = false;
        trace!("deactivated event {} piece {}", self.event, self.piece);
    }

    /// Anchor and size as laid out alone, for realignment
    pub(crate) fn placement<S: Surface>(&self, surface: &S) -> Option<PiecePlacement> {
        let live = self.live.as_ref()?;
        let bounds = surface.text_bounds(live.text);
        let height = if bounds.height > 0.0 {
            bounds.height
        } else {
            live.line_height
        };
        Some(PiecePlacement {
            x: live.home.x,
            y: live.home.y,
            width: bounds.width + live.trailing,
            height,
        })
    }

    /// Move the anchor to a realigned position
    pub(crate) fn place_at<S: Surface>(&mut self, x: f64, y: f64, surface: &mut S) {
        let Some(live) = self.live.as_mut() else {
            return;
        };
        live.anchor.x = x;
        live.anchor.y = y;
        surface.set_anchor(live.text, live.anchor);
        live.refresh(surface);
    }

    /// Untransformed text bounds, while active
    pub(crate) fn text_bounds<S: Surface>(&self, surface: &S) -> Option<Rect> {
        self.live.as_ref().map(|live| surface.text_bounds(live.text))
    }

    /// Border box element and its paint, while active
    pub(crate) fn border_box(&self) -> Option<(ElementId, &BoxPaint)> {
        let live = self.live.as_ref()?;
        Some((live.border_box?, live.state.line.border_box.as_ref()?))
    }

    /// Effective alignment and justification, while active
    pub(crate) fn alignment(&self) -> Option<(ass_script::Alignment, u8)> {
        self.live
            .as_ref()
            .map(|live| (live.state.style.alignment, live.state.style.justify))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::HeadlessSurface;

    const SCRIPT: &str = "[Script Info]
PlayResX: 640
PlayResY: 480

[V4+ Styles]
Format: Name, Fontname, Fontsize, PrimaryColour, SecondaryColour, OutlineColour, BackColour, Bold, Italic, Underline, StrikeOut, ScaleX, ScaleY, Spacing, Angle, BorderStyle, Outline, Shadow, Alignment, MarginL, MarginR, MarginV, Encoding
Style: Default,Arial,20,&H00FFFFFF,&H000000FF,&H00000000,&H00000000,0,0,0,0,100,100,0,0,1,0,0,2,10,10,20,1

[Events]
Format: Layer, Start, End, Style, Name, MarginL, MarginR, MarginV, Effect, Text
Dialogue: 0,0:00:00.00,0:00:02.00,Default,,0,0,0,,placeholder
";

    struct Fixture {
        script: Script,
        ids: IdAllocator,
        metrics: MetricsCache,
        surface: HeadlessSurface,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                script: Script::parse(SCRIPT),
                ids: IdAllocator::new(),
                metrics: MetricsCache::default(),
                surface: HeadlessSurface::new(),
            }
        }

        fn subtitle(&self, text: &str) -> Subtitle {
            let event = &self.script.events()[0];
            Subtitle::new(0, 0, event, text.to_string(), Margins::resolve(self.script.style("Default"), event))
        }

        fn activate(&mut self, subtitle: &mut Subtitle) {
            let mut scene = Scene {
                script: &self.script,
                ids: &mut self.ids,
                metrics: &mut self.metrics,
                canvas: (640.0, 480.0),
                border_style: None,
            };
            subtitle.activate(&mut scene, &mut self.surface);
        }

        fn update(&mut self, subtitle: &mut Subtitle, t_ms: f64) {
            let mut scene = Scene {
                script: &self.script,
                ids: &mut self.ids,
                metrics: &mut self.metrics,
                canvas: (640.0, 480.0),
                border_style: None,
            };
            subtitle.update(t_ms, &mut scene, &mut self.surface);
        }
    }

    #[test]
    fn activation_anchors_bottom_center() {
        let mut fixture = Fixture::new();
        let mut subtitle = fixture.subtitle("{}Hello");
        fixture.activate(&mut subtitle);
        let element = subtitle.text_element().expect("text");
        let anchor = fixture.surface.element(element).expect("element").anchor;
        assert!((anchor.x - 320.0).abs() < 1e-9);
        assert!((anchor.y - 460.0).abs() < 1e-9);
        assert!(subtitle.moved());
    }

    #[test]
    fn transition_commits_one_frame_late() {
        let mut fixture = Fixture::new();
        let mut subtitle = fixture.subtitle("{\\t(0,1000,\\fs40)}Hi");
        fixture.activate(&mut subtitle);
        let element = subtitle.text_element().expect("text");
        let size = |fixture: &Fixture| fixture.surface.element(element).expect("element").spans().expect("spans")[0]
            .decl
            .font_size;

        fixture.update(&mut subtitle, 0.0);
        assert!((size(&fixture) - 20.0).abs() < 1e-9);

        fixture.update(&mut subtitle, 500.0);
        assert!((size(&fixture) - 30.0).abs() < 1e-9);

        fixture.update(&mut subtitle, 1000.0);
        assert!((size(&fixture) - 40.0).abs() < 1e-9);
    }

    #[test]
    fn transforms_tween_on_the_line() {
        let mut fixture = Fixture::new();
        let mut subtitle = fixture.subtitle("{\\t(0,100,\\frz90)}Hi");
        fixture.activate(&mut subtitle);
        fixture.update(&mut subtitle, 0.0);
        fixture.update(&mut subtitle, 50.0);
        let element = subtitle.text_element().expect("text");
        let transforms = &fixture.surface.element(element).expect("element").transforms;
        assert_eq!(transforms.as_slice(), &[Transform::RotateZ(45.0)]);
    }

    #[test]
    fn fade_sets_opacity() {
        let mut fixture = Fixture::new();
        let mut subtitle = fixture.subtitle("{\\fad(1000,0)}Hi");
        fixture.activate(&mut subtitle);
        fixture.update(&mut subtitle, 500.0);
        let element = subtitle.text_element().expect("text");
        assert!((fixture.surface.element(element).expect("element").opacity - 0.5).abs() < 1e-9);
    }

    #[test]
    fn motion_moves_the_anchor() {
        let mut fixture = Fixture::new();
        let mut subtitle = fixture.subtitle("{\\move(0,0,100,200)}Hi");
        fixture.activate(&mut subtitle);
        fixture.update(&mut subtitle, 1000.0);
        let element = subtitle.text_element().expect("text");
        let anchor = fixture.surface.element(element).expect("element").anchor;
        assert!((anchor.x - 50.0).abs() < 1e-9);
        assert!((anchor.y - 100.0).abs() < 1e-9);
    }

    #[test]
    fn discrete_karaoke_switches_color() {
        let mut fixture = Fixture::new();
        let mut subtitle = fixture.subtitle("{\\k50}Ka{\\k50}ra");
        fixture.activate(&mut subtitle);
        let element = subtitle.text_element().expect("text");
        let fill = |fixture: &Fixture, index: usize| {
            fixture.surface.element(element).expect("element").spans().expect("spans")[index]
                .decl
                .fill
        };

        fixture.update(&mut subtitle, 100.0);
        assert_eq!(fill(&fixture, 0), crate::pipeline::Paint::Solid(Color::WHITE));
        assert_eq!(fill(&fixture, 1), crate::pipeline::Paint::Solid(Color::opaque(255, 0, 0)));

        fixture.update(&mut subtitle, 600.0);
        assert_eq!(fill(&fixture, 1), crate::pipeline::Paint::Solid(Color::WHITE));
    }

    #[test]
    fn sweep_gradient_follows_the_clock() {
        let mut fixture = Fixture::new();
        let mut subtitle = fixture.subtitle("{\\kf100}ab{\\kf100}cd");
        fixture.activate(&mut subtitle);
        let gradients: Vec<_> = subtitle
            .state()
            .expect("state")
            .karaoke
            .iter()
            .filter_map(KaraokeSegment::gradient)
            .collect();
        assert_eq!(gradients.len(), 2);

        fixture.update(&mut subtitle, 500.0);
        let first = fixture.surface.gradient(gradients[0]).expect("gradient");
        assert!((first[0].offset - 0.25).abs() < 1e-9);
        let second = fixture.surface.gradient(gradients[1]).expect("gradient");
        assert!((second[0].offset - 0.5).abs() < 1e-9);
    }

    #[test]
    fn deactivation_releases_everything() {
        let mut fixture = Fixture::new();
        let mut subtitle = fixture.subtitle("{\\clip(0,0,10,10)\\kf10}a{\\p1}m 0 0 l 1 1");
        fixture.activate(&mut subtitle);
        assert!(fixture.surface.element_count() >= 2);
        assert!(fixture.surface.resource_count() >= 2);
        subtitle.deactivate(&mut fixture.surface);
        assert!(!subtitle.is_active());
        assert_eq!(fixture.surface.element_count(), 0);
        assert_eq!(fixture.surface.resource_count(), 0);
    }
}
