//! Subtitle renderer
//!
//! [`Renderer`] owns the load lifecycle and the frame loop. The host drives
//! it with [`Renderer::tick`] once per display refresh and performs the
//! source fetches it asks for.

pub mod context;
pub mod lifecycle;
pub mod subtitle;

pub use context::RenderContext;
pub use lifecycle::{LoadRequest, LoadState, LoadTicket};
pub use subtitle::Subtitle;

use std::collections::VecDeque;

use ass_script::Script;
use log::{debug, info};

use crate::layout::{self, positioning, Margins, SplitLine};
use crate::pipeline::preprocess;
use crate::surface::Surface;
use crate::utils::{IdAllocator, OverlayError};
use lifecycle::{Completion, Lifecycle, LoadTask};
use subtitle::{MetricsCache, Scene};

/// Source name used by [`Renderer::load_str`]
const INLINE_SOURCE: &str = "inline";

/// What one [`Renderer::tick`] did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickOutcome {
    /// A fetch the host must start (after a canceled load)
    pub request: Option<LoadRequest>,
    /// The frame was too close to the previous one
    pub skipped: bool,
    /// Subtitles that became visible
    pub activated: usize,
    /// Subtitles advanced
    pub updated: usize,
    /// Subtitles that expired
    pub deactivated: usize,
    /// Split lines put back together
    pub realigned: usize,
}

/// Subtitle renderer for one video
#[derive(Debug)]
pub struct Renderer {
    context: RenderContext,
    lifecycle: Lifecycle,
    ids: IdAllocator,
    metrics: MetricsCache,
    script: Option<Script>,
    subtitles: Vec<Subtitle>,
    split_lines: Vec<SplitLine>,
    tasks: VecDeque<LoadTask>,
    canvas: (f64, f64),
    speed: f64,
    script_offset: f64,
    wrap_style: u8,
    paused: bool,
    last_time: Option<f64>,
}

impl Renderer {
    /// Create a renderer without a source
    #[must_use]
    pub fn new(context: RenderContext) -> Self {
        let (width, height) = context.video_size();
        Self {
            context,
            lifecycle: Lifecycle::new(),
            ids: IdAllocator::new(),
            metrics: MetricsCache::default(),
            script: None,
            subtitles: Vec::new(),
            split_lines: Vec::new(),
            tasks: VecDeque::new(),
            canvas: (f64::from(width), f64::from(height)),
            speed: 1.0,
            script_offset: 0.0,
            wrap_style: 2,
            paused: false,
            last_time: None,
        }
    }

    /// Renderer configuration
    #[must_use]
    pub const fn context(&self) -> &RenderContext {
        &self.context
    }

    /// Load state
    #[must_use]
    pub const fn state(&self) -> LoadState {
        self.lifecycle.state()
    }

    /// Error of the last failed fetch
    #[must_use]
    pub const fn last_error(&self) -> Option<&OverlayError> {
        self.lifecycle.last_error()
    }

    /// Loaded script
    #[must_use]
    pub const fn script(&self) -> Option<&Script> {
        self.script.as_ref()
    }

    /// Built subtitles, split pieces included
    #[must_use]
    pub fn subtitles(&self) -> &[Subtitle] {
        &self.subtitles
    }

    /// Split lines and where their pieces live in [`subtitles`](Self::subtitles)
    #[must_use]
    pub fn split_lines(&self) -> &[SplitLine] {
        &self.split_lines
    }

    /// Script canvas size
    #[must_use]
    pub const fn canvas(&self) -> (f64, f64) {
        self.canvas
    }

    /// Load tasks not yet processed
    #[must_use]
    pub fn pending_tasks(&self) -> usize {
        self.tasks.len()
    }

    /// Replace the subtitle source
    ///
    /// Rendered subtitles are torn down; a load in flight is canceled and
    /// restarts once its fetch is answered. Call [`init`](Self::init) to
    /// load an idle renderer.
    pub fn set_source<S: Surface>(&mut self, source: impl Into<String>, surface: &mut S) {
        let source = source.into();
        debug!("subtitle source set to {source}");
        self.lifecycle.set_source(source);
        if self.lifecycle.state() == LoadState::Uninitialized {
            self.teardown(surface);
        }
    }

    /// Start loading the current source
    ///
    /// Returns the fetch the host must perform. Calling this while a load
    /// is running cancels it instead.
    pub fn init(&mut self) -> Option<LoadRequest> {
        self.lifecycle.begin()
    }

    /// Answer a fetch
    ///
    /// Stale tickets are ignored. A failed fetch moves the renderer to
    /// [`LoadState::Failed`]. When the source changed while the fetch was
    /// running, the result is discarded and a new fetch is returned.
    pub fn complete_load<S: Surface>(
        &mut self,
        ticket: LoadTicket,
        result: Result<String, OverlayError>,
        surface: &mut S,
    ) -> Option<LoadRequest> {
        match self.lifecycle.complete(ticket) {
            Completion::Stale => None,
            Completion::Restart => self.lifecycle.begin(),
            Completion::Proceed => {
                match result {
                    Ok(document) => self.accept(&document, surface),
                    Err(error) => self.lifecycle.fail(error),
                }
                None
            }
        }
    }

    /// Load a document directly, without a host fetch
    ///
    /// Builds every subtitle before returning.
    ///
    /// # Errors
    ///
    /// Returns [`OverlayError::InvalidState`] if the load did not end
    /// [`LoadState::Initialized`].
    pub fn load_str<S: Surface>(&mut self, document: &str, surface: &mut S) -> Result<(), OverlayError> {
        self.clean(surface);
        self.lifecycle.set_source(INLINE_SOURCE.to_string());
        let request = self
            .lifecycle
            .begin()
            .ok_or_else(|| OverlayError::InvalidState("load could not start".to_string()))?;
        self.complete_load(request.ticket, Ok(document.to_string()), surface);
        while !self.tasks.is_empty() {
            self.run_load_tasks(surface);
        }
        match self.lifecycle.state() {
            LoadState::Initialized => Ok(()),
            state => Err(OverlayError::InvalidState(format!("load ended in {state:?}"))),
        }
    }

    /// Stop advancing subtitles
    pub fn pause(&mut self) {
        self.paused = true;
    }

    /// Continue advancing subtitles
    ///
    /// An idle renderer starts loading; the fetch is returned.
    pub fn resume(&mut self) -> Option<LoadRequest> {
        self.paused = false;
        self.last_time = None;
        if self.lifecycle.state() == LoadState::Uninitialized {
            return self.init();
        }
        None
    }

    /// Whether the frame loop is advancing
    #[must_use]
    pub const fn running(&self) -> bool {
        !self.paused
    }

    /// Force a border style on every line (0 restores the styles' own)
    ///
    /// Visible subtitles are rebuilt on the next tick.
    pub fn set_border_style<S: Surface>(&mut self, code: i32, surface: &mut S) {
        self.context.set_border_style(code);
        for subtitle in &mut self.subtitles {
            subtitle.deactivate(surface);
        }
        self.last_time = None;
    }

    /// Destroy every rendered subtitle and return to [`LoadState::Uninitialized`]
    pub fn clean<S: Surface>(&mut self, surface: &mut S) {
        self.teardown(surface);
        self.script = None;
        self.lifecycle.reset();
    }

    /// Advance to `video_time` seconds
    ///
    /// Pending load work runs first, within the context's build budget.
    /// Nothing else happens while paused or not loaded.
    pub fn tick<S: Surface>(&mut self, video_time: f64, surface: &mut S) -> TickOutcome {
        let mut outcome = TickOutcome {
            request: self.run_load_tasks(surface),
            ..TickOutcome::default()
        };
        if self.paused || self.lifecycle.state() != LoadState::Initialized {
            return outcome;
        }
        let Some(script) = self.script.as_ref() else {
            return outcome;
        };

        let time = video_time.mul_add(self.speed, self.script_offset) + self.context.time_offset();
        if self
            .last_time
            .is_some_and(|last| (time - last).abs() < self.context.frame_epsilon())
        {
            outcome.skipped = true;
            return outcome;
        }
        self.last_time = Some(time);

        let mut scene = Scene {
            script,
            ids: &mut self.ids,
            metrics: &mut self.metrics,
            canvas: self.canvas,
            border_style: self.context.border_style(),
        };
        for subtitle in &mut self.subtitles {
            if subtitle.is_current(time) {
                if !subtitle.is_active() {
                    subtitle.activate(&mut scene, surface);
                    outcome.activated += 1;
                }
                let t_ms = (time - subtitle.interval().0) * 1000.0;
                subtitle.update(t_ms, &mut scene, surface);
                outcome.updated += 1;
            } else if subtitle.is_active() {
                subtitle.deactivate(surface);
                outcome.deactivated += 1;
            }
        }

        outcome.realigned = self.realign(surface);
        outcome
    }

    /// Replace the script with a freshly fetched document and queue the build
    fn accept<S: Surface>(&mut self, document: &str, surface: &mut S) {
        self.teardown(surface);
        let script = Script::parse(document);
        info!(
            "loaded script: {} styles, {} events, {} issues",
            script.styles().len(),
            script.events().len(),
            script.issues().len()
        );
        self.tasks.push_back(LoadTask::ApplyHeader);
        self.tasks.push_back(LoadTask::BuildStyles);
        self.tasks
            .extend((0..script.events().len()).map(LoadTask::BuildSubtitle));
        self.tasks.push_back(LoadTask::Finish);
        self.script = Some(script);
    }

    /// Process queued load work within the build budget
    fn run_load_tasks<S: Surface>(&mut self, surface: &mut S) -> Option<LoadRequest> {
        for _ in 0..self.context.build_budget() {
            let task = self.tasks.pop_front()?;
            if self.lifecycle.is_canceling() {
                debug!("load canceled with {} tasks left", self.tasks.len() + 1);
                self.teardown(surface);
                self.lifecycle.finish();
                return self.lifecycle.begin();
            }
            match task {
                LoadTask::ApplyHeader => self.apply_header(),
                LoadTask::BuildStyles => self.build_styles(surface),
                LoadTask::BuildSubtitle(index) => self.build_subtitle(index),
                LoadTask::Finish => {
                    self.lifecycle.finish();
                    info!(
                        "built {} subtitles ({} split lines)",
                        self.subtitles.len(),
                        self.split_lines.len()
                    );
                }
            }
        }
        None
    }

    fn apply_header(&mut self) {
        let Some(script) = &self.script else {
            return;
        };
        let info = script.info();
        let (width, height) = info.resolution_or(self.context.video_size());
        self.canvas = (f64::from(width), f64::from(height));
        self.speed = info.playback_speed();
        self.script_offset = info.time_offset();
        self.wrap_style = info.wrap_style();
        debug!(
            "canvas {}x{}, speed {}, offset {}s, wrap style {}",
            width, height, self.speed, self.script_offset, self.wrap_style
        );
    }

    fn build_styles<S: Surface>(&mut self, surface: &mut S) {
        let Some(script) = &self.script else {
            return;
        };
        for style in script.styles() {
            self.metrics
                .line_height(surface, &style.font_name, style.font_size);
        }
        debug!("measured {} fonts", self.metrics.len());
    }

    fn build_subtitle(&mut self, index: usize) {
        let Some(script) = &self.script else {
            return;
        };
        let Some(event) = script.events().get(index) else {
            return;
        };
        let text = preprocess::prepare(&event.text, self.wrap_style);
        let margins = Margins::resolve(script.style(&event.style), event);
        match layout::split(&text) {
            Some(split) => {
                let first = self.subtitles.len();
                let pieces = split.pieces.len();
                for (piece, text) in split.pieces.into_iter().enumerate() {
                    self.subtitles
                        .push(Subtitle::new(index, piece, event, text, margins));
                }
                self.split_lines.push(SplitLine {
                    first,
                    pieces,
                    breaks: split.breaks,
                });
            }
            None => self
                .subtitles
                .push(Subtitle::new(index, 0, event, text, margins)),
        }
    }

    /// Destroy rendered subtitles and forget built ones
    fn teardown<S: Surface>(&mut self, surface: &mut S) {
        for subtitle in &mut self.subtitles {
            subtitle.deactivate(surface);
        }
        self.subtitles.clear();
        self.split_lines.clear();
        self.tasks.clear();
        self.metrics.clear();
        self.last_time = None;
    }

    /// Chain the pieces of every split line that moved this frame
    fn realign<S: Surface>(&mut self, surface: &mut S) -> usize {
        let mut realigned = 0;
        for line in &self.split_lines {
            let Some(pieces) = self.subtitles.get_mut(line.range()) else {
                continue;
            };
            let Some(first) = pieces.first() else {
                continue;
            };
            if !first.is_active() || !pieces.iter().any(Subtitle::moved) {
                continue;
            }
            let Some((alignment, justify)) = first.alignment() else {
                continue;
            };
            let Some(mut placements) = pieces
                .iter()
                .map(|piece| piece.placement(&*surface))
                .collect::<Option<Vec<_>>>()
            else {
                continue;
            };

            layout::realign(alignment, justify, &line.breaks, &mut placements);
            for (piece, placement) in pieces.iter_mut().zip(&placements) {
                piece.place_at(placement.x, placement.y, surface);
                piece.clear_moved();
            }

            let bounds = pieces
                .iter()
                .filter_map(|piece| piece.text_bounds(&*surface))
                .reduce(|a, b| a.union(&b));
            if let (Some(bounds), Some((element, paint))) = (bounds, pieces[0].border_box()) {
                surface.set_box(element, positioning::box_rect(bounds, paint.stroke_width), paint);
                surface.set_transform(element, &[], (0.0, 0.0));
                for piece in &pieces[1..] {
                    if let Some((element, _)) = piece.border_box() {
                        surface.set_visible(element, false);
                    }
                }
            }
            realigned += 1;
        }
        realigned
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new(RenderContext::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::HeadlessSurface;

    const DOCUMENT: &str = "[Script Info]
PlayResX: 640
PlayResY: 480

[V4+ Styles]
Format: Name, Fontname, Fontsize, PrimaryColour, SecondaryColour, OutlineColour, BackColour, Bold, Italic, Underline, StrikeOut, ScaleX, ScaleY, Spacing, Angle, BorderStyle, Outline, Shadow, Alignment, MarginL, MarginR, MarginV, Encoding
Style: Default,Arial,20,&H00FFFFFF,&H000000FF,&H00000000,&H00000000,0,0,0,0,100,100,0,0,1,0,0,2,10,10,20,1

[Events]
Format: Layer, Start, End, Style, Name, MarginL, MarginR, MarginV, Effect, Text
Dialogue: 0,0:00:00.00,0:00:02.00,Default,,0,0,0,,First
Dialogue: 0,0:00:01.00,0:00:03.00,Default,,0,0,0,,Second\\NLine
";

    #[test]
    fn load_builds_every_event() {
        let mut surface = HeadlessSurface::new();
        let mut renderer = Renderer::default();
        renderer.load_str(DOCUMENT, &mut surface).expect("load");
        assert_eq!(renderer.state(), LoadState::Initialized);
        assert_eq!(renderer.canvas(), (640.0, 480.0));
        assert_eq!(renderer.subtitles().len(), 3);
        assert_eq!(renderer.split_lines().len(), 1);
        assert_eq!(renderer.split_lines()[0].breaks, [1, 1]);
    }

    #[test]
    fn build_budget_spreads_the_load() {
        let mut surface = HeadlessSurface::new();
        let mut renderer = Renderer::new(RenderContext::new(640, 480).with_build_budget(2));
        renderer.set_source("a.ass", &mut surface);
        let request = renderer.init().expect("request");
        assert!(renderer
            .complete_load(request.ticket, Ok(DOCUMENT.to_string()), &mut surface)
            .is_none());
        assert_eq!(renderer.pending_tasks(), 5);

        renderer.tick(0.0, &mut surface);
        assert_eq!(renderer.state(), LoadState::Initializing);
        renderer.tick(0.0, &mut surface);
        renderer.tick(0.0, &mut surface);
        assert_eq!(renderer.state(), LoadState::Initialized);
    }

    #[test]
    fn frames_activate_and_expire() {
        let mut surface = HeadlessSurface::new();
        let mut renderer = Renderer::default();
        renderer.load_str(DOCUMENT, &mut surface).expect("load");

        let outcome = renderer.tick(0.5, &mut surface);
        assert_eq!(outcome.activated, 1);
        assert_eq!(surface.element_count(), 1);

        let outcome = renderer.tick(1.5, &mut surface);
        assert_eq!(outcome.activated, 2);
        assert_eq!(outcome.realigned, 1);

        let outcome = renderer.tick(2.5, &mut surface);
        assert_eq!(outcome.deactivated, 1);
        assert_eq!(surface.element_count(), 2);

        assert!(renderer.tick(2.505, &mut surface).skipped);
    }

    #[test]
    fn paused_renderer_does_nothing() {
        let mut surface = HeadlessSurface::new();
        let mut renderer = Renderer::default();
        renderer.load_str(DOCUMENT, &mut surface).expect("load");
        renderer.pause();
        assert!(!renderer.running());
        assert_eq!(renderer.tick(0.5, &mut surface).activated, 0);
        assert!(renderer.resume().is_none());
        assert_eq!(renderer.tick(0.5, &mut surface).activated, 1);
    }

    #[test]
    fn clean_removes_everything() {
        let mut surface = HeadlessSurface::new();
        let mut renderer = Renderer::default();
        renderer.load_str(DOCUMENT, &mut surface).expect("load");
        renderer.tick(1.5, &mut surface);
        renderer.clean(&mut surface);
        assert_eq!(surface.element_count(), 0);
        assert_eq!(renderer.state(), LoadState::Uninitialized);
        assert!(renderer.subtitles().is_empty());
    }

    #[test]
    fn failed_fetch_is_reported() {
        let mut surface = HeadlessSurface::new();
        let mut renderer = Renderer::default();
        renderer.set_source("missing.ass", &mut surface);
        let request = renderer.init().expect("request");
        renderer.complete_load(
            request.ticket,
            Err(OverlayError::Load("404".to_string())),
            &mut surface,
        );
        assert_eq!(renderer.state(), LoadState::Failed);
        assert_eq!(renderer.last_error(), Some(&OverlayError::Load("404".to_string())));
    }
}
