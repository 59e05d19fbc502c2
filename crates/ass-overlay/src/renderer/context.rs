//! Renderer configuration

use ass_script::BorderStyle;

/// Renderer configuration
///
/// Everything here is host policy; per-script settings come from the
/// script's `[Script Info]` section.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RenderContext {
    video_width: u32,
    video_height: u32,
    frame_epsilon: f64,
    time_offset: f64,
    border_style: i32,
    build_budget: usize,
}

impl RenderContext {
    /// Create a context for a video of the given size
    ///
    /// The video size is the canvas fallback for scripts without
    /// `PlayResX`/`PlayResY`.
    #[must_use]
    pub const fn new(video_width: u32, video_height: u32) -> Self {
        Self {
            video_width,
            video_height,
            frame_epsilon: 0.01,
            time_offset: 0.0,
            border_style: 0,
            build_budget: 32,
        }
    }

    /// Set the minimum time step, in seconds, between two processed frames
    #[must_use]
    pub const fn with_frame_epsilon(mut self, seconds: f64) -> Self {
        self.frame_epsilon = seconds;
        self
    }

    /// Add a fixed offset, in seconds, to the playback time
    #[must_use]
    pub const fn with_time_offset(mut self, seconds: f64) -> Self {
        self.time_offset = seconds;
        self
    }

    /// Override every style's border style (0 keeps the script's)
    #[must_use]
    pub const fn with_border_style(mut self, code: i32) -> Self {
        self.border_style = code;
        self
    }

    /// Number of load tasks processed per tick (at least one)
    #[must_use]
    pub const fn with_build_budget(mut self, tasks: usize) -> Self {
        self.build_budget = tasks;
        self
    }

    /// Set the video size
    pub fn set_video_size(&mut self, width: u32, height: u32) {
        self.video_width = width;
        self.video_height = height;
    }

    /// Set the border style override
    pub fn set_border_style(&mut self, code: i32) {
        self.border_style = code;
    }

    /// Video size
    #[must_use]
    pub const fn video_size(&self) -> (u32, u32) {
        (self.video_width, self.video_height)
    }

    /// Minimum time step between processed frames
    #[must_use]
    pub const fn frame_epsilon(&self) -> f64 {
        self.frame_epsilon
    }

    /// Extra playback time offset
    #[must_use]
    pub const fn time_offset(&self) -> f64 {
        self.time_offset
    }

    /// Raw border style override code
    #[must_use]
    pub const fn border_style_code(&self) -> i32 {
        self.border_style
    }

    /// Border style forced on every line, if any
    #[must_use]
    pub const fn border_style(&self) -> Option<BorderStyle> {
        if self.border_style == 0 {
            None
        } else {
            Some(BorderStyle::from_code(self.border_style))
        }
    }

    /// Load tasks processed per tick
    #[must_use]
    pub fn build_budget(&self) -> usize {
        self.build_budget.max(1)
    }
}

impl Default for RenderContext {
    fn default() -> Self {
        Self::new(1920, 1080)
    }
}
