//! Interpretation state and its outputs

use ass_script::Style;

use crate::animation::{Fade, KaraokeSegment, Lerp, Motion, Transition};
use crate::pipeline::{Declarations, TransformSet};
use crate::surface::{BoxPaint, Shadow};
use crate::utils::{Rect, ResourceId};

/// A `\clip` or `\iclip` region
#[derive(Debug, Clone, PartialEq)]
pub struct ClipRegion {
    /// Resource id the surface knows the region by
    pub id: ResourceId,
    /// Hide the inside instead of the outside
    pub inverse: bool,
    /// Region outline as explicit path data
    pub path: String,
}

/// One styled run of text
#[derive(Debug, Clone, PartialEq)]
pub struct TextSpan {
    /// Displayed text
    pub text: String,
    /// Resolved styling
    pub decl: Declarations,
    /// Horizontal advance before the span, left by a preceding drawing
    pub dx: f64,
}

/// One `\p` drawing
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeSpan {
    /// Explicit path data
    pub path: String,
    /// Untransformed path bounds
    pub bounds: Rect,
    /// Resolved styling
    pub decl: Declarations,
}

/// Filters and border box shared by a whole line
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LineState {
    /// Glow and shadow of the text
    pub filters: Vec<Shadow>,
    /// Opaque box behind the text, when the border style asks for one
    pub border_box: Option<BoxPaint>,
    /// Glow and shadow of drawings
    pub shape_filters: Vec<Shadow>,
}

fn lerp_filters(from: &[Shadow], to: &[Shadow], t: f64) -> Vec<Shadow> {
    if from.len() == to.len() {
        from.iter().zip(to).map(|(a, b)| a.lerp(b, t)).collect()
    } else {
        to.to_vec()
    }
}

impl Lerp for LineState {
    fn lerp(&self, other: &Self, t: f64) -> Self {
        let border_box = match (&self.border_box, &other.border_box) {
            (Some(from), Some(to)) => Some(BoxPaint {
                fill: from.fill.lerp(to.fill, t as f32),
                stroke: from.stroke.lerp(to.stroke, t as f32),
                stroke_width: crate::utils::math::lerp(from.stroke_width, to.stroke_width, t),
                filters: lerp_filters(&from.filters, &to.filters, t),
            }),
            (_, target) => target.clone(),
        };
        Self {
            filters: lerp_filters(&self.filters, &other.filters, t),
            border_box,
            shape_filters: lerp_filters(&self.shape_filters, &other.shape_filters, t),
        }
    }
}

/// Everything an override block can change
///
/// One state lives for the whole interpretation of a piece of event text.
/// `style` is a private copy, so overrides never leak into the script's
/// style table.
#[derive(Debug, Clone, PartialEq)]
pub struct RunState {
    /// Effective style after overrides
    pub style: Style,
    /// Declarations of the next span
    pub decl: Declarations,
    /// Element transforms
    pub transforms: TransformSet,
    /// `\pos` / `\move` start
    pub position: Option<(f64, f64)>,
    /// `\org`
    pub origin: Option<(f64, f64)>,
    /// The line must be placed again
    pub reposition: bool,
    /// An alignment tag already applied; later ones are ignored
    pub alignment_locked: bool,
    /// `\q` override of the script wrap style
    pub wrap_style: Option<u8>,
    /// Karaoke clock in milliseconds from the event start
    pub karaoke_timer: f64,
    /// Karaoke segments, indexed by [`Declarations::karaoke`]
    pub karaoke: Vec<KaraokeSegment>,
    /// Drawing scale, 0 outside drawing mode
    pub drawing_scale: f64,
    /// Horizontal advance left by drawings and the `\pbo` baseline offset
    pub path_offset: (f64, f64),
    /// Clip region
    pub clip: Option<ClipRegion>,
    /// Opacity envelope
    pub fade: Option<Fade>,
    /// Animated position
    pub motion: Option<Motion>,
    /// Transitions scheduled by `\t`
    pub transitions: Vec<Transition>,
    /// Line-level filters and box
    pub line: LineState,
}

impl RunState {
    /// Fresh state for text in `style`
    #[must_use]
    pub fn new(style: Style) -> Self {
        Self {
            decl: Declarations::from_style(&style),
            style,
            transforms: TransformSet::new(),
            position: None,
            origin: None,
            reposition: false,
            alignment_locked: false,
            wrap_style: None,
            karaoke_timer: 0.0,
            karaoke: Vec::new(),
            drawing_scale: 0.0,
            path_offset: (0.0, 0.0),
            clip: None,
            fade: None,
            motion: None,
            transitions: Vec::new(),
            line: LineState::default(),
        }
    }

    /// Whether `\p` drawing mode is on
    #[must_use]
    pub fn in_drawing(&self) -> bool {
        self.drawing_scale > 0.0
    }

    /// Karaoke segment the next span belongs to
    #[must_use]
    pub fn current_karaoke(&self) -> Option<&KaraokeSegment> {
        self.decl.karaoke.and_then(|index| self.karaoke.get(index))
    }
}
