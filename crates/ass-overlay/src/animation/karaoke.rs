//! Karaoke segments
//!
//! Every karaoke tag opens a segment on the line's karaoke clock. Spans
//! belong to the most recent segment until the next karaoke tag.

use ass_script::Color;

use crate::pipeline::{Declarations, Paint};
use crate::utils::ResourceId;

/// How a segment reveals its text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KaraokeKind {
    /// `\k`: switch from the secondary to the primary color at the start
    Discrete,
    /// `\ko`: hide the outline until the start
    Outline,
    /// `\kf` / `\K`: sweep a color boundary across the text
    Sweep {
        /// Gradient painting the swept span
        gradient: ResourceId,
    },
}

/// One karaoke syllable window on the line's karaoke clock
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KaraokeSegment {
    /// Segment start in milliseconds from the event start
    pub start_ms: f64,
    /// Segment end in milliseconds
    pub end_ms: f64,
    /// Reveal mode
    pub kind: KaraokeKind,
    /// Color before the syllable is sung (secondary)
    pub before: Color,
    /// Color once sung (primary)
    pub after: Color,
}

impl KaraokeSegment {
    /// Gradient painting this segment, for sweeps
    #[must_use]
    pub const fn gradient(&self) -> Option<ResourceId> {
        match self.kind {
            KaraokeKind::Sweep { gradient } => Some(gradient),
            _ => None,
        }
    }

    /// Whether the segment has started at `t_ms`
    #[must_use]
    pub fn started(&self, t_ms: f64) -> bool {
        t_ms >= self.start_ms
    }

    /// Declarations as displayed at `t_ms`
    ///
    /// Discrete segments show the `before` color until they start; outline
    /// segments hide the stroke until then. Sweeps are painted by their
    /// gradient and pass through unchanged.
    #[must_use]
    pub fn displayed(&self, decl: &Declarations, t_ms: f64) -> Declarations {
        let mut shown = decl.clone();
        if self.started(t_ms) {
            return shown;
        }
        match self.kind {
            KaraokeKind::Discrete => shown.fill = Paint::Solid(self.before),
            KaraokeKind::Outline => shown.stroke = shown.stroke.with_opacity(0.0),
            KaraokeKind::Sweep { .. } => {}
        }
        shown
    }

    /// Sweep boundary at `t_ms` as a fraction of the whole text width
    ///
    /// `start_frac` and `frac` are the span's left edge and width relative
    /// to the text element.
    #[must_use]
    pub fn sweep_offset(&self, t_ms: f64, start_frac: f64, frac: f64) -> f64 {
        sweep_offset(t_ms, self.start_ms, self.end_ms, start_frac, frac)
    }
}

/// Gradient stop offset of a sweep over `[start_ms, end_ms)`
///
/// Holds at `start_frac` before the window, moves linearly across it, and
/// rests at `start_frac + frac` afterwards. Always within `0.0..=1.0`.
#[must_use]
pub fn sweep_offset(t_ms: f64, start_ms: f64, end_ms: f64, start_frac: f64, frac: f64) -> f64 {
    let offset = if t_ms <= start_ms {
        start_frac
    } else if t_ms < end_ms {
        frac.mul_add((t_ms - start_ms) / (end_ms - start_ms), start_frac)
    } else {
        start_frac + frac
    };
    offset.clamp(0.0, 1.0)
}
