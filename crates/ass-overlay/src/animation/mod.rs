//! Animation and timeline engine
//!
//! Each rendered subtitle runs its own clock, starting at 0 when its event
//! starts. Transitions go through a two-phase queue: a frame collects the
//! transitions that became due, and the next frame commits them. A commit
//! re-interprets the transition payload and starts [`Tween`]s from the
//! current values to the new ones.

pub mod curve;
pub mod fade;
pub mod karaoke;
pub mod motion;

pub use curve::{fit_curve, CubicBezier, Easing};
pub use fade::Fade;
pub use karaoke::{sweep_offset, KaraokeKind, KaraokeSegment};
pub use motion::Motion;

use crate::utils::math::progress;
use crate::utils::ResourceId;

/// A scheduled `\t` transition
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    /// Scope id shared by the spans the transition affects
    pub id: ResourceId,
    /// Window start in milliseconds from the event start
    pub start_ms: f64,
    /// Window end
    pub end_ms: f64,
    /// Acceleration exponent
    pub accel: f64,
    /// Override tags applied at the window start, without `\pos`
    pub payload: String,
}

impl Transition {
    /// Length of the window, never negative
    #[must_use]
    pub fn duration_ms(&self) -> f64 {
        (self.end_ms - self.start_ms).max(0.0)
    }

    /// Easing curve fitted to the acceleration
    #[must_use]
    pub fn easing(&self) -> Easing {
        Easing::from_accel(self.accel)
    }
}

/// Two-phase transition queue
///
/// [`collect_due`](Self::collect_due) runs at the end of a frame and only
/// moves due transitions aside; [`take_due`](Self::take_due) hands them out
/// at the start of the next frame, so no transition fires while the frame
/// that noticed it is still updating.
#[derive(Debug, Clone, Default)]
pub struct TransitionQueue {
    scheduled: Vec<Transition>,
    due: Vec<Transition>,
}

impl TransitionQueue {
    /// Create an empty queue
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a transition
    pub fn schedule(&mut self, transition: Transition) {
        self.scheduled.push(transition);
    }

    /// Phase 1: move transitions whose window has opened at `clock_ms`
    ///
    /// Returns how many became due.
    pub fn collect_due(&mut self, clock_ms: f64) -> usize {
        let before = self.due.len();
        let mut index = 0;
        while index < self.scheduled.len() {
            if self.scheduled[index].start_ms <= clock_ms {
                let transition = self.scheduled.remove(index);
                self.due.push(transition);
            } else {
                index += 1;
            }
        }
        self.due.len() - before
    }

    /// Phase 2: take every transition collected by earlier frames
    pub fn take_due(&mut self) -> Vec<Transition> {
        std::mem::take(&mut self.due)
    }

    /// Transitions still waiting for their window
    #[must_use]
    pub fn scheduled(&self) -> &[Transition] {
        &self.scheduled
    }

    /// Whether nothing is scheduled or due
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scheduled.is_empty() && self.due.is_empty()
    }

    /// Drop everything (the subtitle expired)
    pub fn clear(&mut self) {
        self.scheduled.clear();
        self.due.clear();
    }
}

/// Values a tween can blend
pub trait Lerp: Clone {
    /// Blend towards `other` by `t` in `0.0..=1.0`
    #[must_use]
    fn lerp(&self, other: &Self, t: f64) -> Self;
}

impl Lerp for crate::pipeline::Declarations {
    fn lerp(&self, other: &Self, t: f64) -> Self {
        Self::lerp(self, other, t)
    }
}

impl Lerp for crate::pipeline::TransformSet {
    fn lerp(&self, other: &Self, t: f64) -> Self {
        Self::lerp(self, other, t)
    }
}

/// Time-limited interpolation between two values
#[derive(Debug, Clone, PartialEq)]
pub struct Tween<T> {
    /// Value at the start
    pub from: T,
    /// Value at the end
    pub to: T,
    /// Start in milliseconds from the event start
    pub start_ms: f64,
    /// Length in milliseconds
    pub duration_ms: f64,
    /// Timing curve
    pub easing: Easing,
}

impl<T: Lerp> Tween<T> {
    /// Value at `t_ms`
    #[must_use]
    pub fn value_at(&self, t_ms: f64) -> T {
        let x = progress(t_ms, self.start_ms, self.start_ms + self.duration_ms);
        if x >= 1.0 {
            return self.to.clone();
        }
        self.from.lerp(&self.to, self.easing.eval(x))
    }

    /// Whether the tween has reached its end value at `t_ms`
    #[must_use]
    pub fn finished(&self, t_ms: f64) -> bool {
        t_ms >= self.start_ms + self.duration_ms
    }
}
