//! Opacity envelopes for `\fad` and `\fade`

use ass_script::utils::alpha_to_opacity;

/// Four-key opacity envelope
///
/// Times are milliseconds from the event start.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fade {
    /// Opacity before `t1`
    pub o1: f64,
    /// Opacity between `t2` and `t3`
    pub o2: f64,
    /// Opacity after `t4`
    pub o3: f64,
    /// Fade-in start
    pub t1: f64,
    /// Fade-in end
    pub t2: f64,
    /// Fade-out start
    pub t3: f64,
    /// Fade-out end
    pub t4: f64,
}

impl Fade {
    /// Four-key form from ASS alpha values (`0` opaque, `255` transparent)
    #[must_use]
    pub fn from_alphas(alphas: [u8; 3], times: [f64; 4]) -> Self {
        Self {
            o1: f64::from(alpha_to_opacity(alphas[0])),
            o2: f64::from(alpha_to_opacity(alphas[1])),
            o3: f64::from(alpha_to_opacity(alphas[2])),
            t1: times[0],
            t2: times[1],
            t3: times[2],
            t4: times[3],
        }
    }

    /// Two-key form: fade in over `fade_in`, out over the last `fade_out`
    #[must_use]
    pub fn simple(fade_in: f64, fade_out: f64, duration_ms: f64) -> Self {
        Self::from_alphas([255, 0, 255], [0.0, fade_in, duration_ms - fade_out, duration_ms])
    }

    /// Opacity at `t_ms`
    #[must_use]
    pub fn opacity_at(&self, t_ms: f64) -> f64 {
        let ramp = |from: f64, to: f64, start: f64, end: f64| {
            from + (to - from) * (t_ms - start) / (end - start)
        };
        if t_ms <= self.t1 {
            self.o1
        } else if t_ms < self.t2 {
            ramp(self.o1, self.o2, self.t1, self.t2)
        } else if t_ms <= self.t3 {
            self.o2
        } else if t_ms < self.t4 {
            ramp(self.o2, self.o3, self.t3, self.t4)
        } else {
            self.o3
        }
    }
}
