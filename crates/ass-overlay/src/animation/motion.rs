//! Animated positioning (`\move`, and `\pos` inside `\t`)

/// Position animation between two points
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Motion {
    /// Start point; `None` starts from the line's natural anchor
    pub from: Option<(f64, f64)>,
    /// End point
    pub to: (f64, f64),
    /// Start in milliseconds from the event start
    pub t1: f64,
    /// End in milliseconds
    pub t2: f64,
    /// Power-law acceleration, 1 is linear
    pub accel: f64,
}

impl Motion {
    /// Position at `t_ms`, starting from `origin` when `from` is unset
    #[must_use]
    pub fn position_at(&self, t_ms: f64, origin: (f64, f64)) -> (f64, f64) {
        let from = self.from.unwrap_or(origin);
        let progress = if self.t2 <= self.t1 {
            if t_ms < self.t1 {
                0.0
            } else {
                1.0
            }
        } else {
            let t = t_ms.clamp(self.t1, self.t2);
            ((t - self.t1) / (self.t2 - self.t1)).powf(self.accel)
        };
        (
            (self.to.0 - from.0).mul_add(progress, from.0),
            (self.to.1 - from.1).mul_add(progress, from.1),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_move_is_clamped() {
        let motion = Motion {
            from: Some((0.0, 0.0)),
            to: (100.0, 50.0),
            t1: 0.0,
            t2: 1000.0,
            accel: 1.0,
        };
        assert_eq!(motion.position_at(-10.0, (0.0, 0.0)), (0.0, 0.0));
        assert_eq!(motion.position_at(500.0, (0.0, 0.0)), (50.0, 25.0));
        assert_eq!(motion.position_at(5000.0, (0.0, 0.0)), (100.0, 50.0));
    }

    #[test]
    fn accelerated_move_and_natural_origin() {
        let motion = Motion {
            from: None,
            to: (100.0, 0.0),
            t1: 0.0,
            t2: 100.0,
            accel: 2.0,
        };
        let (x, _) = motion.position_at(50.0, (0.0, 0.0));
        assert!((x - 25.0).abs() < 1e-9);
        assert_eq!(motion.position_at(0.0, (20.0, 30.0)), (20.0, 30.0));
    }

    #[test]
    fn empty_window_jumps() {
        let motion = Motion {
            from: Some((0.0, 0.0)),
            to: (10.0, 10.0),
            t1: 100.0,
            t2: 100.0,
            accel: 1.0,
        };
        assert_eq!(motion.position_at(50.0, (0.0, 0.0)), (0.0, 0.0));
        assert_eq!(motion.position_at(100.0, (0.0, 0.0)), (10.0, 10.0));
    }
}
