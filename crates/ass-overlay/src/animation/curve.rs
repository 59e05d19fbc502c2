//! Easing curves for `\t` transitions
//!
//! An acceleration exponent `a` describes the power curve `x^a`. Hosts
//! animate with cubic-Bézier timing functions, so the power curve is sampled
//! at five points and approximated by one least-squares cubic.

/// 2D point
pub type Point = (f64, f64);

fn sub(a: Point, b: Point) -> Point {
    (a.0 - b.0, a.1 - b.1)
}

fn add(a: Point, b: Point) -> Point {
    (a.0 + b.0, a.1 + b.1)
}

fn scale(a: Point, s: f64) -> Point {
    (a.0 * s, a.1 * s)
}

fn dot(a: Point, b: Point) -> f64 {
    a.0.mul_add(b.0, a.1 * b.1)
}

fn norm(a: Point) -> f64 {
    a.0.hypot(a.1)
}

fn normalize(a: Point) -> Point {
    scale(a, 1.0 / norm(a))
}

fn bezier(ctrl: &[Point; 4], t: f64) -> Point {
    let tx = 1.0 - t;
    add(
        add(scale(ctrl[0], tx * tx * tx), scale(ctrl[1], 3.0 * tx * tx * t)),
        add(scale(ctrl[2], 3.0 * tx * t * t), scale(ctrl[3], t * t * t)),
    )
}

/// Fit one cubic Bézier through an ordered point sequence
///
/// Consecutive duplicates are dropped first. Returns `None` with fewer than
/// two distinct points. Two points give the straight chord with control
/// points at a third and two thirds. Otherwise the end tangents come from
/// the end segments and their lengths from the 2×2 least-squares normal
/// equations; a singular system or a negligible coefficient falls back to
/// a third of the chord.
#[must_use]
pub fn fit_curve(points: &[Point]) -> Option<[Point; 4]> {
    let mut distinct: Vec<Point> = Vec::with_capacity(points.len());
    for &point in points {
        if distinct.last() != Some(&point) {
            distinct.push(point);
        }
    }
    let len = distinct.len();
    if len < 2 {
        return None;
    }

    let first = distinct[0];
    let last = distinct[len - 1];
    let left_tangent = normalize(sub(distinct[1], first));
    let right_tangent = normalize(sub(distinct[len - 2], last));

    if len == 2 {
        let dist = norm(sub(first, last)) / 3.0;
        return Some([
            first,
            add(first, scale(left_tangent, dist)),
            add(last, scale(right_tangent, dist)),
            last,
        ]);
    }

    // chord-length parametrization
    let mut u = Vec::with_capacity(len);
    u.push(0.0);
    for i in 1..len {
        u.push(u[i - 1] + norm(sub(distinct[i], distinct[i - 1])));
    }
    let total = u[len - 1];
    for value in &mut u {
        *value /= total;
    }

    let mut curve = [first, first, last, last];
    let mut c = [[0.0; 2]; 2];
    let mut x = [0.0; 2];
    for (point, &ui) in distinct.iter().zip(&u) {
        let ux = 1.0 - ui;
        let a = scale(left_tangent, 3.0 * ux * ux * ui);
        let b = scale(right_tangent, 3.0 * ux * ui * ui);

        c[0][0] += dot(a, a);
        c[0][1] += dot(a, b);
        c[1][0] += dot(a, b);
        c[1][1] += dot(b, b);

        let residual = sub(*point, bezier(&curve, ui));
        x[0] += dot(a, residual);
        x[1] += dot(b, residual);
    }

    // Cramer's rule
    let det_c = c[0][0].mul_add(c[1][1], -(c[1][0] * c[0][1]));
    let det_c0_x = c[0][0].mul_add(x[1], -(c[1][0] * x[0]));
    let det_x_c1 = x[0].mul_add(c[1][1], -(x[1] * c[0][1]));
    let (mut alpha_l, mut alpha_r) = if det_c == 0.0 {
        (0.0, 0.0)
    } else {
        (det_x_c1 / det_c, det_c0_x / det_c)
    };

    let seg_length = norm(sub(first, last));
    let epsilon = 1.0e-6 * seg_length;
    if alpha_l < epsilon || alpha_r < epsilon {
        alpha_l = seg_length / 3.0;
        alpha_r = alpha_l;
    }
    curve[1] = add(curve[0], scale(left_tangent, alpha_l));
    curve[2] = add(curve[3], scale(right_tangent, alpha_r));
    Some(curve)
}

/// Cubic-Bézier timing function from `(0,0)` to `(1,1)`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicBezier {
    /// First control point
    pub p1: Point,
    /// Second control point
    pub p2: Point,
}

impl CubicBezier {
    /// Approximate `x^accel` by sampling it at quarter steps
    #[must_use]
    pub fn from_exponent(accel: f64) -> Option<Self> {
        let samples: Vec<Point> = [0.0, 0.25, 0.5, 0.75, 1.0]
            .iter()
            .map(|&x| if x == 0.0 { (0.0, 0.0) } else { (x, f64::powf(x, accel)) })
            .collect();
        let curve = fit_curve(&samples)?;
        Some(Self {
            p1: (curve[1].0.clamp(0.0, 1.0), curve[1].1),
            p2: (curve[2].0.clamp(0.0, 1.0), curve[2].1),
        })
    }

    fn sample(a1: f64, a2: f64, t: f64) -> f64 {
        let c = 3.0 * a1;
        let b = 3.0f64.mul_add(a2 - a1, -c);
        let a = 1.0 - c - b;
        ((a * t + b) * t + c) * t
    }

    fn sample_derivative(a1: f64, a2: f64, t: f64) -> f64 {
        let c = 3.0 * a1;
        let b = 3.0f64.mul_add(a2 - a1, -c);
        let a = 1.0 - c - b;
        (3.0 * a * t + 2.0 * b).mul_add(t, c)
    }

    /// Curve parameter whose x equals `x`
    fn solve_t(&self, x: f64) -> f64 {
        const EPSILON: f64 = 1e-7;
        let mut t = x;
        for _ in 0..8 {
            let error = Self::sample(self.p1.0, self.p2.0, t) - x;
            if error.abs() < EPSILON {
                return t;
            }
            let slope = Self::sample_derivative(self.p1.0, self.p2.0, t);
            if slope.abs() < 1e-6 {
                break;
            }
            t -= error / slope;
        }

        let (mut low, mut high) = (0.0, 1.0);
        t = x;
        while low < high {
            let value = Self::sample(self.p1.0, self.p2.0, t);
            if (value - x).abs() < EPSILON {
                return t;
            }
            if x > value {
                low = t;
            } else {
                high = t;
            }
            let next = (high - low).mul_add(0.5, low);
            if (next - t).abs() < f64::EPSILON {
                break;
            }
            t = next;
        }
        t
    }

    /// Progress at time fraction `x`
    #[must_use]
    pub fn eval(&self, x: f64) -> f64 {
        if x <= 0.0 {
            return 0.0;
        }
        if x >= 1.0 {
            return 1.0;
        }
        Self::sample(self.p1.1, self.p2.1, self.solve_t(x))
    }
}

/// Timing of a transition
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Easing {
    /// Constant speed
    Linear,
    /// Fitted power curve
    Cubic(CubicBezier),
}

impl Easing {
    /// Easing for an acceleration exponent; 1 (or an unusable value) is linear
    #[must_use]
    pub fn from_accel(accel: f64) -> Self {
        if !accel.is_finite() || accel <= 0.0 || (accel - 1.0).abs() < f64::EPSILON {
            return Self::Linear;
        }
        CubicBezier::from_exponent(accel).map_or(Self::Linear, Self::Cubic)
    }

    /// Progress at time fraction `x`, clamped to `0.0..=1.0` in time
    #[must_use]
    pub fn eval(&self, x: f64) -> f64 {
        let x = x.clamp(0.0, 1.0);
        match self {
            Self::Linear => x,
            Self::Cubic(curve) => curve.eval(x),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_points_give_chord_thirds() {
        let curve = fit_curve(&[(0.0, 0.0), (0.0, 0.0), (3.0, 0.0)]).unwrap();
        assert!((curve[1].0 - 1.0).abs() < 1e-9);
        assert!((curve[2].0 - 2.0).abs() < 1e-9);
    }

    #[test]
    fn single_point_has_no_fit() {
        assert!(fit_curve(&[(1.0, 1.0), (1.0, 1.0)]).is_none());
        assert!(fit_curve(&[]).is_none());
    }

    #[test]
    fn exponent_one_is_linear() {
        let curve = CubicBezier::from_exponent(1.0).unwrap();
        assert!((curve.p1.0 - curve.p1.1).abs() < 1e-6);
        assert!((curve.p2.0 - curve.p2.1).abs() < 1e-6);
        for i in 1..10 {
            let x = f64::from(i) / 10.0;
            assert!((curve.eval(x) - x).abs() < 1e-4, "at {x}");
        }
        assert_eq!(Easing::from_accel(1.0), Easing::Linear);
    }

    #[test]
    fn easing_endpoints_are_fixed() {
        let easing = Easing::from_accel(3.0);
        assert!(matches!(easing, Easing::Cubic(_)));
        assert!(easing.eval(0.0).abs() < 1e-9);
        assert!((easing.eval(1.0) - 1.0).abs() < 1e-9);
        assert!((easing.eval(2.0) - 1.0).abs() < 1e-9);
    }
}
