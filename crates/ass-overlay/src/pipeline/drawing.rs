//! Drawing command processing
//!
//! Converts the compact `\p` drawing grammar (`m 0 0 l 10 0 10 10`) into
//! explicit path data (`M 0 0 L 10 0 L 10 10 Z`) with every number scaled,
//! and measures the result with `tiny-skia`.

use tiny_skia::{Path, PathBuilder};

use crate::utils::Rect;

/// Drawing command types
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Move to position (`m`, or `n` without closing)
    MoveTo {
        /// Target x
        x: f32,
        /// Target y
        y: f32,
    },
    /// Line to position (`l`)
    LineTo {
        /// Target x
        x: f32,
        /// Target y
        y: f32,
    },
    /// Cubic Bezier curve (`b`)
    BezierTo {
        /// First control point
        c1: (f32, f32),
        /// Second control point
        c2: (f32, f32),
        /// End point
        end: (f32, f32),
    },
    /// B-spline through the control points (`s`, extended by `p`)
    Spline {
        /// Control points, starting at the pen position
        points: Vec<(f32, f32)>,
    },
    /// Close path (`c`)
    ClosePath,
}

/// A converted drawing
#[derive(Debug, Clone, PartialEq)]
pub struct Drawing {
    /// Explicit path data
    pub data: String,
    /// Untransformed bounds
    pub bounds: Rect,
}

/// Convert compact drawing commands, scaling every coordinate by `scale`
#[must_use]
pub fn convert(text: &str, scale: f64) -> Drawing {
    let commands = parse_draw_commands(text, scale as f32);
    let bounds = build_path(&commands)
        .map(|path| {
            let b = path.bounds();
            Rect::new(
                f64::from(b.left()),
                f64::from(b.top()),
                f64::from(b.width()),
                f64::from(b.height()),
            )
        })
        .unwrap_or_default();
    Drawing {
        data: path_data(&commands),
        bounds,
    }
}

/// Parse drawing commands from a string
///
/// Malformed coordinates end the current command; nothing here fails.
#[must_use]
pub fn parse_draw_commands(text: &str, scale: f32) -> Vec<DrawCommand> {
    let tokens = tokenize_drawing_commands(text);
    let mut commands = Vec::new();
    let mut pen = (0.0, 0.0);
    let mut i = 0;

    while i < tokens.len() {
        let command = tokens[i].as_str();
        i += 1;
        match command {
            "m" | "n" => {
                // Further pairs after a move are lines
                let mut first = true;
                while let Some(point) = coord_pair(&tokens, i, scale) {
                    commands.push(if first {
                        DrawCommand::MoveTo {
                            x: point.0,
                            y: point.1,
                        }
                    } else {
                        DrawCommand::LineTo {
                            x: point.0,
                            y: point.1,
                        }
                    });
                    first = false;
                    pen = point;
                    i += 2;
                }
            }
            "l" => {
                while let Some(point) = coord_pair(&tokens, i, scale) {
                    commands.push(DrawCommand::LineTo {
                        x: point.0,
                        y: point.1,
                    });
                    pen = point;
                    i += 2;
                }
            }
            "b" => {
                while let (Some(c1), Some(c2), Some(end)) = (
                    coord_pair(&tokens, i, scale),
                    coord_pair(&tokens, i + 2, scale),
                    coord_pair(&tokens, i + 4, scale),
                ) {
                    commands.push(DrawCommand::BezierTo { c1, c2, end });
                    pen = end;
                    i += 6;
                }
            }
            "s" | "p" => {
                let mut points = Vec::new();
                while let Some(point) = coord_pair(&tokens, i, scale) {
                    points.push(point);
                    i += 2;
                }
                if points.is_empty() {
                    continue;
                }
                if command == "p" {
                    if let Some(DrawCommand::Spline { points: existing }) = commands.last_mut() {
                        existing.extend_from_slice(&points);
                        pen = points[points.len() - 1];
                        continue;
                    }
                }
                if points.len() >= 2 {
                    let mut spline = Vec::with_capacity(points.len() + 1);
                    spline.push(pen);
                    spline.extend_from_slice(&points);
                    pen = spline[spline.len() - 1];
                    commands.push(DrawCommand::Spline { points: spline });
                }
            }
            "c" => commands.push(DrawCommand::ClosePath),
            _ => {}
        }
    }

    commands
}

/// Render commands as explicit path data, closed at the end
#[must_use]
pub fn path_data(commands: &[DrawCommand]) -> String {
    let mut parts: Vec<String> = Vec::with_capacity(commands.len() + 1);
    for command in commands {
        match command {
            DrawCommand::MoveTo { x, y } => parts.push(format!("M {x} {y}")),
            DrawCommand::LineTo { x, y } => parts.push(format!("L {x} {y}")),
            DrawCommand::BezierTo { c1, c2, end } => parts.push(format!(
                "C {} {} {} {} {} {}",
                c1.0, c1.1, c2.0, c2.1, end.0, end.1
            )),
            DrawCommand::Spline { points } => {
                for (c1, c2, end) in spline_to_bezier(points) {
                    parts.push(format!(
                        "C {} {} {} {} {} {}",
                        c1.0, c1.1, c2.0, c2.1, end.0, end.1
                    ));
                }
            }
            DrawCommand::ClosePath => parts.push("Z".to_string()),
        }
    }
    if !matches!(commands.last(), Some(DrawCommand::ClosePath)) {
        parts.push("Z".to_string());
    }
    parts.join(" ")
}

/// Build a `tiny-skia` path, `None` when the drawing has no area
#[must_use]
pub fn build_path(commands: &[DrawCommand]) -> Option<Path> {
    let mut builder = PathBuilder::new();
    for command in commands {
        match command {
            DrawCommand::MoveTo { x, y } => builder.move_to(*x, *y),
            DrawCommand::LineTo { x, y } => builder.line_to(*x, *y),
            DrawCommand::BezierTo { c1, c2, end } => {
                builder.cubic_to(c1.0, c1.1, c2.0, c2.1, end.0, end.1);
            }
            DrawCommand::Spline { points } => {
                if builder.is_empty() {
                    builder.move_to(points[0].0, points[0].1);
                }
                for (c1, c2, end) in spline_to_bezier(points) {
                    builder.cubic_to(c1.0, c1.1, c2.0, c2.1, end.0, end.1);
                }
            }
            DrawCommand::ClosePath => builder.close(),
        }
    }
    builder.finish()
}

/// Tokenize drawing command string
fn tokenize_drawing_commands(text: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();

    for ch in text.chars() {
        if ch.is_whitespace() || ch == ',' {
            if !current.is_empty() {
                tokens.push(std::mem::take(&mut current));
            }
        } else if ch.is_ascii_alphabetic() {
            if !current.is_empty() {
                tokens.push(std::mem::take(&mut current));
            }
            tokens.push(ch.to_ascii_lowercase().to_string());
        } else {
            current.push(ch);
        }
    }

    if !current.is_empty() {
        tokens.push(current);
    }

    tokens
}

/// Scaled coordinate pair at `index`, if both tokens are numbers
fn coord_pair(tokens: &[String], index: usize, scale: f32) -> Option<(f32, f32)> {
    let x = tokens.get(index)?.parse::<f32>().ok()?;
    let y = tokens.get(index + 1)?.parse::<f32>().ok()?;
    Some((x * scale, y * scale))
}

/// Convert spline control points to Bezier segments through those points
fn spline_to_bezier(points: &[(f32, f32)]) -> Vec<((f32, f32), (f32, f32), (f32, f32))> {
    let mut beziers = Vec::new();
    if points.len() < 2 {
        return beziers;
    }

    for i in 0..points.len() - 1 {
        let p0 = if i > 0 { points[i - 1] } else { points[i] };
        let p1 = points[i];
        let p2 = points[i + 1];
        let p3 = if i + 2 < points.len() {
            points[i + 2]
        } else {
            points[i + 1]
        };

        let c1 = (p1.0 + (p2.0 - p0.0) / 6.0, p1.1 + (p2.1 - p0.1) / 6.0);
        let c2 = (p2.0 - (p3.0 - p1.0) / 6.0, p2.1 - (p3.1 - p1.1) / 6.0);
        beziers.push((c1, c2, p2));
    }

    beziers
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn square_converts_to_explicit_path() {
        let drawing = convert("m 0 0 l 100 0 100 100 0 100", 1.0);
        assert_eq!(drawing.data, "M 0 0 L 100 0 L 100 100 L 0 100 Z");
        assert_eq!(drawing.bounds, Rect::new(0.0, 0.0, 100.0, 100.0));
    }

    #[test]
    fn coordinates_are_scaled() {
        let drawing = convert("m 0 0 l 10.5 0 10.5 20", 2.0);
        assert_eq!(drawing.data, "M 0 0 L 21 0 L 21 40 Z");
        assert!((drawing.bounds.width - 21.0).abs() < 1e-6);
    }

    #[test]
    fn bezier_and_close() {
        let commands = parse_draw_commands("m 0 0 b 0 10 10 10 10 0 c", 1.0);
        assert_eq!(commands.len(), 3);
        assert_eq!(commands[2], DrawCommand::ClosePath);
        assert_eq!(path_data(&commands), "M 0 0 C 0 10 10 10 10 0 Z");
    }

    #[test]
    fn spline_is_extended_by_p() {
        let commands = parse_draw_commands("m 0 0 s 10 0 10 10 0 10 p 0 20", 1.0);
        match &commands[1] {
            DrawCommand::Spline { points } => assert_eq!(points.len(), 5),
            other => panic!("expected spline, got {other:?}"),
        }
    }

    #[test]
    fn malformed_input_is_lenient() {
        let drawing = convert("m 0 x l", 1.0);
        assert_eq!(drawing.data, "Z");
        assert_eq!(drawing.bounds, Rect::default());
    }
}
