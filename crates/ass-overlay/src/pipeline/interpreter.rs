//! Override tag interpreter
//!
//! Walks prepared event text block by block. Every `{...}` block updates a
//! [`RunState`]; the text following it becomes a [`TextSpan`] carrying the
//! declarations in effect, or a [`ShapeSpan`] while drawing mode is on.
//! Tokens inside `\t(...)` are not applied: they are collected into a
//! [`Transition`] that the renderer commits once its window opens.

use ass_script::utils::{parse_alpha, parse_bgr_color, parse_float_prefix, sanitize_name};
use ass_script::{Alignment, BorderStyle, Color, HAlign, Script, Style};
use log::trace;

use crate::animation::{Fade, KaraokeKind, KaraokeSegment, Motion, Transition};
use crate::pipeline::drawing;
use crate::pipeline::preprocess::segments;
use crate::pipeline::state::{ClipRegion, RunState, ShapeSpan, TextSpan};
use crate::pipeline::tags::{split_args, Tag};
use crate::pipeline::{Declarations, Decoration, Paint, Transform};
use crate::surface::{BoxPaint, Shadow};
use crate::utils::IdAllocator;

/// Result of interpreting one piece of event text
#[derive(Debug, Clone, PartialEq)]
pub struct InterpretedRun {
    /// Text spans in display order
    pub spans: Vec<TextSpan>,
    /// Effective style of each span, parallel to `spans`
    pub span_styles: Vec<Style>,
    /// Drawings in display order
    pub shapes: Vec<ShapeSpan>,
    /// Effective style of each drawing, parallel to `shapes`
    pub shape_styles: Vec<Style>,
    /// State after the last block
    pub state: RunState,
}

impl InterpretedRun {
    /// Concatenated text of every span
    #[must_use]
    pub fn text(&self) -> String {
        self.spans.iter().map(|span| span.text.as_str()).collect()
    }
}

/// Interprets override blocks against a script's style table
pub struct Interpreter<'a> {
    script: &'a Script,
    ids: &'a mut IdAllocator,
    border_style: Option<BorderStyle>,
    duration_ms: f64,
}

fn number(arg: &str) -> Option<f64> {
    parse_float_prefix(arg.trim())
}

fn number_or(arg: &str, fallback: f64) -> f64 {
    number(arg).unwrap_or(fallback)
}

/// Empty or `0` arguments reset a value to the style table
fn is_reset(arg: &str) -> bool {
    let arg = arg.trim();
    arg.is_empty() || number(arg) == Some(0.0)
}

fn hex_digits(arg: &str) -> usize {
    let trimmed = arg.trim().trim_end_matches('&');
    let hex = trimmed
        .strip_prefix("&H")
        .or_else(|| trimmed.strip_prefix("&h"))
        .or_else(|| trimmed.strip_prefix('H'))
        .or_else(|| trimmed.strip_prefix('h'))
        .unwrap_or(trimmed);
    hex.len()
}

fn channel_mut(style: &mut Style, channel: u8) -> &mut Color {
    match channel {
        2 => &mut style.secondary,
        3 => &mut style.outline_color,
        4 => &mut style.back,
        _ => &mut style.primary,
    }
}

impl<'a> Interpreter<'a> {
    /// Create an interpreter for an event lasting `duration_ms`
    pub fn new(script: &'a Script, ids: &'a mut IdAllocator, duration_ms: f64) -> Self {
        Self {
            script,
            ids,
            border_style: None,
            duration_ms,
        }
    }

    /// Force a border style for every line, ignoring the styles' own
    #[must_use]
    pub fn with_border_style(mut self, border_style: Option<BorderStyle>) -> Self {
        self.border_style = border_style;
        self
    }

    /// Interpret prepared text starting from `style`
    pub fn interpret(&mut self, text: &str, style: &Style) -> InterpretedRun {
        self.interpret_from(text, RunState::new(style.clone()))
    }

    /// Interpret prepared text continuing from an existing state
    pub fn interpret_from(&mut self, text: &str, state: RunState) -> InterpretedRun {
        let mut run = InterpretedRun {
            spans: Vec::new(),
            span_styles: Vec::new(),
            shapes: Vec::new(),
            shape_styles: Vec::new(),
            state,
        };
        for (block, segment) in segments(text) {
            let state = &mut run.state;
            self.apply_block(block, state);

            let mut shown = segment;
            if state.in_drawing() {
                let drawing = drawing::convert(segment, state.drawing_scale);
                let advance = drawing.bounds.width * state.style.scale_x / 100.0;
                match state.style.alignment.halign() {
                    HAlign::Left => state.path_offset.0 += advance,
                    HAlign::Center => state.path_offset.0 += advance / 2.0,
                    HAlign::Right => {}
                }
                run.shapes.push(ShapeSpan {
                    path: drawing.data,
                    bounds: drawing.bounds,
                    decl: state.decl.clone(),
                });
                run.shape_styles.push(state.style.clone());
                shown = "";
            }

            self.update_line(state);

            if !shown.is_empty() {
                let dx = std::mem::take(&mut state.path_offset.0);
                run.spans.push(TextSpan {
                    text: shown.to_string(),
                    decl: state.decl.clone(),
                    dx,
                });
                run.span_styles.push(state.style.clone());
            }
        }
        run
    }

    /// Apply one override block (without braces) to `state`
    ///
    /// Tokens are separated by backslashes. `\t(` switches to collecting
    /// tokens until its parentheses balance; the collected payload is
    /// scheduled as a transition instead of applied.
    pub fn apply_block(&mut self, block: &str, state: &mut RunState) {
        let Some(first) = block.find('\\') else {
            return;
        };
        let mut depth: i32 = 0;
        let mut times = String::new();
        let mut payload = String::new();

        for raw in block[first + 1..].split('\\') {
            let token = raw.trim();
            if depth > 0 {
                payload.push('\\');
                payload.push_str(token);
                depth += token.matches('(').count() as i32;
                depth -= token.matches(')').count() as i32;
            } else if let Some(rest) = token.strip_prefix("t(") {
                depth = 1;
                times = rest.to_string();
                times.pop();
                payload.clear();
            } else if !token.is_empty() {
                match Tag::parse(token) {
                    Some((tag, arg)) => self.apply_tag(tag, arg, state),
                    None => {
                        trace!("unrecognized override token {token:?}");
                        state.decl.markers.push(token.to_string());
                    }
                }
            }

            if depth <= 0 && !payload.is_empty() {
                let mut body = std::mem::take(&mut payload);
                body.pop();
                self.add_transition(&times, body, state);
                depth = 0;
            }
        }

        self.resolve_paint(state);
    }

    /// Fill, stroke and stroke width follow the effective style
    fn resolve_paint(&self, state: &mut RunState) {
        state.decl.fill = match state.current_karaoke().and_then(KaraokeSegment::gradient) {
            Some(gradient) => Paint::Gradient(gradient),
            None => Paint::Solid(state.style.primary),
        };
        state.decl.stroke = state.style.outline_color;
        state.decl.stroke_width = state.style.outline;
    }

    /// Recompute the line's glow, shadow and border box
    ///
    /// With an opaque box the outline paints the box instead of the glyphs,
    /// so the span's stroke width moves onto the box.
    pub fn update_line(&self, state: &mut RunState) {
        let style = &state.style;
        let fill = state.decl.fill.solid().unwrap_or(style.primary);
        let border = style.outline_color;
        let has_shadow = style.shadow_x != 0.0 || style.shadow_y != 0.0;
        let shadow = |color: Color| Shadow {
            dx: style.shadow_x,
            dy: style.shadow_y,
            blur: 0.0,
            color,
        };
        let glow = |color: Color| Shadow {
            dx: 0.0,
            dy: 0.0,
            blur: style.blur,
            color,
        };

        let boxed = self.border_style.unwrap_or(style.border_style) == BorderStyle::OpaqueBox;
        let mut filters = Vec::new();
        let border_box = if boxed {
            if style.blur > 0.0 {
                filters.push(glow(fill));
            }
            Some(BoxPaint {
                fill: border,
                stroke: if style.outline > 0.0 { border } else { fill },
                stroke_width: style.outline,
                filters: if has_shadow { vec![shadow(style.back)] } else { Vec::new() },
            })
        } else {
            if style.blur > 0.0 {
                filters.push(glow(if style.outline > 0.0 { border } else { fill }));
            }
            if has_shadow {
                filters.push(shadow(style.back));
            }
            None
        };

        let mut shape_filters = Vec::new();
        if style.blur > 0.0 {
            shape_filters.push(glow(style.back));
        }
        if has_shadow {
            shape_filters.push(shadow(style.back));
        }

        if border_box.is_some() {
            state.decl.stroke_width = 0.0;
        }
        state.line.filters = filters;
        state.line.border_box = border_box;
        state.line.shape_filters = shape_filters;
    }

    /// Schedule a `\t` payload
    ///
    /// Three time arguments are `t1,t2,accel`, two are `t1,t2`, and a lone
    /// one is the acceleration over the whole event. `\pos` inside the
    /// payload becomes a motion over the same window.
    fn add_transition(&mut self, times: &str, mut payload: String, state: &mut RunState) {
        let parts = split_args(times);
        let (mut start_ms, mut end_ms, mut accel) = (0.0, self.duration_ms, 1.0);
        match parts.as_slice() {
            [t1, t2, a, ..] => {
                start_ms = number_or(t1, 0.0);
                end_ms = number_or(t2, 0.0);
                accel = number_or(a, 1.0);
            }
            [t1, t2] => {
                start_ms = number_or(t1, 0.0);
                end_ms = number_or(t2, 0.0);
            }
            [a] => accel = number_or(a, 1.0),
            [] => {}
        }

        while let Some(index) = payload.find("\\pos(") {
            let close = payload[index..]
                .find(')')
                .map_or(payload.len(), |offset| index + offset + 1);
            let args = payload[index + 5..close].trim_end_matches(')').to_string();
            if let [x, y, ..] = split_args(&args).as_slice() {
                state.motion = Some(Motion {
                    from: state.position,
                    to: (number_or(x, 0.0), number_or(y, 0.0)),
                    t1: start_ms,
                    t2: end_ms,
                    accel,
                });
                state.reposition = true;
            }
            payload.replace_range(index..close, "");
        }

        if payload.trim().is_empty() {
            return;
        }
        let id = self.ids.allocate();
        trace!("transition {id} over {start_ms}..{end_ms}ms: {payload}");
        state.decl.scopes.push(id);
        state.transitions.push(Transition {
            id,
            start_ms,
            end_ms,
            accel,
            payload,
        });
    }

    fn set_alignment(&self, alignment: Option<Alignment>, state: &mut RunState) {
        if state.alignment_locked {
            return;
        }
        let base = self.script.style(&state.style.name).alignment;
        state.style.alignment = alignment.unwrap_or(base);
        state.alignment_locked = true;
        state.reposition = true;
    }

    #[allow(clippy::too_many_lines)]
    fn apply_tag(&mut self, tag: Tag, arg: &str, state: &mut RunState) {
        let script = self.script;
        let base = script.style(&state.style.name);
        match tag {
            Tag::Bold => {
                let value = arg.trim();
                state.decl.weight = match number(value) {
                    _ if value.is_empty() => state.style.weight,
                    Some(v) if v == 0.0 => 400,
                    Some(v) if v == 1.0 => 700,
                    Some(v) => v.clamp(1.0, 1000.0) as u16,
                    None => state.style.weight,
                };
            }
            Tag::Italic => {
                state.decl.italic = if arg.trim().is_empty() {
                    state.style.italic
                } else {
                    number(arg).is_some_and(|v| v != 0.0)
                };
            }
            Tag::Underline | Tag::StrikeOut => {
                let (flag, from_style) = if tag == Tag::Underline {
                    (Decoration::UNDERLINE, state.style.underline)
                } else {
                    (Decoration::STRIKEOUT, state.style.strikeout)
                };
                let on = if arg.trim().is_empty() {
                    from_style
                } else {
                    number(arg).is_some_and(|v| v != 0.0)
                };
                state.decl.decoration.set(flag, on);
            }
            Tag::Alpha => {
                if arg.trim().is_empty() {
                    state.style.primary.a = base.primary.a;
                    state.style.secondary.a = base.secondary.a;
                    state.style.outline_color.a = base.outline_color.a;
                    state.style.back.a = base.back.a;
                } else if let Ok(opacity) = parse_alpha(arg) {
                    for channel in 1..=4 {
                        channel_mut(&mut state.style, channel).a = opacity;
                    }
                }
            }
            Tag::ChannelAlpha(channel) => {
                if let Ok(opacity) = parse_alpha(arg) {
                    channel_mut(&mut state.style, channel).a = opacity;
                }
            }
            Tag::Color(channel) => {
                let Ok(color) = parse_bgr_color(arg) else {
                    trace!("ignoring color {arg:?}");
                    return;
                };
                let slot = channel_mut(&mut state.style, channel);
                *slot = if hex_digits(arg) > 6 {
                    color
                } else {
                    color.with_opacity(slot.a)
                };
            }
            Tag::LegacyAlign => {
                let alignment = if is_reset(arg) {
                    None
                } else {
                    number(arg).and_then(|v| Alignment::from_legacy(v as u8))
                };
                if alignment.is_some() || is_reset(arg) {
                    self.set_alignment(alignment, state);
                }
            }
            Tag::Align => {
                let alignment = if is_reset(arg) {
                    None
                } else {
                    number(arg).and_then(|v| Alignment::new(v as u8))
                };
                if alignment.is_some() || is_reset(arg) {
                    self.set_alignment(alignment, state);
                }
            }
            Tag::BlurEdges | Tag::Blur => {
                state.style.blur = if arg.trim().is_empty() {
                    base.blur
                } else {
                    number_or(arg, 0.0).max(0.0)
                };
            }
            Tag::Border => {
                state.style.outline = if arg.trim().is_empty() {
                    base.outline
                } else {
                    number_or(arg, 0.0).max(0.0)
                };
            }
            Tag::XBorder => state.decl.markers.push(format!("xbord{arg}")),
            Tag::YBorder => state.decl.markers.push(format!("ybord{arg}")),
            Tag::Clip | Tag::InverseClip => {
                let args = split_args(arg);
                let path = match args.as_slice() {
                    [] => return,
                    [x1, y1, x2, y2] => {
                        let (x1, y1) = (number_or(x1, 0.0), number_or(y1, 0.0));
                        let (x2, y2) = (number_or(x2, 0.0), number_or(y2, 0.0));
                        format!("M {x1} {y1} L {x2} {y1} L {x2} {y2} L {x1} {y2} Z")
                    }
                    [scale, path] => {
                        let level = number_or(scale, 1.0);
                        drawing::convert(path, 2f64.powf(1.0 - level)).data
                    }
                    _ => drawing::convert(arg, 1.0).data,
                };
                state.clip = Some(ClipRegion {
                    id: self.ids.allocate(),
                    inverse: tag == Tag::InverseClip,
                    path,
                });
            }
            Tag::Fad => {
                if let [fade_in, fade_out, ..] = split_args(arg).as_slice() {
                    state.fade = Some(Fade::simple(
                        number_or(fade_in, 0.0),
                        number_or(fade_out, 0.0),
                        self.duration_ms,
                    ));
                }
            }
            Tag::Fade => {
                if let [a1, a2, a3, t1, t2, t3, t4, ..] = split_args(arg).as_slice() {
                    let alpha = |value: &str| number_or(value, 0.0).clamp(0.0, 255.0) as u8;
                    state.fade = Some(Fade::from_alphas(
                        [alpha(*a1), alpha(*a2), alpha(*a3)],
                        [
                            number_or(t1, 0.0),
                            number_or(t2, 0.0),
                            number_or(t3, 0.0),
                            number_or(t4, 0.0),
                        ],
                    ));
                }
            }
            Tag::ShearX => state.transforms.set(Transform::SkewX(number_or(arg, 0.0))),
            Tag::ShearY => state.transforms.set(Transform::SkewY(number_or(arg, 0.0))),
            Tag::RotateX => state.transforms.set(Transform::RotateX(number_or(arg, 0.0))),
            Tag::RotateY => state.transforms.set(Transform::RotateY(number_or(arg, 0.0))),
            Tag::RotateZ => {
                state.style.angle = number_or(arg, base.angle);
                state.transforms.set(Transform::RotateZ(state.style.angle));
            }
            Tag::FontName => {
                let family = arg.trim();
                state.style.font_name = if family.is_empty() {
                    base.font_name.clone()
                } else {
                    family.to_string()
                };
                state.decl.font_family = state.style.font_name.clone();
                state.reposition = true;
            }
            Tag::FontSize => {
                let value = arg.trim();
                let size = if is_reset(value) {
                    base.font_size
                } else if value.starts_with(['+', '-']) {
                    let step = number_or(value, 0.0).trunc();
                    state.style.font_size * (1.0 + step / 10.0)
                } else {
                    number_or(value, base.font_size)
                };
                state.style.font_size = size.max(0.0);
                state.decl.font_size = state.style.font_size;
                state.reposition = true;
            }
            Tag::FontScale | Tag::FontScaleX | Tag::FontScaleY => {
                let horizontal = tag != Tag::FontScaleY;
                let vertical = tag != Tag::FontScaleX;
                if horizontal {
                    state.style.scale_x = if is_reset(arg) {
                        base.scale_x
                    } else {
                        number_or(arg, base.scale_x)
                    };
                    state.transforms.set(Transform::ScaleX(state.style.scale_x / 100.0));
                }
                if vertical {
                    state.style.scale_y = if is_reset(arg) {
                        base.scale_y
                    } else {
                        number_or(arg, base.scale_y)
                    };
                    state.transforms.set(Transform::ScaleY(state.style.scale_y / 100.0));
                }
            }
            Tag::Spacing => {
                state.decl.letter_spacing = if is_reset(arg) {
                    state.style.spacing
                } else {
                    number_or(arg, state.style.spacing)
                };
            }
            Tag::Karaoke | Tag::KaraokeOutline | Tag::KaraokeSweep => {
                let kind = match tag {
                    Tag::Karaoke => KaraokeKind::Discrete,
                    Tag::KaraokeOutline => KaraokeKind::Outline,
                    _ => KaraokeKind::Sweep {
                        gradient: self.ids.allocate(),
                    },
                };
                let start_ms = state.karaoke_timer;
                let end_ms = start_ms + number_or(arg, 0.0) * 10.0;
                state.karaoke.push(KaraokeSegment {
                    start_ms,
                    end_ms,
                    kind,
                    before: state.style.secondary,
                    after: state.style.primary,
                });
                state.decl.karaoke = Some(state.karaoke.len() - 1);
                state.karaoke_timer = end_ms;
            }
            Tag::KaraokeOffset => state.karaoke_timer += number_or(arg, 0.0) * 10.0,
            Tag::Move => {
                let args = split_args(arg);
                if let [x1, y1, x2, y2, rest @ ..] = args.as_slice() {
                    let from = (number_or(x1, 0.0), number_or(y1, 0.0));
                    let (t1, t2) = match rest {
                        [t1, t2, ..] => (number_or(t1, 0.0), number_or(t2, self.duration_ms)),
                        _ => (0.0, self.duration_ms),
                    };
                    state.position = Some(from);
                    state.motion = Some(Motion {
                        from: Some(from),
                        to: (number_or(x2, 0.0), number_or(y2, 0.0)),
                        t1,
                        t2,
                        accel: 1.0,
                    });
                    state.reposition = true;
                }
            }
            Tag::Origin => {
                if let [x, y, ..] = split_args(arg).as_slice() {
                    state.origin = Some((number_or(x, 0.0), number_or(y, 0.0)));
                }
            }
            Tag::Drawing => {
                let level = number_or(arg, 0.0);
                if level > 0.0 {
                    state.drawing_scale = 2f64.powf(1.0 - level);
                    state.path_offset.1 = 0.0;
                } else {
                    state.drawing_scale = 0.0;
                }
            }
            Tag::BaselineOffset => state.path_offset.1 = number_or(arg, 0.0),
            Tag::Position => {
                if let [x, y, ..] = split_args(arg).as_slice() {
                    state.position = Some((number_or(x, 0.0), number_or(y, 0.0)));
                    state.reposition = true;
                }
            }
            Tag::WrapStyle => {
                state.wrap_style = number(arg).map(|v| v.clamp(0.0, 3.0) as u8);
            }
            Tag::Reset => {
                let name = sanitize_name(arg.trim());
                let style = if name.is_empty() {
                    None
                } else {
                    script.find_style(&name)
                };
                state.style = style.unwrap_or(base).clone();
                let scopes = std::mem::take(&mut state.decl.scopes);
                let karaoke = state.decl.karaoke;
                let markers = std::mem::take(&mut state.decl.markers);
                state.decl = Declarations {
                    scopes,
                    karaoke,
                    markers,
                    ..Declarations::from_style(&state.style)
                };
                state.alignment_locked = false;
                state.reposition = true;
            }
            Tag::Shadow => {
                let offset = if arg.trim().is_empty() {
                    base.shadow_x
                } else {
                    number_or(arg, 0.0)
                };
                state.style.shadow_x = offset;
                state.style.shadow_y = offset;
            }
            Tag::XShadow => state.style.shadow_x = number_or(arg, base.shadow_x),
            Tag::YShadow => state.style.shadow_y = number_or(arg, base.shadow_y),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::preprocess::prepare;
    use crate::pipeline::TransformKind;

    const SCRIPT: &str = "[Script Info]
PlayResX: 640
PlayResY: 480

[V4+ Styles]
Format: Name, Fontname, Fontsize, PrimaryColour, SecondaryColour, OutlineColour, BackColour, Bold, Alignment, Outline, Shadow, BorderStyle
Style: Default,Arial,20,&H00FFFFFF,&H000000FF,&H00000000,&H80000000,0,2,2,0,1
Style: Sign,Impact,30,&H0000FFFF,&H000000FF,&H00000000,&H80000000,-1,8,0,0,3
";

    fn run(text: &str) -> InterpretedRun {
        let script = Script::parse(SCRIPT);
        let mut ids = IdAllocator::new();
        let style = script.style("Default").clone();
        Interpreter::new(&script, &mut ids, 2000.0).interpret(&prepare(text, 0), &style)
    }

    #[test]
    fn bold_spans_split_text() {
        let run = run("{}Hello {\\b1}World{\\b0}!");
        let texts: Vec<_> = run.spans.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(texts, ["Hello ", "World", "!"]);
        let weights: Vec<_> = run.spans.iter().map(|s| s.decl.weight).collect();
        assert_eq!(weights, [400, 700, 400]);
        assert_eq!(run.text(), "Hello World!");
    }

    #[test]
    fn text_without_blocks_is_one_span() {
        let run = run("plain");
        assert_eq!(run.spans.len(), 1);
        assert_eq!(run.spans[0].decl.fill, Paint::Solid(Color::WHITE));
    }

    #[test]
    fn color_keeps_alpha_unless_given() {
        let run = run("{\\alpha&H80&\\c&H0000FF&}red");
        let Paint::Solid(fill) = run.spans[0].decl.fill else {
            panic!("expected a flat fill");
        };
        assert_eq!((fill.r, fill.g, fill.b), (255, 0, 0));
        assert!((fill.a - ass_script::utils::alpha_to_opacity(0x80)).abs() < 1e-6);
    }

    #[test]
    fn transition_is_scheduled_and_scoped() {
        let run = run("{\\t(0,500,\\fs80\\frz30)}x");
        assert_eq!(run.state.transitions.len(), 1);
        let transition = &run.state.transitions[0];
        assert_eq!(transition.payload, "\\fs80\\frz30");
        assert!((transition.end_ms - 500.0).abs() < f64::EPSILON);
        assert_eq!(run.spans[0].decl.scopes.as_slice(), &[transition.id]);
        // nothing applied yet
        assert!((run.spans[0].decl.font_size - 20.0).abs() < f64::EPSILON);
        assert!(!run.state.transforms.contains(TransformKind::RotateZ));
    }

    #[test]
    fn transition_times_default_to_the_event() {
        let run = run("{\\t(2,\\bord5)}x");
        let transition = &run.state.transitions[0];
        assert!(transition.start_ms.abs() < f64::EPSILON);
        assert!((transition.end_ms - 2000.0).abs() < f64::EPSILON);
        assert!((transition.accel - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn pos_inside_transition_becomes_motion() {
        let run = run("{\\pos(10,20)\\t(0,1000,\\pos(110,20))}x");
        assert!(run.state.transitions.is_empty());
        let motion = run.state.motion.expect("motion");
        assert_eq!(motion.from, Some((10.0, 20.0)));
        assert_eq!(motion.to, (110.0, 20.0));
        assert!(run.spans[0].decl.scopes.is_empty());
    }

    #[test]
    fn karaoke_segments_follow_the_clock() {
        let run = run("{\\k50}ka{\\kf100}ra");
        assert_eq!(run.state.karaoke.len(), 2);
        let sweep = run.state.karaoke[1];
        assert!((sweep.start_ms - 500.0).abs() < f64::EPSILON);
        assert!((sweep.end_ms - 1500.0).abs() < f64::EPSILON);
        assert_eq!(run.spans[0].decl.karaoke, Some(0));
        assert_eq!(run.spans[1].decl.fill, Paint::Gradient(sweep.gradient().expect("gradient")));
    }

    #[test]
    fn drawing_leaves_an_advance() {
        let run = run("{\\p1}m 0 0 l 100 0 100 100 0 100{\\p0}x");
        assert_eq!(run.shapes.len(), 1);
        assert_eq!(run.shapes[0].path, "M 0 0 L 100 0 L 100 100 L 0 100 Z");
        assert_eq!(run.spans.len(), 1);
        assert!((run.spans[0].dx - 50.0).abs() < 1e-6);
    }

    #[test]
    fn reset_restores_the_style() {
        let run = run("{\\b1\\fs50}a{\\r}b{\\rSign}c");
        assert_eq!(run.spans[0].decl.weight, 700);
        assert_eq!(run.spans[1].decl.weight, 400);
        assert!((run.spans[1].decl.font_size - 20.0).abs() < f64::EPSILON);
        assert_eq!(run.spans[2].decl.font_family, "Impact");
        assert_eq!(run.span_styles[2].name, "Sign");
    }

    #[test]
    fn first_alignment_wins() {
        let run = run("{\\an7\\an9}x");
        assert_eq!(run.state.style.alignment.value(), 7);
        assert!(run.state.reposition);
    }

    #[test]
    fn rectangular_clip() {
        let run = run("{\\clip(0,0,100,50)}x");
        let clip = run.state.clip.expect("clip");
        assert!(!clip.inverse);
        assert_eq!(clip.path, "M 0 0 L 100 0 L 100 50 L 0 50 Z");
    }

    #[test]
    fn relative_font_size() {
        let run = run("{\\fs+5}x");
        assert!((run.spans[0].decl.font_size - 30.0).abs() < 1e-9);
    }

    #[test]
    fn unknown_tokens_become_markers() {
        let run = run("{\\xyz\\bord3}x");
        assert_eq!(run.spans[0].decl.markers, ["xyz"]);
        assert!((run.spans[0].decl.stroke_width - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn outline_glow_uses_the_border_color() {
        let run = run("{\\blur2}x");
        assert_eq!(run.state.line.filters.len(), 1);
        assert_eq!(run.state.line.filters[0].color, Color::BLACK);
        assert!(run.state.line.border_box.is_none());
    }

    #[test]
    fn opaque_box_takes_the_stroke() {
        let script = Script::parse(SCRIPT);
        let mut ids = IdAllocator::new();
        let style = script.style("Sign").clone();
        let run = Interpreter::new(&script, &mut ids, 1000.0)
            .interpret(&prepare("{\\bord4}boxed", 0), &style);
        let paint = run.state.line.border_box.expect("box");
        assert!((paint.stroke_width - 4.0).abs() < f64::EPSILON);
        assert!(run.spans[0].decl.stroke_width.abs() < f64::EPSILON);
    }
}
