//! Styles section parser for ASS scripts.
//!
//! Handles the `[V4+ Styles]` (and legacy `[V4 Styles]`) section: a `Format:`
//! line defines the column order and every `Style:` line is zipped against it.

use crate::{
    parser::{
        ast::{Alignment, BorderStyle, Style},
        errors::IssueCategory,
        ParseIssue,
    },
    utils::{parse_bgr_color, parse_float_prefix, sanitize_name, Color},
};

use super::{field, parse_format};

/// Column order assumed when a section has no `Format:` line
const DEFAULT_STYLE_FORMAT: &[&str] = &[
    "Name",
    "Fontname",
    "Fontsize",
    "PrimaryColour",
    "SecondaryColour",
    "OutlineColour",
    "BackColour",
    "Bold",
    "Italic",
    "Underline",
    "StrikeOut",
    "ScaleX",
    "ScaleY",
    "Spacing",
    "Angle",
    "BorderStyle",
    "Outline",
    "Shadow",
    "Alignment",
    "MarginL",
    "MarginR",
    "MarginV",
    "Encoding",
];

/// Parser for `[V4+ Styles]` section content
///
/// Styles with a repeated name replace the earlier definition in place.
#[derive(Debug, Default)]
pub struct StylesParser {
    /// Format fields for the styles section
    format: Option<Vec<String>>,
    styles: Vec<Style>,
    issues: Vec<ParseIssue>,
}

impl StylesParser {
    /// Create an empty parser
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a single trimmed, non-empty line
    pub fn parse_line(&mut self, line: &str, line_number: usize) {
        if let Some(format_data) = line.strip_prefix("Format:") {
            self.format = Some(parse_format(format_data));
        } else if let Some(style_data) = line.strip_prefix("Style:") {
            if let Some(style) = self.parse_style_line(style_data, line_number) {
                match self.styles.iter_mut().find(|s| s.name == style.name) {
                    Some(existing) => *existing = style,
                    None => self.styles.push(style),
                }
            }
        } else if !line.starts_with(';') {
            log::trace!("skipping style section line {line_number}: {line}");
            self.issues.push(ParseIssue::info(
                IssueCategory::Structure,
                format!("Unexpected line in styles section: {line}"),
                line_number,
            ));
        }
    }

    /// Finish the section
    #[must_use]
    pub fn finish(self) -> (Vec<Style>, Vec<ParseIssue>) {
        (self.styles, self.issues)
    }

    /// Parse single style definition line
    fn parse_style_line(&mut self, data: &str, line_number: usize) -> Option<Style> {
        let default_format: Vec<String>;
        let format = if let Some(format) = &self.format {
            format.as_slice()
        } else {
            default_format = DEFAULT_STYLE_FORMAT.iter().map(ToString::to_string).collect();
            &default_format
        };

        let parts: Vec<&str> = data.split(',').map(str::trim).collect();
        if parts.len() != format.len() {
            self.issues.push(ParseIssue::warning(
                IssueCategory::Format,
                format!(
                    "Style line has {} fields, expected {}",
                    parts.len(),
                    format.len()
                ),
                line_number,
            ));
        }

        let get = |name: &str| field(format, &parts, name).filter(|v| !v.is_empty());

        let Some(name) = get("Name") else {
            self.issues.push(ParseIssue::error(
                IssueCategory::Style,
                "Style line has no name".to_string(),
                line_number,
            ));
            return None;
        };

        let mut style = Style {
            name: sanitize_name(name),
            ..Style::default()
        };

        if let Some(font) = get("Fontname") {
            match font.strip_prefix('@') {
                Some(font) => {
                    style.font_name = font.to_string();
                    style.vertical = true;
                }
                None => style.font_name = font.to_string(),
            }
        }

        style.font_size = number(get("Fontsize"))
            .filter(|size| *size > 0.0)
            .unwrap_or(style.font_size);

        style.primary = color_or(get("PrimaryColour"), Color::WHITE);
        style.secondary = color_or(get("SecondaryColour"), Color::BLUE);
        style.outline_color = color_or(get("OutlineColour"), Color::BLACK);
        style.back = color_or(get("BackColour"), Color::BLACK);

        style.weight = weight(number(get("Bold")).unwrap_or(0.0));
        style.italic = flag(get("Italic"));
        style.underline = flag(get("Underline"));
        style.strikeout = flag(get("StrikeOut"));

        style.scale_x = number(get("ScaleX"))
            .filter(|v| *v != 0.0)
            .unwrap_or(100.0);
        style.scale_y = number(get("ScaleY"))
            .filter(|v| *v != 0.0)
            .unwrap_or(100.0);
        style.spacing = number(get("Spacing")).unwrap_or(0.0);

        style.angle = number(get("Angle")).unwrap_or(0.0);
        if style.vertical {
            style.angle -= 270.0;
        }

        style.border_style = integer(get("BorderStyle")).map_or(BorderStyle::Outline, BorderStyle::from_code);
        style.outline = number(get("Outline")).unwrap_or(0.0);

        let shadow = number(get("Shadow")).unwrap_or(0.0);
        if shadow != 0.0 {
            if style.outline == 0.0 {
                style.outline = 1.0;
            }
            style.shadow_x = shadow;
            style.shadow_y = shadow;
        }

        style.blur = number(get("Blur")).unwrap_or(0.0);

        style.alignment = integer(get("Alignment"))
            .and_then(|a| u8::try_from(a).ok())
            .and_then(Alignment::new)
            .unwrap_or_default();

        style.margin_l = integer(get("MarginL")).unwrap_or(0);
        style.margin_r = integer(get("MarginR")).unwrap_or(0);
        style.margin_v = integer(get("MarginV")).unwrap_or(0);
        style.justify = integer(get("Justify"))
            .and_then(|j| u8::try_from(j).ok())
            .filter(|j| *j <= 3)
            .unwrap_or(0);

        Some(style)
    }
}

fn number(value: Option<&str>) -> Option<f64> {
    value.and_then(parse_float_prefix).filter(|v| v.is_finite())
}

/// Integer prefix of a field, like `parseInt`
fn integer(value: Option<&str>) -> Option<i32> {
    number(value).map(|v| v.trunc() as i32)
}

fn flag(value: Option<&str>) -> bool {
    number(value).is_some_and(|v| v != 0.0)
}

/// `0` is normal, `1`/`-1` bold, anything else a numeric weight
fn weight(bold: f64) -> u16 {
    if bold == 0.0 {
        400
    } else if bold == 1.0 || bold < 0.0 {
        700
    } else {
        bold.clamp(1.0, 1000.0) as u16
    }
}

fn color_or(value: Option<&str>, fallback: Color) -> Color {
    value.and_then(|v| parse_bgr_color(v).ok()).unwrap_or(fallback)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(lines: &[&str]) -> (Vec<Style>, Vec<ParseIssue>) {
        let mut parser = StylesParser::new();
        for (i, line) in lines.iter().enumerate() {
            parser.parse_line(line, i + 1);
        }
        parser.finish()
    }

    #[test]
    fn full_v4_plus_style() {
        let (styles, issues) = parse(&[
            "Format: Name, Fontname, Fontsize, PrimaryColour, SecondaryColour, OutlineColour, BackColour, Bold, Italic, Underline, StrikeOut, ScaleX, ScaleY, Spacing, Angle, BorderStyle, Outline, Shadow, Alignment, MarginL, MarginR, MarginV, Encoding",
            "Style: Main Title,Verdana,52,&H0000FFFF,&H000000FF,&H00101010,&H80000000,-1,0,1,0,110,90,1.5,10,3,2.5,2,8,15,25,30,1",
        ]);
        assert!(issues.is_empty());
        let style = &styles[0];
        assert_eq!(style.name, "Main_Title");
        assert_eq!(style.font_name, "Verdana");
        assert!((style.font_size - 52.0).abs() < f64::EPSILON);
        assert_eq!(style.primary, Color::opaque(255, 255, 0));
        assert_eq!(style.secondary, Color::opaque(255, 0, 0));
        assert!(style.is_bold());
        assert!(style.underline && !style.italic && !style.strikeout);
        assert!((style.scale_x - 110.0).abs() < f64::EPSILON);
        assert!((style.spacing - 1.5).abs() < f64::EPSILON);
        assert_eq!(style.border_style, BorderStyle::OpaqueBox);
        assert!((style.shadow_x - 2.0).abs() < f64::EPSILON);
        assert_eq!(style.alignment.value(), 8);
        assert_eq!((style.margin_l, style.margin_r, style.margin_v), (15, 25, 30));
    }

    #[test]
    fn missing_fields_keep_defaults() {
        let (styles, issues) = parse(&["Format: Name, Fontname", "Style: Plain,"]);
        assert!(issues.is_empty());
        let style = &styles[0];
        assert_eq!(style.font_name, "Arial");
        assert!((style.font_size - 40.0).abs() < f64::EPSILON);
        assert_eq!(style.secondary, Color::BLUE);
        assert_eq!(style.alignment, Alignment::BOTTOM_CENTER);
    }

    #[test]
    fn vertical_font_rotates() {
        let (styles, _) = parse(&["Format: Name, Fontname, Angle", "Style: V,@MS Gothic,0"]);
        assert!(styles[0].vertical);
        assert_eq!(styles[0].font_name, "MS Gothic");
        assert!((styles[0].angle + 270.0).abs() < f64::EPSILON);
    }

    #[test]
    fn shadow_raises_outline() {
        let (styles, _) = parse(&["Format: Name, Outline, Shadow", "Style: S,0,3"]);
        assert!((styles[0].outline - 1.0).abs() < f64::EPSILON);
        assert!((styles[0].shadow_y - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn duplicates_replace_in_place() {
        let (styles, _) = parse(&[
            "Format: Name, Fontsize",
            "Style: A,10",
            "Style: B,20",
            "Style: A,30",
        ]);
        assert_eq!(styles.len(), 2);
        assert_eq!(styles[0].name, "A");
        assert!((styles[0].font_size - 30.0).abs() < f64::EPSILON);
    }

    #[test]
    fn field_count_mismatch_is_reported_but_kept() {
        let (styles, issues) = parse(&["Format: Name, Fontname, Fontsize", "Style: Short,Arial"]);
        assert_eq!(styles.len(), 1);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].category, IssueCategory::Format);
    }

    #[test]
    fn default_format_without_format_line() {
        let (styles, _) = parse(&[
            "Style: Default,Arial,20,&H00FFFFFF,&H000000FF,&H00000000,&H00000000,0,0,0,0,100,100,0,0,1,2,0,2,10,10,10,1",
        ]);
        assert!((styles[0].font_size - 20.0).abs() < f64::EPSILON);
        assert!((styles[0].outline - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn numeric_weights() {
        assert_eq!(weight(0.0), 400);
        assert_eq!(weight(-1.0), 700);
        assert_eq!(weight(1.0), 700);
        assert_eq!(weight(300.0), 300);
    }

    #[test]
    fn unnamed_style_is_rejected() {
        let (styles, issues) = parse(&["Format: Name, Fontname", "Style: ,Arial"]);
        assert!(styles.is_empty());
        assert_eq!(issues[0].category, IssueCategory::Style);
    }
}
