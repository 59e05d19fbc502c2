//! Value parsing helpers shared by the section parsers
//!
//! ASS encodes colors as `&H[AA]BBGGRR` with an inverted alpha channel
//! (`00` is opaque) and times as `H:MM:SS.ff`. Every helper exists in a strict
//! form returning [`CoreError`] and, where the document format demands it, a
//! lenient form that substitutes a default.
//!
//! # Example
//!
//! ```rust
//! use ass_script::utils::{parse_bgr_color, Color};
//!
//! let color = parse_bgr_color("&H800000FF&")?;
//! assert_eq!((color.r, color.g, color.b), (255, 0, 0));
//! assert!((color.a - (1.0 - 128.0 / 255.0)).abs() < 1e-6);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod errors;

use core::fmt;

pub use errors::CoreError;

/// RGB color with an independent opacity channel
///
/// `a` is an opacity in `0.0..=1.0` (already inverted from the ASS alpha).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Color {
    /// Red channel
    pub r: u8,
    /// Green channel
    pub g: u8,
    /// Blue channel
    pub b: u8,
    /// Opacity, 1.0 is fully opaque
    pub a: f32,
}

impl Color {
    /// Opaque white
    pub const WHITE: Self = Self::opaque(255, 255, 255);
    /// Opaque black
    pub const BLACK: Self = Self::opaque(0, 0, 0);
    /// Opaque blue, the default karaoke color
    pub const BLUE: Self = Self::opaque(0, 0, 255);

    /// Create an opaque color
    #[must_use]
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Same color with a different opacity
    #[must_use]
    pub const fn with_opacity(self, a: f32) -> Self {
        Self { a, ..self }
    }

    /// Interpolate channel-wise towards `other`
    #[must_use]
    pub fn lerp(self, other: Self, t: f32) -> Self {
        let channel =
            |from: u8, to: u8| f32::from(to).mul_add(t, f32::from(from) * (1.0 - t)).round() as u8;
        Self {
            r: channel(self.r, other.r),
            g: channel(self.g, other.g),
            b: channel(self.b, other.b),
            a: (other.a - self.a).mul_add(t, self.a),
        }
    }

    /// Check whether the RGB channels and opacity match `other`
    #[must_use]
    pub fn same_as(self, other: Self) -> bool {
        self.r == other.r
            && self.g == other.g
            && self.b == other.b
            && (self.a - other.a).abs() < f32::EPSILON
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgba({},{},{},{})", self.r, self.g, self.b, self.a)
    }
}

/// Convert an ASS alpha byte (`0` opaque, `255` transparent) to an opacity
#[must_use]
pub fn alpha_to_opacity(alpha: u8) -> f32 {
    1.0 - f32::from(alpha) / 255.0
}

/// Strip the `&H`/`&h`/`0x` prefix and trailing `&` of a hex field
fn strip_hex_markers(value: &str) -> Option<&str> {
    let trimmed = value.trim().trim_end_matches('&');
    trimmed
        .strip_prefix("&H")
        .or_else(|| trimmed.strip_prefix("&h"))
        .or_else(|| trimmed.strip_prefix("0x"))
        .or_else(|| trimmed.strip_prefix('H'))
        .or_else(|| trimmed.strip_prefix('h'))
}

/// Parse ASS BGR color format to a [`Color`]
///
/// Accepts `&HBBGGRR`, `&HAABBGGRR` (with or without trailing `&`), short hex
/// forms such as `&H0` (left-padded with zeros) and plain decimal values as
/// found in legacy V4 style tables.
///
/// # Errors
///
/// Returns [`CoreError::InvalidColor`] when the value is empty, has more than
/// eight hex digits or contains non-hex characters.
pub fn parse_bgr_color(value: &str) -> Result<Color, CoreError> {
    let packed = if let Some(hex) = strip_hex_markers(value) {
        if hex.is_empty() || hex.len() > 8 {
            return Err(CoreError::InvalidColor(format!(
                "Invalid color length: {value}"
            )));
        }
        let packed = u32::from_str_radix(hex, 16)
            .map_err(|_| CoreError::InvalidColor(format!("Invalid hex value: {value}")))?;
        // Short forms (up to six digits) carry no alpha byte.
        if hex.len() <= 6 {
            packed & 0x00FF_FFFF
        } else {
            packed
        }
    } else {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(CoreError::InvalidColor("empty color".to_string()));
        }
        trimmed
            .parse::<i64>()
            .map(|decimal| decimal as u32)
            .map_err(|_| CoreError::InvalidColor(format!("Invalid color format: {value}")))?
    };

    let [red, green, blue, alpha] = packed.to_le_bytes();
    Ok(Color {
        r: red,
        g: green,
        b: blue,
        a: alpha_to_opacity(alpha),
    })
}

/// Parse an ASS alpha override value (`&HAA&`) into an opacity
///
/// # Errors
///
/// Returns [`CoreError::InvalidColor`] if the value is not a hex byte.
pub fn parse_alpha(value: &str) -> Result<f32, CoreError> {
    let hex = strip_hex_markers(value).unwrap_or_else(|| value.trim());
    let alpha = u32::from_str_radix(hex, 16)
        .map_err(|_| CoreError::InvalidColor(format!("Invalid alpha value: {value}")))?;
    Ok(alpha_to_opacity(alpha.min(255) as u8))
}

/// Parse numeric value from ASS field with validation
///
/// # Errors
///
/// Returns [`CoreError::InvalidNumeric`] if the string cannot be parsed as the
/// target numeric type.
pub fn parse_numeric<T>(value: &str) -> Result<T, CoreError>
where
    T: core::str::FromStr,
    T::Err: fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e| CoreError::InvalidNumeric(format!("Failed to parse '{value}': {e}")))
}

/// Parse the leading numeric prefix of a value, like `parseFloat`
///
/// `"12.5px"` yields `Some(12.5)`, `"abc"` yields `None`.
#[must_use]
pub fn parse_float_prefix(value: &str) -> Option<f64> {
    let trimmed = value.trim_start();
    let mut end = 0;
    let mut seen_digit = false;
    let mut seen_dot = false;
    for (index, ch) in trimmed.char_indices() {
        match ch {
            '+' | '-' if index == 0 => {}
            '0'..='9' => seen_digit = true,
            '.' if !seen_dot => seen_dot = true,
            _ => break,
        }
        end = index + ch.len_utf8();
    }
    if !seen_digit {
        return None;
    }
    trimmed[..end].trim_end_matches('.').parse().ok()
}

/// Parse ASS time format (`H:MM:SS.CC`) to centiseconds
///
/// # Example
///
/// ```rust
/// # use ass_script::utils::parse_ass_time;
/// assert_eq!(parse_ass_time("0:01:30.50")?, 9050);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
///
/// # Errors
///
/// Returns [`CoreError::InvalidTime`] if the time format is invalid.
pub fn parse_ass_time(value: &str) -> Result<u32, CoreError> {
    let parts: Vec<&str> = value.trim().split(':').collect();
    if parts.len() != 3 {
        return Err(CoreError::InvalidTime(format!("Invalid time format: {value}")));
    }

    let hours: u32 = parts[0]
        .parse()
        .map_err(|_| CoreError::InvalidTime(format!("Invalid hours: {}", parts[0])))?;
    let minutes: u32 = parts[1]
        .parse()
        .map_err(|_| CoreError::InvalidTime(format!("Invalid minutes: {}", parts[1])))?;

    let (seconds_str, frac_str) = parts[2].split_once('.').unwrap_or((parts[2], ""));
    let seconds: u32 = seconds_str
        .parse()
        .map_err(|_| CoreError::InvalidTime(format!("Invalid seconds: {seconds_str}")))?;
    let centiseconds = match frac_str.len() {
        0 => 0,
        1 | 2 => {
            let frac: u32 = frac_str
                .parse()
                .map_err(|_| CoreError::InvalidTime(format!("Invalid centiseconds: {frac_str}")))?;
            if frac_str.len() == 1 {
                frac * 10
            } else {
                frac
            }
        }
        _ => {
            return Err(CoreError::InvalidTime(format!(
                "Too many decimal places: {frac_str}"
            )))
        }
    };

    if minutes >= 60 || seconds >= 60 {
        return Err(CoreError::InvalidTime(format!("Out of range: {value}")));
    }

    Ok(hours * 360_000 + minutes * 6_000 + seconds * 100 + centiseconds)
}

/// Parse an ASS time field to seconds, substituting `0` for malformed parts
///
/// Unlike [`parse_ass_time`] this accepts any number of decimal places and
/// out-of-range minute/second values, matching how players treat
/// hand-edited scripts.
#[must_use]
pub fn parse_time_lenient(value: &str) -> f64 {
    let mut total = 0.0;
    for part in value.trim().split(':') {
        let component = parse_float_prefix(part).unwrap_or(0.0);
        total = total * 60.0 + component;
    }
    if total.is_finite() {
        total.max(0.0)
    } else {
        0.0
    }
}

/// Format centiseconds back to ASS time format
#[must_use]
pub fn format_ass_time(centiseconds: u32) -> String {
    let hours = centiseconds / 360_000;
    let remainder = centiseconds % 360_000;
    let minutes = remainder / 6000;
    let remainder = remainder % 6000;
    let seconds = remainder / 100;
    let cs = remainder % 100;

    format!("{hours}:{minutes:02}:{seconds:02}.{cs:02}")
}

/// Replace every character outside `[A-Za-z0-9_-]` with `_`
///
/// Style names are used as identifiers by renderers, so both style
/// definitions and event style references are sanitized the same way.
#[must_use]
pub fn sanitize_name(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Interpret an ASS boolean field (`-1` and any non-zero number are true)
#[must_use]
pub fn parse_flag(value: &str) -> bool {
    parse_float_prefix(value).is_some_and(|v| v != 0.0)
}
