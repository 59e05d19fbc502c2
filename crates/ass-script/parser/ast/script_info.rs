//! Script Info AST node for ASS script metadata
//!
//! Stores the `[Script Info]` section as ordered key-value pairs with typed
//! accessors for the fields renderers consume.

use crate::utils::{parse_flag, parse_float_prefix};

/// Script Info section containing metadata and headers
///
/// # Examples
///
/// ```rust
/// use ass_script::ScriptInfo;
///
/// let info = ScriptInfo::from_pairs([("PlayResX", "640"), ("PlayResY", "480"), ("Timer", "50")]);
///
/// assert_eq!(info.play_resolution(), Some((640, 480)));
/// assert!((info.playback_speed() - 2.0).abs() < 1e-9);
/// assert_eq!(info.wrap_style(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScriptInfo {
    /// Key-value pairs in document order
    pub fields: Vec<(String, String)>,
}

impl ScriptInfo {
    /// Build from borrowed pairs
    #[must_use]
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        Self {
            fields: pairs
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    /// Get field value by key (case-sensitive)
    ///
    /// When a key repeats, the last occurrence wins.
    #[must_use]
    pub fn get_field(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Get script title, defaulting to `<untitled>`
    #[must_use]
    pub fn title(&self) -> &str {
        self.get_field("Title").unwrap_or("<untitled>")
    }

    /// Get play resolution as (width, height)
    ///
    /// `None` if either field is missing or invalid, in which case renderers
    /// use the host video size.
    #[must_use]
    pub fn play_resolution(&self) -> Option<(u32, u32)> {
        let width = self.get_field("PlayResX")?.trim().parse().ok()?;
        let height = self.get_field("PlayResY")?.trim().parse().ok()?;
        Some((width, height))
    }

    /// Play resolution with per-axis fallback to the host size
    #[must_use]
    pub fn resolution_or(&self, fallback: (u32, u32)) -> (u32, u32) {
        let axis = |key: &str, default: u32| {
            self.get_field(key)
                .and_then(|v| v.trim().parse().ok())
                .filter(|&v: &u32| v > 0)
                .unwrap_or(default)
        };
        (axis("PlayResX", fallback.0), axis("PlayResY", fallback.1))
    }

    /// Seconds added to the playback clock, default `0`
    #[must_use]
    pub fn time_offset(&self) -> f64 {
        self.get_field("TimeOffset")
            .and_then(parse_float_prefix)
            .filter(|v| v.is_finite())
            .unwrap_or(0.0)
    }

    /// Playback speed multiplier derived from `Timer` (`100 / Timer`)
    ///
    /// Defaults to `1` when `Timer` is absent, zero or malformed.
    #[must_use]
    pub fn playback_speed(&self) -> f64 {
        self.get_field("Timer")
            .and_then(parse_float_prefix)
            .filter(|timer| *timer > 0.0)
            .map_or(1.0, |timer| 100.0 / timer)
    }

    /// Whether borders and shadows scale with the play resolution
    ///
    /// `yes` or any non-zero number is true; absent means true.
    #[must_use]
    pub fn scaled_border_and_shadow(&self) -> bool {
        self.get_field("ScaledBorderAndShadow").map_or(true, |value| {
            value.eq_ignore_ascii_case("yes") || parse_flag(value)
        })
    }

    /// Get wrap style setting
    ///
    /// Only style `2` (no wrapping) makes `\n` a hard break. Defaults to `2`.
    #[must_use]
    pub fn wrap_style(&self) -> u8 {
        self.get_field("WrapStyle")
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(2)
    }
}
