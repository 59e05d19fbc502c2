//! Style AST node for ASS style definitions
//!
//! Contains the resolved [`Style`] record from the `[V4+ Styles]` section and
//! the numeric-keypad [`Alignment`] it carries.

use core::fmt;

use crate::utils::Color;

/// Horizontal component of an alignment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HAlign {
    /// Anchored at the left margin (1, 4, 7)
    Left,
    /// Centered between the margins (2, 5, 8)
    Center,
    /// Anchored at the right margin (3, 6, 9)
    Right,
}

/// Vertical component of an alignment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VAlign {
    /// Bottom row of the keypad (1, 2, 3)
    Bottom,
    /// Middle row of the keypad (4, 5, 6)
    Middle,
    /// Top row of the keypad (7, 8, 9)
    Top,
}

/// Numeric-keypad alignment (`1..=9`)
///
/// ```text
/// 7 8 9
/// 4 5 6
/// 1 2 3
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Alignment(u8);

impl Alignment {
    /// Bottom-center, the format default
    pub const BOTTOM_CENTER: Self = Self(2);

    /// Create an alignment from its keypad number
    ///
    /// Returns `None` outside `1..=9`.
    #[must_use]
    pub const fn new(value: u8) -> Option<Self> {
        if matches!(value, 1..=9) {
            Some(Self(value))
        } else {
            None
        }
    }

    /// Map a legacy SSA `\a` value to keypad layout
    ///
    /// Legacy values are 1-3 (bottom), 5-7 (top) and 9-11 (middle).
    #[must_use]
    pub const fn from_legacy(value: u8) -> Option<Self> {
        match value {
            1..=3 => Some(Self(value)),
            5 => Some(Self(7)),
            6 => Some(Self(8)),
            7 => Some(Self(9)),
            9 => Some(Self(4)),
            10 => Some(Self(5)),
            11 => Some(Self(6)),
            _ => None,
        }
    }

    /// Keypad number
    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }

    /// Horizontal component
    #[must_use]
    pub const fn halign(self) -> HAlign {
        match self.0 % 3 {
            0 => HAlign::Right,
            2 => HAlign::Center,
            _ => HAlign::Left,
        }
    }

    /// Vertical component
    #[must_use]
    pub const fn valign(self) -> VAlign {
        if self.0 > 6 {
            VAlign::Top
        } else if self.0 < 4 {
            VAlign::Bottom
        } else {
            VAlign::Middle
        }
    }
}

impl Default for Alignment {
    fn default() -> Self {
        Self::BOTTOM_CENTER
    }
}

impl fmt::Display for Alignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How the outline of a line is drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BorderStyle {
    /// Outline plus drop shadow (`1`)
    #[default]
    Outline,
    /// Opaque box behind the text (`3`)
    OpaqueBox,
}

impl BorderStyle {
    /// Decode the numeric `BorderStyle` field; anything but `3` is an outline
    #[must_use]
    pub const fn from_code(code: i32) -> Self {
        if code == 3 {
            Self::OpaqueBox
        } else {
            Self::Outline
        }
    }

    /// Numeric field value
    #[must_use]
    pub const fn code(self) -> i32 {
        match self {
            Self::Outline => 1,
            Self::OpaqueBox => 3,
        }
    }
}

/// Style definition from `[V4+ Styles]` section
///
/// Every field is resolved: absent or malformed values carry their format
/// defaults. Renderers copy a style into each run, so overrides applied to a
/// run never touch the shared definition.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Style {
    /// Style name, sanitized to `[A-Za-z0-9_-]`
    pub name: String,

    /// Font family (without the vertical `@` marker)
    pub font_name: String,

    /// Font size in script pixels
    pub font_size: f64,

    /// Font was declared with a leading `@` (vertical writing)
    pub vertical: bool,

    /// CSS-style font weight, 400 normal and 700 bold
    pub weight: u16,

    /// Italic flag
    pub italic: bool,

    /// Underline flag
    pub underline: bool,

    /// Strikeout flag
    pub strikeout: bool,

    /// Fill color
    pub primary: Color,

    /// Karaoke color before a syllable is sung
    pub secondary: Color,

    /// Outline color
    pub outline_color: Color,

    /// Shadow / box color
    pub back: Color,

    /// Horizontal scale in percent
    pub scale_x: f64,

    /// Vertical scale in percent
    pub scale_y: f64,

    /// Letter spacing in pixels
    pub spacing: f64,

    /// Z rotation in degrees
    pub angle: f64,

    /// Outline or opaque box
    pub border_style: BorderStyle,

    /// Outline width in pixels
    pub outline: f64,

    /// Horizontal shadow offset
    pub shadow_x: f64,

    /// Vertical shadow offset
    pub shadow_y: f64,

    /// Blur radius applied around the glyphs
    pub blur: f64,

    /// Keypad alignment
    pub alignment: Alignment,

    /// Left margin in pixels
    pub margin_l: i32,

    /// Right margin in pixels
    pub margin_r: i32,

    /// Vertical margin in pixels
    pub margin_v: i32,

    /// Justification of split lines (0 = follow alignment)
    pub justify: u8,
}

impl Style {
    /// Name of the style every unresolved reference falls back to
    pub const DEFAULT_NAME: &'static str = "Default";

    /// Built-in `Default` style used when a script defines none
    #[must_use]
    pub fn builtin_default() -> Self {
        Self {
            outline: 2.0,
            margin_l: 10,
            margin_r: 10,
            margin_v: 20,
            blur: 2.0,
            ..Self::default()
        }
    }

    /// Whether the style draws bold text
    #[must_use]
    pub const fn is_bold(&self) -> bool {
        self.weight >= 600
    }
}

impl Default for Style {
    fn default() -> Self {
        Self {
            name: Self::DEFAULT_NAME.to_string(),
            font_name: "Arial".to_string(),
            font_size: 40.0,
            vertical: false,
            weight: 400,
            italic: false,
            underline: false,
            strikeout: false,
            primary: Color::WHITE,
            secondary: Color::BLUE,
            outline_color: Color::BLACK,
            back: Color::BLACK,
            scale_x: 100.0,
            scale_y: 100.0,
            spacing: 0.0,
            angle: 0.0,
            border_style: BorderStyle::Outline,
            outline: 0.0,
            shadow_x: 0.0,
            shadow_y: 0.0,
            blur: 0.0,
            alignment: Alignment::BOTTOM_CENTER,
            margin_l: 0,
            margin_r: 0,
            margin_v: 0,
            justify: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alignment_components() {
        let cases = [
            (1, HAlign::Left, VAlign::Bottom),
            (2, HAlign::Center, VAlign::Bottom),
            (3, HAlign::Right, VAlign::Bottom),
            (5, HAlign::Center, VAlign::Middle),
            (7, HAlign::Left, VAlign::Top),
            (9, HAlign::Right, VAlign::Top),
        ];
        for (value, h, v) in cases {
            let alignment = Alignment::new(value).unwrap();
            assert_eq!(alignment.halign(), h, "halign of {value}");
            assert_eq!(alignment.valign(), v, "valign of {value}");
        }
        assert!(Alignment::new(0).is_none());
        assert!(Alignment::new(10).is_none());
    }

    #[test]
    fn legacy_alignment_remap() {
        let remapped: Vec<u8> = [1, 2, 3, 5, 6, 7, 9, 10, 11]
            .iter()
            .filter_map(|&v| Alignment::from_legacy(v))
            .map(Alignment::value)
            .collect();
        assert_eq!(remapped, vec![1, 2, 3, 7, 8, 9, 4, 5, 6]);
        assert!(Alignment::from_legacy(4).is_none());
        assert!(Alignment::from_legacy(8).is_none());
    }

    #[test]
    fn builtin_default_style() {
        let style = Style::builtin_default();
        assert!((style.outline - 2.0).abs() < f64::EPSILON);
        assert!((style.blur - 2.0).abs() < f64::EPSILON);
        assert_eq!((style.margin_l, style.margin_r, style.margin_v), (10, 10, 20));
        assert_eq!(style.primary, Color::WHITE);
        assert_eq!(style.secondary, Color::BLUE);
        assert!(!style.is_bold());
    }

    #[test]
    fn border_style_codes() {
        assert_eq!(BorderStyle::from_code(3), BorderStyle::OpaqueBox);
        assert_eq!(BorderStyle::from_code(1), BorderStyle::Outline);
        assert_eq!(BorderStyle::from_code(0), BorderStyle::Outline);
        assert_eq!(BorderStyle::OpaqueBox.code(), 3);
    }
}
