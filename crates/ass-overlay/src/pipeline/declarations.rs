//! Resolved per-span declarations

use ass_script::{Color, Style};
use bitflags::bitflags;
use smallvec::SmallVec;

use crate::utils::math::lerp;
use crate::utils::ResourceId;

bitflags! {
    /// Text decoration lines
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Decoration: u8 {
        /// Underline
        const UNDERLINE = 0b01;
        /// Strike-through
        const STRIKEOUT = 0b10;
    }
}

impl Decoration {
    /// Decoration flags of a style
    #[must_use]
    pub fn of_style(style: &Style) -> Self {
        let mut flags = Self::empty();
        flags.set(Self::UNDERLINE, style.underline);
        flags.set(Self::STRIKEOUT, style.strikeout);
        flags
    }
}

/// Fill paint of a span
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Paint {
    /// Flat color
    Solid(Color),
    /// Karaoke sweep gradient
    Gradient(ResourceId),
}

impl Paint {
    /// Flat color, if this is not a gradient
    #[must_use]
    pub const fn solid(&self) -> Option<Color> {
        match self {
            Self::Solid(color) => Some(*color),
            Self::Gradient(_) => None,
        }
    }
}

/// Fully resolved styling of one text span or shape
#[derive(Debug, Clone, PartialEq)]
pub struct Declarations {
    /// Font family
    pub font_family: String,
    /// Font size in script pixels
    pub font_size: f64,
    /// CSS-style weight
    pub weight: u16,
    /// Italic
    pub italic: bool,
    /// Underline / strike-through
    pub decoration: Decoration,
    /// Extra space between letters
    pub letter_spacing: f64,
    /// Fill
    pub fill: Paint,
    /// Outline color
    pub stroke: Color,
    /// Outline width
    pub stroke_width: f64,
    /// Transitions this span takes part in
    pub scopes: SmallVec<[ResourceId; 2]>,
    /// Karaoke segment this span belongs to
    pub karaoke: Option<usize>,
    /// Unrecognized override tokens, kept verbatim
    pub markers: Vec<String>,
}

impl Declarations {
    /// Declarations of unmodified text in `style`
    #[must_use]
    pub fn from_style(style: &Style) -> Self {
        Self {
            font_family: style.font_name.clone(),
            font_size: style.font_size,
            weight: style.weight,
            italic: style.italic,
            decoration: Decoration::of_style(style),
            letter_spacing: style.spacing,
            fill: Paint::Solid(style.primary),
            stroke: style.outline_color,
            stroke_width: style.outline,
            scopes: SmallVec::new(),
            karaoke: None,
            markers: Vec::new(),
        }
    }

    /// Whether the span draws bold text
    #[must_use]
    pub const fn is_bold(&self) -> bool {
        self.weight >= 600
    }

    /// Interpolate animatable values towards `other`
    ///
    /// Numeric values and flat colors are blended; everything else takes
    /// the target value.
    #[must_use]
    pub fn lerp(&self, other: &Self, t: f64) -> Self {
        let fill = match (self.fill, other.fill) {
            (Paint::Solid(from), Paint::Solid(to)) => Paint::Solid(from.lerp(to, t as f32)),
            (_, target) => target,
        };
        Self {
            font_size: lerp(self.font_size, other.font_size, t),
            letter_spacing: lerp(self.letter_spacing, other.letter_spacing, t),
            stroke_width: lerp(self.stroke_width, other.stroke_width, t),
            stroke: self.stroke.lerp(other.stroke, t as f32),
            fill,
            ..other.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn style_defaults_carry_over() {
        let style = Style {
            underline: true,
            weight: 700,
            ..Style::default()
        };
        let decl = Declarations::from_style(&style);
        assert!(decl.is_bold());
        assert_eq!(decl.decoration, Decoration::UNDERLINE);
        assert_eq!(decl.fill, Paint::Solid(Color::WHITE));
        assert!(decl.scopes.is_empty());
    }

    #[test]
    fn lerp_blends_numbers_and_colors() {
        let from = Declarations::from_style(&Style::default());
        let to = Declarations {
            font_size: 80.0,
            fill: Paint::Solid(Color::BLACK),
            italic: true,
            ..from.clone()
        };
        let mid = from.lerp(&to, 0.5);
        assert!((mid.font_size - 60.0).abs() < 1e-9);
        assert_eq!(mid.fill.solid().map(|c| c.r), Some(128));
        assert!(mid.italic);
    }
}
