//! Override tag table and matching
//!
//! Tag names overlap (`c`/`clip(`, `fr`/`frz`, `a`/`an`/`alpha`), so a token
//! is matched against its prefixes from the longest candidate down and the
//! first hit wins.

/// Longest tag name in the table (`iclip(`)
pub const MAX_TAG_LEN: usize = 6;

/// Recognized override tags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    /// `\b` weight
    Bold,
    /// `\i` slant
    Italic,
    /// `\u` underline
    Underline,
    /// `\s` strike-through
    StrikeOut,
    /// `\alpha` all four alphas
    Alpha,
    /// `\1a`..`\4a` one channel's alpha
    ChannelAlpha(u8),
    /// `\a` legacy alignment
    LegacyAlign,
    /// `\an` keypad alignment
    Align,
    /// `\be` edge blur
    BlurEdges,
    /// `\blur` gaussian blur
    Blur,
    /// `\bord` outline width
    Border,
    /// `\xbord` horizontal outline width
    XBorder,
    /// `\ybord` vertical outline width
    YBorder,
    /// `\c` / `\1c`..`\4c` channel color
    Color(u8),
    /// `\clip(` visible region
    Clip,
    /// `\iclip(` hidden region
    InverseClip,
    /// `\fad(` two-key fade
    Fad,
    /// `\fade(` four-key fade
    Fade,
    /// `\fax` horizontal shear
    ShearX,
    /// `\fay` vertical shear
    ShearY,
    /// `\fn` font family
    FontName,
    /// `\frx` X rotation
    RotateX,
    /// `\fry` Y rotation
    RotateY,
    /// `\fr` / `\frz` Z rotation
    RotateZ,
    /// `\fs` font size
    FontSize,
    /// `\fsc` uniform scale
    FontScale,
    /// `\fscx` horizontal scale
    FontScaleX,
    /// `\fscy` vertical scale
    FontScaleY,
    /// `\fsp` letter spacing
    Spacing,
    /// `\k` discrete karaoke
    Karaoke,
    /// `\kf` / `\K` sweeping karaoke
    KaraokeSweep,
    /// `\ko` outline karaoke
    KaraokeOutline,
    /// `\kt` karaoke clock offset
    KaraokeOffset,
    /// `\move(` animated position
    Move,
    /// `\org(` rotation origin
    Origin,
    /// `\p` drawing mode
    Drawing,
    /// `\pbo` drawing baseline offset
    BaselineOffset,
    /// `\pos(` absolute position
    Position,
    /// `\q` wrap style
    WrapStyle,
    /// `\r` style reset
    Reset,
    /// `\shad` shadow offset
    Shadow,
    /// `\xshad` horizontal shadow offset
    XShadow,
    /// `\yshad` vertical shadow offset
    YShadow,
}

impl Tag {
    /// Look up an exact tag name
    #[must_use]
    pub fn lookup(name: &str) -> Option<Self> {
        let tag = match name {
            "b" => Self::Bold,
            "i" => Self::Italic,
            "u" => Self::Underline,
            "s" => Self::StrikeOut,
            "alpha" => Self::Alpha,
            "1a" => Self::ChannelAlpha(1),
            "2a" => Self::ChannelAlpha(2),
            "3a" => Self::ChannelAlpha(3),
            "4a" => Self::ChannelAlpha(4),
            "a" => Self::LegacyAlign,
            "an" => Self::Align,
            "be" => Self::BlurEdges,
            "blur" => Self::Blur,
            "bord" => Self::Border,
            "xbord" => Self::XBorder,
            "ybord" => Self::YBorder,
            "c" | "1c" => Self::Color(1),
            "2c" => Self::Color(2),
            "3c" => Self::Color(3),
            "4c" => Self::Color(4),
            "clip(" => Self::Clip,
            "iclip(" => Self::InverseClip,
            "fad(" => Self::Fad,
            "fade(" => Self::Fade,
            "fax" => Self::ShearX,
            "fay" => Self::ShearY,
            "fn" => Self::FontName,
            "fr" | "frz" => Self::RotateZ,
            "frx" => Self::RotateX,
            "fry" => Self::RotateY,
            "fs" => Self::FontSize,
            "fsc" => Self::FontScale,
            "fscx" => Self::FontScaleX,
            "fscy" => Self::FontScaleY,
            "fsp" => Self::Spacing,
            "k" => Self::Karaoke,
            "K" | "kf" => Self::KaraokeSweep,
            "ko" => Self::KaraokeOutline,
            "kt" => Self::KaraokeOffset,
            "move(" => Self::Move,
            "org(" => Self::Origin,
            "p" => Self::Drawing,
            "pbo" => Self::BaselineOffset,
            "pos(" => Self::Position,
            "q" => Self::WrapStyle,
            "r" => Self::Reset,
            "shad" => Self::Shadow,
            "xshad" => Self::XShadow,
            "yshad" => Self::YShadow,
            _ => return None,
        };
        Some(tag)
    }

    /// Whether the tag name includes its opening parenthesis
    #[must_use]
    pub const fn is_function(self) -> bool {
        matches!(
            self,
            Self::Clip
                | Self::InverseClip
                | Self::Fad
                | Self::Fade
                | Self::Move
                | Self::Origin
                | Self::Position
        )
    }

    /// Match a token (without its leading backslash) against the table
    ///
    /// Returns the tag and its argument. A fully parenthesized argument loses
    /// its parentheses; function tags lose their closing one.
    #[must_use]
    pub fn parse(token: &str) -> Option<(Self, &str)> {
        let longest = token.len().min(MAX_TAG_LEN);
        for len in (1..=longest).rev() {
            if !token.is_char_boundary(len) {
                continue;
            }
            let Some(tag) = Self::lookup(&token[..len]) else {
                continue;
            };
            let mut arg = &token[len..];
            if arg.len() >= 2 && arg.starts_with('(') && arg.ends_with(')') {
                arg = &arg[1..arg.len() - 1];
            } else if tag.is_function() {
                arg = arg.strip_suffix(')').unwrap_or(arg);
            }
            return Some((tag, arg));
        }
        None
    }
}

/// Split a function tag's argument list on commas
#[must_use]
pub fn split_args(arg: &str) -> Vec<&str> {
    if arg.trim().is_empty() {
        return Vec::new();
    }
    arg.split(',').map(str::trim).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn longest_prefix_wins() {
        assert_eq!(Tag::parse("an8"), Some((Tag::Align, "8")));
        assert_eq!(Tag::parse("a5"), Some((Tag::LegacyAlign, "5")));
        assert_eq!(Tag::parse("alpha&H80&"), Some((Tag::Alpha, "&H80&")));
        assert_eq!(Tag::parse("frz45"), Some((Tag::RotateZ, "45")));
        assert_eq!(Tag::parse("fr45"), Some((Tag::RotateZ, "45")));
        assert_eq!(Tag::parse("frx10"), Some((Tag::RotateX, "10")));
        assert_eq!(Tag::parse("fscx120"), Some((Tag::FontScaleX, "120")));
        assert_eq!(Tag::parse("fsp2"), Some((Tag::Spacing, "2")));
        assert_eq!(Tag::parse("fs20"), Some((Tag::FontSize, "20")));
        assert_eq!(Tag::parse("1c&HFF&"), Some((Tag::Color(1), "&HFF&")));
        assert_eq!(Tag::parse("c&HFF&"), Some((Tag::Color(1), "&HFF&")));
        assert_eq!(Tag::parse("blur3"), Some((Tag::Blur, "3")));
        assert_eq!(Tag::parse("be1"), Some((Tag::BlurEdges, "1")));
        assert_eq!(Tag::parse("b1"), Some((Tag::Bold, "1")));
        assert_eq!(Tag::parse("kf50"), Some((Tag::KaraokeSweep, "50")));
        assert_eq!(Tag::parse("K50"), Some((Tag::KaraokeSweep, "50")));
        assert_eq!(Tag::parse("pbo5"), Some((Tag::BaselineOffset, "5")));
        assert_eq!(Tag::parse("p1"), Some((Tag::Drawing, "1")));
    }

    #[test]
    fn function_tags_lose_parentheses() {
        assert_eq!(Tag::parse("pos(10,20)"), Some((Tag::Position, "10,20")));
        assert_eq!(
            Tag::parse("iclip(0,0,5,5)"),
            Some((Tag::InverseClip, "0,0,5,5"))
        );
        assert_eq!(Tag::parse("fade(255,0,255,0,1,2,3)").map(|t| t.0), Some(Tag::Fade));
        assert_eq!(Tag::parse("fad(100,200)"), Some((Tag::Fad, "100,200")));
        assert_eq!(Tag::parse("bord(3)"), Some((Tag::Border, "3")));
    }

    #[test]
    fn unknown_tokens_do_not_match() {
        assert_eq!(Tag::parse("zzz"), None);
        assert_eq!(Tag::parse(""), None);
    }

    #[test]
    fn args_are_split_and_trimmed() {
        assert_eq!(split_args(" 1, 2 ,3"), vec!["1", "2", "3"]);
        assert!(split_args("").is_empty());
    }
}
