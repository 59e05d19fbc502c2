//! Line splitting and placement
//!
//! A text element can only carry one transform, one filter set and one
//! outline width. Lines with hard breaks, or with tags that change those
//! properties partway through, are cut into pieces; each piece becomes its
//! own subtitle and [`realign`] puts the pieces back together every time one
//! of them moves.

pub mod positioning;
pub mod realign;

pub use positioning::{Margins, PlacementInput};
pub use realign::{realign, PiecePlacement};

use crate::pipeline::preprocess::segments;

/// Pieces of one split dialogue line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Split {
    /// Piece texts, each starting with the accumulated override header
    pub pieces: Vec<String>,
    /// Number of pieces on each visual line
    pub breaks: Vec<usize>,
}

/// Where a split line's pieces live in the subtitle list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitLine {
    /// Index of the first piece
    pub first: usize,
    /// Number of pieces
    pub pieces: usize,
    /// Number of pieces on each visual line
    pub breaks: Vec<usize>,
}

impl SplitLine {
    /// Subtitle indices covered by this line
    #[must_use]
    pub fn range(&self) -> core::ops::Range<usize> {
        self.first..self.first + self.pieces
    }
}

/// Whether a tag starting at `token` cannot vary inside one text element
fn is_non_mixable_tag(token: &str) -> bool {
    const NAMES: [&str; 11] = [
        "be", "blur", "bord", "fax", "fay", "fscx", "fscy", "fr", "shad", "xshad", "yshad",
    ];
    if NAMES.iter().any(|name| token.starts_with(name)) {
        return true;
    }
    // drawing mode with a non-zero level
    let Some(level) = token.strip_prefix('p') else {
        return false;
    };
    match level.as_bytes() {
        [b'1'..=b'9', ..] => true,
        [b'0', b'.', rest @ ..] => rest
            .iter()
            .take_while(|b| b.is_ascii_digit())
            .any(|&b| b != b'0'),
        _ => false,
    }
}

/// Whether an override block holds a non-mixable tag, `\t` payloads included
#[must_use]
pub fn is_non_mixable_block(block: &str) -> bool {
    block
        .match_indices('\\')
        .any(|(index, _)| is_non_mixable_tag(&block[index + 1..]))
}

/// Split text on `\N` and `\n` outside override blocks
fn split_breaks(text: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let mut in_block = false;
    let mut start = 0;
    let bytes = text.as_bytes();
    let mut index = 0;
    while index < bytes.len() {
        match bytes[index] {
            b'{' => in_block = true,
            b'}' => in_block = false,
            b'\\' if !in_block && matches!(bytes.get(index + 1), Some(b'N' | b'n')) => {
                lines.push(&text[start..index]);
                index += 2;
                start = index;
                continue;
            }
            _ => {}
        }
        index += 1;
    }
    lines.push(&text[start..]);
    lines
}

/// Whether prepared text has to be split
///
/// True when it contains a break, or when a non-mixable tag appears in any
/// block after the first.
#[must_use]
pub fn needs_split(text: &str) -> bool {
    if split_breaks(text).len() > 1 {
        return true;
    }
    let after_first = text.find('}').map_or("", |close| &text[close..]);
    crate::pipeline::preprocess::blocks(after_first).any(is_non_mixable_block)
}

/// Cut prepared text into independently rendered pieces
///
/// Returns `None` when the text renders as a single run. Every visual line
/// starts a new piece, and so does every block with a non-mixable tag. A new
/// piece opens with one block holding every tag seen so far on the line and
/// before it, so it renders as if the preceding text were still there.
#[must_use]
pub fn split(text: &str) -> Option<Split> {
    if !needs_split(text) {
        return None;
    }

    let mut header = String::new();
    let mut pieces: Vec<String> = Vec::new();
    let mut breaks = Vec::new();
    for line in split_breaks(text) {
        let before = pieces.len();
        let mut pairs = segments(line);
        if pairs.is_empty() {
            pairs.push(("", ""));
        }
        for (index, (block, body)) in pairs.into_iter().enumerate() {
            header.push_str(block);
            let opens_piece = index == 0 || is_non_mixable_block(block);
            match pieces.last_mut() {
                Some(last) if !opens_piece => {
                    last.push('{');
                    last.push_str(block);
                    last.push('}');
                    last.push_str(body);
                }
                _ => pieces.push(format!("{{{header}}}{body}")),
            }
        }
        breaks.push(pieces.len() - before);
    }
    Some(Split { pieces, breaks })
}

/// Text with every override block removed
#[must_use]
pub fn strip_tags(text: &str) -> String {
    segments(text).into_iter().map(|(_, body)| body).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn plain_styling_stays_whole() {
        assert!(split("{\\frz10}Hello {\\b1}World").is_none());
        assert!(!needs_split("{}a{\\i1}b{\\c&HFF&}c"));
    }

    #[test]
    fn rotation_after_first_block_splits() {
        let split = split("{\\b1}Hello {\\frz30}World").expect("split");
        assert_eq!(split.pieces, ["{\\b1}Hello ", "{\\b1\\frz30}World"]);
        assert_eq!(split.breaks, [2]);
    }

    #[test]
    fn breaks_start_new_pieces() {
        let split = split("{}one\\Ntwo{\\i1}three\\nfour").expect("split");
        assert_eq!(split.pieces, ["{}one", "{}two{\\i1}three", "{\\i1}four"]);
        assert_eq!(split.breaks, [1, 1, 1]);
    }

    #[test]
    fn breaks_inside_blocks_are_not_breaks() {
        assert!(!needs_split("{\\fnName}x"));
    }

    #[test]
    fn drawing_levels() {
        assert!(is_non_mixable_block("\\p1"));
        assert!(is_non_mixable_block("\\p0.5"));
        assert!(!is_non_mixable_block("\\p0"));
        assert!(!is_non_mixable_block("\\pos(1,2)"));
        assert!(!is_non_mixable_block("\\pbo3"));
        assert!(is_non_mixable_block("\\t(0,100,\\blur3)"));
        assert!(!is_non_mixable_block("\\xbord2"));
    }

    #[test]
    fn pieces_keep_the_displayed_text() {
        let text = "{\\an8}Top {\\fax0.2}skewed {\\shad3}shadowed";
        let split = split(text).expect("split");
        let joined: String = split.pieces.iter().map(|p| strip_tags(p)).collect();
        assert_eq!(joined, strip_tags(text));
        assert_eq!(split.pieces.len(), 3);
    }
}
