//! Realignment of split pieces
//!
//! Every piece of a split line is first anchored on its own as if it were
//! the whole line. This pass chains the pieces of each visual line
//! horizontally, applies justification against the widest visual line, and
//! stacks the visual lines so the block keeps the alignment an unsplit line
//! would have had.

use ass_script::{Alignment, HAlign, VAlign};

/// Anchor and measured size of one piece
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PiecePlacement {
    /// Anchor x (left edge, middle or right edge depending on alignment)
    pub x: f64,
    /// Anchor y
    pub y: f64,
    /// Rendered width, including space left for trailing drawings
    pub width: f64,
    /// Rendered height
    pub height: f64,
}

fn justify_align(justify: u8) -> Option<HAlign> {
    match justify {
        1 => Some(HAlign::Left),
        2 => Some(HAlign::Center),
        3 => Some(HAlign::Right),
        _ => None,
    }
}

/// Horizontal shift of a visual line `difference` narrower than the widest
fn justify_shift(justify: HAlign, align: HAlign, difference: f64) -> f64 {
    match (justify, align) {
        (HAlign::Left, HAlign::Center) | (HAlign::Center, HAlign::Right) => -difference / 2.0,
        (HAlign::Left, HAlign::Right) => -difference,
        (HAlign::Right, HAlign::Center) | (HAlign::Center, HAlign::Left) => difference / 2.0,
        (HAlign::Right, HAlign::Left) => difference,
        _ => 0.0,
    }
}

fn chain(align: HAlign, line: &mut [PiecePlacement]) {
    let Some(first) = line.first().copied() else {
        return;
    };
    let total: f64 = line.iter().map(|piece| piece.width).sum();
    match align {
        HAlign::Right => {
            let mut edge = first.x - total;
            for piece in line.iter_mut() {
                edge += piece.width;
                piece.x = edge;
            }
        }
        HAlign::Center => {
            line[0].x -= (total - first.width) / 2.0;
            for i in 1..line.len() {
                line[i].x = line[i - 1].x + (line[i - 1].width + line[i].width) / 2.0;
            }
        }
        HAlign::Left => {
            for i in 1..line.len() {
                line[i].x = line[i - 1].x + line[i - 1].width;
            }
        }
    }
}

/// Realign the pieces of one split line in place
///
/// `breaks[i]` is the number of pieces on visual line `i`; the counts must
/// add up to `pieces.len()`, otherwise nothing is moved.
pub fn realign(alignment: Alignment, justify: u8, breaks: &[usize], pieces: &mut [PiecePlacement]) {
    if breaks.iter().sum::<usize>() != pieces.len() || breaks.contains(&0) {
        log::debug!("split line with {} pieces does not match breaks {breaks:?}", pieces.len());
        return;
    }
    let align = alignment.halign();

    let mut widths = Vec::with_capacity(breaks.len());
    let mut heights = Vec::with_capacity(breaks.len());
    let mut start = 0;
    for &count in breaks {
        let line = &mut pieces[start..start + count];
        chain(align, line);
        widths.push(line.iter().map(|piece| piece.width).sum::<f64>());
        heights.push(line.iter().map(|piece| piece.height).fold(0.0, f64::max));
        start += count;
    }

    if let Some(justify) = justify_align(justify).filter(|&j| j != align) {
        let widest = widths.iter().copied().fold(0.0, f64::max);
        let mut start = 0;
        for (&count, width) in breaks.iter().zip(&widths) {
            let shift = justify_shift(justify, align, widest - width);
            for piece in &mut pieces[start..start + count] {
                piece.x += shift;
            }
            start += count;
        }
    }

    let total_height: f64 = heights.iter().sum();
    let mut y = pieces[0].y;
    match alignment.valign() {
        VAlign::Top => {}
        VAlign::Middle => y += heights[0] / 2.0 - total_height / 2.0,
        VAlign::Bottom => y -= total_height - heights[0],
    }
    let mut start = 0;
    for (line, &count) in breaks.iter().enumerate() {
        if line > 0 {
            y += heights[line - 1];
        }
        for piece in &mut pieces[start..start + count] {
            piece.y = y;
        }
        start += count;
    }
}
