//! Event text clean-up applied before interpretation and splitting

/// Normalize raw dialogue text
///
/// Trims the text, turns `\h` into a non-breaking space, merges adjacent
/// override blocks, demotes the first of several karaoke tags in one block
/// to a clock offset, and makes sure the text starts with a block. Soft
/// breaks (`\n`) survive only when the effective wrap style is 2; the last
/// `\q` in the text overrides `script_wrap_style`.
#[must_use]
pub fn prepare(text: &str, script_wrap_style: u8) -> String {
    let mut text = text.trim().replace("\\h", "\u{a0}").replace("}{", "");
    text = demote_stacked_karaoke(&text);
    if !text.starts_with('{') {
        text.insert_str(0, "{}");
    }

    if effective_wrap_style(&text, script_wrap_style) != 2 {
        text = replace_outside_blocks(&text, "\\n", " ");
    }
    text
}

/// Wrap style after `\q` overrides
#[must_use]
pub fn effective_wrap_style(text: &str, script_wrap_style: u8) -> u8 {
    let mut wrap = script_wrap_style;
    for block in blocks(text) {
        let mut rest = block;
        while let Some(index) = rest.find("\\q") {
            rest = &rest[index + 2..];
            if let Some(digit) = rest.chars().next().and_then(|c| c.to_digit(10)) {
                wrap = digit as u8;
            }
        }
    }
    wrap
}

/// Contents of every `{...}` block, in order
pub fn blocks(text: &str) -> impl Iterator<Item = &str> {
    let mut rest = text;
    core::iter::from_fn(move || {
        let open = rest.find('{')?;
        let close = rest[open..].find('}')? + open;
        let block = &rest[open + 1..close];
        rest = &rest[close + 1..];
        Some(block)
    })
}

/// Split prepared text into `(block, text)` pairs
///
/// Text before the first block pairs with an empty block; an unterminated
/// block is treated as text.
#[must_use]
pub fn segments(text: &str) -> Vec<(&str, &str)> {
    let mut out = Vec::new();
    let mut rest = text;
    match rest.find('{') {
        Some(0) => {}
        Some(open) => {
            out.push(("", &rest[..open]));
            rest = &rest[open..];
        }
        None => {
            if !rest.is_empty() {
                out.push(("", rest));
            }
            return out;
        }
    }
    while !rest.is_empty() {
        let Some(close) = rest.find('}') else {
            out.push(("", rest));
            break;
        };
        let block = &rest[1..close];
        let after = &rest[close + 1..];
        let next = after.find('{').unwrap_or(after.len());
        out.push((block, &after[..next]));
        rest = &after[next..];
    }
    out
}

/// Length of a karaoke tag name at the start of `s` (`k`, `K`, `kf`, `ko`)
fn karaoke_tag_len(s: &str) -> Option<usize> {
    let mut chars = s.chars();
    match chars.next()? {
        'K' => Some(1),
        'k' => match chars.next() {
            Some('f' | 'o') => Some(2),
            _ => Some(1),
        },
        _ => None,
    }
}

/// Rename the leading karaoke tag of blocks holding more than one to `\kt`
fn demote_stacked_karaoke(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 4);
    let mut rest = text;
    while let Some(open) = rest.find('{') {
        let Some(close) = rest[open..].find('}').map(|c| c + open) else {
            break;
        };
        out.push_str(&rest[..=open]);
        let block = &rest[open + 1..close];
        out.push_str(&demote_block(block));
        out.push('}');
        rest = &rest[close + 1..];
    }
    out.push_str(rest);
    out
}

fn demote_block(block: &str) -> String {
    let Some(body) = block.strip_prefix('\\') else {
        return block.to_string();
    };
    let Some(name_len) = karaoke_tag_len(body) else {
        return block.to_string();
    };
    let after = &body[name_len..];
    if !after.starts_with(|c: char| c.is_ascii_digit()) {
        return block.to_string();
    }
    let has_another = after
        .match_indices('\\')
        .any(|(index, _)| karaoke_tag_len(&after[index + 1..]).is_some());
    if has_another {
        format!("\\kt{after}")
    } else {
        block.to_string()
    }
}

/// Replace `from` with `to` in text segments, leaving override blocks alone
fn replace_outside_blocks(text: &str, from: &str, to: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut depth = false;
    let mut segment = String::new();
    for ch in text.chars() {
        match ch {
            '{' if !depth => {
                out.push_str(&segment.replace(from, to));
                segment.clear();
                depth = true;
                out.push(ch);
            }
            '}' if depth => {
                depth = false;
                out.push(ch);
            }
            _ if depth => out.push(ch),
            _ => segment.push(ch),
        }
    }
    out.push_str(&segment.replace(from, to));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_is_prepended_and_blocks_merged() {
        assert_eq!(prepare("  Hello  ", 2), "{}Hello");
        assert_eq!(prepare("{\\b1}{\\i1}Hi", 2), "{\\b1\\i1}Hi");
    }

    #[test]
    fn hard_space_is_non_breaking() {
        assert_eq!(prepare("a\\hb", 2), "{}a\u{a0}b");
    }

    #[test]
    fn stacked_karaoke_is_demoted() {
        assert_eq!(prepare("{\\k10\\k20}ka", 2), "{\\kt10\\k20}ka");
        assert_eq!(prepare("{\\kf10\\fs20}ka", 2), "{\\kf10\\fs20}ka");
        assert_eq!(prepare("{\\K5\\ko7}ka", 2), "{\\kt5\\ko7}ka");
    }

    #[test]
    fn soft_breaks_follow_wrap_style() {
        assert_eq!(prepare("a\\nb", 2), "{}a\\nb");
        assert_eq!(prepare("a\\nb\\nc", 0), "{}a b c");
        assert_eq!(prepare("{\\q2}a\\nb", 0), "{\\q2}a\\nb");
        assert_eq!(prepare("{\\q1}a\\nb", 2), "{\\q1}a b");
        assert_eq!(prepare("a\\Nb", 0), "{}a\\Nb");
    }

    #[test]
    fn block_iteration() {
        let collected: Vec<&str> = blocks("{a}x{b}y{").collect();
        assert_eq!(collected, vec!["a", "b"]);
    }

    #[test]
    fn segments_pair_blocks_with_text() {
        assert_eq!(segments("ab{\\b1}cd"), [("", "ab"), ("\\b1", "cd")]);
        assert_eq!(segments("{}x{"), [("", "x"), ("", "{")]);
        assert!(segments("").is_empty());
    }
}
