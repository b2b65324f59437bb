//! The scan engine — one left-to-right pass over a rendered row.
//!
//! `scan` is a pure function: render bytes, the active profile, and the
//! preceding row's open-comment flag in; the highlight vector and this
//! row's open-comment flag out. The caller (the buffer) owns cross-row
//! propagation: when the returned flag differs from the stored one, the
//! next row is rescanned, until the flag stabilizes or the buffer ends.

use crate::highlight::Highlight;
use crate::profile::{HlFlags, Syntax};

/// Bytes that end a keyword or number and reset separator state.
#[must_use]
pub fn is_separator(b: u8) -> bool {
    b.is_ascii_whitespace() || b",.()+-/*=~%<>{};".contains(&b)
}

/// Scan one rendered row.
///
/// `starts_in_comment` is the preceding row's open-comment flag (`false`
/// for the first row). Returns one [`Highlight`] per render byte and
/// whether a multi-line comment is still open at end of row.
#[must_use]
pub fn scan(render: &[u8], syntax: Option<&Syntax>, starts_in_comment: bool) -> (Vec<Highlight>, bool) {
    let mut hl = vec![Highlight::Normal; render.len()];

    let Some(syntax) = syntax else {
        return (hl, false);
    };

    let scs = syntax.single_line_comment_start.as_bytes();
    let mcs = syntax.multiline_comment_start.as_bytes();
    let mce = syntax.multiline_comment_end.as_bytes();

    let mut prev_sep = true;
    let mut in_string: u8 = 0;
    let mut in_comment = starts_in_comment;

    let mut i = 0;
    while i < render.len() {
        let b = render[i];
        let prev_hl = if i > 0 { hl[i - 1] } else { Highlight::Normal };

        if !scs.is_empty() && in_string == 0 && !in_comment && render[i..].starts_with(scs) {
            for slot in &mut hl[i..] {
                *slot = Highlight::Comment;
            }
            break;
        }

        if !mcs.is_empty() && !mce.is_empty() && in_string == 0 {
            if in_comment {
                hl[i] = Highlight::MultilineComment;
                if render[i..].starts_with(mce) {
                    hl[i..i + mce.len()].fill(Highlight::MultilineComment);
                    i += mce.len();
                    in_comment = false;
                    prev_sep = true;
                } else {
                    i += 1;
                }
                continue;
            } else if render[i..].starts_with(mcs) {
                hl[i..i + mcs.len()].fill(Highlight::MultilineComment);
                i += mcs.len();
                in_comment = true;
                continue;
            }
        }

        if syntax.flags.contains(HlFlags::STRINGS) {
            if in_string != 0 {
                hl[i] = Highlight::String;
                // A backslash escapes the next byte, closing quote included.
                if b == b'\\' && i + 1 < render.len() {
                    hl[i + 1] = Highlight::String;
                    i += 2;
                    continue;
                }
                if b == in_string {
                    in_string = 0;
                }
                prev_sep = true;
                i += 1;
                continue;
            } else if b == b'"' || b == b'\'' {
                in_string = b;
                hl[i] = Highlight::String;
                i += 1;
                continue;
            }
        }

        if syntax.flags.contains(HlFlags::NUMBERS)
            && ((b.is_ascii_digit() && (prev_sep || prev_hl == Highlight::Number))
                || (b == b'.' && prev_hl == Highlight::Number))
        {
            hl[i] = Highlight::Number;
            prev_sep = false;
            i += 1;
            continue;
        }

        if prev_sep {
            if let Some((len, class)) = keyword_at(render, i, syntax) {
                hl[i..i + len].fill(class);
                i += len;
                prev_sep = false;
                continue;
            }
        }

        prev_sep = is_separator(b);
        i += 1;
    }

    (hl, in_comment)
}

/// Try both keyword classes at position `i`. A hit needs the keyword text
/// followed by end-of-row or a separator byte.
fn keyword_at(render: &[u8], i: usize, syntax: &Syntax) -> Option<(usize, Highlight)> {
    let classes = [
        (syntax.keywords1, Highlight::Keyword1),
        (syntax.keywords2, Highlight::Keyword2),
    ];
    for (keywords, class) in classes {
        for keyword in keywords {
            let kw = keyword.as_bytes();
            if render[i..].starts_with(kw)
                && render
                    .get(i + kw.len())
                    .map_or(true, |&next| is_separator(next))
            {
                return Some((kw.len(), class));
            }
        }
    }
    None
}

// ─── Tests ──────────────────────────────────────────────────────────────────
