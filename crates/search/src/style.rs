//! Conversion between styled (escape-laden) and plain pane text.
//!
//! Captured pane lines interleave visible characters with SGR escape
//! sequences. Searching happens on the plain projection; rendering mutates
//! the styled original. This module owns the mapping between the two
//! coordinate spaces and never fails: malformed escape input degrades to
//! literal text instead of erroring, because rendering must survive
//! arbitrary captured terminal content.

const ESC: char = '\x1b';

/// Style reset, used as the close code for highlight/dim/label wrapping.
pub const RESET: &str = "\x1b[0m";

const RESET_SEQUENCES: [&str; 2] = ["\x1b[0m", "\x1b[m"];

/// Visible-character projection of a styled line, plus the offset table
/// mapping plain byte offsets back into the styled line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlainLine {
    text: String,
    // (plain byte offset, styled byte offset) per visible character, with a
    // sentinel entry at end of line. Both columns are monotonic.
    offsets: Vec<(usize, usize)>,
}

impl PlainLine {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Styled byte offset of the visible character at `plain_offset`, or the
    /// styled line length when `plain_offset` is the plain length (append
    /// position).
    pub fn styled_offset(&self, plain_offset: usize) -> usize {
        let idx = self.offsets.partition_point(|&(plain, _)| plain < plain_offset);
        match self.offsets.get(idx) {
            Some(&(_, styled)) => styled,
            None => self.offsets.last().map_or(0, |&(_, styled)| styled),
        }
    }
}

/// Strip escape sequences from a styled line, recording where each visible
/// character sits in the styled original.
///
/// A sequence that never reaches its terminator before end of line is
/// malformed; its bytes pass through as visible characters.
pub fn strip(styled: &str) -> PlainLine {
    let mut text = String::with_capacity(styled.len());
    let mut offsets = Vec::new();
    let mut styled_pos = 0;
    let mut rest = styled;

    while !rest.is_empty() {
        if let Some(seq_len) = sgr_sequence_len(rest) {
            styled_pos += seq_len;
            rest = &rest[seq_len..];
            continue;
        }
        let Some(c) = rest.chars().next() else {
            break;
        };
        offsets.push((text.len(), styled_pos));
        text.push(c);
        styled_pos += c.len_utf8();
        rest = &rest[c.len_utf8()..];
    }

    offsets.push((text.len(), styled_pos));
    PlainLine { text, offsets }
}

/// Styled byte offset immediately preceding the `plain_offset`-th visible
/// character, derived by replaying the same scan as [`strip`].
///
/// Callers mapping many offsets on one line should keep the [`PlainLine`]
/// from `strip` and use [`PlainLine::styled_offset`] instead of re-scanning.
pub fn map_plain_to_styled(styled: &str, plain_offset: usize) -> usize {
    strip(styled).styled_offset(plain_offset)
}

/// Byte length of the complete SGR sequence starting at the beginning of
/// `s`, or `None` when `s` does not begin one. Captured pane text carries
/// colour/attribute sequences only, so the recognized shape is
/// `ESC [ <parameter bytes> m`; an introducer that runs into a
/// non-parameter byte or the end of the line is not a sequence.
fn sgr_sequence_len(s: &str) -> Option<usize> {
    let mut chars = s.char_indices();
    if chars.next()?.1 != ESC {
        return None;
    }
    if chars.next()?.1 != '[' {
        return None;
    }
    for (idx, c) in chars {
        match c {
            'm' => return Some(idx + 1),
            '0'..='9' | ';' | ':' => {}
            _ => return None,
        }
    }
    None
}

/// Insert `open` at `styled_start` and `close` at `styled_end`, re-arming
/// `open` after every reset sequence inside the range so the wrapped style
/// persists until `close`. Codes already present at the range edges are not
/// duplicated.
pub fn wrap_styled_range(
    styled: &str,
    styled_start: usize,
    styled_end: usize,
    open: &str,
    close: &str,
) -> String {
    let before = &styled[..styled_start];
    let inside = &styled[styled_start..styled_end];
    let after = &styled[styled_end..];

    let mut out = String::with_capacity(styled.len() + open.len() + close.len());
    out.push_str(before);
    if !inside.starts_with(open) {
        out.push_str(open);
    }
    push_with_rearmed_resets(&mut out, inside, open);
    if !out.ends_with(close) {
        out.push_str(close);
    }
    out.push_str(after);
    out
}

fn push_with_rearmed_resets(out: &mut String, segment: &str, open: &str) {
    let mut rest = segment;
    'scan: while !rest.is_empty() {
        for reset in RESET_SEQUENCES {
            if rest.starts_with(reset) {
                out.push_str(reset);
                out.push_str(open);
                rest = &rest[reset.len()..];
                continue 'scan;
            }
        }
        let Some(c) = rest.chars().next() else {
            break;
        };
        out.push(c);
        rest = &rest[c.len_utf8()..];
    }
}
