use crate::matcher::SearchMatch;
use crate::style::{self, PlainLine, RESET};

/// Rewrites the original styled pane lines for display: non-matching lines
/// are dimmed, matched spans are highlighted, and labelled matches get
/// their label overlaid on the first character of the span.
#[derive(Debug, Clone)]
pub struct Renderer {
    highlight: String,
    dim: String,
    label_style: String,
}

impl Renderer {
    pub fn new(highlight: &str, dim: &str, label_style: &str) -> Self {
        Self {
            highlight: highlight.to_string(),
            dim: dim.to_string(),
            label_style: label_style.to_string(),
        }
    }

    /// `plain_lines` are the offset tables stripped from `styled_lines` once
    /// up front; rendering reuses them on every frame.
    pub fn render(
        &self,
        styled_lines: &[String],
        plain_lines: &[PlainLine],
        matches: &[SearchMatch],
    ) -> Vec<String> {
        styled_lines
            .iter()
            .zip(plain_lines)
            .enumerate()
            .map(|(idx, (line, plain))| {
                let line_matches: Vec<&SearchMatch> =
                    matches.iter().filter(|m| m.line == idx).collect();
                self.render_line(line, plain, &line_matches)
            })
            .collect()
    }

    /// Matches are applied right to left: every mutation then lands at a
    /// styled offset at or above all spans still pending, so the offset
    /// table computed from the original line stays valid throughout.
    fn render_line(&self, styled: &str, plain: &PlainLine, matches: &[&SearchMatch]) -> String {
        if matches.is_empty() {
            return style::wrap_styled_range(styled, 0, styled.len(), &self.dim, RESET);
        }

        let mut ordered: Vec<&&SearchMatch> = matches.iter().collect();
        ordered.sort_by(|a, b| b.start.cmp(&a.start));

        let mut out = styled.to_string();
        for m in ordered {
            let styled_start = plain.styled_offset(m.start);
            let styled_end = plain.styled_offset(m.end);

            match m.label {
                Some(label) => {
                    let Some(first) = plain.text()[m.start..].chars().next() else {
                        continue;
                    };
                    let after_first = m.start + first.len_utf8();
                    if after_first < m.end {
                        out = style::wrap_styled_range(
                            &out,
                            plain.styled_offset(after_first),
                            styled_end,
                            &self.highlight,
                            RESET,
                        );
                    }
                    // The label overlays the first visible character rather
                    // than shifting it: glyph count is unchanged and the
                    // offsets of adjacent matches stay aligned. Escape
                    // sequences around the character are kept.
                    let overlay = format!("{}{}{}", self.label_style, label, RESET);
                    out.replace_range(styled_start..styled_start + first.len_utf8(), &overlay);
                }
                None => {
                    out = style::wrap_styled_range(
                        &out,
                        styled_start,
                        styled_end,
                        &self.highlight,
                        RESET,
                    );
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HIGHLIGHT: &str = "\x1b[1;33m";
    const DIM: &str = "\x1b[2m";
    const LABEL: &str = "\x1b[1;31m";

    fn renderer() -> Renderer {
        Renderer::new(HIGHLIGHT, DIM, LABEL)
    }

    fn render(lines: &[String], matches: &[SearchMatch]) -> Vec<String> {
        let plain: Vec<PlainLine> = lines.iter().map(|l| style::strip(l)).collect();
        renderer().render(lines, &plain, matches)
    }

    fn with_label(mut m: SearchMatch, label: char) -> SearchMatch {
        m.label = Some(label);
        m
    }

    #[test]
    fn line_without_matches_is_dimmed() {
        let lines = vec![String::from("hello")];
        let rendered = render(&lines, &[]);
        assert_eq!(rendered, vec![format!("{DIM}hello{RESET}")]);
    }

    #[test]
    fn unlabelled_match_is_highlighted() {
        let lines = vec![String::from("say hello now")];
        let matches = vec![SearchMatch::new(0, 4, 9, String::from("hello"))];
        let rendered = render(&lines, &matches);
        assert_eq!(rendered[0], format!("say {HIGHLIGHT}hello{RESET} now"));
    }

    #[test]
    fn label_overlays_first_character() {
        let lines = vec![String::from("alpha")];
        let matches = vec![with_label(SearchMatch::new(0, 0, 5, String::from("alpha")), 'x')];
        let rendered = render(&lines, &matches);
        assert_eq!(
            rendered[0],
            format!("{LABEL}x{RESET}{HIGHLIGHT}lpha{RESET}")
        );
        // Overlay, not insertion: the visible glyph count is unchanged.
        assert_eq!(style::strip(&rendered[0]).text(), "xlpha");
    }

    #[test]
    fn single_character_match_is_all_label() {
        let lines = vec![String::from("a b")];
        let matches = vec![with_label(SearchMatch::new(0, 0, 1, String::from("a")), 'q')];
        let rendered = render(&lines, &matches);
        assert_eq!(rendered[0], format!("{LABEL}q{RESET} b"));
    }

    #[test]
    fn multiple_matches_on_one_line_keep_their_offsets() {
        let lines = vec![String::from("alpha alpha")];
        let matches = vec![
            with_label(SearchMatch::new(0, 0, 5, String::from("alpha")), 's'),
            with_label(SearchMatch::new(0, 6, 11, String::from("alpha")), 'a'),
        ];
        let rendered = render(&lines, &matches);
        assert_eq!(style::strip(&rendered[0]).text(), "slpha alpha");
        // Both labels landed on their own span's first character.
        let plain = style::strip(&rendered[0]);
        assert_eq!(&plain.text()[0..1], "s");
        assert_eq!(&plain.text()[6..7], "a");
    }

    #[test]
    fn styled_input_keeps_escapes_outside_the_match() {
        let lines = vec![format!("\x1b[31mred\x1b[0m beta")];
        let matches = vec![SearchMatch::new(0, 4, 8, String::from("beta"))];
        let rendered = render(&lines, &matches);
        assert_eq!(
            rendered[0],
            format!("\x1b[31mred\x1b[0m {HIGHLIGHT}beta{RESET}")
        );
    }

    #[test]
    fn reset_inside_highlight_is_rearmed() {
        let lines = vec![format!("ab\x1b[0mcd")];
        let matches = vec![SearchMatch::new(0, 0, 4, String::from("abcd"))];
        let rendered = render(&lines, &matches);
        assert_eq!(
            rendered[0],
            format!("{HIGHLIGHT}ab{RESET}{HIGHLIGHT}cd{RESET}")
        );
    }

    #[test]
    fn rendering_never_panics_on_malformed_input() {
        let lines = vec![String::from("\x1b[31Hello")];
        let rendered = render(&lines, &[]);
        assert_eq!(style::strip(&rendered[0]).text(), "\x1b[31Hello");
    }
}
