//! Word boundary detection on plain pane lines.

/// A maximal run of non-separator characters within one plain line.
/// Offsets are plain byte offsets, half-open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub line: usize,
    pub start: usize,
    pub end: usize,
}

impl Token {
    pub fn new(line: usize, start: usize, end: usize) -> Self {
        Self { line, start, end }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Iterate the tokens of `plain` left to right. A character belongs to a
/// word iff it is not in `separators`; an empty separator set makes the
/// whole line one token.
pub fn tokenize<'a>(line: usize, plain: &'a str, separators: &'a str) -> Tokens<'a> {
    Tokens {
        line,
        plain,
        separators,
        pos: 0,
    }
}

pub struct Tokens<'a> {
    line: usize,
    plain: &'a str,
    separators: &'a str,
    pos: usize,
}

impl Iterator for Tokens<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        let mut pos = self.pos;
        while let Some(c) = self.plain[pos..].chars().next() {
            if !self.separators.contains(c) {
                break;
            }
            pos += c.len_utf8();
        }
        if pos >= self.plain.len() {
            self.pos = pos;
            return None;
        }

        let start = pos;
        while let Some(c) = self.plain[pos..].chars().next() {
            if self.separators.contains(c) {
                break;
            }
            pos += c.len_utf8();
        }
        self.pos = pos;
        Some(Token::new(self.line, start, pos))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spans(plain: &str, separators: &str) -> Vec<(usize, usize)> {
        tokenize(0, plain, separators)
            .map(|t| (t.start, t.end))
            .collect()
    }

    #[test]
    fn splits_on_separators() {
        assert_eq!(spans("alpha beta", " "), vec![(0, 5), (6, 10)]);
    }

    #[test]
    fn skips_leading_and_trailing_separators() {
        assert_eq!(spans("  one  two  ", " "), vec![(2, 5), (7, 10)]);
    }

    #[test]
    fn empty_line_yields_no_tokens() {
        assert_eq!(spans("", " "), vec![]);
        assert_eq!(spans("   ", " "), vec![]);
    }

    #[test]
    fn empty_separator_set_yields_one_token() {
        assert_eq!(spans("a b c", ""), vec![(0, 5)]);
    }

    #[test]
    fn custom_separator_set() {
        assert_eq!(spans("a=b,c", "=,"), vec![(0, 1), (2, 3), (4, 5)]);
    }

    #[test]
    fn tokens_carry_their_line_index() {
        let tokens: Vec<Token> = tokenize(7, "word", " ").collect();
        assert_eq!(tokens, vec![Token::new(7, 0, 4)]);
    }

    #[test]
    fn iteration_is_restartable() {
        let plain = "x yz";
        let first: Vec<Token> = tokenize(0, plain, " ").collect();
        let second: Vec<Token> = tokenize(0, plain, " ").collect();
        assert_eq!(first, second);
    }
}
