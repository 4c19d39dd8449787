use std::collections::HashMap;

/// Label preference order: home row first, then the rest of the lowercase
/// keyboard, then the same order uppercased. 52 labels total.
pub const DEFAULT_LABEL_ALPHABET: &str =
    "asdfghjklqwertyuiopzxcvbnmASDFGHJKLQWERTYUIOPZXCVBNM";

/// One occurrence of the query inside a token. Offsets are plain byte
/// offsets into the line, half-open; `text` is the original-case matched
/// plain text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchMatch {
    pub line: usize,
    pub start: usize,
    pub end: usize,
    pub text: String,
    pub label: Option<char>,
}

impl SearchMatch {
    pub fn new(line: usize, start: usize, end: usize, text: String) -> Self {
        Self {
            line,
            start,
            end,
            text,
            label: None,
        }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// The match set for one query, in display order (top to bottom, left to
/// right), with a label lookup for single-keystroke selection.
#[derive(Debug, Clone, Default)]
pub struct MatchSet {
    matches: Vec<SearchMatch>,
    label_index: HashMap<char, usize>,
}

impl MatchSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_matches(matches: Vec<SearchMatch>) -> Self {
        let label_index = matches
            .iter()
            .enumerate()
            .filter_map(|(idx, m)| m.label.map(|label| (label, idx)))
            .collect();
        Self {
            matches,
            label_index,
        }
    }

    pub fn count(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    pub fn matches(&self) -> &[SearchMatch] {
        &self.matches
    }

    pub fn by_label(&self, label: char) -> Option<&SearchMatch> {
        self.label_index
            .get(&label)
            .and_then(|&idx| self.matches.get(idx))
    }

    /// Assigned labels in display order.
    pub fn labels(&self) -> Vec<char> {
        self.matches.iter().filter_map(|m| m.label).collect()
    }

    /// The match that received the first label, i.e. the first match in
    /// label-assignment order.
    pub fn first_in_order(&self, reverse_order: bool) -> Option<&SearchMatch> {
        if reverse_order {
            self.matches.last()
        } else {
            self.matches.first()
        }
    }
}
