use regex::{Regex, RegexBuilder};

use crate::matcher::{DEFAULT_LABEL_ALPHABET, MatchSet, SearchMatch};
use crate::style::PlainLine;
use crate::tokenize::Token;

#[derive(Debug, Clone)]
pub struct SearchConfig {
    pub case_sensitive: bool,
    /// Hand out labels bottom-to-top instead of top-to-bottom. Recent
    /// output sits at the bottom of a pane, so it gets the easy labels.
    pub reverse_order: bool,
    pub label_alphabet: Vec<char>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            case_sensitive: false,
            reverse_order: true,
            label_alphabet: DEFAULT_LABEL_ALPHABET.chars().collect(),
        }
    }
}

/// Finds every occurrence of the live query inside the pane's tokens and
/// assigns collision-free selection labels.
pub struct SearchEngine {
    config: SearchConfig,
    query: String,
    compiled: Option<Regex>,
}

impl SearchEngine {
    pub fn new(config: SearchConfig) -> Self {
        Self {
            config,
            query: String::new(),
            compiled: None,
        }
    }

    /// Update the live query, recompiling only when it actually changed.
    /// The query is matched literally; escaping it means compilation cannot
    /// fail, so an empty query is the only "no pattern" state.
    pub fn set_query(&mut self, query: &str) {
        if query == self.query {
            return;
        }
        self.query = query.to_string();

        if query.is_empty() {
            self.compiled = None;
            return;
        }

        self.compiled = RegexBuilder::new(&regex::escape(query))
            .case_insensitive(!self.config.case_sensitive)
            .build()
            .ok();
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn has_query(&self) -> bool {
        self.compiled.is_some()
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Search every token of every line for the current query and assign
    /// labels. Pure: identical inputs always produce the identical match
    /// set, and nothing is retained between calls.
    ///
    /// Matches never cross a token boundary; candidates inside one token
    /// are resolved greedily left to right without overlap.
    pub fn search(&self, lines: &[PlainLine], tokens_per_line: &[Vec<Token>]) -> MatchSet {
        let Some(regex) = &self.compiled else {
            return MatchSet::new();
        };

        let mut matches = Vec::new();
        // Character following each match inside its token, used for the
        // label-ambiguity check below.
        let mut continuations = Vec::new();

        for (line_idx, plain) in lines.iter().enumerate() {
            let Some(line_tokens) = tokens_per_line.get(line_idx) else {
                continue;
            };
            let text = plain.text();
            for token in line_tokens {
                let token_text = &text[token.start..token.end];
                for found in regex.find_iter(token_text) {
                    let start = token.start + found.start();
                    let end = token.start + found.end();
                    matches.push(SearchMatch::new(
                        line_idx,
                        start,
                        end,
                        text[start..end].to_string(),
                    ));
                    continuations.push(if end < token.end {
                        text[end..].chars().next()
                    } else {
                        None
                    });
                }
            }
        }

        self.assign_labels(&mut matches, &continuations);
        MatchSet::from_matches(matches)
    }

    /// Walk the matches in label-assignment order handing out the next
    /// unused alphabet character. A candidate is rejected for a match when
    /// pressing it could equally be read as typing the next character of
    /// that match's token; the rejected character stays available for later
    /// matches. Once the alphabet is exhausted the remaining matches keep
    /// `label: None`.
    fn assign_labels(&self, matches: &mut [SearchMatch], continuations: &[Option<char>]) {
        if self.query.is_empty() || matches.is_empty() {
            return;
        }
        let alphabet = &self.config.label_alphabet;
        let mut used = vec![false; alphabet.len()];

        let indexes: Vec<usize> = if self.config.reverse_order {
            (0..matches.len()).rev().collect()
        } else {
            (0..matches.len()).collect()
        };

        for idx in indexes {
            let continuation = continuations.get(idx).copied().flatten();
            let slot = (0..alphabet.len())
                .find(|&i| !used[i] && Some(alphabet[i]) != continuation);
            if let Some(i) = slot {
                used[i] = true;
                matches[idx].label = Some(alphabet[i]);
            }
        }
    }
}
