use std::time::Duration;

use crate::matcher::DEFAULT_LABEL_ALPHABET;

pub const DEFAULT_WORD_SEPARATORS: &str = " \t";
pub const DEFAULT_HIGHLIGHT_STYLE: &str = "\x1b[1;33m";
pub const DEFAULT_DIM_STYLE: &str = "\x1b[2m";
pub const DEFAULT_LABEL_STYLE: &str = "\x1b[1;31m";
pub const DEFAULT_IDLE_WARNING: Duration = Duration::from_secs(20);
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(30);

/// Immutable per-session configuration, validated once at session
/// construction. The style fields are opaque escape sequences: the engine
/// inserts them verbatim and never interprets them.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub word_separators: String,
    pub case_sensitive: bool,
    pub reverse_order: bool,
    pub highlight_style: String,
    pub dim_style: String,
    pub label_style: String,
    pub label_alphabet: Vec<char>,
    pub idle_warning: Duration,
    pub idle_timeout: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            word_separators: DEFAULT_WORD_SEPARATORS.to_string(),
            case_sensitive: false,
            reverse_order: true,
            highlight_style: DEFAULT_HIGHLIGHT_STYLE.to_string(),
            dim_style: DEFAULT_DIM_STYLE.to_string(),
            label_style: DEFAULT_LABEL_STYLE.to_string(),
            label_alphabet: DEFAULT_LABEL_ALPHABET.chars().collect(),
            idle_warning: DEFAULT_IDLE_WARNING,
            idle_timeout: DEFAULT_IDLE_TIMEOUT,
        }
    }
}

impl SessionConfig {
    /// Normalize degenerate values: duplicate labels collapse to their
    /// first occurrence and the warning threshold never exceeds the
    /// timeout. Empty separator and alphabet sets are legal (one token per
    /// line, no labels assignable).
    pub fn validated(mut self) -> Self {
        let mut seen = Vec::with_capacity(self.label_alphabet.len());
        self.label_alphabet.retain(|c| {
            if seen.contains(c) {
                false
            } else {
                seen.push(*c);
                true
            }
        });
        if self.idle_warning > self.idle_timeout {
            self.idle_warning = self.idle_timeout;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validated_dedupes_alphabet() {
        let config = SessionConfig {
            label_alphabet: vec!['a', 'b', 'a', 'c', 'b'],
            ..SessionConfig::default()
        }
        .validated();
        assert_eq!(config.label_alphabet, vec!['a', 'b', 'c']);
    }

    #[test]
    fn validated_caps_warning_at_timeout() {
        let config = SessionConfig {
            idle_warning: Duration::from_secs(90),
            idle_timeout: Duration::from_secs(30),
            ..SessionConfig::default()
        }
        .validated();
        assert_eq!(config.idle_warning, config.idle_timeout);
    }

    #[test]
    fn default_alphabet_has_52_unique_labels() {
        let config = SessionConfig::default().validated();
        assert_eq!(config.label_alphabet.len(), 52);
    }
}
