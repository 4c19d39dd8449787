use std::path::PathBuf;
use std::time::Duration;

use flashcopy_search::{
    DEFAULT_LABEL_ALPHABET, DEFAULT_WORD_SEPARATORS, SessionConfig,
};

use crate::tmux;

const OPTION_PREFIX: &str = "@flashcopy-";

const DEFAULT_HIGHLIGHT_PARAMS: &str = "1;33";
const DEFAULT_DIM_PARAMS: &str = "2";
const DEFAULT_LABEL_PARAMS: &str = "1;31";
const DEFAULT_IDLE_WARNING_SECS: u64 = 20;
const DEFAULT_IDLE_TIMEOUT_SECS: u64 = 30;
const MIN_IDLE_TIMEOUT_SECS: u64 = 5;
const MAX_IDLE_TIMEOUT_SECS: u64 = 3600;

/// Plugin configuration, read once from `tmux show-options -g` output.
/// Unknown options are ignored; unparsable values silently keep their
/// defaults so a typo in `.tmux.conf` never breaks the popup.
#[derive(Debug, Clone)]
pub struct FlashCopyConfig {
    pub word_separators: String,
    pub case_sensitive: bool,
    pub reverse_search: bool,
    /// SGR parameter lists ("1;33"), turned into escape sequences for the
    /// session config.
    pub highlight_params: String,
    pub dim_params: String,
    pub label_params: String,
    pub label_alphabet: String,
    pub idle_warning_secs: u64,
    pub idle_timeout_secs: u64,
    pub auto_paste: bool,
    pub osc52: bool,
    pub debug_log: Option<PathBuf>,
}

impl Default for FlashCopyConfig {
    fn default() -> Self {
        Self {
            word_separators: DEFAULT_WORD_SEPARATORS.to_string(),
            case_sensitive: false,
            reverse_search: true,
            highlight_params: DEFAULT_HIGHLIGHT_PARAMS.to_string(),
            dim_params: DEFAULT_DIM_PARAMS.to_string(),
            label_params: DEFAULT_LABEL_PARAMS.to_string(),
            label_alphabet: DEFAULT_LABEL_ALPHABET.to_string(),
            idle_warning_secs: DEFAULT_IDLE_WARNING_SECS,
            idle_timeout_secs: DEFAULT_IDLE_TIMEOUT_SECS,
            auto_paste: false,
            osc52: true,
            debug_log: None,
        }
    }
}

impl FlashCopyConfig {
    /// Load the global tmux options. Falls back to defaults entirely when
    /// tmux cannot be queried (e.g. run outside a server for testing).
    pub fn load() -> Self {
        match tmux::show_options() {
            Ok(output) => Self::from_options_output(&output),
            Err(err) => {
                log::warn!("could not read tmux options, using defaults: {err:#}");
                Self::default()
            }
        }
    }

    /// Parse `tmux show-options -g` output: one `name value` pair per
    /// line, values possibly quoted.
    pub fn from_options_output(output: &str) -> Self {
        let mut config = Self::default();

        for line in output.lines() {
            let line = line.trim();
            let Some(rest) = line.strip_prefix(OPTION_PREFIX) else {
                continue;
            };
            let mut parts = rest.splitn(2, ' ');
            let key = parts.next().unwrap_or("").trim();
            let value = parts.next().unwrap_or("").trim();

            if key.eq_ignore_ascii_case("word-separators") {
                if let Some(separators) = parse_string_value(value) {
                    config.word_separators = separators;
                }
            }

            if key.eq_ignore_ascii_case("case-sensitive") {
                if let Some(case_sensitive) = parse_bool(value) {
                    config.case_sensitive = case_sensitive;
                }
            }

            if key.eq_ignore_ascii_case("reverse-search") {
                if let Some(reverse_search) = parse_bool(value) {
                    config.reverse_search = reverse_search;
                }
            }

            if key.eq_ignore_ascii_case("highlight-style") {
                if let Some(params) = parse_sgr_params(value) {
                    config.highlight_params = params;
                }
            }

            if key.eq_ignore_ascii_case("dim-style") {
                if let Some(params) = parse_sgr_params(value) {
                    config.dim_params = params;
                }
            }

            if key.eq_ignore_ascii_case("label-style") {
                if let Some(params) = parse_sgr_params(value) {
                    config.label_params = params;
                }
            }

            if key.eq_ignore_ascii_case("label-alphabet") {
                if let Some(alphabet) = parse_string_value(value) {
                    config.label_alphabet = alphabet;
                }
            }

            if key.eq_ignore_ascii_case("idle-warning-seconds") {
                if let Ok(secs) = value.parse::<u64>() {
                    config.idle_warning_secs = secs.min(MAX_IDLE_TIMEOUT_SECS);
                }
            }

            if key.eq_ignore_ascii_case("idle-timeout-seconds") {
                if let Ok(secs) = value.parse::<u64>() {
                    config.idle_timeout_secs =
                        secs.clamp(MIN_IDLE_TIMEOUT_SECS, MAX_IDLE_TIMEOUT_SECS);
                }
            }

            if key.eq_ignore_ascii_case("auto-paste") {
                if let Some(auto_paste) = parse_bool(value) {
                    config.auto_paste = auto_paste;
                }
            }

            if key.eq_ignore_ascii_case("osc52") {
                if let Some(osc52) = parse_bool(value) {
                    config.osc52 = osc52;
                }
            }

            if key.eq_ignore_ascii_case("debug-log") {
                config.debug_log = parse_string_value(value).map(PathBuf::from);
            }
        }

        config
    }

    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            word_separators: self.word_separators.clone(),
            case_sensitive: self.case_sensitive,
            reverse_order: self.reverse_search,
            highlight_style: sgr_sequence(&self.highlight_params),
            dim_style: sgr_sequence(&self.dim_params),
            label_style: sgr_sequence(&self.label_params),
            label_alphabet: self.label_alphabet.chars().collect(),
            idle_warning: Duration::from_secs(self.idle_warning_secs),
            idle_timeout: Duration::from_secs(self.idle_timeout_secs),
        }
    }
}

fn sgr_sequence(params: &str) -> String {
    format!("\x1b[{params}m")
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn parse_string_value(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    let unquoted = if (trimmed.starts_with('"') && trimmed.ends_with('"') && trimmed.len() >= 2)
        || (trimmed.starts_with('\'') && trimmed.ends_with('\'') && trimmed.len() >= 2)
    {
        &trimmed[1..trimmed.len() - 1]
    } else {
        trimmed
    };

    if unquoted.is_empty() {
        return None;
    }

    Some(unquoted.to_string())
}

/// Accept only digit/semicolon SGR parameter lists; anything else would
/// corrupt the escape sequence built from it.
fn parse_sgr_params(value: &str) -> Option<String> {
    let params = parse_string_value(value)?;
    if params.chars().all(|c| c.is_ascii_digit() || c == ';') {
        Some(params)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_without_options() {
        let config = FlashCopyConfig::from_options_output("");
        assert_eq!(config.word_separators, " \t");
        assert!(!config.case_sensitive);
        assert!(config.reverse_search);
        assert!(!config.auto_paste);
        assert!(config.osc52);
        assert_eq!(config.idle_warning_secs, 20);
        assert_eq!(config.idle_timeout_secs, 30);
    }

    #[test]
    fn unrelated_options_are_ignored() {
        let config = FlashCopyConfig::from_options_output(
            "status-style \"bg=green\"\n\
             @other-plugin-option on\n",
        );
        assert_eq!(config.highlight_params, "1;33");
    }

    #[test]
    fn bool_options_accept_tmux_style_values() {
        let config = FlashCopyConfig::from_options_output(
            "@flashcopy-case-sensitive on\n\
             @flashcopy-reverse-search off\n\
             @flashcopy-auto-paste on\n\
             @flashcopy-osc52 off\n",
        );
        assert!(config.case_sensitive);
        assert!(!config.reverse_search);
        assert!(config.auto_paste);
        assert!(!config.osc52);
    }

    #[test]
    fn quoted_values_are_unquoted() {
        let config = FlashCopyConfig::from_options_output(
            "@flashcopy-word-separators \" =:\"\n\
             @flashcopy-label-alphabet 'qwerty'\n",
        );
        assert_eq!(config.word_separators, " =:");
        assert_eq!(config.label_alphabet, "qwerty");
    }

    #[test]
    fn style_params_are_validated() {
        let config = FlashCopyConfig::from_options_output(
            "@flashcopy-highlight-style \"7;32\"\n\
             @flashcopy-label-style \"bold red\"\n",
        );
        assert_eq!(config.highlight_params, "7;32");
        // Invalid parameter list keeps the default.
        assert_eq!(config.label_params, "1;31");
    }

    #[test]
    fn timeout_values_parse_and_clamp() {
        let config = FlashCopyConfig::from_options_output(
            "@flashcopy-idle-warning-seconds 10\n\
             @flashcopy-idle-timeout-seconds 1\n",
        );
        assert_eq!(config.idle_warning_secs, 10);
        assert_eq!(config.idle_timeout_secs, 5);

        let config = FlashCopyConfig::from_options_output(
            "@flashcopy-idle-timeout-seconds 999999\n",
        );
        assert_eq!(config.idle_timeout_secs, 3600);
    }

    #[test]
    fn session_config_builds_escape_sequences() {
        let config = FlashCopyConfig::from_options_output(
            "@flashcopy-highlight-style \"7;32\"\n",
        );
        let session = config.session_config();
        assert_eq!(session.highlight_style, "\x1b[7;32m");
        assert_eq!(session.dim_style, "\x1b[2m");
        assert!(session.reverse_order);
        assert_eq!(session.idle_timeout, Duration::from_secs(30));
    }

    #[test]
    fn debug_log_path_is_optional() {
        let defaults = FlashCopyConfig::from_options_output("");
        assert!(defaults.debug_log.is_none());

        let config = FlashCopyConfig::from_options_output(
            "@flashcopy-debug-log /tmp/flashcopy.log\n",
        );
        assert_eq!(
            config.debug_log,
            Some(PathBuf::from("/tmp/flashcopy.log"))
        );
    }
}
