use std::time::Instant;

use crate::config::SessionConfig;
use crate::engine::{SearchConfig, SearchEngine};
use crate::matcher::{MatchSet, SearchMatch};
use crate::render::Renderer;
use crate::style::{self, PlainLine};
use crate::tokenize::{self, Token};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Idle,
    Searching,
    Selected,
    Cancelled,
    TimedOut,
}

impl SessionStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Selected | Self::Cancelled | Self::TimedOut)
    }
}

/// Everything the display collaborator needs to draw one frame: the
/// re-rendered styled lines plus the metadata for the prompt/status line.
#[derive(Debug, Clone)]
pub struct Frame {
    pub lines: Vec<String>,
    pub query: String,
    pub match_count: usize,
    pub labels: Vec<char>,
    pub warning: bool,
    pub status: SessionStatus,
}

/// One interactive search session over a captured pane.
///
/// Pure and synchronous: one keystroke or timer tick in, one state change
/// out. The caller's poll loop owns the clock and feeds [`tick`] with the
/// current instant; once a terminal status is reached every input becomes
/// a no-op and the caller tears the session down.
///
/// [`tick`]: SearchSession::tick
pub struct SearchSession {
    config: SessionConfig,
    styled_lines: Vec<String>,
    plain_lines: Vec<PlainLine>,
    tokens: Vec<Vec<Token>>,
    engine: SearchEngine,
    renderer: Renderer,
    matches: MatchSet,
    status: SessionStatus,
    selected: Option<SearchMatch>,
    last_activity: Instant,
    warning: bool,
}

impl SearchSession {
    pub fn new(styled_lines: Vec<String>, config: SessionConfig) -> Self {
        let config = config.validated();
        let plain_lines: Vec<PlainLine> =
            styled_lines.iter().map(|line| style::strip(line)).collect();
        let tokens: Vec<Vec<Token>> = plain_lines
            .iter()
            .enumerate()
            .map(|(idx, plain)| {
                tokenize::tokenize(idx, plain.text(), &config.word_separators).collect()
            })
            .collect();
        let engine = SearchEngine::new(SearchConfig {
            case_sensitive: config.case_sensitive,
            reverse_order: config.reverse_order,
            label_alphabet: config.label_alphabet.clone(),
        });
        let renderer = Renderer::new(
            &config.highlight_style,
            &config.dim_style,
            &config.label_style,
        );

        Self {
            config,
            styled_lines,
            plain_lines,
            tokens,
            engine,
            renderer,
            matches: MatchSet::new(),
            status: SessionStatus::Idle,
            selected: None,
            last_activity: Instant::now(),
            warning: false,
        }
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn query(&self) -> &str {
        self.engine.query()
    }

    pub fn matches(&self) -> &[SearchMatch] {
        self.matches.matches()
    }

    pub fn match_count(&self) -> usize {
        self.matches.count()
    }

    pub fn warning(&self) -> bool {
        self.warning
    }

    /// The committed match once the session reached `Selected`.
    pub fn selection(&self) -> Option<&SearchMatch> {
        self.selected.as_ref()
    }

    /// Append a printable character to the query.
    pub fn type_char(&mut self, c: char) {
        if self.status.is_terminal() {
            return;
        }
        self.touch();
        let mut query = self.engine.query().to_string();
        query.push(c);
        self.engine.set_query(&query);
        self.refresh_matches();
    }

    /// Remove the last character of the query (backspace).
    pub fn pop_char(&mut self) {
        if self.status.is_terminal() {
            return;
        }
        self.touch();
        let mut query = self.engine.query().to_string();
        query.pop();
        self.engine.set_query(&query);
        self.refresh_matches();
    }

    /// Remove the trailing word of the query.
    pub fn erase_word(&mut self) {
        if self.status.is_terminal() {
            return;
        }
        self.touch();
        let mut query = self.engine.query().to_string();
        while query.ends_with(' ') {
            query.pop();
        }
        let cut = query.rfind(' ').map_or(0, |idx| idx + 1);
        query.truncate(cut);
        self.engine.set_query(&query);
        self.refresh_matches();
    }

    /// Clear the whole query.
    pub fn clear_query(&mut self) {
        if self.status.is_terminal() {
            return;
        }
        self.touch();
        self.engine.set_query("");
        self.refresh_matches();
    }

    /// A printable keystroke: selects when it names an assigned label,
    /// otherwise extends the query.
    pub fn handle_char(&mut self, c: char) {
        if self.status.is_terminal() {
            return;
        }
        if self.matches.by_label(c).is_some() {
            self.press_label(c);
        } else {
            self.type_char(c);
        }
    }

    /// Commit the match carrying `label`; unknown labels (including any
    /// press while the match set is empty) are a no-op.
    pub fn press_label(&mut self, label: char) {
        if self.status.is_terminal() {
            return;
        }
        self.touch();
        if let Some(found) = self.matches.by_label(label) {
            self.selected = Some(found.clone());
            self.status = SessionStatus::Selected;
        }
    }

    /// Commit the first match in label-assignment order; a no-op with an
    /// empty match set.
    pub fn press_enter(&mut self) {
        if self.status.is_terminal() {
            return;
        }
        self.touch();
        if let Some(found) = self.matches.first_in_order(self.config.reverse_order) {
            self.selected = Some(found.clone());
            self.status = SessionStatus::Selected;
        }
    }

    pub fn cancel(&mut self) {
        if self.status.is_terminal() {
            return;
        }
        self.status = SessionStatus::Cancelled;
    }

    /// Advance the idle clock: raises the warning flag past the warning
    /// threshold and times the session out past the timeout threshold.
    pub fn tick(&mut self, now: Instant) {
        if self.status.is_terminal() {
            return;
        }
        let idle = now.saturating_duration_since(self.last_activity);
        if idle >= self.config.idle_timeout {
            self.status = SessionStatus::TimedOut;
        } else {
            self.warning = idle >= self.config.idle_warning;
        }
    }

    pub fn frame(&self) -> Frame {
        Frame {
            lines: self
                .renderer
                .render(&self.styled_lines, &self.plain_lines, self.matches.matches()),
            query: self.engine.query().to_string(),
            match_count: self.matches.count(),
            labels: self.matches.labels(),
            warning: self.warning,
            status: self.status,
        }
    }

    fn touch(&mut self) {
        self.last_activity = Instant::now();
        self.warning = false;
    }

    fn refresh_matches(&mut self) {
        self.matches = self.engine.search(&self.plain_lines, &self.tokens);
        self.status = if self.engine.query().is_empty() {
            SessionStatus::Idle
        } else {
            SessionStatus::Searching
        };
    }
}
