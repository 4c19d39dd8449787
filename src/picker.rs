//! The interactive popup: raw-mode key loop around a `SearchSession`.

use std::io::{self, Write};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::{cursor, execute, terminal};

use flashcopy_search::{Frame, SearchSession, SessionStatus};

use crate::clipboard::Clipboard;
use crate::config::FlashCopyConfig;
use crate::tmux;

/// Poll granularity; also the resolution of the idle-timeout clock.
const TICK_INTERVAL: Duration = Duration::from_millis(250);

pub fn run(
    styled_lines: Vec<String>,
    config: &FlashCopyConfig,
    pane_id: &str,
    auto_paste: bool,
) -> Result<()> {
    let mut session = SearchSession::new(styled_lines, config.session_config());

    terminal::enable_raw_mode().context("failed to enable raw mode")?;
    let loop_result = event_loop(&mut session);
    let _ = terminal::disable_raw_mode();
    loop_result?;

    match session.status() {
        SessionStatus::Selected => {
            if let Some(found) = session.selection() {
                let text = found.text.clone();
                log::info!(
                    "selected {:?} at line {} col {}",
                    text,
                    found.line,
                    found.start
                );
                Clipboard::new(config.osc52).copy(&text)?;
                if auto_paste {
                    tmux::paste_buffer(pane_id)?;
                }
            }
        }
        SessionStatus::Cancelled => log::debug!("session cancelled"),
        SessionStatus::TimedOut => log::debug!("session timed out"),
        _ => {}
    }
    Ok(())
}

fn event_loop(session: &mut SearchSession) -> Result<()> {
    let mut stdout = io::stdout();
    execute!(stdout, terminal::EnterAlternateScreen, cursor::Hide)?;

    let result = (|| -> Result<()> {
        loop {
            draw(&mut stdout, &session.frame())?;
            if session.status().is_terminal() {
                return Ok(());
            }
            if event::poll(TICK_INTERVAL)? {
                if let Event::Key(key) = event::read()? {
                    if key.kind != KeyEventKind::Release {
                        handle_key(session, key);
                    }
                }
            }
            session.tick(Instant::now());
        }
    })();

    let _ = execute!(stdout, cursor::Show, terminal::LeaveAlternateScreen);
    result
}

fn handle_key(session: &mut SearchSession, key: KeyEvent) {
    match (key.code, key.modifiers) {
        (KeyCode::Esc, _) => session.cancel(),
        (KeyCode::Char('c'), KeyModifiers::CONTROL) => session.cancel(),
        (KeyCode::Char('u'), KeyModifiers::CONTROL) => session.clear_query(),
        (KeyCode::Char('w'), KeyModifiers::CONTROL) => session.erase_word(),
        (KeyCode::Enter, _) => session.press_enter(),
        (KeyCode::Backspace, _) => session.pop_char(),
        (KeyCode::Char(c), modifiers)
            if modifiers.is_empty() || modifiers == KeyModifiers::SHIFT =>
        {
            session.handle_char(c)
        }
        _ => {}
    }
}

fn draw(stdout: &mut io::Stdout, frame: &Frame) -> Result<()> {
    execute!(
        stdout,
        terminal::Clear(terminal::ClearType::All),
        cursor::MoveTo(0, 0)
    )?;
    for line in &frame.lines {
        write!(stdout, "{line}\r\n")?;
    }
    write!(stdout, "{}", prompt_line(frame))?;
    stdout.flush()?;
    Ok(())
}

/// One-line status prompt under the pane content.
fn prompt_line(frame: &Frame) -> String {
    let counter = if frame.query.is_empty() {
        String::from("type to search")
    } else if frame.match_count == 0 {
        String::from("no matches")
    } else if frame.match_count == 1 {
        String::from("1 match")
    } else {
        format!("{} matches", frame.match_count)
    };
    let mut line = format!("/{}  [{}]", frame.query, counter);
    if frame.warning {
        line.push_str("  (idle, closing soon)");
    }
    line
}
