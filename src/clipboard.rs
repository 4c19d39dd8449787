//! Clipboard delivery for the selected text.
//!
//! Three paths, tried in order: OSC 52 (works over SSH when the terminal
//! allows it), a native clipboard tool, and the tmux buffer. The tmux
//! buffer is always set first regardless, so `paste-buffer` auto-paste
//! works whichever path delivered.

use std::io::{self, Write};
use std::process::{Command, Stdio};

use anyhow::{Context, Result, bail};
use base64::{Engine, engine::general_purpose::STANDARD as BASE64};

use crate::tmux;

#[cfg(target_os = "macos")]
const NATIVE_TOOLS: &[&[&str]] = &[&["pbcopy"]];
#[cfg(all(unix, not(target_os = "macos")))]
const NATIVE_TOOLS: &[&[&str]] = &[
    &["wl-copy"],
    &["xclip", "-selection", "clipboard"],
    &["xsel", "--clipboard", "--input"],
];
#[cfg(windows)]
const NATIVE_TOOLS: &[&[&str]] = &[&["clip"]];

pub struct Clipboard {
    osc52: bool,
}

impl Clipboard {
    pub fn new(osc52: bool) -> Self {
        Self { osc52 }
    }

    pub fn copy(&self, text: &str) -> Result<()> {
        let buffer_result = tmux::set_buffer(text);

        if self.osc52 {
            match self.copy_osc52(text) {
                Ok(()) => return Ok(()),
                Err(err) => log::debug!("OSC 52 copy failed: {err}"),
            }
        }
        match copy_native(text) {
            Ok(()) => return Ok(()),
            Err(err) => log::debug!("native clipboard copy failed: {err:#}"),
        }
        buffer_result.context("all clipboard paths failed; tmux buffer unavailable too")
    }

    fn copy_osc52(&self, text: &str) -> io::Result<()> {
        let sequence = osc52_sequence(text, std::env::var_os("TMUX").is_some());
        let mut stdout = io::stdout().lock();
        stdout.write_all(sequence.as_bytes())?;
        stdout.flush()
    }
}

/// The OSC 52 set-clipboard sequence. Inside tmux it must be wrapped in a
/// DCS passthrough with every ESC doubled, or tmux swallows it.
fn osc52_sequence(text: &str, tmux_passthrough: bool) -> String {
    let sequence = format!("\x1b]52;c;{}\x07", BASE64.encode(text));
    if tmux_passthrough {
        format!("\x1bPtmux;{}\x1b\\", sequence.replace('\x1b', "\x1b\x1b"))
    } else {
        sequence
    }
}

fn copy_native(text: &str) -> Result<()> {
    for tool in NATIVE_TOOLS {
        let Some((program, args)) = tool.split_first() else {
            continue;
        };
        let spawned = Command::new(program)
            .args(args.iter())
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn();
        let Ok(mut child) = spawned else {
            continue;
        };
        if let Some(stdin) = child.stdin.as_mut() {
            if stdin.write_all(text.as_bytes()).is_err() {
                let _ = child.kill();
                continue;
            }
        }
        drop(child.stdin.take());
        if let Ok(status) = child.wait()
            && status.success()
        {
            log::debug!("copied via {program}");
            return Ok(());
        }
    }
    bail!("no native clipboard tool succeeded")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn osc52_sequence_encodes_base64() {
        assert_eq!(
            osc52_sequence("hello", false),
            "\x1b]52;c;aGVsbG8=\x07"
        );
    }

    #[test]
    fn osc52_sequence_wraps_for_tmux_passthrough() {
        let wrapped = osc52_sequence("hi", true);
        assert!(wrapped.starts_with("\x1bPtmux;"));
        assert!(wrapped.ends_with("\x1b\\"));
        // The inner escape is doubled for the passthrough.
        assert!(wrapped.contains("\x1b\x1b]52;c;"));
    }
}
