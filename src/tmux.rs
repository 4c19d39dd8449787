//! Thin subprocess wrappers around the `tmux` binary.

use std::process::Command;

use anyhow::{Context, Result, bail};

/// Geometry of the source pane within its client terminal, in cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaneDimensions {
    pub pane_x: u16,
    pub pane_y: u16,
    pub pane_width: u16,
    pub pane_height: u16,
    pub terminal_width: u16,
    pub terminal_height: u16,
}

/// Placement of the search popup, in cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PopupGeometry {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

fn run_tmux(args: &[&str]) -> Result<String> {
    log::debug!("tmux {}", args.join(" "));
    let output = Command::new("tmux")
        .args(args)
        .output()
        .with_context(|| format!("failed to run tmux {}", args.join(" ")))?;
    if !output.status.success() {
        bail!(
            "tmux {} failed: {}",
            args.join(" "),
            String::from_utf8_lossy(&output.stderr).trim()
        );
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Capture the pane's visible content with escape sequences preserved.
pub fn capture_pane(pane_id: &str) -> Result<Vec<String>> {
    let output = run_tmux(&["capture-pane", "-p", "-e", "-t", pane_id])?;
    Ok(output.lines().map(str::to_string).collect())
}

pub fn current_pane_id() -> Result<String> {
    let output = run_tmux(&["display-message", "-p", "#{pane_id}"])?;
    let pane_id = output.trim();
    if pane_id.is_empty() {
        bail!("tmux reported an empty pane id");
    }
    Ok(pane_id.to_string())
}

pub fn pane_dimensions(pane_id: &str) -> Result<PaneDimensions> {
    let output = run_tmux(&[
        "display-message",
        "-p",
        "-t",
        pane_id,
        "#{pane_left} #{pane_top} #{pane_width} #{pane_height} #{client_width} #{client_height}",
    ])?;
    let fields: Vec<u16> = output
        .split_whitespace()
        .map(|field| {
            field
                .parse::<u16>()
                .with_context(|| format!("bad pane dimension field {field:?}"))
        })
        .collect::<Result<_>>()?;
    let [pane_x, pane_y, pane_width, pane_height, terminal_width, terminal_height] = fields[..]
    else {
        bail!("unexpected pane dimension output: {output:?}");
    };
    Ok(PaneDimensions {
        pane_x,
        pane_y,
        pane_width,
        pane_height,
        terminal_width,
        terminal_height,
    })
}

/// Place the popup over the source pane. The popup draws a one-cell border
/// on each side, so it grows by two cells per axis and shifts up-left by
/// one, clamped to the client terminal.
pub fn popup_geometry(dims: &PaneDimensions) -> PopupGeometry {
    let width = dims.pane_width.saturating_add(2).min(dims.terminal_width.max(1));
    let height = dims
        .pane_height
        .saturating_add(2)
        .min(dims.terminal_height.max(1));
    let x = dims
        .pane_x
        .saturating_sub(1)
        .min(dims.terminal_width.saturating_sub(width));
    let y = dims
        .pane_y
        .saturating_sub(1)
        .min(dims.terminal_height.saturating_sub(height));
    PopupGeometry {
        x,
        y,
        width,
        height,
    }
}

/// Open a popup running `command`, blocking until it exits.
pub fn display_popup(geometry: &PopupGeometry, command: &[String]) -> Result<()> {
    let x = geometry.x.to_string();
    let y = geometry.y.to_string();
    let width = geometry.width.to_string();
    let height = geometry.height.to_string();
    let mut args = vec![
        "display-popup",
        "-E",
        "-x",
        x.as_str(),
        "-y",
        y.as_str(),
        "-w",
        width.as_str(),
        "-h",
        height.as_str(),
    ];
    args.extend(command.iter().map(String::as_str));
    run_tmux(&args)?;
    Ok(())
}

pub fn show_options() -> Result<String> {
    run_tmux(&["show-options", "-g"])
}

pub fn set_buffer(text: &str) -> Result<()> {
    run_tmux(&["set-buffer", "--", text])?;
    Ok(())
}

pub fn paste_buffer(pane_id: &str) -> Result<()> {
    run_tmux(&["paste-buffer", "-t", pane_id])?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn popup_covers_pane_with_border() {
        let geometry = popup_geometry(&PaneDimensions {
            pane_x: 10,
            pane_y: 5,
            pane_width: 80,
            pane_height: 20,
            terminal_width: 200,
            terminal_height: 50,
        });
        assert_eq!(
            geometry,
            PopupGeometry {
                x: 9,
                y: 4,
                width: 82,
                height: 22,
            }
        );
    }

    #[test]
    fn popup_is_clamped_to_the_terminal() {
        // Full-width pane: the border cannot grow past the client.
        let geometry = popup_geometry(&PaneDimensions {
            pane_x: 0,
            pane_y: 0,
            pane_width: 200,
            pane_height: 50,
            terminal_width: 200,
            terminal_height: 50,
        });
        assert_eq!(
            geometry,
            PopupGeometry {
                x: 0,
                y: 0,
                width: 200,
                height: 50,
            }
        );
    }

    #[test]
    fn popup_near_the_edge_shifts_inward() {
        let geometry = popup_geometry(&PaneDimensions {
            pane_x: 119,
            pane_y: 29,
            pane_width: 80,
            pane_height: 20,
            terminal_width: 200,
            terminal_height: 50,
        });
        assert_eq!(geometry.x + geometry.width, 200);
        assert_eq!(geometry.y + geometry.height, 50);
    }
}
