mod clipboard;
mod config;
mod picker;
mod tmux;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};

use config::FlashCopyConfig;

#[derive(Parser)]
#[command(name = "flashcopy")]
#[command(about = "Search, label and copy words from a tmux pane", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Capture a pane and open the search popup (bind this to a tmux key)
    Launch {
        /// Target pane; defaults to the active pane
        #[arg(long)]
        pane_id: Option<String>,
    },
    /// Run the interactive search session inside the popup (internal)
    Pick {
        /// File holding the captured pane content
        #[arg(long)]
        content_file: PathBuf,

        /// Pane the content was captured from
        #[arg(long)]
        pane_id: String,

        /// Paste the selection back into the pane after copying
        #[arg(long, action = ArgAction::Set, default_value_t = false)]
        auto_paste: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = FlashCopyConfig::load();
    init_logging(&config);

    match cli.action {
        Action::Launch { pane_id } => launch(&config, pane_id),
        Action::Pick {
            content_file,
            pane_id,
            auto_paste,
        } => pick(&config, &content_file, &pane_id, auto_paste),
    }
}

fn init_logging(config: &FlashCopyConfig) {
    if let Some(path) = &config.debug_log {
        if let Ok(file) = fs::OpenOptions::new().create(true).append(true).open(path) {
            env_logger::Builder::from_default_env()
                .target(env_logger::Target::Pipe(Box::new(file)))
                .init();
            return;
        }
    }
    env_logger::init();
}

fn launch(config: &FlashCopyConfig, pane_id: Option<String>) -> Result<()> {
    let pane_id = match pane_id {
        Some(id) => id,
        None => tmux::current_pane_id()?,
    };
    let lines = tmux::capture_pane(&pane_id)?;
    log::debug!("captured {} lines from pane {pane_id}", lines.len());

    let content_file = std::env::temp_dir().join(format!("flashcopy-{}.txt", std::process::id()));
    fs::write(&content_file, lines.join("\n"))
        .with_context(|| format!("failed to write {}", content_file.display()))?;

    let dims = tmux::pane_dimensions(&pane_id)?;
    let geometry = tmux::popup_geometry(&dims);
    let exe = std::env::current_exe().context("failed to locate the flashcopy executable")?;

    let command = vec![
        exe.to_string_lossy().into_owned(),
        String::from("pick"),
        String::from("--content-file"),
        content_file.to_string_lossy().into_owned(),
        String::from("--pane-id"),
        pane_id.clone(),
        String::from("--auto-paste"),
        config.auto_paste.to_string(),
    ];

    let popup_result = tmux::display_popup(&geometry, &command);
    let _ = fs::remove_file(&content_file);
    popup_result
}

fn pick(
    config: &FlashCopyConfig,
    content_file: &Path,
    pane_id: &str,
    auto_paste: bool,
) -> Result<()> {
    let content = fs::read_to_string(content_file)
        .with_context(|| format!("failed to read {}", content_file.display()))?;
    let lines: Vec<String> = content.lines().map(str::to_string).collect();
    picker::run(lines, config, pane_id, auto_paste)
}
