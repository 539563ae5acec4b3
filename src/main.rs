//! Dicta - a voice memo recorder and playback application
//!
//! This is the main entry point for the Dicta application.

mod app;
mod cli;
mod events;
mod host;
mod models;
mod session;
mod settings;
mod state;

use anyhow::Context;
use app::App;
use clap::Parser;
use events::UiEvent;
use host::LocalHost;
use log::info;
use models::{DEFAULT_SPEED, PLAYBACK_SPEEDS};
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse command-line arguments and initialize logging
    let args = cli::Args::parse();
    cli::init_logging(&args);

    info!("Starting Dicta voice memos");

    let recordings_dir = args
        .recordings_dir
        .clone()
        .or_else(|| settings::get_recordings_dir().map(PathBuf::from))
        .unwrap_or_else(default_recordings_dir);
    std::fs::create_dir_all(&recordings_dir).with_context(|| {
        format!(
            "creating recordings directory {}",
            recordings_dir.display()
        )
    })?;

    let (events_tx, mut events_rx) = mpsc::unbounded_channel();
    let host = LocalHost::new(events_tx.clone());
    let speed = settings::get_default_speed().unwrap_or(DEFAULT_SPEED);
    let mut app = App::new(host, recordings_dir, events_tx, speed);
    app.request_permissions();

    println!("dicta - voice memos (type 'help' for commands)");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            Some(event) = events_rx.recv() => app.handle_host(event),
            line = lines.next_line() => {
                let Some(line) = line.context("reading stdin")? else { break };
                if !run_command(&mut app, line.trim()) {
                    break;
                }
            }
        }
    }
    Ok(())
}

fn default_recordings_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("dicta")
        .join("recordings")
}

/// Map one console command onto a UI event. Returns false to quit.
fn run_command(app: &mut App<LocalHost>, line: &str) -> bool {
    let mut parts = line.split_whitespace();
    match parts.next() {
        None => {}
        Some("record") => app.handle_ui(UiEvent::RecordClicked),
        Some("stop") => app.handle_ui(UiEvent::StopClicked),
        Some("play") => {
            if let Some(file_name) = entry_name(app, parts.next()) {
                app.handle_ui(UiEvent::PlayClicked { file_name });
            } else {
                println!("usage: play <index>");
            }
        }
        Some("del") => {
            if let Some(file_name) = entry_name(app, parts.next()) {
                app.handle_ui(UiEvent::DeleteClicked { file_name });
            } else {
                println!("usage: del <index>");
            }
        }
        Some("speed") => match parts.next().and_then(|s| s.parse::<f32>().ok()) {
            Some(speed) if PLAYBACK_SPEEDS.contains(&speed) => {
                app.handle_ui(UiEvent::SpeedClicked { speed });
                settings::set_default_speed(speed);
            }
            _ => println!("usage: speed <0.5|1|1.5|2>"),
        },
        Some("seek") => {
            let file_name = entry_name(app, parts.next());
            let percent = parts.next().and_then(|s| s.parse::<f32>().ok());
            match (file_name, percent) {
                (Some(file_name), Some(percent)) => {
                    app.handle_ui(UiEvent::SeekDragged { file_name, percent });
                }
                _ => println!("usage: seek <index> <percent>"),
            }
        }
        Some("list") => print_list(app),
        Some("json") => match serde_json::to_string_pretty(app.registry().entries()) {
            Ok(json) => println!("{json}"),
            Err(e) => println!("error: {e}"),
        },
        Some("help") => print_help(),
        Some("quit") | Some("exit") => return false,
        Some(other) => println!("unknown command: {other} (try 'help')"),
    }
    true
}

/// Resolve a 1-based display index to a recording identity
fn entry_name(app: &App<LocalHost>, arg: Option<&str>) -> Option<String> {
    let index: usize = arg?.parse().ok()?;
    app.registry()
        .by_index(index)
        .map(|e| e.recording.file_name.clone())
}

fn print_list(app: &App<LocalHost>) {
    if app.registry().is_empty() {
        println!("no recordings yet");
        return;
    }
    for (i, entry) in app.registry().entries().iter().enumerate() {
        println!(
            "{:>2}. {}  [{}] {:.0}%  ({})",
            i + 1,
            entry.recording.title,
            entry.label,
            entry.seek_percent,
            entry.recording.file_name,
        );
    }
    println!("speed: {}x", app.playback().speed());
}

fn print_help() {
    println!("commands:");
    println!("  record            start recording");
    println!("  stop              stop recording and save");
    println!("  list              show recordings");
    println!("  play <n>          play/pause recording n");
    println!("  del <n>           delete recording n");
    println!("  speed <x>         set playback speed (0.5, 1, 1.5, 2)");
    println!("  seek <n> <pct>    seek within recording n");
    println!("  json              dump recordings as JSON");
    println!("  quit              exit");
}
