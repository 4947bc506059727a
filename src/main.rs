mod backup;
mod db;
mod equipment;
mod export;
mod ipc;
mod matching;
mod model;
mod planner;
mod schedule;
mod store;
mod views;

use clap::Parser;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Lesson-log sidecar: answers one JSON request per stdin line.
#[derive(Parser, Debug)]
#[command(name = "lessonlogd", version)]
struct Args {
    /// Workspace directory to open at startup.
    #[arg(long)]
    workspace: Option<PathBuf>,

    /// Log at debug level regardless of LESSONLOGD_LOG.
    #[arg(long)]
    debug: bool,
}

fn init_logging(debug: bool) {
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env("LESSONLOGD_LOG").unwrap_or_else(|_| EnvFilter::new("info"))
    };
    // stdout carries the protocol.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let args = Args::parse();
    init_logging(args.debug);

    let mut state = ipc::AppState::default();
    if let Some(path) = args.workspace.as_deref() {
        if let Err(e) = ipc::open_workspace(&mut state, path) {
            tracing::error!(path = %path.display(), "failed to open workspace: {e:#}");
        }
    }

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!("stdin closed: {e}");
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        let resp = match serde_json::from_str::<ipc::Request>(&line) {
            Ok(req) => ipc::handle_request(&mut state, req),
            Err(e) => {
                tracing::warn!("unparseable request line: {e}");
                serde_json::json!({
                    "ok": false,
                    "error": { "code": "bad_json", "message": e.to_string() },
                })
            }
        };

        let text = serde_json::to_string(&resp).unwrap_or_else(|_| "{\"ok\":false}".to_string());
        if writeln!(stdout, "{}", text).and_then(|_| stdout.flush()).is_err() {
            break;
        }
    }
    tracing::debug!("stdin closed, exiting");
}
