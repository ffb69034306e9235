//! Console Progress Rendering
//!
//! Turns pipeline progress events into status lines on stderr.

use console::style;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;

use crate::constants::pipeline::stage;
use crate::pipeline::{ProgressEvent, ProgressTracker};

/// Prints one line per stage and per completed question
pub struct ConsoleRenderer {
    tracker: ProgressTracker,
}

impl ConsoleRenderer {
    pub fn new(tracker: ProgressTracker) -> Self {
        Self { tracker }
    }

    /// Start rendering loop; ends after the `Finished` event
    pub fn start_render_loop(&self) -> JoinHandle<()> {
        let mut rx = self.tracker.subscribe();

        tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(event) => {
                        let done = matches!(event, ProgressEvent::Finished { .. });
                        if let Some(line) = render_event(&event) {
                            eprintln!("{}", line);
                        }
                        if done {
                            break;
                        }
                    }
                    Err(RecvError::Lagged(_)) => continue,
                    Err(RecvError::Closed) => break,
                }
            }
        })
    }
}

/// Format a single event, `None` for events that are not shown
pub fn render_event(event: &ProgressEvent) -> Option<String> {
    match event {
        ProgressEvent::StageStarted {
            index, stage: name, ..
        } => Some(format!(
            "{} {}",
            style(format!("[{}/{}]", index, stage::COUNT)).cyan().bold(),
            capitalize(name)
        )),
        ProgressEvent::ItemCompleted {
            completed,
            total,
            item,
            ..
        } => Some(format!(
            "      {} {}/{} {}",
            render_progress_bar(*completed, *total, 20),
            completed,
            total,
            style(truncate(item, 60)).dim()
        )),
        ProgressEvent::StageCompleted { duration_ms, .. } if *duration_ms >= 1000 => Some(format!(
            "      {}",
            style(format!("done in {}", format_duration(duration_ms / 1000))).dim()
        )),
        ProgressEvent::StageCompleted { .. } => None,
        ProgressEvent::Finished {
            success,
            total_duration_secs,
            summary,
        } => {
            let mark = if *success {
                style("✓").green()
            } else {
                style("✗").red()
            };
            Some(format!(
                "{} {} ({})",
                mark,
                summary,
                format_duration(*total_duration_secs)
            ))
        }
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let head: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{}…", head)
    }
}

/// Render a simple progress bar
fn render_progress_bar(completed: usize, total: usize, width: usize) -> String {
    if total == 0 {
        return format!("[{}]", " ".repeat(width));
    }

    let progress = (completed as f32 / total as f32).min(1.0);
    let filled = (progress * width as f32) as usize;
    let empty = width.saturating_sub(filled);

    format!("[{}{}]", "█".repeat(filled), "░".repeat(empty))
}

/// Format duration as human-readable string
fn format_duration(secs: u64) -> String {
    if secs < 60 {
        format!("{}s", secs)
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m", secs / 3600, (secs % 3600) / 60)
    }
}
