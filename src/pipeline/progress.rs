//! Pipeline Progress Events
//!
//! The driver reports stage and per-question progress through a broadcast
//! channel. Emitting never blocks and never fails: with no subscriber the
//! events are dropped.

use std::sync::{Arc, RwLock};
use std::time::Instant;

use tokio::sync::broadcast;

/// Progress event types
#[derive(Debug, Clone, PartialEq)]
pub enum ProgressEvent {
    /// Stage started (`index` is 1-based)
    StageStarted {
        index: u8,
        stage: &'static str,
        total_items: usize,
    },
    /// One per-question call finished within a stage
    ItemCompleted {
        stage: &'static str,
        completed: usize,
        total: usize,
        item: String,
    },
    /// Stage finished
    StageCompleted {
        stage: &'static str,
        duration_ms: u64,
    },
    /// Pipeline finished
    Finished {
        success: bool,
        total_duration_secs: u64,
        summary: String,
    },
}

/// Snapshot of the current position in the pipeline
#[derive(Debug, Clone, Default)]
pub struct ProgressState {
    /// Current stage (1-5), 0 before start
    pub stage_index: u8,
    pub stage: String,
    /// Items completed in current stage
    pub completed: usize,
    /// Total items in current stage
    pub total: usize,
}

/// Real-time progress tracker
#[derive(Clone)]
pub struct ProgressTracker {
    state: Arc<RwLock<ProgressState>>,
    sender: broadcast::Sender<ProgressEvent>,
    start_time: Arc<RwLock<Option<Instant>>>,
    stage_start: Arc<RwLock<Option<Instant>>>,
}

impl Default for ProgressTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressTracker {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(256);

        Self {
            state: Arc::new(RwLock::new(ProgressState::default())),
            sender,
            start_time: Arc::new(RwLock::new(None)),
            stage_start: Arc::new(RwLock::new(None)),
        }
    }

    #[inline]
    fn emit(&self, event: ProgressEvent) {
        // No receivers when no UI is attached
        let _ = self.sender.send(event);
    }

    /// Subscribe to progress events
    pub fn subscribe(&self) -> broadcast::Receiver<ProgressEvent> {
        self.sender.subscribe()
    }

    /// Get current state
    pub fn state(&self) -> ProgressState {
        self.state
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn start(&self) {
        *self
            .start_time
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(Instant::now());

        *self
            .state
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = ProgressState::default();
    }

    pub fn start_stage(&self, index: u8, stage: &'static str, total_items: usize) {
        *self
            .stage_start
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(Instant::now());

        {
            let mut state = self
                .state
                .write()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            state.stage_index = index;
            state.stage = stage.to_string();
            state.completed = 0;
            state.total = total_items;
        }

        self.emit(ProgressEvent::StageStarted {
            index,
            stage,
            total_items,
        });
    }

    pub fn item_completed(&self, stage: &'static str, completed: usize, item: &str) {
        let total = {
            let mut state = self
                .state
                .write()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            state.completed = completed;
            state.total
        };

        self.emit(ProgressEvent::ItemCompleted {
            stage,
            completed,
            total,
            item: item.to_string(),
        });
    }

    pub fn complete_stage(&self, stage: &'static str) {
        let duration_ms = self
            .stage_start
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .as_ref()
            .map(|s| s.elapsed().as_millis() as u64)
            .unwrap_or(0);

        self.emit(ProgressEvent::StageCompleted { stage, duration_ms });
    }

    pub fn finish(&self, success: bool, summary: &str) {
        let total_duration_secs = self
            .start_time
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .as_ref()
            .map(|s| s.elapsed().as_secs())
            .unwrap_or(0);

        self.emit(ProgressEvent::Finished {
            success,
            total_duration_secs,
            summary: summary.to_string(),
        });
    }
}
