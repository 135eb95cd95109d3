//! Workout timer.
//!
//! The timer is a clock-based state machine. It does not use internal
//! threads; elapsed time is computed from the clock whenever it is asked for.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Running <-> Paused
//!   \        |          /
//!    `---> Stopped <---'
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut timer = Timer::new(Arc::new(SystemClock));
//! timer.start()?;
//! // later
//! timer.pause()?;
//! timer.resume()?;
//! timer.stop();
//! let secs = timer.elapsed_seconds();
//! ```

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::clock::Clock;
use crate::error::InvalidStateError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerState {
    Idle,
    Running,
    Paused,
    Stopped,
}

/// Progress of the timer against a target duration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimerProgress {
    pub elapsed_seconds: f64,
    pub elapsed_minutes: f64,
    pub formatted_time: String,
    /// 0.0 .. 100.0
    pub progress_percent: f64,
    pub remaining_minutes: f64,
    pub target_minutes: f64,
    pub is_complete: bool,
}

/// Accumulates active time across pause/resume cycles.
#[derive(Debug, Clone)]
pub struct Timer {
    clock: Arc<dyn Clock>,
    state: TimerState,
    /// Active time banked by previous running intervals.
    accumulated_ms: u64,
    /// Clock reading when the current running interval began.
    running_since_ms: Option<u64>,
}

impl Timer {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            state: TimerState::Idle,
            accumulated_ms: 0,
            running_since_ms: None,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == TimerState::Running
    }

    pub fn elapsed_ms(&self) -> u64 {
        match (self.state, self.running_since_ms) {
            (TimerState::Running, Some(since)) => self
                .accumulated_ms
                .saturating_add(self.clock.now_ms().saturating_sub(since)),
            _ => self.accumulated_ms,
        }
    }

    pub fn elapsed_seconds(&self) -> f64 {
        self.elapsed_ms() as f64 / 1000.0
    }

    pub fn elapsed_minutes(&self) -> f64 {
        self.elapsed_seconds() / 60.0
    }

    /// Elapsed time as `HH:MM:SS`.
    pub fn formatted(&self) -> String {
        format_hms(self.elapsed_ms() / 1000)
    }

    pub fn progress(&self, target_minutes: f64) -> TimerProgress {
        let elapsed_minutes = self.elapsed_minutes();
        let progress_percent = if target_minutes > 0.0 {
            (elapsed_minutes / target_minutes * 100.0).min(100.0)
        } else {
            100.0
        };
        TimerProgress {
            elapsed_seconds: self.elapsed_seconds(),
            elapsed_minutes,
            formatted_time: self.formatted(),
            progress_percent,
            remaining_minutes: (target_minutes - elapsed_minutes).max(0.0),
            target_minutes,
            is_complete: progress_percent >= 100.0,
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn start(&mut self) -> Result<(), InvalidStateError> {
        match self.state {
            TimerState::Idle => {
                self.state = TimerState::Running;
                self.running_since_ms = Some(self.clock.now_ms());
                Ok(())
            }
            state => Err(InvalidStateError {
                operation: "start",
                state,
            }),
        }
    }

    pub fn pause(&mut self) -> Result<(), InvalidStateError> {
        match self.state {
            TimerState::Running => {
                self.flush_elapsed();
                self.state = TimerState::Paused;
                Ok(())
            }
            state => Err(InvalidStateError {
                operation: "pause",
                state,
            }),
        }
    }

    pub fn resume(&mut self) -> Result<(), InvalidStateError> {
        match self.state {
            TimerState::Paused => {
                self.state = TimerState::Running;
                self.running_since_ms = Some(self.clock.now_ms());
                Ok(())
            }
            state => Err(InvalidStateError {
                operation: "resume",
                state,
            }),
        }
    }

    /// Freeze elapsed time. Valid from any state.
    pub fn stop(&mut self) {
        if self.state == TimerState::Running {
            self.flush_elapsed();
        }
        self.running_since_ms = None;
        self.state = TimerState::Stopped;
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn flush_elapsed(&mut self) {
        if let Some(since) = self.running_since_ms.take() {
            let now = self.clock.now_ms();
            self.accumulated_ms = self
                .accumulated_ms
                .saturating_add(now.saturating_sub(since));
        }
    }
}

pub(crate) fn format_hms(total_seconds: u64) -> String {
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;
    format!("{hours:02}:{minutes:02}:{seconds:02}")
}
