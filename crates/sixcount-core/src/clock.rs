//! Pause/resume-aware session clock.
//!
//! Tracks accumulated paused time so elapsed-time and deadline math stay
//! correct across pause intervals. All timing in the engine is expressed in
//! the elapsed-time domain this clock produces: milliseconds since session
//! start, excluding every paused interval. Pausing therefore freezes every
//! pending deadline without rescheduling anything.

use serde::{Deserialize, Serialize};

/// Wall-clock session timer that excludes paused intervals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClock {
    /// Epoch ms when the session started.
    started_epoch_ms: u64,
    /// Total milliseconds spent paused so far (closed pauses only).
    paused_accum_ms: u64,
    /// Epoch ms at which the current pause began, if paused.
    paused_since_epoch_ms: Option<u64>,
}

impl SessionClock {
    /// Start a new clock at the given epoch millisecond.
    pub fn start_at(now_epoch_ms: u64) -> Self {
        Self {
            started_epoch_ms: now_epoch_ms,
            paused_accum_ms: 0,
            paused_since_epoch_ms: None,
        }
    }

    pub fn is_paused(&self) -> bool {
        self.paused_since_epoch_ms.is_some()
    }

    /// Total time spent paused, including an open pause.
    pub fn paused_ms(&self, now_epoch_ms: u64) -> u64 {
        match self.paused_since_epoch_ms {
            Some(since) => self
                .paused_accum_ms
                .saturating_add(now_epoch_ms.saturating_sub(since)),
            None => self.paused_accum_ms,
        }
    }

    /// Milliseconds elapsed since start, excluding paused intervals.
    ///
    /// While paused this is frozen at the value it had when the pause began.
    pub fn elapsed_ms(&self, now_epoch_ms: u64) -> u64 {
        let reference = self.paused_since_epoch_ms.unwrap_or(now_epoch_ms);
        reference
            .saturating_sub(self.started_epoch_ms)
            .saturating_sub(self.paused_accum_ms)
    }

    /// Begin a pause. No-op when already paused.
    pub fn pause_at(&mut self, now_epoch_ms: u64) {
        if self.paused_since_epoch_ms.is_none() {
            self.paused_since_epoch_ms = Some(now_epoch_ms);
        }
    }

    /// End the current pause, folding its duration into the accumulator.
    /// No-op when not paused.
    pub fn resume_at(&mut self, now_epoch_ms: u64) {
        if let Some(since) = self.paused_since_epoch_ms.take() {
            self.paused_accum_ms = self
                .paused_accum_ms
                .saturating_add(now_epoch_ms.saturating_sub(since));
        }
    }
}

/// Current wall clock as epoch milliseconds.
pub fn now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
