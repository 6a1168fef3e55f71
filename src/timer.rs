//! One-shot timers

use crate::host::{Host, Registration};

/// Lifecycle of a one-shot timer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerState {
    Pending,
    Fired,
    Cancelled,
}

/// A deferred action that fires exactly once after a fixed delay, unless cancelled.
///
/// The timer holds a host registration while pending. Firing, cancelling and
/// dropping all release it.
#[derive(Debug)]
pub struct OneShotTimer {
    deadline_ms: u64,
    state: TimerState,
    registration: Option<Registration>,
}

impl OneShotTimer {
    /// Schedule a timer on `host` that expires `delay_ms` after `now_ms`
    pub fn start(host: &Host, now_ms: u64, delay_ms: u64) -> Self {
        Self {
            deadline_ms: now_ms.saturating_add(delay_ms),
            state: TimerState::Pending,
            registration: Some(host.schedule_timer()),
        }
    }

    pub fn deadline_ms(&self) -> u64 {
        self.deadline_ms
    }

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn is_pending(&self) -> bool {
        self.state == TimerState::Pending
    }

    /// Returns true on the first poll at or after the deadline, false otherwise
    pub fn poll(&mut self, now_ms: u64) -> bool {
        if self.state != TimerState::Pending || now_ms < self.deadline_ms {
            return false;
        }
        self.state = TimerState::Fired;
        self.registration = None;
        true
    }

    /// Cancel a pending timer. No-op once fired.
    pub fn cancel(&mut self) {
        if self.state == TimerState::Pending {
            self.state = TimerState::Cancelled;
        }
        self.registration = None;
    }
}
