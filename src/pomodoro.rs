use crate::domain::format_clock;
use crate::notifications::{Notification, Notifier};
use std::time::{Duration, Instant};

/// Length of one pomodoro in seconds
pub const POMODORO_SECS: u32 = 25 * 60;

const DECREMENT: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PomodoroPhase {
    Idle,
    Running,
    /// Reached zero; stays here until the next start
    Completed,
}

impl PomodoroPhase {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Idle => "IDLE",
            Self::Running => "RUNNING",
            Self::Completed => "DONE",
        }
    }
}

/// Countdown timer decremented once per second while running
#[derive(Debug, Clone)]
pub struct PomodoroTimer {
    remaining_secs: u32,
    phase: PomodoroPhase,
    next_decrement: Option<Instant>,
}

impl Default for PomodoroTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl PomodoroTimer {
    pub fn new() -> Self {
        Self {
            remaining_secs: POMODORO_SECS,
            phase: PomodoroPhase::Idle,
            next_decrement: None,
        }
    }

    /// Start a fresh pomodoro
    pub fn start(&mut self, now: Instant) {
        self.remaining_secs = POMODORO_SECS;
        self.phase = PomodoroPhase::Running;
        self.next_decrement = Some(now + DECREMENT);
    }

    /// Stop counting. The remaining time stays on display.
    pub fn stop(&mut self) {
        self.next_decrement = None;
        self.phase = PomodoroPhase::Idle;
    }

    pub fn reset(&mut self) {
        self.next_decrement = None;
        self.remaining_secs = POMODORO_SECS;
        self.phase = PomodoroPhase::Idle;
    }

    /// Apply every decrement due at `now`
    pub fn tick(&mut self, now: Instant, notifier: &mut dyn Notifier) {
        while let Some(due) = self.next_decrement {
            if due > now {
                break;
            }

            self.remaining_secs = self.remaining_secs.saturating_sub(1);
            if self.remaining_secs == 0 {
                self.next_decrement = None;
                self.phase = PomodoroPhase::Completed;
                tracing::info!("pomodoro complete");
                notifier.notify(Notification::PomodoroComplete);
                break;
            }
            self.next_decrement = Some(due + DECREMENT);
        }
    }

    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    pub fn phase(&self) -> PomodoroPhase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.phase == PomodoroPhase::Running
    }

    /// Remaining time as `HH:MM:SS`
    pub fn display(&self) -> String {
        format_clock(u64::from(self.remaining_secs))
    }
}
