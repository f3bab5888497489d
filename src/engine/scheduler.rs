use crate::domain::{LifecycleInputs, SubtaskState};
use chrono::{Duration, NaiveDateTime};

/// Interval between countdown refreshes of an active subtask
pub const COUNTDOWN_INTERVAL_SECS: i64 = 1;

/// Kind of wake-up that came due
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wake {
    /// The start of the window arrived
    Start,
    /// The end of an open-ended window arrived
    Boundary,
    /// Periodic countdown refresh while active
    Countdown,
}

/// Pending wake-ups owned by a single subtask. Cancelling clears the
/// deadlines, so nothing armed before a cancel can ever come due.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SubtaskScheduler {
    one_shot: Option<(NaiveDateTime, Wake)>,
    countdown: Option<NaiveDateTime>,
}

impl SubtaskScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop everything and arm what `state` needs
    pub fn reschedule(&mut self, state: &SubtaskState, inputs: &LifecycleInputs, now: NaiveDateTime) {
        self.cancel_all();

        match state {
            SubtaskState::Upcoming {
                starts_at: Some(start),
            } => {
                self.one_shot = Some((*start, Wake::Start));
            }
            SubtaskState::Upcoming { starts_at: None } => {
                if let Some(end) = inputs.end_time.filter(|end| *end > now) {
                    self.one_shot = Some((end, Wake::Boundary));
                }
            }
            SubtaskState::Active { .. } => {
                self.countdown = Some(now + Duration::seconds(COUNTDOWN_INTERVAL_SECS));
            }
            SubtaskState::Ended | SubtaskState::Completed => {}
        }
    }

    pub fn cancel_all(&mut self) {
        self.one_shot = None;
        self.countdown = None;
    }

    #[cfg(test)]
    pub fn is_idle(&self) -> bool {
        self.one_shot.is_none() && self.countdown.is_none()
    }

    /// Take the wake-up that is due at `now`, if any
    pub fn due(&mut self, now: NaiveDateTime) -> Option<Wake> {
        if let Some((at, wake)) = self.one_shot {
            if at <= now {
                self.one_shot = None;
                return Some(wake);
            }
        }
        if let Some(at) = self.countdown {
            if at <= now {
                self.countdown = None;
                return Some(Wake::Countdown);
            }
        }
        None
    }

    /// Earliest armed deadline
    pub fn next_deadline(&self) -> Option<NaiveDateTime> {
        match (self.one_shot.map(|(at, _)| at), self.countdown) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }
}
