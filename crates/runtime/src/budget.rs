use foundation::time::Time;

/// Fixed retry budget for polling a resource that becomes available later.
///
/// Attempts are spaced by a fixed interval and counted against a hard
/// maximum. The first attempt is allowed immediately.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct RetryBudget {
    remaining_attempts: u32,
    interval_s: f64,
    next_due: Option<Time>,
}

impl RetryBudget {
    pub fn new(max_attempts: u32, interval_s: f64) -> Self {
        Self {
            remaining_attempts: max_attempts,
            interval_s,
            next_due: None,
        }
    }

    pub fn remaining_attempts(&self) -> u32 {
        self.remaining_attempts
    }

    pub fn is_exhausted(&self) -> bool {
        self.remaining_attempts == 0
    }

    /// Consumes one attempt if one is due at `now`.
    ///
    /// Returns `false` when the budget is exhausted or the interval since the
    /// previous attempt has not elapsed yet.
    pub fn try_attempt(&mut self, now: Time) -> bool {
        if self.remaining_attempts == 0 {
            return false;
        }
        if let Some(due) = self.next_due {
            if now < due {
                return false;
            }
        }
        self.remaining_attempts -= 1;
        self.next_due = Some(now.after(self.interval_s));
        true
    }
}
