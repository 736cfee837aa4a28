//! Timer module - frame-synchronised interval scheduler
//!
//! [`FrameSyncInterval`] is driven by the caller: every frame the session passes the
//! elapsed milliseconds to [`FrameSyncInterval::advance`], which reports how many
//! times the interval fired. Nothing happens between calls, so the simulation stays
//! deterministic for a given sequence of `advance` inputs.
//!
//! | Feature | Behaviour |
//! |---------|-----------|
//! | Initial delay | The first firing waits for the delay; later ones for the interval |
//! | Call limit | The timer stops itself after `limit` firings |
//! | Suspend / resume | Resume uses the captured residual as a one-off delay |
//! | Catch-up | A long frame fires once per elapsed interval |

/// Interval timer advanced by explicit elapsed time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameSyncInterval {
    interval_ms: u32,
    /// Time from the last firing (or start) until the next one
    due_ms: u32,
    accumulated_ms: u32,
    count: u32,
    limit: Option<u32>,
    running: bool,
    /// Remaining time captured by `suspend`
    residual_ms: Option<u32>,
}

impl FrameSyncInterval {
    /// Running timer that first fires after one full interval.
    pub fn new(interval_ms: u32) -> Self {
        let interval_ms = interval_ms.max(1);
        Self {
            interval_ms,
            due_ms: interval_ms,
            accumulated_ms: 0,
            count: 0,
            limit: None,
            running: true,
            residual_ms: None,
        }
    }

    /// Timer that is created stopped; call [`restart`](Self::restart) to run it.
    pub fn stopped(interval_ms: u32) -> Self {
        let mut timer = Self::new(interval_ms);
        timer.running = false;
        timer
    }

    /// Use `delay_ms` instead of the interval before the first firing.
    pub fn with_delay(mut self, delay_ms: u32) -> Self {
        self.due_ms = delay_ms;
        self
    }

    /// Stop after `limit` firings.
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Feed elapsed time; returns how many times the interval fired.
    pub fn advance(&mut self, elapsed_ms: u32) -> u32 {
        if !self.running {
            return 0;
        }

        self.accumulated_ms = self.accumulated_ms.saturating_add(elapsed_ms);
        let mut fired = 0;
        while self.running && self.accumulated_ms >= self.due_ms {
            self.accumulated_ms -= self.due_ms;
            self.due_ms = self.interval_ms;
            self.count += 1;
            fired += 1;

            if self.limit.is_some_and(|limit| self.count >= limit) {
                self.running = false;
                self.accumulated_ms = 0;
            }
        }
        fired
    }

    /// Milliseconds until the next firing (the residual while suspended, 0 when stopped).
    pub fn remaining_ms(&self) -> u32 {
        if self.running {
            self.due_ms - self.accumulated_ms
        } else {
            self.residual_ms.unwrap_or(0)
        }
    }

    /// Stop, remembering the time left until the next firing.
    pub fn suspend(&mut self) {
        if !self.running {
            return;
        }
        self.residual_ms = Some(self.remaining_ms());
        self.running = false;
        self.accumulated_ms = 0;
    }

    /// Continue a suspended timer. The first firing waits for the residual.
    pub fn resume(&mut self) {
        if let Some(residual) = self.residual_ms.take() {
            self.due_ms = residual;
            self.accumulated_ms = 0;
            self.running = true;
        }
    }

    /// Stop and discard any residual.
    pub fn cancel(&mut self) {
        self.running = false;
        self.residual_ms = None;
        self.accumulated_ms = 0;
    }

    /// Start over: full interval, zero count.
    pub fn restart(&mut self) {
        self.due_ms = self.interval_ms;
        self.accumulated_ms = 0;
        self.count = 0;
        self.running = true;
        self.residual_ms = None;
    }

    /// Change the interval and start over.
    pub fn restart_with(&mut self, interval_ms: u32) {
        self.interval_ms = interval_ms.max(1);
        self.restart();
    }

    /// Change the interval used after the next firing, keeping the current schedule.
    pub fn set_interval(&mut self, interval_ms: u32) {
        self.interval_ms = interval_ms.max(1);
    }

    pub fn interval_ms(&self) -> u32 {
        self.interval_ms
    }

    /// Firings since the last restart
    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_suspended(&self) -> bool {
        !self.running && self.residual_ms.is_some()
    }
}
