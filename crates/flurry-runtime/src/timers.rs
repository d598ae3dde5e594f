//! Cancellable one-shot and interval timers
//!
//! The host pumps the queue with its current timestamp; due timers hand their
//! tag back to the caller, which dispatches on it. Nothing here runs code on
//! its own, so cancelling a timer is always race-free.

/// Handle for an armed timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(u64);

struct Timer<T> {
    id: TimerId,
    deadline: f64,
    period: Option<f64>,
    tag: T,
}

/// Queue of pending timers carrying a caller-defined tag
pub struct TimerQueue<T> {
    timers: Vec<Timer<T>>,
    next_id: u64,
}

impl<T: Copy> Default for TimerQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Copy> TimerQueue<T> {
    pub fn new() -> Self {
        Self {
            timers: Vec::new(),
            next_id: 1,
        }
    }

    /// Arm a one-shot timer firing `delay` seconds after `now`
    pub fn set_timeout(&mut self, now: f64, delay: f64, tag: T) -> TimerId {
        self.arm(now + delay.max(0.0), None, tag)
    }

    /// Arm a repeating timer firing every `period` seconds after `now`
    pub fn set_interval(&mut self, now: f64, period: f64, tag: T) -> TimerId {
        let period = period.max(1e-3);
        self.arm(now + period, Some(period), tag)
    }

    fn arm(&mut self, deadline: f64, period: Option<f64>, tag: T) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.timers.push(Timer {
            id,
            deadline,
            period,
            tag,
        });
        id
    }

    /// Cancel a timer. Returns false if it already fired or was cancelled.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.timers.len();
        self.timers.retain(|t| t.id != id);
        self.timers.len() != before
    }

    /// Cancel everything
    pub fn cancel_all(&mut self) {
        self.timers.clear();
    }

    pub fn is_armed(&self, id: TimerId) -> bool {
        self.timers.iter().any(|t| t.id == id)
    }

    /// Deadline of a specific timer
    pub fn deadline(&self, id: TimerId) -> Option<f64> {
        self.timers.iter().find(|t| t.id == id).map(|t| t.deadline)
    }

    /// Earliest pending deadline
    pub fn next_deadline(&self) -> Option<f64> {
        self.timers
            .iter()
            .map(|t| t.deadline)
            .min_by(|a, b| a.total_cmp(b))
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    /// Collect every timer due at `now` into `out`, in the order they were armed.
    ///
    /// One-shot timers are removed. An interval that overshot several periods
    /// fires once and is re-armed one period after `now`; missed periods are
    /// not replayed.
    pub fn poll(&mut self, now: f64, out: &mut Vec<(TimerId, T)>) {
        let first = out.len();
        let mut i = 0;
        while i < self.timers.len() {
            let timer = &mut self.timers[i];
            if timer.deadline > now {
                i += 1;
                continue;
            }
            out.push((timer.id, timer.tag));
            if let Some(period) = timer.period {
                timer.deadline = now + period;
                i += 1;
            } else {
                self.timers.swap_remove(i);
            }
        }
        out[first..].sort_by_key(|(id, _)| id.0);
    }
}
