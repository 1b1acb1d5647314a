//! Timer seam shared by the utilities and the contact form.
//!
//! Everything that waits goes through [`Scheduler`] so the same code runs on
//! browser timers in production and on virtual time in tests.

use gloo_timers::callback::Timeout;

pub type Task = Box<dyn FnOnce()>;

pub trait Scheduler: Clone + 'static {
    /// Handle for a scheduled task. Dropping it cancels the task if it has not fired.
    type Pending: 'static;

    fn after(&self, delay_ms: u32, task: Task) -> Self::Pending;
}

/// `setTimeout` backed scheduler.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserScheduler;

impl Scheduler for BrowserScheduler {
    type Pending = Timeout;

    fn after(&self, delay_ms: u32, task: Task) -> Timeout {
        Timeout::new(delay_ms, task)
    }
}
