//! # Tick Schedulers
//!
//! Two [`TickScheduler`] implementations: a queue drained from the host's
//! tick thread (production), and an inline one for tests.

use crossbeam_channel::{unbounded, Receiver, Sender};

use super::traits::TickScheduler;

/// A task waiting for the tick thread.
type Task = Box<dyn FnOnce() + Send>;

/// Queue-backed scheduler for hosts with a synchronous tick thread.
///
/// Any thread may [`schedule`](TickScheduler::schedule); the tick thread
/// calls [`drain`](QueuedScheduler::drain) once per tick and runs whatever
/// accumulated since the last one.
pub struct QueuedScheduler {
    sender: Sender<Task>,
    receiver: Receiver<Task>,
}

impl QueuedScheduler {
    /// Creates an empty queue.
    #[must_use]
    pub fn new() -> Self {
        let (sender, receiver) = unbounded();
        Self { sender, receiver }
    }

    /// Runs every task queued so far on the calling thread.
    ///
    /// Returns the number of tasks run. Call from the tick thread only.
    pub fn drain(&self) -> usize {
        let mut ran = 0;
        while let Ok(task) = self.receiver.try_recv() {
            task();
            ran += 1;
        }
        ran
    }
}

impl Default for QueuedScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl TickScheduler for QueuedScheduler {
    fn schedule(&self, task: Task) {
        // Receiver lives as long as self, so the send cannot fail.
        let _ = self.sender.send(task);
    }
}

/// Runs tasks immediately on the scheduling thread. Test use only.
#[derive(Default)]
pub struct InlineScheduler;

impl InlineScheduler {
    /// Creates the scheduler.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl TickScheduler for InlineScheduler {
    fn schedule(&self, task: Task) {
        task();
    }
}
