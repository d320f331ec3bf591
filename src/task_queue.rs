//! Host task queue abstraction.
//!
//! Everything in this crate runs on the UI thread. Work that must not happen
//! inside the current call stack, such as dropping a menu whose own callback
//! is still on the stack, is posted here and runs on the next queue turn.

use std::cell::RefCell;
use std::collections::VecDeque;

pub type Task = Box<dyn FnOnce()>;

pub trait TaskRunner {
    /// Queues `task` to run after the current call stack unwinds. Must never
    /// run it inline.
    fn post_task(&self, task: Task);
}

impl dyn TaskRunner {
    /// Drops `value` on a later turn of the queue.
    pub fn delete_soon<T: 'static>(&self, value: T) {
        self.post_task(Box::new(move || drop(value)));
    }
}

/// In-process FIFO queue drained explicitly by the host.
#[derive(Default)]
pub struct LocalTaskQueue {
    tasks: RefCell<VecDeque<Task>>,
}

impl LocalTaskQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending(&self) -> usize {
        self.tasks.borrow().len()
    }

    /// Runs queued tasks, including ones posted while draining, until the
    /// queue is empty. Returns how many ran.
    pub fn run_until_idle(&self) -> usize {
        let mut ran = 0;
        loop {
            // The borrow must end before the task runs so it can post more.
            let next = self.tasks.borrow_mut().pop_front();
            let Some(task) = next else {
                break;
            };
            task();
            ran += 1;
        }
        if ran > 0 {
            tracing::trace!(ran, "task queue drained");
        }
        ran
    }
}

impl TaskRunner for LocalTaskQueue {
    fn post_task(&self, task: Task) {
        self.tasks.borrow_mut().push_back(task);
    }
}

impl std::fmt::Debug for LocalTaskQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalTaskQueue")
            .field("pending", &self.pending())
            .finish()
    }
}
