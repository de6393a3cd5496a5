//! Deferred task queue.
//!
//! Work that must not run inside the callback that triggered it (for example
//! destroying an editor from within its own focus-loss notification) is
//! posted here and drained once per event-loop tick, after the current
//! callback has returned.
//!
//! Tasks are plain data rather than closures so the owner can apply them to
//! its own state with full `&mut` access. Owners are expected to re-check
//! that whatever a task refers to is still alive before acting on it.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::logging::targets;

/// A unique identifier for a deferred task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId(u64);

impl TaskId {
    /// Get the raw u64 value of this task ID.
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

/// Global counter for generating unique task IDs.
static NEXT_TASK_ID: AtomicU64 = AtomicU64::new(1);

fn next_task_id() -> TaskId {
    TaskId(NEXT_TASK_ID.fetch_add(1, Ordering::Relaxed))
}

#[derive(Debug)]
struct TaskData<T> {
    id: TaskId,
    task: T,
}

/// FIFO queue of deferred tasks of type `T`.
#[derive(Debug)]
pub struct TaskQueue<T> {
    tasks: VecDeque<TaskData<T>>,
}

impl<T> TaskQueue<T> {
    /// Create a new, empty task queue.
    pub fn new() -> Self {
        Self {
            tasks: VecDeque::new(),
        }
    }

    /// Post a task to run on the next drain.
    ///
    /// Returns the task ID that can be used to cancel the task.
    pub fn post(&mut self, task: T) -> TaskId {
        let id = next_task_id();
        tracing::trace!(target: targets::TASK, task_id = id.as_u64(), "task posted");
        self.tasks.push_back(TaskData { id, task });
        id
    }

    /// Post a task unless an equal one is already pending.
    ///
    /// Returns the ID of the new task, or `None` if it was coalesced.
    pub fn post_unique(&mut self, task: T) -> Option<TaskId>
    where
        T: PartialEq,
    {
        if self.tasks.iter().any(|t| t.task == task) {
            return None;
        }
        Some(self.post(task))
    }

    /// Cancel a pending task.
    ///
    /// Returns `true` if the task was found and cancelled.
    pub fn cancel(&mut self, id: TaskId) -> bool {
        if let Some(pos) = self.tasks.iter().position(|t| t.id == id) {
            self.tasks.remove(pos);
            true
        } else {
            false
        }
    }

    /// Drop every pending task matching `pred`.
    ///
    /// Returns the number of tasks removed.
    pub fn cancel_where(&mut self, mut pred: impl FnMut(&T) -> bool) -> usize {
        let before = self.tasks.len();
        self.tasks.retain(|t| !pred(&t.task));
        before - self.tasks.len()
    }

    /// Check if there are any pending tasks.
    pub fn has_pending(&self) -> bool {
        !self.tasks.is_empty()
    }

    /// Get the number of pending tasks.
    pub fn pending_count(&self) -> usize {
        self.tasks.len()
    }

    /// Take every task that is pending right now, in posting order.
    ///
    /// Tasks posted while the returned batch is being processed land in the
    /// queue and wait for the next drain.
    pub fn drain(&mut self) -> Vec<T> {
        let batch: Vec<T> = self.tasks.drain(..).map(|t| t.task).collect();
        if !batch.is_empty() {
            tracing::trace!(target: targets::TASK, count = batch.len(), "draining tasks");
        }
        batch
    }
}

impl<T> Default for TaskQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_post_and_drain_in_order() {
        let mut queue = TaskQueue::new();
        queue.post(1);
        queue.post(2);
        queue.post(3);
        assert_eq!(queue.pending_count(), 3);
        assert_eq!(queue.drain(), vec![1, 2, 3]);
        assert!(!queue.has_pending());
    }

    #[test]
    fn test_cancel() {
        let mut queue = TaskQueue::new();
        let a = queue.post("a");
        queue.post("b");
        assert!(queue.cancel(a));
        assert!(!queue.cancel(a));
        assert_eq!(queue.drain(), vec!["b"]);
    }

    #[test]
    fn test_post_unique_coalesces() {
        let mut queue = TaskQueue::new();
        assert!(queue.post_unique(7).is_some());
        assert!(queue.post_unique(7).is_none());
        assert!(queue.post_unique(8).is_some());
        assert_eq!(queue.pending_count(), 2);
    }

    #[test]
    fn test_cancel_where() {
        let mut queue = TaskQueue::new();
        for n in 0..6 {
            queue.post(n);
        }
        assert_eq!(queue.cancel_where(|n| n % 2 == 0), 3);
        assert_eq!(queue.drain(), vec![1, 3, 5]);
    }

    #[test]
    fn test_task_ids_are_unique() {
        let mut queue = TaskQueue::new();
        let a = queue.post(());
        let b = queue.post(());
        assert_ne!(a, b);
        assert!(b.as_u64() > a.as_u64());
    }
}
