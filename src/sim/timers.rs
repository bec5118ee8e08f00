//! Cooperative timer queue
//!
//! Deferred work items driven by the frame clock. Tasks carry plain-data
//! actions holding only the ids they target - no closures over world state -
//! so teardown can cancel everything without dangling callbacks.

use serde::{Deserialize, Serialize};

/// Opaque handle for a scheduled task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimerHandle(u32);

/// What a timer does when it fires
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimerAction {
    /// Crumbling platform's warning expired - drop it
    Collapse(u32),
    /// Collapsed platform's regeneration delay expired - restore it
    Regenerate(u32),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Task {
    handle: TimerHandle,
    fires_at: f64,
    action: TimerAction,
}

/// Single-shot task queue advanced by the simulation clock
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TimerQueue {
    next_handle: u32,
    tasks: Vec<Task>,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule an action to fire at the given simulation time (seconds)
    pub fn schedule(&mut self, fires_at: f64, action: TimerAction) -> TimerHandle {
        let handle = TimerHandle(self.next_handle);
        self.next_handle = self.next_handle.wrapping_add(1);
        self.tasks.push(Task {
            handle,
            fires_at,
            action,
        });
        handle
    }

    /// Cancel a single task. Returns false if it already fired or was cancelled.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.handle != handle);
        self.tasks.len() != before
    }

    /// Cancel every outstanding task (scene teardown)
    pub fn cancel_all(&mut self) {
        self.tasks.clear();
    }

    /// Number of tasks still pending
    pub fn outstanding(&self) -> usize {
        self.tasks.len()
    }

    /// Remove and return all tasks due at `now`, in firing order
    pub fn advance(&mut self, now: f64) -> Vec<TimerAction> {
        let mut due: Vec<Task> = Vec::new();
        self.tasks.retain(|t| {
            if t.fires_at <= now {
                due.push(t.clone());
                false
            } else {
                true
            }
        });
        due.sort_by(|a, b| a.fires_at.total_cmp(&b.fires_at));
        due.into_iter().map(|t| t.action).collect()
    }
}
