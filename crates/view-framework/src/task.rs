//! # Task Slot
//!
//! Tracks the one in-flight asynchronous continuation a component owns (a
//! fetch and whatever renders its result). Without it a late response could
//! render into a view that was already replaced.
//!
//! - [`TaskSlot::spawn`] aborts the previous task first (cancel on re-trigger).
//! - [`TaskSlot::spawn_if_idle`] refuses while a task is still running
//!   (for operations that must not overlap, like paginated fetches).
//! - [`TaskSlot::cancel`] is what components call from `teardown`.
//! - [`TaskSlot::settled`] waits without taking the task out of the slot, so
//!   the two rules above keep holding while someone waits.
//!
//! Tasks are spawned with [`tokio::task::spawn_local`], so every method that
//! spawns must run inside a [`tokio::task::LocalSet`].

use std::cell::RefCell;
use std::future::Future;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::debug;

#[derive(Default)]
pub struct TaskSlot {
    current: RefCell<Option<Running>>,
}

struct Running {
    handle: JoinHandle<()>,
    /// Flips to `true` once the task's future is gone, finished or aborted.
    done: watch::Receiver<bool>,
}

/// Moved into the spawned future; dropping it marks the task done.
struct DoneGuard(watch::Sender<bool>);

impl Drop for DoneGuard {
    fn drop(&mut self) {
        self.0.send_replace(true);
    }
}

impl TaskSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawns `task`, aborting the task currently held by the slot.
    pub fn spawn<F>(&self, task: F)
    where
        F: Future<Output = ()> + 'static,
    {
        let previous = self.current.replace(Some(Self::start(task)));
        if let Some(previous) = previous {
            if !previous.handle.is_finished() {
                debug!("Aborting superseded task");
                previous.handle.abort();
            }
        }
    }

    /// Spawns `task` only if no task is running. Returns whether it was spawned.
    pub fn spawn_if_idle<F>(&self, task: F) -> bool
    where
        F: Future<Output = ()> + 'static,
    {
        if self.is_running() {
            debug!("Task already in flight, ignoring trigger");
            return false;
        }
        self.current.replace(Some(Self::start(task)));
        true
    }

    pub fn is_running(&self) -> bool {
        self.current
            .borrow()
            .as_ref()
            .is_some_and(|running| !running.handle.is_finished() && !*running.done.borrow())
    }

    /// Aborts the running task, if any.
    pub fn cancel(&self) {
        let running = self.current.take();
        if let Some(running) = running {
            if !running.handle.is_finished() {
                debug!("Cancelling in-flight task");
            }
            running.handle.abort();
        }
    }

    /// Waits until the slot holds no running task.
    ///
    /// A task spawned into the slot while waiting is waited for as well.
    /// Cancelled tasks count as settled.
    pub async fn settled(&self) {
        loop {
            let waiting = self
                .current
                .borrow()
                .as_ref()
                .map(|running| running.done.clone());
            let Some(mut done) = waiting else {
                return;
            };
            if *done.borrow_and_update() {
                return;
            }
            // The guard sends before its sender drops, so an error also means done
            let _ = done.wait_for(|finished| *finished).await;
        }
    }

    fn start<F>(task: F) -> Running
    where
        F: Future<Output = ()> + 'static,
    {
        let (tx, done) = watch::channel(false);
        let guard = DoneGuard(tx);
        let handle = tokio::task::spawn_local(async move {
            let _guard = guard;
            task.await;
        });
        Running { handle, done }
    }
}

impl Drop for TaskSlot {
    fn drop(&mut self) {
        if let Some(running) = self.current.get_mut().take() {
            running.handle.abort();
        }
    }
}
