// Pre-frame task queue (spec.md §4.8 "Pre-frame task queue", §5
// "task queue onto which other threads may enqueue one-shot callbacks").
//
// The teacher crates reach for `Arc<Mutex<...>>`/`Arc<RwLock<...>>` for
// externally-synchronized state shared across threads (e.g.
// `thundr::device::DeviceInternal`); the sender side here follows the same
// pattern instead of pulling in a channel crate, since a single shared
// `Vec` behind a mutex is exactly what "one-shot callbacks funneled back
// onto the main thread" needs.

use std::sync::{Arc, Mutex};

use crate::device::GpuDevice;

type Task = Box<dyn FnOnce(&mut dyn GpuDevice) + Send>;

/// The main-thread side: owns the only draining half of the queue.
pub struct TaskQueue {
    pending: Arc<Mutex<Vec<Task>>>,
}

/// The cross-thread enqueue handle. `Arc<Mutex<_>>` is `Send + Sync`
/// regardless of how many clones are outstanding, so foreign threads can
/// hold one directly rather than needing their own channel endpoint.
#[derive(Clone)]
pub struct TaskSender {
    pending: Arc<Mutex<Vec<Task>>>,
}

impl TaskQueue {
    pub fn new() -> Self {
        Self {
            pending: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn sender(&self) -> TaskSender {
        TaskSender {
            pending: self.pending.clone(),
        }
    }

    /// Queues a task from the main thread itself (e.g. a descriptor-slot
    /// update enqueued by the resource pool this same frame).
    pub fn push(&self, task: impl FnOnce(&mut dyn GpuDevice) + Send + 'static) {
        self.pending.lock().unwrap().push(Box::new(task));
    }

    /// Runs every queued task exactly once, in FIFO enqueue order, then
    /// clears the queue. Called at the start of `begin_frame`, before
    /// rendering.
    pub fn run_pending(&mut self, device: &mut dyn GpuDevice) {
        let tasks = std::mem::take(&mut *self.pending.lock().unwrap());
        for task in tasks {
            task(device);
        }
    }
}

impl Default for TaskQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskSender {
    pub fn push(&self, task: impl FnOnce(&mut dyn GpuDevice) + Send + 'static) {
        self.pending.lock().unwrap().push(Box::new(task));
    }
}
