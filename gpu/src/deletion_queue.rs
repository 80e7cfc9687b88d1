// Ring-slot deferred release (spec.md §4.8 "Deferred release", Property H).
//
// Unlike the teacher's `DeletionQueue` (`thundr/src/deletion_queue.rs`),
// which schedules drops against a monotonically increasing timeline point,
// this coordinator's ring only ever has `B` live buckets: an object
// released during frame `f` sits in `released_objects[f % B]` until that
// same bucket is reused at `begin_frame(f + B)`.

use ash::vk;

/// A GPU handle awaiting destruction. `GpuDevice` only exposes typed
/// `uninit_*` calls, so the release queue must remember which one to
/// invoke for each handle.
#[derive(Debug, Copy, Clone)]
pub enum Released {
    Buffer(vk::Buffer),
    Image(vk::Image),
    ImageView(vk::ImageView),
    Sampler(vk::Sampler),
}

/// `B` FIFO queues, one per ring slot (spec.md §5 "Deferred-release queue
/// is FIFO per ring slot").
pub struct DeletionQueue {
    slots: Vec<Vec<Released>>,
}

impl DeletionQueue {
    pub fn new(buffering_depth: usize) -> Self {
        Self {
            slots: (0..buffering_depth).map(|_| Vec::new()).collect(),
        }
    }

    /// Appends `obj` to the given ring slot's release queue.
    pub fn release(&mut self, ring_index: usize, obj: Released) {
        self.slots[ring_index].push(obj);
    }

    /// Removes and returns everything queued for `ring_index`, for the
    /// caller to actually destroy. Called at the start of `begin_frame`
    /// for the slot about to be reused.
    pub fn drain_slot(&mut self, ring_index: usize) -> Vec<Released> {
        std::mem::take(&mut self.slots[ring_index])
    }

    /// Drains every slot, in slot order, for use at shutdown after
    /// `wait_idle` (spec.md §4.8 "At shutdown, wait idle, then destroy
    /// all slots").
    pub fn drain_all(&mut self) -> Vec<Released> {
        self.slots.iter_mut().flat_map(std::mem::take).collect()
    }
}
