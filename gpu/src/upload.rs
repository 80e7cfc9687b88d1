// Per-frame staging-buffer upload ring (spec.md §4.8 "Upload ring").

use ash::vk;

use crate::device::{BufferUsage, GpuDevice};
use crate::error::GpuError;

/// A single queued upload: `bytes` will land at `offset` in this ring
/// slot's CPU staging vector, then get copied into `dst` at `dst_offset`
/// once the frame's GPU buffer is flushed.
struct PendingCopy {
    offset: u64,
    size: u64,
    dst: vk::Buffer,
    dst_offset: u64,
}

struct RingSlot {
    cpu: Vec<u8>,
    gpu_buffer: Option<vk::Buffer>,
    gpu_capacity: u64,
    copies: Vec<PendingCopy>,
}

impl RingSlot {
    fn new() -> Self {
        Self {
            cpu: Vec::new(),
            gpu_buffer: None,
            gpu_capacity: 0,
            copies: Vec::new(),
        }
    }
}

/// One staging vector + matching GPU buffer per ring slot. Uploads
/// accumulate on the CPU side during a frame; `flush` grows the GPU
/// buffer to fit, copies the bytes in, and records the queued copies
/// against this frame's command encoder.
pub struct UploadRing {
    slots: Vec<RingSlot>,
}

impl UploadRing {
    pub fn new(buffering_depth: usize) -> Self {
        Self {
            slots: (0..buffering_depth).map(|_| RingSlot::new()).collect(),
        }
    }

    /// Queues `bytes` to be copied into `dst` at `dst_offset` once this
    /// ring slot is next flushed. Returns the offset the bytes landed at
    /// in the CPU staging vector (rarely needed by callers).
    pub fn upload(&mut self, ring_index: usize, bytes: &[u8], dst: vk::Buffer, dst_offset: u64) -> u64 {
        let slot = &mut self.slots[ring_index];
        let offset = slot.cpu.len() as u64;
        slot.cpu.extend_from_slice(bytes);
        slot.copies.push(PendingCopy {
            offset,
            size: bytes.len() as u64,
            dst,
            dst_offset,
        });
        offset
    }

    /// Grows or shrinks the GPU buffer to hold this frame's uploads
    /// (geometric growth, shrink only when strictly smaller), copies the
    /// CPU bytes in, records the queued copies against `device`'s
    /// current command encoder, then resets the CPU buffer for next
    /// frame.
    pub fn flush(&mut self, ring_index: usize, device: &mut dyn GpuDevice) -> Result<(), GpuError> {
        let slot = &mut self.slots[ring_index];
        let needed = slot.cpu.len() as u64;

        if needed > slot.gpu_capacity || (needed > 0 && needed * 4 < slot.gpu_capacity) {
            if let Some(old) = slot.gpu_buffer.take() {
                device.uninit_buffer(old);
            }
            let new_capacity = needed.max(1).next_power_of_two();
            slot.gpu_buffer = Some(device.create_buffer(new_capacity, BufferUsage::TRANSFER_DST | BufferUsage::TRANSFER_SRC)?);
            slot.gpu_capacity = new_capacity;
        }

        let gpu_buffer = match slot.gpu_buffer {
            Some(b) => b,
            None => return Ok(()),
        };

        if needed > 0 {
            let ptr = device.map_buffer_memory(gpu_buffer);
            // SAFETY: `ptr` is valid for `gpu_capacity >= needed` bytes,
            // guaranteed by the growth check above.
            unsafe {
                std::ptr::copy_nonoverlapping(slot.cpu.as_ptr(), ptr, slot.cpu.len());
            }
            device.flush_buffer_memory(gpu_buffer, 0, needed);
            device.unmap_buffer_memory(gpu_buffer);
        }

        for copy in slot.copies.drain(..) {
            device
                .encoder()
                .copy_buffer(gpu_buffer, copy.offset, copy.dst, copy.dst_offset, copy.size);
        }
        slot.cpu.clear();
        Ok(())
    }
}
