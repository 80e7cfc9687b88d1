use thiserror::Error;

/// Fatal failures from the resource coordinator (spec.md §7). Every
/// variant here is unrecoverable at this layer: callers are expected to
/// log and abort rather than retry, matching `thundr::ThundrError`'s
/// usage in `device.rs`.
#[derive(Debug, Error)]
pub enum GpuError {
    #[error("failed to allocate GPU resource: {0}")]
    ResourceAllocationFailed(String),

    #[error("{kind} slot table is full ({capacity} slots in use)")]
    SlotExhausted { kind: &'static str, capacity: usize },

    #[error("ring buffer capacity must be a strictly positive power of two, got {0}")]
    BufferOverflow(usize),
}
