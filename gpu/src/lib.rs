//! Per-frame ring-buffered GPU resource management: deferred release,
//! staging-buffer uploads, pre-frame tasks, bindless texture/sampler
//! slot tables, timestamp/statistics queries, and main/scratch
//! framebuffers. Vulkan instance/device bring-up and swapchain
//! acquisition are out of scope; [`device::GpuDevice`] is the seam a
//! caller implements against real `ash` handles.

pub mod deletion_queue;
pub mod device;
pub mod error;
pub mod frame;
pub mod framebuffer;
pub mod queries;
pub mod resource_pool;
pub mod tasks;
pub mod trace;
pub mod upload;

#[cfg(test)]
mod tests;

pub use deletion_queue::{DeletionQueue, Released};
pub use device::{
    BufferUsage, CommandEncoder, DescriptorBinding, DescriptorKind, FrameContext, FrameId, GpuDevice, ImageDesc,
    ImageUsage, SamplerDesc,
};
pub use error::GpuError;
pub use frame::{GpuCoordinator, GpuCoordinatorConfig, MAX_BUFFERING};
pub use framebuffer::{Framebuffer, FramebufferSet};
pub use queries::{QuerySet, SpanId, StatId};
pub use resource_pool::{DefaultTexture, SamplerId, SamplerPool, TextureId, TexturePool, NUM_SAMPLER_SLOTS, NUM_TEXTURE_SLOTS};
pub use tasks::{TaskQueue, TaskSender};
pub use trace::{LoggingTraceSink, TraceRecord, TraceSink};
pub use upload::UploadRing;
