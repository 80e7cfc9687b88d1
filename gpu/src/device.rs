// The out-of-scope Vulkan device collaborator (spec.md §6 "GPU device
// collaborator"). Instance/physical-device selection and swapchain
// acquisition happen entirely on the caller's side, the same split
// `thundr::Device` draws between device *selection* and device *usage*
// (see `thundr/src/instance.rs` vs. `thundr/src/device.rs`).

use ash::vk;

use crate::error::GpuError;

/// Monotonic frame counter. `ring_index = frame_id % buffering_depth`
/// (spec.md §4.8 "Frame ring").
pub type FrameId = u64;

bitflags::bitflags! {
    #[derive(Default)]
    pub struct BufferUsage: u32 {
        const TRANSFER_SRC = 1 << 0;
        const TRANSFER_DST = 1 << 1;
        const UNIFORM      = 1 << 2;
        const STORAGE      = 1 << 3;
        const VERTEX       = 1 << 4;
        const INDEX        = 1 << 5;
    }
}

bitflags::bitflags! {
    #[derive(Default)]
    pub struct ImageUsage: u32 {
        const SAMPLED          = 1 << 0;
        const COLOR_ATTACHMENT = 1 << 1;
        const DEPTH_STENCIL    = 1 << 2;
        const TRANSFER_DST     = 1 << 3;
    }
}

/// A single image creation request: extent, format, usage, and sample
/// count (>1 selects the MSAA path described in §4.8 "Framebuffer set").
#[derive(Debug, Copy, Clone)]
pub struct ImageDesc {
    pub extent: vk::Extent2D,
    pub format: vk::Format,
    pub usage: ImageUsage,
    pub samples: vk::SampleCountFlags,
}

#[derive(Debug, Copy, Clone)]
pub struct SamplerDesc {
    pub mag_filter: vk::Filter,
    pub min_filter: vk::Filter,
    pub address_mode: vk::SamplerAddressMode,
}

impl PartialEq for SamplerDesc {
    fn eq(&self, other: &Self) -> bool {
        self.mag_filter == other.mag_filter
            && self.min_filter == other.min_filter
            && self.address_mode == other.address_mode
    }
}
impl Eq for SamplerDesc {}

impl std::hash::Hash for SamplerDesc {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.mag_filter.as_raw().hash(state);
        self.min_filter.as_raw().hash(state);
        self.address_mode.as_raw().hash(state);
    }
}

/// Which bindless descriptor array a slot belongs to (spec.md §4.8
/// "Texture slot table" / "Sampler slot table").
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum DescriptorKind {
    Texture,
    Sampler,
}

/// A pending bind recorded by the slot tables and applied by a pre-frame
/// task (spec.md §5 "Descriptor sets... mutated only via pre-frame
/// tasks executed before encoding").
#[derive(Debug, Copy, Clone)]
pub struct DescriptorBinding {
    pub kind: DescriptorKind,
    pub slot: u16,
    pub view: Option<vk::ImageView>,
    pub sampler: Option<vk::Sampler>,
}

/// What `get_frame_context` reports: which ring slot this frame is using,
/// and the frame ids that bound its lifetime.
#[derive(Debug, Copy, Clone)]
pub struct FrameContext {
    pub ring_index: usize,
    pub current: FrameId,
    pub tail: FrameId,
}

/// Records GPU commands against a single frame's command buffer. One
/// instance backs one ring slot; the coordinator never holds onto it
/// past `submit_frame` (spec.md §4.8 "Frame begin/end").
pub trait CommandEncoder {
    fn clear_color_image(&mut self, image: vk::Image, color: [f32; 4]);
    fn clear_depth_stencil_image(&mut self, image: vk::Image, depth: f32, stencil: u32);
    fn blit_image(&mut self, src: vk::Image, dst: vk::Image, linear_filter: bool);
    fn copy_buffer(&mut self, src: vk::Buffer, src_offset: u64, dst: vk::Buffer, dst_offset: u64, size: u64);
    fn write_timestamp(&mut self, pool: vk::QueryPool, query: u32);
    fn reset_timestamp_query(&mut self, pool: vk::QueryPool, first: u32, count: u32);
    fn begin_statistics(&mut self, pool: vk::QueryPool, query: u32);
    fn end_statistics(&mut self, pool: vk::QueryPool, query: u32);
}

/// The out-of-scope Vulkan device. Every method here is a thin remote
/// call into bring-up code the coordinator never implements; the real
/// `ash::vk` handle types keep this crate dependent on the actual GPU
/// stack instead of inventing placeholder handle newtypes.
pub trait GpuDevice {
    fn create_buffer(&mut self, size: u64, usage: BufferUsage) -> Result<vk::Buffer, GpuError>;
    fn uninit_buffer(&mut self, buffer: vk::Buffer);

    fn create_image(&mut self, desc: ImageDesc) -> Result<vk::Image, GpuError>;
    fn uninit_image(&mut self, image: vk::Image);

    fn create_image_view(
        &mut self,
        image: vk::Image,
        swizzle: vk::ComponentMapping,
        aspect: vk::ImageAspectFlags,
    ) -> Result<vk::ImageView, GpuError>;
    fn uninit_image_view(&mut self, view: vk::ImageView);

    fn create_sampler(&mut self, desc: SamplerDesc) -> Result<vk::Sampler, GpuError>;
    fn uninit_sampler(&mut self, sampler: vk::Sampler);

    fn update_descriptor_set(&mut self, binding: DescriptorBinding);
    fn unbind_descriptor_set(&mut self, kind: DescriptorKind, slot: u16);

    fn get_frame_context(&mut self) -> FrameContext;
    fn begin_frame(&mut self) -> Result<(), GpuError>;
    fn submit_frame(&mut self);
    fn wait_idle(&mut self);

    fn map_buffer_memory(&mut self, buffer: vk::Buffer) -> *mut u8;
    fn unmap_buffer_memory(&mut self, buffer: vk::Buffer);
    fn flush_buffer_memory(&mut self, buffer: vk::Buffer, offset: u64, size: u64);

    fn encoder(&mut self) -> &mut dyn CommandEncoder;
}
