use ash::vk;
use ash::vk::Handle;

use crate::deletion_queue::{DeletionQueue, Released};
use crate::device::{
    BufferUsage, CommandEncoder, DescriptorBinding, FrameContext, GpuDevice, ImageDesc, SamplerDesc,
};
use crate::error::GpuError;
use crate::frame::{GpuCoordinator, GpuCoordinatorConfig};
use crate::trace::LoggingTraceSink;

struct NullEncoder;

impl CommandEncoder for NullEncoder {
    fn clear_color_image(&mut self, _image: vk::Image, _color: [f32; 4]) {}
    fn clear_depth_stencil_image(&mut self, _image: vk::Image, _depth: f32, _stencil: u32) {}
    fn blit_image(&mut self, _src: vk::Image, _dst: vk::Image, _linear_filter: bool) {}
    fn copy_buffer(&mut self, _src: vk::Buffer, _src_offset: u64, _dst: vk::Buffer, _dst_offset: u64, _size: u64) {}
    fn write_timestamp(&mut self, _pool: vk::QueryPool, _query: u32) {}
    fn reset_timestamp_query(&mut self, _pool: vk::QueryPool, _first: u32, _count: u32) {}
    fn begin_statistics(&mut self, _pool: vk::QueryPool, _query: u32) {}
    fn end_statistics(&mut self, _pool: vk::QueryPool, _query: u32) {}
}

/// A `GpuDevice` that never touches real Vulkan: it hands out
/// monotonically increasing fake handles and records when each one is
/// destroyed, tagged with how many `begin_frame` calls have happened so
/// far. Exists purely to exercise the coordinator's bookkeeping.
struct MockDevice {
    next_handle: u64,
    begin_frame_count: u32,
    destroyed_buffers: Vec<(u64, u32)>,
    encoder: NullEncoder,
}

impl MockDevice {
    fn new() -> Self {
        Self {
            next_handle: 1,
            begin_frame_count: 0,
            destroyed_buffers: Vec::new(),
            encoder: NullEncoder,
        }
    }

    fn fresh_handle(&mut self) -> u64 {
        let h = self.next_handle;
        self.next_handle += 1;
        h
    }
}

impl GpuDevice for MockDevice {
    fn create_buffer(&mut self, _size: u64, _usage: BufferUsage) -> Result<vk::Buffer, GpuError> {
        Ok(vk::Buffer::from_raw(self.fresh_handle()))
    }

    fn uninit_buffer(&mut self, buffer: vk::Buffer) {
        self.destroyed_buffers.push((buffer.as_raw(), self.begin_frame_count));
    }

    fn create_image(&mut self, _desc: ImageDesc) -> Result<vk::Image, GpuError> {
        Ok(vk::Image::from_raw(self.fresh_handle()))
    }

    fn uninit_image(&mut self, _image: vk::Image) {}

    fn create_image_view(
        &mut self,
        _image: vk::Image,
        _swizzle: vk::ComponentMapping,
        _aspect: vk::ImageAspectFlags,
    ) -> Result<vk::ImageView, GpuError> {
        Ok(vk::ImageView::from_raw(self.fresh_handle()))
    }

    fn uninit_image_view(&mut self, _view: vk::ImageView) {}

    fn create_sampler(&mut self, _desc: SamplerDesc) -> Result<vk::Sampler, GpuError> {
        Ok(vk::Sampler::from_raw(self.fresh_handle()))
    }

    fn uninit_sampler(&mut self, _sampler: vk::Sampler) {}

    fn update_descriptor_set(&mut self, _binding: DescriptorBinding) {}
    fn unbind_descriptor_set(&mut self, _kind: crate::device::DescriptorKind, _slot: u16) {}

    fn get_frame_context(&mut self) -> FrameContext {
        FrameContext {
            ring_index: 0,
            current: 0,
            tail: 0,
        }
    }

    fn begin_frame(&mut self) -> Result<(), GpuError> {
        self.begin_frame_count += 1;
        Ok(())
    }

    fn submit_frame(&mut self) {}
    fn wait_idle(&mut self) {}

    fn map_buffer_memory(&mut self, _buffer: vk::Buffer) -> *mut u8 {
        std::ptr::null_mut()
    }
    fn unmap_buffer_memory(&mut self, _buffer: vk::Buffer) {}
    fn flush_buffer_memory(&mut self, _buffer: vk::Buffer, _offset: u64, _size: u64) {}

    fn encoder(&mut self) -> &mut dyn CommandEncoder {
        &mut self.encoder
    }
}

fn test_config(buffering_depth: usize) -> GpuCoordinatorConfig {
    GpuCoordinatorConfig {
        buffering_depth,
        extent: vk::Extent2D { width: 64, height: 64 },
        color_format: vk::Format::R8G8B8A8_UNORM,
        depth_format: vk::Format::D24_UNORM_S8_UINT,
        sample_count: vk::SampleCountFlags::TYPE_1,
        num_scratch_framebuffers: 0,
        max_timestamps: 16,
        max_statistics: 4,
    }
}

#[test]
fn deferred_release_waits_for_the_ring_slot_to_cycle() {
    let mut device = MockDevice::new();
    let mut coordinator = GpuCoordinator::new(
        test_config(2),
        &mut device,
        vec![vk::QueryPool::from_raw(1), vk::QueryPool::from_raw(2)],
        vec![vk::QueryPool::from_raw(3), vk::QueryPool::from_raw(4)],
        Box::new(LoggingTraceSink),
    )
    .unwrap();

    let buffer = device.create_buffer(16, BufferUsage::TRANSFER_DST).unwrap();

    // Frame 0: release a buffer into ring slot 0.
    coordinator.begin_frame(&mut device).unwrap();
    coordinator.release(Released::Buffer(buffer));
    coordinator.submit_frame(&mut device, None);

    // Frame 1: ring slot 1 is reused; the frame-0 release is untouched.
    coordinator.begin_frame(&mut device).unwrap();
    coordinator.submit_frame(&mut device, None);
    assert!(device.destroyed_buffers.iter().all(|(h, _)| *h != buffer.as_raw()));

    // Frame 2 (f + B, B=2): ring slot 0 cycles back around and the
    // buffer must be destroyed right here.
    coordinator.begin_frame(&mut device).unwrap();
    assert!(device.destroyed_buffers.iter().any(|(h, _)| *h == buffer.as_raw()));
    coordinator.submit_frame(&mut device, None);
}

#[test]
fn deletion_queue_drains_only_the_requested_slot() {
    let mut queue = DeletionQueue::new(2);
    queue.release(0, Released::Buffer(vk::Buffer::from_raw(1)));
    queue.release(1, Released::Buffer(vk::Buffer::from_raw(2)));

    let drained = queue.drain_slot(0);
    assert_eq!(drained.len(), 1);
    assert!(queue.drain_slot(1).len() == 1);
    // Slot 0 was already drained; draining it again yields nothing.
    assert!(queue.drain_slot(0).is_empty());
}

#[test]
fn buffering_depth_out_of_range_is_rejected_at_construction() {
    let mut device = MockDevice::new();
    let result = GpuCoordinator::new(
        test_config(0),
        &mut device,
        Vec::new(),
        Vec::new(),
        Box::new(LoggingTraceSink),
    );
    assert!(matches!(result, Err(GpuError::BufferOverflow(0))));
}

#[test]
fn texture_pool_reserves_default_texture_slots() {
    use crate::resource_pool::{DefaultTexture, TexturePool};

    let mut pool = TexturePool::new();
    let tasks = crate::tasks::TaskQueue::new();
    // Every low index is already reserved for a default texture, so the
    // first user allocation must land just past them.
    let id = pool
        .alloc_texture_id(vk::ImageView::from_raw(99), &tasks)
        .unwrap();
    assert_eq!(id.0 as usize, DefaultTexture::ALL.len());
}

#[test]
fn sampler_pool_deduplicates_identical_descriptors() {
    use crate::resource_pool::SamplerPool;

    let mut pool = SamplerPool::new();
    let tasks = crate::tasks::TaskQueue::new();
    let desc = SamplerDesc {
        mag_filter: vk::Filter::LINEAR,
        min_filter: vk::Filter::LINEAR,
        address_mode: vk::SamplerAddressMode::CLAMP_TO_EDGE,
    };
    let sampler = vk::Sampler::from_raw(7);

    let (first, _) = pool.alloc_sampler_id(desc, sampler, &tasks).unwrap();
    let (second, _) = pool.alloc_sampler_id(desc, sampler, &tasks).unwrap();
    assert_eq!(first, second);
}
