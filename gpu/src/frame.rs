// The coordinator itself: frame ring, begin/submit lifecycle (spec.md
// §4.8 "Frame ring", "Frame begin/end").

use ash::vk;

use crate::deletion_queue::{DeletionQueue, Released};
use crate::device::{FrameId, GpuDevice};
use crate::error::GpuError;
use crate::framebuffer::FramebufferSet;
use crate::queries::QuerySet;
use crate::resource_pool::{SamplerPool, TexturePool};
use crate::tasks::TaskQueue;
use crate::trace::TraceSink;
use crate::upload::UploadRing;

/// The largest buffering depth the frame ring supports. `B` itself need
/// not be a power of two (unlike the upload/record rings), but it must
/// be bounded so `Vec`-backed per-slot state stays small.
pub const MAX_BUFFERING: usize = 4;

/// Construction-time parameters, analogous to the teacher's `CreateInfo`
/// (`thundr::CreateInfo`): validated once in [`GpuCoordinator::new`]
/// rather than re-checked on every frame.
pub struct GpuCoordinatorConfig {
    pub buffering_depth: usize,
    pub extent: vk::Extent2D,
    pub color_format: vk::Format,
    pub depth_format: vk::Format,
    pub sample_count: vk::SampleCountFlags,
    pub num_scratch_framebuffers: usize,
    pub max_timestamps: u32,
    pub max_statistics: u32,
}

fn destroy_released(obj: Released, device: &mut dyn GpuDevice) {
    match obj {
        Released::Buffer(b) => device.uninit_buffer(b),
        Released::Image(i) => device.uninit_image(i),
        Released::ImageView(v) => device.uninit_image_view(v),
        Released::Sampler(s) => device.uninit_sampler(s),
    }
}

/// Ties every per-frame ring together: deferred release, the upload
/// ring, the pre-frame task queue, the texture/sampler slot tables, the
/// query set, and the framebuffer set.
pub struct GpuCoordinator {
    buffering_depth: usize,
    frame_id: FrameId,
    deletion_queue: DeletionQueue,
    tasks: TaskQueue,
    upload: UploadRing,
    textures: TexturePool,
    samplers: SamplerPool,
    queries: QuerySet,
    framebuffers: FramebufferSet,
    trace_sink: Box<dyn TraceSink>,
}

impl GpuCoordinator {
    pub fn new(
        config: GpuCoordinatorConfig,
        device: &mut dyn GpuDevice,
        timestamp_pools: Vec<vk::QueryPool>,
        statistics_pools: Vec<vk::QueryPool>,
        trace_sink: Box<dyn TraceSink>,
    ) -> Result<Self, GpuError> {
        if config.buffering_depth == 0 || config.buffering_depth > MAX_BUFFERING {
            return Err(GpuError::BufferOverflow(config.buffering_depth));
        }

        let mut textures = TexturePool::new();
        let tasks = TaskQueue::new();
        let framebuffers = FramebufferSet::new(
            config.extent,
            config.color_format,
            config.depth_format,
            config.sample_count,
            config.num_scratch_framebuffers,
            device,
            &mut textures,
            &tasks,
        )?;

        Ok(Self {
            buffering_depth: config.buffering_depth,
            frame_id: 0,
            deletion_queue: DeletionQueue::new(config.buffering_depth),
            tasks,
            upload: UploadRing::new(config.buffering_depth),
            textures,
            samplers: SamplerPool::new(),
            queries: QuerySet::new(timestamp_pools, statistics_pools, config.max_timestamps, config.max_statistics),
            framebuffers,
            trace_sink,
        })
    }

    pub fn frame_id(&self) -> FrameId {
        self.frame_id
    }

    pub fn ring_index(&self) -> usize {
        (self.frame_id % self.buffering_depth as u64) as usize
    }

    pub fn textures(&mut self) -> &mut TexturePool {
        &mut self.textures
    }

    pub fn samplers(&mut self) -> &mut SamplerPool {
        &mut self.samplers
    }

    pub fn tasks(&self) -> &TaskQueue {
        &self.tasks
    }

    pub fn queries(&mut self) -> &mut QuerySet {
        &mut self.queries
    }

    pub fn upload(&mut self, bytes: &[u8], dst: vk::Buffer, dst_offset: u64) -> u64 {
        self.upload.upload(self.ring_index(), bytes, dst, dst_offset)
    }

    /// Schedules `obj` for destruction no earlier than this frame's ring
    /// slot is next reused, `buffering_depth` frames from now (Property
    /// H).
    pub fn release(&mut self, obj: Released) {
        let ring_index = self.ring_index();
        self.deletion_queue.release(ring_index, obj);
    }

    pub fn resize(&mut self, extent: vk::Extent2D, device: &mut dyn GpuDevice) -> Result<(), GpuError> {
        self.framebuffers.idle_reclaim(extent, device, &mut self.textures, &self.tasks)
    }

    /// Begins a frame: destroys this ring slot's previously-released
    /// objects, runs pending pre-frame tasks, flushes the upload ring,
    /// reads back and emits the previous occupant's queries, and clears
    /// every framebuffer.
    pub fn begin_frame(&mut self, device: &mut dyn GpuDevice) -> Result<(), GpuError> {
        let ring_index = self.ring_index();
        device.begin_frame()?;

        for obj in self.deletion_queue.drain_slot(ring_index) {
            destroy_released(obj, device);
        }

        self.tasks.run_pending(device);
        self.upload.flush(ring_index, device)?;
        self.queries.reset_for_frame(ring_index, device, self.trace_sink.as_mut());
        self.framebuffers.clear_all(device, [0.0, 0.0, 0.0, 0.0]);
        Ok(())
    }

    /// If the swapchain has a current image, blits the resolved main
    /// color image into it with a linear filter, then submits.
    pub fn submit_frame(&mut self, device: &mut dyn GpuDevice, swapchain_image: Option<vk::Image>) {
        if let Some(target) = swapchain_image {
            device.encoder().blit_image(self.framebuffers.main.color_image, target, true);
        }
        device.submit_frame();
        self.frame_id += 1;
    }

    /// Waits for all in-flight work to complete, then destroys every
    /// remaining released object across all ring slots.
    pub fn shutdown(&mut self, device: &mut dyn GpuDevice) {
        device.wait_idle();
        for obj in self.deletion_queue.drain_all() {
            destroy_released(obj, device);
        }
    }
}
