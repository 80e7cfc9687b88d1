// Main + scratch framebuffers (spec.md §4.8 "Framebuffer set").

use ash::vk;

use crate::device::{GpuDevice, ImageDesc, ImageUsage};
use crate::error::GpuError;
use crate::resource_pool::{TextureId, TexturePool};
use crate::tasks::TaskQueue;

/// One renderable target: a resolved color image (plus an optional MSAA
/// color image when `sample_count > 1`), and a depth+stencil image with
/// separate depth/stencil views, every sampled image exposed through the
/// bindless texture table.
pub struct Framebuffer {
    pub extent: vk::Extent2D,
    pub color_image: vk::Image,
    pub color_view: vk::ImageView,
    pub color_texture: TextureId,
    pub msaa_image: Option<vk::Image>,
    pub msaa_view: Option<vk::ImageView>,
    pub depth_stencil_image: vk::Image,
    pub depth_view: vk::ImageView,
    pub depth_texture: TextureId,
    pub stencil_view: vk::ImageView,
    pub stencil_texture: TextureId,
}

impl Framebuffer {
    fn new(
        extent: vk::Extent2D,
        color_format: vk::Format,
        depth_format: vk::Format,
        sample_count: vk::SampleCountFlags,
        device: &mut dyn GpuDevice,
        textures: &mut TexturePool,
        tasks: &TaskQueue,
    ) -> Result<Self, GpuError> {
        let color_image = device.create_image(ImageDesc {
            extent,
            format: color_format,
            usage: ImageUsage::COLOR_ATTACHMENT | ImageUsage::SAMPLED,
            samples: vk::SampleCountFlags::TYPE_1,
        })?;
        let color_view = device.create_image_view(
            color_image,
            vk::ComponentMapping::default(),
            vk::ImageAspectFlags::COLOR,
        )?;
        let color_texture = textures.alloc_texture_id(color_view, tasks)?;

        let (msaa_image, msaa_view) = if sample_count != vk::SampleCountFlags::TYPE_1 {
            let image = device.create_image(ImageDesc {
                extent,
                format: color_format,
                usage: ImageUsage::COLOR_ATTACHMENT,
                samples: sample_count,
            })?;
            let view = device.create_image_view(image, vk::ComponentMapping::default(), vk::ImageAspectFlags::COLOR)?;
            (Some(image), Some(view))
        } else {
            (None, None)
        };

        let depth_stencil_image = device.create_image(ImageDesc {
            extent,
            format: depth_format,
            usage: ImageUsage::DEPTH_STENCIL | ImageUsage::SAMPLED,
            samples: vk::SampleCountFlags::TYPE_1,
        })?;
        let depth_view = device.create_image_view(
            depth_stencil_image,
            vk::ComponentMapping::default(),
            vk::ImageAspectFlags::DEPTH,
        )?;
        let stencil_view = device.create_image_view(
            depth_stencil_image,
            vk::ComponentMapping::default(),
            vk::ImageAspectFlags::STENCIL,
        )?;
        let depth_texture = textures.alloc_texture_id(depth_view, tasks)?;
        let stencil_texture = textures.alloc_texture_id(stencil_view, tasks)?;

        Ok(Self {
            extent,
            color_image,
            color_view,
            color_texture,
            msaa_image,
            msaa_view,
            depth_stencil_image,
            depth_view,
            depth_texture,
            stencil_view,
            stencil_texture,
        })
    }

    fn destroy(self, device: &mut dyn GpuDevice, textures: &mut TexturePool, tasks: &TaskQueue) {
        textures.release_texture_id(self.color_texture, tasks);
        textures.release_texture_id(self.depth_texture, tasks);
        textures.release_texture_id(self.stencil_texture, tasks);
        device.uninit_image_view(self.color_view);
        device.uninit_image(self.color_image);
        if let Some(view) = self.msaa_view {
            device.uninit_image_view(view);
        }
        if let Some(image) = self.msaa_image {
            device.uninit_image(image);
        }
        device.uninit_image_view(self.depth_view);
        device.uninit_image_view(self.stencil_view);
        device.uninit_image(self.depth_stencil_image);
    }

    pub fn clear(&self, device: &mut dyn GpuDevice, clear_color: [f32; 4]) {
        device.encoder().clear_color_image(self.color_image, clear_color);
        device
            .encoder()
            .clear_depth_stencil_image(self.depth_stencil_image, 1.0, 0);
    }
}

/// The main framebuffer plus however many scratch framebuffers
/// intermediate passes need, all sharing one extent/format/sample count.
/// Rebuilt wholesale on resize.
pub struct FramebufferSet {
    extent: vk::Extent2D,
    color_format: vk::Format,
    depth_format: vk::Format,
    sample_count: vk::SampleCountFlags,
    pub main: Framebuffer,
    pub scratch: Vec<Framebuffer>,
}

impl FramebufferSet {
    pub fn new(
        extent: vk::Extent2D,
        color_format: vk::Format,
        depth_format: vk::Format,
        sample_count: vk::SampleCountFlags,
        num_scratch: usize,
        device: &mut dyn GpuDevice,
        textures: &mut TexturePool,
        tasks: &TaskQueue,
    ) -> Result<Self, GpuError> {
        let main = Framebuffer::new(extent, color_format, depth_format, sample_count, device, textures, tasks)?;
        let mut scratch = Vec::with_capacity(num_scratch);
        for _ in 0..num_scratch {
            scratch.push(Framebuffer::new(extent, color_format, depth_format, sample_count, device, textures, tasks)?);
        }
        Ok(Self {
            extent,
            color_format,
            depth_format,
            sample_count,
            main,
            scratch,
        })
    }

    /// On extent change: destroys every framebuffer immediately (not
    /// deferred through the release ring — a resize is assumed to happen
    /// between frames, after the caller has already waited idle) and
    /// rebuilds at the new extent.
    pub fn idle_reclaim(
        &mut self,
        new_extent: vk::Extent2D,
        device: &mut dyn GpuDevice,
        textures: &mut TexturePool,
        tasks: &TaskQueue,
    ) -> Result<(), GpuError> {
        if new_extent == self.extent {
            return Ok(());
        }

        let color_format = self.color_format;
        let depth_format = self.depth_format;
        let sample_count = self.sample_count;
        let num_scratch = self.scratch.len();

        let new_main = Framebuffer::new(new_extent, color_format, depth_format, sample_count, device, textures, tasks)?;
        let mut new_scratch = Vec::with_capacity(num_scratch);
        for _ in 0..num_scratch {
            new_scratch.push(Framebuffer::new(new_extent, color_format, depth_format, sample_count, device, textures, tasks)?);
        }

        let old_main = std::mem::replace(&mut self.main, new_main);
        let old_scratch = std::mem::replace(&mut self.scratch, new_scratch);
        self.extent = new_extent;

        old_main.destroy(device, textures, tasks);
        for fb in old_scratch {
            fb.destroy(device, textures, tasks);
        }
        Ok(())
    }

    pub fn clear_all(&self, device: &mut dyn GpuDevice, clear_color: [f32; 4]) {
        self.main.clear(device, clear_color);
        for fb in &self.scratch {
            fb.clear(device, clear_color);
        }
    }
}
