// Texture and sampler slot tables (spec.md §4.8 "Texture slot table" /
// "Sampler slot table").

use std::collections::HashMap;

use ash::vk;

use crate::device::{DescriptorBinding, DescriptorKind, SamplerDesc};
use crate::error::GpuError;
use crate::tasks::TaskQueue;

pub const NUM_TEXTURE_SLOTS: usize = 4096;
pub const NUM_SAMPLER_SLOTS: usize = 256;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct TextureId(pub u16);

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct SamplerId(pub u16);

/// The default textures created at startup and pinned to fixed low slot
/// indices, so user-allocated slots never collide with them.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum DefaultTexture {
    White,
    Black,
    Transparent,
    Alpha,
    R,
    G,
    B,
    Magenta,
    Cyan,
    Yellow,
}

impl DefaultTexture {
    pub const ALL: [DefaultTexture; 10] = [
        DefaultTexture::White,
        DefaultTexture::Black,
        DefaultTexture::Transparent,
        DefaultTexture::Alpha,
        DefaultTexture::R,
        DefaultTexture::G,
        DefaultTexture::B,
        DefaultTexture::Magenta,
        DefaultTexture::Cyan,
        DefaultTexture::Yellow,
    ];

    pub fn slot(self) -> u16 {
        self as u16
    }

    /// The swizzle this default texture's view applies over the single
    /// shared 1x1 base image (spec.md: "created at startup via swizzle
    /// views over a 1x1 base image").
    pub fn swizzle(self) -> vk::ComponentMapping {
        use vk::ComponentSwizzle as S;
        let (r, g, b, a) = match self {
            DefaultTexture::White => (S::ONE, S::ONE, S::ONE, S::ONE),
            DefaultTexture::Black => (S::ZERO, S::ZERO, S::ZERO, S::ONE),
            DefaultTexture::Transparent => (S::ZERO, S::ZERO, S::ZERO, S::ZERO),
            DefaultTexture::Alpha => (S::ONE, S::ONE, S::ONE, S::R),
            DefaultTexture::R => (S::ONE, S::ZERO, S::ZERO, S::ONE),
            DefaultTexture::G => (S::ZERO, S::ONE, S::ZERO, S::ONE),
            DefaultTexture::B => (S::ZERO, S::ZERO, S::ONE, S::ONE),
            DefaultTexture::Magenta => (S::ONE, S::ZERO, S::ONE, S::ONE),
            DefaultTexture::Cyan => (S::ZERO, S::ONE, S::ONE, S::ONE),
            DefaultTexture::Yellow => (S::ONE, S::ONE, S::ZERO, S::ONE),
        };
        vk::ComponentMapping {
            r,
            g,
            b,
            a,
        }
    }
}

/// A fixed-capacity bit-vector of free/used flags backing a
/// variable-length descriptor array.
struct SlotTable {
    used: Vec<bool>,
    kind: &'static str,
}

impl SlotTable {
    fn new(capacity: usize, kind: &'static str) -> Self {
        Self {
            used: vec![false; capacity],
            kind,
        }
    }

    fn reserve(&mut self, slot: u16) {
        self.used[slot as usize] = true;
    }

    /// Claims the lowest free bit.
    fn alloc(&mut self) -> Result<u16, GpuError> {
        match self.used.iter().position(|u| !*u) {
            Some(i) => {
                self.used[i] = true;
                Ok(i as u16)
            }
            None => Err(GpuError::SlotExhausted {
                kind: self.kind,
                capacity: self.used.len(),
            }),
        }
    }

    fn release(&mut self, slot: u16) {
        self.used[slot as usize] = false;
    }
}

/// The bindless texture descriptor array's slot allocator.
pub struct TexturePool {
    slots: SlotTable,
}

impl TexturePool {
    /// Reserves the fixed low indices for every [`DefaultTexture`];
    /// callers are still responsible for actually creating the backing
    /// 1x1 image and its swizzled views and binding them (out of scope
    /// here, same as all other `GpuDevice` calls).
    pub fn new() -> Self {
        let mut slots = SlotTable::new(NUM_TEXTURE_SLOTS, "texture");
        for default in DefaultTexture::ALL {
            slots.reserve(default.slot());
        }
        Self { slots }
    }

    /// Claims the lowest free slot and enqueues a pre-frame descriptor
    /// update binding `view` at that index.
    pub fn alloc_texture_id(&mut self, view: vk::ImageView, tasks: &TaskQueue) -> Result<TextureId, GpuError> {
        let slot = self.slots.alloc()?;
        tasks.push(move |device| {
            device.update_descriptor_set(DescriptorBinding {
                kind: DescriptorKind::Texture,
                slot,
                view: Some(view),
                sampler: None,
            });
        });
        Ok(TextureId(slot))
    }

    pub fn release_texture_id(&mut self, id: TextureId, tasks: &TaskQueue) {
        self.slots.release(id.0);
        tasks.push(move |device| {
            device.unbind_descriptor_set(DescriptorKind::Texture, id.0);
        });
    }
}

impl Default for TexturePool {
    fn default() -> Self {
        Self::new()
    }
}

/// The bindless sampler descriptor array's slot allocator, plus a
/// dedup cache so repeated requests for the same `SamplerDesc` reuse one
/// allocation (spec.md: "so duplicate requests deduplicate").
pub struct SamplerPool {
    slots: SlotTable,
    cache: HashMap<SamplerDesc, (SamplerId, vk::Sampler)>,
}

impl SamplerPool {
    pub fn new() -> Self {
        Self {
            slots: SlotTable::new(NUM_SAMPLER_SLOTS, "sampler"),
            cache: HashMap::new(),
        }
    }

    /// Returns the cached `(SamplerId, Sampler)` for `desc` if one exists;
    /// otherwise allocates a new slot, enqueues the bind, and caches it
    /// under `sampler` for future requests.
    pub fn alloc_sampler_id(
        &mut self,
        desc: SamplerDesc,
        sampler: vk::Sampler,
        tasks: &TaskQueue,
    ) -> Result<(SamplerId, vk::Sampler), GpuError> {
        if let Some(cached) = self.cache.get(&desc) {
            return Ok(*cached);
        }
        let slot = self.slots.alloc()?;
        tasks.push(move |device| {
            device.update_descriptor_set(DescriptorBinding {
                kind: DescriptorKind::Sampler,
                slot,
                view: None,
                sampler: Some(sampler),
            });
        });
        let id = SamplerId(slot);
        self.cache.insert(desc, (id, sampler));
        Ok((id, sampler))
    }

    pub fn release_sampler_id(&mut self, id: SamplerId, tasks: &TaskQueue) {
        self.slots.release(id.0);
        self.cache.retain(|_, (cached_id, _)| *cached_id != id);
        tasks.push(move |device| {
            device.unbind_descriptor_set(DescriptorKind::Sampler, id.0);
        });
    }
}

impl Default for SamplerPool {
    fn default() -> Self {
        Self::new()
    }
}
