//! Per-instance record formats shared by the CPU packer and the WGSL structs.
//!
//! Storage-buffer structs round their size up to the alignment of their largest
//! member, so a `{ color: vec4f, offset: vec2f }` record occupies 32 bytes, not 24.
//! The constants below and the `#[repr(C)]` records must match the `Static`/`Dynamic`
//! structs in `shaders/*.wgsl`; the compile-time checks at the bottom pin the Rust side.

use bytemuck::{Pod, Zeroable};

/// Alignment granularity of the static record (alignment of `vec4f`).
pub const RECORD_ALIGNMENT: u64 = 16;

pub const COLOR_SIZE: u64 = 4 * 4;
pub const OFFSET_SIZE: u64 = 2 * 4;
pub const SCALE_SIZE: u64 = 2 * 4;

/// Byte offsets inside a static record.
pub const COLOR_OFFSET: u64 = 0;
pub const OFFSET_OFFSET: u64 = COLOR_OFFSET + COLOR_SIZE;

/// Byte offset of `scale` inside a dynamic record.
pub const SCALE_OFFSET: u64 = 0;

pub const STATIC_STRIDE: u64 = round_up(COLOR_SIZE + OFFSET_SIZE, RECORD_ALIGNMENT);
pub const DYNAMIC_STRIDE: u64 = SCALE_SIZE;

/// Rounds `value` up to the next multiple of `alignment` (a power of two).
#[inline]
pub const fn round_up(value: u64, alignment: u64) -> u64 {
    (value + alignment - 1) & !(alignment - 1)
}

/// Write-once record: `{ color: vec4f, offset: vec2f }` + 8 bytes pad.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct StaticInstance {
    pub color: [f32; 4],
    pub offset: [f32; 2],
    pub _pad: [f32; 2],
}

impl StaticInstance {
    #[inline]
    pub fn new(color: [f32; 4], offset: [f32; 2]) -> Self {
        Self {
            color,
            offset,
            _pad: [0.0; 2],
        }
    }
}

/// Per-frame record: `{ scale: vec2f }`.
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Pod, Zeroable)]
pub struct DynamicInstance {
    pub scale: [f32; 2],
}

/// Buffer sizing for a given instance count.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct InstanceLayout {
    count: u32,
}

impl InstanceLayout {
    #[inline]
    pub const fn new(count: u32) -> Self {
        Self { count }
    }

    #[inline]
    pub const fn count(self) -> u32 {
        self.count
    }

    #[inline]
    pub const fn static_buffer_size(self) -> u64 {
        STATIC_STRIDE * self.count as u64
    }

    #[inline]
    pub const fn dynamic_buffer_size(self) -> u64 {
        DYNAMIC_STRIDE * self.count as u64
    }
}

const _: () = {
    assert!(STATIC_STRIDE == 32);
    assert!(DYNAMIC_STRIDE == 8);
    assert!(std::mem::size_of::<StaticInstance>() as u64 == STATIC_STRIDE);
    assert!(std::mem::size_of::<DynamicInstance>() as u64 == DYNAMIC_STRIDE);
    assert!(std::mem::offset_of!(StaticInstance, color) as u64 == COLOR_OFFSET);
    assert!(std::mem::offset_of!(StaticInstance, offset) as u64 == OFFSET_OFFSET);
    assert!(std::mem::offset_of!(DynamicInstance, scale) as u64 == SCALE_OFFSET);
};
