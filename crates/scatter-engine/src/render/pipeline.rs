//! Typed descriptions of the single render pipeline and its bind group.

use std::num::NonZeroU64;

use crate::config::Shape;

use super::layout::{DYNAMIC_STRIDE, STATIC_STRIDE};

/// Size of one `vec2f` vertex record in the vertex storage buffer.
pub const VERTEX_STRIDE: u64 = 2 * 4;

/// What a binding slot carries.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum BindingKind {
    /// Write-once `array<Static>`.
    StaticInstances,
    /// Per-frame `array<Dynamic>`.
    DynamicInstances,
    /// Shared mesh `array<Vertex>`, circle variant only.
    Vertices,
}

impl BindingKind {
    /// Size of one array element; also the minimum binding size.
    pub const fn record_size(self) -> u64 {
        match self {
            BindingKind::StaticInstances => STATIC_STRIDE,
            BindingKind::DynamicInstances => DYNAMIC_STRIDE,
            BindingKind::Vertices => VERTEX_STRIDE,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            BindingKind::StaticInstances => "scatter static instances",
            BindingKind::DynamicInstances => "scatter dynamic instances",
            BindingKind::Vertices => "scatter mesh vertices",
        }
    }
}

/// One entry of bind group 0.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct BindingSlot {
    pub binding: u32,
    pub kind: BindingKind,
    pub visibility: wgpu::ShaderStages,
}

impl BindingSlot {
    pub fn layout_entry(&self) -> wgpu::BindGroupLayoutEntry {
        wgpu::BindGroupLayoutEntry {
            binding: self.binding,
            visibility: self.visibility,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Storage { read_only: true },
                has_dynamic_offset: false,
                min_binding_size: NonZeroU64::new(self.kind.record_size()),
            },
            count: None,
        }
    }
}

/// Bindings for `shape`: static at 0, dynamic at 1, and vertices at 2 when the mesh
/// lives in a storage buffer.
pub fn binding_slots(shape: &Shape) -> Vec<BindingSlot> {
    let mut slots = vec![
        BindingSlot {
            binding: 0,
            kind: BindingKind::StaticInstances,
            visibility: wgpu::ShaderStages::VERTEX,
        },
        BindingSlot {
            binding: 1,
            kind: BindingKind::DynamicInstances,
            visibility: wgpu::ShaderStages::VERTEX,
        },
    ];
    if shape.uses_vertex_storage() {
        slots.push(BindingSlot {
            binding: 2,
            kind: BindingKind::Vertices,
            visibility: wgpu::ShaderStages::VERTEX,
        });
    }
    slots
}

/// Everything that shapes the render pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    pub format: wgpu::TextureFormat,
    pub shape: Shape,
    pub front_face: wgpu::FrontFace,
    /// Culling is off by default; the circle mesh keeps a CCW winding if it is enabled.
    pub cull_mode: Option<wgpu::Face>,
}

impl PipelineConfig {
    pub fn new(format: wgpu::TextureFormat, shape: Shape) -> Self {
        Self {
            format,
            shape,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self.shape {
            Shape::Triangle => "scatter triangle pipeline",
            Shape::Circle(_) => "scatter circle pipeline",
        }
    }

    pub fn shader_source(&self) -> &'static str {
        match self.shape {
            Shape::Triangle => include_str!("shaders/triangle.wgsl"),
            Shape::Circle(_) => include_str!("shaders/circle.wgsl"),
        }
    }

    pub fn bindings(&self) -> Vec<BindingSlot> {
        binding_slots(&self.shape)
    }

    pub fn primitive(&self) -> wgpu::PrimitiveState {
        wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: self.front_face,
            cull_mode: self.cull_mode,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::CircleMesh;

    #[test]
    fn triangle_omits_vertex_binding() {
        let slots = binding_slots(&Shape::Triangle);
        let kinds: Vec<_> = slots.iter().map(|s| (s.binding, s.kind)).collect();
        assert_eq!(
            kinds,
            [(0, BindingKind::StaticInstances), (1, BindingKind::DynamicInstances)]
        );
    }

    #[test]
    fn circle_binds_vertices_at_two() {
        let slots = binding_slots(&Shape::Circle(CircleMesh::default()));
        assert_eq!(slots.len(), 3);
        assert_eq!(slots[2].binding, 2);
        assert_eq!(slots[2].kind, BindingKind::Vertices);
    }

    #[test]
    fn entries_are_read_only_vertex_storage() {
        for slot in binding_slots(&Shape::Circle(CircleMesh::default())) {
            let entry = slot.layout_entry();
            assert_eq!(entry.visibility, wgpu::ShaderStages::VERTEX);
            match entry.ty {
                wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Storage { read_only },
                    min_binding_size,
                    ..
                } => {
                    assert!(read_only);
                    assert_eq!(min_binding_size.map(NonZeroU64::get), Some(slot.kind.record_size()));
                }
                other => panic!("unexpected binding type {other:?}"),
            }
        }
    }

    #[test]
    fn record_sizes_follow_layout() {
        assert_eq!(BindingKind::StaticInstances.record_size(), 32);
        assert_eq!(BindingKind::DynamicInstances.record_size(), 8);
        assert_eq!(BindingKind::Vertices.record_size(), 8);
    }

    #[test]
    fn shader_matches_shape() {
        let tri = PipelineConfig::new(wgpu::TextureFormat::Bgra8UnormSrgb, Shape::Triangle);
        assert!(!tri.shader_source().contains("@binding(2)"));
        let circle = PipelineConfig::new(wgpu::TextureFormat::Bgra8UnormSrgb, Shape::default());
        assert!(circle.shader_source().contains("@binding(2)"));
        assert_eq!(circle.primitive().cull_mode, None);
    }
}
