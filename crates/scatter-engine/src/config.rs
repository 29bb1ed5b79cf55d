//! Scene configuration.
//!
//! Everything here is fixed at startup; nothing is read from files or the network.

use crate::error::ConfigError;
use crate::render::{CircleMesh, InstanceRanges, Mesh, RandRange};

/// Shape drawn by every instance.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Shape {
    /// Three vertices hardcoded in the shader; no vertex storage binding.
    Triangle,
    /// Procedural annulus read from a vertex storage buffer.
    Circle(CircleMesh),
}

impl Shape {
    /// CPU-side mesh for this shape.
    pub fn mesh(&self) -> Mesh {
        match self {
            Shape::Triangle => Mesh::triangle(),
            Shape::Circle(circle) => circle.generate(),
        }
    }

    #[inline]
    pub fn uses_vertex_storage(&self) -> bool {
        matches!(self, Shape::Circle(_))
    }
}

impl Default for Shape {
    fn default() -> Self {
        Shape::Circle(CircleMesh {
            radius: 0.5,
            inner_radius: 0.25,
            ..CircleMesh::default()
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SceneConfig {
    pub instance_count: u32,
    pub shape: Shape,
    pub ranges: InstanceRanges,
    pub clear_color: wgpu::Color,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            instance_count: 100,
            shape: Shape::default(),
            ranges: InstanceRanges::default(),
            clear_color: wgpu::Color {
                r: 0.3,
                g: 0.3,
                b: 0.3,
                a: 1.0,
            },
        }
    }
}

impl SceneConfig {
    /// Rejects parameters that would produce empty buffers or undefined geometry.
    ///
    /// Fewer than three subdivisions is accepted (the shape is degenerate but
    /// well-defined) and only logged.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.instance_count == 0 {
            return Err(ConfigError::NoInstances);
        }

        if let Shape::Circle(c) = &self.shape {
            if !(c.radius.is_finite() && c.radius > 0.0) {
                return Err(ConfigError::InvalidRadius(c.radius));
            }
            if !(c.inner_radius.is_finite() && c.inner_radius >= 0.0) {
                return Err(ConfigError::InvalidInnerRadius(c.inner_radius));
            }
            if c.num_subdivisions == 0 {
                return Err(ConfigError::NoSubdivisions);
            }
            if c.num_subdivisions > CircleMesh::MAX_SUBDIVISIONS {
                return Err(ConfigError::TooManySubdivisions {
                    got: c.num_subdivisions,
                    max: CircleMesh::MAX_SUBDIVISIONS,
                });
            }
            if !(c.start_angle.is_finite() && c.end_angle.is_finite()) {
                return Err(ConfigError::InvalidAngles {
                    start: c.start_angle,
                    end: c.end_angle,
                });
            }
            if c.num_subdivisions < 3 {
                log::warn!(
                    "circle with {} subdivisions will render as a degenerate shape",
                    c.num_subdivisions
                );
            }
        }

        check_range("color", self.ranges.color)?;
        check_range("offset", self.ranges.offset)?;
        check_range("scale", self.ranges.scale)?;

        Ok(())
    }
}

fn check_range(name: &'static str, range: RandRange) -> Result<(), ConfigError> {
    if range.is_valid() {
        Ok(())
    } else {
        Err(ConfigError::InvalidRange {
            name,
            min: range.min,
            max: range.max,
        })
    }
}
