//! Procedural 2D meshes shared by every instance.

use std::f32::consts::TAU;

/// Flat triangle-list positions, one `[x, y]` pair per vertex.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    pub positions: Vec<[f32; 2]>,
}

impl Mesh {
    /// The fixed triangle. The triangle shader hardcodes the same three positions.
    pub fn triangle() -> Self {
        Self {
            positions: vec![[0.0, 0.5], [-0.5, -0.5], [0.5, -0.5]],
        }
    }

    #[inline]
    pub fn vertex_count(&self) -> u32 {
        self.positions.len() as u32
    }

    /// Raw bytes for a `array<vec2f>` storage binding.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.positions)
    }
}

/// Parameters of a subdivided annulus (or filled disk when `inner_radius` is 0).
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CircleMesh {
    pub radius: f32,
    pub inner_radius: f32,
    pub num_subdivisions: u32,
    pub start_angle: f32,
    pub end_angle: f32,
}

impl Default for CircleMesh {
    fn default() -> Self {
        Self {
            radius: 1.0,
            inner_radius: 0.0,
            num_subdivisions: 24,
            start_angle: 0.0,
            end_angle: TAU,
        }
    }
}

impl CircleMesh {
    pub const VERTICES_PER_SEGMENT: u32 = 6;

    /// Largest subdivision count whose vertex count still fits a `u32` draw range.
    pub const MAX_SUBDIVISIONS: u32 = u32::MAX / Self::VERTICES_PER_SEGMENT;

    #[inline]
    pub fn vertex_count(&self) -> u32 {
        self.num_subdivisions * Self::VERTICES_PER_SEGMENT
    }

    /// Builds the triangle list.
    ///
    /// Each angular step emits two triangles sharing the `inner1`/`outer2` edge:
    ///
    /// ```text
    /// outer1 --- outer2
    ///   |  A   /   |
    ///   |   /   B  |
    /// inner1 --- inner2
    /// ```
    pub fn generate(&self) -> Mesh {
        let n = self.num_subdivisions;
        let mut positions = Vec::with_capacity(self.vertex_count() as usize);

        let step = (self.end_angle - self.start_angle) / n as f32;
        let at = |radius: f32, angle: f32| [angle.cos() * radius, angle.sin() * radius];

        for i in 0..n {
            let angle1 = self.start_angle + i as f32 * step;
            let angle2 = self.start_angle + (i + 1) as f32 * step;

            let outer1 = at(self.radius, angle1);
            let outer2 = at(self.radius, angle2);
            let inner1 = at(self.inner_radius, angle1);
            let inner2 = at(self.inner_radius, angle2);

            positions.extend_from_slice(&[outer1, outer2, inner1]);
            positions.extend_from_slice(&[inner1, outer2, inner2]);
        }

        Mesh { positions }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn circle(radius: f32, inner_radius: f32, num_subdivisions: u32) -> CircleMesh {
        CircleMesh {
            radius,
            inner_radius,
            num_subdivisions,
            ..CircleMesh::default()
        }
    }

    fn is_origin(p: [f32; 2]) -> bool {
        p[0] == 0.0 && p[1] == 0.0
    }

    // ── counts ────────────────────────────────────────────────────────────

    #[test]
    fn six_vertices_per_subdivision() {
        for n in 1..=64 {
            let mesh = circle(1.0, 0.3, n).generate();
            assert_eq!(mesh.vertex_count(), n * 6);
            assert_eq!(mesh.as_bytes().len(), (n * 12 * 4) as usize);
        }
    }

    #[test]
    fn triangle_has_three_vertices() {
        assert_eq!(Mesh::triangle().vertex_count(), 3);
    }

    // ── bounds ────────────────────────────────────────────────────────────

    #[test]
    fn vertices_are_finite_and_bounded() {
        for &(r, inner) in &[(1.0f32, 0.0f32), (0.5, 0.25), (0.2, 0.7)] {
            let bound = r.max(inner) + 1e-6;
            for p in circle(r, inner, 17).generate().positions {
                assert!(p[0].is_finite() && p[1].is_finite());
                assert!(p[0].hypot(p[1]) <= bound, "{p:?} outside {bound}");
            }
        }
    }

    // ── degenerate inner radius ───────────────────────────────────────────

    #[test]
    fn zero_inner_radius_collapses_inner_vertices() {
        let mesh = circle(1.0, 0.0, 9).generate();
        for segment in mesh.positions.chunks(6) {
            assert!(is_origin(segment[2]));
            assert!(is_origin(segment[3]));
            assert!(!is_origin(segment[0]));
        }
    }

    #[test]
    fn annulus_scenario_has_no_origin_vertex() {
        let mesh = circle(0.5, 0.25, 24).generate();
        assert_eq!(mesh.vertex_count(), 144);
        assert!(mesh.positions.iter().all(|&p| !is_origin(p)));
    }

    #[test]
    fn disk_scenario_collapses_inner_ring() {
        let mesh = circle(1.0, 0.0, 4).generate();
        assert_eq!(mesh.vertex_count(), 24);
        // inner1 twice and inner2 once per segment; a triangle list cannot share fewer.
        assert_eq!(mesh.positions.iter().filter(|&&p| is_origin(p)).count(), 12);
        assert!(mesh.positions.chunks(6).all(|s| is_origin(s[2]) && is_origin(s[3])));
    }

    // ── winding ───────────────────────────────────────────────────────────

    #[test]
    fn winding_is_consistent() {
        fn signed_area(a: [f32; 2], b: [f32; 2], c: [f32; 2]) -> f32 {
            (b[0] - a[0]) * (c[1] - a[1]) - (c[0] - a[0]) * (b[1] - a[1])
        }

        let mesh = circle(1.0, 0.5, 12).generate();
        for tri in mesh.positions.chunks(3) {
            assert!(signed_area(tri[0], tri[1], tri[2]) > 0.0);
        }
    }

    #[test]
    fn few_subdivisions_are_allowed() {
        assert_eq!(circle(1.0, 0.0, 1).generate().vertex_count(), 6);
        assert_eq!(circle(1.0, 0.0, 2).generate().vertex_count(), 12);
    }

    #[test]
    fn max_subdivisions_vertex_count_fits() {
        let c = circle(1.0, 0.0, CircleMesh::MAX_SUBDIVISIONS);
        assert_eq!(
            c.vertex_count(),
            CircleMesh::MAX_SUBDIVISIONS * CircleMesh::VERTICES_PER_SEGMENT
        );
        assert!(
            (CircleMesh::MAX_SUBDIVISIONS + 1)
                .checked_mul(CircleMesh::VERTICES_PER_SEGMENT)
                .is_none()
        );
    }

    #[test]
    fn generation_is_deterministic() {
        let m = circle(0.8, 0.1, 13);
        assert_eq!(m.generate(), m.generate());
    }
}
