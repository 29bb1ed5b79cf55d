//! CPU-side mirror of the per-instance storage buffers.

use rand::Rng;

use super::layout::{DynamicInstance, InstanceLayout, StaticInstance};

/// Half-open sampling range `[min, max)`.
///
/// Constructors follow the usual `rand()` helper shape: no bound gives `[0, 1)`, one
/// bound gives `[0, max)`, two bounds give `[min, max)`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct RandRange {
    pub min: f32,
    pub max: f32,
}

impl RandRange {
    #[inline]
    pub const fn unit() -> Self {
        Self { min: 0.0, max: 1.0 }
    }

    #[inline]
    pub const fn upto(max: f32) -> Self {
        Self { min: 0.0, max }
    }

    #[inline]
    pub const fn between(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.max - self.min
    }

    /// True when `[min, max)` holds at least one value and its width is representable.
    pub fn is_valid(&self) -> bool {
        // A finite width also rules out infinite and NaN bounds.
        self.min < self.max && self.width().is_finite()
    }

    /// Draws one value from `[min, max)`.
    ///
    /// Ranges rejected by `is_valid` yield `min` instead of sampling.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f32 {
        if !self.is_valid() {
            return self.min;
        }
        let width = self.width();
        // `min + u * width` can round up to `max`; redraw in that case.
        loop {
            let v = self.min + rng.random::<f32>() * width;
            if v < self.max {
                return v;
            }
        }
    }
}

impl Default for RandRange {
    fn default() -> Self {
        Self::unit()
    }
}

/// Sampling ranges for the randomized instance attributes.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct InstanceRanges {
    /// Each of r, g, b. Alpha is always 1.
    pub color: RandRange,
    /// Each of x, y.
    pub offset: RandRange,
    /// Scalar base scale before aspect correction.
    pub scale: RandRange,
}

impl Default for InstanceRanges {
    fn default() -> Self {
        Self {
            color: RandRange::unit(),
            offset: RandRange::between(-0.9, 0.9),
            scale: RandRange::between(0.2, 0.5),
        }
    }
}

/// Owns every instance's attributes and the packed bytes of both storage buffers.
///
/// Color and offset never change after construction, so the static bytes are stable
/// for the lifetime of the store. Scales are rebuilt in full by `update_scales`.
#[derive(Debug, Clone)]
pub struct InstanceStore {
    statics: Vec<StaticInstance>,
    base_scales: Vec<f32>,
    dynamics: Vec<DynamicInstance>,
}

impl InstanceStore {
    pub fn new<R: Rng + ?Sized>(count: u32, ranges: &InstanceRanges, rng: &mut R) -> Self {
        let n = count as usize;
        let mut statics = Vec::with_capacity(n);
        let mut base_scales = Vec::with_capacity(n);

        for _ in 0..n {
            let color = [
                ranges.color.sample(rng),
                ranges.color.sample(rng),
                ranges.color.sample(rng),
                1.0,
            ];
            let offset = [ranges.offset.sample(rng), ranges.offset.sample(rng)];
            statics.push(StaticInstance::new(color, offset));
            base_scales.push(ranges.scale.sample(rng));
        }

        Self {
            statics,
            base_scales,
            dynamics: vec![DynamicInstance::default(); n],
        }
    }

    #[inline]
    pub fn len(&self) -> u32 {
        self.statics.len() as u32
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.statics.is_empty()
    }

    #[inline]
    pub fn layout(&self) -> InstanceLayout {
        InstanceLayout::new(self.len())
    }

    pub fn statics(&self) -> &[StaticInstance] {
        &self.statics
    }

    pub fn base_scales(&self) -> &[f32] {
        &self.base_scales
    }

    pub fn dynamics(&self) -> &[DynamicInstance] {
        &self.dynamics
    }

    /// Packed static buffer contents.
    #[inline]
    pub fn static_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.statics)
    }

    /// Packed dynamic buffer contents as of the last `update_scales`.
    #[inline]
    pub fn dynamic_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.dynamics)
    }

    /// Recomputes every scale as `(base / aspect, base)` and returns the full dynamic
    /// buffer contents.
    pub fn update_scales(&mut self, aspect: f32) -> &[u8] {
        for (dynamic, &base) in self.dynamics.iter_mut().zip(&self.base_scales) {
            dynamic.scale = [base / aspect, base];
        }
        self.dynamic_bytes()
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::render::layout::{DYNAMIC_STRIDE, STATIC_STRIDE};

    fn store(count: u32, seed: u64) -> InstanceStore {
        InstanceStore::new(count, &InstanceRanges::default(), &mut StdRng::seed_from_u64(seed))
    }

    // ── RandRange ─────────────────────────────────────────────────────────

    #[test]
    fn rand_range_constructors() {
        assert_eq!(RandRange::unit(), RandRange::between(0.0, 1.0));
        assert_eq!(RandRange::upto(3.0), RandRange::between(0.0, 3.0));
    }

    #[test]
    fn rand_range_is_half_open() {
        let mut rng = StdRng::seed_from_u64(7);
        let r = RandRange::between(-0.9, 0.9);
        for _ in 0..10_000 {
            let v = r.sample(&mut rng);
            assert!((-0.9..0.9).contains(&v));
        }
    }

    #[test]
    fn invalid_range_returns_min_without_sampling() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(RandRange::between(0.25, 0.25).sample(&mut rng), 0.25);
        assert_eq!(RandRange::between(1.0, 0.0).sample(&mut rng), 1.0);
    }

    #[test]
    fn range_validity() {
        assert!(RandRange::unit().is_valid());
        assert!(RandRange::between(-0.9, 0.9).is_valid());
        assert!(!RandRange::between(0.5, 0.5).is_valid());
        assert!(!RandRange::between(1.0, 0.0).is_valid());
        assert!(!RandRange::between(0.0, f32::NAN).is_valid());
        assert!(!RandRange::between(f32::NEG_INFINITY, 0.0).is_valid());
    }

    #[test]
    fn overflowing_width_is_invalid() {
        let wide = RandRange::between(-f32::MAX, f32::MAX);
        assert!(wide.width().is_infinite());
        assert!(!wide.is_valid());

        // Must return instead of redrawing forever.
        let mut rng = StdRng::seed_from_u64(3);
        assert_eq!(wide.sample(&mut rng), -f32::MAX);
    }

    #[test]
    fn widest_finite_range_samples_inside() {
        let r = RandRange::between(-f32::MAX / 2.0, f32::MAX / 2.0);
        assert!(r.is_valid());
        let mut rng = StdRng::seed_from_u64(4);
        for _ in 0..1_000 {
            let v = r.sample(&mut rng);
            assert!(v >= r.min && v < r.max);
        }
    }

    // ── initialization ────────────────────────────────────────────────────

    #[test]
    fn attributes_within_ranges() {
        let s = store(1000, 42);
        assert_eq!(s.len(), 1000);
        for rec in s.statics() {
            assert_eq!(rec.color[3], 1.0);
            assert!(rec.color[..3].iter().all(|c| (0.0..1.0).contains(c)));
            assert!(rec.offset.iter().all(|o| (-0.9..0.9).contains(o)));
            assert_eq!(rec._pad, [0.0, 0.0]);
        }
        assert!(s.base_scales().iter().all(|b| (0.2..0.5).contains(b)));
    }

    #[test]
    fn packed_sizes_match_layout() {
        let s = store(100, 3);
        assert_eq!(s.static_bytes().len() as u64, s.layout().static_buffer_size());
        assert_eq!(s.dynamic_bytes().len() as u64, s.layout().dynamic_buffer_size());
    }

    #[test]
    fn empty_store_is_a_no_op() {
        let mut s = store(0, 0);
        assert!(s.is_empty());
        assert!(s.static_bytes().is_empty());
        assert!(s.update_scales(1.5).is_empty());
    }

    // ── per-frame scale ───────────────────────────────────────────────────

    #[test]
    fn aspect_correction() {
        let mut s = store(16, 9);
        let aspect = 16.0 / 9.0;
        s.update_scales(aspect);
        for (d, &base) in s.dynamics().iter().zip(s.base_scales()) {
            assert_eq!(d.scale, [base / aspect, base]);
        }
    }

    #[test]
    fn update_is_idempotent() {
        let mut s = store(100, 5);
        let first = s.update_scales(1.25).to_vec();
        let second = s.update_scales(1.25).to_vec();
        assert_eq!(first, second);
    }

    #[test]
    fn two_aspects_touch_only_scale_bytes() {
        let mut s = store(100, 11);
        let static_before = s.static_bytes().to_vec();
        let wide_bytes = s.update_scales(2.0).to_vec();
        let wide = s.dynamics().to_vec();
        let static_between = s.static_bytes().to_vec();
        let tall_bytes = s.update_scales(0.5).to_vec();
        let tall = s.dynamics().to_vec();

        assert_eq!(static_before, static_between);
        assert_eq!(static_before, s.static_bytes());
        assert_eq!(static_before.len() as u64, 100 * STATIC_STRIDE);

        assert_eq!(wide_bytes.len() as u64, 100 * DYNAMIC_STRIDE);
        assert_ne!(wide_bytes, tall_bytes);
        for ((a, b), &base) in wide.iter().zip(&tall).zip(s.base_scales()) {
            // x follows the aspect, y stays the base scale.
            assert_ne!(a.scale[0], b.scale[0]);
            assert_eq!(a.scale[1], base);
            assert_eq!(b.scale[1], base);
        }
    }

    #[test]
    fn seeded_stores_are_reproducible() {
        assert_eq!(store(50, 99).static_bytes(), store(50, 99).static_bytes());
    }
}
