// bounds.rs - Bounding region queries
//
// Every agent kind lives inside an axis-aligned box. Agents either clamp
// against it (bikes, shapes) or wrap around it (particles).

use glam::Vec3;

use crate::config::BoxConfig;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub min: Vec3,
    pub max: Vec3,
}

impl From<BoxConfig> for Bounds {
    fn from(b: BoxConfig) -> Self {
        Self { min: Vec3::from(b.min), max: Vec3::from(b.max) }
    }
}

impl Bounds {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Square region on the floor plane, `[-half, half]` on x and z.
    pub fn square(half: f32, y_min: f32, y_max: f32) -> Self {
        Self {
            min: Vec3::new(-half, y_min, -half),
            max: Vec3::new(half, y_max, half),
        }
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    #[inline]
    pub fn contains(&self, p: Vec3) -> bool {
        p.x >= self.min.x
            && p.x <= self.max.x
            && p.y >= self.min.y
            && p.y <= self.max.y
            && p.z >= self.min.z
            && p.z <= self.max.z
    }

    #[inline]
    pub fn clamp(&self, p: Vec3) -> Vec3 {
        p.max(self.min).min(self.max)
    }

    /// Wrap each axis into `[min, max)`. Degenerate axes collapse to `min`.
    #[inline]
    pub fn wrap(&self, p: Vec3) -> Vec3 {
        Vec3::new(
            wrap_axis(p.x, self.min.x, self.max.x),
            wrap_axis(p.y, self.min.y, self.max.y),
            wrap_axis(p.z, self.min.z, self.max.z),
        )
    }
}

#[inline]
fn wrap_axis(v: f32, lo: f32, hi: f32) -> f32 {
    let span = hi - lo;
    if !(span > 0.0) {
        return lo;
    }
    if v >= lo && v < hi {
        return v;
    }
    let w = lo + (v - lo).rem_euclid(span);
    // rem_euclid can round up to exactly `span` for tiny negative offsets
    if w >= hi { lo } else { w }
}
