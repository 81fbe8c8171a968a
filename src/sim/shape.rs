// shape.rs - Floating geometric shapes
//
// Tumbling primitives that bob around their spawn height.

use glam::Vec3;
use rand::Rng;

use crate::color::Rgb;
use crate::config::{ShapeConfig, ShapeKind};
use crate::world::Bounds;

pub struct Shape {
    pub kind: ShapeKind,
    pub color: Rgb,
    pub wireframe: bool,
    pub position: Vec3,
    pub rotation: Vec3,
    /// Radians per frame on each axis.
    pub spin: Vec3,
    pub float_speed: f32,
    pub origin_y: f32,
}

pub struct Shapes {
    pub items: Vec<Shape>,
    pub opacity: f32,
    pub emissive: f32,
    amplitude: f32,
    bounds: Bounds,
}

impl Shapes {
    pub fn spawn(cfg: &ShapeConfig, bounds: Bounds, rng: &mut impl Rng) -> Self {
        let lo = Vec3::from(cfg.spawn.min);
        let hi = Vec3::from(cfg.spawn.max);

        let items = (0..cfg.count)
            .map(|_| {
                let style = cfg.styles[rng.random_range(0..cfg.styles.len())];
                let position = Vec3::new(
                    rng.random_range(lo.x..=hi.x),
                    rng.random_range(lo.y..=hi.y),
                    rng.random_range(lo.z..=hi.z),
                );
                Shape {
                    kind: style.kind,
                    color: Rgb::from_hex(style.color),
                    wireframe: rng.random::<f32>() < cfg.wireframe_chance,
                    position,
                    rotation: Vec3::ZERO,
                    spin: Vec3::new(
                        (rng.random::<f32>() - 0.5) * 2.0 * cfg.spin,
                        (rng.random::<f32>() - 0.5) * 2.0 * cfg.spin,
                        (rng.random::<f32>() - 0.5) * 2.0 * cfg.spin,
                    ),
                    float_speed: rng.random_range(cfg.float_speed[0]..=cfg.float_speed[1]),
                    origin_y: position.y,
                }
            })
            .collect();

        Self {
            items,
            opacity: cfg.opacity,
            emissive: cfg.emissive,
            amplitude: cfg.float_amplitude,
            bounds,
        }
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn update(&mut self, steps: f32, time: f32) {
        for s in &mut self.items {
            s.rotation = wrap_angles(s.rotation + s.spin * steps);
            s.position.y = s.origin_y + (time * s.float_speed).sin() * self.amplitude;
            s.position = self.bounds.clamp(s.position);
        }
    }
}

#[inline]
fn wrap_angles(r: Vec3) -> Vec3 {
    Vec3::new(wrap_angle(r.x), wrap_angle(r.y), wrap_angle(r.z))
}

#[inline]
pub(crate) fn wrap_angle(a: f32) -> f32 {
    use std::f32::consts::TAU;
    let w = a.rem_euclid(TAU);
    if w >= TAU { 0.0 } else { w }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Preset, SceneConfig, shape_region};
    use rand::SeedableRng;
    use rand_pcg::Pcg64Mcg;

    fn shapes() -> (Shapes, ShapeConfig) {
        let cfg = SceneConfig::preset(Preset::Synthwave).shapes.unwrap();
        let bounds = Bounds::from(shape_region(&cfg));
        let mut rng = Pcg64Mcg::seed_from_u64(11);
        (Shapes::spawn(&cfg, bounds, &mut rng), cfg)
    }

    #[test]
    fn bobbing_stays_within_amplitude() {
        let (mut shapes, cfg) = shapes();
        for frame in 0..20_000 {
            // large clock values so the slow float speeds cover full periods
            shapes.update(1.0, frame as f32 * 0.5);
            for s in &shapes.items {
                assert!((s.position.y - s.origin_y).abs() <= cfg.float_amplitude + 1e-4);
                assert!(shapes.bounds().contains(s.position));
            }
        }
    }

    #[test]
    fn rotation_stays_wrapped() {
        let (mut shapes, _) = shapes();
        for _ in 0..10_000 {
            shapes.update(3.0, 0.0);
        }
        for s in &shapes.items {
            for a in s.rotation.to_array() {
                assert!((0.0..std::f32::consts::TAU).contains(&a));
            }
        }
    }

    #[test]
    fn spin_is_bounded_by_config() {
        let (shapes, cfg) = shapes();
        assert_eq!(shapes.len(), cfg.count);
        for s in &shapes.items {
            assert!(s.spin.abs().max_element() <= cfg.spin);
            assert!(s.float_speed >= cfg.float_speed[0] && s.float_speed <= cfg.float_speed[1]);
        }
    }
}
