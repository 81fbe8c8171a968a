// bike.rs - Light cycles with fading trails
//
// Bikes ride on the floor plane along one of the four axis directions,
// clamp hard against a square boundary and turn away from it. Each bike
// drags a trail of its recent positions.

use std::collections::VecDeque;

use glam::Vec3;
use rand::Rng;

use crate::color::Rgb;
use crate::config::BikeConfig;
use crate::world::Bounds;

const HEADINGS: [(f32, f32); 4] = [(1.0, 0.0), (-1.0, 0.0), (0.0, 1.0), (0.0, -1.0)];

pub struct Bike {
    pub position: Vec3,
    /// Unit direction on the floor plane (y = 0).
    pub direction: Vec3,
    pub speed: f32,
    pub color: Rgb,
    pub cooldown: f32,
    pub trail: VecDeque<Vec3>,

    // Presentation
    pub yaw: f32,
    pub wheel_spin: f32,
    pub glow: f32,
}

pub struct Bikes {
    pub items: Vec<Bike>,
    cfg: BikeConfig,
    bounds: Bounds,
}

impl Bikes {
    pub fn spawn(cfg: &BikeConfig, bounds: Bounds, rng: &mut impl Rng) -> Self {
        let items = (0..cfg.count)
            .map(|i| {
                let x = (rng.random::<f32>() - 0.5) * 2.0 * cfg.spawn_extent;
                let z = (rng.random::<f32>() - 0.5) * 2.0 * cfg.spawn_extent;

                let raw = Vec3::new(
                    (rng.random::<f32>() - 0.5) * 2.0,
                    0.0,
                    (rng.random::<f32>() - 0.5) * 2.0,
                );
                let direction = if raw.length_squared() > 1e-6 { raw.normalize() } else { Vec3::X };

                let mut trail = VecDeque::with_capacity(cfg.trail_length + 1);
                trail.push_back(Vec3::new(x, cfg.trail_height, z));

                Bike {
                    position: Vec3::new(x, cfg.ride_height, z),
                    direction,
                    speed: rng.random_range(cfg.speed[0]..=cfg.speed[1]),
                    color: Rgb::from_hex(cfg.colors[i % cfg.colors.len()]),
                    cooldown: 0.0,
                    trail,
                    yaw: direction.x.atan2(direction.z),
                    wheel_spin: 0.0,
                    glow: 1.0,
                }
            })
            .collect();

        Self { items, cfg: cfg.clone(), bounds }
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

    /// Advance every bike by `steps` reference frames.
    pub fn update(&mut self, steps: f32, time: f32, rng: &mut impl Rng) {
        let limit = self.cfg.boundary;
        let turn_chance = 1.0 - (1.0 - self.cfg.turn_chance).powf(steps);
        let glow = 0.6 + (time * 3.0).sin() * 0.4;

        for bike in &mut self.items {
            bike.position += bike.direction * bike.speed * steps;

            // Hard constraint: never past the boundary
            let mut hit_wall = false;
            if bike.position.x.abs() > limit {
                bike.position.x = limit.copysign(bike.position.x);
                hit_wall = true;
            }
            if bike.position.z.abs() > limit {
                bike.position.z = limit.copysign(bike.position.z);
                hit_wall = true;
            }

            let random_turn = !hit_wall && bike.cooldown <= 0.0 && rng.random::<f32>() < turn_chance;

            if hit_wall || random_turn {
                bike.direction = pick_heading(bike, &self.cfg, rng);
                bike.cooldown = if random_turn {
                    self.cfg.random_turn_cooldown
                } else {
                    self.cfg.boundary_turn_cooldown
                };
            }

            bike.cooldown = (bike.cooldown - steps).max(0.0);
            bike.position = self.bounds.clamp(bike.position);

            bike.trail.push_back(Vec3::new(bike.position.x, self.cfg.trail_height, bike.position.z));
            while bike.trail.len() > self.cfg.trail_length {
                bike.trail.pop_front();
            }

            bike.yaw = bike.direction.x.atan2(bike.direction.z);
            bike.wheel_spin = (bike.wheel_spin + bike.speed * 2.0 * steps) % std::f32::consts::TAU;
            bike.glow = glow;
        }
    }
}

/// Prefer headings whose probe point stays well inside the boundary,
/// then anything but a U-turn, then anything.
fn pick_heading(bike: &Bike, cfg: &BikeConfig, rng: &mut impl Rng) -> Vec3 {
    let safe = cfg.boundary * cfg.safe_margin;
    let p = bike.position;
    let d = bike.direction;

    let mut options: Vec<(f32, f32)> = HEADINGS
        .iter()
        .copied()
        .filter(|&(tx, tz)| (p.x + tx * cfg.probe).abs() < safe && (p.z + tz * cfg.probe).abs() < safe)
        .collect();

    if options.is_empty() {
        options = HEADINGS
            .iter()
            .copied()
            .filter(|&(tx, tz)| (tx + d.x).abs() > 0.1 || (tz + d.z).abs() > 0.1)
            .collect();
    }
    if options.is_empty() {
        options = HEADINGS.to_vec();
    }

    let (x, z) = options[rng.random_range(0..options.len())];
    Vec3::new(x, 0.0, z)
}

/// Opacity of trail vertex `i` out of `len`; oldest fades out.
#[inline]
pub fn trail_opacity(i: usize, len: usize) -> f32 {
    if len == 0 {
        return 0.0;
    }
    (i as f32 / len as f32).powf(0.3) * 0.9
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Preset, SceneConfig};
    use rand::SeedableRng;
    use rand_pcg::Pcg64Mcg;

    fn fleet(seed: u64) -> (Bikes, BikeConfig) {
        let config = SceneConfig::preset(Preset::HolographicFloor);
        let cfg = config.bikes.clone().unwrap();
        let bounds = Bounds::from(config.bike_region(&cfg));
        let mut rng = Pcg64Mcg::seed_from_u64(seed);
        (Bikes::spawn(&cfg, bounds, &mut rng), cfg)
    }

    #[test]
    fn spawns_inside_spawn_extent_with_unit_direction() {
        let (bikes, cfg) = fleet(3);
        assert_eq!(bikes.len(), cfg.count);
        for b in &bikes.items {
            assert!(b.position.x.abs() <= cfg.spawn_extent);
            assert!(b.position.z.abs() <= cfg.spawn_extent);
            assert!((b.direction.length() - 1.0).abs() < 1e-4);
            assert!(b.speed >= cfg.speed[0] && b.speed <= cfg.speed[1]);
        }
    }

    #[test]
    fn colors_follow_palette_order() {
        let (bikes, cfg) = fleet(4);
        for (i, b) in bikes.items.iter().enumerate() {
            assert_eq!(b.color, Rgb::from_hex(cfg.colors[i % cfg.colors.len()]));
        }
    }

    #[test]
    fn never_leaves_boundary_even_with_big_steps() {
        let (mut bikes, cfg) = fleet(5);
        let mut rng = Pcg64Mcg::seed_from_u64(99);
        for frame in 0..5_000 {
            let steps = if frame % 97 == 0 { 6.0 } else { 1.0 };
            bikes.update(steps, frame as f32 * 0.01, &mut rng);
            for b in &bikes.items {
                assert!(b.position.x.abs() <= cfg.boundary);
                assert!(b.position.z.abs() <= cfg.boundary);
                assert!(bikes.bounds().contains(b.position));
            }
        }
    }

    #[test]
    fn turns_land_on_axis_headings() {
        let (mut bikes, _) = fleet(6);
        let mut rng = Pcg64Mcg::seed_from_u64(7);
        for _ in 0..2_000 {
            bikes.update(1.0, 0.0, &mut rng);
        }
        // after this long every bike has hit a wall or turned at random
        for b in &bikes.items {
            let axis = b.direction.x.abs() == 1.0 || b.direction.z.abs() == 1.0;
            assert!(axis, "{:?}", b.direction);
        }
    }

    #[test]
    fn wall_hit_turns_away_from_the_wall() {
        let (mut bikes, cfg) = fleet(8);
        let mut rng = Pcg64Mcg::seed_from_u64(1);
        {
            let b = &mut bikes.items[0];
            b.position = Vec3::new(cfg.boundary - 0.01, cfg.ride_height, 0.0);
            b.direction = Vec3::X;
            b.speed = 0.1;
        }
        bikes.update(1.0, 0.0, &mut rng);

        let b = &bikes.items[0];
        assert_eq!(b.position.x, cfg.boundary);
        assert_ne!(b.direction, Vec3::X);
        assert_eq!(b.cooldown, cfg.boundary_turn_cooldown - 1.0);
    }

    #[test]
    fn trail_is_capped() {
        let (mut bikes, cfg) = fleet(9);
        let mut rng = Pcg64Mcg::seed_from_u64(2);
        for _ in 0..(cfg.trail_length + 50) {
            bikes.update(1.0, 0.0, &mut rng);
        }
        assert!(bikes.items.iter().all(|b| b.trail.len() == cfg.trail_length));
    }

    #[test]
    fn trail_fades_toward_the_tail() {
        assert_eq!(trail_opacity(0, 300), 0.0);
        assert!(trail_opacity(10, 300) < trail_opacity(200, 300));
        assert!(trail_opacity(299, 300) <= 0.9);
        assert_eq!(trail_opacity(0, 0), 0.0);
    }
}
