// particle.rs - Drifting particle field
//
// Structure-of-Arrays layout; the whole field is uploaded as one vertex
// buffer every frame. Particles with a lifetime are compacted out when
// they expire and respawned so the field keeps its size.

use rand::Rng;

use crate::color::Rgb;
use crate::config::ParticleConfig;
use crate::world::Bounds;

use super::shape::wrap_angle;

pub struct Particles {
    // Position
    pub x: Vec<f32>,
    pub y: Vec<f32>,
    pub z: Vec<f32>,

    // Appearance
    pub color: Vec<Rgb>,

    // Lifetime (seconds)
    pub age: Vec<f32>,
    pub life: Vec<f32>,

    /// Yaw of the whole field.
    pub yaw: f32,

    cfg: ParticleConfig,
    bounds: Bounds,
    expired: u64,
}

impl Particles {
    pub fn spawn(cfg: &ParticleConfig, bounds: Bounds, rng: &mut impl Rng) -> Self {
        let n = cfg.count;
        let mut field = Self {
            x: Vec::with_capacity(n),
            y: Vec::with_capacity(n),
            z: Vec::with_capacity(n),
            color: Vec::with_capacity(n),
            age: Vec::with_capacity(n),
            life: Vec::with_capacity(n),
            yaw: 0.0,
            cfg: cfg.clone(),
            bounds,
            expired: 0,
        };
        field.refill(rng);
        field
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn size(&self) -> f32 {
        self.cfg.size
    }

    pub fn opacity(&self) -> f32 {
        self.cfg.opacity
    }

    /// Particles retired by lifetime since spawn.
    pub fn expired(&self) -> u64 {
        self.expired
    }

    /// Top the field back up to its configured count.
    fn refill(&mut self, rng: &mut impl Rng) {
        let lo = self.bounds.min;
        let hi = self.bounds.max;

        while self.x.len() < self.cfg.count {
            self.x.push(rng.random_range(lo.x..=hi.x));
            self.y.push(rng.random_range(lo.y..=hi.y));
            self.z.push(rng.random_range(lo.z..=hi.z));
            self.color.push(Rgb::from_hex(
                self.cfg.palette[rng.random_range(0..self.cfg.palette.len())],
            ));
            self.age.push(0.0);
            self.life.push(match self.cfg.lifetime {
                Some([a, b]) => rng.random_range(a..=b),
                None => f32::INFINITY,
            });
        }
    }

    pub fn update(&mut self, dt: f32, steps: f32, time: f32, rng: &mut impl Rng) {
        let drift = self.cfg.drift * steps;
        let freq = self.cfg.drift_frequency;
        let flow = self.cfg.flow * steps;

        let mut write = 0;
        for read in 0..self.x.len() {
            let age = self.age[read] + dt;
            if age >= self.life[read] {
                self.expired += 1;
                continue;
            }

            let mut x = self.x[read];
            let mut y = self.y[read];
            let mut z = self.z[read];

            y += (time + x * freq).sin() * drift;
            if flow != 0.0 {
                x += (time * 0.5 + z * 0.01).sin() * flow;
                z += (time * 0.3 + x * 0.01).cos() * flow;
            }

            let p = self.bounds.wrap(glam::Vec3::new(x, y, z));

            self.x[write] = p.x;
            self.y[write] = p.y;
            self.z[write] = p.z;
            self.color[write] = self.color[read];
            self.age[write] = age;
            self.life[write] = self.life[read];
            write += 1;
        }

        self.x.truncate(write);
        self.y.truncate(write);
        self.z.truncate(write);
        self.color.truncate(write);
        self.age.truncate(write);
        self.life.truncate(write);

        self.refill(rng);
        self.yaw = wrap_angle(self.yaw + self.cfg.spin * steps);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Preset, SceneConfig};
    use glam::Vec3;
    use rand::SeedableRng;
    use rand_pcg::Pcg64Mcg;

    fn field(lifetime: Option<[f32; 2]>, flow: f32) -> Particles {
        let mut cfg = SceneConfig::preset(Preset::HolographicFloor).particles.unwrap();
        cfg.lifetime = lifetime;
        cfg.flow = flow;
        // exaggerate drift so wrapping actually happens
        cfg.drift = 0.5;
        let mut rng = Pcg64Mcg::seed_from_u64(21);
        Particles::spawn(&cfg, Bounds::from(cfg.extent), &mut rng)
    }

    #[test]
    fn drifting_particles_wrap_inside_the_field() {
        let mut p = field(None, 0.4);
        let mut rng = Pcg64Mcg::seed_from_u64(1);
        for frame in 0..3_000 {
            p.update(1.0 / 60.0, 1.0, frame as f32 * 0.01, &mut rng);
            for i in 0..p.len() {
                assert!(p.bounds().contains(Vec3::new(p.x[i], p.y[i], p.z[i])));
            }
        }
        assert_eq!(p.expired(), 0);
    }

    #[test]
    fn expired_particles_are_replaced() {
        let mut p = field(Some([0.5, 1.0]), 0.0);
        let count = p.len();
        let mut rng = Pcg64Mcg::seed_from_u64(2);
        for _ in 0..120 {
            p.update(1.0 / 60.0, 1.0, 0.0, &mut rng);
        }
        assert_eq!(p.len(), count);
        assert!(p.expired() >= count as u64);
        assert!(p.age.iter().zip(&p.life).all(|(a, l)| a < l));
    }

    #[test]
    fn field_yaw_advances() {
        let mut p = field(None, 0.0);
        let mut rng = Pcg64Mcg::seed_from_u64(3);
        p.update(1.0 / 60.0, 1.0, 0.0, &mut rng);
        assert!((p.yaw - 0.002).abs() < 1e-6);
    }
}
