// pulse.rs - Stationary agents driven only by the scene clock
//
// Energy waves, the horizon sun with its rings, and the grid glow. None
// of these move across the floor; they breathe.

use glam::Vec3;

use crate::color::Rgb;
use crate::config::{GridConfig, SunConfig, WaveConfig};

use super::shape::wrap_angle;

pub struct Wave {
    pub color: Rgb,
    pub speed: f32,
    pub phase: f32,
    pub scale: f32,
    pub opacity: f32,
}

pub struct Waves {
    pub items: Vec<Wave>,
    pub height: f32,
    amplitude: f32,
    base_opacity: f32,
    falloff: f32,
}

impl Waves {
    pub fn new(cfg: &WaveConfig) -> Self {
        let n = cfg.colors.len();
        let items = cfg
            .colors
            .iter()
            .enumerate()
            .map(|(i, &hex)| Wave {
                color: Rgb::from_hex(hex),
                speed: cfg.base_speed + i as f32 * cfg.speed_step,
                phase: i as f32 * std::f32::consts::TAU / n as f32,
                scale: 1.0,
                opacity: cfg.base_opacity,
            })
            .collect();

        Self {
            items,
            height: cfg.height,
            amplitude: cfg.amplitude,
            base_opacity: cfg.base_opacity,
            falloff: cfg.opacity_falloff,
        }
    }

    pub fn update(&mut self, time: f32) {
        for w in &mut self.items {
            w.scale = 1.0 + (time * w.speed + w.phase).sin() * self.amplitude;
            w.opacity = (self.base_opacity - w.scale * self.falloff).clamp(0.0, 1.0);
        }
    }
}

pub struct SunRing {
    pub radius: f32,
    pub width: f32,
    pub color: Rgb,
    pub opacity: f32,
    pub spin: f32,
}

pub struct Sun {
    pub center: Vec3,
    pub radius: f32,
    pub color: Rgb,
    pub opacity: f32,
    /// Vertical bob applied to disc, rings and scanlines together.
    pub offset_y: f32,
    pub rings: Vec<SunRing>,
    pub scanlines: usize,
    bob: f32,
}

impl Sun {
    pub fn new(cfg: &SunConfig) -> Self {
        let rings = (0..cfg.rings)
            .map(|i| {
                let n = i + 1;
                SunRing {
                    radius: cfg.radius + n as f32 * cfg.ring_spacing,
                    width: cfg.ring_width,
                    color: Rgb::from_hex(cfg.ring_colors[n % 2]),
                    opacity: ring_base_opacity(i),
                    spin: 0.0,
                }
            })
            .collect();

        Self {
            center: Vec3::from(cfg.center),
            radius: cfg.radius,
            color: Rgb::from_hex(cfg.color),
            opacity: 0.8,
            offset_y: 0.0,
            rings,
            scanlines: cfg.scanlines,
            bob: cfg.bob,
        }
    }

    pub fn update(&mut self, steps: f32, time: f32) {
        self.opacity = 0.8 + (time * 0.5).sin() * 0.2;

        for (i, ring) in self.rings.iter_mut().enumerate() {
            let i = i as f32;
            ring.opacity = (ring_base_opacity(i as usize) + (time * 0.3 + i * 0.5).sin() * 0.1).clamp(0.0, 1.0);
            ring.spin = wrap_angle(ring.spin + 0.001 * (i + 1.0) * steps);
        }

        self.offset_y = (time * 0.1).sin() * self.bob;
    }

    /// Scanline centers, bottom to top, relative to the sun center.
    pub fn scanline_offsets(&self) -> impl Iterator<Item = f32> + '_ {
        let half = self.scanlines as f32 / 2.0;
        (0..self.scanlines).map(move |i| (i as f32 - half) * 1.2)
    }
}

#[inline]
fn ring_base_opacity(i: usize) -> f32 {
    (0.6 - i as f32 * 0.1).max(0.0)
}

pub struct GridPulse {
    pub color: Rgb,
    pub opacity: f32,
    base: f32,
    amplitude: f32,
    frequency: f32,
}

impl GridPulse {
    pub fn new(cfg: &GridConfig) -> Self {
        Self {
            color: Rgb::from_hex(cfg.color),
            opacity: cfg.base_opacity,
            base: cfg.base_opacity,
            amplitude: cfg.pulse_amplitude,
            frequency: cfg.pulse_frequency,
        }
    }

    pub fn update(&mut self, time: f32) {
        self.opacity = (self.base + (time * self.frequency).sin() * self.amplitude).clamp(0.0, 1.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Preset, SceneConfig};

    #[test]
    fn wave_opacity_tracks_scale() {
        let cfg = SceneConfig::preset(Preset::HolographicFloor).waves.unwrap();
        let mut waves = Waves::new(&cfg);
        for step in 0..2_000 {
            waves.update(step as f32 * 0.37);
            for w in &waves.items {
                assert!(w.scale >= 0.5 - 1e-5 && w.scale <= 1.5 + 1e-5);
                assert!((w.opacity - (0.6 - w.scale * 0.2)).abs() < 1e-5);
            }
        }
    }

    #[test]
    fn waves_are_phase_shifted_thirds() {
        let cfg = SceneConfig::preset(Preset::HolographicFloor).waves.unwrap();
        let waves = Waves::new(&cfg);
        let third = std::f32::consts::TAU / 3.0;
        assert!((waves.items[1].phase - third).abs() < 1e-6);
        assert!((waves.items[2].phase - 2.0 * third).abs() < 1e-6);
    }

    #[test]
    fn sun_breathes_around_its_base() {
        let cfg = SceneConfig::preset(Preset::HolographicFloor).sun.unwrap();
        let mut sun = Sun::new(&cfg);
        assert_eq!(sun.rings.len(), 5);
        for step in 0..1_000 {
            sun.update(1.0, step as f32 * 0.1);
            assert!(sun.opacity >= 0.6 - 1e-5 && sun.opacity <= 1.0 + 1e-5);
            assert!(sun.offset_y.abs() <= cfg.bob + 1e-5);
        }
        // outer rings are fainter at rest
        assert!(ring_base_opacity(0) > ring_base_opacity(4));
    }

    #[test]
    fn scanlines_are_centered() {
        let cfg = SceneConfig::preset(Preset::HolographicFloor).sun.unwrap();
        let sun = Sun::new(&cfg);
        let offsets: Vec<f32> = sun.scanline_offsets().collect();
        assert_eq!(offsets.len(), 15);
        assert!((offsets[0] + 9.0).abs() < 1e-5);
    }

    #[test]
    fn grid_glow_is_clamped() {
        let mut cfg = SceneConfig::preset(Preset::HolographicFloor).grid;
        cfg.pulse_amplitude = 0.5;
        let mut grid = GridPulse::new(&cfg);
        for step in 0..500 {
            grid.update(step as f32 * 0.05);
            assert!((0.0..=1.0).contains(&grid.opacity));
        }
    }
}
