// scenery.rs - Static set dressing
//
// Procedural placement of the props that never move after setup:
// floor planes, grid lines, wireframe mountain ranges, palm trees.
// Randomness only perturbs rotation and scale so the silhouette stays
// recognizable between seeds.

use glam::Vec3;
use rand::Rng;

use crate::color::Rgb;
use crate::config::{GridConfig, SceneryConfig};

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PropKind {
    Floor { size: f32 },
    Mountain { radius: f32, height: f32, segments: u32 },
    PalmTree { fronds: u32 },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Prop {
    pub kind: PropKind,
    pub position: Vec3,
    pub yaw: f32,
    pub scale: Vec3,
    pub color: Rgb,
    pub outline: Option<Rgb>,
    pub opacity: f32,
}

const PALM_FRONDS: u32 = 6;
const MOUNTAIN_SPAN: f32 = 120.0;

/// Solid floor under the grid plus a wider translucent overlay below it.
pub fn floor_planes(grid: &GridConfig) -> Vec<Prop> {
    let Some(color) = grid.floor_color else {
        return Vec::new();
    };

    vec![
        Prop {
            kind: PropKind::Floor { size: grid.size },
            position: Vec3::new(0.0, grid.height - 0.01, 0.0),
            yaw: 0.0,
            scale: Vec3::ONE,
            color: Rgb::from_hex(color),
            outline: None,
            opacity: 1.0,
        },
        Prop {
            kind: PropKind::Floor { size: grid.size * 1.2 },
            position: Vec3::new(0.0, grid.height - 0.02, 0.0),
            yaw: 0.0,
            scale: Vec3::ONE,
            color: Rgb::from_hex(0x0a0a0a),
            outline: None,
            opacity: 0.6,
        },
    ]
}

/// Line segments of a square grid centered on the origin.
pub fn grid_segments(grid: &GridConfig) -> Vec<(Vec3, Vec3)> {
    let half = grid.size / 2.0;
    let step = grid.size / grid.divisions as f32;
    let y = grid.height;

    let mut out = Vec::with_capacity((grid.divisions as usize + 1) * 2);
    for i in 0..=grid.divisions {
        let k = i as f32 * step - half;
        out.push((Vec3::new(-half, y, k), Vec3::new(half, y, k)));
        out.push((Vec3::new(k, y, -half), Vec3::new(k, y, half)));
    }
    out
}

/// Mountain ranges on both flanks; farther ranges get more peaks.
pub fn mountains(cfg: &SceneryConfig, rng: &mut impl Rng) -> Vec<Prop> {
    let mut out = Vec::new();

    for side in [-1.0f32, 1.0] {
        for (r, range) in cfg.mountain_ranges.iter().enumerate() {
            let count = 4 + r;
            for i in 0..count {
                let z = -MOUNTAIN_SPAN / 2.0 + i as f32 * (MOUNTAIN_SPAN / count as f32);
                out.push(Prop {
                    kind: PropKind::Mountain {
                        radius: range.height * 0.7,
                        height: range.height,
                        segments: range.segments,
                    },
                    position: Vec3::new(side * range.distance, cfg.base_height, z),
                    yaw: (rng.random::<f32>() - 0.5) * 0.3,
                    scale: Vec3::new(
                        0.7 + rng.random::<f32>() * 0.6,
                        0.8 + rng.random::<f32>() * 0.6,
                        1.0,
                    ),
                    color: Rgb::from_hex(cfg.mountain_color),
                    outline: Some(Rgb::from_hex(cfg.outline_color)),
                    opacity: range.opacity,
                });
            }
        }
    }

    out
}

/// Palm trees around the edge of the grid, clear of the riding area and
/// of the mountain flanks.
pub fn palm_trees(grid_size: f32, cfg: &SceneryConfig, rng: &mut impl Rng) -> Vec<Prop> {
    let edge = grid_size / 2.0 + cfg.palm_edge_offset;
    let spots = [
        (-edge, edge),
        (edge, edge),
        (-20.0, edge),
        (20.0, edge),
        (-25.0, -edge),
        (25.0, -edge),
        (-edge, 15.0),
        (-36.0, -5.0),
        (edge, 15.0),
        (36.0, -5.0),
    ];

    spots
        .iter()
        .map(|&(x, z)| {
            let s = rng.random_range(cfg.palm_scale[0]..=cfg.palm_scale[1]);
            Prop {
                kind: PropKind::PalmTree { fronds: PALM_FRONDS },
                position: Vec3::new(x, cfg.base_height, z),
                yaw: (rng.random::<f32>() - 0.5) * std::f32::consts::PI * 0.4,
                scale: Vec3::splat(s),
                color: Rgb::from_hex(0x8a2be2),
                outline: Some(Rgb::from_hex(0xff0080)),
                opacity: 0.8,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Preset, SceneConfig};
    use rand::SeedableRng;
    use rand_pcg::Pcg64Mcg;

    #[test]
    fn grid_has_two_lines_per_division_step() {
        let grid = SceneConfig::preset(Preset::HolographicFloor).grid;
        let lines = grid_segments(&grid);
        assert_eq!(lines.len(), (grid.divisions as usize + 1) * 2);
        assert!(lines.iter().all(|(a, b)| a.y == grid.height && b.y == grid.height));
    }

    #[test]
    fn mountain_count_grows_with_distance() {
        let config = SceneConfig::preset(Preset::HolographicFloor);
        let scenery = config.scenery.unwrap();
        let mut rng = Pcg64Mcg::seed_from_u64(1);
        // (4 + 5 + 6) peaks per flank
        assert_eq!(mountains(&scenery, &mut rng).len(), 30);
    }

    #[test]
    fn palms_stay_off_the_riding_area() {
        let config = SceneConfig::preset(Preset::HolographicFloor);
        let scenery = config.scenery.unwrap();
        let boundary = config.bikes.unwrap().boundary;
        let mut rng = Pcg64Mcg::seed_from_u64(2);

        for palm in palm_trees(config.grid.size, &scenery, &mut rng) {
            let p = palm.position;
            assert!(p.x.abs() > boundary || p.z.abs() > boundary, "{p:?}");
            assert!(palm.scale.x >= 0.6 && palm.scale.x <= 0.9);
        }
    }

    #[test]
    fn synthwave_has_no_floor() {
        let grid = SceneConfig::preset(Preset::Synthwave).grid;
        assert!(floor_planes(&grid).is_empty());
    }
}
