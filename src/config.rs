// config.rs - Typed scene configuration
//
// One struct per component. Two presets cover the scene variants the page
// ships: the holographic hero floor and the synthwave background. JSON
// overrides are merged on top of a preset, so a host only sends the fields
// it wants to change.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{EngineError, EngineResult};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Preset {
    #[default]
    HolographicFloor,
    Synthwave,
}

impl std::str::FromStr for Preset {
    type Err = EngineError;

    fn from_str(s: &str) -> EngineResult<Self> {
        match s {
            "holographic-floor" | "holographic" => Ok(Self::HolographicFloor),
            "synthwave" => Ok(Self::Synthwave),
            other => Err(EngineError::config(format!("unknown preset `{other}`"))),
        }
    }
}

/// Axis-aligned box in world units.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoxConfig {
    pub min: [f32; 3],
    pub max: [f32; 3],
}

impl BoxConfig {
    pub const fn new(min: [f32; 3], max: [f32; 3]) -> Self {
        Self { min, max }
    }

    fn is_ordered(&self) -> bool {
        (0..3).all(|i| self.min[i] <= self.max[i])
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub preset: Preset,
    pub canvas_id: String,
    pub seed: u64,
    /// Scene clock advance per 1/60 s frame.
    pub time_step: f32,
    pub bounds: BoxConfig,
    pub ambient: AmbientConfig,
    pub camera: CameraConfig,
    pub light: LightConfig,
    pub grid: GridConfig,
    pub bikes: Option<BikeConfig>,
    pub shapes: Option<ShapeConfig>,
    pub particles: Option<ParticleConfig>,
    pub waves: Option<WaveConfig>,
    pub sun: Option<SunConfig>,
    pub scenery: Option<SceneryConfig>,
    pub parallax: Vec<ParallaxLayerConfig>,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AmbientConfig {
    pub fog_color: u32,
    pub fog_near: f32,
    pub fog_far: f32,
    pub clear_color: u32,
    pub clear_alpha: f32,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CameraConfig {
    pub fov: f32,
    pub near: f32,
    pub far: f32,
    pub position: [f32; 3],
    pub look_at: [f32; 3],
    pub follow: FollowConfig,
}

/// Pointer -> camera mapping: `x = px * range_x`, `y = base_y + py * range_y`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FollowConfig {
    pub range_x: f32,
    pub range_y: f32,
    pub base_y: f32,
    /// Fraction of the remaining distance covered per 1/60 s frame.
    pub smoothing: f32,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LightConfig {
    pub ambient_color: u32,
    pub ambient_intensity: f32,
    pub point: PointLightConfig,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PointLightConfig {
    pub color: u32,
    pub intensity: f32,
    pub distance: f32,
    pub position: [f32; 3],
    /// `[range_x, range_y]` when the light tracks the pointer.
    pub follow: Option<[f32; 2]>,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GridConfig {
    pub size: f32,
    pub divisions: u32,
    pub height: f32,
    pub color: u32,
    pub floor_color: Option<u32>,
    pub base_opacity: f32,
    pub pulse_amplitude: f32,
    pub pulse_frequency: f32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BikeConfig {
    pub count: usize,
    pub colors: Vec<u32>,
    pub spawn_extent: f32,
    pub boundary: f32,
    pub ride_height: f32,
    pub trail_height: f32,
    pub speed: [f32; 2],
    /// Per-frame chance of a random turn while the cooldown is idle.
    pub turn_chance: f32,
    pub random_turn_cooldown: f32,
    pub boundary_turn_cooldown: f32,
    pub probe: f32,
    pub safe_margin: f32,
    pub trail_length: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ShapeKind {
    Box,
    Sphere,
    Cone,
    Octahedron,
    Tetrahedron,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ShapeStyle {
    pub kind: ShapeKind,
    pub color: u32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ShapeConfig {
    pub count: usize,
    pub styles: Vec<ShapeStyle>,
    pub wireframe_chance: f32,
    pub spawn: BoxConfig,
    /// Max |rotation speed| per axis, radians per frame.
    pub spin: f32,
    pub float_speed: [f32; 2],
    pub float_amplitude: f32,
    pub opacity: f32,
    pub emissive: f32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ParticleConfig {
    pub count: usize,
    pub palette: Vec<u32>,
    pub extent: BoxConfig,
    pub drift: f32,
    pub drift_frequency: f32,
    pub flow: f32,
    pub spin: f32,
    pub size: f32,
    pub opacity: f32,
    /// Seconds; `None` keeps particles forever.
    pub lifetime: Option<[f32; 2]>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WaveConfig {
    pub colors: Vec<u32>,
    pub height: f32,
    pub base_speed: f32,
    pub speed_step: f32,
    pub amplitude: f32,
    pub base_opacity: f32,
    pub opacity_falloff: f32,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SunConfig {
    pub center: [f32; 3],
    pub radius: f32,
    pub color: u32,
    pub ring_colors: [u32; 2],
    pub rings: usize,
    pub ring_spacing: f32,
    pub ring_width: f32,
    pub scanlines: usize,
    pub bob: f32,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MountainRange {
    pub distance: f32,
    pub height: f32,
    pub segments: u32,
    pub opacity: f32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SceneryConfig {
    pub base_height: f32,
    pub mountain_color: u32,
    pub outline_color: u32,
    pub mountain_ranges: Vec<MountainRange>,
    pub palm_edge_offset: f32,
    pub palm_scale: [f32; 2],
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ParallaxLayerConfig {
    pub name: String,
    /// Offset in px at full pointer deflection.
    pub strength: f32,
    /// Seconds to settle on a new target.
    pub response: f32,
}

impl ParallaxLayerConfig {
    fn new(name: &str, strength: f32, response: f32) -> Self {
        Self { name: name.to_string(), strength, response }
    }
}

const NEON: [u32; 8] = [
    0x00ffff, 0xff00ff, 0xff0080, 0x39ff14, 0xffff00, 0xff4500, 0x8a2be2, 0x00ff80,
];

impl Default for SceneConfig {
    fn default() -> Self {
        Self::preset(Preset::HolographicFloor)
    }
}

impl SceneConfig {
    pub fn preset(preset: Preset) -> Self {
        match preset {
            Preset::HolographicFloor => Self::holographic_floor(),
            Preset::Synthwave => Self::synthwave(),
        }
    }

    fn holographic_floor() -> Self {
        Self {
            preset: Preset::HolographicFloor,
            canvas_id: "hero-3d-floor".to_string(),
            seed: 0x5EED_F100,
            time_step: 0.01,
            bounds: BoxConfig::new([-100.0, -10.0, -100.0], [100.0, 60.0, 100.0]),
            ambient: AmbientConfig {
                fog_color: 0x000000,
                fog_near: 50.0,
                fog_far: 200.0,
                clear_color: 0x000000,
                clear_alpha: 0.0,
            },
            camera: CameraConfig {
                fov: 75.0,
                near: 0.1,
                far: 1000.0,
                position: [0.0, 8.0, 25.0],
                look_at: [0.0, -5.0, -20.0],
                follow: FollowConfig { range_x: 5.0, range_y: 3.0, base_y: 5.0, smoothing: 0.05 },
            },
            light: LightConfig {
                ambient_color: 0x404040,
                ambient_intensity: 0.4,
                point: PointLightConfig {
                    color: 0x00ffff,
                    intensity: 2.0,
                    distance: 100.0,
                    position: [0.0, 10.0, 0.0],
                    follow: None,
                },
            },
            grid: GridConfig {
                size: 70.0,
                divisions: 35,
                height: -5.0,
                color: 0xff0080,
                floor_color: Some(0x1a0d26),
                base_opacity: 0.8,
                pulse_amplitude: 0.2,
                pulse_frequency: 1.5,
            },
            bikes: Some(BikeConfig {
                count: 8,
                colors: NEON.to_vec(),
                spawn_extent: 25.0,
                boundary: 30.0,
                ride_height: -4.3,
                trail_height: -4.5,
                speed: [0.08, 0.14],
                turn_chance: 0.008,
                random_turn_cooldown: 120.0,
                boundary_turn_cooldown: 30.0,
                probe: 5.0,
                safe_margin: 0.9,
                trail_length: 300,
            }),
            shapes: None,
            particles: Some(ParticleConfig {
                count: 50,
                palette: vec![0xff00ff, 0x00ffff, 0xff0080],
                extent: BoxConfig::new([-30.0, -3.0, -30.0], [30.0, 5.0, 30.0]),
                drift: 0.01,
                drift_frequency: 1.0,
                flow: 0.0,
                spin: 0.002,
                size: 0.1,
                opacity: 0.8,
                lifetime: None,
            }),
            waves: Some(WaveConfig {
                colors: vec![0xff00ff, 0x00ffff, 0xff0080],
                height: -4.8,
                base_speed: 0.02,
                speed_step: 0.01,
                amplitude: 0.5,
                base_opacity: 0.6,
                opacity_falloff: 0.2,
            }),
            sun: Some(SunConfig {
                center: [0.0, 2.0, -55.0],
                radius: 8.0,
                color: 0xff0080,
                ring_colors: [0xff00ff, 0xff0080],
                rings: 5,
                ring_spacing: 1.5,
                ring_width: 0.3,
                scanlines: 15,
                bob: 0.5,
            }),
            scenery: Some(SceneryConfig {
                base_height: -5.0,
                mountain_color: 0x1a0d26,
                outline_color: 0xff0080,
                mountain_ranges: vec![
                    MountainRange { distance: 45.0, height: 20.0, segments: 6, opacity: 0.9 },
                    MountainRange { distance: 65.0, height: 35.0, segments: 8, opacity: 0.7 },
                    MountainRange { distance: 85.0, height: 45.0, segments: 10, opacity: 0.5 },
                ],
                palm_edge_offset: 8.0,
                palm_scale: [0.6, 0.9],
            }),
            parallax: Self::page_parallax(),
        }
    }

    fn synthwave() -> Self {
        Self {
            preset: Preset::Synthwave,
            canvas_id: "synthwave-canvas".to_string(),
            seed: 0x5EED_5A7E,
            time_step: 0.01,
            bounds: BoxConfig::new([-100.0, -10.0, -100.0], [100.0, 100.0, 100.0]),
            ambient: AmbientConfig {
                fog_color: 0x000011,
                fog_near: 50.0,
                fog_far: 200.0,
                clear_color: 0x000000,
                clear_alpha: 0.0,
            },
            camera: CameraConfig {
                fov: 75.0,
                near: 0.1,
                far: 1000.0,
                position: [0.0, 20.0, 50.0],
                look_at: [0.0, 0.0, 0.0],
                follow: FollowConfig { range_x: 10.0, range_y: -5.0, base_y: 20.0, smoothing: 0.02 },
            },
            light: LightConfig {
                ambient_color: 0x404040,
                ambient_intensity: 0.4,
                point: PointLightConfig {
                    color: 0xff0080,
                    intensity: 2.0,
                    distance: 100.0,
                    position: [0.0, 20.0, 30.0],
                    follow: Some([50.0, -30.0]),
                },
            },
            grid: GridConfig {
                size: 100.0,
                divisions: 50,
                height: -10.0,
                color: 0xff00ff,
                floor_color: None,
                base_opacity: 0.6,
                pulse_amplitude: 0.2,
                pulse_frequency: 2.0,
            },
            bikes: None,
            shapes: Some(ShapeConfig {
                count: 15,
                styles: vec![
                    ShapeStyle { kind: ShapeKind::Box, color: 0xff00ff },
                    ShapeStyle { kind: ShapeKind::Sphere, color: 0x00ffff },
                    ShapeStyle { kind: ShapeKind::Cone, color: 0xff0080 },
                    ShapeStyle { kind: ShapeKind::Octahedron, color: 0x8a2be2 },
                ],
                wireframe_chance: 0.5,
                spawn: BoxConfig::new([-50.0, 5.0, -50.0], [50.0, 35.0, 50.0]),
                spin: 0.01,
                float_speed: [0.01, 0.03],
                float_amplitude: 3.0,
                opacity: 0.8,
                emissive: 0.2,
            }),
            particles: Some(ParticleConfig {
                count: 1000,
                palette: vec![0xff00ff, 0x00ffff, 0xff0080, 0x8a2be2],
                extent: BoxConfig::new([-70.0, 0.0, -70.0], [70.0, 100.0, 70.0]),
                drift: 0.01,
                drift_frequency: 0.01,
                flow: 0.0,
                spin: 0.001,
                size: 0.5,
                opacity: 0.8,
                lifetime: None,
            }),
            waves: None,
            sun: None,
            scenery: None,
            parallax: Self::page_parallax(),
        }
    }

    fn page_parallax() -> Vec<ParallaxLayerConfig> {
        vec![
            ParallaxLayerConfig::new("bg-shapes", 30.0, 1.5),
            ParallaxLayerConfig::new("bg-particles", 15.0, 2.0),
            ParallaxLayerConfig::new("bg-lines", 10.0, 2.5),
            ParallaxLayerConfig::new("floating-shapes", 20.0, 1.0),
            ParallaxLayerConfig::new("particles", 10.0, 1.5),
        ]
    }

    /// Parse a JSON override. The `preset` field (if any) picks the base
    /// config; every other field replaces the matching preset value.
    pub fn from_json(json: &str) -> EngineResult<Self> {
        let patch: Value = serde_json::from_str(json)?;
        let preset = match patch.get("preset") {
            Some(p) => serde_json::from_value(p.clone())?,
            None => Preset::default(),
        };

        let mut base = serde_json::to_value(Self::preset(preset))?;
        merge(&mut base, patch);

        let config: Self = serde_json::from_value(base)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> EngineResult<()> {
        if self.canvas_id.is_empty() {
            return Err(EngineError::config("canvas_id is empty"));
        }
        if !self.bounds.is_ordered() {
            return Err(EngineError::config("bounds min exceeds max"));
        }
        if !(self.time_step > 0.0) {
            return Err(EngineError::config("time_step must be positive"));
        }
        if !(self.camera.follow.smoothing > 0.0 && self.camera.follow.smoothing <= 1.0) {
            return Err(EngineError::config("camera smoothing must be in (0, 1]"));
        }
        if self.grid.divisions == 0 {
            return Err(EngineError::config("grid needs at least one division"));
        }

        if let Some(b) = &self.bikes {
            if b.count > 0 && b.colors.is_empty() {
                return Err(EngineError::config("bikes need at least one color"));
            }
            ordered("bikes.speed", b.speed)?;
            if b.spawn_extent > b.boundary {
                return Err(EngineError::config("bikes spawn outside their boundary"));
            }
            if b.trail_length < 2 {
                return Err(EngineError::config("bike trails need at least two points"));
            }
            let region = self.bike_region(b);
            if !self.contains(&region) {
                return Err(EngineError::config("bike boundary exceeds scene bounds"));
            }
        }

        if let Some(s) = &self.shapes {
            if s.count > 0 && s.styles.is_empty() {
                return Err(EngineError::config("shapes need at least one style"));
            }
            ordered("shapes.float_speed", s.float_speed)?;
            if !s.spawn.is_ordered() {
                return Err(EngineError::config("shapes spawn box min exceeds max"));
            }
            if !self.contains(&shape_region(s)) {
                return Err(EngineError::config("shape region exceeds scene bounds"));
            }
        }

        if let Some(p) = &self.particles {
            if p.count > 0 && p.palette.is_empty() {
                return Err(EngineError::config("particles need at least one color"));
            }
            if !p.extent.is_ordered() {
                return Err(EngineError::config("particle extent min exceeds max"));
            }
            if let Some(life) = p.lifetime {
                ordered("particles.lifetime", life)?;
                if !(life[0] > 0.0) {
                    return Err(EngineError::config("particle lifetime must be positive"));
                }
            }
            if !self.contains(&swept_extent(&p.extent)) {
                return Err(EngineError::config("particle extent exceeds scene bounds once spun"));
            }
        }

        if let Some(w) = &self.waves {
            if w.colors.is_empty() {
                return Err(EngineError::config("waves need at least one color"));
            }
        }

        if let Some(s) = &self.scenery {
            ordered("scenery.palm_scale", s.palm_scale)?;
        }

        if self.parallax.iter().any(|l| !(l.response > 0.0)) {
            return Err(EngineError::config("parallax response must be positive"));
        }

        Ok(())
    }

    pub(crate) fn bike_region(&self, b: &BikeConfig) -> BoxConfig {
        let lo = b.ride_height.min(b.trail_height);
        let hi = b.ride_height.max(b.trail_height);
        BoxConfig::new([-b.boundary, lo, -b.boundary], [b.boundary, hi, b.boundary])
    }

    fn contains(&self, inner: &BoxConfig) -> bool {
        (0..3).all(|i| inner.min[i] >= self.bounds.min[i] && inner.max[i] <= self.bounds.max[i])
    }
}

/// Region a floating shape can reach: its spawn box widened by the float
/// amplitude on y.
pub(crate) fn shape_region(s: &ShapeConfig) -> BoxConfig {
    let mut region = s.spawn;
    region.min[1] -= s.float_amplitude.abs();
    region.max[1] += s.float_amplitude.abs();
    region
}

/// Region a spinning particle field can reach: the extent swept through a
/// full turn about the y axis.
pub(crate) fn swept_extent(extent: &BoxConfig) -> BoxConfig {
    let rx = extent.min[0].abs().max(extent.max[0].abs());
    let rz = extent.min[2].abs().max(extent.max[2].abs());
    let r = rx.hypot(rz);
    BoxConfig::new([-r, extent.min[1], -r], [r, extent.max[1], r])
}

fn ordered(name: &str, range: [f32; 2]) -> EngineResult<()> {
    if range[0] <= range[1] {
        Ok(())
    } else {
        Err(EngineError::config(format!("{name} range is inverted")))
    }
}

fn merge(base: &mut Value, patch: Value) {
    match (base, patch) {
        (Value::Object(base), Value::Object(patch)) => {
            for (key, value) in patch {
                match base.get_mut(&key) {
                    Some(slot) if slot.is_object() && value.is_object() => merge(slot, value),
                    _ => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => *slot = value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_validate() {
        SceneConfig::preset(Preset::HolographicFloor).validate().unwrap();
        SceneConfig::preset(Preset::Synthwave).validate().unwrap();
    }

    #[test]
    fn json_overrides_merge_onto_preset() {
        let config = SceneConfig::from_json(
            r#"{ "preset": "synthwave", "seed": 7, "camera": { "fov": 60.0 } }"#,
        )
        .unwrap();

        assert_eq!(config.preset, Preset::Synthwave);
        assert_eq!(config.seed, 7);
        assert_eq!(config.camera.fov, 60.0);
        // Untouched nested fields keep the preset value.
        assert_eq!(config.camera.follow.range_x, 10.0);
        assert_eq!(config.shapes.as_ref().map(|s| s.count), Some(15));
    }

    #[test]
    fn empty_json_is_the_default_preset() {
        assert_eq!(SceneConfig::from_json("{}").unwrap(), SceneConfig::default());
    }

    #[test]
    fn disabling_a_component_with_null() {
        let config = SceneConfig::from_json(r#"{ "bikes": null }"#).unwrap();
        assert!(config.bikes.is_none());
    }

    #[test]
    fn rejects_inverted_ranges() {
        let err = SceneConfig::from_json(r#"{ "bikes": { "speed": [0.5, 0.1] } }"#).unwrap_err();
        assert!(err.to_string().contains("bikes.speed"));
    }

    #[test]
    fn rejects_bike_boundary_outside_bounds() {
        let mut config = SceneConfig::default();
        config.bounds = BoxConfig::new([-10.0, -10.0, -10.0], [10.0, 10.0, 10.0]);
        assert!(config.validate().is_err());
    }

    #[test]
    fn particle_extent_checked_after_spin() {
        let mut config = SceneConfig::preset(Preset::Synthwave);
        let p = config.particles.as_mut().unwrap();
        // fits unrotated, but its corners leave the bounds at 45 degrees
        p.extent = BoxConfig::new([-100.0, 0.0, -100.0], [100.0, 100.0, 100.0]);
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("particle extent"));

        let swept = swept_extent(&BoxConfig::new([-30.0, -3.0, -40.0], [20.0, 5.0, 10.0]));
        assert_eq!(swept.max, [50.0, 5.0, 50.0]);
        assert_eq!(swept.min, [-50.0, -3.0, -50.0]);
    }

    #[test]
    fn rejects_unknown_preset() {
        assert!(SceneConfig::from_json(r#"{ "preset": "vaporwave" }"#).is_err());
        assert!("vaporwave".parse::<Preset>().is_err());
        assert_eq!("synthwave".parse::<Preset>().unwrap(), Preset::Synthwave);
    }
}
