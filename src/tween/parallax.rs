// parallax.rs - Pointer parallax for page layers
//
// Each layer chases `pointer * strength` with exponential smoothing; the
// response time is how long it takes to get most of the way there.

use glam::Vec2;

use crate::config::ParallaxLayerConfig;

use super::stage::ElementId;

/// Fraction of the distance left after `response` seconds is e^-SETTLE.
const SETTLE: f32 = 3.0;

#[derive(Clone, Debug)]
pub struct ParallaxLayer {
    pub name: String,
    pub offset: Vec2,
    strength: f32,
    response: f32,
    target: Vec2,
    element: Option<ElementId>,
}

impl ParallaxLayer {
    pub fn element(&self) -> Option<ElementId> {
        self.element
    }

    pub fn target(&self) -> Vec2 {
        self.target
    }
}

#[derive(Clone, Debug, Default)]
pub struct Parallax {
    layers: Vec<ParallaxLayer>,
}

impl Parallax {
    pub fn new(cfg: &[ParallaxLayerConfig]) -> Self {
        let layers = cfg
            .iter()
            .map(|c| ParallaxLayer {
                name: c.name.clone(),
                offset: Vec2::ZERO,
                strength: c.strength,
                response: c.response,
                target: Vec2::ZERO,
                element: None,
            })
            .collect();
        Self { layers }
    }

    /// Bind the layer called `name` to a page element. Returns false if
    /// no such layer is configured.
    pub fn attach(&mut self, name: &str, id: ElementId) -> bool {
        match self.layers.iter_mut().find(|l| l.name == name) {
            Some(layer) => {
                layer.element = Some(id);
                true
            }
            None => false,
        }
    }

    /// `centered` is the pointer in [-1, 1], y down.
    pub fn aim(&mut self, centered: Vec2) {
        for layer in &mut self.layers {
            layer.target = centered * layer.strength;
        }
    }

    pub fn update(&mut self, dt: f32) {
        let dt = dt.max(0.0);
        for layer in &mut self.layers {
            let k = 1.0 - (-dt * SETTLE / layer.response).exp();
            layer.offset += (layer.target - layer.offset) * k;
        }
    }

    pub fn layers(&self) -> &[ParallaxLayer] {
        &self.layers
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SceneConfig;

    fn page() -> Parallax {
        Parallax::new(&SceneConfig::default().parallax)
    }

    #[test]
    fn layers_scale_by_strength() {
        let mut p = page();
        p.aim(Vec2::new(1.0, -0.5));
        let bg = &p.layers()[0];
        assert_eq!(bg.name, "bg-shapes");
        assert_eq!(bg.target(), Vec2::new(30.0, -15.0));
    }

    #[test]
    fn faster_layers_settle_first() {
        let mut p = page();
        p.aim(Vec2::ONE);
        for _ in 0..30 {
            p.update(1.0 / 60.0);
        }
        let progress = |i: usize| {
            let l = &p.layers()[i];
            l.offset.x / l.target().x
        };
        // floating-shapes (1 s) ahead of bg-lines (2.5 s)
        assert!(progress(3) > progress(2));

        for _ in 0..600 {
            p.update(1.0 / 60.0);
        }
        for l in p.layers() {
            assert!((l.offset - l.target()).length() < 0.01, "{}", l.name);
        }
    }

    #[test]
    fn attach_by_name() {
        let mut p = page();
        assert!(p.attach("bg-lines", ElementId(7)));
        assert!(!p.attach("nope", ElementId(8)));
        assert_eq!(p.layers()[2].element(), Some(ElementId(7)));
    }
}
