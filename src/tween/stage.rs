// stage.rs - Page elements and the tweens that drive them
//
// The host registers each animated DOM element once. From then on the
// stage is the only writer of their visual state; the host copies the
// records out after every tick.

use std::collections::BTreeMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::ParallaxLayerConfig;
use crate::error::EngineError;
use crate::frame::Tick;
use crate::input::{Pointer, Viewport};

use super::hover::{self, HoverEffect};
use super::parallax::Parallax;
use super::props::{Channel, Props, Visual};
use super::scroll::{Scrub, ScrollTrigger};
use super::timeline::Timeline;
use super::tween::{Tween, TweenSpec};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub(crate) u32);

impl ElementId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ElementKind {
    Page,
    Hero,
    HeroText,
    HeroShape,
    HeroParticle,
    CtaButton,
    NavLink,
    Section,
    SkillTag,
    ProjectCard,
    ProjectLink,
    BgShape,
    BgParticle,
    BgGrid,
    GridOverlay,
    /// Container moved by pointer parallax.
    Layer,
}

impl FromStr for ElementKind {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        serde_json::from_value(serde_json::Value::String(s.to_string()))
            .map_err(|_| EngineError::config(format!("unknown element kind `{s}`")))
    }
}

#[derive(Clone, Debug)]
pub struct Element {
    pub name: String,
    pub kind: ElementKind,
    pub parent: Option<ElementId>,
    /// Document offset of the top edge, px.
    pub top: f32,
    pub height: f32,
    /// Resting state; hover-out tweens return here.
    pub baseline: Visual,
    pub visual: Visual,
}

pub struct Stage {
    elements: Vec<Element>,
    tweens: Vec<Tween>,
    triggers: Vec<ScrollTrigger>,
    scrubs: Vec<Scrub>,
    parallax: Parallax,
    viewport: Viewport,
    scroll_y: f32,
}

impl Stage {
    pub fn new(viewport: Viewport, layers: &[ParallaxLayerConfig]) -> Self {
        Self {
            elements: Vec::new(),
            tweens: Vec::new(),
            triggers: Vec::new(),
            scrubs: Vec::new(),
            parallax: Parallax::new(layers),
            viewport,
            scroll_y: 0.0,
        }
    }

    pub fn add_element(&mut self, name: &str, kind: ElementKind, top: f32, height: f32) -> ElementId {
        self.insert(name, kind, None, top, height)
    }

    pub fn add_child(&mut self, parent: ElementId, name: &str, kind: ElementKind, top: f32, height: f32) -> ElementId {
        let parent = self.element(parent).map(|_| parent);
        self.insert(name, kind, parent, top, height)
    }

    fn insert(&mut self, name: &str, kind: ElementKind, parent: Option<ElementId>, top: f32, height: f32) -> ElementId {
        let id = ElementId(self.elements.len() as u32);
        self.elements.push(Element {
            name: name.to_string(),
            kind,
            parent,
            top,
            height: height.max(0.0),
            baseline: Visual::default(),
            visual: Visual::default(),
        });
        if kind == ElementKind::Layer && !self.parallax.attach(name, id) {
            debug!(name, "layer has no parallax config");
        }
        id
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn element(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(id.index())
    }

    pub fn elements(&self) -> impl Iterator<Item = (ElementId, &Element)> {
        self.elements.iter().enumerate().map(|(i, e)| (ElementId(i as u32), e))
    }

    pub fn find(&self, name: &str) -> Option<ElementId> {
        self.elements.iter().position(|e| e.name == name).map(|i| ElementId(i as u32))
    }

    /// All elements of `kind`, in registration order.
    pub fn of_kind(&self, kind: ElementKind) -> Vec<ElementId> {
        self.elements().filter(|(_, e)| e.kind == kind).map(|(id, _)| id).collect()
    }

    pub fn children(&self, parent: ElementId) -> Vec<ElementId> {
        self.elements().filter(|(_, e)| e.parent == Some(parent)).map(|(id, _)| id).collect()
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn scroll_y(&self) -> f32 {
        self.scroll_y
    }

    pub fn parallax(&self) -> &Parallax {
        &self.parallax
    }

    /// Tweens and scroll triggers that still have frames to play.
    pub fn active_tweens(&self) -> usize {
        self.tweens.len() + self.triggers.iter().filter(|t| t.is_running()).count()
    }

    /// Write `props` now, without a tween.
    pub fn set(&mut self, id: ElementId, props: Props) {
        match self.elements.get_mut(id.index()) {
            Some(el) => props.apply(&mut el.visual),
            None => warn!(?id, "set on unknown element"),
        }
    }

    /// Start a tween on `id`, taking over any properties that older
    /// tweens on the same element are animating.
    pub fn to(&mut self, id: ElementId, spec: TweenSpec) -> bool {
        let Some(el) = self.elements.get_mut(id.index()) else {
            warn!(?id, "tween on unknown element");
            return false;
        };

        let mut tween = Tween::new(id, spec);
        tween.render_start(&mut el.visual);
        self.overwrite(id, &spec.to);
        self.tweens.push(tween);
        true
    }

    /// Schedule every entry of `timeline`. The earliest from-values of each
    /// target are written at once so nothing flashes during the delays.
    pub fn play(&mut self, timeline: Timeline) {
        let mut tweens = timeline.into_tweens();
        let known = self.elements.len();
        tweens.retain(|t| {
            if t.target().index() >= known {
                warn!(id = ?t.target(), "timeline target unknown");
                return false;
            }
            true
        });

        // siblings may share properties; only older tweens give way
        for t in &tweens {
            self.overwrite(t.target(), t.props());
        }

        let mut first: BTreeMap<ElementId, usize> = BTreeMap::new();
        for (i, t) in tweens.iter().enumerate() {
            if t.spec().from.is_none() {
                continue;
            }
            first
                .entry(t.target())
                .and_modify(|j| {
                    if t.spec().delay < tweens[*j].spec().delay {
                        *j = i;
                    }
                })
                .or_insert(i);
        }
        for (id, i) in first {
            if let Some(el) = self.elements.get_mut(id.index()) {
                tweens[i].render_start(&mut el.visual);
            }
        }

        self.tweens.extend(tweens);
    }

    fn overwrite(&mut self, id: ElementId, props: &Props) {
        self.tweens.retain_mut(|t| t.target() != id || t.strip(props));
    }

    /// Play `spec` when the element's top passes `start` (a fraction of the
    /// viewport height) and reverse it when scrolled back.
    pub fn reveal(&mut self, id: ElementId, spec: TweenSpec, start: f32) {
        let Some(el) = self.elements.get_mut(id.index()) else {
            warn!(?id, "scroll trigger on unknown element");
            return;
        };

        let mut trigger = ScrollTrigger::new(Tween::new(id, spec), start);
        trigger.tween_mut().render_start(&mut el.visual);
        trigger.update(el.top, self.scroll_y, self.viewport.height);
        self.triggers.push(trigger);
    }

    /// Drive `channel` from its current value to `to` while scrolling
    /// through `range` (px).
    pub fn scrub(&mut self, id: ElementId, channel: Channel, to: f32, range: (f32, f32)) {
        let Some(el) = self.elements.get_mut(id.index()) else {
            warn!(?id, "scrub on unknown element");
            return;
        };

        let scrub = Scrub::new(id, channel, el.visual.get(channel), to, range.0, range.1);
        scrub.apply(self.scroll_y, &mut el.visual);
        self.scrubs.push(scrub);
    }

    pub fn scroll(&mut self, scroll_y: f32) {
        self.scroll_y = scroll_y;
        let height = self.viewport.height;

        for trigger in &mut self.triggers {
            if let Some(el) = self.elements.get(trigger.target().index()) {
                if let Some(entered) = trigger.update(el.top, scroll_y, height) {
                    debug!(element = %el.name, entered, "scroll trigger");
                }
            }
        }
        for scrub in &self.scrubs {
            if let Some(el) = self.elements.get_mut(scrub.target().index()) {
                scrub.apply(scroll_y, &mut el.visual);
            }
        }
    }

    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.scroll(self.scroll_y);
    }

    pub fn pointer(&mut self, pointer: Pointer) {
        self.parallax.aim(pointer.centered);
    }

    pub fn hover_enter(&mut self, id: ElementId) {
        self.hover(id, hover::enter, false);
    }

    pub fn hover_leave(&mut self, id: ElementId) {
        self.hover(id, hover::leave, true);
    }

    fn hover(&mut self, id: ElementId, preset: fn(ElementKind) -> Option<HoverEffect>, rest: bool) {
        let Some(el) = self.element(id) else {
            warn!(?id, "hover on unknown element");
            return;
        };
        let Some(effect) = preset(el.kind) else {
            debug!(element = %el.name, kind = ?el.kind, "no hover effect");
            return;
        };

        let spec = self.resting(id, effect.spec, rest);
        self.to(id, spec);
        if let Some((spec, stagger)) = effect.children {
            let links: Vec<_> = self
                .children(id)
                .into_iter()
                .filter(|&c| self.elements[c.index()].kind == ElementKind::ProjectLink)
                .collect();
            for (i, &link) in links.iter().enumerate() {
                let spec = self.resting(link, spec, rest);
                self.to(link, spec.delay(spec.delay + stagger * i as f32));
            }
        }
    }

    /// Leave tweens aim at the element's own resting values.
    fn resting(&self, id: ElementId, mut spec: TweenSpec, rest: bool) -> TweenSpec {
        if rest {
            if let Some(el) = self.element(id) {
                spec.to = spec.to.capture(&el.baseline);
            }
        }
        spec
    }

    /// Per-element visual state, in registration order.
    pub fn records(&self) -> impl Iterator<Item = (ElementId, &Visual)> {
        self.elements().map(|(id, e)| (id, &e.visual))
    }
}

impl Tick for Stage {
    fn tick(&mut self, dt: f32) {
        let dt = dt.max(0.0);
        let elements = &mut self.elements;

        self.tweens.retain_mut(|t| match elements.get_mut(t.target().index()) {
            Some(el) => !t.advance(dt, &mut el.visual),
            None => false,
        });

        for trigger in &mut self.triggers {
            if let Some(el) = elements.get_mut(trigger.target().index()) {
                trigger.advance(dt, &mut el.visual);
            }
        }

        self.parallax.update(dt);
        for layer in self.parallax.layers() {
            if let Some(el) = layer.element().and_then(|id| elements.get_mut(id.index())) {
                el.visual.x = layer.offset.x;
                el.visual.y = layer.offset.y;
            }
        }
    }
}
