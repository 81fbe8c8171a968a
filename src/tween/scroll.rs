// scroll.rs - Scroll-driven animation
//
// A trigger plays its tween once the element's top edge rises past a
// fraction of the viewport and reverses it when scrolled back above. A
// scrub has no clock of its own: scroll progress through a pixel range
// is the playhead.

use super::props::{Channel, Visual};
use super::stage::ElementId;
use super::tween::Tween;

pub struct ScrollTrigger {
    tween: Tween,
    /// Fraction of the viewport height, from the top.
    start: f32,
    entered: bool,
}

impl ScrollTrigger {
    pub fn new(tween: Tween, start: f32) -> Self {
        Self { tween, start: start.clamp(0.0, 1.0), entered: false }
    }

    pub fn target(&self) -> ElementId {
        self.tween.target()
    }

    pub fn tween_mut(&mut self) -> &mut Tween {
        &mut self.tween
    }

    /// Re-evaluate against the current scroll offset. Returns the new
    /// state when it flipped.
    pub fn update(&mut self, element_top: f32, scroll_y: f32, viewport_height: f32) -> Option<bool> {
        let crossed = element_top - scroll_y <= self.start * viewport_height;
        match (crossed, self.entered) {
            (true, false) => {
                self.entered = true;
                self.tween.play();
                Some(true)
            }
            (false, true) => {
                self.entered = false;
                self.tween.reverse();
                Some(false)
            }
            _ => None,
        }
    }

    /// True while the tween still has frames to play in either direction.
    pub fn is_running(&self) -> bool {
        (self.entered || self.tween.is_reversed()) && !self.tween.is_finished()
    }

    pub fn advance(&mut self, dt: f32, visual: &mut Visual) {
        if self.is_running() {
            self.tween.advance(dt, visual);
        }
    }
}

pub struct Scrub {
    target: ElementId,
    channel: Channel,
    from: f32,
    to: f32,
    start: f32,
    end: f32,
}

impl Scrub {
    /// Move `channel` from `from` to `to` while the scroll offset runs
    /// from `start` to `end` pixels.
    pub fn new(target: ElementId, channel: Channel, from: f32, to: f32, start: f32, end: f32) -> Self {
        Self { target, channel, from, to, start, end }
    }

    pub fn target(&self) -> ElementId {
        self.target
    }

    pub fn progress(&self, scroll_y: f32) -> f32 {
        let span = self.end - self.start;
        if span <= 0.0 {
            return if scroll_y >= self.end { 1.0 } else { 0.0 };
        }
        ((scroll_y - self.start) / span).clamp(0.0, 1.0)
    }

    pub fn apply(&self, scroll_y: f32, visual: &mut Visual) {
        let t = self.progress(scroll_y);
        visual.set(self.channel, self.from * (1.0 - t) + self.to * t);
    }
}
