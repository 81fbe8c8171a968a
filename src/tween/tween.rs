// tween.rs - One property animation on one element
//
// A tween owns a playhead in seconds. Start values are read from the
// element on the first frame the tween is active, so chained tweens pick
// up wherever the previous one left the element.

use super::ease::Ease;
use super::props::{Props, Visual};
use super::stage::ElementId;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Repeat {
    #[default]
    Once,
    /// Extra iterations after the first.
    Times(u32),
    Forever,
}

impl Repeat {
    fn iterations(self) -> Option<u32> {
        match self {
            Repeat::Once => Some(1),
            Repeat::Times(n) => Some(n.saturating_add(1)),
            Repeat::Forever => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Direction {
    Forward,
    Backward,
}

/// What to animate and how. Built with chained setters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TweenSpec {
    pub to: Props,
    pub from: Option<Props>,
    pub duration: f32,
    pub delay: f32,
    pub ease: Ease,
    pub repeat: Repeat,
    pub yoyo: bool,
    /// Treat `to` as offsets from the start values.
    pub relative: bool,
}

impl TweenSpec {
    pub fn to(props: Props) -> Self {
        Self {
            to: props,
            from: None,
            duration: 0.5,
            delay: 0.0,
            ease: Ease::default(),
            repeat: Repeat::Once,
            yoyo: false,
            relative: false,
        }
    }

    pub fn from_to(from: Props, to: Props) -> Self {
        Self { from: Some(from), ..Self::to(to) }
    }

    pub fn duration(mut self, secs: f32) -> Self {
        self.duration = secs.max(0.0);
        self
    }

    pub fn delay(mut self, secs: f32) -> Self {
        self.delay = secs.max(0.0);
        self
    }

    pub fn ease(mut self, ease: Ease) -> Self {
        self.ease = ease;
        self
    }

    pub fn repeat(mut self, repeat: Repeat) -> Self {
        self.repeat = repeat;
        self
    }

    pub fn yoyo(mut self) -> Self {
        self.yoyo = true;
        self
    }

    pub fn relative(mut self) -> Self {
        self.relative = true;
        self
    }

    /// Seconds from start (after delay) to the last frame, `None` if it
    /// never ends.
    pub fn active_duration(&self) -> Option<f32> {
        self.repeat.iterations().map(|n| n as f32 * self.duration)
    }
}

#[derive(Clone, Debug)]
pub struct Tween {
    target: ElementId,
    spec: TweenSpec,
    start: Option<Props>,
    end: Props,
    wait: f32,
    time: f32,
    direction: Direction,
}

impl Tween {
    pub fn new(target: ElementId, spec: TweenSpec) -> Self {
        Self {
            target,
            end: spec.to,
            start: None,
            wait: spec.delay,
            time: 0.0,
            direction: Direction::Forward,
            spec,
        }
    }

    pub fn target(&self) -> ElementId {
        self.target
    }

    pub fn spec(&self) -> &TweenSpec {
        &self.spec
    }

    /// Properties this tween still writes.
    pub fn props(&self) -> &Props {
        &self.end
    }

    /// Stop writing the properties in `other`. Returns false once nothing
    /// is left to animate.
    pub fn strip(&mut self, other: &Props) -> bool {
        self.end = self.end.without(other);
        self.start = self.start.map(|s| s.without(other));
        !self.end.is_empty()
    }

    /// Write the from-values now instead of on the first active frame.
    pub fn render_start(&mut self, visual: &mut Visual) {
        if let Some(from) = self.spec.from {
            from.apply(visual);
        }
    }

    pub fn is_started(&self) -> bool {
        self.start.is_some()
    }

    pub fn is_reversed(&self) -> bool {
        self.direction == Direction::Backward
    }

    pub fn is_finished(&self) -> bool {
        match self.direction {
            Direction::Forward => self.spec.active_duration().is_some_and(|d| self.wait <= 0.0 && self.time >= d),
            Direction::Backward => self.time <= 0.0,
        }
    }

    /// Run forward from the current playhead.
    pub fn play(&mut self) {
        self.direction = Direction::Forward;
    }

    /// Run back toward the start values, skipping any remaining delay.
    pub fn reverse(&mut self) {
        self.direction = Direction::Backward;
        self.wait = 0.0;
    }

    /// Advance by `dt` seconds and write the result into `visual`.
    /// Returns true when the tween has reached the end of its direction.
    pub fn advance(&mut self, dt: f32, visual: &mut Visual) -> bool {
        let mut dt = dt.max(0.0);

        if self.direction == Direction::Forward && self.wait > 0.0 {
            self.wait -= dt;
            if self.wait > 0.0 {
                return false;
            }
            dt = -self.wait;
            self.wait = 0.0;
        }

        if self.start.is_none() {
            self.capture(visual);
        }

        match self.direction {
            Direction::Forward => {
                self.time += dt;
                match self.spec.active_duration() {
                    Some(total) => self.time = self.time.min(total),
                    None => {
                        // keep the playhead small; an even number of
                        // iterations preserves the yoyo phase
                        let period = 2.0 * self.spec.duration;
                        if period > 0.0 && self.time > period {
                            self.time %= period;
                        }
                    }
                }
            }
            Direction::Backward => self.time = (self.time - dt).max(0.0),
        }

        self.render(visual);
        self.is_finished()
    }

    fn capture(&mut self, visual: &Visual) {
        let start = match self.spec.from {
            Some(from) => from,
            None => self.spec.to.capture(visual),
        };
        if self.spec.relative {
            self.end = start.offset(&self.end);
        }
        self.start = Some(start);
    }

    /// Eased progress of the current iteration.
    fn progress(&self) -> f32 {
        let d = self.spec.duration;
        if d <= 0.0 {
            return if self.time > 0.0 || self.direction == Direction::Forward { 1.0 } else { 0.0 };
        }

        let total = self.spec.active_duration();
        let mut iter = (self.time / d).floor();
        let mut local = self.time - iter * d;
        if total.is_some_and(|t| self.time >= t) && self.time > 0.0 {
            // sitting on the final frame: last iteration, fully played
            iter -= 1.0;
            local = d;
        }
        let mut t = local / d;
        if self.spec.yoyo && (iter as i64) % 2 == 1 {
            t = 1.0 - t;
        }
        self.spec.ease.apply(t)
    }

    fn render(&self, visual: &mut Visual) {
        let Some(start) = &self.start else {
            return;
        };
        Props::blend(start, &self.end, self.progress(), visual);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tween::props::Channel;

    const ID: ElementId = ElementId(0);

    fn run(tween: &mut Tween, visual: &mut Visual, secs: f32) -> bool {
        let mut done = false;
        for _ in 0..(secs * 60.0).round() as usize {
            done = tween.advance(1.0 / 60.0, visual);
        }
        done
    }

    #[test]
    fn captures_start_on_first_active_frame() {
        let mut v = Visual::default();
        let mut tween = Tween::new(ID, TweenSpec::to(Props::new().y(0.0)).duration(1.0).delay(0.5));

        run(&mut tween, &mut v, 0.25);
        assert!(!tween.is_started());

        // moved by someone else while we wait
        v.y = 80.0;
        run(&mut tween, &mut v, 0.5);
        assert!(tween.is_started());
        assert!(v.y < 80.0 && v.y > 0.0);

        assert!(run(&mut tween, &mut v, 1.0));
        assert_eq!(v.y, 0.0);
    }

    #[test]
    fn from_to_renders_immediately() {
        let mut v = Visual::default();
        let mut tween = Tween::new(ID, TweenSpec::from_to(Props::new().opacity(0.0), Props::new().opacity(1.0)));
        tween.render_start(&mut v);
        assert_eq!(v.opacity, 0.0);
    }

    #[test]
    fn relative_moves_by_offset() {
        let mut v = Visual::default();
        v.y = 10.0;
        let mut tween = Tween::new(ID, TweenSpec::to(Props::new().y(20.0)).relative().duration(0.5));
        assert!(run(&mut tween, &mut v, 0.6));
        assert_eq!(v.y, 30.0);
    }

    #[test]
    fn yoyo_repeat_returns_to_start() {
        let mut v = Visual::default();
        let spec = TweenSpec::to(Props::new().glow(1.0)).duration(0.5).repeat(Repeat::Times(1)).yoyo();
        let mut tween = Tween::new(ID, spec);

        run(&mut tween, &mut v, 0.5);
        assert!((v.glow - 1.0).abs() < 1e-3);
        assert!(run(&mut tween, &mut v, 0.6));
        assert_eq!(v.glow, 0.0);
    }

    #[test]
    fn forever_never_finishes() {
        let mut v = Visual::default();
        let spec = TweenSpec::to(Props::new().rotation(360.0)).duration(0.2).ease(Ease::Linear).repeat(Repeat::Forever);
        let mut tween = Tween::new(ID, spec);
        assert!(!run(&mut tween, &mut v, 5.0));
        assert!((0.0..=360.0).contains(&v.rotation));
    }

    #[test]
    fn reverse_runs_back_to_start() {
        let mut v = Visual::default();
        let mut tween = Tween::new(ID, TweenSpec::from_to(Props::new().scale(0.0), Props::new().scale(1.0)).duration(1.0));
        run(&mut tween, &mut v, 0.5);
        let mid = v.scale;
        assert!(mid > 0.0 && mid < 1.0);

        tween.reverse();
        assert!(tween.is_reversed());
        assert!(run(&mut tween, &mut v, 0.6));
        assert_eq!(v.scale, 0.0);
    }

    #[test]
    fn strip_reports_when_empty() {
        let mut tween = Tween::new(ID, TweenSpec::to(Props::new().scale(1.1).color(0x00ffff)));
        assert!(tween.strip(&Props::new().scale(1.0)));
        assert_eq!(tween.props().get(Channel::Scale), None);
        assert!(!tween.strip(&Props::new().color(0xffffff)));
    }

    #[test]
    fn zero_duration_snaps() {
        let mut v = Visual::default();
        let mut tween = Tween::new(ID, TweenSpec::to(Props::new().opacity(0.0)).duration(0.0));
        assert!(tween.advance(0.0, &mut v));
        assert_eq!(v.opacity, 0.0);
    }
}
