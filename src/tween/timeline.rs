// timeline.rs - Sequenced tweens
//
// A timeline is only a scheduling aid: it resolves every entry's start
// time and hands back plain tweens whose delays encode the sequence.

use super::stage::ElementId;
use super::tween::{Tween, TweenSpec};

/// Where an entry starts relative to what is already on the timeline.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Position {
    /// At the current end of the timeline.
    AfterPrevious,
    /// Shifted from the current end; negative values overlap.
    Offset(f32),
    /// Absolute time in seconds.
    At(f32),
}

struct Entry {
    targets: Vec<ElementId>,
    spec: TweenSpec,
    stagger: f32,
    start: f32,
}

#[derive(Default)]
pub struct Timeline {
    entries: Vec<Entry>,
    end: f32,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(self, targets: &[ElementId], spec: TweenSpec, at: Position) -> Self {
        self.add_staggered(targets, spec, 0.0, at)
    }

    /// Like `add`, with each target starting `stagger` seconds after the
    /// previous one.
    pub fn add_staggered(mut self, targets: &[ElementId], spec: TweenSpec, stagger: f32, at: Position) -> Self {
        if targets.is_empty() {
            return self;
        }

        let start = match at {
            Position::AfterPrevious => self.end,
            Position::Offset(d) => self.end + d,
            Position::At(t) => t,
        }
        .max(0.0);

        let stagger = stagger.max(0.0);
        let span = spec.delay + stagger * (targets.len() - 1) as f32 + spec.active_duration().unwrap_or(0.0);
        self.end = self.end.max(start + span);

        self.entries.push(Entry { targets: targets.to_vec(), spec, stagger, start });
        self
    }

    /// Time at which the last finite entry completes.
    pub fn duration(&self) -> f32 {
        self.end
    }

    pub fn into_tweens(self) -> Vec<Tween> {
        self.entries
            .into_iter()
            .flat_map(|e| {
                e.targets.into_iter().enumerate().map(move |(i, id)| {
                    let delay = e.start + e.spec.delay + e.stagger * i as f32;
                    Tween::new(id, e.spec.delay(delay))
                })
            })
            .collect()
    }
}
