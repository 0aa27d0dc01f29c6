//! Compiled transitions.
//!
//! [`Timeline::compile`] turns a [`TransitionSpec`] plus the surface's current
//! [`Pose`] into time-positioned segments. Every track starts from where it
//! currently is, and a phase's duration is scaled by the distance its track
//! still has to travel, so a reversed transition continues from the visible
//! position instead of jumping to the nominal start.

use std::time::Duration;

use crate::easing::Easing;
use crate::sequencer::Sequence;
use crate::transition::{Direction, Phase, PhaseTarget, TransitionSpec};

/// Visual position of a surface, as openness per track.
///
/// 0.0 is the closed pose, 1.0 the open pose. Overshooting curves may push a
/// value slightly past 1.0 mid-transition.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Pose {
    pub backdrop: f32,
    pub panel: f32,
    pub children: Vec<f32>,
}

impl Pose {
    /// Every track at `openness`.
    pub fn resting(openness: f32, children: usize) -> Self {
        Self {
            backdrop: openness,
            panel: openness,
            children: vec![openness; children],
        }
    }

    pub fn closed(children: usize) -> Self {
        Self::resting(0.0, children)
    }

    pub fn open(children: usize) -> Self {
        Self::resting(1.0, children)
    }

    pub fn child(&self, index: usize) -> Option<f32> {
        self.children.get(index).copied()
    }

    /// True if any part of the surface would be drawn.
    pub fn is_visible(&self) -> bool {
        self.backdrop > 0.0 || self.panel > 0.0 || self.children.iter().any(|c| *c > 0.0)
    }
}

/// One track's move from `from` to `to`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Segment {
    pub(crate) start: Duration,
    pub(crate) duration: Duration,
    from: f32,
    to: f32,
    easing: Easing,
}

impl Segment {
    /// Move from `from` to `to`, taking the share of `full` proportional to
    /// the distance left.
    pub(crate) fn toward(start: Duration, full: Duration, easing: Easing, from: f32, to: f32) -> Self {
        let distance = (to - from).abs().min(1.0);
        Self {
            start,
            duration: scale(full, distance),
            from,
            to,
            easing,
        }
    }

    pub(crate) fn end(&self) -> Duration {
        self.start + self.duration
    }

    pub(crate) fn is_moving(&self) -> bool {
        self.from != self.to
    }

    pub(crate) fn delayed(mut self, by: Duration) -> Self {
        self.start += by;
        self
    }

    pub(crate) fn sample(&self, elapsed: Duration) -> f32 {
        if elapsed < self.start {
            return self.from;
        }
        if self.duration.is_zero() {
            return self.to;
        }
        let progress = ((elapsed - self.start).as_secs_f32() / self.duration.as_secs_f32()).min(1.0);
        self.from + (self.to - self.from) * self.easing.apply(progress)
    }
}

/// A transition compiled against a starting pose.
#[derive(Debug, Clone)]
pub struct Timeline {
    direction: Direction,
    backdrop: Segment,
    panel: Segment,
    children: Sequence,
    total: Duration,
}

impl Timeline {
    pub fn compile(spec: &TransitionSpec, direction: Direction, from: &Pose) -> Self {
        let target = direction.target();
        // Tracks without a phase snap to the target immediately.
        let snap = |value: f32| Segment::toward(Duration::ZERO, Duration::ZERO, Easing::Linear, value, target);
        let mut backdrop = snap(from.backdrop);
        let mut panel = snap(from.panel);
        let mut children = Sequence::snap(&from.children, target);

        let mut cursor = Duration::ZERO;
        for phase in spec.phases() {
            let end = match phase.target {
                PhaseTarget::Backdrop => {
                    backdrop = place(phase, cursor, from.backdrop, target);
                    backdrop.end()
                }
                PhaseTarget::Panel => {
                    panel = place(phase, cursor, from.panel, target);
                    panel.end()
                }
                PhaseTarget::Children => {
                    let relative = Sequence::stagger(&from.children, target, phase);
                    let start = cursor.saturating_sub(phase.overlap.min(relative.end()));
                    children = relative.delayed(start);
                    children.end()
                }
            };
            cursor = cursor.max(end);
        }

        log::trace!(
            "Timeline compiled: direction={}, total={:?}, children={}",
            direction,
            cursor,
            from.children.len()
        );

        Self {
            direction,
            backdrop,
            panel,
            children,
            total: cursor,
        }
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Time from the first frame until every track has settled.
    pub fn total(&self) -> Duration {
        self.total
    }

    pub fn is_finished(&self, elapsed: Duration) -> bool {
        elapsed >= self.total
    }

    pub fn sample(&self, elapsed: Duration) -> Pose {
        Pose {
            backdrop: self.backdrop.sample(elapsed),
            panel: self.panel.sample(elapsed),
            children: self.children.sample(elapsed),
        }
    }

    /// Offset at which the panel finishes moving; children of an enter
    /// transition start no earlier than this, less any overlap.
    pub fn panel_end(&self) -> Duration {
        self.panel.end()
    }

    pub fn children(&self) -> &Sequence {
        &self.children
    }

    pub(crate) fn children_mut(&mut self) -> &mut Sequence {
        &mut self.children
    }
}

/// `full * fraction`, exact for whole and binary fractions.
fn scale(full: Duration, fraction: f32) -> Duration {
    if fraction >= 1.0 {
        return full;
    }
    Duration::from_nanos((full.as_nanos() as f64 * f64::from(fraction)).round() as u64)
}

fn place(phase: &Phase, cursor: Duration, from: f32, target: f32) -> Segment {
    let segment = Segment::toward(Duration::ZERO, phase.duration, phase.easing, from, target);
    let start = cursor.saturating_sub(phase.overlap.min(segment.duration));
    segment.delayed(start)
}
