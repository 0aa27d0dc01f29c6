//! Staggered reveal and dismissal of a surface's child items.
//!
//! Children are staggered by position: the `k`-th child that still has to
//! move starts `k * stagger` after the children phase does. Children run
//! concurrently with those offsets, not one after another. Each moving child
//! holds a frame subscription until it settles or the sequence is cancelled.

use std::time::Duration;

use crate::easing::Easing;
use crate::timeline::Segment;
use crate::transition::Phase;

/// Order children are staggered in.
///
/// Both directions default to `Forward`: the first child is the first to
/// appear and the first to leave.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StaggerOrder {
    #[default]
    Forward,
    Reverse,
}

#[derive(Debug, Clone)]
struct ChildTrack {
    segment: Segment,
    subscribed: bool,
}

/// Per-child segments of one transition, indexed by child position.
#[derive(Debug, Clone, Default)]
pub struct Sequence {
    tracks: Vec<ChildTrack>,
    end: Duration,
}

impl Sequence {
    pub(crate) fn stagger(from: &[f32], target: f32, phase: &Phase) -> Self {
        let order: Vec<usize> = match phase.order {
            StaggerOrder::Forward => (0..from.len()).collect(),
            StaggerOrder::Reverse => (0..from.len()).rev().collect(),
        };

        let mut slots: Vec<Option<ChildTrack>> = vec![None; from.len()];
        let mut moving = 0u32;
        for index in order {
            let offset = phase.stagger * moving;
            let segment = Segment::toward(offset, phase.duration, phase.easing, from[index], target);
            if segment.is_moving() {
                moving += 1;
            }
            slots[index] = Some(ChildTrack {
                subscribed: segment.is_moving(),
                segment,
            });
        }

        Self::from_tracks(slots.into_iter().flatten().collect())
    }

    /// Every child jumps to `target` at once.
    pub(crate) fn snap(from: &[f32], target: f32) -> Self {
        let tracks = from
            .iter()
            .map(|value| ChildTrack {
                segment: Segment::toward(Duration::ZERO, Duration::ZERO, Easing::Linear, *value, target),
                subscribed: false,
            })
            .collect();
        Self::from_tracks(tracks)
    }

    fn from_tracks(tracks: Vec<ChildTrack>) -> Self {
        let end = tracks
            .iter()
            .map(|t| t.segment.end())
            .max()
            .unwrap_or(Duration::ZERO);
        Self { tracks, end }
    }

    pub(crate) fn delayed(mut self, by: Duration) -> Self {
        for track in &mut self.tracks {
            track.segment = track.segment.delayed(by);
        }
        self.end += by;
        self
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Scheduled start of child `index`, relative to the transition's first
    /// frame.
    pub fn start_of(&self, index: usize) -> Option<Duration> {
        self.tracks.get(index).map(|t| t.segment.start)
    }

    /// When the last child settles.
    pub fn end(&self) -> Duration {
        self.end
    }

    pub(crate) fn sample(&self, elapsed: Duration) -> Vec<f32> {
        self.tracks.iter().map(|t| t.segment.sample(elapsed)).collect()
    }

    /// Drop subscriptions of children that have settled by `elapsed`.
    pub(crate) fn release_settled(&mut self, elapsed: Duration) {
        for track in &mut self.tracks {
            if track.subscribed && elapsed >= track.segment.end() {
                track.subscribed = false;
            }
        }
    }

    /// Number of children still subscribed to frame updates.
    pub fn subscribed(&self) -> usize {
        self.tracks.iter().filter(|t| t.subscribed).count()
    }

    /// Unsubscribe every child. Returns how many were still in flight.
    pub(crate) fn cancel(&mut self) -> usize {
        let mut cancelled = 0;
        for track in &mut self.tracks {
            if track.subscribed {
                track.subscribed = false;
                cancelled += 1;
            }
        }
        cancelled
    }
}
