//! One transient surface and its state machine.
//!
//! ```text
//! Closed --open--> Opening --complete--> Open
//!   ^                 |  ^                 |
//!   |              close  open             close
//!   |                 v  |                 v
//!   +---complete--- Closing <--------------+
//! ```
//!
//! Every transition request bumps the surface's [`Generation`]. Frame
//! callbacks carry the generation that scheduled them, and the controller
//! drops any callback whose generation is no longer current.

use std::fmt;
use std::time::Instant;

use crate::dismissal::{DismissReason, ListenerGuard, PointerListeners};
use crate::frame::{FrameCallback, FrameHandle, FrameScheduler};
use crate::layout::Rect;
use crate::timeline::{Pose, Timeline};
use crate::transition::{Direction, OverlaySpec};

/// Stable identity of a surface. Never reused by one controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SurfaceId(u64);

impl SurfaceId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for SurfaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Handle a view keeps for the surface it owns.
pub type SurfaceHandle = SurfaceId;

/// Transition epoch of one surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Generation(u64);

impl Generation {
    pub fn new(generation: u64) -> Self {
        Self(generation)
    }

    pub fn raw(&self) -> u64 {
        self.0
    }

    pub(crate) fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SurfaceState {
    #[default]
    Closed,
    Opening,
    Open,
    Closing,
}

impl SurfaceState {
    /// Direction the surface is at, or heading toward.
    pub fn heading(self) -> Direction {
        match self {
            SurfaceState::Opening | SurfaceState::Open => Direction::Enter,
            SurfaceState::Closing | SurfaceState::Closed => Direction::Exit,
        }
    }

    pub(crate) fn moving(direction: Direction) -> Self {
        match direction {
            Direction::Enter => SurfaceState::Opening,
            Direction::Exit => SurfaceState::Closing,
        }
    }

    pub(crate) fn settled(direction: Direction) -> Self {
        match direction {
            Direction::Enter => SurfaceState::Open,
            Direction::Exit => SurfaceState::Closed,
        }
    }
}

/// Descriptor of one child item (menu row, product card).
///
/// A child's stagger index is its position in the surface's child list.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ChildItem {
    pub key: String,
}

impl ChildItem {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}

/// Notification delivered to state observers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateChange {
    pub surface: SurfaceId,
    pub from: SurfaceState,
    pub to: SurfaceState,
    pub generation: Generation,
    /// Set for changes caused by a close request, carried through to the
    /// final `Closed`.
    pub reason: Option<DismissReason>,
}

/// Identifies an observer registered with `on_state_change`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    pub(crate) fn new(id: u64) -> Self {
        Self(id)
    }
}

pub(crate) type StateObserver = Box<dyn FnMut(&StateChange)>;

/// The in-flight transition of one surface.
#[derive(Debug)]
pub(crate) struct Transition {
    generation: Generation,
    direction: Direction,
    timeline: Timeline,
    reason: Option<DismissReason>,
    /// Timestamp of the first frame; `None` until the transition is
    /// presented.
    started_at: Option<Instant>,
    frame: Option<FrameHandle>,
}

impl Transition {
    /// Release the pending frame and every child subscription.
    fn cancel<S: FrameScheduler>(&mut self, scheduler: &mut S) {
        if let Some(frame) = self.frame.take() {
            scheduler.cancel_frame(frame);
        }
        let children = self.timeline.children_mut().cancel();
        log::trace!(
            "Transition cancelled: direction={}, generation={}, children_in_flight={}",
            self.direction,
            self.generation,
            children
        );
    }
}

pub(crate) struct Surface {
    pub(crate) id: SurfaceId,
    pub(crate) state: SurfaceState,
    pub(crate) generation: Generation,
    pub(crate) children: Vec<ChildItem>,
    pub(crate) spec: OverlaySpec,
    pub(crate) bounds: Vec<Rect>,
    pub(crate) pose: Pose,
    /// False until a frame is drawn after the last `Closed` rest.
    presented: bool,
    transition: Option<Transition>,
    binding: Option<ListenerGuard>,
    observers: Vec<(SubscriptionId, StateObserver)>,
}

impl fmt::Debug for Surface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Surface")
            .field("id", &self.id)
            .field("state", &self.state)
            .field("generation", &self.generation)
            .field("children", &self.children.len())
            .field("transition", &self.transition)
            .field("listening", &self.binding.is_some())
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl Surface {
    pub(crate) fn new(id: SurfaceId, children: Vec<ChildItem>, spec: OverlaySpec) -> Self {
        let pose = Pose::closed(children.len());
        Self {
            id,
            state: SurfaceState::Closed,
            generation: Generation::default(),
            children,
            spec,
            bounds: Vec::new(),
            pose,
            presented: false,
            transition: None,
            binding: None,
            observers: Vec::new(),
        }
    }

    pub(crate) fn contains(&self, x: u16, y: u16) -> bool {
        self.bounds.iter().any(|r| r.contains(x, y))
    }

    pub(crate) fn is_listening(&self) -> bool {
        self.binding.is_some()
    }

    pub(crate) fn child_subscriptions(&self) -> usize {
        self.transition
            .as_ref()
            .map_or(0, |t| t.timeline.children().subscribed())
    }

    /// Start a transition in `direction`, preempting any running one.
    ///
    /// The caller has already ruled out a same-direction request.
    pub(crate) fn begin<S: FrameScheduler>(
        &mut self,
        direction: Direction,
        reason: Option<DismissReason>,
        reduced_motion: bool,
        scheduler: &mut S,
    ) -> StateChange {
        // Leaving Open: the listener goes before anything else happens.
        self.binding = None;

        if let Some(mut running) = self.transition.take() {
            running.cancel(scheduler);
        }
        let from_pose = if self.presented {
            self.pose.clone()
        } else {
            // Nothing drawn since the last Closed rest, so there is no visual
            // position to continue from.
            Pose::resting(direction.origin(), self.children.len())
        };

        self.generation = self.generation.next();
        let spec = self.spec.transition(direction);
        let timeline = if reduced_motion {
            Timeline::compile(&spec.instant(), direction, &from_pose)
        } else {
            Timeline::compile(spec, direction, &from_pose)
        };
        let frame = scheduler.request_frame(FrameCallback::new(self.id, self.generation));

        log::debug!(
            "Surface {} {:?} -> {:?}: generation={}, total={:?}",
            self.id,
            self.state,
            SurfaceState::moving(direction),
            self.generation,
            timeline.total()
        );

        self.pose = from_pose;
        self.transition = Some(Transition {
            generation: self.generation,
            direction,
            timeline,
            reason,
            started_at: None,
            frame: Some(frame),
        });
        self.change(SurfaceState::moving(direction), reason)
    }

    /// Advance the in-flight transition to `now`. Returns the state change
    /// if the transition completed.
    ///
    /// The caller has already checked the callback's generation.
    pub(crate) fn frame<S: FrameScheduler>(
        &mut self,
        now: Instant,
        scheduler: &mut S,
        listeners: &PointerListeners,
        pointer_clock: u64,
    ) -> Option<StateChange> {
        let transition = self.transition.as_mut()?;
        transition.frame = None;
        let started = *transition.started_at.get_or_insert(now);
        let elapsed = now.saturating_duration_since(started);

        self.pose = transition.timeline.sample(elapsed);
        self.presented = true;
        transition.timeline.children_mut().release_settled(elapsed);

        if !transition.timeline.is_finished(elapsed) {
            let callback = FrameCallback::new(self.id, transition.generation);
            transition.frame = Some(scheduler.request_frame(callback));
            return None;
        }

        let finished = self.transition.take()?;
        let settled = SurfaceState::settled(finished.direction);
        self.pose = Pose::resting(finished.direction.target(), self.children.len());
        if settled == SurfaceState::Closed {
            self.presented = false;
        }
        if settled == SurfaceState::Open && self.spec.dismissal.listens() {
            self.binding = listeners.attach(self.id, pointer_clock);
        }

        log::debug!(
            "Surface {} settled {:?}: generation={}",
            self.id,
            settled,
            self.generation
        );
        Some(self.change(settled, finished.reason))
    }

    /// Cancel everything this surface holds. Returns the change to
    /// `Closed` if it was not already closed.
    pub(crate) fn teardown<S: FrameScheduler>(&mut self, scheduler: &mut S) -> Option<StateChange> {
        self.binding = None;
        if let Some(mut running) = self.transition.take() {
            running.cancel(scheduler);
        }
        if self.state == SurfaceState::Closed {
            return None;
        }
        self.pose = Pose::closed(self.children.len());
        self.presented = false;
        Some(self.change(SurfaceState::Closed, None))
    }

    fn change(&mut self, to: SurfaceState, reason: Option<DismissReason>) -> StateChange {
        let change = StateChange {
            surface: self.id,
            from: self.state,
            to,
            generation: self.generation,
            reason,
        };
        self.state = to;
        change
    }

    pub(crate) fn observe(&mut self, id: SubscriptionId, observer: StateObserver) {
        self.observers.push((id, observer));
    }

    pub(crate) fn unobserve(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(sub, _)| *sub != id);
        self.observers.len() != before
    }

    pub(crate) fn notify(&mut self, change: &StateChange) {
        for (_, observer) in &mut self.observers {
            observer(change);
        }
    }
}
