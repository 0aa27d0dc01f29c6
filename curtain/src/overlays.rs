//! The overlay controller.
//!
//! [`Overlays`] owns every surface of one view tree together with the frame
//! scheduler and the dismissal listener registry. Views hold
//! [`SurfaceHandle`]s and drive surfaces through `open`, `close` and
//! `toggle`; the host feeds frames and pointer input back in.
//!
//! # Example
//!
//! ```
//! use std::time::{Duration, Instant};
//! use curtain::{ChildItem, FrameQueue, OverlaySpec, Overlays, SurfaceState};
//!
//! let mut overlays = Overlays::new(FrameQueue::new());
//! let menu = overlays
//!     .create_surface(vec![ChildItem::new("home")], OverlaySpec::slide_menu())
//!     .unwrap();
//!
//! overlays.open(menu).unwrap();
//! assert_eq!(overlays.state(menu).unwrap(), SurfaceState::Opening);
//!
//! let start = Instant::now();
//! overlays.advance(start);
//! overlays.advance(start + Duration::from_secs(2));
//! assert_eq!(overlays.state(menu).unwrap(), SurfaceState::Open);
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::time::Instant;

use crate::config::OverlayConfig;
use crate::dismissal::{DismissReason, PointerEvent, PointerListeners};
use crate::error::OverlayError;
use crate::frame::{FrameCallback, FrameQueue, FrameScheduler};
use crate::layout::Rect;
use crate::surface::{
    ChildItem, Generation, StateChange, SubscriptionId, Surface, SurfaceHandle, SurfaceId,
    SurfaceState,
};
use crate::timeline::Pose;
use crate::transition::{Direction, OverlaySpec};

/// Controller for every overlay surface of one view tree.
pub struct Overlays<S: FrameScheduler = FrameQueue> {
    scheduler: S,
    config: OverlayConfig,
    surfaces: BTreeMap<SurfaceId, Surface>,
    /// Surfaces in stacking order, bottom first. A surface moves to the top
    /// when it starts opening and leaves the stack once closed.
    stack: Vec<SurfaceId>,
    listeners: PointerListeners,
    /// Highest pointer sequence number seen so far.
    pointer_clock: u64,
    next_surface: u64,
    next_subscription: u64,
}

impl<S: FrameScheduler> fmt::Debug for Overlays<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Overlays")
            .field("config", &self.config)
            .field("surfaces", &self.surfaces)
            .field("stack", &self.stack)
            .field("listeners", &self.listeners.attached())
            .field("pointer_clock", &self.pointer_clock)
            .finish()
    }
}

impl<S: FrameScheduler> Overlays<S> {
    pub fn new(scheduler: S) -> Self {
        Self::with_config(scheduler, OverlayConfig::default())
    }

    pub fn with_config(scheduler: S, config: OverlayConfig) -> Self {
        Self {
            scheduler,
            config,
            surfaces: BTreeMap::new(),
            stack: Vec::new(),
            listeners: PointerListeners::new(),
            pointer_clock: 0,
            next_surface: 0,
            next_subscription: 0,
        }
    }

    pub fn config(&self) -> &OverlayConfig {
        &self.config
    }

    /// Change reduced motion. Applies to transitions started afterwards.
    pub fn set_reduced_motion(&mut self, enabled: bool) {
        self.config.reduced_motion = enabled;
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    /// Dismissal listener registry, for diagnostics.
    pub fn listeners(&self) -> &PointerListeners {
        &self.listeners
    }

    // =========================================================================
    // Surface lifecycle
    // =========================================================================

    /// Create a closed surface with the given children.
    pub fn create_surface(
        &mut self,
        children: Vec<ChildItem>,
        spec: OverlaySpec,
    ) -> Result<SurfaceHandle, OverlayError> {
        spec.validate()?;
        self.next_surface += 1;
        let id = SurfaceId::new(self.next_surface);
        log::debug!("Surface {} created: children={}", id, children.len());
        self.surfaces.insert(id, Surface::new(id, children, spec));
        Ok(id)
    }

    /// Destroy a surface, cancelling its transition and releasing its
    /// listener before returning.
    ///
    /// Observers see a final change to `Closed` if the surface was not
    /// already closed.
    pub fn destroy_surface(&mut self, handle: SurfaceHandle) -> Result<(), OverlayError> {
        let mut surface = self
            .surfaces
            .remove(&handle)
            .ok_or(OverlayError::UnknownSurface(handle))?;
        self.stack.retain(|id| *id != handle);
        if let Some(change) = surface.teardown(&mut self.scheduler) {
            surface.notify(&change);
        }
        log::debug!("Surface {} destroyed", handle);
        Ok(())
    }

    pub fn contains(&self, handle: SurfaceHandle) -> bool {
        self.surfaces.contains_key(&handle)
    }

    pub fn len(&self) -> usize {
        self.surfaces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.surfaces.is_empty()
    }

    // =========================================================================
    // Transition requests
    // =========================================================================

    /// Start opening. No-op if already open or opening; reverses a closing
    /// surface from its current position.
    pub fn open(&mut self, handle: SurfaceHandle) -> Result<(), OverlayError> {
        self.request(handle, Direction::Enter, None)
    }

    /// Start closing. No-op if already closed or closing; reverses an
    /// opening surface from its current position.
    pub fn close(&mut self, handle: SurfaceHandle) -> Result<(), OverlayError> {
        self.request(handle, Direction::Exit, Some(DismissReason::Programmatic))
    }

    /// Open if closed or closing, close if open or opening.
    pub fn toggle(&mut self, handle: SurfaceHandle) -> Result<(), OverlayError> {
        let state = self.state(handle)?;
        match state.heading() {
            Direction::Exit => self.open(handle),
            Direction::Enter => self.close(handle),
        }
    }

    /// Open in response to `event`. The surface's dismissal listener will
    /// never treat `event` as an outside interaction.
    pub fn open_from(&mut self, handle: SurfaceHandle, event: &PointerEvent) -> Result<(), OverlayError> {
        self.observe_pointer(event.seq);
        self.open(handle)
    }

    /// Toggle in response to `event`; see [`open_from`](Self::open_from).
    pub fn toggle_from(&mut self, handle: SurfaceHandle, event: &PointerEvent) -> Result<(), OverlayError> {
        self.observe_pointer(event.seq);
        self.toggle(handle)
    }

    fn request(
        &mut self,
        handle: SurfaceHandle,
        direction: Direction,
        reason: Option<DismissReason>,
    ) -> Result<(), OverlayError> {
        let reduced_motion = self.config.reduced_motion;
        let surface = self.surfaces.get_mut(&handle).ok_or_else(|| {
            log::warn!("Rejected {} request for unknown surface {}", direction, handle);
            OverlayError::UnknownSurface(handle)
        })?;

        if surface.state.heading() == direction {
            log::trace!(
                "Surface {} already {:?}; {} request ignored",
                handle,
                surface.state,
                direction
            );
            return Ok(());
        }

        let change = surface.begin(direction, reason, reduced_motion, &mut self.scheduler);
        surface.notify(&change);

        // A closing surface keeps its place until it settles.
        if direction == Direction::Enter {
            self.stack.retain(|id| *id != handle);
            self.stack.push(handle);
        }
        Ok(())
    }

    // =========================================================================
    // Frames
    // =========================================================================

    /// Deliver a frame callback at `now`.
    ///
    /// Callbacks for destroyed surfaces or superseded generations are
    /// discarded without touching any state.
    pub fn on_frame(&mut self, callback: FrameCallback, now: Instant) {
        let Some(surface) = self.surfaces.get_mut(&callback.surface) else {
            log::trace!("Discarding frame for destroyed surface {}", callback.surface);
            return;
        };
        if callback.generation != surface.generation {
            log::trace!(
                "Discarding stale frame: surface={}, generation={}, current={}",
                callback.surface,
                callback.generation,
                surface.generation
            );
            return;
        }

        let settled = surface.frame(now, &mut self.scheduler, &self.listeners, self.pointer_clock);
        if let Some(change) = settled {
            surface.notify(&change);
            if change.to == SurfaceState::Closed {
                self.stack.retain(|id| *id != callback.surface);
            }
        }
    }

    // =========================================================================
    // Dismissal
    // =========================================================================

    /// Deliver a global pointer-down event.
    ///
    /// Closes every open surface that listens for outside interaction and
    /// does not contain the point. Returns the surfaces dismissed.
    pub fn pointer_down(&mut self, event: PointerEvent) -> Vec<SurfaceId> {
        self.observe_pointer(event.seq);

        let mut dismissed = Vec::new();
        for id in self.listeners.armed_for(event.seq) {
            let Some(surface) = self.surfaces.get(&id) else {
                continue;
            };
            if !surface.spec.dismissal.outside_pointer || surface.contains(event.x, event.y) {
                continue;
            }
            let reason = if surface.spec.has_backdrop() {
                DismissReason::Backdrop
            } else {
                DismissReason::OutsidePointer
            };
            log::debug!(
                "Surface {} dismissed by pointer at ({}, {}): {:?}",
                id,
                event.x,
                event.y,
                reason
            );
            if self.request(id, Direction::Exit, Some(reason)).is_ok() {
                dismissed.push(id);
            }
        }
        dismissed
    }

    /// Deliver an Escape key press. Closes the topmost open surface whose
    /// policy allows it.
    pub fn escape_pressed(&mut self) -> Option<SurfaceId> {
        let target = self.stack.iter().rev().copied().find(|id| {
            self.surfaces
                .get(id)
                .is_some_and(|s| s.is_listening() && s.spec.dismissal.escape)
        })?;
        log::debug!("Surface {} dismissed by escape", target);
        self.request(target, Direction::Exit, Some(DismissReason::Escape))
            .ok()
            .map(|_| target)
    }

    fn observe_pointer(&mut self, seq: u64) {
        self.pointer_clock = self.pointer_clock.max(seq);
    }

    // =========================================================================
    // Observation
    // =========================================================================

    /// Register an observer called synchronously on every state change of
    /// `handle`, including the final one when the surface is destroyed.
    pub fn on_state_change(
        &mut self,
        handle: SurfaceHandle,
        callback: impl FnMut(&StateChange) + 'static,
    ) -> Result<SubscriptionId, OverlayError> {
        let id = SubscriptionId::new(self.next_subscription + 1);
        self.get_mut(handle)?.observe(id, Box::new(callback));
        self.next_subscription += 1;
        Ok(id)
    }

    /// Remove an observer. Returns false if it was not registered.
    pub fn remove_state_listener(
        &mut self,
        handle: SurfaceHandle,
        subscription: SubscriptionId,
    ) -> Result<bool, OverlayError> {
        Ok(self.get_mut(handle)?.unobserve(subscription))
    }

    pub fn state(&self, handle: SurfaceHandle) -> Result<SurfaceState, OverlayError> {
        Ok(self.get(handle)?.state)
    }

    pub fn generation(&self, handle: SurfaceHandle) -> Result<Generation, OverlayError> {
        Ok(self.get(handle)?.generation)
    }

    /// Last sampled visual position.
    pub fn pose(&self, handle: SurfaceHandle) -> Result<&Pose, OverlayError> {
        Ok(&self.get(handle)?.pose)
    }

    pub fn children(&self, handle: SurfaceHandle) -> Result<&[ChildItem], OverlayError> {
        Ok(&self.get(handle)?.children)
    }

    /// Number of children of the in-flight transition still subscribed to
    /// frames. Zero at rest.
    pub fn child_subscriptions(&self, handle: SurfaceHandle) -> Result<usize, OverlayError> {
        Ok(self.get(handle)?.child_subscriptions())
    }

    /// Set the regions counted as inside the surface for dismissal.
    pub fn set_bounds(&mut self, handle: SurfaceHandle, bounds: Vec<Rect>) -> Result<(), OverlayError> {
        self.get_mut(handle)?.bounds = bounds;
        Ok(())
    }

    /// True only while `Open`; transitional frames never take input.
    pub fn accepts_input(&self, handle: SurfaceHandle) -> Result<bool, OverlayError> {
        Ok(self.get(handle)?.state == SurfaceState::Open)
    }

    /// True while the surface is part of the view tree at all, i.e. not
    /// `Closed`.
    pub fn is_mounted(&self, handle: SurfaceHandle) -> Result<bool, OverlayError> {
        Ok(self.get(handle)?.state != SurfaceState::Closed)
    }

    /// Topmost surface that accepts input and contains the point.
    pub fn hit_test(&self, x: u16, y: u16) -> Option<SurfaceId> {
        self.stack.iter().rev().copied().find(|id| {
            self.surfaces
                .get(id)
                .is_some_and(|s| s.state == SurfaceState::Open && s.contains(x, y))
        })
    }

    /// Surfaces accepting input, bottom first. Focus traversal walks this.
    pub fn interactive_surfaces(&self) -> impl Iterator<Item = SurfaceId> + '_ {
        self.stack.iter().copied().filter(|id| {
            self.surfaces
                .get(id)
                .is_some_and(|s| s.state == SurfaceState::Open)
        })
    }

    /// Surfaces to draw this frame, bottom first.
    pub fn mounted_surfaces(&self) -> impl Iterator<Item = SurfaceId> + '_ {
        self.stack.iter().copied()
    }

    fn get(&self, handle: SurfaceHandle) -> Result<&Surface, OverlayError> {
        self.surfaces
            .get(&handle)
            .ok_or(OverlayError::UnknownSurface(handle))
    }

    fn get_mut(&mut self, handle: SurfaceHandle) -> Result<&mut Surface, OverlayError> {
        self.surfaces
            .get_mut(&handle)
            .ok_or(OverlayError::UnknownSurface(handle))
    }
}

impl Overlays<FrameQueue> {
    /// Run one frame: deliver every queued callback at `now`. Requests made
    /// while doing so wait for the next call. Returns the number delivered.
    pub fn advance(&mut self, now: Instant) -> usize {
        let due = self.scheduler.drain();
        let count = due.len();
        for callback in due {
            self.on_frame(callback, now);
        }
        count
    }

    /// True while any transition is waiting for a frame.
    pub fn has_pending_frames(&self) -> bool {
        !self.scheduler.is_empty()
    }
}
