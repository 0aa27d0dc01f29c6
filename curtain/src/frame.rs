//! Frame scheduling.
//!
//! The controller never blocks and never spawns threads. Each in-flight
//! transition holds at most one outstanding frame request; the host delivers
//! the request back through [`Overlays::on_frame`](crate::Overlays::on_frame)
//! when its next frame runs. [`FrameQueue`] is an in-memory scheduler the
//! host drains once per frame.

use crate::surface::{Generation, SurfaceId};

/// Handle for cancelling a frame request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameHandle(u64);

impl FrameHandle {
    pub fn raw(&self) -> u64 {
        self.0
    }
}

/// Payload delivered when a requested frame runs.
///
/// Carries the generation that was current when the frame was requested, so
/// a callback outliving its transition is recognized and discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameCallback {
    pub surface: SurfaceId,
    pub generation: Generation,
}

impl FrameCallback {
    pub fn new(surface: SurfaceId, generation: Generation) -> Self {
        Self {
            surface,
            generation,
        }
    }
}

/// Request-next-frame primitive consumed by the controller.
pub trait FrameScheduler {
    /// Schedule `callback` for the next frame.
    fn request_frame(&mut self, callback: FrameCallback) -> FrameHandle;

    /// Cancel a pending request. Cancelling a request that already ran or was
    /// already cancelled is a no-op.
    fn cancel_frame(&mut self, handle: FrameHandle);
}

/// Deterministic frame queue.
///
/// Requests accumulate until [`drain`](Self::drain) hands them to the host;
/// requests made while the drained callbacks are processed wait for the next
/// drain, as with a browser's animation frame queue.
#[derive(Debug, Default)]
pub struct FrameQueue {
    next_handle: u64,
    pending: Vec<(FrameHandle, FrameCallback)>,
}

impl FrameQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take every pending callback, in request order.
    pub fn drain(&mut self) -> Vec<FrameCallback> {
        self.pending.drain(..).map(|(_, callback)| callback).collect()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Number of pending callbacks that reference `surface`.
    pub fn pending_for(&self, surface: SurfaceId) -> usize {
        self.pending
            .iter()
            .filter(|(_, callback)| callback.surface == surface)
            .count()
    }
}

impl FrameScheduler for FrameQueue {
    fn request_frame(&mut self, callback: FrameCallback) -> FrameHandle {
        self.next_handle += 1;
        let handle = FrameHandle(self.next_handle);
        self.pending.push((handle, callback));
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        self.pending.retain(|(pending, _)| *pending != handle);
    }
}
