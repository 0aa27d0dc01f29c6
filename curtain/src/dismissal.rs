//! Dismissal policy and the per-surface interaction listener.
//!
//! A surface listens for outside interaction only while it is `Open`. The
//! listener is a scoped resource: [`PointerListeners::attach`] hands back a
//! [`ListenerGuard`] that the surface holds, and dropping the guard detaches.
//! Leaving `Open`, destroying the surface, or dropping the whole controller
//! therefore always releases it.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::{Rc, Weak};

use crate::surface::SurfaceId;

/// Pointer-down event from the host's global pointer stream.
///
/// `seq` increases with every event the host delivers. The controller uses
/// it to ignore the very event that opened a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerEvent {
    pub seq: u64,
    pub x: u16,
    pub y: u16,
}

impl PointerEvent {
    pub fn new(seq: u64, x: u16, y: u16) -> Self {
        Self { seq, x, y }
    }
}

/// Why a surface was asked to close.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DismissReason {
    /// Pointer down outside a surface without a backdrop.
    OutsidePointer,
    /// Pointer down on the backdrop of a surface that has one.
    Backdrop,
    /// Escape key.
    Escape,
    /// `close()` or `toggle()` called by the view.
    Programmatic,
}

/// Which interactions dismiss an open surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DismissPolicy {
    /// Close on pointer down outside the surface's bounds.
    pub outside_pointer: bool,
    /// Close on Escape while the surface is the topmost open one.
    pub escape: bool,
}

impl Default for DismissPolicy {
    fn default() -> Self {
        Self {
            outside_pointer: true,
            escape: true,
        }
    }
}

impl DismissPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Only programmatic close.
    pub fn manual() -> Self {
        Self {
            outside_pointer: false,
            escape: false,
        }
    }

    pub fn outside_pointer(mut self, enabled: bool) -> Self {
        self.outside_pointer = enabled;
        self
    }

    pub fn escape(mut self, enabled: bool) -> Self {
        self.escape = enabled;
        self
    }

    /// True if an open surface needs a listener at all.
    pub fn listens(&self) -> bool {
        self.outside_pointer || self.escape
    }
}

#[derive(Debug, Clone, Copy)]
struct Binding {
    /// Events with `seq` at or below this were dispatched before the
    /// listener existed.
    armed_after: u64,
}

#[derive(Debug, Default)]
struct ListenerTable {
    bindings: BTreeMap<SurfaceId, Binding>,
    attached_total: usize,
    detached_total: usize,
}

impl ListenerTable {
    fn detach(&mut self, surface: SurfaceId) {
        if self.bindings.remove(&surface).is_some() {
            self.detached_total += 1;
            log::debug!("Dismissal listener detached: surface={}", surface);
        }
    }
}

/// Registry of attached dismissal listeners, one per open surface.
///
/// Only the controller attaches and detaches; views read it for diagnostics.
#[derive(Debug, Clone, Default)]
pub struct PointerListeners {
    table: Rc<RefCell<ListenerTable>>,
}

impl PointerListeners {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a listener for `surface`, armed for events after
    /// `armed_after`. Returns `None` if one is already attached.
    pub(crate) fn attach(&self, surface: SurfaceId, armed_after: u64) -> Option<ListenerGuard> {
        let mut table = self.table.borrow_mut();
        if table.bindings.contains_key(&surface) {
            return None;
        }
        table.bindings.insert(surface, Binding { armed_after });
        table.attached_total += 1;
        log::debug!(
            "Dismissal listener attached: surface={}, armed_after={}",
            surface,
            armed_after
        );
        Some(ListenerGuard {
            surface,
            table: Rc::downgrade(&self.table),
        })
    }

    /// Surfaces whose listener should see an event with sequence `seq`.
    pub(crate) fn armed_for(&self, seq: u64) -> Vec<SurfaceId> {
        self.table
            .borrow()
            .bindings
            .iter()
            .filter(|(_, binding)| seq > binding.armed_after)
            .map(|(surface, _)| *surface)
            .collect()
    }

    pub fn is_attached(&self, surface: SurfaceId) -> bool {
        self.table.borrow().bindings.contains_key(&surface)
    }

    /// Number of listeners currently attached.
    pub fn attached(&self) -> usize {
        self.table.borrow().bindings.len()
    }

    /// Total attaches since the controller was created.
    pub fn attach_count(&self) -> usize {
        self.table.borrow().attached_total
    }

    /// Total detaches since the controller was created.
    pub fn detach_count(&self) -> usize {
        self.table.borrow().detached_total
    }
}

/// Scoped ownership of one surface's listener. Dropping it detaches.
#[derive(Debug)]
pub(crate) struct ListenerGuard {
    surface: SurfaceId,
    table: Weak<RefCell<ListenerTable>>,
}

impl Drop for ListenerGuard {
    fn drop(&mut self) {
        if let Some(table) = self.table.upgrade() {
            table.borrow_mut().detach(self.surface);
        }
    }
}
