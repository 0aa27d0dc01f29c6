//! Lifecycle controller for animated overlays.
//!
//! A surface (slide-in menu, dropdown, modal) moves between `Closed` and
//! `Open` through frame-driven transitions. [`Overlays`] owns every surface,
//! guarantees one transition in flight per surface, discards stale frame
//! callbacks by generation, staggers child items, and dismisses open
//! surfaces on outside interaction.

pub mod config;
pub mod dismissal;
pub mod easing;
pub mod error;
pub mod frame;
pub mod layout;
pub mod overlays;
pub mod sequencer;
pub mod surface;
pub mod timeline;
pub mod transition;

pub use config::OverlayConfig;
pub use dismissal::{DismissPolicy, DismissReason, PointerEvent, PointerListeners};
pub use easing::Easing;
pub use error::OverlayError;
pub use frame::{FrameCallback, FrameHandle, FrameQueue, FrameScheduler};
pub use layout::Rect;
pub use overlays::Overlays;
pub use sequencer::{Sequence, StaggerOrder};
pub use surface::{
    ChildItem, Generation, StateChange, SubscriptionId, SurfaceHandle, SurfaceId, SurfaceState,
};
pub use timeline::{Pose, Timeline};
pub use transition::{Direction, OverlaySpec, Phase, PhaseTarget, TransitionSpec};
