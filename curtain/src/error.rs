//! Errors returned by the overlay controller.
//!
//! Every variant is a caller contract violation, not a runtime condition a
//! user can trigger. Stale frame callbacks and redundant listener detaches
//! are discarded silently and never surface here.

use thiserror::Error;

use crate::surface::SurfaceId;
use crate::transition::Direction;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OverlayError {
    /// The handle refers to a surface that was destroyed or never created.
    #[error("Surface {0} does not exist (destroyed or never created)")]
    UnknownSurface(SurfaceId),

    /// A transition's phases are ordered in a way the controller cannot honor.
    #[error("Invalid {direction} transition: {reason}")]
    InvalidTransition {
        /// Direction of the offending transition.
        direction: Direction,
        /// What is wrong with its phases.
        reason: &'static str,
    },
}
