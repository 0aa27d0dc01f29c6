//! Controller configuration.

/// Settings shared by every surface of one [`Overlays`](crate::Overlays).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OverlayConfig {
    /// Reduced motion (accessibility). Transitions still pass through
    /// `Opening`/`Closing`, but every duration is zero so they settle on the
    /// next frame.
    pub reduced_motion: bool,
}

impl OverlayConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable reduced motion.
    pub fn reduced_motion(mut self, enabled: bool) -> Self {
        self.reduced_motion = enabled;
        self
    }
}
