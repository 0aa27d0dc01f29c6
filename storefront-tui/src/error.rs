use std::io;

use curtain::OverlayError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorefrontError {
    #[error("Terminal I/O failed: {0}")]
    Io(#[from] io::Error),

    #[error("Overlay request failed: {0}")]
    Overlay(#[from] OverlayError),
}
