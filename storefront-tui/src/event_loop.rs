//! Main event loop.
//!
//! Passive while nothing animates: the loop sleeps on the terminal event
//! stream. While any surface has a frame pending, an interval ticks at the
//! frame rate and each tick runs one controller frame.

use std::time::{Duration, Instant};

use crossterm::event::EventStream;
use curtain::OverlayConfig;
use futures::StreamExt;
use log::{debug, error, info, trace};
use tokio::time::MissedTickBehavior;

use crate::app::Storefront;
use crate::error::StorefrontError;
use crate::render;
use crate::terminal::TerminalGuard;

const FRAME_INTERVAL: Duration = Duration::from_millis(16);

pub async fn run(config: OverlayConfig) -> Result<(), StorefrontError> {
    let mut terminal = TerminalGuard::new()?;
    let (width, height) = terminal.size()?;
    let mut app = Storefront::new(width, height, config)?;
    info!(
        "Storefront started: {}x{}, reduced_motion={}",
        width,
        height,
        app.overlays().config().reduced_motion
    );

    let mut events = EventStream::new();
    let mut frames = tokio::time::interval(FRAME_INTERVAL);
    frames.set_missed_tick_behavior(MissedTickBehavior::Skip);

    render::draw(terminal.stdout(), &app)?;

    while !app.should_quit() {
        let animating = app.is_animating();

        tokio::select! {
            // Branch 1: terminal input
            maybe_event = events.next() => match maybe_event {
                Some(Ok(event)) => {
                    trace!("Crossterm event: {:?}", event);
                    app.handle_event(event)?;
                }
                Some(Err(e)) => error!("Event stream error: {}", e),
                None => {
                    debug!("Event stream closed");
                    break;
                }
            },

            // Branch 2: animation frame (only while a transition is running)
            _ = frames.tick(), if animating => {
                app.tick(Instant::now());
            }
        }

        render::draw(terminal.stdout(), &app)?;
    }

    info!("Storefront exiting");
    Ok(())
}
