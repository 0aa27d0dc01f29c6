//! Shared helpers for controller tests.

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use curtain::{
    ChildItem, Easing, OverlaySpec, Overlays, Phase, StateChange, SurfaceHandle, TransitionSpec,
};

pub const FRAME: Duration = Duration::from_millis(16);

/// Route controller logs to the test harness. Safe to call repeatedly.
pub fn init_logging() {
    let _ = simplelog::TestLogger::init(simplelog::LevelFilter::Trace, simplelog::Config::default());
}

pub fn ms(millis: u64) -> Duration {
    Duration::from_millis(millis)
}

pub fn children(count: usize) -> Vec<ChildItem> {
    (0..count).map(|i| ChildItem::new(format!("item-{}", i))).collect()
}

/// Manually advanced frame clock.
pub struct Clock {
    now: Instant,
}

impl Clock {
    pub fn new() -> Self {
        Self { now: Instant::now() }
    }

    pub fn now(&self) -> Instant {
        self.now
    }

    pub fn tick(&mut self, by: Duration) -> Instant {
        self.now += by;
        self.now
    }
}

/// Run one frame `by` after the previous one.
pub fn frame(overlays: &mut Overlays, clock: &mut Clock, by: Duration) {
    let now = clock.tick(by);
    overlays.advance(now);
}

/// Run frames until no transition is waiting. Returns the frame count.
pub fn settle(overlays: &mut Overlays, clock: &mut Clock) -> usize {
    let mut frames = 0;
    while overlays.has_pending_frames() {
        frame(overlays, clock, FRAME);
        frames += 1;
        assert!(frames < 10_000, "transitions never settled");
    }
    frames
}

/// Record every state change of `handle`.
pub fn record(overlays: &mut Overlays, handle: SurfaceHandle) -> Rc<RefCell<Vec<StateChange>>> {
    let log = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&log);
    overlays
        .on_state_change(handle, move |change| sink.borrow_mut().push(*change))
        .unwrap();
    log
}

/// Backdrop 100ms, panel 200ms, children 100ms staggered 50ms, all linear.
/// Exit mirrors it with children first.
pub fn linear_spec() -> OverlaySpec {
    OverlaySpec::new(
        TransitionSpec::new()
            .then(Phase::backdrop(ms(100), Easing::Linear))
            .then(Phase::panel(ms(200), Easing::Linear))
            .then(Phase::children(ms(100), Easing::Linear, ms(50))),
        TransitionSpec::new()
            .then(Phase::children(ms(100), Easing::Linear, ms(50)))
            .then(Phase::panel(ms(200), Easing::Linear))
            .then(Phase::backdrop(ms(100), Easing::Linear)),
    )
}

/// Panel and children only; outside clicks are plain outside pointers.
pub fn linear_dropdown() -> OverlaySpec {
    OverlaySpec::new(
        TransitionSpec::new()
            .then(Phase::panel(ms(100), Easing::Linear))
            .then(Phase::children(ms(100), Easing::Linear, ms(20))),
        TransitionSpec::new()
            .then(Phase::children(ms(100), Easing::Linear, ms(20)))
            .then(Phase::panel(ms(100), Easing::Linear)),
    )
}
