mod support;

use std::time::{Duration, Instant};

use curtain::{
    Direction, Easing, FrameQueue, OverlayConfig, OverlaySpec, Overlays, Phase, Pose,
    StaggerOrder, SurfaceHandle, SurfaceState, Timeline, TransitionSpec,
};

use support::{children, frame, ms, settle, Clock};

const STEP: Duration = Duration::from_millis(40);

fn staggered(exit_order: StaggerOrder) -> OverlaySpec {
    OverlaySpec::new(
        TransitionSpec::new()
            .then(Phase::panel(ms(50), Easing::Linear))
            .then(Phase::children(ms(100), Easing::Linear, STEP)),
        TransitionSpec::new()
            .then(Phase::children(ms(100), Easing::Linear, STEP).with_order(exit_order))
            .then(Phase::panel(ms(50), Easing::Linear)),
    )
}

/// Per frame: timestamp, state, and pose after the frame ran.
type Trace = Vec<(Instant, SurfaceState, Pose)>;

fn trace(overlays: &mut Overlays, clock: &mut Clock, handle: SurfaceHandle) -> Trace {
    let mut out = Vec::new();
    while overlays.has_pending_frames() {
        frame(overlays, clock, ms(1));
        out.push((
            clock.now(),
            overlays.state(handle).unwrap(),
            overlays.pose(handle).unwrap().clone(),
        ));
    }
    out
}

/// First frame at which `moved` holds for each child.
fn first_moves(trace: &Trace, count: usize, moved: impl Fn(f32) -> bool) -> Vec<Instant> {
    (0..count)
        .map(|i| {
            trace
                .iter()
                .find(|(_, _, pose)| moved(pose.children[i]))
                .map(|(at, _, _)| *at)
                .unwrap()
        })
        .collect()
}

fn assert_spaced(starts: &[Instant], step: Duration) {
    for pair in starts.windows(2) {
        let delta = pair[1] - pair[0];
        assert!(
            delta + ms(2) >= step && delta <= step + ms(2),
            "start delta {:?}, expected {:?}",
            delta,
            step
        );
    }
}

// =============================================================================
// Reveal
// =============================================================================

#[test]
fn test_children_reveal_staggered_by_index() {
    let mut overlays = Overlays::new(FrameQueue::new());
    let mut clock = Clock::new();
    let menu = overlays
        .create_surface(children(4), staggered(StaggerOrder::Forward))
        .unwrap();

    overlays.open(menu).unwrap();
    let frames = trace(&mut overlays, &mut clock, menu);
    let starts = first_moves(&frames, 4, |v| v > 0.0);
    assert_spaced(&starts, STEP);
}

#[test]
fn test_children_wait_for_panel() {
    let mut overlays = Overlays::new(FrameQueue::new());
    let mut clock = Clock::new();
    let menu = overlays
        .create_surface(children(3), staggered(StaggerOrder::Forward))
        .unwrap();

    overlays.open(menu).unwrap();
    for (_, _, pose) in trace(&mut overlays, &mut clock, menu) {
        if pose.children.iter().any(|c| *c > 0.0) {
            assert_eq!(pose.panel, 1.0, "{:?}", pose);
        }
    }
}

#[test]
fn test_open_only_after_last_child() {
    let mut overlays = Overlays::new(FrameQueue::new());
    let mut clock = Clock::new();
    let menu = overlays
        .create_surface(children(3), staggered(StaggerOrder::Forward))
        .unwrap();

    overlays.open(menu).unwrap();
    let frames = trace(&mut overlays, &mut clock, menu);
    for (_, state, pose) in &frames {
        if *state == SurfaceState::Opening {
            assert!(pose.children[2] < 1.0, "{:?}", pose);
        }
    }
    let (_, state, pose) = frames.last().unwrap();
    assert_eq!(*state, SurfaceState::Open);
    assert_eq!(pose, &Pose::open(3));
}

// =============================================================================
// Dismissal Order
// =============================================================================

#[test]
fn test_children_leave_before_panel() {
    let mut overlays = Overlays::new(FrameQueue::new());
    let mut clock = Clock::new();
    let menu = overlays
        .create_surface(children(3), staggered(StaggerOrder::Forward))
        .unwrap();

    overlays.open(menu).unwrap();
    settle(&mut overlays, &mut clock);
    overlays.close(menu).unwrap();

    for (_, _, pose) in trace(&mut overlays, &mut clock, menu) {
        if pose.panel < 1.0 {
            assert!(pose.children.iter().all(|c| *c == 0.0), "{:?}", pose);
        }
    }
    assert_eq!(overlays.state(menu).unwrap(), SurfaceState::Closed);
}

#[test]
fn test_exit_stagger_forward() {
    let mut overlays = Overlays::new(FrameQueue::new());
    let mut clock = Clock::new();
    let menu = overlays
        .create_surface(children(3), staggered(StaggerOrder::Forward))
        .unwrap();

    overlays.open(menu).unwrap();
    settle(&mut overlays, &mut clock);
    overlays.close(menu).unwrap();

    let frames = trace(&mut overlays, &mut clock, menu);
    let starts = first_moves(&frames, 3, |v| v < 1.0);
    assert_spaced(&starts, STEP);
}

#[test]
fn test_exit_stagger_reverse() {
    let mut overlays = Overlays::new(FrameQueue::new());
    let mut clock = Clock::new();
    let menu = overlays
        .create_surface(children(3), staggered(StaggerOrder::Reverse))
        .unwrap();

    overlays.open(menu).unwrap();
    settle(&mut overlays, &mut clock);
    overlays.close(menu).unwrap();

    let frames = trace(&mut overlays, &mut clock, menu);
    let mut starts = first_moves(&frames, 3, |v| v < 1.0);
    starts.reverse();
    assert_spaced(&starts, STEP);
}

// =============================================================================
// Presets
// =============================================================================

#[test]
fn test_slide_menu_timing() {
    let spec = OverlaySpec::slide_menu();
    let enter = Timeline::compile(&spec.enter, Direction::Enter, &Pose::closed(5));
    assert_eq!(enter.panel_end(), ms(800));
    assert_eq!(enter.children().start_of(4), Some(ms(800 + 400)));
    assert_eq!(enter.total(), ms(300 + 500 + 500 + 400));

    let exit = Timeline::compile(&spec.exit, Direction::Exit, &Pose::open(5));
    assert_eq!(exit.children().end(), ms(500 + 200));
    assert_eq!(exit.total(), ms(700 + 500 + 300));
}

#[test]
fn test_dropdown_timing() {
    let spec = OverlaySpec::dropdown();
    let enter = Timeline::compile(&spec.enter, Direction::Enter, &Pose::closed(6));
    assert_eq!(enter.total(), ms(150 + 400 + 5 * 40));
    let exit = Timeline::compile(&spec.exit, Direction::Exit, &Pose::open(6));
    assert_eq!(exit.total(), ms(150 + 5 * 20 + 150));
}

// =============================================================================
// Reduced Motion
// =============================================================================

#[test]
fn test_reduced_motion_settles_in_one_frame() {
    let config = OverlayConfig::new().reduced_motion(true);
    let mut overlays = Overlays::with_config(FrameQueue::new(), config);
    let mut clock = Clock::new();
    let menu = overlays
        .create_surface(children(5), OverlaySpec::slide_menu())
        .unwrap();

    overlays.open(menu).unwrap();
    assert_eq!(overlays.state(menu).unwrap(), SurfaceState::Opening);
    assert_eq!(settle(&mut overlays, &mut clock), 1);
    assert_eq!(overlays.state(menu).unwrap(), SurfaceState::Open);
    assert_eq!(overlays.pose(menu).unwrap(), &Pose::open(5));

    overlays.close(menu).unwrap();
    assert_eq!(settle(&mut overlays, &mut clock), 1);
    assert_eq!(overlays.state(menu).unwrap(), SurfaceState::Closed);
}

#[test]
fn test_reduced_motion_applies_to_later_transitions() {
    let mut overlays = Overlays::new(FrameQueue::new());
    let mut clock = Clock::new();
    let menu = overlays
        .create_surface(children(2), OverlaySpec::modal())
        .unwrap();

    overlays.open(menu).unwrap();
    overlays.set_reduced_motion(true);
    assert!(settle(&mut overlays, &mut clock) > 1);

    overlays.close(menu).unwrap();
    assert_eq!(settle(&mut overlays, &mut clock), 1);
}
