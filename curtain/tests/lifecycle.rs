mod support;

use curtain::{
    DismissReason, FrameQueue, OverlayError, OverlaySpec, Overlays, PointerEvent, Rect,
    SurfaceHandle, SurfaceState, TransitionSpec,
};

use support::{children, frame, linear_dropdown, linear_spec, ms, record, settle, Clock};

#[derive(Debug, Clone, Copy)]
enum Op {
    Open,
    Close,
    Toggle,
}

const OPS: [Op; 3] = [Op::Open, Op::Close, Op::Toggle];

fn apply(overlays: &mut Overlays, handle: SurfaceHandle, op: Op) {
    let result = match op {
        Op::Open => overlays.open(handle),
        Op::Close => overlays.close(handle),
        Op::Toggle => overlays.toggle(handle),
    };
    assert!(result.is_ok(), "{:?} failed: {:?}", op, result);
}

/// Final settled state after `ops`, per the request semantics.
fn fold(ops: &[Op]) -> SurfaceState {
    let mut opening = false;
    for op in ops {
        opening = match op {
            Op::Open => true,
            Op::Close => false,
            Op::Toggle => !opening,
        };
    }
    if opening {
        SurfaceState::Open
    } else {
        SurfaceState::Closed
    }
}

fn is_legal(from: SurfaceState, to: SurfaceState) -> bool {
    use SurfaceState::*;
    matches!(
        (from, to),
        (Closed, Opening) | (Opening, Open) | (Opening, Closing) | (Open, Closing) | (Closing, Closed) | (Closing, Opening)
    )
}

fn sequences(max_len: usize) -> Vec<Vec<Op>> {
    let mut all = vec![Vec::new()];
    let mut frontier = vec![Vec::new()];
    for _ in 0..max_len {
        let mut next = Vec::new();
        for prefix in &frontier {
            for op in OPS {
                let mut seq: Vec<Op> = prefix.clone();
                seq.push(op);
                next.push(seq);
            }
        }
        all.extend(next.iter().cloned());
        frontier = next;
    }
    all
}

// =============================================================================
// Request Semantics
// =============================================================================

#[test]
fn test_new_surface_is_closed() {
    let mut overlays = Overlays::new(FrameQueue::new());
    let menu = overlays.create_surface(children(3), linear_spec()).unwrap();
    assert_eq!(overlays.state(menu).unwrap(), SurfaceState::Closed);
    assert!(!overlays.is_mounted(menu).unwrap());
    assert!(!overlays.accepts_input(menu).unwrap());
    assert!(!overlays.has_pending_frames());
}

#[test]
fn test_open_runs_to_open() {
    let mut overlays = Overlays::new(FrameQueue::new());
    let mut clock = Clock::new();
    let menu = overlays.create_surface(children(3), linear_spec()).unwrap();

    overlays.open(menu).unwrap();
    assert_eq!(overlays.state(menu).unwrap(), SurfaceState::Opening);
    assert!(overlays.is_mounted(menu).unwrap());
    assert!(!overlays.accepts_input(menu).unwrap());

    settle(&mut overlays, &mut clock);
    assert_eq!(overlays.state(menu).unwrap(), SurfaceState::Open);
    assert!(overlays.accepts_input(menu).unwrap());
    assert_eq!(overlays.pose(menu).unwrap().children, vec![1.0, 1.0, 1.0]);
    assert_eq!(overlays.child_subscriptions(menu).unwrap(), 0);
}

#[test]
fn test_same_direction_request_is_noop() {
    let mut overlays = Overlays::new(FrameQueue::new());
    let mut clock = Clock::new();
    let menu = overlays.create_surface(children(2), linear_spec()).unwrap();
    let log = record(&mut overlays, menu);

    overlays.close(menu).unwrap();
    assert_eq!(overlays.generation(menu).unwrap().raw(), 0);
    assert!(log.borrow().is_empty());

    overlays.open(menu).unwrap();
    let generation = overlays.generation(menu).unwrap();
    overlays.open(menu).unwrap();
    assert_eq!(overlays.generation(menu).unwrap(), generation);
    assert_eq!(overlays.scheduler().len(), 1);

    settle(&mut overlays, &mut clock);
    overlays.open(menu).unwrap();
    assert_eq!(overlays.generation(menu).unwrap(), generation);
    assert_eq!(overlays.state(menu).unwrap(), SurfaceState::Open);
    assert_eq!(log.borrow().len(), 2);
}

#[test]
fn test_toggle_follows_heading() {
    let mut overlays = Overlays::new(FrameQueue::new());
    let mut clock = Clock::new();
    let menu = overlays.create_surface(children(1), linear_spec()).unwrap();

    overlays.toggle(menu).unwrap();
    assert_eq!(overlays.state(menu).unwrap(), SurfaceState::Opening);
    overlays.toggle(menu).unwrap();
    assert_eq!(overlays.state(menu).unwrap(), SurfaceState::Closing);
    overlays.toggle(menu).unwrap();
    assert_eq!(overlays.state(menu).unwrap(), SurfaceState::Opening);

    settle(&mut overlays, &mut clock);
    overlays.toggle(menu).unwrap();
    assert_eq!(overlays.state(menu).unwrap(), SurfaceState::Closing);
    settle(&mut overlays, &mut clock);
    assert_eq!(overlays.state(menu).unwrap(), SurfaceState::Closed);
}

#[test]
fn test_invalid_spec_is_rejected() {
    let mut overlays = Overlays::new(FrameQueue::new());
    let backwards = OverlaySpec::new(
        TransitionSpec::new()
            .then(curtain::Phase::children(ms(100), curtain::Easing::Linear, ms(10)))
            .then(curtain::Phase::panel(ms(100), curtain::Easing::Linear)),
        TransitionSpec::new(),
    );
    let result = overlays.create_surface(children(1), backwards);
    assert!(matches!(result, Err(OverlayError::InvalidTransition { .. })));
    assert!(overlays.is_empty());
}

// =============================================================================
// Rapid Sequences
// =============================================================================

#[test]
fn test_rapid_sequences_settle_to_fold() {
    for ops in sequences(5) {
        let mut overlays = Overlays::new(FrameQueue::new());
        let mut clock = Clock::new();
        let menu = overlays.create_surface(children(3), linear_spec()).unwrap();
        let log = record(&mut overlays, menu);

        for op in &ops {
            apply(&mut overlays, menu, *op);
        }
        settle(&mut overlays, &mut clock);

        let expected = fold(&ops);
        assert_eq!(overlays.state(menu).unwrap(), expected, "ops: {:?}", ops);
        assert_eq!(overlays.child_subscriptions(menu).unwrap(), 0);

        let listeners = overlays.listeners();
        let open = usize::from(expected == SurfaceState::Open);
        assert_eq!(listeners.attached(), open, "ops: {:?}", ops);
        assert_eq!(listeners.attach_count(), open, "ops: {:?}", ops);
        assert_eq!(listeners.detach_count(), 0, "ops: {:?}", ops);

        for change in log.borrow().iter() {
            assert!(is_legal(change.from, change.to), "{:?} in {:?}", change, ops);
        }
    }
}

#[test]
fn test_interleaved_requests_and_frames_settle_to_fold() {
    let mut seed: u64 = 0x9e37_79b9_7f4a_7c15;
    let mut next = move || {
        seed ^= seed << 13;
        seed ^= seed >> 7;
        seed ^= seed << 17;
        seed
    };

    for _ in 0..200 {
        let mut overlays = Overlays::new(FrameQueue::new());
        let mut clock = Clock::new();
        let menu = overlays.create_surface(children(4), linear_spec()).unwrap();
        let log = record(&mut overlays, menu);

        let len = 1 + (next() % 8) as usize;
        let mut ops = Vec::with_capacity(len);
        for _ in 0..len {
            let op = OPS[(next() % 3) as usize];
            ops.push(op);
            apply(&mut overlays, menu, op);
            for _ in 0..(next() % 12) {
                frame(&mut overlays, &mut clock, ms(5 + next() % 60));
            }
        }
        settle(&mut overlays, &mut clock);

        let expected = fold(&ops);
        assert_eq!(overlays.state(menu).unwrap(), expected, "ops: {:?}", ops);

        let listeners = overlays.listeners();
        let open = usize::from(expected == SurfaceState::Open);
        assert_eq!(listeners.attached(), open);
        assert_eq!(listeners.attach_count() - listeners.detach_count(), open);

        let log = log.borrow();
        for change in log.iter() {
            assert!(is_legal(change.from, change.to), "{:?} in {:?}", change, ops);
        }
        for pair in log.windows(2) {
            assert_eq!(pair[0].to, pair[1].from);
            assert!(pair[0].generation <= pair[1].generation);
        }
    }
}

// =============================================================================
// End To End
// =============================================================================

#[test]
fn test_open_then_outside_pointer_closes() {
    support::init_logging();
    let mut overlays = Overlays::new(FrameQueue::new());
    let mut clock = Clock::new();
    let dropdown = overlays.create_surface(children(3), linear_dropdown()).unwrap();
    overlays
        .set_bounds(dropdown, vec![Rect::new(10, 2, 20, 5)])
        .unwrap();
    let log = record(&mut overlays, dropdown);

    overlays
        .open_from(dropdown, &PointerEvent::new(1, 12, 0))
        .unwrap();
    settle(&mut overlays, &mut clock);
    assert_eq!(overlays.state(dropdown).unwrap(), SurfaceState::Open);
    assert!(overlays.listeners().is_attached(dropdown));

    let dismissed = overlays.pointer_down(PointerEvent::new(2, 50, 20));
    assert_eq!(dismissed, vec![dropdown]);
    assert_eq!(overlays.state(dropdown).unwrap(), SurfaceState::Closing);
    assert!(!overlays.listeners().is_attached(dropdown));

    settle(&mut overlays, &mut clock);
    assert_eq!(overlays.state(dropdown).unwrap(), SurfaceState::Closed);
    assert_eq!(overlays.listeners().attach_count(), 1);
    assert_eq!(overlays.listeners().detach_count(), 1);

    let seen: Vec<(SurfaceState, SurfaceState, Option<DismissReason>)> =
        log.borrow().iter().map(|c| (c.from, c.to, c.reason)).collect();
    assert_eq!(
        seen,
        vec![
            (SurfaceState::Closed, SurfaceState::Opening, None),
            (SurfaceState::Opening, SurfaceState::Open, None),
            (
                SurfaceState::Open,
                SurfaceState::Closing,
                Some(DismissReason::OutsidePointer)
            ),
            (
                SurfaceState::Closing,
                SurfaceState::Closed,
                Some(DismissReason::OutsidePointer)
            ),
        ]
    );
}

#[test]
fn test_removed_observer_is_not_called() {
    let mut overlays = Overlays::new(FrameQueue::new());
    let menu = overlays.create_surface(children(1), linear_spec()).unwrap();
    let log = std::rc::Rc::new(std::cell::RefCell::new(0));
    let sink = std::rc::Rc::clone(&log);
    let subscription = overlays
        .on_state_change(menu, move |_| *sink.borrow_mut() += 1)
        .unwrap();

    overlays.open(menu).unwrap();
    assert!(overlays.remove_state_listener(menu, subscription).unwrap());
    assert!(!overlays.remove_state_listener(menu, subscription).unwrap());
    overlays.close(menu).unwrap();
    assert_eq!(*log.borrow(), 1);
}

#[test]
fn test_stack_orders_mounted_surfaces() {
    let mut overlays = Overlays::new(FrameQueue::new());
    let mut clock = Clock::new();
    let menu = overlays.create_surface(children(1), linear_spec()).unwrap();
    let modal = overlays.create_surface(children(1), linear_spec()).unwrap();
    overlays.set_bounds(menu, vec![Rect::new(0, 0, 10, 10)]).unwrap();
    overlays.set_bounds(modal, vec![Rect::new(5, 5, 10, 10)]).unwrap();

    overlays.open(menu).unwrap();
    overlays.open(modal).unwrap();
    assert_eq!(overlays.mounted_surfaces().collect::<Vec<_>>(), vec![menu, modal]);
    assert_eq!(overlays.hit_test(6, 6), None);

    settle(&mut overlays, &mut clock);
    assert_eq!(overlays.hit_test(6, 6), Some(modal));
    assert_eq!(overlays.hit_test(1, 1), Some(menu));
    assert_eq!(
        overlays.interactive_surfaces().collect::<Vec<_>>(),
        vec![menu, modal]
    );

    overlays.close(modal).unwrap();
    assert_eq!(overlays.mounted_surfaces().collect::<Vec<_>>(), vec![menu, modal]);
    assert_eq!(overlays.interactive_surfaces().collect::<Vec<_>>(), vec![menu]);
    settle(&mut overlays, &mut clock);
    assert_eq!(overlays.mounted_surfaces().collect::<Vec<_>>(), vec![menu]);
}
