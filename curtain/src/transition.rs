//! Declarative transition descriptions.
//!
//! A [`TransitionSpec`] is an ordered list of [`Phase`]s, each moving one
//! part of a surface (backdrop, panel, or the staggered children) toward its
//! target. Phases run one after another in declared order; a phase may start
//! early by its `overlap`. An [`OverlaySpec`] pairs the enter and exit specs
//! of one surface with its dismissal policy.

use std::fmt;
use std::time::Duration;

use crate::dismissal::DismissPolicy;
use crate::easing::Easing;
use crate::error::OverlayError;
use crate::sequencer::StaggerOrder;

/// Direction of a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Closed toward open.
    Enter,
    /// Open toward closed.
    Exit,
}

impl Direction {
    /// Openness every track reaches when a transition in this direction
    /// completes.
    pub fn target(self) -> f32 {
        match self {
            Direction::Enter => 1.0,
            Direction::Exit => 0.0,
        }
    }

    /// Openness a transition in this direction nominally starts from.
    pub fn origin(self) -> f32 {
        self.reverse().target()
    }

    pub fn reverse(self) -> Self {
        match self {
            Direction::Enter => Direction::Exit,
            Direction::Exit => Direction::Enter,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Enter => write!(f, "enter"),
            Direction::Exit => write!(f, "exit"),
        }
    }
}

/// Which part of the surface a phase animates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PhaseTarget {
    /// The dimming layer behind the panel.
    Backdrop,
    /// The panel itself (slide, drop, or scale-in).
    Panel,
    /// Every child item, staggered.
    Children,
}

/// One step of a transition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Phase {
    pub target: PhaseTarget,
    /// Duration of a full 0-to-1 move. Shorter moves are scaled down.
    pub duration: Duration,
    pub easing: Easing,
    /// Delay between consecutive children. Ignored for other targets.
    pub stagger: Duration,
    /// Order children are staggered in. Ignored for other targets.
    pub order: StaggerOrder,
    /// How long before the previous phase ends this one starts.
    pub overlap: Duration,
}

impl Phase {
    fn new(target: PhaseTarget, duration: Duration, easing: Easing) -> Self {
        Self {
            target,
            duration,
            easing,
            stagger: Duration::ZERO,
            order: StaggerOrder::Forward,
            overlap: Duration::ZERO,
        }
    }

    pub fn backdrop(duration: Duration, easing: Easing) -> Self {
        Self::new(PhaseTarget::Backdrop, duration, easing)
    }

    pub fn panel(duration: Duration, easing: Easing) -> Self {
        Self::new(PhaseTarget::Panel, duration, easing)
    }

    /// Children phase; child `k` starts `k * stagger` after the phase does.
    pub fn children(duration: Duration, easing: Easing, stagger: Duration) -> Self {
        Self {
            stagger,
            ..Self::new(PhaseTarget::Children, duration, easing)
        }
    }

    pub fn with_order(mut self, order: StaggerOrder) -> Self {
        self.order = order;
        self
    }

    pub fn with_overlap(mut self, overlap: Duration) -> Self {
        self.overlap = overlap;
        self
    }

    fn instant(self) -> Self {
        Self {
            duration: Duration::ZERO,
            stagger: Duration::ZERO,
            overlap: Duration::ZERO,
            ..self
        }
    }
}

/// Ordered phases of one directional transition.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransitionSpec {
    phases: Vec<Phase>,
}

impl TransitionSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a phase that runs after the ones already declared.
    pub fn then(mut self, phase: Phase) -> Self {
        self.phases.push(phase);
        self
    }

    pub fn phases(&self) -> &[Phase] {
        &self.phases
    }

    pub fn phase(&self, target: PhaseTarget) -> Option<&Phase> {
        self.phases.iter().find(|p| p.target == target)
    }

    /// Same phases with every duration, stagger and overlap set to zero.
    pub fn instant(&self) -> Self {
        Self {
            phases: self.phases.iter().map(|p| p.instant()).collect(),
        }
    }

    /// Check phase ordering for a transition in `direction`.
    ///
    /// Each target may appear once. Entering, children follow the panel so
    /// they start at its readiness point. Exiting, children precede the panel
    /// so none is visible once the panel has collapsed.
    pub fn validate(&self, direction: Direction) -> Result<(), OverlayError> {
        for (i, phase) in self.phases.iter().enumerate() {
            if self.phases[..i].iter().any(|p| p.target == phase.target) {
                return Err(OverlayError::InvalidTransition {
                    direction,
                    reason: "a phase target appears more than once",
                });
            }
        }

        let position = |target: PhaseTarget| self.phases.iter().position(|p| p.target == target);
        if let (Some(panel), Some(children)) =
            (position(PhaseTarget::Panel), position(PhaseTarget::Children))
        {
            match direction {
                Direction::Enter if children < panel => {
                    return Err(OverlayError::InvalidTransition {
                        direction,
                        reason: "children must be revealed after the panel",
                    });
                }
                Direction::Exit if children > panel => {
                    return Err(OverlayError::InvalidTransition {
                        direction,
                        reason: "children must be dismissed before the panel",
                    });
                }
                _ => {}
            }
        }
        Ok(())
    }
}

/// Everything a surface needs to animate and dismiss itself.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlaySpec {
    pub enter: TransitionSpec,
    pub exit: TransitionSpec,
    pub dismissal: DismissPolicy,
}

impl OverlaySpec {
    pub fn new(enter: TransitionSpec, exit: TransitionSpec) -> Self {
        Self {
            enter,
            exit,
            dismissal: DismissPolicy::default(),
        }
    }

    pub fn with_dismissal(mut self, dismissal: DismissPolicy) -> Self {
        self.dismissal = dismissal;
        self
    }

    pub fn transition(&self, direction: Direction) -> &TransitionSpec {
        match direction {
            Direction::Enter => &self.enter,
            Direction::Exit => &self.exit,
        }
    }

    /// True if either direction animates a backdrop. Outside clicks on such
    /// a surface land on the backdrop.
    pub fn has_backdrop(&self) -> bool {
        self.enter.phase(PhaseTarget::Backdrop).is_some()
            || self.exit.phase(PhaseTarget::Backdrop).is_some()
    }

    pub fn validate(&self) -> Result<(), OverlayError> {
        self.enter.validate(Direction::Enter)?;
        self.exit.validate(Direction::Exit)
    }

    /// Navigation panel sliding in from the left edge over a dimmed backdrop.
    pub fn slide_menu() -> Self {
        Self::new(
            TransitionSpec::new()
                .then(Phase::backdrop(ms(300), Easing::EaseOut))
                .then(Phase::panel(ms(500), Easing::Power4Out))
                .then(Phase::children(ms(500), Easing::Power2Out, ms(100))),
            TransitionSpec::new()
                .then(Phase::children(ms(500), Easing::Power2In, ms(50)))
                .then(Phase::panel(ms(500), Easing::Power4In))
                .then(Phase::backdrop(ms(300), Easing::EaseIn)),
        )
    }

    /// Centered promotional modal rising into place with a slight overshoot.
    pub fn modal() -> Self {
        Self::new(
            TransitionSpec::new()
                .then(Phase::backdrop(ms(300), Easing::EaseOut))
                .then(Phase::panel(ms(500), Easing::BackOut { overshoot: 1.2 }))
                .then(Phase::children(ms(400), Easing::EaseOut, ms(100))),
            TransitionSpec::new()
                .then(Phase::children(ms(300), Easing::EaseIn, ms(50)))
                .then(Phase::panel(ms(300), Easing::EaseIn))
                .then(Phase::backdrop(ms(300), Easing::EaseIn)),
        )
    }

    /// Categorized dropdown anchored under its trigger. No backdrop.
    pub fn dropdown() -> Self {
        Self::new(
            TransitionSpec::new()
                .then(Phase::panel(ms(150), Easing::EaseOut))
                .then(Phase::children(ms(400), Easing::Power2Out, ms(40))),
            TransitionSpec::new()
                .then(Phase::children(ms(150), Easing::EaseIn, ms(20)))
                .then(Phase::panel(ms(150), Easing::EaseIn)),
        )
    }
}

fn ms(millis: u64) -> Duration {
    Duration::from_millis(millis)
}
