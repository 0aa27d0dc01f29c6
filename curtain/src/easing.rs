/// Easing curve applied to a phase's normalized progress.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum Easing {
    #[default]
    Linear,
    /// Quadratic, slow start.
    EaseIn,
    /// Quadratic, fast start.
    EaseOut,
    EaseInOut,
    /// Cubic, slow start.
    Power2In,
    /// Cubic, fast start.
    Power2Out,
    /// Quintic, slow start.
    Power4In,
    /// Quintic, fast start. Used for panels sliding into place.
    Power4Out,
    /// Overshoots the target by an amount controlled by `overshoot`, then
    /// settles back onto it.
    BackOut { overshoot: f32 },
}

impl Easing {
    /// Apply easing to progress (0.0 to 1.0).
    ///
    /// Input outside the unit range is clamped. Every curve maps 0 to 0 and
    /// 1 to 1; `BackOut` may exceed 1 in between.
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::EaseIn => t * t,
            Easing::EaseOut => 1.0 - (1.0 - t) * (1.0 - t),
            Easing::EaseInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
            Easing::Power2In => t.powi(3),
            Easing::Power2Out => 1.0 - (1.0 - t).powi(3),
            Easing::Power4In => t.powi(5),
            Easing::Power4Out => 1.0 - (1.0 - t).powi(5),
            Easing::BackOut { overshoot } => {
                let p = 1.0 - t;
                1.0 - p * p * ((overshoot + 1.0) * p - overshoot)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn back_out_overshoots_then_lands() {
        let easing = Easing::BackOut { overshoot: 1.2 };
        assert!(easing.apply(0.0).abs() < 1e-6);
        assert!((easing.apply(1.0) - 1.0).abs() < 1e-6);
        let peak = (1..100)
            .map(|i| easing.apply(i as f32 / 100.0))
            .fold(0.0_f32, f32::max);
        assert!(peak > 1.0, "expected overshoot, peak was {}", peak);
    }

    #[test]
    fn input_is_clamped() {
        assert_eq!(Easing::Power4Out.apply(-0.5), 0.0);
        assert_eq!(Easing::Power4Out.apply(1.5), 1.0);
    }
}
