use crate::CoreError;

pub fn ensure_finite(v: f64, what: &'static str) -> Result<f64, CoreError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(CoreError::NonFinite { what, value: v })
    }
}

/// Advance `current` by `step` without overshooting `target`.
///
/// A step that would land within `step * 1e-6` of the target snaps onto it, so
/// accumulated rounding never produces a trailing sliver step.
pub fn advance_towards(current: f64, step: f64, target: f64) -> f64 {
    let next = current + step;
    if next >= target - step.abs() * 1e-6 {
        target
    } else {
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ensure_finite_detects_nan() {
        let err = ensure_finite(f64::NAN, "test").unwrap_err();
        assert!(format!("{err}").contains("Non-finite"));
        assert_eq!(ensure_finite(2.5, "ok").unwrap(), 2.5);
    }

    #[test]
    fn advance_snaps_to_target() {
        let mut t = 0.0;
        let mut steps = 0;
        while t < 1.0 {
            t = advance_towards(t, 0.1, 1.0);
            steps += 1;
        }
        assert_eq!(steps, 10);
        assert_eq!(t, 1.0);
    }

    #[test]
    fn advance_clamps_partial_step() {
        assert_eq!(advance_towards(0.0, 0.3, 0.25), 0.25);
        assert_eq!(advance_towards(0.0, 0.1, 1.0), 0.1);
    }
}
