/// jQuery's `"slow"` duration.
pub const SLOW_MS: f64 = 600.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Easing {
    Linear,
    /// d3's default `easeCubicInOut`.
    CubicInOut,
}

impl Easing {
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::CubicInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    let u = -2.0 * t + 2.0;
                    1.0 - u * u * u / 2.0
                }
            }
        }
    }
}

/// A scalar moving from `from` to `to` over `duration_ms`, starting at `start_ms`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tween {
    pub from: f64,
    pub to: f64,
    pub start_ms: f64,
    pub duration_ms: f64,
    pub easing: Easing,
}

impl Tween {
    pub fn new(from: f64, to: f64, start_ms: f64, duration_ms: f64) -> Self {
        Tween {
            from,
            to,
            start_ms,
            duration_ms,
            easing: Easing::Linear,
        }
    }

    /// A value that is already settled.
    pub fn fixed(value: f64) -> Self {
        Tween::new(value, value, 0.0, 0.0)
    }

    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// Retarget from wherever the tween currently is.
    pub fn retarget(&mut self, to: f64, now_ms: f64, duration_ms: f64) {
        let from = self.value_at(now_ms);
        *self = Tween {
            from,
            to,
            start_ms: now_ms,
            duration_ms,
            easing: self.easing,
        };
    }

    pub fn progress(&self, now_ms: f64) -> f64 {
        if self.duration_ms <= 0.0 {
            return 1.0;
        }
        ((now_ms - self.start_ms) / self.duration_ms).clamp(0.0, 1.0)
    }

    pub fn value_at(&self, now_ms: f64) -> f64 {
        let t = self.easing.apply(self.progress(now_ms));
        self.from + (self.to - self.from) * t
    }

    pub fn is_finished(&self, now_ms: f64) -> bool {
        self.progress(now_ms) >= 1.0
    }

    /// Value once the tween has run to completion.
    pub fn target(&self) -> f64 {
        self.to
    }
}

/// Chained transitions: start at `initial`, then each `(duration, value)` in turn.
#[derive(Debug, Clone, PartialEq)]
pub struct Keyframes {
    pub initial: f64,
    pub start_ms: f64,
    pub steps: Vec<(f64, f64)>,
    pub easing: Easing,
}

impl Keyframes {
    pub fn new(initial: f64, start_ms: f64, steps: &[(f64, f64)]) -> Self {
        Keyframes {
            initial,
            start_ms,
            steps: steps.to_vec(),
            easing: Easing::CubicInOut,
        }
    }

    pub fn fixed(value: f64) -> Self {
        Keyframes {
            initial: value,
            start_ms: 0.0,
            steps: Vec::new(),
            easing: Easing::Linear,
        }
    }

    pub fn total_ms(&self) -> f64 {
        self.steps.iter().map(|(d, _)| d).sum()
    }

    pub fn value_at(&self, now_ms: f64) -> f64 {
        if now_ms < self.start_ms {
            return self.initial;
        }
        let mut elapsed = now_ms - self.start_ms;
        let mut from = self.initial;
        for &(duration, to) in &self.steps {
            if elapsed < duration {
                let t = self.easing.apply(elapsed / duration);
                return from + (to - from) * t;
            }
            elapsed -= duration;
            from = to;
        }
        from
    }

    pub fn final_value(&self) -> f64 {
        self.steps.last().map(|&(_, v)| v).unwrap_or(self.initial)
    }

    pub fn is_finished(&self, now_ms: f64) -> bool {
        now_ms >= self.start_ms + self.total_ms()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tween_linear_midpoint() {
        let t = Tween::new(0.0, 1.0, 100.0, 200.0);
        assert!((t.value_at(100.0) - 0.0).abs() < 1e-9);
        assert!((t.value_at(200.0) - 0.5).abs() < 1e-9);
        assert!((t.value_at(1000.0) - 1.0).abs() < 1e-9);
        assert!(t.is_finished(300.0));
        assert!(!t.is_finished(299.0));
    }

    #[test]
    fn test_tween_zero_duration_is_instant() {
        let t = Tween::new(0.0, 0.5, 10.0, 0.0);
        assert!((t.value_at(0.0) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_tween_retarget_starts_from_current() {
        let mut t = Tween::new(0.0, 1.0, 0.0, 100.0);
        t.retarget(0.0, 50.0, 100.0);
        assert!((t.from - 0.5).abs() < 1e-9);
        assert!((t.value_at(100.0) - 0.25).abs() < 1e-9);
        assert!((t.target() - 0.0).abs() < 1e-9);
    }

    #[test]
    fn test_cubic_in_out_endpoints() {
        assert!((Easing::CubicInOut.apply(0.0)).abs() < 1e-9);
        assert!((Easing::CubicInOut.apply(0.5) - 0.5).abs() < 1e-9);
        assert!((Easing::CubicInOut.apply(1.0) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_keyframes_sequence() {
        let k = Keyframes::new(10.0, 0.0, &[(1500.0, 5.0), (1000.0, 10.0), (1500.0, 5.0)]);
        assert!((k.value_at(0.0) - 10.0).abs() < 1e-9);
        assert!((k.value_at(1500.0) - 5.0).abs() < 1e-9);
        assert!((k.value_at(2500.0) - 10.0).abs() < 1e-9);
        assert!((k.value_at(4000.0) - 5.0).abs() < 1e-9);
        assert!((k.total_ms() - 4000.0).abs() < 1e-9);
        assert!(k.is_finished(4000.0));
        assert!((k.final_value() - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_keyframes_before_start_holds_initial() {
        let k = Keyframes::new(15.0, 400.0, &[(500.0, 5.0)]);
        assert!((k.value_at(0.0) - 15.0).abs() < 1e-9);
        assert!((k.value_at(650.0) - 10.0).abs() < 1e-9);
    }
}
