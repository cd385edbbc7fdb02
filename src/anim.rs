use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Counters ease over a full second, gauge fills slightly faster.
pub const COUNTER_DURATION: Duration = Duration::from_millis(1000);
pub const GAUGE_DURATION: Duration = Duration::from_millis(800);

/// Cubic ease-out: fast start, decelerating into the target.
pub fn ease_out_cubic(progress: f64) -> f64 {
    1.0 - (1.0 - progress).powi(3)
}

/// One timed interpolation toward a target value. The animation is a plain
/// value sampled with `value_at`; the draw loop decides when to sample it.
/// Progress clamps to 1, so the final frame lands exactly on the target.
#[derive(Debug, Clone)]
pub struct ValueAnimation {
    from: f64,
    target: f64,
    started: Instant,
    duration: Duration,
}

impl ValueAnimation {
    pub fn new(from: f64, target: f64, started: Instant, duration: Duration) -> ValueAnimation {
        ValueAnimation {
            from,
            target,
            started,
            duration,
        }
    }

    pub fn value_at(&self, now: Instant) -> f64 {
        let elapsed = now.saturating_duration_since(self.started);
        if elapsed >= self.duration {
            return self.target;
        }
        let progress = elapsed.as_secs_f64() / self.duration.as_secs_f64();
        self.from + (self.target - self.from) * ease_out_cubic(progress)
    }

    pub fn is_done(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.started) >= self.duration
    }
}

/// Registry of named animations, one per rendered metric. Retargeting an
/// animation restarts it from whatever value is currently displayed, so
/// overlapping updates hand off smoothly; last invocation wins.
#[derive(Debug, Default)]
pub struct Animator {
    animations: HashMap<&'static str, ValueAnimation>,
}

impl Animator {
    pub fn set_target(&mut self, id: &'static str, target: f64, duration: Duration, now: Instant) {
        let from = self
            .animations
            .get(id)
            .map(|anim| anim.value_at(now))
            .unwrap_or(0.0);
        self.animations
            .insert(id, ValueAnimation::new(from, target, now, duration));
    }

    /// Current displayed value for a metric; 0 before the first target.
    pub fn value(&self, id: &str, now: Instant) -> f64 {
        self.animations
            .get(id)
            .map(|anim| anim.value_at(now))
            .unwrap_or(0.0)
    }

    pub fn format(&self, id: &str, decimals: usize, now: Instant) -> String {
        let value = self.value(id, now);
        if decimals == 0 {
            format!("{}", value.round() as i64)
        } else {
            format!("{value:.decimals$}")
        }
    }

    pub fn is_settled(&self, now: Instant) -> bool {
        self.animations.values().all(|anim| anim.is_done(now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ease_is_monotonic_and_clamped_at_the_ends() {
        assert_eq!(ease_out_cubic(0.0), 0.0);
        assert_eq!(ease_out_cubic(1.0), 1.0);
        let samples: Vec<f64> = (0..=10).map(|i| ease_out_cubic(i as f64 / 10.0)).collect();
        assert!(samples.windows(2).all(|w| w[0] <= w[1]));
        // Front-loaded: halfway through time, most of the distance is covered.
        assert!(ease_out_cubic(0.5) > 0.8);
    }

    #[test]
    fn animation_snaps_to_target_when_duration_elapses() {
        let start = Instant::now();
        for from in [0.0, -50.0, 123.4] {
            let anim = ValueAnimation::new(from, 84.5, start, COUNTER_DURATION);
            assert_eq!(anim.value_at(start), from);
            assert_eq!(anim.value_at(start + COUNTER_DURATION), 84.5);
            assert_eq!(anim.value_at(start + COUNTER_DURATION * 3), 84.5);
            assert!(anim.is_done(start + COUNTER_DURATION));
        }
    }

    #[test]
    fn midflight_value_lies_between_endpoints() {
        let start = Instant::now();
        let anim = ValueAnimation::new(10.0, 20.0, start, COUNTER_DURATION);
        let mid = anim.value_at(start + COUNTER_DURATION / 2);
        assert!(mid > 10.0 && mid < 20.0);
    }

    #[test]
    fn retarget_restarts_from_the_displayed_value() {
        let start = Instant::now();
        let mut animator = Animator::default();
        animator.set_target("win_rate", 100.0, COUNTER_DURATION, start);

        let midway = start + COUNTER_DURATION / 2;
        let displayed = animator.value("win_rate", midway);
        animator.set_target("win_rate", 40.0, COUNTER_DURATION, midway);

        // No jump at the handoff point, and the new target is honored.
        assert!((animator.value("win_rate", midway) - displayed).abs() < 1e-9);
        assert_eq!(animator.value("win_rate", midway + COUNTER_DURATION), 40.0);
    }

    #[test]
    fn unknown_metric_displays_zero() {
        let animator = Animator::default();
        assert_eq!(animator.value("missing", Instant::now()), 0.0);
    }

    #[test]
    fn format_renders_the_requested_decimal_places() {
        let start = Instant::now();
        let mut animator = Animator::default();
        animator.set_target("avg_monthly_return", 5.8, COUNTER_DURATION, start);
        animator.set_target("total_managed", 152_430.0, COUNTER_DURATION, start);

        let settled = start + COUNTER_DURATION;
        assert!(animator.is_settled(settled));
        assert_eq!(animator.format("avg_monthly_return", 1, settled), "5.8");
        assert_eq!(animator.format("total_managed", 0, settled), "152430");
    }
}
