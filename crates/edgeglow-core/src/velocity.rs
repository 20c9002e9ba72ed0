#![forbid(unsafe_code)]

//! Pointer velocity tracking and the shared velocity boost.
//!
//! Fast pointer movement near a tile should make its border flare past the
//! steady-state glow. [`VelocityTracker`] turns a stream of timestamped
//! [`PointerSample`]s into a single boost scalar that every tile reads once
//! per frame.
//!
//! # Algorithm
//!
//! For each accepted sample after the first:
//!
//! - `speed = |curr - prev| / elapsed_ms` (px/ms)
//! - `contribution = min(max_boost, speed * sensitivity)`
//! - `boost = merge(boost, contribution)` where the merge is chosen by
//!   [`BoostPolicy`] (default: keep the peak)
//!
//! Between samples only [`decay`](VelocityTracker::decay) lowers the boost,
//! once per visible frame.
//!
//! # Invariants
//!
//! 1. `0 <= current_boost() <= max_boost` at all times.
//! 2. A new sample never lowers the boost.
//! 3. Samples with non-finite coordinates are never merged.
//!
//! # Failure Modes
//!
//! - Samples closer together than `min_sample_interval_ms` carry no usable
//!   speed; they are ignored and the older sample is kept as the baseline.
//! - A timestamp that runs backwards re-baselines on the new sample.

#[cfg(feature = "config-file")]
use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::geometry::Point;

/// A timestamped pointer position from the host's pointer-move source.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerSample {
    pub x: f64,
    pub y: f64,
    /// Host timestamp in milliseconds. Only differences matter.
    pub timestamp_ms: i64,
}

impl PointerSample {
    /// Create a new sample.
    #[inline]
    pub const fn new(x: f64, y: f64, timestamp_ms: i64) -> Self {
        Self { x, y, timestamp_ms }
    }

    /// Position without the timestamp.
    #[inline]
    pub const fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Both coordinates are finite.
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// How a fresh speed contribution combines with the running boost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "config-file", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config-file", serde(rename_all = "lowercase"))]
pub enum BoostPolicy {
    /// `max(old, new)`: bursts are capped by the single fastest recent sample.
    #[default]
    Peak,
    /// `min(max_boost, old + new)`: sustained fast motion keeps stacking.
    Accumulate,
}

impl BoostPolicy {
    /// Stable lowercase name.
    pub const fn as_str(self) -> &'static str {
        match self {
            BoostPolicy::Peak => "peak",
            BoostPolicy::Accumulate => "accumulate",
        }
    }

    #[inline]
    fn merge(self, current: f64, contribution: f64, max_boost: f64) -> f64 {
        match self {
            BoostPolicy::Peak => current.max(contribution),
            BoostPolicy::Accumulate => (current + contribution).min(max_boost),
        }
    }
}

/// What [`VelocityTracker::on_sample`] did with a sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SampleVerdict {
    /// First sample (or after a clock reset); stored as the baseline only.
    Baseline,
    /// Speed computed and merged into the boost.
    Merged { speed: f64, contribution: f64 },
    /// Too close in time to the baseline; ignored.
    TooSoon,
    /// Non-finite coordinates; ignored.
    Rejected,
}

/// Tracks the most recent pointer sample and the shared velocity boost.
#[derive(Debug, Clone)]
pub struct VelocityTracker {
    previous: Option<PointerSample>,
    boost: f64,
    last_speed: f64,
    sensitivity: f64,
    max_boost: f64,
    decay: f64,
    min_interval_ms: f64,
    policy: BoostPolicy,
}

impl VelocityTracker {
    /// Create a tracker using the velocity settings of `config`.
    #[must_use]
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            previous: None,
            boost: 0.0,
            last_speed: 0.0,
            sensitivity: config.velocity_sensitivity.max(0.0),
            max_boost: config.max_velocity_boost.max(0.0),
            decay: crate::easing::clamp01(config.velocity_boost_decay),
            min_interval_ms: config.min_sample_interval_ms.max(0.0),
            policy: config.boost_policy,
        }
    }

    /// Feed one pointer sample.
    pub fn on_sample(&mut self, sample: PointerSample) -> SampleVerdict {
        if !sample.is_finite() {
            return SampleVerdict::Rejected;
        }

        let Some(prev) = self.previous else {
            self.previous = Some(sample);
            return SampleVerdict::Baseline;
        };

        let elapsed = sample.timestamp_ms.saturating_sub(prev.timestamp_ms);
        if elapsed < 0 {
            self.previous = Some(sample);
            return SampleVerdict::Baseline;
        }

        let elapsed = elapsed as f64;
        if elapsed <= self.min_interval_ms {
            return SampleVerdict::TooSoon;
        }

        let speed = prev.position().distance_to(sample.position()) / elapsed;
        let contribution = (speed * self.sensitivity).min(self.max_boost);
        if !contribution.is_finite() {
            return SampleVerdict::Rejected;
        }

        self.boost = self
            .policy
            .merge(self.boost, contribution, self.max_boost)
            .clamp(0.0, self.max_boost);
        self.last_speed = speed;
        self.previous = Some(sample);
        SampleVerdict::Merged {
            speed,
            contribution,
        }
    }

    /// The shared boost every tile reads this frame.
    #[inline]
    #[must_use]
    pub fn current_boost(&self) -> f64 {
        self.boost
    }

    /// Speed (px/ms) of the last merged sample pair.
    #[inline]
    #[must_use]
    pub fn last_speed(&self) -> f64 {
        self.last_speed
    }

    /// The baseline sample the next speed estimate is measured from.
    #[inline]
    #[must_use]
    pub fn last_sample(&self) -> Option<PointerSample> {
        self.previous
    }

    /// Apply one frame of geometric decay.
    pub fn decay(&mut self) {
        self.boost *= self.decay;
        if self.boost < f64::EPSILON {
            self.boost = 0.0;
        }
    }

    /// Forget the baseline and zero the boost.
    pub fn reset(&mut self) {
        self.previous = None;
        self.boost = 0.0;
        self.last_speed = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracker() -> VelocityTracker {
        VelocityTracker::new(&EngineConfig::default())
    }

    #[test]
    fn first_sample_is_baseline() {
        let mut t = tracker();
        assert_eq!(t.on_sample(PointerSample::new(0.0, 0.0, 0)), SampleVerdict::Baseline);
        assert_eq!(t.current_boost(), 0.0);
    }

    #[test]
    fn fast_jump_produces_expected_boost() {
        let mut t = tracker();
        t.on_sample(PointerSample::new(0.0, 0.0, 1000));
        let verdict = t.on_sample(PointerSample::new(200.0, 0.0, 1005));
        match verdict {
            SampleVerdict::Merged {
                speed,
                contribution,
            } => {
                assert!((speed - 40.0).abs() < 1e-12);
                assert!((contribution - 0.2).abs() < 1e-12);
            }
            other => panic!("expected merge, got {other:?}"),
        }
        assert!((t.current_boost() - 0.2).abs() < 1e-12);
    }

    #[test]
    fn boost_is_capped() {
        let mut t = tracker();
        t.on_sample(PointerSample::new(0.0, 0.0, 0));
        t.on_sample(PointerSample::new(5000.0, 0.0, 2));
        assert!((t.current_boost() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn slower_sample_does_not_lower_peak() {
        let mut t = tracker();
        t.on_sample(PointerSample::new(0.0, 0.0, 0));
        t.on_sample(PointerSample::new(200.0, 0.0, 5));
        t.on_sample(PointerSample::new(201.0, 0.0, 50));
        assert!((t.current_boost() - 0.2).abs() < 1e-12);
    }

    #[test]
    fn accumulate_policy_sums_until_cap() {
        let config = EngineConfig {
            boost_policy: BoostPolicy::Accumulate,
            ..EngineConfig::default()
        };
        let mut t = VelocityTracker::new(&config);
        t.on_sample(PointerSample::new(0.0, 0.0, 0));
        t.on_sample(PointerSample::new(200.0, 0.0, 5));
        t.on_sample(PointerSample::new(400.0, 0.0, 10));
        assert!((t.current_boost() - 0.4).abs() < 1e-12);
        t.on_sample(PointerSample::new(600.0, 0.0, 15));
        assert!((t.current_boost() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn decay_is_geometric() {
        let mut t = tracker();
        t.on_sample(PointerSample::new(0.0, 0.0, 0));
        t.on_sample(PointerSample::new(200.0, 0.0, 5));
        t.decay();
        assert!((t.current_boost() - 0.18).abs() < 1e-12);
        t.decay();
        assert!((t.current_boost() - 0.162).abs() < 1e-12);
    }

    #[test]
    fn decay_eventually_reaches_zero() {
        let mut t = tracker();
        t.on_sample(PointerSample::new(0.0, 0.0, 0));
        t.on_sample(PointerSample::new(200.0, 0.0, 5));
        for _ in 0..1000 {
            t.decay();
        }
        assert_eq!(t.current_boost(), 0.0);
    }

    #[test]
    fn samples_inside_floor_are_ignored() {
        let mut t = tracker();
        t.on_sample(PointerSample::new(0.0, 0.0, 10));
        assert_eq!(t.on_sample(PointerSample::new(50.0, 0.0, 10)), SampleVerdict::TooSoon);
        assert_eq!(t.on_sample(PointerSample::new(60.0, 0.0, 11)), SampleVerdict::TooSoon);
        assert_eq!(t.current_boost(), 0.0);
        // Baseline is still the first sample.
        assert_eq!(t.last_sample(), Some(PointerSample::new(0.0, 0.0, 10)));
    }

    #[test]
    fn non_finite_sample_is_rejected() {
        let mut t = tracker();
        t.on_sample(PointerSample::new(0.0, 0.0, 0));
        assert_eq!(
            t.on_sample(PointerSample::new(f64::NAN, 0.0, 10)),
            SampleVerdict::Rejected
        );
        assert_eq!(
            t.on_sample(PointerSample::new(0.0, f64::INFINITY, 10)),
            SampleVerdict::Rejected
        );
        assert_eq!(t.current_boost(), 0.0);
        assert_eq!(t.last_sample(), Some(PointerSample::new(0.0, 0.0, 0)));
    }

    #[test]
    fn clock_reset_rebaselines() {
        let mut t = tracker();
        t.on_sample(PointerSample::new(0.0, 0.0, 500));
        assert_eq!(t.on_sample(PointerSample::new(10.0, 0.0, 100)), SampleVerdict::Baseline);
        assert_eq!(t.current_boost(), 0.0);
    }

    #[test]
    fn reset_clears_everything() {
        let mut t = tracker();
        t.on_sample(PointerSample::new(0.0, 0.0, 0));
        t.on_sample(PointerSample::new(200.0, 0.0, 5));
        t.reset();
        assert_eq!(t.current_boost(), 0.0);
        assert_eq!(t.last_sample(), None);
        assert_eq!(t.last_speed(), 0.0);
    }

    #[test]
    fn policy_names() {
        assert_eq!(BoostPolicy::default(), BoostPolicy::Peak);
        assert_eq!(BoostPolicy::Accumulate.as_str(), "accumulate");
    }
}
