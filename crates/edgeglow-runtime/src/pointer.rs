#![forbid(unsafe_code)]

//! The single writer of global pointer state.
//!
//! The host's pointer-move handler writes here; every tile reads the latest
//! position and the shared boost during the frame. Nothing else mutates this
//! state, so no locking is needed under a single-threaded event loop.

use edgeglow_core::velocity::SampleVerdict;
use edgeglow_core::{EngineConfig, Point, PointerSample, VelocityTracker};
use web_time::Instant;

/// Latest pointer position plus the velocity tracker feeding the boost.
#[derive(Debug, Clone)]
pub struct PointerHub {
    latest: Option<Point>,
    tracker: VelocityTracker,
    epoch: Instant,
    accepted: u64,
    rejected: u64,
}

impl PointerHub {
    /// Create a hub using the velocity settings of `config`.
    #[must_use]
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            latest: None,
            tracker: VelocityTracker::new(config),
            epoch: Instant::now(),
            accepted: 0,
            rejected: 0,
        }
    }

    /// Record a pointer move stamped by the host clock.
    pub fn record(&mut self, sample: PointerSample) -> SampleVerdict {
        let verdict = self.tracker.on_sample(sample);
        match verdict {
            SampleVerdict::Rejected => {
                self.rejected += 1;
                tracing::debug!(x = sample.x, y = sample.y, "pointer sample rejected");
            }
            SampleVerdict::Merged { speed, .. } => {
                self.accepted += 1;
                self.latest = Some(sample.position());
                tracing::trace!(
                    speed,
                    boost = self.tracker.current_boost(),
                    "pointer sample merged"
                );
            }
            SampleVerdict::Baseline | SampleVerdict::TooSoon => {
                self.accepted += 1;
                self.latest = Some(sample.position());
            }
        }
        verdict
    }

    /// Record a pointer move stamped with `now`, relative to the hub's epoch.
    pub fn record_at(&mut self, x: f64, y: f64, now: Instant) -> SampleVerdict {
        let elapsed = now.saturating_duration_since(self.epoch);
        let timestamp_ms = i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX);
        self.record(PointerSample::new(x, y, timestamp_ms))
    }

    /// The pointer left the document.
    pub fn clear(&mut self) {
        self.latest = None;
    }

    /// Latest accepted position.
    #[inline]
    #[must_use]
    pub fn latest(&self) -> Option<Point> {
        self.latest
    }

    /// Shared boost for this frame.
    #[inline]
    #[must_use]
    pub fn boost(&self) -> f64 {
        self.tracker.current_boost()
    }

    /// Close a visible frame: decay the shared boost once.
    pub fn end_frame(&mut self) {
        self.tracker.decay();
    }

    /// Samples accepted (including baselines and too-soon samples).
    #[must_use]
    pub fn accepted(&self) -> u64 {
        self.accepted
    }

    /// Samples rejected for non-finite coordinates.
    #[must_use]
    pub fn rejected(&self) -> u64 {
        self.rejected
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn fast_move_sets_boost_and_position() {
        let mut hub = PointerHub::new(&EngineConfig::default());
        hub.record(PointerSample::new(0.0, 0.0, 0));
        hub.record(PointerSample::new(200.0, 0.0, 5));
        assert_eq!(hub.latest(), Some(Point::new(200.0, 0.0)));
        assert!((hub.boost() - 0.2).abs() < 1e-12);
        hub.end_frame();
        assert!((hub.boost() - 0.18).abs() < 1e-12);
    }

    #[test]
    fn rejected_sample_keeps_previous_position() {
        let mut hub = PointerHub::new(&EngineConfig::default());
        hub.record(PointerSample::new(5.0, 5.0, 0));
        let verdict = hub.record(PointerSample::new(f64::NAN, 5.0, 10));
        assert_eq!(verdict, SampleVerdict::Rejected);
        assert_eq!(hub.latest(), Some(Point::new(5.0, 5.0)));
        assert_eq!(hub.rejected(), 1);
        assert_eq!(hub.accepted(), 1);
    }

    #[test]
    fn too_soon_sample_still_moves_pointer() {
        let mut hub = PointerHub::new(&EngineConfig::default());
        hub.record(PointerSample::new(0.0, 0.0, 0));
        hub.record(PointerSample::new(3.0, 0.0, 0));
        assert_eq!(hub.latest(), Some(Point::new(3.0, 0.0)));
        assert_eq!(hub.boost(), 0.0);
    }

    #[test]
    fn record_at_uses_epoch_relative_time() {
        let mut hub = PointerHub::new(&EngineConfig::default());
        let t0 = Instant::now();
        hub.record_at(0.0, 0.0, t0);
        let verdict = hub.record_at(200.0, 0.0, t0 + Duration::from_millis(20));
        assert!(matches!(verdict, SampleVerdict::Merged { .. }));
        assert!(hub.boost() > 0.0);
    }

    #[test]
    fn clear_forgets_position() {
        let mut hub = PointerHub::new(&EngineConfig::default());
        hub.record(PointerSample::new(1.0, 1.0, 0));
        hub.clear();
        assert_eq!(hub.latest(), None);
    }
}
