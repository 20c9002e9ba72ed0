//! Property-based invariant tests for the glow engine.
//!
//! 1. Classifier output is always in range
//! 2. Beyond the threshold, intensity never rises and decays to zero
//! 3. A pointer on an edge midpoint converges to intensity 1, position 0.5
//! 4. Velocity boost only falls between samples and stays clamped
//! 5. A settled state is a fixed point
//! 6. Render output exists iff intensity reaches the threshold, including
//!    after the pointer leaves while a boost is live
//! 7. State invariants hold under arbitrary pointer paths

use edgeglow_core::{
    Classification, ElementBounds, EngineConfig, Point, PointerSample, TileSimState,
    VelocityTracker, Zone, classify, step, to_render_description,
};
use proptest::prelude::*;

const EPS: f64 = 1e-9;

// ── Strategies ──────────────────────────────────────────────────────────

fn rect_strategy() -> impl Strategy<Value = ElementBounds> {
    (-500.0f64..500.0, -500.0f64..500.0, 0.0f64..400.0, 0.0f64..400.0)
        .prop_map(|(l, t, w, h)| ElementBounds::new(l, t, w, h))
}

fn point_strategy() -> impl Strategy<Value = Point> {
    (-2000.0f64..2000.0, -2000.0f64..2000.0).prop_map(|(x, y)| Point::new(x, y))
}

fn config_strategy() -> impl Strategy<Value = EngineConfig> {
    (1.0f64..200.0, 0.01f64..=1.0, 0.05f64..0.99, 0.0f64..1.0).prop_map(
        |(threshold, spring, decay, max_boost)| EngineConfig {
            proximity_threshold: threshold,
            spring_factor: spring,
            velocity_boost_decay: decay,
            max_velocity_boost: max_boost,
            ..EngineConfig::default()
        },
    )
}

fn assert_state_invariants(s: &TileSimState, config: &EngineConfig) {
    assert!(s.intensity >= 0.0 && s.intensity <= config.max_intensity() + EPS);
    assert!((0.0..=1.0).contains(&s.position));
    assert!(s.velocity_boost >= 0.0 && s.velocity_boost <= config.max_velocity_boost + EPS);
}

// ═══════════════════════════════════════════════════════════════════════
// 1. Classifier range
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn classify_output_in_range(p in point_strategy(), rect in rect_strategy()) {
        let c = classify(p, &rect);
        prop_assert_ne!(c.zone, Zone::None);
        prop_assert!(c.distance.is_finite() && c.distance >= 0.0);
        if c.zone.is_corner() {
            prop_assert!((0.0..=0.5).contains(&c.raw_position));
        } else {
            prop_assert!((0.0..=1.0).contains(&c.raw_position));
        }
    }

    #[test]
    fn classify_is_deterministic(p in point_strategy(), rect in rect_strategy()) {
        prop_assert_eq!(classify(p, &rect), classify(p, &rect));
    }
}

// ═══════════════════════════════════════════════════════════════════════
// 2. Decay beyond the threshold
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn far_pointer_decays_monotonically(
        config in config_strategy(),
        start in 0.0f64..1.0,
        extra in 1.0f64..1000.0,
    ) {
        let input = Classification {
            zone: Zone::Top,
            distance: config.proximity_threshold + extra,
            raw_position: 0.5,
            inside: false,
        };
        let mut s = TileSimState { intensity: start, ..TileSimState::IDLE };
        for _ in 0..5000 {
            let next = step(&s, &input, 0.0, &config).state;
            prop_assert!(next.intensity <= s.intensity);
            s = next;
        }
        prop_assert!(s.intensity < 1e-6, "did not converge: {}", s.intensity);
    }
}

// ═══════════════════════════════════════════════════════════════════════
// 3. Convergence at an edge midpoint
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn edge_midpoint_converges_to_one(
        config in config_strategy(),
        rect in rect_strategy().prop_filter("at least 1px", |r| r.width >= 1.0 && r.height >= 1.0),
    ) {
        let midpoint = Point::new(rect.left + rect.width / 2.0, rect.top);
        let input = classify(midpoint, &rect);
        let mut s = TileSimState::IDLE;
        for _ in 0..5000 {
            s = step(&s, &input, 0.0, &config).state;
            prop_assert!(s.intensity <= 1.0 + EPS);
        }
        prop_assert!((s.intensity - 1.0).abs() < 1e-6);
        prop_assert!((s.position - 0.5).abs() < 1e-6);
    }
}

// ═══════════════════════════════════════════════════════════════════════
// 4. Velocity boost decays between samples
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn boost_decays_between_samples(
        config in config_strategy(),
        dx in 0.0f64..2000.0,
        dt in 2i64..100,
        frames in 1usize..200,
    ) {
        let mut tracker = VelocityTracker::new(&config);
        tracker.on_sample(PointerSample::new(0.0, 0.0, 0));
        tracker.on_sample(PointerSample::new(dx, 0.0, dt));
        let input = classify(Point::new(50.0, 0.0), &ElementBounds::new(0.0, 0.0, 100.0, 100.0));
        let mut s = TileSimState::IDLE;
        let mut prev_boost = f64::INFINITY;
        for _ in 0..frames {
            let global = tracker.current_boost();
            prop_assert!(global >= 0.0 && global <= config.max_velocity_boost + EPS);
            s = step(&s, &input, global, &config).state;
            prop_assert!(s.velocity_boost <= prev_boost);
            assert_state_invariants(&s, &config);
            prev_boost = s.velocity_boost;
            tracker.decay();
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// 5. Fixed point
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn settled_state_is_fixed_point(p in point_strategy(), config in config_strategy()) {
        let rect = ElementBounds::new(0.0, 0.0, 100.0, 100.0);
        let input = classify(p, &rect);
        let mut s = TileSimState::IDLE;
        for _ in 0..5000 {
            s = step(&s, &input, 0.0, &config).state;
        }
        let next = step(&s, &input, 0.0, &config);
        prop_assert!((next.state.intensity - s.intensity).abs() < config.change_epsilon);
        prop_assert!((next.state.position - s.position).abs() < config.change_epsilon);
        prop_assert!(!next.changed);
    }
}

// ═══════════════════════════════════════════════════════════════════════
// 6. Render round-trip
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn render_exists_iff_above_threshold(
        path in prop::collection::vec(prop::option::of(point_strategy()), 1..60),
        boost in 0.0f64..0.5,
    ) {
        let config = EngineConfig::default();
        let rect = ElementBounds::new(0.0, 0.0, 100.0, 100.0);
        let mut s = TileSimState::IDLE;
        for p in path {
            // `None` is a pointer that left the document.
            let input = p.map_or(Classification::UNCLASSIFIED, |p| classify(p, &rect));
            s = step(&s, &input, boost, &config).state;
            let spec = to_render_description(&s, &config);
            prop_assert_eq!(spec.is_none(), s.intensity < config.min_intensity_for_render);
            if let Some(spec) = spec {
                prop_assert_eq!(Some(spec.edge), s.edge);
                prop_assert!(spec.start >= 0.0 && spec.end <= 100.0 && spec.start <= spec.end);
                prop_assert!((0.0..=1.0).contains(&spec.opacity));
                prop_assert!(spec.glow_radius.is_finite());
            }
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// 7. Arbitrary paths keep the state in bounds
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn arbitrary_path_keeps_invariants(
        config in config_strategy(),
        path in prop::collection::vec((point_strategy(), 0.0f64..2.0), 1..100),
    ) {
        let rect = ElementBounds::new(10.0, 20.0, 150.0, 80.0);
        let mut s = TileSimState::IDLE;
        for (p, boost) in path {
            s = step(&s, &classify(p, &rect), boost, &config).state;
            assert_state_invariants(&s, &config);
            if s.edge.is_some() {
                prop_assert_ne!(s.edge, Some(Zone::None));
            }
        }
    }
}
