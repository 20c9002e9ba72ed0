#![forbid(unsafe_code)]

//! Map simulation state to a declarative border description.
//!
//! The mapper never draws. It returns a [`RenderSpec`] that a host renderer
//! (DOM, canvas, GPU, terminal) turns into pixels.
//!
//! # Segment length
//!
//! ```text
//! length = base + shrink × (1 - min(1, i)) + growth × max(0, i - 1)
//! ```
//!
//! The lit segment tightens as the tile powers up, then stretches again when
//! a velocity burst pushes intensity past 1.
//!
//! # Invariants
//!
//! 1. `to_render_description` returns `None` iff the state is below the
//!    render threshold (or has no armed edge).
//! 2. `0 <= start <= center <= end <= 100` and `0 <= opacity <= 1`.
//! 3. Every numeric field is finite, even under a malformed config.

use std::hash::BuildHasher;

use ahash::RandomState;

use crate::config::{EngineConfig, RenderTuning};
use crate::easing::{clamp_finite, clamp01};
use crate::geometry::Zone;
use crate::integrator::TileSimState;

/// Corner accent drawn when the active zone is a corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CornerWedge {
    /// Wedge leg length (px).
    pub size: f64,
    /// 0 leans toward the horizontal leg, 1 toward the vertical leg.
    pub lean: f64,
}

/// Everything the host needs to paint one tile's glow this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderSpec {
    /// Edge or corner the segment is drawn on.
    pub edge: Zone,
    /// Segment center along the edge, percent.
    pub center: f64,
    /// Clipped segment start, percent.
    pub start: f64,
    /// Clipped segment end, percent.
    pub end: f64,
    /// Unclipped segment length, percent.
    pub length: f64,
    /// Present for corner zones only.
    pub corner: Option<CornerWedge>,
    /// Glow blur radius (px).
    pub glow_radius: f64,
    /// Stroke opacity in `[0, 1]`.
    pub opacity: f64,
    /// Intensity as drawn; may exceed 1 during a velocity burst.
    pub visual_scale: f64,
}

/// Build the render description for `state`, or `None` if nothing shows.
#[must_use]
pub fn to_render_description(state: &TileSimState, config: &EngineConfig) -> Option<RenderSpec> {
    // Negated comparison so NaN intensity draws nothing.
    if !(state.intensity >= config.min_intensity_for_render) {
        return None;
    }
    let edge = state.edge.filter(|zone| *zone != Zone::None)?;
    let visual = clamp_finite(state.intensity, 0.0, config.max_intensity().max(1.0));
    Some(layout(edge, visual, state.position, config))
}

impl RenderSpec {
    /// Build a description straight from a precomputed highlight.
    ///
    /// Used on low-capability devices where no simulation runs.
    #[must_use]
    pub fn from_static(highlight: &StaticHighlight, config: &EngineConfig) -> Option<Self> {
        if highlight.edge == Zone::None
            || !(highlight.intensity >= config.min_intensity_for_render)
        {
            return None;
        }
        Some(layout(
            highlight.edge,
            clamp01(highlight.intensity),
            highlight.position,
            config,
        ))
    }

    /// Width of the visible span after clipping, percent.
    #[inline]
    #[must_use]
    pub fn visible_span(&self) -> f64 {
        self.end - self.start
    }
}

/// Unclipped segment length for a given visual scale.
#[must_use]
pub fn segment_length(visual: f64, tuning: &RenderTuning) -> f64 {
    let below = 1.0 - visual.min(1.0);
    let over = (visual - 1.0).max(0.0);
    tuning.segment_base_length + tuning.segment_shrink * below + tuning.overshoot_growth * over
}

fn layout(edge: Zone, visual: f64, position: f64, config: &EngineConfig) -> RenderSpec {
    let tuning = &config.render;
    let length = clamp_finite(segment_length(visual, tuning), 0.0, 100.0);
    let center = clamp01(position) * 100.0;
    let half = length / 2.0;
    let border = non_negative(config.border_width);

    let corner = edge.is_corner().then(|| CornerWedge {
        size: non_negative(
            border * (tuning.corner_base_scale + tuning.corner_growth_scale * visual),
        ),
        // Corner positions live in [0, 0.5].
        lean: clamp01(position * 2.0),
    });

    RenderSpec {
        edge,
        center,
        start: (center - half).clamp(0.0, 100.0),
        end: (center + half).clamp(0.0, 100.0),
        length,
        corner,
        glow_radius: non_negative(tuning.glow_base_radius + tuning.glow_gain * visual),
        opacity: clamp01(visual),
        visual_scale: visual,
    }
}

#[inline]
fn non_negative(v: f64) -> f64 {
    clamp_finite(v, 0.0, f64::MAX)
}

// ---------------------------------------------------------------------------
// Static highlight
// ---------------------------------------------------------------------------

/// A fixed highlight painted instead of the simulation on low-capability
/// devices.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StaticHighlight {
    pub edge: Zone,
    /// Steady intensity in `[0, 1]`.
    pub intensity: f64,
    /// Position along `edge` in `[0, 1]`.
    pub position: f64,
}

impl StaticHighlight {
    /// Create a highlight, clamping intensity and position to `[0, 1]`.
    #[must_use]
    pub fn new(edge: Zone, intensity: f64, position: f64) -> Self {
        Self {
            edge,
            intensity: clamp01(intensity),
            position: clamp01(position),
        }
    }

    /// Deterministic per-tile highlight for hosts without their own
    /// heuristic: one edge, intensity in `[0.35, 0.75)`, position in
    /// `[0.2, 0.8)`.
    #[must_use]
    pub fn seeded(tile_id: u64) -> Self {
        let hash = RandomState::with_seeds(0x6564_6765, 0x676c_6f77, 0x7469_6c65, 0x7374_6174)
            .hash_one(tile_id);
        let edge = Zone::EDGES[(hash % 4) as usize];
        let unit = |shift: u32| ((hash >> shift) % 1000) as f64 / 1000.0;
        Self::new(edge, 0.35 + 0.4 * unit(8), 0.2 + 0.6 * unit(24))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(intensity: f64, position: f64, edge: Zone) -> TileSimState {
        TileSimState {
            intensity,
            position,
            edge: Some(edge),
            velocity_boost: 0.0,
        }
    }

    #[test]
    fn below_threshold_draws_nothing() {
        let config = EngineConfig::default();
        assert_eq!(to_render_description(&state(0.005, 0.5, Zone::Top), &config), None);
        assert_eq!(to_render_description(&TileSimState::IDLE, &config), None);
    }

    #[test]
    fn nan_intensity_draws_nothing() {
        let config = EngineConfig::default();
        assert_eq!(to_render_description(&state(f64::NAN, 0.5, Zone::Top), &config), None);
    }

    #[test]
    fn edge_round_trips() {
        let config = EngineConfig::default();
        let spec = to_render_description(&state(0.6, 0.3, Zone::Left), &config).expect("visible");
        assert_eq!(spec.edge, Zone::Left);
        assert!(spec.corner.is_none());
        assert!((spec.center - 30.0).abs() < 1e-12);
    }

    #[test]
    fn length_shrinks_then_grows() {
        let tuning = RenderTuning::default();
        let low = segment_length(0.1, &tuning);
        let full = segment_length(1.0, &tuning);
        let burst = segment_length(1.4, &tuning);
        assert!(low > full);
        assert!(burst > full);
        assert!((full - tuning.segment_base_length).abs() < 1e-12);
    }

    #[test]
    fn segment_is_clipped_at_edges() {
        let config = EngineConfig::default();
        let spec = to_render_description(&state(1.0, 0.0, Zone::Top), &config).expect("visible");
        assert_eq!(spec.start, 0.0);
        assert!((spec.end - 10.0).abs() < 1e-12);
        assert!(spec.visible_span() < spec.length);
    }

    #[test]
    fn overshoot_scales_but_opacity_caps() {
        let config = EngineConfig::default();
        let spec = to_render_description(&state(1.5, 0.5, Zone::Bottom), &config).expect("visible");
        assert!((spec.visual_scale - 1.5).abs() < 1e-12);
        assert_eq!(spec.opacity, 1.0);
        assert!(spec.glow_radius > config.render.glow_base_radius + config.render.glow_gain);
    }

    #[test]
    fn corner_zone_carries_wedge() {
        let config = EngineConfig::default();
        let spec =
            to_render_description(&state(1.0, 0.25, Zone::TopRight), &config).expect("visible");
        let wedge = spec.corner.expect("corner wedge");
        assert!((wedge.lean - 0.5).abs() < 1e-12);
        assert!((wedge.size - 2.0 * (3.0 + 5.0)).abs() < 1e-12);
    }

    #[test]
    fn malformed_config_still_yields_finite_output() {
        let mut config = EngineConfig::default();
        config.render.glow_gain = f64::INFINITY;
        config.render.segment_shrink = f64::NAN;
        let spec = to_render_description(&state(0.5, 0.5, Zone::Top), &config).expect("visible");
        assert!(spec.glow_radius.is_finite());
        assert!(spec.length.is_finite());
        assert!(spec.start.is_finite() && spec.end.is_finite());
    }

    #[test]
    fn static_highlight_renders_directly() {
        let config = EngineConfig::default();
        let highlight = StaticHighlight::new(Zone::Right, 0.5, 0.4);
        let spec = RenderSpec::from_static(&highlight, &config).expect("visible");
        assert_eq!(spec.edge, Zone::Right);
        assert!((spec.center - 40.0).abs() < 1e-12);
        assert!((spec.opacity - 0.5).abs() < 1e-12);
        assert_eq!(
            RenderSpec::from_static(&StaticHighlight::new(Zone::None, 0.5, 0.5), &config),
            None
        );
    }

    #[test]
    fn static_highlight_clamps_inputs() {
        let h = StaticHighlight::new(Zone::Top, 3.0, -1.0);
        assert_eq!(h.intensity, 1.0);
        assert_eq!(h.position, 0.0);
    }

    #[test]
    fn seeded_highlight_is_deterministic_and_bounded() {
        for id in 0..64 {
            let a = StaticHighlight::seeded(id);
            assert_eq!(a, StaticHighlight::seeded(id));
            assert!(a.edge.is_edge());
            assert!((0.35..0.75).contains(&a.intensity));
            assert!((0.2..0.8).contains(&a.position));
        }
    }
}
