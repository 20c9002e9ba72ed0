#![forbid(unsafe_code)]

//! Per-tile simulation state and its per-frame integration step.
//!
//! Each frame a tile's [`TileSimState`] is pulled toward a target derived
//! from the pointer's proximity plus the shared velocity boost. The pull is
//! a first-order low-pass filter:
//!
//!   x' = x + (target - x) × spring_factor
//!
//! # Step
//!
//! 1. Inject the shared boost: `boost = max(state.boost, global)`.
//! 2. Inside `proximity_threshold`: `target_base = ease_out_cubic(1 - d/threshold)`
//!    and the position target is the classifier's `raw_position`. Outside:
//!    `target_base = 0` and the position holds where it is.
//! 3. `target = min(1 + max_boost, target_base + boost)`, or 0 when the
//!    input is unclassified and no edge is armed yet.
//! 4. Decay the boost once.
//! 5. Smooth intensity and position toward their targets, then clamp.
//! 6. Arm the edge if either the target or the new intensity reaches the
//!    render threshold.
//!
//! # Invariants
//!
//! 1. `0 <= intensity <= 1 + max_velocity_boost`.
//! 2. `0 <= position <= 1`.
//! 3. `0 <= velocity_boost <= max_velocity_boost`, and it only grows through
//!    injection.
//! 4. The filter interpolates toward a bounded target, so it can neither
//!    oscillate nor overshoot for any `spring_factor` in (0, 1].
//!
//! # Failure Modes
//!
//! - A non-finite global boost is treated as 0.
//! - An unclassified input (`Zone::None`, infinite distance) fades the tile
//!   and keeps the previously armed edge. With no armed edge the boost
//!   cannot raise intensity, so nothing invisible builds up.

use crate::config::EngineConfig;
use crate::easing::{approach, clamp_finite, clamp01, ease_out_cubic};
use crate::geometry::{Classification, Zone};

/// Integrated glow state of one tile.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileSimState {
    /// Glow strength in `[0, 1 + max_velocity_boost]`.
    pub intensity: f64,
    /// Position along the active edge in `[0, 1]`.
    pub position: f64,
    /// Active edge; `None` while below the render threshold.
    pub edge: Option<Zone>,
    /// Tile-local copy of the velocity boost, decaying each step.
    pub velocity_boost: f64,
}

impl TileSimState {
    /// Values a tile starts from and is reset to.
    pub const IDLE: Self = Self {
        intensity: 0.0,
        position: 0.5,
        edge: None,
        velocity_boost: 0.0,
    };

    /// Whether the state equals [`IDLE`](Self::IDLE).
    #[must_use]
    pub fn is_idle(&self) -> bool {
        *self == Self::IDLE
    }

    /// Whether the render mapper would draw this state.
    #[inline]
    #[must_use]
    pub fn is_visible(&self, config: &EngineConfig) -> bool {
        self.edge.is_some() && self.intensity >= config.min_intensity_for_render
    }

    /// Active zone, or [`Zone::None`] when idle.
    #[inline]
    #[must_use]
    pub fn zone(&self) -> Zone {
        self.edge.unwrap_or(Zone::None)
    }
}

impl Default for TileSimState {
    fn default() -> Self {
        Self::IDLE
    }
}

/// Result of one [`step`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepOutcome {
    /// The new state.
    pub state: TileSimState,
    /// Whether the host needs to repaint this tile.
    pub changed: bool,
    /// Intensity the state is converging toward this frame.
    pub target_intensity: f64,
}

/// Advance `state` by one frame.
#[must_use]
pub fn step(
    state: &TileSimState,
    input: &Classification,
    global_boost: f64,
    config: &EngineConfig,
) -> StepOutcome {
    let max_boost = config.max_velocity_boost.max(0.0);
    let max_intensity = 1.0 + max_boost;
    let spring = clamp_finite(config.spring_factor, f64::MIN_POSITIVE, 1.0);
    let min_render = config.min_intensity_for_render;

    let injected = if global_boost.is_finite() {
        global_boost
    } else {
        0.0
    };
    let boost = clamp_finite(state.velocity_boost.max(injected), 0.0, max_boost);

    let threshold = config.proximity_threshold;
    let in_range = input.distance.is_finite() && input.distance < threshold;
    let (target_base, position_target) = if in_range {
        let t = clamp01(1.0 - input.distance / threshold);
        (ease_out_cubic(t), clamp01(input.raw_position))
    } else {
        (0.0, state.position)
    };

    // No pointer and no armed edge: there is nothing to draw the boost on.
    let target_intensity = if input.zone == Zone::None && state.edge.is_none() {
        0.0
    } else {
        (target_base + boost).min(max_intensity)
    };

    let mut decayed = boost * clamp01(config.velocity_boost_decay);
    if decayed < f64::EPSILON {
        decayed = 0.0;
    }

    let intensity = clamp_finite(
        approach(state.intensity, target_intensity, spring),
        0.0,
        max_intensity,
    );
    let position = clamp01(approach(state.position, position_target, spring));

    let edge = if target_base > min_render || intensity >= min_render {
        match input.zone {
            Zone::None => state.edge,
            zone => Some(zone),
        }
    } else {
        None
    };

    let next = TileSimState {
        intensity,
        position,
        edge,
        velocity_boost: decayed,
    };

    let eps = config.change_epsilon;
    let changed = (next.intensity - state.intensity).abs() > eps
        || (next.position - state.position).abs() > eps
        || (next.velocity_boost - state.velocity_boost).abs() > eps
        || next.is_visible(config) != state.is_visible(config);

    StepOutcome {
        state: next,
        changed,
        target_intensity,
    }
}
