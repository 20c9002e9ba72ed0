#![forbid(unsafe_code)]

//! Per-tile lifecycle controller.
//!
//! [`TileController`] decides whether its tile runs the glow simulation,
//! drives one frame of it when asked, and exposes the tile's selection
//! action.
//!
//! # State Machine
//!
//! ```text
//!            mount + permits_simulation
//!  Disabled ───────────────────────────▶ Active
//!     ▲  ◀─────────────────────────────    │
//!     │   capability drop / transition     │
//!     │   / registration cancelled         │
//!     └──────────── unmount ───────────────┴──▶ Unmounted (terminal)
//! ```
//!
//! The mode is a tagged variant: [`TileMode::Simulated`] carries the
//! integrated state, [`TileMode::Static`] a host-precomputed highlight for
//! low-capability devices. Static tiles never enter Active.
//!
//! # Invariants
//!
//! 1. Only an Active tile with a live registration mutates its state.
//! 2. Leaving Active cancels the registration and resets the state to
//!    [`TileSimState::IDLE`] in the same call.
//! 3. A hidden document, missing bounds or an invalid pointer skip the frame
//!    without touching the state, so the glow resumes where it paused.
//! 4. `select` notifies the host at most once per pending selection.
//!
//! # Failure Modes
//!
//! - If the host cancels a registration behind the controller's back, the
//!   next `frame` call notices, resets and reports [`TileFrame::Inactive`].

use std::sync::Arc;

use edgeglow_core::{
    Classification, ElementBounds, EngineConfig, RenderSpec, StaticHighlight, TileSimState,
    classify, step, to_render_description,
};

use crate::frame_loop::{FrameLoop, FrameRegistration};
use crate::host::{FrameInput, TileFlags, TileHost, TileId, TileSelection};

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// Lifecycle phase of a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Not simulating (not mounted yet, low capability, or in a transition).
    Disabled,
    /// Simulating once per frame.
    Active,
    /// Unmounted; terminal.
    Unmounted,
}

/// How the tile's glow is produced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TileMode {
    /// Per-frame simulation.
    Simulated(TileSimState),
    /// Fixed highlight, no simulation.
    Static(StaticHighlight),
}

/// Why a frame was skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Document or tab not visible.
    Hidden,
    /// Bounds missing, zero-sized or non-finite.
    NoBounds,
    /// Pointer coordinates were not finite.
    InvalidPointer,
}

/// What a tile produced for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TileFrame {
    /// Not running; nothing to paint.
    Inactive,
    /// Frame skipped; state untouched, keep the previous paint.
    Skipped(SkipReason),
    /// Simulation stepped.
    Painted {
        spec: Option<RenderSpec>,
        /// Host should repaint this tile.
        changed: bool,
    },
    /// Static highlight, painted without simulation.
    Static(Option<RenderSpec>),
}

impl TileFrame {
    /// The render description, if this frame has one.
    #[must_use]
    pub fn spec(&self) -> Option<&RenderSpec> {
        match self {
            TileFrame::Painted { spec, .. } | TileFrame::Static(spec) => spec.as_ref(),
            TileFrame::Inactive | TileFrame::Skipped(_) => None,
        }
    }
}

/// Diagnostic counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TileStats {
    pub frames_painted: u64,
    pub frames_static: u64,
    pub skipped_hidden: u64,
    pub skipped_bounds: u64,
    pub skipped_pointer: u64,
    pub activations: u64,
    pub deactivations: u64,
    pub selections: u64,
}

// ---------------------------------------------------------------------------
// TileController
// ---------------------------------------------------------------------------

/// Owns one tile's simulation state for the tile's lifetime.
#[derive(Debug)]
pub struct TileController {
    id: TileId,
    config: Arc<EngineConfig>,
    phase: Phase,
    mounted: bool,
    flags: TileFlags,
    mode: TileMode,
    static_highlight: Option<StaticHighlight>,
    registration: Option<FrameRegistration>,
    last_bounds: Option<ElementBounds>,
    selection_pending: bool,
    stats: TileStats,
}

impl TileController {
    /// Create an unmounted controller.
    #[must_use]
    pub fn new(id: TileId, config: Arc<EngineConfig>) -> Self {
        Self {
            id,
            config,
            phase: Phase::Disabled,
            mounted: false,
            flags: TileFlags::FULL,
            mode: TileMode::Simulated(TileSimState::IDLE),
            static_highlight: None,
            registration: None,
            last_bounds: None,
            selection_pending: false,
            stats: TileStats::default(),
        }
    }

    /// Supply the highlight used when the device is low capability.
    ///
    /// Without one, [`StaticHighlight::seeded`] is used.
    #[must_use]
    pub fn with_static_highlight(mut self, highlight: StaticHighlight) -> Self {
        self.static_highlight = Some(highlight);
        self
    }

    /// Mount the tile with its initial flags.
    pub fn mount(&mut self, flags: TileFlags, frames: &mut FrameLoop) {
        if self.phase == Phase::Unmounted || self.mounted {
            return;
        }
        self.mounted = true;
        self.flags = flags;
        tracing::debug!(tile = self.id.0, ?flags, "tile mounted");
        self.reevaluate(frames);
    }

    /// Apply new capability/transition flags.
    pub fn set_flags(&mut self, flags: TileFlags, frames: &mut FrameLoop) {
        if self.phase == Phase::Unmounted {
            return;
        }
        if self.flags.in_transition() && !flags.in_transition() {
            self.selection_pending = false;
        }
        self.flags = flags;
        self.reevaluate(frames);
    }

    /// Replace the static highlight. Takes effect immediately when the tile
    /// is in static mode.
    pub fn set_static_highlight(&mut self, highlight: Option<StaticHighlight>) {
        self.static_highlight = highlight;
        if let TileMode::Static(_) = self.mode {
            self.mode = TileMode::Static(self.resolved_highlight());
        }
    }

    /// Unmount the tile. Terminal: later calls are no-ops.
    pub fn unmount(&mut self, frames: &mut FrameLoop) {
        if self.phase == Phase::Unmounted {
            return;
        }
        if self.phase == Phase::Active {
            self.deactivate(frames, "unmount");
        } else {
            frames.cancel(self.id);
            self.registration = None;
        }
        self.mounted = false;
        self.selection_pending = false;
        self.phase = Phase::Unmounted;
        tracing::debug!(tile = self.id.0, "tile unmounted");
    }

    /// Run one frame: classify → step → render.
    ///
    /// `global_boost` is the shared velocity boost read once for the frame.
    pub fn frame(&mut self, input: &FrameInput, global_boost: f64) -> TileFrame {
        match self.phase {
            Phase::Unmounted => return TileFrame::Inactive,
            Phase::Disabled => return self.static_frame(input),
            Phase::Active => {}
        }

        if self
            .registration
            .as_ref()
            .is_none_or(FrameRegistration::is_cancelled)
        {
            tracing::debug!(tile = self.id.0, "registration cancelled externally");
            self.reset_to_idle();
            self.registration = None;
            self.phase = Phase::Disabled;
            self.stats.deactivations += 1;
            return TileFrame::Inactive;
        }

        if !input.document_visible {
            self.stats.skipped_hidden += 1;
            return TileFrame::Skipped(SkipReason::Hidden);
        }

        let Some(bounds) = input.bounds.filter(ElementBounds::is_usable) else {
            self.stats.skipped_bounds += 1;
            tracing::trace!(tile = self.id.0, "frame skipped: no usable bounds");
            return TileFrame::Skipped(SkipReason::NoBounds);
        };
        self.last_bounds = Some(bounds);

        let classification = match input.pointer {
            Some(p) if p.is_finite() => classify(p, &bounds),
            Some(_) => {
                self.stats.skipped_pointer += 1;
                return TileFrame::Skipped(SkipReason::InvalidPointer);
            }
            // Pointer left the document: fade out.
            None => Classification::UNCLASSIFIED,
        };

        let TileMode::Simulated(state) = self.mode else {
            return TileFrame::Inactive;
        };
        let outcome = step(&state, &classification, global_boost, &self.config);
        if outcome.state.edge != state.edge {
            tracing::trace!(
                tile = self.id.0,
                from = state.zone().as_str(),
                to = outcome.state.zone().as_str(),
                "edge changed"
            );
        }
        self.mode = TileMode::Simulated(outcome.state);
        self.stats.frames_painted += 1;

        TileFrame::Painted {
            spec: to_render_description(&outcome.state, &self.config),
            changed: outcome.changed,
        }
    }

    /// Notify the host that this tile was activated.
    ///
    /// Allowed in every phase except after unmount. Returns `false` without
    /// notifying if a selection is already pending.
    pub fn select(&mut self, bounds: Option<ElementBounds>, host: &mut impl TileHost) -> bool {
        if self.phase == Phase::Unmounted || self.selection_pending {
            return false;
        }
        if let Some(b) = bounds {
            self.last_bounds = Some(b);
        }
        self.selection_pending = true;
        self.stats.selections += 1;
        tracing::info!(tile = self.id.0, "tile selected");
        host.on_select(TileSelection {
            id: self.id,
            bounds: bounds.or(self.last_bounds),
        });
        true
    }

    /// Allow the next `select` to notify again.
    pub fn clear_selection(&mut self) {
        self.selection_pending = false;
    }

    // -- accessors ----------------------------------------------------------

    #[inline]
    #[must_use]
    pub fn id(&self) -> TileId {
        self.id
    }

    #[inline]
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[inline]
    #[must_use]
    pub fn flags(&self) -> TileFlags {
        self.flags
    }

    #[inline]
    #[must_use]
    pub fn mode(&self) -> &TileMode {
        &self.mode
    }

    /// Simulation state, if the tile is in simulated mode.
    #[must_use]
    pub fn sim_state(&self) -> Option<&TileSimState> {
        match &self.mode {
            TileMode::Simulated(state) => Some(state),
            TileMode::Static(_) => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.phase == Phase::Active
    }

    #[inline]
    #[must_use]
    pub fn selection_pending(&self) -> bool {
        self.selection_pending
    }

    #[inline]
    #[must_use]
    pub fn stats(&self) -> &TileStats {
        &self.stats
    }

    // -- internals ----------------------------------------------------------

    fn reevaluate(&mut self, frames: &mut FrameLoop) {
        if self.flags.full_capability {
            if let TileMode::Static(_) = self.mode {
                self.mode = TileMode::Simulated(TileSimState::IDLE);
            }
        } else {
            self.mode = TileMode::Static(self.resolved_highlight());
        }

        let want_active = self.mounted && self.flags.permits_simulation();
        match (self.phase, want_active) {
            (Phase::Disabled, true) => self.activate(frames),
            (Phase::Active, false) => {
                let reason = if !self.flags.full_capability {
                    "capability"
                } else {
                    "transition"
                };
                self.deactivate(frames, reason);
            }
            _ => {}
        }
    }

    fn activate(&mut self, frames: &mut FrameLoop) {
        self.reset_to_idle();
        self.registration = Some(frames.request(self.id));
        self.phase = Phase::Active;
        self.stats.activations += 1;
        tracing::info!(tile = self.id.0, "glow loop started");
    }

    fn deactivate(&mut self, frames: &mut FrameLoop, reason: &'static str) {
        frames.cancel(self.id);
        self.registration = None;
        if let TileMode::Simulated(_) = self.mode {
            self.reset_to_idle();
        }
        self.phase = Phase::Disabled;
        self.stats.deactivations += 1;
        tracing::info!(tile = self.id.0, reason, "glow loop stopped");
    }

    fn reset_to_idle(&mut self) {
        if let TileMode::Simulated(_) = self.mode {
            self.mode = TileMode::Simulated(TileSimState::IDLE);
        }
    }

    fn resolved_highlight(&self) -> StaticHighlight {
        self.static_highlight
            .unwrap_or_else(|| StaticHighlight::seeded(self.id.0))
    }

    fn static_frame(&mut self, input: &FrameInput) -> TileFrame {
        let TileMode::Static(highlight) = self.mode else {
            return TileFrame::Inactive;
        };
        if !self.mounted || self.flags.in_transition() {
            return TileFrame::Inactive;
        }
        if !input.document_visible {
            self.stats.skipped_hidden += 1;
            return TileFrame::Skipped(SkipReason::Hidden);
        }
        self.stats.frames_static += 1;
        TileFrame::Static(RenderSpec::from_static(&highlight, &self.config))
    }
}
