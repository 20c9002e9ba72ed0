#![forbid(unsafe_code)]

//! Core: the per-frame math behind proximity-reactive tile borders.
//!
//! # Role in edgeglow
//! `edgeglow-core` holds the pure, synchronous pieces of the engine. Nothing
//! here owns a frame loop or talks to a host; every function is O(1) and
//! deterministic for identical inputs.
//!
//! # Primary responsibilities
//! - **geometry**: classify a pointer against a tile rectangle into a [`Zone`].
//! - **velocity**: turn a stream of pointer samples into a decaying boost.
//! - **integrator**: spring-smooth a [`TileSimState`] toward its target.
//! - **render**: map state to a declarative [`RenderSpec`].
//! - **config**: the tuning constants shared by all of the above.
//!
//! # How it fits in the system
//! `edgeglow-runtime` owns one [`TileSimState`] per mounted tile, feeds it
//! the shared pointer and boost once per frame, and hands the resulting
//! [`RenderSpec`] to the host renderer.

pub mod config;
pub mod easing;
pub mod geometry;
pub mod integrator;
pub mod logging;
pub mod render;
pub mod velocity;

pub use config::{ConfigError, EngineConfig, RenderTuning};
pub use geometry::{Classification, ElementBounds, Point, Zone, classify};
pub use integrator::{StepOutcome, TileSimState, step};
pub use render::{CornerWedge, RenderSpec, StaticHighlight, to_render_description};
pub use velocity::{BoostPolicy, PointerSample, SampleVerdict, VelocityTracker};

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{debug, error, info, trace, warn};
