#![forbid(unsafe_code)]

//! Runtime: per-tile lifecycle and frame wiring for edgeglow.
//!
//! # Role in edgeglow
//! `edgeglow-core` is pure math. This crate owns everything with a lifetime:
//! which tiles are simulating, the single writer of pointer input, the frame
//! registrations that can be cancelled, and the seam to the host UI.
//!
//! # Primary responsibilities
//! - **lifecycle**: [`TileController`], the per-tile Disabled/Active state
//!   machine with its static fallback and selection action.
//! - **pointer**: [`PointerHub`], the global pointer sample and shared boost.
//! - **frame_loop**: [`FrameLoop`], cancellable per-tile frame registrations.
//! - **board**: [`Board`], a driver that runs every tile once per frame.
//! - **host**: the traits and flag types exchanged with the host.
//!
//! # How it fits in the system
//! The host forwards pointer moves to the [`Board`], reports capability and
//! transition changes as they happen, and calls [`Board::tick`] from its
//! animation-frame callback, painting the returned [`TileFrame`]s.

pub mod board;
pub mod cancellation;
pub mod frame_loop;
pub mod host;
pub mod lifecycle;
pub mod pointer;

pub use board::{Board, TileOutput};
pub use cancellation::{CancellationSource, CancellationToken};
pub use frame_loop::{FrameLoop, FrameRegistration};
pub use host::{BoundsSource, FrameInput, TileFlags, TileHost, TileId, TileSelection};
pub use lifecycle::{Phase, SkipReason, TileController, TileFrame, TileMode, TileStats};
pub use pointer::PointerHub;
