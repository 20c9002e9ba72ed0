#![forbid(unsafe_code)]

//! Cancellable per-tile frame registrations.
//!
//! Each Active tile holds exactly one [`FrameRegistration`]. The
//! [`FrameLoop`] keeps the matching [`CancellationSource`] and is the only
//! place a registration can be cancelled from. A tile checks its token
//! before every step, so once [`FrameLoop::cancel`] returns no further
//! mutation of that tile's state can happen.
//!
//! # Invariants
//!
//! 1. At most one live registration per [`TileId`]; requesting again
//!    cancels the previous one.
//! 2. `cancel` is idempotent.
//! 3. A registration whose token is cancelled never becomes live again.

use ahash::AHashMap;

use crate::cancellation::{CancellationSource, CancellationToken};
use crate::host::TileId;

/// A tile's claim on the frame loop.
#[derive(Debug, Clone)]
pub struct FrameRegistration {
    id: TileId,
    token: CancellationToken,
}

impl FrameRegistration {
    /// Tile this registration belongs to.
    #[inline]
    pub fn id(&self) -> TileId {
        self.id
    }

    /// Whether the loop has cancelled this registration.
    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

/// Registry of live per-tile frame registrations.
#[derive(Debug, Default)]
pub struct FrameLoop {
    live: AHashMap<TileId, CancellationSource>,
}

impl FrameLoop {
    /// Create an empty loop.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `id` for per-frame callbacks.
    pub fn request(&mut self, id: TileId) -> FrameRegistration {
        let source = CancellationSource::new();
        let token = source.token();
        if let Some(previous) = self.live.insert(id, source) {
            previous.cancel();
        }
        tracing::trace!(tile = id.0, "frame registration requested");
        FrameRegistration { id, token }
    }

    /// Cancel `id`'s registration. Returns `false` if none was live.
    pub fn cancel(&mut self, id: TileId) -> bool {
        match self.live.remove(&id) {
            Some(source) => {
                source.cancel();
                tracing::trace!(tile = id.0, "frame registration cancelled");
                true
            }
            None => false,
        }
    }

    /// Cancel every registration.
    pub fn cancel_all(&mut self) {
        for (_, source) in self.live.drain() {
            source.cancel();
        }
    }

    /// Whether `id` currently holds a live registration.
    #[must_use]
    pub fn is_live(&self, id: TileId) -> bool {
        self.live.contains_key(&id)
    }

    /// Number of live registrations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.live.len()
    }

    /// No live registrations.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }
}
