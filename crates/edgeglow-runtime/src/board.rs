#![forbid(unsafe_code)]

//! A page of tiles driven from one animation-frame callback.
//!
//! [`Board`] wires the pieces together: it owns the [`PointerHub`], the
//! [`FrameLoop`] and one [`TileController`] per mounted tile, and turns
//! host-level events (capability, page transitions) into per-tile flags.
//!
//! Each [`Board::tick`] reads the shared boost once, steps every tile in
//! ascending [`TileId`] order, then decays the boost once if the document
//! was visible. Tiles therefore see the same boost within a frame.

use std::sync::Arc;

use ahash::AHashMap;
use edgeglow_core::{EngineConfig, PointerSample, SampleVerdict, StaticHighlight};

use crate::frame_loop::FrameLoop;
use crate::host::{BoundsSource, FrameInput, TileFlags, TileHost, TileId};
use crate::lifecycle::{TileController, TileFrame};
use crate::pointer::PointerHub;

/// One tile's result for a frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileOutput {
    pub id: TileId,
    pub frame: TileFrame,
}

/// Every tile on a page, plus the shared pointer state.
#[derive(Debug)]
pub struct Board {
    config: Arc<EngineConfig>,
    pointer: PointerHub,
    frames: FrameLoop,
    tiles: AHashMap<TileId, TileController>,
    full_capability: bool,
    transition: Option<TileId>,
}

impl Board {
    /// Create an empty board.
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        Self::with_shared(Arc::new(config))
    }

    /// Create an empty board sharing an existing config.
    #[must_use]
    pub fn with_shared(config: Arc<EngineConfig>) -> Self {
        Self {
            pointer: PointerHub::new(&config),
            config,
            frames: FrameLoop::new(),
            tiles: AHashMap::new(),
            full_capability: true,
            transition: None,
        }
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Mount a tile. Remounting an existing id replaces it.
    pub fn mount(&mut self, id: TileId, highlight: Option<StaticHighlight>) {
        if let Some(mut old) = self.tiles.remove(&id) {
            old.unmount(&mut self.frames);
        }
        let mut tile = TileController::new(id, Arc::clone(&self.config));
        tile.set_static_highlight(highlight);
        let flags = self.flags_for(id);
        tile.mount(flags, &mut self.frames);
        self.tiles.insert(id, tile);
    }

    /// Unmount a tile. Returns `false` if it was not mounted.
    pub fn unmount(&mut self, id: TileId) -> bool {
        match self.tiles.remove(&id) {
            Some(mut tile) => {
                tile.unmount(&mut self.frames);
                if self.transition == Some(id) {
                    self.end_transition();
                }
                true
            }
            None => false,
        }
    }

    /// Device capability changed.
    pub fn set_full_capability(&mut self, full: bool) {
        if self.full_capability == full {
            return;
        }
        tracing::info!(full, "device capability changed");
        self.full_capability = full;
        self.refresh_flags();
    }

    /// A page transition toward `target` started. Every tile stops.
    pub fn begin_transition(&mut self, target: TileId) {
        tracing::debug!(tile = target.0, "transition started");
        self.transition = Some(target);
        self.refresh_flags();
    }

    /// The page transition finished.
    pub fn end_transition(&mut self) {
        if self.transition.take().is_some() {
            tracing::debug!("transition ended");
            self.refresh_flags();
        }
    }

    /// Forward a pointer move from the host.
    pub fn pointer_moved(&mut self, x: f64, y: f64, timestamp_ms: i64) -> SampleVerdict {
        self.pointer.record(PointerSample::new(x, y, timestamp_ms))
    }

    /// The pointer left the document.
    pub fn pointer_left(&mut self) {
        self.pointer.clear();
    }

    /// Run the selection action of `id`.
    ///
    /// Returns `false` if the tile is unknown or a selection is pending.
    pub fn select(
        &mut self,
        id: TileId,
        bounds: &impl BoundsSource,
        host: &mut impl TileHost,
    ) -> bool {
        match self.tiles.get_mut(&id) {
            Some(tile) => tile.select(bounds.bounds(id), host),
            None => false,
        }
    }

    /// Run one frame for every tile, in ascending id order.
    pub fn tick(&mut self, document_visible: bool, bounds: &impl BoundsSource) -> Vec<TileOutput> {
        let global_boost = self.pointer.boost();
        let pointer = self.pointer.latest();

        let mut ids: Vec<TileId> = self.tiles.keys().copied().collect();
        ids.sort_unstable();

        let mut out = Vec::with_capacity(ids.len());
        for id in ids {
            let Some(tile) = self.tiles.get_mut(&id) else {
                continue;
            };
            let input = FrameInput {
                pointer,
                bounds: bounds.bounds(id),
                document_visible,
            };
            out.push(TileOutput {
                id,
                frame: tile.frame(&input, global_boost),
            });
        }

        if document_visible {
            self.pointer.end_frame();
        }
        out
    }

    /// Controller for `id`, if mounted.
    #[must_use]
    pub fn tile(&self, id: TileId) -> Option<&TileController> {
        self.tiles.get(&id)
    }

    #[must_use]
    pub fn pointer(&self) -> &PointerHub {
        &self.pointer
    }

    /// Live frame registrations.
    #[must_use]
    pub fn frame_loop(&self) -> &FrameLoop {
        &self.frames
    }

    /// Cancel a tile's registration directly, as a host would when
    /// tearing down an animation frame.
    pub fn cancel_registration(&mut self, id: TileId) -> bool {
        self.frames.cancel(id)
    }

    /// Mounted tile count.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    fn flags_for(&self, id: TileId) -> TileFlags {
        TileFlags {
            full_capability: self.full_capability,
            transition_target: self.transition == Some(id),
            sibling_transition: self.transition.is_some_and(|t| t != id),
        }
    }

    fn refresh_flags(&mut self) {
        let mut ids: Vec<TileId> = self.tiles.keys().copied().collect();
        ids.sort_unstable();
        for id in ids {
            let flags = self.flags_for(id);
            if let Some(tile) = self.tiles.get_mut(&id) {
                tile.set_flags(flags, &mut self.frames);
            }
        }
    }
}

impl Drop for Board {
    fn drop(&mut self) {
        self.frames.cancel_all();
    }
}
