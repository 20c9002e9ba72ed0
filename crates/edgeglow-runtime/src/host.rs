#![forbid(unsafe_code)]

//! Types exchanged with the host UI layer.
//!
//! The host owns geometry, device heuristics and page transitions. It hands
//! the engine plain values ([`TileFlags`], [`FrameInput`]) and receives a
//! [`TileSelection`] through [`TileHost`] when a tile is activated.

use std::fmt;

use edgeglow_core::{ElementBounds, Point};

/// Host-assigned tile identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileId(pub u64);

impl fmt::Display for TileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tile#{}", self.0)
    }
}

/// Capability and transition flags the host grants or revokes per tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileFlags {
    /// Device can afford the per-frame simulation.
    pub full_capability: bool,
    /// This tile is the target of an in-progress page transition.
    pub transition_target: bool,
    /// Another tile is the target of an in-progress page transition.
    pub sibling_transition: bool,
}

impl TileFlags {
    /// Full capability, no transition.
    pub const FULL: Self = Self {
        full_capability: true,
        transition_target: false,
        sibling_transition: false,
    };

    /// Low capability, no transition.
    pub const LOW_CAPABILITY: Self = Self {
        full_capability: false,
        transition_target: false,
        sibling_transition: false,
    };

    /// Either transition flag is set.
    #[inline]
    pub const fn in_transition(&self) -> bool {
        self.transition_target || self.sibling_transition
    }

    /// Whether a mounted tile with these flags may run the simulation.
    #[inline]
    pub const fn permits_simulation(&self) -> bool {
        self.full_capability && !self.in_transition()
    }
}

impl Default for TileFlags {
    fn default() -> Self {
        Self::FULL
    }
}

/// What the host supplies for one tile on one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameInput {
    /// Latest global pointer position; `None` if the pointer is not over
    /// the document.
    pub pointer: Option<Point>,
    /// The tile's current bounding rectangle, if laid out.
    pub bounds: Option<ElementBounds>,
    /// Document/tab visibility.
    pub document_visible: bool,
}

impl FrameInput {
    /// Visible document, pointer and bounds known.
    pub const fn visible(pointer: Point, bounds: ElementBounds) -> Self {
        Self {
            pointer: Some(pointer),
            bounds: Some(bounds),
            document_visible: true,
        }
    }
}

/// Payload of a tile activation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileSelection {
    pub id: TileId,
    /// Bounds at the moment of activation, for the host's own transition.
    pub bounds: Option<ElementBounds>,
}

/// Receives selection notifications.
pub trait TileHost {
    fn on_select(&mut self, selection: TileSelection);
}

impl<F: FnMut(TileSelection)> TileHost for F {
    fn on_select(&mut self, selection: TileSelection) {
        self(selection);
    }
}

/// Looks up a tile's current bounds each frame.
pub trait BoundsSource {
    fn bounds(&self, id: TileId) -> Option<ElementBounds>;
}

impl<F: Fn(TileId) -> Option<ElementBounds>> BoundsSource for F {
    fn bounds(&self, id: TileId) -> Option<ElementBounds> {
        self(id)
    }
}
