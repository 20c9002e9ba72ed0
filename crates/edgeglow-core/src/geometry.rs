#![forbid(unsafe_code)]

//! Geometric primitives and the pointer/tile classifier.
//!
//! [`classify`] maps a pointer and a tile rectangle to the nearest [`Zone`],
//! the distance to it, and a normalized position along that zone.
//!
//! # Invariants
//!
//! 1. `classify` is pure and O(1); identical inputs give identical outputs.
//! 2. `raw_position` is in `[0, 1]` for edge zones and `[0, 0.5]` for corners.
//! 3. `distance` is finite and `>= 0` for finite input, `+inf` otherwise.
//! 4. Zero, negative or non-finite width/height are treated as 1, so no
//!    division ever produces NaN or infinity.

/// A pointer position in host coordinates (px, origin top-left).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// Create a new point.
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Both coordinates are finite.
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Euclidean distance to `other`.
    #[inline]
    pub fn distance_to(&self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// A tile's on-screen bounding rectangle, as read from the host.
///
/// The engine never mutates bounds; it reads them fresh every frame.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ElementBounds {
    /// Left edge (px).
    pub left: f64,
    /// Top edge (px).
    pub top: f64,
    /// Width (px).
    pub width: f64,
    /// Height (px).
    pub height: f64,
}

impl ElementBounds {
    /// Create new bounds.
    #[inline]
    pub const fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Right edge.
    #[inline]
    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    /// Bottom edge.
    #[inline]
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    /// Whether these bounds describe something a frame can be computed
    /// against: finite origin and a strictly positive, finite size.
    #[inline]
    pub fn is_usable(&self) -> bool {
        self.left.is_finite()
            && self.top.is_finite()
            && self.width.is_finite()
            && self.height.is_finite()
            && self.width > 0.0
            && self.height > 0.0
    }

    /// Check if a point lies inside the rectangle (edges inclusive).
    #[inline]
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.left && p.x <= self.right() && p.y >= self.top && p.y <= self.bottom()
    }

    #[inline]
    fn safe_width(&self) -> f64 {
        safe_extent(self.width)
    }

    #[inline]
    fn safe_height(&self) -> f64 {
        safe_extent(self.height)
    }
}

#[inline]
fn safe_extent(v: f64) -> f64 {
    if v.is_finite() && v > 0.0 { v } else { 1.0 }
}

// ---------------------------------------------------------------------------
// Zone
// ---------------------------------------------------------------------------

/// Which edge or corner of a tile is nearest the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Zone {
    Top,
    Right,
    Bottom,
    Left,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
    /// Idle: no pointer, or nothing classified.
    #[default]
    None,
}

impl Zone {
    /// The four edges, in tie-break order.
    pub const EDGES: [Zone; 4] = [Zone::Top, Zone::Right, Zone::Bottom, Zone::Left];

    /// The four corners.
    pub const CORNERS: [Zone; 4] = [
        Zone::TopLeft,
        Zone::TopRight,
        Zone::BottomLeft,
        Zone::BottomRight,
    ];

    /// Whether this is one of the four corner zones.
    #[inline]
    pub const fn is_corner(self) -> bool {
        matches!(
            self,
            Zone::TopLeft | Zone::TopRight | Zone::BottomLeft | Zone::BottomRight
        )
    }

    /// Whether this is one of the four edge zones.
    #[inline]
    pub const fn is_edge(self) -> bool {
        matches!(self, Zone::Top | Zone::Right | Zone::Bottom | Zone::Left)
    }

    /// Stable lowercase name, used in logs.
    pub const fn as_str(self) -> &'static str {
        match self {
            Zone::Top => "top",
            Zone::Right => "right",
            Zone::Bottom => "bottom",
            Zone::Left => "left",
            Zone::TopLeft => "top-left",
            Zone::TopRight => "top-right",
            Zone::BottomLeft => "bottom-left",
            Zone::BottomRight => "bottom-right",
            Zone::None => "none",
        }
    }
}

// ---------------------------------------------------------------------------
// Classifier
// ---------------------------------------------------------------------------

/// Output of [`classify`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Classification {
    /// Nearest edge or corner.
    pub zone: Zone,
    /// Distance (px) from the pointer to that zone. Never negative.
    pub distance: f64,
    /// Normalized position along the zone (see module invariants).
    pub raw_position: f64,
    /// Pointer lies within the rectangle.
    pub inside: bool,
}

impl Classification {
    /// Result for input that cannot be classified.
    pub const UNCLASSIFIED: Self = Self {
        zone: Zone::None,
        distance: f64::INFINITY,
        raw_position: 0.5,
        inside: false,
    };
}

/// Where a relative coordinate sits against one axis of the rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Span {
    Before,
    Within,
    After,
}

#[inline]
fn span(rel: f64, extent: f64) -> Span {
    if rel < 0.0 {
        Span::Before
    } else if rel > extent {
        Span::After
    } else {
        Span::Within
    }
}

/// Classify `pointer` against `rect`.
///
/// Inside the rectangle the nearest edge wins (ties: top, right, bottom,
/// left). Outside, a pointer beyond both axes maps to the corner with the
/// Euclidean distance to the corner point; otherwise to the single edge it
/// overshoots.
///
/// `distance` is unsigned: inside the rectangle it is the distance to the
/// nearest edge, and [`Classification::inside`] tells the two sides apart.
/// A pointer deep inside a tile larger than twice the proximity threshold
/// is therefore out of range of every edge and produces no glow.
#[must_use]
pub fn classify(pointer: Point, rect: &ElementBounds) -> Classification {
    if !pointer.is_finite() || !rect.left.is_finite() || !rect.top.is_finite() {
        return Classification::UNCLASSIFIED;
    }

    let w = rect.safe_width();
    let h = rect.safe_height();
    let rel_x = pointer.x - rect.left;
    let rel_y = pointer.y - rect.top;

    let (zone, distance) = match (span(rel_x, w), span(rel_y, h)) {
        (Span::Within, Span::Within) => nearest_edge_inside(rel_x, rel_y, w, h),
        (Span::Before, Span::Before) => (Zone::TopLeft, rel_x.hypot(rel_y)),
        (Span::After, Span::Before) => (Zone::TopRight, (rel_x - w).hypot(rel_y)),
        (Span::Before, Span::After) => (Zone::BottomLeft, rel_x.hypot(rel_y - h)),
        (Span::After, Span::After) => (Zone::BottomRight, (rel_x - w).hypot(rel_y - h)),
        (Span::Within, Span::Before) => (Zone::Top, -rel_y),
        (Span::Within, Span::After) => (Zone::Bottom, rel_y - h),
        (Span::Before, Span::Within) => (Zone::Left, -rel_x),
        (Span::After, Span::Within) => (Zone::Right, rel_x - w),
    };

    Classification {
        zone,
        distance,
        raw_position: raw_position(zone, rel_x, rel_y, w, h),
        inside: zone.is_edge() && rect.contains(pointer),
    }
}

fn nearest_edge_inside(rel_x: f64, rel_y: f64, w: f64, h: f64) -> (Zone, f64) {
    let candidates = [
        (Zone::Top, rel_y.abs()),
        (Zone::Right, (rel_x - w).abs()),
        (Zone::Bottom, (rel_y - h).abs()),
        (Zone::Left, rel_x.abs()),
    ];
    let mut best = candidates[0];
    for candidate in &candidates[1..] {
        // Strict comparison keeps the earlier edge on ties.
        if candidate.1 < best.1 {
            best = *candidate;
        }
    }
    best
}

/// Project the pointer onto the zone.
///
/// Edges run clockwise: top left→right, right top→bottom, bottom right→left,
/// left bottom→top. Corners compress the split between vertical and
/// horizontal overshoot into `[0, 0.5]`.
fn raw_position(zone: Zone, rel_x: f64, rel_y: f64, w: f64, h: f64) -> f64 {
    let pos = match zone {
        Zone::Top => rel_x / w,
        Zone::Right => rel_y / h,
        Zone::Bottom => 1.0 - rel_x / w,
        Zone::Left => 1.0 - rel_y / h,
        Zone::TopLeft | Zone::TopRight | Zone::BottomLeft | Zone::BottomRight => {
            let horizontal = if rel_x < 0.0 { -rel_x } else { rel_x - w };
            let vertical = if rel_y < 0.0 { -rel_y } else { rel_y - h };
            let total = horizontal + vertical;
            if total > 0.0 {
                0.5 * vertical / total
            } else {
                0.25
            }
        }
        Zone::None => 0.5,
    };
    crate::easing::clamp01(pos)
}
