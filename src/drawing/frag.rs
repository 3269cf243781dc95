//! Geometric primitives handed to a renderer.
//!
//! A justified storyline is a flat list of [`DrawingFrag`] values: character
//! stubs, S-curve segments and meeting markers. Fragments reference characters
//! by id only; positions are in layout units (one character row = 1.0).

use kurbo::{Point, Rect};

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
/// A character reference with its meeting flag at the fragment's layer.
pub struct CharState {
    /// Character id.
    pub id: String,
    /// Whether the character sits in an active group at this layer.
    pub in_meeting: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
/// Parameters of the two-arc S-curve spanning one layer transition.
pub struct SLine {
    /// Horizontal extent.
    pub dx: f64,
    /// Vertical displacement (may be negative or zero).
    pub dy: f64,
    /// Radius of the first arc.
    pub r1: f64,
    /// Radius of the second arc.
    pub r2: f64,
}

impl SLine {
    /// A straight horizontal segment of length `dx`.
    pub fn straight(dx: f64) -> Self {
        Self {
            dx,
            dy: 0.0,
            r1: 0.0,
            r2: 0.0,
        }
    }

    /// Derive arc radii from a joint block `(block_size, offset)`.
    ///
    /// `d = (dy² + dx²) / (2|dy|)` is the radius sum; the block offset shifts
    /// the split point so all curves of one bundle share consistent curvature.
    /// `dy == 0` degenerates to a straight segment.
    pub fn from_block(dx: f64, dy: f64, block_size: f64, offset: f64) -> Self {
        if dy == 0.0 {
            return Self::straight(dx);
        }
        let d = (dy * dy + dx * dx) / (2.0 * dy.abs());
        let r1 = d / 2.0 - dy.signum() * (offset - 0.5) * block_size;
        Self {
            dx,
            dy,
            r1,
            r2: d - r1,
        }
    }

    /// Render as an SVG path fragment (two relative `a` arcs).
    ///
    /// The sweep flags follow `sign(dy)`; renderers relying on visual parity
    /// must reproduce this mapping bit for bit. A straight segment renders as
    /// a relative line.
    pub fn to_svg_arcs(&self) -> String {
        if self.dy == 0.0 {
            return format!("l {} 0", self.dx);
        }
        let d = self.r1 + self.r2;
        let (dx1, dy1) = (self.r1 / d * self.dx, self.r1 / d * self.dy);
        let (dx2, dy2) = (self.dx - dx1, self.dy - dy1);
        let sweep1 = u8::from(dy1 > 0.0);
        let sweep2 = u8::from(dy1 <= 0.0);
        format!(
            "a {r1} {r1} 0 0 {sweep1} {dx1} {dy1} a {r2} {r2} 0 0 {sweep2} {dx2} {dy2}",
            r1 = self.r1,
            r2 = self.r2,
        )
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
/// One drawable record of a justified storyline.
pub enum DrawingFrag {
    /// A character's first appearance: a short horizontal stub.
    CharInit {
        /// Character and meeting flag.
        character: CharState,
        /// Left end of the stub.
        pos: Point,
        /// Stub length.
        dx: f64,
    },
    /// A curve segment between two consecutive layers.
    CharLine {
        /// Character and meeting flag.
        character: CharState,
        /// Left end of the segment.
        pos: Point,
        /// Horizontal extent of the transition.
        dx: f64,
        /// S-curve parameters.
        s_line: SLine,
    },
    /// A vertical capsule marking an active group.
    Meeting {
        /// Top-left corner.
        pos: Point,
        /// Marker width.
        dx: f64,
        /// Marker height (`group size - 1`).
        dy: f64,
        /// Originating layer index.
        layer: usize,
        /// Topmost member, used to correlate meetings across passes.
        top_char: String,
    },
}

impl DrawingFrag {
    /// Axis-aligned bounding box of the fragment.
    pub fn bounds(&self) -> Rect {
        match self {
            DrawingFrag::CharInit { pos, dx, .. } => {
                Rect::from_points(*pos, Point::new(pos.x + dx, pos.y))
            }
            DrawingFrag::CharLine { pos, dx, s_line, .. } => {
                Rect::from_points(*pos, Point::new(pos.x + dx, pos.y + s_line.dy))
            }
            DrawingFrag::Meeting { pos, dx, dy, .. } => {
                Rect::from_points(*pos, Point::new(pos.x + dx, pos.y + dy))
            }
        }
    }
}

/// Bounding box of a whole fragment list (zero rect when empty).
pub fn drawing_bounds(frags: &[DrawingFrag]) -> Rect {
    frags
        .iter()
        .map(DrawingFrag::bounds)
        .reduce(|a, b| a.union(b))
        .unwrap_or(Rect::ZERO)
}
