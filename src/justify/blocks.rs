//! Block bundling: runs of same-direction lines share curvature parameters.

use crate::config::BlockHandling;
use crate::foundation::math::Slope;
use crate::justify::{MEETING_WIDTH, MIN_RADIUS};

#[derive(Clone, Copy, Debug, Default, PartialEq)]
/// A line's membership in a bundle on one side of a transition.
pub(crate) struct BlockAssign {
    /// Vertical span of the block's outermost members.
    pub(crate) size: f64,
    /// Normalized position within the block, in `[0, 1]`.
    pub(crate) offset: f64,
}

/// Assign each item a block for one side of a layer transition.
///
/// `continuous` starts a new block at every slope-sign change in layer order;
/// `full` forms exactly one upward and one downward block regardless of
/// contiguity, with flat lines getting zero-size blocks.
pub(crate) fn assign_blocks<T>(
    mode: BlockHandling,
    items: &[T],
    slope: impl Fn(&T) -> Slope,
    y: impl Fn(&T) -> f64,
) -> Vec<BlockAssign> {
    let slopes: Vec<Slope> = items.iter().map(&slope).collect();
    let mut assigns = vec![BlockAssign::default(); items.len()];

    match mode {
        BlockHandling::Continuous => {
            let mut run_start = 0;
            for end in 1..=items.len() {
                if end == items.len() || slopes[end] != slopes[run_start] {
                    let y0 = y(&items[run_start]);
                    let size = y(&items[end - 1]) - y0;
                    for (k, assign) in assigns[run_start..end].iter_mut().enumerate() {
                        *assign = BlockAssign {
                            size,
                            offset: if size == 0.0 {
                                0.0
                            } else {
                                (y(&items[run_start + k]) - y0) / size
                            },
                        };
                    }
                    run_start = end;
                }
            }
        }
        BlockHandling::Full => {
            let span = |wanted: Slope| {
                let mut members = items
                    .iter()
                    .zip(&slopes)
                    .filter(|(_, s)| **s == wanted)
                    .map(|(t, _)| y(t));
                let first = members.next().unwrap_or(0.0);
                let last = members.last().unwrap_or(first);
                (first, last - first)
            };
            let (up0, up_size) = span(Slope::Up);
            let (down0, down_size) = span(Slope::Down);
            for (assign, (item, s)) in assigns.iter_mut().zip(items.iter().zip(&slopes)) {
                *assign = match s {
                    Slope::Up => BlockAssign {
                        size: up_size,
                        offset: if up_size == 0.0 {
                            0.0
                        } else {
                            (y(item) - up0) / up_size
                        },
                    },
                    Slope::Down => BlockAssign {
                        size: down_size,
                        offset: if down_size == 0.0 {
                            0.0
                        } else {
                            (y(item) - down0) / down_size
                        },
                    },
                    Slope::Flat => BlockAssign::default(),
                };
            }
        }
    }
    assigns
}

/// Merge a line's left-side and right-side block into one joint pair so the
/// curvature stays continuous across the layer boundary even when the bundle
/// composition changes.
pub(crate) fn join_blocks(left: BlockAssign, right: BlockAssign) -> BlockAssign {
    if left.size == 0.0 && right.size == 0.0 {
        return BlockAssign::default();
    }
    let top = (left.size * left.offset).max(right.size * right.offset);
    let bottom = (left.size * (1.0 - left.offset)).max(right.size * (1.0 - right.offset));
    BlockAssign {
        size: top + bottom,
        offset: top / (top + bottom),
    }
}

/// Minimum horizontal extent keeping the S-curve's arcs off the bundle's
/// minimum turning radius, plus the meeting-marker stub.
pub(crate) fn min_transition_width(dy: f64, block_size: f64) -> f64 {
    if dy.is_nan() {
        return 0.0;
    }
    let dx_min2 = (2.0 * block_size + 4.0 * MIN_RADIUS) * dy.abs() - dy * dy;
    dy.abs().max(if dx_min2 > 0.0 { dx_min2.sqrt() } else { 0.0 }) + MEETING_WIDTH
}

#[cfg(test)]
#[path = "../../tests/unit/justify/blocks.rs"]
mod tests;
