use super::*;
use crate::justify::{MEETING_WIDTH, MIN_RADIUS};

// Item: (slope dy, left-side y).
fn slope_of(item: &(f64, f64)) -> Slope {
    Slope::of(item.0)
}

fn y_of(item: &(f64, f64)) -> f64 {
    item.1
}

#[test]
fn continuous_splits_at_slope_changes() {
    // Two downward lines, one flat, one downward again: three runs.
    let items = [(2.0, 0.0), (2.0, 1.0), (0.0, 2.0), (2.0, 3.0)];
    let assigns = assign_blocks(BlockHandling::Continuous, &items, slope_of, y_of);
    assert_eq!(assigns[0], BlockAssign { size: 1.0, offset: 0.0 });
    assert_eq!(assigns[1], BlockAssign { size: 1.0, offset: 1.0 });
    // Singleton runs collapse to zero size.
    assert_eq!(assigns[2], BlockAssign::default());
    assert_eq!(assigns[3], BlockAssign::default());
}

#[test]
fn continuous_keeps_equal_slope_runs_together() {
    let items = [(-1.5, 0.0), (-1.5, 1.0), (-1.5, 2.0)];
    let assigns = assign_blocks(BlockHandling::Continuous, &items, slope_of, y_of);
    assert_eq!(assigns[0], BlockAssign { size: 2.0, offset: 0.0 });
    assert_eq!(assigns[1], BlockAssign { size: 2.0, offset: 0.5 });
    assert_eq!(assigns[2], BlockAssign { size: 2.0, offset: 1.0 });
}

#[test]
fn full_bundles_non_contiguous_same_direction_lines() {
    // Down, up, down: full mode joins the two downward lines across the gap.
    let items = [(1.0, 0.0), (-1.0, 1.0), (1.0, 2.0)];
    let assigns = assign_blocks(BlockHandling::Full, &items, slope_of, y_of);
    assert_eq!(assigns[0], BlockAssign { size: 2.0, offset: 0.0 });
    assert_eq!(assigns[2], BlockAssign { size: 2.0, offset: 1.0 });
    // Lone upward line forms a zero-size block of its own.
    assert_eq!(assigns[1], BlockAssign::default());
}

#[test]
fn full_gives_flat_lines_zero_blocks() {
    let items = [(0.0, 0.0), (1.0, 1.0), (0.0, 2.0)];
    let assigns = assign_blocks(BlockHandling::Full, &items, slope_of, y_of);
    assert_eq!(assigns[0], BlockAssign::default());
    assert_eq!(assigns[2], BlockAssign::default());
}

#[test]
fn join_of_zero_blocks_is_zero() {
    assert_eq!(
        join_blocks(BlockAssign::default(), BlockAssign::default()),
        BlockAssign::default()
    );
}

#[test]
fn join_of_equal_blocks_is_identity() {
    let block = BlockAssign { size: 3.0, offset: 1.0 / 3.0 };
    let joined = join_blocks(block, block);
    assert!((joined.size - 3.0).abs() < 1e-12);
    assert!((joined.offset - 1.0 / 3.0).abs() < 1e-12);
}

#[test]
fn join_takes_widest_extent_on_each_side() {
    // Left: 2 units above, 0 below. Right: 0 above, 3 below.
    let left = BlockAssign { size: 2.0, offset: 1.0 };
    let right = BlockAssign { size: 3.0, offset: 0.0 };
    let joined = join_blocks(left, right);
    assert!((joined.size - 5.0).abs() < 1e-12);
    assert!((joined.offset - 0.4).abs() < 1e-12);
}

#[test]
fn join_with_one_sided_zero_keeps_the_other() {
    let block = BlockAssign { size: 2.0, offset: 0.5 };
    let joined = join_blocks(block, BlockAssign::default());
    assert!((joined.size - 2.0).abs() < 1e-12);
    assert!((joined.offset - 0.5).abs() < 1e-12);
}

#[test]
fn min_width_of_flat_line_is_the_stub() {
    assert_eq!(min_transition_width(0.0, 0.0), MEETING_WIDTH);
    assert_eq!(min_transition_width(0.0, 5.0), MEETING_WIDTH);
}

#[test]
fn min_width_matches_radius_formula() {
    let (dy, bs) = (2.0, 1.0);
    let dx_min2 = (2.0 * bs + 4.0 * MIN_RADIUS) * dy - dy * dy;
    let expected = dy.max(dx_min2.sqrt()) + MEETING_WIDTH;
    assert!((min_transition_width(dy, bs) - expected).abs() < 1e-12);
    // Sign of dy does not matter.
    assert!((min_transition_width(-dy, bs) - expected).abs() < 1e-12);
}

#[test]
fn min_width_is_at_least_the_drop() {
    // Huge dy makes the radius term negative; the |dy| floor takes over.
    let dy = 100.0;
    assert!((min_transition_width(dy, 0.0) - (dy + MEETING_WIDTH)).abs() < 1e-12);
}

#[test]
fn min_width_of_nan_is_zero() {
    assert_eq!(min_transition_width(f64::NAN, 1.0), 0.0);
}
