//! Quality metrics of an aligned storyline.
//!
//! The wiggle measures mirror the alignment criteria, so tests and callers can
//! compare what different criteria actually achieved on the same input.

use std::collections::BTreeMap;

use crate::foundation::math::EPS;
use crate::story::model::{AlignedStoryline, GroupKind};

#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize)]
/// Summary statistics of an aligned storyline.
pub struct StoryMetrics {
    /// Number of layers.
    pub layers: usize,
    /// Number of active groups across all layers.
    pub meetings: usize,
    /// Number of distinct characters.
    pub characters: usize,
    /// Number of nonzero wiggles (above tolerance).
    pub wiggle_count: usize,
    /// Summed absolute wiggle, `Σ|Δ|`.
    pub linear_wiggle_height: f64,
    /// Summed squared wiggle, `Σ Δ²`.
    pub quadratic_wiggle_height: f64,
    /// Vertical extent spanned by all character positions.
    pub total_height: f64,
}

/// Compute [`StoryMetrics`] for an aligned storyline.
pub fn story_metrics(story: &AlignedStoryline) -> StoryMetrics {
    let mut lines: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
    let mut meetings = 0;
    for layer in &story.layers {
        for group in &layer.groups {
            if group.kind == GroupKind::Active {
                meetings += 1;
            }
            for (c, y) in group.member_positions() {
                lines.entry(c).or_default().push(y);
            }
        }
    }

    let mut metrics = StoryMetrics {
        layers: story.layers.len(),
        meetings,
        characters: lines.len(),
        ..StoryMetrics::default()
    };

    let mut y_min = f64::INFINITY;
    let mut y_max = f64::NEG_INFINITY;
    for ys in lines.values() {
        for &y in ys {
            y_min = y_min.min(y);
            y_max = y_max.max(y);
        }
        for pair in ys.windows(2) {
            let wiggle = (pair[1] - pair[0]).abs();
            if wiggle > EPS {
                metrics.wiggle_count += 1;
            }
            metrics.linear_wiggle_height += wiggle;
            metrics.quadratic_wiggle_height += wiggle * wiggle;
        }
    }
    if y_max > y_min {
        metrics.total_height = y_max - y_min;
    }
    metrics
}
