//! Align-then-justify convenience entry point.

use crate::config::LayoutConfig;
use crate::drawing::frag::DrawingFrag;
use crate::foundation::error::PlotlineResult;
use crate::solver::highs::Solver;
use crate::story::model::{AlignedStoryline, Storyline};

/// Run the full layout pipeline on a storyline.
///
/// Alignment completes first (the justification stage reads every group's
/// anchor), then justification emits the fragment list. Both stages operate on
/// a fresh model and variable namespace, so repeated calls do not interact;
/// an embedding application that re-runs layout while an earlier solve is
/// still pending is responsible for discarding the stale result.
#[tracing::instrument(skip(story, solver))]
pub fn layout(
    story: &Storyline,
    cfg: &LayoutConfig,
    solver: &dyn Solver,
) -> PlotlineResult<Vec<DrawingFrag>> {
    let aligned = crate::align::engine::align(story, &cfg.align(), solver)?;
    Ok(crate::justify::engine::justify(&aligned, &cfg.justify()))
}

/// Like [`layout`], also returning the aligned storyline for inspection
/// (metrics, debugging overlays).
pub fn layout_with_alignment(
    story: &Storyline,
    cfg: &LayoutConfig,
    solver: &dyn Solver,
) -> PlotlineResult<(AlignedStoryline, Vec<DrawingFrag>)> {
    let aligned = crate::align::engine::align(story, &cfg.align(), solver)?;
    let frags = crate::justify::engine::justify(&aligned, &cfg.justify());
    Ok((aligned, frags))
}
