//! Alignment: assign every group a vertical anchor.
//!
//! Within-layer ordering constraints keep groups disjoint with a configurable
//! gap; across layers, each character contributes one "wiggle" term per pair of
//! consecutive appearances. The chosen criterion turns those terms into an LP
//! or QP objective, except `strict-center` which is closed form and never
//! touches the solver.

use std::collections::{BTreeMap, BTreeSet};

use crate::algebra::term::{
    Constraint, LinTerm, Term, constant, equal, greater_or_equal, less_or_equal, variable,
};
use crate::config::{AlignConfig, AlignCriterion};
use crate::foundation::error::{PlotlineError, PlotlineResult};
use crate::solver::highs::Solver;
use crate::solver::model::{LpModel, SolveStatus, VarBounds};
use crate::story::model::{AlignedGroup, AlignedLayer, AlignedStoryline, Storyline};

/// Anchor variable name for group `j` of layer `i`.
fn anchor_var(layer: usize, group: usize) -> String {
    format!("l{layer}g{group}")
}

/// Assign every group of `story` a vertical anchor under `cfg`.
///
/// Any non-optimal solver status fails the whole call; no partial alignment is
/// produced. Structural problems abort before the solver is invoked.
#[tracing::instrument(skip(story, solver), fields(criterion = ?cfg.criterion))]
pub fn align(
    story: &Storyline,
    cfg: &AlignConfig,
    solver: &dyn Solver,
) -> PlotlineResult<AlignedStoryline> {
    cfg.validate()?;
    story.validate()?;

    if cfg.criterion == AlignCriterion::StrictCenter {
        return Ok(strict_center(story, cfg.gap_ratio));
    }

    let model = build_model(story, cfg)?;
    let solution = solver.solve(&model)?;
    if solution.status != SolveStatus::Optimal {
        return Err(PlotlineError::solver(format!(
            "could not align storyline: solver status {:?}",
            solution.status
        )));
    }

    let layers = story
        .layers
        .iter()
        .enumerate()
        .map(|(i, layer)| {
            let groups = layer
                .groups
                .iter()
                .enumerate()
                .map(|(j, group)| {
                    Ok(AlignedGroup {
                        kind: group.kind,
                        characters: group.characters.clone(),
                        at_y: solution.value(&anchor_var(i, j))?,
                    })
                })
                .collect::<PlotlineResult<Vec<_>>>()?;
            Ok(AlignedLayer { groups })
        })
        .collect::<PlotlineResult<Vec<_>>>()?;
    Ok(AlignedStoryline { layers })
}

/// Closed-form alignment: stack each layer contiguously with `gap_ratio` gaps
/// and shift it so its vertical center sits at zero. Layers are independent.
fn strict_center(story: &Storyline, gap_ratio: f64) -> AlignedStoryline {
    let layers = story
        .layers
        .iter()
        .map(|layer| {
            let mut starts = Vec::with_capacity(layer.groups.len());
            let mut cursor = 0.0;
            for group in &layer.groups {
                starts.push(cursor);
                cursor += group.size() as f64 + gap_ratio;
            }
            // Position of the last member across the whole layer.
            let extent = (cursor - gap_ratio - 1.0).max(0.0);
            let shift = -extent / 2.0;
            let groups = layer
                .groups
                .iter()
                .zip(starts)
                .map(|(group, start)| AlignedGroup {
                    kind: group.kind,
                    characters: group.characters.clone(),
                    at_y: start + shift,
                })
                .collect();
            AlignedLayer { groups }
        })
        .collect();
    AlignedStoryline { layers }
}

/// Per-layer map from character to its implied position term `anchor + offset`.
fn layer_positions(story: &Storyline, layer: usize) -> BTreeMap<&str, LinTerm> {
    let mut positions = BTreeMap::new();
    for (j, group) in story.layers[layer].groups.iter().enumerate() {
        for (offset, c) in group.characters.iter().enumerate() {
            positions.insert(
                c.as_str(),
                variable(anchor_var(layer, j)).add(&constant(offset as f64)),
            );
        }
    }
    positions
}

fn build_model(story: &Storyline, cfg: &AlignConfig) -> PlotlineResult<LpModel> {
    let mut constraints: Vec<Constraint> = Vec::new();
    let mut bounds: Vec<VarBounds> = Vec::new();
    let mut extra_vars: Vec<String> = Vec::new();

    // Ordering: consecutive groups in a layer never overlap and keep the gap.
    for (i, layer) in story.layers.iter().enumerate() {
        for (j, window) in layer.groups.windows(2).enumerate() {
            let spacing = window[0].size() as f64 - 1.0 + cfg.gap_ratio;
            constraints.push(greater_or_equal(
                variable(anchor_var(i, j + 1)),
                variable(anchor_var(i, j)).add(&constant(spacing)),
            ));
        }
        for j in 0..layer.groups.len() {
            extra_vars.push(anchor_var(i, j));
        }
    }

    // One wiggle term per character appearance in two consecutive layers.
    let mut wiggles: Vec<LinTerm> = Vec::new();
    for i in 1..story.layers.len() {
        let prev = layer_positions(story, i - 1);
        let next = layer_positions(story, i);
        for (c, next_pos) in &next {
            if let Some(prev_pos) = prev.get(c) {
                wiggles.push(next_pos.sub(prev_pos));
            }
        }
    }

    if cfg.align_continued_meetings {
        continued_meeting_constraints(story, &mut constraints);
    }

    let objective: Term = match cfg.criterion {
        AlignCriterion::StrictCenter => {
            return Err(PlotlineError::model(
                "strict-center is closed form and has no solver model",
            ));
        }
        AlignCriterion::SumOfHeights => {
            // min Σ z with Δ <= z and -Δ <= z.
            let mut objective = constant(0.0);
            for (k, delta) in wiggles.iter().enumerate() {
                let z = format!("z{k}");
                constraints.push(less_or_equal(delta.clone(), variable(&z)));
                constraints.push(less_or_equal(delta.neg(), variable(&z)));
                objective = objective.add(&variable(&z));
            }
            objective.into()
        }
        AlignCriterion::LeastSquares => {
            // min Σ Δ² as a quadratic objective.
            let mut objective: Term = constant(0.0).into();
            for delta in &wiggles {
                objective = objective.add(&delta.squared().into());
            }
            objective
        }
        AlignCriterion::WiggleCount => {
            // Big-M relaxation of counting nonzero wiggles. M bounds any anchor
            // value; the ymax/M regularizer breaks the all-zero degeneracy.
            // A heuristic, not an exact cardinality minimizer.
            let total_size: usize = story
                .layers
                .iter()
                .flat_map(|l| l.groups.iter().map(|g| g.size()))
                .sum();
            let big_m = (total_size as f64).max(1.0);
            let mut objective = variable("ymax").scale(1.0 / big_m);
            for (k, delta) in wiggles.iter().enumerate() {
                let z = format!("z{k}");
                constraints.push(less_or_equal(delta.clone(), variable(&z).scale(big_m)));
                constraints.push(less_or_equal(delta.neg(), variable(&z).scale(big_m)));
                bounds.push(VarBounds::between(&z, 0.0, 1.0));
                objective = objective.add(&variable(&z));
            }
            for (i, layer) in story.layers.iter().enumerate() {
                for j in 0..layer.groups.len() {
                    constraints.push(less_or_equal(variable(anchor_var(i, j)), variable("ymax")));
                }
            }
            objective.into()
        }
    };

    let mut model = LpModel::minimize(objective, constraints);
    model.bounds = bounds;
    model.extra_vars = extra_vars;
    Ok(model)
}

/// Pin a group that continues the same meeting to its predecessor's anchor.
///
/// A group continues meeting `P` when every member's most recent active group
/// is `P` and both groups have identical membership and size. Duplicate marks
/// for the same group pair collapse to a single equality constraint.
fn continued_meeting_constraints(story: &Storyline, constraints: &mut Vec<Constraint>) {
    let mut last_active: BTreeMap<&str, (usize, usize)> = BTreeMap::new();
    let mut pinned: BTreeSet<((usize, usize), (usize, usize))> = BTreeSet::new();

    for (i, layer) in story.layers.iter().enumerate() {
        for (j, group) in layer.groups.iter().enumerate() {
            if group.kind != crate::story::model::GroupKind::Active {
                continue;
            }
            let mut predecessors = group
                .characters
                .iter()
                .map(|c| last_active.get(c.as_str()).copied());
            if let Some(Some(first)) = predecessors.next()
                && predecessors.all(|p| p == Some(first))
            {
                let (pi, pj) = first;
                let pred = &story.layers[pi].groups[pj];
                let same_members = pred.size() == group.size()
                    && pred.characters.iter().collect::<BTreeSet<_>>()
                        == group.characters.iter().collect::<BTreeSet<_>>();
                if same_members && pinned.insert(((pi, pj), (i, j))) {
                    constraints.push(equal(
                        variable(anchor_var(i, j)),
                        variable(anchor_var(pi, pj)),
                    ));
                }
            }
        }
        for (j, group) in layer.groups.iter().enumerate() {
            if group.kind == crate::story::model::GroupKind::Active {
                for c in &group.characters {
                    last_active.insert(c.as_str(), (i, j));
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/align/engine.rs"]
mod tests;
