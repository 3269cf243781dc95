//! Refined justification: per-transition LP for stricter crossing avoidance.
//!
//! Instead of deriving curvature from block bundles, each layer transition
//! poses a small LP that jointly solves for one shared horizontal extent and
//! all characters' arc radii. Related adjacent lines (vertically overlapping,
//! non-crossing, co-oriented) keep a minimum separation between their
//! matching-side radii, and the radius imbalance of every curve is penalized
//! so the result stays visually round.

use std::collections::BTreeMap;

use kurbo::Point;

use crate::algebra::term::{Constraint, constant, equal, greater_or_equal, less_or_equal, variable};
use crate::config::LayerStyle;
use crate::drawing::frag::{CharState, DrawingFrag, SLine};
use crate::foundation::error::{PlotlineError, PlotlineResult};
use crate::foundation::math::EPS;
use crate::justify::{MEETING_WIDTH, MIN_LAYER_WIDTH, MIN_RADIUS};
use crate::solver::highs::Solver;
use crate::solver::model::{LpModel, SolveStatus, VarBounds};
use crate::story::model::{AlignedLayer, AlignedStoryline, GroupKind};

#[derive(Clone, Debug)]
struct ItemState {
    char_id: String,
    yl: Option<f64>,
    yr: Option<f64>,
    // Minimum radius separation towards another item, per side: (gap, item).
    left_gap: Option<(f64, usize)>,
    right_gap: Option<(f64, usize)>,
}

impl ItemState {
    fn dy(&self) -> f64 {
        match (self.yl, self.yr) {
            (Some(yl), Some(yr)) => yr - yl,
            _ => 0.0,
        }
    }

    /// Endpoints of a line that actually moves across the transition.
    fn moving(&self) -> Option<(f64, f64)> {
        match (self.yl, self.yr) {
            (Some(yl), Some(yr)) if (yl - yr).abs() > EPS => Some((yl, yr)),
            _ => None,
        }
    }
}

struct PreparedLayer {
    items: Vec<ItemState>,
    dx: f64,
    s_lines: BTreeMap<String, SLine>,
}

/// Produce drawing fragments with LP-justified transitions.
#[tracing::instrument(skip(story, solver), fields(layers = story.layers.len()))]
pub fn justify_lp(
    story: &AlignedStoryline,
    layer_style: LayerStyle,
    solver: &dyn Solver,
) -> PlotlineResult<Vec<DrawingFrag>> {
    let empty = AlignedLayer { groups: Vec::new() };
    let mut prepared = Vec::with_capacity(story.layers.len());
    let mut prev = &empty;
    for layer in &story.layers {
        prepared.push(prepare_transition(prev, layer, solver)?);
        prev = layer;
    }

    let mut frags = Vec::new();
    let mut x = 0.0;
    match layer_style {
        LayerStyle::Condensed => {
            for (i, (pl, layer)) in prepared.iter().zip(&story.layers).enumerate() {
                emit_layer_frags(&mut frags, x, pl.dx, layer, i, pl);
                x += pl.dx;
            }
        }
        LayerStyle::Uniform => {
            let width = prepared.iter().map(|pl| pl.dx).fold(MIN_LAYER_WIDTH, f64::max);
            for (i, (pl, layer)) in prepared.iter().zip(&story.layers).enumerate() {
                emit_layer_frags(&mut frags, x, width, layer, i, pl);
                x += width;
            }
        }
    }
    Ok(frags)
}

fn prepare_transition(
    left: &AlignedLayer,
    right: &AlignedLayer,
    solver: &dyn Solver,
) -> PlotlineResult<PreparedLayer> {
    let items = make_items(left, right);

    if items.iter().all(|it| it.moving().is_none()) {
        // Nothing bends here; a fixed minimum width suffices.
        return Ok(PreparedLayer {
            items,
            dx: MIN_LAYER_WIDTH,
            s_lines: BTreeMap::new(),
        });
    }

    let model = build_transition_lp(&items);
    let solution = solver.solve(&model)?;
    if solution.status != SolveStatus::Optimal {
        return Err(PlotlineError::solver(format!(
            "could not justify transition: solver status {:?}",
            solution.status
        )));
    }

    let dx = solution.value("dx2")?.max(0.0).sqrt();
    let mut s_lines = BTreeMap::new();
    for (k, item) in items.iter().enumerate() {
        if item.moving().is_some() {
            s_lines.insert(
                item.char_id.clone(),
                SLine {
                    dx,
                    dy: item.dy(),
                    r1: solution.value(&format!("r{k}a"))?,
                    r2: solution.value(&format!("r{k}b"))?,
                },
            );
        }
    }
    Ok(PreparedLayer { items, dx, s_lines })
}

/// Two lines are related when they do not cross, their vertical intervals
/// overlap, and they run in the same direction.
fn related_pair(ya: (f64, f64), yb: (f64, f64)) -> bool {
    let ((yla, yra), (ylb, yrb)) = (ya, yb);
    (yla < ylb) == (yra < yrb)
        && yla.min(yra) <= ylb.max(yrb) + EPS
        && yla.max(yra) + EPS >= ylb.min(yrb)
        && (yla < yra) == (ylb < yrb)
}

fn make_items(left: &AlignedLayer, right: &AlignedLayer) -> Vec<ItemState> {
    fn index_of(items: &mut Vec<ItemState>, id: &str) -> usize {
        if let Some(k) = items.iter().position(|it| it.char_id == id) {
            k
        } else {
            items.push(ItemState {
                char_id: id.to_string(),
                yl: None,
                yr: None,
                left_gap: None,
                right_gap: None,
            });
            items.len() - 1
        }
    }

    let mut items: Vec<ItemState> = Vec::new();

    // Layer order on each side, as item indices.
    let mut cl = Vec::new();
    for group in &left.groups {
        for (c, y) in group.member_positions() {
            let k = index_of(&mut items, c);
            items[k].yl = Some(y);
            cl.push(k);
        }
    }
    let mut cr = Vec::new();
    for group in &right.groups {
        for (c, y) in group.member_positions() {
            let k = index_of(&mut items, c);
            items[k].yr = Some(y);
            cr.push(k);
        }
    }

    // Left side: an upward line looks below itself for the nearest related
    // line, a downward line above. The gap is the endpoint distance on this
    // side.
    for (i, &a) in cl.iter().enumerate() {
        let Some((yla, yra)) = items[a].moving() else {
            continue;
        };
        if yla > yra {
            for &b in &cl[i + 1..] {
                if let Some((ylb, yrb)) = items[b].moving()
                    && related_pair((yla, yra), (ylb, yrb))
                {
                    items[a].left_gap = Some((ylb - yla, b));
                    break;
                }
            }
        }
        if yla < yra {
            for &b in cl[..i].iter().rev() {
                if let Some((ylb, yrb)) = items[b].moving()
                    && related_pair((yla, yra), (ylb, yrb))
                {
                    items[a].left_gap = Some((yla - ylb, b));
                    break;
                }
            }
        }
    }
    // Right side, mirrored.
    for (i, &a) in cr.iter().enumerate() {
        let Some((yla, yra)) = items[a].moving() else {
            continue;
        };
        if yla > yra {
            for &b in cr[..i].iter().rev() {
                if let Some((ylb, yrb)) = items[b].moving()
                    && related_pair((yla, yra), (ylb, yrb))
                {
                    items[a].right_gap = Some((yra - yrb, b));
                    break;
                }
            }
        }
        if yla < yra {
            for &b in &cr[i + 1..] {
                if let Some((ylb, yrb)) = items[b].moving()
                    && related_pair((yla, yra), (ylb, yrb))
                {
                    items[a].right_gap = Some((yrb - yra, b));
                    break;
                }
            }
        }
    }

    // Narrowing or widening gaps mark the same pair from both directions with
    // different sizes; the smaller-gap interpretation wins.
    for a in 0..items.len() {
        if let Some((size_l, b)) = items[a].left_gap
            && let Some((size_r, maybe_a)) = items[b].right_gap
            && maybe_a == a
        {
            if size_l > size_r {
                items[a].left_gap = None;
            }
            if size_l < size_r {
                items[b].right_gap = None;
            }
        }
    }

    items
}

fn build_transition_lp(items: &[ItemState]) -> LpModel {
    let mut constraints: Vec<Constraint> = Vec::new();
    let mut bounds: Vec<VarBounds> = Vec::new();
    let dx2 = variable("dx2");

    // (XM) the shared width covers the steepest line.
    let dy2_floor = items
        .iter()
        .map(|it| it.dy() * it.dy())
        .fold(MIN_LAYER_WIDTH * MIN_LAYER_WIDTH, f64::max);
    constraints.push(greater_or_equal(dx2.clone(), constant(dy2_floor)));

    let mut objective = dx2.clone();
    for (k, item) in items.iter().enumerate() {
        if item.moving().is_none() {
            continue;
        }
        let dy = item.dy().abs();
        let (ra, rb) = (variable(format!("r{k}a")), variable(format!("r{k}b")));
        // (R1) width identity: dx² = 2|dy|·(r1 + r2) − dy².
        constraints.push(equal(
            dx2.clone(),
            ra.add(&rb).scale(2.0 * dy).sub(&constant(dy * dy)),
        ));
        // (Z) |r1 − r2| <= z, penalized in the objective.
        let z = variable(format!("z{k}"));
        constraints.push(less_or_equal(ra.sub(&rb), z.clone()));
        constraints.push(less_or_equal(rb.sub(&ra), z.clone()));
        objective = objective.add(&z.scale(0.5));
        bounds.push(VarBounds::at_least(format!("r{k}a"), MIN_RADIUS));
        bounds.push(VarBounds::at_least(format!("r{k}b"), MIN_RADIUS));

        // (D) related neighbors keep their radii separated by the endpoint gap.
        if let Some((gap, other)) = item.left_gap {
            constraints.push(less_or_equal(
                variable(format!("r{k}a")),
                variable(format!("r{other}a")).sub(&constant(gap)),
            ));
        }
        if let Some((gap, other)) = item.right_gap {
            constraints.push(less_or_equal(
                variable(format!("r{k}b")),
                variable(format!("r{other}b")).sub(&constant(gap)),
            ));
        }
    }

    let mut model = LpModel::minimize(objective, constraints);
    model.bounds = bounds;
    model
}

fn emit_layer_frags(
    frags: &mut Vec<DrawingFrag>,
    x: f64,
    dx: f64,
    layer: &AlignedLayer,
    layer_id: usize,
    pl: &PreparedLayer,
) {
    for group in &layer.groups {
        let in_meeting = group.kind == GroupKind::Active;
        for c in &group.characters {
            let Some(item) = pl.items.iter().find(|it| it.char_id == *c) else {
                continue;
            };
            match item.yl {
                None => frags.push(DrawingFrag::CharInit {
                    character: CharState {
                        id: c.clone(),
                        in_meeting,
                    },
                    pos: Point::new(x + dx - MEETING_WIDTH, item.yr.unwrap_or_default()),
                    dx: MEETING_WIDTH,
                }),
                Some(yl) => frags.push(DrawingFrag::CharLine {
                    character: CharState {
                        id: c.clone(),
                        in_meeting,
                    },
                    pos: Point::new(x, yl),
                    dx,
                    s_line: pl
                        .s_lines
                        .get(c)
                        .copied()
                        .unwrap_or_else(|| SLine::straight(dx)),
                }),
            }
        }
    }
    for group in &layer.groups {
        if group.kind == GroupKind::Active {
            frags.push(DrawingFrag::Meeting {
                pos: Point::new(x + dx - MEETING_WIDTH, group.at_y),
                dx: MEETING_WIDTH,
                dy: group.size() as f64 - 1.0,
                layer: layer_id,
                top_char: group.characters[0].clone(),
            });
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/justify/lp.rs"]
mod tests;
