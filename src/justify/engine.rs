//! Justification: turn aligned vertical positions into drawable fragments.
//!
//! Per layer transition, character lines are bundled into same-direction
//! blocks, block pairs are joined across the boundary, and each line becomes
//! one S-curve fragment. Layer widths come from the bundle geometry.

use kurbo::Point;

use crate::config::{JustifyConfig, LayerStyle};
use crate::drawing::frag::{CharState, DrawingFrag, SLine};
use crate::foundation::math::Slope;
use crate::justify::blocks::{BlockAssign, assign_blocks, join_blocks, min_transition_width};
use crate::justify::{MEETING_WIDTH, MIN_LAYER_WIDTH};
use crate::story::model::{AlignedLayer, AlignedStoryline, GroupKind};

#[derive(Clone, Debug)]
struct FlatPoint {
    char_id: String,
    in_meeting: bool,
    y: f64,
}

#[derive(Clone, Debug)]
enum Placed {
    Init {
        char_id: String,
        in_meeting: bool,
        y: f64,
    },
    Line {
        char_id: String,
        in_meeting: bool,
        y: f64,
        dy: f64,
        block: BlockAssign,
    },
}

/// Produce the drawing fragments for an aligned storyline.
#[tracing::instrument(skip(story), fields(layers = story.layers.len()))]
pub fn justify(story: &AlignedStoryline, cfg: &JustifyConfig) -> Vec<DrawingFrag> {
    let layers: Vec<Vec<FlatPoint>> = story.layers.iter().map(flatten_layer).collect();

    let mut placed: Vec<Vec<Placed>> = Vec::with_capacity(layers.len());
    if let Some(first) = layers.first() {
        placed.push(
            first
                .iter()
                .map(|p| Placed::Init {
                    char_id: p.char_id.clone(),
                    in_meeting: p.in_meeting,
                    y: p.y,
                })
                .collect(),
        );
    }
    for window in layers.windows(2) {
        placed.push(place_transition(&window[0], &window[1], cfg));
    }

    match cfg.layer_style {
        LayerStyle::Uniform => {
            let width = placed
                .iter()
                .skip(1)
                .flat_map(|layer| layer.iter().map(placed_width))
                .fold(MIN_LAYER_WIDTH, f64::max);
            emit_frags(story, &placed, |_| width)
        }
        LayerStyle::Condensed => emit_frags(story, &placed, |layer| {
            layer
                .iter()
                .map(placed_width)
                .fold(MIN_LAYER_WIDTH, f64::max)
        }),
    }
}

fn flatten_layer(layer: &AlignedLayer) -> Vec<FlatPoint> {
    layer
        .groups
        .iter()
        .flat_map(|group| {
            let in_meeting = group.kind == GroupKind::Active;
            group.member_positions().map(move |(c, y)| FlatPoint {
                char_id: c.to_string(),
                in_meeting,
                y,
            })
        })
        .collect()
}

/// Bundle and join the blocks of one layer transition.
fn place_transition(left: &[FlatPoint], right: &[FlatPoint], cfg: &JustifyConfig) -> Vec<Placed> {
    let left_y = |c: &str| left.iter().find(|p| p.char_id == c).map(|p| p.y);
    let right_y = |c: &str| right.iter().find(|p| p.char_id == c).map(|p| p.y);

    // Slope of a left item is driven by where its line goes on the right side;
    // lines with no counterpart count as flat.
    let left_blocks = assign_blocks(
        cfg.block_handling,
        left,
        |p| match right_y(&p.char_id) {
            Some(yr) => Slope::of(yr - p.y),
            None => Slope::Flat,
        },
        |p| p.y,
    );
    let right_blocks = assign_blocks(
        cfg.block_handling,
        right,
        |p| match left_y(&p.char_id) {
            Some(yl) => Slope::of(p.y - yl),
            None => Slope::Flat,
        },
        |p| p.y,
    );

    right
        .iter()
        .zip(&right_blocks)
        .map(|(p, rb)| match left_y(&p.char_id) {
            None => Placed::Init {
                char_id: p.char_id.clone(),
                in_meeting: p.in_meeting,
                y: p.y,
            },
            Some(yl) => {
                let lb = left
                    .iter()
                    .position(|l| l.char_id == p.char_id)
                    .map(|k| left_blocks[k])
                    .unwrap_or_default();
                Placed::Line {
                    char_id: p.char_id.clone(),
                    in_meeting: p.in_meeting,
                    y: yl,
                    dy: p.y - yl,
                    block: join_blocks(lb, *rb),
                }
            }
        })
        .collect()
}

fn placed_width(p: &Placed) -> f64 {
    match p {
        Placed::Init { .. } => MEETING_WIDTH,
        Placed::Line { dy, block, .. } => min_transition_width(*dy, block.size),
    }
}

/// S-curve for one transition, handling the degenerate zero-width case.
pub(crate) fn s_curve(dx: f64, dy: f64, block: BlockAssign) -> SLine {
    if dx == 0.0 {
        if dy != 0.0 {
            tracing::warn!(dy, "zero-width transition, emitting empty segment");
        }
        return SLine::straight(0.0);
    }
    SLine::from_block(dx, dy, block.size, block.offset)
}

fn emit_frags(
    story: &AlignedStoryline,
    placed: &[Vec<Placed>],
    width_of: impl Fn(&[Placed]) -> f64,
) -> Vec<DrawingFrag> {
    let mut frags = Vec::new();
    let mut x = 0.0;
    for (i, (layer, story_layer)) in placed.iter().zip(&story.layers).enumerate() {
        let width = width_of(layer);
        for item in layer {
            frags.push(match item {
                Placed::Init {
                    char_id,
                    in_meeting,
                    y,
                } => DrawingFrag::CharInit {
                    character: CharState {
                        id: char_id.clone(),
                        in_meeting: *in_meeting,
                    },
                    pos: Point::new(x + width - MEETING_WIDTH, *y),
                    dx: MEETING_WIDTH,
                },
                Placed::Line {
                    char_id,
                    in_meeting,
                    y,
                    dy,
                    block,
                } => DrawingFrag::CharLine {
                    character: CharState {
                        id: char_id.clone(),
                        in_meeting: *in_meeting,
                    },
                    pos: Point::new(x, *y),
                    dx: width,
                    s_line: s_curve(width - MEETING_WIDTH, *dy, *block),
                },
            });
        }
        for group in &story_layer.groups {
            if group.kind == GroupKind::Active {
                frags.push(DrawingFrag::Meeting {
                    pos: Point::new(x + width - MEETING_WIDTH, group.at_y),
                    dx: MEETING_WIDTH,
                    dy: group.size() as f64 - 1.0,
                    layer: i,
                    top_char: group.characters[0].clone(),
                });
            }
        }
        x += width;
    }
    frags
}

#[cfg(test)]
#[path = "../../tests/unit/justify/engine.rs"]
mod tests;
