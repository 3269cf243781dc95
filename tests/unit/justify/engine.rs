use super::*;
use crate::config::BlockHandling;
use crate::story::model::AlignedGroup;

fn active(members: &[&str], at_y: f64) -> AlignedGroup {
    AlignedGroup {
        kind: GroupKind::Active,
        characters: members.iter().map(|c| c.to_string()).collect(),
        at_y,
    }
}

fn inactive(members: &[&str], at_y: f64) -> AlignedGroup {
    AlignedGroup {
        kind: GroupKind::Inactive,
        characters: members.iter().map(|c| c.to_string()).collect(),
        at_y,
    }
}

fn story(layers: Vec<Vec<AlignedGroup>>) -> AlignedStoryline {
    AlignedStoryline {
        layers: layers
            .into_iter()
            .map(|groups| AlignedLayer { groups })
            .collect(),
    }
}

fn condensed() -> JustifyConfig {
    JustifyConfig {
        layer_style: LayerStyle::Condensed,
        block_handling: BlockHandling::Continuous,
    }
}

fn char_lines<'a>(frags: &'a [DrawingFrag], id: &str) -> Vec<&'a DrawingFrag> {
    frags
        .iter()
        .filter(|f| matches!(f, DrawingFrag::CharLine { character, .. } if character.id == id))
        .collect()
}

#[test]
fn single_layer_emits_inits_and_meeting() {
    let frags = justify(&story(vec![vec![active(&["a", "b"], -0.5)]]), &condensed());
    assert_eq!(frags.len(), 3);

    // Narrow layers are floored; the stub hugs the layer's right edge.
    let x0 = MIN_LAYER_WIDTH - MEETING_WIDTH;
    assert_eq!(
        frags[0],
        DrawingFrag::CharInit {
            character: CharState {
                id: "a".into(),
                in_meeting: true,
            },
            pos: Point::new(x0, -0.5),
            dx: MEETING_WIDTH,
        }
    );
    assert!(matches!(
        &frags[2],
        DrawingFrag::Meeting { pos, dy, layer: 0, top_char, .. }
            if *pos == Point::new(x0, -0.5) && *dy == 1.0 && top_char == "a"
    ));
}

#[test]
fn inactive_groups_emit_no_meeting() {
    let frags = justify(&story(vec![vec![inactive(&["a"], 0.0)]]), &condensed());
    assert_eq!(frags.len(), 1);
    assert!(matches!(&frags[0], DrawingFrag::CharInit { character, .. }
        if !character.in_meeting));
}

#[test]
fn flat_transition_emits_straight_segments() {
    let frags = justify(
        &story(vec![
            vec![active(&["a", "b"], 0.0)],
            vec![active(&["a", "b"], 0.0)],
        ]),
        &condensed(),
    );
    // 2 inits + meeting, then 2 lines + meeting.
    assert_eq!(frags.len(), 6);
    for frag in char_lines(&frags, "a").into_iter().chain(char_lines(&frags, "b")) {
        let DrawingFrag::CharLine { dx, s_line, .. } = frag else {
            unreachable!();
        };
        assert_eq!(*dx, MIN_LAYER_WIDTH);
        assert_eq!(*s_line, SLine::straight(MIN_LAYER_WIDTH - MEETING_WIDTH));
    }
}

#[test]
fn bundled_lines_share_curvature() {
    // a and b drop together by 3; they form one block of size 1.
    let frags = justify(
        &story(vec![
            vec![inactive(&["a", "b"], 0.0)],
            vec![inactive(&["a", "b"], 3.0)],
        ]),
        &condensed(),
    );
    let get = |id: &str| {
        let lines = char_lines(&frags, id);
        assert_eq!(lines.len(), 1);
        let DrawingFrag::CharLine { dx, s_line, .. } = lines[0] else {
            unreachable!();
        };
        (*dx, *s_line)
    };
    let (dx_a, s_a) = get("a");
    let (dx_b, s_b) = get("b");
    // Width from the radius formula: max(3, sqrt((2*1 + 4)*3 - 9)) + stub.
    assert!((dx_a - 3.5).abs() < 1e-12);
    assert_eq!(dx_a, dx_b);
    // d = (dy² + dx²) / (2|dy|) with dx = 3: both lines share the sum, split
    // by their position in the block.
    assert!((s_a.r1 + s_a.r2 - 3.0).abs() < 1e-12);
    assert!((s_a.r1 - 2.0).abs() < 1e-12);
    assert!((s_b.r1 - 1.0).abs() < 1e-12);
}

#[test]
fn condensed_widths_are_per_layer() {
    let layers = vec![
        vec![inactive(&["a"], 0.0), inactive(&["b"], 1.0)],
        vec![inactive(&["a"], 0.0), inactive(&["b"], 1.0)],
        vec![inactive(&["a"], 0.0), inactive(&["b"], 4.0)],
    ];
    let frags = justify(&story(layers.clone()), &condensed());
    let dxs: Vec<f64> = char_lines(&frags, "b")
        .iter()
        .map(|f| match f {
            DrawingFrag::CharLine { dx, .. } => *dx,
            _ => unreachable!(),
        })
        .collect();
    // Flat transition stays at the floor; the 3-unit drop dictates the last.
    assert_eq!(dxs, vec![MIN_LAYER_WIDTH, 3.5]);

    let uniform = justify(
        &story(layers),
        &JustifyConfig {
            layer_style: LayerStyle::Uniform,
            block_handling: BlockHandling::Continuous,
        },
    );
    let dxs: Vec<f64> = char_lines(&uniform, "b")
        .iter()
        .map(|f| match f {
            DrawingFrag::CharLine { dx, .. } => *dx,
            _ => unreachable!(),
        })
        .collect();
    assert_eq!(dxs, vec![3.5, 3.5]);
}

#[test]
fn appearing_character_gets_a_stub_mid_story() {
    let frags = justify(
        &story(vec![
            vec![inactive(&["a"], 0.0)],
            vec![inactive(&["a"], 0.0), inactive(&["c"], 2.0)],
        ]),
        &condensed(),
    );
    let inits: Vec<&str> = frags
        .iter()
        .filter_map(|f| match f {
            DrawingFrag::CharInit { character, .. } => Some(character.id.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(inits, vec!["a", "c"]);
    assert_eq!(char_lines(&frags, "c").len(), 0);
}

#[test]
fn departed_character_emits_nothing_downstream() {
    let frags = justify(
        &story(vec![
            vec![inactive(&["a"], 0.0), inactive(&["b"], 2.0)],
            vec![inactive(&["a"], 0.0)],
        ]),
        &condensed(),
    );
    assert_eq!(char_lines(&frags, "b").len(), 0);
    assert_eq!(char_lines(&frags, "a").len(), 1);
}

#[test]
fn zero_width_curve_degenerates_to_empty_segment() {
    let block = BlockAssign {
        size: 2.0,
        offset: 0.5,
    };
    assert_eq!(s_curve(0.0, 5.0, block), SLine::straight(0.0));
    assert_eq!(s_curve(1.5, 0.0, block), SLine::straight(1.5));
}

#[test]
fn empty_storyline_yields_no_fragments() {
    let frags = justify(&story(vec![]), &condensed());
    assert!(frags.is_empty());
}
