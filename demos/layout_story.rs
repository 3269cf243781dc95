use plotline::{
    Group, HighsSolver, Layer, LayoutConfig, Storyline, drawing_bounds, is_highs_on_path,
    layout_with_alignment, story_metrics,
};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    if !is_highs_on_path() {
        eprintln!("this demo needs the `highs` binary on PATH");
        return Ok(());
    }

    let story = Storyline::new(vec![
        Layer {
            groups: vec![
                Group::active(["arthur", "ford"]),
                Group::inactive(["trillian", "zaphod"]),
            ],
        },
        Layer {
            groups: vec![
                Group::inactive(["arthur"]),
                Group::active(["ford", "zaphod"]),
                Group::inactive(["trillian"]),
            ],
        },
        Layer {
            groups: vec![Group::active(["arthur", "ford", "zaphod", "trillian"])],
        },
    ]);

    let (aligned, frags) =
        layout_with_alignment(&story, &LayoutConfig::default(), &HighsSolver::default())?;

    let m = story_metrics(&aligned);
    println!(
        "{} layers, {} meetings, {} characters, wiggle height {:.2}",
        m.layers, m.meetings, m.characters, m.linear_wiggle_height
    );
    println!("{} fragments, bounds {:?}", frags.len(), drawing_bounds(&frags));
    for frag in &frags {
        println!("{}", serde_json::to_string(frag)?);
    }

    Ok(())
}
