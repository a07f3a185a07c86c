use wavyte_path::{Node, SmartPath, SmartPathStore};

fn arch(lift: f64) -> SmartPath {
    SmartPath::new(vec![
        Node::normal((0.0, 0.0), (0.0, 0.0), (0.0, lift)).linked(None, Some(1)),
        Node::normal((100.0, lift), (100.0, 0.0), (100.0, 0.0)).linked(Some(0), Some(2)),
        Node::new_move().linked(Some(1), None),
    ])
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let mut store = SmartPathStore::new();
    let start = store.insert(arch(20.0));
    let end = store.insert(arch(80.0));
    store.link(start, end)?;

    // The end keyframe gets an extra vertex the start keyframe only carries as a point.
    let apex = store.insert_normal_node_after(end, 0, 0.5)?;
    tracing::info!(apex, "inserted apex vertex");

    let frames = 6;
    for i in 0..=frames {
        let w = f64::from(i) / f64::from(frames);
        let outline = store.interpolate_with_next(start, w)?;
        println!("{w:.2} {}", outline.to_svg());
    }
    Ok(())
}
