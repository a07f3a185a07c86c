use crate::{
    foundation::core::{BezPath, cubic_between},
    foundation::error::{PathError, PathResult},
    foundation::math::{map_t_to_fragment, split_cubic},
    path::node::{Node, NodeType},
    path::segment::sort_nodes_by_connection,
};

/// Build the renderable outline of a node list.
///
/// Each segment becomes one sub-path: `MoveTo` at its first normal node, then one
/// `CurveTo` per following normal node. Dissolved nodes subdivide the cubic they sit on
/// without bending it, so they show up as extra `CurveTo` boundaries. Dummy nodes are
/// skipped. Closed segments end with a closing cubic and `ClosePath`.
pub fn nodes_to_outline(nodes: &[Node]) -> PathResult<BezPath> {
    let mut out = BezPath::new();
    for segment in sort_nodes_by_connection(nodes)? {
        append_segment(&segment, &mut out)?;
    }
    Ok(out)
}

fn append_segment(segment: &[Node], out: &mut BezPath) -> PathResult<()> {
    let closed = segment.first().is_some_and(Node::has_prev);
    for (i, node) in segment.iter().enumerate() {
        if node.is_move() && (closed || i + 1 != segment.len()) {
            return Err(PathError::consistency(format!(
                "move node at position {i} of a {}-node segment is not its last node",
                segment.len()
            )));
        }
    }

    // Closed segments start at their first vertex so dissolved nodes ahead of it
    // land on the closing cubic.
    let Some(start) = segment.iter().position(Node::is_normal) else {
        return Ok(());
    };
    let order = (start..segment.len()).chain(if closed { 0..start } else { 0..0 });

    let mut first: Option<&Node> = None;
    let mut prev_normal: Option<&Node> = None;
    let mut dissolved_ts: Vec<f64> = Vec::new();

    for i in order {
        let node = &segment[i];
        match node.kind() {
            NodeType::Dummy | NodeType::Move => {}
            NodeType::Dissolved => {
                if prev_normal.is_some() {
                    dissolved_ts.push(node.t);
                }
            }
            NodeType::Normal => {
                match prev_normal {
                    None => {
                        tracing::trace!(x = node.p1.x, y = node.p1.y, "move to");
                        out.move_to(node.p1);
                        first = Some(node);
                    }
                    Some(prev) => cubic_to(prev, node, &mut dissolved_ts, out),
                }
                prev_normal = Some(node);
            }
        }
    }

    if closed {
        if let (Some(prev), Some(first)) = (prev_normal, first) {
            cubic_to(prev, first, &mut dissolved_ts, out);
        }
        out.close_path();
    }
    Ok(())
}

/// Emit the cubic from `prev` to `next`, subdivided at every queued dissolved `t`.
///
/// The queued values are absolute parameters on the whole cubic, in chain order.
fn cubic_to(prev: &Node, next: &Node, dissolved_ts: &mut Vec<f64>, out: &mut BezPath) {
    let mut seg = cubic_between(prev.p1, prev.c2, next.c0, next.p1);
    let mut last_t = 0.0;
    for t in dissolved_ts.drain(..) {
        let (head, tail) = split_cubic(seg, map_t_to_fragment(last_t, 1.0, t));
        out.curve_to(head.p1, head.p2, head.p3);
        seg = tail;
        last_t = t;
    }
    tracing::trace!(x = seg.p3.x, y = seg.p3.y, "cubic to");
    out.curve_to(seg.p1, seg.p2, seg.p3);
}

#[cfg(test)]
#[path = "../../tests/unit/path/outline.rs"]
mod tests;
