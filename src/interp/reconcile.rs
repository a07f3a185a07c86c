//! Bring two keyframe node lists into the same outline structure.
//!
//! Index-aligned lists can still differ in node types and in how nodes are linked. The
//! reconciled list keeps this side's geometry but has exactly the vertices, segments
//! and closures of the reconciled neighbour, so both outlines blend element by element.

use crate::{
    foundation::core::{BezPath, Point},
    foundation::error::{PathError, PathResult},
    path::edit::{
        promote_dissolved_node_to_normal, remove_node_from_list, should_split_node,
        split_node_and_disconnect,
    },
    path::node::{Node, NodeType},
    path::outline::nodes_to_outline,
    path::segment::{dissolved_t_between, next_normal_id, prev_normal_id},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Owner {
    This,
    Neighbour,
}

/// Reconcile `this` against `neighbour` and return this side's adjusted nodes.
///
/// `reconcile(a, b)` and `reconcile(b, a)` always produce outlines of the same shape.
#[tracing::instrument(skip_all, fields(nodes = this.len()))]
pub fn reconcile(this: &[Node], neighbour: &[Node]) -> PathResult<Vec<Node>> {
    if this.len() != neighbour.len() {
        return Err(PathError::consistency(format!(
            "node counts differ: {} vs {}",
            this.len(),
            neighbour.len()
        )));
    }
    let mut mine = this.to_vec();
    let mut theirs = neighbour.to_vec();

    // Indices without a vertex on either side carry no geometry.
    for i in (0..mine.len()).rev() {
        if !mine[i].is_normal() && !theirs[i].is_normal() {
            remove_node_from_list(&mut mine, i)?;
            remove_node_from_list(&mut theirs, i)?;
        }
    }
    // A `Move` left here faces a vertex. It hangs off its segment's open end like a
    // dissolved node and collapses onto the last vertex.
    for node in mine.iter_mut().chain(theirs.iter_mut()) {
        if node.is_move() {
            node.t = 1.0;
            node.set_kind(NodeType::Dissolved);
        }
    }

    let split: Vec<bool> = mine
        .iter()
        .zip(&theirs)
        .map(|(a, b)| should_split_node(a, b) || should_split_node(b, a))
        .collect();

    let their_anchors: Vec<Point> = theirs.iter().map(|n| n.p1).collect();
    let my_anchors: Vec<Point> = mine.iter().map(|n| n.p1).collect();
    materialise(&mut mine, &their_anchors)?;
    materialise(&mut theirs, &my_anchors)?;

    for i in (0..split.len()).rev() {
        if split[i] {
            split_node_and_disconnect(&mut mine, i)?;
            split_node_and_disconnect(&mut theirs, i)?;
        }
    }

    sever_unshared_links(&mut mine, &mut theirs);
    tracing::debug!(nodes = mine.len(), "reconciled");
    Ok(mine)
}

/// Outline of `this` reconciled against `neighbour`.
pub fn reconciled_outline(this: &[Node], neighbour: &[Node]) -> PathResult<BezPath> {
    nodes_to_outline(&reconcile(this, neighbour)?)
}

/// Turn every non-vertex node left after the drop pass into a vertex.
///
/// Nodes enclosed by vertices are promoted on their curve. Nodes hanging off an open
/// end collapse onto the nearest vertex, and isolated ones onto the counterpart anchor.
fn materialise(nodes: &mut [Node], counterpart: &[Point]) -> PathResult<()> {
    for id in 0..nodes.len() {
        if nodes[id].is_dummy() {
            let t = dissolved_t_between(nodes, id);
            let node = &mut nodes[id];
            node.t = t;
            node.set_kind(NodeType::Dissolved);
        }
    }
    for id in 0..nodes.len() {
        if !nodes[id].is_dissolved() {
            continue;
        }
        match (prev_normal_id(nodes, id), next_normal_id(nodes, id)) {
            (Some(_), Some(_)) => promote_dissolved_node_to_normal(nodes, id)?,
            (Some(p), None) => {
                nodes[p].c2 = nodes[p].p1;
                let anchor = nodes[p].p1;
                nodes[id].make_corner_at(anchor);
            }
            (None, Some(n)) => {
                nodes[n].c0 = nodes[n].p1;
                let anchor = nodes[n].p1;
                nodes[id].make_corner_at(anchor);
            }
            (None, None) => nodes[id].make_corner_at(counterpart[id]),
        }
    }
    Ok(())
}

/// Cut every link present on one side only and re-emit its cubic as a standalone
/// two-node segment, degenerate on the side that lacked it.
fn sever_unshared_links(mine: &mut Vec<Node>, theirs: &mut Vec<Node>) {
    let mut unshared: Vec<(usize, usize, Owner)> = Vec::new();
    for i in 0..mine.len() {
        if let Some(j) = mine[i].next.filter(|&j| theirs[i].next != Some(j)) {
            unshared.push((i, j, Owner::This));
        }
        if let Some(j) = theirs[i].next.filter(|&j| mine[i].next != Some(j)) {
            unshared.push((i, j, Owner::Neighbour));
        }
    }
    unshared.sort_by_key(|&(i, j, _)| (i, j));

    for (i, j, owner) in unshared {
        let (owning, other): (&mut Vec<Node>, &mut Vec<Node>) = match owner {
            Owner::This => (&mut *mine, &mut *theirs),
            Owner::Neighbour => (&mut *theirs, &mut *mine),
        };
        let (from, to) = (owning[i].clone(), owning[j].clone());
        owning[i].next = None;
        if owning[j].prev == Some(i) {
            owning[j].prev = None;
        }
        push_pair(owning, Node::normal(from.p1, from.p1, from.c2), Node::normal(to.c0, to.p1, to.p1));
        let anchor = other[i].p1;
        push_pair(other, Node::corner(anchor), Node::corner(anchor));
    }
}

fn push_pair(nodes: &mut Vec<Node>, first: Node, second: Node) {
    let at = nodes.len();
    nodes.push(first.linked(None, Some(at + 1)));
    nodes.push(second.linked(Some(at), None));
}

#[cfg(test)]
#[path = "../../tests/unit/interp/reconcile.rs"]
mod tests;
