//! List-level structural edits.
//!
//! These functions only touch the list they are given. Propagation to neighbouring
//! keyframe paths is the store's job (see [`crate::SmartPathStore`]).

use crate::{
    foundation::core::cubic_between,
    foundation::error::{PathError, PathResult},
    foundation::math::{map_t_to_fragment, split_cubic},
    path::node::{Node, NodeType},
    path::segment::{next_normal_id, prev_normal_id, reverse_segment},
};

pub(crate) fn node_at(nodes: &[Node], id: usize) -> PathResult<&Node> {
    nodes.get(id).ok_or_else(|| {
        PathError::precondition(format!(
            "node id {id} out of range (list has {} nodes)",
            nodes.len()
        ))
    })
}

/// Insert `node` at index `at`, renumbering every link that points at or past `at`.
///
/// The inserted node arrives unlinked; callers wire it up afterwards.
pub fn insert_node_to_list(nodes: &mut Vec<Node>, at: usize, mut node: Node) -> usize {
    let at = at.min(nodes.len());
    for n in nodes.iter_mut() {
        n.shift_ids_for_insert(at);
    }
    node.clear_links();
    nodes.insert(at, node);
    at
}

/// Remove the node at `at`, bridging its neighbours and renumbering links.
pub fn remove_node_from_list(nodes: &mut Vec<Node>, at: usize) -> PathResult<Node> {
    node_at(nodes, at)?;
    let (prev, next) = (nodes[at].prev, nodes[at].next);
    if prev.is_some() && prev == next {
        // Two-node loop collapses to a lone node.
        if let Some(other) = prev {
            nodes[other].clear_links();
        }
    } else {
        if let Some(p) = prev.filter(|&p| nodes.get(p).is_some_and(|n| n.next == Some(at))) {
            nodes[p].next = next;
        }
        if let Some(n) = next.filter(|&n| nodes.get(n).is_some_and(|node| node.prev == Some(at))) {
            nodes[n].prev = prev;
        }
    }

    let removed = nodes.remove(at);
    for n in nodes.iter_mut() {
        n.shift_ids_for_remove(at);
    }
    Ok(removed)
}

/// Link the unlinked node `new` into the chain directly after `target`.
pub(crate) fn splice_after(nodes: &mut [Node], target: usize, new: usize) {
    let next = nodes[target].next;
    nodes[new].prev = Some(target);
    nodes[new].next = next;
    if let Some(n) = next {
        nodes[n].prev = Some(new);
    }
    nodes[target].next = Some(new);
}

/// Join the free ends of `a` and `b`, reversing `a`'s segment when both free ends face
/// the same way.
pub fn connect_nodes(nodes: &mut [Node], a: usize, b: usize) -> PathResult<()> {
    node_at(nodes, a)?;
    node_at(nodes, b)?;
    if a == b {
        return Err(PathError::consistency(format!(
            "cannot connect node {a} to itself"
        )));
    }
    let (a_prev, a_next) = (nodes[a].has_prev(), nodes[a].has_next());
    let (b_prev, b_next) = (nodes[b].has_prev(), nodes[b].has_next());

    if !a_next && !b_prev {
        nodes[a].next = Some(b);
        nodes[b].prev = Some(a);
    } else if !a_prev && !b_next {
        nodes[a].prev = Some(b);
        nodes[b].next = Some(a);
    } else if !a_prev && !b_prev {
        reverse_segment(nodes, a)?;
        nodes[a].next = Some(b);
        nodes[b].prev = Some(a);
    } else if !a_next && !b_next {
        reverse_segment(nodes, a)?;
        nodes[a].prev = Some(b);
        nodes[b].next = Some(a);
    } else {
        return Err(PathError::consistency(format!(
            "trying to connect nodes {a} and {b} that already have two connections"
        )));
    }
    Ok(())
}

/// Attach the unlinked node `new` to `target`.
///
/// A target with a successor gets `new` spliced in right after it. Otherwise this is a
/// plain [`connect_nodes`].
pub fn connect_to(nodes: &mut [Node], target: usize, new: usize) -> PathResult<()> {
    node_at(nodes, target)?;
    node_at(nodes, new)?;
    if target == new {
        return Err(PathError::consistency(format!(
            "cannot connect node {new} to itself"
        )));
    }
    if nodes[target].has_next() {
        if nodes[new].has_prev() || nodes[new].has_next() {
            return Err(PathError::consistency(format!(
                "node {new} is already linked and cannot be spliced after {target}"
            )));
        }
        splice_after(nodes, target, new);
        Ok(())
    } else {
        connect_nodes(nodes, target, new)
    }
}

/// Turn the dissolved node `id` into a vertex without changing the curve shape.
///
/// The cubic between the enclosing normals is split at the node's `t`. Other dissolved
/// nodes on either half get their `t` remapped into the half they now belong to.
pub fn promote_dissolved_node_to_normal(nodes: &mut [Node], id: usize) -> PathResult<()> {
    if !node_at(nodes, id)?.is_dissolved() {
        return Err(PathError::precondition(format!(
            "node {id} is {:?}; only dissolved nodes can be promoted",
            nodes[id].kind()
        )));
    }
    let prev_id = prev_normal_id(nodes, id).ok_or_else(|| {
        PathError::consistency(format!("dissolved node {id} has no previous normal node"))
    })?;
    let next_id = next_normal_id(nodes, id).ok_or_else(|| {
        PathError::consistency(format!("dissolved node {id} has no next normal node"))
    })?;

    let t = nodes[id].t.clamp(0.0, 1.0);
    let seg = cubic_between(
        nodes[prev_id].p1,
        nodes[prev_id].c2,
        nodes[next_id].c0,
        nodes[next_id].p1,
    );
    let (first, second) = split_cubic(seg, t);

    nodes[prev_id].c2 = first.p1;
    let node = &mut nodes[id];
    node.c0 = first.p2;
    node.p1 = first.p3;
    node.c2 = second.p1;
    node.t = 0.0;
    node.set_kind(NodeType::Normal);
    nodes[next_id].c0 = second.p2;

    remap_dissolved_run(nodes, id, prev_id, |n| n.prev, |ti| {
        map_t_to_fragment(0.0, t, ti)
    });
    remap_dissolved_run(nodes, id, next_id, |n| n.next, |ti| {
        map_t_to_fragment(t, 1.0, ti)
    });
    Ok(())
}

fn remap_dissolved_run(
    nodes: &mut [Node],
    from: usize,
    until: usize,
    step: impl Fn(&Node) -> Option<usize>,
    remap: impl Fn(f64) -> f64,
) {
    let mut curr = step(&nodes[from]);
    for _ in 0..nodes.len() {
        let Some(id) = curr.filter(|&id| id != until && id != from) else {
            return;
        };
        if nodes[id].is_dissolved() {
            nodes[id].t = remap(nodes[id].t);
        }
        curr = step(&nodes[id]);
    }
}

/// Duplicate node `id` into two chained nodes and return the id of the copy (`id + 1`).
///
/// A normal node is split with a zero-length handle between the halves. A dissolved
/// node is copied verbatim.
pub fn split_node(nodes: &mut Vec<Node>, id: usize) -> PathResult<usize> {
    let mut copy = node_at(nodes, id)?.clone();
    match copy.kind() {
        NodeType::Normal => {
            nodes[id].c2 = nodes[id].p1;
            copy.c0 = copy.p1;
        }
        NodeType::Dissolved => {}
        other => {
            return Err(PathError::precondition(format!(
                "node {id} is {other:?}; only normal or dissolved nodes can be split"
            )));
        }
    }
    let copy_id = insert_node_to_list(nodes, id + 1, copy);
    splice_after(nodes, id, copy_id);
    Ok(copy_id)
}

/// Split normal node `id` and put a `Move` between the halves.
///
/// Returns the id of the detached copy (`id + 2`), which now starts its own chain.
pub fn split_node_and_disconnect(nodes: &mut Vec<Node>, id: usize) -> PathResult<usize> {
    if !node_at(nodes, id)?.is_normal() {
        return Err(PathError::precondition(format!(
            "node {id} is {:?}; only normal nodes can be disconnected",
            nodes[id].kind()
        )));
    }
    split_node(nodes, id)?;
    let move_id = insert_node_to_list(nodes, id + 1, Node::new_move());
    let copy_id = move_id + 1;
    nodes[id].next = Some(move_id);
    nodes[move_id].prev = Some(id);
    nodes[copy_id].prev = None;
    Ok(copy_id)
}

/// Decide whether a node must be split so its counterpart's adjacency can be expressed.
///
/// An interior normal node splits only when both links differ. Any other node splits when
/// either link differs.
pub fn should_split_node(this: &Node, neighbour: &Node) -> bool {
    let prev_differs = this.prev != neighbour.prev;
    let next_differs = this.next != neighbour.next;
    if this.is_normal() && this.has_prev() && this.has_next() {
        return prev_differs && next_differs;
    }
    prev_differs || next_differs
}

/// Demote normal node `id` to `Dummy`, squeezing the dissolved nodes on either side into
/// the merged normal-to-normal span.
pub(crate) fn demote_normal_node(nodes: &mut [Node], id: usize) -> PathResult<()> {
    if !node_at(nodes, id)?.is_normal() {
        return Err(PathError::precondition(format!(
            "node {id} is {:?}; only normal nodes can be removed",
            nodes[id].kind()
        )));
    }
    squeeze_run(nodes, id, |n| n.prev, |t| t * 0.5);
    squeeze_run(nodes, id, |n| n.next, |t| t * 0.5 + 0.5);
    nodes[id].set_kind(NodeType::Dummy);
    Ok(())
}

fn squeeze_run(
    nodes: &mut [Node],
    from: usize,
    step: impl Fn(&Node) -> Option<usize>,
    remap: impl Fn(f64) -> f64,
) {
    let mut curr = step(&nodes[from]);
    for _ in 0..nodes.len() {
        let Some(id) = curr.filter(|&id| id != from) else {
            return;
        };
        let node = &mut nodes[id];
        if node.is_normal() || node.is_move() {
            return;
        }
        if node.is_dissolved() {
            node.t = remap(node.t);
        }
        curr = step(node);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/path/edit.rs"]
mod tests;
