//! Segment discovery and traversal over an index-linked node list.
//!
//! A segment is a maximal run of linked nodes. It is either open (the first node has no
//! `prev`) or closed (the last node links back to the first). Every walk here is bounded
//! by the list length, so malformed cycles surface as [`PathError::Consistency`] instead
//! of hanging.

use crate::{
    foundation::error::{PathError, PathResult},
    path::node::Node,
};

fn link_target(nodes: &[Node], from: usize, to: usize) -> PathResult<usize> {
    if to == from {
        return Err(PathError::consistency(format!("node {from} points to itself")));
    }
    if to >= nodes.len() {
        return Err(PathError::consistency(format!(
            "node {from} links to missing node {to} (list has {} nodes)",
            nodes.len()
        )));
    }
    Ok(to)
}

/// First node of the segment containing `id`.
///
/// For closed segments this is the smallest id in the loop. Returns `None` when `id` is
/// out of range.
pub fn first_segment_node(nodes: &[Node], id: usize) -> PathResult<Option<usize>> {
    if id >= nodes.len() {
        return Ok(None);
    }
    let mut smallest = id;
    let mut curr = id;
    for _ in 0..=2 * nodes.len() {
        let Some(prev) = nodes[curr].prev else {
            return Ok(Some(curr));
        };
        let prev = link_target(nodes, curr, prev)?;
        if prev == smallest {
            return Ok(Some(smallest));
        }
        smallest = smallest.min(prev);
        curr = prev;
    }
    Err(PathError::consistency(format!(
        "backward walk from node {id} does not terminate"
    )))
}

/// Last node of the segment containing `id`.
///
/// For closed segments this is the node whose `next` is the loop's smallest id. Returns
/// `None` when `id` is out of range or names a `Dummy`/`Move` node.
pub fn last_segment_node(nodes: &[Node], id: usize) -> PathResult<Option<usize>> {
    let Some(node) = nodes.get(id) else {
        return Ok(None);
    };
    if node.is_dummy() || node.is_move() {
        return Ok(None);
    }
    let mut smallest = id;
    let mut curr = id;
    for _ in 0..=2 * nodes.len() {
        let Some(next) = nodes[curr].next else {
            return Ok(Some(curr));
        };
        let next = link_target(nodes, curr, next)?;
        if next == smallest {
            return Ok(Some(curr));
        }
        smallest = smallest.min(next);
        curr = next;
    }
    Err(PathError::consistency(format!(
        "forward walk from node {id} does not terminate"
    )))
}

/// True when both ids resolve to the same segment.
pub fn nodes_in_same_segment(nodes: &[Node], a: usize, b: usize) -> PathResult<bool> {
    let first_a = first_segment_node(nodes, a)?;
    let first_b = first_segment_node(nodes, b)?;
    Ok(first_a.is_some() && first_a == first_b)
}

pub fn segment_closed(nodes: &[Node], id: usize) -> PathResult<bool> {
    Ok(match first_segment_node(nodes, id)? {
        Some(first) => nodes[first].has_prev(),
        None => false,
    })
}

/// Swap `prev`/`next` of every node in the segment containing `id`.
pub fn reverse_segment(nodes: &mut [Node], id: usize) -> PathResult<()> {
    let Some(first) = first_segment_node(nodes, id)? else {
        return Ok(());
    };
    let mut curr = first;
    for _ in 0..nodes.len() {
        let next = nodes[curr].next;
        nodes[curr].swap_prev_and_next();
        match next {
            Some(n) if n != first => curr = link_target(nodes, curr, n)?,
            _ => return Ok(()),
        }
    }
    Err(PathError::consistency(format!(
        "reversing segment of node {id} does not terminate"
    )))
}

/// Split `nodes` into segments, each renumbered to `0..len` in chain order.
///
/// Segments are emitted in order of their lowest-indexed member. Closed segments keep
/// their loop link (`last.next == Some(0)`, `first.prev == Some(last)`).
pub fn sort_nodes_by_connection(nodes: &[Node]) -> PathResult<Vec<Vec<Node>>> {
    let mut visited = vec![false; nodes.len()];
    let mut segments = Vec::new();

    for start in 0..nodes.len() {
        if visited[start] {
            continue;
        }
        let Some(first) = first_segment_node(nodes, start)? else {
            visited[start] = true;
            continue;
        };

        let mut segment: Vec<Node> = Vec::new();
        let mut src = first;
        loop {
            if visited[src] {
                return Err(PathError::consistency(format!(
                    "node {src} is reachable from more than one segment"
                )));
            }
            visited[src] = true;

            let idx = segment.len();
            let mut node = nodes[src].clone();
            node.prev = idx.checked_sub(1);
            node.next = node.next.map(|_| idx + 1);
            segment.push(node);

            match nodes[src].next {
                None => break,
                Some(next) if next == first => {
                    let last = segment.len() - 1;
                    segment[last].next = Some(0);
                    segment[0].prev = Some(last);
                    break;
                }
                Some(next) => src = link_target(nodes, src, next)?,
            }
        }
        segments.push(segment);
    }
    Ok(segments)
}

fn walk_until(
    nodes: &[Node],
    id: usize,
    step: impl Fn(&Node) -> Option<usize>,
    hit: impl Fn(&Node) -> bool,
) -> Option<usize> {
    let mut curr = id;
    for _ in 0..nodes.len() {
        let next = step(nodes.get(curr)?)?;
        if next == id {
            return None;
        }
        if hit(nodes.get(next)?) {
            return Some(next);
        }
        curr = next;
    }
    None
}

/// Nearest `Normal` node before `id` along the chain.
pub fn prev_normal_id(nodes: &[Node], id: usize) -> Option<usize> {
    walk_until(nodes, id, |n| n.prev, Node::is_normal)
}

/// Nearest `Normal` node after `id` along the chain.
pub fn next_normal_id(nodes: &[Node], id: usize) -> Option<usize> {
    walk_until(nodes, id, |n| n.next, Node::is_normal)
}

pub fn prev_non_dummy_id(nodes: &[Node], id: usize) -> Option<usize> {
    walk_until(nodes, id, |n| n.prev, |n| !n.is_dummy())
}

pub fn next_non_dummy_id(nodes: &[Node], id: usize) -> Option<usize> {
    walk_until(nodes, id, |n| n.next, |n| !n.is_dummy())
}

/// Parameter for a node that turns dissolved at `id`: halfway between the nearest
/// non-dummy chain neighbours, with vertices and open ends counting as `0` and `1`.
pub(crate) fn dissolved_t_between(nodes: &[Node], id: usize) -> f64 {
    let prev_t = prev_non_dummy_id(nodes, id)
        .filter(|&p| nodes[p].is_dissolved())
        .map_or(0.0, |p| nodes[p].t);
    let next_t = next_non_dummy_id(nodes, id)
        .filter(|&n| nodes[n].is_dissolved())
        .map_or(1.0, |n| nodes[n].t);
    0.5 * (prev_t + next_t)
}

/// Check that every link is in range, not a self link, and reciprocated.
pub fn validate_links(nodes: &[Node]) -> PathResult<()> {
    for (id, node) in nodes.iter().enumerate() {
        if let Some(next) = node.next {
            let next = link_target(nodes, id, next)?;
            if nodes[next].prev != Some(id) {
                return Err(PathError::consistency(format!(
                    "node {id} links forward to {next}, which does not link back"
                )));
            }
        }
        if let Some(prev) = node.prev {
            let prev = link_target(nodes, id, prev)?;
            if nodes[prev].next != Some(id) {
                return Err(PathError::consistency(format!(
                    "node {id} links back to {prev}, which does not link forward"
                )));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/path/segment.rs"]
mod tests;
