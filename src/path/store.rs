//! Keyframe arena and the structural actions that keep neighbouring paths in sync.
//!
//! Paths live in a [`SmartPathStore`] and refer to their keyframe neighbours through
//! [`PathId`] handles. Every action mutates one path and then propagates the change
//! along the neighbour chain, so all linked paths keep the same node count and each
//! index keeps naming the same logical node everywhere.

use crate::{
    foundation::core::{BezPath, Point},
    foundation::error::{PathError, PathResult},
    interp::blend::interpolate_outlines,
    interp::reconcile::reconciled_outline,
    path::container::{NodeSnapshot, SmartPath},
    path::edit::{
        connect_nodes, connect_to, demote_normal_node, insert_node_to_list, node_at,
        promote_dissolved_node_to_normal, remove_node_from_list, splice_after,
    },
    path::node::{Node, NodeType},
    path::segment::{last_segment_node, next_normal_id, prev_normal_id, segment_closed},
};

/// Handle of a path inside a [`SmartPathStore`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PathId(pub(crate) usize);

impl PathId {
    /// Position of the path in its store.
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Toward {
    Prev,
    Next,
}

/// Owner of all keyframe paths of one animated shape.
#[derive(Clone, Debug, Default)]
pub struct SmartPathStore {
    paths: Vec<SmartPath>,
}

impl SmartPathStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a standalone path. Any neighbour handles it carries are dropped.
    pub fn insert(&mut self, mut path: SmartPath) -> PathId {
        path.prev = None;
        path.next = None;
        self.paths.push(path);
        PathId(self.paths.len() - 1)
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = PathId> + '_ {
        (0..self.paths.len()).map(PathId)
    }

    pub fn get(&self, id: PathId) -> PathResult<&SmartPath> {
        self.paths
            .get(id.0)
            .ok_or_else(|| PathError::validation(format!("unknown path {id:?}")))
    }

    fn get_mut(&mut self, id: PathId) -> PathResult<&mut SmartPath> {
        self.paths
            .get_mut(id.0)
            .ok_or_else(|| PathError::validation(format!("unknown path {id:?}")))
    }

    fn nodes(&self, id: PathId) -> PathResult<&[Node]> {
        Ok(self.get(id)?.nodes())
    }

    fn nodes_mut(&mut self, id: PathId) -> PathResult<&mut Vec<Node>> {
        Ok(self.get_mut(id)?.nodes_mut())
    }

    fn neighbour(&self, id: PathId, toward: Toward) -> Option<PathId> {
        let path = self.paths.get(id.0)?;
        match toward {
            Toward::Prev => path.prev,
            Toward::Next => path.next,
        }
    }

    // ------------------------------------------------------------------
    // Relations
    // ------------------------------------------------------------------

    fn check_relation(&self, id: PathId, other: Option<PathId>) -> PathResult<()> {
        let len = self.get(id)?.node_count();
        let Some(other) = other else {
            return Ok(());
        };
        if other == id {
            return Err(PathError::validation(format!(
                "path {id:?} cannot be its own neighbour"
            )));
        }
        let other_len = self.get(other)?.node_count();
        if other_len != len {
            return Err(PathError::validation(format!(
                "cannot relate path {id:?} ({len} nodes) to {other:?} ({other_len} nodes)"
            )));
        }
        Ok(())
    }

    /// Make `prev` the previous keyframe of `id`, or detach `id` from its previous one.
    ///
    /// Both sides are updated, as with [`SmartPathStore::link`]. Relations that `id` or
    /// `prev` already had in that position are broken first.
    #[tracing::instrument(skip(self))]
    pub fn set_prev(&mut self, id: PathId, prev: Option<PathId>) -> PathResult<()> {
        self.check_relation(id, prev)?;
        if let Some(old) = self.get(id)?.prev {
            self.unlink(old, id)?;
        }
        let Some(prev) = prev else {
            return Ok(());
        };
        if let Some(old) = self.get(prev)?.next {
            self.unlink(prev, old)?;
        }
        self.link(prev, id)
    }

    /// Make `next` the next keyframe of `id`, or detach `id` from its next one.
    #[tracing::instrument(skip(self))]
    pub fn set_next(&mut self, id: PathId, next: Option<PathId>) -> PathResult<()> {
        self.check_relation(id, next)?;
        if let Some(old) = self.get(id)?.next {
            self.unlink(id, old)?;
        }
        let Some(next) = next else {
            return Ok(());
        };
        if let Some(old) = self.get(next)?.prev {
            self.unlink(old, next)?;
        }
        self.link(id, next)
    }

    /// Make `next` follow `prev` in keyframe order, updating both sides.
    #[tracing::instrument(skip(self))]
    pub fn link(&mut self, prev: PathId, next: PathId) -> PathResult<()> {
        self.check_relation(prev, Some(next))?;
        self.get_mut(prev)?.next = Some(next);
        self.get_mut(next)?.prev = Some(prev);
        self.settle_pair(prev, next)
    }

    /// Break the relation between `prev` and `next` on both sides.
    #[tracing::instrument(skip(self))]
    pub fn unlink(&mut self, prev: PathId, next: PathId) -> PathResult<()> {
        if self.get(prev)?.next != Some(next) || self.get(next)?.prev != Some(prev) {
            return Err(PathError::validation(format!(
                "paths {prev:?} and {next:?} are not linked"
            )));
        }
        self.get_mut(prev)?.next = None;
        self.get_mut(next)?.prev = None;
        self.settle_pair(prev, next)
    }

    /// Re-derive both sides until neither changes any more.
    fn settle_pair(&mut self, a: PathId, b: PathId) -> PathResult<()> {
        let rounds = self.get(a)?.node_count() + 2;
        self.settle_pair_within(a, b, rounds)
    }

    fn settle_pair_within(&mut self, a: PathId, b: PathId, rounds: usize) -> PathResult<()> {
        for _ in 0..rounds {
            let changed_a = self.update_all_node_types(a)?;
            let changed_b = self.update_all_node_types(b)?;
            if changed_a.is_empty() && changed_b.is_empty() {
                return Ok(());
            }
        }
        Err(PathError::consistency(format!(
            "node types of {a:?} and {b:?} did not settle after {rounds} rounds"
        )))
    }

    /// Re-derive every node of `id` once. Returns the indices whose type changed.
    pub fn update_all_node_types(&mut self, id: PathId) -> PathResult<Vec<usize>> {
        let mut changed = Vec::new();
        for node in 0..self.get(id)?.node_count() {
            if self.update_node_type(id, node)? {
                changed.push(node);
            }
        }
        Ok(changed)
    }

    fn snapshot(&self, other: Option<PathId>, node: usize) -> PathResult<Option<NodeSnapshot>> {
        let Some(other) = other else {
            return Ok(None);
        };
        let nodes = self.nodes(other)?;
        let n = nodes.get(node).ok_or_else(|| {
            PathError::consistency(format!(
                "path {other:?} has {} nodes, missing node {node}",
                nodes.len()
            ))
        })?;
        Ok(Some(NodeSnapshot::from(n)))
    }

    fn update_node_type(&mut self, id: PathId, node: usize) -> PathResult<bool> {
        let path = self.get(id)?;
        let prev = self.snapshot(path.prev, node)?;
        let next = self.snapshot(path.next, node)?;
        self.get_mut(id)?.update_node_type(node, prev, next)
    }

    // ------------------------------------------------------------------
    // Propagation
    // ------------------------------------------------------------------

    /// Paths reachable from `id` in one direction, nearest first.
    fn chain(&self, id: PathId, toward: Toward) -> Vec<PathId> {
        let mut out = Vec::new();
        let mut curr = self.neighbour(id, toward);
        while let Some(c) = curr {
            if c == id || out.contains(&c) || out.len() > self.paths.len() {
                break;
            }
            out.push(c);
            curr = self.neighbour(c, toward);
        }
        out
    }

    /// Every path an action on `id` propagates to, with `id` itself first.
    fn chain_members(&self, id: PathId) -> Vec<PathId> {
        let mut members = vec![id];
        for toward in [Toward::Prev, Toward::Next] {
            for c in self.chain(id, toward) {
                if !members.contains(&c) {
                    members.push(c);
                }
            }
        }
        members
    }

    fn check_chain_lengths(&self, id: PathId) -> PathResult<usize> {
        let len = self.get(id)?.node_count();
        for member in self.chain_members(id) {
            let other = self.get(member)?.node_count();
            if other != len {
                return Err(PathError::consistency(format!(
                    "path {member:?} has {other} nodes but {id:?} has {len}"
                )));
            }
        }
        Ok(len)
    }

    /// Mirror an insertion made in `origin` into every path of its neighbour chain.
    ///
    /// Each neighbour receives a `Dummy` at the same index, attached after `after` when
    /// given. A neighbour whose node `after` is its `Move` gets the dummy in front of it. The changed index is then re-derived outward from `origin`.
    fn propagate_insert(&mut self, origin: PathId, at: usize, after: Option<usize>) -> PathResult<()> {
        for toward in [Toward::Prev, Toward::Next] {
            let chain = self.chain(origin, toward);
            for &member in &chain {
                let nodes = self.nodes_mut(member)?;
                let id = insert_node_to_list(nodes, at, Node::dummy());
                if let Some(target) = after.and_then(|after| mirror_target(nodes, after)) {
                    connect_to(nodes, target, id)?;
                }
                tracing::debug!(path = ?member, node = id, "mirrored insert");
            }
            if let Some(&first) = chain.first() {
                self.rederive_outward(first, at, toward)?;
            }
        }
        Ok(())
    }

    /// Re-derive `node` in `start` and keep going away from the origin while types change.
    fn rederive_outward(&mut self, start: PathId, node: usize, toward: Toward) -> PathResult<()> {
        let mut curr = Some(start);
        let mut hops = 0;
        while let Some(c) = curr {
            if hops > self.paths.len() || !self.update_node_type(c, node)? {
                break;
            }
            tracing::debug!(path = ?c, node, "node type re-derived");
            hops += 1;
            curr = self.neighbour(c, toward).filter(|&n| n != start);
        }
        Ok(())
    }

    fn rederive_around(&mut self, id: PathId, node: usize) -> PathResult<()> {
        self.update_node_type(id, node)?;
        for toward in [Toward::Prev, Toward::Next] {
            if let Some(n) = self.neighbour(id, toward) {
                self.rederive_outward(n, node, toward)?;
            }
        }
        self.update_node_type(id, node)?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Actions
    // ------------------------------------------------------------------

    /// Start a new segment in an empty path: a normal node followed by its `Move`.
    #[tracing::instrument(skip(self))]
    pub fn add_first_node(&mut self, id: PathId, c0: Point, p1: Point, c2: Point) -> PathResult<()> {
        self.check_chain_lengths(id)?;
        if !self.get(id)?.is_empty() {
            return Err(PathError::precondition(format!(
                "path {id:?} already has nodes"
            )));
        }

        let normal = insert_node_to_list(self.nodes_mut(id)?, 0, Node::normal(c0, p1, c2));
        self.propagate_insert(id, normal, None)?;

        let nodes = self.nodes_mut(id)?;
        let marker = insert_node_to_list(nodes, normal + 1, Node::new_move());
        connect_nodes(nodes, normal, marker)?;
        self.propagate_insert(id, marker, Some(normal))
    }

    /// Insert `blueprint` right after node `after`.
    ///
    /// A dissolved blueprint is promoted on the spot, its `t` addressing the cubic it
    /// lands on. Neighbour paths receive a matching dummy.
    #[tracing::instrument(skip(self))]
    pub fn insert_node_after(&mut self, id: PathId, after: usize, blueprint: Node) -> PathResult<usize> {
        self.check_chain_lengths(id)?;
        let nodes = self.nodes(id)?;
        let target = node_at(nodes, after)?;
        if target.is_move() {
            return Err(PathError::precondition(format!(
                "cannot insert after node {after} ({:?})",
                target.kind()
            )));
        }
        match blueprint.kind() {
            NodeType::Normal => {}
            NodeType::Dissolved => {
                let has_prev = target.is_normal() || prev_normal_id(nodes, after).is_some();
                if !has_prev || next_normal_id(nodes, after).is_none() {
                    return Err(PathError::precondition(format!(
                        "node {after} is not enclosed by normal nodes"
                    )));
                }
            }
            other => {
                return Err(PathError::precondition(format!(
                    "only normal or dissolved nodes can be inserted, got {other:?}"
                )));
            }
        }

        let dissolved = blueprint.is_dissolved();
        let nodes = self.nodes_mut(id)?;
        let new = insert_node_to_list(nodes, after + 1, blueprint);
        splice_after(nodes, after, new);
        if dissolved {
            promote_dissolved_node_to_normal(nodes, new)?;
        }
        self.propagate_insert(id, new, Some(after))?;
        Ok(new)
    }

    /// Insert a vertex at parameter `t` of the cubic following node `after`.
    pub fn insert_normal_node_after(&mut self, id: PathId, after: usize, t: f64) -> PathResult<usize> {
        self.insert_node_after(id, after, Node::dissolved(t))
    }

    /// Insert a vertex with explicit geometry after node `after`.
    pub fn add_normal_node_after(
        &mut self,
        id: PathId,
        after: usize,
        c0: Point,
        p1: Point,
        c2: Point,
    ) -> PathResult<usize> {
        self.insert_node_after(id, after, Node::normal(c0, p1, c2))
    }

    /// Demote a vertex; neighbours that still have a vertex there keep it as a
    /// dissolved node here.
    #[tracing::instrument(skip(self))]
    pub fn remove_normal_node(&mut self, id: PathId, node: usize) -> PathResult<()> {
        self.check_chain_lengths(id)?;
        demote_normal_node(self.nodes_mut(id)?, node)?;
        self.rederive_around(id, node)
    }

    /// Turn a dissolved node into a vertex without changing this keyframe's outline.
    #[tracing::instrument(skip(self))]
    pub fn promote_dissolved_node_to_normal(&mut self, id: PathId, node: usize) -> PathResult<()> {
        self.check_chain_lengths(id)?;
        promote_dissolved_node_to_normal(self.nodes_mut(id)?, node)?;
        self.rederive_around(id, node)
    }

    /// Break the link between two adjacent nodes, ending the first part with a `Move`.
    ///
    /// Returns the index of the new `Move` node.
    #[tracing::instrument(skip(self))]
    pub fn disconnect_nodes(&mut self, id: PathId, a: usize, b: usize) -> PathResult<usize> {
        self.check_chain_lengths(id)?;
        let nodes = self.nodes(id)?;
        node_at(nodes, a)?;
        node_at(nodes, b)?;
        let (prev, next) = if nodes[a].next == Some(b) {
            (a, b)
        } else if nodes[b].next == Some(a) {
            (b, a)
        } else {
            return Err(PathError::consistency(format!(
                "nodes {a} and {b} are not connected"
            )));
        };

        let nodes = self.nodes_mut(id)?;
        nodes[next].prev = None;
        nodes[prev].next = None;
        let marker = insert_node_to_list(nodes, prev + 1, Node::new_move());
        nodes[marker].prev = Some(prev);
        nodes[prev].next = Some(marker);
        self.propagate_insert(id, marker, Some(prev))?;
        Ok(marker)
    }

    /// Join the open ends of `a` and `b`.
    ///
    /// Both nodes must end open segments terminated by a `Move`. Connecting the two ends
    /// of one segment closes it and retires its `Move`; joining two segments keeps one
    /// `Move` at the new end and retires the other.
    #[tracing::instrument(skip(self))]
    pub fn connect_nodes(&mut self, id: PathId, a: usize, b: usize) -> PathResult<()> {
        self.check_chain_lengths(id)?;
        let nodes = self.nodes(id)?;
        let mut markers = [0usize; 2];
        for (slot, end) in markers.iter_mut().zip([a, b]) {
            node_at(nodes, end)?;
            if segment_closed(nodes, end)? {
                return Err(PathError::consistency(format!(
                    "node {end} belongs to a closed segment"
                )));
            }
            *slot = match last_segment_node(nodes, end)? {
                Some(last) if nodes[last].is_move() => last,
                _ => {
                    return Err(PathError::consistency(format!(
                        "segment of node {end} does not end with a move node"
                    )));
                }
            };
        }
        let [m1, m2] = markers;

        let mut work = nodes.to_vec();
        for m in [m1, m2] {
            if let Some(p) = work[m].prev.take() {
                work[p].next = None;
            }
        }
        connect_nodes(&mut work, a, b)?;

        let mut retired = Vec::new();
        if segment_closed(&work, a)? {
            retired.push(m1);
        } else {
            let last = last_segment_node(&work, a)?.ok_or_else(|| {
                PathError::consistency(format!("joined segment of node {a} has no end"))
            })?;
            splice_after(&mut work, last, m1);
        }
        if m2 != m1 {
            retired.push(m2);
        }
        for &m in &retired {
            work[m].clear_links();
            work[m].set_kind(NodeType::Dummy);
        }
        *self.nodes_mut(id)? = work;

        for m in retired {
            self.rederive_around(id, m)?;
        }
        for toward in [Toward::Prev, Toward::Next] {
            if let Some(n) = self.neighbour(id, toward) {
                for node in 0..self.get(n)?.node_count() {
                    self.rederive_outward(n, node, toward)?;
                }
            }
        }
        Ok(())
    }

    /// Remove an index that is `Dummy` in every path of the chain.
    #[tracing::instrument(skip(self))]
    pub fn remove_dummy_node(&mut self, id: PathId, node: usize) -> PathResult<()> {
        self.check_chain_lengths(id)?;
        let members = self.chain_members(id);
        for &member in &members {
            if !node_at(self.nodes(member)?, node)?.is_dummy() {
                return Err(PathError::precondition(format!(
                    "node {node} of path {member:?} is not a dummy"
                )));
            }
        }
        for member in members {
            remove_node_from_list(self.nodes_mut(member)?, node)?;
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Outlines
    // ------------------------------------------------------------------

    pub fn outline_at(&self, id: PathId) -> PathResult<BezPath> {
        self.get(id)?.outline_at()
    }

    /// Outline of `id` reconciled against its previous keyframe.
    pub fn outline_for_prev(&self, id: PathId) -> PathResult<BezPath> {
        self.outline_toward(id, Toward::Prev)
    }

    /// Outline of `id` reconciled against its next keyframe.
    pub fn outline_for_next(&self, id: PathId) -> PathResult<BezPath> {
        self.outline_toward(id, Toward::Next)
    }

    fn outline_toward(&self, id: PathId, toward: Toward) -> PathResult<BezPath> {
        let path = self.get(id)?;
        match self.neighbour(id, toward) {
            Some(other) => reconciled_outline(path.nodes(), self.nodes(other)?),
            None => path.outline_at(),
        }
    }

    /// Blend from `id` toward its previous keyframe; `weight == 1` is the neighbour.
    pub fn interpolate_with_prev(&self, id: PathId, weight: f64) -> PathResult<BezPath> {
        self.interpolate_toward(id, Toward::Prev, weight)
    }

    /// Blend from `id` toward its next keyframe; `weight == 1` is the neighbour.
    pub fn interpolate_with_next(&self, id: PathId, weight: f64) -> PathResult<BezPath> {
        self.interpolate_toward(id, Toward::Next, weight)
    }

    #[tracing::instrument(skip(self))]
    fn interpolate_toward(&self, id: PathId, toward: Toward, weight: f64) -> PathResult<BezPath> {
        let Some(other) = self.neighbour(id, toward) else {
            return self.outline_at(id);
        };
        let mine = self.nodes(id)?;
        let theirs = self.nodes(other)?;
        let from = reconciled_outline(mine, theirs)?;
        let to = reconciled_outline(theirs, mine)?;
        interpolate_outlines(&from, &to, weight)
    }
}

/// Where a mirrored node attaches in a neighbour: after `after`, or in front of it
/// when it ends a segment as a `Move`.
fn mirror_target(nodes: &[Node], after: usize) -> Option<usize> {
    let target = nodes.get(after)?;
    if target.is_move() {
        target.prev
    } else {
        Some(after)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/path/store.rs"]
mod tests;
