use crate::{
    foundation::core::BezPath,
    foundation::error::{PathError, PathResult},
    path::edit::node_at,
    path::node::{Node, NodeType},
    path::outline::nodes_to_outline,
    path::segment::{dissolved_t_between, validate_links},
    path::store::PathId,
};

/// Node list of one keyframe.
///
/// Neighbour relations are store handles and never serialized; a deserialized path is
/// standalone until inserted into a [`crate::SmartPathStore`] and linked.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SmartPath {
    nodes: Vec<Node>,
    #[serde(skip)]
    pub(crate) prev: Option<PathId>,
    #[serde(skip)]
    pub(crate) next: Option<PathId>,
}

/// The parts of a neighbour's node that drive type re-derivation.
#[derive(Clone, Copy, Debug)]
pub(crate) struct NodeSnapshot {
    pub(crate) kind: NodeType,
    pub(crate) next: Option<usize>,
}

impl From<&Node> for NodeSnapshot {
    fn from(node: &Node) -> Self {
        Self {
            kind: node.kind(),
            next: node.next,
        }
    }
}

impl SmartPath {
    /// Wrap an existing node list. Links are not checked; use [`SmartPath::validate`].
    pub fn new(nodes: Vec<Node>) -> Self {
        Self {
            nodes,
            prev: None,
            next: None,
        }
    }

    /// Parse a path from JSON and check its links.
    pub fn from_json_str(s: &str) -> PathResult<Self> {
        let path: Self = serde_json::from_str(s).map_err(|e| PathError::serde(e.to_string()))?;
        path.validate()?;
        Ok(path)
    }

    pub fn to_json_string(&self) -> PathResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| PathError::serde(e.to_string()))
    }

    pub fn validate(&self) -> PathResult<()> {
        validate_links(&self.nodes)
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub(crate) fn nodes_mut(&mut self) -> &mut Vec<Node> {
        &mut self.nodes
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: usize) -> PathResult<&Node> {
        node_at(&self.nodes, id)
    }

    pub fn node_type(&self, id: usize) -> PathResult<NodeType> {
        Ok(self.node(id)?.kind())
    }

    pub fn is_node_normal(&self, id: usize) -> PathResult<bool> {
        Ok(self.node(id)?.is_normal())
    }

    pub fn is_node_dissolved(&self, id: usize) -> PathResult<bool> {
        Ok(self.node(id)?.is_dissolved())
    }

    pub fn is_node_dummy(&self, id: usize) -> PathResult<bool> {
        Ok(self.node(id)?.is_dummy())
    }

    /// Previous keyframe path, if linked.
    pub fn prev(&self) -> Option<PathId> {
        self.prev
    }

    /// Next keyframe path, if linked.
    pub fn next(&self) -> Option<PathId> {
        self.next
    }

    /// Outline of this keyframe alone.
    pub fn outline_at(&self) -> PathResult<BezPath> {
        nodes_to_outline(&self.nodes)
    }

    /// Re-derive the type of a non-stable node from the matching nodes of its
    /// neighbours. Returns `true` when the type changed.
    ///
    /// The node becomes `Dissolved` when a neighbour has a vertex or a marker there, or
    /// when a non-dummy neighbour node continues to a different index. Otherwise it
    /// becomes `Dummy`.
    pub(crate) fn update_node_type(
        &mut self,
        id: usize,
        prev: Option<NodeSnapshot>,
        next: Option<NodeSnapshot>,
    ) -> PathResult<bool> {
        let node = node_at(&self.nodes, id)?;
        if node.kind().is_stable() {
            return Ok(false);
        }
        let own_next = node.next;
        let needs_point = [prev, next].into_iter().flatten().any(|other| {
            other.kind.is_stable() || (other.kind != NodeType::Dummy && other.next != own_next)
        });

        if needs_point {
            if node.is_dissolved() {
                return Ok(false);
            }
            let t = dissolved_t_between(&self.nodes, id);
            let node = &mut self.nodes[id];
            node.t = t;
            node.set_kind(NodeType::Dissolved);
            tracing::trace!(id, t, "node dissolved");
            return Ok(true);
        }

        if node.is_dummy() {
            return Ok(false);
        }
        self.nodes[id].set_kind(NodeType::Dummy);
        tracing::trace!(id, "node demoted to dummy");
        Ok(true)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/path/container.rs"]
mod tests;
