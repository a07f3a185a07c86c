use crate::foundation::core::Point;

/// Role of a node in a path's node list.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeType {
    /// Alignment placeholder; contributes nothing to the outline.
    #[default]
    Dummy,
    /// Sub-path break marker; terminates an open segment.
    Move,
    /// Real vertex with an anchor and two handles.
    Normal,
    /// Point on the curve between two normals, addressed by `t`.
    Dissolved,
}

impl NodeType {
    /// `Normal` and `Move` are never re-derived from neighbours.
    pub fn is_stable(self) -> bool {
        matches!(self, Self::Normal | Self::Move)
    }
}

/// One control-point record of a node list.
///
/// Links are indices into the owning list. `None` is the only "unlinked" value.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Node {
    /// Node role.
    pub kind: NodeType,
    /// Incoming handle.
    #[serde(default)]
    pub c0: Point,
    /// Anchor.
    #[serde(default)]
    pub p1: Point,
    /// Outgoing handle.
    #[serde(default)]
    pub c2: Point,
    /// Position along the enclosing normal-to-normal cubic (dissolved nodes).
    #[serde(default)]
    pub t: f64,
    /// Index of the previous node in the chain.
    #[serde(default)]
    pub prev: Option<usize>,
    /// Index of the next node in the chain.
    #[serde(default)]
    pub next: Option<usize>,
}

impl Default for Node {
    fn default() -> Self {
        Self::dummy()
    }
}

impl Node {
    fn with_kind(kind: NodeType) -> Self {
        Self {
            kind,
            c0: Point::ORIGIN,
            p1: Point::ORIGIN,
            c2: Point::ORIGIN,
            t: 0.0,
            prev: None,
            next: None,
        }
    }

    /// Unlinked dummy placeholder.
    pub fn dummy() -> Self {
        Self::with_kind(NodeType::Dummy)
    }

    /// Unlinked sub-path break marker.
    pub fn new_move() -> Self {
        Self::with_kind(NodeType::Move)
    }

    /// Unlinked vertex.
    pub fn normal(c0: impl Into<Point>, p1: impl Into<Point>, c2: impl Into<Point>) -> Self {
        Self {
            c0: c0.into(),
            p1: p1.into(),
            c2: c2.into(),
            ..Self::with_kind(NodeType::Normal)
        }
    }

    /// Unlinked vertex whose handles sit on the anchor.
    pub fn corner(p1: impl Into<Point>) -> Self {
        let p1 = p1.into();
        Self::normal(p1, p1, p1)
    }

    /// Unlinked dissolved placeholder at parameter `t`.
    pub fn dissolved(t: f64) -> Self {
        Self {
            t,
            ..Self::with_kind(NodeType::Dissolved)
        }
    }

    pub fn kind(&self) -> NodeType {
        self.kind
    }

    pub fn set_kind(&mut self, kind: NodeType) {
        self.kind = kind;
    }

    pub fn is_normal(&self) -> bool {
        self.kind == NodeType::Normal
    }

    pub fn is_move(&self) -> bool {
        self.kind == NodeType::Move
    }

    pub fn is_dissolved(&self) -> bool {
        self.kind == NodeType::Dissolved
    }

    pub fn is_dummy(&self) -> bool {
        self.kind == NodeType::Dummy
    }

    pub fn has_prev(&self) -> bool {
        self.prev.is_some()
    }

    pub fn has_next(&self) -> bool {
        self.next.is_some()
    }

    /// Builder-style link assignment, mostly useful for hand-written node lists.
    pub fn linked(mut self, prev: Option<usize>, next: Option<usize>) -> Self {
        self.prev = prev;
        self.next = next;
        self
    }

    pub(crate) fn swap_prev_and_next(&mut self) {
        std::mem::swap(&mut self.prev, &mut self.next);
    }

    pub(crate) fn clear_links(&mut self) {
        self.prev = None;
        self.next = None;
    }

    /// Renumber links after a node was inserted at `at`.
    pub(crate) fn shift_ids_for_insert(&mut self, at: usize) {
        for id in [&mut self.prev, &mut self.next].into_iter().flatten() {
            if *id >= at {
                *id += 1;
            }
        }
    }

    /// Renumber links after the node at `at` was removed.
    ///
    /// Links to the removed node itself must be cleared by the caller first.
    pub(crate) fn shift_ids_for_remove(&mut self, at: usize) {
        for id in [&mut self.prev, &mut self.next].into_iter().flatten() {
            if *id > at {
                *id -= 1;
            }
        }
    }

    /// Collapse both handles onto `p1` and make the node a vertex.
    pub(crate) fn make_corner_at(&mut self, p1: Point) {
        self.c0 = p1;
        self.p1 = p1;
        self.c2 = p1;
        self.kind = NodeType::Normal;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/path/node.rs"]
mod tests;
