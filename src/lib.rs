//! Keyframe-interpolatable vector paths.
//!
//! A path is an index-addressed list of [`Node`]s linked into segments. Each keyframe of
//! an animated shape owns one such list, and neighbouring keyframes keep their lists
//! index-aligned: the same index names the same logical node everywhere, even when it
//! is a vertex in one keyframe and only a point on a curve (or nothing) in another.
//!
//! # Layers
//!
//! 1. **Node lists**: free functions over `&[Node]` for segment discovery, structural
//!    edits and outline building ([`nodes_to_outline`]).
//! 2. **Store**: [`SmartPathStore`] owns every keyframe [`SmartPath`], relates them
//!    through [`PathId`] handles and runs the structural actions, propagating each
//!    change to the neighbour chain.
//! 3. **Interpolation**: [`reconcile`] brings two aligned lists into the same outline
//!    structure and [`interpolate_outlines`] blends the results.
//!
//! The key design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **No silent repair**: broken linkage surfaces as [`PathError::Consistency`].
//! - **Atomic actions**: preconditions are checked before anything is mutated.
#![forbid(unsafe_code)]

mod foundation;
mod interp;
mod path;

pub use foundation::core::{BezPath, CubicBez, EPSILON, ParamCurve, PathEl, Point, Vec2, cubic_between};
pub use foundation::error::{PathError, PathResult};
pub use interp::blend::{interpolate_outlines, outlines_match};
pub use interp::reconcile::{reconcile, reconciled_outline};
pub use path::container::SmartPath;
pub use path::edit::{
    connect_nodes, connect_to, insert_node_to_list, promote_dissolved_node_to_normal,
    remove_node_from_list, should_split_node, split_node, split_node_and_disconnect,
};
pub use path::node::{Node, NodeType};
pub use path::outline::nodes_to_outline;
pub use path::segment::{
    first_segment_node, last_segment_node, next_non_dummy_id, next_normal_id,
    nodes_in_same_segment, prev_non_dummy_id, prev_normal_id, reverse_segment,
    segment_closed, sort_nodes_by_connection, validate_links,
};
pub use path::store::{PathId, SmartPathStore};
