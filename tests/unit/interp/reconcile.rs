use super::*;
use crate::foundation::core::{ParamCurve, PathEl, cubic_between};
use crate::interp::blend::{interpolate_outlines, outlines_match};

fn both_ways(a: &[Node], b: &[Node]) -> (BezPath, BezPath) {
    (
        reconciled_outline(a, b).unwrap(),
        reconciled_outline(b, a).unwrap(),
    )
}

fn open_triangle() -> Vec<Node> {
    vec![
        Node::corner((0.0, 0.0)).linked(None, Some(1)),
        Node::corner((100.0, 0.0)).linked(Some(0), Some(2)),
        Node::corner((50.0, 80.0)).linked(Some(1), None),
    ]
}

#[test]
fn node_count_mismatch_is_a_consistency_error() {
    let err = reconcile(&open_triangle(), &open_triangle()[..2]).unwrap_err();
    assert!(err.is_consistency());
}

#[test]
fn identical_lists_keep_their_outline() {
    let mut nodes = open_triangle();
    nodes.push(Node::new_move().linked(Some(2), None));
    nodes[2].next = Some(3);
    let (a, b) = both_ways(&nodes, &nodes);
    assert_eq!(a, nodes_to_outline(&nodes).unwrap());
    assert_eq!(a, b);
}

#[test]
fn shared_dissolved_nodes_are_dropped() {
    let nodes = vec![
        Node::corner((0.0, 0.0)).linked(None, Some(1)),
        Node::dissolved(0.5).linked(Some(0), Some(2)),
        Node::corner((10.0, 0.0)).linked(Some(1), None),
    ];
    let reconciled = reconcile(&nodes, &nodes).unwrap();
    assert_eq!(reconciled.len(), 2);
    assert_eq!(reconciled[0].next, Some(1));
}

#[test]
fn vertex_against_dissolved_point_on_the_curve() {
    let with_vertex = vec![
        Node::normal((0.0, 0.0), (0.0, 0.0), (0.0, 40.0)).linked(None, Some(1)),
        Node::corner((50.0, 100.0)).linked(Some(0), Some(2)),
        Node::normal((100.0, 40.0), (100.0, 0.0), (100.0, 0.0)).linked(Some(1), None),
    ];
    let mut with_point = with_vertex.clone();
    with_point[1] = Node::dissolved(0.5).linked(Some(0), Some(2));

    let (a, b) = both_ways(&with_vertex, &with_point);
    assert!(outlines_match(&a, &b));
    assert_eq!(a.elements().len(), 3);

    let seg = cubic_between(
        with_point[0].p1,
        with_point[0].c2,
        with_point[2].c0,
        with_point[2].p1,
    );
    match b.elements()[1] {
        PathEl::CurveTo(_, _, p) => assert!((p - seg.eval(0.5)).hypot() < 1e-9),
        other => panic!("unexpected element {other:?}"),
    }
}

#[test]
fn closed_against_open_blends_structurally() {
    let open = open_triangle();
    let mut closed = open_triangle();
    closed[0].prev = Some(2);
    closed[2].next = Some(0);

    let (a, b) = both_ways(&closed, &open);
    assert!(outlines_match(&a, &b));

    // The closing edge survives on the closed side as its own cubic.
    let has_closing_edge = a.elements().windows(2).any(|w| {
        matches!(
            w,
            [PathEl::MoveTo(p), PathEl::CurveTo(_, _, q)]
                if *p == Point::new(50.0, 80.0) && *q == Point::new(0.0, 0.0)
        )
    });
    assert!(has_closing_edge);
    interpolate_outlines(&a, &b, 0.5).unwrap();
}

#[test]
fn unlinked_dummy_against_vertex_is_materialised() {
    let with_vertex = vec![
        Node::corner((0.0, 0.0)).linked(None, Some(1)),
        Node::corner((50.0, 50.0)).linked(Some(0), Some(2)),
        Node::corner((100.0, 0.0)).linked(Some(1), None),
    ];
    let without = vec![
        Node::corner((0.0, 0.0)).linked(None, Some(2)),
        Node::dummy(),
        Node::corner((100.0, 0.0)).linked(Some(0), None),
    ];
    let (a, b) = both_ways(&with_vertex, &without);
    assert!(outlines_match(&a, &b));
}

#[test]
fn vertex_against_move_collapses_onto_the_open_end() {
    let a = vec![
        Node::corner((0.0, 0.0)).linked(None, Some(1)),
        Node::corner((10.0, 0.0)).linked(Some(0), None),
    ];
    let b = vec![
        Node::corner((0.0, 0.0)).linked(None, Some(1)),
        Node::new_move().linked(Some(0), None),
    ];
    let (from, to) = both_ways(&a, &b);
    assert!(outlines_match(&from, &to));
    assert_eq!(from, nodes_to_outline(&a).unwrap());
    assert!(matches!(
        to.elements()[1],
        PathEl::CurveTo(_, _, p) if p == Point::new(0.0, 0.0)
    ));

    let mid = interpolate_outlines(&from, &to, 0.5).unwrap();
    assert!(matches!(
        mid.elements()[1],
        PathEl::CurveTo(_, _, p) if p == Point::new(5.0, 0.0)
    ));
}
