use super::*;
use crate::foundation::core::{ParamCurve, Point};
use crate::path::segment::{segment_closed, validate_links};

fn curve_pair() -> Vec<Node> {
    vec![
        Node::normal((0.0, 0.0), (0.0, 0.0), (0.0, 50.0)).linked(None, Some(1)),
        Node::normal((100.0, 50.0), (100.0, 0.0), (100.0, 0.0)).linked(Some(0), None),
    ]
}

fn with_dissolved(ts: &[f64]) -> Vec<Node> {
    let mut nodes = curve_pair();
    let mut after = 0;
    for &t in ts {
        let id = insert_node_to_list(&mut nodes, after + 1, Node::dissolved(t));
        splice_after(&mut nodes, after, id);
        after = id;
    }
    nodes
}

#[test]
fn insert_renumbers_existing_links() {
    let mut nodes = curve_pair();
    let id = insert_node_to_list(&mut nodes, 1, Node::dummy().linked(Some(9), Some(9)));
    assert_eq!(id, 1);
    assert_eq!(nodes[0].next, Some(2));
    assert_eq!(nodes[2].prev, Some(0));
    assert_eq!((nodes[1].prev, nodes[1].next), (None, None));
}

#[test]
fn remove_bridges_the_chain() {
    let mut nodes = with_dissolved(&[0.5]);
    let removed = remove_node_from_list(&mut nodes, 1).unwrap();
    assert!(removed.is_dissolved());
    assert_eq!(nodes.len(), 2);
    assert_eq!(nodes[0].next, Some(1));
    assert_eq!(nodes[1].prev, Some(0));
    validate_links(&nodes).unwrap();
}

#[test]
fn remove_from_two_node_loop_leaves_lone_node() {
    let mut nodes = curve_pair();
    nodes[0].prev = Some(1);
    nodes[1].next = Some(0);
    remove_node_from_list(&mut nodes, 0).unwrap();
    assert_eq!(nodes.len(), 1);
    assert_eq!((nodes[0].prev, nodes[0].next), (None, None));
}

#[test]
fn promote_splits_the_cubic_at_t() {
    let before = curve_pair();
    let seg = cubic_between(before[0].p1, before[0].c2, before[1].c0, before[1].p1);
    let expected = seg.eval(0.5);

    let mut nodes = with_dissolved(&[0.5]);
    promote_dissolved_node_to_normal(&mut nodes, 1).unwrap();
    assert!(nodes[1].is_normal());
    assert!((nodes[1].p1 - expected).hypot() < 1e-9);

    let left = cubic_between(nodes[0].p1, nodes[0].c2, nodes[1].c0, nodes[1].p1);
    let right = cubic_between(nodes[1].p1, nodes[1].c2, nodes[2].c0, nodes[2].p1);
    assert_eq!(left.p3, right.p0);
    assert!((left.eval(0.5) - seg.eval(0.25)).hypot() < 1e-9);
    assert!((right.eval(0.5) - seg.eval(0.75)).hypot() < 1e-9);
}

#[test]
fn promote_remaps_remaining_dissolved_nodes() {
    let mut nodes = with_dissolved(&[0.2, 0.5, 0.8]);
    let seg = {
        let n = curve_pair();
        cubic_between(n[0].p1, n[0].c2, n[1].c0, n[1].p1)
    };
    promote_dissolved_node_to_normal(&mut nodes, 2).unwrap();
    assert!((nodes[1].t - 0.4).abs() < 1e-12);
    assert!((nodes[3].t - 0.6).abs() < 1e-12);

    // The remapped node still evaluates to the same point on the original curve.
    promote_dissolved_node_to_normal(&mut nodes, 3).unwrap();
    assert!((nodes[3].p1 - seg.eval(0.8)).hypot() < 1e-9);
}

#[test]
fn promote_rejects_non_dissolved_and_unenclosed_nodes() {
    let mut nodes = curve_pair();
    assert!(matches!(
        promote_dissolved_node_to_normal(&mut nodes, 0),
        Err(PathError::Precondition(_))
    ));

    let mut nodes = vec![
        Node::corner((0.0, 0.0)).linked(None, Some(1)),
        Node::dissolved(0.5).linked(Some(0), None),
    ];
    assert!(
        promote_dissolved_node_to_normal(&mut nodes, 1)
            .unwrap_err()
            .is_consistency()
    );
}

#[test]
fn split_normal_node_keeps_chain_and_zero_handle() {
    let mut nodes = curve_pair();
    let copy = split_node(&mut nodes, 0).unwrap();
    assert_eq!(copy, 1);
    assert_eq!(nodes.len(), 3);
    assert_eq!(nodes[0].c2, nodes[0].p1);
    assert_eq!(nodes[1].c0, nodes[1].p1);
    assert_eq!(nodes[1].c2, Point::new(0.0, 50.0));
    assert_eq!(nodes[0].next, Some(1));
    assert_eq!(nodes[1].next, Some(2));
    validate_links(&nodes).unwrap();
}

#[test]
fn split_rejects_markers() {
    let mut nodes = vec![Node::new_move()];
    assert!(matches!(
        split_node(&mut nodes, 0),
        Err(PathError::Precondition(_))
    ));
}

#[test]
fn split_and_disconnect_opens_a_closed_loop() {
    let mut nodes = curve_pair();
    nodes[0].prev = Some(1);
    nodes[1].next = Some(0);
    let copy = split_node_and_disconnect(&mut nodes, 0).unwrap();
    assert_eq!(copy, 2);
    assert!(nodes[1].is_move());
    assert_eq!(nodes[0].next, Some(1));
    assert_eq!(nodes[2].prev, None);
    assert!(!segment_closed(&nodes, 0).unwrap());
    validate_links(&nodes).unwrap();
}

#[test]
fn connect_nodes_covers_all_orientations() {
    // a.next free, b.prev free
    let mut nodes = vec![Node::corner((0.0, 0.0)), Node::corner((1.0, 0.0))];
    connect_nodes(&mut nodes, 0, 1).unwrap();
    assert_eq!((nodes[0].next, nodes[1].prev), (Some(1), Some(0)));

    // Both segment heads: a's segment gets reversed.
    let mut nodes = vec![
        Node::corner((0.0, 0.0)).linked(None, Some(1)),
        Node::corner((1.0, 0.0)).linked(Some(0), None),
        Node::corner((2.0, 0.0)).linked(None, Some(3)),
        Node::corner((3.0, 0.0)).linked(Some(2), None),
    ];
    connect_nodes(&mut nodes, 0, 2).unwrap();
    assert_eq!(nodes[1].next, Some(0));
    assert_eq!(nodes[0].next, Some(2));
    validate_links(&nodes).unwrap();

    // Both segment tails.
    let mut nodes = vec![
        Node::corner((0.0, 0.0)).linked(None, Some(1)),
        Node::corner((1.0, 0.0)).linked(Some(0), None),
        Node::corner((2.0, 0.0)).linked(None, Some(3)),
        Node::corner((3.0, 0.0)).linked(Some(2), None),
    ];
    connect_nodes(&mut nodes, 1, 3).unwrap();
    assert_eq!(nodes[3].next, Some(1));
    assert_eq!(nodes[1].next, Some(0));
    validate_links(&nodes).unwrap();
}

#[test]
fn connect_fully_linked_nodes_fails() {
    let mut nodes = curve_pair();
    nodes[0].prev = Some(1);
    nodes[1].next = Some(0);
    assert!(connect_nodes(&mut nodes, 0, 1).unwrap_err().is_consistency());
    assert!(connect_nodes(&mut nodes, 0, 0).unwrap_err().is_consistency());
}

#[test]
fn connect_to_splices_after_target_with_successor() {
    let mut nodes = curve_pair();
    let id = insert_node_to_list(&mut nodes, 1, Node::dummy());
    connect_to(&mut nodes, 0, id).unwrap();
    assert_eq!(nodes[0].next, Some(1));
    assert_eq!(nodes[1].next, Some(2));
    validate_links(&nodes).unwrap();

    let id = insert_node_to_list(&mut nodes, 3, Node::dummy());
    connect_to(&mut nodes, 2, id).unwrap();
    assert_eq!(nodes[2].next, Some(3));
    validate_links(&nodes).unwrap();
}

#[test]
fn should_split_is_asymmetric_for_interior_normals() {
    let interior = Node::corner((0.0, 0.0)).linked(Some(1), Some(2));
    let one_differs = Node::corner((0.0, 0.0)).linked(Some(1), Some(5));
    let both_differ = Node::corner((0.0, 0.0)).linked(Some(4), Some(5));
    assert!(!should_split_node(&interior, &one_differs));
    assert!(should_split_node(&interior, &both_differ));

    let marker = Node::dissolved(0.5).linked(Some(1), Some(2));
    assert!(should_split_node(&marker, &one_differs));
    assert!(!should_split_node(&marker, &interior));

    let end = Node::corner((0.0, 0.0)).linked(Some(1), None);
    assert!(should_split_node(&end, &interior));
}

#[test]
fn demote_squeezes_adjacent_dissolved_runs() {
    let mut nodes = with_dissolved(&[0.5]);
    // 0 -> 1(dissolved) -> 2(normal) -> 3(dissolved) -> 4(normal)
    let id = insert_node_to_list(&mut nodes, 3, Node::dissolved(0.5));
    splice_after(&mut nodes, 2, id);
    nodes.push(Node::corner((200.0, 0.0)).linked(Some(3), None));
    nodes[3].next = Some(4);
    validate_links(&nodes).unwrap();

    demote_normal_node(&mut nodes, 2).unwrap();
    assert!(nodes[2].is_dummy());
    assert!((nodes[1].t - 0.25).abs() < 1e-12);
    assert!((nodes[3].t - 0.75).abs() < 1e-12);
}
