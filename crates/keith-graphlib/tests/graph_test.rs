use keith_graphlib::{Graph, alg};

fn edge<N: Default + 'static, E: Default + 'static>(g: &mut Graph<N, E>, v: &str, w: &str) {
    g.set_edge_named(v, w, None::<&str>, None);
}

#[test]
fn set_edge_creates_missing_endpoints_with_default_labels() {
    let mut g: Graph<i32, ()> = Graph::default();
    g.set_node("a", 7);
    edge(&mut g, "a", "b");

    assert_eq!(g.node_count(), 2);
    assert_eq!(g.node("a"), Some(&7));
    assert_eq!(g.node("b"), Some(&0));
    assert!(g.has_edge("a", "b", None));
    assert!(!g.has_edge("b", "a", None));
}

#[test]
fn parallel_edges_are_kept_apart_by_name() {
    let mut g: Graph<(), &'static str> = Graph::new();
    g.set_edge_named("a", "b", Some("e1"), Some("first"));
    g.set_edge_named("a", "b", Some("e2"), Some("second"));
    g.set_edge_named("a", "b", Some("e1"), Some("relabelled"));

    assert_eq!(g.edge_count(), 2);
    assert_eq!(g.edge("a", "b", Some("e1")), Some(&"relabelled"));
    assert_eq!(g.edge("a", "b", Some("e2")), Some(&"second"));
    assert_eq!(g.edge("a", "b", None), None);
    assert_eq!(g.out_edges("a", Some("b")).len(), 2);
}

#[test]
fn neighbors_cover_both_directions_without_duplicates() {
    let mut g: Graph<(), ()> = Graph::default();
    edge(&mut g, "a", "b");
    edge(&mut g, "c", "a");
    g.set_edge_named("a", "b", Some("again"), None);

    let mut n = g.neighbors("a");
    n.sort();
    assert_eq!(n, vec!["b", "c"]);
    assert!(g.is_adjacent("a", "c"));
    assert!(g.is_adjacent("c", "a"));
    assert!(!g.is_adjacent("b", "c"));
    assert!(!g.is_adjacent("a", "missing"));
}

#[test]
fn adjacency_is_rebuilt_after_mutation() {
    let mut g: Graph<(), ()> = Graph::default();
    edge(&mut g, "a", "b");
    assert_eq!(g.successors("a"), vec!["b"]);
    assert!(!g.is_adjacent("a", "c"));

    edge(&mut g, "a", "c");
    assert_eq!(g.successors("a"), vec!["b", "c"]);
    assert_eq!(g.predecessors("c"), vec!["a"]);
    assert!(g.is_adjacent("c", "a"));
}

#[test]
fn self_loops_make_a_node_adjacent_to_itself() {
    let mut g: Graph<(), ()> = Graph::default();
    edge(&mut g, "a", "a");
    edge(&mut g, "a", "b");

    assert!(g.is_adjacent("a", "a"));
    assert!(!g.is_adjacent("b", "b"));
    let mut n = g.neighbors("a");
    n.sort();
    assert_eq!(n, vec!["a", "b"]);
}

#[test]
fn find_cycles_reports_components_and_self_loops() {
    let mut g: Graph<(), ()> = Graph::default();
    edge(&mut g, "a", "b");
    edge(&mut g, "b", "c");
    edge(&mut g, "c", "a");
    edge(&mut g, "c", "d");
    edge(&mut g, "e", "e");

    let cycles = alg::find_cycles(&g);
    assert_eq!(
        cycles,
        vec![
            vec!["a".to_string(), "b".to_string(), "c".to_string()],
            vec!["e".to_string()],
        ]
    );

    let sccs = alg::strongly_connected_components(&g);
    assert_eq!(sccs.len(), 3);
    assert!(sccs.contains(&vec!["d".to_string()]));
}
