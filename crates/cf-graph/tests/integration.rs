use cf_core::{BaseType, Causality, Variable};
use cf_graph::{DirectedGraph, strongly_connected_components};

fn var(inst: &str, name: &str, causality: Causality) -> Variable {
    Variable::new(inst, name, 0, causality, BaseType::Real)
}

/// Components in a ring, each with direct feedthrough u -> y.
fn ring(n: usize) -> DirectedGraph {
    let mut g = DirectedGraph::new();
    for i in 0..n {
        let inst = format!("C{i}");
        let next = format!("C{}", (i + 1) % n);
        g.add_edge(
            &var(&inst, "u", Causality::Input),
            &var(&inst, "y", Causality::Output),
        );
        g.add_edge(
            &var(&inst, "y", Causality::Output),
            &var(&next, "u", Causality::Input),
        );
    }
    g
}

#[test]
fn ring_is_one_loop() {
    let g = ring(3);
    let plan = g.sorted_connections();
    assert_eq!(plan.len(), 1);
    assert_eq!(plan[0].len(), 3);
    assert!(plan[0].is_loop());
    assert!(plan[0].to_string().starts_with('{'));
}

#[test]
fn breaking_feedthrough_breaks_loop() {
    // C0 has no u -> y dependency, so the ring opens up at C0.
    let mut g = DirectedGraph::new();
    for i in 0..3 {
        let inst = format!("C{i}");
        let next = format!("C{}", (i + 1) % 3);
        if i != 0 {
            g.add_edge(
                &var(&inst, "u", Causality::Input),
                &var(&inst, "y", Causality::Output),
            );
        }
        g.add_edge(
            &var(&inst, "y", Causality::Output),
            &var(&next, "u", Causality::Input),
        );
    }
    let plan = g.sorted_connections();
    assert_eq!(plan.len(), 3);
    assert!(plan.iter().all(|grp| !grp.is_loop()));
    let order: Vec<String> = plan
        .iter()
        .map(|grp| grp.connections()[0].output.to_string())
        .collect();
    assert_eq!(order, vec!["C0.y", "C1.y", "C2.y"]);
}

#[test]
fn merged_instance_graphs_keep_private_edges() {
    let mut a = DirectedGraph::new();
    a.add_edge(
        &var("A", "u", Causality::Input),
        &var("A", "y", Causality::Output),
    );
    let mut b = DirectedGraph::new();
    b.add_edge(
        &var("B", "u", Causality::Input),
        &var("B", "y", Causality::Output),
    );

    let mut composite = DirectedGraph::new();
    composite.include_graph(&a);
    composite.include_graph(&b);
    composite.add_edge(
        &var("A", "y", Causality::Output),
        &var("B", "u", Causality::Input),
    );
    composite.add_edge(
        &var("B", "y", Causality::Output),
        &var("A", "u", Causality::Input),
    );

    assert_eq!(composite.len(), 4);
    assert_eq!(composite.edges().len(), 4);
    assert!(composite.sorted_connections()[0].is_loop());
}

mod proptests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::BTreeSet;

    fn adjacency(n: usize, edges: &[(usize, usize)]) -> Vec<Vec<usize>> {
        let mut adj = vec![Vec::new(); n];
        for &(a, b) in edges {
            let (a, b) = (a % n, b % n);
            if !adj[a].contains(&b) {
                adj[a].push(b);
            }
        }
        adj
    }

    proptest! {
        #[test]
        fn components_match_petgraph(
            n in 1usize..24,
            edges in prop::collection::vec((0usize..24, 0usize..24), 0..60),
        ) {
            let adj = adjacency(n, &edges);
            let ours: BTreeSet<Vec<usize>> =
                strongly_connected_components(&adj).into_iter().collect();

            let mut pg = petgraph::graph::DiGraph::<(), ()>::new();
            let ids: Vec<_> = (0..n).map(|_| pg.add_node(())).collect();
            for (a, succ) in adj.iter().enumerate() {
                for &b in succ {
                    pg.add_edge(ids[a], ids[b], ());
                }
            }
            let theirs: BTreeSet<Vec<usize>> = petgraph::algo::tarjan_scc(&pg)
                .into_iter()
                .map(|c| {
                    let mut v: Vec<usize> = c.into_iter().map(|i| i.index()).collect();
                    v.sort_unstable();
                    v
                })
                .collect();

            prop_assert_eq!(ours, theirs);
        }

        #[test]
        fn components_are_topologically_ordered(
            n in 1usize..24,
            edges in prop::collection::vec((0usize..24, 0usize..24), 0..60),
        ) {
            let adj = adjacency(n, &edges);
            let sccs = strongly_connected_components(&adj);
            let mut position = vec![0usize; n];
            for (k, comp) in sccs.iter().enumerate() {
                for &v in comp {
                    position[v] = k;
                }
            }
            for (a, succ) in adj.iter().enumerate() {
                for &b in succ {
                    prop_assert!(position[a] <= position[b]);
                }
            }
        }

        #[test]
        fn plan_is_deterministic(
            edges in prop::collection::vec((0usize..6, 0usize..6), 0..20),
        ) {
            let build = || {
                let mut g = DirectedGraph::new();
                for &(a, b) in &edges {
                    g.add_edge(
                        &var(&format!("C{a}"), "y", Causality::Output),
                        &var(&format!("C{b}"), "u", Causality::Input),
                    );
                    g.add_edge(
                        &var(&format!("C{b}"), "u", Causality::Input),
                        &var(&format!("C{b}"), "y", Causality::Output),
                    );
                }
                g
            };
            let g = build();
            let first = g.sorted_connections().to_vec();
            prop_assert_eq!(&first, &g.sorted_connections().to_vec());
            prop_assert_eq!(&first, &build().sorted_connections().to_vec());
        }
    }
}
