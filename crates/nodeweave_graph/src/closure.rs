// SPDX-License-Identifier: MIT OR Apache-2.0
//! Dependency closure: the ancestor set backing a set of nodes.

use crate::graph::NodeGraph;
use crate::node::NodeId;
use indexmap::IndexSet;

/// Compute the nodes required to materialize `roots`.
///
/// The result holds every root plus every node reachable by following input
/// links backwards. Expansion only visits nodes not already collected, so the
/// traversal terminates even if the graph contains a cycle. Roots come first
/// in the order given, followed by ancestors in discovery order. Ids not
/// present in the graph are skipped.
pub fn closure(graph: &NodeGraph, roots: impl IntoIterator<Item = NodeId>) -> IndexSet<NodeId> {
    let mut collected: IndexSet<NodeId> = roots
        .into_iter()
        .filter(|id| graph.contains(*id))
        .collect();

    let mut frontier: Vec<NodeId> = collected.iter().copied().collect();
    while !frontier.is_empty() {
        let mut next = Vec::new();
        for node in frontier {
            for parent in graph.input_nodes(node) {
                if collected.insert(parent) {
                    next.push(parent);
                }
            }
        }
        frontier = next;
    }

    collected
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::SocketRef;
    use crate::test_support::shader_catalog;
    use proptest::prelude::*;

    /// A → B → C, each feeding input 0 of the next
    fn chain() -> (NodeGraph, NodeId, NodeId, NodeId) {
        let catalog = shader_catalog();
        let mut graph = NodeGraph::new();
        let a = graph.add_node(catalog.get("Math").unwrap());
        let b = graph.add_node(catalog.get("Math").unwrap());
        let c = graph.add_node(catalog.get("Math").unwrap());
        graph.connect(SocketRef::new(a, 0), SocketRef::new(b, 0)).unwrap();
        graph.connect(SocketRef::new(b, 0), SocketRef::new(c, 0)).unwrap();
        (graph, a, b, c)
    }

    #[test]
    fn test_chain_closure() {
        let (graph, a, b, c) = chain();

        let from_c = closure(&graph, [c]);
        assert_eq!(from_c.len(), 3);
        assert!(from_c.contains(&a) && from_c.contains(&b) && from_c.contains(&c));

        let from_b = closure(&graph, [b]);
        assert_eq!(from_b, [b, a].into_iter().collect::<IndexSet<_>>());
    }

    #[test]
    fn test_roots_come_first() {
        let (graph, a, b, c) = chain();
        let result: Vec<_> = closure(&graph, [c, b]).into_iter().collect();
        assert_eq!(result, vec![c, b, a]);
    }

    #[test]
    fn test_diamond_visits_shared_ancestor_once() {
        let catalog = shader_catalog();
        let mut graph = NodeGraph::new();
        let source = graph.add_node(catalog.get("Value").unwrap());
        let left = graph.add_node(catalog.get("Math").unwrap());
        let right = graph.add_node(catalog.get("Math").unwrap());
        let sink = graph.add_node(catalog.get("Math").unwrap());
        graph.connect(SocketRef::new(source, 0), SocketRef::new(left, 0)).unwrap();
        graph.connect(SocketRef::new(source, 0), SocketRef::new(right, 0)).unwrap();
        graph.connect(SocketRef::new(left, 0), SocketRef::new(sink, 0)).unwrap();
        graph.connect(SocketRef::new(right, 0), SocketRef::new(sink, 1)).unwrap();

        assert_eq!(closure(&graph, [sink]).len(), 4);
    }

    #[test]
    fn test_cycle_terminates() {
        let catalog = shader_catalog();
        let mut graph = NodeGraph::new();
        let a = graph.add_node(catalog.get("Math").unwrap());
        let b = graph.add_node(catalog.get("Math").unwrap());
        graph.connect(SocketRef::new(a, 0), SocketRef::new(b, 0)).unwrap();
        graph.connect(SocketRef::new(b, 0), SocketRef::new(a, 0)).unwrap();

        assert_eq!(closure(&graph, [a]).len(), 2);
    }

    #[test]
    fn test_unknown_roots_are_skipped() {
        let (graph, ..) = chain();
        assert!(closure(&graph, [NodeId::new()]).is_empty());
    }

    /// Random DAG: node `i` may only read from nodes `< i`
    fn random_dag() -> impl Strategy<Value = (usize, Vec<(usize, usize, usize)>, Vec<usize>)> {
        (2usize..12).prop_flat_map(|n| {
            let edges = prop::collection::vec((1..n, 0..n, 0usize..3), 0..(2 * n));
            let roots = prop::collection::vec(0..n, 1..4);
            (Just(n), edges, roots)
        })
    }

    fn build(n: usize, edges: &[(usize, usize, usize)]) -> (NodeGraph, Vec<NodeId>) {
        let catalog = shader_catalog();
        let mut graph = NodeGraph::new();
        let ids: Vec<NodeId> = (0..n).map(|_| graph.add_node(catalog.get("Math").unwrap())).collect();
        for &(to, from, socket) in edges {
            let from = from % to;
            graph
                .connect(SocketRef::new(ids[from], 0), SocketRef::new(ids[to], socket))
                .unwrap();
        }
        (graph, ids)
    }

    proptest! {
        #[test]
        fn test_closure_is_monotone_and_idempotent((n, edges, roots) in random_dag()) {
            let (graph, ids) = build(n, &edges);
            let roots: Vec<NodeId> = roots.into_iter().map(|i| ids[i]).collect();

            let once = closure(&graph, roots.iter().copied());
            for root in &roots {
                prop_assert!(once.contains(root));
            }

            let twice = closure(&graph, once.iter().copied());
            prop_assert_eq!(once.len(), twice.len());
            prop_assert!(twice.iter().all(|id| once.contains(id)));
        }
    }
}
