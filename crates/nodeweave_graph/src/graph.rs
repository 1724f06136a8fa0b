// SPDX-License-Identifier: MIT OR Apache-2.0
//! Graph data structure containing nodes and links.

use crate::connection::{Link, LinkId, SocketRef};
use crate::node::{Node, NodeId, NodeKindDescriptor};
use crate::port::{Direction, SocketValue, TypeCoercionNotice};
use indexmap::IndexMap;
use std::sync::Arc;

/// An abstract node graph.
///
/// Links are owned jointly by both endpoints: the input socket records its
/// single incoming link and the output socket lists its outgoing links.
/// Every mutation keeps both sides and the link table in sync.
#[derive(Debug, Clone, Default)]
pub struct NodeGraph {
    nodes: IndexMap<NodeId, Node>,
    links: IndexMap<LinkId, Link>,
}

impl NodeGraph {
    /// Create a new empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node of the given kind
    pub fn add_node(&mut self, descriptor: Arc<NodeKindDescriptor>) -> NodeId {
        let node = Node::new(descriptor);
        let id = node.id;
        self.nodes.insert(id, node);
        id
    }

    /// Remove a node and every link touching it
    pub fn remove_node(&mut self, node_id: NodeId) -> Option<Node> {
        let touching: Vec<LinkId> = self
            .links
            .values()
            .filter(|l| l.involves_node(node_id))
            .map(|l| l.id)
            .collect();
        for link in touching {
            self.disconnect(link);
        }
        self.nodes.shift_remove(&node_id)
    }

    /// Get a node by ID
    pub fn node(&self, node_id: NodeId) -> Option<&Node> {
        self.nodes.get(&node_id)
    }

    /// Get a mutable node by ID
    pub fn node_mut(&mut self, node_id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(&node_id)
    }

    /// Check whether the graph holds a node
    pub fn contains(&self, node_id: NodeId) -> bool {
        self.nodes.contains_key(&node_id)
    }

    /// Get all nodes in insertion order
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// Get all node IDs in insertion order
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.keys().copied()
    }

    /// Get the number of nodes
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Link an output socket to an input socket.
    ///
    /// Any link already entering the input is replaced and the input's
    /// literal is cleared.
    pub fn connect(&mut self, from: SocketRef, to: SocketRef) -> Result<LinkId, ConnectionError> {
        self.check_socket(from, Direction::Output)?;
        self.check_socket(to, Direction::Input)?;
        if from.node == to.node {
            return Err(ConnectionError::SelfLoop(from.node));
        }

        self.clear_input(to);

        let link = Link::new(from, to);
        let id = link.id;
        self.links.insert(id, link);
        if let Some(output) = self.nodes.get_mut(&from.node).and_then(|n| n.outputs.get_mut(from.index)) {
            output.links.push(id);
        }
        if let Some(input) = self.nodes.get_mut(&to.node).and_then(|n| n.inputs.get_mut(to.index)) {
            input.link = Some(id);
        }
        Ok(id)
    }

    /// Remove a link from the table and from both endpoints
    pub fn disconnect(&mut self, link_id: LinkId) -> Option<Link> {
        let link = self.links.shift_remove(&link_id)?;
        if let Some(output) = self
            .nodes
            .get_mut(&link.from.node)
            .and_then(|n| n.outputs.get_mut(link.from.index))
        {
            output.links.retain(|l| *l != link_id);
        }
        if let Some(input) = self
            .nodes
            .get_mut(&link.to.node)
            .and_then(|n| n.inputs.get_mut(link.to.index))
        {
            if input.link == Some(link_id) {
                input.link = None;
            }
        }
        Some(link)
    }

    /// Store a literal on an input, dropping any incoming link.
    ///
    /// The value is shaped to the socket's declared type; the returned notice
    /// describes the reshaping when one happened.
    pub fn set_input_value(
        &mut self,
        to: SocketRef,
        value: SocketValue,
    ) -> Result<Option<TypeCoercionNotice>, ConnectionError> {
        self.check_socket(to, Direction::Input)?;
        self.clear_input(to);

        let Some(input) = self.nodes.get_mut(&to.node).and_then(|n| n.inputs.get_mut(to.index)) else {
            return Err(ConnectionError::NodeNotFound(to.node));
        };
        let (value, notice) = value.coerce_to(&input.template.socket_type);
        input.value = Some(value);
        if let Some(notice) = &notice {
            tracing::trace!("{:?} input {}: {}", to.node, to.index, notice);
        }
        Ok(notice)
    }

    /// Store a literal on an output (constant nodes)
    pub fn set_output_value(
        &mut self,
        socket: SocketRef,
        value: SocketValue,
    ) -> Result<Option<TypeCoercionNotice>, ConnectionError> {
        self.check_socket(socket, Direction::Output)?;
        let Some(output) = self
            .nodes
            .get_mut(&socket.node)
            .and_then(|n| n.outputs.get_mut(socket.index))
        else {
            return Err(ConnectionError::NodeNotFound(socket.node));
        };
        let (value, notice) = value.coerce_to(&output.template.socket_type);
        output.value = Some(value);
        Ok(notice)
    }

    /// Get a link by ID
    pub fn link(&self, link_id: LinkId) -> Option<&Link> {
        self.links.get(&link_id)
    }

    /// Get all links
    pub fn links(&self) -> impl Iterator<Item = &Link> {
        self.links.values()
    }

    /// Get the number of links
    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    /// Link entering an input, if any
    pub fn incoming(&self, to: SocketRef) -> Option<&Link> {
        let link_id = self.nodes.get(&to.node)?.inputs.get(to.index)?.link?;
        self.links.get(&link_id)
    }

    /// Nodes feeding the inputs of a node, one entry per linked input
    pub fn input_nodes(&self, node_id: NodeId) -> Vec<NodeId> {
        let Some(node) = self.nodes.get(&node_id) else {
            return Vec::new();
        };
        node.inputs
            .iter()
            .filter_map(|input| input.link)
            .filter_map(|link| self.links.get(&link))
            .map(|link| link.from.node)
            .collect()
    }

    fn clear_input(&mut self, to: SocketRef) {
        let existing = self
            .nodes
            .get(&to.node)
            .and_then(|n| n.inputs.get(to.index))
            .and_then(|input| input.link);
        if let Some(link) = existing {
            self.disconnect(link);
        }
        if let Some(input) = self.nodes.get_mut(&to.node).and_then(|n| n.inputs.get_mut(to.index)) {
            input.value = None;
        }
    }

    fn check_socket(&self, socket: SocketRef, direction: Direction) -> Result<(), ConnectionError> {
        let node = self
            .nodes
            .get(&socket.node)
            .ok_or(ConnectionError::NodeNotFound(socket.node))?;
        let count = match direction {
            Direction::Input => node.inputs.len(),
            Direction::Output => node.outputs.len(),
        };
        if socket.index < count {
            Ok(())
        } else {
            Err(ConnectionError::SocketOutOfRange {
                node: socket.node,
                direction,
                index: socket.index,
            })
        }
    }
}

/// Error when linking sockets or assigning literals
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConnectionError {
    /// Node not found
    #[error("Node not found: {0:?}")]
    NodeNotFound(NodeId),

    /// Socket index out of range
    #[error("Node {node:?} has no {direction:?} socket {index}")]
    SocketOutOfRange {
        /// Node
        node: NodeId,
        /// Socket direction
        direction: Direction,
        /// Requested index
        index: usize,
    },

    /// Self-loop not allowed
    #[error("Self-loop not allowed on {0:?}")]
    SelfLoop(NodeId),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::shader_catalog;

    #[test]
    fn test_link_clears_literal_and_vice_versa() {
        let catalog = shader_catalog();
        let mut graph = NodeGraph::new();
        let value = graph.add_node(catalog.get("Value").unwrap());
        let math = graph.add_node(catalog.get("Math").unwrap());
        let input = SocketRef::new(math, 0);

        graph.set_input_value(input, SocketValue::Float(2.0)).unwrap();
        let link = graph.connect(SocketRef::new(value, 0), input).unwrap();
        let socket = graph.node(math).unwrap().input(0).unwrap();
        assert_eq!(socket.value, None);
        assert_eq!(socket.link, Some(link));

        graph.set_input_value(input, SocketValue::Float(3.0)).unwrap();
        let socket = graph.node(math).unwrap().input(0).unwrap();
        assert_eq!(socket.link, None);
        assert_eq!(socket.value, Some(SocketValue::Float(3.0)));
        assert_eq!(graph.link_count(), 0);
        assert!(graph.node(value).unwrap().output(0).unwrap().links.is_empty());
    }

    #[test]
    fn test_input_holds_one_link_outputs_fan_out() {
        let catalog = shader_catalog();
        let mut graph = NodeGraph::new();
        let a = graph.add_node(catalog.get("Value").unwrap());
        let b = graph.add_node(catalog.get("Value").unwrap());
        let math = graph.add_node(catalog.get("Math").unwrap());

        graph.connect(SocketRef::new(a, 0), SocketRef::new(math, 0)).unwrap();
        graph.connect(SocketRef::new(a, 0), SocketRef::new(math, 1)).unwrap();
        assert_eq!(graph.node(a).unwrap().output(0).unwrap().links.len(), 2);

        graph.connect(SocketRef::new(b, 0), SocketRef::new(math, 0)).unwrap();
        assert_eq!(graph.link_count(), 2);
        assert_eq!(graph.node(a).unwrap().output(0).unwrap().links.len(), 1);
        assert_eq!(graph.incoming(SocketRef::new(math, 0)).unwrap().from.node, b);
    }

    #[test]
    fn test_remove_node_removes_links_from_both_sides() {
        let catalog = shader_catalog();
        let mut graph = NodeGraph::new();
        let a = graph.add_node(catalog.get("Value").unwrap());
        let math = graph.add_node(catalog.get("Math").unwrap());
        graph.connect(SocketRef::new(a, 0), SocketRef::new(math, 0)).unwrap();

        graph.remove_node(math);
        assert_eq!(graph.link_count(), 0);
        assert!(graph.node(a).unwrap().output(0).unwrap().links.is_empty());
    }

    #[test]
    fn test_invalid_connections() {
        let catalog = shader_catalog();
        let mut graph = NodeGraph::new();
        let math = graph.add_node(catalog.get("Math").unwrap());

        assert_eq!(
            graph.connect(SocketRef::new(math, 0), SocketRef::new(math, 1)),
            Err(ConnectionError::SelfLoop(math))
        );
        assert!(matches!(
            graph.connect(SocketRef::new(math, 4), SocketRef::new(NodeId::new(), 0)),
            Err(ConnectionError::SocketOutOfRange { .. })
        ));
    }

    #[test]
    fn test_literal_is_coerced_to_socket_type() {
        let catalog = shader_catalog();
        let mut graph = NodeGraph::new();
        let mix = graph.add_node(catalog.get("MixRGB").unwrap());

        let notice = graph
            .set_input_value(SocketRef::new(mix, 1), SocketValue::Int(5))
            .unwrap();
        assert!(notice.is_some());
        assert_eq!(
            graph.node(mix).unwrap().input(1).unwrap().value,
            Some(SocketValue::Color([5.0, 5.0, 5.0, 5.0]))
        );
    }
}
