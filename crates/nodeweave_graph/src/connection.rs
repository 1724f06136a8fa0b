// SPDX-License-Identifier: MIT OR Apache-2.0
//! Link (edge) definitions for the graph.

use crate::node::NodeId;
use uuid::Uuid;

/// Unique identifier for a link
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LinkId(pub Uuid);

impl LinkId {
    /// Create a new random link ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for LinkId {
    fn default() -> Self {
        Self::new()
    }
}

/// Address of a socket: owning node plus template index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SocketRef {
    /// Owning node
    pub node: NodeId,
    /// Socket index within the node's inputs or outputs
    pub index: usize,
}

impl SocketRef {
    /// Create a socket reference
    pub fn new(node: NodeId, index: usize) -> Self {
        Self { node, index }
    }
}

/// A directed link from an output socket to an input socket
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Link {
    /// Unique link ID
    pub id: LinkId,
    /// Source output
    pub from: SocketRef,
    /// Destination input
    pub to: SocketRef,
}

impl Link {
    /// Create a new link
    pub fn new(from: SocketRef, to: SocketRef) -> Self {
        Self {
            id: LinkId::new(),
            from,
            to,
        }
    }

    /// Check if this link involves a specific node
    pub fn involves_node(&self, node_id: NodeId) -> bool {
        self.from.node == node_id || self.to.node == node_id
    }
}
