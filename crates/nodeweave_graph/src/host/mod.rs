// SPDX-License-Identifier: MIT OR Apache-2.0
//! The graph host contract.
//!
//! A host owns the native node-graph containers that abstract graphs are
//! materialized into. The engine drives it through [`GraphHost`]:
//! - catalog discovery (`enumerate_node_kinds`, `describe_node_kind`)
//! - container resolution and clearing
//! - node, property, interface and link creation
//! - layout accessors (sizes, live links, locations)

pub mod memory;

use crate::port::{Direction, SocketTemplate, SocketValue};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::hash::Hash;

pub use memory::MemoryHost;

/// Kind of container a graph is materialized into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContainerKind {
    /// Top-level container (a material's node tree)
    TopLevel,
    /// Reusable sub-graph
    Group,
}

/// Raw socket description as reported by the host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawSocket {
    /// Host-facing name
    pub identifier: String,
    /// Host type name (`VALUE`, `VECTOR`, `RGBA`, ...)
    pub socket_type: String,
    /// Default value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<SocketValue>,
    /// Minimum value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f32>,
    /// Maximum value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f32>,
}

impl RawSocket {
    /// Create a raw socket without default or range
    pub fn new(identifier: impl Into<String>, socket_type: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            socket_type: socket_type.into(),
            default: None,
            min: None,
            max: None,
        }
    }

    /// Set the default value
    pub fn with_default(mut self, value: impl Into<SocketValue>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Set the value range
    pub fn with_range(mut self, min: f32, max: f32) -> Self {
        self.min = Some(min);
        self.max = Some(max);
        self
    }
}

/// Raw description of a native node kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawNodeKind {
    /// Host kind name (`ShaderNodeMath`, ...)
    pub kind: String,
    /// Ordered input sockets
    #[serde(default)]
    pub inputs: Vec<RawSocket>,
    /// Ordered output sockets
    #[serde(default)]
    pub outputs: Vec<RawSocket>,
    /// Configuration fields and their defaults
    #[serde(default)]
    pub fields: IndexMap<String, SocketValue>,
}

impl RawNodeKind {
    /// Create an empty kind description
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            inputs: Vec::new(),
            outputs: Vec::new(),
            fields: IndexMap::new(),
        }
    }
}

/// A live link leaving a host node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HostLink<N> {
    /// Node the link enters
    pub to_node: N,
    /// Index of the input socket the link enters
    pub to_socket: usize,
}

/// Error reported by a graph host
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum HostError {
    /// Node kind not known to the host
    #[error("Unknown node kind: {0}")]
    UnknownKind(String),

    /// Container not found
    #[error("Unknown container: {0}")]
    UnknownContainer(String),

    /// Node handle does not refer to a live node
    #[error("Invalid node handle: {0}")]
    InvalidHandle(String),

    /// Socket index out of range
    #[error("{direction:?} socket {index} out of range ({count} sockets)")]
    SocketOutOfRange {
        /// Socket direction
        direction: Direction,
        /// Requested index
        index: usize,
        /// Number of sockets on the node
        count: usize,
    },

    /// Property not present on the node
    #[error("Node kind {kind} has no property {property}")]
    UnknownProperty {
        /// Node kind
        kind: String,
        /// Property name
        property: String,
    },

    /// Value cannot be stored in the property or socket
    #[error("Cannot store {found} value in {target} (expects {expected})")]
    IncompatibleValue {
        /// Property or socket name
        target: String,
        /// Expected value kind
        expected: String,
        /// Provided value kind
        found: String,
    },

    /// Host refused the operation
    #[error("{0}")]
    Rejected(String),
}

/// Native node-graph host driven by the generator and layout engine
pub trait GraphHost {
    /// Handle to a container
    type Container: Copy + Eq + Hash + Debug;
    /// Handle to a native node
    type NodeHandle: Copy + Eq + Hash + Debug;

    // ------------------------------------------------------------------
    // Catalog discovery
    // ------------------------------------------------------------------

    /// All node kinds the host can instantiate
    fn enumerate_node_kinds(&self) -> Vec<String>;

    /// Ordered sockets and configuration fields of a node kind
    fn describe_node_kind(&self, kind: &str) -> Result<RawNodeKind, HostError>;

    // ------------------------------------------------------------------
    // Containers
    // ------------------------------------------------------------------

    /// Look up a container by name
    fn find_container(&self, kind: ContainerKind, name: &str) -> Option<Self::Container>;

    /// Create an empty container
    fn create_container(&mut self, kind: ContainerKind, name: &str) -> Result<Self::Container, HostError>;

    /// Remove every node and link from a container
    fn clear_container(&mut self, container: Self::Container) -> Result<(), HostError>;

    /// Remove every interface socket from a group container
    fn clear_interface(&mut self, container: Self::Container) -> Result<(), HostError>;

    /// Nodes currently held by a container
    fn container_nodes(&self, container: Self::Container) -> Result<Vec<Self::NodeHandle>, HostError>;

    /// Find a container by name, creating it when absent
    fn get_or_create_container(
        &mut self,
        kind: ContainerKind,
        name: &str,
    ) -> Result<Self::Container, HostError> {
        match self.find_container(kind, name) {
            Some(container) => Ok(container),
            None => self.create_container(kind, name),
        }
    }

    // ------------------------------------------------------------------
    // Construction
    // ------------------------------------------------------------------

    /// Instantiate a native node; fails for unknown kinds
    fn create_node(&mut self, container: Self::Container, kind: &str) -> Result<Self::NodeHandle, HostError>;

    /// Copy a configuration field onto a node
    fn set_property(&mut self, node: Self::NodeHandle, field: &str, value: &SocketValue) -> Result<(), HostError>;

    /// Store a literal on a node socket
    fn set_socket_default(
        &mut self,
        node: Self::NodeHandle,
        direction: Direction,
        index: usize,
        value: &SocketValue,
    ) -> Result<(), HostError>;

    /// Declare a group interface socket
    fn declare_interface_socket(
        &mut self,
        container: Self::Container,
        direction: Direction,
        socket: &SocketTemplate,
    ) -> Result<(), HostError>;

    /// Link an output socket to an input socket
    fn create_link(
        &mut self,
        container: Self::Container,
        from: Self::NodeHandle,
        from_socket: usize,
        to: Self::NodeHandle,
        to_socket: usize,
    ) -> Result<(), HostError>;

    /// Place a node inside a frame
    fn set_parent(&mut self, node: Self::NodeHandle, parent: Self::NodeHandle) -> Result<(), HostError>;

    // ------------------------------------------------------------------
    // Layout
    // ------------------------------------------------------------------

    /// Width and height of a node
    fn node_size(&self, node: Self::NodeHandle) -> Result<[f32; 2], HostError>;

    /// Links leaving any output of a node
    fn outgoing_links(&self, node: Self::NodeHandle) -> Result<Vec<HostLink<Self::NodeHandle>>, HostError>;

    /// Move a node
    fn set_location(&mut self, node: Self::NodeHandle, location: [f32; 2]) -> Result<(), HostError>;

    /// Collapse or expand a node
    fn set_hidden(&mut self, node: Self::NodeHandle, hidden: bool) -> Result<(), HostError>;
}
