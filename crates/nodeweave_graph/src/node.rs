// SPDX-License-Identifier: MIT OR Apache-2.0
//! Node definitions for the graph model.

use crate::connection::LinkId;
use crate::kinds::{FRAME_KIND, GROUP_INPUT_KIND, GROUP_KIND, GROUP_OUTPUT_KIND};
use crate::port::{Direction, SocketTemplate, SocketType, SocketValue};
use indexmap::IndexMap;
use std::sync::Arc;
use uuid::Uuid;

/// Unique identifier for a node.
///
/// Identity is never structural: two nodes with identical configuration get
/// distinct ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub Uuid);

impl NodeId {
    /// Create a new random node ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

/// Special behaviour a node has during materialization
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeRole {
    /// Ordinary node
    Standard,
    /// Declares the inputs of the enclosing group
    GroupInput,
    /// Declares the outputs of the enclosing group
    GroupOutput,
    /// Instance of the named group
    Group(String),
    /// Visual frame
    Frame,
}

impl NodeRole {
    /// Role implied by a host kind name
    pub fn for_kind(kind: &str) -> Self {
        match kind {
            GROUP_INPUT_KIND => Self::GroupInput,
            GROUP_OUTPUT_KIND => Self::GroupOutput,
            GROUP_KIND => Self::Group(String::new()),
            FRAME_KIND => Self::Frame,
            _ => Self::Standard,
        }
    }
}

/// Immutable description of a node kind
#[derive(Debug, Clone, PartialEq)]
pub struct NodeKindDescriptor {
    /// Host kind name (`ShaderNodeMath`)
    pub kind: String,
    /// Short name (`Math`)
    pub name: String,
    /// Input socket templates
    pub inputs: Vec<Arc<SocketTemplate>>,
    /// Output socket templates
    pub outputs: Vec<Arc<SocketTemplate>>,
    /// Configuration fields with their default values
    pub fields: IndexMap<String, SocketValue>,
}

impl NodeKindDescriptor {
    /// Find an input template by name, alias or identifier
    pub fn input(&self, name: &str) -> Option<&Arc<SocketTemplate>> {
        find_template(&self.inputs, Direction::Input, name)
    }

    /// Find an output template by name, alias or identifier
    pub fn output(&self, name: &str) -> Option<&Arc<SocketTemplate>> {
        find_template(&self.outputs, Direction::Output, name)
    }
}

fn find_template<'t>(
    templates: &'t [Arc<SocketTemplate>],
    direction: Direction,
    name: &str,
) -> Option<&'t Arc<SocketTemplate>> {
    templates
        .iter()
        .find(|t| t.name == name)
        .or_else(|| templates.iter().find(|t| t.alias(direction) == name))
        .or_else(|| templates.iter().find(|t| t.identifier == name))
}

/// An input socket: a literal XOR one incoming link
#[derive(Debug, Clone, PartialEq)]
pub struct InputSocket {
    /// Template
    pub template: Arc<SocketTemplate>,
    /// Literal value
    pub value: Option<SocketValue>,
    /// Incoming link
    pub link: Option<LinkId>,
}

impl InputSocket {
    fn new(template: Arc<SocketTemplate>) -> Self {
        Self {
            template,
            value: None,
            link: None,
        }
    }
}

/// An output socket: an optional literal plus any number of outgoing links
#[derive(Debug, Clone, PartialEq)]
pub struct OutputSocket {
    /// Template
    pub template: Arc<SocketTemplate>,
    /// Literal value (constant nodes)
    pub value: Option<SocketValue>,
    /// Outgoing links
    pub links: Vec<LinkId>,
}

impl OutputSocket {
    fn new(template: Arc<SocketTemplate>) -> Self {
        Self {
            template,
            value: None,
            links: Vec::new(),
        }
    }
}

/// A node instance in the abstract graph
#[derive(Debug, Clone)]
pub struct Node {
    /// Unique instance ID
    pub id: NodeId,
    /// Kind description
    pub descriptor: Arc<NodeKindDescriptor>,
    /// Materialization role
    pub role: NodeRole,
    /// Input sockets
    pub inputs: Vec<InputSocket>,
    /// Output sockets
    pub outputs: Vec<OutputSocket>,
    /// Configuration fields
    pub fields: IndexMap<String, SocketValue>,
    /// Enclosing frame
    pub frame: Option<NodeId>,
}

impl Node {
    /// Create a new node from a kind description
    pub fn new(descriptor: Arc<NodeKindDescriptor>) -> Self {
        Self {
            id: NodeId::new(),
            role: NodeRole::for_kind(&descriptor.kind),
            inputs: descriptor.inputs.iter().cloned().map(InputSocket::new).collect(),
            outputs: descriptor.outputs.iter().cloned().map(OutputSocket::new).collect(),
            fields: descriptor.fields.clone(),
            frame: None,
            descriptor,
        }
    }

    /// Host kind name
    pub fn kind(&self) -> &str {
        &self.descriptor.kind
    }

    /// Index of an input by name, positional alias or identifier
    pub fn input_index(&self, name: &str) -> Result<usize, ValidationError> {
        socket_index(self.inputs.iter().map(|s| &*s.template), Direction::Input, name)
            .ok_or_else(|| ValidationError::UnknownSocket {
                kind: self.descriptor.name.clone(),
                direction: Direction::Input,
                name: name.to_string(),
            })
    }

    /// Index of an output by name, positional alias or identifier
    pub fn output_index(&self, name: &str) -> Result<usize, ValidationError> {
        socket_index(self.outputs.iter().map(|s| &*s.template), Direction::Output, name)
            .ok_or_else(|| ValidationError::UnknownSocket {
                kind: self.descriptor.name.clone(),
                direction: Direction::Output,
                name: name.to_string(),
            })
    }

    /// Get an input socket by index
    pub fn input(&self, index: usize) -> Option<&InputSocket> {
        self.inputs.get(index)
    }

    /// Get an output socket by index
    pub fn output(&self, index: usize) -> Option<&OutputSocket> {
        self.outputs.get(index)
    }

    /// Get a configuration field
    pub fn field(&self, name: &str) -> Option<&SocketValue> {
        self.fields.get(name)
    }

    /// Set a configuration field; unknown names are rejected
    pub fn set_field(&mut self, name: &str, value: impl Into<SocketValue>) -> Result<(), ValidationError> {
        match self.fields.get_mut(name) {
            Some(slot) => {
                *slot = value.into();
                Ok(())
            }
            None => Err(ValidationError::UnknownField {
                kind: self.descriptor.name.clone(),
                field: name.to_string(),
            }),
        }
    }

    /// Append a socket to a group input or group output node.
    ///
    /// Group input nodes grow outputs, group output nodes grow inputs.
    pub fn push_interface_socket(
        &mut self,
        identifier: &str,
        socket_type: SocketType,
        default: Option<SocketValue>,
        min: Option<f32>,
        max: Option<f32>,
    ) -> Result<usize, ValidationError> {
        let direction = match self.role {
            NodeRole::GroupInput => Direction::Output,
            NodeRole::GroupOutput => Direction::Input,
            _ => {
                return Err(ValidationError::NotAGroupInterface {
                    kind: self.descriptor.name.clone(),
                })
            }
        };

        let index = match direction {
            Direction::Input => self.inputs.len(),
            Direction::Output => self.outputs.len(),
        };
        let mut template = SocketTemplate::new(index, identifier, socket_type).with_range(min, max);
        template.default = default;
        let template = Arc::new(template);

        match direction {
            Direction::Input => self.inputs.push(InputSocket::new(template)),
            Direction::Output => self.outputs.push(OutputSocket::new(template)),
        }
        Ok(index)
    }
}

fn socket_index<'t>(
    templates: impl Iterator<Item = &'t SocketTemplate> + Clone,
    direction: Direction,
    name: &str,
) -> Option<usize> {
    templates
        .clone()
        .position(|t| t.name == name)
        .or_else(|| templates.clone().position(|t| t.alias(direction) == name))
        .or_else(|| templates.clone().position(|t| t.identifier == name))
}

/// Error when addressing sockets or fields that do not exist
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    /// Socket name not found on the node
    #[error("{kind} has no {direction:?} socket named {name}")]
    UnknownSocket {
        /// Node kind
        kind: String,
        /// Socket direction
        direction: Direction,
        /// Requested name
        name: String,
    },

    /// Field name not found on the node
    #[error("{kind} has no field named {field}")]
    UnknownField {
        /// Node kind
        kind: String,
        /// Requested field
        field: String,
    },

    /// Interface sockets can only be added to group input/output nodes
    #[error("{kind} is not a group input or group output node")]
    NotAGroupInterface {
        /// Node kind
        kind: String,
    },

    /// Node is not part of the graph
    #[error("Node not found: {0:?}")]
    UnknownNode(NodeId),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn math_descriptor() -> Arc<NodeKindDescriptor> {
        let mut inputs = vec![
            SocketTemplate::new(0, "Value", SocketType::Value),
            SocketTemplate::new(1, "Value", SocketType::Value),
        ];
        crate::port::dedupe_names(&mut inputs);
        Arc::new(NodeKindDescriptor {
            kind: "ShaderNodeMath".to_string(),
            name: "Math".to_string(),
            inputs: inputs.into_iter().map(Arc::new).collect(),
            outputs: vec![Arc::new(SocketTemplate::new(0, "Value", SocketType::Value))],
            fields: [("operation".to_string(), SocketValue::from("ADD"))].into_iter().collect(),
        })
    }

    #[test]
    fn test_node_identity_is_not_structural() {
        let descriptor = math_descriptor();
        let a = Node::new(descriptor.clone());
        let b = Node::new(descriptor);
        assert_ne!(a.id, b.id);
        assert_eq!(a.fields, b.fields);
    }

    #[test]
    fn test_socket_lookup() {
        let node = Node::new(math_descriptor());
        assert_eq!(node.input_index("value2").unwrap(), 1);
        assert_eq!(node.input_index("i0").unwrap(), 0);
        assert_eq!(node.input_index("Value").unwrap(), 0);
        assert_eq!(node.output_index("o0").unwrap(), 0);
        assert!(matches!(
            node.input_index("fac"),
            Err(ValidationError::UnknownSocket { .. })
        ));
    }

    #[test]
    fn test_set_field_rejects_unknown() {
        let mut node = Node::new(math_descriptor());
        node.set_field("operation", "POWER").unwrap();
        assert_eq!(node.field("operation"), Some(&SocketValue::from("POWER")));
        assert!(node.set_field("blend_type", "MIX").is_err());
    }

    #[test]
    fn test_interface_sockets_only_on_group_io() {
        let mut node = Node::new(math_descriptor());
        assert!(node
            .push_interface_socket("Amount", SocketType::Value, None, None, None)
            .is_err());
    }
}
