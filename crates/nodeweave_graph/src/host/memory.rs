// SPDX-License-Identifier: MIT OR Apache-2.0
//! In-memory graph host.
//!
//! Keeps containers, nodes and links in plain maps and validates every
//! mutation the way a native host would: unknown kinds, properties and
//! socket indices are rejected, links into an already linked input replace
//! the previous link, and group nodes pick up their sockets from the group
//! container they are bound to.

use crate::host::{ContainerKind, GraphHost, HostError, HostLink, RawNodeKind};
use crate::kinds::{GROUP_INPUT_KIND, GROUP_KIND, GROUP_OUTPUT_KIND, LABEL_FIELD, NODE_TREE_FIELD};
use crate::port::{Direction, SocketTemplate, SocketType, SocketValue};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Default node width
pub const DEFAULT_NODE_WIDTH: f32 = 140.0;
/// Height of a node without sockets
const BASE_NODE_HEIGHT: f32 = 40.0;
/// Height added per socket
const SOCKET_HEIGHT: f32 = 22.0;

/// Handle to an in-memory container
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContainerId(pub u32);

/// Handle to an in-memory node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HostNodeId(pub u32);

/// A socket on an in-memory node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemorySocket {
    /// Host-facing name
    pub identifier: String,
    /// Socket type
    pub socket_type: SocketType,
    /// Current literal
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<SocketValue>,
}

/// A native node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryNode {
    /// Host kind name
    pub kind: String,
    /// Owning container
    pub container: ContainerId,
    /// Configuration properties
    pub properties: IndexMap<String, SocketValue>,
    /// Input sockets (empty for group pseudo-nodes, see `socket_count`)
    pub inputs: Vec<MemorySocket>,
    /// Output sockets
    pub outputs: Vec<MemorySocket>,
    /// Location in the editor
    pub location: [f32; 2],
    /// Width and height
    pub size: [f32; 2],
    /// Whether the node is collapsed
    pub hidden: bool,
    /// Enclosing frame
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<HostNodeId>,
}

/// A native link
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryLink {
    /// Source node
    pub from_node: HostNodeId,
    /// Source output index
    pub from_socket: usize,
    /// Destination node
    pub to_node: HostNodeId,
    /// Destination input index
    pub to_socket: usize,
}

/// A native container
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryContainer {
    /// Container name
    pub name: String,
    /// Container kind
    pub kind: ContainerKind,
    /// Nodes in creation order
    pub nodes: Vec<HostNodeId>,
    /// Links in creation order
    pub links: Vec<MemoryLink>,
    /// Group inputs
    #[serde(default)]
    pub interface_inputs: Vec<SocketTemplate>,
    /// Group outputs
    #[serde(default)]
    pub interface_outputs: Vec<SocketTemplate>,
}

/// In-memory [`GraphHost`]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemoryHost {
    kinds: IndexMap<String, RawNodeKind>,
    containers: IndexMap<ContainerId, MemoryContainer>,
    nodes: IndexMap<HostNodeId, MemoryNode>,
    next_id: u32,
}

impl MemoryHost {
    /// Create a host with no node kinds
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a host offering the given node kinds
    pub fn with_kinds(kinds: impl IntoIterator<Item = RawNodeKind>) -> Self {
        let mut host = Self::new();
        for kind in kinds {
            host.register_kind(kind);
        }
        host
    }

    /// Offer an additional node kind
    pub fn register_kind(&mut self, kind: RawNodeKind) {
        self.kinds.insert(kind.kind.clone(), kind);
    }

    /// Get a container
    pub fn container(&self, container: ContainerId) -> Option<&MemoryContainer> {
        self.containers.get(&container)
    }

    /// Get a container by name
    pub fn container_by_name(&self, kind: ContainerKind, name: &str) -> Option<&MemoryContainer> {
        self.find_container(kind, name).and_then(|id| self.containers.get(&id))
    }

    /// Get a node
    pub fn node(&self, node: HostNodeId) -> Option<&MemoryNode> {
        self.nodes.get(&node)
    }

    /// Number of nodes in a container
    pub fn node_count(&self, container: ContainerId) -> usize {
        self.containers.get(&container).map_or(0, |c| c.nodes.len())
    }

    /// Number of links in a container
    pub fn link_count(&self, container: ContainerId) -> usize {
        self.containers.get(&container).map_or(0, |c| c.links.len())
    }

    /// Nodes of one kind in a container, in creation order
    pub fn nodes_of_kind(&self, container: ContainerId, kind: &str) -> Vec<HostNodeId> {
        self.containers.get(&container).map_or_else(Vec::new, |c| {
            c.nodes
                .iter()
                .copied()
                .filter(|id| self.nodes.get(id).is_some_and(|n| n.kind == kind))
                .collect()
        })
    }

    /// Override a node's size
    pub fn set_node_size(&mut self, node: HostNodeId, size: [f32; 2]) -> Result<(), HostError> {
        self.node_mut(node)?.size = size;
        Ok(())
    }

    /// Number of sockets on a node, including group interface sockets
    pub fn socket_count(&self, node: HostNodeId, direction: Direction) -> Result<usize, HostError> {
        let memory_node = self.node_ref(node)?;
        let container = self.container_ref(memory_node.container)?;
        Ok(match (memory_node.kind.as_str(), direction) {
            (GROUP_INPUT_KIND, Direction::Output) => container.interface_inputs.len(),
            (GROUP_OUTPUT_KIND, Direction::Input) => container.interface_outputs.len(),
            (_, Direction::Input) => memory_node.inputs.len(),
            (_, Direction::Output) => memory_node.outputs.len(),
        })
    }

    fn allocate_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn node_ref(&self, node: HostNodeId) -> Result<&MemoryNode, HostError> {
        self.nodes
            .get(&node)
            .ok_or_else(|| HostError::InvalidHandle(format!("{node:?}")))
    }

    fn node_mut(&mut self, node: HostNodeId) -> Result<&mut MemoryNode, HostError> {
        self.nodes
            .get_mut(&node)
            .ok_or_else(|| HostError::InvalidHandle(format!("{node:?}")))
    }

    fn container_ref(&self, container: ContainerId) -> Result<&MemoryContainer, HostError> {
        self.containers
            .get(&container)
            .ok_or_else(|| HostError::UnknownContainer(format!("{container:?}")))
    }

    fn container_mut(&mut self, container: ContainerId) -> Result<&mut MemoryContainer, HostError> {
        self.containers
            .get_mut(&container)
            .ok_or_else(|| HostError::UnknownContainer(format!("{container:?}")))
    }

    fn check_socket(&self, node: HostNodeId, direction: Direction, index: usize) -> Result<(), HostError> {
        let count = self.socket_count(node, direction)?;
        if index < count {
            Ok(())
        } else {
            Err(HostError::SocketOutOfRange { direction, index, count })
        }
    }

    /// Bind a group instance to a group container, copying its interface
    fn bind_group(&mut self, node: HostNodeId, tree: &str) -> Result<(), HostError> {
        let group = self
            .container_by_name(ContainerKind::Group, tree)
            .ok_or_else(|| HostError::UnknownContainer(tree.to_string()))?;
        let inputs = group.interface_inputs.iter().map(interface_socket).collect();
        let outputs = group.interface_outputs.iter().map(interface_socket).collect();

        let memory_node = self.node_mut(node)?;
        memory_node.inputs = inputs;
        memory_node.outputs = outputs;
        memory_node.size[1] = node_height(memory_node.inputs.len() + memory_node.outputs.len());
        Ok(())
    }
}

fn interface_socket(template: &SocketTemplate) -> MemorySocket {
    MemorySocket {
        identifier: template.identifier.clone(),
        socket_type: template.socket_type.clone(),
        default: template.default.clone(),
    }
}

fn node_height(sockets: usize) -> f32 {
    BASE_NODE_HEIGHT + SOCKET_HEIGHT * sockets as f32
}

impl GraphHost for MemoryHost {
    type Container = ContainerId;
    type NodeHandle = HostNodeId;

    fn enumerate_node_kinds(&self) -> Vec<String> {
        self.kinds.keys().cloned().collect()
    }

    fn describe_node_kind(&self, kind: &str) -> Result<RawNodeKind, HostError> {
        self.kinds
            .get(kind)
            .cloned()
            .ok_or_else(|| HostError::UnknownKind(kind.to_string()))
    }

    fn find_container(&self, kind: ContainerKind, name: &str) -> Option<ContainerId> {
        self.containers
            .iter()
            .find(|(_, c)| c.kind == kind && c.name == name)
            .map(|(id, _)| *id)
    }

    fn create_container(&mut self, kind: ContainerKind, name: &str) -> Result<ContainerId, HostError> {
        if self.find_container(kind, name).is_some() {
            return Err(HostError::Rejected(format!("container {name} already exists")));
        }
        let id = ContainerId(self.allocate_id());
        self.containers.insert(
            id,
            MemoryContainer {
                name: name.to_string(),
                kind,
                nodes: Vec::new(),
                links: Vec::new(),
                interface_inputs: Vec::new(),
                interface_outputs: Vec::new(),
            },
        );
        Ok(id)
    }

    fn clear_container(&mut self, container: ContainerId) -> Result<(), HostError> {
        let target = self.container_mut(container)?;
        let removed = std::mem::take(&mut target.nodes);
        target.links.clear();
        for node in removed {
            self.nodes.swap_remove(&node);
        }
        Ok(())
    }

    fn clear_interface(&mut self, container: ContainerId) -> Result<(), HostError> {
        let target = self.container_mut(container)?;
        target.interface_inputs.clear();
        target.interface_outputs.clear();
        Ok(())
    }

    fn container_nodes(&self, container: ContainerId) -> Result<Vec<HostNodeId>, HostError> {
        Ok(self.container_ref(container)?.nodes.clone())
    }

    fn create_node(&mut self, container: ContainerId, kind: &str) -> Result<HostNodeId, HostError> {
        let raw = self
            .kinds
            .get(kind)
            .ok_or_else(|| HostError::UnknownKind(kind.to_string()))?;
        self.container_ref(container)?;

        let sockets = |raw_sockets: &[crate::host::RawSocket]| -> Vec<MemorySocket> {
            raw_sockets
                .iter()
                .map(|s| MemorySocket {
                    identifier: s.identifier.clone(),
                    socket_type: SocketType::from_host_name(&s.socket_type),
                    default: s.default.clone(),
                })
                .collect()
        };
        let inputs = sockets(&raw.inputs);
        let outputs = sockets(&raw.outputs);

        let mut properties = raw.fields.clone();
        properties
            .entry(LABEL_FIELD.to_string())
            .or_insert_with(|| SocketValue::from(""));

        let node = MemoryNode {
            kind: kind.to_string(),
            container,
            properties,
            size: [DEFAULT_NODE_WIDTH, node_height(inputs.len() + outputs.len())],
            inputs,
            outputs,
            location: [0.0, 0.0],
            hidden: false,
            parent: None,
        };

        let id = HostNodeId(self.allocate_id());
        self.nodes.insert(id, node);
        self.container_mut(container)?.nodes.push(id);
        Ok(id)
    }

    fn set_property(&mut self, node: HostNodeId, field: &str, value: &SocketValue) -> Result<(), HostError> {
        let memory_node = self.node_ref(node)?;
        let current = memory_node
            .properties
            .get(field)
            .ok_or_else(|| HostError::UnknownProperty {
                kind: memory_node.kind.clone(),
                property: field.to_string(),
            })?;
        if !value.same_shape(current) {
            return Err(HostError::IncompatibleValue {
                target: field.to_string(),
                expected: current.kind_name().to_string(),
                found: value.kind_name().to_string(),
            });
        }

        if memory_node.kind == GROUP_KIND && field == NODE_TREE_FIELD {
            if let SocketValue::String(tree) = value {
                self.bind_group(node, tree)?;
            }
        }

        self.node_mut(node)?
            .properties
            .insert(field.to_string(), value.clone());
        Ok(())
    }

    fn set_socket_default(
        &mut self,
        node: HostNodeId,
        direction: Direction,
        index: usize,
        value: &SocketValue,
    ) -> Result<(), HostError> {
        let memory_node = self.node_mut(node)?;
        let sockets = match direction {
            Direction::Input => &mut memory_node.inputs,
            Direction::Output => &mut memory_node.outputs,
        };
        let count = sockets.len();
        let socket = sockets
            .get_mut(index)
            .ok_or(HostError::SocketOutOfRange { direction, index, count })?;
        if matches!(socket.socket_type, SocketType::Shader) {
            return Err(HostError::IncompatibleValue {
                target: socket.identifier.clone(),
                expected: "link".to_string(),
                found: value.kind_name().to_string(),
            });
        }
        socket.default = Some(value.clone());
        Ok(())
    }

    fn declare_interface_socket(
        &mut self,
        container: ContainerId,
        direction: Direction,
        socket: &SocketTemplate,
    ) -> Result<(), HostError> {
        let target = self.container_mut(container)?;
        if target.kind != ContainerKind::Group {
            return Err(HostError::Rejected(format!(
                "{} is not a group and has no interface",
                target.name
            )));
        }
        let interface = match direction {
            Direction::Input => &mut target.interface_inputs,
            Direction::Output => &mut target.interface_outputs,
        };
        let mut declared = socket.clone();
        declared.index = interface.len();
        interface.push(declared);
        Ok(())
    }

    fn create_link(
        &mut self,
        container: ContainerId,
        from: HostNodeId,
        from_socket: usize,
        to: HostNodeId,
        to_socket: usize,
    ) -> Result<(), HostError> {
        for node in [from, to] {
            if self.node_ref(node)?.container != container {
                return Err(HostError::InvalidHandle(format!(
                    "{node:?} is not in {container:?}"
                )));
            }
        }
        self.check_socket(from, Direction::Output, from_socket)?;
        self.check_socket(to, Direction::Input, to_socket)?;

        let target = self.container_mut(container)?;
        target
            .links
            .retain(|l| !(l.to_node == to && l.to_socket == to_socket));
        target.links.push(MemoryLink {
            from_node: from,
            from_socket,
            to_node: to,
            to_socket,
        });
        Ok(())
    }

    fn set_parent(&mut self, node: HostNodeId, parent: HostNodeId) -> Result<(), HostError> {
        self.node_ref(parent)?;
        self.node_mut(node)?.parent = Some(parent);
        Ok(())
    }

    fn node_size(&self, node: HostNodeId) -> Result<[f32; 2], HostError> {
        Ok(self.node_ref(node)?.size)
    }

    fn outgoing_links(&self, node: HostNodeId) -> Result<Vec<HostLink<HostNodeId>>, HostError> {
        let container = self.container_ref(self.node_ref(node)?.container)?;
        Ok(container
            .links
            .iter()
            .filter(|l| l.from_node == node)
            .map(|l| HostLink {
                to_node: l.to_node,
                to_socket: l.to_socket,
            })
            .collect())
    }

    fn set_location(&mut self, node: HostNodeId, location: [f32; 2]) -> Result<(), HostError> {
        self.node_mut(node)?.location = location;
        Ok(())
    }

    fn set_hidden(&mut self, node: HostNodeId, hidden: bool) -> Result<(), HostError> {
        self.node_mut(node)?.hidden = hidden;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kinds::shader::shader_node_kinds;

    fn host_with_tree() -> (MemoryHost, ContainerId) {
        let mut host = MemoryHost::with_kinds(shader_node_kinds());
        let tree = host.create_container(ContainerKind::TopLevel, "Material").unwrap();
        (host, tree)
    }

    #[test]
    fn test_unknown_kind_is_rejected() {
        let (mut host, tree) = host_with_tree();
        let err = host.create_node(tree, "ShaderNodeTeapot").unwrap_err();
        assert_eq!(err, HostError::UnknownKind("ShaderNodeTeapot".to_string()));
    }

    #[test]
    fn test_property_validation() {
        let (mut host, tree) = host_with_tree();
        let math = host.create_node(tree, "ShaderNodeMath").unwrap();

        host.set_property(math, "operation", &SocketValue::from("POWER")).unwrap();
        assert_eq!(
            host.node(math).unwrap().properties["operation"],
            SocketValue::from("POWER")
        );

        assert!(matches!(
            host.set_property(math, "blend_type", &SocketValue::from("MIX")),
            Err(HostError::UnknownProperty { .. })
        ));
        assert!(matches!(
            host.set_property(math, "use_clamp", &SocketValue::from("yes")),
            Err(HostError::IncompatibleValue { .. })
        ));
    }

    #[test]
    fn test_link_replaces_previous_input_link() {
        let (mut host, tree) = host_with_tree();
        let a = host.create_node(tree, "ShaderNodeValue").unwrap();
        let b = host.create_node(tree, "ShaderNodeValue").unwrap();
        let math = host.create_node(tree, "ShaderNodeMath").unwrap();

        host.create_link(tree, a, 0, math, 0).unwrap();
        host.create_link(tree, b, 0, math, 0).unwrap();
        assert_eq!(host.link_count(tree), 1);
        assert_eq!(host.outgoing_links(a).unwrap(), vec![]);
        assert_eq!(host.outgoing_links(b).unwrap().len(), 1);

        assert!(matches!(
            host.create_link(tree, a, 0, math, 3),
            Err(HostError::SocketOutOfRange { index: 3, count: 3, .. })
        ));
    }

    #[test]
    fn test_clear_container_removes_nodes() {
        let (mut host, tree) = host_with_tree();
        let value = host.create_node(tree, "ShaderNodeValue").unwrap();
        host.clear_container(tree).unwrap();
        assert_eq!(host.node_count(tree), 0);
        assert!(host.node(value).is_none());
    }

    #[test]
    fn test_group_instance_takes_interface_sockets() {
        let mut host = MemoryHost::with_kinds(shader_node_kinds());
        let group = host.create_container(ContainerKind::Group, "Fade").unwrap();
        host.declare_interface_socket(group, Direction::Input, &SocketTemplate::new(0, "Amount", SocketType::Value))
            .unwrap();
        host.declare_interface_socket(group, Direction::Output, &SocketTemplate::new(0, "Color", SocketType::Rgba))
            .unwrap();

        let tree = host.create_container(ContainerKind::TopLevel, "Material").unwrap();
        let instance = host.create_node(tree, GROUP_KIND).unwrap();
        host.set_property(instance, NODE_TREE_FIELD, &SocketValue::from("Fade")).unwrap();

        let node = host.node(instance).unwrap();
        assert_eq!(node.inputs.len(), 1);
        assert_eq!(node.outputs[0].socket_type, SocketType::Rgba);

        assert!(host
            .set_property(instance, NODE_TREE_FIELD, &SocketValue::from("Missing"))
            .is_err());
    }

    #[test]
    fn test_group_input_sockets_follow_interface() {
        let mut host = MemoryHost::with_kinds(shader_node_kinds());
        let group = host.create_container(ContainerKind::Group, "Fade").unwrap();
        let input = host.create_node(group, GROUP_INPUT_KIND).unwrap();
        assert_eq!(host.socket_count(input, Direction::Output).unwrap(), 0);

        host.declare_interface_socket(group, Direction::Input, &SocketTemplate::new(0, "Amount", SocketType::Value))
            .unwrap();
        assert_eq!(host.socket_count(input, Direction::Output).unwrap(), 1);
    }
}
