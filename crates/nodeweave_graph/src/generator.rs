// SPDX-License-Identifier: MIT OR Apache-2.0
//! Materialization of abstract graphs into a host.
//!
//! Materialization runs in two passes over a finalized node set:
//! 1. Node pass: one host node per abstract node, configuration fields and
//!    socket literals copied best-effort, group interfaces declared.
//! 2. Link pass: every linked input is recreated between the mapped handles.
//!
//! Field and literal failures are collected as [`ConfigurationWarning`]s and
//! never abort generation. Link failures do.

use crate::catalog::CatalogError;
use crate::closure::closure;
use crate::config::GeneratorSettings;
use crate::connection::Link;
use crate::graph::NodeGraph;
use crate::host::{ContainerKind, GraphHost, HostError};
use crate::node::{Node, NodeId, NodeRole};
use crate::port::Direction;
use indexmap::{IndexMap, IndexSet};
use std::collections::HashSet;
use std::fmt;

/// Non-fatal failure to copy configuration onto a host node
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigurationWarning {
    /// Abstract node
    pub node: NodeId,
    /// Host kind of the node
    pub kind: String,
    /// Field name, or `inputs[i]` / `outputs[i]` for socket literals
    pub field: String,
    /// Host failure
    pub reason: HostError,
}

impl fmt::Display for ConfigurationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:?}: cannot set {}: {}", self.kind, self.node, self.field, self.reason)
    }
}

/// Result of a materialization
#[derive(Debug, Clone)]
pub struct Generated<C, N> {
    /// Container the nodes were created in
    pub container: C,
    /// Host handle of every materialized node
    pub nodes: IndexMap<NodeId, N>,
    /// Configuration that could not be applied
    pub warnings: Vec<ConfigurationWarning>,
}

/// Result of a materialization into host `H`
pub type GeneratedFor<H> = Generated<<H as GraphHost>::Container, <H as GraphHost>::NodeHandle>;

/// Materialization errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GenerateError {
    /// Link source or destination missing from the node set
    #[error("Unresolved link {from:?}[{from_socket}] -> {to:?}[{to_socket}]: endpoint not materialized")]
    UnresolvedLink {
        /// Source node
        from: NodeId,
        /// Source output index
        from_socket: usize,
        /// Destination node
        to: NodeId,
        /// Destination input index
        to_socket: usize,
    },

    /// Host does not know the node's kind
    #[error("Cannot materialize {node:?}: {source}")]
    Catalog {
        /// Abstract node
        node: NodeId,
        /// Catalog failure
        source: CatalogError,
    },

    /// Node set refers to a node missing from the graph
    #[error("Node not found: {0:?}")]
    NodeNotFound(NodeId),

    /// Host failure outside best-effort configuration
    #[error("Host error: {0}")]
    Host(#[from] HostError),
}

/// Materializes abstract graphs into a host
#[derive(Debug, Clone, Default)]
pub struct Generator {
    settings: GeneratorSettings,
}

impl Generator {
    /// Create a generator with the given settings
    pub fn new(settings: GeneratorSettings) -> Self {
        Self { settings }
    }

    /// Materialize `roots` and their dependencies into a top-level container.
    ///
    /// An existing container named `target` is cleared first when `replace`
    /// is set and reused as-is otherwise; a missing one is created. The host
    /// is left untouched when the node set fails validation.
    pub fn generate<H: GraphHost>(
        &self,
        graph: &NodeGraph,
        roots: impl IntoIterator<Item = NodeId>,
        host: &mut H,
        target: &str,
        replace: bool,
    ) -> Result<GeneratedFor<H>, GenerateError> {
        let nodes = self.node_set(graph, roots)?;
        let members = self.members(graph, &nodes)?;
        validate(graph, &members, host)?;

        let container = match host.find_container(ContainerKind::TopLevel, target) {
            Some(container) => {
                if replace {
                    host.clear_container(container)?;
                }
                container
            }
            None => host.create_container(ContainerKind::TopLevel, target)?,
        };
        tracing::debug!("Generating {} nodes into {}", members.len(), target);
        self.build(graph, &members, host, container)
    }

    /// Materialize `roots` and their dependencies as the body of group `name`.
    ///
    /// The group container is always cleared, including its interface, so the
    /// group input and output nodes of the set declare it afresh.
    pub fn generate_group<H: GraphHost>(
        &self,
        graph: &NodeGraph,
        roots: impl IntoIterator<Item = NodeId>,
        host: &mut H,
        name: &str,
    ) -> Result<GeneratedFor<H>, GenerateError> {
        let nodes = self.node_set(graph, roots)?;
        let members = self.members(graph, &nodes)?;
        validate(graph, &members, host)?;

        let container = host.get_or_create_container(ContainerKind::Group, name)?;
        host.clear_container(container)?;
        host.clear_interface(container)?;
        tracing::debug!("Generating {} nodes into group {}", members.len(), name);
        self.build(graph, &members, host, container)
    }

    /// Materialize exactly `nodes` into `container`.
    ///
    /// The set must be closed under dependencies; a link from a node outside
    /// the set fails with [`GenerateError::UnresolvedLink`] before anything
    /// is created.
    pub fn materialize<H: GraphHost>(
        &self,
        graph: &NodeGraph,
        nodes: &IndexSet<NodeId>,
        host: &mut H,
        container: H::Container,
    ) -> Result<GeneratedFor<H>, GenerateError> {
        let members = self.members(graph, nodes)?;
        validate(graph, &members, host)?;
        self.build(graph, &members, host, container)
    }

    /// Nodes of the set plus the frames they reference
    fn members<'g>(&self, graph: &'g NodeGraph, nodes: &IndexSet<NodeId>) -> Result<Vec<&'g Node>, GenerateError> {
        let mut members: Vec<&Node> = nodes
            .iter()
            .map(|id| graph.node(*id).ok_or(GenerateError::NodeNotFound(*id)))
            .collect::<Result<_, _>>()?;

        if self.settings.materialize_frames {
            let mut seen: IndexSet<NodeId> = nodes.clone();
            let mut index = 0;
            while index < members.len() {
                if let Some(frame) = members[index].frame.filter(|f| !seen.contains(f)) {
                    seen.insert(frame);
                    members.push(graph.node(frame).ok_or(GenerateError::NodeNotFound(frame))?);
                }
                index += 1;
            }
        }
        Ok(members)
    }

    fn build<H: GraphHost>(
        &self,
        graph: &NodeGraph,
        members: &[&Node],
        host: &mut H,
        container: H::Container,
    ) -> Result<GeneratedFor<H>, GenerateError> {
        let mut generated = Generated {
            container,
            nodes: IndexMap::with_capacity(members.len()),
            warnings: Vec::new(),
        };

        // Node pass
        let mut interface_declared = (false, false);
        for node in members {
            let handle = host.create_node(container, node.kind()).map_err(|err| match err {
                HostError::UnknownKind(kind) => GenerateError::Catalog {
                    node: node.id,
                    source: CatalogError::UnknownKind(kind),
                },
                other => GenerateError::Host(other),
            })?;
            generated.nodes.insert(node.id, handle);

            match node.role {
                NodeRole::GroupInput => {
                    if !interface_declared.0 {
                        for output in &node.outputs {
                            host.declare_interface_socket(container, Direction::Input, &output.template)?;
                        }
                        interface_declared.0 = true;
                    }
                    interface_literals(node, &mut generated.warnings);
                }
                NodeRole::GroupOutput => {
                    if !interface_declared.1 {
                        for input in &node.inputs {
                            host.declare_interface_socket(container, Direction::Output, &input.template)?;
                        }
                        interface_declared.1 = true;
                    }
                    interface_literals(node, &mut generated.warnings);
                }
                _ => configure(host, node, handle, &mut generated.warnings),
            }
        }

        if self.settings.materialize_frames {
            for node in members {
                let (Some(frame), Some(&handle)) = (node.frame, generated.nodes.get(&node.id)) else {
                    continue;
                };
                let Some(&parent) = generated.nodes.get(&frame) else {
                    continue;
                };
                if let Err(reason) = host.set_parent(handle, parent) {
                    warn(&mut generated.warnings, node, "parent".to_string(), reason);
                }
            }
        }

        // Link pass
        let mut link_count = 0;
        for node in members {
            let Some(&to) = generated.nodes.get(&node.id) else {
                continue;
            };
            for input in &node.inputs {
                let Some(link) = input.link.and_then(|id| graph.link(id)) else {
                    continue;
                };
                let &from = generated
                    .nodes
                    .get(&link.from.node)
                    .ok_or_else(|| unresolved(link))?;
                host.create_link(container, from, link.from.index, to, link.to.index)?;
                link_count += 1;
            }
        }

        tracing::info!(
            "Materialized {} nodes and {} links ({} warnings)",
            generated.nodes.len(),
            link_count,
            generated.warnings.len()
        );
        Ok(generated)
    }

    fn node_set(
        &self,
        graph: &NodeGraph,
        roots: impl IntoIterator<Item = NodeId>,
    ) -> Result<IndexSet<NodeId>, GenerateError> {
        let roots: Vec<NodeId> = roots.into_iter().collect();
        if let Some(missing) = roots.iter().find(|id| !graph.contains(**id)) {
            return Err(GenerateError::NodeNotFound(*missing));
        }
        Ok(closure(graph, roots))
    }
}

/// Reject sets the host cannot build before anything is created or cleared
fn validate<H: GraphHost>(graph: &NodeGraph, members: &[&Node], host: &H) -> Result<(), GenerateError> {
    let known: HashSet<String> = host.enumerate_node_kinds().into_iter().collect();
    if let Some(node) = members.iter().find(|n| !known.contains(n.kind())) {
        return Err(GenerateError::Catalog {
            node: node.id,
            source: CatalogError::UnknownKind(node.kind().to_string()),
        });
    }

    let ids: HashSet<NodeId> = members.iter().map(|n| n.id).collect();
    for node in members {
        for input in &node.inputs {
            if let Some(link) = input.link.and_then(|id| graph.link(id)) {
                if !ids.contains(&link.from.node) {
                    return Err(unresolved(link));
                }
            }
        }
    }
    Ok(())
}

fn unresolved(link: &Link) -> GenerateError {
    GenerateError::UnresolvedLink {
        from: link.from.node,
        from_socket: link.from.index,
        to: link.to.node,
        to_socket: link.to.index,
    }
}

/// Group input and output nodes carry the interface, not literals
fn interface_literals(node: &Node, warnings: &mut Vec<ConfigurationWarning>) {
    let inputs = node.inputs.iter().enumerate().map(|(i, s)| (format!("inputs[{i}]"), &s.value));
    let outputs = node.outputs.iter().enumerate().map(|(i, s)| (format!("outputs[{i}]"), &s.value));
    for (field, value) in inputs.chain(outputs) {
        if value.is_some() {
            let reason = HostError::Rejected("literals on group interface nodes are not materialized".to_string());
            warn(warnings, node, field, reason);
        }
    }
}

/// Copy fields and socket literals, collecting failures
fn configure<H: GraphHost>(
    host: &mut H,
    node: &Node,
    handle: H::NodeHandle,
    warnings: &mut Vec<ConfigurationWarning>,
) {
    for (field, value) in &node.fields {
        if let Err(reason) = host.set_property(handle, field, value) {
            warn(warnings, node, field.clone(), reason);
        }
    }
    for (index, input) in node.inputs.iter().enumerate() {
        if let Some(value) = &input.value {
            if let Err(reason) = host.set_socket_default(handle, Direction::Input, index, value) {
                warn(warnings, node, format!("inputs[{index}]"), reason);
            }
        }
    }
    for (index, output) in node.outputs.iter().enumerate() {
        if let Some(value) = &output.value {
            if let Err(reason) = host.set_socket_default(handle, Direction::Output, index, value) {
                warn(warnings, node, format!("outputs[{index}]"), reason);
            }
        }
    }
}

fn warn(warnings: &mut Vec<ConfigurationWarning>, node: &Node, field: String, reason: HostError) {
    let warning = ConfigurationWarning {
        node: node.id,
        kind: node.kind().to_string(),
        field,
        reason,
    };
    tracing::warn!("{}", warning);
    warnings.push(warning);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algebra::{GraphBuilder, GroupInterface};
    use crate::catalog::CatalogBuilder;
    use crate::host::{MemoryHost, RawNodeKind, RawSocket};
    use crate::kinds::shader::shader_node_kinds;
    use crate::port::{SocketType, SocketValue};
    use crate::test_support::{shader_catalog, shader_host};

    /// noise → mix → principled → output, with a value feeding the mix factor
    fn material(catalog: &crate::catalog::Catalog) -> (NodeGraph, NodeId) {
        let b = GraphBuilder::new(catalog).unwrap();
        let coords = b.node("TexCoord").unwrap().output("object").unwrap();
        let noise = b.node("TexNoise").unwrap();
        noise.set("vector", coords * 4.0).unwrap();
        let mix = b.node("MixRGB").unwrap();
        mix.set("fac", b.value(0.3).unwrap()).unwrap();
        mix.set("color1", noise.output("color").unwrap()).unwrap();
        mix.set("color2", [0.1, 0.2, 0.8, 1.0]).unwrap();
        let bsdf = b.node("BsdfPrincipled").unwrap();
        bsdf.set("base_color", mix).unwrap();
        let output = b.node("OutputMaterial").unwrap();
        output.set("surface", bsdf).unwrap();
        let root = output.id();
        (b.into_graph(), root)
    }

    #[test]
    fn test_generate_creates_closure() {
        let catalog = shader_catalog();
        let (graph, root) = material(&catalog);
        let mut host = shader_host();

        let generated = Generator::default()
            .generate(&graph, [root], &mut host, "Material", true)
            .unwrap();

        assert_eq!(generated.nodes.len(), graph.node_count());
        assert_eq!(host.node_count(generated.container), graph.node_count());
        assert_eq!(host.link_count(generated.container), graph.link_count());
        assert!(generated.warnings.is_empty());

        let mix = host
            .nodes_of_kind(generated.container, "ShaderNodeMixRGB")
            .pop()
            .unwrap();
        assert_eq!(
            host.node(mix).unwrap().inputs[2].default,
            Some(SocketValue::Color([0.1, 0.2, 0.8, 1.0]))
        );
    }

    #[test]
    fn test_replace_is_idempotent() {
        let catalog = shader_catalog();
        let (graph, root) = material(&catalog);
        let mut host = shader_host();
        let generator = Generator::default();

        let first = generator.generate(&graph, [root], &mut host, "Material", true).unwrap();
        let links = host.link_count(first.container);
        let second = generator.generate(&graph, [root], &mut host, "Material", true).unwrap();

        assert_eq!(first.container, second.container);
        assert_eq!(host.node_count(second.container), graph.node_count());
        assert_eq!(host.link_count(second.container), links);
    }

    #[test]
    fn test_without_replace_nodes_accumulate() {
        let catalog = shader_catalog();
        let (graph, root) = material(&catalog);
        let mut host = shader_host();
        let generator = Generator::default();

        let first = generator.generate(&graph, [root], &mut host, "Material", false).unwrap();
        generator.generate(&graph, [root], &mut host, "Material", false).unwrap();
        assert_eq!(host.node_count(first.container), 2 * graph.node_count());
    }

    #[test]
    fn test_link_pass_is_independent_of_set_order() {
        let catalog = shader_catalog();
        let (graph, root) = material(&catalog);
        let mut host = shader_host();
        let container = host.create_container(ContainerKind::TopLevel, "Reversed").unwrap();

        let mut nodes: Vec<NodeId> = closure(&graph, [root]).into_iter().collect();
        nodes.reverse();
        let nodes: IndexSet<NodeId> = nodes.into_iter().collect();

        Generator::default()
            .materialize(&graph, &nodes, &mut host, container)
            .unwrap();
        assert_eq!(host.link_count(container), graph.link_count());
    }

    #[test]
    fn test_open_set_fails_with_unresolved_link() {
        let catalog = shader_catalog();
        let b = GraphBuilder::new(&catalog).unwrap();
        let x = b.value(2.0).unwrap();
        let y = x + 1.0;
        let graph = b.snapshot();
        let mut host = shader_host();
        let container = host.create_container(ContainerKind::TopLevel, "Open").unwrap();

        let nodes: IndexSet<NodeId> = [y.socket().node].into_iter().collect();
        let err = Generator::default()
            .materialize(&graph, &nodes, &mut host, container)
            .unwrap_err();
        assert_eq!(
            err,
            GenerateError::UnresolvedLink {
                from: x.id(),
                from_socket: 0,
                to: y.socket().node,
                to_socket: 0,
            }
        );
    }

    #[test]
    fn test_configuration_failures_become_warnings() {
        let catalog = shader_catalog();
        let b = GraphBuilder::new(&catalog).unwrap();
        let x = b.value(2.0).unwrap();
        let sum = (x + 1.0).node();
        sum.set_field("use_clamp", "yes").unwrap();
        let output = b.node("OutputMaterial").unwrap();
        output.set("surface", 1.0).unwrap();
        let output_id = output.id();
        let roots = [sum.id(), output_id];
        let graph = b.into_graph();
        let mut host = shader_host();

        let generated = Generator::default()
            .generate(&graph, roots, &mut host, "Material", true)
            .unwrap();

        assert_eq!(generated.nodes.len(), 3);
        assert_eq!(generated.warnings.len(), 2);
        assert_eq!(generated.warnings[0].field, "use_clamp");
        assert!(matches!(
            generated.warnings[0].reason,
            HostError::IncompatibleValue { .. }
        ));
        assert_eq!(generated.warnings[1].field, "inputs[0]");
        assert_eq!(generated.warnings[1].node, output_id);
    }

    #[test]
    fn test_kind_unknown_to_host() {
        let mut kinds = shader_node_kinds();
        let mut teapot = RawNodeKind::new("ShaderNodeTeapot");
        teapot.outputs.push(RawSocket::new("Shine", "VALUE"));
        kinds.push(teapot);
        let catalog = CatalogBuilder::default().build_from_raw(kinds);

        let b = GraphBuilder::new(&catalog).unwrap();
        let teapot = b.node("Teapot").unwrap();
        let graph = b.snapshot();
        let mut host = shader_host();

        let err = Generator::default()
            .generate(&graph, [teapot.id()], &mut host, "Material", true)
            .unwrap_err();
        assert!(matches!(
            err,
            GenerateError::Catalog { source: CatalogError::UnknownKind(ref kind), .. } if kind == "ShaderNodeTeapot"
        ));
    }

    #[test]
    fn test_unknown_root() {
        let catalog = shader_catalog();
        let (graph, _) = material(&catalog);
        let mut host = shader_host();
        let missing = NodeId::new();
        assert_eq!(
            Generator::default()
                .generate(&graph, [missing], &mut host, "Material", true)
                .unwrap_err(),
            GenerateError::NodeNotFound(missing)
        );
    }

    #[test]
    fn test_group_interface_and_instance() {
        let catalog = shader_catalog();
        let mut host = shader_host();
        let generator = Generator::default();

        // Group body: out = in * 2
        let body = GraphBuilder::new(&catalog).unwrap();
        let input = body.group_input().unwrap();
        let output = body.group_output().unwrap();
        let strength = input
            .add_output("Strength", SocketType::Value, Some(SocketValue::Float(1.0)), Some(0.0), Some(10.0))
            .unwrap();
        let result = output.add_input("Result", SocketType::Value, None, None, None).unwrap();
        assert_eq!(result.index, 0);
        output.set("result", strength * 2.0).unwrap();
        let interface = GroupInterface::from_nodes(input, output);
        let root = output.id();
        let body_graph = body.into_graph();

        for _ in 0..2 {
            let generated = generator
                .generate_group(&body_graph, [root], &mut host, "Doubler")
                .unwrap();
            let group = host.container(generated.container).unwrap();
            assert_eq!(group.interface_inputs.len(), 1);
            assert_eq!(group.interface_outputs.len(), 1);
            assert_eq!(group.interface_inputs[0].max, Some(10.0));
            assert_eq!(host.link_count(generated.container), 2);
        }

        // Instance in a material
        let b = GraphBuilder::new(&catalog).unwrap();
        let instance = b.group("Doubler", &interface);
        instance.set("strength", 3.0).unwrap();
        let emission = b.node("Emission").unwrap();
        emission.set("strength", instance).unwrap();
        let root = emission.id();
        let instance_id = instance.id();
        let graph = b.into_graph();

        let generated = generator
            .generate(&graph, [root], &mut host, "Material", true)
            .unwrap();
        assert!(generated.warnings.is_empty());
        let handle = generated.nodes[&instance_id];
        let node = host.node(handle).unwrap();
        assert_eq!(node.properties["node_tree"], SocketValue::from("Doubler"));
        assert_eq!(node.inputs[0].default, Some(SocketValue::Float(3.0)));
        assert_eq!(host.link_count(generated.container), 1);
    }

    #[test]
    fn test_frames_are_materialized_and_parented() {
        let catalog = shader_catalog();
        let b = GraphBuilder::new(&catalog).unwrap();
        let x = b.value(1.0).unwrap();
        let y = (x * 3.0).node();
        let frame = b.frame_all("Scale", "", [y.id()]).unwrap();
        let (x, y, frame) = (x.id(), y.id(), frame.id());
        let graph = b.into_graph();

        let mut host = shader_host();
        let generated = Generator::default()
            .generate(&graph, [y], &mut host, "Framed", true)
            .unwrap();
        assert_eq!(generated.nodes.len(), 3);
        let frame_handle = generated.nodes[&frame];
        assert_eq!(host.node(generated.nodes[&x]).unwrap().parent, Some(frame_handle));
        assert_eq!(
            host.node(frame_handle).unwrap().properties["label"],
            SocketValue::from("Scale")
        );

        let mut host = shader_host();
        let generated = Generator::new(GeneratorSettings {
            materialize_frames: false,
        })
        .generate(&graph, [y], &mut host, "Framed", true)
        .unwrap();
        assert_eq!(generated.nodes.len(), 2);
        assert_eq!(host.node(generated.nodes[&x]).unwrap().parent, None);
    }

    #[test]
    fn test_failed_generate_keeps_previous_contents() {
        let mut kinds = shader_node_kinds();
        let mut teapot = RawNodeKind::new("ShaderNodeTeapot");
        teapot.inputs.push(RawSocket::new("Shine", "VALUE"));
        kinds.push(teapot);
        let catalog = CatalogBuilder::default().build_from_raw(kinds);
        let generator = Generator::default();
        let mut host = shader_host();

        let (good, root) = material(&catalog);
        let first = generator.generate(&good, [root], &mut host, "Material", true).unwrap();
        let (nodes, links) = (host.node_count(first.container), host.link_count(first.container));

        let b = GraphBuilder::new(&catalog).unwrap();
        let x = b.value(0.5).unwrap();
        let teapot = b.node("Teapot").unwrap();
        teapot.set("shine", x * 2.0).unwrap();
        let root = teapot.id();
        let bad = b.into_graph();

        let err = generator.generate(&bad, [root], &mut host, "Material", true).unwrap_err();
        assert!(matches!(err, GenerateError::Catalog { node, .. } if node == root));
        assert_eq!(host.node_count(first.container), nodes);
        assert_eq!(host.link_count(first.container), links);

        let err = generator.generate_group(&bad, [root], &mut host, "Teapots").unwrap_err();
        assert!(matches!(err, GenerateError::Catalog { .. }));
        assert!(host.find_container(ContainerKind::Group, "Teapots").is_none());
    }

    #[test]
    fn test_open_set_creates_nothing() {
        let catalog = shader_catalog();
        let b = GraphBuilder::new(&catalog).unwrap();
        let y = b.value(2.0).unwrap() + 1.0;
        let sum = y.socket().node;
        let graph = b.into_graph();
        let mut host = shader_host();
        let container = host.create_container(ContainerKind::TopLevel, "Open").unwrap();

        let nodes: IndexSet<NodeId> = [sum].into_iter().collect();
        let err = Generator::default()
            .materialize(&graph, &nodes, &mut host, container)
            .unwrap_err();
        assert!(matches!(err, GenerateError::UnresolvedLink { to, .. } if to == sum));
        assert_eq!(host.node_count(container), 0);
    }

    #[test]
    fn test_literals_on_group_interface_nodes_warn() {
        let catalog = shader_catalog();
        let b = GraphBuilder::new(&catalog).unwrap();
        let input = b.group_input().unwrap();
        let output = b.group_output().unwrap();
        input.add_output("Value", SocketType::Value, None, None, None).unwrap();
        output.add_input("Value", SocketType::Value, None, None, None).unwrap();
        output.set("value", 0.25).unwrap();
        let root = output.id();
        let graph = b.into_graph();
        let mut host = shader_host();

        let generated = Generator::default()
            .generate_group(&graph, [root], &mut host, "Constant")
            .unwrap();
        assert_eq!(generated.warnings.len(), 1);
        assert_eq!(generated.warnings[0].node, root);
        assert_eq!(generated.warnings[0].field, "inputs[0]");
        assert!(matches!(generated.warnings[0].reason, HostError::Rejected(_)));
    }
}
