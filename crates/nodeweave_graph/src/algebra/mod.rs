// SPDX-License-Identifier: MIT OR Apache-2.0
//! Expression algebra for building node graphs.
//!
//! A [`GraphBuilder`] owns the graph under construction. Expressions are
//! lightweight handles ([`Expr`] for an output socket, [`NodeRef`] for a
//! node) borrowing the builder, so arithmetic on them reads like ordinary
//! code while every operator appends exactly one node:
//!
//! ```ignore
//! let builder = GraphBuilder::new(&catalog)?;
//! let coords = builder.node("TexCoord")?.output("generated")?;
//! let bias = (coords * 2.0 - 1.0).length();
//! ```

pub mod expr;
pub mod ops;

pub use expr::{Expr, NodeRef, Operand};
pub use ops::{MathOp, VectorOp};

use crate::catalog::{Catalog, CatalogError};
use crate::closure::closure;
use crate::connection::SocketRef;
use crate::graph::{ConnectionError, NodeGraph};
use crate::kinds::{FRAME_KIND, GROUP_INPUT_KIND, GROUP_KIND, GROUP_OUTPUT_KIND, LABEL_FIELD, NODE_TREE_FIELD};
use crate::node::{NodeId, NodeKindDescriptor, NodeRole, ValidationError};
use crate::port::{dedupe_names, SocketTemplate, SocketValue, TypeCoercionNotice};
use indexmap::IndexMap;
use ops::BinaryOp;
use std::cell::{Ref, RefCell};
use std::sync::Arc;

const MATH_KIND: &str = "ShaderNodeMath";
const VECTOR_MATH_KIND: &str = "ShaderNodeVectorMath";
const OPERATION_FIELD: &str = "operation";

/// Error raised by the checked builder API
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BuildError {
    /// Kind missing from the catalog
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// Unknown socket or field
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Operand could not be wired into a socket
    #[error(transparent)]
    Connection(#[from] ConnectionError),
}

/// Kinds every operator relies on, resolved once per builder
#[derive(Debug, Clone)]
struct CoreKinds {
    math: Arc<NodeKindDescriptor>,
    vector_math: Arc<NodeKindDescriptor>,
    /// Index of the `Scale` input on the vector math kind
    scale_input: usize,
}

impl CoreKinds {
    fn resolve(catalog: &Catalog) -> Result<Self, CatalogError> {
        let math = catalog.get(MATH_KIND)?;
        if math.inputs.len() < 2 || math.outputs.is_empty() || !math.fields.contains_key(OPERATION_FIELD) {
            return Err(CatalogError::IncompatibleKind {
                kind: math.kind.clone(),
                detail: "two inputs, one output and an operation field".to_string(),
            });
        }

        let vector_math = catalog.get(VECTOR_MATH_KIND)?;
        let scale_input = vector_math
            .input("scale")
            .map(|t| t.index)
            .filter(|_| vector_math.inputs.len() >= 3 && vector_math.outputs.len() >= 2)
            .ok_or_else(|| CatalogError::IncompatibleKind {
                kind: vector_math.kind.clone(),
                detail: "three vector inputs, a Scale input and two outputs".to_string(),
            })?;

        Ok(Self {
            math,
            vector_math,
            scale_input,
        })
    }
}

/// Interface of a node group: the sockets its instances expose
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupInterface {
    /// Group inputs, in declaration order
    pub inputs: Vec<SocketTemplate>,
    /// Group outputs, in declaration order
    pub outputs: Vec<SocketTemplate>,
}

impl GroupInterface {
    /// Read the interface declared on a group input and a group output node
    pub fn from_nodes(group_input: NodeRef<'_>, group_output: NodeRef<'_>) -> Self {
        let graph = group_input.builder().graph();
        let inputs = graph
            .node(group_input.id())
            .map(|n| n.outputs.iter().map(|s| (*s.template).clone()).collect())
            .unwrap_or_default();
        let graph_out = group_output.builder().graph();
        let outputs = graph_out
            .node(group_output.id())
            .map(|n| n.inputs.iter().map(|s| (*s.template).clone()).collect())
            .unwrap_or_default();
        Self { inputs, outputs }
    }

    fn descriptor(&self, tree: &str) -> NodeKindDescriptor {
        let sockets = |templates: &[SocketTemplate]| -> Vec<Arc<SocketTemplate>> {
            let mut templates: Vec<SocketTemplate> = templates
                .iter()
                .enumerate()
                .map(|(index, t)| SocketTemplate {
                    index,
                    name: crate::port::lookup_name(&t.identifier),
                    ..t.clone()
                })
                .collect();
            dedupe_names(&mut templates);
            templates.into_iter().map(Arc::new).collect()
        };

        let mut fields = IndexMap::new();
        fields.insert(LABEL_FIELD.to_string(), SocketValue::from(""));
        fields.insert(NODE_TREE_FIELD.to_string(), SocketValue::from(tree));

        NodeKindDescriptor {
            kind: GROUP_KIND.to_string(),
            name: tree.to_string(),
            inputs: sockets(&self.inputs),
            outputs: sockets(&self.outputs),
            fields,
        }
    }
}

/// Builds an abstract node graph against a catalog
#[derive(Debug)]
pub struct GraphBuilder<'c> {
    catalog: &'c Catalog,
    core: CoreKinds,
    graph: RefCell<NodeGraph>,
}

impl<'c> GraphBuilder<'c> {
    /// Create a builder; fails when the catalog lacks the math kinds
    pub fn new(catalog: &'c Catalog) -> Result<Self, CatalogError> {
        Ok(Self {
            catalog,
            core: CoreKinds::resolve(catalog)?,
            graph: RefCell::new(NodeGraph::new()),
        })
    }

    /// Catalog the builder resolves kinds against
    pub fn catalog(&self) -> &'c Catalog {
        self.catalog
    }

    /// Copy of the graph built so far.
    ///
    /// The copy is detached: building continues on the builder and does not
    /// show up in it.
    pub fn snapshot(&self) -> NodeGraph {
        self.graph.borrow().clone()
    }

    /// Short-lived borrow for reads inside the crate; never held across node creation
    pub(crate) fn graph(&self) -> Ref<'_, NodeGraph> {
        self.graph.borrow()
    }

    /// Finish building and take the graph
    pub fn into_graph(self) -> NodeGraph {
        self.graph.into_inner()
    }
}

impl<'a> GraphBuilder<'a> {
    /// Create a node of any catalog kind
    pub fn node(&'a self, kind: &str) -> Result<NodeRef<'a>, CatalogError> {
        let descriptor = self.catalog.get(kind)?;
        Ok(self.create(descriptor))
    }

    /// Math node with the given operation; operands fill inputs in order
    pub fn math<I>(&'a self, op: MathOp, operands: I) -> NodeRef<'a>
    where
        I: IntoIterator,
        I::Item: Into<Operand<'a>>,
    {
        let node = self.operation(&self.core.math, op.as_str());
        self.fill(node.id(), operands.into_iter().map(Into::into));
        node
    }

    /// Vector math node with the given operation; operands fill the vector
    /// inputs in order
    pub fn vector_math<I>(&'a self, op: VectorOp, operands: I) -> NodeRef<'a>
    where
        I: IntoIterator,
        I::Item: Into<Operand<'a>>,
    {
        let node = self.operation(&self.core.vector_math, op.as_str());
        let operands: Vec<Operand<'a>> = operands.into_iter().map(Into::into).collect();
        if operands.len() > self.core.scale_input {
            tracing::warn!(
                "{} operands given to vector math {}, extra operands ignored",
                operands.len(),
                op.as_str()
            );
        }
        self.fill(node.id(), operands.into_iter().take(self.core.scale_input));
        node
    }

    /// Scale a vector by a scalar
    pub fn vector_scale(&'a self, vector: impl Into<Operand<'a>>, scale: impl Into<Operand<'a>>) -> Expr<'a> {
        let node = self.vector_math(VectorOp::Scale, [vector.into()]);
        self.wire(SocketRef::new(node.id(), self.core.scale_input), scale.into());
        node.result(VectorOp::Scale.result_output())
    }

    /// Magnitude of a vector
    pub fn vector_length(&'a self, vector: impl Into<Operand<'a>>) -> Expr<'a> {
        self.vector_expr(VectorOp::Length, vec![vector.into()])
    }

    /// Distance between two points
    pub fn vector_distance(&'a self, a: impl Into<Operand<'a>>, b: impl Into<Operand<'a>>) -> Expr<'a> {
        self.vector_expr(VectorOp::Distance, vec![a.into(), b.into()])
    }

    /// Unit vector in the direction of `vector`
    pub fn vector_normalize(&'a self, vector: impl Into<Operand<'a>>) -> Expr<'a> {
        self.vector_expr(VectorOp::Normalize, vec![vector.into()])
    }

    /// Left fold of vector additions; `None` for no terms
    pub fn vector_sum(&'a self, terms: impl IntoIterator<Item = Expr<'a>>) -> Option<Expr<'a>> {
        terms
            .into_iter()
            .reduce(|acc, term| self.vector_expr(VectorOp::Add, vec![acc.into(), term.into()]))
    }

    /// Smaller of two scalars
    pub fn math_minimum(&'a self, a: impl Into<Operand<'a>>, b: impl Into<Operand<'a>>) -> Expr<'a> {
        self.math_expr(MathOp::Minimum, vec![a.into(), b.into()])
    }

    /// Larger of two scalars
    pub fn math_maximum(&'a self, a: impl Into<Operand<'a>>, b: impl Into<Operand<'a>>) -> Expr<'a> {
        self.math_expr(MathOp::Maximum, vec![a.into(), b.into()])
    }

    /// Constant scalar node
    pub fn value(&'a self, value: f32) -> Result<NodeRef<'a>, BuildError> {
        let node = self.node("ShaderNodeValue")?;
        self.graph
            .borrow_mut()
            .set_output_value(SocketRef::new(node.id(), 0), SocketValue::Float(value))?;
        Ok(node)
    }

    /// Constant color node
    pub fn rgb(&'a self, rgba: [f32; 4]) -> Result<NodeRef<'a>, BuildError> {
        let node = self.node("ShaderNodeRGB")?;
        self.graph
            .borrow_mut()
            .set_output_value(SocketRef::new(node.id(), 0), SocketValue::Color(rgba))?;
        Ok(node)
    }

    /// Combine three scalars into a vector
    pub fn combine_xyz(&'a self, source: impl Into<Operand<'a>>) -> Result<NodeRef<'a>, BuildError> {
        self.combine("ShaderNodeCombineXYZ", source.into())
    }

    /// Combine three scalars into a color
    pub fn combine_rgb(&'a self, source: impl Into<Operand<'a>>) -> Result<NodeRef<'a>, BuildError> {
        self.combine("ShaderNodeCombineRGB", source.into())
    }

    /// Combine hue, saturation and value into a color
    pub fn combine_hsv(&'a self, source: impl Into<Operand<'a>>) -> Result<NodeRef<'a>, BuildError> {
        self.combine("ShaderNodeCombineHSV", source.into())
    }

    /// Node declaring the inputs of the group being built
    pub fn group_input(&'a self) -> Result<NodeRef<'a>, CatalogError> {
        self.node(GROUP_INPUT_KIND)
    }

    /// Node declaring the outputs of the group being built
    pub fn group_output(&'a self) -> Result<NodeRef<'a>, CatalogError> {
        self.node(GROUP_OUTPUT_KIND)
    }

    /// Instance of the group `name` exposing the given interface
    pub fn group(&'a self, name: &str, interface: &GroupInterface) -> NodeRef<'a> {
        let node = self.create(Arc::new(interface.descriptor(name)));
        if let Some(n) = self.graph.borrow_mut().node_mut(node.id()) {
            n.role = NodeRole::Group(name.to_string());
        }
        node
    }

    /// Frame around the given nodes
    pub fn frame(
        &'a self,
        label: &str,
        text: &str,
        nodes: impl IntoIterator<Item = NodeId>,
    ) -> Result<NodeRef<'a>, BuildError> {
        let frame = self.node(FRAME_KIND)?;
        frame.set_field(LABEL_FIELD, label)?;
        frame.set_field("text", text)?;

        let mut graph = self.graph.borrow_mut();
        for id in nodes {
            if id == frame.id() {
                continue;
            }
            if let Some(node) = graph.node_mut(id) {
                node.frame = Some(frame.id());
            }
        }
        Ok(frame)
    }

    /// Frame around the given nodes and everything they depend on
    pub fn frame_all(
        &'a self,
        label: &str,
        text: &str,
        nodes: impl IntoIterator<Item = NodeId>,
    ) -> Result<NodeRef<'a>, BuildError> {
        let members = closure(&self.graph(), nodes);
        self.frame(label, text, members)
    }

    // ------------------------------------------------------------------------
    // Operator plumbing
    // ------------------------------------------------------------------------

    fn create(&'a self, descriptor: Arc<NodeKindDescriptor>) -> NodeRef<'a> {
        let id = self.graph.borrow_mut().add_node(descriptor);
        NodeRef::new(self, id)
    }

    fn operation(&'a self, descriptor: &Arc<NodeKindDescriptor>, op: &str) -> NodeRef<'a> {
        let node = self.create(Arc::clone(descriptor));
        if let Some(n) = self.graph.borrow_mut().node_mut(node.id()) {
            // The field was checked when the core kinds were resolved
            let _ = n.set_field(OPERATION_FIELD, op);
        }
        node
    }

    fn fill(&'a self, node: NodeId, operands: impl Iterator<Item = Operand<'a>>) {
        let inputs = self.graph().node(node).map_or(0, |n| n.inputs.len());
        for (index, operand) in operands.enumerate() {
            if index >= inputs {
                tracing::warn!("Operand {} exceeds the {} inputs of {:?}, ignored", index, inputs, node);
                break;
            }
            self.wire(SocketRef::new(node, index), operand);
        }
    }

    fn combine(&'a self, kind: &str, source: Operand<'a>) -> Result<NodeRef<'a>, BuildError> {
        let node = self.node(kind)?;
        let spread = match &source {
            Operand::Literal(value) => value.components().filter(|c| c.len() > 1),
            _ => None,
        };
        for index in 0..3 {
            let operand = match &spread {
                Some(components) => Operand::from(components.get(index).copied().unwrap_or(0.0)),
                None => source.clone(),
            };
            self.assign(SocketRef::new(node.id(), index), operand)?;
        }
        Ok(node)
    }

    fn math_expr(&'a self, op: MathOp, operands: Vec<Operand<'a>>) -> Expr<'a> {
        self.math(op, operands).result(0)
    }

    fn vector_expr(&'a self, op: VectorOp, operands: Vec<Operand<'a>>) -> Expr<'a> {
        self.vector_math(op, operands).result(op.result_output())
    }

    /// Assign an operand to an input: link a socket or store a literal
    pub(crate) fn assign(
        &self,
        target: SocketRef,
        operand: Operand<'_>,
    ) -> Result<Option<TypeCoercionNotice>, ConnectionError> {
        let source = match operand {
            Operand::Literal(value) => return self.graph.borrow_mut().set_input_value(target, value),
            Operand::Socket(expr) => expr.socket(),
            Operand::Node(node) => SocketRef::new(node.id(), 0),
        };
        self.graph.borrow_mut().connect(source, target)?;
        Ok(None)
    }

    fn wire(&self, target: SocketRef, operand: Operand<'_>) {
        if let Err(err) = self.assign(target, operand) {
            panic!("Cannot wire operand into {:?} input {}: {}", target.node, target.index, err);
        }
    }

    fn is_vector(&self, operand: &Operand<'_>) -> bool {
        match operand {
            Operand::Literal(value) => match value {
                SocketValue::Vector(_) | SocketValue::Color(_) => true,
                SocketValue::Tuple(components) => components.len() > 1,
                _ => false,
            },
            Operand::Socket(expr) => expr.template().is_some_and(|t| t.socket_type.is_vector()),
            Operand::Node(node) => node
                .first_output()
                .and_then(|e| e.template())
                .is_some_and(|t| t.socket_type.is_vector()),
        }
    }

    fn reduce_to_scalar(&'a self, operand: Operand<'a>) -> Operand<'a> {
        if self.is_vector(&operand) {
            self.vector_length(operand).into()
        } else {
            operand
        }
    }

    pub(crate) fn binary(&'a self, op: BinaryOp, lhs: Operand<'a>, rhs: Operand<'a>) -> Expr<'a> {
        let (lv, rv) = (self.is_vector(&lhs), self.is_vector(&rhs));
        let either = lv || rv;

        match op {
            BinaryOp::Add => self.arithmetic(either, MathOp::Add, VectorOp::Add, lhs, rhs),
            BinaryOp::Sub => self.arithmetic(either, MathOp::Subtract, VectorOp::Subtract, lhs, rhs),
            BinaryOp::Div => self.arithmetic(either, MathOp::Divide, VectorOp::Divide, lhs, rhs),
            BinaryOp::Rem => self.arithmetic(either, MathOp::Modulo, VectorOp::Modulo, lhs, rhs),
            BinaryOp::Mul => match (lv, rv) {
                (true, true) => self.vector_expr(VectorOp::Multiply, vec![lhs, rhs]),
                (true, false) => self.vector_scale(lhs, rhs),
                (false, true) => self.vector_scale(rhs, lhs),
                (false, false) => self.math_expr(MathOp::Multiply, vec![lhs, rhs]),
            },
            BinaryOp::Pow => self.math_expr(MathOp::Power, vec![lhs, rhs]),
            BinaryOp::Dot => self.vector_expr(VectorOp::DotProduct, vec![lhs, rhs]),
            BinaryOp::Cross => self.vector_expr(VectorOp::CrossProduct, vec![lhs, rhs]),
            BinaryOp::Project => self.vector_expr(VectorOp::Project, vec![lhs, rhs]),
            BinaryOp::Reflect => self.vector_expr(VectorOp::Reflect, vec![lhs, rhs]),
            BinaryOp::Gt | BinaryOp::Lt => {
                let lhs = self.reduce_to_scalar(lhs);
                let rhs = self.reduce_to_scalar(rhs);
                let op = if op == BinaryOp::Gt { MathOp::GreaterThan } else { MathOp::LessThan };
                self.math_expr(op, vec![lhs, rhs])
            }
        }
    }

    fn arithmetic(
        &'a self,
        vector: bool,
        math_op: MathOp,
        vector_op: VectorOp,
        lhs: Operand<'a>,
        rhs: Operand<'a>,
    ) -> Expr<'a> {
        if vector {
            self.vector_expr(vector_op, vec![lhs, rhs])
        } else {
            self.math_expr(math_op, vec![lhs, rhs])
        }
    }

    pub(crate) fn negate(&'a self, operand: Operand<'a>) -> Expr<'a> {
        if self.is_vector(&operand) {
            self.vector_scale(operand, -1.0)
        } else {
            self.math_expr(MathOp::Multiply, vec![operand, Operand::from(-1.0)])
        }
    }

    pub(crate) fn absolute(&'a self, operand: Operand<'a>) -> Expr<'a> {
        if self.is_vector(&operand) {
            self.vector_expr(VectorOp::Absolute, vec![operand])
        } else {
            self.math_expr(MathOp::Absolute, vec![operand])
        }
    }
}
