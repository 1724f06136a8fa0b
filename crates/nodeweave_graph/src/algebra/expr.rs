// SPDX-License-Identifier: MIT OR Apache-2.0
//! Expression handles and operator overloading.
//!
//! [`Expr`] and [`NodeRef`] are `Copy` handles into a [`GraphBuilder`].
//! Arithmetic on them appends a node to the builder's graph and returns the
//! node's result output. A `NodeRef` used as an operand stands for its first
//! output.
//!
//! # Panics
//!
//! Operators panic when an operand belongs to a different builder, or when a
//! node without outputs is used as an operand. Use [`NodeRef::set`] for the
//! checked form.

use super::ops::BinaryOp;
use super::{BuildError, GraphBuilder};
use crate::connection::SocketRef;
use crate::node::{Node, NodeId, ValidationError};
use crate::port::{SocketTemplate, SocketType, SocketValue, TypeCoercionNotice};
use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Rem, Sub};
use std::sync::Arc;

/// Handle to an output socket in a builder's graph
#[derive(Clone, Copy)]
pub struct Expr<'a> {
    builder: &'a GraphBuilder<'a>,
    socket: SocketRef,
}

impl<'a> Expr<'a> {
    pub(crate) fn new(builder: &'a GraphBuilder<'a>, socket: SocketRef) -> Self {
        Self { builder, socket }
    }

    /// Socket this expression reads from
    pub fn socket(&self) -> SocketRef {
        self.socket
    }

    /// Node owning the socket
    pub fn node(&self) -> NodeRef<'a> {
        NodeRef::new(self.builder, self.socket.node)
    }

    /// Template of the socket
    pub fn template(&self) -> Option<Arc<SocketTemplate>> {
        self.builder
            .graph()
            .node(self.socket.node)
            .and_then(|n| n.output(self.socket.index))
            .map(|s| Arc::clone(&s.template))
    }

    /// Declared type of the socket
    pub fn socket_type(&self) -> Option<SocketType> {
        self.template().map(|t| t.socket_type.clone())
    }
}

impl fmt::Debug for Expr<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Expr").field("socket", &self.socket).finish()
    }
}

impl PartialEq for Expr<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.builder, other.builder) && self.socket == other.socket
    }
}

/// Handle to a node in a builder's graph
#[derive(Clone, Copy)]
pub struct NodeRef<'a> {
    builder: &'a GraphBuilder<'a>,
    id: NodeId,
}

impl<'a> NodeRef<'a> {
    pub(crate) fn new(builder: &'a GraphBuilder<'a>, id: NodeId) -> Self {
        Self { builder, id }
    }

    pub(crate) fn builder(&self) -> &'a GraphBuilder<'a> {
        self.builder
    }

    /// Node ID
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Host kind name
    pub fn kind(&self) -> String {
        self.builder
            .graph()
            .node(self.id)
            .map(|n| n.kind().to_string())
            .unwrap_or_default()
    }

    /// Output at a template index, unchecked
    pub(crate) fn result(&self, index: usize) -> Expr<'a> {
        Expr::new(self.builder, SocketRef::new(self.id, index))
    }

    /// Output at a template index
    pub fn output_at(&self, index: usize) -> Option<Expr<'a>> {
        let count = self.builder.graph().node(self.id).map_or(0, |n| n.outputs.len());
        (index < count).then(|| self.result(index))
    }

    /// First output, the one used when the node is an operand
    pub fn first_output(&self) -> Option<Expr<'a>> {
        self.output_at(0)
    }

    /// Output by name, positional alias (`o1`) or identifier
    pub fn output(&self, name: &str) -> Result<Expr<'a>, ValidationError> {
        let index = self.with_node(|n| n.output_index(name))?;
        Ok(self.result(index))
    }

    /// Input by name, positional alias (`i1`) or identifier
    pub fn input(&self, name: &str) -> Result<SocketRef, ValidationError> {
        let index = self.with_node(|n| n.input_index(name))?;
        Ok(SocketRef::new(self.id, index))
    }

    /// Link an expression into an input, or store a literal on it
    pub fn set(
        &self,
        name: &str,
        operand: impl Into<Operand<'a>>,
    ) -> Result<Option<TypeCoercionNotice>, BuildError> {
        let input = self.input(name)?;
        Ok(self.builder.assign(input, operand.into())?)
    }

    /// Current value of a configuration field
    pub fn field(&self, name: &str) -> Option<SocketValue> {
        self.builder.graph().node(self.id).and_then(|n| n.field(name).cloned())
    }

    /// Set a configuration field
    pub fn set_field(&self, name: &str, value: impl Into<SocketValue>) -> Result<(), ValidationError> {
        let mut graph = self.builder.graph.borrow_mut();
        let node = graph.node_mut(self.id).ok_or(ValidationError::UnknownNode(self.id))?;
        node.set_field(name, value)
    }

    /// Declare a group input; only valid on a group input node
    pub fn add_output(
        &self,
        identifier: &str,
        socket_type: SocketType,
        default: Option<SocketValue>,
        min: Option<f32>,
        max: Option<f32>,
    ) -> Result<Expr<'a>, ValidationError> {
        let index = self.push_interface_socket(identifier, socket_type, default, min, max)?;
        Ok(self.result(index))
    }

    /// Declare a group output; only valid on a group output node
    pub fn add_input(
        &self,
        identifier: &str,
        socket_type: SocketType,
        default: Option<SocketValue>,
        min: Option<f32>,
        max: Option<f32>,
    ) -> Result<SocketRef, ValidationError> {
        let index = self.push_interface_socket(identifier, socket_type, default, min, max)?;
        Ok(SocketRef::new(self.id, index))
    }

    fn push_interface_socket(
        &self,
        identifier: &str,
        socket_type: SocketType,
        default: Option<SocketValue>,
        min: Option<f32>,
        max: Option<f32>,
    ) -> Result<usize, ValidationError> {
        let mut graph = self.builder.graph.borrow_mut();
        let node = graph.node_mut(self.id).ok_or(ValidationError::UnknownNode(self.id))?;
        node.push_interface_socket(identifier, socket_type, default, min, max)
    }

    fn with_node<T>(&self, f: impl FnOnce(&Node) -> Result<T, ValidationError>) -> Result<T, ValidationError> {
        let graph = self.builder.graph();
        let node = graph.node(self.id).ok_or(ValidationError::UnknownNode(self.id))?;
        f(node)
    }
}

impl fmt::Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRef").field("id", &self.id).finish()
    }
}

impl PartialEq for NodeRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.builder, other.builder) && self.id == other.id
    }
}

/// Anything that can feed an input socket
#[derive(Debug, Clone)]
pub enum Operand<'a> {
    /// Link from an output socket
    Socket(Expr<'a>),
    /// Link from a node's first output
    Node(NodeRef<'a>),
    /// Literal stored on the input
    Literal(SocketValue),
}

impl<'a> From<Expr<'a>> for Operand<'a> {
    fn from(expr: Expr<'a>) -> Self {
        Self::Socket(expr)
    }
}

impl<'a> From<NodeRef<'a>> for Operand<'a> {
    fn from(node: NodeRef<'a>) -> Self {
        Self::Node(node)
    }
}

impl From<SocketValue> for Operand<'_> {
    fn from(value: SocketValue) -> Self {
        Self::Literal(value)
    }
}

impl From<f32> for Operand<'_> {
    fn from(value: f32) -> Self {
        Self::Literal(SocketValue::Float(value))
    }
}

impl From<f64> for Operand<'_> {
    fn from(value: f64) -> Self {
        Self::Literal(SocketValue::Float(value as f32))
    }
}

impl From<i32> for Operand<'_> {
    fn from(value: i32) -> Self {
        Self::Literal(SocketValue::Int(value))
    }
}

impl From<bool> for Operand<'_> {
    fn from(value: bool) -> Self {
        Self::Literal(SocketValue::Bool(value))
    }
}

impl<const N: usize> From<[f32; N]> for Operand<'_> {
    fn from(value: [f32; N]) -> Self {
        Self::Literal(SocketValue::Tuple(value.to_vec()))
    }
}

impl<const N: usize> From<[f64; N]> for Operand<'_> {
    fn from(value: [f64; N]) -> Self {
        Self::Literal(SocketValue::Tuple(value.iter().map(|c| *c as f32).collect()))
    }
}

impl From<Vec<f32>> for Operand<'_> {
    fn from(value: Vec<f32>) -> Self {
        Self::Literal(SocketValue::Tuple(value))
    }
}

/// Named operators and `std::ops` impls shared by `Expr` and `NodeRef`
macro_rules! algebra {
    ($handle:ident) => {
        impl<'a> $handle<'a> {
            /// Dot product, read from the scalar output
            pub fn dot(self, rhs: impl Into<Operand<'a>>) -> Expr<'a> {
                self.builder.binary(BinaryOp::Dot, self.into(), rhs.into())
            }

            /// Cross product
            pub fn cross(self, rhs: impl Into<Operand<'a>>) -> Expr<'a> {
                self.builder.binary(BinaryOp::Cross, self.into(), rhs.into())
            }

            /// Projection onto `rhs`
            pub fn project(self, rhs: impl Into<Operand<'a>>) -> Expr<'a> {
                self.builder.binary(BinaryOp::Project, self.into(), rhs.into())
            }

            /// Reflection about `rhs`
            pub fn reflect(self, rhs: impl Into<Operand<'a>>) -> Expr<'a> {
                self.builder.binary(BinaryOp::Reflect, self.into(), rhs.into())
            }

            /// Raise to a power; always a scalar math node
            pub fn pow(self, exponent: impl Into<Operand<'a>>) -> Expr<'a> {
                self.builder.binary(BinaryOp::Pow, self.into(), exponent.into())
            }

            /// `1.0` where greater than `rhs`; vectors compare by length
            pub fn gt(self, rhs: impl Into<Operand<'a>>) -> Expr<'a> {
                self.builder.binary(BinaryOp::Gt, self.into(), rhs.into())
            }

            /// `1.0` where less than `rhs`; vectors compare by length
            pub fn lt(self, rhs: impl Into<Operand<'a>>) -> Expr<'a> {
                self.builder.binary(BinaryOp::Lt, self.into(), rhs.into())
            }

            /// Absolute value, per component for vectors
            pub fn abs(self) -> Expr<'a> {
                self.builder.absolute(self.into())
            }

            /// Vector magnitude
            pub fn length(self) -> Expr<'a> {
                self.builder.vector_length(self)
            }

            /// Unit vector
            pub fn normalize(self) -> Expr<'a> {
                self.builder.vector_normalize(self)
            }
        }

        algebra!(@binary $handle, Add, add, BinaryOp::Add);
        algebra!(@binary $handle, Sub, sub, BinaryOp::Sub);
        algebra!(@binary $handle, Mul, mul, BinaryOp::Mul);
        algebra!(@binary $handle, Div, div, BinaryOp::Div);
        algebra!(@binary $handle, Rem, rem, BinaryOp::Rem);

        impl<'a> Neg for $handle<'a> {
            type Output = Expr<'a>;

            fn neg(self) -> Expr<'a> {
                self.builder.negate(self.into())
            }
        }
    };

    (@binary $handle:ident, $trait:ident, $method:ident, $op:expr) => {
        impl<'a, R: Into<Operand<'a>>> $trait<R> for $handle<'a> {
            type Output = Expr<'a>;

            fn $method(self, rhs: R) -> Expr<'a> {
                self.builder.binary($op, self.into(), rhs.into())
            }
        }

        // Literal on the left stays on input 0
        impl<'a> $trait<$handle<'a>> for f32 {
            type Output = Expr<'a>;

            fn $method(self, rhs: $handle<'a>) -> Expr<'a> {
                rhs.builder.binary($op, Operand::from(self), rhs.into())
            }
        }

        impl<'a> $trait<$handle<'a>> for f64 {
            type Output = Expr<'a>;

            fn $method(self, rhs: $handle<'a>) -> Expr<'a> {
                rhs.builder.binary($op, Operand::from(self), rhs.into())
            }
        }
    };
}

algebra!(Expr);
algebra!(NodeRef);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::shader_catalog;

    #[test]
    fn test_named_socket_access() {
        let catalog = shader_catalog();
        let b = GraphBuilder::new(&catalog).unwrap();
        let mix = b.node("MixRGB").unwrap();

        assert_eq!(mix.input("fac").unwrap().index, 0);
        assert_eq!(mix.input("i2").unwrap().index, 2);
        assert_eq!(mix.input("Color2").unwrap().index, 2);
        assert_eq!(mix.output("o0").unwrap(), mix.first_output().unwrap());
        assert!(matches!(
            mix.input("colour"),
            Err(ValidationError::UnknownSocket { .. })
        ));
        assert!(mix.output_at(5).is_none());
    }

    #[test]
    fn test_set_links_or_stores_literal() {
        let catalog = shader_catalog();
        let b = GraphBuilder::new(&catalog).unwrap();
        let mix = b.node("MixRGB").unwrap();
        let noise = b.node("TexNoise").unwrap();

        mix.set("color1", noise.output("color").unwrap()).unwrap();
        let notice = mix.set("color2", [0.8, 0.1, 0.1]).unwrap();
        assert!(notice.is_some());

        let graph = b.graph();
        let node = graph.node(mix.id()).unwrap();
        assert!(node.input(1).unwrap().link.is_some());
        assert_eq!(node.input(2).unwrap().value, Some(SocketValue::Color([0.8, 0.1, 0.1, 0.0])));
    }

    #[test]
    fn test_set_unknown_names() {
        let catalog = shader_catalog();
        let b = GraphBuilder::new(&catalog).unwrap();
        let mix = b.node("MixRGB").unwrap();

        assert!(matches!(mix.set("shine", 1.0), Err(BuildError::Validation(_))));
        assert!(mix.set_field("blend_type", "MULTIPLY").is_ok());
        assert_eq!(mix.field("blend_type"), Some(SocketValue::from("MULTIPLY")));
        assert!(matches!(
            mix.set_field("blend_mode", "MULTIPLY"),
            Err(ValidationError::UnknownField { .. })
        ));
    }

    #[test]
    fn test_node_without_outputs_is_rejected_as_operand() {
        let catalog = shader_catalog();
        let b = GraphBuilder::new(&catalog).unwrap();
        let output = b.node("OutputMaterial").unwrap();
        let math = b.node("Math").unwrap();

        assert!(matches!(
            math.set("value1", output),
            Err(BuildError::Connection(_))
        ));
    }

    #[test]
    fn test_interface_sockets_only_on_group_nodes() {
        let catalog = shader_catalog();
        let b = GraphBuilder::new(&catalog).unwrap();
        let math = b.node("Math").unwrap();
        assert!(matches!(
            math.add_output("Extra", SocketType::Value, None, None, None),
            Err(ValidationError::NotAGroupInterface { .. })
        ));

        let input = b.group_input().unwrap();
        let strength = input
            .add_output("Strength", SocketType::Value, None, None, None)
            .unwrap();
        assert_eq!(strength.socket_type(), Some(SocketType::Value));
        let doubled = strength * 2.0;
        assert_eq!(doubled.node().kind(), "ShaderNodeMath");
    }
}
