// SPDX-License-Identifier: MIT OR Apache-2.0
//! Procedural node-graph construction for native node hosts.
//!
//! This crate builds abstract node graphs in code and turns them into native
//! nodes of a host application:
//! - Template catalog scanned from the host's node kinds
//! - Expression algebra: arithmetic on sockets appends math nodes
//! - Dependency closure of the nodes to materialize
//! - Two-pass materializer (nodes, then links)
//! - Layered layout of the materialized nodes
//!
//! ## Architecture
//!
//! Hosts implement [`GraphHost`]. [`MemoryHost`] is a complete in-memory
//! host used for tests and tooling. The abstract graph is an arena
//! ([`NodeGraph`]) addressed by ids; identity is never structural.

pub mod algebra;
pub mod catalog;
pub mod closure;
pub mod config;
pub mod connection;
pub mod generator;
pub mod graph;
pub mod host;
pub mod kinds;
pub mod layout;
pub mod node;
pub mod port;

pub use algebra::{BuildError, Expr, GraphBuilder, GroupInterface, MathOp, NodeRef, Operand, VectorOp};
pub use catalog::{Catalog, CatalogBuilder, CatalogError};
pub use closure::closure;
pub use config::{ConfigError, EngineConfig};
pub use connection::{Link, LinkId, SocketRef};
pub use generator::{ConfigurationWarning, GenerateError, Generated, Generator};
pub use graph::{ConnectionError, NodeGraph};
pub use host::{ContainerKind, GraphHost, HostError, MemoryHost};
pub use layout::{LayeredLayout, LayoutError, LayoutOptions, NodeLayout};
pub use node::{Node, NodeId, NodeKindDescriptor, ValidationError};
pub use port::{Direction, SocketTemplate, SocketType, SocketValue, TypeCoercionNotice};

#[cfg(test)]
pub(crate) mod test_support {
    use crate::catalog::{Catalog, CatalogBuilder};
    use crate::host::MemoryHost;
    use crate::kinds::shader::shader_node_kinds;

    /// Catalog of the built-in shader kinds
    pub fn shader_catalog() -> Catalog {
        CatalogBuilder::default().build_from_raw(shader_node_kinds())
    }

    /// In-memory host offering the built-in shader kinds
    pub fn shader_host() -> MemoryHost {
        MemoryHost::with_kinds(shader_node_kinds())
    }
}
