// SPDX-License-Identifier: MIT OR Apache-2.0
//! Well-known node kinds.

pub mod shader;

/// Group input pseudo-node; its outputs declare the group's inputs
pub const GROUP_INPUT_KIND: &str = "NodeGroupInput";
/// Group output pseudo-node; its inputs declare the group's outputs
pub const GROUP_OUTPUT_KIND: &str = "NodeGroupOutput";
/// Instance of a reusable group
pub const GROUP_KIND: &str = "ShaderNodeGroup";
/// Visual frame around other nodes
pub const FRAME_KIND: &str = "NodeFrame";

/// Field binding a group instance to its group container
pub const NODE_TREE_FIELD: &str = "node_tree";
/// Field every node kind carries
pub const LABEL_FIELD: &str = "label";
