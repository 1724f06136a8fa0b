// SPDX-License-Identifier: MIT OR Apache-2.0
//! Layered layout for materialized graphs.
//!
//! Nodes are assigned to columns so that every link points right, sinks in
//! the rightmost column. Columns are spaced by their widest node, nodes in a
//! column are ordered by the mean index of the sockets they feed and each
//! column is centered vertically.

use crate::config::LayoutSettings;
use crate::host::{GraphHost, HostError};
use std::collections::{BTreeMap, HashMap};

/// Options for one layout run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LayoutOptions {
    /// Collapse every node
    pub hidden: bool,
    /// Space collapsed nodes by a fixed step instead of their height
    pub hidden_size: bool,
}

/// Link from a laid-out node into another node of the same set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutTarget {
    /// Index of the destination node
    pub node: usize,
    /// Index of the destination input socket
    pub socket: usize,
}

/// A node as seen by the layout algorithm
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutNode {
    /// Width and height
    pub size: [f32; 2],
    /// Outgoing links
    pub targets: Vec<LayoutTarget>,
}

/// Column of every node; sinks sit in column -1, sources further left
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnAssignment {
    /// Column per node, in input order
    pub columns: Vec<i32>,
    /// Relaxation passes that moved at least one node
    pub passes_with_updates: usize,
}

/// Layout errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LayoutError {
    /// Column relaxation did not settle; the links form a cycle
    #[error("Links between the {nodes} nodes form a cycle (no fixpoint after {passes} passes)")]
    Cycle {
        /// Number of nodes
        nodes: usize,
        /// Passes run before giving up
        passes: usize,
    },

    /// Host failure while reading or placing nodes
    #[error("Host error: {0}")]
    Host(#[from] HostError),
}

/// Host-independent layered layout
#[derive(Debug, Clone, Default)]
pub struct LayeredLayout {
    settings: LayoutSettings,
}

impl LayeredLayout {
    /// Create a layout with the given spacing
    pub fn new(settings: LayoutSettings) -> Self {
        Self { settings }
    }

    /// Assign columns by relaxation.
    ///
    /// Nodes start in column 0. Each pass visits the nodes in order and moves
    /// a node to one left of its leftmost target when it is not already left
    /// of it; a node without targets counts its targets' minimum as 0. Targets
    /// outside `nodes` are ignored.
    pub fn assign_columns(&self, nodes: &[LayoutNode]) -> Result<ColumnAssignment, LayoutError> {
        let mut columns = vec![0i32; nodes.len()];
        let mut passes_with_updates = 0;

        loop {
            let mut changed = false;
            for (index, node) in nodes.iter().enumerate() {
                let col_min = node
                    .targets
                    .iter()
                    .filter_map(|t| columns.get(t.node))
                    .min()
                    .copied()
                    .unwrap_or(0);
                if columns[index] >= col_min {
                    columns[index] = col_min - 1;
                    changed = true;
                }
            }
            if !changed {
                break;
            }
            passes_with_updates += 1;
            // An acyclic set settles within one pass per node
            if passes_with_updates > nodes.len() {
                return Err(LayoutError::Cycle {
                    nodes: nodes.len(),
                    passes: passes_with_updates,
                });
            }
        }

        tracing::trace!("Columns settled after {} passes", passes_with_updates);
        Ok(ColumnAssignment {
            columns,
            passes_with_updates,
        })
    }

    /// Compute a location for every node, in input order
    pub fn compute(&self, nodes: &[LayoutNode], options: LayoutOptions) -> Result<Vec<[f32; 2]>, LayoutError> {
        if nodes.is_empty() {
            return Ok(Vec::new());
        }
        let assignment = self.assign_columns(nodes)?;

        let mut by_column: BTreeMap<i32, Vec<usize>> = BTreeMap::new();
        for (index, column) in assignment.columns.iter().enumerate() {
            by_column.entry(*column).or_default().push(index);
        }
        // Rightmost column first
        let columns: Vec<&Vec<usize>> = by_column.values().rev().collect();

        let mut locations = vec![[0.0f32; 2]; nodes.len()];

        // Horizontal
        let widths: Vec<f32> = columns
            .iter()
            .map(|members| {
                self.settings.column_margin
                    + members
                        .iter()
                        .map(|i| nodes[*i].size[0])
                        .fold(f32::NEG_INFINITY, f32::max)
            })
            .collect();
        let mut x = widths[0];
        for (members, width) in columns.iter().zip(&widths) {
            x -= width;
            for index in members.iter() {
                locations[*index][0] = x;
            }
        }

        // Vertical
        for members in &columns {
            let mut order: Vec<usize> = members.to_vec();
            order.sort_by(|a, b| mean_target_socket(&nodes[*a]).total_cmp(&mean_target_socket(&nodes[*b])));

            let mut y = 0.0;
            for index in order {
                locations[index][1] = y;
                let delta = if options.hidden && options.hidden_size {
                    self.settings.collapsed_spacing
                } else {
                    2.0 * nodes[index].size[1] + self.settings.row_margin
                };
                y -= delta;
            }
        }

        // Centering
        for members in &columns {
            let mean = members.iter().map(|i| locations[*i][1]).sum::<f32>() / members.len() as f32;
            let shift = mean.abs();
            for index in members.iter() {
                locations[*index][1] += shift;
            }
        }

        tracing::debug!("Laid out {} nodes in {} columns", nodes.len(), columns.len());
        Ok(locations)
    }
}

/// Mean destination socket index; 0 for a node without targets
fn mean_target_socket(node: &LayoutNode) -> f32 {
    if node.targets.is_empty() {
        0.0
    } else {
        node.targets.iter().map(|t| t.socket as f32).sum::<f32>() / node.targets.len() as f32
    }
}

/// Lays out host nodes
#[derive(Debug, Clone, Default)]
pub struct NodeLayout {
    engine: LayeredLayout,
}

impl NodeLayout {
    /// Create a layout with the given spacing
    pub fn new(settings: LayoutSettings) -> Self {
        Self {
            engine: LayeredLayout::new(settings),
        }
    }

    /// Collapse or expand `nodes`, then place them.
    ///
    /// Returns the locations assigned, in the order of `nodes`.
    pub fn layout<H: GraphHost>(
        &self,
        host: &mut H,
        nodes: &[H::NodeHandle],
        options: LayoutOptions,
    ) -> Result<Vec<[f32; 2]>, LayoutError> {
        for node in nodes {
            host.set_hidden(*node, options.hidden)?;
        }

        let index: HashMap<H::NodeHandle, usize> = nodes.iter().enumerate().map(|(i, n)| (*n, i)).collect();
        let mut records = Vec::with_capacity(nodes.len());
        for node in nodes {
            let targets = host
                .outgoing_links(*node)?
                .into_iter()
                .filter_map(|link| {
                    index.get(&link.to_node).map(|&target| LayoutTarget {
                        node: target,
                        socket: link.to_socket,
                    })
                })
                .collect();
            records.push(LayoutNode {
                size: host.node_size(*node)?,
                targets,
            });
        }

        let locations = self.engine.compute(&records, options)?;
        for (node, location) in nodes.iter().zip(&locations) {
            host.set_location(*node, *location)?;
        }
        Ok(locations)
    }

    /// Lay out every node of a container
    pub fn layout_container<H: GraphHost>(
        &self,
        host: &mut H,
        container: H::Container,
        options: LayoutOptions,
    ) -> Result<Vec<[f32; 2]>, LayoutError> {
        let nodes = host.container_nodes(container)?;
        self.layout(host, &nodes, options)
    }
}
