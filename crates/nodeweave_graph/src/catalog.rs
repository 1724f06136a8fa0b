// SPDX-License-Identifier: MIT OR Apache-2.0
//! Template catalog: the registry of node kinds known to a host.
//!
//! The catalog is built once from a [`GraphHost`] by [`CatalogBuilder`] and is
//! immutable afterwards. Every node kind maps to a shared
//! [`NodeKindDescriptor`]; socket names are disambiguated per socket list.

use crate::config::CatalogSettings;
use crate::host::{GraphHost, HostError, RawNodeKind, RawSocket};
use crate::kinds::LABEL_FIELD;
use crate::node::NodeKindDescriptor;
use crate::port::{dedupe_names, SocketTemplate, SocketType, SocketValue};
use indexmap::IndexMap;
use std::sync::Arc;

/// Immutable registry of node kinds
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    /// Descriptors by host kind name
    kinds: IndexMap<String, Arc<NodeKindDescriptor>>,
    /// Host kind name by short name
    short_names: IndexMap<String, String>,
}

impl Catalog {
    /// Look up a kind by host kind name or short name
    pub fn get(&self, name: &str) -> Result<Arc<NodeKindDescriptor>, CatalogError> {
        self.kinds
            .get(name)
            .or_else(|| self.short_names.get(name).and_then(|kind| self.kinds.get(kind)))
            .cloned()
            .ok_or_else(|| CatalogError::UnknownKind(name.to_string()))
    }

    /// Check whether a kind is known
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_ok()
    }

    /// All descriptors in scan order
    pub fn kinds(&self) -> impl Iterator<Item = &Arc<NodeKindDescriptor>> {
        self.kinds.values()
    }

    /// Number of kinds
    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    /// Whether the catalog is empty
    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }
}

/// Builds a [`Catalog`] from a host's raw kind descriptions
#[derive(Debug, Clone, Default)]
pub struct CatalogBuilder {
    settings: CatalogSettings,
}

impl CatalogBuilder {
    /// Create a builder with the given settings
    pub fn new(settings: CatalogSettings) -> Self {
        Self { settings }
    }

    /// Scan every kind the host offers
    pub fn build<H: GraphHost>(&self, host: &H) -> Result<Catalog, CatalogError> {
        let mut raw_kinds = Vec::new();
        for kind in host.enumerate_node_kinds() {
            if self.settings.skip_kinds.contains(&kind) {
                continue;
            }
            raw_kinds.push(host.describe_node_kind(&kind)?);
        }
        let catalog = self.build_from_raw(raw_kinds);
        tracing::debug!("Catalog built with {} node kinds", catalog.len());
        Ok(catalog)
    }

    /// Build a catalog from raw kind descriptions
    pub fn build_from_raw(&self, raw_kinds: impl IntoIterator<Item = RawNodeKind>) -> Catalog {
        let mut catalog = Catalog::default();
        for raw in raw_kinds {
            if self.settings.skip_kinds.contains(&raw.kind) {
                continue;
            }
            let descriptor = self.describe(raw);
            catalog
                .short_names
                .insert(descriptor.name.clone(), descriptor.kind.clone());
            catalog
                .kinds
                .insert(descriptor.kind.clone(), Arc::new(descriptor));
        }
        catalog
    }

    /// Turn one raw description into a descriptor
    pub fn describe(&self, raw: RawNodeKind) -> NodeKindDescriptor {
        let mut fields = raw.fields;
        fields
            .entry(LABEL_FIELD.to_string())
            .or_insert_with(|| SocketValue::from(""));

        NodeKindDescriptor {
            name: self.settings.short_name(&raw.kind),
            inputs: templates(&raw.inputs),
            outputs: templates(&raw.outputs),
            kind: raw.kind,
            fields,
        }
    }
}

/// Build deduplicated templates from raw sockets
pub fn templates(raw_sockets: &[RawSocket]) -> Vec<Arc<SocketTemplate>> {
    let mut templates: Vec<SocketTemplate> = raw_sockets
        .iter()
        .enumerate()
        .map(|(index, raw)| SocketTemplate {
            default: raw.default.clone(),
            min: raw.min,
            max: raw.max,
            ..SocketTemplate::new(index, raw.identifier.clone(), SocketType::from_host_name(&raw.socket_type))
        })
        .collect();
    dedupe_names(&mut templates);
    templates.into_iter().map(Arc::new).collect()
}

/// Catalog errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CatalogError {
    /// Node kind not in the catalog or not known to the host
    #[error("Unknown node kind: {0}")]
    UnknownKind(String),

    /// A kind lacks sockets the expression algebra relies on
    #[error("Node kind {kind} is missing {detail}")]
    IncompatibleKind {
        /// Node kind
        kind: String,
        /// What is missing
        detail: String,
    },

    /// Host failure while scanning
    #[error("Host error while scanning catalog: {0}")]
    Host(#[from] HostError),
}
