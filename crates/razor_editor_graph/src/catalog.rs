// SPDX-License-Identifier: MIT OR Apache-2.0
//! Node type catalog for the material graph.

use crate::connector::{ConnectorDesc, ValueKind};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Maximum number of connectors in either column of a template
pub const MAX_CONNECTORS: usize = 32;

/// Node template definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeTemplate {
    /// Template name, also the catalog key
    pub name: String,
    /// Input connectors, in display order
    pub inputs: Vec<ConnectorDesc>,
    /// Output connectors, in display order
    pub outputs: Vec<ConnectorDesc>,
}

impl NodeTemplate {
    /// Create a template without connectors
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            inputs: Vec::new(),
            outputs: Vec::new(),
        }
    }

    /// Append an input connector
    pub fn with_input(mut self, name: impl Into<String>, kind: ValueKind) -> Self {
        self.inputs.push(ConnectorDesc::new(name, kind));
        self
    }

    /// Append an output connector
    pub fn with_output(mut self, name: impl Into<String>, kind: ValueKind) -> Self {
        self.outputs.push(ConnectorDesc::new(name, kind));
        self
    }
}

/// Catalog of available node templates
#[derive(Debug, Clone, Default)]
pub struct NodeCatalog {
    /// Registered templates by name, in registration order
    templates: IndexMap<String, NodeTemplate>,
}

impl NodeCatalog {
    /// Create a new empty catalog
    pub fn new() -> Self {
        Self {
            templates: IndexMap::new(),
        }
    }

    /// Create the catalog of compiled-in material nodes
    pub fn builtin() -> Self {
        let mut catalog = Self::new();

        // Math
        let templates = [
            NodeTemplate::new("Multiply")
                .with_input("Input1", ValueKind::Float)
                .with_input("Input2", ValueKind::Float)
                .with_output("Out", ValueKind::Float),
            NodeTemplate::new("Add")
                .with_input("Input1", ValueKind::Float)
                .with_input("Input2", ValueKind::Float)
                .with_output("Out", ValueKind::Float),
        ];

        for template in templates {
            if let Err(err) = catalog.register(template) {
                tracing::error!("Invalid builtin node template: {err}");
            }
        }

        catalog
    }

    /// Register a template
    pub fn register(&mut self, template: NodeTemplate) -> Result<(), CatalogError> {
        let count = template.inputs.len().max(template.outputs.len());
        if count > MAX_CONNECTORS {
            return Err(CatalogError::TooManyConnectors {
                template: template.name,
                count,
            });
        }
        if self.templates.contains_key(&template.name) {
            return Err(CatalogError::DuplicateTemplate(template.name));
        }

        self.templates.insert(template.name.clone(), template);
        Ok(())
    }

    /// Find a template by exact, case-sensitive name
    pub fn find_template(&self, name: &str) -> Option<&NodeTemplate> {
        self.templates.get(name)
    }

    /// Names of all templates, in registration order
    pub fn template_names(&self) -> impl Iterator<Item = &str> {
        self.templates.keys().map(String::as_str)
    }

    /// Number of registered templates
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    /// Whether the catalog has no templates
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

/// Error when registering a template
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// A connector column exceeds [`MAX_CONNECTORS`]
    #[error("Template {template:?} has {count} connectors in one column (max {MAX_CONNECTORS})")]
    TooManyConnectors {
        /// Template name
        template: String,
        /// Size of the larger column
        count: usize,
    },

    /// A template with the same name is already registered
    #[error("Template already registered: {0:?}")]
    DuplicateTemplate(String),
}
