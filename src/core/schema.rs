//! Element schema lookup.
//!
//! The document's type system is owned by an external schema
//! loader. The indexer only needs to ask, per node type name,
//! whether the type is indexable and how. `SchemaAdapter` is that
//! seam; `ElementRegistry` is a map-backed implementation that can
//! be loaded from JSON.

use crate::core::error::{ChunkdexError, Result};
use crate::core::types::ElementDefinition;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Source of element definitions for a document's type system
pub trait SchemaAdapter {
    /// Look up the definition for a node type.
    ///
    /// Returns `None` for types the schema does not know; such
    /// nodes (and their subtrees) are not indexed.
    fn element_definition(&self, type_name: &str) -> Option<&ElementDefinition>;
}

/// Map-backed schema adapter
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementRegistry {
    elements: HashMap<String, ElementDefinition>,
}

impl ElementRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a registry from a JSON object of
    /// `{typeName: {"classification": "hard"|"soft", "validAttrs": [..]}}`
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| ChunkdexError::ConfigError(format!("Invalid element registry: {e}")))
    }

    /// Register (or replace) the definition for a type
    pub fn insert(&mut self, type_name: impl Into<String>, definition: ElementDefinition) {
        self.elements.insert(type_name.into(), definition);
    }

    /// Builder-style variant of [`ElementRegistry::insert`]
    pub fn with(mut self, type_name: impl Into<String>, definition: ElementDefinition) -> Self {
        self.insert(type_name, definition);
        self
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

impl SchemaAdapter for ElementRegistry {
    fn element_definition(&self, type_name: &str) -> Option<&ElementDefinition> {
        self.elements.get(type_name)
    }
}

impl<T: SchemaAdapter + ?Sized> SchemaAdapter for &T {
    fn element_definition(&self, type_name: &str) -> Option<&ElementDefinition> {
        (**self).element_definition(type_name)
    }
}
