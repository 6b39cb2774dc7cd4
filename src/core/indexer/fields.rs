//! Per-document field schema.
//!
//! Every chunk of a document must be indexed against the same set
//! of field identifiers, otherwise a query against one chunk would
//! not mean the same thing as the same query against another. The
//! schema is therefore derived once, up front, from the document's
//! attribute vocabulary and then passed by reference into every
//! chunk build.

use crate::core::error::{ChunkdexError, Result};
use crate::core::types::AttributeVocabulary;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Field that keys every indexed entry
pub const REFERENCE_FIELD: &str = "position";

pub const ELEMENT_NAME_FIELD: &str = "elementName";
pub const SOFT_NODE_FIELD: &str = "softNode";
pub const CONTENTS_FIELD: &str = "contents";

/// Fields present in every schema, in declaration order
pub const FIXED_FIELDS: [&str; 3] = [ELEMENT_NAME_FIELD, SOFT_NODE_FIELD, CONTENTS_FIELD];

const ATTR_FIELD_PREFIX: &str = "attr_";

/// Map an attribute name to its field name.
///
/// Colons (namespace separators) are stripped and the result is
/// prefixed, so `xml:id` becomes `attr_xmlid`.
pub fn attribute_field_name(attr_name: &str) -> String {
    let mut field = String::with_capacity(ATTR_FIELD_PREFIX.len() + attr_name.len());
    field.push_str(ATTR_FIELD_PREFIX);
    field.extend(attr_name.chars().filter(|c| *c != ':'));
    field
}

/// The searchable fields of one document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldSchema {
    reference_field: String,
    fixed_fields: Vec<String>,
    dynamic_fields: BTreeSet<String>,
}

impl FieldSchema {
    pub fn reference_field(&self) -> &str {
        &self.reference_field
    }

    pub fn fixed_fields(&self) -> &[String] {
        &self.fixed_fields
    }

    pub fn dynamic_fields(&self) -> &BTreeSet<String> {
        &self.dynamic_fields
    }

    /// Check whether `field` is searchable under this schema
    pub fn contains(&self, field: &str) -> bool {
        self.fixed_fields.iter().any(|f| f == field) || self.dynamic_fields.contains(field)
    }

    /// All searchable fields, fixed first
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.fixed_fields
            .iter()
            .map(String::as_str)
            .chain(self.dynamic_fields.iter().map(String::as_str))
    }
}

/// Derives a [`FieldSchema`] from an attribute vocabulary
#[derive(Debug, Clone, Copy, Default)]
pub struct FieldSchemaBuilder;

impl FieldSchemaBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Build the schema for a document.
    ///
    /// # Errors
    ///
    /// Returns `SchemaMismatch` if two vocabulary names sanitize to
    /// the same field name (e.g. `xml:id` and `xmlid`), since
    /// entries for both would otherwise share one field.
    pub fn build(&self, vocabulary: &AttributeVocabulary) -> Result<FieldSchema> {
        let mut origins: BTreeMap<String, &str> = BTreeMap::new();

        for attr_name in vocabulary.keys() {
            let field = attribute_field_name(attr_name);
            if let Some(previous) = origins.insert(field.clone(), attr_name) {
                return Err(ChunkdexError::SchemaMismatch(format!(
                    "attributes '{previous}' and '{attr_name}' both map to field '{field}'"
                )));
            }
        }

        tracing::debug!(
            "Field schema built: {} fixed, {} dynamic fields",
            FIXED_FIELDS.len(),
            origins.len()
        );

        Ok(FieldSchema {
            reference_field: REFERENCE_FIELD.to_string(),
            fixed_fields: FIXED_FIELDS.iter().map(|f| f.to_string()).collect(),
            dynamic_fields: origins.into_keys().collect(),
        })
    }
}
