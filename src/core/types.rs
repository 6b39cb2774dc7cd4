//! Core data types for chunkdex.
//!
//! This module defines the document tree as it arrives from the
//! editor model, the schema vocabulary describing it, and the
//! entries and chunks produced while indexing it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// A node of the markup document tree
///
/// Mirrors the editor model's JSON interchange format: a type
/// name, an attribute mapping, optional children and optional
/// text. The model may also state the node's span explicitly via
/// `nodeSize`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentNode {
    /// Element type name (e.g. "para", "text")
    #[serde(rename = "type")]
    pub type_name: String,

    /// Attribute mapping
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attrs: BTreeMap<String, serde_json::Value>,

    /// Ordered children; `None` marks a leaf node
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<Vec<DocumentNode>>,

    /// Text of a text node
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    /// Explicit subtree span, when supplied by the editor model
    #[serde(default, rename = "nodeSize", skip_serializing_if = "Option::is_none")]
    pub node_size: Option<u64>,
}

impl DocumentNode {
    /// Create a container node with the given children
    pub fn element(type_name: impl Into<String>, children: Vec<DocumentNode>) -> Self {
        Self {
            type_name: type_name.into(),
            content: Some(children),
            ..Default::default()
        }
    }

    /// Create a leaf node (occupies a single position)
    pub fn leaf(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            ..Default::default()
        }
    }

    /// Create a text node
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            type_name: "text".to_string(),
            text: Some(text.into()),
            ..Default::default()
        }
    }

    /// Builder-style attribute setter
    pub fn with_attr(
        mut self,
        name: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        self.attrs.insert(name.into(), value.into());
        self
    }

    /// Ordered children (empty for leaves and text nodes)
    pub fn children(&self) -> &[DocumentNode] {
        self.content.as_deref().unwrap_or(&[])
    }

    /// Number of positions this node's subtree occupies
    ///
    /// Text nodes take one position per character, leaves take
    /// one, and containers take their children plus an opening and
    /// closing position. Every node occupies at least one position
    /// so that positions strictly increase during traversal.
    ///
    /// Returns `None` if the size does not fit in a `u64`, which
    /// only happens with explicit `nodeSize` values.
    pub fn size(&self) -> Option<u64> {
        if let Some(size) = self.node_size {
            return Some(size.max(1));
        }

        let size = match (&self.content, &self.text) {
            (Some(children), _) => children.iter().try_fold(2u64, |total, child| {
                child.size().and_then(|size| total.checked_add(size))
            })?,
            (None, Some(text)) => text.chars().count() as u64,
            (None, None) => 1,
        };
        Some(size.max(1))
    }

    /// Concatenated text of the whole subtree, in document order
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        let mut stack = vec![self];

        while let Some(node) = stack.pop() {
            if let Some(text) = &node.text {
                out.push_str(text);
            }
            stack.extend(node.children().iter().rev());
        }

        out
    }
}

/// How an element type participates in indexing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Classification {
    /// Indexed itself; children are considered independently
    #[default]
    Hard,
    /// Indexed as one opaque leaf holding its subtree's text
    Soft,
}

/// Schema definition for one element type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementDefinition {
    #[serde(default)]
    pub classification: Classification,

    #[serde(default)]
    pub valid_attrs: BTreeSet<String>,
}

impl ElementDefinition {
    pub fn hard() -> Self {
        Self {
            classification: Classification::Hard,
            valid_attrs: BTreeSet::new(),
        }
    }

    pub fn soft() -> Self {
        Self {
            classification: Classification::Soft,
            valid_attrs: BTreeSet::new(),
        }
    }

    /// Builder-style setter for the valid attribute names
    pub fn with_attrs<I, S>(mut self, attrs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.valid_attrs = attrs.into_iter().map(Into::into).collect();
        self
    }

    pub fn is_soft(&self) -> bool {
        self.classification == Classification::Soft
    }
}

/// Declaration of one attribute in the document's vocabulary
///
/// Only the attribute's name matters for indexing; the remaining
/// properties are carried so that vocabularies round-trip.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AttrSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<serde_json::Value>,
}

/// Every attribute usable anywhere in a document's type system
pub type AttributeVocabulary = BTreeMap<String, AttrSpec>;

/// One indexable unit produced by the document walker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexEntry {
    /// Offset of the node in the document's position space
    pub position: u64,

    /// Element type name
    pub element_name: String,

    /// Whether the element is a soft (opaque leaf) node
    pub is_soft: bool,

    /// Flattened subtree text for soft nodes, `None` for hard nodes
    pub contents: Option<String>,

    /// Span of the node's subtree
    pub subtree_size: u64,

    /// Sanitized attribute field name to value
    pub attribute_fields: BTreeMap<String, String>,
}

/// Ordered, contiguous run of entries indexed together
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexChunk {
    pub entries: Vec<IndexEntry>,
}

impl IndexChunk {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, IndexEntry> {
        self.entries.iter()
    }
}

/// Statistics from indexing one resource
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexStats {
    /// Resource identifier
    pub resource_id: String,

    /// Number of entries produced by the walker
    pub entries_indexed: usize,

    /// Number of chunks built
    pub chunks_created: usize,

    /// Nodes skipped because their type has no element definition
    pub skipped_nodes: usize,

    /// Indexing duration in milliseconds
    pub duration_ms: u64,

    /// Completion timestamp
    pub indexed_at: DateTime<Utc>,
}
