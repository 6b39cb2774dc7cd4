//! Document tree walker.
//!
//! Traverses the document depth-first and decides per node whether
//! it becomes an index entry and whether its children are visited.
//! Unknown node types are skipped along with their subtree (foreign
//! or opaque content) and counted, not treated as errors.

use crate::core::error::{ChunkdexError, Result};
use crate::core::indexer::fields::attribute_field_name;
use crate::core::schema::SchemaAdapter;
use crate::core::types::{DocumentNode, ElementDefinition, IndexEntry};
use std::collections::BTreeMap;

/// What to do with a visited node
enum Visit<'a> {
    /// No element definition: no entry, no descent
    Skip,
    /// Opaque leaf: one entry holding the subtree text
    Soft(&'a ElementDefinition),
    /// Indexed itself, children considered independently
    Hard(&'a ElementDefinition),
}

/// Result of walking one document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WalkOutput {
    /// Entries in traversal (and position) order
    pub entries: Vec<IndexEntry>,

    /// Nodes skipped for lack of an element definition
    pub skipped_nodes: usize,
}

/// Depth-first document walker
pub struct DocumentWalker<S> {
    schema: S,
}

impl<S: SchemaAdapter> DocumentWalker<S> {
    pub fn new(schema: S) -> Self {
        Self { schema }
    }

    /// Walk a document and collect its index entries.
    ///
    /// `root` is the document container: it is not indexed itself
    /// and its first child sits at position 0. A node at position
    /// `p` has its own first child at `p + 1`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidDocument` if a node's span does not fit in
    /// the `u64` position space (explicit `nodeSize` values).
    pub fn walk(&self, root: &DocumentNode) -> Result<WalkOutput> {
        let mut output = WalkOutput::default();
        let mut stack: Vec<Placed<'_>> = Vec::new();

        push_children(&mut stack, root, 0)?;

        while let Some(placed) = stack.pop() {
            let Placed { node, position, .. } = placed;

            match self.classify(node) {
                Visit::Skip => {
                    tracing::trace!(
                        "Skipping unknown element '{}' at position {}",
                        node.type_name,
                        position
                    );
                    output.skipped_nodes += 1;
                }
                Visit::Soft(definition) => {
                    let contents = Some(node.text_content());
                    output.entries.push(entry(placed, definition, contents));
                }
                Visit::Hard(definition) => {
                    output.entries.push(entry(placed, definition, None));
                    let first_child = position
                        .checked_add(1)
                        .ok_or_else(|| out_of_range(node, position))?;
                    push_children(&mut stack, node, first_child)?;
                }
            }
        }

        Ok(output)
    }

    fn classify<'a>(&'a self, node: &DocumentNode) -> Visit<'a> {
        match self.schema.element_definition(&node.type_name) {
            None => Visit::Skip,
            Some(definition) if definition.is_soft() => Visit::Soft(definition),
            Some(definition) => Visit::Hard(definition),
        }
    }
}

/// A node with its resolved position and size
#[derive(Clone, Copy)]
struct Placed<'a> {
    node: &'a DocumentNode,
    position: u64,
    size: u64,
}

/// Push `node`'s children so that the first child is popped first.
///
/// Every child's span `[position, position + size)` must fit in a
/// `u64`, so sibling positions cannot wrap.
fn push_children<'a>(
    stack: &mut Vec<Placed<'a>>,
    node: &'a DocumentNode,
    start: u64,
) -> Result<()> {
    let mut position = start;
    let mut placed = Vec::with_capacity(node.children().len());

    for child in node.children() {
        let size = child.size().ok_or_else(|| out_of_range(child, position))?;
        placed.push(Placed {
            node: child,
            position,
            size,
        });
        position = position
            .checked_add(size)
            .ok_or_else(|| out_of_range(child, position))?;
    }

    stack.extend(placed.into_iter().rev());
    Ok(())
}

fn out_of_range(node: &DocumentNode, position: u64) -> ChunkdexError {
    ChunkdexError::InvalidDocument(format!(
        "<{}> at position {} overflows the position space",
        node.type_name, position
    ))
}

fn entry(
    placed: Placed<'_>,
    definition: &ElementDefinition,
    contents: Option<String>,
) -> IndexEntry {
    IndexEntry {
        position: placed.position,
        element_name: placed.node.type_name.clone(),
        is_soft: definition.is_soft(),
        contents,
        subtree_size: placed.size,
        attribute_fields: attribute_fields(placed.node, definition),
    }
}

/// Collect the node's valid attributes as field name to value
///
/// Null values are omitted; strings are kept verbatim and other
/// JSON values use their JSON text.
fn attribute_fields(
    node: &DocumentNode,
    definition: &ElementDefinition,
) -> BTreeMap<String, String> {
    node.attrs
        .iter()
        .filter(|(name, _)| definition.valid_attrs.contains(name.as_str()))
        .filter_map(|(name, value)| {
            let value = match value {
                serde_json::Value::Null => return None,
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            Some((attribute_field_name(name), value))
        })
        .collect()
}
