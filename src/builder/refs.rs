//! Identification, anchors and references
//!
//! Recursive schemas are expressed by name, never by node identity: a
//! definition is registered under `$defs` (or given an anchor) and pointed to
//! by `$ref` / `$dynamicRef` strings. The node graph itself stays acyclic and
//! the builder never resolves the strings.

use super::{keyword, SchemaBuilder};
use crate::arena::NodeId;

impl<'a> SchemaBuilder<'a> {
    /// `{"$ref":<reference>}`; an empty reference yields `{}`
    pub fn schema_ref(&self, reference: &str) -> NodeId {
        self.reference_node(keyword::REF, reference)
    }

    /// `{"$dynamicRef":<reference>}`; an empty reference yields `{}`
    pub fn dynamic_ref(&self, reference: &str) -> NodeId {
        self.reference_node(keyword::DYNAMIC_REF, reference)
    }

    fn reference_node(&self, key: &'static str, reference: &str) -> NodeId {
        let node = self.arena.object();
        if !reference.is_empty() {
            let target = self.arena.string(reference);
            self.arena.set_static(node, key, target);
        }
        node
    }

    /// Set `$id`
    pub fn set_id(&self, node: NodeId, uri: &str) {
        self.set_text(node, keyword::ID, uri, "set_id");
    }

    /// Set `$schema`
    pub fn set_schema(&self, node: NodeId, uri: &str) {
        self.set_text(node, keyword::SCHEMA, uri, "set_schema");
    }

    /// Set `$anchor`
    pub fn anchor(&self, node: NodeId, name: &str) {
        self.set_text(node, keyword::ANCHOR, name, "anchor");
    }

    /// Set `$dynamicAnchor`
    pub fn dynamic_anchor(&self, node: NodeId, name: &str) {
        self.set_text(node, keyword::DYNAMIC_ANCHOR, name, "dynamic_anchor");
    }
}
