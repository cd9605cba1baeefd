//! JSON Schema tree builder
//!
//! [`SchemaBuilder`] encodes the JSON Schema vocabulary on top of an
//! [`Arena`]. Leaves are built first, composed into objects and arrays, and the
//! root is rendered last:
//!
//! ```text
//! let arena = Arena::new();
//! let b = SchemaBuilder::new(&arena);
//! let root = b.object();
//! b.prop_required(root, "city", b.string());
//! b.additional_properties(root, false);
//! b.render(root)?  // {"type":"object","properties":{...},"required":["city"],...}
//! ```
//!
//! Every mutation is a silent no-op on invalid input (empty names, handles
//! from another arena, attachments that would make a node its own ancestor).
//! Skipped calls are reported through `tracing` at trace level only.

mod combinators;
mod constraints;
mod envelope;
mod metadata;
mod object;
mod primitives;
mod refs;

use tracing::trace;

use crate::arena::{Arena, NodeId, NodeKind};
use crate::checksum::Checksum;
use crate::config::{BuilderConfig, OutputFormat, RenderConfig};
use crate::error::Result;
use crate::render;

/// Schema keywords written by the builder
pub mod keyword {
    pub const TYPE: &str = "type";
    pub const PROPERTIES: &str = "properties";
    pub const REQUIRED: &str = "required";
    pub const ADDITIONAL_PROPERTIES: &str = "additionalProperties";
    pub const ITEMS: &str = "items";
    pub const REF: &str = "$ref";
    pub const DYNAMIC_REF: &str = "$dynamicRef";
    pub const DEFS: &str = "$defs";
    pub const ID: &str = "$id";
    pub const SCHEMA: &str = "$schema";
    pub const ANCHOR: &str = "$anchor";
    pub const DYNAMIC_ANCHOR: &str = "$dynamicAnchor";
    pub const TITLE: &str = "title";
    pub const DESCRIPTION: &str = "description";
    pub const DEFAULT: &str = "default";
    pub const FORMAT: &str = "format";
    pub const PATTERN: &str = "pattern";
    pub const ENUM: &str = "enum";
    pub const MINIMUM: &str = "minimum";
    pub const MAXIMUM: &str = "maximum";
    pub const EXCLUSIVE_MINIMUM: &str = "exclusiveMinimum";
    pub const EXCLUSIVE_MAXIMUM: &str = "exclusiveMaximum";
    pub const MIN_ITEMS: &str = "minItems";
    pub const MAX_ITEMS: &str = "maxItems";
    pub const UNIQUE_ITEMS: &str = "uniqueItems";
    pub const ANY_OF: &str = "anyOf";
    pub const ONE_OF: &str = "oneOf";
    pub const ALL_OF: &str = "allOf";
}

/// Builds JSON Schema nodes inside one arena scope
#[derive(Debug, Clone)]
pub struct SchemaBuilder<'a> {
    arena: &'a Arena,
    config: RenderConfig,
}

impl<'a> SchemaBuilder<'a> {
    /// Create a builder with default render settings
    pub fn new(arena: &'a Arena) -> Self {
        Self::with_config(arena, RenderConfig::default())
    }

    /// Create a builder with explicit render settings
    pub fn with_config(arena: &'a Arena, config: RenderConfig) -> Self {
        Self { arena, config }
    }

    /// Create a builder from a loaded [`BuilderConfig`]
    pub fn from_config(arena: &'a Arena, config: &BuilderConfig) -> Self {
        Self::with_config(arena, config.render.clone())
    }

    /// The arena nodes are allocated in
    pub fn arena(&self) -> &'a Arena {
        self.arena
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    // =========================================================================
    // Rendering
    // =========================================================================

    /// Canonical compact JSON text of `root`
    pub fn render(&self, root: NodeId) -> Result<String> {
        self.render_with(root, OutputFormat::Compact)
    }

    pub fn render_pretty(&self, root: NodeId) -> Result<String> {
        self.render_with(root, OutputFormat::Pretty)
    }

    /// Render in an explicit format.
    ///
    /// Trees nested deeper than `max_depth` fail with [`SchemaError::Json`]
    /// instead of rendering.
    ///
    /// [`SchemaError::Json`]: crate::SchemaError::Json
    pub fn render_with(&self, root: NodeId, format: OutputFormat) -> Result<String> {
        render::render(self.arena, root, format, self.config.max_depth)
    }

    /// Render using the configured output format
    pub fn render_configured(&self, root: NodeId) -> Result<String> {
        self.render_with(root, self.config.output_format)
    }

    pub fn to_value(&self, root: NodeId) -> Result<serde_json::Value> {
        render::to_value(self.arena, root, self.config.max_depth)
    }

    /// SHA256 of the compact rendering
    pub fn checksum(&self, root: NodeId) -> Result<Checksum> {
        Ok(Checksum::of_text(&self.render(root)?))
    }

    // =========================================================================
    // Shared guards
    // =========================================================================

    fn is_object(&self, node: NodeId, op: &'static str) -> bool {
        let ok = self.arena.kind(node) == Some(NodeKind::Object);
        if !ok {
            trace!(op, %node, "skipped: target is not an object node of this arena");
        }
        ok
    }

    fn non_empty(&self, value: &str, op: &'static str) -> bool {
        if value.is_empty() {
            trace!(op, "skipped: empty name or value");
        }
        !value.is_empty()
    }

    /// `child` can go below `parent` without foreign handles or cycles
    fn can_attach(&self, parent: NodeId, child: NodeId, op: &'static str) -> bool {
        if !self.arena.owns(child) {
            trace!(op, %child, "skipped: schema belongs to another arena");
            return false;
        }
        if self.arena.contains(child, parent) {
            trace!(op, %parent, %child, "skipped: schema would contain itself");
            return false;
        }
        true
    }

    /// Set a fixed keyword to a copied string, skipping empty values
    fn set_text(&self, node: NodeId, key: &'static str, value: &str, op: &'static str) {
        if !self.is_object(node, op) || !self.non_empty(value, op) {
            return;
        }
        let text = self.arena.string(value);
        self.arena.set_static(node, key, text);
    }

    fn set_bool(&self, node: NodeId, key: &'static str, value: bool, op: &'static str) {
        if !self.is_object(node, op) {
            return;
        }
        let flag = self.arena.boolean(value);
        self.arena.set_static(node, key, flag);
    }

    /// Fresh array of copied strings, empty entries skipped
    fn string_list<I>(&self, values: I) -> NodeId
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let list = self.arena.array();
        for value in values {
            let value = value.as_ref();
            if !value.is_empty() {
                let text = self.arena.string(value);
                self.arena.append(list, text);
            }
        }
        list
    }
}
