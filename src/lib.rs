//! Familiar Schema Builder
//!
//! Builds JSON Schema (draft 2020-12) documents programmatically for code
//! generators and API-definition tooling, without hand-writing JSON text.
//!
//! ## Features
//!
//! - **Arena Scoped**: All nodes of a tree live in one [`Arena`] and are released together
//! - **Stable Output**: Keys render in insertion order; re-setting a key replaces it in place
//! - **Recursive Schemas**: `$defs`, `$ref`, `$anchor`, `$dynamicRef`, `$dynamicAnchor`
//! - **Forgiving API**: Invalid arguments are silent no-ops, so calls can be chained freely
//! - **Checksums**: SHA256 of the canonical rendering for change detection
//!
//! ## Example
//!
//! ```
//! use familiar_schema_builder::{Arena, SchemaBuilder};
//!
//! let arena = Arena::new();
//! let b = SchemaBuilder::new(&arena);
//!
//! let root = b.object();
//! b.prop(root, "city", b.string());
//! b.prop(root, "tempC", b.number());
//! b.required(root, ["city", "tempC"]);
//! b.additional_properties(root, false);
//!
//! assert_eq!(
//!     b.render(root).unwrap(),
//!     r#"{"type":"object","properties":{"city":{"type":"string"},"tempC":{"type":"number"}},"required":["city","tempC"],"additionalProperties":false}"#
//! );
//! ```
//!
//! ## Layout
//!
//! ```text
//! arena     node storage, handles, replace-or-append objects, acyclicity
//! render    compact / pretty JSON text, %g number formatting
//! builder   JSON Schema vocabulary on top of the arena
//! checksum  SHA256 of rendered schemas
//! config    arena and render settings (toml + SCHEMA_BUILDER_* env)
//! ```

pub mod arena;
pub mod builder;
pub mod checksum;
pub mod config;
pub mod error;
pub mod render;

pub use arena::{Arena, KeyStorage, NodeId, NodeKind};
pub use builder::{keyword, SchemaBuilder};
pub use checksum::Checksum;
pub use config::{
    ArenaConfig, BuilderConfig, OutputFormat, RenderConfig, DEFAULT_MAX_DEPTH, DRAFT_2020_12,
};
pub use error::{Result, SchemaError};
pub use render::format_general;
