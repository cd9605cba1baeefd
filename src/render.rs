//! Rendering schema nodes to JSON text
//!
//! Output is canonical: keys in insertion order, no whitespace in the compact
//! form, and number text emitted exactly as it was stored when the constraint
//! was set.
//!
//! Serialization recurses once per nesting level, so every render takes a
//! depth limit and fails with an error past it rather than exhausting the
//! stack.

use serde::ser::{Error as _, SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use serde_json::value::RawValue;
use tracing::debug;

use crate::arena::{Arena, Node, NodeId};
use crate::config::OutputFormat;
use crate::error::{Result, SchemaError};

/// Significant digits used by [`format_general`]
const GENERAL_PRECISION: i32 = 6;

/// Render a float the way C's `%g` does: six significant digits, trailing
/// zeros dropped, exponent form outside `[1e-4, 1e6)`.
pub fn format_general(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let scientific = format!("{:.*e}", (GENERAL_PRECISION - 1) as usize, value);
    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        return value.to_string();
    };
    let exponent: i32 = exponent.parse().unwrap_or(0);

    if exponent < -4 || exponent >= GENERAL_PRECISION {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{}e{}{:02}", trim_fraction(mantissa), sign, exponent.abs())
    } else {
        let decimals = (GENERAL_PRECISION - 1 - exponent) as usize;
        trim_fraction(&format!("{:.*}", decimals, value)).to_string()
    }
}

fn trim_fraction(text: &str) -> &str {
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.')
    } else {
        text
    }
}

/// Serializable view of one node and everything below it
struct NodeView<'a> {
    nodes: &'a [Node],
    id: NodeId,
    depth: usize,
    max_depth: usize,
}

impl Serialize for NodeView<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        if self.depth > self.max_depth {
            return Err(S::Error::custom(format_args!(
                "schema nesting exceeds {} levels at node {}",
                self.max_depth, self.id
            )));
        }
        match &self.nodes[self.id.index()] {
            Node::Object(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (key, child) in entries {
                    map.serialize_entry(&**key, &self.child(*child))?;
                }
                map.end()
            }
            Node::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for child in items {
                    seq.serialize_element(&self.child(*child))?;
                }
                seq.end()
            }
            Node::String(text) => serializer.serialize_str(text),
            Node::Number(text) => {
                let raw = RawValue::from_string(text.clone()).map_err(S::Error::custom)?;
                raw.serialize(serializer)
            }
            Node::Boolean(value) => serializer.serialize_bool(*value),
            Node::Null => serializer.serialize_unit(),
        }
    }
}

impl<'a> NodeView<'a> {
    fn root(nodes: &'a [Node], id: NodeId, max_depth: usize) -> Self {
        Self {
            nodes,
            id,
            depth: 0,
            max_depth,
        }
    }

    fn child(&self, id: NodeId) -> NodeView<'a> {
        NodeView {
            nodes: self.nodes,
            id,
            depth: self.depth + 1,
            max_depth: self.max_depth,
        }
    }
}

fn ensure_owned(arena: &Arena, root: NodeId) -> Result<()> {
    if arena.owns(root) {
        Ok(())
    } else {
        Err(SchemaError::UnknownNode(root))
    }
}

/// Render `root` as JSON text, nesting at most `max_depth` levels below it
pub fn render(arena: &Arena, root: NodeId, format: OutputFormat, max_depth: usize) -> Result<String> {
    ensure_owned(arena, root)?;
    let text = arena.with_nodes(|nodes| {
        let view = NodeView::root(nodes, root, max_depth);
        match format {
            OutputFormat::Compact => serde_json::to_string(&view),
            OutputFormat::Pretty => serde_json::to_string_pretty(&view),
        }
    })?;
    debug!(%root, nodes = arena.len(), bytes = text.len(), "rendered schema");
    Ok(text)
}

/// Convert `root` into an order-preserving `serde_json::Value`
pub fn to_value(arena: &Arena, root: NodeId, max_depth: usize) -> Result<serde_json::Value> {
    ensure_owned(arena, root)?;
    let value =
        arena.with_nodes(|nodes| serde_json::to_value(NodeView::root(nodes, root, max_depth)))?;
    Ok(value)
}
