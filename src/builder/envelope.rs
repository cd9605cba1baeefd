//! Structured-output envelope
//!
//! Chat-completion APIs take a schema wrapped as
//! `{"type":"json_schema","name":...,"schema":...,"strict":...}`.

use super::SchemaBuilder;
use crate::arena::NodeId;

impl<'a> SchemaBuilder<'a> {
    /// Wrap `schema` in a `json_schema` response-format object.
    ///
    /// An empty `name` or a schema the envelope cannot hold leaves that key out.
    pub fn response_format(&self, name: &str, schema: NodeId, strict: bool) -> NodeId {
        let node = self.arena.object();
        let kind = self.arena.str_static("json_schema");
        self.arena.set_static(node, "type", kind);
        if self.non_empty(name, "response_format") {
            let name = self.arena.string(name);
            self.arena.set_static(node, "name", name);
        }
        if self.can_attach(node, schema, "response_format") {
            self.arena.set_static(node, "schema", schema);
        }
        let strict = self.arena.boolean(strict);
        self.arena.set_static(node, "strict", strict);
        node
    }
}

#[cfg(test)]
mod tests {
    use crate::arena::Arena;
    use crate::builder::SchemaBuilder;

    #[test]
    fn test_response_format_wraps_schema() {
        let arena = Arena::new();
        let b = SchemaBuilder::new(&arena);
        let schema = b.object();
        b.prop_required(schema, "city", b.string());
        b.additional_properties(schema, false);

        let envelope = b.response_format("weather", schema, true);
        assert_eq!(
            b.render(envelope).unwrap(),
            concat!(
                r#"{"type":"json_schema","name":"weather","schema":{"type":"object","#,
                r#""properties":{"city":{"type":"string"}},"required":["city"],"#,
                r#""additionalProperties":false},"strict":true}"#
            )
        );
    }

    #[test]
    fn test_response_format_without_name() {
        let arena = Arena::new();
        let b = SchemaBuilder::new(&arena);
        let envelope = b.response_format("", b.string(), false);
        assert_eq!(
            b.render(envelope).unwrap(),
            r#"{"type":"json_schema","schema":{"type":"string"},"strict":false}"#
        );
    }
}
