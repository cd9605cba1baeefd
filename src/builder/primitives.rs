//! Primitive type constructors

use super::{keyword, SchemaBuilder};
use crate::arena::NodeId;

impl<'a> SchemaBuilder<'a> {
    /// `{"type":<name>}` with the type name borrowed from a literal
    fn typed(&self, name: &'static str) -> NodeId {
        let node = self.arena.object();
        let type_name = self.arena.str_static(name);
        self.arena.set_static(node, keyword::TYPE, type_name);
        node
    }

    /// `{"type":"object"}`
    pub fn object(&self) -> NodeId {
        self.typed("object")
    }

    /// `{"type":"array"}`, with `items` when a schema is given
    pub fn array(&self, items: impl Into<Option<NodeId>>) -> NodeId {
        let node = self.typed("array");
        if let Some(items) = items.into() {
            if self.can_attach(node, items, "array") {
                self.arena.set_static(node, keyword::ITEMS, items);
            }
        }
        node
    }

    pub fn string(&self) -> NodeId {
        self.typed("string")
    }

    pub fn number(&self) -> NodeId {
        self.typed("number")
    }

    pub fn integer(&self) -> NodeId {
        self.typed("integer")
    }

    pub fn boolean(&self) -> NodeId {
        self.typed("boolean")
    }

    pub fn null(&self) -> NodeId {
        self.typed("null")
    }

    /// Object schema for a document root, `$schema` set to the configured dialect
    pub fn root(&self) -> NodeId {
        let node = self.object();
        self.set_schema(node, &self.config.dialect);
        node
    }
}

#[cfg(test)]
mod tests {
    use crate::arena::Arena;
    use crate::builder::SchemaBuilder;
    use crate::config::RenderConfig;

    #[test]
    fn test_type_literals() {
        let arena = Arena::new();
        let b = SchemaBuilder::new(&arena);
        let cases = [
            (b.object(), "object"),
            (b.string(), "string"),
            (b.number(), "number"),
            (b.integer(), "integer"),
            (b.boolean(), "boolean"),
            (b.null(), "null"),
        ];
        for (node, name) in cases {
            assert_eq!(b.render(node).unwrap(), format!(r#"{{"type":"{}"}}"#, name));
        }
    }

    #[test]
    fn test_array_with_and_without_items() {
        let arena = Arena::new();
        let b = SchemaBuilder::new(&arena);

        let typed = b.array(b.string());
        assert_eq!(
            b.render(typed).unwrap(),
            r#"{"type":"array","items":{"type":"string"}}"#
        );

        let untyped = b.array(None);
        assert_eq!(b.render(untyped).unwrap(), r#"{"type":"array"}"#);
    }

    #[test]
    fn test_array_ignores_foreign_items() {
        let arena = Arena::new();
        let other = Arena::new();
        let b = SchemaBuilder::new(&arena);
        let foreign = SchemaBuilder::new(&other).string();

        let node = b.array(foreign);
        assert_eq!(b.render(node).unwrap(), r#"{"type":"array"}"#);
    }

    #[test]
    fn test_root_uses_configured_dialect() {
        let arena = Arena::new();
        let config = RenderConfig {
            dialect: "https://json-schema.org/draft-07/schema#".to_string(),
            ..RenderConfig::default()
        };
        let b = SchemaBuilder::with_config(&arena, config);
        let root = b.root();
        assert_eq!(
            b.render(root).unwrap(),
            r#"{"type":"object","$schema":"https://json-schema.org/draft-07/schema#"}"#
        );
    }
}
