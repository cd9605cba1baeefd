//! `anyOf` / `oneOf` / `allOf`
//!
//! Each combinator wraps its inputs in a new node with a single keyword; the
//! sub-schemas themselves are not modified.

use super::{keyword, SchemaBuilder};
use crate::arena::NodeId;

impl<'a> SchemaBuilder<'a> {
    pub fn any_of<I, T>(&self, schemas: I) -> NodeId
    where
        I: IntoIterator<Item = T>,
        T: Into<Option<NodeId>>,
    {
        self.combine(keyword::ANY_OF, schemas)
    }

    pub fn one_of<I, T>(&self, schemas: I) -> NodeId
    where
        I: IntoIterator<Item = T>,
        T: Into<Option<NodeId>>,
    {
        self.combine(keyword::ONE_OF, schemas)
    }

    pub fn all_of<I, T>(&self, schemas: I) -> NodeId
    where
        I: IntoIterator<Item = T>,
        T: Into<Option<NodeId>>,
    {
        self.combine(keyword::ALL_OF, schemas)
    }

    /// `{<keyword>:[...]}` in input order, `None` entries skipped
    fn combine<I, T>(&self, keyword: &'static str, schemas: I) -> NodeId
    where
        I: IntoIterator<Item = T>,
        T: Into<Option<NodeId>>,
    {
        let node = self.arena.object();
        let list = self.arena.array();
        for schema in schemas {
            let schema: Option<NodeId> = schema.into();
            if let Some(schema) = schema {
                self.arena.append(list, schema);
            }
        }
        self.arena.set_static(node, keyword, list);
        node
    }
}

#[cfg(test)]
mod tests {
    use crate::arena::{Arena, NodeId};
    use crate::builder::SchemaBuilder;

    #[test]
    fn test_each_combinator_has_exactly_one_key() {
        let arena = Arena::new();
        let b = SchemaBuilder::new(&arena);
        let parts = [b.string(), b.number(), b.null()];

        for (node, key) in [
            (b.any_of(parts), "anyOf"),
            (b.one_of(parts), "oneOf"),
            (b.all_of(parts), "allOf"),
        ] {
            let entries = arena.entries(node);
            assert_eq!(entries.len(), 1);
            assert_eq!(entries[0].0, key);
            assert_eq!(arena.items(entries[0].1), parts.to_vec());
        }
    }

    #[test]
    fn test_none_entries_are_skipped() {
        let arena = Arena::new();
        let b = SchemaBuilder::new(&arena);
        let schemas: Vec<Option<NodeId>> = vec![None, Some(b.string()), None, Some(b.null())];
        let node = b.any_of(schemas);

        assert_eq!(
            b.render(node).unwrap(),
            r#"{"anyOf":[{"type":"string"},{"type":"null"}]}"#
        );
    }

    #[test]
    fn test_empty_input_gives_empty_array() {
        let arena = Arena::new();
        let b = SchemaBuilder::new(&arena);
        let node = b.all_of(Vec::<NodeId>::new());
        assert_eq!(b.render(node).unwrap(), r#"{"allOf":[]}"#);
    }

    #[test]
    fn test_inputs_are_not_mutated() {
        let arena = Arena::new();
        let b = SchemaBuilder::new(&arena);
        let s = b.string();
        let before = b.render(s).unwrap();
        let _ = b.one_of([s]);
        assert_eq!(b.render(s).unwrap(), before);
    }
}
