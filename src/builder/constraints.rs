//! String, number and array constraint helpers

use tracing::trace;

use super::{keyword, SchemaBuilder};
use crate::arena::NodeId;

impl<'a> SchemaBuilder<'a> {
    /// Set `format` verbatim ("email", "date-time", ...); the name is not checked
    pub fn string_format(&self, node: NodeId, format: &str) {
        self.set_text(node, keyword::FORMAT, format, "string_format");
    }

    /// Set `pattern` verbatim; the regex is not compiled
    pub fn string_pattern(&self, node: NodeId, regex: &str) {
        self.set_text(node, keyword::PATTERN, regex, "string_pattern");
    }

    /// Replace `enum` with `values` in order, skipping empty entries.
    /// Duplicates are kept.
    pub fn string_enum<I>(&self, node: NodeId, values: I)
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        if !self.is_object(node, "string_enum") {
            return;
        }
        let list = self.string_list(values);
        self.arena.set_static(node, keyword::ENUM, list);
    }

    /// Set `minimum`, or `exclusiveMinimum` when `exclusive`
    pub fn number_min(&self, node: NodeId, min: f64, exclusive: bool) {
        let key = if exclusive { keyword::EXCLUSIVE_MINIMUM } else { keyword::MINIMUM };
        self.set_number(node, key, min, "number_min");
    }

    /// Set `maximum`, or `exclusiveMaximum` when `exclusive`
    pub fn number_max(&self, node: NodeId, max: f64, exclusive: bool) {
        let key = if exclusive { keyword::EXCLUSIVE_MAXIMUM } else { keyword::MAXIMUM };
        self.set_number(node, key, max, "number_max");
    }

    fn set_number(&self, node: NodeId, key: &'static str, value: f64, op: &'static str) {
        if !self.is_object(node, op) {
            return;
        }
        if let Some(number) = self.arena.number(value) {
            self.arena.set_static(node, key, number);
        }
    }

    /// Set `minItems`; negative counts are ignored
    pub fn array_min_items(&self, node: NodeId, min_items: i64) {
        self.set_count(node, keyword::MIN_ITEMS, min_items, "array_min_items");
    }

    /// Set `maxItems`; negative counts are ignored
    pub fn array_max_items(&self, node: NodeId, max_items: i64) {
        self.set_count(node, keyword::MAX_ITEMS, max_items, "array_max_items");
    }

    fn set_count(&self, node: NodeId, key: &'static str, count: i64, op: &'static str) {
        if count < 0 {
            trace!(op, count, "skipped: negative item count");
            return;
        }
        if !self.is_object(node, op) {
            return;
        }
        let count = self.arena.integer(count);
        self.arena.set_static(node, key, count);
    }

    /// Set `uniqueItems`
    pub fn array_unique(&self, node: NodeId, on: bool) {
        self.set_bool(node, keyword::UNIQUE_ITEMS, on, "array_unique");
    }
}

#[cfg(test)]
mod tests {
    use crate::arena::Arena;
    use crate::builder::SchemaBuilder;

    #[test]
    fn test_string_format_and_pattern() {
        let arena = Arena::new();
        let b = SchemaBuilder::new(&arena);
        let s = b.string();
        b.string_format(s, "email");
        b.string_pattern(s, r"^[a-z]+@\w+$");
        b.string_format(s, "");

        assert_eq!(
            b.render(s).unwrap(),
            r#"{"type":"string","format":"email","pattern":"^[a-z]+@\\w+$"}"#
        );
    }

    #[test]
    fn test_string_enum_keeps_order_and_duplicates() {
        let arena = Arena::new();
        let b = SchemaBuilder::new(&arena);
        let s = b.string();
        b.string_enum(s, ["first", "second"]);
        b.string_enum(s, ["asc", "", "desc", "asc"]);

        assert_eq!(
            b.render(s).unwrap(),
            r#"{"type":"string","enum":["asc","desc","asc"]}"#
        );
    }

    #[test]
    fn test_number_bounds() {
        let arena = Arena::new();
        let b = SchemaBuilder::new(&arena);
        let n = b.number();
        b.number_min(n, 0.0, false);
        b.number_min(n, 1.5, false);
        b.number_max(n, 100.0, true);

        assert_eq!(
            b.render(n).unwrap(),
            r#"{"type":"number","minimum":1.5,"exclusiveMaximum":100}"#
        );
    }

    #[test]
    fn test_number_bounds_keep_separate_keys_per_flag() {
        let arena = Arena::new();
        let b = SchemaBuilder::new(&arena);
        let n = b.number();
        b.number_min(n, 1.0, false);
        b.number_min(n, 2.0, true);

        assert_eq!(
            b.render(n).unwrap(),
            r#"{"type":"number","minimum":1,"exclusiveMinimum":2}"#
        );
    }

    #[test]
    fn test_number_bounds_ignore_non_finite() {
        let arena = Arena::new();
        let b = SchemaBuilder::new(&arena);
        let n = b.number();
        b.number_min(n, f64::NEG_INFINITY, false);
        b.number_max(n, f64::NAN, false);

        assert_eq!(b.render(n).unwrap(), r#"{"type":"number"}"#);
    }

    #[test]
    fn test_array_item_counts() {
        let arena = Arena::new();
        let b = SchemaBuilder::new(&arena);
        let arr = b.array(b.string());
        b.array_min_items(arr, 1);
        b.array_max_items(arr, 5);
        b.array_unique(arr, true);

        assert_eq!(
            b.render(arr).unwrap(),
            r#"{"type":"array","items":{"type":"string"},"minItems":1,"maxItems":5,"uniqueItems":true}"#
        );
    }

    #[test]
    fn test_negative_item_counts_leave_node_unchanged() {
        let arena = Arena::new();
        let b = SchemaBuilder::new(&arena);
        let arr = b.array(None);
        let before = b.render(arr).unwrap();
        b.array_min_items(arr, -1);
        b.array_max_items(arr, -5);

        assert_eq!(b.render(arr).unwrap(), before);
        assert!(!before.contains("minItems"));
    }
}
