//! `title`, `description` and string `default`
//!
//! `None` is a no-op; an empty string is written as-is.

use super::{keyword, SchemaBuilder};
use crate::arena::NodeId;

impl<'a> SchemaBuilder<'a> {
    pub fn title<'s>(&self, node: NodeId, title: impl Into<Option<&'s str>>) {
        self.set_optional_text(node, keyword::TITLE, title.into(), "title");
    }

    pub fn description<'s>(&self, node: NodeId, description: impl Into<Option<&'s str>>) {
        self.set_optional_text(node, keyword::DESCRIPTION, description.into(), "description");
    }

    pub fn default_str<'s>(&self, node: NodeId, value: impl Into<Option<&'s str>>) {
        self.set_optional_text(node, keyword::DEFAULT, value.into(), "default_str");
    }

    fn set_optional_text(&self, node: NodeId, key: &'static str, value: Option<&str>, op: &'static str) {
        let Some(value) = value else {
            return;
        };
        if !self.is_object(node, op) {
            return;
        }
        let text = self.arena.string(value);
        self.arena.set_static(node, key, text);
    }
}
