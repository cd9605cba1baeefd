//! Object, property, required and `$defs` helpers
//!
//! `properties` and `$defs` are created on first use and reused afterwards.
//! Property and definition names are copied into the arena.

use tracing::trace;

use super::{keyword, SchemaBuilder};
use crate::arena::NodeId;

impl<'a> SchemaBuilder<'a> {
    /// Set `properties[name] = schema`, replacing an earlier value for `name`
    pub fn prop(&self, parent: NodeId, name: &str, schema: NodeId) {
        if !self.is_object(parent, "prop")
            || !self.non_empty(name, "prop")
            || !self.can_attach(parent, schema, "prop")
        {
            return;
        }
        self.put_property(parent, name, schema);
    }

    /// [`prop`](Self::prop), then append `name` to `required`.
    ///
    /// Appends every time: calling it twice with one name lists the name twice.
    pub fn prop_required(&self, parent: NodeId, name: &str, schema: NodeId) {
        if !self.is_object(parent, "prop_required")
            || !self.non_empty(name, "prop_required")
            || !self.can_attach(parent, schema, "prop_required")
        {
            return;
        }
        self.put_property(parent, name, schema);
        if let Some(required) = self.arena.ensure_array(parent, keyword::REQUIRED) {
            let name = self.arena.string(name);
            self.arena.append(required, name);
        }
    }

    fn put_property(&self, parent: NodeId, name: &str, schema: NodeId) {
        if let Some(props) = self.arena.ensure_object(parent, keyword::PROPERTIES) {
            self.arena.set_copied(props, name, schema);
        }
    }

    /// Replace `required` with `names` in order, skipping empty names
    pub fn required<I>(&self, parent: NodeId, names: I)
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        if !self.is_object(parent, "required") {
            return;
        }
        let list = self.string_list(names);
        self.arena.set_static(parent, keyword::REQUIRED, list);
    }

    /// Set `additionalProperties` to a boolean
    pub fn additional_properties(&self, parent: NodeId, allowed: bool) {
        self.set_bool(parent, keyword::ADDITIONAL_PROPERTIES, allowed, "additional_properties");
    }

    /// The `$defs` object of `root`, created if absent.
    ///
    /// `None` when `root` is not an object node of this arena.
    pub fn defs_ensure(&self, root: NodeId) -> Option<NodeId> {
        if !self.is_object(root, "defs_ensure") {
            return None;
        }
        self.arena.ensure_object(root, keyword::DEFS)
    }

    /// Replace-or-add `$defs[name] = schema`
    pub fn defs_set(&self, root: NodeId, name: &str, schema: NodeId) {
        if !self.is_object(root, "defs_set")
            || !self.non_empty(name, "defs_set")
            || !self.can_attach(root, schema, "defs_set")
        {
            return;
        }
        match self.defs_ensure(root) {
            Some(defs) => {
                self.arena.set_copied(defs, name, schema);
            }
            None => trace!(%root, "defs_set skipped: no $defs object"),
        }
    }

    /// Same as [`defs_set`](Self::defs_set)
    pub fn defs_add(&self, root: NodeId, name: &str, schema: NodeId) {
        self.defs_set(root, name, schema);
    }
}
