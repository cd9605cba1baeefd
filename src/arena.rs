//! Arena-scoped JSON value store
//!
//! Every schema node lives inside an [`Arena`] and is addressed through a
//! copyable [`NodeId`] handle. Nodes are never freed one by one; the whole
//! tree is released when the arena is dropped.
//!
//! The store keeps three guarantees the builder relies on:
//!
//! - object keys are unique (`set_*` replaces an existing key in place, or
//!   appends a new one at the end, so insertion order is stable)
//! - handles from a different arena are rejected instead of dereferenced
//! - the node graph stays acyclic (a node that already reaches the parent can
//!   not be attached below it)
//!
//! Each node also records the objects and arrays holding it, so the cycle
//! check can search upward from the parent and downward from the child at the
//! same time. Building leaves first, or roots first, costs constant time per
//! attach.
//!
//! Allocation and mutation take `&self`. The arena is `Send` but not `Sync`,
//! so a single scope can never be mutated from two threads at once.

use std::borrow::Cow;
use std::cell::RefCell;
use std::collections::HashSet;
use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};

use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use tracing::trace;

use crate::config::ArenaConfig;
use crate::error::{Result, SchemaError};
use crate::render::format_general;

/// Text stored in the arena: static literals are borrowed, caller input is copied
pub type Text = Cow<'static, str>;

static NEXT_ARENA_TAG: AtomicU32 = AtomicU32::new(1);

/// Handle to a node owned by one [`Arena`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId {
    arena: u32,
    index: u32,
}

impl NodeId {
    /// Position of the node inside its arena
    pub fn index(&self) -> usize {
        self.index as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.arena, self.index)
    }
}

/// Kind of JSON value a node holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Object,
    Array,
    String,
    Number,
    Boolean,
    Null,
}

/// How an object key is stored
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyStorage {
    /// Borrowed `'static` literal (schema keywords)
    Static,
    /// Copied into the arena (caller-supplied names)
    Copied,
}

#[derive(Debug, Clone)]
pub(crate) enum Node {
    Object(Vec<(Text, NodeId)>),
    Array(Vec<NodeId>),
    String(Text),
    /// Number kept as its rendered JSON text
    Number(String),
    Boolean(bool),
    Null,
}

impl Node {
    fn kind(&self) -> NodeKind {
        match self {
            Node::Object(_) => NodeKind::Object,
            Node::Array(_) => NodeKind::Array,
            Node::String(_) => NodeKind::String,
            Node::Number(_) => NodeKind::Number,
            Node::Boolean(_) => NodeKind::Boolean,
            Node::Null => NodeKind::Null,
        }
    }

    fn for_each_child(&self, mut f: impl FnMut(NodeId)) {
        match self {
            Node::Object(entries) => entries.iter().for_each(|(_, child)| f(*child)),
            Node::Array(items) => items.iter().for_each(|child| f(*child)),
            _ => {}
        }
    }
}

/// One allocation scope for schema nodes
#[derive(Debug)]
pub struct Arena {
    tag: u32,
    nodes: RefCell<Vec<Node>>,
    /// Holders of each node, one entry per edge
    parents: RefCell<Vec<Vec<NodeId>>>,
}

impl Default for Arena {
    fn default() -> Self {
        Self::new()
    }
}

impl Arena {
    /// Create an arena with the default initial capacity
    pub fn new() -> Self {
        Self::from_config(&ArenaConfig::default())
    }

    /// Create an arena sized from configuration
    pub fn from_config(config: &ArenaConfig) -> Self {
        Self::with_capacity(config.initial_capacity)
    }

    /// Create an arena that can hold `capacity` nodes before reallocating
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            tag: NEXT_ARENA_TAG.fetch_add(1, Ordering::Relaxed),
            nodes: RefCell::new(Vec::with_capacity(capacity)),
            parents: RefCell::new(Vec::with_capacity(capacity)),
        }
    }

    /// Number of nodes allocated so far
    pub fn len(&self) -> usize {
        self.nodes.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether `id` was allocated by this arena
    pub fn owns(&self, id: NodeId) -> bool {
        id.arena == self.tag && id.index() < self.len()
    }

    fn alloc(&self, node: Node) -> NodeId {
        let mut nodes = self.nodes.borrow_mut();
        let id = NodeId {
            arena: self.tag,
            index: nodes.len() as u32,
        };
        nodes.push(node);
        self.parents.borrow_mut().push(Vec::new());
        id
    }

    // =========================================================================
    // Leaf and container construction
    // =========================================================================

    pub fn object(&self) -> NodeId {
        self.alloc(Node::Object(Vec::new()))
    }

    pub fn array(&self) -> NodeId {
        self.alloc(Node::Array(Vec::new()))
    }

    /// String node referencing a static literal (no copy)
    pub fn str_static(&self, value: &'static str) -> NodeId {
        self.alloc(Node::String(Cow::Borrowed(value)))
    }

    /// String node holding a copy of `value`
    pub fn string(&self, value: impl Into<String>) -> NodeId {
        self.alloc(Node::String(Cow::Owned(value.into())))
    }

    /// Number node rendered in general (`%g`) format.
    ///
    /// Returns `None` for NaN and infinities, which JSON cannot represent.
    pub fn number(&self, value: f64) -> Option<NodeId> {
        if !value.is_finite() {
            trace!(value, "number skipped: not finite");
            return None;
        }
        Some(self.alloc(Node::Number(format_general(value))))
    }

    pub fn integer(&self, value: i64) -> NodeId {
        self.alloc(Node::Number(value.to_string()))
    }

    pub fn boolean(&self, value: bool) -> NodeId {
        self.alloc(Node::Boolean(value))
    }

    pub fn null(&self) -> NodeId {
        self.alloc(Node::Null)
    }

    // =========================================================================
    // Inspection
    // =========================================================================

    /// Kind of the node, or `None` for a handle this arena does not own
    pub fn kind(&self, id: NodeId) -> Option<NodeKind> {
        if id.arena != self.tag {
            return None;
        }
        self.nodes.borrow().get(id.index()).map(Node::kind)
    }

    /// Look up `key` on an object node.
    ///
    /// `None` means the key is absent or `obj` is not an object; a present
    /// child of any kind is returned as-is.
    pub fn get(&self, obj: NodeId, key: &str) -> Option<NodeId> {
        if !self.owns(obj) {
            return None;
        }
        match &self.nodes.borrow()[obj.index()] {
            Node::Object(entries) => entries
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, child)| *child),
            _ => None,
        }
    }

    /// Whether `key` on `obj` is a borrowed literal or an arena copy
    pub fn key_storage(&self, obj: NodeId, key: &str) -> Option<KeyStorage> {
        if !self.owns(obj) {
            return None;
        }
        match &self.nodes.borrow()[obj.index()] {
            Node::Object(entries) => entries.iter().find(|(k, _)| k == key).map(
                |(k, _)| match k {
                    Cow::Borrowed(_) => KeyStorage::Static,
                    Cow::Owned(_) => KeyStorage::Copied,
                },
            ),
            _ => None,
        }
    }

    /// Keys and children of an object node, in insertion order
    pub fn entries(&self, obj: NodeId) -> Vec<(String, NodeId)> {
        if !self.owns(obj) {
            return Vec::new();
        }
        match &self.nodes.borrow()[obj.index()] {
            Node::Object(entries) => entries
                .iter()
                .map(|(k, child)| (k.to_string(), *child))
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Elements of an array node, in append order
    pub fn items(&self, arr: NodeId) -> Vec<NodeId> {
        if !self.owns(arr) {
            return Vec::new();
        }
        match &self.nodes.borrow()[arr.index()] {
            Node::Array(items) => items.clone(),
            _ => Vec::new(),
        }
    }

    /// Number of entries (object) or elements (array)
    pub fn len_of(&self, id: NodeId) -> Option<usize> {
        if !self.owns(id) {
            return None;
        }
        match &self.nodes.borrow()[id.index()] {
            Node::Object(entries) => Some(entries.len()),
            Node::Array(items) => Some(items.len()),
            _ => None,
        }
    }

    pub fn as_str(&self, id: NodeId) -> Option<String> {
        if !self.owns(id) {
            return None;
        }
        match &self.nodes.borrow()[id.index()] {
            Node::String(text) => Some(text.to_string()),
            _ => None,
        }
    }

    pub fn as_bool(&self, id: NodeId) -> Option<bool> {
        if !self.owns(id) {
            return None;
        }
        match &self.nodes.borrow()[id.index()] {
            Node::Boolean(value) => Some(*value),
            _ => None,
        }
    }

    /// Rendered JSON text of a number node
    pub fn number_text(&self, id: NodeId) -> Option<String> {
        if !self.owns(id) {
            return None;
        }
        match &self.nodes.borrow()[id.index()] {
            Node::Number(text) => Some(text.clone()),
            _ => None,
        }
    }

    // =========================================================================
    // Mutation
    // =========================================================================

    /// Set `key` to `value` on `obj`, keyword literal variant (key not copied)
    pub fn set_static(&self, obj: NodeId, key: &'static str, value: NodeId) -> bool {
        self.set_key(obj, Cow::Borrowed(key), value)
    }

    /// Set `key` to `value` on `obj`, copying the key into the arena
    pub fn set_copied(&self, obj: NodeId, key: &str, value: NodeId) -> bool {
        self.set_key(obj, Cow::Owned(key.to_owned()), value)
    }

    fn set_key(&self, obj: NodeId, key: Text, value: NodeId) -> bool {
        if !self.owns(obj) || !self.owns(value) {
            trace!(%obj, %value, key = %key, "set skipped: foreign or dangling handle");
            return false;
        }
        if self.kind(obj) != Some(NodeKind::Object) {
            trace!(%obj, key = %key, "set skipped: target is not an object");
            return false;
        }
        if self.contains(value, obj) {
            trace!(%obj, %value, key = %key, "set skipped: would create a cycle");
            return false;
        }
        let mut nodes = self.nodes.borrow_mut();
        let Node::Object(entries) = &mut nodes[obj.index()] else {
            return false;
        };
        let replaced = match entries.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => Some(std::mem::replace(&mut slot.1, value)),
            None => {
                entries.push((key, value));
                None
            }
        };
        let mut parents = self.parents.borrow_mut();
        if let Some(old) = replaced {
            let holders = &mut parents[old.index()];
            if let Some(pos) = holders.iter().position(|holder| *holder == obj) {
                holders.swap_remove(pos);
            }
        }
        parents[value.index()].push(obj);
        true
    }

    /// Append `value` to the array node `arr`
    pub fn append(&self, arr: NodeId, value: NodeId) -> bool {
        if !self.owns(arr) || !self.owns(value) {
            trace!(%arr, %value, "append skipped: foreign or dangling handle");
            return false;
        }
        if self.kind(arr) != Some(NodeKind::Array) {
            trace!(%arr, "append skipped: target is not an array");
            return false;
        }
        if self.contains(value, arr) {
            trace!(%arr, %value, "append skipped: would create a cycle");
            return false;
        }
        let mut nodes = self.nodes.borrow_mut();
        let Node::Array(items) = &mut nodes[arr.index()] else {
            return false;
        };
        items.push(value);
        self.parents.borrow_mut()[value.index()].push(arr);
        true
    }

    /// Get the object child at `key`, creating an empty one if it is absent
    /// or holds another kind of value
    pub fn ensure_object(&self, obj: NodeId, key: &'static str) -> Option<NodeId> {
        self.ensure_child(obj, key, NodeKind::Object)
    }

    /// Get the array child at `key`, creating an empty one if it is absent
    /// or holds another kind of value
    pub fn ensure_array(&self, obj: NodeId, key: &'static str) -> Option<NodeId> {
        self.ensure_child(obj, key, NodeKind::Array)
    }

    fn ensure_child(&self, obj: NodeId, key: &'static str, kind: NodeKind) -> Option<NodeId> {
        if self.kind(obj) != Some(NodeKind::Object) {
            return None;
        }
        if let Some(existing) = self.get(obj, key) {
            if self.kind(existing) == Some(kind) {
                return Some(existing);
            }
        }
        let child = match kind {
            NodeKind::Array => self.array(),
            _ => self.object(),
        };
        self.set_static(obj, key, child).then_some(child)
    }

    // =========================================================================
    // Graph checks
    // =========================================================================

    /// Whether `node` is `ancestor` or lies somewhere beneath it.
    ///
    /// Searches down from `ancestor` and up from `node` in lockstep and stops
    /// as soon as either side runs out, so the cost is bounded by the smaller
    /// of the two neighbourhoods.
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        if !self.owns(ancestor) || !self.owns(node) {
            return false;
        }
        if ancestor == node {
            return true;
        }
        let nodes = self.nodes.borrow();
        let parents = self.parents.borrow();

        let mut down = vec![ancestor];
        let mut up = vec![node];
        let mut seen_down = HashSet::from([ancestor]);
        let mut seen_up = HashSet::from([node]);
        loop {
            let Some(holder) = up.pop() else {
                return false;
            };
            for &above in &parents[holder.index()] {
                if above == ancestor {
                    return true;
                }
                if seen_up.insert(above) {
                    up.push(above);
                }
            }

            let Some(current) = down.pop() else {
                return false;
            };
            let mut found = false;
            nodes[current.index()].for_each_child(|child| {
                if child == node {
                    found = true;
                } else if seen_down.insert(child) {
                    down.push(child);
                }
            });
            if found {
                return true;
            }
        }
    }

    /// Parent-to-child graph of every node in the arena.
    ///
    /// Graph indices equal [`NodeId::index`].
    pub fn dependency_graph(&self) -> DiGraph<NodeKind, ()> {
        let nodes = self.nodes.borrow();
        let mut graph = DiGraph::with_capacity(nodes.len(), nodes.len());
        for node in nodes.iter() {
            graph.add_node(node.kind());
        }
        for (index, node) in nodes.iter().enumerate() {
            node.for_each_child(|child| {
                graph.add_edge(NodeIndex::new(index), NodeIndex::new(child.index()), ());
            });
        }
        graph
    }

    pub fn is_acyclic(&self) -> bool {
        self.check_acyclic().is_ok()
    }

    /// Like [`Arena::is_acyclic`], reporting a node on the offending cycle
    pub fn check_acyclic(&self) -> Result<()> {
        toposort(&self.dependency_graph(), None)
            .map(|_| ())
            .map_err(|cycle| SchemaError::Cycle {
                node: NodeId {
                    arena: self.tag,
                    index: cycle.node_id().index() as u32,
                },
            })
    }

    /// Run `f` over the raw node table
    pub(crate) fn with_nodes<R>(&self, f: impl FnOnce(&[Node]) -> R) -> R {
        f(&self.nodes.borrow())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_replaces_existing_key_in_place() {
        let arena = Arena::new();
        let obj = arena.object();
        let first = arena.str_static("a");
        let second = arena.str_static("b");
        let other = arena.null();

        assert!(arena.set_static(obj, "x", first));
        assert!(arena.set_static(obj, "y", other));
        assert!(arena.set_copied(obj, "x", second));

        let entries = arena.entries(obj);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0], ("x".to_string(), second));
        assert_eq!(entries[1].0, "y");
    }

    #[test]
    fn test_get_distinguishes_absent_from_wrong_kind() {
        let arena = Arena::new();
        let obj = arena.object();
        let flag = arena.boolean(true);
        arena.set_static(obj, "required", flag);

        assert_eq!(arena.get(obj, "missing"), None);
        assert_eq!(arena.get(obj, "required"), Some(flag));
        assert_eq!(arena.kind(flag), Some(NodeKind::Boolean));
    }

    #[test]
    fn test_ensure_child_is_idempotent_and_replaces_wrong_kind() {
        let arena = Arena::new();
        let obj = arena.object();
        let flag = arena.boolean(false);
        arena.set_static(obj, "properties", flag);

        let props = arena.ensure_object(obj, "properties").unwrap();
        assert_ne!(props, flag);
        assert_eq!(arena.kind(props), Some(NodeKind::Object));
        assert_eq!(arena.ensure_object(obj, "properties"), Some(props));
        assert_eq!(arena.len_of(obj), Some(1));

        let not_object = arena.array();
        assert_eq!(arena.ensure_array(not_object, "required"), None);
    }

    #[test]
    fn test_key_storage() {
        let arena = Arena::new();
        let obj = arena.object();
        let v = arena.null();
        arena.set_static(obj, "type", v);
        let name = String::from("city");
        arena.set_copied(obj, &name, v);
        drop(name);

        assert_eq!(arena.key_storage(obj, "type"), Some(KeyStorage::Static));
        assert_eq!(arena.key_storage(obj, "city"), Some(KeyStorage::Copied));
    }

    #[test]
    fn test_foreign_handles_are_rejected() {
        let a = Arena::new();
        let b = Arena::new();
        let obj = a.object();
        let foreign = b.string("x");

        assert!(!a.owns(foreign));
        assert!(!a.set_static(obj, "k", foreign));
        assert_eq!(a.kind(foreign), None);
        assert_eq!(a.len_of(obj), Some(0));
    }

    #[test]
    fn test_cycles_are_refused() {
        let arena = Arena::new();
        let outer = arena.object();
        let inner = arena.array();
        assert!(arena.set_static(outer, "items", inner));

        assert!(!arena.append(inner, outer));
        assert!(!arena.set_static(outer, "self", outer));
        assert!(arena.is_acyclic());
        assert!(arena.check_acyclic().is_ok());
    }

    #[test]
    fn test_shared_children_are_allowed() {
        let arena = Arena::new();
        let shared = arena.object();
        let list = arena.array();
        assert!(arena.append(list, shared));
        assert!(arena.append(list, shared));
        assert_eq!(arena.items(list), vec![shared, shared]);
        assert!(arena.is_acyclic());
    }

    #[test]
    fn test_dependency_graph_mirrors_nodes() {
        let arena = Arena::new();
        let obj = arena.object();
        let s = arena.str_static("object");
        arena.set_static(obj, "type", s);

        let graph = arena.dependency_graph();
        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph[NodeIndex::new(obj.index())], NodeKind::Object);
    }

    #[test]
    fn test_number_rejects_non_finite() {
        let arena = Arena::new();
        assert!(arena.number(f64::NAN).is_none());
        assert!(arena.number(f64::INFINITY).is_none());
        let n = arena.number(2.5).unwrap();
        assert_eq!(arena.number_text(n).as_deref(), Some("2.5"));
        let i = arena.integer(-7);
        assert_eq!(arena.number_text(i).as_deref(), Some("-7"));
    }

    #[test]
    fn test_replaced_child_can_later_hold_its_old_parent() {
        let arena = Arena::new();
        let obj = arena.object();
        let first = arena.object();
        let second = arena.object();
        assert!(arena.set_static(obj, "items", first));
        assert!(arena.set_static(obj, "items", second));

        assert!(!arena.contains(obj, first));
        assert!(arena.set_static(first, "back", obj));
        assert!(!arena.set_static(obj, "again", first));
        assert!(arena.is_acyclic());
    }

    #[test]
    fn test_containment_through_shared_and_nested_paths() {
        let arena = Arena::new();
        let root = arena.object();
        let left = arena.array();
        let right = arena.array();
        let leaf = arena.null();
        arena.set_static(root, "l", left);
        arena.set_static(root, "r", right);
        arena.append(left, leaf);
        arena.append(right, leaf);

        assert!(arena.contains(root, leaf));
        assert!(arena.contains(left, leaf));
        assert!(arena.contains(leaf, leaf));
        assert!(!arena.contains(left, right));
        assert!(!arena.contains(leaf, root));
    }

    #[test]
    fn test_deep_chains_build_in_both_directions() {
        let arena = Arena::new();

        // leaves first
        let mut bottom_up = arena.object();
        for _ in 0..5000 {
            let outer = arena.array();
            assert!(arena.append(outer, bottom_up));
            bottom_up = outer;
        }

        // root first
        let top = arena.array();
        let mut tip = top;
        for _ in 0..5000 {
            let inner = arena.array();
            assert!(arena.append(tip, inner));
            tip = inner;
        }

        assert!(arena.contains(bottom_up, arena.items(bottom_up)[0]));
        assert!(!arena.append(tip, top));
        assert!(arena.append(tip, bottom_up));
        assert!(arena.is_acyclic());
    }
}
