//! In-Memory Content Tree
//!
//! `ContentTree` owns every node in an arena and maintains the structural
//! invariants between them:
//!
//! - a node appears in exactly one parent's `children` sequence, and its
//!   `parent` link points back at that parent;
//! - sibling sort orders are non-decreasing top to bottom after any ordering
//!   operation;
//! - a node can never become its own ancestor;
//! - ids are unique within the tree and immutable once assigned.
//!
//! Mutations take `&mut self` and reads take `&self`, so exclusive access for
//! structural edits is enforced by the borrow checker rather than by locks.
//!
//! # Examples
//!
//! ```rust
//! use pagetree_core::models::ContentPage;
//! use pagetree_core::tree::ContentTree;
//!
//! let mut tree = ContentTree::new();
//! let root = tree.insert(ContentPage::builder("root").build().into_node());
//! let news = tree.insert(ContentPage::builder("news").build().into_node());
//! tree.add_to(news, Some(root))?;
//!
//! assert_eq!(tree.get_child(root, "NEWS"), Some(news));
//! assert_eq!(tree.path(news)?, "/news/");
//! # Ok::<(), pagetree_core::ContentError>(())
//! ```

mod addressing;
mod cloner;
mod ordering;
mod properties;

#[cfg(test)]
mod tree_test;

pub use addressing::{
    to_absolute, AddressBuilder, RewrittenAddress, ITEM_QUERY_KEY, PAGE_QUERY_KEY,
};
pub use ordering::{OrderCalculator, Slot, RENUMBER_STEP, SORT_ORDER_THRESHOLD};
pub use properties::{DefaultConverter, PropertyInput, PropertyValue, ValueConverter};

use crate::filters::{AccessFilter, ItemFilter, ZoneFilter};
use crate::models::{ContentNode, CreationPosition, NodeKey, Principal};
use crate::{ContentError, Result};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;

/// Source of persistence ids for transient nodes
pub trait IdAllocator {
    fn next_id(&mut self) -> i64;
}

/// In-memory allocator handing out consecutive ids
#[derive(Debug, Clone)]
pub struct SequentialIds {
    next: i64,
}

impl SequentialIds {
    pub fn new() -> Self {
        Self::starting_at(1)
    }

    pub fn starting_at(first: i64) -> Self {
        Self { next: first.max(1) }
    }
}

impl Default for SequentialIds {
    fn default() -> Self {
        Self::new()
    }
}

impl IdAllocator for SequentialIds {
    fn next_id(&mut self) -> i64 {
        let id = self.next;
        self.next += 1;
        id
    }
}

/// Arena of content nodes
#[derive(Debug)]
pub struct ContentTree {
    nodes: Vec<Option<ContentNode>>,
    ids: HashMap<i64, NodeKey>,
    converter: Arc<dyn ValueConverter>,
}

impl Default for ContentTree {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentTree {
    pub fn new() -> Self {
        Self::with_converter(Arc::new(DefaultConverter))
    }

    /// Create a tree that converts declared property values with `converter`
    pub fn with_converter(converter: Arc<dyn ValueConverter>) -> Self {
        Self {
            nodes: Vec::new(),
            ids: HashMap::new(),
            converter,
        }
    }

    pub(crate) fn converter(&self) -> &dyn ValueConverter {
        self.converter.as_ref()
    }

    /// Take ownership of a detached node and return its key
    ///
    /// Structural links carried by the node are dropped. A non-zero id is
    /// indexed unless another node already holds it, in which case the new
    /// node becomes transient.
    pub fn insert(&mut self, mut node: ContentNode) -> NodeKey {
        let key = NodeKey::new(self.nodes.len());
        node.parent = None;
        node.children.clear();
        if node.version_of.is_some_and(|live| !self.contains(live)) {
            node.version_of = None;
        }
        if node.id() != 0 {
            if self.ids.contains_key(&node.id()) {
                tracing::warn!("Inserted node reuses id {}, resetting to transient", node.id());
                node.set_id(0);
            } else {
                self.ids.insert(node.id(), key);
            }
        }
        node.invalidate_url();
        node.bind(key);
        self.nodes.push(Some(node));
        key
    }

    pub fn contains(&self, key: NodeKey) -> bool {
        self.get(key).is_some()
    }

    pub fn get(&self, key: NodeKey) -> Option<&ContentNode> {
        self.nodes.get(key.index()).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, key: NodeKey) -> Option<&mut ContentNode> {
        self.nodes.get_mut(key.index()).and_then(Option::as_mut)
    }

    /// Get a node, failing with `NodeNotFound` for a stale key
    pub fn node(&self, key: NodeKey) -> Result<&ContentNode> {
        self.get(key).ok_or(ContentError::node_not_found(key))
    }

    pub fn node_mut(&mut self, key: NodeKey) -> Result<&mut ContentNode> {
        self.get_mut(key).ok_or(ContentError::node_not_found(key))
    }

    /// Number of live nodes
    pub fn len(&self) -> usize {
        self.nodes.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn keys(&self) -> impl Iterator<Item = NodeKey> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.is_some())
            .map(|(index, _)| NodeKey::new(index))
    }

    /// Parentless nodes that are not versions, in insertion order
    pub fn roots(&self) -> impl Iterator<Item = NodeKey> + '_ {
        self.nodes
            .iter()
            .flatten()
            .filter(|node| node.parent.is_none() && node.version_of.is_none())
            .filter_map(ContentNode::key)
    }

    pub fn parent(&self, key: NodeKey) -> Option<NodeKey> {
        self.get(key).and_then(|node| node.parent)
    }

    /// Ancestors from the parent up to the root
    pub fn ancestors(&self, key: NodeKey) -> impl Iterator<Item = NodeKey> + '_ {
        std::iter::successors(self.parent(key), move |current| self.parent(*current))
    }

    /// Nearest page ancestor (excluding the node itself)
    pub fn page_ancestor(&self, key: NodeKey) -> Option<NodeKey> {
        self.ancestors(key)
            .find(|ancestor| self.get(*ancestor).is_some_and(ContentNode::is_page))
    }

    /// Move a node below `new_parent`, or detach it with `None`
    ///
    /// The node is placed among its new siblings by the ordering policy and
    /// its sort order is adjusted to keep the group non-decreasing. Adding a
    /// node to its current parent is a no-op.
    ///
    /// An explicit name already used by a new sibling gets the smallest
    /// numeric suffix that makes it unique (`one` becomes `one1`).
    ///
    /// # Errors
    ///
    /// - `NodeNotFound` for a stale key
    /// - `InvalidArgument` when the move would make the node its own ancestor
    pub fn add_to(&mut self, key: NodeKey, new_parent: Option<NodeKey>) -> Result<()> {
        let current = self.node(key)?.parent;

        if let Some(parent) = new_parent {
            self.node(parent)?;
            if parent == key || self.ancestors(parent).any(|ancestor| ancestor == key) {
                return Err(ContentError::invalid_argument(
                    "new_parent",
                    format!("node {} cannot be added below itself", key),
                ));
            }
        }

        if current == new_parent {
            let attached = match new_parent {
                Some(parent) => self.node(parent)?.children.contains(&key),
                None => true,
            };
            if attached {
                return Ok(());
            }
        }

        if let Some(old_parent) = current {
            self.unlink(old_parent, key);
        }

        self.node_mut(key)?.parent = new_parent;
        self.invalidate_urls(key)?;

        if let Some(parent) = new_parent {
            self.make_name_unique(parent, key)?;
            self.append_child(parent, key)?;
        }
        Ok(())
    }

    fn sibling_has_name(&self, parent: NodeKey, key: NodeKey, name: &str) -> Result<bool> {
        Ok(self.node(parent)?.children.iter().any(|sibling| {
            *sibling != key
                && self
                    .get(*sibling)
                    .is_some_and(|node| names_match(&node.name(), name))
        }))
    }

    fn make_name_unique(&mut self, parent: NodeKey, key: NodeKey) -> Result<()> {
        let Some(name) = self.node(key)?.raw_name().map(str::to_string) else {
            return Ok(());
        };
        if !self.sibling_has_name(parent, key, &name)? {
            return Ok(());
        }

        let mut suffix = 1u32;
        let unique = loop {
            let candidate = format!("{}{}", name, suffix);
            if !self.sibling_has_name(parent, key, &candidate)? {
                break candidate;
            }
            suffix += 1;
        };
        tracing::debug!("Renaming {} from '{}' to '{}' below {}", key, name, unique, parent);
        self.node_mut(key)?.set_name(Some(unique));
        Ok(())
    }

    fn unlink(&mut self, parent: NodeKey, key: NodeKey) {
        if let Some(parent) = self.get_mut(parent) {
            parent.children.retain(|child| *child != key);
        }
    }

    fn sibling_orders(&self, parent: NodeKey) -> Result<Vec<i32>> {
        self.node(parent)?
            .children
            .iter()
            .map(|child| self.node(*child).map(|node| node.sort_order))
            .collect()
    }

    fn append_child(&mut self, parent: NodeKey, key: NodeKey) -> Result<()> {
        let orders = self.sibling_orders(parent)?;
        let own = self.node(key)?.sort_order;
        let slot = OrderCalculator::append_slot(&orders, own);

        self.node_mut(key)?.sort_order = slot.order;
        self.node_mut(parent)?.children.insert(slot.index, key);
        Ok(())
    }

    /// Place a node before or after `target`, or below it
    ///
    /// The node gets an order strictly between its new neighbours. When the
    /// neighbours leave no room, the group is renumbered first.
    pub fn insert_relative(
        &mut self,
        key: NodeKey,
        target: NodeKey,
        position: CreationPosition,
    ) -> Result<()> {
        let parent = match position {
            CreationPosition::Below => return self.add_to(key, Some(target)),
            CreationPosition::Before | CreationPosition::After => {
                self.node(target)?.parent.ok_or_else(|| {
                    ContentError::invalid_argument("target", "cannot place a sibling of a root node")
                })?
            }
        };
        if key == target {
            return Err(ContentError::invalid_argument(
                "target",
                "a node cannot be placed relative to itself",
            ));
        }

        // Reuse the structural checks, then take the node out of the sequence again
        self.add_to(key, Some(parent))?;
        self.unlink(parent, key);

        if self.place_relative(parent, key, target, position)?.is_none() {
            tracing::debug!(
                "No free sort order next to {} below {}, renumbering",
                target,
                parent
            );
            self.renumber_children(parent)?;
            if self.place_relative(parent, key, target, position)?.is_none() {
                return Err(ContentError::usage(format!(
                    "no sort order available next to {}",
                    target
                )));
            }
        }
        Ok(())
    }

    fn place_relative(
        &mut self,
        parent: NodeKey,
        key: NodeKey,
        target: NodeKey,
        position: CreationPosition,
    ) -> Result<Option<i32>> {
        let children = self.node(parent)?.children.clone();
        let target_index = children
            .iter()
            .position(|child| *child == target)
            .ok_or(ContentError::node_not_found(target))?;

        let index = match position {
            CreationPosition::After => target_index + 1,
            _ => target_index,
        };
        let prev = match index {
            0 => None,
            i => Some(self.node(children[i - 1])?.sort_order),
        };
        let next = match children.get(index) {
            Some(child) => Some(self.node(*child)?.sort_order),
            None => None,
        };

        let Some(order) = OrderCalculator::between(prev, next) else {
            return Ok(None);
        };
        self.node_mut(key)?.sort_order = order;
        self.node_mut(parent)?.children.insert(index, key);
        Ok(Some(order))
    }

    /// Reassign `0, 10, 20, ...` to a sibling group in its current order
    pub fn renumber_children(&mut self, parent: NodeKey) -> Result<()> {
        let children = self.node(parent)?.children.clone();
        let orders = OrderCalculator::renumber(children.len());
        for (child, order) in children.into_iter().zip(orders) {
            self.node_mut(child)?.sort_order = order;
        }
        Ok(())
    }

    /// Stably re-sort a sibling group after sort orders were edited directly
    pub fn sort_children(&mut self, parent: NodeKey) -> Result<()> {
        let mut children = self.node(parent)?.children.clone();
        let orders = self.sibling_orders(parent)?;
        if !OrderCalculator::needs_sorting(&orders) {
            return Ok(());
        }

        let mut keyed: Vec<(i32, NodeKey)> = orders.into_iter().zip(children.drain(..)).collect();
        keyed.sort_by_key(|(order, _)| *order);
        self.node_mut(parent)?.children = keyed.into_iter().map(|(_, child)| child).collect();
        Ok(())
    }

    /// Compare two nodes by sort order
    pub fn compare_sort_order(&self, a: NodeKey, b: NodeKey) -> Result<Ordering> {
        Ok(OrderCalculator::compare(
            self.node(a)?.sort_order,
            self.node(b)?.sort_order,
        ))
    }

    /// Resolve a slash-delimited path of child names, case-insensitively
    ///
    /// `"/"` resolves to the node itself, a leading slash is otherwise
    /// ignored, a trailing slash is allowed. An empty path resolves to nothing.
    pub fn get_child(&self, key: NodeKey, path: &str) -> Option<NodeKey> {
        if path.is_empty() {
            return None;
        }
        match path.find('/') {
            Some(0) if path.len() == 1 => self.get(key).map(|_| key),
            Some(0) => self.get_child(key, &path[1..]),
            Some(slash) => {
                let child = self.find_child(key, &path[..slash])?;
                self.get_child(child, &path[slash..])
            }
            None => self.find_child(key, path),
        }
    }

    fn find_child(&self, key: NodeKey, name: &str) -> Option<NodeKey> {
        self.get(key)?.children.iter().copied().find(|child| {
            self.get(*child)
                .is_some_and(|node| names_match(&node.name(), name))
        })
    }

    /// Children passing every filter, in order
    ///
    /// A version lists the children of its live node. Filters are evaluated in
    /// the given order and evaluation stops at the first rejection.
    pub fn get_children<'a>(
        &'a self,
        key: NodeKey,
        filters: &'a [&'a dyn ItemFilter],
    ) -> impl Iterator<Item = NodeKey> + 'a {
        let source = self
            .get(key)
            .and_then(|node| match node.version_of {
                Some(live) => self.get(live),
                None => Some(node),
            })
            .map(|node| node.children.as_slice())
            .unwrap_or(&[]);

        source.iter().copied().filter(move |child| {
            self.get(*child)
                .is_some_and(|node| filters.iter().all(|filter| filter.matches(node)))
        })
    }

    /// Children the principal may read
    pub fn accessible_children(&self, key: NodeKey, principal: &dyn Principal) -> Vec<NodeKey> {
        let access = AccessFilter::new(principal);
        self.get_children(key, &[&access]).collect()
    }

    /// Children placed in `zone` that the principal may read
    pub fn children_in_zone(
        &self,
        key: NodeKey,
        zone: &str,
        principal: &dyn Principal,
    ) -> Vec<NodeKey> {
        let zone = ZoneFilter::new(zone);
        let access = AccessFilter::new(principal);
        self.get_children(key, &[&zone, &access]).collect()
    }

    /// Rename a node, keeping names unique among its siblings
    pub fn set_name(&mut self, key: NodeKey, name: Option<String>) -> Result<()> {
        if let (Some(name), Some(parent)) = (name.as_deref(), self.node(key)?.parent) {
            if self.sibling_has_name(parent, key, name)? {
                return Err(ContentError::invalid_argument(
                    "name",
                    format!("'{}' is already used by a sibling", name),
                ));
            }
        }
        self.node_mut(key)?.set_name(name);
        self.invalidate_urls(key)
    }

    /// Record an edit on a node
    pub fn touch(&mut self, key: NodeKey, saved_by: &str) -> Result<()> {
        self.node_mut(key)?.touch(saved_by);
        Ok(())
    }

    /// Give a transient node its persistence id
    ///
    /// # Errors
    ///
    /// - `InvalidArgument` for a non-positive id
    /// - `IdAlreadyAssigned` when the node already has an id
    /// - `DuplicateId` when another node holds the id
    pub fn assign_id(&mut self, key: NodeKey, id: i64) -> Result<()> {
        if id <= 0 {
            return Err(ContentError::invalid_argument("id", "must be positive"));
        }
        let current = self.node(key)?.id();
        if current != 0 {
            tracing::warn!("Rejected id {} for node {} which already has id {}", id, key, current);
            return Err(ContentError::IdAlreadyAssigned {
                current,
                requested: id,
            });
        }
        if self.ids.contains_key(&id) {
            return Err(ContentError::DuplicateId { id });
        }

        self.ids.insert(id, key);
        let node = self.node_mut(key)?;
        node.set_id(id);
        node.invalidate_url();
        Ok(())
    }

    /// Assign ids from `allocator` to a node and every transient descendant
    ///
    /// Returns the node's id.
    pub fn persist(&mut self, key: NodeKey, allocator: &mut dyn IdAllocator) -> Result<i64> {
        let mut pending = vec![key];
        while let Some(current) = pending.pop() {
            let node = self.node(current)?;
            pending.extend(node.children.iter().rev().copied());
            if node.id() == 0 {
                let mut id = allocator.next_id();
                while self.ids.contains_key(&id) {
                    id = allocator.next_id();
                }
                self.assign_id(current, id)?;
            }
        }
        Ok(self.node(key)?.id())
    }

    pub fn find_by_id(&self, id: i64) -> Option<NodeKey> {
        self.ids.get(&id).copied().filter(|key| self.contains(*key))
    }

    /// Detach a subtree and free its slots, returning the removed nodes
    ///
    /// Versions pointing at a removed node lose their link.
    pub fn remove_subtree(&mut self, key: NodeKey) -> Result<Vec<ContentNode>> {
        self.add_to(key, None)?;

        let mut removed = Vec::new();
        let mut pending = vec![key];
        while let Some(current) = pending.pop() {
            let Some(node) = self.nodes.get_mut(current.index()).and_then(Option::take) else {
                continue;
            };
            pending.extend(node.children.iter().rev().copied());
            if node.id() != 0 {
                self.ids.remove(&node.id());
            }
            removed.push(node);
        }

        for node in self.nodes.iter_mut().flatten() {
            if node.version_of.is_some_and(|live| removed.iter().any(|r| r.key() == Some(live))) {
                node.version_of = None;
            }
        }
        Ok(removed)
    }
}

fn names_match(a: &str, b: &str) -> bool {
    a.eq_ignore_ascii_case(b) || a.to_lowercase() == b.to_lowercase()
}
