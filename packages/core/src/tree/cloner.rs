//! Deep copy of node subtrees
//!
//! A clone keeps the source's scalar fields and content type, but never its
//! identity: the id starts at `0`, the cached address is empty and the clone
//! is detached. Details are re-applied through `set_property` so typed
//! properties go through the same conversion and default rules as any other
//! write. Bag entries named like a scalar field (`Title`, `ID`, ...) are copied
//! into the bag as they are. Collections and authorized roles are deep-copied
//! and rebound to the clone.

use super::properties::is_intrinsic;
use super::ContentTree;
use crate::models::{CreationPosition, NodeKey};
use crate::Result;

impl ContentTree {
    /// Clone a node, and optionally its whole subtree, into this tree
    ///
    /// The clone is detached; attach it with `add_to` or `insert_relative`.
    pub fn clone_node(&mut self, key: NodeKey, include_children: bool) -> Result<NodeKey> {
        let source = self.node(key)?;
        let copy = source.detached_copy();
        let details: Vec<(String, _)> = source
            .attributes()
            .details()
            .map(|detail| (detail.name().to_string(), detail.value().clone()))
            .collect();
        let collections: Vec<_> = source.attributes().collections().cloned().collect();
        let roles = source.authorized_roles().to_vec();
        let children = source.children().to_vec();

        let cloned = self.insert(copy);

        for (name, value) in details {
            if is_intrinsic(&name) {
                self.node_mut(cloned)?.attributes_mut().set(&name, Some(value));
                continue;
            }
            if let Err(e) = self.set_property(cloned, &name, value.clone()) {
                tracing::debug!("Storing detail '{}' of clone {} as-is: {}", name, cloned, e);
                self.node_mut(cloned)?.attributes_mut().set(&name, Some(value));
            }
        }

        let node = self.node_mut(cloned)?;
        for collection in collections {
            node.attributes_mut()
                .insert_collection(collection.clone_for(Some(cloned)));
        }
        node.roles = roles.iter().map(|role| role.clone_for(Some(cloned))).collect();

        if include_children {
            for child in children {
                let child_clone = self.clone_node(child, true)?;
                self.add_to(child_clone, Some(cloned))?;
            }
        }

        Ok(cloned)
    }

    /// Snapshot a node as a version of itself
    ///
    /// The version carries the node's data but no children; it lists the live
    /// node's children through `get_children`.
    pub fn create_version(&mut self, key: NodeKey) -> Result<NodeKey> {
        let live = match self.node(key)?.version_of {
            Some(live) => live,
            None => key,
        };
        let version = self.clone_node(key, false)?;
        self.node_mut(version)?.version_of = Some(live);
        Ok(version)
    }

    /// Clone a subtree and place the copy relative to `target`
    pub fn copy_to(
        &mut self,
        key: NodeKey,
        target: NodeKey,
        position: CreationPosition,
    ) -> Result<NodeKey> {
        let cloned = self.clone_node(key, true)?;
        if let Err(e) = self.insert_relative(cloned, target, position) {
            self.remove_subtree(cloned)?;
            return Err(e);
        }
        Ok(cloned)
    }
}
