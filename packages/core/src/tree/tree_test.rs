//! Tests for ContentTree structure operations
//!
//! Covers parenting and ordering, child lookup, filtered listings, id
//! assignment, removal, cloning and versions.

#[cfg(test)]
mod tests {
    use crate::filters::{ItemFilter, PageFilter, VisibleFilter, ZoneFilter};
    use crate::models::{
        AttributeValue, AuthorizedRole, ContentNode, ContentPage, CreationPosition, NodeKey,
        SimplePrincipal, TypeDefinition,
    };
    use crate::tree::{ContentTree, SequentialIds};
    use crate::ContentError;
    use std::sync::Arc;

    fn page(tree: &mut ContentTree, name: &str) -> NodeKey {
        tree.insert(ContentPage::builder(name).build().into_node())
    }

    fn ordered(tree: &mut ContentTree, name: &str, sort_order: i32) -> NodeKey {
        tree.insert(
            ContentPage::builder(name)
                .build()
                .into_node()
                .with_sort_order(sort_order),
        )
    }

    fn part(tree: &mut ContentTree, name: &str, zone: &str) -> NodeKey {
        tree.insert(
            ContentNode::new(Arc::new(TypeDefinition::part("TextPart")))
                .with_name(name)
                .with_zone(zone),
        )
    }

    fn names(tree: &ContentTree, keys: &[NodeKey]) -> Vec<String> {
        keys.iter()
            .map(|key| tree.node(*key).unwrap().name().into_owned())
            .collect()
    }

    fn child_names(tree: &ContentTree, parent: NodeKey) -> Vec<String> {
        let children = tree.node(parent).unwrap().children().to_vec();
        names(tree, &children)
    }

    fn orders(tree: &ContentTree, parent: NodeKey) -> Vec<i32> {
        tree.node(parent)
            .unwrap()
            .children()
            .iter()
            .map(|child| tree.node(*child).unwrap().sort_order)
            .collect()
    }

    // ========================================================================
    // add_to() Tests
    // ========================================================================

    #[test]
    fn test_add_to_appends_in_order() {
        let mut tree = ContentTree::new();
        let root = page(&mut tree, "root");
        for name in ["a", "b", "c"] {
            let child = page(&mut tree, name);
            tree.add_to(child, Some(root)).unwrap();
        }

        assert_eq!(child_names(&tree, root), vec!["a", "b", "c"]);
        assert_eq!(orders(&tree, root), vec![0, 0, 0]);
    }

    #[test]
    fn test_add_to_sets_parent_link() {
        let mut tree = ContentTree::new();
        let root = page(&mut tree, "root");
        let child = page(&mut tree, "child");
        tree.add_to(child, Some(root)).unwrap();

        assert_eq!(tree.parent(child), Some(root));
        assert_eq!(tree.node(child).unwrap().parent(), Some(root));
        assert_eq!(tree.roots().collect::<Vec<_>>(), vec![root]);
    }

    #[test]
    fn test_add_to_lower_order_without_gap_keeps_sequence_sorted() {
        let mut tree = ContentTree::new();
        let root = page(&mut tree, "root");
        for (name, order) in [("a", 0), ("b", 10), ("c", 20)] {
            let child = ordered(&mut tree, name, order);
            tree.add_to(child, Some(root)).unwrap();
        }

        let late = ordered(&mut tree, "late", 5);
        tree.add_to(late, Some(root)).unwrap();

        assert_eq!(child_names(&tree, root), vec!["a", "b", "c", "late"]);
        assert_eq!(orders(&tree, root), vec![0, 10, 20, 20]);
    }

    #[test]
    fn test_add_to_lands_in_large_gap() {
        let mut tree = ContentTree::new();
        let root = page(&mut tree, "root");
        for (name, order) in [("a", 0), ("b", 20000)] {
            let child = ordered(&mut tree, name, order);
            tree.add_to(child, Some(root)).unwrap();
        }

        let middle = ordered(&mut tree, "middle", 500);
        tree.add_to(middle, Some(root)).unwrap();

        assert_eq!(child_names(&tree, root), vec!["a", "middle", "b"]);
        assert_eq!(orders(&tree, root), vec![0, 500, 20000]);
    }

    #[test]
    fn test_add_to_front_when_first_order_is_large() {
        let mut tree = ContentTree::new();
        let root = page(&mut tree, "root");
        let big = ordered(&mut tree, "big", 50000);
        tree.add_to(big, Some(root)).unwrap();

        let small = ordered(&mut tree, "small", 3);
        tree.add_to(small, Some(root)).unwrap();

        assert_eq!(child_names(&tree, root), vec!["small", "big"]);
        assert_eq!(orders(&tree, root), vec![3, 50000]);
    }

    #[test]
    fn test_add_to_same_parent_is_noop() {
        let mut tree = ContentTree::new();
        let root = page(&mut tree, "root");
        let a = page(&mut tree, "a");
        let b = page(&mut tree, "b");
        tree.add_to(a, Some(root)).unwrap();
        tree.add_to(b, Some(root)).unwrap();

        tree.add_to(a, Some(root)).unwrap();

        assert_eq!(child_names(&tree, root), vec!["a", "b"]);
    }

    #[test]
    fn test_add_to_moves_between_parents() {
        let mut tree = ContentTree::new();
        let first = page(&mut tree, "first");
        let second = page(&mut tree, "second");
        let child = page(&mut tree, "child");
        tree.add_to(child, Some(first)).unwrap();

        tree.add_to(child, Some(second)).unwrap();

        assert!(tree.node(first).unwrap().children().is_empty());
        assert_eq!(child_names(&tree, second), vec!["child"]);
        assert_eq!(tree.parent(child), Some(second));
    }

    #[test]
    fn test_add_to_none_detaches() {
        let mut tree = ContentTree::new();
        let root = page(&mut tree, "root");
        let child = page(&mut tree, "child");
        tree.add_to(child, Some(root)).unwrap();

        tree.add_to(child, None).unwrap();

        assert!(tree.node(root).unwrap().children().is_empty());
        assert_eq!(tree.parent(child), None);
    }

    #[test]
    fn test_add_to_rejects_cycles() {
        let mut tree = ContentTree::new();
        let root = page(&mut tree, "root");
        let child = page(&mut tree, "child");
        let grandchild = page(&mut tree, "grandchild");
        tree.add_to(child, Some(root)).unwrap();
        tree.add_to(grandchild, Some(child)).unwrap();

        let err = tree.add_to(root, Some(grandchild)).unwrap_err();
        assert!(matches!(err, ContentError::InvalidArgument { .. }));

        let err = tree.add_to(child, Some(child)).unwrap_err();
        assert!(matches!(err, ContentError::InvalidArgument { .. }));

        // Structure is untouched
        assert_eq!(tree.parent(root), None);
        assert_eq!(child_names(&tree, root), vec!["child"]);
    }

    #[test]
    fn test_add_to_stale_key_fails() {
        let mut tree = ContentTree::new();
        let root = page(&mut tree, "root");
        let child = page(&mut tree, "child");
        tree.remove_subtree(child).unwrap();

        let err = tree.add_to(child, Some(root)).unwrap_err();
        assert!(matches!(err, ContentError::NodeNotFound { .. }));
    }

    // ========================================================================
    // insert_relative() / sort_children() Tests
    // ========================================================================

    #[test]
    fn test_insert_relative_renumbers_when_no_room() {
        let mut tree = ContentTree::new();
        let root = page(&mut tree, "root");
        let a = ordered(&mut tree, "a", 0);
        let b = ordered(&mut tree, "b", 1);
        tree.add_to(a, Some(root)).unwrap();
        tree.add_to(b, Some(root)).unwrap();

        let c = page(&mut tree, "c");
        tree.insert_relative(c, a, CreationPosition::After).unwrap();

        assert_eq!(child_names(&tree, root), vec!["a", "c", "b"]);
        assert_eq!(orders(&tree, root), vec![0, 5, 10]);
    }

    #[test]
    fn test_insert_relative_before_first() {
        let mut tree = ContentTree::new();
        let root = page(&mut tree, "root");
        let a = page(&mut tree, "a");
        tree.add_to(a, Some(root)).unwrap();

        let b = page(&mut tree, "b");
        tree.insert_relative(b, a, CreationPosition::Before).unwrap();

        assert_eq!(child_names(&tree, root), vec!["b", "a"]);
        assert_eq!(orders(&tree, root), vec![-10, 0]);
    }

    #[test]
    fn test_insert_relative_below() {
        let mut tree = ContentTree::new();
        let root = page(&mut tree, "root");
        let child = page(&mut tree, "child");

        tree.insert_relative(child, root, CreationPosition::Below).unwrap();

        assert_eq!(tree.parent(child), Some(root));
    }

    #[test]
    fn test_insert_relative_next_to_root_fails() {
        let mut tree = ContentTree::new();
        let root = page(&mut tree, "root");
        let other = page(&mut tree, "other");

        let err = tree
            .insert_relative(other, root, CreationPosition::After)
            .unwrap_err();
        assert!(matches!(err, ContentError::InvalidArgument { .. }));
    }

    #[test]
    fn test_sort_children_after_direct_edit() {
        let mut tree = ContentTree::new();
        let root = page(&mut tree, "root");
        let a = ordered(&mut tree, "a", 0);
        let b = ordered(&mut tree, "b", 10);
        let c = ordered(&mut tree, "c", 20);
        for child in [a, b, c] {
            tree.add_to(child, Some(root)).unwrap();
        }

        tree.node_mut(a).unwrap().sort_order = 30;
        tree.sort_children(root).unwrap();

        assert_eq!(child_names(&tree, root), vec!["b", "c", "a"]);
        assert_eq!(
            tree.compare_sort_order(b, a).unwrap(),
            std::cmp::Ordering::Less
        );
    }

    #[test]
    fn test_renumber_children() {
        let mut tree = ContentTree::new();
        let root = page(&mut tree, "root");
        for (name, order) in [("a", 3), ("b", 4), ("c", 4)] {
            let child = ordered(&mut tree, name, order);
            tree.add_to(child, Some(root)).unwrap();
        }

        tree.renumber_children(root).unwrap();

        assert_eq!(orders(&tree, root), vec![0, 10, 20]);
    }

    // ========================================================================
    // get_child() Tests
    // ========================================================================

    fn one_two_tree() -> (ContentTree, NodeKey, NodeKey, NodeKey) {
        let mut tree = ContentTree::new();
        let root = page(&mut tree, "root");
        let one = page(&mut tree, "one");
        let two = page(&mut tree, "two");
        tree.add_to(one, Some(root)).unwrap();
        tree.add_to(two, Some(one)).unwrap();
        (tree, root, one, two)
    }

    #[test]
    fn test_get_child_paths() {
        let (tree, root, one, two) = one_two_tree();

        assert_eq!(tree.get_child(root, "/"), Some(root));
        assert_eq!(tree.get_child(root, "one"), Some(one));
        assert_eq!(tree.get_child(root, "/one"), Some(one));
        assert_eq!(tree.get_child(root, "one/two"), Some(two));
        assert_eq!(tree.get_child(root, "/one/two/"), Some(two));
        assert_eq!(tree.get_child(one, "two"), Some(two));
    }

    #[test]
    fn test_get_child_is_case_insensitive() {
        let (tree, root, _, two) = one_two_tree();
        assert_eq!(tree.get_child(root, "ONE/Two"), Some(two));
    }

    #[test]
    fn test_get_child_misses() {
        let (tree, root, _, _) = one_two_tree();

        assert_eq!(tree.get_child(root, ""), None);
        assert_eq!(tree.get_child(root, "three"), None);
        assert_eq!(tree.get_child(root, "two"), None);
        assert_eq!(tree.get_child(root, "one/three"), None);
    }

    // ========================================================================
    // get_children() Tests
    // ========================================================================

    #[test]
    fn test_get_children_without_filters() {
        let (tree, root, one, _) = one_two_tree();
        let children: Vec<_> = tree.get_children(root, &[]).collect();
        assert_eq!(children, vec![one]);
    }

    #[test]
    fn test_get_children_applies_every_filter() {
        let mut tree = ContentTree::new();
        let root = page(&mut tree, "root");
        let left = part(&mut tree, "left", "Left");
        let right = part(&mut tree, "right", "Right");
        let hidden = part(&mut tree, "hidden", "Left");
        let sub = page(&mut tree, "sub");
        for child in [left, right, hidden, sub] {
            tree.add_to(child, Some(root)).unwrap();
        }
        tree.node_mut(hidden).unwrap().visible = false;

        let zone = ZoneFilter::new("Left");
        let visible = VisibleFilter;
        let left_visible: Vec<_> = tree.get_children(root, &[&zone, &visible]).collect();
        assert_eq!(left_visible, vec![left]);

        let pages: Vec<_> = tree.get_children(root, &[&PageFilter]).collect();
        assert_eq!(pages, vec![sub]);
    }

    #[test]
    fn test_get_children_of_version_lists_live_children() {
        let (mut tree, root, one, _) = one_two_tree();

        let version = tree.create_version(root).unwrap();

        assert!(tree.node(version).unwrap().children().is_empty());
        let children: Vec<_> = tree.get_children(version, &[]).collect();
        assert_eq!(children, vec![one]);
    }

    #[test]
    fn test_accessible_children_and_zones() {
        let mut tree = ContentTree::new();
        let root = page(&mut tree, "root");
        let open = part(&mut tree, "open", "Main");
        let editors = tree.insert(
            ContentNode::new(Arc::new(TypeDefinition::part("TextPart")))
                .with_name("editors")
                .with_zone("Main")
                .with_role(AuthorizedRole::new("Editors")),
        );
        let side = part(&mut tree, "side", "Side");
        for child in [open, editors, side] {
            tree.add_to(child, Some(root)).unwrap();
        }

        let anonymous = SimplePrincipal::anonymous();
        let editor = SimplePrincipal::new("ann").with_role("Editors");

        assert_eq!(tree.accessible_children(root, &anonymous), vec![open, side]);
        assert_eq!(
            tree.accessible_children(root, &editor),
            vec![open, editors, side]
        );
        assert_eq!(tree.children_in_zone(root, "Main", &anonymous), vec![open]);
        assert_eq!(
            tree.children_in_zone(root, "Main", &editor),
            vec![open, editors]
        );
    }

    #[test]
    fn test_get_children_stops_at_first_rejection() {
        use crate::filters::FnFilter;
        use std::cell::Cell;

        let (tree, root, _, _) = one_two_tree();
        let calls = Cell::new(0);
        let reject = FnFilter(|_: &ContentNode| false);
        let count = FnFilter(|_: &ContentNode| {
            calls.set(calls.get() + 1);
            true
        });
        let filters: [&dyn ItemFilter; 2] = [&reject, &count];

        assert_eq!(tree.get_children(root, &filters).count(), 0);
        assert_eq!(calls.get(), 0);
    }

    // ========================================================================
    // set_name() Tests
    // ========================================================================

    #[test]
    fn test_set_name_rejects_sibling_clash() {
        let mut tree = ContentTree::new();
        let root = page(&mut tree, "root");
        let a = page(&mut tree, "a");
        let b = page(&mut tree, "b");
        tree.add_to(a, Some(root)).unwrap();
        tree.add_to(b, Some(root)).unwrap();

        let err = tree.set_name(b, Some("A".to_string())).unwrap_err();
        assert!(matches!(err, ContentError::InvalidArgument { .. }));
        assert_eq!(tree.node(b).unwrap().name(), "b");

        // Renaming to its own name is fine
        tree.set_name(a, Some("a".to_string())).unwrap();
        tree.set_name(b, Some("c".to_string())).unwrap();
        assert_eq!(tree.get_child(root, "c"), Some(b));
    }

    #[test]
    fn test_add_to_renames_clashing_name() {
        let mut tree = ContentTree::new();
        let root = page(&mut tree, "root");
        let first = page(&mut tree, "news");
        let second = page(&mut tree, "NEWS");
        let third = page(&mut tree, "news");
        tree.add_to(first, Some(root)).unwrap();
        tree.add_to(second, Some(root)).unwrap();
        tree.add_to(third, Some(root)).unwrap();

        assert_eq!(child_names(&tree, root), vec!["news", "NEWS1", "news2"]);
        assert_eq!(tree.get_child(root, "news"), Some(first));
        assert_eq!(tree.get_child(root, "news1"), Some(second));
        assert_eq!(tree.get_child(root, "news2"), Some(third));
    }

    #[test]
    fn test_moving_into_clashing_group_renames() {
        let mut tree = ContentTree::new();
        let root = page(&mut tree, "root");
        let a = page(&mut tree, "a");
        let b = page(&mut tree, "b");
        let a_item = page(&mut tree, "item");
        let b_item = page(&mut tree, "item");
        tree.add_to(a, Some(root)).unwrap();
        tree.add_to(b, Some(root)).unwrap();
        tree.add_to(a_item, Some(a)).unwrap();
        tree.add_to(b_item, Some(b)).unwrap();

        tree.insert_relative(b_item, a_item, CreationPosition::After)
            .unwrap();

        assert_eq!(child_names(&tree, a), vec!["item", "item1"]);
        // Re-adding to the same parent keeps the name
        tree.add_to(b_item, Some(a)).unwrap();
        assert_eq!(tree.node(b_item).unwrap().name(), "item1");
    }

    #[test]
    fn test_unnamed_nodes_are_not_renamed() {
        let mut tree = ContentTree::new();
        let root = page(&mut tree, "root");
        for _ in 0..2 {
            let child = tree.insert(ContentNode::new(Arc::new(TypeDefinition::page("Page"))));
            tree.add_to(child, Some(root)).unwrap();
            assert_eq!(tree.node(child).unwrap().raw_name(), None);
        }
    }

    #[test]
    fn test_set_name_none_falls_back_to_id() {
        let mut tree = ContentTree::new();
        let node = page(&mut tree, "named");
        tree.assign_id(node, 12).unwrap();

        tree.set_name(node, None).unwrap();

        assert_eq!(tree.node(node).unwrap().name(), "12");
        assert_eq!(tree.node(node).unwrap().raw_name(), None);
    }

    // ========================================================================
    // Id Tests
    // ========================================================================

    #[test]
    fn test_assign_id() {
        let mut tree = ContentTree::new();
        let a = page(&mut tree, "a");
        let b = page(&mut tree, "b");

        tree.assign_id(a, 5).unwrap();
        assert_eq!(tree.node(a).unwrap().id(), 5);
        assert_eq!(tree.find_by_id(5), Some(a));

        let err = tree.assign_id(a, 6).unwrap_err();
        assert!(matches!(
            err,
            ContentError::IdAlreadyAssigned {
                current: 5,
                requested: 6
            }
        ));

        let err = tree.assign_id(b, 5).unwrap_err();
        assert!(matches!(err, ContentError::DuplicateId { id: 5 }));

        let err = tree.assign_id(b, 0).unwrap_err();
        assert!(matches!(err, ContentError::InvalidArgument { .. }));
    }

    #[test]
    fn test_persist_assigns_subtree_ids_in_preorder() {
        let (mut tree, root, one, two) = one_two_tree();
        let mut ids = SequentialIds::new();

        let id = tree.persist(root, &mut ids).unwrap();

        assert_eq!(id, 1);
        assert_eq!(tree.node(one).unwrap().id(), 2);
        assert_eq!(tree.node(two).unwrap().id(), 3);
    }

    #[test]
    fn test_persist_skips_taken_ids() {
        let (mut tree, root, one, _) = one_two_tree();
        tree.assign_id(one, 1).unwrap();

        tree.persist(root, &mut SequentialIds::new()).unwrap();

        assert_eq!(tree.node(one).unwrap().id(), 1);
        assert_eq!(tree.node(root).unwrap().id(), 2);
    }

    #[test]
    fn test_insert_with_taken_id_becomes_transient() {
        let mut tree = ContentTree::new();
        let a = page(&mut tree, "a");
        tree.assign_id(a, 7).unwrap();

        let mut removed = tree.remove_subtree(a).unwrap();
        let node = removed.pop().unwrap();
        let again = tree.insert(node.clone());
        let duplicate = tree.insert(node);

        assert_eq!(tree.node(again).unwrap().id(), 7);
        assert_eq!(tree.node(duplicate).unwrap().id(), 0);
        assert_eq!(tree.find_by_id(7), Some(again));
    }

    // ========================================================================
    // remove_subtree() Tests
    // ========================================================================

    #[test]
    fn test_remove_subtree() {
        let (mut tree, root, one, two) = one_two_tree();
        tree.persist(root, &mut SequentialIds::new()).unwrap();
        let version = tree.create_version(one).unwrap();

        let removed = tree.remove_subtree(one).unwrap();

        assert_eq!(names(&tree, &[root]), vec!["root"]);
        assert_eq!(
            removed.iter().map(|n| n.name().into_owned()).collect::<Vec<_>>(),
            vec!["one", "two"]
        );
        assert!(!tree.contains(one));
        assert!(!tree.contains(two));
        assert!(tree.node(root).unwrap().children().is_empty());
        assert_eq!(tree.find_by_id(2), None);
        assert_eq!(tree.node(version).unwrap().version_of(), None);
        assert_eq!(tree.len(), 2);
    }

    // ========================================================================
    // Clone Tests
    // ========================================================================

    #[test]
    fn test_clone_copies_shape_not_identity() {
        let (mut tree, root, one, _) = one_two_tree();
        tree.persist(root, &mut SequentialIds::new()).unwrap();
        let extra = page(&mut tree, "three");
        tree.add_to(extra, Some(one)).unwrap();

        let cloned = tree.clone_node(one, true).unwrap();
        let node = tree.node(cloned).unwrap();

        assert_eq!(node.id(), 0);
        assert_eq!(node.parent(), None);
        assert_eq!(node.name(), "one");
        assert_eq!(child_names(&tree, cloned), vec!["two", "three"]);
        for child in tree.node(cloned).unwrap().children() {
            assert_eq!(tree.parent(*child), Some(cloned));
            assert_eq!(tree.node(*child).unwrap().id(), 0);
        }
        // Source untouched
        assert_eq!(child_names(&tree, one), vec!["two", "three"]);
    }

    #[test]
    fn test_clone_without_children() {
        let (mut tree, _, one, _) = one_two_tree();
        let cloned = tree.clone_node(one, false).unwrap();
        assert!(tree.node(cloned).unwrap().children().is_empty());
    }

    #[test]
    fn test_clone_copies_details_collections_and_roles() {
        let mut tree = ContentTree::new();
        let source = page(&mut tree, "source");
        tree.set_property(source, "Color", "red").unwrap();
        tree.set_property(source, "Text", "<p>hi</p>").unwrap();
        tree.node_mut(source)
            .unwrap()
            .attributes_mut()
            .collection_mut("Tags", Some(source))
            .push("news");
        tree.node_mut(source)
            .unwrap()
            .authorized_roles_mut()
            .push(AuthorizedRole::new("Editors"));

        let cloned = tree.clone_node(source, false).unwrap();
        let node = tree.node(cloned).unwrap();

        assert_eq!(
            node.detail("Color"),
            Some(&AttributeValue::Text("red".to_string()))
        );
        assert_eq!(
            node.detail("Text"),
            Some(&AttributeValue::Text("<p>hi</p>".to_string()))
        );

        let tags = node.attributes().collection("Tags").unwrap();
        assert_eq!(tags.enclosing(), Some(cloned));
        assert_eq!(tags.values(), &[AttributeValue::Text("news".to_string())]);

        let roles = node.authorized_roles();
        assert_eq!(roles.len(), 1);
        assert_eq!(roles[0].role(), "Editors");
        assert_eq!(roles[0].enclosing(), Some(cloned));
    }

    #[test]
    fn test_clone_keeps_bag_entries_named_like_fields() {
        let mut tree = ContentTree::new();
        let source = tree.insert(
            ContentPage::builder("source")
                .with_title("Real title")
                .build()
                .into_node(),
        );
        tree.node_mut(source)
            .unwrap()
            .attributes_mut()
            .set("Title", Some("shadow".into()));

        let cloned = tree.clone_node(source, false).unwrap();
        let node = tree.node(cloned).unwrap();

        assert_eq!(node.title, "Real title");
        assert_eq!(
            node.detail("Title"),
            Some(&AttributeValue::Text("shadow".to_string()))
        );
    }

    #[test]
    fn test_copy_to_places_clone() {
        let (mut tree, root, one, _) = one_two_tree();
        let copy = tree
            .copy_to(one, one, CreationPosition::After)
            .unwrap();

        assert_eq!(tree.parent(copy), Some(root));
        assert_eq!(tree.node(root).unwrap().children(), &[one, copy]);
        assert_eq!(child_names(&tree, root), vec!["one", "one1"]);
        assert_eq!(child_names(&tree, copy), vec!["two"]);
        let copied_two = tree.node(copy).unwrap().children()[0];
        assert_eq!(tree.get_child(root, "one1/two"), Some(copied_two));
    }

    #[test]
    fn test_copy_to_below_keeps_name() {
        let (mut tree, root, one, _) = one_two_tree();
        let other = page(&mut tree, "other");
        tree.add_to(other, Some(root)).unwrap();

        let copy = tree.copy_to(one, other, CreationPosition::Below).unwrap();
        assert_eq!(tree.node(copy).unwrap().name(), "one");
        assert!(tree.get_child(root, "other/one/two").is_some());
    }

    #[test]
    fn test_copy_to_failure_discards_clone() {
        let (mut tree, root, one, _) = one_two_tree();
        let before = tree.len();

        let err = tree
            .copy_to(one, root, CreationPosition::Before)
            .unwrap_err();

        assert!(matches!(err, ContentError::InvalidArgument { .. }));
        assert_eq!(tree.len(), before);
    }

    #[test]
    fn test_create_version_points_at_live_node() {
        let (mut tree, _, one, _) = one_two_tree();

        let version = tree.create_version(one).unwrap();
        let again = tree.create_version(version).unwrap();

        assert_eq!(tree.node(version).unwrap().version_of(), Some(one));
        assert_eq!(tree.node(again).unwrap().version_of(), Some(one));
        assert!(tree.node(version).unwrap().is_version());
        assert!(!tree.roots().any(|key| key == version));
    }
}
