//! Container hierarchy flows: building a tree, reading it back as
//! breadcrumbs, and persisting it through a record store.

use std::collections::HashSet;

use serde_json::json;
use welcomehub_core::{
    load_registry, AttributeMap, Container, ContainerError, ContainerId, ContainerRecord,
    ContainerRegistry, InMemoryStore, RecordStore,
};

fn breadcrumb(registry: &ContainerRegistry, id: ContainerId) -> Vec<String> {
    registry
        .hierarchy(id)
        .unwrap()
        .iter()
        .map(|c| c.name().to_string())
        .collect()
}

/// Walk the whole forest from the roots and check that both sides of every
/// parent/child link agree and that every container is reached exactly once.
fn assert_consistent(registry: &ContainerRegistry) {
    let mut seen = HashSet::new();
    for root in registry.roots() {
        assert_eq!(root.parent_id(), None, "root {} has a parent", root.id());
        assert!(seen.insert(root.id()), "root {} listed twice", root.id());

        for container in std::iter::once(root).chain(registry.descendants(root.id()).unwrap()) {
            if container.id() != root.id() {
                assert!(seen.insert(container.id()), "{} reached twice", container.id());
                let parent = container.parent_id().expect("descendant without parent");
                let siblings = registry.get(parent).unwrap().children();
                assert_eq!(siblings.iter().filter(|id| **id == container.id()).count(), 1);
            }
            for child in registry.children(container.id()).unwrap() {
                assert_eq!(child.parent_id(), Some(container.id()));
            }
        }
    }
    assert_eq!(seen.len(), registry.len(), "containers unreachable from any root");
}

#[test]
fn test_root_with_one_child() {
    let mut registry = ContainerRegistry::new();
    let root = registry.insert(Container::new("Root", "d").unwrap()).unwrap();
    let child = Container::new("Child", "d2").unwrap().with_parent(root);
    let child_id = registry.insert(child).unwrap();

    // Explicitly attaching an already-linked child changes nothing.
    registry.add_child(root, child_id).unwrap();

    let meta = registry.relational_metadata(root).unwrap();
    assert_eq!(meta.children.len(), 1);
    assert!(meta.children.contains(&child_id));
    assert_eq!(breadcrumb(&registry, child_id), vec!["Root", "Child"]);
}

#[test]
fn test_cycle_is_rejected_and_tree_is_untouched() {
    let mut registry = ContainerRegistry::new();
    let top = registry.insert(Container::new("Top", "d").unwrap()).unwrap();
    let mid = registry
        .insert(Container::new("Mid", "d").unwrap().with_parent(top))
        .unwrap();
    let leaf = registry
        .insert(Container::new("Leaf", "d").unwrap().with_parent(mid))
        .unwrap();

    let before: Vec<_> = [top, mid, leaf]
        .iter()
        .map(|id| registry.relational_metadata(*id).unwrap())
        .collect();

    let err = registry.add_child(leaf, top).unwrap_err();
    assert!(matches!(err, ContainerError::Cycle { .. }));
    assert!(err.to_string().contains("own ancestor"));

    let after: Vec<_> = [top, mid, leaf]
        .iter()
        .map(|id| registry.relational_metadata(*id).unwrap())
        .collect();
    assert_eq!(before, after);
}

#[test]
fn test_blank_fields_are_rejected() {
    let err = Container::new("Root", "").unwrap_err();
    assert!(matches!(err, ContainerError::Validation(_)));
}

#[test]
fn test_attributes_and_permissions_through_registry() {
    let mut registry = ContainerRegistry::new();
    let root = registry.insert(Container::new("Root", "d").unwrap()).unwrap();

    registry.add_dynamic_attribute(root, "layout", json!("grid")).unwrap();
    registry.add_dynamic_attribute(root, "layout", json!("list")).unwrap();
    registry
        .set_permissions(
            root,
            AttributeMap::from([("editors".to_string(), json!(["read", "write"]))]),
        )
        .unwrap();

    let container = registry.get(root).unwrap();
    assert_eq!(container.dynamic_attributes()["layout"], json!("list"));
    assert_eq!(container.permissions()["editors"], json!(["read", "write"]));
}

#[test]
fn test_reparenting_keeps_links_consistent() {
    let mut registry = ContainerRegistry::new();
    let left = registry.insert(Container::new("Left", "d").unwrap()).unwrap();
    let right = registry.insert(Container::new("Right", "d").unwrap()).unwrap();
    let item = registry
        .insert(Container::new("Item", "d").unwrap().with_parent(left))
        .unwrap();
    let leaf = registry
        .insert(Container::new("Leaf", "d").unwrap().with_parent(item))
        .unwrap();
    assert_consistent(&registry);

    registry.add_child(right, item).unwrap();
    assert_consistent(&registry);
    assert!(registry.get(left).unwrap().children().is_empty());
    assert_eq!(registry.get(right).unwrap().children(), &[item]);
    assert_eq!(breadcrumb(&registry, leaf), vec!["Right", "Item", "Leaf"]);

    registry.add_child(leaf, left).unwrap();
    assert_consistent(&registry);
    assert_eq!(registry.roots().len(), 1);

    assert!(registry.add_child(left, right).is_err());
    assert_consistent(&registry);

    registry.detach(item).unwrap();
    assert_consistent(&registry);
    assert_eq!(breadcrumb(&registry, left), vec!["Item", "Leaf", "Left"]);

    registry.update_details(item, "Renamed", "d").unwrap();
    assert_consistent(&registry);

    registry.remove(leaf).unwrap();
    assert_consistent(&registry);
    assert_eq!(registry.len(), 2);

    let rebuilt = ContainerRegistry::from_records(registry.records().unwrap()).unwrap();
    assert_consistent(&rebuilt);
    assert_eq!(breadcrumb(&rebuilt, item), vec!["Renamed"]);
}

#[tokio::test]
async fn test_persist_and_reload_hierarchy() {
    let mut registry = ContainerRegistry::new();
    let library = registry
        .insert(Container::new("Library", "Shared resources").unwrap())
        .unwrap();
    let guides = registry
        .insert(Container::new("Guides", "Onboarding guides").unwrap().with_parent(library))
        .unwrap();
    registry
        .add_dynamic_attribute(guides, "audience", json!("newcomers"))
        .unwrap();

    let store: InMemoryStore<ContainerRecord> = InMemoryStore::new();
    for record in registry.records().unwrap() {
        store.insert(record).await.unwrap();
    }

    let loaded = load_registry(&store).await.unwrap();
    assert_consistent(&loaded);
    assert_eq!(breadcrumb(&loaded, guides), vec!["Library", "Guides"]);
    assert_eq!(
        loaded.get(guides).unwrap().dynamic_attributes()["audience"],
        json!("newcomers")
    );

    store.delete(&library).await.unwrap();
    let err = load_registry(&store).await.unwrap_err();
    assert!(matches!(err, ContainerError::NotFound(id) if id == library));
}
