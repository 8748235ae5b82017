use std::{cell::Cell, collections::HashSet};

use serde_json::json;
use test_case::test_case;

use super::*;
use crate::{
    domain::Package,
    storage::MemoryStore,
    test_support::{
        data_type, key, keys, node, property_class, resource, resource_class, statement,
        statement_class,
    },
};

fn metadata_only() -> ExportOptions {
    ExportOptions {
        include_metadata: true,
        ..ExportOptions::default()
    }
}

fn export(store: &MemoryStore, hierarchy: &str, options: ExportOptions) -> Package {
    HierarchyExporter::new(store, store)
        .export_hierarchy(&key(hierarchy), options)
        .unwrap()
}

/// H1 → N1 → (R1@1 : C1), where C1 has P1 : D1 and P1 has empty values.
fn example_store() -> MemoryStore {
    let mut store = MemoryStore::default();

    let mut p1 = property_class("P1", "D1");
    p1.values = Some(Vec::new());

    store.insert_data_type(data_type("D1"));
    store.insert_property_class(p1);
    store.insert_resource_class(resource_class("C1", &["P1"]));
    store.insert_resource(resource("R1@1", "C1"));
    store.insert_hierarchy(node("H1", None, vec![node("N1", Some("R1@1"), vec![])]));
    store
}

/// A requirement R1 satisfied by R2 and verified by R3, spread over a
/// two-level outline.
fn linked_store() -> MemoryStore {
    let mut store = MemoryStore::default();

    store.insert_data_type(data_type("DT-Text"));
    store.insert_data_type(data_type("DT-Date"));
    store.insert_property_class(property_class("PC-Title", "DT-Text"));
    store.insert_property_class(property_class("PC-Due", "DT-Date"));
    store.insert_resource_class(resource_class("RC-Req", &["PC-Title"]));
    store.insert_resource_class(resource_class("RC-Design", &["PC-Title"]));
    store.insert_resource_class(resource_class("RC-Test", &["PC-Title", "PC-Due"]));
    store.insert_statement_class(statement_class(
        "SC-Satisfies",
        &["PC-Due"],
        &["RC-Design"],
        &["RC-Req"],
    ));
    store.insert_statement_class(statement_class("SC-Verifies", &[], &["RC-Test"], &[]));

    store.insert_resource(resource("R1@1", "RC-Req"));
    store.insert_resource(resource("R2@1", "RC-Design"));
    store.insert_resource(resource("R3@1", "RC-Test"));
    store.insert_statement(statement("S1@1", "SC-Satisfies", "R2", "R1"));
    store.insert_statement(statement("S2@1", "SC-Verifies", "R3", "R1"));

    store.insert_hierarchy(node(
        "H1",
        None,
        vec![
            node("N1", Some("R1@1"), vec![node("N2", Some("R2@1"), vec![])]),
            node("N3", Some("R3@1"), vec![]),
        ],
    ));
    store
}

#[test]
fn example_scenario_exports_metadata_closure() {
    let package = export(&example_store(), "H1", metadata_only());

    assert_eq!(keys(&package.resources), ["R1@1"]);
    assert_eq!(keys(&package.resource_classes), ["C1"]);
    assert_eq!(keys(&package.property_classes), ["P1"]);
    assert_eq!(package.property_classes[0].values, None);
    assert_eq!(keys(&package.data_types), ["D1"]);
    assert!(package.statements.is_empty());
    assert!(package.statement_classes.is_empty());
}

#[test]
fn non_empty_values_are_exported_unchanged() {
    let mut store = example_store();
    let mut p1 = property_class("P1", "D1");
    p1.values = Some(vec![json!("draft"), json!("approved")]);
    store.insert_property_class(p1.clone());

    let package = export(&store, "H1", metadata_only());

    assert_eq!(package.property_classes, vec![p1]);
}

#[test]
fn without_flags_only_referenced_resources_are_exported() {
    let package = export(&linked_store(), "H1", ExportOptions::default());

    assert_eq!(keys(&package.resources), ["R1@1", "R2@1", "R3@1"]);
    assert!(package.statements.is_empty());
    assert!(package.resource_classes.is_empty());
    assert!(package.statement_classes.is_empty());
    assert!(package.property_classes.is_empty());
    assert!(package.data_types.is_empty());
}

#[test]
fn repeated_references_are_exported_once() {
    let mut store = linked_store();
    store.insert_hierarchy(node(
        "H2",
        None,
        vec![
            node("A", Some("R1@1"), vec![node("B", Some("R1@1"), vec![])]),
            node("C", Some("R1@1"), vec![]),
        ],
    ));

    let package = export(&store, "H2", ExportOptions::default());

    assert_eq!(keys(&package.resources), ["R1@1"]);
}

#[test]
fn traversal_is_depth_first_in_child_order() {
    let mut store = MemoryStore::default();
    for id in ["A@1", "B@1", "C@1", "D@1", "E@1"] {
        store.insert_resource(resource(id, "C1"));
    }
    store.insert_hierarchy(node(
        "H",
        Some("A@1"),
        vec![
            node(
                "N1",
                None,
                vec![node("N11", Some("C@1"), vec![node("N111", Some("D@1"), vec![])])],
            ),
            node("N2", Some("B@1"), vec![]),
            node("N3", Some("E@1"), vec![]),
        ],
    ));

    let package = export(&store, "H", ExportOptions::default());

    assert_eq!(keys(&package.resources), ["A@1", "C@1", "D@1", "B@1", "E@1"]);
}

#[test]
fn deep_hierarchies_are_walked_to_the_leaves() {
    let mut store = MemoryStore::default();
    let mut tree = node("N-0", Some("R-0@1"), vec![]);
    for depth in 1..=500 {
        tree = node(&format!("N-{depth}"), None, vec![tree]);
    }
    store.insert_resource(resource("R-0@1", "C1"));
    store.insert_resource(resource("R-1@1", "C1"));
    tree.nodes[0].resource = Some(key("R-1@1"));
    store.insert_hierarchy(tree);

    let package = export(&store, "N-500", ExportOptions::default());

    assert_eq!(keys(&package.resources), ["R-1@1", "R-0@1"]);
}

#[test]
fn hierarchy_is_exported_unchanged() {
    let store = linked_store();
    let stored = store.hierarchy_by_key(&key("H1")).unwrap();

    let package = export(&store, "H1", ExportOptions::everything());

    assert_eq!(package.hierarchies, vec![stored]);
}

#[test]
fn missing_hierarchy_is_an_error() {
    let store = linked_store();

    let err = HierarchyExporter::new(&store, &store)
        .export_hierarchy(&key("H9"), ExportOptions::everything())
        .unwrap_err();

    assert_eq!(err, ExportError::HierarchyNotFound(key("H9")));
    assert_eq!(err.to_string(), "hierarchy H9 not found");
}

#[test]
fn package_is_stamped_with_project_and_generator() {
    let mut package = Package::new("PRJ-1");
    package.hierarchies.push(node("H1", None, vec![]));
    let store = MemoryStore::from_package(package);

    let exported = HierarchyExporter::new(&store, &store)
        .with_generator("unit-test")
        .export_hierarchy(&key("H1"), ExportOptions::default())
        .unwrap();

    assert_eq!(exported.id, "PRJ-1");
    assert_eq!(exported.generator.as_deref(), Some("unit-test"));
    assert_eq!(exported.schema.as_deref(), Some(SPECIF_SCHEMA));
    assert!(exported.created_at.is_some());
}

#[test]
fn package_id_falls_back_to_root_node() {
    let package = export(&example_store(), "H1", ExportOptions::default());

    assert_eq!(package.id, "H1");
    assert_eq!(package.generator.as_deref(), Some(DEFAULT_GENERATOR));
}

#[test]
fn revisions_expand_to_every_stored_revision() {
    let mut store = example_store();
    store.insert_resource(resource("R1@2", "C1"));
    store.insert_resource(resource("R1@3", "C1"));

    let options = ExportOptions {
        include_revisions: true,
        ..ExportOptions::default()
    };
    let package = export(&store, "H1", options);

    assert_eq!(keys(&package.resources), ["R1@1", "R1@2", "R1@3"]);
}

#[test]
fn revision_expansion_keeps_keys_unique_across_references() {
    let mut store = example_store();
    store.insert_resource(resource("R1@2", "C1"));
    store.insert_hierarchy(node(
        "H2",
        None,
        vec![
            node("A", Some("R1@1"), vec![]),
            node("B", Some("R1"), vec![]),
            node("C", Some("R1@2"), vec![]),
        ],
    ));

    let options = ExportOptions {
        include_revisions: true,
        include_metadata: true,
        ..ExportOptions::default()
    };
    let package = export(&store, "H2", options);

    assert_eq!(keys(&package.resources), ["R1@1", "R1@2"]);
    assert_eq!(keys(&package.resource_classes), ["C1"]);
}

#[test]
fn unrevisioned_reference_resolves_to_latest_revision() {
    let mut store = example_store();
    store.insert_resource(resource("R1@2", "C1"));
    store.insert_hierarchy(node("H2", Some("R1"), vec![node("N", Some("R1"), vec![])]));

    let package = export(&store, "H2", ExportOptions::default());

    assert_eq!(keys(&package.resources), ["R1@2"]);
}

#[test]
fn statements_pull_in_their_class_closure() {
    let options = ExportOptions {
        include_metadata: true,
        include_statements: true,
        ..ExportOptions::default()
    };
    let package = export(&linked_store(), "H1", options);

    assert_eq!(keys(&package.resources), ["R1@1", "R2@1", "R3@1"]);
    assert_eq!(keys(&package.statements), ["S1@1", "S2@1"]);
    assert_eq!(keys(&package.statement_classes), ["SC-Satisfies", "SC-Verifies"]);
    assert_eq!(
        keys(&package.resource_classes),
        ["RC-Req", "RC-Design", "RC-Test"]
    );
    assert_eq!(keys(&package.property_classes), ["PC-Title", "PC-Due"]);
    assert_eq!(keys(&package.data_types), ["DT-Text", "DT-Date"]);
}

#[test]
fn statement_endpoint_classes_are_included_without_their_resources() {
    let mut store = linked_store();
    store.insert_hierarchy(node("H2", Some("R1@1"), vec![]));

    let options = ExportOptions {
        include_metadata: true,
        include_statements: true,
        ..ExportOptions::default()
    };
    let package = export(&store, "H2", options);

    assert_eq!(keys(&package.resources), ["R1@1"]);
    assert_eq!(keys(&package.statements), ["S1@1", "S2@1"]);
    assert_eq!(
        keys(&package.resource_classes),
        ["RC-Req", "RC-Design", "RC-Test"]
    );
}

#[test]
fn statements_without_metadata_carry_no_classes() {
    let options = ExportOptions {
        include_statements: true,
        ..ExportOptions::default()
    };
    let package = export(&linked_store(), "H1", options);

    assert_eq!(keys(&package.statements), ["S1@1", "S2@1"]);
    assert!(package.statement_classes.is_empty());
    assert!(package.resource_classes.is_empty());
}

#[test]
fn missing_metadata_is_skipped() {
    let mut store = MemoryStore::default();
    store.insert_resource_class(resource_class("C1", &["P-Missing", "P1"]));
    store.insert_property_class(property_class("P1", "D-Missing"));
    store.insert_resource(resource("R1@1", "C1"));
    store.insert_resource(resource("R2@1", "C-Missing"));
    store.insert_statement(statement("S1@1", "SC-Missing", "R1", "R2"));
    store.insert_hierarchy(node(
        "H",
        None,
        vec![
            node("A", Some("R-Missing@1"), vec![]),
            node("B", Some("R1@1"), vec![]),
            node("C", Some("R2@1"), vec![]),
        ],
    ));

    let package = export(&store, "H", ExportOptions::everything());

    assert_eq!(keys(&package.resources), ["R1@1", "R2@1"]);
    assert_eq!(keys(&package.statements), ["S1@1"]);
    assert_eq!(keys(&package.resource_classes), ["C1"]);
    assert_eq!(keys(&package.property_classes), ["P1"]);
    assert!(package.statement_classes.is_empty());
    assert!(package.data_types.is_empty());
}

fn mixed_class_references() -> MemoryStore {
    let mut store = MemoryStore::default();
    store.insert_data_type(data_type("D1@1"));
    store.insert_property_class(property_class("P1@1", "D1"));
    store.insert_resource_class(resource_class("C1@1", &["P1"]));
    store.insert_resource(resource("R1@1", "C1"));
    store.insert_resource(resource("R2@1", "C1@1"));
    store.insert_hierarchy(node(
        "H",
        None,
        vec![node("A", Some("R1@1"), vec![]), node("B", Some("R2@1"), vec![])],
    ));
    store
}

/// Both policies key exported classes by their own key, so a class
/// referenced as `C1` and as `C1@1` is exported once.
#[test_case(ClassKeyPolicy::Canonical; "canonical")]
#[test_case(ClassKeyPolicy::AsReferenced; "as referenced")]
fn class_references_collapse_to_one_entry(class_keys: ClassKeyPolicy) {
    let options = ExportOptions {
        include_metadata: true,
        class_keys,
        ..ExportOptions::default()
    };
    let package = export(&mixed_class_references(), "H", options);

    assert_eq!(keys(&package.resource_classes), ["C1@1"]);
    assert_eq!(keys(&package.property_classes), ["P1@1"]);
    assert_eq!(keys(&package.data_types), ["D1@1"]);
}

/// Counts resource class lookups made against an inner store.
struct CountingMetadata<'a> {
    inner: &'a MemoryStore,
    resource_class_lookups: Cell<usize>,
}

impl MetadataReader for CountingMetadata<'_> {
    fn resource_class_by_key(&self, key: &Key) -> Option<ResourceClass> {
        self.resource_class_lookups
            .set(self.resource_class_lookups.get() + 1);
        self.inner.resource_class_by_key(key)
    }

    fn statement_class_by_key(&self, key: &Key) -> Option<StatementClass> {
        self.inner.statement_class_by_key(key)
    }

    fn property_class_by_key(&self, key: &Key) -> Option<PropertyClass> {
        self.inner.property_class_by_key(key)
    }

    fn data_type_by_key(&self, key: &Key) -> Option<DataType> {
        self.inner.data_type_by_key(key)
    }
}

#[test_case(ClassKeyPolicy::Canonical, 3; "canonical resolves every reference")]
#[test_case(ClassKeyPolicy::AsReferenced, 1; "as referenced resolves each reference once")]
fn class_key_policy_decides_lookups(class_keys: ClassKeyPolicy, lookups: usize) {
    let mut store = example_store();
    store.insert_resource(resource("R2@1", "C1"));
    store.insert_resource(resource("R3@1", "C1"));
    store.insert_hierarchy(node(
        "H2",
        None,
        vec![
            node("A", Some("R1@1"), vec![]),
            node("B", Some("R2@1"), vec![]),
            node("C", Some("R3@1"), vec![]),
        ],
    ));
    let metadata = CountingMetadata {
        inner: &store,
        resource_class_lookups: Cell::new(0),
    };
    let options = ExportOptions {
        include_metadata: true,
        class_keys,
        ..ExportOptions::default()
    };

    let package = HierarchyExporter::new(&metadata, &store)
        .export_hierarchy(&key("H2"), options)
        .unwrap();

    assert_eq!(keys(&package.resource_classes), ["C1"]);
    assert_eq!(metadata.resource_class_lookups.get(), lookups);
}

#[test]
fn exported_metadata_is_closed() {
    let package = export(&linked_store(), "H1", ExportOptions::everything());

    let resource_classes: HashSet<_> = package.resource_classes.iter().map(Versioned::key).collect();
    let statement_classes: HashSet<_> =
        package.statement_classes.iter().map(Versioned::key).collect();
    let property_classes: HashSet<_> = package.property_classes.iter().map(Versioned::key).collect();
    let data_types: HashSet<_> = package.data_types.iter().map(Versioned::key).collect();

    for resource in &package.resources {
        assert!(resource_classes.contains(&resource.class));
    }
    for statement in &package.statements {
        assert!(statement_classes.contains(&statement.class));
    }
    let referenced_property_classes = package
        .resource_classes
        .iter()
        .flat_map(|class| &class.property_classes)
        .chain(
            package
                .statement_classes
                .iter()
                .flat_map(|class| &class.property_classes),
        );
    for property_class in referenced_property_classes {
        assert!(property_classes.contains(property_class));
    }
    for property_class in &package.property_classes {
        assert!(data_types.contains(&property_class.data_type));
    }
}

#[test]
fn exported_keys_are_unique() {
    fn assert_unique(keys: &[String]) {
        let unique: HashSet<_> = keys.iter().collect();
        assert_eq!(unique.len(), keys.len(), "duplicate keys in {keys:?}");
    }

    let mut store = linked_store();
    store.insert_resource(resource("R1@2", "RC-Req"));
    store.insert_hierarchy(node(
        "H2",
        None,
        vec![
            node("A", Some("R1"), vec![]),
            node("B", Some("R1@1"), vec![]),
            node("C", Some("R2@1"), vec![node("D", Some("R1@2"), vec![])]),
        ],
    ));

    let package = export(&store, "H2", ExportOptions::everything());

    assert_unique(&keys(&package.resources));
    assert_unique(&keys(&package.statements));
    assert_unique(&keys(&package.resource_classes));
    assert_unique(&keys(&package.statement_classes));
    assert_unique(&keys(&package.property_classes));
    assert_unique(&keys(&package.data_types));
}

#[test]
fn repeated_exports_are_identical() {
    let store = linked_store();
    let exporter = HierarchyExporter::new(&store, &store);

    let mut first = exporter
        .export_hierarchy(&key("H1"), ExportOptions::everything())
        .unwrap();
    let mut second = exporter
        .export_hierarchy(&key("H1"), ExportOptions::everything())
        .unwrap();
    first.created_at = None;
    second.created_at = None;

    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn exports_do_not_share_state() {
    let mut store = linked_store();
    store.insert_hierarchy(node("H2", Some("R3@1"), vec![]));
    let exporter = HierarchyExporter::new(&store, &store);

    let full = exporter
        .export_hierarchy(&key("H1"), ExportOptions::everything())
        .unwrap();
    let bare = exporter
        .export_hierarchy(&key("H2"), ExportOptions::default())
        .unwrap();

    assert_eq!(keys(&full.resources).len(), 3);
    assert_eq!(keys(&bare.resources), ["R3@1"]);
    assert!(bare.resource_classes.is_empty());
    assert!(bare.statements.is_empty());
}

#[test]
fn exporter_can_be_shared_between_threads() {
    let store = linked_store();
    let exporter = HierarchyExporter::new(&store, &store);

    let packages: Vec<Package> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| {
                scope.spawn(|| {
                    exporter
                        .export_hierarchy(&key("H1"), ExportOptions::everything())
                        .unwrap()
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    for package in &packages {
        assert_eq!(keys(&package.resources), keys(&packages[0].resources));
        assert_eq!(keys(&package.statements), ["S1@1", "S2@1"]);
    }
}

#[test]
fn works_through_trait_objects() {
    let store = linked_store();
    let metadata: &dyn MetadataReader = &store;
    let data: &dyn DataReader = &store;

    let package = HierarchyExporter::new(metadata, data)
        .export_hierarchy(&key("N1"), metadata_only())
        .unwrap();

    assert_eq!(keys(&package.resources), ["R1@1", "R2@1"]);
    assert_eq!(keys(&package.resource_classes), ["RC-Req", "RC-Design"]);
}
