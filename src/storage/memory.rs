//! An in-memory store of SpecIF data
//!
//! The [`MemoryStore`] keeps every revision of every entity and implements
//! both reader interfaces, so it can back an export directly.

use std::collections::{BTreeMap, BTreeSet};

use crate::{
    domain::{
        DataType, Key, Node, Package, PropertyClass, Resource, ResourceClass, Statement,
        StatementClass, Versioned,
    },
    reader::{DataReader, MetadataReader},
};

/// All revisions of one entity type, grouped by id.
///
/// Ids are kept in sorted order, revisions in insertion order.
#[derive(Debug, Clone)]
struct Revisions<T> {
    by_id: BTreeMap<String, Vec<T>>,
}

impl<T> Default for Revisions<T> {
    fn default() -> Self {
        Self {
            by_id: BTreeMap::new(),
        }
    }
}

impl<T: Versioned> Revisions<T> {
    /// Insert a revision, replacing one with the same key in place.
    fn insert(&mut self, entity: T) {
        let revisions = self.by_id.entry(entity.id().to_string()).or_default();

        if let Some(existing) = revisions
            .iter_mut()
            .find(|existing| existing.revision() == entity.revision())
        {
            tracing::debug!(key = %entity.key(), "replacing existing revision");
            *existing = entity;
        } else {
            revisions.push(entity);
        }
    }

    /// The named revision, or the latest one for an unrevisioned key.
    fn get(&self, key: &Key) -> Option<&T> {
        let revisions = self.by_id.get(key.id())?;
        match key.revision() {
            Some(revision) => revisions.iter().find(|e| e.revision() == Some(revision)),
            None => latest(revisions),
        }
    }

    fn all(&self, id: &str) -> &[T] {
        self.by_id.get(id).map(Vec::as_slice).unwrap_or_default()
    }

    fn latest_of(&self, id: &str) -> Option<&T> {
        self.by_id.get(id).and_then(|revisions| latest(revisions))
    }

    fn len(&self) -> usize {
        self.by_id.values().map(Vec::len).sum()
    }
}

/// The revision with the greatest change timestamp.
///
/// Revisions without a timestamp sort first; ties go to the revision
/// inserted last.
fn latest<T: Versioned>(revisions: &[T]) -> Option<&T> {
    revisions
        .iter()
        .enumerate()
        .max_by_key(|(index, entity)| (entity.changed_at(), *index))
        .map(|(_, entity)| entity)
}

/// An in-memory store of SpecIF metadata, instances and hierarchies.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    data_types: Revisions<DataType>,
    property_classes: Revisions<PropertyClass>,
    resource_classes: Revisions<ResourceClass>,
    statement_classes: Revisions<StatementClass>,
    resources: Revisions<Resource>,
    statements: Revisions<Statement>,
    /// Ids of the statements naming a resource id as subject or object.
    statements_by_resource: BTreeMap<String, BTreeSet<String>>,
    hierarchies: Vec<Node>,
}

impl MemoryStore {
    /// Create a store holding the contents of a single package.
    #[must_use]
    pub fn from_package(package: Package) -> Self {
        let mut store = Self::default();
        store.add_package(package);
        store
    }

    /// Add every entity of a package to the store.
    ///
    /// Hierarchy roots that do not name a project are assigned the package
    /// id.
    pub fn add_package(&mut self, package: Package) {
        package
            .data_types
            .into_iter()
            .for_each(|e| self.data_types.insert(e));
        package
            .property_classes
            .into_iter()
            .for_each(|e| self.property_classes.insert(e));
        package
            .resource_classes
            .into_iter()
            .for_each(|e| self.resource_classes.insert(e));
        package
            .statement_classes
            .into_iter()
            .for_each(|e| self.statement_classes.insert(e));
        package
            .resources
            .into_iter()
            .for_each(|e| self.resources.insert(e));
        package
            .statements
            .into_iter()
            .for_each(|e| self.insert_statement(e));

        for mut root in package.hierarchies {
            if root.project_id.is_none() {
                root.project_id = Some(package.id.clone());
            }
            self.insert_hierarchy(root);
        }
    }

    /// Insert a data type.
    pub fn insert_data_type(&mut self, data_type: DataType) {
        self.data_types.insert(data_type);
    }

    /// Insert a property class.
    pub fn insert_property_class(&mut self, property_class: PropertyClass) {
        self.property_classes.insert(property_class);
    }

    /// Insert a resource class.
    pub fn insert_resource_class(&mut self, resource_class: ResourceClass) {
        self.resource_classes.insert(resource_class);
    }

    /// Insert a statement class.
    pub fn insert_statement_class(&mut self, statement_class: StatementClass) {
        self.statement_classes.insert(statement_class);
    }

    /// Insert a resource revision.
    pub fn insert_resource(&mut self, resource: Resource) {
        self.resources.insert(resource);
    }

    /// Insert a statement revision.
    pub fn insert_statement(&mut self, statement: Statement) {
        for end in [&statement.subject, &statement.object] {
            self.statements_by_resource
                .entry(end.id().to_string())
                .or_default()
                .insert(statement.id.clone());
        }
        self.statements.insert(statement);
    }

    /// Insert a hierarchy root, replacing a root with the same key.
    pub fn insert_hierarchy(&mut self, root: Node) {
        let key = root.key();
        if let Some(existing) = self.hierarchies.iter_mut().find(|h| h.key() == key) {
            tracing::debug!(%key, "replacing existing hierarchy");
            *existing = root;
        } else {
            self.hierarchies.push(root);
        }
    }

    /// The hierarchy roots, in insertion order.
    #[must_use]
    pub fn hierarchies(&self) -> &[Node] {
        &self.hierarchies
    }

    /// The number of resource revisions held.
    #[must_use]
    pub fn resource_count(&self) -> usize {
        self.resources.len()
    }

    /// The number of statement revisions held.
    #[must_use]
    pub fn statement_count(&self) -> usize {
        self.statements.len()
    }
}

impl MetadataReader for MemoryStore {
    fn resource_class_by_key(&self, key: &Key) -> Option<ResourceClass> {
        self.resource_classes.get(key).cloned()
    }

    fn statement_class_by_key(&self, key: &Key) -> Option<StatementClass> {
        self.statement_classes.get(key).cloned()
    }

    fn property_class_by_key(&self, key: &Key) -> Option<PropertyClass> {
        self.property_classes.get(key).cloned()
    }

    fn data_type_by_key(&self, key: &Key) -> Option<DataType> {
        self.data_types.get(key).cloned()
    }
}

impl DataReader for MemoryStore {
    /// Searches every root and its descendants; the returned node carries
    /// the project id of the root it was found under.
    fn hierarchy_by_key(&self, key: &Key) -> Option<Node> {
        self.hierarchies.iter().find_map(|root| {
            root.find(key).map(|node| Node {
                project_id: root.project_id.clone(),
                ..node.clone()
            })
        })
    }

    fn resource_by_key(&self, key: &Key) -> Option<Resource> {
        self.resources.get(key).cloned()
    }

    fn resource_revisions(&self, id: &str) -> Vec<Resource> {
        self.resources.all(id).to_vec()
    }

    /// Returns the latest revision of each statement involving `key`, in id
    /// order.
    fn statements_for_resource(&self, key: &Key) -> Vec<Statement> {
        let Some(ids) = self.statements_by_resource.get(key.id()) else {
            return Vec::new();
        };

        ids.iter()
            .filter_map(|id| self.statements.latest_of(id))
            .filter(|statement| statement.involves(key))
            .cloned()
            .collect()
    }
}
