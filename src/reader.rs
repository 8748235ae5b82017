//! The lookup interfaces the exporter depends on.
//!
//! Readers are pure, synchronous lookups. Absence is reported as `None` (or
//! an empty list), never as an error.

use crate::domain::{
    DataType, Key, Node, PropertyClass, Resource, ResourceClass, Statement, StatementClass,
};

/// Resolves metadata definitions by key.
///
/// An unrevisioned key resolves to the store's canonical (latest) revision.
pub trait MetadataReader {
    /// Look up a resource class.
    fn resource_class_by_key(&self, key: &Key) -> Option<ResourceClass>;

    /// Look up a statement class.
    fn statement_class_by_key(&self, key: &Key) -> Option<StatementClass>;

    /// Look up a property class.
    fn property_class_by_key(&self, key: &Key) -> Option<PropertyClass>;

    /// Look up a data type.
    fn data_type_by_key(&self, key: &Key) -> Option<DataType>;
}

/// Resolves hierarchies, resources and statements.
pub trait DataReader {
    /// Look up a hierarchy node, including its descendants.
    fn hierarchy_by_key(&self, key: &Key) -> Option<Node>;

    /// Look up a single resource revision.
    fn resource_by_key(&self, key: &Key) -> Option<Resource>;

    /// Every known revision of the resource with the given id.
    ///
    /// The order is the store's choice but must be stable.
    fn resource_revisions(&self, id: &str) -> Vec<Resource>;

    /// Every statement whose subject or object is the given resource.
    fn statements_for_resource(&self, key: &Key) -> Vec<Statement>;
}
