//! Export of self-contained packages from a hierarchy.
//!
//! The [`HierarchyExporter`] walks a hierarchy depth-first, resolves the
//! resources its nodes reference, and optionally pulls in attached
//! statements and the metadata closure describing everything exported. The
//! result is a [`Package`] that is valid in isolation.
//!
//! The exporter itself holds no mutable state. Each call builds a private
//! export context that owns the accumulators, so one exporter can serve
//! any number of calls, concurrently if its readers allow it.

mod catalog;
mod closure;
mod statements;

use catalog::Catalog;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::{
    domain::{
        DEFAULT_GENERATOR, DataType, Key, Node, Package, PropertyClass, Resource, ResourceClass,
        SPECIF_SCHEMA, Statement, StatementClass, Versioned,
    },
    reader::{DataReader, MetadataReader},
};

/// How metadata references are looked up during an export.
///
/// Every exported metadata entity is keyed by its own `(id, revision)`
/// under either policy, so a class referenced both as `C1` and as `C1@1`
/// is exported once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ClassKeyPolicy {
    /// Resolve every unrevisioned reference through the metadata reader, so
    /// it always denotes the latest revision at the time it is met.
    #[default]
    Canonical,
    /// Resolve each distinct reference at most once per export, remembering
    /// the entity it resolved to.
    AsReferenced,
}

/// Toggles for a single export. All default to off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExportOptions {
    /// Include the classes, property classes and data types describing every
    /// exported resource and statement.
    pub include_metadata: bool,
    /// Include every statement attached to an exported resource.
    pub include_statements: bool,
    /// Include every revision of each referenced resource.
    pub include_revisions: bool,
    /// How metadata references are looked up.
    pub class_keys: ClassKeyPolicy,
}

impl ExportOptions {
    /// Options with every inclusion enabled.
    #[must_use]
    pub fn everything() -> Self {
        Self {
            include_metadata: true,
            include_statements: true,
            include_revisions: true,
            ..Self::default()
        }
    }
}

/// Errors that can occur when exporting a hierarchy.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ExportError {
    /// The root hierarchy node could not be found.
    #[error("hierarchy {0} not found")]
    HierarchyNotFound(Key),
}

/// Extracts the subset of a store reachable from a hierarchy node.
#[derive(Debug)]
pub struct HierarchyExporter<'r, M: ?Sized, D: ?Sized> {
    metadata: &'r M,
    data: &'r D,
    generator: String,
}

impl<'r, M, D> HierarchyExporter<'r, M, D>
where
    M: MetadataReader + ?Sized,
    D: DataReader + ?Sized,
{
    /// Create an exporter over the given readers.
    #[must_use]
    pub fn new(metadata: &'r M, data: &'r D) -> Self {
        Self {
            metadata,
            data,
            generator: DEFAULT_GENERATOR.to_string(),
        }
    }

    /// Sets the generator tag stamped into exported packages.
    #[must_use]
    pub fn with_generator(mut self, generator: impl Into<String>) -> Self {
        self.generator = generator.into();
        self
    }

    /// Export the hierarchy identified by `hierarchy` with everything it
    /// references.
    ///
    /// The package carries the hierarchy unchanged, plus the referenced
    /// resources and, depending on `options`, their revisions, attached
    /// statements and metadata closure. Each list holds one entry per key,
    /// in order of first discovery during a depth-first walk.
    ///
    /// Lookups of referenced entities that fail are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::HierarchyNotFound`] if the root node cannot be
    /// resolved.
    #[instrument(skip(self), fields(hierarchy = %hierarchy))]
    pub fn export_hierarchy(
        &self,
        hierarchy: &Key,
        options: ExportOptions,
    ) -> Result<Package, ExportError> {
        let root = self
            .data
            .hierarchy_by_key(hierarchy)
            .ok_or_else(|| ExportError::HierarchyNotFound(hierarchy.clone()))?;

        let mut context = ExportContext::new(self.metadata, self.data, options);
        context.collect(&root);

        tracing::debug!(
            resources = context.resources.len(),
            statements = context.statements.len(),
            resource_classes = context.resource_classes.len(),
            statement_classes = context.statement_classes.len(),
            property_classes = context.property_classes.len(),
            data_types = context.data_types.len(),
            "collected export closure"
        );

        Ok(context.into_package(root, &self.generator))
    }
}

/// The accumulators of one export call.
struct ExportContext<'r, M: ?Sized, D: ?Sized> {
    metadata: &'r M,
    data: &'r D,
    options: ExportOptions,
    resources: Catalog<Resource>,
    statements: Catalog<Statement>,
    resource_classes: Catalog<ResourceClass>,
    statement_classes: Catalog<StatementClass>,
    property_classes: Catalog<PropertyClass>,
    data_types: Catalog<DataType>,
}

impl<'r, M, D> ExportContext<'r, M, D>
where
    M: MetadataReader + ?Sized,
    D: DataReader + ?Sized,
{
    fn new(metadata: &'r M, data: &'r D, options: ExportOptions) -> Self {
        Self {
            metadata,
            data,
            options,
            resources: Catalog::default(),
            statements: Catalog::default(),
            resource_classes: Catalog::default(),
            statement_classes: Catalog::default(),
            property_classes: Catalog::default(),
            data_types: Catalog::default(),
        }
    }

    /// Visit `root` and its descendants in pre-order, children in stored
    /// order.
    fn collect(&mut self, root: &Node) {
        let mut pending = vec![root];

        while let Some(node) = pending.pop() {
            if let Some(reference) = &node.resource {
                self.add_referenced_resource(reference);
            }
            pending.extend(node.nodes.iter().rev());
        }
    }

    /// Add the resource named by a node reference, with its revisions,
    /// metadata and statements as configured.
    ///
    /// Membership is tested with the reference as written, while each
    /// resolved resource is stored under its own key.
    fn add_referenced_resource(&mut self, reference: &Key) {
        if self.resources.contains(reference) {
            tracing::trace!(%reference, "resource already exported");
            return;
        }

        let resolved = if self.options.include_revisions {
            self.data.resource_revisions(reference.id())
        } else {
            self.data.resource_by_key(reference).into_iter().collect()
        };

        if resolved.is_empty() {
            tracing::debug!(%reference, "referenced resource not found");
        }

        for resource in resolved {
            let key = resource.key();
            let class = resource.class.clone();

            if !self.resources.insert(key.clone(), resource) {
                continue;
            }

            if self.options.include_metadata {
                self.add_resource_class(&class);
            }
            if self.options.include_statements {
                self.add_statements_for(&key);
            }
        }
    }

    fn into_package(self, hierarchy: Node, generator: &str) -> Package {
        let id = hierarchy
            .project_id
            .clone()
            .unwrap_or_else(|| hierarchy.id.clone());

        Package {
            schema: Some(SPECIF_SCHEMA.to_string()),
            id,
            title: None,
            generator: Some(generator.to_string()),
            generator_version: Some(env!("CARGO_PKG_VERSION").to_string()),
            created_at: Some(Utc::now()),
            data_types: self.data_types.into_vec(),
            property_classes: self
                .property_classes
                .into_vec()
                .into_iter()
                .map(PropertyClass::normalized)
                .collect(),
            resource_classes: self.resource_classes.into_vec(),
            statement_classes: self.statement_classes.into_vec(),
            resources: self.resources.into_vec(),
            statements: self.statements.into_vec(),
            hierarchies: vec![hierarchy],
        }
    }
}

#[cfg(test)]
mod tests;
