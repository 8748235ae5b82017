//! Metadata closure: classes, their property classes, and data types.

use super::{Catalog, ClassKeyPolicy, ExportContext};
use crate::{
    domain::{Key, Versioned},
    reader::{DataReader, MetadataReader},
};

impl<M, D> ExportContext<'_, M, D>
where
    M: MetadataReader + ?Sized,
    D: DataReader + ?Sized,
{
    /// Add a resource class together with its property classes and their
    /// data types. Each class is expanded at most once.
    pub(super) fn add_resource_class(&mut self, reference: &Key) {
        let metadata = self.metadata;
        let Some(class) = resolve(
            self.options.class_keys,
            &mut self.resource_classes,
            reference,
            "resource class",
            |key| metadata.resource_class_by_key(key),
        ) else {
            return;
        };

        let property_classes = class.property_classes.clone();
        self.add_property_classes(&property_classes);
    }

    /// Add a statement class, its property classes and data types, and every
    /// resource class it allows as subject or object.
    pub(super) fn add_statement_class(&mut self, reference: &Key) {
        let metadata = self.metadata;
        let Some(class) = resolve(
            self.options.class_keys,
            &mut self.statement_classes,
            reference,
            "statement class",
            |key| metadata.statement_class_by_key(key),
        ) else {
            return;
        };

        let property_classes = class.property_classes.clone();
        let endpoint_classes: Vec<Key> = class
            .subject_classes
            .iter()
            .chain(&class.object_classes)
            .cloned()
            .collect();

        self.add_property_classes(&property_classes);
        for resource_class in &endpoint_classes {
            self.add_resource_class(resource_class);
        }
    }

    fn add_property_classes(&mut self, references: &[Key]) {
        let metadata = self.metadata;
        for reference in references {
            let Some(property_class) = resolve(
                self.options.class_keys,
                &mut self.property_classes,
                reference,
                "property class",
                |key| metadata.property_class_by_key(key),
            ) else {
                continue;
            };

            let data_type = property_class.data_type.clone();
            self.add_data_type(&data_type);
        }
    }

    fn add_data_type(&mut self, reference: &Key) {
        let metadata = self.metadata;
        resolve(
            self.options.class_keys,
            &mut self.data_types,
            reference,
            "data type",
            |key| metadata.data_type_by_key(key),
        );
    }
}

/// Look up a metadata entity that is not yet in `catalog`.
///
/// A newly found entity is stored under its own key and returned. Returns
/// `None` if the entity is already present or cannot be found.
///
/// Under [`ClassKeyPolicy::Canonical`], an unrevisioned reference is always
/// fetched. Under [`ClassKeyPolicy::AsReferenced`], a reference that was
/// met before is answered from the catalog, and a reference that differs
/// from the key it resolved to is recorded as an alias.
fn resolve<'c, T: Versioned>(
    policy: ClassKeyPolicy,
    catalog: &'c mut Catalog<T>,
    reference: &Key,
    kind: &'static str,
    fetch: impl FnOnce(&Key) -> Option<T>,
) -> Option<&'c T> {
    let memoized = policy == ClassKeyPolicy::AsReferenced || reference.is_revisioned();

    if memoized && catalog.contains(reference) {
        tracing::trace!(%reference, kind, "already exported");
        return None;
    }

    let Some(entity) = fetch(reference) else {
        tracing::debug!(%reference, kind, "referenced metadata not found");
        return None;
    };

    let key = entity.key();
    let inserted = catalog.insert(key.clone(), entity);
    if !inserted {
        tracing::trace!(%reference, %key, kind, "already exported");
    }

    if policy == ClassKeyPolicy::AsReferenced && key != *reference {
        catalog.alias(reference.clone(), &key);
    }

    if inserted {
        catalog.get(&key)
    } else {
        None
    }
}
