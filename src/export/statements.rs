use super::ExportContext;
use crate::{
    domain::{Key, Versioned},
    reader::{DataReader, MetadataReader},
};

impl<M, D> ExportContext<'_, M, D>
where
    M: MetadataReader + ?Sized,
    D: DataReader + ?Sized,
{
    /// Add every statement in which the resource `resource` takes part,
    /// and, if metadata is included, the closure of each statement's class.
    pub(super) fn add_statements_for(&mut self, resource: &Key) {
        for statement in self.data.statements_for_resource(resource) {
            let key = statement.key();
            let class = statement.class.clone();

            if !self.statements.insert(key, statement) {
                continue;
            }

            if self.options.include_metadata {
                self.add_statement_class(&class);
            }
        }
    }
}
