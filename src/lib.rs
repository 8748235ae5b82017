//! SpecIF hierarchy export
//!
//! Extracts a self-contained package from a SpecIF model: every resource
//! reachable from a hierarchy node, and optionally the statements attached
//! to them, all revisions of each resource, and the metadata closure that
//! makes the package valid in isolation.

pub mod domain;
pub use domain::{Config, Key, Node, Package, Versioned};

/// Export of packages from a hierarchy.
pub mod export;
pub use export::{ClassKeyPolicy, ExportError, ExportOptions, HierarchyExporter};

pub mod reader;
pub use reader::{DataReader, MetadataReader};

/// Storage backends and package files.
pub mod storage;
pub use storage::{LoadError, MemoryStore};

#[cfg(test)]
mod test_support;
