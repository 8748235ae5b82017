//! Domain models for SpecIF data.
//!
//! This module contains the entity types of the interchange model, their
//! composite identity, and configuration.

mod versioned;
pub use versioned::Versioned;

/// Composite `(id, revision)` identity.
pub mod key;
pub use key::{Key, KeyParseError};

/// Resources, statements and hierarchy nodes.
pub mod instance;
pub use instance::{Node, Property, Resource, Statement};

/// Classes and data types.
pub mod metadata;
pub use metadata::{DataType, EnumeratedValue, PropertyClass, ResourceClass, StatementClass};

mod package;
pub use package::{Package, SPECIF_SCHEMA};

mod config;
pub use config::{Config, ConfigError, DEFAULT_GENERATOR};
