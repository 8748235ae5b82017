use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{
    DataType, Node, PropertyClass, Resource, ResourceClass, Statement, StatementClass,
};

/// The schema URL stamped into exported packages.
pub const SPECIF_SCHEMA: &str = "https://specif.de/v1.1/schema.json";

/// A SpecIF package: metadata, instances and hierarchies as flat lists.
///
/// Packages are both the input of a store and the output of an export.
/// Each list is ordered; for exported packages the order is the order in
/// which entities were first discovered.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Package {
    /// The JSON schema the package conforms to.
    #[serde(rename = "$schema", default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
    /// Package (project) identifier.
    pub id: String,
    /// Display title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<serde_json::Value>,
    /// The tool that produced the package.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generator: Option<String>,
    /// Version of the producing tool.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generator_version: Option<String>,
    /// When the package was produced.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Data types.
    #[serde(default)]
    pub data_types: Vec<DataType>,
    /// Property classes.
    #[serde(default)]
    pub property_classes: Vec<PropertyClass>,
    /// Resource classes.
    #[serde(default)]
    pub resource_classes: Vec<ResourceClass>,
    /// Statement classes.
    #[serde(default)]
    pub statement_classes: Vec<StatementClass>,
    /// Resources.
    #[serde(default)]
    pub resources: Vec<Resource>,
    /// Statements.
    #[serde(default)]
    pub statements: Vec<Statement>,
    /// Hierarchy roots.
    #[serde(default)]
    pub hierarchies: Vec<Node>,
}

impl Package {
    /// Create an empty package with the given id.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }
}
