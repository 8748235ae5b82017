//! The SpecIF metadata layer: classes and data types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{Key, versioned::impl_versioned};

/// Defines the shape of a family of resources.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceClass {
    /// Class identifier.
    pub id: String,
    /// Class revision.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revision: Option<String>,
    /// Display title.
    #[serde(default)]
    pub title: String,
    /// Free-form description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<serde_json::Value>,
    /// The property classes instances of this class may carry, in order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub property_classes: Vec<Key>,
    /// How instances may be created (e.g. `auto`, `user`).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub instantiation: Vec<String>,
    /// Whether instances act as headings in a hierarchy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_heading: Option<bool>,
    /// When this revision was created.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub changed_at: Option<DateTime<Utc>>,
}

impl ResourceClass {
    /// Create a class with the given property classes.
    #[must_use]
    pub fn new(key: &Key, property_classes: Vec<Key>) -> Self {
        Self {
            id: key.id().to_string(),
            revision: key.revision().map(str::to_string),
            title: key.id().to_string(),
            description: None,
            property_classes,
            instantiation: Vec::new(),
            is_heading: None,
            changed_at: None,
        }
    }
}

/// Defines the semantics of a family of statements.
///
/// Subject and object classes, when present, restrict which resource
/// classes a statement of this class may connect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatementClass {
    /// Class identifier.
    pub id: String,
    /// Class revision.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revision: Option<String>,
    /// Display title.
    #[serde(default)]
    pub title: String,
    /// Free-form description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<serde_json::Value>,
    /// The property classes instances of this class may carry, in order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub property_classes: Vec<Key>,
    /// Resource classes allowed as subject.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub subject_classes: Vec<Key>,
    /// Resource classes allowed as object.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub object_classes: Vec<Key>,
    /// How instances may be created.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub instantiation: Vec<String>,
    /// When this revision was created.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub changed_at: Option<DateTime<Utc>>,
}

impl StatementClass {
    /// Create a class with the given property classes and no endpoint
    /// constraints.
    #[must_use]
    pub fn new(key: &Key, property_classes: Vec<Key>) -> Self {
        Self {
            id: key.id().to_string(),
            revision: key.revision().map(str::to_string),
            title: key.id().to_string(),
            description: None,
            property_classes,
            subject_classes: Vec::new(),
            object_classes: Vec::new(),
            instantiation: Vec::new(),
            changed_at: None,
        }
    }
}

/// A property definition shared by resource and statement classes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyClass {
    /// Property class identifier.
    pub id: String,
    /// Property class revision.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revision: Option<String>,
    /// Display title.
    #[serde(default)]
    pub title: String,
    /// Free-form description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<serde_json::Value>,
    /// The data type of the property values.
    pub data_type: Key,
    /// Default or permitted values.
    ///
    /// `Some(vec![])` is not a valid constraint in the interchange schema; see
    /// [`PropertyClass::normalized`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub values: Option<Vec<serde_json::Value>>,
    /// Whether multiple values are allowed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multiple: Option<bool>,
    /// Text format hint (e.g. `plain`, `xhtml`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    /// Unit of measure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    /// When this revision was created.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub changed_at: Option<DateTime<Utc>>,
}

impl PropertyClass {
    /// Create a property class of the given data type.
    #[must_use]
    pub fn new(key: &Key, data_type: Key) -> Self {
        Self {
            id: key.id().to_string(),
            revision: key.revision().map(str::to_string),
            title: key.id().to_string(),
            description: None,
            data_type,
            values: None,
            multiple: None,
            format: None,
            unit: None,
            changed_at: None,
        }
    }

    /// Returns the property class with an empty `values` list removed.
    ///
    /// Non-empty lists are kept unchanged.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        if self.values.as_ref().is_some_and(Vec::is_empty) {
            self.values = None;
        }
        self
    }
}

/// A value of an enumerated data type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnumeratedValue {
    /// Value identifier.
    pub id: String,
    /// The value itself.
    pub value: serde_json::Value,
}

/// A primitive or enumerated value type; the leaves of the metadata graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataType {
    /// Data type identifier.
    pub id: String,
    /// Data type revision.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revision: Option<String>,
    /// Display title.
    #[serde(default)]
    pub title: String,
    /// Free-form description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<serde_json::Value>,
    /// The base type, e.g. `xs:string` or `xs:integer`.
    #[serde(rename = "type")]
    pub base_type: String,
    /// Permitted values for enumerated types.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enumeration: Option<Vec<EnumeratedValue>>,
    /// Maximum string length.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u64>,
    /// Number of fraction digits for decimals.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fraction_digits: Option<u32>,
    /// Lower bound for numeric types.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_inclusive: Option<f64>,
    /// Upper bound for numeric types.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_inclusive: Option<f64>,
    /// When this revision was created.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub changed_at: Option<DateTime<Utc>>,
}

impl DataType {
    /// Create a data type with the given base type.
    #[must_use]
    pub fn new(key: &Key, base_type: impl Into<String>) -> Self {
        Self {
            id: key.id().to_string(),
            revision: key.revision().map(str::to_string),
            title: key.id().to_string(),
            description: None,
            base_type: base_type.into(),
            enumeration: None,
            max_length: None,
            fraction_digits: None,
            min_inclusive: None,
            max_inclusive: None,
            changed_at: None,
        }
    }
}

impl_versioned!(ResourceClass, StatementClass, PropertyClass, DataType);
