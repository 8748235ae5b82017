//! Instance-level SpecIF data: resources, statements and hierarchy nodes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{Key, Versioned, versioned::impl_versioned};

/// A property value attached to a resource or statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    /// The property class governing this property.
    pub class: Key,
    /// The property values. Kept as raw JSON, since values may be plain
    /// strings or multi-language text.
    #[serde(default)]
    pub values: Vec<serde_json::Value>,
}

/// A resource, such as a requirement, a diagram or a heading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    /// Resource identifier.
    pub id: String,
    /// Resource revision.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revision: Option<String>,
    /// The resource class this resource instantiates.
    pub class: Key,
    /// Property values.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub properties: Vec<Property>,
    /// When this revision was created.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub changed_at: Option<DateTime<Utc>>,
    /// Who created this revision.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub changed_by: Option<String>,
}

impl Resource {
    /// Create a resource without properties.
    #[must_use]
    pub fn new(key: &Key, class: Key) -> Self {
        Self {
            id: key.id().to_string(),
            revision: key.revision().map(str::to_string),
            class,
            properties: Vec::new(),
            changed_at: None,
            changed_by: None,
        }
    }
}

/// A directed, typed relation from a subject to an object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Statement {
    /// Statement identifier.
    pub id: String,
    /// Statement revision.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revision: Option<String>,
    /// The statement class this statement instantiates.
    pub class: Key,
    /// The resource (or statement) the relation starts from.
    pub subject: Key,
    /// The resource (or statement) the relation points to.
    pub object: Key,
    /// Property values.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub properties: Vec<Property>,
    /// When this revision was created.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub changed_at: Option<DateTime<Utc>>,
    /// Who created this revision.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub changed_by: Option<String>,
}

impl Statement {
    /// Create a statement without properties.
    #[must_use]
    pub fn new(key: &Key, class: Key, subject: Key, object: Key) -> Self {
        Self {
            id: key.id().to_string(),
            revision: key.revision().map(str::to_string),
            class,
            subject,
            object,
            properties: Vec::new(),
            changed_at: None,
            changed_by: None,
        }
    }

    /// Whether the resource identified by `resource` is the subject or the
    /// object of this statement.
    #[must_use]
    pub fn involves(&self, resource: &Key) -> bool {
        self.subject.matches(resource) || self.object.matches(resource)
    }
}

/// A node of a hierarchy tree.
///
/// Nodes organise resources into a navigable outline. A node may reference a
/// resource, and owns its children in display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    /// Node identifier.
    pub id: String,
    /// Node revision.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revision: Option<String>,
    /// The resource shown at this node.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource: Option<Key>,
    /// Child nodes, in order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub nodes: Vec<Node>,
    /// When this revision was created.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub changed_at: Option<DateTime<Utc>>,
    /// The project (package) that owns this hierarchy.
    ///
    /// Assigned by the store, not part of the interchange format.
    #[serde(skip)]
    pub project_id: Option<String>,
}

impl Node {
    /// Create a node, optionally referencing a resource.
    #[must_use]
    pub fn new(id: impl Into<String>, resource: Option<Key>) -> Self {
        Self {
            id: id.into(),
            revision: None,
            resource,
            nodes: Vec::new(),
            changed_at: None,
            project_id: None,
        }
    }

    /// Append a child node, returning `self` for chaining.
    #[must_use]
    pub fn with_child(mut self, child: Self) -> Self {
        self.nodes.push(child);
        self
    }

    /// Find this node or a descendant matching `key`, depth-first.
    #[must_use]
    pub fn find(&self, key: &Key) -> Option<&Self> {
        let mut pending = vec![self];
        while let Some(node) = pending.pop() {
            if key.matches(&node.key()) {
                return Some(node);
            }
            pending.extend(node.nodes.iter().rev());
        }
        None
    }

    /// The number of nodes in this tree, including `self`.
    #[must_use]
    pub fn node_count(&self) -> usize {
        1 + self.nodes.iter().map(Self::node_count).sum::<usize>()
    }
}

impl_versioned!(Resource, Statement, Node);
