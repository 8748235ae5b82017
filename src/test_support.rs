//! Fixture builders shared by unit tests.
//!
//! Keys are written in their textual form, `ID` or `ID@REVISION`.

use crate::domain::{
    DataType, Key, Node, PropertyClass, Resource, ResourceClass, Statement, StatementClass,
    Versioned,
};

pub fn key(text: &str) -> Key {
    text.parse().unwrap()
}

fn keys_of(texts: &[&str]) -> Vec<Key> {
    texts.iter().map(|text| key(text)).collect()
}

pub fn resource(id: &str, class: &str) -> Resource {
    Resource::new(&key(id), key(class))
}

pub fn statement(id: &str, class: &str, subject: &str, object: &str) -> Statement {
    Statement::new(&key(id), key(class), key(subject), key(object))
}

pub fn resource_class(id: &str, property_classes: &[&str]) -> ResourceClass {
    ResourceClass::new(&key(id), keys_of(property_classes))
}

pub fn statement_class(
    id: &str,
    property_classes: &[&str],
    subject_classes: &[&str],
    object_classes: &[&str],
) -> StatementClass {
    StatementClass {
        subject_classes: keys_of(subject_classes),
        object_classes: keys_of(object_classes),
        ..StatementClass::new(&key(id), keys_of(property_classes))
    }
}

pub fn property_class(id: &str, data_type: &str) -> PropertyClass {
    PropertyClass::new(&key(id), key(data_type))
}

pub fn data_type(id: &str) -> DataType {
    DataType::new(&key(id), "xs:string")
}

pub fn node(id: &str, resource: Option<&str>, children: Vec<Node>) -> Node {
    Node {
        nodes: children,
        ..Node::new(id, resource.map(key))
    }
}

/// The textual keys of `entities`, in order.
pub fn keys<T: Versioned>(entities: &[T]) -> Vec<String> {
    entities.iter().map(|e| e.key().to_string()).collect()
}
