//! Style directives attached to a brick.
//!
//! The core never interprets an [`Appearance`]; it only keeps the list in
//! order and moves it in and out of documents. In a document the list is a
//! single object whose keys are property names, in list order.
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq)]
pub struct Appearance {
    pub property: String,
    pub value: Value,
}

impl Appearance {
    pub fn new(property: impl Into<String>, value: impl Into<Value>) -> Self {
        Self { property: property.into(), value: value.into() }
    }
}

/// Decode a style object into its directives, preserving key order.
pub fn from_json(map: &Map<String, Value>) -> Vec<Appearance> {
    map.iter()
        .map(|(k, v)| Appearance { property: k.clone(), value: v.clone() })
        .collect()
}

/// Encode directives as a style object.
///
/// A property repeated later in the list overrides the earlier value but keeps
/// the earlier position.
pub fn to_json(style: &[Appearance]) -> Map<String, Value> {
    let mut out = Map::new();
    for a in style {
        out.insert(a.property.clone(), a.value.clone());
    }
    out
}
