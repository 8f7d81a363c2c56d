//! Schema-less Attribute Storage
//!
//! Every content node carries an `AttributeBag`: a sparse, name-keyed store of
//! typed values (details) plus named, ordered sub-collections for multi-valued
//! attributes.
//!
//! # Storage Rules
//!
//! - **Sparse**: absence means default. Setting a value equal to its declared
//!   default removes the entry.
//! - **Null removes**: setting `None` always removes the entry.
//! - **No coercion**: re-setting a detail with a value of another kind drops the
//!   old detail (and its persistence id) and stores a fresh one.
//!
//! # Examples
//!
//! ```rust
//! use pagetree_core::models::{AttributeBag, AttributeValue};
//!
//! let mut bag = AttributeBag::new();
//! bag.set("Text", Some(AttributeValue::from("hello")));
//! assert_eq!(bag.get("Text"), Some(&AttributeValue::from("hello")));
//!
//! // Default elision
//! bag.set_with_default("Text", Some(AttributeValue::from("")), &AttributeValue::from(""));
//! assert!(bag.get("Text").is_none());
//! ```

use crate::models::NodeKey;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Kind tag for an `AttributeValue`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ValueKind {
    Bool,
    Int,
    Float,
    Text,
    DateTime,
    Link,
    Json,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool => write!(f, "bool"),
            Self::Int => write!(f, "int"),
            Self::Float => write!(f, "float"),
            Self::Text => write!(f, "text"),
            Self::DateTime => write!(f, "datetime"),
            Self::Link => write!(f, "link"),
            Self::Json => write!(f, "json"),
        }
    }
}

/// A typed attribute value
///
/// There is no null variant: an absent value is `None` at every API boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "camelCase")]
pub enum AttributeValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    DateTime(DateTime<Utc>),
    /// Reference to another node in the same tree
    Link(NodeKey),
    /// Arbitrary structured value
    Json(serde_json::Value),
}

impl AttributeValue {
    /// Get the kind tag of this value
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Bool(_) => ValueKind::Bool,
            Self::Int(_) => ValueKind::Int,
            Self::Float(_) => ValueKind::Float,
            Self::Text(_) => ValueKind::Text,
            Self::DateTime(_) => ValueKind::DateTime,
            Self::Link(_) => ValueKind::Link,
            Self::Json(_) => ValueKind::Json,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_datetime(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::DateTime(d) => Some(*d),
            _ => None,
        }
    }

    pub fn as_link(&self) -> Option<NodeKey> {
        match self {
            Self::Link(key) => Some(*key),
            _ => None,
        }
    }
}

impl From<bool> for AttributeValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for AttributeValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for AttributeValue {
    fn from(value: i32) -> Self {
        Self::Int(value as i64)
    }
}

impl From<f64> for AttributeValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<DateTime<Utc>> for AttributeValue {
    fn from(value: DateTime<Utc>) -> Self {
        Self::DateTime(value)
    }
}

impl From<NodeKey> for AttributeValue {
    fn from(value: NodeKey) -> Self {
        Self::Link(value)
    }
}

impl From<serde_json::Value> for AttributeValue {
    fn from(value: serde_json::Value) -> Self {
        Self::Json(value)
    }
}

/// A single named value stored in an `AttributeBag`
///
/// `id` is the persistence identity of the stored record (`0` until the
/// persistence layer saves it). Updating a detail with a value of the same
/// kind keeps the id; replacing it with another kind starts over at `0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Detail {
    id: i64,
    name: String,
    value: AttributeValue,
}

impl Detail {
    fn new(name: &str, value: AttributeValue) -> Self {
        Self {
            id: 0,
            name: name.to_string(),
            value,
        }
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &AttributeValue {
        &self.value
    }

    pub fn kind(&self) -> ValueKind {
        self.value.kind()
    }

    /// Record the id handed out by the persistence layer
    pub fn assign_id(&mut self, id: i64) {
        self.id = id;
    }
}

/// An ordered, named collection of values owned by a node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailCollection {
    id: i64,
    name: String,
    enclosing: Option<NodeKey>,
    values: Vec<AttributeValue>,
}

impl DetailCollection {
    pub fn new(name: impl Into<String>, enclosing: Option<NodeKey>) -> Self {
        Self {
            id: 0,
            name: name.into(),
            enclosing,
            values: Vec::new(),
        }
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn assign_id(&mut self, id: i64) {
        self.id = id;
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Node owning this collection
    pub fn enclosing(&self) -> Option<NodeKey> {
        self.enclosing
    }

    pub(crate) fn rebind(&mut self, owner: Option<NodeKey>) {
        self.enclosing = owner;
    }

    pub fn push(&mut self, value: impl Into<AttributeValue>) {
        self.values.push(value.into());
    }

    pub fn insert(&mut self, index: usize, value: impl Into<AttributeValue>) {
        self.values.insert(index, value.into());
    }

    pub fn remove(&mut self, index: usize) -> Option<AttributeValue> {
        if index < self.values.len() {
            Some(self.values.remove(index))
        } else {
            None
        }
    }

    /// Remove the first occurrence of a value, returning whether it was present
    pub fn remove_value(&mut self, value: &AttributeValue) -> bool {
        match self.values.iter().position(|v| v == value) {
            Some(index) => {
                self.values.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, value: &AttributeValue) -> bool {
        self.values.contains(value)
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }

    pub fn get(&self, index: usize) -> Option<&AttributeValue> {
        self.values.get(index)
    }

    pub fn values(&self) -> &[AttributeValue] {
        &self.values
    }

    pub fn iter(&self) -> impl Iterator<Item = &AttributeValue> {
        self.values.iter()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Deep copy bound to a new owner, with the persistence id reset
    pub fn clone_for(&self, owner: Option<NodeKey>) -> Self {
        Self {
            id: 0,
            name: self.name.clone(),
            enclosing: owner,
            values: self.values.clone(),
        }
    }
}

/// Sparse name → value store with named sub-collections
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeBag {
    details: HashMap<String, Detail>,
    collections: HashMap<String, DetailCollection>,
}

impl AttributeBag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the value stored under `name`
    pub fn get(&self, name: &str) -> Option<&AttributeValue> {
        self.details.get(name).map(|detail| &detail.value)
    }

    /// Get the full detail record stored under `name`
    pub fn detail(&self, name: &str) -> Option<&Detail> {
        self.details.get(name)
    }

    pub fn detail_mut(&mut self, name: &str) -> Option<&mut Detail> {
        self.details.get_mut(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.details.contains_key(name)
    }

    /// Store a value, or remove the entry when `value` is `None`
    ///
    /// A value of the same kind as the stored one updates the detail in place;
    /// a value of another kind replaces the detail.
    pub fn set(&mut self, name: &str, value: Option<AttributeValue>) {
        match value {
            None => {
                self.details.remove(name);
            }
            Some(value) => match self.details.get_mut(name) {
                Some(existing) if existing.kind() == value.kind() => {
                    existing.value = value;
                }
                _ => {
                    // Missing, or stored with an incompatible kind
                    self.details
                        .insert(name.to_string(), Detail::new(name, value));
                }
            },
        }
    }

    /// Store a value unless it equals `default`, in which case the entry is removed
    pub fn set_with_default(
        &mut self,
        name: &str,
        value: Option<AttributeValue>,
        default: &AttributeValue,
    ) {
        match value {
            Some(ref v) if v == default => {
                self.details.remove(name);
            }
            other => self.set(name, other),
        }
    }

    pub fn remove(&mut self, name: &str) -> Option<AttributeValue> {
        self.details.remove(name).map(|detail| detail.value)
    }

    /// Iterate over all stored details (unordered)
    pub fn details(&self) -> impl Iterator<Item = &Detail> {
        self.details.values()
    }

    pub fn len(&self) -> usize {
        self.details.len()
    }

    pub fn is_empty(&self) -> bool {
        self.details.is_empty() && self.collections.is_empty()
    }

    pub fn collection(&self, name: &str) -> Option<&DetailCollection> {
        self.collections.get(name)
    }

    /// Get a named collection, creating an empty one owned by `owner` when missing
    pub fn collection_mut(&mut self, name: &str, owner: Option<NodeKey>) -> &mut DetailCollection {
        self.collections
            .entry(name.to_string())
            .or_insert_with(|| DetailCollection::new(name, owner))
    }

    /// Get a named collection for editing without creating it
    pub fn existing_collection_mut(&mut self, name: &str) -> Option<&mut DetailCollection> {
        self.collections.get_mut(name)
    }

    pub fn remove_collection(&mut self, name: &str) -> Option<DetailCollection> {
        self.collections.remove(name)
    }

    pub fn collections(&self) -> impl Iterator<Item = &DetailCollection> {
        self.collections.values()
    }

    pub(crate) fn insert_collection(&mut self, collection: DetailCollection) {
        self.collections
            .insert(collection.name().to_string(), collection);
    }

    pub(crate) fn rebind_collections(&mut self, owner: Option<NodeKey>) {
        for collection in self.collections.values_mut() {
            collection.rebind(owner);
        }
    }

    pub(crate) fn clear(&mut self) {
        self.details.clear();
        self.collections.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_set_and_get() {
        let mut bag = AttributeBag::new();
        bag.set("Text", Some("hello".into()));
        bag.set("Count", Some(3.into()));

        assert_eq!(bag.get("Text").and_then(|v| v.as_text()), Some("hello"));
        assert_eq!(bag.get("Count").and_then(|v| v.as_int()), Some(3));
        assert_eq!(bag.len(), 2);
    }

    #[test]
    fn test_set_none_removes() {
        let mut bag = AttributeBag::new();
        bag.set("Text", Some("hello".into()));
        bag.set("Text", None);
        assert!(!bag.contains("Text"));
        assert!(bag.is_empty());
    }

    #[test]
    fn test_default_elision_round_trip() {
        let mut bag = AttributeBag::new();
        let default = AttributeValue::Bool(false);

        bag.set_with_default("IsOnline", Some(true.into()), &default);
        assert_eq!(bag.get("IsOnline"), Some(&AttributeValue::Bool(true)));

        bag.set_with_default("IsOnline", Some(false.into()), &default);
        assert!(bag.get("IsOnline").is_none());
        let read_back = bag.get("IsOnline").cloned().unwrap_or(default.clone());
        assert_eq!(read_back, default);
    }

    #[test]
    fn test_same_kind_updates_in_place() {
        let mut bag = AttributeBag::new();
        bag.set("Text", Some("one".into()));
        bag.detail_mut("Text").unwrap().assign_id(17);

        bag.set("Text", Some("two".into()));
        let detail = bag.detail("Text").unwrap();
        assert_eq!(detail.id(), 17);
        assert_eq!(detail.value(), &AttributeValue::from("two"));
    }

    #[test]
    fn test_kind_change_replaces_detail() {
        let mut bag = AttributeBag::new();
        bag.set("Value", Some("12".into()));
        bag.detail_mut("Value").unwrap().assign_id(5);

        bag.set("Value", Some(12.into()));
        let detail = bag.detail("Value").unwrap();
        assert_eq!(detail.id(), 0, "replaced detail starts without persistence id");
        assert_eq!(detail.kind(), ValueKind::Int);
    }

    #[test]
    fn test_collections() {
        let mut bag = AttributeBag::new();
        let owner = NodeKey::new(4);
        let roles = bag.collection_mut("Roles", Some(owner));
        roles.push("Editors");
        roles.push("Writers");

        let roles = bag.collection("Roles").unwrap();
        assert_eq!(roles.len(), 2);
        assert_eq!(roles.enclosing(), Some(owner));
        assert!(roles.contains(&"Writers".into()));
        assert!(!bag.is_empty());
    }

    #[test]
    fn test_collection_clone_for_rebinds_owner() {
        let mut original = DetailCollection::new("Tags", Some(NodeKey::new(1)));
        original.assign_id(9);
        original.push(json!({"a": 1}));

        let copy = original.clone_for(Some(NodeKey::new(2)));
        assert_eq!(copy.id(), 0);
        assert_eq!(copy.enclosing(), Some(NodeKey::new(2)));
        assert_eq!(copy.values(), original.values());
    }

    #[test]
    fn test_value_serialization_is_tagged() {
        let value = AttributeValue::Int(3);
        let json = serde_json::to_value(&value).unwrap();
        assert_eq!(json, json!({"type": "int", "value": 3}));
    }
}
