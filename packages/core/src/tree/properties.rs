//! Name-based property access
//!
//! `get_property` / `set_property` give uniform access to a node's data by
//! name. Reads resolve in order:
//!
//! 1. well-known identity fields (`ID`, `Title`, `Name`, `Url`, `TemplateUrl`)
//! 2. other intrinsic fields (`ZoneName`, `SortOrder`, `Visible`, ...)
//! 3. properties declared by the node's content type
//! 4. the attribute bag
//! 5. named sub-collections
//!
//! Writes go to a writable intrinsic field or declared property when one
//! exists (converting the value to the declared kind), otherwise to the
//! attribute bag. Sub-collections cannot be replaced through this path.

use super::ContentTree;
use crate::models::{AttributeValue, DetailCollection, NodeKey, ValueKind};
use crate::{ContentError, Result};
use chrono::{DateTime, Utc};
use std::fmt;

/// Result of a property read
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue<'a> {
    Value(AttributeValue),
    Collection(&'a DetailCollection),
}

impl PropertyValue<'_> {
    pub fn as_value(&self) -> Option<&AttributeValue> {
        match self {
            Self::Value(value) => Some(value),
            Self::Collection(_) => None,
        }
    }

    pub fn into_value(self) -> Option<AttributeValue> {
        match self {
            Self::Value(value) => Some(value),
            Self::Collection(_) => None,
        }
    }

    pub fn as_collection(&self) -> Option<&DetailCollection> {
        match self {
            Self::Collection(collection) => Some(collection),
            Self::Value(_) => None,
        }
    }
}

/// Input of a property write
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyInput {
    /// Clears the property
    Null,
    Value(AttributeValue),
    /// Always rejected; edit collections through `AttributeBag::collection_mut`
    Collection(DetailCollection),
}

impl From<AttributeValue> for PropertyInput {
    fn from(value: AttributeValue) -> Self {
        Self::Value(value)
    }
}

impl From<Option<AttributeValue>> for PropertyInput {
    fn from(value: Option<AttributeValue>) -> Self {
        value.map_or(Self::Null, Self::Value)
    }
}

impl From<DetailCollection> for PropertyInput {
    fn from(collection: DetailCollection) -> Self {
        Self::Collection(collection)
    }
}

impl From<bool> for PropertyInput {
    fn from(value: bool) -> Self {
        Self::Value(value.into())
    }
}

impl From<i64> for PropertyInput {
    fn from(value: i64) -> Self {
        Self::Value(value.into())
    }
}

impl From<i32> for PropertyInput {
    fn from(value: i32) -> Self {
        Self::Value(value.into())
    }
}

impl From<f64> for PropertyInput {
    fn from(value: f64) -> Self {
        Self::Value(value.into())
    }
}

impl From<&str> for PropertyInput {
    fn from(value: &str) -> Self {
        Self::Value(value.into())
    }
}

impl From<String> for PropertyInput {
    fn from(value: String) -> Self {
        Self::Value(value.into())
    }
}

impl From<DateTime<Utc>> for PropertyInput {
    fn from(value: DateTime<Utc>) -> Self {
        Self::Value(value.into())
    }
}

/// Converts values to the kind a typed property expects
pub trait ValueConverter: fmt::Debug + Send + Sync {
    /// Convert `value` to `target`, or explain why it cannot be
    fn convert(
        &self,
        value: AttributeValue,
        target: ValueKind,
    ) -> std::result::Result<AttributeValue, String>;
}

/// Lossless conversions between scalar kinds, with text parsing
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultConverter;

impl ValueConverter for DefaultConverter {
    fn convert(
        &self,
        value: AttributeValue,
        target: ValueKind,
    ) -> std::result::Result<AttributeValue, String> {
        use AttributeValue as V;

        if value.kind() == target {
            return Ok(value);
        }

        match (value, target) {
            (V::Text(text), ValueKind::Bool) => text
                .trim()
                .to_ascii_lowercase()
                .parse::<bool>()
                .map(V::Bool)
                .map_err(|e| e.to_string()),
            (V::Text(text), ValueKind::Int) => {
                text.trim().parse::<i64>().map(V::Int).map_err(|e| e.to_string())
            }
            (V::Text(text), ValueKind::Float) => {
                text.trim().parse::<f64>().map(V::Float).map_err(|e| e.to_string())
            }
            (V::Text(text), ValueKind::DateTime) => DateTime::parse_from_rfc3339(text.trim())
                .map(|date| V::DateTime(date.with_timezone(&Utc)))
                .map_err(|e| e.to_string()),
            (V::Text(text), ValueKind::Json) => Ok(V::Json(
                serde_json::from_str(&text).unwrap_or(serde_json::Value::String(text)),
            )),
            (V::Int(i), ValueKind::Float) => Ok(V::Float(i as f64)),
            (V::Int(i), ValueKind::Bool) => Ok(V::Bool(i != 0)),
            (V::Bool(b), ValueKind::Int) => Ok(V::Int(b as i64)),
            (V::Float(f), ValueKind::Int) => {
                if f.fract() == 0.0 && f >= i64::MIN as f64 && f <= i64::MAX as f64 {
                    Ok(V::Int(f as i64))
                } else {
                    Err(format!("{} is not a whole number", f))
                }
            }
            (V::Bool(b), ValueKind::Text) => Ok(V::Text(b.to_string())),
            (V::Int(i), ValueKind::Text) => Ok(V::Text(i.to_string())),
            (V::Float(f), ValueKind::Text) => Ok(V::Text(f.to_string())),
            (V::DateTime(d), ValueKind::Text) => Ok(V::Text(d.to_rfc3339())),
            (V::Json(json), ValueKind::Text) => Ok(V::Text(match json {
                serde_json::Value::String(s) => s,
                other => other.to_string(),
            })),
            (V::Json(json), target) => match json {
                serde_json::Value::Bool(b) => self.convert(V::Bool(b), target),
                serde_json::Value::String(s) => self.convert(V::Text(s), target),
                serde_json::Value::Number(n) => match n.as_i64() {
                    Some(i) => self.convert(V::Int(i), target),
                    None => match n.as_f64() {
                        Some(f) => self.convert(V::Float(f), target),
                        None => Err(format!("{} is out of range", n)),
                    },
                },
                other => Err(format!("cannot convert json {} to {}", other, target)),
            },
            (V::Link(_), target) => Err(format!("cannot convert a link to {}", target)),
            (value, ValueKind::Json) => match value {
                V::Bool(b) => Ok(V::Json(b.into())),
                V::Int(i) => Ok(V::Json(i.into())),
                V::Float(f) => Ok(V::Json(f.into())),
                V::DateTime(d) => Ok(V::Json(d.to_rfc3339().into())),
                other => Err(format!("cannot convert {} to json", other.kind())),
            },
            (value, target) => Err(format!("cannot convert {} to {}", value.kind(), target)),
        }
    }
}

/// Scalar fields of `ContentNode` reachable by name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Id,
    Title,
    Name,
    Url,
    TemplateUrl,
    ZoneName,
    SortOrder,
    Visible,
    Published,
    Expires,
    Created,
    Updated,
    SavedBy,
    IsPage,
    Path,
}

impl Field {
    fn parse(name: &str) -> Option<Self> {
        Some(match name {
            "ID" => Self::Id,
            "Title" => Self::Title,
            "Name" => Self::Name,
            "Url" => Self::Url,
            "TemplateUrl" => Self::TemplateUrl,
            "ZoneName" => Self::ZoneName,
            "SortOrder" => Self::SortOrder,
            "Visible" => Self::Visible,
            "Published" => Self::Published,
            "Expires" => Self::Expires,
            "Created" => Self::Created,
            "Updated" => Self::Updated,
            "SavedBy" => Self::SavedBy,
            "IsPage" => Self::IsPage,
            "Path" => Self::Path,
            _ => return None,
        })
    }

    /// Kind accepted by the setter, `None` for read-only fields
    fn writable_kind(self) -> Option<ValueKind> {
        match self {
            Self::Title | Self::Name | Self::ZoneName | Self::SavedBy => Some(ValueKind::Text),
            Self::SortOrder => Some(ValueKind::Int),
            Self::Visible => Some(ValueKind::Bool),
            Self::Published | Self::Expires | Self::Updated => Some(ValueKind::DateTime),
            Self::Id | Self::Url | Self::TemplateUrl | Self::Created | Self::IsPage | Self::Path => {
                None
            }
        }
    }

    fn nullable(self) -> bool {
        matches!(
            self,
            Self::Name | Self::ZoneName | Self::Published | Self::Expires
        )
    }
}

/// Whether `name` addresses a scalar field rather than the attribute bag
pub(crate) fn is_intrinsic(name: &str) -> bool {
    Field::parse(name).is_some()
}

fn require_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(ContentError::invalid_argument(
            "name",
            "property name cannot be empty",
        ));
    }
    Ok(())
}

impl ContentTree {
    /// Read a property by name
    ///
    /// Returns `Ok(None)` when nothing is stored under the name and no default
    /// is declared. `Url` reports the cached friendly address once
    /// `ContentTree::url` has produced one, the rewritten address before that.
    ///
    /// # Errors
    ///
    /// - `InvalidArgument` for an empty name
    /// - `NodeNotFound` for a stale key
    /// - `TemplateNotFound` when reading `Url` of a node that has no address
    pub fn get_property(&self, key: NodeKey, name: &str) -> Result<Option<PropertyValue<'_>>> {
        require_name(name)?;
        let node = self.node(key)?;

        if let Some(field) = Field::parse(name) {
            let value = match field {
                Field::Id => Some(AttributeValue::Int(node.id())),
                Field::Title => Some(node.title.clone().into()),
                Field::Name => Some(node.name().into_owned().into()),
                Field::Url => Some(match node.cached_url() {
                    Some(url) => url.to_string().into(),
                    None => self.rewritten_url(key)?.into(),
                }),
                Field::TemplateUrl => Some(node.template_url().into()),
                Field::ZoneName => node.zone_name.clone().map(AttributeValue::from),
                Field::SortOrder => Some(node.sort_order.into()),
                Field::Visible => Some(node.visible.into()),
                Field::Published => node.published.map(AttributeValue::from),
                Field::Expires => node.expires.map(AttributeValue::from),
                Field::Created => Some(node.created().into()),
                Field::Updated => Some(node.updated.into()),
                Field::SavedBy => Some(node.saved_by.clone().into()),
                Field::IsPage => Some(node.is_page().into()),
                Field::Path => Some(self.path(key)?.into()),
            };
            return Ok(value.map(PropertyValue::Value));
        }

        if let Some(declared) = node.content_type().declared_property(name) {
            let value = node.detail(name).cloned().or_else(|| declared.default_for(node));
            return Ok(value.map(PropertyValue::Value));
        }

        if let Some(value) = node.detail(name) {
            return Ok(Some(PropertyValue::Value(value.clone())));
        }

        Ok(node
            .attributes()
            .collection(name)
            .map(PropertyValue::Collection))
    }

    /// Write a property by name
    ///
    /// # Errors
    ///
    /// - `InvalidArgument` for an empty name, or a name already used by a sibling
    /// - `Usage` when given a collection
    /// - `Conversion` when a typed property cannot take the value
    /// - `NodeNotFound` for a stale key
    pub fn set_property(
        &mut self,
        key: NodeKey,
        name: &str,
        input: impl Into<PropertyInput>,
    ) -> Result<()> {
        require_name(name)?;
        self.node(key)?;

        let value = match input.into() {
            PropertyInput::Collection(_) => {
                return Err(ContentError::usage(format!(
                    "cannot set collection '{}' through set_property, use collection_mut instead",
                    name
                )));
            }
            PropertyInput::Null => None,
            PropertyInput::Value(value) => Some(value),
        };

        if let Some(field) = Field::parse(name) {
            if let Some(kind) = field.writable_kind() {
                let value = self.convert_to(name, value, kind)?;
                return self.set_field(key, name, field, value);
            }
        }

        let node = self.node(key)?;
        let declared = node
            .content_type()
            .declared_property(name)
            .filter(|declared| declared.writable)
            .map(|declared| (declared.kind, declared.default_for(node)));

        match declared {
            Some((kind, default)) => {
                let value = self.convert_to(name, value, kind)?;
                self.node_mut(key)?.set_detail(name, value, default.as_ref());
            }
            None => self.node_mut(key)?.attributes_mut().set(name, value),
        }
        Ok(())
    }

    fn convert_to(
        &self,
        name: &str,
        value: Option<AttributeValue>,
        kind: ValueKind,
    ) -> Result<Option<AttributeValue>> {
        value
            .map(|value| {
                self.converter()
                    .convert(value, kind)
                    .map_err(|reason| ContentError::conversion(name, reason))
            })
            .transpose()
    }

    fn set_field(
        &mut self,
        key: NodeKey,
        name: &str,
        field: Field,
        value: Option<AttributeValue>,
    ) -> Result<()> {
        let Some(value) = value else {
            if !field.nullable() {
                return Err(ContentError::conversion(name, "value cannot be null"));
            }
            return match field {
                Field::Name => self.set_name(key, None),
                Field::ZoneName => {
                    self.node_mut(key)?.zone_name = None;
                    Ok(())
                }
                Field::Published => {
                    self.node_mut(key)?.published = None;
                    Ok(())
                }
                _ => {
                    self.node_mut(key)?.expires = None;
                    Ok(())
                }
            };
        };

        let mismatch = || ContentError::conversion(name, "unexpected value kind");
        match field {
            Field::Name => {
                let name = value.as_text().ok_or_else(mismatch)?.to_string();
                return self.set_name(key, Some(name));
            }
            Field::SortOrder => {
                let order = value.as_int().ok_or_else(mismatch)?;
                let order = i32::try_from(order)
                    .map_err(|_| ContentError::conversion(name, "sort order out of range"))?;
                self.node_mut(key)?.sort_order = order;
            }
            Field::Visible => {
                self.node_mut(key)?.visible = value.as_bool().ok_or_else(mismatch)?;
            }
            Field::Published => {
                self.node_mut(key)?.published = Some(value.as_datetime().ok_or_else(mismatch)?);
            }
            Field::Expires => {
                self.node_mut(key)?.expires = Some(value.as_datetime().ok_or_else(mismatch)?);
            }
            Field::Updated => {
                self.node_mut(key)?.updated = value.as_datetime().ok_or_else(mismatch)?;
            }
            Field::Title | Field::ZoneName | Field::SavedBy => {
                let text = value.as_text().ok_or_else(mismatch)?.to_string();
                let node = self.node_mut(key)?;
                match field {
                    Field::Title => node.title = text,
                    Field::ZoneName => node.zone_name = Some(text),
                    _ => node.saved_by = text,
                }
            }
            _ => return Err(mismatch()),
        }
        Ok(())
    }
}
