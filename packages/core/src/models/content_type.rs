//! Content Type Capabilities
//!
//! Behaviour that differs between kinds of content (is the node a page, which
//! template renders it, is it visible by default, which typed properties it
//! declares) is supplied by a `ContentType` capability object shared by every
//! node of that type.
//!
//! # Declared Properties
//!
//! A content type may declare named, typed properties backed by the node's
//! attribute bag. Declared properties take part in property access
//! (`ContentTree::get_property` / `set_property`): reads fall back to the
//! declared default, and writes convert the supplied value to the declared
//! kind and elide the default.
//!
//! # Examples
//!
//! ```rust
//! use pagetree_core::models::{ContentType, PropertyDecl, TypeDefinition, ValueKind};
//!
//! let article = TypeDefinition::page("Article")
//!     .with_template("~/article.aspx")
//!     .with_property(PropertyDecl::new("Text", ValueKind::Text).with_default(""));
//!
//! assert!(article.is_page());
//! assert_eq!(article.template_url(), "~/article.aspx");
//! assert!(article.declared_property("Text").is_some());
//! ```

use crate::models::{AttributeValue, ContentNode, ValueKind};
use std::fmt;

/// Template used by page types that do not specify one
pub const DEFAULT_TEMPLATE_URL: &str = "~/default.aspx";

/// Template used by non-page types that do not specify one
pub const DEFAULT_PART_TEMPLATE_URL: &str = "~/part.ascx";

/// Per-type behaviour of content nodes
pub trait ContentType: fmt::Debug + Send + Sync {
    /// Stable type name
    fn discriminator(&self) -> &str;

    /// Whether nodes of this type are directly addressable
    fn is_page(&self) -> bool {
        true
    }

    /// Template path, application-relative (`~/...`) or absolute
    fn template_url(&self) -> &str {
        DEFAULT_TEMPLATE_URL
    }

    /// Initial value of a new node's visibility flag
    fn visible_by_default(&self) -> bool {
        true
    }

    fn declared_properties(&self) -> &[PropertyDecl] {
        &[]
    }

    fn declared_property(&self, name: &str) -> Option<&PropertyDecl> {
        self.declared_properties().iter().find(|p| p.name == name)
    }
}

/// A typed property declared by a content type and stored in the attribute bag
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyDecl {
    pub name: String,
    pub kind: ValueKind,
    /// Value reported when nothing is stored; storing it removes the entry
    pub default: Option<AttributeValue>,
    /// Use the node's publication date when no fixed default is declared
    pub defaults_to_published: bool,
    pub writable: bool,
}

impl PropertyDecl {
    pub fn new(name: impl Into<String>, kind: ValueKind) -> Self {
        Self {
            name: name.into(),
            kind,
            default: None,
            defaults_to_published: false,
            writable: true,
        }
    }

    pub fn with_default(mut self, default: impl Into<AttributeValue>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub fn defaulting_to_published(mut self) -> Self {
        self.defaults_to_published = true;
        self
    }

    pub fn read_only(mut self) -> Self {
        self.writable = false;
        self
    }

    /// Default of this property on a specific node
    pub fn default_for(&self, node: &ContentNode) -> Option<AttributeValue> {
        match &self.default {
            Some(default) => Some(default.clone()),
            None if self.defaults_to_published => node.published.map(AttributeValue::from),
            None => None,
        }
    }
}

/// Data-driven `ContentType` implementation
#[derive(Debug, Clone, PartialEq)]
pub struct TypeDefinition {
    discriminator: String,
    is_page: bool,
    template_url: String,
    visible_by_default: bool,
    properties: Vec<PropertyDecl>,
}

impl TypeDefinition {
    /// A directly addressable page type rendered by the default template
    pub fn page(discriminator: impl Into<String>) -> Self {
        Self {
            discriminator: discriminator.into(),
            is_page: true,
            template_url: DEFAULT_TEMPLATE_URL.to_string(),
            visible_by_default: true,
            properties: Vec::new(),
        }
    }

    /// A non-page part placed in a zone of its page
    pub fn part(discriminator: impl Into<String>) -> Self {
        Self {
            discriminator: discriminator.into(),
            is_page: false,
            template_url: DEFAULT_PART_TEMPLATE_URL.to_string(),
            visible_by_default: true,
            properties: Vec::new(),
        }
    }

    pub fn with_template(mut self, template_url: impl Into<String>) -> Self {
        self.template_url = template_url.into();
        self
    }

    pub fn hidden_by_default(mut self) -> Self {
        self.visible_by_default = false;
        self
    }

    pub fn with_property(mut self, property: PropertyDecl) -> Self {
        self.properties.push(property);
        self
    }
}

impl ContentType for TypeDefinition {
    fn discriminator(&self) -> &str {
        &self.discriminator
    }

    fn is_page(&self) -> bool {
        self.is_page
    }

    fn template_url(&self) -> &str {
        &self.template_url
    }

    fn visible_by_default(&self) -> bool {
        self.visible_by_default
    }

    fn declared_properties(&self) -> &[PropertyDecl] {
        &self.properties
    }
}
