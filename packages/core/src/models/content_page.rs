//! Type-Safe ContentPage Wrapper
//!
//! The basic addressable page: a title plus a free text body stored in the
//! `Text` detail.
//!
//! # Examples
//!
//! ```rust
//! use pagetree_core::models::ContentPage;
//!
//! let page = ContentPage::builder("about")
//!     .with_title("About us")
//!     .with_text("<p>Hello</p>")
//!     .build();
//!
//! assert_eq!(page.text(), "<p>Hello</p>");
//! assert!(page.as_node().is_page());
//! ```

use crate::models::{
    AttributeValue, ContentNode, ContentType, PropertyDecl, TypeDefinition, ValueKind,
};
use crate::{ContentError, Result};
use std::sync::{Arc, OnceLock};

/// Discriminator of the built-in page type
pub const CONTENT_PAGE_TYPE: &str = "ContentPage";

const TEXT: &str = "Text";

/// Type-safe wrapper for content pages
#[derive(Debug, Clone)]
pub struct ContentPage {
    node: ContentNode,
}

impl ContentPage {
    /// Shared content type of every content page
    pub fn content_type() -> Arc<dyn ContentType> {
        static DEFINITION: OnceLock<Arc<TypeDefinition>> = OnceLock::new();
        DEFINITION
            .get_or_init(|| {
                Arc::new(
                    TypeDefinition::page(CONTENT_PAGE_TYPE)
                        .with_property(PropertyDecl::new(TEXT, ValueKind::Text).with_default("")),
                )
            })
            .clone()
    }

    /// Wrap an existing node
    ///
    /// # Errors
    ///
    /// Returns `ContentError::InvalidArgument` if the node is not a content page.
    pub fn from_node(node: ContentNode) -> Result<Self> {
        if node.discriminator() != CONTENT_PAGE_TYPE {
            return Err(ContentError::invalid_argument(
                "content_type",
                format!("Expected '{}', got '{}'", CONTENT_PAGE_TYPE, node.discriminator()),
            ));
        }
        Ok(Self { node })
    }

    pub fn builder(name: impl Into<String>) -> ContentPageBuilder {
        ContentPageBuilder {
            name: name.into(),
            title: None,
            text: None,
        }
    }

    /// Body text (`""` when unset)
    pub fn text(&self) -> &str {
        self.node
            .detail(TEXT)
            .and_then(|value| value.as_text())
            .unwrap_or("")
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        let default = AttributeValue::from("");
        self.node
            .set_detail(TEXT, Some(AttributeValue::Text(text.into())), Some(&default));
    }

    pub fn as_node(&self) -> &ContentNode {
        &self.node
    }

    pub fn as_node_mut(&mut self) -> &mut ContentNode {
        &mut self.node
    }

    /// Convert back to the underlying node (consumes wrapper)
    pub fn into_node(self) -> ContentNode {
        self.node
    }
}

/// Builder for new content pages
pub struct ContentPageBuilder {
    name: String,
    title: Option<String>,
    text: Option<String>,
}

impl ContentPageBuilder {
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn build(self) -> ContentPage {
        let title = self.title.unwrap_or_else(|| self.name.clone());
        let node = ContentNode::new(ContentPage::content_type())
            .with_name(self.name)
            .with_title(title);

        let mut page = ContentPage { node };
        if let Some(text) = self.text {
            page.set_text(text);
        }
        page
    }
}
