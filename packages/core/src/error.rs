//! Error types for content tree operations
//!
//! This module defines the errors that can occur while mutating or querying
//! the content tree. All of them are reported synchronously to the caller and
//! none are retried internally.
//!
//! A request that does not map to a node is not an error; request resolution
//! reports it as `Option::None`.

use crate::models::NodeKey;
use thiserror::Error;

/// Result alias used throughout the content tree API
pub type Result<T> = std::result::Result<T, ContentError>;

/// Errors that can occur during content tree operations
///
/// # Examples
///
/// ```rust
/// use pagetree_core::ContentError;
///
/// let err = ContentError::invalid_argument("name", "cannot be empty");
/// assert_eq!(format!("{}", err), "Invalid argument 'name': cannot be empty");
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ContentError {
    /// A required key was missing or empty, or an argument violates a tree rule
    #[error("Invalid argument '{name}': {reason}")]
    InvalidArgument { name: String, reason: String },

    /// No page ancestor, and no live node, to build an address from
    #[error("No template found for node '{name}' [{node_id}]")]
    TemplateNotFound { node_id: i64, name: String },

    /// The API was used in a way it does not support
    #[error("Usage error: {0}")]
    Usage(String),

    /// The key does not refer to a node in this tree
    #[error("Node {key} does not exist in this tree")]
    NodeNotFound { key: NodeKey },

    /// Ids are immutable once assigned
    #[error("Node already has id {current}, cannot assign {requested}")]
    IdAlreadyAssigned { current: i64, requested: i64 },

    /// Another node in the tree already carries this id
    #[error("Id {id} is already used by another node")]
    DuplicateId { id: i64 },

    /// A value could not be converted to a declared property's kind
    #[error("Cannot convert value for '{name}': {reason}")]
    Conversion { name: String, reason: String },
}

impl ContentError {
    /// Create an InvalidArgument error
    pub fn invalid_argument(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Create a TemplateNotFound error
    pub fn template_not_found(node_id: i64, name: impl Into<String>) -> Self {
        Self::TemplateNotFound {
            node_id,
            name: name.into(),
        }
    }

    /// Create a Usage error
    pub fn usage(message: impl Into<String>) -> Self {
        Self::Usage(message.into())
    }

    /// Create a NodeNotFound error
    pub fn node_not_found(key: NodeKey) -> Self {
        Self::NodeNotFound { key }
    }

    /// Create a Conversion error
    pub fn conversion(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Conversion {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Check if this error is caused by a bad argument rather than tree state
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument { .. })
    }
}
