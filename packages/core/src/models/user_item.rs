//! Type-Safe UserItem Wrapper
//!
//! A membership record stored in the content tree. Users are non-page items:
//! they are addressed through the page they live under.
//!
//! All scalar properties are default-elided details, so a freshly built user
//! has an empty attribute bag. Role membership is kept in the `Roles`
//! sub-collection.
//!
//! # Examples
//!
//! ```rust
//! use pagetree_core::models::UserItem;
//!
//! let mut user = UserItem::builder("joe")
//!     .with_email("joe@example.com")
//!     .approved(true)
//!     .build();
//!
//! user.add_role("Editors");
//! assert!(user.is_in_role("Editors"));
//! assert!(!user.is_locked_out());
//! ```

use crate::models::{
    AttributeValue, ContentNode, ContentType, PropertyDecl, TypeDefinition, ValueKind,
};
use crate::{ContentError, Result};
use chrono::{DateTime, Utc};
use std::sync::{Arc, OnceLock};

/// Discriminator of the built-in user type
pub const USER_ITEM_TYPE: &str = "User";

/// Name of the sub-collection holding role names
pub const ROLES_COLLECTION: &str = "Roles";

const EMAIL: &str = "Email";
const COMMENT: &str = "Comment";
const IS_ONLINE: &str = "IsOnline";
const IS_APPROVED: &str = "IsApproved";
const IS_LOCKED_OUT: &str = "IsLockedOut";
const LAST_LOGIN_DATE: &str = "LastLoginDate";

/// Type-safe wrapper for user records
#[derive(Debug, Clone)]
pub struct UserItem {
    node: ContentNode,
}

impl UserItem {
    /// Shared content type of every user record
    pub fn content_type() -> Arc<dyn ContentType> {
        static DEFINITION: OnceLock<Arc<TypeDefinition>> = OnceLock::new();
        DEFINITION
            .get_or_init(|| {
                Arc::new(
                    TypeDefinition::part(USER_ITEM_TYPE)
                        .with_property(PropertyDecl::new(EMAIL, ValueKind::Text).with_default(""))
                        .with_property(
                            PropertyDecl::new(COMMENT, ValueKind::Text).with_default(""),
                        )
                        .with_property(
                            PropertyDecl::new(IS_ONLINE, ValueKind::Bool).with_default(false),
                        )
                        .with_property(
                            PropertyDecl::new(IS_APPROVED, ValueKind::Bool).with_default(false),
                        )
                        .with_property(
                            PropertyDecl::new(IS_LOCKED_OUT, ValueKind::Bool).with_default(false),
                        )
                        .with_property(
                            PropertyDecl::new(LAST_LOGIN_DATE, ValueKind::DateTime)
                                .defaulting_to_published(),
                        ),
                )
            })
            .clone()
    }

    /// Wrap an existing node
    ///
    /// # Errors
    ///
    /// Returns `ContentError::InvalidArgument` if the node is not a user record.
    pub fn from_node(node: ContentNode) -> Result<Self> {
        if node.discriminator() != USER_ITEM_TYPE {
            return Err(ContentError::invalid_argument(
                "content_type",
                format!("Expected '{}', got '{}'", USER_ITEM_TYPE, node.discriminator()),
            ));
        }
        Ok(Self { node })
    }

    pub fn builder(name: impl Into<String>) -> UserItemBuilder {
        UserItemBuilder {
            name: name.into(),
            email: None,
            comment: None,
            approved: false,
        }
    }

    pub fn email(&self) -> &str {
        self.text(EMAIL)
    }

    pub fn set_email(&mut self, email: impl Into<String>) {
        self.set_text(EMAIL, email.into());
    }

    pub fn comment(&self) -> &str {
        self.text(COMMENT)
    }

    pub fn set_comment(&mut self, comment: impl Into<String>) {
        self.set_text(COMMENT, comment.into());
    }

    pub fn is_online(&self) -> bool {
        self.flag(IS_ONLINE)
    }

    pub fn set_online(&mut self, online: bool) {
        self.set_flag(IS_ONLINE, online);
    }

    pub fn is_approved(&self) -> bool {
        self.flag(IS_APPROVED)
    }

    pub fn set_approved(&mut self, approved: bool) {
        self.set_flag(IS_APPROVED, approved);
    }

    pub fn is_locked_out(&self) -> bool {
        self.flag(IS_LOCKED_OUT)
    }

    pub fn set_locked_out(&mut self, locked_out: bool) {
        self.set_flag(IS_LOCKED_OUT, locked_out);
    }

    /// Last successful login, falling back to the publication date
    pub fn last_login_date(&self) -> Option<DateTime<Utc>> {
        self.node
            .detail(LAST_LOGIN_DATE)
            .and_then(|value| value.as_datetime())
            .or(self.node.published)
    }

    pub fn set_last_login_date(&mut self, date: DateTime<Utc>) {
        let default = self.node.published.map(AttributeValue::from);
        self.node
            .set_detail(LAST_LOGIN_DATE, Some(date.into()), default.as_ref());
    }

    /// Role names in insertion order
    pub fn roles(&self) -> Vec<&str> {
        self.node
            .attributes()
            .collection(ROLES_COLLECTION)
            .map(|roles| roles.iter().filter_map(|value| value.as_text()).collect())
            .unwrap_or_default()
    }

    pub fn is_in_role(&self, role: &str) -> bool {
        self.roles().iter().any(|r| *r == role)
    }

    /// Add a role unless already present
    pub fn add_role(&mut self, role: impl Into<String>) {
        let role = AttributeValue::from(role.into());
        let owner = self.node.key();
        let roles = self
            .node
            .attributes_mut()
            .collection_mut(ROLES_COLLECTION, owner);
        if !roles.contains(&role) {
            roles.push(role);
        }
    }

    pub fn remove_role(&mut self, role: &str) -> bool {
        self.node
            .attributes_mut()
            .existing_collection_mut(ROLES_COLLECTION)
            .is_some_and(|roles| roles.remove_value(&AttributeValue::from(role)))
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

    fn text(&self, name: &str) -> &str {
        self.node
            .detail(name)
            .and_then(|value| value.as_text())
            .unwrap_or("")
    }

    fn set_text(&mut self, name: &str, value: String) {
        let default = AttributeValue::from("");
        self.node.set_detail(name, Some(value.into()), Some(&default));
    }

    fn flag(&self, name: &str) -> bool {
        self.node
            .detail(name)
            .and_then(|value| value.as_bool())
            .unwrap_or(false)
    }

    fn set_flag(&mut self, name: &str, value: bool) {
        let default = AttributeValue::Bool(false);
        self.node.set_detail(name, Some(value.into()), Some(&default));
    }
}

/// Builder for new user records
pub struct UserItemBuilder {
    name: String,
    email: Option<String>,
    comment: Option<String>,
    approved: bool,
}

impl UserItemBuilder {
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    pub fn approved(mut self, approved: bool) -> Self {
        self.approved = approved;
        self
    }

    pub fn build(self) -> UserItem {
        let node = ContentNode::new(UserItem::content_type())
            .with_title(self.name.clone())
            .with_name(self.name);

        let mut user = UserItem { node };
        if let Some(email) = self.email {
            user.set_email(email);
        }
        if let Some(comment) = self.comment {
            user.set_comment(comment);
        }
        user.set_approved(self.approved);
        user
    }
}
