//! Content Node Data Structure
//!
//! This module contains the `ContentNode` struct, the single storage shape for
//! every kind of content in the tree. Type-specific behaviour comes from the
//! node's `ContentType`; type-specific data lives in its `AttributeBag`.
//!
//! # Architecture
//!
//! - **Arena-owned**: nodes live in a `ContentTree` and refer to each other by
//!   `NodeKey`. The parent link is a non-owning back reference; the parent's
//!   `children` sequence is authoritative.
//! - **Stable identity**: `id` is `0` while transient and immutable once the
//!   persistence layer has assigned it.
//! - **Cached address**: the friendly URL is memoized per node and reset when
//!   the node is renamed or moved.
//!
//! # Examples
//!
//! ```rust
//! use pagetree_core::models::{ContentNode, TypeDefinition};
//! use std::sync::Arc;
//!
//! let node = ContentNode::new(Arc::new(TypeDefinition::page("Page")))
//!     .with_name("about")
//!     .with_title("About us");
//!
//! assert_eq!(node.id(), 0);
//! assert_eq!(node.name(), "about");
//! assert!(node.is_page());
//! ```

use crate::models::{AttributeBag, AttributeValue, AuthorizedRole, ContentType, Principal};
use chrono::{DateTime, Duration, Months, Utc};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use std::sync::{Arc, OnceLock};

/// Handle to a node slot in a `ContentTree`
///
/// Keys are never reused within a tree, so a stale key fails lookups instead
/// of silently addressing another node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeKey(usize);

impl NodeKey {
    pub(crate) fn new(index: usize) -> Self {
        Self(index)
    }

    /// Arena slot index
    pub fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Where to place a node relative to a target node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CreationPosition {
    /// Sibling placed directly before the target
    Before,
    /// Sibling placed directly after the target
    After,
    /// Child of the target
    Below,
}

/// How recently a node was published
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Publication {
    /// Not published, or published in the future
    Unpublished,
    /// Within the last day
    Day,
    /// Within the last week
    Week,
    /// Within the last month
    Month,
    Older,
}

/// Editorial state flags of a node at a point in time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeState {
    pub publication: Publication,
    pub expired: bool,
    pub invisible: bool,
    /// Access is restricted by authorized roles
    pub locked: bool,
}

/// A typed content node
///
/// Structural fields (`parent`, `children`, `version_of`, `key`) are
/// maintained by `ContentTree` and are read-only here.
#[derive(Debug, Clone)]
pub struct ContentNode {
    id: i64,
    name: Option<String>,

    /// Human readable title
    pub title: String,

    /// Placement slot on the parent page, for non-page parts
    pub zone_name: Option<String>,

    /// Identity name of the last editor
    pub saved_by: String,

    /// Position among siblings; sequences are kept non-decreasing
    pub sort_order: i32,

    created: DateTime<Utc>,
    pub updated: DateTime<Utc>,

    /// Start of the publication window (`None` = unpublished)
    pub published: Option<DateTime<Utc>>,

    /// End of the publication window
    pub expires: Option<DateTime<Utc>>,

    pub visible: bool,

    key: Option<NodeKey>,
    pub(crate) parent: Option<NodeKey>,
    pub(crate) children: Vec<NodeKey>,
    pub(crate) version_of: Option<NodeKey>,

    pub(crate) attributes: AttributeBag,
    pub(crate) roles: Vec<AuthorizedRole>,
    content_type: Arc<dyn ContentType>,

    url: OnceLock<String>,
}

impl ContentNode {
    /// Create a transient node of the given content type
    ///
    /// `created`, `updated` and `published` are all set to now; visibility
    /// comes from the content type.
    pub fn new(content_type: Arc<dyn ContentType>) -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            name: None,
            title: String::new(),
            zone_name: None,
            saved_by: String::new(),
            sort_order: 0,
            created: now,
            updated: now,
            published: Some(now),
            expires: None,
            visible: content_type.visible_by_default(),
            key: None,
            parent: None,
            children: Vec::new(),
            version_of: None,
            attributes: AttributeBag::new(),
            roles: Vec::new(),
            content_type,
            url: OnceLock::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_zone(mut self, zone_name: impl Into<String>) -> Self {
        self.zone_name = Some(zone_name.into());
        self
    }

    pub fn with_sort_order(mut self, sort_order: i32) -> Self {
        self.sort_order = sort_order;
        self
    }

    pub fn with_role(mut self, role: AuthorizedRole) -> Self {
        self.roles.push(role);
        self
    }

    /// Persistence id (`0` while transient)
    pub fn id(&self) -> i64 {
        self.id
    }

    pub(crate) fn set_id(&mut self, id: i64) {
        self.id = id;
    }

    /// Arena key, once the node has been inserted into a tree
    pub fn key(&self) -> Option<NodeKey> {
        self.key
    }

    pub(crate) fn bind(&mut self, key: NodeKey) {
        self.key = Some(key);
        self.attributes.rebind_collections(Some(key));
        for role in &mut self.roles {
            role.rebind(Some(key));
        }
    }

    /// Name used in paths; falls back to the id (or `""` while transient)
    pub fn name(&self) -> Cow<'_, str> {
        match &self.name {
            Some(name) => Cow::Borrowed(name.as_str()),
            None if self.id != 0 => Cow::Owned(self.id.to_string()),
            None => Cow::Borrowed(""),
        }
    }

    /// Explicitly assigned name, if any
    pub fn raw_name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub(crate) fn set_name(&mut self, name: Option<String>) {
        self.name = name;
        self.invalidate_url();
    }

    pub fn created(&self) -> DateTime<Utc> {
        self.created
    }

    pub fn parent(&self) -> Option<NodeKey> {
        self.parent
    }

    /// Direct children in sibling order (a version has none of its own)
    pub fn children(&self) -> &[NodeKey] {
        &self.children
    }

    /// Live node this node is a version of
    pub fn version_of(&self) -> Option<NodeKey> {
        self.version_of
    }

    pub fn is_version(&self) -> bool {
        self.version_of.is_some()
    }

    pub fn content_type(&self) -> &Arc<dyn ContentType> {
        &self.content_type
    }

    pub fn discriminator(&self) -> &str {
        self.content_type.discriminator()
    }

    pub fn is_page(&self) -> bool {
        self.content_type.is_page()
    }

    pub fn template_url(&self) -> &str {
        self.content_type.template_url()
    }

    pub fn attributes(&self) -> &AttributeBag {
        &self.attributes
    }

    pub fn attributes_mut(&mut self) -> &mut AttributeBag {
        &mut self.attributes
    }

    /// Read a detail from the attribute bag
    pub fn detail(&self, name: &str) -> Option<&AttributeValue> {
        self.attributes.get(name)
    }

    /// Store a detail, eliding it when it equals `default`
    pub fn set_detail(
        &mut self,
        name: &str,
        value: Option<AttributeValue>,
        default: Option<&AttributeValue>,
    ) {
        match default {
            Some(default) => self.attributes.set_with_default(name, value, default),
            None => self.attributes.set(name, value),
        }
    }

    pub fn authorized_roles(&self) -> &[AuthorizedRole] {
        &self.roles
    }

    pub fn authorized_roles_mut(&mut self) -> &mut Vec<AuthorizedRole> {
        &mut self.roles
    }

    /// Whether the principal may read this node
    ///
    /// A node without authorized roles is open to everyone.
    pub fn is_authorized(&self, principal: &dyn Principal) -> bool {
        self.roles.is_empty() || self.roles.iter().any(|role| role.is_authorized(principal))
    }

    /// Published and not yet expired at `now`
    pub fn is_published(&self, now: DateTime<Utc>) -> bool {
        let started = matches!(self.published, Some(published) if published <= now);
        let expired = matches!(self.expires, Some(expires) if expires <= now);
        started && !expired
    }

    /// Editorial state flags at `now`
    pub fn publication_state(&self, now: DateTime<Utc>) -> NodeState {
        let publication = match self.published {
            None => Publication::Unpublished,
            Some(published) if published > now => Publication::Unpublished,
            Some(published) if published > now - Duration::days(1) => Publication::Day,
            Some(published) if published > now - Duration::days(7) => Publication::Week,
            Some(published)
                if now
                    .checked_sub_months(Months::new(1))
                    .is_some_and(|month_ago| published > month_ago) =>
            {
                Publication::Month
            }
            Some(_) => Publication::Older,
        };

        NodeState {
            publication,
            expired: matches!(self.expires, Some(expires) if expires <= now),
            invisible: !self.visible,
            locked: !self.roles.is_empty(),
        }
    }

    /// Record an edit
    pub fn touch(&mut self, saved_by: impl Into<String>) {
        self.updated = Utc::now();
        self.saved_by = saved_by.into();
    }

    pub(crate) fn cached_url(&self) -> Option<&str> {
        self.url.get().map(String::as_str)
    }

    pub(crate) fn cache_url(&self, url: String) -> &str {
        self.url.get_or_init(|| url)
    }

    pub(crate) fn invalidate_url(&mut self) {
        self.url = OnceLock::new();
    }

    /// Reset identity and structure, leaving a detached shallow copy
    pub(crate) fn detached_copy(&self) -> Self {
        let mut copy = self.clone();
        copy.id = 0;
        copy.key = None;
        copy.parent = None;
        copy.children.clear();
        copy.version_of = None;
        copy.attributes.clear();
        copy.roles.clear();
        copy.url = OnceLock::new();
        copy
    }
}

impl PartialEq for ContentNode {
    /// Persisted nodes compare by id; transient nodes only equal themselves
    fn eq(&self, other: &Self) -> bool {
        if self.id != 0 && other.id != 0 {
            return self.id == other.id;
        }
        std::ptr::eq(self, other)
    }
}

impl fmt::Display for ContentNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.name(), self.id)
    }
}
