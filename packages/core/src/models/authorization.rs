//! Read Authorization
//!
//! A node carries an ordered list of `AuthorizedRole` entries. An empty list
//! means the node is open to everyone; otherwise a caller must match at least
//! one entry, either by role membership or by identity name.
//!
//! The caller itself is supplied by the identity subsystem through the
//! `Principal` trait and is consumed opaquely.

use crate::models::NodeKey;
use serde::{Deserialize, Serialize};

/// Role name that authorizes every caller, authenticated or not
pub const EVERYONE_ROLE: &str = "Everyone";

/// The caller on whose behalf a read is performed
pub trait Principal {
    /// Identity name (empty for anonymous callers)
    fn name(&self) -> &str;

    /// Whether the caller belongs to `role`
    fn is_in_role(&self, role: &str) -> bool;

    fn is_authenticated(&self) -> bool {
        !self.name().is_empty()
    }
}

/// Minimal in-memory principal
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SimplePrincipal {
    name: String,
    roles: Vec<String>,
}

impl SimplePrincipal {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            roles: Vec::new(),
        }
    }

    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.roles.push(role.into());
        self
    }
}

impl Principal for SimplePrincipal {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_in_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }
}

/// Permission levels, ordered from least to most privileged
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Permission {
    Read,
    Write,
    Publish,
    Administer,
}

/// A role (or identity) allowed to access the enclosing node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorizedRole {
    id: i64,
    role: String,
    permission: Permission,
    enclosing: Option<NodeKey>,
}

impl AuthorizedRole {
    /// Create a read entry for a role or identity name
    pub fn new(role: impl Into<String>) -> Self {
        Self {
            id: 0,
            role: role.into(),
            permission: Permission::Read,
            enclosing: None,
        }
    }

    pub fn with_permission(mut self, permission: Permission) -> Self {
        self.permission = permission;
        self
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn assign_id(&mut self, id: i64) {
        self.id = id;
    }

    pub fn role(&self) -> &str {
        &self.role
    }

    pub fn permission(&self) -> Permission {
        self.permission
    }

    /// Node owning this entry
    pub fn enclosing(&self) -> Option<NodeKey> {
        self.enclosing
    }

    pub(crate) fn rebind(&mut self, owner: Option<NodeKey>) {
        self.enclosing = owner;
    }

    /// Whether this entry matches the caller
    pub fn is_authorized(&self, principal: &dyn Principal) -> bool {
        if self.role == EVERYONE_ROLE {
            return true;
        }
        principal.is_in_role(&self.role)
            || (principal.is_authenticated() && principal.name().eq_ignore_ascii_case(&self.role))
    }

    /// Whether this entry matches the caller and grants at least `required`
    pub fn allows(&self, principal: &dyn Principal, required: Permission) -> bool {
        self.permission >= required && self.is_authorized(principal)
    }

    /// Deep copy bound to a new owner, with the persistence id reset
    pub fn clone_for(&self, owner: Option<NodeKey>) -> Self {
        Self {
            id: 0,
            role: self.role.clone(),
            permission: self.permission,
            enclosing: owner,
        }
    }
}
