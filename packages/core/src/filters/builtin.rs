use super::ItemFilter;
use crate::models::{ContentNode, Principal};
use chrono::{DateTime, Utc};
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Nodes placed in a named zone
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoneFilter {
    zone: String,
}

impl ZoneFilter {
    pub fn new(zone: impl Into<String>) -> Self {
        Self { zone: zone.into() }
    }
}

impl ItemFilter for ZoneFilter {
    fn matches(&self, node: &ContentNode) -> bool {
        node.zone_name.as_deref() == Some(self.zone.as_str())
    }
}

/// Nodes the principal may read
pub struct AccessFilter<'a> {
    principal: &'a dyn Principal,
}

impl<'a> AccessFilter<'a> {
    pub fn new(principal: &'a dyn Principal) -> Self {
        Self { principal }
    }
}

impl ItemFilter for AccessFilter<'_> {
    fn matches(&self, node: &ContentNode) -> bool {
        node.is_authorized(self.principal)
    }
}

impl fmt::Debug for AccessFilter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessFilter")
            .field("principal", &self.principal.name())
            .finish()
    }
}

/// Nodes with the visible flag set
#[derive(Debug, Clone, Copy, Default)]
pub struct VisibleFilter;

impl ItemFilter for VisibleFilter {
    fn matches(&self, node: &ContentNode) -> bool {
        node.visible
    }
}

/// Nodes inside their publication window
#[derive(Debug, Clone, Copy)]
pub struct PublishedFilter {
    now: DateTime<Utc>,
}

impl PublishedFilter {
    pub fn new() -> Self {
        Self::at(Utc::now())
    }

    /// Evaluate the window at a fixed instant
    pub fn at(now: DateTime<Utc>) -> Self {
        Self { now }
    }
}

impl Default for PublishedFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl ItemFilter for PublishedFilter {
    fn matches(&self, node: &ContentNode) -> bool {
        node.is_published(self.now)
    }
}

/// Directly addressable nodes
#[derive(Debug, Clone, Copy, Default)]
pub struct PageFilter;

impl ItemFilter for PageFilter {
    fn matches(&self, node: &ContentNode) -> bool {
        node.is_page()
    }
}

/// Nodes of (or, inverted, not of) the given content types
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeFilter {
    discriminators: Vec<String>,
    inverse: bool,
}

impl TypeFilter {
    pub fn new<I, S>(discriminators: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            discriminators: discriminators.into_iter().map(Into::into).collect(),
            inverse: false,
        }
    }

    /// Match every type except the given ones
    pub fn excluding<I, S>(discriminators: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            inverse: true,
            ..Self::new(discriminators)
        }
    }
}

impl ItemFilter for TypeFilter {
    fn matches(&self, node: &ContentNode) -> bool {
        let listed = self
            .discriminators
            .iter()
            .any(|d| d == node.discriminator());
        listed != self.inverse
    }
}

/// Skips the first `skip` nodes it sees, then passes at most `take`
///
/// The filter counts every node it is asked about, so place it last in a
/// composite to page over the nodes the other filters accept.
#[derive(Debug)]
pub struct CountFilter {
    skip: usize,
    take: usize,
    seen: AtomicUsize,
}

impl CountFilter {
    pub fn new(skip: usize, take: usize) -> Self {
        Self {
            skip,
            take,
            seen: AtomicUsize::new(0),
        }
    }

    /// Start counting from zero again
    pub fn reset(&self) {
        self.seen.store(0, Ordering::Relaxed);
    }
}

impl ItemFilter for CountFilter {
    fn matches(&self, _node: &ContentNode) -> bool {
        let position = self.seen.fetch_add(1, Ordering::Relaxed);
        position >= self.skip && position - self.skip < self.take
    }
}
