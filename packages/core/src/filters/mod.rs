//! Composable node predicates
//!
//! Filters select which children a listing returns. Each filter looks at one
//! node at a time; several filters are combined into an ordered conjunction
//! that stops at the first rejection.
//!
//! # Examples
//!
//! ```rust
//! use pagetree_core::filters::{wrap, ItemFilter, PageFilter, VisibleFilter};
//! use pagetree_core::models::ContentPage;
//!
//! let filter = wrap(vec![Box::new(VisibleFilter), Box::new(PageFilter)]);
//! let page = ContentPage::builder("home").build();
//! assert!(filter.matches(page.as_node()));
//! ```

mod builtin;

pub use builtin::{
    AccessFilter, CountFilter, PageFilter, PublishedFilter, TypeFilter, VisibleFilter, ZoneFilter,
};

use crate::models::ContentNode;
use std::fmt;

/// A predicate over content nodes
pub trait ItemFilter {
    fn matches(&self, node: &ContentNode) -> bool;
}

impl<F: ItemFilter + ?Sized> ItemFilter for Box<F> {
    fn matches(&self, node: &ContentNode) -> bool {
        (**self).matches(node)
    }
}

impl<F: ItemFilter + ?Sized> ItemFilter for &F {
    fn matches(&self, node: &ContentNode) -> bool {
        (**self).matches(node)
    }
}

/// Matches every node
#[derive(Debug, Clone, Copy, Default)]
pub struct NullFilter;

impl ItemFilter for NullFilter {
    fn matches(&self, _node: &ContentNode) -> bool {
        true
    }
}

/// Ordered conjunction of filters; an empty composite matches everything
#[derive(Default)]
pub struct CompositeFilter<'a> {
    filters: Vec<Box<dyn ItemFilter + 'a>>,
}

impl<'a> CompositeFilter<'a> {
    pub fn new(filters: Vec<Box<dyn ItemFilter + 'a>>) -> Self {
        Self { filters }
    }

    pub fn push(&mut self, filter: impl ItemFilter + 'a) {
        self.filters.push(Box::new(filter));
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }
}

impl ItemFilter for CompositeFilter<'_> {
    fn matches(&self, node: &ContentNode) -> bool {
        self.filters.iter().all(|filter| filter.matches(node))
    }
}

impl fmt::Debug for CompositeFilter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeFilter")
            .field("filters", &self.filters.len())
            .finish()
    }
}

/// Adapts a closure into a filter
pub struct FnFilter<F>(pub F);

impl<F> ItemFilter for FnFilter<F>
where
    F: Fn(&ContentNode) -> bool,
{
    fn matches(&self, node: &ContentNode) -> bool {
        (self.0)(node)
    }
}

/// Collapse a list of filters into one
///
/// No filters gives a `NullFilter`, a single filter is returned as is, and
/// anything longer becomes a `CompositeFilter` in the same order.
pub fn wrap<'a>(mut filters: Vec<Box<dyn ItemFilter + 'a>>) -> Box<dyn ItemFilter + 'a> {
    match filters.len() {
        0 => Box::new(NullFilter),
        1 => filters.remove(0),
        _ => Box::new(CompositeFilter::new(filters)),
    }
}
