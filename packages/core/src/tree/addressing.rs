//! Address strings for nodes
//!
//! Every node has a canonical, id-based address (the *rewritten* url) that
//! does not change when the node is renamed or moved:
//!
//! - page: `{template}?page={id}`
//! - non-page item: `{page template}?page={page id}&item={id}`
//! - detached version: the live node's template
//!
//! The public (friendly) address is produced by an `AddressBuilder` supplied
//! by the web layer and cached on the node until it is renamed or moved. A
//! tree has one cache slot per node, so it assumes a single friendly builder;
//! builders that opt out of caching (like `RewrittenAddress`) neither fill
//! nor read it.

use super::ContentTree;
use crate::models::NodeKey;
use crate::{ContentError, Result};
use std::borrow::Cow;

/// Query parameter carrying the id of the requested page
pub const PAGE_QUERY_KEY: &str = "page";

/// Query parameter carrying the id of a non-page item on that page
pub const ITEM_QUERY_KEY: &str = "item";

/// Builds the public address of a node
pub trait AddressBuilder {
    fn build_url(&self, tree: &ContentTree, key: NodeKey) -> Result<String>;

    /// Whether `ContentTree::url` may memoize this builder's output
    fn cacheable(&self) -> bool {
        true
    }
}

/// Address builder that always emits the rewritten address
#[derive(Debug, Clone, Copy, Default)]
pub struct RewrittenAddress;

impl AddressBuilder for RewrittenAddress {
    fn build_url(&self, tree: &ContentTree, key: NodeKey) -> Result<String> {
        tree.rewritten_url(key)
    }

    fn cacheable(&self) -> bool {
        false
    }
}

/// Resolve an application-relative path (`~/x`) against the site root
///
/// # Examples
/// ```
/// use pagetree_core::tree::to_absolute;
///
/// assert_eq!(to_absolute("~/default.aspx"), "/default.aspx");
/// assert_eq!(to_absolute("/other.aspx"), "/other.aspx");
/// ```
pub fn to_absolute(path: &str) -> Cow<'_, str> {
    match path.strip_prefix('~') {
        Some("") => Cow::Borrowed("/"),
        Some(rest) if rest.starts_with('/') => Cow::Borrowed(rest),
        Some(rest) => Cow::Owned(format!("/{}", rest)),
        None => Cow::Borrowed(path),
    }
}

impl ContentTree {
    /// Id-based address of a node
    ///
    /// # Errors
    ///
    /// `TemplateNotFound` for a non-page node with no page ancestor that is
    /// not a version either.
    pub fn rewritten_url(&self, key: NodeKey) -> Result<String> {
        let node = self.node(key)?;

        if node.is_page() {
            return Ok(format!(
                "{}?{}={}",
                to_absolute(node.template_url()),
                PAGE_QUERY_KEY,
                node.id()
            ));
        }

        if let Some(page) = self.page_ancestor(key).and_then(|page| self.get(page)) {
            return Ok(format!(
                "{}?{}={}&{}={}",
                to_absolute(page.template_url()),
                PAGE_QUERY_KEY,
                page.id(),
                ITEM_QUERY_KEY,
                node.id()
            ));
        }

        if let Some(live) = node.version_of.and_then(|live| self.get(live)) {
            return Ok(to_absolute(live.template_url()).into_owned());
        }

        Err(ContentError::template_not_found(node.id(), node.name()))
    }

    /// Public address of a node, cached until the node is renamed or moved
    ///
    /// Versions are always addressed by their rewritten url.
    pub fn url(&self, key: NodeKey, builder: &dyn AddressBuilder) -> Result<String> {
        let node = self.node(key)?;
        if !builder.cacheable() {
            if node.is_version() {
                return self.rewritten_url(key);
            }
            return builder.build_url(self, key);
        }
        if let Some(url) = node.cached_url() {
            return Ok(url.to_string());
        }

        let url = if node.is_version() {
            self.rewritten_url(key)?
        } else {
            builder.build_url(self, key)?
        };
        Ok(node.cache_url(url).to_string())
    }

    /// Drop the cached public address of a node and its descendants
    pub fn invalidate_urls(&mut self, key: NodeKey) -> Result<()> {
        let mut pending = vec![key];
        while let Some(current) = pending.pop() {
            let node = self.node_mut(current)?;
            node.invalidate_url();
            pending.extend(node.children.iter().copied());
        }
        Ok(())
    }

    /// Logical path from the root, e.g. `/one/two/`
    pub fn path(&self, key: NodeKey) -> Result<String> {
        self.node(key)?;
        let mut names: Vec<String> = std::iter::once(key)
            .chain(self.ancestors(key))
            .filter(|current| self.parent(*current).is_some())
            .filter_map(|current| self.get(current).map(|node| node.name().into_owned()))
            .collect();
        names.reverse();

        let mut path = String::from("/");
        for name in names {
            path.push_str(&name);
            path.push('/');
        }
        Ok(path)
    }
}
