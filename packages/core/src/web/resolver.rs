//! Mapping between request addresses and tree nodes
//!
//! `UrlResolver` works in both directions:
//!
//! - **Parse**: an inbound `RequestPath` becomes a `Resolution` naming the
//!   page (and optional item) to render plus the rewritten internal path.
//! - **Build**: a node becomes its public address (`AddressBuilder`), e.g.
//!   `/one/two.aspx` for a page or `/one.aspx?item=4` for a part on it.
//!
//! Query ids take precedence over path segments, so addresses produced by
//! `ContentTree::rewritten_url` keep resolving after renames and moves.

use super::config::{ConfigError, HostConfig};
use super::request::{RequestPath, ITEM_QUERY_KEY, PAGE_QUERY_KEY};
use crate::models::NodeKey;
use crate::tree::{to_absolute, AddressBuilder, ContentTree};
use crate::Result;

/// Outcome of resolving a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// Page to render
    pub page: NodeKey,

    /// Non-page item on that page, when one was addressed
    pub item: Option<NodeKey>,

    /// Internal path the transport should serve, e.g. `/default.aspx?page=3`
    pub rewritten_path: String,
}

impl Resolution {
    /// The node the request was aimed at
    pub fn target(&self) -> NodeKey {
        self.item.unwrap_or(self.page)
    }
}

/// Resolves request addresses against a content tree
#[derive(Debug, Clone)]
pub struct UrlResolver {
    config: HostConfig,
}

impl UrlResolver {
    pub fn new(config: HostConfig) -> std::result::Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &HostConfig {
        &self.config
    }

    /// Node paths are resolved from
    pub fn root(&self, tree: &ContentTree) -> Option<NodeKey> {
        match self.config.root_id {
            Some(id) => tree.find_by_id(id),
            None => tree.roots().next(),
        }
    }

    /// Node served for `/`
    pub fn start_page(&self, tree: &ContentTree) -> Option<NodeKey> {
        match self.config.start_page_id {
            Some(id) => tree.find_by_id(id),
            None => self.root(tree),
        }
    }

    /// Id-based address of a node, see `ContentTree::rewritten_url`
    pub fn build(&self, tree: &ContentTree, key: NodeKey) -> Result<String> {
        tree.rewritten_url(key)
    }

    /// Resolve a request to a page and optional item
    ///
    /// Returns `None` when the extension is not observed or nothing in the
    /// tree matches.
    pub fn parse(&self, tree: &ContentTree, request: &RequestPath) -> Option<Resolution> {
        let extension = request.extension();
        if !self.config.is_observed(extension) {
            tracing::debug!("Ignoring {}: extension '{}' is not observed", request, extension);
            return None;
        }

        let (page, item) = self
            .resolve_ids(tree, request)
            .or_else(|| self.resolve_path(tree, request))?;

        let rewritten_path = self.rewrite(tree, request, page, item)?;
        Some(Resolution {
            page,
            item,
            rewritten_path,
        })
    }

    fn resolve_ids(
        &self,
        tree: &ContentTree,
        request: &RequestPath,
    ) -> Option<(NodeKey, Option<NodeKey>)> {
        let page = request
            .query_int(PAGE_QUERY_KEY)
            .and_then(|id| tree.find_by_id(id));
        let item = request
            .query_int(ITEM_QUERY_KEY)
            .and_then(|id| tree.find_by_id(id));

        match (page, item) {
            (Some(page), item) => {
                let (page, implied) = self.page_and_item(tree, page)?;
                let item = match item {
                    Some(item) if self.is_on_page(tree, page, item) => Some(item),
                    Some(item) => {
                        tracing::debug!("Ignoring item {} which is not below page {}", item, page);
                        implied
                    }
                    None => implied,
                };
                Some((page, item))
            }
            (None, Some(item)) => self.page_and_item(tree, item),
            (None, None) => None,
        }
    }

    /// Whether `item` is a non-page node shown on `page`
    fn is_on_page(&self, tree: &ContentTree, page: NodeKey, item: NodeKey) -> bool {
        tree.get(item).is_some_and(|node| !node.is_page())
            && tree.page_ancestor(item) == Some(page)
    }

    fn resolve_path(
        &self,
        tree: &ContentTree,
        request: &RequestPath,
    ) -> Option<(NodeKey, Option<NodeKey>)> {
        let path = request.path.as_str();
        let default_document = format!("/{}", self.config.default_document);
        if path == "/" || path.eq_ignore_ascii_case(&default_document) {
            return self.start_page(tree).map(|page| (page, None));
        }

        let root = self.root(tree)?;
        let found = tree.get_child(root, request.path_without_extension())?;
        self.page_and_item(tree, found)
    }

    /// A page stands for itself; an item is shown on its nearest page
    fn page_and_item(
        &self,
        tree: &ContentTree,
        key: NodeKey,
    ) -> Option<(NodeKey, Option<NodeKey>)> {
        if tree.get(key)?.is_page() {
            return Some((key, None));
        }
        tree.page_ancestor(key).map(|page| (page, Some(key)))
    }

    fn rewrite(
        &self,
        tree: &ContentTree,
        request: &RequestPath,
        page: NodeKey,
        item: Option<NodeKey>,
    ) -> Option<String> {
        let page_node = tree.get(page)?;
        let mut rewritten = to_absolute(page_node.template_url()).into_owned();

        let query = request.query_without(&[PAGE_QUERY_KEY, ITEM_QUERY_KEY]);
        rewritten.push('?');
        if !query.is_empty() {
            rewritten.push_str(&query);
            rewritten.push('&');
        }
        rewritten.push_str(&format!("{}={}", PAGE_QUERY_KEY, page_node.id()));

        if let Some(item) = item.and_then(|item| tree.get(item)) {
            rewritten.push_str(&format!("&{}={}", ITEM_QUERY_KEY, item.id()));
        }
        Some(rewritten)
    }

    /// Friendly address of a page below the host root
    fn page_url(&self, tree: &ContentTree, page: NodeKey, root: NodeKey) -> Option<String> {
        if Some(page) == self.start_page(tree) {
            return Some("/".to_string());
        }

        let mut names = Vec::new();
        let mut current = page;
        while current != root {
            names.push(tree.get(current)?.name().into_owned());
            current = tree.parent(current)?;
        }
        names.reverse();

        if names.is_empty() {
            return Some("/".to_string());
        }
        Some(format!("/{}{}", names.join("/"), self.config.default_extension))
    }
}

impl AddressBuilder for UrlResolver {
    /// Friendly address, falling back to the rewritten one for nodes outside
    /// the host root
    fn build_url(&self, tree: &ContentTree, key: NodeKey) -> Result<String> {
        let node = tree.node(key)?;
        let friendly = self.root(tree).and_then(|root| {
            if node.is_version() {
                return None;
            }
            if node.is_page() {
                return self.page_url(tree, key, root);
            }
            let page = tree.page_ancestor(key)?;
            let page_url = self.page_url(tree, page, root)?;
            Some(format!("{}?{}={}", page_url, ITEM_QUERY_KEY, node.id()))
        });

        match friendly {
            Some(url) => Ok(url),
            None => tree.rewritten_url(key),
        }
    }
}
