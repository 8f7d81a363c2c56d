use super::request::RequestPath;
use super::resolver::{Resolution, UrlResolver};
use crate::models::NodeKey;
use crate::tree::ContentTree;
use std::sync::Arc;

/// The transport's view of one request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestContext {
    pub request: RequestPath,
    pub current_page: Option<NodeKey>,
    pub current_item: Option<NodeKey>,

    /// Internal path to serve instead of the requested one
    pub rewritten_path: Option<String>,
}

impl RequestContext {
    pub fn new(url: &str) -> Self {
        Self {
            request: RequestPath::parse(url),
            ..Self::default()
        }
    }

    /// Item when one was addressed, otherwise the page
    pub fn current_target(&self) -> Option<NodeKey> {
        self.current_item.or(self.current_page)
    }

    fn apply(&mut self, resolution: Resolution) {
        self.current_page = Some(resolution.page);
        self.current_item = resolution.item;
        self.rewritten_path = Some(resolution.rewritten_path);
    }
}

/// Resolves each incoming request and records the result on its context
#[derive(Debug, Clone)]
pub struct RequestDispatcher {
    resolver: Arc<UrlResolver>,
}

impl RequestDispatcher {
    pub fn new(resolver: Arc<UrlResolver>) -> Self {
        Self { resolver }
    }

    pub fn resolver(&self) -> &Arc<UrlResolver> {
        &self.resolver
    }

    /// Resolve the request in `context`, returning whether it was handled
    ///
    /// An unhandled request leaves the context untouched.
    pub fn dispatch(&self, tree: &ContentTree, context: &mut RequestContext) -> bool {
        match self.resolver.parse(tree, &context.request) {
            Some(resolution) => {
                tracing::debug!(
                    "Rewriting {} to {}",
                    context.request,
                    resolution.rewritten_path
                );
                context.apply(resolution);
                true
            }
            None => {
                tracing::debug!("No content found for {}", context.request);
                false
            }
        }
    }
}
