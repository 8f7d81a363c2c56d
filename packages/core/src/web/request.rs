//! Inbound request addresses
//!
//! The transport layer hands over the raw path and query of a request; this
//! module splits and inspects them without any knowledge of the tree.

use std::fmt;

pub use crate::tree::{ITEM_QUERY_KEY, PAGE_QUERY_KEY};

/// Path and query string of a request, without scheme or host
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RequestPath {
    pub path: String,
    pub query: String,
}

impl RequestPath {
    pub fn new(path: impl Into<String>, query: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            query: query.into(),
        }
    }

    /// Split a relative url such as `/one/two.aspx?happy=true#top`
    ///
    /// The fragment is dropped and a missing path becomes `/`.
    pub fn parse(url: &str) -> Self {
        let url = url.split('#').next().unwrap_or_default();
        let (path, query) = url.split_once('?').unwrap_or((url, ""));
        let path = if path.is_empty() { "/" } else { path };
        Self::new(path, query)
    }

    /// Last path segment
    pub fn last_segment(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or_default()
    }

    /// Extension of the last segment including the dot, or `""`
    ///
    /// # Examples
    /// ```
    /// use pagetree_core::web::RequestPath;
    ///
    /// assert_eq!(RequestPath::parse("/one/two.aspx").extension(), ".aspx");
    /// assert_eq!(RequestPath::parse("/v1.2/one").extension(), "");
    /// ```
    pub fn extension(&self) -> &str {
        let segment = self.last_segment();
        match segment.rfind('.') {
            Some(dot) => &segment[dot..],
            None => "",
        }
    }

    /// Path with the extension of the last segment removed
    pub fn path_without_extension(&self) -> &str {
        &self.path[..self.path.len() - self.extension().len()]
    }

    /// Decoded query parameters in order
    pub fn query_pairs(&self) -> impl Iterator<Item = (String, String)> + '_ {
        url::form_urlencoded::parse(self.query.as_bytes())
            .map(|(key, value)| (key.into_owned(), value.into_owned()))
    }

    /// First value of a query parameter
    pub fn query_value(&self, key: &str) -> Option<String> {
        self.query_pairs()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value)
    }

    /// First value of a query parameter parsed as an id
    pub fn query_int(&self, key: &str) -> Option<i64> {
        self.query_value(key)
            .and_then(|value| value.trim().parse().ok())
    }

    /// Query string without the given parameters, other pairs kept verbatim
    pub fn query_without(&self, keys: &[&str]) -> String {
        self.query
            .split('&')
            .filter(|pair| !pair.is_empty())
            .filter(|pair| {
                let name = pair.split('=').next().unwrap_or_default();
                !keys.contains(&name)
            })
            .collect::<Vec<_>>()
            .join("&")
    }
}

impl fmt::Display for RequestPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.query.is_empty() {
            write!(f, "{}", self.path)
        } else {
            write!(f, "{}?{}", self.path, self.query)
        }
    }
}

impl From<&str> for RequestPath {
    fn from(url: &str) -> Self {
        Self::parse(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_splits_query_and_fragment() {
        let request = RequestPath::parse("/one/two.aspx?happy=true&flip=feet#top");
        assert_eq!(request.path, "/one/two.aspx");
        assert_eq!(request.query, "happy=true&flip=feet");
        assert_eq!(request.to_string(), "/one/two.aspx?happy=true&flip=feet");
    }

    #[test]
    fn test_parse_empty_query() {
        let request = RequestPath::parse("/default.aspx?");
        assert_eq!(request.path, "/default.aspx");
        assert_eq!(request.query, "");

        assert_eq!(RequestPath::parse("").path, "/");
        assert_eq!(RequestPath::parse("?page=1").path, "/");
    }

    #[test]
    fn test_extension() {
        assert_eq!(RequestPath::parse("/one.HTM").extension(), ".HTM");
        assert_eq!(RequestPath::parse("/one").extension(), "");
        assert_eq!(RequestPath::parse("/").extension(), "");
        assert_eq!(RequestPath::parse("/one/").extension(), "");
        assert_eq!(
            RequestPath::parse("/one/two.aspx").path_without_extension(),
            "/one/two"
        );
    }

    #[test]
    fn test_query_values() {
        let request = RequestPath::parse("/default.aspx?item=4&page=3&name=a%20b");
        assert_eq!(request.query_int(PAGE_QUERY_KEY), Some(3));
        assert_eq!(request.query_int(ITEM_QUERY_KEY), Some(4));
        assert_eq!(request.query_value("name").as_deref(), Some("a b"));
        assert_eq!(request.query_int("missing"), None);

        let request = RequestPath::parse("/default.aspx?page=abc");
        assert_eq!(request.query_int(PAGE_QUERY_KEY), None);
    }

    #[test]
    fn test_query_without() {
        let request = RequestPath::parse("/x.aspx?happy=true&page=2&flip=feet&item=5");
        assert_eq!(
            request.query_without(&[PAGE_QUERY_KEY, ITEM_QUERY_KEY]),
            "happy=true&flip=feet"
        );
    }
}
