//! PageTree Core Content Tree
//!
//! This crate provides the in-memory content tree of a page-based content
//! management system: typed nodes with schema-less attributes, ordered
//! children, filtered listings, subtree cloning, and the two-way mapping
//! between nodes and request addresses.
//!
//! # Architecture
//!
//! - **Arena tree**: `ContentTree` owns all nodes; nodes refer to each other by `NodeKey`
//! - **Schema-less data**: each node carries an `AttributeBag` of typed values
//! - **Capability types**: page-ness, template and declared properties come from `ContentType`
//! - **One-way dependency**: `web` depends on `tree`; the tree only sees the `AddressBuilder` trait
//!
//! # Modules
//!
//! - [`models`] - Data structures (ContentNode, AttributeBag, ContentPage, UserItem, etc.)
//! - [`tree`] - Tree mutation, ordering, property access, cloning and addressing
//! - [`filters`] - Composable child filters
//! - [`web`] - Request parsing, friendly addresses and dispatch
//!
//! # Examples
//!
//! ```rust
//! use pagetree_core::models::ContentPage;
//! use pagetree_core::tree::ContentTree;
//! use pagetree_core::web::{HostConfig, RequestPath, UrlResolver};
//!
//! let mut tree = ContentTree::new();
//! let root = tree.insert(ContentPage::builder("root").build().into_node());
//! let one = tree.insert(ContentPage::builder("one").build().into_node());
//! tree.add_to(one, Some(root))?;
//! tree.assign_id(root, 1)?;
//! tree.assign_id(one, 2)?;
//!
//! let resolver = UrlResolver::new(HostConfig::default()).expect("valid config");
//! let resolution = resolver.parse(&tree, &RequestPath::parse("/one.aspx")).unwrap();
//! assert_eq!(resolution.page, one);
//! assert_eq!(resolution.rewritten_path, "/default.aspx?page=2");
//! # Ok::<(), pagetree_core::ContentError>(())
//! ```

pub mod error;
pub mod filters;
pub mod models;
pub mod tree;
pub mod web;

// Re-export commonly used types
pub use error::{ContentError, Result};
pub use models::{ContentNode, NodeKey};
pub use tree::ContentTree;
