//! Request resolution and address building
//!
//! - [`config`] - `HostConfig`: observed extensions, default document, root
//! - [`request`] - `RequestPath`: raw path/query handed over by the transport
//! - [`resolver`] - `UrlResolver`: request → node (parse) and node → address (build)
//! - [`dispatcher`] - `RequestDispatcher`: applies a resolution to a `RequestContext`

pub mod config;
pub mod dispatcher;
pub mod request;
pub mod resolver;

pub use config::{ConfigError, HostConfig};
pub use dispatcher::{RequestContext, RequestDispatcher};
pub use request::{RequestPath, ITEM_QUERY_KEY, PAGE_QUERY_KEY};
pub use resolver::{Resolution, UrlResolver};
