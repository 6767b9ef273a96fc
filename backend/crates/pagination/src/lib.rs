//! Shared opaque cursor and pagination envelope primitives.
//!
//! Endpoints that return collections page through them with an opaque
//! `cursor` token and a bounded `limit`. This crate owns the token format
//! (base64url-encoded JSON), the limit normalisation rules, and the response
//! envelope with hypermedia links.
//!
//! # Example
//!
//! ```
//! use pagination::{Cursor, PageParams, Paginated, PaginationLinks};
//! use serde::{Deserialize, Serialize};
//! use url::Url;
//!
//! #[derive(Debug, PartialEq, Serialize, Deserialize)]
//! struct Offset {
//!     offset: u64,
//! }
//!
//! let token = Cursor::new(Offset { offset: 40 }).encode().expect("encodes");
//! let decoded = Cursor::<Offset>::decode(&token).expect("decodes");
//! assert_eq!(decoded.into_inner(), Offset { offset: 40 });
//!
//! let params = PageParams::new(None, Some(500));
//! assert_eq!(params.limit(), pagination::MAX_LIMIT);
//!
//! let url = Url::parse("http://localhost/api/v1/nodes?level=1").expect("url");
//! let links = PaginationLinks::for_request(&url, Some(&token), None);
//! let page = Paginated::new(vec![1, 2, 3], params.limit(), links);
//! assert_eq!(page.data.len(), 3);
//! ```

mod cursor;
mod envelope;
mod params;

pub use cursor::{Cursor, CursorError};
pub use envelope::{Paginated, PaginationLinks};
pub use params::{DEFAULT_LIMIT, MAX_LIMIT, PageParams};
