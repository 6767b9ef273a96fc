//! Cursor paging shared by the collection endpoints.
//!
//! Cursors carry the offset of the first row of the page they point at. The
//! token is opaque to clients; filters and the limit travel as ordinary query
//! parameters and are preserved in the envelope links.

use actix_web::HttpRequest;
use pagination::{Cursor, PageParams, Paginated, PaginationLinks};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::{Error, FieldViolation, ListWindow, ViolationKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
struct OffsetKey {
    offset: usize,
}

/// Resolve `cursor` and `limit` into a window.
///
/// # Errors
/// Returns an `invalid_cursor` violation for tokens this service did not
/// issue.
pub(crate) fn window(params: &PageParams) -> Result<ListWindow, Error> {
    let offset = match params.cursor() {
        Some(token) => {
            Cursor::<OffsetKey>::decode(token)
                .map_err(|err| {
                    debug!(error = %err, "rejecting pagination cursor");
                    FieldViolation::new("cursor", ViolationKind::InvalidCursor).with_value(token)
                })?
                .into_inner()
                .offset
        }
        None => 0,
    };
    Ok(ListWindow {
        offset,
        limit: params.limit(),
    })
}

fn token(offset: usize) -> Result<String, Error> {
    Cursor::new(OffsetKey { offset })
        .encode()
        .map_err(|err| Error::internal(format!("failed to encode cursor: {err}")))
}

/// Wrap a page of items in the envelope with `self`, `next`, and `prev`.
///
/// # Errors
/// Fails only when the request URL or a cursor cannot be rendered.
pub(crate) fn envelope<T>(
    req: &HttpRequest,
    items: Vec<T>,
    window: ListWindow,
    has_more: bool,
) -> Result<Paginated<T>, Error> {
    let url = req.full_url();
    let next = if has_more {
        Some(token(window.offset.saturating_add(window.limit))?)
    } else {
        None
    };
    let prev = match window.offset {
        0 => None,
        offset => Some(token(offset.saturating_sub(window.limit))?),
    };
    let links = PaginationLinks::for_request(&url, next.as_deref(), prev.as_deref());
    Ok(Paginated::new(items, window.limit, links))
}
