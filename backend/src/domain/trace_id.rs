//! Correlation id for one HTTP request.
//!
//! The [`crate::Trace`] middleware opens a task-local scope per request, so
//! domain errors can stamp the id without it being passed around. Work moved
//! to another task or a blocking thread leaves the scope; wrap it in
//! [`TraceId::scope`] again when the id must follow.

use std::fmt;
use std::future::Future;
use std::str::FromStr;

use tokio::task_local;
use uuid::Uuid;

/// Header echoing the id on every response.
pub const TRACE_ID_HEADER: &str = "trace-id";

task_local! {
    static CURRENT: TraceId;
}

/// Random UUID naming one request.
///
/// # Examples
/// ```
/// use network_backend::domain::TraceId;
///
/// # tokio::runtime::Runtime::new().expect("runtime").block_on(async {
/// let id = TraceId::generate();
/// assert_eq!(TraceId::scope(id, async { TraceId::current() }).await, Some(id));
/// assert_eq!(TraceId::current(), None);
/// # });
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraceId(Uuid);

impl TraceId {
    /// Fresh v4 id.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Id of the request being served, if any.
    #[must_use]
    pub fn current() -> Option<Self> {
        CURRENT.try_with(|id| *id).ok()
    }

    /// Run `fut` with `trace_id` as the current id.
    pub async fn scope<Fut: Future>(trace_id: Self, fut: Fut) -> Fut::Output {
        CURRENT.scope(trace_id, fut).await
    }
}

impl fmt::Display for TraceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for TraceId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[tokio::test]
    async fn scopes_nest_and_unwind() {
        let outer = TraceId::generate();
        let inner = TraceId::generate();
        let seen = TraceId::scope(outer, async move {
            let nested = TraceId::scope(inner, async { TraceId::current() }).await;
            (nested, TraceId::current())
        })
        .await;
        assert_eq!(seen, (Some(inner), Some(outer)));
        assert!(TraceId::current().is_none());
    }

    #[rstest]
    #[tokio::test]
    async fn spawned_tasks_leave_the_scope() {
        let id = TraceId::generate();
        let spawned = TraceId::scope(id, async {
            tokio::spawn(async { TraceId::current() }).await.expect("join")
        })
        .await;
        assert_eq!(spawned, None);
    }

    #[rstest]
    #[case("6f1d4a3e-9b0c-4f5e-8a7d-2c1b0e9f8d7c", true)]
    #[case("not-a-uuid", false)]
    fn parses_hyphenated_uuids(#[case] raw: &str, #[case] ok: bool) {
        let parsed = raw.parse::<TraceId>();
        assert_eq!(parsed.is_ok(), ok);
        if let Ok(id) = parsed {
            assert_eq!(id.to_string(), raw);
        }
    }
}
