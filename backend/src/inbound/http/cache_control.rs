//! Shared cache-control policies for HTTP responses.

/// Staff-only network data must be revalidated before reuse.
pub const PRIVATE_NO_CACHE_MUST_REVALIDATE: &str = "private, no-cache, must-revalidate";

/// Probe answers describe the instant they were produced.
pub const NO_STORE: &str = "no-store";

/// Header tuple applied to every guarded API scope.
pub const fn private_no_cache_header() -> (&'static str, &'static str) {
    ("Cache-Control", PRIVATE_NO_CACHE_MUST_REVALIDATE)
}
