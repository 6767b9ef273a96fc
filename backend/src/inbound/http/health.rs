//! Liveness and readiness probes.
//!
//! Both probes are unauthenticated and never cached.

use std::sync::atomic::{AtomicBool, Ordering};

use actix_web::{HttpResponse, get, http::header, web};

use super::cache_control::NO_STORE;

/// Readiness and liveness flags shared with the server lifecycle.
pub struct HealthState {
    ready: AtomicBool,
    live: AtomicBool,
}

impl Default for HealthState {
    fn default() -> Self {
        Self {
            ready: AtomicBool::new(false),
            live: AtomicBool::new(true),
        }
    }
}

impl HealthState {
    /// Not ready, but live.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the service as ready once the store is reachable.
    pub fn mark_ready(&self) {
        self.ready.store(true, Ordering::Release);
    }

    /// Fail liveness so orchestrators stop routing during shutdown.
    pub fn mark_unhealthy(&self) {
        self.live.store(false, Ordering::Release);
    }

    /// Current readiness.
    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }

    /// Current liveness.
    pub fn is_alive(&self) -> bool {
        self.live.load(Ordering::Acquire)
    }

    fn probe_response(probe_ok: bool) -> HttpResponse {
        let mut response = if probe_ok {
            HttpResponse::Ok()
        } else {
            HttpResponse::ServiceUnavailable()
        };
        response
            .insert_header((header::CACHE_CONTROL, NO_STORE))
            .finish()
    }
}

/// Readiness probe: 200 once migrations ran and the server accepts traffic.
#[utoipa::path(
    get,
    path = "/health/ready",
    tags = ["health"],
    security([]),
    responses(
        (status = 200, description = "Server is ready to handle traffic"),
        (status = 503, description = "Server is not ready")
    )
)]
#[get("/health/ready")]
pub async fn ready(state: web::Data<HealthState>) -> HttpResponse {
    HealthState::probe_response(state.is_ready())
}

/// Liveness probe: 200 until the process starts draining.
#[utoipa::path(
    get,
    path = "/health/live",
    tags = ["health"],
    security([]),
    responses(
        (status = 200, description = "Server is alive"),
        (status = 503, description = "Server is shutting down")
    )
)]
#[get("/health/live")]
pub async fn live(state: web::Data<HealthState>) -> HttpResponse {
    HealthState::probe_response(state.is_alive())
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::{App, test};
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(false, true, StatusCode::SERVICE_UNAVAILABLE, StatusCode::OK)]
    #[case(true, true, StatusCode::OK, StatusCode::OK)]
    #[case(true, false, StatusCode::OK, StatusCode::SERVICE_UNAVAILABLE)]
    #[actix_web::test]
    async fn probes_follow_the_flags(
        #[case] ready_flag: bool,
        #[case] live_flag: bool,
        #[case] ready_status: StatusCode,
        #[case] live_status: StatusCode,
    ) {
        let state = web::Data::new(HealthState::new());
        if ready_flag {
            state.mark_ready();
        }
        if !live_flag {
            state.mark_unhealthy();
        }
        let app = test::init_service(App::new().app_data(state).service(ready).service(live)).await;

        let res =
            test::call_service(&app, test::TestRequest::get().uri("/health/ready").to_request())
                .await;
        assert_eq!(res.status(), ready_status);
        assert_eq!(
            res.headers().get(header::CACHE_CONTROL).and_then(|v| v.to_str().ok()),
            Some(NO_STORE)
        );
        let res =
            test::call_service(&app, test::TestRequest::get().uri("/health/live").to_request())
                .await;
        assert_eq!(res.status(), live_status);
    }
}
