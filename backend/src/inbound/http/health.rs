//! Liveness and readiness probes.
//!
//! ```text
//! GET /health/ready
//! GET /health/live
//! ```

use std::sync::atomic::{AtomicU8, Ordering};

use actix_web::{HttpResponse, get, http::header, web};

const STARTING: u8 = 0;
const SERVING: u8 = 1;
const DRAINING: u8 = 2;

/// Process lifecycle as seen by orchestrator probes.
///
/// The service starts live but not ready, becomes ready once the listener
/// is bound, and reports neither once draining begins.
///
/// # Examples
/// ```
/// use roster::inbound::http::health::HealthState;
///
/// let state = HealthState::new();
/// assert!(!state.is_ready());
/// state.mark_ready();
/// assert!(state.is_ready());
/// state.mark_draining();
/// assert!(!state.is_alive());
/// ```
#[derive(Debug, Default)]
pub struct HealthState {
    phase: AtomicU8,
}

impl HealthState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flag the listener as accepting traffic. Has no effect once draining.
    pub fn mark_ready(&self) {
        if self
            .phase
            .compare_exchange(STARTING, SERVING, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            // Already serving or draining; draining must stick.
        }
    }

    /// Fail both probes so the orchestrator stops routing and restarts.
    pub fn mark_draining(&self) {
        self.phase.store(DRAINING, Ordering::Release);
    }

    pub fn is_ready(&self) -> bool {
        self.phase.load(Ordering::Acquire) == SERVING
    }

    pub fn is_alive(&self) -> bool {
        self.phase.load(Ordering::Acquire) != DRAINING
    }
}

fn probe(ok: bool) -> HttpResponse {
    let mut response = if ok {
        HttpResponse::Ok()
    } else {
        HttpResponse::ServiceUnavailable()
    };
    response
        .insert_header((header::CACHE_CONTROL, "no-store"))
        .finish()
}

/// Readiness probe: 200 once the listener is bound, 503 otherwise.
#[utoipa::path(
    get,
    path = "/health/ready",
    tags = ["health"],
    responses(
        (status = 200, description = "Server is ready to handle traffic"),
        (status = 503, description = "Server is starting or draining")
    )
)]
#[get("/health/ready")]
pub async fn ready(state: web::Data<HealthState>) -> HttpResponse {
    probe(state.is_ready())
}

/// Liveness probe: 200 until draining starts.
#[utoipa::path(
    get,
    path = "/health/live",
    tags = ["health"],
    responses(
        (status = 200, description = "Server is alive"),
        (status = 503, description = "Server is draining")
    )
)]
#[get("/health/live")]
pub async fn live(state: web::Data<HealthState>) -> HttpResponse {
    probe(state.is_alive())
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{App, http::StatusCode, test as actix_test};
    use rstest::rstest;

    #[rstest]
    #[case::starting(false, false, StatusCode::SERVICE_UNAVAILABLE, StatusCode::OK)]
    #[case::serving(true, false, StatusCode::OK, StatusCode::OK)]
    #[case::draining(true, true, StatusCode::SERVICE_UNAVAILABLE, StatusCode::SERVICE_UNAVAILABLE)]
    #[actix_web::test]
    async fn probes_follow_lifecycle(
        #[case] ready_marked: bool,
        #[case] draining: bool,
        #[case] ready_status: StatusCode,
        #[case] live_status: StatusCode,
    ) {
        let state = web::Data::new(HealthState::new());
        if ready_marked {
            state.mark_ready();
        }
        if draining {
            state.mark_draining();
        }
        let app = actix_test::init_service(
            App::new().app_data(state).service(ready).service(live),
        )
        .await;

        let ready_res = actix_test::call_service(
            &app,
            actix_test::TestRequest::get().uri("/health/ready").to_request(),
        )
        .await;
        assert_eq!(ready_res.status(), ready_status);
        assert_eq!(
            ready_res
                .headers()
                .get(header::CACHE_CONTROL)
                .and_then(|value| value.to_str().ok()),
            Some("no-store")
        );

        let live_res = actix_test::call_service(
            &app,
            actix_test::TestRequest::get().uri("/health/live").to_request(),
        )
        .await;
        assert_eq!(live_res.status(), live_status);
    }

    #[test]
    fn ready_cannot_resurrect_a_draining_process() {
        let state = HealthState::new();
        state.mark_draining();
        state.mark_ready();
        assert!(!state.is_ready());
        assert!(!state.is_alive());
    }
}
