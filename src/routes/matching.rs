use actix_web::{web, HttpResponse, Responder};
use validator::Validate;
use crate::core::{Matcher, MatchingError, SimulationConfig, Simulator};
use crate::models::{
    ErrorResponse, HealthResponse, MatchingRequest, SimulateRequest, VerifyMatchingRequest,
};

/// Application state shared across all handlers
#[derive(Debug, Clone)]
pub struct AppState {
    pub matcher: Matcher,
    pub max_simulations: usize,
}

/// Configure all matching-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/matching", web::post().to(run_matching))
        .route("/matching/steps", web::post().to(run_matching_steps))
        .route("/matching/verify", web::post().to(verify_matching))
        .route("/simulate", web::post().to(simulate));
}

/// Health check endpoint
async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Compute the proposer-optimal stable matching
///
/// POST /api/v1/matching
///
/// Request body:
/// ```json
/// {
///   "proposer_preferences": {"A": ["X", "Y"], "B": ["X", "Y"]},
///   "responder_preferences": {"X": ["B", "A"], "Y": ["A", "B"]},
///   "swap_sides": false
/// }
/// ```
async fn run_matching(
    state: web::Data<AppState>,
    req: web::Json<MatchingRequest>,
) -> Result<HttpResponse, MatchingError> {
    let profile = state
        .matcher
        .build_profile(&req.proposer_preferences, &req.responder_preferences, req.swap_sides)
        .map_err(|e| {
            tracing::info!("Rejected matching request: {}", e);
            e
        })?;

    let result = state.matcher.match_profile(&profile)?;

    tracing::info!(
        "Matching finished: {} proposers, {} responders, {} rounds, {} pairs",
        profile.proposer_count(),
        profile.responder_count(),
        result.rounds,
        result.matches.len()
    );

    Ok(HttpResponse::Ok().json(result))
}

/// Same input as `/matching`, returning every round as well
///
/// POST /api/v1/matching/steps
async fn run_matching_steps(
    state: web::Data<AppState>,
    req: web::Json<MatchingRequest>,
) -> Result<HttpResponse, MatchingError> {
    let profile = state
        .matcher
        .build_profile(&req.proposer_preferences, &req.responder_preferences, req.swap_sides)
        .map_err(|e| {
            tracing::info!("Rejected steps request: {}", e);
            e
        })?;

    let result = state.matcher.trace_profile(&profile)?;

    tracing::info!(
        "Traced matching: {} rounds recorded for {} proposers",
        result.steps.len(),
        profile.proposer_count()
    );

    Ok(HttpResponse::Ok().json(result))
}

/// Check a caller-supplied matching for stability
///
/// POST /api/v1/matching/verify
///
/// Request body adds `"matches": {"A": "Y", "B": "X"}` to the two rosters.
async fn verify_matching(
    state: web::Data<AppState>,
    req: web::Json<VerifyMatchingRequest>,
) -> Result<HttpResponse, MatchingError> {
    let req = req.into_inner();
    let profile = state
        .matcher
        .build_profile(&req.proposer_preferences, &req.responder_preferences, false)
        .map_err(|e| {
            tracing::info!("Rejected verify request: {}", e);
            e
        })?;

    let pairs = req.matches.iter().map(|(p, r)| (p.as_str(), r.as_str()));
    let report = state.matcher.verify_matching(&profile, pairs).map_err(|e| {
        tracing::info!("Rejected matching submitted for verification: {}", e);
        e
    })?;

    tracing::info!(
        "Verified matching of {} pairs: stable={}, blocking pairs={}",
        req.matches.len(),
        report.is_stable,
        report.blocking_pairs.len()
    );

    Ok(HttpResponse::Ok().json(report))
}

/// Run a batch of random profiles through the matcher
///
/// POST /api/v1/simulate
///
/// Request body:
/// ```json
/// {
///   "proposers": 10,
///   "responders": 10,
///   "simulations": 100,
///   "acceptance": 1.0,
///   "seed": 42
/// }
/// ```
async fn simulate(
    state: web::Data<AppState>,
    req: web::Json<SimulateRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for simulate request: field_errors={:?}", errors);
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    if req.simulations > state.max_simulations {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: format!(
                "simulations must be at most {}, got {}",
                state.max_simulations, req.simulations
            ),
            status_code: 400,
        });
    }

    if let Err(e) = state.matcher.limits().check_sizes(req.proposers, req.responders) {
        tracing::info!("Rejected simulate request: {}", e);
        return actix_web::ResponseError::error_response(&MatchingError::from(e));
    }

    let config = SimulationConfig {
        proposers: req.proposers,
        responders: req.responders,
        acceptance: req.acceptance,
        seed: req.seed,
    };
    let simulations = req.simulations;
    let matcher = state.matcher.clone();

    tracing::info!(
        "Running {} simulations ({}x{}, acceptance {}, seed {})",
        simulations,
        config.proposers,
        config.responders,
        config.acceptance,
        config.seed
    );

    let outcome = web::block(move || Simulator::new(config).run(&matcher, simulations)).await;

    match outcome {
        Ok(Ok(summary)) => HttpResponse::Ok().json(summary),
        Ok(Err(e)) => actix_web::ResponseError::error_response(&e),
        Err(e) => {
            tracing::error!("Simulation task failed: {}", e);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Computation failed".to_string(),
                message: "The simulation could not be completed".to_string(),
                status_code: 500,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::MatcherLimits;
    use actix_web::{http::StatusCode, test, App};

    fn state(max_simulations: usize) -> AppState {
        AppState {
            matcher: Matcher::new(MatcherLimits { max_participants: 10 }),
            max_simulations,
        }
    }

    #[actix_web::test]
    async fn test_health_check() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state(10)))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::get().uri("/health").to_request();
        let body: HealthResponse = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body.status, "healthy");
    }

    #[actix_web::test]
    async fn test_simulate_over_batch_limit() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state(5)))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/simulate")
            .set_json(serde_json::json!({"proposers": 3, "responders": 3, "simulations": 6}))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_simulate_huge_sizes_rejected_up_front() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state(5)))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/simulate")
            .set_json(serde_json::json!({
                "proposers": 1_000_000,
                "responders": 1_000_000,
                "simulations": 1
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: ErrorResponse = test::read_body_json(resp).await;
        assert!(body.message.contains("too many proposers: 1000000 exceeds the limit of 10"));
    }

    #[actix_web::test]
    async fn test_verify_unknown_name() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state(5)))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/matching/verify")
            .set_json(serde_json::json!({
                "proposer_preferences": {"A": ["Q"]},
                "responder_preferences": {"X": ["A"]},
                "matches": {}
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_simulate_over_participant_limit() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state(5)))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/simulate")
            .set_json(serde_json::json!({"proposers": 11, "responders": 3, "simulations": 1}))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
