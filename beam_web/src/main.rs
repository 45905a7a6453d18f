//! Spanwise HTTP Service
//!
//! Exposes the beam statics engine as a JSON request/response cycle plus a
//! PDF report endpoint. Each request builds its own `Beam`; there is no
//! shared analysis state between requests.

use axum::{
    extract::Json,
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use beam_core::analysis::{analyze_with_stations, DEFAULT_STATION_COUNT};
use beam_core::diagram::{to_series, DiagramChannel};
use beam_core::loads::{infer_span_m, Beam, LoadDescriptor};
use beam_core::report::render_report;
use beam_core::BeamResult;

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

/// Request body for both the analyze and report endpoints.
#[derive(Debug, Deserialize)]
struct AnalysisRequest {
    /// Span in meters; inferred from the load extents when omitted
    span: Option<f64>,
    /// Number of sample stations; the engine default when omitted
    stations: Option<usize>,
    /// Raw load descriptors
    #[serde(default)]
    loads: Vec<LoadDescriptor>,
    /// Report header fields, only used by the report endpoint
    #[serde(default)]
    label: Option<String>,
    #[serde(default)]
    engineer: Option<String>,
    #[serde(default)]
    job_id: Option<String>,
}

#[derive(Debug, Serialize)]
struct AnalysisResponse {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    results: Option<AnalysisPayload>,
}

/// Serializable analysis results: reactions, peaks, and the two diagram
/// projections as `(position, value)` coordinate lists.
#[derive(Debug, Serialize)]
struct AnalysisPayload {
    span: f64,
    stations: usize,
    ra: f64,
    rb: f64,
    max_shear: f64,
    max_shear_position: f64,
    max_moment: f64,
    max_moment_position: f64,
    shear: Vec<(f64, f64)>,
    moment: Vec<(f64, f64)>,
}

fn run_analysis(request: &AnalysisRequest) -> BeamResult<AnalysisPayload> {
    let span_m = request.span.unwrap_or_else(|| infer_span_m(&request.loads));
    let stations = request.stations.unwrap_or(DEFAULT_STATION_COUNT);

    let beam = Beam::new(span_m, &request.loads)?;
    let solution = analyze_with_stations(&beam, stations)?;

    Ok(AnalysisPayload {
        span: span_m,
        stations,
        ra: solution.reactions.ra_kn,
        rb: solution.reactions.rb_kn,
        max_shear: solution.max_shear_kn,
        max_shear_position: solution.max_shear_position_m,
        max_moment: solution.max_moment_knm,
        max_moment_position: solution.max_moment_position_m,
        shear: to_series(&solution.samples, DiagramChannel::Shear),
        moment: to_series(&solution.samples, DiagramChannel::Moment),
    })
}

async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

async fn analyze_handler(Json(request): Json<AnalysisRequest>) -> impl IntoResponse {
    match run_analysis(&request) {
        Ok(results) => (
            StatusCode::OK,
            Json(AnalysisResponse {
                success: true,
                error: None,
                results: Some(results),
            }),
        ),
        Err(e) => {
            tracing::warn!("analysis rejected: {}", e);
            (
                StatusCode::BAD_REQUEST,
                Json(AnalysisResponse {
                    success: false,
                    error: Some(e.to_string()),
                    results: None,
                }),
            )
        }
    }
}

async fn report_handler(Json(request): Json<AnalysisRequest>) -> impl IntoResponse {
    let result = (|| -> BeamResult<Vec<u8>> {
        let span_m = request.span.unwrap_or_else(|| infer_span_m(&request.loads));
        let stations = request.stations.unwrap_or(DEFAULT_STATION_COUNT);

        let beam = Beam::new(span_m, &request.loads)?;
        let solution = analyze_with_stations(&beam, stations)?;

        render_report(
            &beam,
            &solution,
            request.label.as_deref().unwrap_or("Unnamed beam"),
            request.engineer.as_deref().unwrap_or("--"),
            request.job_id.as_deref().unwrap_or("--"),
        )
    })();

    match result {
        Ok(pdf) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "application/pdf")],
            pdf,
        )
            .into_response(),
        Err(e) => {
            tracing::warn!("report rejected: {}", e);
            (
                StatusCode::BAD_REQUEST,
                Json(AnalysisResponse {
                    success: false,
                    error: Some(e.to_string()),
                    results: None,
                }),
            )
                .into_response()
        }
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "beam_web=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/health", get(health))
        .route("/api/v1/analyze", post(analyze_handler))
        .route("/api/v1/report", post(report_handler))
        .layer(cors);

    let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port = std::env::var("PORT").unwrap_or_else(|_| "8087".to_string());
    let addr = format!("{}:{}", host, port);

    tracing::info!("Spanwise service listening on {}", addr);
    tracing::info!("  GET  /health");
    tracing::info!("  POST /api/v1/analyze");
    tracing::info!("  POST /api/v1/report");

    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_analysis_midspan_point_load() {
        let request = AnalysisRequest {
            span: Some(10.0),
            stations: Some(101),
            loads: vec![LoadDescriptor::Point {
                magnitude: 10.0,
                position: 5.0,
            }],
            label: None,
            engineer: None,
            job_id: None,
        };

        let payload = run_analysis(&request).unwrap();
        assert!((payload.ra - 5.0).abs() < 1e-9);
        assert!((payload.rb - 5.0).abs() < 1e-9);
        assert_eq!(payload.shear.len(), 101);
        assert_eq!(payload.moment.len(), 101);
    }

    #[test]
    fn test_run_analysis_infers_span() {
        let request = AnalysisRequest {
            span: None,
            stations: None,
            loads: vec![LoadDescriptor::Udl {
                intensity: 2.0,
                start: 0.0,
                end: 14.0,
            }],
            label: None,
            engineer: None,
            job_id: None,
        };

        let payload = run_analysis(&request).unwrap();
        assert_eq!(payload.span, 14.0);
        assert_eq!(payload.stations, DEFAULT_STATION_COUNT);
    }

    #[test]
    fn test_run_analysis_rejects_bad_loads() {
        let request = AnalysisRequest {
            span: Some(5.0),
            stations: None,
            loads: vec![LoadDescriptor::Point {
                magnitude: 10.0,
                position: 9.0,
            }],
            label: None,
            engineer: None,
            job_id: None,
        };

        assert!(run_analysis(&request).is_err());
    }
}
