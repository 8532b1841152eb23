//! HTTP adapter exposing configure/hunt over JSON

use crate::config::{AppConfig, SubjectSpec};
use crate::hunter::{Hunter, Pursuer};
use crate::prey::{Prey, Quarry};
use crate::simulator::DefaultCatchSimulator;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

/// The hunter and prey a service instance works on
pub struct Scene {
    pub hunter: Box<dyn Hunter>,
    pub prey: Box<dyn Prey>,
}

impl Scene {
    pub fn new(hunter: Box<dyn Hunter>, prey: Box<dyn Prey>) -> Self {
        Self { hunter, prey }
    }

    /// Production wiring: euclidean simulator, initial state from config
    pub fn from_config(config: &AppConfig) -> Self {
        let simulator = Arc::new(DefaultCatchSimulator::euclidean(config.simulator()));
        let hunter = config.hunter.unwrap_or_default();
        let prey = config.prey.unwrap_or_default();

        Self::new(
            Box::new(Pursuer::new(hunter.speed, hunter.position, simulator)),
            Box::new(Quarry::new(prey.speed, prey.position)),
        )
    }
}

/// Hunter and prey are not synchronised, so every request takes this lock
pub type SharedScene = Arc<Mutex<Scene>>;

#[derive(Debug, Serialize)]
struct MessageBody<T: Serialize> {
    message: &'static str,
    data: T,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    status: String,
    message: String,
}

#[derive(Debug, Serialize)]
struct HuntData {
    success: bool,
    duration: f64,
}

fn message<T: Serialize>(message: &'static str, data: T) -> Response {
    (StatusCode::OK, Json(MessageBody { message, data })).into_response()
}

fn error_response(code: StatusCode, message: impl Into<String>) -> Response {
    let body = ErrorBody {
        status: code.canonical_reason().unwrap_or_default().to_string(),
        message: message.into(),
    };
    (code, Json(body)).into_response()
}

fn decode_subject(body: &[u8]) -> Result<SubjectSpec, Response> {
    let spec: SubjectSpec = serde_json::from_slice(body).map_err(|e| {
        warn!(error = %e, "rejected request body");
        error_response(StatusCode::BAD_REQUEST, "invalid request body")
    })?;
    spec.validate().map_err(|e| {
        warn!(error = %e, "rejected subject");
        error_response(StatusCode::BAD_REQUEST, "invalid request body")
    })?;
    Ok(spec)
}

pub fn create_router(scene: SharedScene) -> Router {
    Router::new()
        .route("/hunter/configure-prey", post(configure_prey))
        .route("/hunter/configure-hunter", post(configure_hunter))
        .route("/hunter/hunt", post(hunt))
        .route("/health", get(health))
        .with_state(scene)
}

async fn configure_prey(State(scene): State<SharedScene>, body: Bytes) -> Response {
    let spec = match decode_subject(&body) {
        Ok(spec) => spec,
        Err(resp) => return resp,
    };

    scene.lock().await.prey.configure(spec.speed, spec.position);
    info!(speed = spec.speed, position = ?spec.position, "prey configured");

    message("prey configured", ())
}

async fn configure_hunter(State(scene): State<SharedScene>, body: Bytes) -> Response {
    let spec = match decode_subject(&body) {
        Ok(spec) => spec,
        Err(resp) => return resp,
    };

    scene.lock().await.hunter.configure(spec.speed, spec.position);
    info!(speed = spec.speed, position = ?spec.position, "hunter configured");

    message("hunter configured", ())
}

async fn hunt(State(scene): State<SharedScene>) -> Response {
    let result = {
        let scene = scene.lock().await;
        scene.hunter.hunt(&*scene.prey)
    };

    match result {
        Ok(report) => {
            info!(duration = report.duration, "hunt succeeded");
            message("hunt done", HuntData { success: true, duration: report.duration })
        }
        Err(e) if e.is_business_failure() => {
            info!("hunt failed, prey escaped");
            message("hunt done", HuntData { success: false, duration: 0.0 })
        }
        Err(e) => {
            error!(error = %e, "hunt could not be simulated");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}

async fn health() -> &'static str {
    "OK"
}

/// Bind `config.bind` and serve until ctrl-c
pub async fn serve(config: &AppConfig) -> std::io::Result<()> {
    let scene: SharedScene = Arc::new(Mutex::new(Scene::from_config(config)));
    let app = create_router(scene);

    let listener = TcpListener::bind(&config.bind).await?;
    info!(addr = %listener.local_addr()?, max_time_to_catch = config.max_time_to_catch, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("shutting down");
        })
        .await
}
