//! HTTP server exposing the student directory.
//!
//! Handlers live next to the router. Lookup misses by id are errors (404);
//! lookup misses by name are soft outcomes reported as 200 payloads unless
//! strict lookups are enabled.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::config::Config;
use crate::directory::{IdNameLookup, NameLookup, StudentDirectory};
use crate::error::{DirectoryError, Result};
use crate::student::{Student, StudentId, StudentPatch};

const WELCOME: &str = "Welcome to the student API!";
const NAME_NOT_FOUND: &str = "Student not found";
const NAME_MISMATCH: &str = "Student name does not match";

/// Shared application state.
pub struct AppState {
    pub directory: StudentDirectory,
    pub config: Config,
}

impl AppState {
    /// Build state from config, seeding the directory unless disabled.
    pub fn new(config: Config) -> Self {
        let directory = if config.no_seed {
            StudentDirectory::new()
        } else {
            StudentDirectory::seeded()
        };
        Self { directory, config }
    }

    pub fn with_directory(config: Config, directory: StudentDirectory) -> Self {
        Self { directory, config }
    }
}

/// Build the router over `state`.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = state.config.cors();

    let mut router = Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/get-student/:student_id", get(get_student))
        .route("/get-student-by-name", get(get_student_by_name))
        .route("/get-student-by-name/", get(get_student_by_name))
        .route("/get-student-by-name/:student_id", get(get_student_by_id_and_name))
        .route("/add-student/:student_id", post(add_student))
        .route("/update-student/:student_id", put(update_student))
        .route("/delete-student/:student_id", delete(delete_student))
        .with_state(state);

    router = router.layer(TraceLayer::new_for_http());

    if cors {
        router = router.layer(CorsLayer::permissive());
    }

    router
}

/// Serve until Ctrl+C or SIGTERM.
pub async fn run(config: Config) -> anyhow::Result<()> {
    let addr = config.addr;
    let state = Arc::new(AppState::new(config));
    info!(
        students = state.directory.stats().num_students,
        strict_lookups = state.config.strict_lookups,
        "Student directory ready"
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(addr = %addr, "Listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Received Ctrl+C, shutting down"),
        () = terminate => info!("Received SIGTERM, shutting down"),
    }
}

// === Error Response ===

#[derive(Debug, Serialize)]
struct ErrorResponse {
    detail: String,
}

impl IntoResponse for DirectoryError {
    fn into_response(self) -> Response {
        let status = match self {
            DirectoryError::NotFound { .. } => StatusCode::NOT_FOUND,
            DirectoryError::Conflict { .. } => StatusCode::BAD_REQUEST,
            DirectoryError::InvalidId { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        };
        let body = Json(ErrorResponse {
            detail: self.to_string(),
        });
        (status, body).into_response()
    }
}

fn parse_id(raw: i64) -> Result<StudentId> {
    StudentId::try_from(raw).inspect_err(|e| warn!(id = e.id(), "Rejected student id"))
}

/// Report a name-lookup miss or mismatch.
fn soft_miss(state: &AppState, message: &str) -> Response {
    if state.config.strict_lookups {
        (StatusCode::NOT_FOUND, Json(ErrorResponse { detail: message.to_string() })).into_response()
    } else {
        Json(json!({ "data": message })).into_response()
    }
}

// === Endpoints ===

async fn index() -> Json<serde_json::Value> {
    Json(json!({ "message": WELCOME }))
}

async fn health() -> &'static str {
    "OK"
}

async fn get_student(
    State(state): State<Arc<AppState>>,
    Path(student_id): Path<i64>,
) -> Result<Json<Student>> {
    let id = parse_id(student_id)?;
    state.directory.get_by_id(id).map(Json)
}

#[derive(Debug, Deserialize)]
struct NameQuery {
    name: String,
}

async fn get_student_by_name(
    State(state): State<Arc<AppState>>,
    Query(query): Query<NameQuery>,
) -> Response {
    match state.directory.get_by_name(&query.name) {
        NameLookup::Found(student) => Json(student).into_response(),
        NameLookup::NotFound => soft_miss(&state, NAME_NOT_FOUND),
    }
}

#[derive(Debug, Deserialize)]
struct OptionalNameQuery {
    name: Option<String>,
}

async fn get_student_by_id_and_name(
    State(state): State<Arc<AppState>>,
    Path(student_id): Path<i64>,
    Query(query): Query<OptionalNameQuery>,
) -> Result<Response> {
    let id = parse_id(student_id)?;
    let response = match state.directory.get_by_id_and_name(id, query.name.as_deref())? {
        IdNameLookup::Found(student) => Json(student).into_response(),
        IdNameLookup::NameMismatch => soft_miss(&state, NAME_MISMATCH),
    };
    Ok(response)
}

#[derive(Debug, Deserialize)]
struct AddStudentQuery {
    name: String,
    age: i64,
    class_name: String,
}

#[derive(Debug, Serialize)]
struct StudentResponse {
    message: String,
    student: Student,
}

async fn add_student(
    State(state): State<Arc<AppState>>,
    Path(student_id): Path<i64>,
    Query(query): Query<AddStudentQuery>,
) -> Result<Json<StudentResponse>> {
    let id = parse_id(student_id)?;
    let student = state
        .directory
        .insert(id, query.name, query.age, query.class_name)?;

    Ok(Json(StudentResponse {
        message: format!("Student {} added successfully", student.name),
        student,
    }))
}

async fn update_student(
    State(state): State<Arc<AppState>>,
    Path(student_id): Path<i64>,
    Query(patch): Query<StudentPatch>,
) -> Result<Json<StudentResponse>> {
    let id = parse_id(student_id)?;
    let student = state.directory.update(id, &patch)?;

    Ok(Json(StudentResponse {
        message: format!("Student {} updated successfully", id),
        student,
    }))
}

async fn delete_student(
    State(state): State<Arc<AppState>>,
    Path(student_id): Path<i64>,
) -> Result<Json<serde_json::Value>> {
    let id = parse_id(student_id)?;
    state.directory.delete(id)?;
    Ok(Json(json!({ "message": format!("Student {} deleted successfully", id) })))
}
