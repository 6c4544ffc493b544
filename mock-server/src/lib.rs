//! In-memory stand-in for the recruitment and company services.
//!
//! # Overview
//! Serves the routes the careers client calls, backed by a seeded [`Store`].
//! Successful responses are wrapped in the `{ data, statusCode, timestamp,
//! path }` envelope unless the router is built with [`ResponseStyle::Bare`].
//! Failures are always `{ statusCode, message, error }`.

pub mod models;
pub mod store;

use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        DefaultBodyLimit, Multipart, Path, Query, State,
    },
    http::{header, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use serde::Serialize;
use serde_json::json;
use tokio::{net::TcpListener, sync::RwLock};
use tracing::debug;
use uuid::Uuid;

pub use models::{
    Application, ApplicationQuery, Candidate, CreateApplication, CreateCandidate, Department,
    Headquarter, JobPosting, JobPostingQuery, Position, StoredFile, UpdateCandidate, UploadedFile,
};
pub use store::{Store, StoreError};

pub const RECRUITMENT_SERVICE: &str = "/api/v1/recruitment-service";
pub const COMPANY_SERVICE: &str = "/api/v1/company-service";

/// Largest résumé the upload route accepts.
pub const MAX_RESUME_BYTES: usize = 5 * 1024 * 1024;

pub type Db = Arc<RwLock<Store>>;

/// How successful payloads are framed on the wire.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ResponseStyle {
    #[default]
    Envelope,
    Bare,
}

#[derive(Clone)]
pub struct AppState {
    pub db: Db,
    pub style: ResponseStyle,
}

/// Seeded router with enveloped responses.
pub fn app() -> Router {
    app_with(Store::seeded(), ResponseStyle::Envelope)
}

pub fn app_with(store: Store, style: ResponseStyle) -> Router {
    let state = AppState {
        db: Arc::new(RwLock::new(store)),
        style,
    };
    Router::new()
        .route(&format!("{RECRUITMENT_SERVICE}/job-postings"), get(list_job_postings))
        .route(&format!("{RECRUITMENT_SERVICE}/job-postings/{{id}}"), get(get_job_posting))
        .route(&format!("{RECRUITMENT_SERVICE}/candidates"), post(create_candidate))
        .route(
            &format!("{RECRUITMENT_SERVICE}/candidates/{{id}}"),
            get(get_candidate).patch(update_candidate),
        )
        .route(
            &format!("{RECRUITMENT_SERVICE}/applications"),
            get(list_applications).post(create_application),
        )
        .route(&format!("{RECRUITMENT_SERVICE}/applications/{{id}}"), get(get_application))
        .route(
            &format!("{RECRUITMENT_SERVICE}/files/resume"),
            post(upload_resume).layer(DefaultBodyLimit::max(MAX_RESUME_BYTES)),
        )
        .route(&format!("{RECRUITMENT_SERVICE}/files/resume/{{key}}"), get(download_resume))
        .route(&format!("{COMPANY_SERVICE}/departments"), get(list_departments))
        .route(&format!("{COMPANY_SERVICE}/positions"), get(list_positions))
        .route(&format!("{COMPANY_SERVICE}/headquarters"), get(list_headquarters))
        .with_state(state)
}

pub async fn run(listener: TcpListener, style: ResponseStyle) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with(Store::seeded(), style)).await
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Envelope<'a, T> {
    data: &'a T,
    status_code: u16,
    timestamp: String,
    path: &'a str,
}

fn reply<T: Serialize>(style: ResponseStyle, status: StatusCode, uri: &Uri, data: &T) -> Response {
    match style {
        ResponseStyle::Envelope => {
            let envelope = Envelope {
                data,
                status_code: status.as_u16(),
                timestamp: Utc::now().to_rfc3339(),
                path: uri.path(),
            };
            (status, Json(envelope)).into_response()
        }
        ResponseStyle::Bare => (status, Json(data)).into_response(),
    }
}

/// Error response in the services' `{ statusCode, message, error }` shape.
#[derive(Debug)]
pub struct ApiFailure {
    pub status: StatusCode,
    pub message: String,
}

impl ApiFailure {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiFailure {
    fn into_response(self) -> Response {
        let body = json!({
            "statusCode": self.status.as_u16(),
            "message": self.message,
            "error": self.status.canonical_reason().unwrap_or("Error"),
        });
        (self.status, Json(body)).into_response()
    }
}

impl From<StoreError> for ApiFailure {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(message) => Self::not_found(message),
            StoreError::Invalid(message) => Self::bad_request(message),
        }
    }
}

impl From<JsonRejection> for ApiFailure {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiFailure {
    fn from(rejection: QueryRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

// --- job postings ---

async fn list_job_postings(
    State(state): State<AppState>,
    uri: Uri,
    query: Result<Query<JobPostingQuery>, QueryRejection>,
) -> Result<Response, ApiFailure> {
    let Query(query) = query?;
    let postings = state.db.read().await.list_job_postings(&query);
    debug!(count = postings.len(), "listed job postings");
    Ok(reply(state.style, StatusCode::OK, &uri, &postings))
}

async fn get_job_posting(
    State(state): State<AppState>,
    uri: Uri,
    Path(id): Path<i64>,
) -> Result<Response, ApiFailure> {
    let db = state.db.read().await;
    let posting = db
        .job_posting(id)
        .ok_or_else(|| ApiFailure::not_found("Job posting not found"))?;
    Ok(reply(state.style, StatusCode::OK, &uri, posting))
}

// --- candidates ---

async fn create_candidate(
    State(state): State<AppState>,
    uri: Uri,
    input: Result<Json<CreateCandidate>, JsonRejection>,
) -> Result<Response, ApiFailure> {
    let Json(input) = input?;
    let candidate = state.db.write().await.create_candidate(input)?;
    debug!(candidate_id = candidate.candidate_id, "created candidate");
    Ok(reply(state.style, StatusCode::CREATED, &uri, &candidate))
}

async fn get_candidate(
    State(state): State<AppState>,
    uri: Uri,
    Path(id): Path<i64>,
) -> Result<Response, ApiFailure> {
    let db = state.db.read().await;
    let candidate = db
        .candidate(id)
        .ok_or_else(|| ApiFailure::not_found("Candidate not found"))?;
    Ok(reply(state.style, StatusCode::OK, &uri, candidate))
}

async fn update_candidate(
    State(state): State<AppState>,
    uri: Uri,
    Path(id): Path<i64>,
    input: Result<Json<UpdateCandidate>, JsonRejection>,
) -> Result<Response, ApiFailure> {
    let Json(input) = input?;
    let candidate = state.db.write().await.update_candidate(id, input)?;
    debug!(candidate_id = id, "updated candidate");
    Ok(reply(state.style, StatusCode::OK, &uri, &candidate))
}

// --- applications ---

async fn list_applications(
    State(state): State<AppState>,
    uri: Uri,
    query: Result<Query<ApplicationQuery>, QueryRejection>,
) -> Result<Response, ApiFailure> {
    let Query(query) = query?;
    let applications = state.db.read().await.list_applications(&query);
    debug!(count = applications.len(), "listed applications");
    Ok(reply(state.style, StatusCode::OK, &uri, &applications))
}

async fn create_application(
    State(state): State<AppState>,
    uri: Uri,
    input: Result<Json<CreateApplication>, JsonRejection>,
) -> Result<Response, ApiFailure> {
    let Json(input) = input?;
    let application = state.db.write().await.create_application(input)?;
    debug!(
        application_id = application.application_id,
        job_posting_id = application.job_posting_id,
        "created application"
    );
    Ok(reply(state.style, StatusCode::CREATED, &uri, &application))
}

async fn get_application(
    State(state): State<AppState>,
    uri: Uri,
    Path(id): Path<i64>,
) -> Result<Response, ApiFailure> {
    let db = state.db.read().await;
    let application = db
        .application(id)
        .ok_or_else(|| ApiFailure::not_found("Application not found"))?;
    Ok(reply(state.style, StatusCode::OK, &uri, application))
}

// --- files ---

async fn upload_resume(
    State(state): State<AppState>,
    uri: Uri,
    mut multipart: Multipart,
) -> Result<Response, ApiFailure> {
    let mut upload = None;
    let mut job_id = None;
    let mut candidate_id = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_failure)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                let file_name = field.file_name().unwrap_or("resume").to_string();
                let mime_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let bytes = field.bytes().await.map_err(multipart_failure)?;
                upload = Some((file_name, mime_type, bytes.to_vec()));
            }
            "jobId" => job_id = parse_id(&field.text().await.map_err(multipart_failure)?),
            "candidateId" => candidate_id = parse_id(&field.text().await.map_err(multipart_failure)?),
            _ => {}
        }
    }

    let (file_name, mime_type, bytes) =
        upload.ok_or_else(|| ApiFailure::bad_request("No file uploaded"))?;
    if bytes.is_empty() {
        return Err(ApiFailure::bad_request("Uploaded file is empty"));
    }

    let key = format!("{}-{}", Uuid::new_v4(), safe_file_name(&file_name));
    let uploaded = UploadedFile {
        file_url: format!("{RECRUITMENT_SERVICE}/files/resume/{key}"),
        file_name: file_name.clone(),
        size: bytes.len() as u64,
        mime_type: mime_type.clone(),
    };
    state.db.write().await.files.insert(
        key,
        StoredFile {
            file_name,
            mime_type,
            bytes,
            job_id,
            candidate_id,
        },
    );
    debug!(file_url = %uploaded.file_url, size = uploaded.size, ?job_id, ?candidate_id, "stored résumé");
    Ok(reply(state.style, StatusCode::CREATED, &uri, &uploaded))
}

async fn download_resume(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Response, ApiFailure> {
    let db = state.db.read().await;
    let file = db
        .files
        .get(&key)
        .ok_or_else(|| ApiFailure::not_found("File not found"))?;
    Ok(([(header::CONTENT_TYPE, file.mime_type.clone())], file.bytes.clone()).into_response())
}

fn multipart_failure(err: axum::extract::multipart::MultipartError) -> ApiFailure {
    ApiFailure {
        status: err.status(),
        message: err.body_text(),
    }
}

fn parse_id(text: &str) -> Option<i64> {
    text.trim().parse().ok()
}

fn safe_file_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.is_empty() {
        "resume".to_string()
    } else {
        cleaned
    }
}

// --- company reference data ---

async fn list_departments(State(state): State<AppState>, uri: Uri) -> Response {
    let db = state.db.read().await;
    reply(state.style, StatusCode::OK, &uri, &db.departments)
}

async fn list_positions(State(state): State<AppState>, uri: Uri) -> Response {
    let db = state.db.read().await;
    reply(state.style, StatusCode::OK, &uri, &db.positions)
}

async fn list_headquarters(State(state): State<AppState>, uri: Uri) -> Response {
    let db = state.db.read().await;
    reply(state.style, StatusCode::OK, &uri, &db.headquarters)
}
