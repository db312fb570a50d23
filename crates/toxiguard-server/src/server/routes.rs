use crate::auth::{check_credentials, AdminSession};
use crate::error::{AppError, AppResult};
use crate::extract::{ApiJson, ApiQuery};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use toxiguard_core::Author;
use toxiguard_moderation::{random_author, DraftId, SubmitOutcome};
use toxiguard_reporting::{ExportFormat, DEFAULT_RECENT_LIMIT};
use toxiguard_store::CommentQuery;
use tracing::info;

const MAX_FEED_LIMIT: usize = 500;
const DEFAULT_TOP_TERMS: usize = 50;

// ============================================================================
// Health and metrics
// ============================================================================

pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "classifier": state.workflow.classifier_name(),
        "pending_drafts": state.workflow.pending_count(),
    }))
}

pub async fn metrics(State(state): State<AppState>) -> impl IntoResponse {
    let body = state
        .metrics
        .as_ref()
        .map(|handle| handle.render())
        .unwrap_or_default();
    ([(header::CONTENT_TYPE, "text/plain; version=0.0.4")], body)
}

// ============================================================================
// Submission endpoints
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct SubmitRequest {
    pub text: String,
    #[serde(default)]
    pub author: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct EditRequest {
    pub text: String,
}

fn outcome_response(outcome: SubmitOutcome) -> (StatusCode, Json<SubmitOutcome>) {
    let status = if outcome.is_accepted() {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    (status, Json(outcome))
}

fn parse_draft_id(raw: &str) -> AppResult<DraftId> {
    Ok(raw.parse::<DraftId>()?)
}

pub async fn submit_comment(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<SubmitRequest>,
) -> AppResult<impl IntoResponse> {
    let author = match req.author.as_deref().map(str::trim) {
        Some(name) if !name.is_empty() => Author::new(name),
        _ => random_author(),
    };

    let outcome = state.workflow.submit(author, &req.text).await?;
    Ok(outcome_response(outcome))
}

#[derive(Debug, Deserialize)]
pub struct FeedParams {
    pub limit: Option<usize>,
}

pub async fn list_feed(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<FeedParams>,
) -> AppResult<impl IntoResponse> {
    let limit = params.limit.unwrap_or(state.feed_limit).min(MAX_FEED_LIMIT);
    let feed = state.reporter.feed(limit, Utc::now())?;
    Ok(Json(feed))
}

pub async fn get_draft(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let id = parse_draft_id(&id)?;
    Ok(Json(state.workflow.draft(&id)?))
}

pub async fn edit_draft(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<EditRequest>,
) -> AppResult<impl IntoResponse> {
    let id = parse_draft_id(&id)?;
    let outcome = state.workflow.edit(&id, &req.text).await?;
    Ok(outcome_response(outcome))
}

pub async fn accept_draft(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let id = parse_draft_id(&id)?;
    let comment = state.workflow.accept_anyway(&id).await?;
    Ok(outcome_response(SubmitOutcome::Accepted { comment }))
}

pub async fn cancel_draft(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let id = parse_draft_id(&id)?;
    state.workflow.cancel(&id)?;
    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Admin session endpoints
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

pub async fn admin_login(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> AppResult<impl IntoResponse> {
    if !check_credentials(&state.admin, &req.username, &req.password) {
        return Err(AppError::Unauthorized("Invalid credentials".into()));
    }

    let session = state.sessions.issue();
    info!(expires_at = %session.expires_at, "Admin logged in");
    Ok(Json(session))
}

pub async fn admin_logout(
    State(state): State<AppState>,
    session: AdminSession,
) -> impl IntoResponse {
    state.sessions.revoke(&session.token);
    StatusCode::NO_CONTENT
}

// ============================================================================
// Admin report endpoints
// ============================================================================

pub async fn overview(
    State(state): State<AppState>,
    _session: AdminSession,
) -> AppResult<impl IntoResponse> {
    let overview = state.reporter.overview()?;
    let distribution = toxiguard_reporting::distribution(&overview);
    Ok(Json(json!({
        "total": overview.total,
        "toxic": overview.toxic,
        "non_toxic": overview.non_toxic,
        "toxic_rate": overview.toxic_rate(),
        "distribution": distribution,
    })))
}

pub async fn recent(
    State(state): State<AppState>,
    _session: AdminSession,
) -> AppResult<impl IntoResponse> {
    Ok(Json(state.reporter.recent(DEFAULT_RECENT_LIMIT)?))
}

pub async fn toxic(
    State(state): State<AppState>,
    _session: AdminSession,
) -> AppResult<impl IntoResponse> {
    Ok(Json(state.reporter.toxic_comments()?))
}

pub async fn users(
    State(state): State<AppState>,
    _session: AdminSession,
) -> AppResult<impl IntoResponse> {
    Ok(Json(state.reporter.author_activity()?))
}

#[derive(Debug, Deserialize)]
pub struct TermsParams {
    pub top: Option<usize>,
}

pub async fn terms(
    State(state): State<AppState>,
    _session: AdminSession,
    ApiQuery(params): ApiQuery<TermsParams>,
) -> AppResult<impl IntoResponse> {
    let top = params.top.unwrap_or(DEFAULT_TOP_TERMS);
    Ok(Json(state.reporter.top_terms(top)?))
}

pub async fn query_comments(
    State(state): State<AppState>,
    _session: AdminSession,
    ApiQuery(query): ApiQuery<CommentQuery>,
) -> AppResult<impl IntoResponse> {
    Ok(Json(state.reporter.query(&query)?))
}

#[derive(Debug, Deserialize)]
pub struct ExportParams {
    pub format: Option<String>,
}

pub async fn export(
    State(state): State<AppState>,
    _session: AdminSession,
    ApiQuery(params): ApiQuery<ExportParams>,
) -> AppResult<impl IntoResponse> {
    let format = match params.format.as_deref() {
        Some(raw) => raw
            .parse::<ExportFormat>()
            .map_err(|e| AppError::BadRequest(e.to_string()))?,
        None => ExportFormat::default(),
    };

    let mut body = Vec::new();
    let rows = state.reporter.export(&CommentQuery::new(), format, &mut body)?;
    info!(rows, format = %format, "Exported comments");

    let disposition = format!("attachment; filename=\"comments.{}\"", format.extension());
    Ok((
        [
            (header::CONTENT_TYPE, format.content_type().to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    ))
}
