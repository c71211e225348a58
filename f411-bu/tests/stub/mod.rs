//! Stub Flying411 backend for integration tests
//!
//! Implements just enough of the upload-session API to drive the client
//! end to end: a 500-row session that parses into three columns, matches
//! 400/80/20 (matched/partial/error) and honors selection-scoped imports.
//! Any handler can be made to fail once via `fail_next`.

use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use chrono::Utc;
use f411_bu::models::{
    ColumnMapping, MappedFields, PartSummary, RowPage, RowStatus, RowUpdate, SessionStatus,
    TargetField, UploadSession, UploadSessionRow,
};
use f411_bu::services::api_client::{MappingOutcome, ParseOutcome};
use f411_common::api::{ErrorEnvelope, Pagination};
use serde::Deserialize;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

pub const TOTAL_ROWS: u64 = 500;
const MATCHED: u64 = 400;
const PARTIAL: u64 = 80;

pub type SharedState = Arc<Mutex<StubState>>;

#[derive(Default)]
pub struct StubState {
    pub session: Option<UploadSession>,
    pub rows: Vec<UploadSessionRow>,
    /// Row-id payloads of every import call (None = all matched)
    pub import_calls: Vec<Option<Vec<Uuid>>>,
    /// One-shot failure injection: (status, message)
    pub fail_next: Option<(u16, String)>,
}

pub struct StubServer {
    addr: SocketAddr,
    state: SharedState,
}

impl StubServer {
    pub async fn start() -> Self {
        let state: SharedState = Arc::new(Mutex::new(StubState::default()));

        let app = Router::new()
            .route("/upload/session", post(create_session))
            .route("/upload/session/:id/parse", post(parse_session))
            .route("/upload/session/:id/map", post(suggest_mappings))
            .route("/upload/session/:id/mapping", put(save_mapping))
            .route("/upload/session/:id/match", post(run_matching))
            .route("/upload/session/:id/rows", get(fetch_rows))
            .route("/upload/session/:id/rows/:row_id", put(update_row))
            .route("/upload/session/:id/import", post(import_rows))
            .route("/upload/sessions", get(list_sessions))
            .route("/parts/search", get(search_parts))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { addr, state }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn state(&self) -> &SharedState {
        &self.state
    }
}

fn injected_failure(state: &SharedState) -> Option<Response> {
    let fail = state.lock().unwrap().fail_next.take();
    fail.map(|(status, message)| {
        let code = StatusCode::from_u16(status).unwrap();
        (code, Json(ErrorEnvelope::new("STUB_ERROR", message))).into_response()
    })
}

fn headers() -> Vec<String> {
    vec![
        "Part No".to_string(),
        "Description".to_string(),
        "Cost".to_string(),
    ]
}

fn make_rows(session_id: Uuid) -> Vec<UploadSessionRow> {
    (1..=TOTAL_ROWS)
        .map(|n| {
            let mut fields = MappedFields::default();
            fields.set(TargetField::PartNumber, format!("AN960-{}", n));

            let (status, confidence, part_id, errors) = if n <= MATCHED {
                fields.set(TargetField::Title, format!("Washer {}", n));
                fields.set(TargetField::Price, "1.25");
                (RowStatus::Matched, Some(0.9), Some(Uuid::new_v4()), vec![])
            } else if n <= MATCHED + PARTIAL {
                (RowStatus::Partial, Some(0.4), Some(Uuid::new_v4()), vec![])
            } else {
                fields.set(TargetField::Price, "n/a");
                (
                    RowStatus::Error,
                    None,
                    None,
                    vec!["price is not numeric".to_string()],
                )
            };

            UploadSessionRow {
                id: Uuid::new_v4(),
                session_id,
                row_number: n,
                raw_values: HashMap::new(),
                mapped_values: Some(fields),
                status,
                match_confidence: confidence,
                matched_part_id: part_id,
                errors,
                listing_id: None,
            }
        })
        .collect()
}

async fn create_session(
    State(state): State<SharedState>,
    mut multipart: Multipart,
) -> Response {
    if let Some(response) = injected_failure(&state) {
        return response;
    }

    let mut filename = String::new();
    let mut mime_type = String::new();
    let mut size = 0u64;
    while let Some(field) = multipart.next_field().await.unwrap() {
        if field.name() == Some("file") {
            filename = field.file_name().unwrap_or("upload").to_string();
            mime_type = field
                .content_type()
                .unwrap_or("application/octet-stream")
                .to_string();
            size = field.bytes().await.unwrap().len() as u64;
        }
    }

    let session = UploadSession {
        id: Uuid::new_v4(),
        user_id: Uuid::new_v4(),
        filename,
        mime_type,
        file_size: size,
        status: SessionStatus::Created,
        total_rows: 0,
        processed_rows: 0,
        error_rows: 0,
        column_mapping: Vec::new(),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    };
    state.lock().unwrap().session = Some(session.clone());
    Json(session).into_response()
}

async fn parse_session(State(state): State<SharedState>, Path(id): Path<Uuid>) -> Response {
    if let Some(response) = injected_failure(&state) {
        return response;
    }
    let mut guard = state.lock().unwrap();
    let Some(session) = guard.session.as_mut().filter(|s| s.id == id) else {
        return not_found();
    };
    session.status = SessionStatus::Parsed;
    session.total_rows = TOTAL_ROWS;
    session.updated_at = Utc::now();

    let outcome = ParseOutcome {
        headers: headers(),
        sample_rows: vec![
            HashMap::from([
                ("Part No".to_string(), "AN960-10".to_string()),
                ("Description".to_string(), "Washer".to_string()),
                ("Cost".to_string(), "1.25".to_string()),
            ]),
            HashMap::from([
                ("Part No".to_string(), "MS20470AD4".to_string()),
                ("Description".to_string(), "Rivet".to_string()),
                ("Cost".to_string(), "0.08".to_string()),
            ]),
        ],
        session: session.clone(),
    };
    Json(outcome).into_response()
}

async fn suggest_mappings(State(state): State<SharedState>, Path(id): Path<Uuid>) -> Response {
    if let Some(response) = injected_failure(&state) {
        return response;
    }
    let guard = state.lock().unwrap();
    let Some(session) = guard.session.as_ref().filter(|s| s.id == id) else {
        return not_found();
    };
    // Deterministic suggestions: same answer every time
    let outcome = MappingOutcome {
        mappings: vec![
            ColumnMapping::suggested("Part No", TargetField::PartNumber, 0.92),
            ColumnMapping::suggested("Description", TargetField::Description, 0.85),
            ColumnMapping::suggested("Cost", TargetField::Price, 0.61),
        ],
        session: session.clone(),
    };
    Json(outcome).into_response()
}

#[derive(Deserialize)]
struct SaveMappingBody {
    mappings: Vec<ColumnMapping>,
}

async fn save_mapping(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Json(body): Json<SaveMappingBody>,
) -> Response {
    if let Some(response) = injected_failure(&state) {
        return response;
    }
    let mut guard = state.lock().unwrap();
    let Some(session) = guard.session.as_mut().filter(|s| s.id == id) else {
        return not_found();
    };
    session.column_mapping = body.mappings;
    session.status = SessionStatus::Mapped;
    session.updated_at = Utc::now();
    Json(serde_json::json!({ "session": session.clone() })).into_response()
}

async fn run_matching(State(state): State<SharedState>, Path(id): Path<Uuid>) -> Response {
    if let Some(response) = injected_failure(&state) {
        return response;
    }
    let mut guard = state.lock().unwrap();
    let Some(session) = guard.session.as_mut().filter(|s| s.id == id) else {
        return not_found();
    };
    session.status = SessionStatus::Matched;
    session.processed_rows = MATCHED + PARTIAL;
    session.error_rows = TOTAL_ROWS - MATCHED - PARTIAL;
    session.updated_at = Utc::now();
    let session = session.clone();
    guard.rows = make_rows(session.id);
    Json(serde_json::json!({ "session": session })).into_response()
}

#[derive(Deserialize)]
struct RowQuery {
    page: Option<u32>,
    limit: Option<u32>,
    status: Option<String>,
}

async fn fetch_rows(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Query(query): Query<RowQuery>,
) -> Response {
    if let Some(response) = injected_failure(&state) {
        return response;
    }
    let guard = state.lock().unwrap();
    if guard.session.as_ref().map(|s| s.id) != Some(id) {
        return not_found();
    }

    let status_filter = query.status.as_deref().map(|s| match s {
        "matched" => RowStatus::Matched,
        "partial" => RowStatus::Partial,
        "unmatched" => RowStatus::Unmatched,
        _ => RowStatus::Error,
    });

    let filtered: Vec<&UploadSessionRow> = guard
        .rows
        .iter()
        .filter(|r| status_filter.map(|f| r.status == f).unwrap_or(true))
        .collect();

    let page = query.page.unwrap_or(1).max(1);
    let limit = query.limit.unwrap_or(25).max(1);
    let start = ((page - 1) * limit) as usize;
    let rows: Vec<UploadSessionRow> = filtered
        .iter()
        .skip(start)
        .take(limit as usize)
        .map(|r| (*r).clone())
        .collect();

    let body = RowPage {
        rows,
        pagination: Pagination::new(page, limit, filtered.len() as u64),
    };
    Json(body).into_response()
}

async fn update_row(
    State(state): State<SharedState>,
    Path((id, row_id)): Path<(Uuid, Uuid)>,
    Json(update): Json<RowUpdate>,
) -> Response {
    if let Some(response) = injected_failure(&state) {
        return response;
    }
    let mut guard = state.lock().unwrap();
    if guard.session.as_ref().map(|s| s.id) != Some(id) {
        return not_found();
    }
    let Some(row) = guard.rows.iter_mut().find(|r| r.id == row_id) else {
        return not_found();
    };

    row.mapped_values = Some(update.fields);
    if update.matched_part_id.is_some() {
        row.matched_part_id = update.matched_part_id;
    }

    // Re-validate: a row with the required fields becomes a full match
    let fields = row.mapped_values.as_ref().unwrap();
    let complete = [TargetField::PartNumber, TargetField::Title, TargetField::Price]
        .iter()
        .all(|&f| fields.get(f).is_some());
    if complete && row.matched_part_id.is_some() {
        row.status = RowStatus::Matched;
        row.match_confidence = Some(0.95);
        row.errors.clear();
    }

    Json(row.clone()).into_response()
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImportBody {
    #[serde(default)]
    row_ids: Option<Vec<Uuid>>,
}

async fn import_rows(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Json(body): Json<ImportBody>,
) -> Response {
    if let Some(response) = injected_failure(&state) {
        return response;
    }
    let mut guard = state.lock().unwrap();
    guard.import_calls.push(body.row_ids.clone());

    let imported: Vec<Uuid> = match &body.row_ids {
        Some(ids) => ids.clone(),
        None => guard
            .rows
            .iter()
            .filter(|r| matches!(r.status, RowStatus::Matched | RowStatus::Partial))
            .map(|r| r.id)
            .collect(),
    };
    for row in guard.rows.iter_mut() {
        if imported.contains(&row.id) {
            row.listing_id = Some(Uuid::new_v4());
        }
    }

    let Some(session) = guard.session.as_mut().filter(|s| s.id == id) else {
        return not_found();
    };
    session.status = SessionStatus::Imported;
    session.processed_rows = imported.len() as u64;
    session.updated_at = Utc::now();
    Json(serde_json::json!({ "session": session.clone() })).into_response()
}

async fn list_sessions(State(state): State<SharedState>) -> Response {
    if let Some(response) = injected_failure(&state) {
        return response;
    }
    let guard = state.lock().unwrap();
    let sessions: Vec<UploadSession> = guard.session.iter().cloned().collect();
    Json(sessions).into_response()
}

#[derive(Deserialize)]
struct SearchQuery {
    q: String,
    #[allow(dead_code)]
    limit: Option<u32>,
}

async fn search_parts(
    State(state): State<SharedState>,
    Query(query): Query<SearchQuery>,
) -> Response {
    if let Some(response) = injected_failure(&state) {
        return response;
    }
    let hits = vec![
        PartSummary {
            id: Uuid::new_v4(),
            part_number: format!("{}-10", query.q),
            title: "Flat washer".to_string(),
            manufacturer: Some("Military Standard".to_string()),
        },
        PartSummary {
            id: Uuid::new_v4(),
            part_number: format!("{}-416", query.q),
            title: "Flat washer, thin".to_string(),
            manufacturer: None,
        },
    ];
    Json(hits).into_response()
}

fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorEnvelope::new("NOT_FOUND", "no such session")),
    )
        .into_response()
}
