//! Flying411 REST API client
//!
//! Thin typed wrapper over the backend's upload-session endpoints. All
//! failures are classified into [`UploadError`] here so the workflow layer
//! never sees raw transport errors. No retries at this layer.

use crate::config::BuConfig;
use crate::error::{UploadError, UploadResult};
use crate::models::{
    ColumnMapping, PartSummary, RowPage, RowStatus, RowUpdate, UploadSession, UploadSessionRow,
};
use crate::services::intake::IntakeFile;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;
use uuid::Uuid;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Parse result: discovered headers plus a preview of the data
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseOutcome {
    pub headers: Vec<String>,
    pub sample_rows: Vec<HashMap<String, String>>,
    pub session: UploadSession,
}

/// AI mapping suggestions plus the refreshed session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MappingOutcome {
    pub mappings: Vec<ColumnMapping>,
    pub session: UploadSession,
}

#[derive(Debug, Serialize, Deserialize)]
struct SessionEnvelope {
    session: UploadSession,
}

#[derive(Debug, Serialize)]
struct SaveMappingRequest<'a> {
    mappings: &'a [ColumnMapping],
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ImportRequest<'a> {
    /// None imports every matched row; Some limits the import to these
    row_ids: Option<&'a [Uuid]>,
}

/// Typed client for the upload-session endpoints
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
    token: String,
}

impl ApiClient {
    pub fn new(config: &BuConfig) -> UploadResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| UploadError::Config(format!("HTTP client init failed: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            token: config.api_token.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> UploadResult<T> {
        let response = request
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(UploadError::from_transport)?;

        if !response.status().is_success() {
            return Err(UploadError::from_response(response).await);
        }

        response
            .json::<T>()
            .await
            .map_err(|e| UploadError::Unknown(format!("Malformed response: {}", e)))
    }

    /// POST /upload/session (multipart)
    pub async fn create_session(&self, file: &IntakeFile) -> UploadResult<UploadSession> {
        let part = reqwest::multipart::Part::bytes(file.bytes.clone())
            .file_name(file.filename.clone())
            .mime_str(&file.mime_type)
            .map_err(|e| UploadError::Validation(format!("Bad MIME type: {}", e)))?;
        let form = reqwest::multipart::Form::new().part("file", part);

        let request = self.client.post(self.url("/upload/session")).multipart(form);
        self.send(request).await
    }

    /// POST /upload/session/{id}/parse
    pub async fn parse_session(&self, id: Uuid) -> UploadResult<ParseOutcome> {
        let request = self
            .client
            .post(self.url(&format!("/upload/session/{}/parse", id)));
        self.send(request).await
    }

    /// POST /upload/session/{id}/map
    pub async fn suggest_mappings(&self, id: Uuid) -> UploadResult<MappingOutcome> {
        let request = self
            .client
            .post(self.url(&format!("/upload/session/{}/map", id)));
        self.send(request).await
    }

    /// PUT /upload/session/{id}/mapping
    pub async fn save_mapping(
        &self,
        id: Uuid,
        mappings: &[ColumnMapping],
    ) -> UploadResult<UploadSession> {
        let request = self
            .client
            .put(self.url(&format!("/upload/session/{}/mapping", id)))
            .json(&SaveMappingRequest { mappings });
        let envelope: SessionEnvelope = self.send(request).await?;
        Ok(envelope.session)
    }

    /// POST /upload/session/{id}/match
    pub async fn run_matching(&self, id: Uuid) -> UploadResult<UploadSession> {
        let request = self
            .client
            .post(self.url(&format!("/upload/session/{}/match", id)));
        let envelope: SessionEnvelope = self.send(request).await?;
        Ok(envelope.session)
    }

    /// GET /upload/session/{id}/rows?page&limit&status
    pub async fn fetch_rows(
        &self,
        id: Uuid,
        page: u32,
        limit: u32,
        status: Option<RowStatus>,
    ) -> UploadResult<RowPage> {
        let mut query = vec![("page", page.to_string()), ("limit", limit.to_string())];
        if let Some(status) = status {
            query.push(("status", status.as_str().to_string()));
        }
        let request = self
            .client
            .get(self.url(&format!("/upload/session/{}/rows", id)))
            .query(&query);
        self.send(request).await
    }

    /// PUT /upload/session/{id}/rows/{rowId}
    pub async fn update_row(
        &self,
        id: Uuid,
        row_id: Uuid,
        update: &RowUpdate,
    ) -> UploadResult<UploadSessionRow> {
        let request = self
            .client
            .put(self.url(&format!("/upload/session/{}/rows/{}", id, row_id)))
            .json(update);
        self.send(request).await
    }

    /// POST /upload/session/{id}/import
    ///
    /// `row_ids: None` imports all matched rows in the session.
    pub async fn import_rows(
        &self,
        id: Uuid,
        row_ids: Option<&[Uuid]>,
    ) -> UploadResult<UploadSession> {
        let request = self
            .client
            .post(self.url(&format!("/upload/session/{}/import", id)))
            .json(&ImportRequest { row_ids });
        let envelope: SessionEnvelope = self.send(request).await?;
        Ok(envelope.session)
    }

    /// GET /upload/sessions
    pub async fn list_sessions(&self) -> UploadResult<Vec<UploadSession>> {
        let request = self.client.get(self.url("/upload/sessions"));
        self.send(request).await
    }

    /// GET /parts/search?q&limit — part-number remediation lookup
    pub async fn search_parts(&self, query: &str, limit: u32) -> UploadResult<Vec<PartSummary>> {
        let request = self
            .client
            .get(self.url("/parts/search"))
            .query(&[("q", query.to_string()), ("limit", limit.to_string())]);
        self.send(request).await
    }
}
