//! Owned upload-session context
//!
//! `UploadContext` is the single holder of all workflow state: the active
//! session, parse results, the mapping being edited, the current row page
//! and the wizard step. It is a plain owned value; operations take
//! `&mut self`, which serializes access the same way the original UI's
//! event loop did.
//!
//! Every remote operation records its failure in `last_error` and leaves
//! the rest of the state untouched, so the caller can surface a
//! notification and let the user retry.
//!
//! Stale-response protection: the context carries a generation counter
//! bumped by [`reset`](UploadContext::reset). Remote results are applied
//! through `apply_*` methods that take the [`Generation`] captured before
//! the call; a response from a previous generation is discarded with
//! [`UploadError::Stale`] and mutates nothing.

use crate::config::BuConfig;
use crate::error::{UploadError, UploadResult};
use crate::models::{
    ColumnMapping, RowStatus, RowUpdate, SessionStatus, UploadSession, UploadSessionRow,
};
use crate::review::{ImportScope, RowSelection};
use crate::services::api_client::{ApiClient, MappingOutcome, ParseOutcome};
use crate::services::intake::IntakeFile;
use crate::services::mapping_editor::MappingEditor;
use crate::workflow::step::WizardStep;
use f411_common::api::Pagination;
use std::collections::HashMap;
use tracing::{debug, info};
use uuid::Uuid;

/// Opaque snapshot of the context generation, captured before a remote
/// call and presented back when applying its result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Generation(u64);

/// All state for one user's upload wizard
pub struct UploadContext {
    api: ApiClient,
    page_size: u32,

    step: WizardStep,
    session: Option<UploadSession>,

    headers: Vec<String>,
    sample_rows: Vec<HashMap<String, String>>,

    editor: MappingEditor,
    mapping_saved: bool,

    rows: Vec<UploadSessionRow>,
    rows_pagination: Option<Pagination>,
    status_filter: Option<RowStatus>,
    selection: RowSelection,

    last_error: Option<String>,
    is_loading: bool,
    generation: u64,
}

impl UploadContext {
    pub fn new(api: ApiClient, page_size: u32) -> Self {
        Self {
            api,
            page_size,
            step: WizardStep::Upload,
            session: None,
            headers: Vec::new(),
            sample_rows: Vec::new(),
            editor: MappingEditor::default(),
            mapping_saved: false,
            rows: Vec::new(),
            rows_pagination: None,
            status_filter: None,
            selection: RowSelection::default(),
            last_error: None,
            is_loading: false,
            generation: 0,
        }
    }

    pub fn from_config(config: &BuConfig) -> UploadResult<Self> {
        let api = ApiClient::new(config)?;
        Ok(Self::new(api, config.page_size))
    }

    // ------------------------------------------------------------------
    // Read access
    // ------------------------------------------------------------------

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn session(&self) -> Option<&UploadSession> {
        self.session.as_ref()
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn sample_rows(&self) -> &[HashMap<String, String>] {
        &self.sample_rows
    }

    pub fn editor(&self) -> &MappingEditor {
        &self.editor
    }

    pub fn editor_mut(&mut self) -> &mut MappingEditor {
        &mut self.editor
    }

    pub fn mapping_saved(&self) -> bool {
        self.mapping_saved
    }

    pub fn rows(&self) -> &[UploadSessionRow] {
        &self.rows
    }

    pub fn rows_pagination(&self) -> Option<&Pagination> {
        self.rows_pagination.as_ref()
    }

    pub fn status_filter(&self) -> Option<RowStatus> {
        self.status_filter
    }

    pub fn selection(&self) -> &RowSelection {
        &self.selection
    }

    pub fn selection_mut(&mut self) -> &mut RowSelection {
        &mut self.selection
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    // ------------------------------------------------------------------
    // Generation bookkeeping
    // ------------------------------------------------------------------

    /// Capture the current generation before issuing a remote call
    pub fn guard(&self) -> Generation {
        Generation(self.generation)
    }

    fn check(&self, guard: Generation) -> UploadResult<()> {
        if guard.0 != self.generation {
            return Err(UploadError::Stale);
        }
        Ok(())
    }

    fn begin(&mut self) -> Generation {
        self.last_error = None;
        self.is_loading = true;
        Generation(self.generation)
    }

    /// Clear the loading flag and record the error message, unless the
    /// context was reset while the call was in flight.
    fn settle<T>(&mut self, guard: Generation, result: UploadResult<T>) -> UploadResult<T> {
        if guard.0 != self.generation {
            return Err(UploadError::Stale);
        }
        self.is_loading = false;
        result.map_err(|e| {
            self.last_error = Some(e.user_message());
            e
        })
    }

    fn require_session(&mut self) -> UploadResult<Uuid> {
        match self.session.as_ref().map(|s| s.id) {
            Some(id) => Ok(id),
            None => {
                let err = UploadError::Validation("No active upload session".to_string());
                self.last_error = Some(err.user_message());
                Err(err)
            }
        }
    }

    // ------------------------------------------------------------------
    // Remote operations
    // ------------------------------------------------------------------

    /// Upload a validated file and start a fresh session. On failure the
    /// previous session (if any) is left untouched.
    pub async fn create_session(&mut self, file: &IntakeFile) -> UploadResult<()> {
        let guard = self.begin();
        let result = self.api.create_session(file).await;
        let session = self.settle(guard, result)?;
        self.apply_created(guard, session)
    }

    pub fn apply_created(&mut self, guard: Generation, session: UploadSession) -> UploadResult<()> {
        self.check(guard)?;
        info!("Upload session {} created for {}", session.id, session.filename);
        self.session = Some(session);
        self.step = WizardStep::Upload;
        self.headers.clear();
        self.sample_rows.clear();
        self.editor = MappingEditor::default();
        self.mapping_saved = false;
        self.rows.clear();
        self.rows_pagination = None;
        self.status_filter = None;
        self.selection.clear();
        Ok(())
    }

    /// Ask the backend to parse the uploaded file into headers and sample
    /// rows. Silently a no-op when no session is active.
    pub async fn parse_file(&mut self) -> UploadResult<()> {
        let Some(id) = self.session.as_ref().map(|s| s.id) else {
            return Ok(());
        };
        let guard = self.begin();
        let result = self.api.parse_session(id).await;
        let outcome = self.settle(guard, result)?;
        self.apply_parse_outcome(guard, outcome)
    }

    pub fn apply_parse_outcome(
        &mut self,
        guard: Generation,
        outcome: ParseOutcome,
    ) -> UploadResult<()> {
        self.check(guard)?;
        debug!(
            "Parsed {} columns, {} sample rows",
            outcome.headers.len(),
            outcome.sample_rows.len()
        );
        self.headers = outcome.headers;
        self.sample_rows = outcome.sample_rows;
        self.session = Some(outcome.session);
        Ok(())
    }

    /// Fetch AI mapping suggestions. Replaces the local mapping list
    /// wholesale; unsaved manual edits are discarded.
    pub async fn get_ai_mappings(&mut self) -> UploadResult<()> {
        let id = self.require_session()?;
        let guard = self.begin();
        let result = self.api.suggest_mappings(id).await;
        let outcome = self.settle(guard, result)?;
        self.apply_suggestions(guard, outcome)
    }

    pub fn apply_suggestions(
        &mut self,
        guard: Generation,
        outcome: MappingOutcome,
    ) -> UploadResult<()> {
        self.check(guard)?;
        self.editor = MappingEditor::from_suggestions(&self.headers, outcome.mappings);
        self.mapping_saved = false;
        self.session = Some(outcome.session);
        Ok(())
    }

    /// Persist the finalized mapping. Unmapped entries are dropped here;
    /// the local list becomes exactly what was saved.
    pub async fn save_mapping(&mut self, mappings: Vec<ColumnMapping>) -> UploadResult<()> {
        let id = self.require_session()?;

        let candidate = MappingEditor::from_entries(
            mappings.into_iter().filter(|m| m.is_mapped()).collect(),
        );
        if let Err(err) = candidate.validate() {
            self.last_error = Some(err.user_message());
            return Err(err);
        }
        if !candidate.is_complete() {
            let err = UploadError::Validation(
                "Map at least one column to Part Number before confirming".to_string(),
            );
            self.last_error = Some(err.user_message());
            return Err(err);
        }

        let guard = self.begin();
        let result = self.api.save_mapping(id, candidate.mappings()).await;
        let session = self.settle(guard, result)?;
        self.apply_saved_mapping(guard, candidate, session)
    }

    /// Persist whatever the editor currently holds
    pub async fn save_current_mapping(&mut self) -> UploadResult<()> {
        let mappings = self.editor.mapped_entries();
        self.save_mapping(mappings).await
    }

    pub fn apply_saved_mapping(
        &mut self,
        guard: Generation,
        editor: MappingEditor,
        session: UploadSession,
    ) -> UploadResult<()> {
        self.check(guard)?;
        info!("Mapping saved: {} columns", editor.mappings().len());
        self.editor = editor;
        self.mapping_saved = true;
        self.session = Some(session);
        Ok(())
    }

    /// Trigger server-side matching of all rows. Requires a saved mapping.
    pub async fn run_matching(&mut self) -> UploadResult<()> {
        let id = self.require_session()?;
        if !self.mapping_saved {
            let err = UploadError::Validation(
                "Confirm the column mapping before matching".to_string(),
            );
            self.last_error = Some(err.user_message());
            return Err(err);
        }
        let guard = self.begin();
        let result = self.api.run_matching(id).await;
        let session = self.settle(guard, result)?;
        self.apply_matched(guard, session)
    }

    pub fn apply_matched(&mut self, guard: Generation, session: UploadSession) -> UploadResult<()> {
        self.check(guard)?;
        info!(
            "Matching finished: {}/{} processed, {} errors",
            session.processed_rows, session.total_rows, session.error_rows
        );
        self.session = Some(session);
        Ok(())
    }

    /// Fetch one page of processed rows, optionally filtered by status.
    /// Replaces the local row list and pagination metadata.
    pub async fn fetch_rows(
        &mut self,
        page: u32,
        limit: Option<u32>,
        status: Option<RowStatus>,
    ) -> UploadResult<()> {
        let id = self.require_session()?;
        let limit = limit.unwrap_or(self.page_size);
        let guard = self.begin();
        let result = self.api.fetch_rows(id, page, limit, status).await;
        let page = self.settle(guard, result)?;
        self.apply_row_page(guard, page, status)
    }

    pub fn apply_row_page(
        &mut self,
        guard: Generation,
        page: crate::models::RowPage,
        status: Option<RowStatus>,
    ) -> UploadResult<()> {
        self.check(guard)?;
        self.rows = page.rows;
        self.rows_pagination = Some(page.pagination);
        self.status_filter = status;
        Ok(())
    }

    /// Persist a manual edit to one row. The server's re-validated row
    /// replaces the local entry wholesale; no fields are merged locally.
    pub async fn update_row(&mut self, row_id: Uuid, update: RowUpdate) -> UploadResult<()> {
        let id = self.require_session()?;
        let guard = self.begin();
        let result = self.api.update_row(id, row_id, &update).await;
        let row = self.settle(guard, result)?;
        self.apply_row_update(guard, row)
    }

    pub fn apply_row_update(
        &mut self,
        guard: Generation,
        row: UploadSessionRow,
    ) -> UploadResult<()> {
        self.check(guard)?;
        if let Some(slot) = self.rows.iter_mut().find(|r| r.id == row.id) {
            *slot = row;
        }
        Ok(())
    }

    /// Convert matched rows into listings. The scope decides whether the
    /// whole session or only the selected rows are imported; the selection
    /// is cleared once the import succeeds.
    pub async fn import_rows(&mut self, scope: ImportScope) -> UploadResult<()> {
        let id = self.require_session()?;
        let guard = self.begin();
        let result = self.api.import_rows(id, scope.row_ids()).await;
        let session = self.settle(guard, result)?;
        self.apply_imported(guard, session)
    }

    pub fn apply_imported(&mut self, guard: Generation, session: UploadSession) -> UploadResult<()> {
        self.check(guard)?;
        info!(
            "Import finished: {} processed, {} errors",
            session.processed_rows, session.error_rows
        );
        self.session = Some(session);
        self.selection.clear();
        Ok(())
    }

    // ------------------------------------------------------------------
    // Local transitions
    // ------------------------------------------------------------------

    /// Advance to the next wizard step, gated on the current step's
    /// completion. The gates only open on state that successful remote
    /// operations produce, so a failed step can never advance.
    pub fn try_advance(&mut self) -> UploadResult<()> {
        let Some(next) = self.step.next() else {
            return Err(UploadError::Validation("Already at the final step".to_string()));
        };
        let ready = match self.step {
            WizardStep::Upload => !self.headers.is_empty(),
            WizardStep::Mapping => {
                self.mapping_saved
                    && self
                        .session
                        .as_ref()
                        .map(|s| s.status.has_matched())
                        .unwrap_or(false)
            }
            WizardStep::Review => self
                .session
                .as_ref()
                .map(|s| s.status == SessionStatus::Imported)
                .unwrap_or(false),
            WizardStep::Results => false,
        };
        if !ready {
            return Err(UploadError::Validation(
                "Complete the current step first".to_string(),
            ));
        }
        debug!("Step {:?} -> {:?}", self.step, next);
        self.step = next;
        Ok(())
    }

    /// Navigate one step back. Only changes which screen renders; server
    /// progress stays as it is. Returns false where backing up is not
    /// permitted (Upload, Results).
    pub fn back(&mut self) -> bool {
        match self.step.back() {
            Some(prev) => {
                self.step = prev;
                true
            }
            None => false,
        }
    }

    /// Jump to an arbitrary step (UI-enforced navigation)
    pub fn set_step(&mut self, step: WizardStep) {
        self.step = step;
    }

    /// Discard all session state and start over. Bumps the generation so
    /// any response still in flight is discarded on arrival.
    pub fn reset(&mut self) {
        self.generation += 1;
        self.step = WizardStep::Upload;
        self.session = None;
        self.headers.clear();
        self.sample_rows.clear();
        self.editor = MappingEditor::default();
        self.mapping_saved = false;
        self.rows.clear();
        self.rows_pagination = None;
        self.status_filter = None;
        self.selection.clear();
        self.last_error = None;
        self.is_loading = false;
        info!("Upload context reset");
    }
}
