//! Positions screen: the whole list is fetched at once and filtered locally.

use std::sync::Arc;

use shared::{
    domain::{Position, PositionId},
    error::ValidationErrors,
    protocol::ListPositionsQuery,
};
use tracing::{debug, info, warn};

use crate::{
    error::{ClientResult, SubmitError},
    forms::PositionForm,
    normalize::ListPage,
    pagination::{paginate, PageSize, Pager},
    sequence::{FetchSequence, FetchTicket},
    view::{ConfirmPrompt, LoadState, Notice},
    AdminApi, ClientError,
};

/// Rows per page of the positions table.
pub const POSITIONS_PAGE_SIZE: u32 = 10;

const LIST_FAILED: &str = "Could not load the position list";
const CREATE_FAILED: &str = "Could not create the position";
const DELETE_FAILED: &str = "Delete failed";

pub struct PositionsSlice {
    api: Arc<dyn AdminApi>,
    rows: Vec<Position>,
    state: LoadState,
    search: String,
    notices: Vec<Notice>,
    fetches: FetchSequence,
    dialog_open: bool,
    form: PositionForm,
    form_errors: ValidationErrors,
}

impl PositionsSlice {
    pub fn new(api: Arc<dyn AdminApi>) -> Self {
        Self {
            api,
            rows: Vec::new(),
            state: LoadState::Idle,
            search: String::new(),
            notices: Vec::new(),
            fetches: FetchSequence::default(),
            dialog_open: false,
            form: PositionForm::default(),
            form_errors: ValidationErrors::default(),
        }
    }

    pub fn rows(&self) -> &[Position] {
        &self.rows
    }

    pub fn state(&self) -> LoadState {
        self.state
    }

    pub fn is_loading(&self) -> bool {
        self.state == LoadState::Loading
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    /// Drains the notices raised since the last call.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    /// Fetches the full list; used on mount and for the reload button.
    pub async fn reload(&mut self) {
        let ticket = self.begin_fetch();
        let result = self.api.list_positions(&ListPositionsQuery::default()).await;
        self.finish_fetch(ticket, result);
    }

    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.state = LoadState::Loading;
        self.fetches.issue()
    }

    /// Applies a completed fetch. Returns `false` when a newer fetch was issued
    /// in the meantime and the result was discarded.
    pub fn finish_fetch(&mut self, ticket: FetchTicket, result: ClientResult<ListPage<Position>>) -> bool {
        if !self.fetches.is_current(ticket) {
            debug!("positions: discarding stale list response ticket={ticket:?}");
            return false;
        }

        match result {
            Ok(page) => {
                self.rows = page.rows;
                self.state = LoadState::Loaded;
            }
            Err(err) => {
                warn!("positions: list fetch failed: {err}");
                self.rows.clear();
                self.state = LoadState::Failed;
                self.notices.push(Notice::error(LIST_FAILED));
            }
        }
        true
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn set_search(&mut self, term: impl Into<String>) {
        self.search = term.into();
    }

    /// Rows matching the search box, in fetch order.
    pub fn filtered(&self) -> Vec<&Position> {
        let needle = self.search.trim().to_lowercase();
        self.rows
            .iter()
            .filter(|position| position.matches(&needle))
            .collect()
    }

    /// One table page of the filtered rows together with its pager.
    pub fn visible(&self, page: u32) -> (Vec<&Position>, Pager) {
        let filtered = self.filtered();
        let shown = paginate(&filtered, page, POSITIONS_PAGE_SIZE).to_vec();
        let pager = Pager {
            current: page.max(1),
            page_size: PageSize::Limit(POSITIONS_PAGE_SIZE),
            total: filtered.len() as u64,
            rows_on_page: shown.len(),
        };
        (shown, pager)
    }

    pub fn open_create(&mut self) {
        self.form = PositionForm::default();
        self.form_errors = ValidationErrors::default();
        self.dialog_open = true;
    }

    pub fn close_create(&mut self) {
        self.dialog_open = false;
    }

    pub fn is_create_open(&self) -> bool {
        self.dialog_open
    }

    pub fn form(&self) -> &PositionForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut PositionForm {
        &mut self.form
    }

    pub fn form_errors(&self) -> &ValidationErrors {
        &self.form_errors
    }

    /// Validates and posts the dialog form. On success the dialog closes and
    /// the list is fetched again; on any failure the dialog stays open. The
    /// created record is only returned when the backend echoed it.
    pub async fn submit_create(&mut self) -> Result<Option<Position>, SubmitError> {
        let request = match self.form.validate() {
            Ok(request) => request,
            Err(errors) => {
                self.form_errors = errors.clone();
                return Err(errors.into());
            }
        };
        self.form_errors = ValidationErrors::default();

        match self.api.create_position(&request).await {
            Ok(created) => {
                info!("positions: created code={}", request.code);
                self.notices.push(Notice::success("Position created"));
                self.dialog_open = false;
                self.form = PositionForm::default();
                self.reload().await;
                Ok(created)
            }
            Err(err) => {
                warn!("positions: create failed code={}: {err}", request.code);
                self.notices.push(Notice::error(err.notice_text(CREATE_FAILED)));
                Err(err.into())
            }
        }
    }

    pub fn request_delete(&self, id: &PositionId) -> ConfirmPrompt<PositionId> {
        let label = self
            .rows
            .iter()
            .find(|position| &position.id == id)
            .map(|position| position.name.clone())
            .unwrap_or_else(|| id.to_string());
        ConfirmPrompt {
            target: id.clone(),
            title: "Delete position".to_string(),
            message: format!("Are you sure you want to delete \"{label}\"?"),
        }
    }

    /// Returns `Ok(false)` when the user declined. The row is only removed by
    /// the re-fetch that follows a successful delete.
    pub async fn resolve_delete(
        &mut self,
        prompt: ConfirmPrompt<PositionId>,
        confirmed: bool,
    ) -> Result<bool, ClientError> {
        if !confirmed {
            return Ok(false);
        }

        let previous = std::mem::replace(&mut self.state, LoadState::Loading);
        match self.api.delete_position(&prompt.target).await {
            Ok(()) => {
                info!("positions: deleted id={}", prompt.target);
                self.notices.push(Notice::success("Position deleted"));
                self.reload().await;
                Ok(true)
            }
            Err(err) => {
                warn!("positions: delete failed id={}: {err}", prompt.target);
                self.state = previous;
                self.notices.push(Notice::error(err.notice_text(DELETE_FAILED)));
                Err(err)
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/positions_tests.rs"]
mod tests;
