//! Teachers screen: paging and search happen on the backend, and the create
//! dialog needs the position list for its multi-select.

use std::sync::Arc;

use shared::{
    domain::{Position, Teacher, TeacherId},
    error::ValidationErrors,
    protocol::{ListPositionsQuery, ListTeachersQuery},
};
use tracing::{debug, info, warn};

use crate::{
    error::{ClientError, ClientResult, SubmitError},
    forms::{SelectOption, TeacherForm},
    normalize::ListPage,
    pagination::{PageSize, Pager},
    sequence::{FetchSequence, FetchTicket},
    view::{ConfirmPrompt, LoadState, Notice},
    AdminApi,
};

const LIST_FAILED: &str = "Could not load the teacher list.";
const OPTIONS_FAILED: &str = "Could not load the position list.";
const CREATE_FAILED: &str = "Could not create the teacher. Please check the data.";
const DELETE_FAILED: &str = "Delete failed.";

/// A teacher list request that has been issued but not yet applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeachersRequest {
    ticket: FetchTicket,
    page_size: PageSize,
    pub query: ListTeachersQuery,
}

pub struct TeachersSlice {
    api: Arc<dyn AdminApi>,
    rows: Vec<Teacher>,
    total: u64,
    page: u32,
    page_size: PageSize,
    search: String,
    state: LoadState,
    notices: Vec<Notice>,
    fetches: FetchSequence,
    options: Vec<SelectOption>,
    options_state: LoadState,
    option_fetches: FetchSequence,
    dialog_open: bool,
    form: TeacherForm,
    form_errors: ValidationErrors,
}

impl TeachersSlice {
    pub fn new(api: Arc<dyn AdminApi>) -> Self {
        Self::with_page_size(api, PageSize::default())
    }

    pub fn with_page_size(api: Arc<dyn AdminApi>, page_size: PageSize) -> Self {
        Self {
            api,
            rows: Vec::new(),
            total: 0,
            page: 1,
            page_size,
            search: String::new(),
            state: LoadState::Idle,
            notices: Vec::new(),
            fetches: FetchSequence::default(),
            options: Vec::new(),
            options_state: LoadState::Idle,
            option_fetches: FetchSequence::default(),
            dialog_open: false,
            form: TeacherForm::default(),
            form_errors: ValidationErrors::default(),
        }
    }

    pub fn rows(&self) -> &[Teacher] {
        &self.rows
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn page_size(&self) -> PageSize {
        self.page_size
    }

    pub fn search(&self) -> &str {
        &self.search
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

    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    pub fn pager(&self) -> Pager {
        Pager {
            current: self.page,
            page_size: self.page_size,
            total: self.total,
            rows_on_page: self.rows.len(),
        }
    }

    /// First page with an empty search, plus the position options; the two
    /// requests run concurrently and fail independently.
    pub async fn mount(&mut self) {
        let request = self.begin_fetch(1, self.page_size, String::new());
        let options_ticket = self.begin_options_fetch();
        let options_query = ListPositionsQuery::unbounded();
        let api = Arc::clone(&self.api);
        let (teachers, positions) = futures::join!(
            api.list_teachers(&request.query),
            api.list_positions(&options_query),
        );
        self.finish_fetch(request, teachers);
        self.finish_options_fetch(options_ticket, positions);
    }

    pub async fn fetch(&mut self, page: u32, page_size: PageSize, search: impl Into<String>) {
        let request = self.begin_fetch(page, page_size, search.into());
        let result = self.api.list_teachers(&request.query).await;
        self.finish_fetch(request, result);
    }

    /// Fetches the current page again with the current size and search.
    pub async fn reload(&mut self) {
        let search = self.search.clone();
        self.fetch(self.page, self.page_size, search).await;
    }

    pub async fn go_to_page(&mut self, page: u32) {
        let search = self.search.clone();
        self.fetch(page, self.page_size, search).await;
    }

    pub async fn set_page_size(&mut self, page_size: PageSize) {
        let search = self.search.clone();
        self.fetch(1, page_size, search).await;
    }

    /// An empty term clears the filter.
    pub async fn submit_search(&mut self, term: impl Into<String>) {
        self.fetch(1, self.page_size, term).await;
    }

    /// Records the requested size and search right away; page, total and rows
    /// only change once the response is applied.
    pub fn begin_fetch(&mut self, page: u32, page_size: PageSize, search: String) -> TeachersRequest {
        self.state = LoadState::Loading;
        self.page_size = page_size;
        self.search = search;
        TeachersRequest {
            ticket: self.fetches.issue(),
            page_size,
            query: ListTeachersQuery::new(page, page_size.limit(), &self.search),
        }
    }

    /// Returns `false` when the response was overtaken by a newer request.
    pub fn finish_fetch(&mut self, request: TeachersRequest, result: ClientResult<ListPage<Teacher>>) -> bool {
        if !self.fetches.is_current(request.ticket) {
            debug!("teachers: discarding stale list response ticket={:?}", request.ticket);
            return false;
        }

        match result {
            Ok(page) => {
                self.page = page.meta.page.unwrap_or(request.query.page);
                self.page_size = match (request.page_size, page.meta.limit) {
                    (PageSize::All, _) | (_, None) => request.page_size,
                    (_, Some(limit)) => PageSize::Limit(limit),
                };
                self.total = page.meta.total.unwrap_or(page.rows.len() as u64);
                self.rows = page.rows;
                self.state = LoadState::Loaded;
            }
            Err(err) => {
                warn!(
                    "teachers: list fetch failed page={} limit={}: {err}",
                    request.query.page, request.query.limit
                );
                self.rows.clear();
                self.total = 0;
                self.state = LoadState::Failed;
                self.notices.push(Notice::error(LIST_FAILED));
            }
        }
        true
    }

    pub fn options_state(&self) -> LoadState {
        self.options_state
    }

    pub fn position_options(&self) -> &[SelectOption] {
        &self.options
    }

    /// Options whose label contains `term`, ignoring case.
    pub fn filter_position_options(&self, term: &str) -> Vec<&SelectOption> {
        let needle = term.trim().to_lowercase();
        self.options
            .iter()
            .filter(|option| option.label.to_lowercase().contains(&needle))
            .collect()
    }

    pub async fn load_position_options(&mut self) {
        let ticket = self.begin_options_fetch();
        let result = self.api.list_positions(&ListPositionsQuery::unbounded()).await;
        self.finish_options_fetch(ticket, result);
    }

    pub fn begin_options_fetch(&mut self) -> FetchTicket {
        self.options_state = LoadState::Loading;
        self.option_fetches.issue()
    }

    pub fn finish_options_fetch(
        &mut self,
        ticket: FetchTicket,
        result: ClientResult<ListPage<Position>>,
    ) -> bool {
        if !self.option_fetches.is_current(ticket) {
            debug!("teachers: discarding stale position options ticket={ticket:?}");
            return false;
        }

        match result {
            Ok(page) => {
                self.options = page.rows.iter().map(SelectOption::from).collect();
                self.options_state = LoadState::Loaded;
            }
            Err(err) => {
                warn!("teachers: position options fetch failed: {err}");
                self.options.clear();
                self.options_state = LoadState::Failed;
                self.notices.push(Notice::error(OPTIONS_FAILED));
            }
        }
        true
    }

    /// Opens the dialog with default values and refreshes the position
    /// options so positions created since mount are selectable.
    pub async fn open_create(&mut self) {
        self.form = TeacherForm::default();
        self.form_errors = ValidationErrors::default();
        self.dialog_open = true;
        self.load_position_options().await;
    }

    pub fn close_create(&mut self) {
        self.dialog_open = false;
    }

    pub fn is_create_open(&self) -> bool {
        self.dialog_open
    }

    pub fn form(&self) -> &TeacherForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut TeacherForm {
        &mut self.form
    }

    pub fn form_errors(&self) -> &ValidationErrors {
        &self.form_errors
    }

    /// On success the dialog closes and page 1 is fetched with the current
    /// size and search, where the new record is expected to show up.
    pub async fn submit_create(&mut self) -> Result<Option<Teacher>, SubmitError> {
        let request = match self.form.validate() {
            Ok(request) => request,
            Err(errors) => {
                self.form_errors = errors.clone();
                return Err(errors.into());
            }
        };
        self.form_errors = ValidationErrors::default();

        match self.api.create_teacher(&request).await {
            Ok(created) => {
                info!("teachers: created email={}", request.user.email);
                self.notices.push(Notice::success("Teacher created."));
                self.dialog_open = false;
                self.form = TeacherForm::default();
                let search = self.search.clone();
                self.fetch(1, self.page_size, search).await;
                Ok(created)
            }
            Err(err) => {
                warn!("teachers: create failed email={}: {err}", request.user.email);
                self.notices.push(Notice::error(err.notice_text(CREATE_FAILED)));
                Err(err.into())
            }
        }
    }

    pub fn request_delete(&self, id: &TeacherId) -> ConfirmPrompt<TeacherId> {
        ConfirmPrompt {
            target: id.clone(),
            title: "Delete teacher".to_string(),
            message: "Are you sure you want to delete this teacher?".to_string(),
        }
    }

    /// Re-fetches the page the user is on; whatever the backend returns for
    /// it is shown, even if the page is now empty.
    pub async fn resolve_delete(
        &mut self,
        prompt: ConfirmPrompt<TeacherId>,
        confirmed: bool,
    ) -> Result<bool, ClientError> {
        if !confirmed {
            return Ok(false);
        }

        match self.api.delete_teacher(&prompt.target).await {
            Ok(()) => {
                info!("teachers: deleted id={}", prompt.target);
                self.notices.push(Notice::success("Teacher deleted."));
                self.reload().await;
                Ok(true)
            }
            Err(err) => {
                warn!("teachers: delete failed id={}: {err}", prompt.target);
                self.notices.push(Notice::error(err.notice_text(DELETE_FAILED)));
                Err(err)
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/teachers_tests.rs"]
mod tests;
