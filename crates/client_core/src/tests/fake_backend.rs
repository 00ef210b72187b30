//! In-memory stand-in for the admin backend used by the slice tests.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::StatusCode;
use shared::{
    domain::{Position, PositionId, PositionRef, Teacher, TeacherId, TeacherUser},
    protocol::{CreatePositionRequest, CreateTeacherRequest, ListPositionsQuery, ListTeachersQuery},
};
use tokio::sync::Mutex;

use crate::{
    error::{ClientError, ClientResult},
    normalize::{ListPage, PageMeta},
    AdminApi,
};

pub fn position(id: &str, code: &str, name: &str, description: &str) -> Position {
    Position {
        id: id.into(),
        code: code.into(),
        name: name.into(),
        description: description.into(),
        is_active: true,
    }
}

pub fn teacher(id: &str, username: &str) -> Teacher {
    Teacher {
        id: id.into(),
        code: None,
        user: TeacherUser {
            username: username.into(),
            email: format!("{}@school.vn", id),
            ..TeacherUser::default()
        },
        status: Default::default(),
        education: Default::default(),
        positions: Vec::new(),
    }
}

#[derive(Default)]
struct FakeState {
    positions: Vec<Position>,
    teachers: Vec<Teacher>,
    next_id: u32,
    calls: Vec<String>,
    fail_lists: bool,
    fail_position_lists: bool,
    fail_create: Option<(StatusCode, String)>,
    bare_create_replies: bool,
    teacher_queries: Vec<ListTeachersQuery>,
    position_queries: Vec<ListPositionsQuery>,
}

#[derive(Default)]
pub struct FakeBackend {
    state: Mutex<FakeState>,
}

fn not_found(what: &str) -> ClientError {
    ClientError::Http {
        status: StatusCode::NOT_FOUND,
        body: format!(r#"{{"message":"{what} not found"}}"#),
    }
}

fn unavailable() -> ClientError {
    ClientError::Http {
        status: StatusCode::SERVICE_UNAVAILABLE,
        body: "upstream down".to_string(),
    }
}

impl FakeBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub async fn seed_positions(&self, positions: Vec<Position>) {
        self.state.lock().await.positions = positions;
    }

    /// Teachers are listed newest first, so later entries show up first.
    pub async fn seed_teachers(&self, count: usize) {
        let mut state = self.state.lock().await;
        for index in 0..count {
            state
                .teachers
                .insert(0, teacher(&format!("t{index}"), &format!("Teacher {index}")));
        }
    }

    pub async fn fail_lists(&self, fail: bool) {
        self.state.lock().await.fail_lists = fail;
    }

    pub async fn fail_position_lists(&self, fail: bool) {
        self.state.lock().await.fail_position_lists = fail;
    }

    pub async fn fail_next_create(&self, status: StatusCode, body: &str) {
        self.state.lock().await.fail_create = Some((status, body.to_string()));
    }

    /// Creates still store the record but reply without echoing it.
    pub async fn bare_create_replies(&self, bare: bool) {
        self.state.lock().await.bare_create_replies = bare;
    }

    pub async fn calls(&self) -> Vec<String> {
        self.state.lock().await.calls.clone()
    }

    pub async fn teacher_queries(&self) -> Vec<ListTeachersQuery> {
        self.state.lock().await.teacher_queries.clone()
    }

    pub async fn position_queries(&self) -> Vec<ListPositionsQuery> {
        self.state.lock().await.position_queries.clone()
    }

    pub async fn teacher_count(&self) -> usize {
        self.state.lock().await.teachers.len()
    }
}

#[async_trait]
impl AdminApi for FakeBackend {
    async fn list_positions(&self, query: &ListPositionsQuery) -> ClientResult<ListPage<Position>> {
        let mut state = self.state.lock().await;
        state.calls.push("list_positions".into());
        state.position_queries.push(query.clone());
        if state.fail_lists || state.fail_position_lists {
            return Err(unavailable());
        }
        Ok(ListPage {
            rows: state.positions.clone(),
            meta: PageMeta::default(),
        })
    }

    async fn create_position(&self, request: &CreatePositionRequest) -> ClientResult<Option<Position>> {
        let mut state = self.state.lock().await;
        state.calls.push("create_position".into());
        if let Some((status, body)) = state.fail_create.take() {
            return Err(ClientError::Http { status, body });
        }
        state.next_id += 1;
        let created = Position {
            id: PositionId(format!("new-p{}", state.next_id)),
            code: request.code.clone(),
            name: request.name.clone(),
            description: request.description.clone(),
            is_active: request.is_active,
        };
        state.positions.push(created.clone());
        Ok((!state.bare_create_replies).then_some(created))
    }

    async fn delete_position(&self, id: &PositionId) -> ClientResult<()> {
        let mut state = self.state.lock().await;
        state.calls.push("delete_position".into());
        let before = state.positions.len();
        state.positions.retain(|position| &position.id != id);
        if state.positions.len() == before {
            return Err(not_found("Position"));
        }
        Ok(())
    }

    async fn list_teachers(&self, query: &ListTeachersQuery) -> ClientResult<ListPage<Teacher>> {
        let mut state = self.state.lock().await;
        state.calls.push("list_teachers".into());
        state.teacher_queries.push(query.clone());
        if state.fail_lists {
            return Err(unavailable());
        }

        let needle = query.search.as_deref().unwrap_or_default().to_lowercase();
        let matching: Vec<Teacher> = state
            .teachers
            .iter()
            .filter(|teacher| {
                teacher.user.username.to_lowercase().contains(&needle)
                    || teacher.user.email.to_lowercase().contains(&needle)
            })
            .cloned()
            .collect();
        let total = matching.len() as u64;
        let rows = crate::pagination::paginate(&matching, query.page, query.limit).to_vec();

        Ok(ListPage {
            rows,
            meta: PageMeta {
                total: (total > 0).then_some(total),
                page: Some(query.page),
                limit: (query.limit > 0).then_some(query.limit),
            },
        })
    }

    async fn create_teacher(&self, request: &CreateTeacherRequest) -> ClientResult<Option<Teacher>> {
        let mut state = self.state.lock().await;
        state.calls.push("create_teacher".into());
        if let Some((status, body)) = state.fail_create.take() {
            return Err(ClientError::Http { status, body });
        }
        state.next_id += 1;
        let positions = request
            .position_ids
            .iter()
            .filter_map(|id| state.positions.iter().find(|position| &position.id == id))
            .map(|position| PositionRef {
                id: Some(position.id.clone()),
                name: position.name.clone(),
                code: Some(position.code.clone()),
            })
            .collect();
        let created = Teacher {
            id: TeacherId(format!("new-t{}", state.next_id)),
            code: None,
            user: TeacherUser {
                username: request.user.username.clone(),
                email: request.user.email.clone(),
                phone: request.user.phone.clone(),
                address: request.user.address.clone(),
                code: None,
            },
            status: request.status,
            education: request.education.clone(),
            positions,
        };
        state.teachers.insert(0, created.clone());
        Ok((!state.bare_create_replies).then_some(created))
    }

    async fn delete_teacher(&self, id: &TeacherId) -> ClientResult<()> {
        let mut state = self.state.lock().await;
        state.calls.push("delete_teacher".into());
        let before = state.teachers.len();
        state.teachers.retain(|teacher| &teacher.id != id);
        if state.teachers.len() == before {
            return Err(not_found("Teacher"));
        }
        Ok(())
    }
}
