//! Client side of the school staff admin console: a typed wrapper around the
//! admin REST backend plus the headless view state of the positions and
//! teachers screens.

use async_trait::async_trait;
use shared::{
    domain::{Position, PositionId, Teacher, TeacherId},
    protocol::{CreatePositionRequest, CreateTeacherRequest, ListPositionsQuery, ListTeachersQuery},
};

pub mod config;
pub mod error;
pub mod forms;
pub mod normalize;
pub mod pagination;
pub mod positions;
pub mod sequence;
pub mod teachers;
pub mod transport;
pub mod view;

pub use config::{ClientConfig, DEFAULT_API_URL};
pub use error::{ClientError, ClientResult, SubmitError};
pub use forms::{ActiveChoice, PositionForm, SelectOption, TeacherForm};
pub use normalize::{normalize_list, ListPage, PageMeta};
pub use pagination::{PageSize, Pager};
pub use positions::PositionsSlice;
pub use teachers::TeachersSlice;
pub use transport::AdminClient;
pub use view::{ConfirmPrompt, LoadState, Notice, NoticeLevel};

/// Operations the admin backend offers. Slices only talk to the backend
/// through this trait.
///
/// A create succeeds on any 2xx JSON reply; the created record is `None` when
/// the reply does not echo it in a recognisable shape.
#[async_trait]
pub trait AdminApi: Send + Sync {
    async fn list_positions(&self, query: &ListPositionsQuery) -> ClientResult<ListPage<Position>>;
    async fn create_position(&self, request: &CreatePositionRequest) -> ClientResult<Option<Position>>;
    async fn delete_position(&self, id: &PositionId) -> ClientResult<()>;
    async fn list_teachers(&self, query: &ListTeachersQuery) -> ClientResult<ListPage<Teacher>>;
    async fn create_teacher(&self, request: &CreateTeacherRequest) -> ClientResult<Option<Teacher>>;
    async fn delete_teacher(&self, id: &TeacherId) -> ClientResult<()>;
}

#[cfg(test)]
#[path = "tests/fake_backend.rs"]
mod fake_backend;
