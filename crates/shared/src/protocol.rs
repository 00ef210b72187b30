use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::{Education, PositionId, TeacherStatus};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePositionRequest {
    pub code: String,
    pub name: String,
    pub description: String,
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTeacherUser {
    pub username: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTeacherRequest {
    pub user: NewTeacherUser,
    pub status: TeacherStatus,
    pub education: Education,
    pub position_ids: Vec<PositionId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListTeachersQuery {
    pub page: u32,
    pub limit: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}

impl ListTeachersQuery {
    /// Blank search terms are dropped from the query string entirely.
    pub fn new(page: u32, limit: u32, search: &str) -> Self {
        let search = search.trim();
        Self {
            page: page.max(1),
            limit,
            search: (!search.is_empty()).then(|| search.to_string()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListPositionsQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

impl ListPositionsQuery {
    /// Explicitly asks for every row (`limit=0`).
    pub fn unbounded() -> Self {
        Self { limit: Some(0) }
    }
}

/// Collection envelope as the backend emits it. The paging fields stay raw
/// JSON because backends disagree on whether they are numbers or strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListEnvelope<T> {
    pub data: Vec<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<Value>,
}

impl<T> ListEnvelope<T> {
    pub fn unpaged(data: Vec<T>) -> Self {
        Self {
            data,
            total: None,
            page: None,
            limit: None,
        }
    }

    pub fn paged(data: Vec<T>, total: u64, page: u32, limit: u32) -> Self {
        Self {
            data,
            total: Some(total.into()),
            page: Some(page.into()),
            limit: Some(limit.into()),
        }
    }
}
