//! Unwrapping of collection responses.
//!
//! The backend does not wrap its collections consistently: a body may be the
//! envelope itself (`{ data: [...], total, page, limit }`), the envelope nested
//! one level under `data`, or a bare array. Everything here is infallible; a
//! body that fits none of those shapes yields an empty page with default meta.

use serde::{de::DeserializeOwned, Deserialize};
use serde_json::Value;
use shared::protocol::ListEnvelope;
use tracing::warn;

pub const DEFAULT_TOTAL: u64 = 0;
pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_LIMIT: u32 = 20;

/// Pagination fields exactly as the response carried them. A field that was
/// missing, non-numeric or zero is `None`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageMeta {
    pub total: Option<u64>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ListPage<T> {
    pub rows: Vec<T>,
    pub meta: PageMeta,
}

impl<T> ListPage<T> {
    pub fn total(&self) -> u64 {
        self.meta.total.unwrap_or(DEFAULT_TOTAL)
    }

    pub fn page(&self) -> u32 {
        self.meta.page.unwrap_or(DEFAULT_PAGE)
    }

    pub fn limit(&self) -> u32 {
        self.meta.limit.unwrap_or(DEFAULT_LIMIT)
    }
}

/// Shapes a list body is tried against.
#[derive(Deserialize)]
#[serde(untagged)]
enum ListBody {
    Envelope(ListEnvelope<Value>),
    Rows(Vec<Value>),
}

pub fn normalize_list<T: DeserializeOwned>(body: &Value) -> ListPage<T> {
    let Some(envelope) = parse_body(body) else {
        warn!("normalize: list body has no known shape, using an empty page");
        return ListPage {
            rows: Vec::new(),
            meta: PageMeta::default(),
        };
    };

    ListPage {
        rows: decode_rows(&envelope.data),
        meta: PageMeta {
            total: positive_number(envelope.total.as_ref()),
            page: positive_number(envelope.page.as_ref()).and_then(|n| u32::try_from(n).ok()),
            limit: positive_number(envelope.limit.as_ref()).and_then(|n| u32::try_from(n).ok()),
        },
    }
}

/// The body itself first, then whatever sits under its `data` key.
fn parse_body(body: &Value) -> Option<ListEnvelope<Value>> {
    let attempt = |value: &Value| match ListBody::deserialize(value) {
        Ok(ListBody::Envelope(envelope)) => Some(envelope),
        Ok(ListBody::Rows(rows)) => Some(ListEnvelope::unpaged(rows)),
        Err(_) => None,
    };
    attempt(body).or_else(|| body.get("data").and_then(attempt))
}

fn decode_rows<T: DeserializeOwned>(items: &[Value]) -> Vec<T> {
    items
        .iter()
        .enumerate()
        .filter_map(|(index, item)| match T::deserialize(item) {
            Ok(row) => Some(row),
            Err(err) => {
                warn!("normalize: dropping row index={index} that does not fit: {err}");
                None
            }
        })
        .collect()
}

/// Numbers and numeric strings count; zero, negatives and anything else do not.
fn positive_number(value: Option<&Value>) -> Option<u64> {
    let parsed = match value? {
        Value::Number(number) => number.as_f64()?,
        Value::String(text) => text.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    if parsed.is_finite() && parsed >= 1.0 {
        Some(parsed.trunc() as u64)
    } else {
        None
    }
}
