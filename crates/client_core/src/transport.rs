use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde_json::Value;
use shared::{
    domain::{Position, PositionId, Teacher, TeacherId},
    protocol::{CreatePositionRequest, CreateTeacherRequest, ListPositionsQuery, ListTeachersQuery},
};
use tracing::{debug, info, warn};
use url::Url;

use crate::{
    config::ClientConfig,
    error::{ClientError, ClientResult},
    normalize::{normalize_list, ListPage},
    AdminApi,
};

/// `reqwest` implementation of [`AdminApi`].
#[derive(Debug, Clone)]
pub struct AdminClient {
    http: Client,
    config: ClientConfig,
}

impl AdminClient {
    pub fn new(config: ClientConfig) -> ClientResult<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            http: builder.build()?,
            config,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn endpoint(&self, segments: &[&str]) -> ClientResult<Url> {
        let invalid = |reason: &str| ClientError::InvalidBaseUrl {
            url: self.config.base_url().to_string(),
            reason: reason.to_string(),
        };
        let mut url = Url::parse(self.config.base_url()).map_err(|err| invalid(&err.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| invalid("url cannot carry a path"))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn send(request: RequestBuilder) -> ClientResult<Response> {
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = match response.text().await {
                Ok(body) => body,
                Err(err) => {
                    warn!("transport: could not read error body status={status}: {err}");
                    String::new()
                }
            };
            return Err(ClientError::Http { status, body });
        }
        Ok(response)
    }

    async fn send_json(request: RequestBuilder) -> ClientResult<Value> {
        let bytes = Self::send(request).await?.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn send_list<T: serde::de::DeserializeOwned>(
        request: RequestBuilder,
    ) -> ClientResult<ListPage<T>> {
        let body = Self::send_json(request).await?;
        Ok(normalize_list(&body))
    }

    /// Some backends echo the created record inside a `data` wrapper, others
    /// reply with a bare acknowledgement. Either way the create went through.
    async fn send_created<T: serde::de::DeserializeOwned>(
        request: RequestBuilder,
        what: &str,
    ) -> ClientResult<Option<T>> {
        let body = Self::send_json(request).await?;
        let root = match body.get("data") {
            Some(inner @ Value::Object(_)) => inner,
            _ => &body,
        };
        match T::deserialize(root) {
            Ok(created) => Ok(Some(created)),
            Err(err) => {
                warn!("transport: created {what} but the reply has no usable record: {err}");
                Ok(None)
            }
        }
    }
}

#[async_trait]
impl AdminApi for AdminClient {
    async fn list_positions(&self, query: &ListPositionsQuery) -> ClientResult<ListPage<Position>> {
        let url = self.endpoint(&["positions"])?;
        debug!("transport: GET {url} limit={:?}", query.limit);
        Self::send_list(self.http.get(url).query(query)).await
    }

    async fn create_position(&self, request: &CreatePositionRequest) -> ClientResult<Option<Position>> {
        let url = self.endpoint(&["positions"])?;
        debug!("transport: POST {url} code={}", request.code);
        let created: Option<Position> =
            Self::send_created(self.http.post(url).json(request), "position").await?;
        info!(
            "transport: created position code={} id={:?}",
            request.code,
            created.as_ref().map(|position| position.id.as_str())
        );
        Ok(created)
    }

    async fn delete_position(&self, id: &PositionId) -> ClientResult<()> {
        // Deletion lives under a different collection name than list/create.
        let url = self.endpoint(&["teacher-positions", id.as_str()])?;
        debug!("transport: DELETE {url}");
        Self::send(self.http.delete(url)).await?;
        info!("transport: deleted position id={id}");
        Ok(())
    }

    async fn list_teachers(&self, query: &ListTeachersQuery) -> ClientResult<ListPage<Teacher>> {
        let url = self.endpoint(&["teachers"])?;
        debug!(
            "transport: GET {url} page={} limit={} search={:?}",
            query.page, query.limit, query.search
        );
        Self::send_list(self.http.get(url).query(query)).await
    }

    async fn create_teacher(&self, request: &CreateTeacherRequest) -> ClientResult<Option<Teacher>> {
        let url = self.endpoint(&["teachers"])?;
        debug!("transport: POST {url} username={}", request.user.username);
        let created: Option<Teacher> =
            Self::send_created(self.http.post(url).json(request), "teacher").await?;
        info!(
            "transport: created teacher email={} id={:?}",
            request.user.email,
            created.as_ref().map(|teacher| teacher.id.as_str())
        );
        Ok(created)
    }

    async fn delete_teacher(&self, id: &TeacherId) -> ClientResult<()> {
        let url = self.endpoint(&["teachers", id.as_str()])?;
        debug!("transport: DELETE {url}");
        Self::send(self.http.delete(url)).await?;
        info!("transport: deleted teacher id={id}");
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/transport_tests.rs"]
mod tests;
