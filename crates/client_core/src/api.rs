use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Client};
use serde::{de::DeserializeOwned, Serialize};
use shared::{
    domain::{GameVariant, SessionId},
    error::{ApiErrorBody, ProtocolError},
    protocol::{
        CreateSessionRequest, CreateSessionResponse, ServerVerdict, SessionCreated,
        SubmitAnswerRequest, SubmitAnswerResponse,
    },
};
use tracing::debug;

use crate::error::SessionApiError;

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const SESSION_ID_PLACEHOLDER: &str = "{session_id}";

/// Route layout of one backend. `submit_path` contains a `{session_id}` placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionEndpoints {
    pub create_path: String,
    pub submit_path: String,
}

impl SessionEndpoints {
    pub fn new(create_path: impl Into<String>, submit_path: impl Into<String>) -> Self {
        Self {
            create_path: create_path.into(),
            submit_path: submit_path.into(),
        }
    }

    pub fn generic() -> Self {
        Self::new("/session", "/session/{session_id}/submit")
    }

    pub fn for_variant(variant: GameVariant) -> Self {
        match variant {
            GameVariant::QualityQuest => Self::new(
                "/api/create-session",
                format!(
                    "/api/v1/games/{}/sessions/{{session_id}}/response",
                    variant.game_id()
                ),
            ),
            GameVariant::RequirementRally => {
                Self::new("/rally/session", "/rally/session/{session_id}/submit")
            }
            GameVariant::UsabilityUniverse => {
                Self::new("/universe/session", "/universe/session/{session_id}/submit")
            }
        }
    }

    pub fn create_url(&self, base_url: &str) -> String {
        join_url(base_url, &self.create_path)
    }

    pub fn submit_url(&self, base_url: &str, session_id: &SessionId) -> String {
        join_url(
            base_url,
            &self
                .submit_path
                .replace(SESSION_ID_PLACEHOLDER, session_id.as_str()),
        )
    }
}

fn join_url(base_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

#[async_trait]
pub trait SessionApi: Send + Sync {
    async fn create_session(
        &self,
        request: &CreateSessionRequest,
    ) -> Result<SessionCreated, SessionApiError>;

    async fn submit_answer(
        &self,
        session_id: &SessionId,
        request: &SubmitAnswerRequest,
    ) -> Result<ServerVerdict, SessionApiError>;
}

/// Stand-in used for offline play; every call reports the backend as unavailable.
pub struct MissingSessionApi;

#[async_trait]
impl SessionApi for MissingSessionApi {
    async fn create_session(
        &self,
        _request: &CreateSessionRequest,
    ) -> Result<SessionCreated, SessionApiError> {
        Err(SessionApiError::Unavailable)
    }

    async fn submit_answer(
        &self,
        _session_id: &SessionId,
        _request: &SubmitAnswerRequest,
    ) -> Result<ServerVerdict, SessionApiError> {
        Err(SessionApiError::Unavailable)
    }
}

pub struct HttpSessionApi {
    http: Client,
    base_url: String,
    endpoints: SessionEndpoints,
}

impl HttpSessionApi {
    pub fn new(
        base_url: impl Into<String>,
        endpoints: SessionEndpoints,
    ) -> Result<Self, SessionApiError> {
        Self::with_timeout(base_url, endpoints, DEFAULT_REQUEST_TIMEOUT)
    }

    pub fn with_timeout(
        base_url: impl Into<String>,
        endpoints: SessionEndpoints,
        timeout: Duration,
    ) -> Result<Self, SessionApiError> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(http, base_url, endpoints))
    }

    pub fn with_client(http: Client, base_url: impl Into<String>, endpoints: SessionEndpoints) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            endpoints,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn post_json<B, R>(&self, url: String, body: &B) -> Result<R, SessionApiError>
    where
        B: Serialize + Sync,
        R: DeserializeOwned,
    {
        debug!(url = %url, "session api: POST");
        let response = self
            .http
            .post(&url)
            .header(header::CACHE_CONTROL, "no-cache")
            .json(body)
            .send()
            .await?;

        let status = response.status();
        let raw = response.text().await?;
        if !status.is_success() {
            return Err(SessionApiError::Status {
                status: status.as_u16(),
                body: ApiErrorBody::describe(&raw),
            });
        }

        serde_json::from_str(&raw)
            .map_err(|err| SessionApiError::MalformedResponse(ProtocolError::Decode(err.to_string())))
    }
}

#[async_trait]
impl SessionApi for HttpSessionApi {
    async fn create_session(
        &self,
        request: &CreateSessionRequest,
    ) -> Result<SessionCreated, SessionApiError> {
        let url = self.endpoints.create_url(&self.base_url);
        let payload: CreateSessionResponse = self.post_json(url, request).await?;
        Ok(SessionCreated::try_from(payload)?)
    }

    async fn submit_answer(
        &self,
        session_id: &SessionId,
        request: &SubmitAnswerRequest,
    ) -> Result<ServerVerdict, SessionApiError> {
        let url = self.endpoints.submit_url(&self.base_url, session_id);
        let payload: SubmitAnswerResponse = self.post_json(url, request).await?;
        Ok(ServerVerdict::try_from(payload)?)
    }
}
