/**
 * Client Transports
 *
 * A `Transport` carries one long-poll for the poller. Two are provided:
 *
 * - `HttpTransport` talks to a `sheetsync-server` over HTTP with reqwest and
 *   also exposes the rest of the session API (create, join, leave, publish,
 *   snapshot, evict).
 * - `LocalTransport` calls a `SessionRegistry` in the same process.
 */

use crate::client::config::ClientConfig;
use crate::client::error::ClientError;
use crate::shared::protocol::{
    CreateSessionRequest, JoinResponse, LeaveRequest, LeaveResponse, PublishRequest,
    PublishResponse, SessionSnapshot, SubscribeQuery, SubscribeResponse,
};
use crate::shared::{Edit, Message, MessageId, ParticipantId};
use reqwest::{Client, Response, Url};
use serde::de::DeserializeOwned;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

/// Carries long-poll requests for a `ClientPoller`
pub trait Transport: Send + Sync {
    /// Long-poll for messages after `cursor`, waiting at most `timeout`
    ///
    /// Session outcomes (`Gap`, `InvalidCursor`, `SessionClosed`) come back
    /// as `ClientError::Sync`; anything else is a transport failure.
    fn subscribe(
        &self,
        cursor: MessageId,
        timeout: Duration,
    ) -> impl Future<Output = Result<Vec<Message>, ClientError>> + Send;
}

impl<T: Transport> Transport for Arc<T> {
    fn subscribe(
        &self,
        cursor: MessageId,
        timeout: Duration,
    ) -> impl Future<Output = Result<Vec<Message>, ClientError>> + Send {
        (**self).subscribe(cursor, timeout)
    }
}

/// HTTP client for one session
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    config: ClientConfig,
    session_id: String,
    participant: Option<ParticipantId>,
}

impl HttpTransport {
    pub fn new(config: ClientConfig, session_id: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            config,
            session_id: session_id.into(),
            participant: None,
        }
    }

    /// Tag long-polls with an already-allocated participant id
    pub fn with_participant(mut self, participant: ParticipantId) -> Self {
        self.participant = Some(participant);
        self
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn participant(&self) -> Option<ParticipantId> {
        self.participant
    }

    /// `{server}/sessions/{id}/{suffix..}` with the id encoded as one segment
    fn session_url(&self, suffix: &[&str]) -> Result<Url, ClientError> {
        let mut url = Url::parse(self.config.server_url())
            .map_err(|e| ClientError::InvalidUrl(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidUrl(self.config.server_url().to_string()))?
            .pop_if_empty()
            .push("sessions")
            .push(&self.session_id)
            .extend(suffix);
        Ok(url)
    }

    /// Create the session (or fetch it if it already exists)
    pub async fn create_session(&self, metadata: &str) -> Result<SessionSnapshot, ClientError> {
        let request = CreateSessionRequest {
            metadata: metadata.to_string(),
        };
        let response = self
            .client
            .post(self.session_url(&[])?)
            .json(&request)
            .send()
            .await?;
        decode(response).await
    }

    /// Current state of the session
    pub async fn snapshot(&self) -> Result<SessionSnapshot, ClientError> {
        let response = self.client.get(self.session_url(&[])?).send().await?;
        decode(response).await
    }

    /// Evict the session on the server
    pub async fn evict(&self) -> Result<(), ClientError> {
        let response = self.client.delete(self.session_url(&[])?).send().await?;
        check_status(response).await.map(|_| ())
    }

    /// Allocate a participant id and tag subsequent long-polls with it
    pub async fn join(&mut self) -> Result<ParticipantId, ClientError> {
        let response = self.client.post(self.session_url(&["join"])?).send().await?;
        let joined: JoinResponse = decode(response).await?;
        self.participant = Some(joined.participant_id);
        tracing::debug!(
            "[Client] Joined {} as participant {}",
            self.session_id,
            joined.participant_id
        );
        Ok(joined.participant_id)
    }

    /// Release this participant's pending long-polls
    ///
    /// Returns how many were cancelled; 0 if the transport never joined.
    pub async fn leave(&mut self) -> Result<usize, ClientError> {
        let Some(participant_id) = self.participant.take() else {
            return Ok(0);
        };
        let response = self
            .client
            .post(self.session_url(&["leave"])?)
            .json(&LeaveRequest { participant_id })
            .send()
            .await?;
        let left: LeaveResponse = decode(response).await?;
        Ok(left.cancelled_waiters)
    }

    /// Publish a batch of edits, returning the ids of those that survived
    pub async fn publish(&self, edits: Vec<Edit>) -> Result<Vec<MessageId>, ClientError> {
        let response = self
            .client
            .post(self.session_url(&["messages"])?)
            .json(&PublishRequest { edits })
            .send()
            .await?;
        let published: PublishResponse = decode(response).await?;
        Ok(published.ids)
    }
}

impl Transport for HttpTransport {
    async fn subscribe(
        &self,
        cursor: MessageId,
        timeout: Duration,
    ) -> Result<Vec<Message>, ClientError> {
        let query = SubscribeQuery {
            cursor,
            timeout_ms: Some(timeout.as_millis() as u64),
            participant: self.participant,
        };
        let response = self
            .client
            .get(self.session_url(&["updates"])?)
            .query(&query)
            .timeout(timeout + self.config.poller.request_grace())
            .send()
            .await?;
        let body: SubscribeResponse = decode(response).await?;
        Ok(body.into_result(&self.session_id, cursor)?)
    }
}

/// Fail on a non-success status, carrying the server's `error` field
async fn check_status(response: Response) -> Result<Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let text = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<serde_json::Value>(&text)
        .ok()
        .and_then(|body| body.get("error").and_then(|e| e.as_str()).map(str::to_string))
        .unwrap_or(text);
    Err(ClientError::Status {
        status: status.as_u16(),
        message,
    })
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let response = check_status(response).await?;
    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|e| ClientError::Decode(e.to_string()))
}

/// In-process transport over a shared `SessionRegistry`
#[cfg(feature = "server")]
#[derive(Clone)]
pub struct LocalTransport {
    registry: Arc<crate::backend::collab::SessionRegistry>,
    session_id: String,
    participant: Option<ParticipantId>,
}

#[cfg(feature = "server")]
impl LocalTransport {
    pub fn new(
        registry: Arc<crate::backend::collab::SessionRegistry>,
        session_id: impl Into<String>,
    ) -> Self {
        Self {
            registry,
            session_id: session_id.into(),
            participant: None,
        }
    }

    pub fn with_participant(mut self, participant: ParticipantId) -> Self {
        self.participant = Some(participant);
        self
    }
}

#[cfg(feature = "server")]
impl Transport for LocalTransport {
    async fn subscribe(
        &self,
        cursor: MessageId,
        timeout: Duration,
    ) -> Result<Vec<Message>, ClientError> {
        let timeout_ms = timeout.as_millis() as u64;
        Ok(self
            .registry
            .subscribe(&self.session_id, cursor, Some(timeout_ms), self.participant)
            .await?)
    }
}
