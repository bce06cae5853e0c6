use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::config::ClientConfig;
use crate::domain::receipt::{TicketNumber, parse_acknowledgement};
use crate::domain::ticket::Ticket;
use crate::error::AppResult;
use crate::infra::HttpTransport;
use crate::services::Transport;

/// Sends tickets to the backend.
///
/// Every call is a single attempt; callers that want retries wrap the
/// client themselves.
#[derive(Clone)]
pub struct SubmissionClient {
    transport: Arc<dyn Transport>,
}

impl SubmissionClient {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    pub fn from_config(config: &ClientConfig) -> AppResult<Self> {
        Ok(Self::new(Arc::new(HttpTransport::new(config)?)))
    }

    pub fn from_env() -> AppResult<Self> {
        Self::from_config(&ClientConfig::load()?)
    }

    /// Submits all tickets in one request. An empty slice is still sent,
    /// as `[]`.
    pub async fn submit(&self, tickets: &[Ticket]) -> AppResult<TicketNumber> {
        let body = encode_batch(tickets)?;
        self.submit_raw(body).await
    }

    pub async fn submit_ticket(&self, ticket: &Ticket) -> AppResult<TicketNumber> {
        self.submit(std::slice::from_ref(ticket)).await
    }

    /// Submits a JSON array the caller built, e.g. from
    /// [`Ticket::to_submission_payload`] results of several tickets.
    pub async fn submit_raw(&self, json: impl Into<String>) -> AppResult<TicketNumber> {
        let json = json.into();
        debug!(bytes = json.len(), "submitting tickets");
        let response = self.transport.post(json).await?;

        match parse_acknowledgement(&response) {
            Ok(number) => {
                info!(ticket = %number, "backend logged submission");
                Ok(number)
            }
            Err(err) => {
                warn!(%err, "backend did not accept submission");
                Err(err)
            }
        }
    }

    /// Writes the submission and returns once it is on the wire. No
    /// acknowledgement is read, so backend-side failures go unnoticed.
    pub async fn submit_and_forget(&self, tickets: &[Ticket]) -> AppResult<()> {
        let body = encode_batch(tickets)?;
        self.submit_and_forget_raw(body).await
    }

    pub async fn submit_ticket_and_forget(&self, ticket: &Ticket) -> AppResult<()> {
        self.submit_and_forget(std::slice::from_ref(ticket)).await
    }

    pub async fn submit_and_forget_raw(&self, json: impl Into<String>) -> AppResult<()> {
        let json = json.into();
        debug!(bytes = json.len(), "submitting tickets without acknowledgement");
        self.transport.post_detached(json).await
    }
}

/// Serializes tickets into the JSON array the backend expects.
pub fn encode_batch(tickets: &[Ticket]) -> AppResult<String> {
    let payloads = tickets
        .iter()
        .map(Ticket::to_submission_payload)
        .collect::<AppResult<Vec<_>>>()?;
    Ok(serde_json::to_string(&payloads)?)
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use serde_json::Value;

    use super::*;
    use crate::error::AppError;

    /// Records request bodies and answers with a canned acknowledgement.
    struct MockTransport {
        reply: String,
        posted: Arc<Mutex<Vec<String>>>,
        detached: Arc<Mutex<Vec<String>>>,
    }

    impl MockTransport {
        fn replying(reply: &str) -> Self {
            Self {
                reply: reply.to_string(),
                posted: Arc::new(Mutex::new(Vec::new())),
                detached: Arc::new(Mutex::new(Vec::new())),
            }
        }
    }

    #[async_trait]
    impl Transport for MockTransport {
        async fn post(&self, body: String) -> AppResult<String> {
            self.posted.lock().unwrap().push(body);
            Ok(self.reply.clone())
        }

        async fn post_detached(&self, body: String) -> AppResult<()> {
            self.detached.lock().unwrap().push(body);
            Ok(())
        }
    }

    fn ticket(title: &str) -> Ticket {
        let mut ticket = Ticket::support(title);
        ticket.add_entry("something happened").unwrap();
        ticket
    }

    #[tokio::test]
    async fn submits_tickets_as_one_array() {
        let transport = MockTransport::replying("OK LOGGED COUNT:12345");
        let posted = transport.posted.clone();
        let client = SubmissionClient::new(Arc::new(transport));

        let number = client.submit(&[ticket("a"), ticket("b")]).await.unwrap();

        assert_eq!(number.as_str(), "12345");
        let bodies = posted.lock().unwrap();
        assert_eq!(bodies.len(), 1);
        let sent: Value = serde_json::from_str(&bodies[0]).unwrap();
        assert_eq!(sent[0]["Title"], "a");
        assert_eq!(sent[1]["Title"], "b");
    }

    #[tokio::test]
    async fn empty_batches_are_still_sent() {
        let transport = MockTransport::replying("OK LOGGED COUNT:0");
        let posted = transport.posted.clone();
        let client = SubmissionClient::new(Arc::new(transport));

        client.submit(&[]).await.unwrap();

        assert_eq!(posted.lock().unwrap().as_slice(), ["[]"]);
    }

    #[tokio::test]
    async fn invalid_tickets_never_reach_the_transport() {
        let transport = MockTransport::replying("OK LOGGED COUNT:1");
        let posted = transport.posted.clone();
        let client = SubmissionClient::new(Arc::new(transport));

        let err = client
            .submit(&[ticket("fine"), Ticket::support("no entries")])
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::NoEntries));
        assert!(posted.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn surfaces_backend_answers() {
        let client = SubmissionClient::new(Arc::new(MockTransport::replying("FAIL BAD COUNT:0")));
        let err = client.submit_ticket(&ticket("a")).await.unwrap_err();
        assert!(matches!(err, AppError::BackendRejected { .. }));

        let client = SubmissionClient::new(Arc::new(MockTransport::replying("garbage")));
        let err = client.submit_raw("[]").await.unwrap_err();
        assert!(matches!(err, AppError::MalformedResponse { .. }));
    }

    #[tokio::test]
    async fn fire_and_forget_uses_the_detached_path() {
        let transport = MockTransport::replying("unused");
        let posted = transport.posted.clone();
        let detached = transport.detached.clone();
        let client = SubmissionClient::new(Arc::new(transport));

        client.submit_ticket_and_forget(&ticket("a")).await.unwrap();
        client.submit_and_forget_raw("[{}]").await.unwrap();

        assert!(posted.lock().unwrap().is_empty());
        let bodies = detached.lock().unwrap();
        assert_eq!(bodies.len(), 2);
        assert!(bodies[0].starts_with(r#"[{"Workspace":2,"Title":"a""#));
        assert_eq!(bodies[1], "[{}]");
    }

    #[test]
    fn encodes_bulk_payloads() {
        let json = encode_batch(&[ticket("a")]).unwrap();
        assert_eq!(json, format!("[{}]", ticket("a").to_json().unwrap()));
    }
}
