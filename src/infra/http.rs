use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Url};
use tokio_rustls::TlsConnector;

use crate::config::ClientConfig;
use crate::error::{AppError, AppResult};
use crate::infra::socket;
use crate::services::Transport;

pub struct HttpTransport {
    http: Client,
    endpoint: Url,
    connect_timeout: Duration,
    tls: TlsConnector,
}

impl HttpTransport {
    pub fn new(config: &ClientConfig) -> AppResult<Self> {
        Ok(Self {
            http: Client::new(),
            endpoint: config.endpoint.clone(),
            connect_timeout: config.connect_timeout,
            tls: socket::tls_connector()?,
        })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post(&self, body: String) -> AppResult<String> {
        let response = self
            .http
            .post(self.endpoint.clone())
            .header(CONTENT_TYPE, "text/plain")
            .body(body)
            .send()
            .await
            .map_err(|err| AppError::Http(format!("failed to reach {}: {err}", self.endpoint)))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|err| AppError::Http(format!("failed to read response: {err}")))?;

        if !status.is_success() {
            return Err(AppError::Http(format!(
                "backend responded with {status}: {text}"
            )));
        }

        Ok(text)
    }

    async fn post_detached(&self, body: String) -> AppResult<()> {
        socket::send_detached(&self.endpoint, &body, self.connect_timeout, &self.tls).await
    }
}
