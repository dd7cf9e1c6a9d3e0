use std::time::Duration;

use api_types::{
    stats::Stats,
    transaction::{Transaction, TransactionId, TransactionPayload},
};
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, de::DeserializeOwned};

use crate::{Backend, TransportError};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// [`Backend`] speaking JSON over HTTP.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    base_url: Url,
    http: Client,
}

/// Error body some backends send along with a failure status.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(alias = "message")]
    error: String,
}

impl HttpBackend {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, TransportError> {
        let http = Client::builder().timeout(timeout).build()?;
        Self::with_client(http, base_url)
    }

    /// Uses an already configured client.
    pub fn with_client(http: Client, base_url: &str) -> Result<Self, TransportError> {
        let base_url =
            Url::parse(base_url).map_err(|err| TransportError::InvalidUrl(format!("{base_url}: {err}")))?;
        if base_url.cannot_be_a_base() {
            return Err(TransportError::InvalidUrl(base_url.to_string()));
        }
        Ok(Self { base_url, http })
    }

    pub fn builder() -> HttpBackendBuilder {
        HttpBackendBuilder::default()
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Appends path segments to the base url, escaping each of them.
    fn url(&self, segments: &[&str]) -> Result<Url, TransportError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| TransportError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T, TransportError> {
        let url = self.url(segments)?;
        tracing::debug!("GET {url}");
        let res = self.http.get(url).send().await?;
        let res = check_status(res).await?;
        res.json::<T>().await.map_err(decode_error)
    }

    async fn send(&self, req: RequestBuilder) -> Result<(), TransportError> {
        let res = req.send().await?;
        check_status(res).await?;
        Ok(())
    }
}

async fn check_status(res: reqwest::Response) -> Result<reqwest::Response, TransportError> {
    let status = res.status();
    if status.is_success() {
        return Ok(res);
    }

    let message = match res.json::<ErrorBody>().await {
        Ok(body) => body.error,
        Err(_) => status
            .canonical_reason()
            .unwrap_or("server error")
            .to_string(),
    };
    tracing::debug!("backend answered {status}: {message}");
    Err(TransportError::Status {
        status: status.as_u16(),
        message,
    })
}

fn decode_error(err: reqwest::Error) -> TransportError {
    if err.is_decode() {
        TransportError::Decode(err.to_string())
    } else {
        TransportError::Network(err)
    }
}

impl Backend for HttpBackend {
    async fn list_transactions(&self) -> Result<Vec<Transaction>, TransportError> {
        self.get_json(&["transactions"]).await
    }

    async fn stats(&self) -> Result<Stats, TransportError> {
        self.get_json(&["stats"]).await
    }

    async fn create_transaction(&self, payload: &TransactionPayload) -> Result<(), TransportError> {
        let url = self.url(&["transactions"])?;
        tracing::debug!("POST {url}");
        self.send(self.http.post(url).json(payload)).await
    }

    async fn update_transaction(
        &self,
        id: &TransactionId,
        payload: &TransactionPayload,
    ) -> Result<(), TransportError> {
        let url = self.url(&["transactions", id.as_str()])?;
        tracing::debug!("PUT {url}");
        self.send(self.http.put(url).json(payload)).await
    }

    async fn delete_transaction(&self, id: &TransactionId) -> Result<(), TransportError> {
        let url = self.url(&["transactions", id.as_str()])?;
        tracing::debug!("DELETE {url}");
        self.send(self.http.delete(url)).await
    }
}

#[derive(Default, Debug)]
pub struct HttpBackendBuilder {
    base_url: String,
    timeout: Option<Duration>,
}

impl HttpBackendBuilder {
    pub fn base_url(mut self, base_url: &str) -> HttpBackendBuilder {
        self.base_url = base_url.to_string();
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> HttpBackendBuilder {
        self.timeout = Some(timeout);
        self
    }

    pub fn build(self) -> Result<HttpBackend, TransportError> {
        tracing::debug!("Initializing http backend for {}", self.base_url);
        HttpBackend::new(&self.base_url, self.timeout.unwrap_or(DEFAULT_TIMEOUT))
    }
}
