use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::error::{Result, WorkshopError};

pub const DEFAULT_ENDPOINT: &str = "http://localhost:8080";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(1);

/// Reaches the service the workshop deploys
#[async_trait]
pub trait EndpointProbe: Send + Sync {
    /// Address shown in manual-check instructions
    fn url(&self) -> &str;

    /// Succeeds when any response comes back, whatever its status code.
    async fn probe(&self) -> Result<()>;

    /// One GET and the body of that same response. The outer error means no
    /// response arrived; the inner one means the body could not be read.
    async fn fetch_body(&self) -> Result<Result<Vec<u8>>>;
}

/// Probe backed by a reqwest client with a request timeout
#[derive(Debug, Clone)]
pub struct HttpProbe {
    client: reqwest::Client,
    url: String,
}

impl HttpProbe {
    pub fn new(url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: url.to_string(),
        })
    }

    async fn send(&self) -> Result<reqwest::Response> {
        debug!("GET {}", self.url);
        Ok(self.client.get(&self.url).send().await?)
    }
}

#[async_trait]
impl EndpointProbe for HttpProbe {
    fn url(&self) -> &str {
        &self.url
    }

    async fn probe(&self) -> Result<()> {
        self.send().await.map(drop)
    }

    async fn fetch_body(&self) -> Result<Result<Vec<u8>>> {
        let response = self.send().await?;
        Ok(response
            .bytes()
            .await
            .map(|body| body.to_vec())
            .map_err(WorkshopError::from))
    }
}

/// Probe that answers with a fixed page or a fixed failure. Used for dryrun.
#[derive(Debug, Clone)]
pub struct StaticProbe {
    url: String,
    page: std::result::Result<String, String>,
}

impl StaticProbe {
    pub fn serving(body: impl Into<String>) -> Self {
        Self {
            url: DEFAULT_ENDPOINT.to_string(),
            page: Ok(body.into()),
        }
    }

    pub fn unreachable(message: impl Into<String>) -> Self {
        Self {
            url: DEFAULT_ENDPOINT.to_string(),
            page: Err(message.into()),
        }
    }
}

#[async_trait]
impl EndpointProbe for StaticProbe {
    fn url(&self) -> &str {
        &self.url
    }

    async fn probe(&self) -> Result<()> {
        self.fetch_body().await.map(drop)
    }

    async fn fetch_body(&self) -> Result<Result<Vec<u8>>> {
        match &self.page {
            Ok(body) => Ok(Ok(body.as_bytes().to_vec())),
            Err(message) => Err(WorkshopError::Command(message.clone())),
        }
    }
}
