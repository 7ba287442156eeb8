use async_trait::async_trait;
use log::{debug, warn};
use reqwest::{Client, Url};

use crate::config::ClientConfig;
use crate::models::{HealthStatus, PatientRecord, PredictionResult};

pub const PREDICT_PATH: &str = "/api/predict";
pub const HEALTH_PATH: &str = "/api/health";

#[derive(Debug, thiserror::Error)]
pub enum PredictionError {
    #[error("invalid prediction service url '{0}'")]
    InvalidUrl(String),
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("prediction service unreachable: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("prediction service answered with status {0}")]
    Status(u16),
    #[error("prediction service sent an unreadable body: {0}")]
    Malformed(#[source] reqwest::Error),
}

/// The remote collaborator that turns a patient record into a risk prediction.
#[async_trait]
pub trait PredictionService: Send + Sync {
    async fn predict(&self, record: &PatientRecord) -> Result<PredictionResult, PredictionError>;

    async fn health(&self) -> Result<HealthStatus, PredictionError>;
}

pub struct HttpPredictionClient {
    http: Client,
    predict_url: Url,
    health_url: Url,
}

impl HttpPredictionClient {
    pub fn new(config: &ClientConfig) -> Result<Self, PredictionError> {
        let parse = |path: &str| {
            let raw = config.endpoint(path);
            Url::parse(&raw).map_err(|_| PredictionError::InvalidUrl(raw))
        };
        let predict_url = parse(PREDICT_PATH)?;
        let health_url = parse(HEALTH_PATH)?;

        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(PredictionError::Client)?;

        Ok(Self {
            http,
            predict_url,
            health_url,
        })
    }

    async fn read_json<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, PredictionError> {
        let status = response.status();
        if !status.is_success() {
            warn!("{} returned {}", response.url(), status);
            return Err(PredictionError::Status(status.as_u16()));
        }
        response.json::<T>().await.map_err(|e| {
            warn!("could not decode response body: {}", e);
            PredictionError::Malformed(e)
        })
    }
}

#[async_trait]
impl PredictionService for HttpPredictionClient {
    async fn predict(&self, record: &PatientRecord) -> Result<PredictionResult, PredictionError> {
        debug!("POST {}", self.predict_url);
        let response = self
            .http
            .post(self.predict_url.clone())
            .json(record)
            .send()
            .await
            .map_err(|e| {
                warn!("POST {} failed: {}", self.predict_url, e);
                PredictionError::Transport(e)
            })?;
        Self::read_json(response).await
    }

    async fn health(&self) -> Result<HealthStatus, PredictionError> {
        debug!("GET {}", self.health_url);
        let response = self
            .http
            .get(self.health_url.clone())
            .send()
            .await
            .map_err(|e| {
                warn!("GET {} failed: {}", self.health_url, e);
                PredictionError::Transport(e)
            })?;
        Self::read_json(response).await
    }
}
