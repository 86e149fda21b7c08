use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use shared::{
    domain::Employee,
    protocol::{RecordsEnvelope, SaveAck, GET_RECORDS_ROUTE, SAVE_RECORDS_ROUTE},
};
use tracing::{debug, warn};
use url::Url;

pub mod error;
pub mod store;
pub mod validation;
pub mod workspace;

pub use error::{StoreClosed, TransportError, WorkspaceError};
pub use store::{CommandOutcome, WorkspaceCommand, WorkspaceStore};
pub use validation::ValidationErrors;
pub use workspace::{DraftUpdate, RecordWorkspace, WorkspaceMode, WorkspaceState};

/// The records backend as seen by the workspace.
#[async_trait]
pub trait RecordService: Send + Sync {
    async fn fetch_employees(&self) -> Result<Vec<Employee>, TransportError>;

    /// Saves the full list. The request body is always a JSON array.
    async fn save_employees(&self, records: &[Employee]) -> Result<SaveAck, TransportError>;

    async fn save_employee(&self, record: &Employee) -> Result<SaveAck, TransportError> {
        self.save_employees(std::slice::from_ref(record)).await
    }
}

/// Upper bound for a single backend request made by `HttpRecordService::new`.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// `RecordService` over the backend's JSON HTTP API.
pub struct HttpRecordService {
    http: Client,
    base_url: Url,
}

impl HttpRecordService {
    pub fn new(base_url: &str) -> Result<Self, TransportError> {
        Self::with_timeout(base_url, DEFAULT_REQUEST_TIMEOUT)
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self, TransportError> {
        let http = Client::builder().timeout(timeout).build()?;
        Self::with_client(http, base_url)
    }

    pub fn with_client(http: Client, base_url: &str) -> Result<Self, TransportError> {
        Ok(Self {
            http,
            base_url: Url::parse(base_url.trim())?,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, route: &str) -> Result<Url, TransportError> {
        Ok(self.base_url.join(route)?)
    }
}

#[async_trait]
impl RecordService for HttpRecordService {
    async fn fetch_employees(&self) -> Result<Vec<Employee>, TransportError> {
        let url = self.endpoint(GET_RECORDS_ROUTE)?;
        debug!(%url, "fetching employee records");
        let response = self.http.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            warn!(%status, "GetRecords returned non-success status");
            return Err(TransportError::Status {
                status: status.as_u16(),
            });
        }

        let envelope: RecordsEnvelope = response.json().await?;
        Ok(envelope.into_records())
    }

    async fn save_employees(&self, records: &[Employee]) -> Result<SaveAck, TransportError> {
        let url = self.endpoint(SAVE_RECORDS_ROUTE)?;
        debug!(%url, count = records.len(), "saving employee records");
        let response = self.http.post(url).json(records).send().await?;

        let status = response.status();
        if !status.is_success() {
            warn!(%status, "SaveRecords returned non-success status");
            return Err(TransportError::Status {
                status: status.as_u16(),
            });
        }

        Ok(response.json().await?)
    }
}

#[cfg(test)]
#[path = "tests/fake_service.rs"]
pub(crate) mod fake_service;

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
