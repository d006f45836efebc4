// Troubleshooting report endpoints: create, fetch, update, delete, list.

use std::time::Duration;

use crate::client::LogClient;
use crate::error::Error;
use crate::types::{TroubleCreate, TroubleListPage, TroubleReport, TroubleUpdate, TroubleWithLogs};

/// Report creation runs the backend's analysis pipeline synchronously,
/// so it gets a longer timeout than the transport default.
const CREATE_TIMEOUT: Duration = Duration::from_secs(60);

impl LogClient {
    /// Create a troubleshooting report from a user query and a set of
    /// related log ids.
    ///
    /// The backend answers synchronously. When its analysis could not
    /// finish in time it still returns a report whose name and content
    /// carry a "still in progress" notice; detecting that is the
    /// caller's concern.
    pub async fn create_trouble(&self, req: &TroubleCreate) -> Result<TroubleReport, Error> {
        let url = self.api_url("trouble")?;
        self.post(url, req, Some(CREATE_TIMEOUT)).await
    }

    /// Fetch a report together with its related log ids.
    pub async fn get_trouble(&self, trouble_id: &str) -> Result<TroubleWithLogs, Error> {
        let url = self.api_url(&format!("troubles/{trouble_id}"))?;
        self.get(url, &[]).await
    }

    /// Apply a partial update to a report.
    pub async fn update_trouble(
        &self,
        trouble_id: &str,
        req: &TroubleUpdate,
    ) -> Result<TroubleReport, Error> {
        let url = self.api_url(&format!("troubles/{trouble_id}"))?;
        self.put(url, req).await
    }

    /// Delete a report.
    pub async fn delete_trouble(&self, trouble_id: &str) -> Result<(), Error> {
        let url = self.api_url(&format!("troubles/{trouble_id}"))?;
        self.delete(url).await
    }

    /// List a project's reports, paginated.
    pub async fn list_troubles(
        &self,
        project_id: &str,
        page: u32,
        size: u32,
    ) -> Result<TroubleListPage, Error> {
        let url = self.api_url(&format!("project/{project_id}/troubles"))?;
        self.get(url, &[("page", page.to_string()), ("size", size.to_string())])
            .await
    }
}
