// Log query endpoints: recent (expanding window), mainboard (chart
// window), search, and detail lookup.

use crate::client::LogClient;
use crate::error::Error;
use crate::types::{DetailHit, RawLogEntry, SearchParams, SearchResponse};

impl LogClient {
    /// Fetch the recent-log window for a project.
    ///
    /// `fetch_index` is 1-based and selects an expanding time window:
    /// each increment asks the backend for a strictly larger window, so
    /// consecutive responses overlap and must be deduplicated by the
    /// caller.
    pub async fn recent_logs(
        &self,
        project_id: &str,
        fetch_index: u32,
    ) -> Result<Vec<RawLogEntry>, Error> {
        let url = self.api_url("log/recent")?;
        self.get(
            url,
            &[
                ("project_id", project_id.to_string()),
                ("count", fetch_index.to_string()),
            ],
        )
        .await
    }

    /// Fetch the chart window for a project: all entries within the
    /// given period (`day`, `week`, or `month`).
    pub async fn mainboard_logs(
        &self,
        project_id: &str,
        log_time: &str,
    ) -> Result<Vec<RawLogEntry>, Error> {
        let url = self.api_url("log/mainboard")?;
        self.get(
            url,
            &[
                ("project_id", project_id.to_string()),
                ("log_time", log_time.to_string()),
            ],
        )
        .await
    }

    /// Search logs with optional filters.
    ///
    /// The backend answers with either a bare array or a `{results}`
    /// wrapper; both shapes are accepted.
    pub async fn search_logs(
        &self,
        project_id: &str,
        params: &SearchParams,
    ) -> Result<Vec<RawLogEntry>, Error> {
        let url = self.api_url("log/search")?;

        let mut query = vec![("project_id", project_id.to_string())];
        if let Some(ref q) = params.query {
            query.push(("query", q.clone()));
        }
        if let Some(ref kw) = params.keyword {
            query.push(("keyword", kw.clone()));
        }
        if let Some(ref level) = params.log_level {
            query.push(("log_level", level.clone()));
        }
        if let Some(ref start) = params.start_time {
            query.push(("start_time", start.clone()));
        }
        if let Some(ref end) = params.end_time {
            query.push(("end_time", end.clone()));
        }
        if let Some(limit) = params.limit {
            query.push(("k", limit.to_string()));
        }

        let resp: SearchResponse = self.get(url, &query).await?;
        Ok(resp.into_entries())
    }

    /// Fetch full detail documents for specific log ids.
    pub async fn log_detail(
        &self,
        project_id: &str,
        log_ids: &[String],
    ) -> Result<Vec<DetailHit>, Error> {
        let url = self.api_url("log/detail")?;

        let mut query = vec![("project_id", project_id.to_string())];
        for id in log_ids {
            query.push(("log_ids", id.clone()));
        }

        self.get(url, &query).await
    }
}
