// loglook-api: Raw async client for the LogLook backend.
//
// Wire-faithful types and HTTP plumbing only. Normalization into domain
// types, feed pagination, and session state live in `loglook-core`.

pub mod client;
pub mod error;
pub mod transport;
pub mod types;

mod logs;
mod troubles;

pub use client::LogClient;
pub use error::Error;
pub use transport::TransportConfig;
pub use types::{
    DetailHit, DetailSource, RawLogEntry, SearchParams, TroubleCreate, TroubleListPage,
    TroubleReport, TroubleSummary, TroubleUpdate, TroubleWithLogs,
};
