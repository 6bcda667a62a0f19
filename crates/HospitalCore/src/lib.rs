//! # Hospital Operations Core
//!
//! This crate holds the domain layer of the hospital operations service: the
//! stored record types, the persistence abstraction, the query/filter builder,
//! the DTO formatter and the reporting engine that derives revenue, attendance
//! and workload rollups from stored records.
//!
//! There are two consumers of this crate:
//! - `hospital-server` - the HTTP JSON API, one route handler per resource.
//! - `hospital-cli` - offline reporting over the same record store.
//!
//! ## Architecture
//!
//! Every request follows the same pipeline:
//!
//! ```text
//! query params ──► filter (Predicate<T>) ──► RecordStore ──► dto / reporting ──► response
//! ```
//!
//! - **Records** ([`models`]): typed rows, insert payloads and joined rows.
//! - **Persistence** ([`store::RecordStore`]): find/create/update over typed
//!   records. [`sql_store::SqlStore`] keeps them in SQLite;
//!   [`store::MemoryStore`] is the in-process implementation.
//! - **Filtering** ([`filter`]): free-text search and structured filters turned
//!   into predicates evaluated by the store.
//! - **Formatting** ([`dto`]): flat, display-ready wire shapes.
//! - **Reporting** ([`reporting`]): timeframe windows, revenue growth,
//!   attendance rates and department coverage.
//! - **Requests** ([`requests`]): create/update bodies and their validation.
//! - **Export** ([`export`]): the monthly attendance CSV report.
//! - **Client** ([`client`]): typed HTTP client, one method per endpoint.
//!
//! ## Example
//!
//! ```rust
//! use chrono::NaiveDate;
//! use hospital_core::reporting::{Timeframe, revenue_growth};
//! use rust_decimal_macros::dec;
//!
//! let today = NaiveDate::from_ymd_opt(2024, 5, 15).unwrap();
//! let window = Timeframe::Quarter.current_window(today);
//! assert_eq!(window.start, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
//!
//! // A zero baseline reports exactly 100 percent.
//! assert_eq!(revenue_growth(dec!(250), dec!(0)), 100.0);
//! ```

pub mod client;
pub mod data_source;
pub mod dto;
pub mod export;
pub mod filter;
pub mod models;
pub mod reporting;
pub mod requests;
pub mod sql_store;
pub mod store;

use thiserror::Error;

/// Comprehensive error type for record, reporting and client operations.
///
/// The HTTP layer maps the first three variants onto `400`, `404` and `409`;
/// every other variant is an unexpected failure and surfaces as a generic `500`.
#[derive(Debug, Error)]
pub enum HospitalError {
    /// A request payload or query parameter failed validation.
    ///
    /// Raised for missing required fields, unknown enum values and shifts whose
    /// end time is not after their start time.
    #[error("{0}")]
    Validation(String),

    /// A referenced record does not exist.
    #[error("{0}")]
    NotFound(String),

    /// A unique field (staff email) is already taken.
    #[error("{0}")]
    Conflict(String),

    /// The persistence service failed.
    #[error("Storage error: {0}")]
    Storage(String),

    /// The SQLite database rejected or failed a statement.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// JSON serialization/deserialization failed.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// CSV report generation failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// CSV writer internal error.
    #[error("CSV writer error: {0}")]
    CsvWriter(String),

    /// File I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid connection string or snapshot location.
    #[error("Invalid source: {0}")]
    InvalidSource(String),

    /// Snapshot file not found.
    #[error("Source not found: {0}")]
    SourceNotFound(String),

    /// Snapshot could not be read.
    #[error("Failed to read source: {0}")]
    SourceRead(String),

    /// Unsupported connection string scheme.
    #[error("Unsupported source protocol: {0}")]
    UnsupportedSourceProtocol(String),

    /// Transport failure in the HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with an error status.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },
}

/// Result alias used throughout the crate.
pub type HospitalResult<T> = Result<T, HospitalError>;

pub use models::{AttendanceStatus, BillStatus, PaymentStatus};
pub use sql_store::SqlStore;
pub use store::{MemoryStore, RecordStore};
