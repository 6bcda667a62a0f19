//! Query parameter models for the hospital server
//!
//! Raw query strings deserialize into the `*Params` structs; the `validate_*`
//! functions turn them into filters the core understands, or into the message
//! of a `400`.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use chrono::NaiveDate;
use hospital_core::filter::{DateFilter, RecordQuery, department_filter, parse_date};
use hospital_core::reporting::Timeframe;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::{ServerError, ServerResult};

/// `?search=` on the patient, appointment, admission and bill lists.
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub search: Option<String>,
}

impl SearchParams {
    pub fn query(&self) -> RecordQuery {
        RecordQuery::new().with_search(self.search.as_deref())
    }
}

/// `?search=&status=` on the insurance claim list.
#[derive(Debug, Default, Deserialize)]
pub struct ClaimParams {
    pub search: Option<String>,
    pub status: Option<String>,
}

impl ClaimParams {
    pub fn query(&self) -> RecordQuery {
        RecordQuery::new()
            .with_search(self.search.as_deref())
            .with_status(self.status.as_deref())
    }
}

/// `?department=&search=` on the staff list.
#[derive(Debug, Default, Deserialize)]
pub struct StaffParams {
    pub department: Option<String>,
    pub search: Option<String>,
}

impl StaffParams {
    pub fn query(&self) -> RecordQuery {
        RecordQuery::new()
            .with_department(self.department.as_deref())
            .with_search(self.search.as_deref())
    }
}

/// `?date=&department=&search=` on attendance and shift lists, and on the
/// attendance summary and report (where `date` picks the month).
#[derive(Debug, Default, Deserialize)]
pub struct RosterParams {
    pub date: Option<String>,
    pub department: Option<String>,
    pub search: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedRosterParams {
    pub date: Option<NaiveDate>,
    pub department: Option<String>,
    pub query: RecordQuery,
}

impl ValidatedRosterParams {
    /// The reference day for monthly rollups.
    pub fn reference_date(&self, today: NaiveDate) -> NaiveDate {
        self.date.unwrap_or(today)
    }
}

pub fn validate_roster_params(params: &RosterParams) -> Result<ValidatedRosterParams, String> {
    let date = match params.date.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(raw) => Some(parse_date(raw).map_err(|e| e.to_string())?),
    };
    let department = department_filter(params.department.as_deref());
    let query = RecordQuery::new()
        .with_search(params.search.as_deref())
        .with_department(department.as_deref())
        .with_date(date.map(DateFilter::Day).unwrap_or_default());
    Ok(ValidatedRosterParams {
        date,
        department,
        query,
    })
}

/// `?timeframe=` on the revenue rollup.
#[derive(Debug, Default, Deserialize)]
pub struct RevenueParams {
    pub timeframe: Option<String>,
}

pub fn validate_timeframe(params: &RevenueParams) -> Result<Timeframe, String> {
    match params.timeframe.as_deref().map(str::trim) {
        None | Some("") => Ok(Timeframe::default()),
        Some(raw) => raw.parse().map_err(|e: hospital_core::HospitalError| e.to_string()),
    }
}

/// `?startDate=&endDate=` on the revenue range report.
#[derive(Debug, Default, Deserialize)]
pub struct RangeParams {
    #[serde(rename = "startDate")]
    pub start_date: Option<String>,
    #[serde(rename = "endDate")]
    pub end_date: Option<String>,
}

pub fn validate_range(params: &RangeParams) -> Result<(NaiveDate, NaiveDate), String> {
    fn present(v: &Option<String>) -> Option<&str> {
        v.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }
    match (present(&params.start_date), present(&params.end_date)) {
        (Some(start), Some(end)) => {
            let start = parse_date(start).map_err(|e| e.to_string())?;
            let end = parse_date(end).map_err(|e| e.to_string())?;
            if end < start {
                return Err("End date must not be before start date".to_string());
            }
            Ok((start, end))
        }
        _ => Err("Start date and end date are required".to_string()),
    }
}

/// Decode a JSON body into a request payload, turning both malformed JSON and
/// shape mismatches into a `400`. A body over the size limit is a `413`.
pub fn parse_body<T: DeserializeOwned>(
    body: Result<Json<serde_json::Value>, JsonRejection>,
) -> ServerResult<T> {
    let Json(value) = body.map_err(|e| match e.status() {
        StatusCode::PAYLOAD_TOO_LARGE => ServerError::PayloadTooLarge,
        _ => ServerError::BadRequest(e.body_text()),
    })?;
    debug!("Request body: {}", value);
    serde_json::from_value(value)
        .map_err(|e| ServerError::BadRequest(format!("Invalid request body: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roster_params_treat_all_as_unset() {
        let params = RosterParams {
            date: Some("2024-03-04".to_string()),
            department: Some("all".to_string()),
            search: Some("  ".to_string()),
        };
        let validated = validate_roster_params(&params).unwrap();
        assert_eq!(validated.department, None);
        assert!(validated.query.search.is_empty());
        assert_eq!(
            validated.query.date,
            DateFilter::Day(NaiveDate::from_ymd_opt(2024, 3, 4).unwrap())
        );
    }

    #[test]
    fn test_roster_params_reject_bad_date() {
        let params = RosterParams {
            date: Some("March 4th".to_string()),
            ..Default::default()
        };
        assert!(validate_roster_params(&params).is_err());
    }

    #[test]
    fn test_timeframe_defaults_to_month() {
        assert_eq!(
            validate_timeframe(&RevenueParams::default()).unwrap(),
            Timeframe::Month
        );
        let params = RevenueParams {
            timeframe: Some("decade".to_string()),
        };
        assert!(validate_timeframe(&params).unwrap_err().contains("week, month, quarter, year"));
    }

    #[test]
    fn test_range_requires_both_dates() {
        let params = RangeParams {
            start_date: Some("2024-01-01".to_string()),
            end_date: None,
        };
        assert_eq!(
            validate_range(&params).unwrap_err(),
            "Start date and end date are required"
        );
        let params = RangeParams {
            start_date: Some("2024-01-01".to_string()),
            end_date: Some("2024-01-31T23:59:59Z".to_string()),
        };
        let (start, end) = validate_range(&params).unwrap();
        assert_eq!(end - start, chrono::Duration::days(30));
    }
}
