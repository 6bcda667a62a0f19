//! Query/filter builder.
//!
//! Turns an optional free-text search string and optional structured filters
//! into a [`Predicate`] the [`RecordStore`](crate::store::RecordStore)
//! evaluates row by row. Building a predicate is pure and deterministic.
//!
//! Rules shared by every resource:
//! - free text matches case-insensitively as a substring of any of the
//!   resource's search fields (OR across fields)
//! - structured filters are AND-combined with the text clause
//! - an unset filter places no constraint; a blank search string and the
//!   department value `"all"` count as unset

use chrono::{DateTime, NaiveDate, Utc};
use std::fmt;

use crate::models::{
    Admission, Appointment, Attendance, Bill, InsuranceClaim, Patient, Payment, Related, Shift,
    Staff,
};
use crate::{HospitalError, HospitalResult};

type Clause<T> = Box<dyn Fn(&T) -> bool + Send + Sync>;

/// A conjunction of row clauses. An empty predicate matches every row.
pub struct Predicate<T> {
    clauses: Vec<Clause<T>>,
}

impl<T> Predicate<T> {
    /// A predicate with no constraint.
    pub fn any() -> Self {
        Self {
            clauses: Vec::new(),
        }
    }

    /// Add a clause that every matching row must satisfy.
    pub fn and<F>(mut self, clause: F) -> Self
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        self.clauses.push(Box::new(clause));
        self
    }

    pub fn matches(&self, row: &T) -> bool {
        self.clauses.iter().all(|clause| clause(row))
    }

    pub fn is_unconstrained(&self) -> bool {
        self.clauses.is_empty()
    }
}

impl<T> Default for Predicate<T> {
    fn default() -> Self {
        Self::any()
    }
}

impl<T> fmt::Debug for Predicate<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Predicate")
            .field("clauses", &self.clauses.len())
            .finish()
    }
}

/// Normalized free-text search. `None` means no text constraint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchText(Option<String>);

impl SearchText {
    pub fn new(raw: Option<&str>) -> Self {
        let needle = raw
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase);
        Self(needle)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_none()
    }

    /// True when there is no needle or any field contains it.
    pub fn matches_any<'a, I>(&self, fields: I) -> bool
    where
        I: IntoIterator<Item = &'a str>,
    {
        match &self.0 {
            None => true,
            Some(needle) => fields
                .into_iter()
                .any(|field| field.to_lowercase().contains(needle.as_str())),
        }
    }
}

/// Normalize a department filter: blank and `"all"` mean unset.
pub fn department_filter(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty() && !s.eq_ignore_ascii_case("all"))
        .map(str::to_string)
}

/// Calendar-day constraint on a record's date.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DateFilter {
    #[default]
    Any,
    /// Exactly one day, used for attendance and shifts.
    Day(NaiveDate),
    /// Inclusive `[start, end]`, used for revenue.
    Range { start: NaiveDate, end: NaiveDate },
}

impl DateFilter {
    /// Build a range filter, rejecting an inverted range.
    pub fn range(start: NaiveDate, end: NaiveDate) -> HospitalResult<Self> {
        if end < start {
            return Err(HospitalError::Validation(format!(
                "End date {} is before start date {}",
                end, start
            )));
        }
        Ok(DateFilter::Range { start, end })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        match *self {
            DateFilter::Any => true,
            DateFilter::Day(day) => date == day,
            DateFilter::Range { start, end } => start <= date && date <= end,
        }
    }

    pub fn contains_instant(&self, instant: &DateTime<Utc>) -> bool {
        self.contains(instant.date_naive())
    }
}

/// Parse a calendar date given either as `YYYY-MM-DD` or as an RFC 3339
/// timestamp (its UTC date is used).
pub fn parse_date(raw: &str) -> HospitalResult<NaiveDate> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(date);
    }
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc).date_naive())
        .map_err(|_| {
            HospitalError::Validation(format!(
                "Invalid date '{}'. Expected YYYY-MM-DD or an RFC3339 timestamp",
                raw
            ))
        })
}

/// Parse an instant given as RFC 3339, or as `YYYY-MM-DD` meaning midnight UTC.
pub fn parse_instant(raw: &str) -> HospitalResult<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| {
            HospitalError::Validation(format!(
                "Invalid timestamp '{}'. Expected an RFC3339 timestamp or YYYY-MM-DD",
                raw
            ))
        })
}

/// The validated filters of one list request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordQuery {
    pub search: SearchText,
    pub department: Option<String>,
    pub date: DateFilter,
    pub status: Option<String>,
}

impl RecordQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search(mut self, raw: Option<&str>) -> Self {
        self.search = SearchText::new(raw);
        self
    }

    pub fn with_department(mut self, raw: Option<&str>) -> Self {
        self.department = department_filter(raw);
        self
    }

    pub fn with_date(mut self, date: DateFilter) -> Self {
        self.date = date;
        self
    }

    pub fn with_status(mut self, raw: Option<&str>) -> Self {
        self.status = raw
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);
        self
    }
}

fn with_search<T, F>(predicate: Predicate<T>, search: &SearchText, fields: F) -> Predicate<T>
where
    T: 'static,
    F: Fn(&T) -> Vec<&str> + Send + Sync + 'static,
{
    if search.is_empty() {
        return predicate;
    }
    let search = search.clone();
    predicate.and(move |row| search.matches_any(fields(row)))
}

fn with_department<T, F>(
    predicate: Predicate<T>,
    department: &Option<String>,
    field: F,
) -> Predicate<T>
where
    T: 'static,
    F: Fn(&T) -> &str + Send + Sync + 'static,
{
    match department.clone() {
        Some(department) => predicate.and(move |row| field(row) == department),
        None => predicate,
    }
}

fn with_date<T, F>(predicate: Predicate<T>, filter: DateFilter, field: F) -> Predicate<T>
where
    T: 'static,
    F: Fn(&T) -> NaiveDate + Send + Sync + 'static,
{
    if filter == DateFilter::Any {
        return predicate;
    }
    predicate.and(move |row| filter.contains(field(row)))
}

fn with_status<T, F>(predicate: Predicate<T>, status: &Option<String>, field: F) -> Predicate<T>
where
    T: 'static,
    F: Fn(&T) -> String + Send + Sync + 'static,
{
    match status.clone() {
        Some(status) => predicate.and(move |row| field(row).eq_ignore_ascii_case(&status)),
        None => predicate,
    }
}

/// Patients: first name, last name, phone.
pub fn patient_predicate(query: &RecordQuery) -> Predicate<Patient> {
    with_search(Predicate::any(), &query.search, |p: &Patient| {
        vec![p.first_name.as_str(), p.last_name.as_str(), p.phone.as_str()]
    })
}

/// Appointments: patient names and appointment type.
pub fn appointment_predicate(query: &RecordQuery) -> Predicate<Related<Appointment, Patient>> {
    with_search(
        Predicate::any(),
        &query.search,
        |row: &Related<Appointment, Patient>| {
            vec![
                row.related.first_name.as_str(),
                row.related.last_name.as_str(),
                row.record.appointment_type.as_str(),
            ]
        },
    )
}

/// Admissions: patient names and room number.
pub fn admission_predicate(query: &RecordQuery) -> Predicate<Related<Admission, Patient>> {
    with_search(
        Predicate::any(),
        &query.search,
        |row: &Related<Admission, Patient>| {
            vec![
                row.related.first_name.as_str(),
                row.related.last_name.as_str(),
                row.record.room_number.as_str(),
            ]
        },
    )
}

/// Bills: patient names and bill status.
pub fn bill_predicate(query: &RecordQuery) -> Predicate<Related<Bill, Patient>> {
    let predicate = with_search(
        Predicate::any(),
        &query.search,
        |row: &Related<Bill, Patient>| {
            vec![
                row.related.first_name.as_str(),
                row.related.last_name.as_str(),
                row.record.status.as_str(),
            ]
        },
    );
    with_status(predicate, &query.status, |row: &Related<Bill, Patient>| {
        row.record.status.to_string()
    })
}

/// Insurance claims: policy number, provider and patient names, plus an
/// exact status filter.
pub fn claim_predicate(query: &RecordQuery) -> Predicate<Related<InsuranceClaim, Patient>> {
    let predicate = with_search(
        Predicate::any(),
        &query.search,
        |row: &Related<InsuranceClaim, Patient>| {
            vec![
                row.record.policy_number.as_str(),
                row.record.provider.as_str(),
                row.related.first_name.as_str(),
                row.related.last_name.as_str(),
            ]
        },
    );
    with_status(
        predicate,
        &query.status,
        |row: &Related<InsuranceClaim, Patient>| row.record.status.clone(),
    )
}

/// Staff: names, email and department text, plus the department filter.
pub fn staff_predicate(query: &RecordQuery) -> Predicate<Staff> {
    let predicate = with_search(Predicate::any(), &query.search, |s: &Staff| {
        vec![
            s.first_name.as_str(),
            s.last_name.as_str(),
            s.email.as_str(),
            s.department.as_str(),
        ]
    });
    with_department(predicate, &query.department, |s: &Staff| s.department.as_str())
}

/// Attendance: staff names, the staff member's department and the day.
pub fn attendance_predicate(query: &RecordQuery) -> Predicate<Related<Attendance, Staff>> {
    let predicate = with_search(
        Predicate::any(),
        &query.search,
        |row: &Related<Attendance, Staff>| {
            vec![
                row.related.first_name.as_str(),
                row.related.last_name.as_str(),
            ]
        },
    );
    let predicate = with_department(
        predicate,
        &query.department,
        |row: &Related<Attendance, Staff>| row.related.department.as_str(),
    );
    with_date(predicate, query.date, |row: &Related<Attendance, Staff>| {
        row.record.date
    })
}

/// Shifts: the staff member's department and the shift day.
pub fn shift_predicate(query: &RecordQuery) -> Predicate<Related<Shift, Staff>> {
    let predicate = with_department(
        Predicate::any(),
        &query.department,
        |row: &Related<Shift, Staff>| row.related.department.as_str(),
    );
    with_date(predicate, query.date, |row: &Related<Shift, Staff>| {
        row.record.date
    })
}

/// Payments: the UTC day of `payment_date` and an optional status.
pub fn payment_predicate(query: &RecordQuery) -> Predicate<Payment> {
    let predicate = with_date(Predicate::any(), query.date, |p: &Payment| {
        p.payment_date.date_naive()
    });
    with_status(predicate, &query.status, |p: &Payment| p.status.to_string())
}
