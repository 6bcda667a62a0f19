//! Monthly attendance CSV report.
//!
//! The header line is written bare; every data cell is quoted. Absent check
//! times and leave fields become empty cells. Rows run by day, then by staff
//! first name.

use chrono::{DateTime, NaiveDate, Utc};
use csv::{QuoteStyle, Terminator, WriterBuilder};

use crate::filter::{RecordQuery, attendance_predicate};
use crate::models::{Attendance, Related, Staff};
use crate::reporting::Timeframe;
use crate::store::{RecordStore, SortOrder};
use crate::{HospitalError, HospitalResult};

pub const REPORT_HEADERS: [&str; 8] = [
    "Date",
    "Staff Name",
    "Department",
    "Check In",
    "Check Out",
    "Status",
    "Leave Type",
    "Leave Reason",
];

/// A rendered report ready to be sent as an attachment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttendanceReport {
    pub filename: String,
    pub body: Vec<u8>,
}

/// `attendance-report-YYYY-MM.csv` for the month containing `month`.
pub fn report_filename(month: NaiveDate) -> String {
    format!("attendance-report-{}.csv", month.format("%Y-%m"))
}

fn clock(at: Option<&DateTime<Utc>>) -> String {
    at.map(|t| t.format("%H:%M").to_string()).unwrap_or_default()
}

fn report_row(row: &Related<Attendance, Staff>) -> [String; 8] {
    let Related {
        record,
        related: staff,
    } = row;
    [
        record.date.format("%Y-%m-%d").to_string(),
        staff.full_name(),
        staff.department.clone(),
        clock(record.check_in.as_ref()),
        clock(record.check_out.as_ref()),
        record.status.to_string(),
        record.leave_type.clone().unwrap_or_default(),
        record.leave_reason.clone().unwrap_or_default(),
    ]
}

/// Render rows in the order given.
pub fn render_attendance_csv(rows: &[Related<Attendance, Staff>]) -> HospitalResult<Vec<u8>> {
    let mut header = WriterBuilder::new()
        .quote_style(QuoteStyle::Necessary)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(vec![]);
    header.write_record(REPORT_HEADERS)?;
    let buffer = header
        .into_inner()
        .map_err(|e| HospitalError::CsvWriter(e.to_string()))?;

    let mut wtr = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(buffer);
    for row in rows {
        wtr.write_record(report_row(row))?;
    }
    wtr.into_inner()
        .map_err(|e| HospitalError::CsvWriter(e.to_string()))
}

/// Attendance CSV for the calendar month of `reference`.
pub async fn attendance_report(
    store: &dyn RecordStore,
    reference: NaiveDate,
    department: Option<&str>,
) -> HospitalResult<AttendanceReport> {
    let month = Timeframe::Month.current_window(reference);
    let query = RecordQuery::new()
        .with_department(department)
        .with_date(month.as_filter());
    let rows = store
        .find_attendance(&attendance_predicate(&query), SortOrder::Ascending)
        .await?;

    Ok(AttendanceReport {
        filename: report_filename(month.start),
        body: render_attendance_csv(&rows)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AttendanceStatus;
    use chrono::TimeZone;

    fn staff() -> Staff {
        Staff {
            id: "s1".to_string(),
            first_name: "Ann".to_string(),
            last_name: "Lee".to_string(),
            email: "ann@hospital.com".to_string(),
            department: "Emergency".to_string(),
            role: "NURSE".to_string(),
            status: "active".to_string(),
            join_date: Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_empty_check_out_cell() {
        let record = Attendance {
            id: "a1".to_string(),
            staff_id: "s1".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 3, 4).unwrap(),
            check_in: Some(Utc.with_ymd_and_hms(2024, 3, 4, 8, 5, 0).unwrap()),
            check_out: None,
            status: AttendanceStatus::Present,
            leave_type: None,
            leave_reason: None,
        };
        let body = render_attendance_csv(&[Related::new(record, staff())]).unwrap();
        let text = String::from_utf8(body).unwrap();
        assert_eq!(
            text,
            "Date,Staff Name,Department,Check In,Check Out,Status,Leave Type,Leave Reason\n\
             \"2024-03-04\",\"Ann Lee\",\"Emergency\",\"08:05\",\"\",\"Present\",\"\",\"\"\n"
        );
    }

    #[test]
    fn test_header_only_when_no_rows() {
        let body = render_attendance_csv(&[]).unwrap();
        assert_eq!(
            String::from_utf8(body).unwrap(),
            format!("{}\n", REPORT_HEADERS.join(","))
        );
    }

    #[test]
    fn test_report_filename() {
        let day = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        assert_eq!(report_filename(day), "attendance-report-2024-03.csv");
    }
}
