//! Aggregation and reporting.
//!
//! All rollups are computed from stored rows at request time; nothing derived
//! is ever persisted. Two families live here:
//!
//! - **Revenue**: payment totals per [`Timeframe`] window, growth against the
//!   preceding window and headline all-time / month / year totals.
//! - **Staffing**: the monthly attendance summary and per-department shift
//!   coverage for today's roster.
//!
//! The arithmetic is split into pure functions ([`revenue_growth`],
//! [`attendance_rate`], [`required_staff`], [`coverage`]) so the async entry
//! points only fetch and assemble.

use chrono::{Datelike, Days, Months, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

use crate::dto::{RevenueEntryDto, ShiftDto, StaffDto, format_all};
use crate::filter::{
    DateFilter, Predicate, RecordQuery, attendance_predicate, payment_predicate, shift_predicate,
    staff_predicate,
};
use crate::models::{Attendance, AttendanceStatus, Payment, Related, Shift, Staff};
use crate::store::{RecordStore, SortOrder};
use crate::{HospitalError, HospitalResult};

/// Departments whose coverage falls below this percentage are understaffed.
pub const LOW_COVERAGE_THRESHOLD: u32 = 70;

/// Revenue reporting period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Timeframe {
    Week,
    #[default]
    Month,
    Quarter,
    Year,
}

impl Timeframe {
    pub fn as_str(&self) -> &'static str {
        match self {
            Timeframe::Week => "week",
            Timeframe::Month => "month",
            Timeframe::Quarter => "quarter",
            Timeframe::Year => "year",
        }
    }

    /// The window containing `today`.
    ///
    /// - week: the 7 days ending today
    /// - month: the calendar month of today
    /// - quarter: the three calendar months ending with the current one
    /// - year: the calendar year of today
    pub fn current_window(&self, today: NaiveDate) -> DateWindow {
        match self {
            Timeframe::Week => DateWindow::new(today - Days::new(6), today),
            Timeframe::Month => {
                let start = month_start(today);
                DateWindow::new(start, last_day(start, 1))
            }
            Timeframe::Quarter => {
                let start = month_start(today) - Months::new(2);
                DateWindow::new(start, last_day(start, 3))
            }
            Timeframe::Year => {
                let start = today - Days::new(u64::from(today.ordinal0()));
                DateWindow::new(start, last_day(start, 12))
            }
        }
    }

    /// The window of equal semantic length immediately before
    /// [`current_window`](Self::current_window).
    pub fn previous_window(&self, today: NaiveDate) -> DateWindow {
        let current = self.current_window(today);
        let end = current.start - Days::new(1);
        let start = match self {
            Timeframe::Week => current.start - Days::new(7),
            Timeframe::Month => current.start - Months::new(1),
            Timeframe::Quarter => current.start - Months::new(3),
            Timeframe::Year => current.start - Months::new(12),
        };
        DateWindow::new(start, end)
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Timeframe {
    type Err = HospitalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "week" => Ok(Timeframe::Week),
            "month" => Ok(Timeframe::Month),
            "quarter" => Ok(Timeframe::Quarter),
            "year" => Ok(Timeframe::Year),
            _ => Err(HospitalError::Validation(format!(
                "Invalid timeframe '{}'. Must be one of: week, month, quarter, year",
                s
            ))),
        }
    }
}

/// Inclusive range of calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Number of days in the window, both ends counted.
    pub fn days(&self) -> u32 {
        let span = (self.end - self.start).num_days() + 1;
        u32::try_from(span).unwrap_or(0)
    }

    pub fn as_filter(&self) -> DateFilter {
        DateFilter::Range {
            start: self.start,
            end: self.end,
        }
    }
}

fn month_start(date: NaiveDate) -> NaiveDate {
    date - Days::new(u64::from(date.day0()))
}

/// Last day of the `months`-month span beginning at `start`.
fn last_day(start: NaiveDate, months: u32) -> NaiveDate {
    start + Months::new(months) - Days::new(1)
}

/// Percentage change from `previous` to `current`, rounded to two decimals.
///
/// A zero `previous` yields exactly `100.0`, including when `current` is also
/// zero.
pub fn revenue_growth(current: Decimal, previous: Decimal) -> f64 {
    if previous.is_zero() {
        return 100.0;
    }
    ((current - previous) / previous * Decimal::ONE_HUNDRED)
        .round_dp(2)
        .to_f64()
        .unwrap_or(0.0)
}

fn total(payments: &[Payment]) -> Decimal {
    payments.iter().map(|p| p.amount).sum()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevenueStats {
    #[serde(with = "rust_decimal::serde::float")]
    pub total_revenue: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub monthly_revenue: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub yearly_revenue: Decimal,
    pub revenue_growth: f64,
    #[serde(with = "rust_decimal::serde::float")]
    pub current_period_revenue: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub previous_period_revenue: Decimal,
    /// The growth figure came from an empty previous period.
    pub zero_baseline: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevenuePeriod {
    pub timeframe: Timeframe,
    pub current: DateWindow,
    pub previous: DateWindow,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevenueReport {
    pub stats: RevenueStats,
    pub revenue_data: Vec<RevenueEntryDto>,
    pub period: RevenuePeriod,
}

/// Revenue rollup for `timeframe` as seen on `today`.
///
/// Every payment counts regardless of its status; bills contribute nothing on
/// their own.
pub async fn revenue_report(
    store: &dyn RecordStore,
    timeframe: Timeframe,
    today: NaiveDate,
) -> HospitalResult<RevenueReport> {
    let current = timeframe.current_window(today);
    let previous = timeframe.previous_window(today);
    debug!(
        "Revenue {} window {}..={} against {}..={}",
        timeframe, current.start, current.end, previous.start, previous.end
    );

    let in_window = |window: DateWindow| {
        payment_predicate(&RecordQuery::new().with_date(window.as_filter()))
    };
    let current_payments = store.find_payments(&in_window(current)).await?;
    let previous_payments = store.find_payments(&in_window(previous)).await?;
    let all_payments = store.find_payments(&Predicate::any()).await?;

    let this_month = Timeframe::Month.current_window(today);
    let this_year = Timeframe::Year.current_window(today);
    let sum_within = |window: DateWindow| -> Decimal {
        all_payments
            .iter()
            .filter(|p| window.contains(p.payment_date.date_naive()))
            .map(|p| p.amount)
            .sum()
    };

    let current_total = total(&current_payments);
    let previous_total = total(&previous_payments);

    Ok(RevenueReport {
        stats: RevenueStats {
            total_revenue: total(&all_payments),
            monthly_revenue: sum_within(this_month),
            yearly_revenue: sum_within(this_year),
            revenue_growth: revenue_growth(current_total, previous_total),
            current_period_revenue: current_total,
            previous_period_revenue: previous_total,
            zero_baseline: previous_total.is_zero(),
        },
        revenue_data: current_payments.iter().map(RevenueEntryDto::from).collect(),
        period: RevenuePeriod {
            timeframe,
            current,
            previous,
        },
    })
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevenueRangeReport {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
    pub revenue_data: Vec<RevenueEntryDto>,
}

/// Payments between `start` and `end` inclusive, oldest first, with their total.
pub async fn revenue_range(
    store: &dyn RecordStore,
    start: NaiveDate,
    end: NaiveDate,
) -> HospitalResult<RevenueRangeReport> {
    let filter = DateFilter::range(start, end)?;
    let payments = store
        .find_payments(&payment_predicate(&RecordQuery::new().with_date(filter)))
        .await?;
    Ok(RevenueRangeReport {
        start_date: start,
        end_date: end,
        total: total(&payments),
        revenue_data: payments.iter().map(RevenueEntryDto::from).collect(),
    })
}

/// Share of possible staff-days marked present or late, as a percentage in
/// `[0, 100]` rounded to two decimals. No staff or no days gives `0`.
pub fn attendance_rate(present_or_late: usize, staff_count: usize, days: u32) -> f64 {
    let possible = staff_count as f64 * f64::from(days);
    if possible <= 0.0 {
        return 0.0;
    }
    let rate = (present_or_late as f64 / possible * 100.0).clamp(0.0, 100.0);
    (rate * 100.0).round() / 100.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceSummary {
    pub month: DateWindow,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    pub staff_count: usize,
    pub days_in_month: u32,
    pub total_records: usize,
    pub present: usize,
    pub absent: usize,
    pub late: usize,
    pub leave: usize,
    pub attendance_rate: f64,
}

/// Tally attendance rows over `month` for `staff_count` staff.
pub fn summarize_attendance<'a, I>(
    records: I,
    staff_count: usize,
    month: DateWindow,
    department: Option<String>,
) -> AttendanceSummary
where
    I: IntoIterator<Item = &'a Attendance>,
{
    let mut summary = AttendanceSummary {
        month,
        department,
        staff_count,
        days_in_month: month.days(),
        total_records: 0,
        present: 0,
        absent: 0,
        late: 0,
        leave: 0,
        attendance_rate: 0.0,
    };
    for record in records.into_iter().filter(|r| month.contains(r.date)) {
        summary.total_records += 1;
        match record.status {
            AttendanceStatus::Present => summary.present += 1,
            AttendanceStatus::Absent => summary.absent += 1,
            AttendanceStatus::Late => summary.late += 1,
            AttendanceStatus::Leave => summary.leave += 1,
        }
    }
    summary.attendance_rate = attendance_rate(
        summary.present + summary.late,
        summary.staff_count,
        summary.days_in_month,
    );
    summary
}

/// Attendance summary for the calendar month of `reference`.
pub async fn attendance_summary(
    store: &dyn RecordStore,
    reference: NaiveDate,
    department: Option<&str>,
) -> HospitalResult<AttendanceSummary> {
    let month = Timeframe::Month.current_window(reference);
    let query = RecordQuery::new()
        .with_department(department)
        .with_date(month.as_filter());

    let staff = store.find_staff(&staff_predicate(&query)).await?;
    let records = store
        .find_attendance(&attendance_predicate(&query), SortOrder::Ascending)
        .await?;

    Ok(summarize_attendance(
        records.iter().map(|row| &row.record),
        staff.len(),
        month,
        query.department.clone(),
    ))
}

/// Staff needed to cover `shifts` shifts at 70 %, rounded up.
pub fn required_staff(shifts: usize) -> usize {
    (shifts * 7).div_ceil(10)
}

/// `current / required` as a whole percentage capped at 100. A department
/// with nothing required is fully covered.
pub fn coverage(current: usize, required: usize) -> u32 {
    if required == 0 {
        return 100;
    }
    let percent = (current as f64 / required as f64 * 100.0).round();
    percent.min(100.0) as u32
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentWorkload {
    pub department: String,
    pub required_staff: usize,
    pub current_staff: usize,
    pub shifts_in_dept: usize,
    pub coverage: u32,
    pub understaffed: bool,
}

/// Coverage for every distinct department among `staff`, alphabetical.
pub fn department_workload(
    staff: &[Staff],
    shifts: &[Related<Shift, Staff>],
) -> Vec<DepartmentWorkload> {
    let mut counts: BTreeMap<&str, (usize, usize)> = BTreeMap::new();
    for member in staff {
        counts.entry(member.department.as_str()).or_default().0 += 1;
    }
    for shift in shifts {
        if let Some(entry) = counts.get_mut(shift.related.department.as_str()) {
            entry.1 += 1;
        }
    }

    counts
        .into_iter()
        .map(|(department, (current_staff, shifts_in_dept))| {
            let required = required_staff(shifts_in_dept);
            let coverage = coverage(current_staff, required);
            DepartmentWorkload {
                department: department.to_string(),
                required_staff: required,
                current_staff,
                shifts_in_dept,
                coverage,
                understaffed: coverage < LOW_COVERAGE_THRESHOLD,
            }
        })
        .collect()
}

/// Today's roster with per-department workload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterOverview {
    pub shifts: Vec<ShiftDto>,
    pub staff: Vec<StaffDto>,
    pub department_workload: Vec<DepartmentWorkload>,
}

pub async fn roster_overview(
    store: &dyn RecordStore,
    today: NaiveDate,
) -> HospitalResult<RosterOverview> {
    let shifts = store
        .find_shifts(
            &shift_predicate(&RecordQuery::new().with_date(DateFilter::Day(today))),
            SortOrder::Ascending,
        )
        .await?;
    let staff = store.find_staff(&Predicate::any()).await?;
    let department_workload = department_workload(&staff, &shifts);

    Ok(RosterOverview {
        shifts: format_all(shifts),
        staff: format_all(staff),
        department_workload,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NewAttendance, NewPayment, NewShift, NewStaff, PaymentStatus};
    use crate::store::MemoryStore;
    use chrono::{TimeZone, Utc};
    use rust_decimal_macros::dec;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_timeframe_windows() {
        let today = day(2024, 3, 15);

        let week = Timeframe::Week.current_window(today);
        assert_eq!((week.start, week.end), (day(2024, 3, 9), today));
        let prev = Timeframe::Week.previous_window(today);
        assert_eq!((prev.start, prev.end), (day(2024, 3, 2), day(2024, 3, 8)));

        let month = Timeframe::Month.current_window(today);
        assert_eq!((month.start, month.end), (day(2024, 3, 1), day(2024, 3, 31)));
        let prev = Timeframe::Month.previous_window(today);
        assert_eq!((prev.start, prev.end), (day(2024, 2, 1), day(2024, 2, 29)));

        let quarter = Timeframe::Quarter.current_window(today);
        assert_eq!((quarter.start, quarter.end), (day(2024, 1, 1), day(2024, 3, 31)));
        let prev = Timeframe::Quarter.previous_window(today);
        assert_eq!((prev.start, prev.end), (day(2023, 10, 1), day(2023, 12, 31)));

        let year = Timeframe::Year.previous_window(today);
        assert_eq!((year.start, year.end), (day(2023, 1, 1), day(2023, 12, 31)));
    }

    #[test]
    fn test_timeframe_parsing() {
        assert_eq!("Quarter".parse::<Timeframe>().unwrap(), Timeframe::Quarter);
        assert_eq!(Timeframe::default(), Timeframe::Month);
        let err = "fortnight".parse::<Timeframe>().unwrap_err();
        assert!(matches!(err, HospitalError::Validation(_)));
    }

    #[test]
    fn test_revenue_growth() {
        assert_eq!(revenue_growth(dec!(500), dec!(0)), 100.0);
        assert_eq!(revenue_growth(dec!(0), dec!(0)), 100.0);
        assert_eq!(revenue_growth(dec!(300), dec!(300)), 0.0);
        assert_eq!(revenue_growth(dec!(150), dec!(100)), 50.0);
        assert_eq!(revenue_growth(dec!(50), dec!(200)), -75.0);
        assert_eq!(revenue_growth(dec!(100), dec!(300)), -66.67);
    }

    #[test]
    fn test_attendance_rate_fixture() {
        let month = Timeframe::Month.current_window(day(2024, 4, 10));
        assert_eq!(month.days(), 30);

        let statuses = std::iter::repeat_n(AttendanceStatus::Present, 30)
            .chain(std::iter::repeat_n(AttendanceStatus::Late, 15))
            .chain(std::iter::repeat_n(AttendanceStatus::Absent, 5));
        let records: Vec<Attendance> = statuses
            .enumerate()
            .map(|(i, status)| Attendance {
                id: format!("a{}", i),
                staff_id: format!("s{}", i % 3),
                date: month.start + Days::new((i % 30) as u64),
                check_in: None,
                check_out: None,
                status,
                leave_type: None,
                leave_reason: None,
            })
            .collect();

        let summary = summarize_attendance(&records, 3, month, None);
        assert_eq!(summary.present, 30);
        assert_eq!(summary.late, 15);
        assert_eq!(summary.absent, 5);
        assert_eq!(summary.attendance_rate, 50.0);
    }

    #[test]
    fn test_attendance_rate_bounds() {
        assert_eq!(attendance_rate(10, 0, 30), 0.0);
        assert_eq!(attendance_rate(500, 1, 30), 100.0);
        assert_eq!(attendance_rate(1, 3, 30), 1.11);
    }

    #[test]
    fn test_required_staff_and_coverage() {
        assert_eq!(required_staff(0), 0);
        assert_eq!(required_staff(1), 1);
        assert_eq!(required_staff(3), 3);
        assert_eq!(required_staff(10), 7);
        assert_eq!(coverage(0, 0), 100);
        assert_eq!(coverage(5, 2), 100);
        assert_eq!(coverage(1, 3), 33);
        assert_eq!(coverage(2, 3), 67);
    }

    fn staff(id: &str, department: &str) -> Staff {
        Staff {
            id: id.to_string(),
            first_name: id.to_string(),
            last_name: "Test".to_string(),
            email: format!("{}@hospital.com", id),
            department: department.to_string(),
            role: "NURSE".to_string(),
            status: "active".to_string(),
            join_date: Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    fn shift_for(member: &Staff) -> Related<Shift, Staff> {
        let start = Utc.with_ymd_and_hms(2024, 3, 4, 8, 0, 0).unwrap();
        Related::new(
            Shift {
                id: format!("shift-{}", member.id),
                staff_id: member.id.clone(),
                date: start.date_naive(),
                start_time: start,
                end_time: start + chrono::Duration::hours(8),
            },
            member.clone(),
        )
    }

    #[test]
    fn test_department_workload() {
        let roster = vec![
            staff("a", "Surgery"),
            staff("b", "Emergency"),
            staff("c", "Pediatrics"),
        ];
        let mut shifts: Vec<_> = (0..5).map(|_| shift_for(&roster[1])).collect();
        shifts.push(shift_for(&roster[0]));

        let workload = department_workload(&roster, &shifts);
        let names: Vec<&str> = workload.iter().map(|w| w.department.as_str()).collect();
        assert_eq!(names, vec!["Emergency", "Pediatrics", "Surgery"]);

        let emergency = &workload[0];
        assert_eq!(emergency.shifts_in_dept, 5);
        assert_eq!(emergency.required_staff, 4);
        assert_eq!(emergency.coverage, 25);
        assert!(emergency.understaffed);

        let pediatrics = &workload[1];
        assert_eq!(pediatrics.required_staff, 0);
        assert_eq!(pediatrics.coverage, 100);
        assert!(!pediatrics.understaffed);

        assert_eq!(workload[2].coverage, 100);
    }

    async fn pay(store: &MemoryStore, bill_id: &str, amount: Decimal, date: NaiveDate) {
        store
            .create_payment(NewPayment {
                bill_id: bill_id.to_string(),
                amount,
                payment_date: date.and_hms_opt(12, 0, 0).unwrap().and_utc(),
                payment_method: "Card".to_string(),
                status: PaymentStatus::Completed,
                notes: None,
            })
            .await
            .unwrap();
    }

    async fn store_with_bill() -> (MemoryStore, String) {
        let store = MemoryStore::from_snapshot(crate::store::Snapshot {
            bills: vec![crate::models::Bill {
                id: "b1".to_string(),
                patient_id: "p1".to_string(),
                amount: dec!(1000),
                due_date: Utc::now(),
                status: Default::default(),
                notes: None,
                created_at: Utc::now(),
            }],
            ..Default::default()
        });
        (store, "b1".to_string())
    }

    #[tokio::test]
    async fn test_revenue_report_windows_and_headlines() {
        let (store, bill) = store_with_bill().await;
        let today = day(2024, 3, 15);
        pay(&store, &bill, dec!(200), day(2024, 3, 1)).await;
        pay(&store, &bill, dec!(100), day(2024, 3, 14)).await;
        pay(&store, &bill, dec!(200), day(2024, 2, 10)).await;
        pay(&store, &bill, dec!(50), day(2023, 12, 31)).await;

        let report = revenue_report(&store, Timeframe::Month, today).await.unwrap();
        assert_eq!(report.stats.current_period_revenue, dec!(300));
        assert_eq!(report.stats.previous_period_revenue, dec!(200));
        assert_eq!(report.stats.revenue_growth, 50.0);
        assert!(!report.stats.zero_baseline);
        assert_eq!(report.stats.total_revenue, dec!(550));
        assert_eq!(report.stats.monthly_revenue, dec!(300));
        assert_eq!(report.stats.yearly_revenue, dec!(500));
        let dates: Vec<u32> = report.revenue_data.iter().map(|e| e.date.day()).collect();
        assert_eq!(dates, vec![1, 14]);

        let week = revenue_report(&store, Timeframe::Week, today).await.unwrap();
        assert_eq!(week.stats.current_period_revenue, dec!(100));
        assert_eq!(week.stats.previous_period_revenue, dec!(0));
        assert_eq!(week.stats.revenue_growth, 100.0);
        assert!(week.stats.zero_baseline);
        assert_eq!(week.stats.total_revenue, report.stats.total_revenue);
    }

    #[tokio::test]
    async fn test_revenue_range() {
        let (store, bill) = store_with_bill().await;
        pay(&store, &bill, dec!(10.25), day(2024, 3, 1)).await;
        pay(&store, &bill, dec!(20), day(2024, 3, 31)).await;
        pay(&store, &bill, dec!(99), day(2024, 4, 1)).await;

        let report = revenue_range(&store, day(2024, 3, 1), day(2024, 3, 31))
            .await
            .unwrap();
        assert_eq!(report.total, dec!(30.25));
        assert_eq!(report.revenue_data.len(), 2);

        let err = revenue_range(&store, day(2024, 3, 31), day(2024, 3, 1))
            .await
            .unwrap_err();
        assert!(matches!(err, HospitalError::Validation(_)));
    }

    #[tokio::test]
    async fn test_attendance_summary_filters_department() {
        let store = MemoryStore::new();
        let mut ids = Vec::new();
        for (name, department) in [("ann", "Emergency"), ("bob", "Emergency"), ("cat", "Surgery")] {
            let member = store
                .create_staff(NewStaff {
                    first_name: name.to_string(),
                    last_name: "Test".to_string(),
                    email: format!("{}@hospital.com", name),
                    department: department.to_string(),
                    role: "NURSE".to_string(),
                    status: None,
                })
                .await
                .unwrap();
            ids.push(member.id);
        }
        for (id, date, status) in [
            (&ids[0], day(2024, 4, 1), AttendanceStatus::Present),
            (&ids[1], day(2024, 4, 1), AttendanceStatus::Late),
            (&ids[1], day(2024, 4, 2), AttendanceStatus::Leave),
            (&ids[2], day(2024, 4, 1), AttendanceStatus::Present),
            (&ids[0], day(2024, 3, 31), AttendanceStatus::Present),
        ] {
            store
                .create_attendance(NewAttendance {
                    staff_id: id.clone(),
                    date,
                    check_in: None,
                    check_out: None,
                    status,
                    leave_type: None,
                    leave_reason: None,
                })
                .await
                .unwrap();
        }

        let summary = attendance_summary(&store, day(2024, 4, 20), Some("Emergency"))
            .await
            .unwrap();
        assert_eq!(summary.staff_count, 2);
        assert_eq!(summary.total_records, 3);
        assert_eq!((summary.present, summary.late, summary.leave), (1, 1, 1));
        assert_eq!(summary.attendance_rate, attendance_rate(2, 2, 30));

        let everyone = attendance_summary(&store, day(2024, 4, 20), Some("all"))
            .await
            .unwrap();
        assert_eq!(everyone.staff_count, 3);
        assert_eq!(everyone.total_records, 4);
        assert!(everyone.department.is_none());
    }

    #[tokio::test]
    async fn test_roster_overview_counts_todays_shifts() {
        let store = MemoryStore::new();
        let member = store
            .create_staff(NewStaff {
                first_name: "Ann".to_string(),
                last_name: "Lee".to_string(),
                email: "ann@hospital.com".to_string(),
                department: "Emergency".to_string(),
                role: "NURSE".to_string(),
                status: None,
            })
            .await
            .unwrap();
        let today = day(2024, 3, 4);
        for date in [today, today, today.pred_opt().unwrap()] {
            let start = date.and_hms_opt(8, 0, 0).unwrap().and_utc();
            store
                .create_shift(NewShift {
                    staff_id: member.id.clone(),
                    date,
                    start_time: start,
                    end_time: start + chrono::Duration::hours(8),
                })
                .await
                .unwrap();
        }

        let overview = roster_overview(&store, today).await.unwrap();
        assert_eq!(overview.shifts.len(), 2);
        assert_eq!(overview.staff.len(), 1);
        let emergency = &overview.department_workload[0];
        assert_eq!(emergency.shifts_in_dept, 2);
        assert_eq!(emergency.required_staff, 2);
        assert_eq!(emergency.coverage, 50);
        assert!(emergency.understaffed);
    }
}
