mod common;

use chrono::Days;
use common::{add_bill, add_patient, add_payment, add_staff, day, mark};
use hospital_core::data_source::{normalize_source_path, open_store};
use hospital_core::export::attendance_report;
use hospital_core::reporting::{Timeframe, attendance_summary, revenue_report};
use hospital_core::{AttendanceStatus, BillStatus, MemoryStore, RecordStore};
use rust_decimal_macros::dec;
use std::io::Write;

#[tokio::test]
async fn test_marking_bill_paid_does_not_change_revenue() {
    let store = MemoryStore::new();
    let patient = add_patient(&store, "Grace", "Hopper").await;
    let today = day(2024, 5, 20);

    let settled = add_bill(&store, &patient, dec!(400)).await;
    add_payment(&store, &settled, dec!(400), day(2024, 5, 3)).await;
    let unpaid = add_bill(&store, &patient, dec!(900)).await;

    let before = revenue_report(&store, Timeframe::Month, today).await.unwrap();

    store
        .update_bill_status(&unpaid, BillStatus::Paid)
        .await
        .unwrap();
    let after = revenue_report(&store, Timeframe::Month, today).await.unwrap();

    assert_eq!(before.stats, after.stats);
    assert_eq!(after.stats.total_revenue, dec!(400));
    assert_eq!(after.revenue_data.len(), 1);
}

#[tokio::test]
async fn test_quarter_growth_against_previous_quarter() {
    let store = MemoryStore::new();
    let patient = add_patient(&store, "Alan", "Turing").await;
    let bill = add_bill(&store, &patient, dec!(10000)).await;
    let today = day(2024, 5, 15);

    // Mar..=May is current, Dec..=Feb is previous.
    add_payment(&store, &bill, dec!(1200), day(2024, 3, 1)).await;
    add_payment(&store, &bill, dec!(300), day(2024, 5, 15)).await;
    add_payment(&store, &bill, dec!(1000), day(2023, 12, 1)).await;
    add_payment(&store, &bill, dec!(5000), day(2023, 11, 30)).await;

    let report = revenue_report(&store, Timeframe::Quarter, today).await.unwrap();
    assert_eq!(report.stats.current_period_revenue, dec!(1500));
    assert_eq!(report.stats.previous_period_revenue, dec!(1000));
    assert_eq!(report.stats.revenue_growth, 50.0);
    assert_eq!(report.stats.yearly_revenue, dec!(1500));
    assert_eq!(report.stats.total_revenue, dec!(7500));
    assert_eq!(report.period.current.start, day(2024, 3, 1));
    assert_eq!(report.period.previous.end, day(2024, 2, 29));
}

#[tokio::test]
async fn test_three_staff_thirty_days_half_attendance() {
    let store = MemoryStore::new();
    let crew = [
        add_staff(&store, "Ann", "Emergency").await,
        add_staff(&store, "Ben", "Emergency").await,
        add_staff(&store, "Cy", "Emergency").await,
    ];
    let june = day(2024, 6, 1);
    for offset in 0..15u64 {
        let on = june + Days::new(offset);
        mark(&store, &crew[0], on, AttendanceStatus::Present).await;
        mark(&store, &crew[1], on, AttendanceStatus::Present).await;
        mark(&store, &crew[2], on, AttendanceStatus::Late).await;
    }
    mark(&store, &crew[0], day(2024, 6, 20), AttendanceStatus::Absent).await;

    let summary = attendance_summary(&store, day(2024, 6, 10), Some("Emergency"))
        .await
        .unwrap();
    assert_eq!(summary.days_in_month, 30);
    assert_eq!(summary.present + summary.late, 45);
    assert_eq!(summary.attendance_rate, 50.0);

    let unset = attendance_summary(&store, day(2024, 6, 10), Some("all"))
        .await
        .unwrap();
    assert_eq!(unset.attendance_rate, summary.attendance_rate);
}

#[tokio::test]
async fn test_report_rows_sorted_by_date_then_first_name() {
    let store = MemoryStore::new();
    let zed = add_staff(&store, "Zed", "Surgery").await;
    let amy = add_staff(&store, "Amy", "Surgery").await;
    let other = add_staff(&store, "Bob", "Pediatrics").await;
    mark(&store, &zed, day(2024, 6, 2), AttendanceStatus::Present).await;
    mark(&store, &amy, day(2024, 6, 2), AttendanceStatus::Leave).await;
    mark(&store, &zed, day(2024, 6, 1), AttendanceStatus::Late).await;
    mark(&store, &other, day(2024, 6, 1), AttendanceStatus::Present).await;

    let report = attendance_report(&store, day(2024, 6, 15), Some("Surgery"))
        .await
        .unwrap();
    assert_eq!(report.filename, "attendance-report-2024-06.csv");
    let text = String::from_utf8(report.body).unwrap();
    let names: Vec<&str> = text
        .lines()
        .skip(1)
        .map(|line| line.split(',').nth(1).unwrap())
        .collect();
    assert_eq!(names, vec!["\"Zed Staff\"", "\"Amy Staff\"", "\"Zed Staff\""]);
}

#[tokio::test]
async fn test_store_opens_from_snapshot_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{
            "patients": [{{
                "id": "p1", "firstName": "Ada", "lastName": "Lovelace",
                "dateOfBirth": "1990-12-10", "gender": "Female", "phone": "555",
                "status": "Active", "createdAt": "2024-01-01T00:00:00Z"
            }}],
            "bills": [{{
                "id": "b1", "patientId": "p1", "amount": 50, "dueDate": "2024-02-01T00:00:00Z",
                "status": "Overdue", "createdAt": "2024-01-01T00:00:00Z"
            }}]
        }}"#
    )
    .unwrap();

    let url = normalize_source_path(&file.path().to_string_lossy()).unwrap();
    let store = open_store(&url).await.unwrap();
    let detail = store.get_bill("b1").await.unwrap().unwrap();
    assert_eq!(detail.bill.status, BillStatus::Overdue);
    assert_eq!(detail.patient.first_name, "Ada");
}
