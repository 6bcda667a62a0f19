use chrono::{NaiveDate, Utc};
use hospital_core::models::{
    AttendanceStatus, NewAttendance, NewBill, NewPatient, NewPayment, NewStaff, Patient,
    PaymentStatus, Staff,
};
use hospital_core::{MemoryStore, RecordStore};
use rust_decimal::Decimal;

pub fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub async fn add_patient(store: &MemoryStore, first: &str, last: &str) -> Patient {
    store
        .create_patient(NewPatient {
            first_name: first.to_string(),
            last_name: last.to_string(),
            date_of_birth: day(1985, 6, 1),
            gender: "Other".to_string(),
            email: None,
            phone: "555-0199".to_string(),
            address: None,
        })
        .await
        .unwrap()
}

pub async fn add_bill(store: &MemoryStore, patient: &Patient, amount: Decimal) -> String {
    store
        .create_bill(NewBill {
            patient_id: patient.id.clone(),
            amount,
            due_date: Utc::now(),
            notes: None,
        })
        .await
        .unwrap()
        .record
        .id
}

pub async fn add_payment(store: &MemoryStore, bill_id: &str, amount: Decimal, on: NaiveDate) {
    store
        .create_payment(NewPayment {
            bill_id: bill_id.to_string(),
            amount,
            payment_date: on.and_hms_opt(10, 30, 0).unwrap().and_utc(),
            payment_method: "Card".to_string(),
            status: PaymentStatus::Completed,
            notes: None,
        })
        .await
        .unwrap();
}

pub async fn add_staff(store: &MemoryStore, first: &str, department: &str) -> Staff {
    store
        .create_staff(NewStaff {
            first_name: first.to_string(),
            last_name: "Staff".to_string(),
            email: format!("{}@hospital.com", first.to_lowercase()),
            department: department.to_string(),
            role: "NURSE".to_string(),
            status: None,
        })
        .await
        .unwrap()
}

pub async fn mark(store: &MemoryStore, staff: &Staff, on: NaiveDate, status: AttendanceStatus) {
    store
        .create_attendance(NewAttendance {
            staff_id: staff.id.clone(),
            date: on,
            check_in: None,
            check_out: None,
            status,
            leave_type: None,
            leave_reason: None,
        })
        .await
        .unwrap();
}
