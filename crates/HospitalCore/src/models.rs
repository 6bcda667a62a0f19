//! Stored record types.
//!
//! These are the rows the persistence service keeps. They serialize in
//! camelCase, which is also the snapshot file format loaded by
//! [`crate::data_source`]. Wire shapes live in [`crate::dto`].

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::{HospitalError, HospitalResult};

/// Lifecycle of a bill. Set explicitly through a status patch, never derived
/// from the payments recorded against it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum BillStatus {
    #[default]
    Pending,
    Paid,
    Overdue,
}

/// Outcome of a single payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum PaymentStatus {
    Pending,
    #[default]
    Completed,
    Failed,
}

/// Daily attendance outcome for one staff member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttendanceStatus {
    Present,
    Absent,
    Late,
    Leave,
}

macro_rules! status_enum_text {
    ($ty:ident, $label:literal, [$($variant:ident),+]) => {
        impl $ty {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($ty::$variant => stringify!($variant),)+
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = HospitalError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let trimmed = s.trim();
                $(
                    if trimmed.eq_ignore_ascii_case(stringify!($variant)) {
                        return Ok($ty::$variant);
                    }
                )+
                Err(HospitalError::Validation(format!(
                    "Invalid {} '{}'. Must be one of: {}",
                    $label,
                    s,
                    [$(stringify!($variant)),+].join(", ")
                )))
            }
        }
    };
}

status_enum_text!(BillStatus, "bill status", [Pending, Paid, Overdue]);
status_enum_text!(PaymentStatus, "payment status", [Pending, Completed, Failed]);
status_enum_text!(AttendanceStatus, "attendance status", [Present, Absent, Late, Leave]);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: NaiveDate,
    pub gender: String,
    #[serde(default)]
    pub email: Option<String>,
    pub phone: String,
    #[serde(default)]
    pub address: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: String,
    pub patient_id: String,
    pub date_time: DateTime<Utc>,
    pub status: String,
    #[serde(rename = "type")]
    pub appointment_type: String,
    #[serde(default)]
    pub notes: Option<String>,
}

/// A hospital stay. `status` is stored but the wire format derives it from
/// `discharge_date`; the two can drift if a row is edited outside the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Admission {
    pub id: String,
    pub patient_id: String,
    pub room_number: String,
    pub admission_date: DateTime<Utc>,
    #[serde(default)]
    pub discharge_date: Option<DateTime<Utc>>,
    pub status: String,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bill {
    pub id: String,
    pub patient_id: String,
    pub amount: Decimal,
    pub due_date: DateTime<Utc>,
    #[serde(default)]
    pub status: BillStatus,
    #[serde(default)]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Money actually received against a bill. Revenue rollups sum these rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: String,
    pub bill_id: String,
    pub amount: Decimal,
    pub payment_date: DateTime<Utc>,
    pub payment_method: String,
    #[serde(default)]
    pub status: PaymentStatus,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsuranceClaim {
    pub id: String,
    pub patient_id: String,
    pub provider: String,
    pub policy_number: String,
    pub claim_amount: Decimal,
    pub status: String,
    pub submission_date: DateTime<Utc>,
    #[serde(default)]
    pub response_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// A staff member. `department` is free text; the set of departments is
/// whatever distinct values these rows carry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Staff {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub department: String,
    pub role: String,
    pub status: String,
    pub join_date: DateTime<Utc>,
}

impl Staff {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attendance {
    pub id: String,
    pub staff_id: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub check_in: Option<DateTime<Utc>>,
    #[serde(default)]
    pub check_out: Option<DateTime<Utc>>,
    pub status: AttendanceStatus,
    #[serde(default)]
    pub leave_type: Option<String>,
    #[serde(default)]
    pub leave_reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shift {
    pub id: String,
    pub staff_id: String,
    pub date: NaiveDate,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

/// A record joined with one level of related data.
#[derive(Debug, Clone, PartialEq)]
pub struct Related<T, R> {
    pub record: T,
    pub related: R,
}

impl<T, R> Related<T, R> {
    pub fn new(record: T, related: R) -> Self {
        Self { record, related }
    }
}

/// A bill with its patient and its payments, newest payment first.
#[derive(Debug, Clone, PartialEq)]
pub struct BillDetail {
    pub bill: Bill,
    pub patient: Patient,
    pub payments: Vec<Payment>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewPatient {
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: NaiveDate,
    pub gender: String,
    pub email: Option<String>,
    pub phone: String,
    pub address: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewAppointment {
    pub patient_id: String,
    pub date_time: DateTime<Utc>,
    pub appointment_type: String,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewAdmission {
    pub patient_id: String,
    pub room_number: String,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewBill {
    pub patient_id: String,
    pub amount: Decimal,
    pub due_date: DateTime<Utc>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewPayment {
    pub bill_id: String,
    pub amount: Decimal,
    pub payment_date: DateTime<Utc>,
    pub payment_method: String,
    pub status: PaymentStatus,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewInsuranceClaim {
    pub patient_id: String,
    pub provider: String,
    pub policy_number: String,
    pub claim_amount: Decimal,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewStaff {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub department: String,
    pub role: String,
    pub status: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewAttendance {
    pub staff_id: String,
    pub date: NaiveDate,
    pub check_in: Option<DateTime<Utc>>,
    pub check_out: Option<DateTime<Utc>>,
    pub status: AttendanceStatus,
    pub leave_type: Option<String>,
    pub leave_reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewShift {
    pub staff_id: String,
    pub date: NaiveDate,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

impl NewShift {
    /// A shift must end strictly after it starts.
    pub fn validate(&self) -> HospitalResult<()> {
        if self.end_time <= self.start_time {
            return Err(HospitalError::Validation(
                "End time must be after start time".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_status_parsing_is_case_insensitive() {
        assert_eq!("paid".parse::<BillStatus>().unwrap(), BillStatus::Paid);
        assert_eq!(" Overdue ".parse::<BillStatus>().unwrap(), BillStatus::Overdue);
        assert_eq!(
            "LATE".parse::<AttendanceStatus>().unwrap(),
            AttendanceStatus::Late
        );
    }

    #[test]
    fn test_status_parsing_rejects_unknown_values() {
        let err = "Refunded".parse::<BillStatus>().unwrap_err();
        assert!(matches!(err, HospitalError::Validation(_)));
        assert!(err.to_string().contains("Pending, Paid, Overdue"));
    }

    #[test]
    fn test_bill_status_defaults_to_pending() {
        assert_eq!(BillStatus::default(), BillStatus::Pending);
        assert_eq!(BillStatus::Pending.to_string(), "Pending");
    }

    #[test]
    fn test_shift_requires_end_after_start() {
        let start = Utc.with_ymd_and_hms(2024, 3, 4, 8, 0, 0).unwrap();
        let shift = NewShift {
            staff_id: "s1".to_string(),
            date: start.date_naive(),
            start_time: start,
            end_time: start,
        };
        assert!(matches!(shift.validate(), Err(HospitalError::Validation(_))));

        let shift = NewShift {
            end_time: Utc.with_ymd_and_hms(2024, 3, 4, 16, 0, 0).unwrap(),
            ..shift
        };
        assert!(shift.validate().is_ok());
    }

    #[test]
    fn test_snapshot_row_deserializes_without_optional_fields() {
        let json = r#"{
            "id": "a1",
            "staffId": "s1",
            "date": "2024-03-04",
            "checkIn": "2024-03-04T08:05:00Z",
            "status": "Late"
        }"#;
        let record: Attendance = serde_json::from_str(json).unwrap();
        assert_eq!(record.status, AttendanceStatus::Late);
        assert!(record.check_out.is_none());
        assert!(record.leave_type.is_none());
    }
}
