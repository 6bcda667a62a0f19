//! Wire shapes returned by the API.
//!
//! Every list and create endpoint answers with one of these flat, display-ready
//! structs rather than a stored row: related names are joined in, timestamps
//! are ISO 8601 UTC with milliseconds, absent free text is `""` and absent
//! timestamps are left out.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{
    Admission, Appointment, Attendance, AttendanceStatus, Bill, BillDetail, BillStatus,
    InsuranceClaim, Patient, Payment, PaymentStatus, Related, Shift, Staff,
};

/// `YYYY-MM-DDTHH:MM:SS.mmmZ` timestamps.
pub mod iso_millis {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn format(at: &DateTime<Utc>) -> String {
        at.to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    pub fn serialize<S: Serializer>(at: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format(at))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<DateTime<Utc>, D::Error> {
        DateTime::<Utc>::deserialize(deserializer)
    }

    pub mod option {
        use super::*;

        pub fn serialize<S: Serializer>(
            at: &Option<DateTime<Utc>>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match at {
                Some(at) => serializer.serialize_some(&format(at)),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<DateTime<Utc>>, D::Error> {
            Option::<DateTime<Utc>>::deserialize(deserializer)
        }
    }
}

fn display_name(first: &str, last: &str) -> String {
    format!("{} {}", first, last)
}

/// Derived from the discharge date, never from the stored status column.
pub fn admission_status(discharge_date: Option<&DateTime<Utc>>) -> &'static str {
    if discharge_date.is_some() {
        "Discharged"
    } else {
        "Active"
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientDto {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: NaiveDate,
    pub gender: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub status: String,
    #[serde(with = "iso_millis")]
    pub created_at: DateTime<Utc>,
    #[serde(
        with = "iso_millis::option",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub last_appointment: Option<DateTime<Utc>>,
}

impl From<Related<Patient, Option<Appointment>>> for PatientDto {
    fn from(row: Related<Patient, Option<Appointment>>) -> Self {
        let Related {
            record: patient,
            related: latest,
        } = row;
        Self {
            id: patient.id,
            first_name: patient.first_name,
            last_name: patient.last_name,
            date_of_birth: patient.date_of_birth,
            gender: patient.gender,
            email: patient.email.unwrap_or_default(),
            phone: patient.phone,
            address: patient.address.unwrap_or_default(),
            status: patient.status,
            created_at: patient.created_at,
            last_appointment: latest.map(|a| a.date_time),
        }
    }
}

impl From<Patient> for PatientDto {
    fn from(patient: Patient) -> Self {
        Related::new(patient, None).into()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentDto {
    pub id: String,
    pub patient_id: String,
    pub patient_name: String,
    #[serde(with = "iso_millis")]
    pub date_time: DateTime<Utc>,
    pub status: String,
    #[serde(rename = "type")]
    pub appointment_type: String,
    pub notes: String,
}

impl From<Related<Appointment, Patient>> for AppointmentDto {
    fn from(row: Related<Appointment, Patient>) -> Self {
        let Related {
            record: appointment,
            related: patient,
        } = row;
        Self {
            id: appointment.id,
            patient_id: appointment.patient_id,
            patient_name: display_name(&patient.first_name, &patient.last_name),
            date_time: appointment.date_time,
            status: appointment.status,
            appointment_type: appointment.appointment_type,
            notes: appointment.notes.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdmissionDto {
    pub id: String,
    pub patient_id: String,
    pub patient_name: String,
    pub room_number: String,
    #[serde(with = "iso_millis")]
    pub admission_date: DateTime<Utc>,
    #[serde(
        with = "iso_millis::option",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub discharge_date: Option<DateTime<Utc>>,
    pub status: String,
    pub notes: String,
}

impl From<Related<Admission, Patient>> for AdmissionDto {
    fn from(row: Related<Admission, Patient>) -> Self {
        let Related {
            record: admission,
            related: patient,
        } = row;
        Self {
            status: admission_status(admission.discharge_date.as_ref()).to_string(),
            id: admission.id,
            patient_id: admission.patient_id,
            patient_name: display_name(&patient.first_name, &patient.last_name),
            room_number: admission.room_number,
            admission_date: admission.admission_date,
            discharge_date: admission.discharge_date,
            notes: admission.notes.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillDto {
    pub id: String,
    pub patient_id: String,
    pub patient_name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    #[serde(with = "iso_millis")]
    pub due_date: DateTime<Utc>,
    pub status: BillStatus,
    pub notes: String,
    #[serde(with = "iso_millis")]
    pub created_at: DateTime<Utc>,
}

fn bill_dto(bill: Bill, patient: &Patient) -> BillDto {
    BillDto {
        id: bill.id,
        patient_id: bill.patient_id,
        patient_name: display_name(&patient.first_name, &patient.last_name),
        amount: bill.amount,
        due_date: bill.due_date,
        status: bill.status,
        notes: bill.notes.unwrap_or_default(),
        created_at: bill.created_at,
    }
}

impl From<Related<Bill, Patient>> for BillDto {
    fn from(row: Related<Bill, Patient>) -> Self {
        bill_dto(row.record, &row.related)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentDto {
    pub id: String,
    pub bill_id: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    #[serde(with = "iso_millis")]
    pub payment_date: DateTime<Utc>,
    pub payment_method: String,
    pub status: PaymentStatus,
    pub notes: String,
}

impl From<Payment> for PaymentDto {
    fn from(payment: Payment) -> Self {
        Self {
            id: payment.id,
            bill_id: payment.bill_id,
            amount: payment.amount,
            payment_date: payment.payment_date,
            payment_method: payment.payment_method,
            status: payment.status,
            notes: payment.notes.unwrap_or_default(),
        }
    }
}

/// A bill with its payment history, newest payment first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillDetailDto {
    #[serde(flatten)]
    pub bill: BillDto,
    pub payments: Vec<PaymentDto>,
}

impl From<BillDetail> for BillDetailDto {
    fn from(detail: BillDetail) -> Self {
        Self {
            bill: bill_dto(detail.bill, &detail.patient),
            payments: detail.payments.into_iter().map(PaymentDto::from).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsuranceClaimDto {
    pub id: String,
    pub patient_id: String,
    pub patient_name: String,
    pub claim_number: String,
    pub insurance_provider: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub status: String,
    #[serde(with = "iso_millis")]
    pub submitted_date: DateTime<Utc>,
    #[serde(
        with = "iso_millis::option",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub processed_date: Option<DateTime<Utc>>,
    pub notes: String,
}

impl From<Related<InsuranceClaim, Patient>> for InsuranceClaimDto {
    fn from(row: Related<InsuranceClaim, Patient>) -> Self {
        let Related {
            record: claim,
            related: patient,
        } = row;
        Self {
            id: claim.id,
            patient_id: claim.patient_id,
            patient_name: display_name(&patient.first_name, &patient.last_name),
            claim_number: claim.policy_number,
            insurance_provider: claim.provider,
            amount: claim.claim_amount,
            status: claim.status,
            submitted_date: claim.submission_date,
            processed_date: claim.response_date,
            notes: claim.notes.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffDto {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub department: String,
    pub role: String,
    pub status: String,
    #[serde(with = "iso_millis")]
    pub join_date: DateTime<Utc>,
}

impl From<Staff> for StaffDto {
    fn from(staff: Staff) -> Self {
        Self {
            id: staff.id,
            first_name: staff.first_name,
            last_name: staff.last_name,
            email: staff.email,
            department: staff.department,
            role: staff.role,
            status: staff.status,
            join_date: staff.join_date,
        }
    }
}

/// A department as derived from staff rows; `id` is the name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentDto {
    pub id: String,
    pub name: String,
    pub description: String,
    pub staff_count: usize,
}

impl DepartmentDto {
    pub fn new(name: &str, staff_count: usize) -> Self {
        Self {
            id: name.to_string(),
            name: name.to_string(),
            description: format!("{} department", name),
            staff_count,
        }
    }
}

/// Distinct departments among `staff`, alphabetical, with head counts.
pub fn departments(staff: &[Staff]) -> Vec<DepartmentDto> {
    let mut counts = std::collections::BTreeMap::<&str, usize>::new();
    for member in staff {
        *counts.entry(member.department.as_str()).or_default() += 1;
    }
    counts
        .into_iter()
        .map(|(name, count)| DepartmentDto::new(name, count))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceDto {
    pub id: String,
    pub staff_id: String,
    pub staff_name: String,
    pub department: String,
    pub date: NaiveDate,
    #[serde(
        with = "iso_millis::option",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub check_in: Option<DateTime<Utc>>,
    #[serde(
        with = "iso_millis::option",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub check_out: Option<DateTime<Utc>>,
    pub status: AttendanceStatus,
    pub leave_type: String,
    pub leave_reason: String,
}

impl From<Related<Attendance, Staff>> for AttendanceDto {
    fn from(row: Related<Attendance, Staff>) -> Self {
        let Related {
            record,
            related: staff,
        } = row;
        Self {
            id: record.id,
            staff_id: record.staff_id,
            staff_name: staff.full_name(),
            department: staff.department,
            date: record.date,
            check_in: record.check_in,
            check_out: record.check_out,
            status: record.status,
            leave_type: record.leave_type.unwrap_or_default(),
            leave_reason: record.leave_reason.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShiftDto {
    pub id: String,
    pub staff_id: String,
    pub staff_name: String,
    pub department: String,
    pub date: NaiveDate,
    #[serde(with = "iso_millis")]
    pub start_time: DateTime<Utc>,
    #[serde(with = "iso_millis")]
    pub end_time: DateTime<Utc>,
}

impl From<Related<Shift, Staff>> for ShiftDto {
    fn from(row: Related<Shift, Staff>) -> Self {
        let Related {
            record: shift,
            related: staff,
        } = row;
        Self {
            id: shift.id,
            staff_id: shift.staff_id,
            staff_name: staff.full_name(),
            department: staff.department,
            date: shift.date,
            start_time: shift.start_time,
            end_time: shift.end_time,
        }
    }
}

/// One payment as a point on the revenue chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevenueEntryDto {
    #[serde(with = "iso_millis")]
    pub date: DateTime<Utc>,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub source: String,
}

impl From<&Payment> for RevenueEntryDto {
    fn from(payment: &Payment) -> Self {
        Self {
            date: payment.payment_date,
            amount: payment.amount,
            source: payment.payment_method.clone(),
        }
    }
}

/// Plain acknowledgement body, e.g. from the staff seed endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageDto {
    pub message: String,
}

impl MessageDto {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Convert a list of rows into their wire shape.
pub fn format_all<T, D: From<T>>(rows: Vec<T>) -> Vec<D> {
    rows.into_iter().map(D::from).collect()
}
