//! JSON request bodies for the create and update endpoints.
//!
//! Both the server (which deserializes them) and the client (which serializes
//! them) use these types. Required text fields default to `""` so a missing
//! field and a blank one fail the same validation; dates and timestamps travel
//! as strings and are parsed by `into_new`.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::filter::{parse_date, parse_instant};
use crate::models::{
    AttendanceStatus, BillStatus, NewAdmission, NewAppointment, NewAttendance, NewBill,
    NewInsuranceClaim, NewPatient, NewPayment, NewShift, NewStaff, PaymentStatus,
};
use crate::{HospitalError, HospitalResult};

fn missing_fields() -> HospitalError {
    HospitalError::Validation("Missing required fields".to_string())
}

fn require(fields: &[&str]) -> HospitalResult<()> {
    if fields.iter().any(|f| f.trim().is_empty()) {
        return Err(missing_fields());
    }
    Ok(())
}

fn positive(amount: Option<Decimal>, field: &str) -> HospitalResult<Decimal> {
    match amount {
        None => Err(missing_fields()),
        Some(a) if a <= Decimal::ZERO => Err(HospitalError::Validation(format!(
            "{} must be greater than zero",
            field
        ))),
        Some(a) => Ok(a),
    }
}

fn blank_to_none(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreatePatientRequest {
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: String,
    pub gender: String,
    pub email: Option<String>,
    pub phone: String,
    pub address: Option<String>,
}

impl CreatePatientRequest {
    pub fn into_new(self) -> HospitalResult<NewPatient> {
        require(&[
            &self.first_name,
            &self.last_name,
            &self.date_of_birth,
            &self.gender,
            &self.phone,
        ])?;
        Ok(NewPatient {
            date_of_birth: parse_date(&self.date_of_birth)?,
            first_name: self.first_name,
            last_name: self.last_name,
            gender: self.gender,
            email: blank_to_none(self.email),
            phone: self.phone,
            address: blank_to_none(self.address),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateAppointmentRequest {
    pub patient_id: String,
    pub date_time: String,
    #[serde(rename = "type")]
    pub appointment_type: String,
    pub notes: Option<String>,
}

impl CreateAppointmentRequest {
    pub fn into_new(self) -> HospitalResult<NewAppointment> {
        require(&[&self.patient_id, &self.date_time, &self.appointment_type])?;
        Ok(NewAppointment {
            date_time: parse_instant(&self.date_time)?,
            patient_id: self.patient_id,
            appointment_type: self.appointment_type,
            notes: blank_to_none(self.notes),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateAdmissionRequest {
    pub patient_id: String,
    pub room_number: String,
    pub notes: Option<String>,
}

impl CreateAdmissionRequest {
    pub fn into_new(self) -> HospitalResult<NewAdmission> {
        require(&[&self.patient_id, &self.room_number])?;
        Ok(NewAdmission {
            patient_id: self.patient_id,
            room_number: self.room_number,
            notes: blank_to_none(self.notes),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateBillRequest {
    pub patient_id: String,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub amount: Option<Decimal>,
    pub due_date: String,
    pub notes: Option<String>,
}

impl CreateBillRequest {
    pub fn into_new(self) -> HospitalResult<NewBill> {
        require(&[&self.patient_id, &self.due_date])?;
        Ok(NewBill {
            amount: positive(self.amount, "Amount")?,
            due_date: parse_instant(&self.due_date)?,
            patient_id: self.patient_id,
            notes: blank_to_none(self.notes),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateBillStatusRequest {
    pub status: String,
}

impl UpdateBillStatusRequest {
    pub fn status(&self) -> HospitalResult<BillStatus> {
        require(&[&self.status])?;
        self.status.parse()
    }
}

/// A payment against the bill named in the path. `paymentDate` defaults to
/// the time of the request and `status` to `Completed`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreatePaymentRequest {
    #[serde(with = "rust_decimal::serde::float_option")]
    pub amount: Option<Decimal>,
    pub payment_date: Option<String>,
    pub payment_method: String,
    pub status: Option<String>,
    pub notes: Option<String>,
}

impl CreatePaymentRequest {
    pub fn into_new(self, bill_id: &str, now: DateTime<Utc>) -> HospitalResult<NewPayment> {
        require(&[&self.payment_method])?;
        let payment_date = match blank_to_none(self.payment_date) {
            Some(raw) => parse_instant(&raw)?,
            None => now,
        };
        let status = match blank_to_none(self.status) {
            Some(raw) => raw.parse()?,
            None => PaymentStatus::default(),
        };
        Ok(NewPayment {
            bill_id: bill_id.to_string(),
            amount: positive(self.amount, "Amount")?,
            payment_date,
            payment_method: self.payment_method,
            status,
            notes: blank_to_none(self.notes),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateClaimRequest {
    pub patient_id: String,
    pub provider: String,
    pub policy_number: String,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub claim_amount: Option<Decimal>,
    pub notes: Option<String>,
}

impl CreateClaimRequest {
    pub fn into_new(self) -> HospitalResult<NewInsuranceClaim> {
        require(&[&self.patient_id, &self.provider, &self.policy_number])?;
        Ok(NewInsuranceClaim {
            claim_amount: positive(self.claim_amount, "Claim amount")?,
            patient_id: self.patient_id,
            provider: self.provider,
            policy_number: self.policy_number,
            notes: blank_to_none(self.notes),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateStaffRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub department: String,
    pub role: String,
    pub status: Option<String>,
}

impl CreateStaffRequest {
    pub fn into_new(self) -> HospitalResult<NewStaff> {
        require(&[
            &self.first_name,
            &self.last_name,
            &self.email,
            &self.department,
            &self.role,
        ])?;
        Ok(NewStaff {
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            email: self.email.trim().to_string(),
            department: self.department.trim().to_string(),
            role: self.role.trim().to_string(),
            status: blank_to_none(self.status).map(|s| s.trim().to_string()),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateDepartmentRequest {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateAttendanceRequest {
    pub staff_id: String,
    pub date: String,
    pub check_in: Option<String>,
    pub check_out: Option<String>,
    pub status: String,
    pub leave_type: Option<String>,
    pub leave_reason: Option<String>,
}

impl CreateAttendanceRequest {
    pub fn into_new(self) -> HospitalResult<NewAttendance> {
        require(&[&self.staff_id, &self.date, &self.status])?;
        let status: AttendanceStatus = self.status.parse()?;
        let check_in = blank_to_none(self.check_in)
            .map(|raw| parse_instant(&raw))
            .transpose()?;
        let check_out = blank_to_none(self.check_out)
            .map(|raw| parse_instant(&raw))
            .transpose()?;
        Ok(NewAttendance {
            date: parse_date(&self.date)?,
            staff_id: self.staff_id,
            check_in,
            check_out,
            status,
            leave_type: blank_to_none(self.leave_type),
            leave_reason: blank_to_none(self.leave_reason),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateShiftRequest {
    pub staff_id: String,
    pub date: String,
    pub start_time: String,
    pub end_time: String,
}

impl CreateShiftRequest {
    pub fn into_new(self) -> HospitalResult<NewShift> {
        require(&[&self.staff_id, &self.date, &self.start_time, &self.end_time])?;
        let shift = NewShift {
            date: parse_date(&self.date)?,
            start_time: parse_instant(&self.start_time)?,
            end_time: parse_instant(&self.end_time)?,
            staff_id: self.staff_id,
        };
        shift.validate()?;
        Ok(shift)
    }
}
