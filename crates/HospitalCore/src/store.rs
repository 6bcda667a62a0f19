//! Persistence service.
//!
//! [`RecordStore`] is the seam between route handlers and storage: typed
//! find/create/update operations, each a single atomic call, with predicate
//! filtering, a fixed per-resource ordering and one level of relation joins.
//! There is no delete and no operation spans more than one call, so concurrent
//! patches to the same row are last-write-wins.
//!
//! [`MemoryStore`] keeps every table behind a single `RwLock`; each call takes
//! the lock exactly once. [`crate::sql_store::SqlStore`] keeps them in SQLite.
//! Both share the filtering, joining and ordering implemented on [`Snapshot`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::filter::Predicate;
use crate::models::{
    Admission, Appointment, Attendance, Bill, BillDetail, BillStatus, InsuranceClaim,
    NewAdmission, NewAppointment, NewAttendance, NewBill, NewInsuranceClaim, NewPatient,
    NewPayment, NewShift, NewStaff, Patient, Payment, Related, Shift, Staff,
};
use crate::{HospitalError, HospitalResult};

/// Direction of a store's temporal ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl SortOrder {
    fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortOrder::Ascending => ordering,
            SortOrder::Descending => ordering.reverse(),
        }
    }
}

/// Typed access to the hospital's records.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Patients, newest first, each with their latest appointment.
    async fn find_patients(
        &self,
        predicate: &Predicate<Patient>,
    ) -> HospitalResult<Vec<Related<Patient, Option<Appointment>>>>;

    async fn create_patient(&self, new: NewPatient) -> HospitalResult<Patient>;

    /// Appointments by date-time, latest first.
    async fn find_appointments(
        &self,
        predicate: &Predicate<Related<Appointment, Patient>>,
    ) -> HospitalResult<Vec<Related<Appointment, Patient>>>;

    async fn create_appointment(
        &self,
        new: NewAppointment,
    ) -> HospitalResult<Related<Appointment, Patient>>;

    /// Admissions by admission date, latest first.
    async fn find_admissions(
        &self,
        predicate: &Predicate<Related<Admission, Patient>>,
    ) -> HospitalResult<Vec<Related<Admission, Patient>>>;

    async fn create_admission(
        &self,
        new: NewAdmission,
    ) -> HospitalResult<Related<Admission, Patient>>;

    /// Set the discharge date (and the stored status) of an admission.
    async fn discharge_admission(
        &self,
        id: &str,
        at: DateTime<Utc>,
    ) -> HospitalResult<Related<Admission, Patient>>;

    /// Bills by creation time, newest first.
    async fn find_bills(
        &self,
        predicate: &Predicate<Related<Bill, Patient>>,
    ) -> HospitalResult<Vec<Related<Bill, Patient>>>;

    async fn create_bill(&self, new: NewBill) -> HospitalResult<Related<Bill, Patient>>;

    async fn get_bill(&self, id: &str) -> HospitalResult<Option<BillDetail>>;

    async fn update_bill_status(&self, id: &str, status: BillStatus)
    -> HospitalResult<BillDetail>;

    /// Payments by payment date, oldest first.
    async fn find_payments(&self, predicate: &Predicate<Payment>) -> HospitalResult<Vec<Payment>>;

    async fn create_payment(&self, new: NewPayment) -> HospitalResult<Payment>;

    /// Insurance claims by submission date, latest first.
    async fn find_claims(
        &self,
        predicate: &Predicate<Related<InsuranceClaim, Patient>>,
    ) -> HospitalResult<Vec<Related<InsuranceClaim, Patient>>>;

    async fn create_claim(
        &self,
        new: NewInsuranceClaim,
    ) -> HospitalResult<Related<InsuranceClaim, Patient>>;

    /// Staff by last name.
    async fn find_staff(&self, predicate: &Predicate<Staff>) -> HospitalResult<Vec<Staff>>;

    /// Insert a staff member; a taken email is a [`HospitalError::Conflict`].
    async fn create_staff(&self, new: NewStaff) -> HospitalResult<Staff>;

    /// Attendance by day. Ascending order breaks ties by staff first name.
    async fn find_attendance(
        &self,
        predicate: &Predicate<Related<Attendance, Staff>>,
        order: SortOrder,
    ) -> HospitalResult<Vec<Related<Attendance, Staff>>>;

    async fn create_attendance(
        &self,
        new: NewAttendance,
    ) -> HospitalResult<Related<Attendance, Staff>>;

    /// Shifts by start time.
    async fn find_shifts(
        &self,
        predicate: &Predicate<Related<Shift, Staff>>,
        order: SortOrder,
    ) -> HospitalResult<Vec<Related<Shift, Staff>>>;

    /// Insert a shift; its end time must be after its start time.
    async fn create_shift(&self, new: NewShift) -> HospitalResult<Related<Shift, Staff>>;
}

/// Every table of the store. Also the on-disk snapshot format.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Snapshot {
    pub patients: Vec<Patient>,
    pub appointments: Vec<Appointment>,
    pub admissions: Vec<Admission>,
    pub bills: Vec<Bill>,
    pub payments: Vec<Payment>,
    pub insurance_claims: Vec<InsuranceClaim>,
    pub staff: Vec<Staff>,
    pub attendance: Vec<Attendance>,
    pub shifts: Vec<Shift>,
}

impl Snapshot {
    fn patient(&self, id: &str) -> Option<&Patient> {
        self.patients.iter().find(|p| p.id == id)
    }

    fn staff_member(&self, id: &str) -> Option<&Staff> {
        self.staff.iter().find(|s| s.id == id)
    }

    fn require_patient(&self, id: &str) -> HospitalResult<Patient> {
        self.patient(id)
            .cloned()
            .ok_or_else(|| HospitalError::NotFound("Patient not found".to_string()))
    }

    fn require_staff(&self, id: &str) -> HospitalResult<Staff> {
        self.staff_member(id)
            .cloned()
            .ok_or_else(|| HospitalError::NotFound("Staff not found".to_string()))
    }

    /// Join rows to their patient, dropping rows whose patient is missing.
    fn join_patient<T: Clone>(
        &self,
        rows: &[T],
        patient_id: impl Fn(&T) -> &str,
        kind: &str,
    ) -> Vec<Related<T, Patient>> {
        let patients: HashMap<&str, &Patient> =
            self.patients.iter().map(|p| (p.id.as_str(), p)).collect();
        rows.iter()
            .filter_map(|row| match patients.get(patient_id(row)) {
                Some(patient) => Some(Related::new(row.clone(), (*patient).clone())),
                None => {
                    warn!("Skipping {} with unknown patient {}", kind, patient_id(row));
                    None
                }
            })
            .collect()
    }

    fn join_staff<T: Clone>(
        &self,
        rows: &[T],
        staff_id: impl Fn(&T) -> &str,
        kind: &str,
    ) -> Vec<Related<T, Staff>> {
        let staff: HashMap<&str, &Staff> = self.staff.iter().map(|s| (s.id.as_str(), s)).collect();
        rows.iter()
            .filter_map(|row| match staff.get(staff_id(row)) {
                Some(member) => Some(Related::new(row.clone(), (*member).clone())),
                None => {
                    warn!("Skipping {} with unknown staff {}", kind, staff_id(row));
                    None
                }
            })
            .collect()
    }

    pub(crate) fn bill_detail(&self, bill: &Bill) -> HospitalResult<BillDetail> {
        let patient = self.require_patient(&bill.patient_id)?;
        let mut payments: Vec<Payment> = self
            .payments
            .iter()
            .filter(|p| p.bill_id == bill.id)
            .cloned()
            .collect();
        payments.sort_by(|a, b| b.payment_date.cmp(&a.payment_date));
        Ok(BillDetail {
            bill: bill.clone(),
            patient,
            payments,
        })
    }

    pub(crate) fn patients_matching(
        &self,
        predicate: &Predicate<Patient>,
    ) -> Vec<Related<Patient, Option<Appointment>>> {
        let mut patients: Vec<&Patient> =
            self.patients.iter().filter(|p| predicate.matches(p)).collect();
        patients.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        patients
            .into_iter()
            .map(|patient| {
                let latest = self
                    .appointments
                    .iter()
                    .filter(|a| a.patient_id == patient.id)
                    .max_by(|a, b| a.date_time.cmp(&b.date_time))
                    .cloned();
                Related::new(patient.clone(), latest)
            })
            .collect()
    }

    pub(crate) fn appointments_matching(
        &self,
        predicate: &Predicate<Related<Appointment, Patient>>,
    ) -> Vec<Related<Appointment, Patient>> {
        let mut rows: Vec<_> = self
            .join_patient(&self.appointments, |a| a.patient_id.as_str(), "appointment")
            .into_iter()
            .filter(|row| predicate.matches(row))
            .collect();
        rows.sort_by(|a, b| b.record.date_time.cmp(&a.record.date_time));
        rows
    }

    pub(crate) fn admissions_matching(
        &self,
        predicate: &Predicate<Related<Admission, Patient>>,
    ) -> Vec<Related<Admission, Patient>> {
        let mut rows: Vec<_> = self
            .join_patient(&self.admissions, |a| a.patient_id.as_str(), "admission")
            .into_iter()
            .filter(|row| predicate.matches(row))
            .collect();
        rows.sort_by(|a, b| b.record.admission_date.cmp(&a.record.admission_date));
        rows
    }

    pub(crate) fn bills_matching(
        &self,
        predicate: &Predicate<Related<Bill, Patient>>,
    ) -> Vec<Related<Bill, Patient>> {
        let mut rows: Vec<_> = self
            .join_patient(&self.bills, |b| b.patient_id.as_str(), "bill")
            .into_iter()
            .filter(|row| predicate.matches(row))
            .collect();
        rows.sort_by(|a, b| b.record.created_at.cmp(&a.record.created_at));
        rows
    }

    pub(crate) fn payments_matching(&self, predicate: &Predicate<Payment>) -> Vec<Payment> {
        let mut payments: Vec<Payment> = self
            .payments
            .iter()
            .filter(|p| predicate.matches(p))
            .cloned()
            .collect();
        payments.sort_by(|a, b| a.payment_date.cmp(&b.payment_date));
        payments
    }

    pub(crate) fn claims_matching(
        &self,
        predicate: &Predicate<Related<InsuranceClaim, Patient>>,
    ) -> Vec<Related<InsuranceClaim, Patient>> {
        let mut rows: Vec<_> = self
            .join_patient(&self.insurance_claims, |c| c.patient_id.as_str(), "insurance claim")
            .into_iter()
            .filter(|row| predicate.matches(row))
            .collect();
        rows.sort_by(|a, b| b.record.submission_date.cmp(&a.record.submission_date));
        rows
    }

    pub(crate) fn staff_matching(&self, predicate: &Predicate<Staff>) -> Vec<Staff> {
        let mut staff: Vec<Staff> = self
            .staff
            .iter()
            .filter(|s| predicate.matches(s))
            .cloned()
            .collect();
        staff.sort_by(|a, b| a.last_name.cmp(&b.last_name));
        staff
    }

    pub(crate) fn attendance_matching(
        &self,
        predicate: &Predicate<Related<Attendance, Staff>>,
        order: SortOrder,
    ) -> Vec<Related<Attendance, Staff>> {
        let mut rows: Vec<_> = self
            .join_staff(&self.attendance, |a| a.staff_id.as_str(), "attendance record")
            .into_iter()
            .filter(|row| predicate.matches(row))
            .collect();
        rows.sort_by(|a, b| {
            let by_date = order.apply(a.record.date.cmp(&b.record.date));
            match order {
                SortOrder::Ascending => {
                    by_date.then_with(|| a.related.first_name.cmp(&b.related.first_name))
                }
                SortOrder::Descending => by_date,
            }
        });
        rows
    }

    pub(crate) fn shifts_matching(
        &self,
        predicate: &Predicate<Related<Shift, Staff>>,
        order: SortOrder,
    ) -> Vec<Related<Shift, Staff>> {
        let mut rows: Vec<_> = self
            .join_staff(&self.shifts, |s| s.staff_id.as_str(), "shift")
            .into_iter()
            .filter(|row| predicate.matches(row))
            .collect();
        rows.sort_by(|a, b| order.apply(a.record.start_time.cmp(&b.record.start_time)));
        rows
    }
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

// Row construction shared by every store: fresh id, server-side defaults.

impl NewPatient {
    pub(crate) fn into_record(self) -> Patient {
        Patient {
            id: new_id(),
            first_name: self.first_name,
            last_name: self.last_name,
            date_of_birth: self.date_of_birth,
            gender: self.gender,
            email: self.email,
            phone: self.phone,
            address: self.address,
            status: "Active".to_string(),
            created_at: Utc::now(),
        }
    }
}

impl NewAppointment {
    pub(crate) fn into_record(self) -> Appointment {
        Appointment {
            id: new_id(),
            patient_id: self.patient_id,
            date_time: self.date_time,
            status: "Scheduled".to_string(),
            appointment_type: self.appointment_type,
            notes: self.notes,
        }
    }
}

impl NewAdmission {
    pub(crate) fn into_record(self) -> Admission {
        Admission {
            id: new_id(),
            patient_id: self.patient_id,
            room_number: self.room_number,
            admission_date: Utc::now(),
            discharge_date: None,
            status: "Active".to_string(),
            notes: self.notes,
        }
    }
}

impl NewBill {
    pub(crate) fn into_record(self) -> Bill {
        Bill {
            id: new_id(),
            patient_id: self.patient_id,
            amount: self.amount,
            due_date: self.due_date,
            status: BillStatus::Pending,
            notes: self.notes,
            created_at: Utc::now(),
        }
    }
}

impl NewPayment {
    pub(crate) fn into_record(self) -> Payment {
        Payment {
            id: new_id(),
            bill_id: self.bill_id,
            amount: self.amount,
            payment_date: self.payment_date,
            payment_method: self.payment_method,
            status: self.status,
            notes: self.notes,
        }
    }
}

impl NewInsuranceClaim {
    pub(crate) fn into_record(self) -> InsuranceClaim {
        InsuranceClaim {
            id: new_id(),
            patient_id: self.patient_id,
            provider: self.provider,
            policy_number: self.policy_number,
            claim_amount: self.claim_amount,
            status: "Pending".to_string(),
            submission_date: Utc::now(),
            response_date: None,
            notes: self.notes,
        }
    }
}

impl NewStaff {
    pub(crate) fn into_record(self) -> Staff {
        Staff {
            id: new_id(),
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            department: self.department,
            role: self.role,
            status: self.status.unwrap_or_else(|| "active".to_string()),
            join_date: Utc::now(),
        }
    }
}

impl NewAttendance {
    pub(crate) fn into_record(self) -> Attendance {
        Attendance {
            id: new_id(),
            staff_id: self.staff_id,
            date: self.date,
            check_in: self.check_in,
            check_out: self.check_out,
            status: self.status,
            leave_type: self.leave_type,
            leave_reason: self.leave_reason,
        }
    }
}

impl NewShift {
    pub(crate) fn into_record(self) -> Shift {
        Shift {
            id: new_id(),
            staff_id: self.staff_id,
            date: self.date,
            start_time: self.start_time,
            end_time: self.end_time,
        }
    }
}

/// In-process [`RecordStore`]. Nothing written to it outlives the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Snapshot>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_snapshot(snapshot: Snapshot) -> Self {
        debug!(
            "Loaded snapshot: {} patients, {} staff, {} payments",
            snapshot.patients.len(),
            snapshot.staff.len(),
            snapshot.payments.len()
        );
        Self {
            tables: RwLock::new(snapshot),
        }
    }

    /// Copy of every table.
    pub fn snapshot(&self) -> Snapshot {
        self.tables.read().clone()
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn find_patients(
        &self,
        predicate: &Predicate<Patient>,
    ) -> HospitalResult<Vec<Related<Patient, Option<Appointment>>>> {
        Ok(self.tables.read().patients_matching(predicate))
    }

    async fn create_patient(&self, new: NewPatient) -> HospitalResult<Patient> {
        let patient = new.into_record();
        self.tables.write().patients.push(patient.clone());
        Ok(patient)
    }

    async fn find_appointments(
        &self,
        predicate: &Predicate<Related<Appointment, Patient>>,
    ) -> HospitalResult<Vec<Related<Appointment, Patient>>> {
        Ok(self.tables.read().appointments_matching(predicate))
    }

    async fn create_appointment(
        &self,
        new: NewAppointment,
    ) -> HospitalResult<Related<Appointment, Patient>> {
        let mut tables = self.tables.write();
        let patient = tables.require_patient(&new.patient_id)?;
        let appointment = new.into_record();
        tables.appointments.push(appointment.clone());
        Ok(Related::new(appointment, patient))
    }

    async fn find_admissions(
        &self,
        predicate: &Predicate<Related<Admission, Patient>>,
    ) -> HospitalResult<Vec<Related<Admission, Patient>>> {
        Ok(self.tables.read().admissions_matching(predicate))
    }

    async fn create_admission(
        &self,
        new: NewAdmission,
    ) -> HospitalResult<Related<Admission, Patient>> {
        let mut tables = self.tables.write();
        let patient = tables.require_patient(&new.patient_id)?;
        let admission = new.into_record();
        tables.admissions.push(admission.clone());
        Ok(Related::new(admission, patient))
    }

    async fn discharge_admission(
        &self,
        id: &str,
        at: DateTime<Utc>,
    ) -> HospitalResult<Related<Admission, Patient>> {
        let mut tables = self.tables.write();
        let admission = tables
            .admissions
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or_else(|| HospitalError::NotFound("Admission not found".to_string()))?;
        admission.discharge_date = Some(at);
        admission.status = "Discharged".to_string();
        let admission = admission.clone();
        let patient = tables.require_patient(&admission.patient_id)?;
        Ok(Related::new(admission, patient))
    }

    async fn find_bills(
        &self,
        predicate: &Predicate<Related<Bill, Patient>>,
    ) -> HospitalResult<Vec<Related<Bill, Patient>>> {
        Ok(self.tables.read().bills_matching(predicate))
    }

    async fn create_bill(&self, new: NewBill) -> HospitalResult<Related<Bill, Patient>> {
        let mut tables = self.tables.write();
        let patient = tables.require_patient(&new.patient_id)?;
        let bill = new.into_record();
        tables.bills.push(bill.clone());
        Ok(Related::new(bill, patient))
    }

    async fn get_bill(&self, id: &str) -> HospitalResult<Option<BillDetail>> {
        let tables = self.tables.read();
        match tables.bills.iter().find(|b| b.id == id) {
            Some(bill) => tables.bill_detail(bill).map(Some),
            None => Ok(None),
        }
    }

    async fn update_bill_status(
        &self,
        id: &str,
        status: BillStatus,
    ) -> HospitalResult<BillDetail> {
        let mut tables = self.tables.write();
        let bill = tables
            .bills
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or_else(|| HospitalError::NotFound("Bill not found".to_string()))?;
        bill.status = status;
        let bill = bill.clone();
        tables.bill_detail(&bill)
    }

    async fn find_payments(&self, predicate: &Predicate<Payment>) -> HospitalResult<Vec<Payment>> {
        Ok(self.tables.read().payments_matching(predicate))
    }

    async fn create_payment(&self, new: NewPayment) -> HospitalResult<Payment> {
        let mut tables = self.tables.write();
        if !tables.bills.iter().any(|b| b.id == new.bill_id) {
            return Err(HospitalError::NotFound("Bill not found".to_string()));
        }
        let payment = new.into_record();
        tables.payments.push(payment.clone());
        Ok(payment)
    }

    async fn find_claims(
        &self,
        predicate: &Predicate<Related<InsuranceClaim, Patient>>,
    ) -> HospitalResult<Vec<Related<InsuranceClaim, Patient>>> {
        Ok(self.tables.read().claims_matching(predicate))
    }

    async fn create_claim(
        &self,
        new: NewInsuranceClaim,
    ) -> HospitalResult<Related<InsuranceClaim, Patient>> {
        let mut tables = self.tables.write();
        let patient = tables.require_patient(&new.patient_id)?;
        let claim = new.into_record();
        tables.insurance_claims.push(claim.clone());
        Ok(Related::new(claim, patient))
    }

    async fn find_staff(&self, predicate: &Predicate<Staff>) -> HospitalResult<Vec<Staff>> {
        Ok(self.tables.read().staff_matching(predicate))
    }

    async fn create_staff(&self, new: NewStaff) -> HospitalResult<Staff> {
        let mut tables = self.tables.write();
        if tables
            .staff
            .iter()
            .any(|s| s.email.eq_ignore_ascii_case(&new.email))
        {
            return Err(HospitalError::Conflict("Email already exists".to_string()));
        }
        let staff = new.into_record();
        tables.staff.push(staff.clone());
        Ok(staff)
    }

    async fn find_attendance(
        &self,
        predicate: &Predicate<Related<Attendance, Staff>>,
        order: SortOrder,
    ) -> HospitalResult<Vec<Related<Attendance, Staff>>> {
        Ok(self.tables.read().attendance_matching(predicate, order))
    }

    async fn create_attendance(
        &self,
        new: NewAttendance,
    ) -> HospitalResult<Related<Attendance, Staff>> {
        let mut tables = self.tables.write();
        let staff = tables.require_staff(&new.staff_id)?;
        let record = new.into_record();
        tables.attendance.push(record.clone());
        Ok(Related::new(record, staff))
    }

    async fn find_shifts(
        &self,
        predicate: &Predicate<Related<Shift, Staff>>,
        order: SortOrder,
    ) -> HospitalResult<Vec<Related<Shift, Staff>>> {
        Ok(self.tables.read().shifts_matching(predicate, order))
    }

    async fn create_shift(&self, new: NewShift) -> HospitalResult<Related<Shift, Staff>> {
        new.validate()?;
        let mut tables = self.tables.write();
        let staff = tables.require_staff(&new.staff_id)?;
        let shift = new.into_record();
        tables.shifts.push(shift.clone());
        Ok(Related::new(shift, staff))
    }
}

/// Result of [`seed_demo_staff`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    Seeded(usize),
    AlreadySeeded,
}

const DEMO_STAFF: [(&str, &str, &str, &str, &str); 6] = [
    ("Emergency", "Department", "emergency@hospital.com", "Emergency", "ADMIN"),
    ("Surgery", "Department", "surgery@hospital.com", "Surgery", "ADMIN"),
    ("Pediatrics", "Department", "pediatrics@hospital.com", "Pediatrics", "ADMIN"),
    ("John", "Doe", "john.doe@hospital.com", "Emergency", "DOCTOR"),
    ("Jane", "Smith", "jane.smith@hospital.com", "Surgery", "NURSE"),
    ("Mike", "Johnson", "mike.johnson@hospital.com", "Pediatrics", "DOCTOR"),
];

/// Insert the demo roster unless any staff member already exists.
///
/// A concurrent seed racing this one surfaces as email conflicts, which are
/// skipped, so the roster is never duplicated.
pub async fn seed_demo_staff(store: &dyn RecordStore) -> HospitalResult<SeedOutcome> {
    if !store.find_staff(&Predicate::any()).await?.is_empty() {
        return Ok(SeedOutcome::AlreadySeeded);
    }
    let mut inserted = 0;
    for (first_name, last_name, email, department, role) in DEMO_STAFF {
        let result = store
            .create_staff(NewStaff {
                first_name: first_name.to_string(),
                last_name: last_name.to_string(),
                email: email.to_string(),
                department: department.to_string(),
                role: role.to_string(),
                status: None,
            })
            .await;
        match result {
            Ok(_) => inserted += 1,
            Err(HospitalError::Conflict(_)) => debug!("Seed skipped existing {}", email),
            Err(e) => return Err(e),
        }
    }
    Ok(SeedOutcome::Seeded(inserted))
}
