//! SQLite-backed persistence.
//!
//! [`SqlStore`] keeps every table in a SQLite database named by a `sqlite:`
//! connection string, so records written through the API survive a restart.
//! The schema is created on connect when missing.
//!
//! Writes are single statements: an insert, or an `UPDATE ... WHERE id = ?`
//! for bill status patches and discharges, so concurrent patches to one row
//! stay last-write-wins. Staff email uniqueness is a `UNIQUE COLLATE NOCASE`
//! constraint and surfaces as [`HospitalError::Conflict`].
//!
//! Reads load the tables a query touches and hand them to the same filtering,
//! joining and ordering that [`crate::store::MemoryStore`] uses.
//!
//! ```text
//! sqlite://hms.db                 relative to the working directory
//! sqlite:///var/lib/hms/hms.db    absolute path
//! sqlite::memory:                 private in-memory database
//! ```

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::FromRow;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

use crate::filter::Predicate;
use crate::models::{
    Admission, Appointment, Attendance, Bill, BillDetail, BillStatus, InsuranceClaim,
    NewAdmission, NewAppointment, NewAttendance, NewBill, NewInsuranceClaim, NewPatient,
    NewPayment, NewShift, NewStaff, Patient, Payment, Related, Shift, Staff,
};
use crate::store::{RecordStore, Snapshot, SortOrder};
use crate::{HospitalError, HospitalResult};

const SCHEMA: [&str; 9] = [
    "CREATE TABLE IF NOT EXISTS patients (
        id TEXT PRIMARY KEY,
        first_name TEXT NOT NULL,
        last_name TEXT NOT NULL,
        date_of_birth TEXT NOT NULL,
        gender TEXT NOT NULL,
        email TEXT,
        phone TEXT NOT NULL,
        address TEXT,
        status TEXT NOT NULL,
        created_at TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS appointments (
        id TEXT PRIMARY KEY,
        patient_id TEXT NOT NULL REFERENCES patients(id),
        date_time TEXT NOT NULL,
        status TEXT NOT NULL,
        appointment_type TEXT NOT NULL,
        notes TEXT
    )",
    "CREATE TABLE IF NOT EXISTS admissions (
        id TEXT PRIMARY KEY,
        patient_id TEXT NOT NULL REFERENCES patients(id),
        room_number TEXT NOT NULL,
        admission_date TEXT NOT NULL,
        discharge_date TEXT,
        status TEXT NOT NULL,
        notes TEXT
    )",
    "CREATE TABLE IF NOT EXISTS bills (
        id TEXT PRIMARY KEY,
        patient_id TEXT NOT NULL REFERENCES patients(id),
        amount TEXT NOT NULL,
        due_date TEXT NOT NULL,
        status TEXT NOT NULL,
        notes TEXT,
        created_at TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS payments (
        id TEXT PRIMARY KEY,
        bill_id TEXT NOT NULL REFERENCES bills(id),
        amount TEXT NOT NULL,
        payment_date TEXT NOT NULL,
        payment_method TEXT NOT NULL,
        status TEXT NOT NULL,
        notes TEXT
    )",
    "CREATE TABLE IF NOT EXISTS insurance_claims (
        id TEXT PRIMARY KEY,
        patient_id TEXT NOT NULL REFERENCES patients(id),
        provider TEXT NOT NULL,
        policy_number TEXT NOT NULL,
        claim_amount TEXT NOT NULL,
        status TEXT NOT NULL,
        submission_date TEXT NOT NULL,
        response_date TEXT,
        notes TEXT
    )",
    "CREATE TABLE IF NOT EXISTS staff (
        id TEXT PRIMARY KEY,
        first_name TEXT NOT NULL,
        last_name TEXT NOT NULL,
        email TEXT NOT NULL UNIQUE COLLATE NOCASE,
        department TEXT NOT NULL,
        role TEXT NOT NULL,
        status TEXT NOT NULL,
        join_date TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS attendance (
        id TEXT PRIMARY KEY,
        staff_id TEXT NOT NULL REFERENCES staff(id),
        date TEXT NOT NULL,
        check_in TEXT,
        check_out TEXT,
        status TEXT NOT NULL,
        leave_type TEXT,
        leave_reason TEXT
    )",
    "CREATE TABLE IF NOT EXISTS shifts (
        id TEXT PRIMARY KEY,
        staff_id TEXT NOT NULL REFERENCES staff(id),
        date TEXT NOT NULL,
        start_time TEXT NOT NULL,
        end_time TEXT NOT NULL
    )",
];

/// Parse a stored text column; a bad value is a storage fault, not a client error.
fn stored<T>(column: &str, value: &str) -> HospitalResult<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value.parse().map_err(|e: T::Err| {
        HospitalError::Storage(format!("Invalid {} '{}' in database: {}", column, value, e))
    })
}

#[derive(Debug, FromRow)]
struct PatientRow {
    id: String,
    first_name: String,
    last_name: String,
    date_of_birth: NaiveDate,
    gender: String,
    email: Option<String>,
    phone: String,
    address: Option<String>,
    status: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<PatientRow> for Patient {
    type Error = HospitalError;

    fn try_from(row: PatientRow) -> HospitalResult<Self> {
        Ok(Patient {
            id: row.id,
            first_name: row.first_name,
            last_name: row.last_name,
            date_of_birth: row.date_of_birth,
            gender: row.gender,
            email: row.email,
            phone: row.phone,
            address: row.address,
            status: row.status,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, FromRow)]
struct AppointmentRow {
    id: String,
    patient_id: String,
    date_time: DateTime<Utc>,
    status: String,
    appointment_type: String,
    notes: Option<String>,
}

impl TryFrom<AppointmentRow> for Appointment {
    type Error = HospitalError;

    fn try_from(row: AppointmentRow) -> HospitalResult<Self> {
        Ok(Appointment {
            id: row.id,
            patient_id: row.patient_id,
            date_time: row.date_time,
            status: row.status,
            appointment_type: row.appointment_type,
            notes: row.notes,
        })
    }
}

#[derive(Debug, FromRow)]
struct AdmissionRow {
    id: String,
    patient_id: String,
    room_number: String,
    admission_date: DateTime<Utc>,
    discharge_date: Option<DateTime<Utc>>,
    status: String,
    notes: Option<String>,
}

impl TryFrom<AdmissionRow> for Admission {
    type Error = HospitalError;

    fn try_from(row: AdmissionRow) -> HospitalResult<Self> {
        Ok(Admission {
            id: row.id,
            patient_id: row.patient_id,
            room_number: row.room_number,
            admission_date: row.admission_date,
            discharge_date: row.discharge_date,
            status: row.status,
            notes: row.notes,
        })
    }
}

/// Money is stored as decimal text so no amount passes through a float.
#[derive(Debug, FromRow)]
struct BillRow {
    id: String,
    patient_id: String,
    amount: String,
    due_date: DateTime<Utc>,
    status: String,
    notes: Option<String>,
    created_at: DateTime<Utc>,
}

impl TryFrom<BillRow> for Bill {
    type Error = HospitalError;

    fn try_from(row: BillRow) -> HospitalResult<Self> {
        Ok(Bill {
            amount: stored::<Decimal>("bill amount", &row.amount)?,
            status: stored::<BillStatus>("bill status", &row.status)?,
            id: row.id,
            patient_id: row.patient_id,
            due_date: row.due_date,
            notes: row.notes,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, FromRow)]
struct PaymentRow {
    id: String,
    bill_id: String,
    amount: String,
    payment_date: DateTime<Utc>,
    payment_method: String,
    status: String,
    notes: Option<String>,
}

impl TryFrom<PaymentRow> for Payment {
    type Error = HospitalError;

    fn try_from(row: PaymentRow) -> HospitalResult<Self> {
        Ok(Payment {
            amount: stored("payment amount", &row.amount)?,
            status: stored("payment status", &row.status)?,
            id: row.id,
            bill_id: row.bill_id,
            payment_date: row.payment_date,
            payment_method: row.payment_method,
            notes: row.notes,
        })
    }
}

#[derive(Debug, FromRow)]
struct ClaimRow {
    id: String,
    patient_id: String,
    provider: String,
    policy_number: String,
    claim_amount: String,
    status: String,
    submission_date: DateTime<Utc>,
    response_date: Option<DateTime<Utc>>,
    notes: Option<String>,
}

impl TryFrom<ClaimRow> for InsuranceClaim {
    type Error = HospitalError;

    fn try_from(row: ClaimRow) -> HospitalResult<Self> {
        Ok(InsuranceClaim {
            claim_amount: stored("claim amount", &row.claim_amount)?,
            id: row.id,
            patient_id: row.patient_id,
            provider: row.provider,
            policy_number: row.policy_number,
            status: row.status,
            submission_date: row.submission_date,
            response_date: row.response_date,
            notes: row.notes,
        })
    }
}

#[derive(Debug, FromRow)]
struct StaffRow {
    id: String,
    first_name: String,
    last_name: String,
    email: String,
    department: String,
    role: String,
    status: String,
    join_date: DateTime<Utc>,
}

impl TryFrom<StaffRow> for Staff {
    type Error = HospitalError;

    fn try_from(row: StaffRow) -> HospitalResult<Self> {
        Ok(Staff {
            id: row.id,
            first_name: row.first_name,
            last_name: row.last_name,
            email: row.email,
            department: row.department,
            role: row.role,
            status: row.status,
            join_date: row.join_date,
        })
    }
}

#[derive(Debug, FromRow)]
struct AttendanceRow {
    id: String,
    staff_id: String,
    date: NaiveDate,
    check_in: Option<DateTime<Utc>>,
    check_out: Option<DateTime<Utc>>,
    status: String,
    leave_type: Option<String>,
    leave_reason: Option<String>,
}

impl TryFrom<AttendanceRow> for Attendance {
    type Error = HospitalError;

    fn try_from(row: AttendanceRow) -> HospitalResult<Self> {
        Ok(Attendance {
            status: stored("attendance status", &row.status)?,
            id: row.id,
            staff_id: row.staff_id,
            date: row.date,
            check_in: row.check_in,
            check_out: row.check_out,
            leave_type: row.leave_type,
            leave_reason: row.leave_reason,
        })
    }
}

#[derive(Debug, FromRow)]
struct ShiftRow {
    id: String,
    staff_id: String,
    date: NaiveDate,
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
}

impl TryFrom<ShiftRow> for Shift {
    type Error = HospitalError;

    fn try_from(row: ShiftRow) -> HospitalResult<Self> {
        Ok(Shift {
            id: row.id,
            staff_id: row.staff_id,
            date: row.date,
            start_time: row.start_time,
            end_time: row.end_time,
        })
    }
}

/// [`RecordStore`] over a SQLite connection pool.
#[derive(Debug, Clone)]
pub struct SqlStore {
    pool: SqlitePool,
}

impl SqlStore {
    /// Open (creating if needed) the database at `url` and ensure the schema.
    pub async fn connect(url: &str) -> HospitalResult<Self> {
        let options = SqliteConnectOptions::from_str(url)
            .map_err(|e| {
                HospitalError::InvalidSource(format!("Invalid database URL '{}': {}", url, e))
            })?
            .create_if_missing(true)
            .foreign_keys(true);

        // Each connection to `:memory:` is its own database; keep exactly one alive.
        let pool = if url.contains(":memory:") {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None::<Duration>)
                .max_lifetime(None::<Duration>)
                .connect_with(options)
                .await?
        } else {
            SqlitePoolOptions::new()
                .max_connections(5)
                .connect_with(options)
                .await?
        };

        let store = Self { pool };
        store.initialize_schema().await?;
        info!("Connected to SQLite database {}", url);
        Ok(store)
    }

    async fn initialize_schema(&self) -> HospitalResult<()> {
        for statement in SCHEMA {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        debug!("SQLite schema ready ({} tables)", SCHEMA.len());
        Ok(())
    }

    /// Close every pooled connection.
    pub async fn close(&self) {
        self.pool.close().await;
    }

    async fn load<R, T>(&self, sql: &'static str) -> HospitalResult<Vec<T>>
    where
        R: for<'r> FromRow<'r, SqliteRow> + Send + Unpin,
        T: TryFrom<R, Error = HospitalError>,
    {
        let rows: Vec<R> = sqlx::query_as::<_, R>(sql).fetch_all(&self.pool).await?;
        rows.into_iter().map(T::try_from).collect()
    }

    async fn load_by_id<R, T>(&self, sql: &'static str, id: &str) -> HospitalResult<Option<T>>
    where
        R: for<'r> FromRow<'r, SqliteRow> + Send + Unpin,
        T: TryFrom<R, Error = HospitalError>,
    {
        sqlx::query_as::<_, R>(sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(T::try_from)
            .transpose()
    }

    async fn patients(&self) -> HospitalResult<Vec<Patient>> {
        self.load::<PatientRow, _>("SELECT * FROM patients ORDER BY rowid").await
    }

    async fn staff(&self) -> HospitalResult<Vec<Staff>> {
        self.load::<StaffRow, _>("SELECT * FROM staff ORDER BY rowid").await
    }

    async fn require_patient(&self, id: &str) -> HospitalResult<Patient> {
        self.load_by_id::<PatientRow, _>("SELECT * FROM patients WHERE id = ?", id)
            .await?
            .ok_or_else(|| HospitalError::NotFound("Patient not found".to_string()))
    }

    async fn require_staff(&self, id: &str) -> HospitalResult<Staff> {
        self.load_by_id::<StaffRow, _>("SELECT * FROM staff WHERE id = ?", id)
            .await?
            .ok_or_else(|| HospitalError::NotFound("Staff not found".to_string()))
    }

    async fn bill_detail(&self, bill: Bill) -> HospitalResult<BillDetail> {
        let tables = Snapshot {
            patients: vec![self.require_patient(&bill.patient_id).await?],
            payments: sqlx::query_as::<_, PaymentRow>(
                "SELECT * FROM payments WHERE bill_id = ? ORDER BY rowid",
            )
            .bind(&bill.id)
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(Payment::try_from)
            .collect::<HospitalResult<_>>()?,
            ..Snapshot::default()
        };
        tables.bill_detail(&bill)
    }
}

#[async_trait]
impl RecordStore for SqlStore {
    async fn find_patients(
        &self,
        predicate: &Predicate<Patient>,
    ) -> HospitalResult<Vec<Related<Patient, Option<Appointment>>>> {
        let tables = Snapshot {
            patients: self.patients().await?,
            appointments: self
                .load::<AppointmentRow, _>("SELECT * FROM appointments ORDER BY rowid")
                .await?,
            ..Snapshot::default()
        };
        Ok(tables.patients_matching(predicate))
    }

    async fn create_patient(&self, new: NewPatient) -> HospitalResult<Patient> {
        let patient = new.into_record();
        sqlx::query(
            "INSERT INTO patients (
                id, first_name, last_name, date_of_birth, gender,
                email, phone, address, status, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&patient.id)
        .bind(&patient.first_name)
        .bind(&patient.last_name)
        .bind(patient.date_of_birth)
        .bind(&patient.gender)
        .bind(&patient.email)
        .bind(&patient.phone)
        .bind(&patient.address)
        .bind(&patient.status)
        .bind(patient.created_at)
        .execute(&self.pool)
        .await?;
        Ok(patient)
    }

    async fn find_appointments(
        &self,
        predicate: &Predicate<Related<Appointment, Patient>>,
    ) -> HospitalResult<Vec<Related<Appointment, Patient>>> {
        let tables = Snapshot {
            patients: self.patients().await?,
            appointments: self
                .load::<AppointmentRow, _>("SELECT * FROM appointments ORDER BY rowid")
                .await?,
            ..Snapshot::default()
        };
        Ok(tables.appointments_matching(predicate))
    }

    async fn create_appointment(
        &self,
        new: NewAppointment,
    ) -> HospitalResult<Related<Appointment, Patient>> {
        let patient = self.require_patient(&new.patient_id).await?;
        let appointment = new.into_record();
        sqlx::query(
            "INSERT INTO appointments (id, patient_id, date_time, status, appointment_type, notes)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&appointment.id)
        .bind(&appointment.patient_id)
        .bind(appointment.date_time)
        .bind(&appointment.status)
        .bind(&appointment.appointment_type)
        .bind(&appointment.notes)
        .execute(&self.pool)
        .await?;
        Ok(Related::new(appointment, patient))
    }

    async fn find_admissions(
        &self,
        predicate: &Predicate<Related<Admission, Patient>>,
    ) -> HospitalResult<Vec<Related<Admission, Patient>>> {
        let tables = Snapshot {
            patients: self.patients().await?,
            admissions: self
                .load::<AdmissionRow, _>("SELECT * FROM admissions ORDER BY rowid")
                .await?,
            ..Snapshot::default()
        };
        Ok(tables.admissions_matching(predicate))
    }

    async fn create_admission(
        &self,
        new: NewAdmission,
    ) -> HospitalResult<Related<Admission, Patient>> {
        let patient = self.require_patient(&new.patient_id).await?;
        let admission = new.into_record();
        sqlx::query(
            "INSERT INTO admissions (
                id, patient_id, room_number, admission_date, discharge_date, status, notes
            ) VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&admission.id)
        .bind(&admission.patient_id)
        .bind(&admission.room_number)
        .bind(admission.admission_date)
        .bind(admission.discharge_date)
        .bind(&admission.status)
        .bind(&admission.notes)
        .execute(&self.pool)
        .await?;
        Ok(Related::new(admission, patient))
    }

    async fn discharge_admission(
        &self,
        id: &str,
        at: DateTime<Utc>,
    ) -> HospitalResult<Related<Admission, Patient>> {
        let updated = sqlx::query(
            "UPDATE admissions SET discharge_date = ?, status = 'Discharged' WHERE id = ?",
        )
        .bind(at)
        .bind(id)
        .execute(&self.pool)
        .await?;
        if updated.rows_affected() == 0 {
            return Err(HospitalError::NotFound("Admission not found".to_string()));
        }
        let admission: Admission = self
            .load_by_id::<AdmissionRow, _>("SELECT * FROM admissions WHERE id = ?", id)
            .await?
            .ok_or_else(|| HospitalError::NotFound("Admission not found".to_string()))?;
        let patient = self.require_patient(&admission.patient_id).await?;
        Ok(Related::new(admission, patient))
    }

    async fn find_bills(
        &self,
        predicate: &Predicate<Related<Bill, Patient>>,
    ) -> HospitalResult<Vec<Related<Bill, Patient>>> {
        let tables = Snapshot {
            patients: self.patients().await?,
            bills: self
                .load::<BillRow, _>("SELECT * FROM bills ORDER BY rowid")
                .await?,
            ..Snapshot::default()
        };
        Ok(tables.bills_matching(predicate))
    }

    async fn create_bill(&self, new: NewBill) -> HospitalResult<Related<Bill, Patient>> {
        let patient = self.require_patient(&new.patient_id).await?;
        let bill = new.into_record();
        sqlx::query(
            "INSERT INTO bills (id, patient_id, amount, due_date, status, notes, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&bill.id)
        .bind(&bill.patient_id)
        .bind(bill.amount.to_string())
        .bind(bill.due_date)
        .bind(bill.status.as_str())
        .bind(&bill.notes)
        .bind(bill.created_at)
        .execute(&self.pool)
        .await?;
        Ok(Related::new(bill, patient))
    }

    async fn get_bill(&self, id: &str) -> HospitalResult<Option<BillDetail>> {
        let bill: Option<Bill> = self
            .load_by_id::<BillRow, _>("SELECT * FROM bills WHERE id = ?", id)
            .await?;
        match bill {
            Some(bill) => self.bill_detail(bill).await.map(Some),
            None => Ok(None),
        }
    }

    async fn update_bill_status(
        &self,
        id: &str,
        status: BillStatus,
    ) -> HospitalResult<BillDetail> {
        let updated = sqlx::query("UPDATE bills SET status = ? WHERE id = ?")
            .bind(status.as_str())
            .bind(id)
            .execute(&self.pool)
            .await?;
        if updated.rows_affected() == 0 {
            return Err(HospitalError::NotFound("Bill not found".to_string()));
        }
        self.get_bill(id)
            .await?
            .ok_or_else(|| HospitalError::NotFound("Bill not found".to_string()))
    }

    async fn find_payments(&self, predicate: &Predicate<Payment>) -> HospitalResult<Vec<Payment>> {
        let tables = Snapshot {
            payments: self
                .load::<PaymentRow, _>("SELECT * FROM payments ORDER BY rowid")
                .await?,
            ..Snapshot::default()
        };
        Ok(tables.payments_matching(predicate))
    }

    async fn create_payment(&self, new: NewPayment) -> HospitalResult<Payment> {
        let bill = sqlx::query("SELECT id FROM bills WHERE id = ?")
            .bind(&new.bill_id)
            .fetch_optional(&self.pool)
            .await?;
        if bill.is_none() {
            return Err(HospitalError::NotFound("Bill not found".to_string()));
        }
        let payment = new.into_record();
        sqlx::query(
            "INSERT INTO payments (
                id, bill_id, amount, payment_date, payment_method, status, notes
            ) VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&payment.id)
        .bind(&payment.bill_id)
        .bind(payment.amount.to_string())
        .bind(payment.payment_date)
        .bind(&payment.payment_method)
        .bind(payment.status.as_str())
        .bind(&payment.notes)
        .execute(&self.pool)
        .await?;
        Ok(payment)
    }

    async fn find_claims(
        &self,
        predicate: &Predicate<Related<InsuranceClaim, Patient>>,
    ) -> HospitalResult<Vec<Related<InsuranceClaim, Patient>>> {
        let tables = Snapshot {
            patients: self.patients().await?,
            insurance_claims: self
                .load::<ClaimRow, _>("SELECT * FROM insurance_claims ORDER BY rowid")
                .await?,
            ..Snapshot::default()
        };
        Ok(tables.claims_matching(predicate))
    }

    async fn create_claim(
        &self,
        new: NewInsuranceClaim,
    ) -> HospitalResult<Related<InsuranceClaim, Patient>> {
        let patient = self.require_patient(&new.patient_id).await?;
        let claim = new.into_record();
        sqlx::query(
            "INSERT INTO insurance_claims (
                id, patient_id, provider, policy_number, claim_amount,
                status, submission_date, response_date, notes
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&claim.id)
        .bind(&claim.patient_id)
        .bind(&claim.provider)
        .bind(&claim.policy_number)
        .bind(claim.claim_amount.to_string())
        .bind(&claim.status)
        .bind(claim.submission_date)
        .bind(claim.response_date)
        .bind(&claim.notes)
        .execute(&self.pool)
        .await?;
        Ok(Related::new(claim, patient))
    }

    async fn find_staff(&self, predicate: &Predicate<Staff>) -> HospitalResult<Vec<Staff>> {
        let tables = Snapshot {
            staff: self.staff().await?,
            ..Snapshot::default()
        };
        Ok(tables.staff_matching(predicate))
    }

    async fn create_staff(&self, new: NewStaff) -> HospitalResult<Staff> {
        let staff = new.into_record();
        sqlx::query(
            "INSERT INTO staff (
                id, first_name, last_name, email, department, role, status, join_date
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&staff.id)
        .bind(&staff.first_name)
        .bind(&staff.last_name)
        .bind(&staff.email)
        .bind(&staff.department)
        .bind(&staff.role)
        .bind(&staff.status)
        .bind(staff.join_date)
        .execute(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                HospitalError::Conflict("Email already exists".to_string())
            }
            other => HospitalError::from(other),
        })?;
        Ok(staff)
    }

    async fn find_attendance(
        &self,
        predicate: &Predicate<Related<Attendance, Staff>>,
        order: SortOrder,
    ) -> HospitalResult<Vec<Related<Attendance, Staff>>> {
        let tables = Snapshot {
            staff: self.staff().await?,
            attendance: self
                .load::<AttendanceRow, _>("SELECT * FROM attendance ORDER BY rowid")
                .await?,
            ..Snapshot::default()
        };
        Ok(tables.attendance_matching(predicate, order))
    }

    async fn create_attendance(
        &self,
        new: NewAttendance,
    ) -> HospitalResult<Related<Attendance, Staff>> {
        let staff = self.require_staff(&new.staff_id).await?;
        let record = new.into_record();
        sqlx::query(
            "INSERT INTO attendance (
                id, staff_id, date, check_in, check_out, status, leave_type, leave_reason
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&record.id)
        .bind(&record.staff_id)
        .bind(record.date)
        .bind(record.check_in)
        .bind(record.check_out)
        .bind(record.status.as_str())
        .bind(&record.leave_type)
        .bind(&record.leave_reason)
        .execute(&self.pool)
        .await?;
        Ok(Related::new(record, staff))
    }

    async fn find_shifts(
        &self,
        predicate: &Predicate<Related<Shift, Staff>>,
        order: SortOrder,
    ) -> HospitalResult<Vec<Related<Shift, Staff>>> {
        let tables = Snapshot {
            staff: self.staff().await?,
            shifts: self
                .load::<ShiftRow, _>("SELECT * FROM shifts ORDER BY rowid")
                .await?,
            ..Snapshot::default()
        };
        Ok(tables.shifts_matching(predicate, order))
    }

    async fn create_shift(&self, new: NewShift) -> HospitalResult<Related<Shift, Staff>> {
        new.validate()?;
        let staff = self.require_staff(&new.staff_id).await?;
        let shift = new.into_record();
        sqlx::query(
            "INSERT INTO shifts (id, staff_id, date, start_time, end_time)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&shift.id)
        .bind(&shift.staff_id)
        .bind(shift.date)
        .bind(shift.start_time)
        .bind(shift.end_time)
        .execute(&self.pool)
        .await?;
        Ok(Related::new(shift, staff))
    }
}
