//! Request handlers for the hospital server
//!
//! One handler per route. List handlers validate their query string into a
//! [`RecordQuery`], hand the matching predicate to the store and format the
//! rows; create handlers decode the body into a request type from
//! [`hospital_core::requests`] and return the stored record in wire shape.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use chrono::{NaiveDate, Utc};
use hospital_core::{
    RecordStore,
    dto::{
        AdmissionDto, AppointmentDto, AttendanceDto, BillDetailDto, BillDto, DepartmentDto,
        InsuranceClaimDto, MessageDto, PatientDto, PaymentDto, ShiftDto, StaffDto, departments,
        format_all,
    },
    export::attendance_report,
    filter::{
        Predicate, admission_predicate, appointment_predicate, attendance_predicate,
        bill_predicate, claim_predicate, patient_predicate, shift_predicate, staff_predicate,
    },
    reporting::{
        AttendanceSummary, RevenueRangeReport, RevenueReport, RosterOverview, attendance_summary,
        revenue_range, revenue_report, roster_overview,
    },
    requests::{
        CreateAdmissionRequest, CreateAppointmentRequest, CreateAttendanceRequest,
        CreateBillRequest, CreateClaimRequest, CreateDepartmentRequest, CreatePatientRequest,
        CreatePaymentRequest, CreateShiftRequest, CreateStaffRequest, UpdateBillStatusRequest,
    },
    store::{SeedOutcome, SortOrder, seed_demo_staff},
};
use tracing::{debug, info};

use super::{
    error::{OrFail, ServerError, ServerResult},
    models::{
        ClaimParams, RangeParams, RevenueParams, RosterParams, SearchParams, StaffParams,
        parse_body, validate_range, validate_roster_params, validate_timeframe,
    },
};

type Body = Result<Json<serde_json::Value>, JsonRejection>;

/// Shared state of every handler: the record store.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn RecordStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// Simple health check endpoint
pub async fn health_check() -> impl IntoResponse {
    info!("Handling Health Check request");
    Json(serde_json::json!({
        "status": "ok",
        "service": "hospital-server",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// GET /api/patients
pub async fn list_patients(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> ServerResult<Json<Vec<PatientDto>>> {
    info!("Handling patient list request");
    debug!("Query params: {:?}", params);
    let rows = state
        .store
        .find_patients(&patient_predicate(&params.query()))
        .await
        .or_fail("Failed to fetch patients")?;
    Ok(Json(format_all(rows)))
}

/// POST /api/patients
pub async fn create_patient(
    State(state): State<AppState>,
    body: Body,
) -> ServerResult<Json<PatientDto>> {
    info!("Handling patient create request");
    let request: CreatePatientRequest = parse_body(body)?;
    let new = request.into_new().or_fail("Failed to create patient")?;
    let patient = state
        .store
        .create_patient(new)
        .await
        .or_fail("Failed to create patient")?;
    Ok(Json(PatientDto::from(patient)))
}

/// GET /api/appointments
pub async fn list_appointments(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> ServerResult<Json<Vec<AppointmentDto>>> {
    info!("Handling appointment list request");
    debug!("Query params: {:?}", params);
    let rows = state
        .store
        .find_appointments(&appointment_predicate(&params.query()))
        .await
        .or_fail("Failed to fetch appointments")?;
    Ok(Json(format_all(rows)))
}

/// POST /api/appointments
pub async fn create_appointment(
    State(state): State<AppState>,
    body: Body,
) -> ServerResult<Json<AppointmentDto>> {
    info!("Handling appointment create request");
    let request: CreateAppointmentRequest = parse_body(body)?;
    let new = request.into_new().or_fail("Failed to create appointment")?;
    let row = state
        .store
        .create_appointment(new)
        .await
        .or_fail("Failed to create appointment")?;
    Ok(Json(AppointmentDto::from(row)))
}

/// GET /api/admissions
pub async fn list_admissions(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> ServerResult<Json<Vec<AdmissionDto>>> {
    info!("Handling admission list request");
    debug!("Query params: {:?}", params);
    let rows = state
        .store
        .find_admissions(&admission_predicate(&params.query()))
        .await
        .or_fail("Failed to fetch admissions")?;
    Ok(Json(format_all(rows)))
}

/// POST /api/admissions
pub async fn create_admission(
    State(state): State<AppState>,
    body: Body,
) -> ServerResult<Json<AdmissionDto>> {
    info!("Handling admission create request");
    let request: CreateAdmissionRequest = parse_body(body)?;
    let new = request.into_new().or_fail("Failed to create admission")?;
    let row = state
        .store
        .create_admission(new)
        .await
        .or_fail("Failed to create admission")?;
    Ok(Json(AdmissionDto::from(row)))
}

/// PUT /api/admissions/{id}/discharge
pub async fn discharge_admission(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ServerResult<Json<AdmissionDto>> {
    info!("Handling discharge request for admission {}", id);
    let row = state
        .store
        .discharge_admission(&id, Utc::now())
        .await
        .or_fail("Failed to discharge patient")?;
    Ok(Json(AdmissionDto::from(row)))
}

/// GET /api/bills
pub async fn list_bills(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> ServerResult<Json<Vec<BillDto>>> {
    info!("Handling bill list request");
    debug!("Query params: {:?}", params);
    let rows = state
        .store
        .find_bills(&bill_predicate(&params.query()))
        .await
        .or_fail("Failed to fetch bills")?;
    Ok(Json(format_all(rows)))
}

/// POST /api/bills
pub async fn create_bill(
    State(state): State<AppState>,
    body: Body,
) -> ServerResult<Json<BillDto>> {
    info!("Handling bill create request");
    let request: CreateBillRequest = parse_body(body)?;
    let new = request.into_new().or_fail("Failed to create bill")?;
    let row = state
        .store
        .create_bill(new)
        .await
        .or_fail("Failed to create bill")?;
    Ok(Json(BillDto::from(row)))
}

/// GET /api/bills/{id}
pub async fn get_bill(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ServerResult<Json<BillDetailDto>> {
    info!("Handling bill detail request for {}", id);
    let detail = state
        .store
        .get_bill(&id)
        .await
        .or_fail("Failed to fetch bill")?
        .ok_or_else(|| ServerError::NotFound("Bill not found".to_string()))?;
    Ok(Json(BillDetailDto::from(detail)))
}

/// PATCH /api/bills/{id}
///
/// Only the status moves; payments, and therefore revenue, are untouched.
pub async fn update_bill_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Body,
) -> ServerResult<Json<BillDetailDto>> {
    info!("Handling bill status update for {}", id);
    let request: UpdateBillStatusRequest = parse_body(body)?;
    let status = request.status().or_fail("Failed to update bill")?;
    let detail = state
        .store
        .update_bill_status(&id, status)
        .await
        .or_fail("Failed to update bill")?;
    Ok(Json(BillDetailDto::from(detail)))
}

/// POST /api/bills/{id}/payments
pub async fn create_payment(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Body,
) -> ServerResult<Json<PaymentDto>> {
    info!("Handling payment for bill {}", id);
    let request: CreatePaymentRequest = parse_body(body)?;
    let new = request
        .into_new(&id, Utc::now())
        .or_fail("Failed to record payment")?;
    let payment = state
        .store
        .create_payment(new)
        .await
        .or_fail("Failed to record payment")?;
    Ok(Json(PaymentDto::from(payment)))
}

/// GET /api/insurance
pub async fn list_claims(
    State(state): State<AppState>,
    Query(params): Query<ClaimParams>,
) -> ServerResult<Json<Vec<InsuranceClaimDto>>> {
    info!("Handling insurance claim list request");
    debug!("Query params: {:?}", params);
    let rows = state
        .store
        .find_claims(&claim_predicate(&params.query()))
        .await
        .or_fail("Failed to fetch insurance claims")?;
    Ok(Json(format_all(rows)))
}

/// POST /api/insurance
pub async fn create_claim(
    State(state): State<AppState>,
    body: Body,
) -> ServerResult<Json<InsuranceClaimDto>> {
    info!("Handling insurance claim create request");
    let request: CreateClaimRequest = parse_body(body)?;
    let new = request.into_new().or_fail("Failed to create insurance claim")?;
    let row = state
        .store
        .create_claim(new)
        .await
        .or_fail("Failed to create insurance claim")?;
    Ok(Json(InsuranceClaimDto::from(row)))
}

/// GET /api/revenue?timeframe=week|month|quarter|year
pub async fn revenue(
    State(state): State<AppState>,
    Query(params): Query<RevenueParams>,
) -> ServerResult<Json<RevenueReport>> {
    info!("Handling revenue request");
    debug!("Query params: {:?}", params);
    let timeframe = validate_timeframe(&params).map_err(ServerError::BadRequest)?;
    let report = revenue_report(state.store.as_ref(), timeframe, today())
        .await
        .or_fail("Failed to fetch revenue data")?;
    Ok(Json(report))
}

/// GET /api/revenue/range?startDate=&endDate=
pub async fn revenue_in_range(
    State(state): State<AppState>,
    Query(params): Query<RangeParams>,
) -> ServerResult<Json<RevenueRangeReport>> {
    info!("Handling revenue range request");
    debug!("Query params: {:?}", params);
    let (start, end) = validate_range(&params).map_err(ServerError::BadRequest)?;
    let report = revenue_range(state.store.as_ref(), start, end)
        .await
        .or_fail("Failed to fetch revenue data")?;
    Ok(Json(report))
}

/// GET /api/staff
pub async fn list_staff(
    State(state): State<AppState>,
    Query(params): Query<StaffParams>,
) -> ServerResult<Json<Vec<StaffDto>>> {
    info!("Handling staff list request");
    debug!("Query params: {:?}", params);
    let rows = state
        .store
        .find_staff(&staff_predicate(&params.query()))
        .await
        .or_fail("Failed to fetch staff")?;
    Ok(Json(format_all(rows)))
}

/// POST /api/staff
pub async fn create_staff(
    State(state): State<AppState>,
    body: Body,
) -> ServerResult<(StatusCode, Json<StaffDto>)> {
    info!("Handling staff create request");
    let request: CreateStaffRequest = parse_body(body)?;
    let new = request.into_new().or_fail("Failed to create staff")?;
    let staff = state
        .store
        .create_staff(new)
        .await
        .or_fail("Failed to create staff")?;
    Ok((StatusCode::CREATED, Json(StaffDto::from(staff))))
}

/// POST /api/staff/seed
pub async fn seed_staff(State(state): State<AppState>) -> ServerResult<Json<MessageDto>> {
    info!("Handling staff seed request");
    let outcome = seed_demo_staff(state.store.as_ref())
        .await
        .or_fail("Failed to seed database")?;
    let message = match outcome {
        SeedOutcome::AlreadySeeded => "Staff already seeded",
        SeedOutcome::Seeded(count) => {
            info!("Seeded {} staff members", count);
            "Database seeded successfully"
        }
    };
    Ok(Json(MessageDto::new(message)))
}

/// GET /api/departments
pub async fn list_departments(
    State(state): State<AppState>,
) -> ServerResult<Json<Vec<DepartmentDto>>> {
    info!("Handling department list request");
    let staff = state
        .store
        .find_staff(&Predicate::any())
        .await
        .or_fail("Failed to fetch departments")?;
    Ok(Json(departments(&staff)))
}

/// POST /api/departments
///
/// Departments only exist as a tag on staff rows, so nothing is stored; the
/// department is echoed back with no staff.
pub async fn create_department(body: Body) -> ServerResult<Json<DepartmentDto>> {
    info!("Handling department create request");
    let request: CreateDepartmentRequest = parse_body(body)?;
    let name = request.name.trim();
    if name.is_empty() {
        return Err(ServerError::BadRequest("Missing required fields".to_string()));
    }
    let mut department = DepartmentDto::new(name, 0);
    if let Some(description) = request.description.filter(|d| !d.trim().is_empty()) {
        department.description = description;
    }
    Ok(Json(department))
}

/// GET /api/staff/attendance
pub async fn list_attendance(
    State(state): State<AppState>,
    Query(params): Query<RosterParams>,
) -> ServerResult<Json<Vec<AttendanceDto>>> {
    info!("Handling attendance list request");
    debug!("Query params: {:?}", params);
    let validated = validate_roster_params(&params).map_err(ServerError::BadRequest)?;
    let rows = state
        .store
        .find_attendance(
            &attendance_predicate(&validated.query),
            SortOrder::Descending,
        )
        .await
        .or_fail("Failed to fetch attendance")?;
    Ok(Json(format_all(rows)))
}

/// POST /api/staff/attendance
pub async fn create_attendance(
    State(state): State<AppState>,
    body: Body,
) -> ServerResult<Json<AttendanceDto>> {
    info!("Handling attendance create request");
    let request: CreateAttendanceRequest = parse_body(body)?;
    let new = request.into_new().or_fail("Failed to create attendance")?;
    let row = state
        .store
        .create_attendance(new)
        .await
        .or_fail("Failed to create attendance")?;
    Ok(Json(AttendanceDto::from(row)))
}

/// GET /api/staff/attendance/summary
pub async fn attendance_summary_handler(
    State(state): State<AppState>,
    Query(params): Query<RosterParams>,
) -> ServerResult<Json<AttendanceSummary>> {
    info!("Handling attendance summary request");
    debug!("Query params: {:?}", params);
    let validated = validate_roster_params(&params).map_err(ServerError::BadRequest)?;
    let summary = attendance_summary(
        state.store.as_ref(),
        validated.reference_date(today()),
        validated.department.as_deref(),
    )
    .await
    .or_fail("Failed to fetch attendance summary")?;
    Ok(Json(summary))
}

/// GET /api/staff/attendance/report
///
/// The monthly CSV as an attachment named after the month.
pub async fn attendance_report_handler(
    State(state): State<AppState>,
    Query(params): Query<RosterParams>,
) -> ServerResult<Response> {
    info!("Handling attendance report request");
    debug!("Query params: {:?}", params);
    let validated = validate_roster_params(&params).map_err(ServerError::BadRequest)?;
    let report = attendance_report(
        state.store.as_ref(),
        validated.reference_date(today()),
        validated.department.as_deref(),
    )
    .await
    .or_fail("Failed to generate report")?;

    info!(
        "Generated {} ({} bytes)",
        report.filename,
        report.body.len()
    );
    let disposition = format!("attachment; filename={}", report.filename);
    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        report.body,
    )
        .into_response())
}

/// GET /api/staff/shifts
pub async fn list_shifts(
    State(state): State<AppState>,
    Query(params): Query<RosterParams>,
) -> ServerResult<Json<Vec<ShiftDto>>> {
    info!("Handling shift list request");
    debug!("Query params: {:?}", params);
    let validated = validate_roster_params(&params).map_err(ServerError::BadRequest)?;
    let rows = state
        .store
        .find_shifts(&shift_predicate(&validated.query), SortOrder::Descending)
        .await
        .or_fail("Failed to fetch shifts")?;
    Ok(Json(format_all(rows)))
}

/// POST /api/staff/shifts
pub async fn create_shift(
    State(state): State<AppState>,
    body: Body,
) -> ServerResult<Json<ShiftDto>> {
    info!("Handling shift create request");
    let request: CreateShiftRequest = parse_body(body)?;
    let new = request.into_new().or_fail("Failed to create shift")?;
    let row = state
        .store
        .create_shift(new)
        .await
        .or_fail("Failed to create shift")?;
    Ok(Json(ShiftDto::from(row)))
}

/// GET /api/staff/initial-data
pub async fn initial_data(State(state): State<AppState>) -> ServerResult<Json<RosterOverview>> {
    info!("Handling roster overview request");
    let overview = roster_overview(state.store.as_ref(), today())
        .await
        .or_fail("Failed to fetch initial data")?;
    debug!(
        "{} shifts today across {} departments",
        overview.shifts.len(),
        overview.department_workload.len()
    );
    Ok(Json(overview))
}
