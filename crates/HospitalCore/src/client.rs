//! Typed HTTP client for the hospital API.
//!
//! One method per endpoint. Non-2xx answers become
//! [`HospitalError::Api`] carrying the status and the server's `error` text.
//!
//! ```rust,no_run
//! use hospital_core::client::HospitalClient;
//! use hospital_core::reporting::Timeframe;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = HospitalClient::new("http://127.0.0.1:8080")?;
//! let report = client.revenue(Timeframe::Quarter).await?;
//! println!("growth: {}%", report.stats.revenue_growth);
//! # Ok(())
//! # }
//! ```

use chrono::NaiveDate;
use reqwest::header::CONTENT_DISPOSITION;
use reqwest::{RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use crate::dto::{
    AdmissionDto, AppointmentDto, AttendanceDto, BillDetailDto, BillDto, DepartmentDto,
    InsuranceClaimDto, MessageDto, PatientDto, PaymentDto, ShiftDto, StaffDto,
};
use crate::export::AttendanceReport;
use crate::models::BillStatus;
use crate::reporting::{
    AttendanceSummary, RevenueRangeReport, RevenueReport, RosterOverview, Timeframe,
};
use crate::requests::{
    CreateAdmissionRequest, CreateAppointmentRequest, CreateAttendanceRequest, CreateBillRequest,
    CreateClaimRequest, CreateDepartmentRequest, CreatePatientRequest, CreatePaymentRequest,
    CreateShiftRequest, CreateStaffRequest, UpdateBillStatusRequest,
};
use crate::{HospitalError, HospitalResult};

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// Query string pairs, dropping unset values.
fn query(pairs: &[(&'static str, Option<String>)]) -> Vec<(&'static str, String)> {
    pairs
        .iter()
        .filter_map(|(key, value)| value.clone().map(|v| (*key, v)))
        .collect()
}

fn day(date: Option<NaiveDate>) -> Option<String> {
    date.map(|d| d.format("%Y-%m-%d").to_string())
}

fn text(value: Option<&str>) -> Option<String> {
    value.map(str::to_string)
}

#[derive(Debug, Clone)]
pub struct HospitalClient {
    base: Url,
    http: reqwest::Client,
}

impl HospitalClient {
    pub fn new(base_url: &str) -> HospitalResult<Self> {
        Self::with_client(base_url, reqwest::Client::new())
    }

    pub fn with_client(base_url: &str, http: reqwest::Client) -> HospitalResult<Self> {
        let base = Url::parse(base_url).map_err(|e| {
            HospitalError::InvalidSource(format!("Invalid base URL '{}': {}", base_url, e))
        })?;
        Ok(Self { base, http })
    }

    fn url(&self, path: &str) -> HospitalResult<Url> {
        self.base
            .join(path)
            .map_err(|e| HospitalError::InvalidSource(format!("Invalid path '{}': {}", path, e)))
    }

    async fn send(&self, request: RequestBuilder) -> HospitalResult<Response> {
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&body)
            .map(|b| b.error)
            .unwrap_or(body);
        debug!("API error {}: {}", status, message);
        Err(HospitalError::Api {
            status: status.as_u16(),
            message,
        })
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&'static str, Option<String>)],
    ) -> HospitalResult<T> {
        let request = self.http.get(self.url(path)?).query(&query(params));
        Ok(self.send(request).await?.json().await?)
    }

    async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> HospitalResult<T> {
        let request = self.http.post(self.url(path)?).json(body);
        Ok(self.send(request).await?.json().await?)
    }

    pub async fn health(&self) -> HospitalResult<serde_json::Value> {
        self.get("/health", &[]).await
    }

    pub async fn patients(&self, search: Option<&str>) -> HospitalResult<Vec<PatientDto>> {
        self.get("/api/patients", &[("search", text(search))]).await
    }

    pub async fn create_patient(&self, body: &CreatePatientRequest) -> HospitalResult<PatientDto> {
        self.post("/api/patients", body).await
    }

    pub async fn appointments(&self, search: Option<&str>) -> HospitalResult<Vec<AppointmentDto>> {
        self.get("/api/appointments", &[("search", text(search))])
            .await
    }

    pub async fn create_appointment(
        &self,
        body: &CreateAppointmentRequest,
    ) -> HospitalResult<AppointmentDto> {
        self.post("/api/appointments", body).await
    }

    pub async fn admissions(&self, search: Option<&str>) -> HospitalResult<Vec<AdmissionDto>> {
        self.get("/api/admissions", &[("search", text(search))]).await
    }

    pub async fn create_admission(
        &self,
        body: &CreateAdmissionRequest,
    ) -> HospitalResult<AdmissionDto> {
        self.post("/api/admissions", body).await
    }

    pub async fn discharge(&self, admission_id: &str) -> HospitalResult<AdmissionDto> {
        let path = format!("/api/admissions/{}/discharge", admission_id);
        let request = self.http.put(self.url(&path)?);
        Ok(self.send(request).await?.json().await?)
    }

    pub async fn bills(&self, search: Option<&str>) -> HospitalResult<Vec<BillDto>> {
        self.get("/api/bills", &[("search", text(search))]).await
    }

    pub async fn create_bill(&self, body: &CreateBillRequest) -> HospitalResult<BillDto> {
        self.post("/api/bills", body).await
    }

    pub async fn bill(&self, bill_id: &str) -> HospitalResult<BillDetailDto> {
        self.get(&format!("/api/bills/{}", bill_id), &[]).await
    }

    pub async fn update_bill_status(
        &self,
        bill_id: &str,
        status: BillStatus,
    ) -> HospitalResult<BillDetailDto> {
        let body = UpdateBillStatusRequest {
            status: status.to_string(),
        };
        let request = self
            .http
            .patch(self.url(&format!("/api/bills/{}", bill_id))?)
            .json(&body);
        Ok(self.send(request).await?.json().await?)
    }

    pub async fn record_payment(
        &self,
        bill_id: &str,
        body: &CreatePaymentRequest,
    ) -> HospitalResult<PaymentDto> {
        self.post(&format!("/api/bills/{}/payments", bill_id), body)
            .await
    }

    pub async fn insurance_claims(
        &self,
        search: Option<&str>,
        status: Option<&str>,
    ) -> HospitalResult<Vec<InsuranceClaimDto>> {
        self.get(
            "/api/insurance",
            &[("search", text(search)), ("status", text(status))],
        )
        .await
    }

    pub async fn create_claim(
        &self,
        body: &CreateClaimRequest,
    ) -> HospitalResult<InsuranceClaimDto> {
        self.post("/api/insurance", body).await
    }

    pub async fn revenue(&self, timeframe: Timeframe) -> HospitalResult<RevenueReport> {
        self.get(
            "/api/revenue",
            &[("timeframe", Some(timeframe.to_string()))],
        )
        .await
    }

    pub async fn revenue_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> HospitalResult<RevenueRangeReport> {
        self.get(
            "/api/revenue/range",
            &[("startDate", day(Some(start))), ("endDate", day(Some(end)))],
        )
        .await
    }

    pub async fn staff(
        &self,
        department: Option<&str>,
        search: Option<&str>,
    ) -> HospitalResult<Vec<StaffDto>> {
        self.get(
            "/api/staff",
            &[("department", text(department)), ("search", text(search))],
        )
        .await
    }

    pub async fn create_staff(&self, body: &CreateStaffRequest) -> HospitalResult<StaffDto> {
        self.post("/api/staff", body).await
    }

    pub async fn seed_staff(&self) -> HospitalResult<MessageDto> {
        let request = self.http.post(self.url("/api/staff/seed")?);
        Ok(self.send(request).await?.json().await?)
    }

    pub async fn departments(&self) -> HospitalResult<Vec<DepartmentDto>> {
        self.get("/api/departments", &[]).await
    }

    pub async fn create_department(
        &self,
        body: &CreateDepartmentRequest,
    ) -> HospitalResult<DepartmentDto> {
        self.post("/api/departments", body).await
    }

    pub async fn attendance(
        &self,
        date: Option<NaiveDate>,
        department: Option<&str>,
        search: Option<&str>,
    ) -> HospitalResult<Vec<AttendanceDto>> {
        self.get(
            "/api/staff/attendance",
            &[
                ("date", day(date)),
                ("department", text(department)),
                ("search", text(search)),
            ],
        )
        .await
    }

    pub async fn create_attendance(
        &self,
        body: &CreateAttendanceRequest,
    ) -> HospitalResult<AttendanceDto> {
        self.post("/api/staff/attendance", body).await
    }

    pub async fn attendance_summary(
        &self,
        date: Option<NaiveDate>,
        department: Option<&str>,
    ) -> HospitalResult<AttendanceSummary> {
        self.get(
            "/api/staff/attendance/summary",
            &[("date", day(date)), ("department", text(department))],
        )
        .await
    }

    /// Download the monthly CSV. The filename comes from `Content-Disposition`.
    pub async fn attendance_report(
        &self,
        date: Option<NaiveDate>,
        department: Option<&str>,
    ) -> HospitalResult<AttendanceReport> {
        let params = query(&[("date", day(date)), ("department", text(department))]);
        let request = self
            .http
            .get(self.url("/api/staff/attendance/report")?)
            .query(&params);
        let response = self.send(request).await?;
        let filename = response
            .headers()
            .get(CONTENT_DISPOSITION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split("filename=").nth(1))
            .map(|name| name.trim_matches('"').to_string())
            .unwrap_or_else(|| "attendance-report.csv".to_string());
        let body = response.bytes().await?.to_vec();
        Ok(AttendanceReport { filename, body })
    }

    pub async fn shifts(
        &self,
        date: Option<NaiveDate>,
        department: Option<&str>,
    ) -> HospitalResult<Vec<ShiftDto>> {
        self.get(
            "/api/staff/shifts",
            &[("date", day(date)), ("department", text(department))],
        )
        .await
    }

    pub async fn create_shift(&self, body: &CreateShiftRequest) -> HospitalResult<ShiftDto> {
        self.post("/api/staff/shifts", body).await
    }

    pub async fn initial_data(&self) -> HospitalResult<RosterOverview> {
        self.get("/api/staff/initial-data", &[]).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_drops_unset_values() {
        let pairs = query(&[
            ("search", Some("ann".to_string())),
            ("department", None),
            ("date", day(NaiveDate::from_ymd_opt(2024, 3, 4))),
        ]);
        assert_eq!(
            pairs,
            vec![
                ("search", "ann".to_string()),
                ("date", "2024-03-04".to_string())
            ]
        );
    }

    #[test]
    fn test_rejects_invalid_base_url() {
        let err = HospitalClient::new("not a url").unwrap_err();
        assert!(matches!(err, HospitalError::InvalidSource(_)));
    }

    #[test]
    fn test_paths_join_onto_base() {
        let client = HospitalClient::new("http://127.0.0.1:8080").unwrap();
        assert_eq!(
            client.url("/api/staff").unwrap().as_str(),
            "http://127.0.0.1:8080/api/staff"
        );
    }
}
