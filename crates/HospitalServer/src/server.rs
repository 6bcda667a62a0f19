//! # Hospital Operations Server
//!
//! HTTP JSON API over the hospital record store: patients, appointments,
//! admissions, billing and payments, insurance claims, staff, attendance and
//! shifts, plus the revenue, attendance and workload rollups.
//!
//! ## API Endpoints
//!
//! ```text
//! GET  /health
//! GET  /api/patients?search=                 POST /api/patients
//! GET  /api/appointments?search=             POST /api/appointments
//! GET  /api/admissions?search=               POST /api/admissions
//! PUT  /api/admissions/{id}/discharge
//! GET  /api/bills?search=                    POST /api/bills
//! GET  /api/bills/{id}                       PATCH /api/bills/{id}   {status}
//! POST /api/bills/{id}/payments
//! GET  /api/insurance?search=&status=        POST /api/insurance
//! GET  /api/revenue?timeframe=week|month|quarter|year
//! GET  /api/revenue/range?startDate=&endDate=
//! GET  /api/staff?department=&search=        POST /api/staff
//! POST /api/staff/seed
//! GET  /api/departments                      POST /api/departments
//! GET  /api/staff/attendance?date=&department=&search=
//! POST /api/staff/attendance
//! GET  /api/staff/attendance/summary?date=&department=
//! GET  /api/staff/attendance/report?date=&department=     (text/csv)
//! GET  /api/staff/shifts?date=&department=   POST /api/staff/shifts
//! GET  /api/staff/initial-data
//! ```
//!
//! Errors are returned as `{"error": "..."}` with status 400, 404, 408, 409,
//! 413 or 500.
//!
//! ## Configuration
//!
//! - `HMS_SERVER_PORT` / `--port`: Server port (default: 8080)
//! - `HMS_SERVER_HOST` / `--host`: Server host (default: 127.0.0.1)
//! - `HMS_LOG_LEVEL` / `--log-level`: Log level (default: info)
//! - `HMS_DATABASE_URL` / `--database-url`: Record store (default: memory://).
//!   `sqlite://path.db` persists every write; `file://` and `http(s)://` URLs
//!   load a JSON snapshot at startup and keep writes in process.
//! - `HMS_MAX_BODY_SIZE` / `--max-body-size`: Max request size in bytes (default: 10MB)
//! - `HMS_REQUEST_TIMEOUT` / `--request-timeout`: Request timeout in seconds (default: 30)
//! - `HMS_ENABLE_CORS` / `--enable-cors`: Enable CORS (default: true)
//! - `HMS_CORS_ORIGINS` / `--cors-origins`: Allowed origins, comma-separated (default: *).
//!   Credentials are allowed only for an explicit origin list.
//!
//! ```bash
//! HMS_DATABASE_URL=sqlite:///var/lib/hms/hms.db \
//! HMS_CORS_ORIGINS="https://hms.example.com" \
//! hospital-server --port 9000
//! ```

use axum::{
    Router,
    routing::{get, post, put},
};
use hospital_core::{RecordStore, data_source::open_store};
use http::{HeaderValue, Method, header};
use std::net::SocketAddr;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

mod error;
mod handlers;
mod models;

use handlers::AppState;

/// Server configuration options
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Port to bind the server to
    pub port: u16,
    /// Host address to bind to
    pub host: String,
    /// Log level for the server
    pub log_level: String,
    /// Connection string of the record store
    pub database_url: String,
    /// Maximum request body size in bytes
    pub max_body_size: usize,
    /// Request timeout in seconds
    pub request_timeout: u64,
    /// Whether to enable CORS
    pub enable_cors: bool,
    /// Allowed CORS origins
    pub cors_origins: CorsOrigins,
}

/// Browser origins allowed to call the API.
#[derive(Debug, Clone, PartialEq)]
pub enum CorsOrigins {
    /// `*`: any origin, without credentials
    Any,
    /// Explicit origins, with credentials
    List(Vec<HeaderValue>),
}

impl FromStr for CorsOrigins {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim() == "*" {
            return Ok(CorsOrigins::Any);
        }
        let origins = s
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(|origin| {
                HeaderValue::from_str(origin)
                    .map_err(|_| format!("Invalid CORS origin '{}'", origin))
            })
            .collect::<Result<Vec<_>, _>>()?;
        if origins.is_empty() {
            return Err("At least one CORS origin is required".to_string());
        }
        Ok(CorsOrigins::List(origins))
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            host: "127.0.0.1".to_string(),
            log_level: "info".to_string(),
            database_url: "memory://".to_string(),
            max_body_size: 10 * 1024 * 1024, // 10MB
            request_timeout: 30,
            enable_cors: true,
            cors_origins: CorsOrigins::Any,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = parse_args();

    let filter = format!(
        "hospital_server={lvl},hospital_core={lvl},tower_http={lvl}",
        lvl = config.log_level
    );
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .init();

    info!("Starting hospital server...");
    info!("Configuration: {:?}", config);

    let store = open_store(&config.database_url).await?;
    let app = create_app_with_config(&config, store);

    let host: std::net::IpAddr = config.host.parse().unwrap_or_else(|_| {
        warn!("Invalid host address '{}', using 127.0.0.1", config.host);
        std::net::IpAddr::from([127, 0, 0, 1])
    });

    let addr = SocketAddr::from((host, config.port));
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Parse command line arguments for server configuration
fn parse_args() -> ServerConfig {
    use clap::Parser;

    #[derive(Parser, Debug)]
    #[command(
        author,
        version,
        about = "Hospital operations HTTP server",
        long_about = "HTTP JSON API for patients, billing, staff and the reporting rollups\n\nEnvironment variables:\n  HMS_SERVER_PORT - Server port (default: 8080)\n  HMS_SERVER_HOST - Server host (default: 127.0.0.1)\n  HMS_LOG_LEVEL - Log level: error, warn, info, debug, trace (default: info)\n  HMS_DATABASE_URL - Record store: sqlite://, memory://, file://, http(s):// (default: memory://)\n  HMS_MAX_BODY_SIZE - Maximum request body size in bytes (default: 10485760)\n  HMS_REQUEST_TIMEOUT - Request timeout in seconds (default: 30)\n  HMS_ENABLE_CORS - Enable CORS: true/false (default: true)\n  HMS_CORS_ORIGINS - Allowed origins (comma-separated, * for any) (default: *)\n\nNote: When using wildcard (*) origins, credentials are disabled."
    )]
    struct Args {
        /// Port to bind the server to
        #[arg(short, long, env = "HMS_SERVER_PORT", default_value_t = 8080)]
        port: u16,

        /// Host address to bind to
        #[arg(
            short = 'H',
            long,
            env = "HMS_SERVER_HOST",
            default_value = "127.0.0.1"
        )]
        host: String,

        /// Log level (error, warn, info, debug, trace)
        #[arg(short, long, env = "HMS_LOG_LEVEL", default_value = "info")]
        log_level: String,

        /// Record store connection string
        #[arg(short = 'd', long, env = "HMS_DATABASE_URL", default_value = "memory://")]
        database_url: String,

        /// Maximum request body size in bytes
        #[arg(
            short = 'm',
            long,
            env = "HMS_MAX_BODY_SIZE",
            default_value_t = 10_485_760
        )]
        max_body_size: usize,

        /// Request timeout in seconds
        #[arg(short = 't', long, env = "HMS_REQUEST_TIMEOUT", default_value_t = 30)]
        request_timeout: u64,

        /// Enable CORS
        #[arg(short = 'c', long, env = "HMS_ENABLE_CORS", default_value_t = true)]
        enable_cors: bool,

        /// Allowed CORS origins (comma-separated list, "*" for any)
        #[arg(long, env = "HMS_CORS_ORIGINS", default_value = "*")]
        cors_origins: CorsOrigins,
    }

    let args = Args::parse();

    ServerConfig {
        port: args.port,
        host: args.host,
        log_level: args.log_level,
        database_url: args.database_url,
        max_body_size: args.max_body_size,
        request_timeout: args.request_timeout,
        enable_cors: args.enable_cors,
        cors_origins: args.cors_origins,
    }
}

/// Build the application router over `store`.
fn create_app_with_config(config: &ServerConfig, store: Arc<dyn RecordStore>) -> Router {
    let app = Router::new()
        .route("/health", get(handlers::health_check))
        // Clinical records
        .route(
            "/api/patients",
            get(handlers::list_patients).post(handlers::create_patient),
        )
        .route(
            "/api/appointments",
            get(handlers::list_appointments).post(handlers::create_appointment),
        )
        .route(
            "/api/admissions",
            get(handlers::list_admissions).post(handlers::create_admission),
        )
        .route(
            "/api/admissions/{id}/discharge",
            put(handlers::discharge_admission),
        )
        // Billing
        .route(
            "/api/bills",
            get(handlers::list_bills).post(handlers::create_bill),
        )
        .route(
            "/api/bills/{id}",
            get(handlers::get_bill).patch(handlers::update_bill_status),
        )
        .route("/api/bills/{id}/payments", post(handlers::create_payment))
        .route(
            "/api/insurance",
            get(handlers::list_claims).post(handlers::create_claim),
        )
        .route("/api/revenue", get(handlers::revenue))
        .route("/api/revenue/range", get(handlers::revenue_in_range))
        // Staff
        .route(
            "/api/staff",
            get(handlers::list_staff).post(handlers::create_staff),
        )
        .route("/api/staff/seed", post(handlers::seed_staff))
        .route(
            "/api/departments",
            get(handlers::list_departments).post(handlers::create_department),
        )
        .route(
            "/api/staff/attendance",
            get(handlers::list_attendance).post(handlers::create_attendance),
        )
        .route(
            "/api/staff/attendance/summary",
            get(handlers::attendance_summary_handler),
        )
        .route(
            "/api/staff/attendance/report",
            get(handlers::attendance_report_handler),
        )
        .route(
            "/api/staff/shifts",
            get(handlers::list_shifts).post(handlers::create_shift),
        )
        .route("/api/staff/initial-data", get(handlers::initial_data))
        .with_state(AppState::new(store));

    let mut app = with_request_limits(
        app,
        config.max_body_size,
        Duration::from_secs(config.request_timeout),
    );

    if config.enable_cors {
        app = app.layer(build_cors_layer(&config.cors_origins));
    }

    app = app.layer(TraceLayer::new_for_http());

    app
}

/// Cap request bodies and request duration. Both failures answer with the
/// JSON error body.
fn with_request_limits(app: Router, max_body_size: usize, timeout: Duration) -> Router {
    use axum::error_handling::HandleErrorLayer;
    use axum::extract::DefaultBodyLimit;
    use tower::ServiceBuilder;
    use tower::timeout::TimeoutLayer;

    app.layer(DefaultBodyLimit::max(max_body_size)).layer(
        ServiceBuilder::new()
            .layer(HandleErrorLayer::new(error::handle_layer_error))
            .layer(TimeoutLayer::new(timeout)),
    )
}

/// Build the CORS layer for the API's methods and headers.
fn build_cors_layer(origins: &CorsOrigins) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::OPTIONS,
        ])
        .allow_headers([header::ACCEPT, header::CONTENT_TYPE, header::AUTHORIZATION]);

    match origins {
        CorsOrigins::Any => {
            info!("CORS: any origin allowed, credentials are disabled");
            cors.allow_origin(AllowOrigin::any())
        }
        CorsOrigins::List(list) => cors.allow_origin(list.clone()).allow_credentials(true),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use hospital_core::MemoryStore;
    use hospital_core::client::HospitalClient;
    use hospital_core::models::BillStatus;
    use hospital_core::reporting::Timeframe;
    use hospital_core::requests::{
        CreateBillRequest, CreatePatientRequest, CreatePaymentRequest, CreateStaffRequest,
    };
    use rust_decimal_macros::dec;
    use serde_json::{Value, json};

    fn test_server() -> TestServer {
        let config = ServerConfig::default();
        let app = create_app_with_config(&config, Arc::new(MemoryStore::new()));
        TestServer::new(app).unwrap()
    }

    fn staff_body(first: &str, email: &str, department: &str) -> Value {
        json!({
            "firstName": first,
            "lastName": "Tester",
            "email": email,
            "department": department,
            "role": "NURSE"
        })
    }

    async fn create_patient(server: &TestServer) -> String {
        let response = server
            .post("/api/patients")
            .json(&json!({
                "firstName": "Ada",
                "lastName": "Byron",
                "dateOfBirth": "1990-12-10",
                "gender": "Female",
                "phone": "555-0100"
            }))
            .await;
        response.assert_status_ok();
        response.json::<Value>()["id"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_health_check() {
        let server = test_server();

        let response = server.get("/health").await;

        assert_eq!(response.status_code(), StatusCode::OK);
        let json: Value = response.json();
        assert_eq!(json["status"], "ok");
        assert_eq!(json["service"], "hospital-server");
    }

    #[tokio::test]
    async fn test_duplicate_staff_email_is_conflict() {
        let server = test_server();

        let created = server
            .post("/api/staff")
            .json(&staff_body("Ann", "ann@hospital.com", "Emergency"))
            .await;
        assert_eq!(created.status_code(), StatusCode::CREATED);
        assert_eq!(created.json::<Value>()["status"], "active");

        let duplicate = server
            .post("/api/staff")
            .json(&staff_body("Anne", "ANN@hospital.com", "Surgery"))
            .await;
        assert_eq!(duplicate.status_code(), StatusCode::CONFLICT);
        assert_eq!(duplicate.json::<Value>()["error"], "Email already exists");
    }

    #[tokio::test]
    async fn test_missing_fields_and_malformed_body() {
        let server = test_server();

        let response = server
            .post("/api/staff")
            .json(&json!({ "firstName": "Ann" }))
            .await;
        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(response.json::<Value>()["error"], "Missing required fields");

        let response = server
            .post("/api/patients")
            .text("{not json")
            .content_type("application/json")
            .await;
        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
        assert!(response.json::<Value>()["error"].is_string());
    }

    #[tokio::test]
    async fn test_bill_status_patch() {
        let server = test_server();
        let patient_id = create_patient(&server).await;

        let bill = server
            .post("/api/bills")
            .json(&json!({ "patientId": patient_id, "amount": 120.5, "dueDate": "2024-04-01" }))
            .await;
        bill.assert_status_ok();
        let bill: Value = bill.json();
        assert_eq!(bill["status"], "Pending");
        assert_eq!(bill["patientName"], "Ada Byron");
        let path = format!("/api/bills/{}", bill["id"].as_str().unwrap());

        let bad = server
            .patch(&path)
            .json(&json!({ "status": "Refunded" }))
            .await;
        assert_eq!(bad.status_code(), StatusCode::BAD_REQUEST);

        let paid = server.patch(&path).json(&json!({ "status": "Paid" })).await;
        paid.assert_status_ok();
        assert_eq!(paid.json::<Value>()["status"], "Paid");

        let missing = server
            .patch("/api/bills/no-such-bill")
            .json(&json!({ "status": "Paid" }))
            .await;
        assert_eq!(missing.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(missing.json::<Value>()["error"], "Bill not found");

        let missing = server.get("/api/bills/no-such-bill").await;
        assert_eq!(missing.status_code(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_revenue_parameter_validation() {
        let server = test_server();

        let response = server.get("/api/revenue").add_query_param("timeframe", "decade").await;
        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

        let response = server
            .get("/api/revenue/range")
            .add_query_param("startDate", "2024-01-01")
            .await;
        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            response.json::<Value>()["error"],
            "Start date and end date are required"
        );

        let response = server.get("/api/revenue").await;
        response.assert_status_ok();
        let json: Value = response.json();
        assert_eq!(json["period"]["timeframe"], "month");
        assert_eq!(json["stats"]["revenueGrowth"], 100.0);
        assert_eq!(json["stats"]["totalRevenue"], 0.0);
    }

    #[tokio::test]
    async fn test_attendance_report_download() {
        let server = test_server();
        let staff = server
            .post("/api/staff")
            .json(&staff_body("Ann", "ann@hospital.com", "Emergency"))
            .await;
        let staff_id = staff.json::<Value>()["id"].as_str().unwrap().to_string();

        server
            .post("/api/staff/attendance")
            .json(&json!({
                "staffId": staff_id,
                "date": "2024-03-04",
                "checkIn": "2024-03-04T08:05:00.000Z",
                "status": "Present"
            }))
            .await
            .assert_status_ok();

        let response = server
            .get("/api/staff/attendance/report")
            .add_query_param("date", "2024-03-15")
            .add_query_param("department", "all")
            .await;
        response.assert_status_ok();
        assert_eq!(response.header("content-type"), "text/csv");
        assert_eq!(
            response.header("content-disposition"),
            "attachment; filename=attendance-report-2024-03.csv"
        );
        assert_eq!(
            response.text(),
            "Date,Staff Name,Department,Check In,Check Out,Status,Leave Type,Leave Reason\n\
             \"2024-03-04\",\"Ann Tester\",\"Emergency\",\"08:05\",\"\",\"Present\",\"\",\"\"\n"
        );
    }

    #[tokio::test]
    async fn test_shift_validation() {
        let server = test_server();
        let staff = server
            .post("/api/staff")
            .json(&staff_body("Ann", "ann@hospital.com", "Emergency"))
            .await;
        let staff_id = staff.json::<Value>()["id"].as_str().unwrap().to_string();

        let backwards = server
            .post("/api/staff/shifts")
            .json(&json!({
                "staffId": staff_id,
                "date": "2024-03-04",
                "startTime": "2024-03-04T16:00:00Z",
                "endTime": "2024-03-04T08:00:00Z"
            }))
            .await;
        assert_eq!(backwards.status_code(), StatusCode::BAD_REQUEST);

        let unknown = server
            .post("/api/staff/shifts")
            .json(&json!({
                "staffId": "nobody",
                "date": "2024-03-04",
                "startTime": "2024-03-04T08:00:00Z",
                "endTime": "2024-03-04T16:00:00Z"
            }))
            .await;
        assert_eq!(unknown.status_code(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_seed_and_departments() {
        let server = test_server();

        let first = server.post("/api/staff/seed").await;
        assert_eq!(first.json::<Value>()["message"], "Database seeded successfully");
        let second = server.post("/api/staff/seed").await;
        assert_eq!(second.json::<Value>()["message"], "Staff already seeded");

        let departments: Vec<Value> = server.get("/api/departments").await.json();
        let names: Vec<&str> = departments
            .iter()
            .map(|d| d["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["Emergency", "Pediatrics", "Surgery"]);
        assert_eq!(departments[0]["staffCount"], 2);

        let staff: Vec<Value> = server
            .get("/api/staff")
            .add_query_param("department", "Surgery")
            .await
            .json();
        assert_eq!(staff.len(), 2);

        let overview: Value = server.get("/api/staff/initial-data").await.json();
        let workload = overview["departmentWorkload"].as_array().unwrap();
        assert_eq!(workload.len(), 3);
        assert!(workload.iter().all(|d| d["coverage"] == 100));
    }

    #[tokio::test]
    async fn test_padded_department_is_stored_trimmed() {
        let server = test_server();
        server
            .post("/api/staff")
            .json(&staff_body("Ann", "ann@hospital.com", " Surgery "))
            .await
            .assert_status(StatusCode::CREATED);
        server
            .post("/api/staff")
            .json(&staff_body("Bo", "bo@hospital.com", "Surgery"))
            .await
            .assert_status(StatusCode::CREATED);

        let staff: Vec<Value> = server
            .get("/api/staff")
            .add_query_param("department", "Surgery")
            .await
            .json();
        assert_eq!(staff.len(), 2);

        let departments: Vec<Value> = server.get("/api/departments").await.json();
        assert_eq!(departments.len(), 1);
        assert_eq!(departments[0]["name"], "Surgery");
        assert_eq!(departments[0]["staffCount"], 2);
    }

    #[tokio::test]
    async fn test_oversized_body_is_json_error() {
        let config = ServerConfig {
            max_body_size: 64,
            ..ServerConfig::default()
        };
        let app = create_app_with_config(&config, Arc::new(MemoryStore::new()));
        let server = TestServer::new(app).unwrap();

        let mut body = staff_body("Ann", "ann@hospital.com", "Emergency");
        body["notes"] = json!("x".repeat(256));
        let response = server.post("/api/staff").json(&body).await;

        assert_eq!(response.status_code(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(response.json::<Value>()["error"], "Request body too large");
    }

    #[tokio::test]
    async fn test_slow_request_times_out_with_json_error() {
        let slow = Router::new().route(
            "/slow",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                "done"
            }),
        );
        let app = with_request_limits(slow, 1024, Duration::from_millis(50));
        let server = TestServer::new(app).unwrap();

        let response = server.get("/slow").await;

        assert_eq!(response.status_code(), StatusCode::REQUEST_TIMEOUT);
        assert_eq!(response.json::<Value>()["error"], "Request timed out");
    }

    #[test]
    fn test_cors_origins_parsing() {
        assert_eq!("*".parse::<CorsOrigins>().unwrap(), CorsOrigins::Any);
        assert_eq!(
            "https://a.example.com, https://b.example.com"
                .parse::<CorsOrigins>()
                .unwrap(),
            CorsOrigins::List(vec![
                HeaderValue::from_static("https://a.example.com"),
                HeaderValue::from_static("https://b.example.com"),
            ])
        );
        assert!(" , ".parse::<CorsOrigins>().is_err());
    }

    #[tokio::test]
    async fn test_explicit_cors_origins_allow_credentials() {
        let config = ServerConfig {
            cors_origins: "https://hms.example.com".parse().unwrap(),
            ..ServerConfig::default()
        };
        let app = create_app_with_config(&config, Arc::new(MemoryStore::new()));
        let server = TestServer::new(app).unwrap();

        let response = server
            .get("/health")
            .add_header(
                header::ORIGIN,
                HeaderValue::from_static("https://hms.example.com"),
            )
            .await;

        response.assert_status_ok();
        assert_eq!(
            response.header(header::ACCESS_CONTROL_ALLOW_ORIGIN),
            "https://hms.example.com"
        );
        assert_eq!(
            response.header(header::ACCESS_CONTROL_ALLOW_CREDENTIALS),
            "true"
        );
    }

    #[tokio::test]
    async fn test_database_backed_server_keeps_records_across_restart() {
        let dir = tempfile::TempDir::new().unwrap();
        let url = format!("sqlite://{}", dir.path().join("hms.db").display());
        let config = ServerConfig::default();

        let store = open_store(&url).await.unwrap();
        let server = TestServer::new(create_app_with_config(&config, store)).unwrap();
        server
            .post("/api/staff")
            .json(&staff_body("Ann", "ann@hospital.com", "Emergency"))
            .await
            .assert_status(StatusCode::CREATED);
        drop(server);

        let store = open_store(&url).await.unwrap();
        let server = TestServer::new(create_app_with_config(&config, store)).unwrap();
        let staff: Vec<Value> = server.get("/api/staff").await.json();
        assert_eq!(staff.len(), 1);
        assert_eq!(staff[0]["email"], "ann@hospital.com");

        let duplicate = server
            .post("/api/staff")
            .json(&staff_body("Other", "ANN@hospital.com", "Surgery"))
            .await;
        assert_eq!(duplicate.status_code(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_client_round_trip_over_tcp() {
        let config = ServerConfig::default();
        let app = create_app_with_config(&config, Arc::new(MemoryStore::new()));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let client = HospitalClient::new(&format!("http://{}", addr)).unwrap();
        assert_eq!(client.health().await.unwrap()["status"], "ok");

        let patient = client
            .create_patient(&CreatePatientRequest {
                first_name: "Ada".to_string(),
                last_name: "Byron".to_string(),
                date_of_birth: "1990-12-10".to_string(),
                gender: "Female".to_string(),
                phone: "555-0100".to_string(),
                ..Default::default()
            })
            .await
            .unwrap();
        let bill = client
            .create_bill(&CreateBillRequest {
                patient_id: patient.id.clone(),
                amount: Some(dec!(200)),
                due_date: "2030-01-01".to_string(),
                notes: None,
            })
            .await
            .unwrap();
        client
            .record_payment(
                &bill.id,
                &CreatePaymentRequest {
                    amount: Some(dec!(75.25)),
                    payment_method: "Card".to_string(),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let before = client.revenue(Timeframe::Year).await.unwrap();
        let detail = client
            .update_bill_status(&bill.id, BillStatus::Paid)
            .await
            .unwrap();
        assert_eq!(detail.payments.len(), 1);
        let after = client.revenue(Timeframe::Year).await.unwrap();
        assert_eq!(before.stats, after.stats);
        assert_eq!(after.stats.total_revenue, dec!(75.25));

        let err = client
            .create_staff(&CreateStaffRequest::default())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            hospital_core::HospitalError::Api { status: 400, .. }
        ));
    }
}
