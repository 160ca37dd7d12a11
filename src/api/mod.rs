mod error;
mod format;

use axum::{
    Router,
    extract::{Json, Query},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use chrono::Datelike;
use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::{debug, info, warn};

pub use error::ApiError;
pub use format::{format_pln, format_percent};

use crate::core::{
    DeferralOption, Gender, INPUT_YEARS, NormalizedInputs, ProjectionOptions, RawInputs,
    RetirementProjection, ScenarioSet, TargetSolveResult, YearlyProjectionRow, compute_scenarios,
    deferral_options, normalize, project_retirement, project_yearly_trace, solve_years_to_target,
};

const MAX_DEFERRAL_YEARS: u32 = 50;

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum CliGender {
    Male,
    Female,
}

impl From<CliGender> for Gender {
    fn from(value: CliGender) -> Self {
        match value {
            CliGender::Male => Gender::Male,
            CliGender::Female => Gender::Female,
        }
    }
}

impl From<Gender> for CliGender {
    fn from(value: Gender) -> Self {
        match value {
            Gender::Male => CliGender::Male,
            Gender::Female => CliGender::Female,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ProjectionPayload {
    age: Option<f64>,
    gender: Option<Gender>,
    gross_monthly_salary: Option<f64>,
    work_start_year: Option<f64>,
    planned_retirement_year: Option<f64>,
    zus_account_balance: Option<f64>,

    include_sick_leave: Option<bool>,
    inflation_rate: Option<f64>,
    current_year: Option<i32>,
    deferral_years: Option<String>,
    target_pension: Option<f64>,
    max_extra_years: Option<u32>,
}

#[derive(Parser, Debug, Clone)]
#[command(
    name = "emerytura",
    about = "Pension estimator: contribution capital, monthly pension and scenario variants"
)]
pub struct Cli {
    #[arg(long, help = "Current age in years")]
    pub age: Option<f64>,
    #[arg(long, value_enum)]
    pub gender: Option<CliGender>,
    #[arg(long, help = "Current gross monthly salary in PLN")]
    pub gross_monthly_salary: Option<f64>,
    #[arg(long, help = "Calendar year contributions began")]
    pub work_start_year: Option<f64>,
    #[arg(long, help = "Calendar year of planned retirement")]
    pub planned_retirement_year: Option<f64>,
    #[arg(long, help = "Capital already recorded on the pension account")]
    pub zus_account_balance: Option<f64>,
    #[arg(long, help = "Reduce capital by the average sick-leave penalty")]
    pub include_sick_leave: bool,
    #[arg(
        long,
        default_value_t = 2.5,
        help = "Annual inflation in percent used for real values"
    )]
    pub inflation_rate: f64,
    #[arg(long, help = "Calendar year to project from; defaults to the system clock")]
    pub current_year: Option<i32>,
    #[arg(
        long,
        value_delimiter = ',',
        default_values_t = [1u32, 2, 5],
        help = "Retirement delays in years to compare against the plan"
    )]
    pub deferral_years: Vec<u32>,
    #[arg(long, help = "Monthly pension to reach by working longer")]
    pub target_pension: Option<f64>,
    #[arg(
        long,
        default_value_t = 10,
        help = "Most extra working years considered when solving for --target-pension"
    )]
    pub max_extra_years: u32,
}

#[derive(Debug, Clone)]
struct ApiRequest {
    raw: RawInputs,
    current_year: i32,
    options: ProjectionOptions,
    deferral_years: Vec<u32>,
    target_pension: Option<f64>,
    max_extra_years: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FormattedSummary {
    capital: String,
    monthly_pension: String,
    monthly_pension_with_sick_leave: String,
    selected_monthly_pension: String,
    real_monthly_pension: String,
    replacement_rate: String,
    sick_leave_penalty: String,
    pessimistic: String,
    realistic: String,
    optimistic: String,
}

impl FormattedSummary {
    fn new(projection: &RetirementProjection, scenarios: &ScenarioSet) -> Self {
        Self {
            capital: format_pln(projection.capital),
            monthly_pension: format_pln(projection.monthly_pension),
            monthly_pension_with_sick_leave: format_pln(projection.monthly_pension_with_sick_leave),
            selected_monthly_pension: format_pln(projection.selected_monthly_pension),
            real_monthly_pension: format_pln(projection.real_monthly_pension),
            replacement_rate: format_percent(projection.replacement_rate),
            sick_leave_penalty: format_percent(projection.sick_leave_penalty),
            pessimistic: format_pln(scenarios.pessimistic),
            realistic: format_pln(scenarios.realistic),
            optimistic: format_pln(scenarios.optimistic),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ProjectionReport {
    complete: bool,
    current_year: i32,
    include_sick_leave: bool,
    inflation_rate: f64,
    inputs: Option<NormalizedInputs>,
    projection: Option<RetirementProjection>,
    scenarios: ScenarioSet,
    deferral_options: Vec<DeferralOption>,
    yearly_trace: Vec<YearlyProjectionRow>,
    target: Option<TargetSolveResult>,
    formatted: Option<FormattedSummary>,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

pub fn system_current_year() -> i32 {
    chrono::Local::now().year()
}

fn parse_deferral_years(list: &str) -> Result<Vec<u32>, ApiError> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<u32>().map_err(|_| ApiError::InvalidList {
                flag: "--deferral-years",
                value: s.to_string(),
            })
        })
        .collect()
}

fn build_request(cli: Cli, fallback_year: i32) -> Result<ApiRequest, ApiError> {
    if !cli.inflation_rate.is_finite() || cli.inflation_rate <= -100.0 {
        return Err(ApiError::out_of_range("--inflation-rate", "a finite percentage > -100"));
    }

    let current_year = cli.current_year.unwrap_or(fallback_year);
    if !INPUT_YEARS.contains(&current_year) {
        return Err(ApiError::out_of_range("--current-year", "between 1900 and 2200"));
    }

    if cli.deferral_years.iter().any(|&d| d > MAX_DEFERRAL_YEARS) {
        return Err(ApiError::out_of_range("--deferral-years", "at most 50 years each"));
    }

    if cli.max_extra_years > MAX_DEFERRAL_YEARS {
        return Err(ApiError::out_of_range("--max-extra-years", "at most 50"));
    }

    if cli
        .target_pension
        .is_some_and(|target| !target.is_finite() || target <= 0.0)
    {
        return Err(ApiError::out_of_range("--target-pension", "a positive amount"));
    }

    Ok(ApiRequest {
        raw: RawInputs {
            age: cli.age,
            gender: cli.gender.map(Gender::from),
            gross_monthly_salary: cli.gross_monthly_salary,
            work_start_year: cli.work_start_year,
            planned_retirement_year: cli.planned_retirement_year,
            zus_account_balance: cli.zus_account_balance,
        },
        current_year,
        options: ProjectionOptions {
            include_sick_leave: cli.include_sick_leave,
            inflation_rate: cli.inflation_rate / 100.0,
        },
        deferral_years: cli.deferral_years,
        target_pension: cli.target_pension,
        max_extra_years: cli.max_extra_years,
    })
}

fn default_cli_for_api() -> Cli {
    Cli {
        age: None,
        gender: None,
        gross_monthly_salary: None,
        work_start_year: None,
        planned_retirement_year: None,
        zus_account_balance: None,
        include_sick_leave: false,
        inflation_rate: 2.5,
        current_year: None,
        deferral_years: vec![1, 2, 5],
        target_pension: None,
        max_extra_years: 10,
    }
}

fn api_request_from_payload(
    payload: ProjectionPayload,
    fallback_year: i32,
) -> Result<ApiRequest, ApiError> {
    let mut cli = default_cli_for_api();

    cli.age = payload.age;
    cli.gender = payload.gender.map(CliGender::from);
    cli.gross_monthly_salary = payload.gross_monthly_salary;
    cli.work_start_year = payload.work_start_year;
    cli.planned_retirement_year = payload.planned_retirement_year;
    cli.zus_account_balance = payload.zus_account_balance;

    if let Some(v) = payload.include_sick_leave {
        cli.include_sick_leave = v;
    }
    if let Some(v) = payload.inflation_rate {
        cli.inflation_rate = v;
    }
    if let Some(v) = payload.current_year {
        cli.current_year = Some(v);
    }
    if let Some(v) = payload.deferral_years.as_deref() {
        cli.deferral_years = parse_deferral_years(v)?;
    }
    if let Some(v) = payload.target_pension {
        cli.target_pension = Some(v);
    }
    if let Some(v) = payload.max_extra_years {
        cli.max_extra_years = v;
    }

    build_request(cli, fallback_year)
}

#[cfg(test)]
fn api_request_from_json(json: &str, fallback_year: i32) -> Result<ApiRequest, String> {
    let payload = serde_json::from_str::<ProjectionPayload>(json)
        .map_err(|e| format!("Invalid API JSON payload: {e}"))?;
    api_request_from_payload(payload, fallback_year).map_err(|e| e.to_string())
}

fn build_report(request: &ApiRequest) -> ProjectionReport {
    let inputs = normalize(&request.raw, request.current_year);
    let scenarios = compute_scenarios(inputs.as_ref(), request.current_year, &request.options);

    let Some(inputs) = inputs else {
        return ProjectionReport {
            complete: false,
            current_year: request.current_year,
            include_sick_leave: request.options.include_sick_leave,
            inflation_rate: request.options.inflation_rate,
            inputs: None,
            projection: None,
            scenarios,
            deferral_options: Vec::new(),
            yearly_trace: Vec::new(),
            target: None,
            formatted: None,
        };
    };

    let projection = project_retirement(&inputs, request.current_year, &request.options);
    let target = request.target_pension.map(|target| {
        solve_years_to_target(
            &inputs,
            request.current_year,
            &request.options,
            target,
            request.max_extra_years,
        )
    });

    ProjectionReport {
        complete: true,
        current_year: request.current_year,
        include_sick_leave: request.options.include_sick_leave,
        inflation_rate: request.options.inflation_rate,
        inputs: Some(inputs),
        projection: Some(projection),
        scenarios,
        deferral_options: deferral_options(
            &inputs,
            request.current_year,
            &request.options,
            &request.deferral_years,
        ),
        yearly_trace: project_yearly_trace(&inputs, request.current_year),
        target,
        formatted: Some(FormattedSummary::new(&projection, &scenarios)),
    }
}

pub fn render_cli_report(cli: Cli) -> Result<String, ApiError> {
    let request = build_request(cli, system_current_year())?;
    let report = build_report(&request);
    Ok(serde_json::to_string_pretty(&report)?)
}

pub async fn run_http_server(port: u16) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let app = Router::new()
        .route("/health", get(health_handler))
        .route(
            "/api/projection",
            get(projection_get_handler).post(projection_post_handler),
        )
        .fallback(not_found_handler);

    let listener = TcpListener::bind(addr).await?;
    info!("pension API listening on http://{addr}");

    axum::serve(listener, app).await
}

async fn health_handler() -> Response {
    json_response(StatusCode::OK, serde_json::json!({ "status": "ok" }))
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

async fn projection_get_handler(Query(payload): Query<ProjectionPayload>) -> Response {
    projection_handler_impl(payload).await
}

async fn projection_post_handler(Json(payload): Json<ProjectionPayload>) -> Response {
    projection_handler_impl(payload).await
}

async fn projection_handler_impl(payload: ProjectionPayload) -> Response {
    let request = match api_request_from_payload(payload, system_current_year()) {
        Ok(request) => request,
        Err(err) => {
            warn!(error = %err, "rejected projection request");
            return error_response(StatusCode::BAD_REQUEST, &err.to_string());
        }
    };

    debug!(
        age = ?request.raw.age,
        gender = ?request.raw.gender,
        work_start_year = ?request.raw.work_start_year,
        planned_retirement_year = ?request.raw.planned_retirement_year,
        current_year = request.current_year,
        "projection request"
    );

    json_response(StatusCode::OK, build_report(&request))
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    let mut response = (status, Json(body)).into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        header::HeaderValue::from_static("no-store"),
    );
    response
}

fn error_response(status: StatusCode, msg: &str) -> Response {
    json_response(
        status,
        ErrorResponse {
            error: msg.to_string(),
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-6;

    fn assert_approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= EPS,
            "expected {expected}, got {actual}"
        );
    }

    fn sample_cli() -> Cli {
        Cli {
            age: Some(35.0),
            gender: Some(CliGender::Male),
            gross_monthly_salary: Some(8_000.0),
            work_start_year: Some(2010.0),
            planned_retirement_year: Some(2055.0),
            zus_account_balance: Some(150_000.0),
            current_year: Some(2025),
            ..default_cli_for_api()
        }
    }

    #[test]
    fn build_request_converts_percent_inflation() {
        let request = build_request(sample_cli(), 2030).expect("valid request");
        assert_approx(request.options.inflation_rate, 0.025);
        assert_eq!(request.current_year, 2025);
        assert_eq!(request.raw.gender, Some(Gender::Male));
        assert_eq!(request.deferral_years, vec![1, 2, 5]);
    }

    #[test]
    fn build_request_falls_back_to_supplied_year() {
        let mut cli = sample_cli();
        cli.current_year = None;
        let request = build_request(cli, 2031).expect("valid request");
        assert_eq!(request.current_year, 2031);
    }

    #[test]
    fn build_request_rejects_invalid_inflation() {
        let mut cli = sample_cli();
        cli.inflation_rate = -100.0;
        let err = build_request(cli, 2025).expect_err("must reject inflation <= -100");
        assert!(err.to_string().contains("--inflation-rate"));

        let mut cli = sample_cli();
        cli.inflation_rate = f64::NAN;
        assert!(build_request(cli, 2025).is_err());
    }

    #[test]
    fn build_request_rejects_out_of_range_options() {
        let mut cli = sample_cli();
        cli.deferral_years = vec![1, 80];
        let err = build_request(cli, 2025).expect_err("must reject long deferral");
        assert!(err.to_string().contains("--deferral-years"));

        let mut cli = sample_cli();
        cli.target_pension = Some(0.0);
        let err = build_request(cli, 2025).expect_err("must reject zero target");
        assert!(err.to_string().contains("--target-pension"));

        let mut cli = sample_cli();
        cli.current_year = Some(1800);
        let err = build_request(cli, 2025).expect_err("must reject ancient year");
        assert!(err.to_string().contains("--current-year"));
    }

    #[test]
    fn api_request_from_json_parses_web_keys() {
        let json = r#"{
          "age": 40,
          "gender": "female",
          "grossMonthlySalary": 9500.5,
          "workStartYear": 2008,
          "plannedRetirementYear": 2046,
          "zusAccountBalance": 210000,
          "includeSickLeave": true,
          "inflationRate": 3,
          "currentYear": 2026,
          "deferralYears": "1, 3",
          "targetPension": 6000,
          "maxExtraYears": 8
        }"#;
        let request = api_request_from_json(json, 2030).expect("json should parse");

        assert_approx(request.raw.age.expect("age"), 40.0);
        assert_eq!(request.raw.gender, Some(Gender::Female));
        assert_approx(request.raw.gross_monthly_salary.expect("salary"), 9_500.5);
        assert_approx(request.raw.zus_account_balance.expect("balance"), 210_000.0);
        assert!(request.options.include_sick_leave);
        assert_approx(request.options.inflation_rate, 0.03);
        assert_eq!(request.current_year, 2026);
        assert_eq!(request.deferral_years, vec![1, 3]);
        assert_eq!(request.target_pension, Some(6_000.0));
        assert_eq!(request.max_extra_years, 8);
    }

    #[test]
    fn api_request_from_json_rejects_bad_deferral_list() {
        let err = api_request_from_json(r#"{"deferralYears": "1,x"}"#, 2025)
            .expect_err("must reject non-numeric delay");
        assert!(err.contains("--deferral-years"));
    }

    #[test]
    fn api_request_from_json_rejects_unknown_gender() {
        let err = api_request_from_json(r#"{"gender": "other"}"#, 2025)
            .expect_err("must reject unknown gender");
        assert!(err.contains("Invalid API JSON payload"));
    }

    #[test]
    fn incomplete_payload_reports_zero_scenarios() {
        let request = api_request_from_json(r#"{"age": 35, "gender": "male"}"#, 2025)
            .expect("json should parse");
        let report = build_report(&request);

        assert!(!report.complete);
        assert!(report.inputs.is_none());
        assert!(report.projection.is_none());
        assert_eq!(report.scenarios, ScenarioSet::default());
        assert!(report.deferral_options.is_empty());
        assert!(report.yearly_trace.is_empty());
    }

    #[test]
    fn out_of_window_years_report_incomplete() {
        for json in [
            r#"{"age": 35, "gender": "male", "grossMonthlySalary": 8000, "workStartYear": 2010, "plannedRetirementYear": 1e12}"#,
            r#"{"age": 1e12, "gender": "male", "grossMonthlySalary": 8000, "workStartYear": 2010, "plannedRetirementYear": -2147483000}"#,
        ] {
            let request = api_request_from_json(json, 2025).expect("json should parse");
            let report = build_report(&request);
            assert!(!report.complete);
            assert!(report.yearly_trace.is_empty());
            assert_eq!(report.scenarios, ScenarioSet::default());
        }
    }

    #[test]
    fn complete_request_builds_full_report() {
        let mut cli = sample_cli();
        cli.target_pension = Some(5_000.0);
        let request = build_request(cli, 2025).expect("valid request");
        let report = build_report(&request);

        assert!(report.complete);
        let projection = report.projection.expect("projection");
        assert!(projection.monthly_pension > 2_000.0 && projection.monthly_pension < 5_000.0);
        assert_approx(report.scenarios.realistic, projection.selected_monthly_pension);
        assert_eq!(report.deferral_options.len(), 3);
        assert_eq!(report.yearly_trace.len(), 30);
        let target = report.target.expect("target solve result");
        assert!(target.feasible);
        assert!(target.extra_years.is_some_and(|years| years > 0));
    }

    #[test]
    fn report_serialization_contains_expected_fields() {
        let request = build_request(sample_cli(), 2025).expect("valid request");
        let json = serde_json::to_string(&build_report(&request)).expect("report should serialize");

        assert!(json.contains("\"complete\":true"));
        assert!(json.contains("\"scenarios\""));
        assert!(json.contains("\"pessimistic\""));
        assert!(json.contains("\"monthlyPensionWithSickLeave\""));
        assert!(json.contains("\"realMonthlyPension\""));
        assert!(json.contains("\"deferralOptions\""));
        assert!(json.contains("\"yearlyTrace\""));
        assert!(json.contains("\"retirementAge\":65.0"));
        assert!(json.contains(" zł"));
    }

    #[test]
    fn render_cli_report_produces_json() {
        let report = render_cli_report(sample_cli()).expect("report renders");
        let value: serde_json::Value = serde_json::from_str(&report).expect("valid json");
        assert_eq!(value["complete"], serde_json::Value::Bool(true));
        assert_eq!(value["currentYear"], serde_json::json!(2025));
    }
}
