//! Integration tests for the payroll engine.
//!
//! Raw rows go in through the engine's workflow operations; recaps and
//! payrolls come out through the HTTP API. Covers:
//! - Part-time salaried payroll with leave and overtime
//! - Freelance payroll from session income
//! - Recap idempotence and regeneration after a cancellation
//! - Concurrent claims on one session slot
//! - Batch payroll generation over a period, including a failed employee
//! - Approved payrolls refusing regeneration

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use chrono::{NaiveDate, NaiveTime, Weekday};
use rust_decimal::Decimal;
use serde_json::{Value, json};
use std::str::FromStr;
use std::sync::Arc;
use tower::ServiceExt;

use payroll_engine::api::{AppState, create_router};
use payroll_engine::config::ConfigLoader;
use payroll_engine::engine::{LeaveSubmission, PayrollEngine, SessionClaim};
use payroll_engine::error::EngineError;
use payroll_engine::models::{
    Actor, ContractSubtype, Employee, EmployeeCategory, LeaveType, PayrollStatus,
    RealizationSource, Role, SessionCategory, WorkSession,
};
use payroll_engine::store::{InMemoryStore, PayrollRepository};

// =============================================================================
// Test Helpers
// =============================================================================

struct TestContext {
    router: Router,
    engine: PayrollEngine,
    store: Arc<InMemoryStore>,
}

fn create_test_context() -> TestContext {
    let config = ConfigLoader::load("./config/default").expect("Failed to load config");
    let store = Arc::new(InMemoryStore::new());
    let state = AppState::new(config, store.clone());
    TestContext {
        engine: state.engine().clone(),
        router: create_router(state),
        store,
    }
}

fn decimal(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn date(s: &str) -> NaiveDate {
    NaiveDate::from_str(s).unwrap()
}

fn actor(engine: &PayrollEngine, id: &str, role: Role) -> Actor {
    engine.config().resolve_actor(id, role)
}

fn employee(
    id: &str,
    category: EmployeeCategory,
    subtype: Option<ContractSubtype>,
    base_pay: Option<&str>,
) -> Employee {
    Employee {
        id: id.to_string(),
        name: format!("Employee {}", id),
        category,
        contract_subtype: subtype,
        base_pay: base_pay.map(decimal),
        active: true,
    }
}

fn work_session(id: &str, category: SessionCategory, day: Weekday, rate: &str) -> WorkSession {
    WorkSession {
        id: id.to_string(),
        category,
        day_of_week: day,
        session_number: 1,
        start_time: NaiveTime::from_hms_opt(13, 0, 0).unwrap(),
        end_time: NaiveTime::from_hms_opt(14, 30, 0).unwrap(),
        rate: decimal(rate),
        active: true,
    }
}

/// Claims a session as the employee and has a supervisor approve it.
fn realize(engine: &PayrollEngine, employee_id: &str, session_id: &str, on: &str, source: RealizationSource) {
    let claim = SessionClaim {
        employee_id: employee_id.to_string(),
        work_session_id: session_id.to_string(),
        date: date(on),
        source,
    };
    let realization = engine
        .claim_session(claim, &actor(engine, employee_id, Role::Employee))
        .unwrap();
    engine
        .approve_realization(realization.id, &actor(engine, "spv_001", Role::Supervisor))
        .unwrap();
}

/// Submits a leave day as the employee and has a supervisor approve it.
fn take_leave(engine: &PayrollEngine, employee_id: &str, on: &str, leave_type: LeaveType) -> uuid::Uuid {
    let submission = LeaveSubmission {
        employee_id: employee_id.to_string(),
        date: date(on),
        leave_type,
        reason: None,
    };
    let request = engine
        .submit_leave(submission, &actor(engine, employee_id, Role::Employee))
        .unwrap();
    engine
        .approve_leave(request.id, &actor(engine, "spv_001", Role::Supervisor))
        .unwrap();
    request.id
}

async fn post_as_hr(router: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let response = router
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("Content-Type", "application/json")
                .header("x-actor-id", "hr_001")
                .header("x-actor-role", "hr_admin")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: Value = serde_json::from_slice(&body_bytes).unwrap();

    (status, json)
}

/// Generates recaps for January 2026 and returns them keyed by position.
async fn generate_january_recaps(router: &Router) -> Vec<Value> {
    let (status, body) = post_as_hr(router, "/recaps/generate", json!({"period": "2026-01"})).await;
    assert_eq!(status, StatusCode::OK);
    body.as_array().unwrap().clone()
}

fn recap_for<'a>(outcomes: &'a [Value], employee_id: &str) -> &'a Value {
    let outcome = outcomes
        .iter()
        .find(|o| o["employee_id"] == employee_id)
        .unwrap();
    assert_eq!(outcome["outcome"], "generated");
    &outcome["record"]
}

fn amount(value: &Value) -> Decimal {
    decimal(value.as_str().unwrap())
}

// =============================================================================
// Payroll Scenarios
// =============================================================================

#[tokio::test]
async fn test_part_time_payroll_with_leave_and_overtime() {
    let ctx = create_test_context();
    ctx.store.insert_employee(employee(
        "emp_pt",
        EmployeeCategory::FixedTerm,
        Some(ContractSubtype::PartTime),
        Some("0"),
    ));
    ctx.store
        .insert_work_session(work_session("ses_ot", SessionCategory::Coding, Weekday::Wed, "200000"));

    take_leave(&ctx.engine, "emp_pt", "2026-01-05", LeaveType::PersonalLeave);
    take_leave(&ctx.engine, "emp_pt", "2026-01-06", LeaveType::PersonalLeave);
    realize(&ctx.engine, "emp_pt", "ses_ot", "2026-01-14", RealizationSource::Overtime);

    let outcomes = generate_january_recaps(&ctx.router).await;
    let recap = recap_for(&outcomes, "emp_pt");
    assert_eq!(recap["working_days"], 27);
    assert_eq!(recap["personal_leave_days"], 2);
    assert_eq!(recap["unexcused_absence_days"], 25);

    let uri = format!("/recaps/{}/payroll", recap["id"].as_str().unwrap());
    let (status, body) = post_as_hr(&ctx.router, &uri, json!({})).await;
    assert_eq!(status, StatusCode::OK);

    let payroll = &body["payroll"];
    assert_eq!(payroll["leave_days"], 2);
    assert_eq!(amount(&payroll["leave_deduction"]), decimal("100000"));
    assert_eq!(amount(&payroll["total"]), decimal("100000"));
    assert_eq!(payroll["status"], "draft");

    let components = payroll["components"].as_array().unwrap();
    let types: Vec<&str> = components.iter().map(|c| c["type"].as_str().unwrap()).collect();
    assert_eq!(types, vec!["overtime_income", "deduction"]);
    assert_eq!(amount(&components[1]["amount"]), decimal("-100000"));

    assert!(!body["audit_trace"]["steps"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_freelance_payroll_from_session_income() {
    let ctx = create_test_context();
    ctx.store
        .insert_employee(employee("emp_fl", EmployeeCategory::Freelance, None, None));
    ctx.store
        .insert_work_session(work_session("ses_code", SessionCategory::Coding, Weekday::Mon, "150000"));
    ctx.store.insert_work_session(work_session(
        "ses_talk",
        SessionCategory::NonCoding,
        Weekday::Tue,
        "50000",
    ));

    realize(&ctx.engine, "emp_fl", "ses_code", "2026-01-12", RealizationSource::Scheduled);
    realize(&ctx.engine, "emp_fl", "ses_talk", "2026-01-13", RealizationSource::Scheduled);

    let outcomes = generate_january_recaps(&ctx.router).await;
    let recap = recap_for(&outcomes, "emp_fl");
    assert_eq!(amount(&recap["coding_income"]), decimal("150000"));
    assert_eq!(amount(&recap["non_coding_income"]), decimal("50000"));
    assert_eq!(amount(&recap["total_session_income"]), decimal("200000"));

    let (status, body) = post_as_hr(&ctx.router, "/payrolls/generate", json!({"period": "2026-01"})).await;
    assert_eq!(status, StatusCode::OK);

    let outcome = &body.as_array().unwrap()[0];
    assert_eq!(outcome["outcome"], "generated");
    let payroll = &outcome["record"]["payroll"];
    assert_eq!(amount(&payroll["total"]), decimal("200000"));
    assert_eq!(payroll["leave_days"], 0);

    let components = payroll["components"].as_array().unwrap();
    assert_eq!(components.len(), 1);
    assert_eq!(components[0]["type"], "session_income");
}

#[tokio::test]
async fn test_salaried_payroll_approved_and_paid() {
    let ctx = create_test_context();
    ctx.store.insert_employee(employee(
        "emp_ft",
        EmployeeCategory::Permanent,
        Some(ContractSubtype::FullTime),
        Some("5000000"),
    ));
    take_leave(&ctx.engine, "emp_ft", "2026-01-20", LeaveType::SickLeave);

    let outcomes = generate_january_recaps(&ctx.router).await;
    let recap = recap_for(&outcomes, "emp_ft");
    let uri = format!("/recaps/{}/payroll", recap["id"].as_str().unwrap());
    let (_, body) = post_as_hr(&ctx.router, &uri, json!({})).await;
    let payroll = &body["payroll"];
    assert_eq!(amount(&payroll["total"]), decimal("4900000"));

    let payroll_id = payroll["id"].as_str().unwrap();
    let (status, approved) =
        post_as_hr(&ctx.router, &format!("/payrolls/{}/approve", payroll_id), json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(approved["status"], "approved");

    // HR cannot pay out; that belongs to finance
    let (status, error) =
        post_as_hr(&ctx.router, &format!("/payrolls/{}/pay", payroll_id), json!({})).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(error["code"], "UNAUTHORIZED");

    // Once approved, the amounts are frozen
    let (status, error) = post_as_hr(&ctx.router, &uri, json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["code"], "INVALID_TRANSITION");

    let stored = ctx
        .store
        .get_payroll(payroll_id.parse().unwrap())
        .unwrap()
        .unwrap();
    assert_eq!(stored.status, PayrollStatus::Approved);
    assert_eq!(stored.total, decimal("4900000"));
}

// =============================================================================
// Recap Regeneration
// =============================================================================

#[tokio::test]
async fn test_recap_generation_is_idempotent() {
    let ctx = create_test_context();
    ctx.store.insert_employee(employee(
        "emp_001",
        EmployeeCategory::Permanent,
        Some(ContractSubtype::FullTime),
        Some("3000000"),
    ));
    take_leave(&ctx.engine, "emp_001", "2026-01-08", LeaveType::PersonalLeave);

    let first = generate_january_recaps(&ctx.router).await;
    let second = generate_january_recaps(&ctx.router).await;
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_regeneration_reflects_cancelled_leave() {
    let ctx = create_test_context();
    ctx.store.insert_employee(employee(
        "emp_001",
        EmployeeCategory::FixedTerm,
        Some(ContractSubtype::FullTime),
        Some("3000000"),
    ));
    let leave_id = take_leave(&ctx.engine, "emp_001", "2026-01-08", LeaveType::PersonalLeave);

    let before = generate_january_recaps(&ctx.router).await;
    assert_eq!(recap_for(&before, "emp_001")["personal_leave_days"], 1);

    let employee_actor = actor(&ctx.engine, "emp_001", Role::Employee);
    ctx.engine
        .request_leave_cancellation(leave_id, &employee_actor)
        .unwrap();
    ctx.engine
        .resolve_leave_cancellation(leave_id, true, &actor(&ctx.engine, "spv_001", Role::Supervisor))
        .unwrap();

    let after = generate_january_recaps(&ctx.router).await;
    let recap = recap_for(&after, "emp_001");
    assert_eq!(recap["personal_leave_days"], 0);
    assert_eq!(recap["id"], recap_for(&before, "emp_001")["id"]);
}

// =============================================================================
// Concurrency and Batches
// =============================================================================

#[test]
fn test_concurrent_claims_on_one_slot() {
    let ctx = create_test_context();
    for id in ["emp_a", "emp_b"] {
        ctx.store.insert_employee(employee(
            id,
            EmployeeCategory::Freelance,
            None,
            None,
        ));
    }
    ctx.store
        .insert_work_session(work_session("ses_001", SessionCategory::Coding, Weekday::Mon, "100000"));

    let results: Vec<_> = std::thread::scope(|scope| {
        let handles: Vec<_> = ["emp_a", "emp_b"]
            .into_iter()
            .map(|id| {
                let engine = ctx.engine.clone();
                scope.spawn(move || {
                    let claim = SessionClaim {
                        employee_id: id.to_string(),
                        work_session_id: "ses_001".to_string(),
                        date: date("2026-01-12"),
                        source: RealizationSource::Scheduled,
                    };
                    engine.claim_session(claim, &actor(&engine, id, Role::Employee))
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    assert!(
        results
            .iter()
            .any(|r| matches!(r, Err(EngineError::Conflict { .. })))
    );
}

#[tokio::test]
async fn test_batch_payroll_covers_every_recap() {
    let ctx = create_test_context();
    ctx.store.insert_employee(employee(
        "emp_ok",
        EmployeeCategory::Permanent,
        Some(ContractSubtype::FullTime),
        Some("3000000"),
    ));
    ctx.store.insert_employee(employee(
        "emp_unset",
        EmployeeCategory::Permanent,
        Some(ContractSubtype::FullTime),
        None,
    ));

    generate_january_recaps(&ctx.router).await;
    let (status, body) = post_as_hr(&ctx.router, "/payrolls/generate", json!({"period": "2026-01"})).await;
    assert_eq!(status, StatusCode::OK);

    let outcomes = body.as_array().unwrap();
    assert_eq!(outcomes.len(), 2);
    // An unset base pay counts as zero rather than failing the employee
    let unset = outcomes
        .iter()
        .find(|o| o["employee_id"] == "emp_unset")
        .unwrap();
    assert_eq!(unset["outcome"], "generated");
    assert_eq!(amount(&unset["record"]["payroll"]["total"]), Decimal::ZERO);
    let ok = outcomes.iter().find(|o| o["employee_id"] == "emp_ok").unwrap();
    assert_eq!(amount(&ok["record"]["payroll"]["total"]), decimal("3000000"));
}

#[tokio::test]
async fn test_batch_payroll_reports_missing_employee() {
    let ctx = create_test_context();
    for id in ["emp_gone", "emp_stays"] {
        ctx.store.insert_employee(employee(
            id,
            EmployeeCategory::Permanent,
            Some(ContractSubtype::FullTime),
            Some("3000000"),
        ));
    }
    generate_january_recaps(&ctx.router).await;
    ctx.store.remove_employee("emp_gone");

    let (status, body) = post_as_hr(&ctx.router, "/payrolls/generate", json!({"period": "2026-01"})).await;
    assert_eq!(status, StatusCode::OK);

    let outcomes = body.as_array().unwrap();
    assert_eq!(outcomes.len(), 2);
    let gone = outcomes
        .iter()
        .find(|o| o["employee_id"] == "emp_gone")
        .unwrap();
    assert_eq!(gone["outcome"], "failed");
    assert_eq!(gone["code"], "NOT_FOUND");

    let stays = outcomes
        .iter()
        .find(|o| o["employee_id"] == "emp_stays")
        .unwrap();
    assert_eq!(stays["outcome"], "generated");
    let payroll_id = stays["record"]["payroll"]["id"].as_str().unwrap();
    let stored = ctx
        .store
        .get_payroll(payroll_id.parse().unwrap())
        .unwrap()
        .unwrap();
    assert_eq!(stored.total, decimal("3000000"));
}

#[tokio::test]
async fn test_unknown_period_format_rejected() {
    let ctx = create_test_context();
    let (status, body) = post_as_hr(&ctx.router, "/recaps/generate", json!({"period": "2026-13"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}
