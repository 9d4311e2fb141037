//! Monthly recap generation.

use std::time::Instant;

use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::calculation::{summarize_attendance, summarize_sessions};
use crate::error::EngineResult;
use crate::models::{Actor, Employee, MonthlyRecap, Period};
use crate::store::{Directory, RecapRepository, RecapSources};

use super::{EmployeeOutcome, PayrollEngine};

impl PayrollEngine {
    /// Generates (or regenerates) the recap of every active employee for a
    /// period.
    ///
    /// Employees are processed independently; one employee's failure is
    /// reported in their outcome and does not stop the rest. Running this
    /// twice over unchanged data produces identical recaps with the same ids.
    pub fn generate_recaps(
        &self,
        period: Period,
        actor: &Actor,
    ) -> EngineResult<Vec<EmployeeOutcome<MonthlyRecap>>> {
        let start = Instant::now();
        let employees = self.store.list_active_employees()?;
        info!(
            period = %period,
            actor_id = %actor.id,
            employees = employees.len(),
            "Generating recaps"
        );

        let outcomes: Vec<_> = employees
            .iter()
            .map(|employee| {
                let result = self.build_recap(employee, period);
                if let Err(err) = &result {
                    warn!(
                        period = %period,
                        employee_id = %employee.id,
                        error = %err,
                        "Recap generation failed"
                    );
                }
                EmployeeOutcome::from_result(employee.id.clone(), result)
            })
            .collect();

        let failed = outcomes.iter().filter(|o| o.record().is_none()).count();
        info!(
            period = %period,
            generated = outcomes.len() - failed,
            failed,
            duration_us = start.elapsed().as_micros(),
            "Recap generation finished"
        );
        Ok(outcomes)
    }

    /// Builds and stores one employee's recap for a period.
    ///
    /// Reads the employee's attendance, leave and realizations for the period,
    /// aggregates them, and upserts the result keyed by (employee, period).
    /// The reads and the write happen in one store transaction.
    pub fn build_recap(&self, employee: &Employee, period: Period) -> EngineResult<MonthlyRecap> {
        let build = |sources: &RecapSources| aggregate(&employee.id, period, sources);
        Ok(self.store.rebuild_recap(&employee.id, period, &build)?)
    }
}

fn aggregate(employee_id: &str, period: Period, sources: &RecapSources) -> MonthlyRecap {
    let days = summarize_attendance(&period, &sources.attendance, &sources.leaves);
    let sessions = summarize_sessions(&period, &sources.realizations);
    if sessions.unresolved > 0 {
        debug!(
            employee_id = %employee_id,
            period = %period,
            skipped = sessions.unresolved,
            "Skipped approved realizations whose work session no longer resolves"
        );
    }

    MonthlyRecap {
        id: Uuid::new_v4(),
        employee_id: employee_id.to_string(),
        period,
        working_days: days.working_days,
        present_days: days.present,
        personal_leave_days: days.personal_leave,
        sick_leave_days: days.sick_leave,
        unexcused_absence_days: days.unexcused_absence,
        coding_sessions: sessions.coding_sessions,
        coding_income: sessions.coding_income,
        non_coding_sessions: sessions.non_coding_sessions,
        non_coding_income: sessions.non_coding_income,
        total_session_income: sessions.total_income(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::fixtures;
    use crate::models::{
        AttendanceRecord, AttendanceStatus, EmployeeCategory, LeaveRequest, LeaveStatus,
        LeaveType, RealizationSource, RealizationStatus, SessionCategory, SessionRealization,
    };
    use crate::store::{AttendanceRepository, InMemoryStore, LeaveRepository, SessionRepository};
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use std::sync::Arc;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, d).unwrap()
    }

    fn january() -> Period {
        "2026-01".parse().unwrap()
    }

    fn seeded_store() -> Arc<InMemoryStore> {
        let store = Arc::new(InMemoryStore::new());
        store.insert_employee(fixtures::employee(
            "emp_001",
            EmployeeCategory::Freelance,
            None,
        ));
        store.insert_work_session(fixtures::work_session(
            "ws_code",
            SessionCategory::Coding,
            150_000,
        ));
        store.insert_work_session(fixtures::work_session(
            "ws_talk",
            SessionCategory::NonCoding,
            50_000,
        ));

        for (day, status) in [
            (5, AttendanceStatus::Present),
            (6, AttendanceStatus::Present),
            (7, AttendanceStatus::LeaveShort),
        ] {
            store
                .insert_attendance(AttendanceRecord {
                    id: Uuid::new_v4(),
                    employee_id: "emp_001".to_string(),
                    date: date(day),
                    status,
                    check_in: None,
                    check_out: None,
                    location: None,
                })
                .unwrap();
        }
        store
            .insert_leave(LeaveRequest {
                id: Uuid::new_v4(),
                employee_id: "emp_001".to_string(),
                date: date(8),
                leave_type: LeaveType::SickLeave,
                status: LeaveStatus::Approved,
                approver_id: Some("spv_001".to_string()),
                reason: None,
            })
            .unwrap();
        for (day, session) in [(12, "ws_code"), (13, "ws_talk")] {
            store
                .insert_realization(SessionRealization {
                    id: Uuid::new_v4(),
                    employee_id: "emp_001".to_string(),
                    work_session_id: session.to_string(),
                    date: date(day),
                    status: RealizationStatus::Approved,
                    source: RealizationSource::Scheduled,
                    approver_id: Some("spv_001".to_string()),
                })
                .unwrap();
        }
        store
    }

    #[test]
    fn test_recap_aggregates_days_and_sessions() {
        let engine = fixtures::engine_with(seeded_store());
        let outcomes = engine
            .generate_recaps(january(), &fixtures::hr_admin())
            .unwrap();

        assert_eq!(outcomes.len(), 1);
        let recap = outcomes[0].record().unwrap();
        assert_eq!(recap.working_days, 27);
        assert_eq!(recap.present_days, 2);
        assert_eq!(recap.personal_leave_days, 1);
        assert_eq!(recap.sick_leave_days, 1);
        assert_eq!(recap.unexcused_absence_days, 23);
        assert_eq!(recap.accounted_days(), recap.working_days);
        assert_eq!(recap.coding_income, Decimal::new(150_000, 0));
        assert_eq!(recap.non_coding_income, Decimal::new(50_000, 0));
        assert_eq!(recap.total_session_income, Decimal::new(200_000, 0));
    }

    #[test]
    fn test_regeneration_is_idempotent() {
        let store = seeded_store();
        let engine = fixtures::engine_with(Arc::clone(&store));
        let actor = fixtures::hr_admin();

        let first = engine.generate_recaps(january(), &actor).unwrap();
        let second = engine.generate_recaps(january(), &actor).unwrap();

        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
        assert_eq!(store.find_recaps(january()).unwrap().len(), 1);
    }

    #[test]
    fn test_inactive_employees_are_skipped() {
        let store = seeded_store();
        let mut retired = fixtures::employee("emp_002", EmployeeCategory::Permanent, Some(1));
        retired.active = false;
        store.insert_employee(retired);
        let engine = fixtures::engine_with(store);

        let outcomes = engine
            .generate_recaps(january(), &fixtures::hr_admin())
            .unwrap();
        assert_eq!(outcomes.len(), 1);
        assert_eq!(outcomes[0].employee_id(), "emp_001");
    }
}
