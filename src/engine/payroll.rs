//! Payroll generation and the payroll status workflow.

use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::{calculate_payroll, next_payroll_status};
use crate::error::{EngineError, EngineResult};
use crate::models::{Actor, AuditTrace, MonthlyRecap, Payroll, PayrollStatus, Period};
use crate::store::{PayrollRepository, RecapRepository, SessionRepository};

use super::{EmployeeOutcome, PayrollEngine};

/// A stored payroll together with the rule steps that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayrollGeneration {
    /// The payroll as written to the store.
    pub payroll: Payroll,
    /// How the total was reached.
    pub audit_trace: AuditTrace,
}

impl PayrollEngine {
    /// Generates (or regenerates) the payroll for one recap.
    ///
    /// Overtime is re-read from the store for the recap's period rather than
    /// taken from the recap, so the payroll reflects the latest approvals. An
    /// existing draft for the same (employee, period) is updated in place and
    /// its components replaced; otherwise a draft is created with the actor as
    /// its creator. A payroll that has been approved or paid is never
    /// regenerated and fails with [`EngineError::InvalidTransition`].
    pub fn generate_payroll_from_recap(
        &self,
        recap_id: Uuid,
        actor: &Actor,
    ) -> EngineResult<PayrollGeneration> {
        let recap = self
            .store
            .get_recap(recap_id)?
            .ok_or_else(|| EngineError::not_found("recap", recap_id))?;
        self.payroll_for_recap(&recap, actor)
    }

    /// Generates payroll for every recap of a period.
    ///
    /// Each employee is processed independently, like recap generation.
    pub fn generate_payrolls(
        &self,
        period: Period,
        actor: &Actor,
    ) -> EngineResult<Vec<EmployeeOutcome<PayrollGeneration>>> {
        let start = Instant::now();
        let recaps = self.store.find_recaps(period)?;
        info!(
            period = %period,
            actor_id = %actor.id,
            recaps = recaps.len(),
            "Generating payrolls"
        );

        let outcomes: Vec<_> = recaps
            .iter()
            .map(|recap| {
                let result = self.payroll_for_recap(recap, actor);
                if let Err(err) = &result {
                    warn!(
                        period = %period,
                        employee_id = %recap.employee_id,
                        error = %err,
                        "Payroll generation failed"
                    );
                }
                EmployeeOutcome::from_result(recap.employee_id.clone(), result)
            })
            .collect();

        let failed = outcomes.iter().filter(|o| o.record().is_none()).count();
        info!(
            period = %period,
            generated = outcomes.len() - failed,
            failed,
            duration_us = start.elapsed().as_micros(),
            "Payroll generation finished"
        );
        Ok(outcomes)
    }

    /// Moves a draft payroll to approved.
    pub fn approve_payroll(&self, payroll_id: Uuid, actor: &Actor) -> EngineResult<Payroll> {
        self.advance_payroll(payroll_id, PayrollStatus::Approved, actor)
    }

    /// Moves an approved payroll to paid.
    pub fn mark_payroll_paid(&self, payroll_id: Uuid, actor: &Actor) -> EngineResult<Payroll> {
        self.advance_payroll(payroll_id, PayrollStatus::Paid, actor)
    }

    fn payroll_for_recap(
        &self,
        recap: &MonthlyRecap,
        actor: &Actor,
    ) -> EngineResult<PayrollGeneration> {
        let start = Instant::now();
        let employee = self.employee(&recap.employee_id)?;
        let realizations = self
            .store
            .find_realizations(&employee.id, recap.period.date_range())?;
        let deduction_per_day = self.config.leave_deduction_per_day(&employee);

        let calculation = calculate_payroll(&employee, recap, &realizations, deduction_per_day)?;

        let payroll = self.store.save_payroll(Payroll {
            id: Uuid::new_v4(),
            employee_id: employee.id.clone(),
            period: recap.period,
            recap_id: recap.id,
            leave_days: calculation.leave_days,
            leave_deduction: calculation.leave_deduction,
            total: calculation.total,
            status: PayrollStatus::Draft,
            created_by: actor.id.clone(),
            components: calculation.components,
        })?;

        info!(
            payroll_id = %payroll.id,
            employee_id = %payroll.employee_id,
            period = %payroll.period,
            total = %payroll.total,
            "Payroll saved"
        );

        Ok(PayrollGeneration {
            payroll,
            audit_trace: AuditTrace {
                steps: calculation.audit_steps,
                warnings: calculation.warnings,
                duration_us: start.elapsed().as_micros() as u64,
            },
        })
    }

    fn advance_payroll(
        &self,
        payroll_id: Uuid,
        next: PayrollStatus,
        actor: &Actor,
    ) -> EngineResult<Payroll> {
        let mut payroll = self
            .store
            .get_payroll(payroll_id)?
            .ok_or_else(|| EngineError::not_found("payroll", payroll_id))?;

        let current = payroll.status;
        payroll.status = next_payroll_status(current, next)?;
        self.store.update_payroll(payroll.clone(), current)?;

        info!(
            payroll_id = %payroll.id,
            status = %payroll.status,
            actor_id = %actor.id,
            "Payroll status changed"
        );
        Ok(payroll)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::fixtures;
    use crate::models::{
        ComponentType, ContractSubtype, EmployeeCategory, LeaveRequest, LeaveStatus, LeaveType,
        RealizationSource, RealizationStatus, SessionCategory, SessionRealization,
    };
    use crate::store::{InMemoryStore, LeaveGuard, LeaveRepository, SessionRepository};
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use std::sync::Arc;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, d).unwrap()
    }

    fn january() -> Period {
        "2026-01".parse().unwrap()
    }

    /// Part-time fixed-term employee with two approved personal-leave days and
    /// one approved 200,000 overtime session in January.
    fn part_time_store() -> Arc<InMemoryStore> {
        let store = Arc::new(InMemoryStore::new());
        let mut employee = fixtures::employee("emp_001", EmployeeCategory::FixedTerm, Some(0));
        employee.contract_subtype = Some(ContractSubtype::PartTime);
        store.insert_employee(employee);
        store.insert_work_session(fixtures::work_session(
            "ws_extra",
            SessionCategory::Coding,
            200_000,
        ));

        for day in [6, 7] {
            store
                .insert_leave(LeaveRequest {
                    id: Uuid::new_v4(),
                    employee_id: "emp_001".to_string(),
                    date: date(day),
                    leave_type: LeaveType::PersonalLeave,
                    status: LeaveStatus::Approved,
                    approver_id: Some("spv_001".to_string()),
                    reason: None,
                })
                .unwrap();
        }
        store
            .insert_realization(SessionRealization {
                id: Uuid::new_v4(),
                employee_id: "emp_001".to_string(),
                work_session_id: "ws_extra".to_string(),
                date: date(14),
                status: RealizationStatus::Approved,
                source: RealizationSource::Overtime,
                approver_id: Some("spv_001".to_string()),
            })
            .unwrap();
        store
    }

    fn generate_recap_id(engine: &PayrollEngine) -> Uuid {
        let outcomes = engine
            .generate_recaps(january(), &fixtures::hr_admin())
            .unwrap();
        outcomes[0].record().unwrap().id
    }

    #[test]
    fn test_part_time_payroll_from_recap() {
        let engine = fixtures::engine_with(part_time_store());
        let recap_id = generate_recap_id(&engine);

        let generation = engine
            .generate_payroll_from_recap(recap_id, &fixtures::hr_admin())
            .unwrap();
        let payroll = &generation.payroll;

        assert_eq!(payroll.leave_days, 2);
        assert_eq!(payroll.leave_deduction, Decimal::new(100_000, 0));
        assert_eq!(payroll.total, Decimal::new(100_000, 0));
        assert_eq!(payroll.status, PayrollStatus::Draft);
        assert_eq!(payroll.created_by, "hr_001");
        assert_eq!(payroll.recap_id, recap_id);
        assert!(payroll
            .components
            .iter()
            .any(|c| c.component_type == ComponentType::OvertimeIncome));
        assert_eq!(generation.audit_trace.steps.len(), 4);
    }

    #[test]
    fn test_regeneration_updates_same_payroll() {
        let store = part_time_store();
        let engine = fixtures::engine_with(Arc::clone(&store));
        let recap_id = generate_recap_id(&engine);
        let actor = fixtures::hr_admin();

        let first = engine.generate_payroll_from_recap(recap_id, &actor).unwrap();

        // A leave day is cancelled, the recap is rebuilt, payroll regenerated
        let leave = store
            .find_leave("emp_001", january().date_range())
            .unwrap()
            .remove(0);
        store
            .update_leave(
                LeaveRequest {
                    status: LeaveStatus::Cancelled,
                    ..leave
                },
                LeaveGuard {
                    expected: LeaveStatus::Approved,
                    quota: None,
                },
            )
            .unwrap();
        let recap_id = generate_recap_id(&engine);
        let second = engine.generate_payroll_from_recap(recap_id, &actor).unwrap();

        assert_eq!(first.payroll.id, second.payroll.id);
        assert_eq!(second.payroll.leave_days, 1);
        assert_eq!(second.payroll.total, Decimal::new(150_000, 0));
    }

    #[test]
    fn test_missing_recap_is_not_found() {
        let engine = fixtures::engine_with(part_time_store());
        let result = engine.generate_payroll_from_recap(Uuid::new_v4(), &fixtures::hr_admin());
        assert!(matches!(result, Err(EngineError::NotFound { .. })));
    }

    #[test]
    fn test_batch_reports_each_employee() {
        let store = part_time_store();
        store.insert_employee(fixtures::employee(
            "emp_002",
            EmployeeCategory::Permanent,
            Some(3_000_000),
        ));
        let engine = fixtures::engine_with(store);
        generate_recap_id(&engine);

        let outcomes = engine
            .generate_payrolls(january(), &fixtures::hr_admin())
            .unwrap();
        assert_eq!(outcomes.len(), 2);
        assert!(outcomes.iter().all(|o| o.record().is_some()));
        assert_eq!(
            outcomes[1].record().unwrap().payroll.total,
            Decimal::new(3_000_000, 0)
        );
    }

    #[test]
    fn test_status_workflow() {
        let engine = fixtures::engine_with(part_time_store());
        let recap_id = generate_recap_id(&engine);
        let payroll_id = engine
            .generate_payroll_from_recap(recap_id, &fixtures::hr_admin())
            .unwrap()
            .payroll
            .id;

        // Paying a draft skips approval
        assert!(matches!(
            engine.mark_payroll_paid(payroll_id, &fixtures::finance()),
            Err(EngineError::InvalidTransition { .. })
        ));

        let approved = engine
            .approve_payroll(payroll_id, &fixtures::hr_admin())
            .unwrap();
        assert_eq!(approved.status, PayrollStatus::Approved);
        let paid = engine
            .mark_payroll_paid(payroll_id, &fixtures::finance())
            .unwrap();
        assert_eq!(paid.status, PayrollStatus::Paid);
    }

    #[test]
    fn test_paid_payroll_is_not_regenerated() {
        let store = Arc::new(InMemoryStore::new());
        store.insert_employee(fixtures::employee(
            "emp_001",
            EmployeeCategory::Permanent,
            Some(3_000_000),
        ));
        let engine = fixtures::engine_with(Arc::clone(&store));
        let hr = fixtures::hr_admin();

        let recap_id = generate_recap_id(&engine);
        let payroll = engine
            .generate_payroll_from_recap(recap_id, &hr)
            .unwrap()
            .payroll;
        engine.approve_payroll(payroll.id, &hr).unwrap();
        engine
            .mark_payroll_paid(payroll.id, &fixtures::finance())
            .unwrap();

        // A sick day approved after payout changes the recap but not the payroll
        store
            .insert_leave(LeaveRequest {
                id: Uuid::new_v4(),
                employee_id: "emp_001".to_string(),
                date: date(20),
                leave_type: LeaveType::SickLeave,
                status: LeaveStatus::Approved,
                approver_id: Some("spv_001".to_string()),
                reason: None,
            })
            .unwrap();
        let recap_id = generate_recap_id(&engine);

        match engine.generate_payroll_from_recap(recap_id, &hr) {
            Err(EngineError::InvalidTransition { from, to, .. }) => {
                assert_eq!(from, "paid");
                assert_eq!(to, "draft");
            }
            other => panic!("Expected InvalidTransition, got {:?}", other),
        }
        let stored = store.get_payroll(payroll.id).unwrap().unwrap();
        assert_eq!(stored.status, PayrollStatus::Paid);
        assert_eq!(stored.total, Decimal::new(3_000_000, 0));
    }

    #[test]
    fn test_batch_keeps_going_past_a_failed_employee() {
        let store = part_time_store();
        store.insert_employee(fixtures::employee(
            "emp_002",
            EmployeeCategory::Permanent,
            Some(3_000_000),
        ));
        let engine = fixtures::engine_with(Arc::clone(&store));
        generate_recap_id(&engine);

        // emp_001 leaves the directory after its recap was built
        store.remove_employee("emp_001");

        let outcomes = engine
            .generate_payrolls(january(), &fixtures::hr_admin())
            .unwrap();
        assert_eq!(outcomes.len(), 2);

        match &outcomes[0] {
            EmployeeOutcome::Failed {
                employee_id, code, ..
            } => {
                assert_eq!(employee_id, "emp_001");
                assert_eq!(code, "NOT_FOUND");
            }
            other => panic!("Expected Failed, got {:?}", other),
        }
        let stored = outcomes[1].record().unwrap().payroll.clone();
        assert_eq!(outcomes[1].employee_id(), "emp_002");
        assert_eq!(store.get_payroll(stored.id).unwrap(), Some(stored));
    }

    #[test]
    fn test_concurrent_approvals_settle_once() {
        let engine = fixtures::engine_with(part_time_store());
        let recap_id = generate_recap_id(&engine);
        let payroll_id = engine
            .generate_payroll_from_recap(recap_id, &fixtures::hr_admin())
            .unwrap()
            .payroll
            .id;

        let handles: Vec<_> = (0..2)
            .map(|_| {
                let engine = engine.clone();
                std::thread::spawn(move || {
                    engine.approve_payroll(payroll_id, &fixtures::hr_admin())
                })
            })
            .collect();
        let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        assert!(results
            .iter()
            .any(|r| matches!(r, Err(EngineError::InvalidTransition { .. }))));
    }
}
