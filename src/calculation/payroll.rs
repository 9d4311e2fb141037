//! Payroll calculation functionality.
//!
//! This module turns one employee's monthly recap into a payroll total and
//! its itemized components. Freelancers are paid their session income;
//! salaried staff (permanent and fixed-term) are paid base pay plus approved
//! overtime sessions, minus a per-day leave deduction, never below zero.

use rust_decimal::Decimal;

use crate::error::{EngineError, EngineResult};
use crate::models::{
    AuditStep, AuditWarning, ComponentType, Employee, MonthlyRecap, PayrollComponent,
    RealizationSource, ResolvedRealization,
};

/// The outcome of a payroll calculation, before persistence.
#[derive(Debug, Clone, PartialEq)]
pub struct PayrollCalculation {
    /// Leave days deducted.
    pub leave_days: u32,
    /// Leave deduction amount (positive magnitude).
    pub leave_deduction: Decimal,
    /// Amount payable, clamped at zero.
    pub total: Decimal,
    /// Itemized breakdown; deductions carry negative amounts.
    pub components: Vec<PayrollComponent>,
    /// One audit step per rule applied.
    pub audit_steps: Vec<AuditStep>,
    /// Adjustments worth an operator's attention.
    pub warnings: Vec<AuditWarning>,
}

/// Calculates payroll for one employee from their recap.
///
/// `realizations` are the employee's session realizations for the recap's
/// period, re-read from the store; only approved overtime realizations whose
/// session resolves are paid as overtime. The recap's own session totals are
/// used for freelancers only.
///
/// # Arguments
///
/// * `employee` - The employee, with category, subtype and base pay
/// * `recap` - The employee's recap for the period being paid
/// * `realizations` - The employee's realizations in the period
/// * `deduction_per_day` - Leave deduction per day for the employee's subtype
///
/// # Errors
///
/// Returns a validation error if the recap belongs to a different employee.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::calculate_payroll;
/// use payroll_engine::models::{Employee, EmployeeCategory, MonthlyRecap};
/// use rust_decimal::Decimal;
/// use uuid::Uuid;
///
/// let employee = Employee {
///     id: "emp_001".to_string(),
///     name: "Sari".to_string(),
///     category: EmployeeCategory::Freelance,
///     contract_subtype: None,
///     base_pay: None,
///     active: true,
/// };
/// let recap = MonthlyRecap {
///     id: Uuid::new_v4(),
///     employee_id: "emp_001".to_string(),
///     period: "2026-01".parse().unwrap(),
///     working_days: 27,
///     present_days: 0,
///     personal_leave_days: 0,
///     sick_leave_days: 0,
///     unexcused_absence_days: 27,
///     coding_sessions: 2,
///     coding_income: Decimal::new(150_000, 0),
///     non_coding_sessions: 1,
///     non_coding_income: Decimal::new(50_000, 0),
///     total_session_income: Decimal::new(200_000, 0),
/// };
///
/// let result = calculate_payroll(&employee, &recap, &[], Decimal::new(100_000, 0)).unwrap();
/// assert_eq!(result.total, Decimal::new(200_000, 0));
/// assert_eq!(result.components.len(), 1);
/// ```
pub fn calculate_payroll(
    employee: &Employee,
    recap: &MonthlyRecap,
    realizations: &[ResolvedRealization],
    deduction_per_day: Decimal,
) -> EngineResult<PayrollCalculation> {
    if recap.employee_id != employee.id {
        return Err(EngineError::validation(
            "recap",
            format!(
                "recap {} belongs to employee '{}', not '{}'",
                recap.id, recap.employee_id, employee.id
            ),
        ));
    }

    if employee.is_freelance() {
        return Ok(calculate_freelance_pay(recap));
    }

    let mut audit_steps = Vec::new();
    let mut components = Vec::new();
    let mut warnings = Vec::new();

    let base_pay = employee.base_pay_or_zero();
    audit_steps.push(AuditStep {
        step_number: 1,
        rule_id: "base_pay".to_string(),
        rule_name: "Base Pay".to_string(),
        input: serde_json::json!({
            "employee_id": employee.id,
            "category": employee.category,
            "base_pay": employee.base_pay.map(|b| b.to_string())
        }),
        output: serde_json::json!({
            "amount": base_pay.to_string(),
            "component_emitted": base_pay > Decimal::ZERO
        }),
        reasoning: if base_pay > Decimal::ZERO {
            format!("Contract base pay {}", base_pay)
        } else {
            "No base pay on contract - component omitted".to_string()
        },
    });
    if base_pay > Decimal::ZERO {
        components.push(PayrollComponent {
            component_type: ComponentType::BasePay,
            label: "Base pay".to_string(),
            amount: base_pay,
        });
    }

    let (overtime_sessions, overtime_pay) = overtime_income(employee, recap, realizations);
    audit_steps.push(AuditStep {
        step_number: 2,
        rule_id: "overtime_income".to_string(),
        rule_name: "Overtime Session Income".to_string(),
        input: serde_json::json!({
            "period": recap.period,
            "realizations_considered": realizations.len()
        }),
        output: serde_json::json!({
            "sessions": overtime_sessions,
            "amount": overtime_pay.to_string()
        }),
        reasoning: format!(
            "{} approved overtime session(s) in {} totalling {}",
            overtime_sessions, recap.period, overtime_pay
        ),
    });
    if overtime_pay > Decimal::ZERO {
        components.push(PayrollComponent {
            component_type: ComponentType::OvertimeIncome,
            label: format!("Overtime sessions ({})", overtime_sessions),
            amount: overtime_pay,
        });
    }

    let leave_days = recap.leave_days();
    let leave_deduction = Decimal::from(leave_days) * deduction_per_day;
    audit_steps.push(AuditStep {
        step_number: 3,
        rule_id: "leave_deduction".to_string(),
        rule_name: "Leave Deduction".to_string(),
        input: serde_json::json!({
            "personal_leave_days": recap.personal_leave_days,
            "sick_leave_days": recap.sick_leave_days,
            "part_time": employee.is_part_time(),
            "per_day_rate": deduction_per_day.to_string()
        }),
        output: serde_json::json!({
            "leave_days": leave_days,
            "amount": leave_deduction.to_string()
        }),
        reasoning: format!(
            "{} leave day(s) x {} = {}",
            leave_days, deduction_per_day, leave_deduction
        ),
    });
    if leave_days > 0 {
        components.push(PayrollComponent {
            component_type: ComponentType::Deduction,
            label: format!("Leave deduction ({} days)", leave_days),
            amount: -leave_deduction,
        });
    }

    let gross = base_pay + overtime_pay - leave_deduction;
    let total = gross.max(Decimal::ZERO);
    let clamped = gross < Decimal::ZERO;
    audit_steps.push(AuditStep {
        step_number: 4,
        rule_id: "total".to_string(),
        rule_name: "Payroll Total".to_string(),
        input: serde_json::json!({
            "base_pay": base_pay.to_string(),
            "overtime": overtime_pay.to_string(),
            "leave_deduction": leave_deduction.to_string()
        }),
        output: serde_json::json!({
            "gross": gross.to_string(),
            "total": total.to_string(),
            "clamped": clamped
        }),
        reasoning: if clamped {
            format!(
                "{} + {} - {} = {}, clamped to 0",
                base_pay, overtime_pay, leave_deduction, gross
            )
        } else {
            format!(
                "{} + {} - {} = {}",
                base_pay, overtime_pay, leave_deduction, total
            )
        },
    });
    if clamped {
        warnings.push(AuditWarning {
            code: "TOTAL_CLAMPED".to_string(),
            message: format!(
                "Deductions exceed earnings by {}; total paid is 0",
                -gross
            ),
            severity: "medium".to_string(),
        });
    }

    Ok(PayrollCalculation {
        leave_days,
        leave_deduction,
        total,
        components,
        audit_steps,
        warnings,
    })
}

/// Freelancers are paid exactly their recap's session income.
fn calculate_freelance_pay(recap: &MonthlyRecap) -> PayrollCalculation {
    let total = recap.total_session_income;
    let sessions = recap.coding_sessions + recap.non_coding_sessions;

    let audit_step = AuditStep {
        step_number: 1,
        rule_id: "session_income".to_string(),
        rule_name: "Freelance Session Income".to_string(),
        input: serde_json::json!({
            "coding_sessions": recap.coding_sessions,
            "coding_income": recap.coding_income.to_string(),
            "non_coding_sessions": recap.non_coding_sessions,
            "non_coding_income": recap.non_coding_income.to_string()
        }),
        output: serde_json::json!({
            "amount": total.to_string()
        }),
        reasoning: format!(
            "Freelance pay is the recap's session income: {} + {} = {}",
            recap.coding_income, recap.non_coding_income, total
        ),
    };

    PayrollCalculation {
        leave_days: 0,
        leave_deduction: Decimal::ZERO,
        total,
        components: vec![PayrollComponent {
            component_type: ComponentType::SessionIncome,
            label: format!("Session income ({} sessions)", sessions),
            amount: total,
        }],
        audit_steps: vec![audit_step],
        warnings: Vec::new(),
    }
}

/// Count and sum of approved overtime realizations for the recap's period.
fn overtime_income(
    employee: &Employee,
    recap: &MonthlyRecap,
    realizations: &[ResolvedRealization],
) -> (u32, Decimal) {
    realizations
        .iter()
        .filter(|r| {
            r.realization.employee_id == employee.id
                && r.realization.source == RealizationSource::Overtime
                && recap.period.contains(r.realization.date)
        })
        .filter_map(ResolvedRealization::approved_rate)
        .fold((0, Decimal::ZERO), |(count, sum), rate| (count + 1, sum + rate))
}
