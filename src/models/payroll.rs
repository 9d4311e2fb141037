//! Payroll records and their itemized components.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Period;

/// Lifecycle status of a payroll record. Transitions are forward-only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayrollStatus {
    /// Freshly generated, may be regenerated.
    Draft,
    /// Approved by an operator.
    Approved,
    /// Paid out.
    Paid,
}

impl fmt::Display for PayrollStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PayrollStatus::Draft => "draft",
            PayrollStatus::Approved => "approved",
            PayrollStatus::Paid => "paid",
        })
    }
}

/// The kind of a payroll component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentType {
    /// Contractual base pay.
    BasePay,
    /// Income from realized sessions (freelancers).
    SessionIncome,
    /// Income from approved overtime sessions.
    OvertimeIncome,
    /// A deduction; always carries a negative amount.
    Deduction,
    /// A discretionary bonus.
    Bonus,
}

/// One line of a payroll breakdown.
///
/// # Example
///
/// ```
/// use payroll_engine::models::{ComponentType, PayrollComponent};
/// use rust_decimal::Decimal;
///
/// let line = PayrollComponent {
///     component_type: ComponentType::Deduction,
///     label: "Leave deduction (2 days)".to_string(),
///     amount: Decimal::new(-100_000, 0),
/// };
/// assert!(line.amount.is_sign_negative());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollComponent {
    /// The component kind.
    #[serde(rename = "type")]
    pub component_type: ComponentType,
    /// Human-readable label.
    pub label: String,
    /// Signed amount; deductions are negative.
    pub amount: Decimal,
}

/// A payroll record for one employee and period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payroll {
    /// Unique identifier, stable across regenerations.
    pub id: Uuid,
    /// The employee paid.
    pub employee_id: String,
    /// The month paid for.
    pub period: Period,
    /// The recap this payroll was generated from.
    pub recap_id: Uuid,
    /// Leave days deducted.
    pub leave_days: u32,
    /// Total leave deduction (positive magnitude).
    pub leave_deduction: Decimal,
    /// Amount payable; never negative.
    pub total: Decimal,
    /// Lifecycle status.
    pub status: PayrollStatus,
    /// The operator who first generated the payroll.
    pub created_by: String,
    /// Itemized breakdown.
    pub components: Vec<PayrollComponent>,
}

impl Payroll {
    /// Sum of all component amounts.
    pub fn components_total(&self) -> Decimal {
        self.components.iter().map(|c| c.amount).sum()
    }
}
