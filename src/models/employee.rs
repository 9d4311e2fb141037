//! Employee model and related types.
//!
//! Employees are owned by the directory collaborator and are read-only to the
//! engine. The contract classification drives the payroll branch and the
//! leave quota that applies.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Contract classification of an employee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmployeeCategory {
    /// Permanent staff, paid a base salary, yearly leave quota.
    Permanent,
    /// Fixed-term contract staff, paid a base salary, monthly leave quota.
    FixedTerm,
    /// Freelancers, paid per realized work session only.
    Freelance,
}

/// Working arrangement within a fixed-term contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContractSubtype {
    /// Full-time arrangement.
    FullTime,
    /// Part-time arrangement (lower per-day leave deduction).
    PartTime,
}

/// Represents an employee as exposed by the directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    /// Unique identifier for the employee.
    pub id: String,
    /// Display name.
    pub name: String,
    /// The contract classification.
    pub category: EmployeeCategory,
    /// Contract subtype; only meaningful for fixed-term employees.
    #[serde(default)]
    pub contract_subtype: Option<ContractSubtype>,
    /// Monthly base pay, if any.
    #[serde(default)]
    pub base_pay: Option<Decimal>,
    /// Whether the employee is currently active.
    pub active: bool,
}

impl Employee {
    /// Returns true if the employee is paid per session only.
    ///
    /// # Examples
    ///
    /// ```
    /// use payroll_engine::models::{Employee, EmployeeCategory};
    ///
    /// let freelancer = Employee {
    ///     id: "emp_001".to_string(),
    ///     name: "Sari".to_string(),
    ///     category: EmployeeCategory::Freelance,
    ///     contract_subtype: None,
    ///     base_pay: None,
    ///     active: true,
    /// };
    /// assert!(freelancer.is_freelance());
    /// ```
    pub fn is_freelance(&self) -> bool {
        self.category == EmployeeCategory::Freelance
    }

    /// Returns true if the employee is on a part-time fixed-term contract.
    ///
    /// The subtype only applies to fixed-term staff; it is ignored on any
    /// other category.
    pub fn is_part_time(&self) -> bool {
        self.category == EmployeeCategory::FixedTerm
            && self.contract_subtype == Some(ContractSubtype::PartTime)
    }

    /// Base pay with a missing value treated as zero.
    pub fn base_pay_or_zero(&self) -> Decimal {
        self.base_pay.unwrap_or(Decimal::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_employee(category: EmployeeCategory) -> Employee {
        Employee {
            id: "emp_001".to_string(),
            name: "Budi".to_string(),
            category,
            contract_subtype: None,
            base_pay: None,
            active: true,
        }
    }

    #[test]
    fn test_deserialize_fixed_term_part_time_employee() {
        let json = r#"{
            "id": "emp_002",
            "name": "Dewi",
            "category": "fixed_term",
            "contract_subtype": "part_time",
            "base_pay": "2500000",
            "active": true
        }"#;

        let employee: Employee = serde_json::from_str(json).unwrap();
        assert_eq!(employee.category, EmployeeCategory::FixedTerm);
        assert!(employee.is_part_time());
        assert_eq!(employee.base_pay, Some(Decimal::new(2_500_000, 0)));
    }

    #[test]
    fn test_deserialize_without_optional_fields() {
        let json = r#"{
            "id": "emp_003",
            "name": "Agus",
            "category": "freelance",
            "active": false
        }"#;

        let employee: Employee = serde_json::from_str(json).unwrap();
        assert!(employee.is_freelance());
        assert_eq!(employee.contract_subtype, None);
        assert_eq!(employee.base_pay, None);
        assert!(!employee.active);
    }

    #[test]
    fn test_base_pay_or_zero() {
        let mut employee = create_test_employee(EmployeeCategory::Permanent);
        assert_eq!(employee.base_pay_or_zero(), Decimal::ZERO);

        employee.base_pay = Some(Decimal::new(4_000_000, 0));
        assert_eq!(employee.base_pay_or_zero(), Decimal::new(4_000_000, 0));
    }

    #[test]
    fn test_is_part_time_false_without_subtype() {
        let employee = create_test_employee(EmployeeCategory::FixedTerm);
        assert!(!employee.is_part_time());
    }

    #[test]
    fn test_part_time_subtype_ignored_outside_fixed_term() {
        for category in [EmployeeCategory::Permanent, EmployeeCategory::Freelance] {
            let mut employee = create_test_employee(category);
            employee.contract_subtype = Some(ContractSubtype::PartTime);
            assert!(!employee.is_part_time());
        }
    }

    #[test]
    fn test_category_serialization() {
        assert_eq!(
            serde_json::to_string(&EmployeeCategory::FixedTerm).unwrap(),
            "\"fixed_term\""
        );
        assert_eq!(
            serde_json::to_string(&EmployeeCategory::Permanent).unwrap(),
            "\"permanent\""
        );
    }
}
