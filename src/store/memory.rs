//! In-memory store.
//!
//! All tables sit behind a single `RwLock`, so every write (including the
//! unique-key, status and quota checks that guard it) happens under one
//! exclusive lock and is atomic with respect to every other request.

use std::collections::{BTreeMap, HashMap};

use parking_lot::RwLock;
use uuid::Uuid;

use crate::models::{
    AttendanceRecord, DateRange, Employee, LeaveRequest, LeaveStatus, LeaveType, MonthlyRecap,
    Payroll, PayrollStatus, Period, RealizationStatus, ResolvedRealization, SessionRealization,
    WorkSession,
};

use super::{
    AttendanceRepository, Directory, LeaveGuard, LeaveRepository, PayrollRepository,
    RecapRepository, RecapSources, SessionRepository, StoreError, StoreResult,
};

#[derive(Debug, Default)]
struct Tables {
    employees: BTreeMap<String, Employee>,
    work_sessions: HashMap<String, WorkSession>,
    attendance: HashMap<Uuid, AttendanceRecord>,
    leaves: HashMap<Uuid, LeaveRequest>,
    realizations: HashMap<Uuid, SessionRealization>,
    recaps: HashMap<Uuid, MonthlyRecap>,
    payrolls: HashMap<Uuid, Payroll>,
}

/// A thread-safe store holding every table in process memory.
///
/// Employees and work sessions are owned by other systems; seed them with
/// [`InMemoryStore::insert_employee`] and [`InMemoryStore::insert_work_session`].
#[derive(Debug, Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl Tables {
    fn attendance_of(&self, employee_id: &str, range: DateRange) -> Vec<AttendanceRecord> {
        let mut rows: Vec<AttendanceRecord> = self
            .attendance
            .values()
            .filter(|a| a.employee_id == employee_id && range.contains(a.date))
            .cloned()
            .collect();
        rows.sort_by_key(|a| a.date);
        rows
    }

    fn leave_of(&self, employee_id: &str, range: DateRange) -> Vec<LeaveRequest> {
        let mut rows: Vec<LeaveRequest> = self
            .leaves
            .values()
            .filter(|l| l.employee_id == employee_id && range.contains(l.date))
            .cloned()
            .collect();
        rows.sort_by_key(|l| l.date);
        rows
    }

    fn realizations_of(&self, employee_id: &str, range: DateRange) -> Vec<ResolvedRealization> {
        let mut rows: Vec<ResolvedRealization> = self
            .realizations
            .values()
            .filter(|r| r.employee_id == employee_id && range.contains(r.date))
            .map(|r| ResolvedRealization {
                realization: r.clone(),
                session: self.work_sessions.get(&r.work_session_id).cloned(),
            })
            .collect();
        rows.sort_by(|a, b| {
            (a.realization.date, &a.realization.work_session_id)
                .cmp(&(b.realization.date, &b.realization.work_session_id))
        });
        rows
    }

    fn approved_leave_count(
        &self,
        employee_id: &str,
        leave_type: LeaveType,
        range: DateRange,
        exclude_id: Option<Uuid>,
    ) -> u32 {
        self.leaves
            .values()
            .filter(|l| {
                l.employee_id == employee_id
                    && l.is_approved(leave_type)
                    && range.contains(l.date)
                    && Some(l.id) != exclude_id
            })
            .count() as u32
    }
}

fn is_live(request: &LeaveRequest) -> bool {
    !matches!(request.status, LeaveStatus::Rejected | LeaveStatus::Cancelled)
}

fn status_changed(
    entity: &'static str,
    id: Uuid,
    current: impl ToString,
    requested: impl ToString,
) -> StoreError {
    StoreError::StatusChanged {
        entity,
        id: id.to_string(),
        current: current.to_string(),
        requested: requested.to_string(),
    }
}

impl InMemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a directory entry.
    pub fn insert_employee(&self, employee: Employee) {
        self.tables
            .write()
            .employees
            .insert(employee.id.clone(), employee);
    }

    /// Adds or replaces a work session.
    pub fn insert_work_session(&self, session: WorkSession) {
        self.tables
            .write()
            .work_sessions
            .insert(session.id.clone(), session);
    }

    /// Removes a directory entry, leaving rows that reference it in place.
    pub fn remove_employee(&self, id: &str) -> Option<Employee> {
        self.tables.write().employees.remove(id)
    }

    /// Removes a work session, leaving realizations that reference it dangling.
    pub fn remove_work_session(&self, id: &str) -> Option<WorkSession> {
        self.tables.write().work_sessions.remove(id)
    }
}

impl Directory for InMemoryStore {
    fn get_employee(&self, id: &str) -> StoreResult<Option<Employee>> {
        Ok(self.tables.read().employees.get(id).cloned())
    }

    fn list_active_employees(&self) -> StoreResult<Vec<Employee>> {
        Ok(self
            .tables
            .read()
            .employees
            .values()
            .filter(|e| e.active)
            .cloned()
            .collect())
    }
}

impl AttendanceRepository for InMemoryStore {
    fn find_attendance(
        &self,
        employee_id: &str,
        range: DateRange,
    ) -> StoreResult<Vec<AttendanceRecord>> {
        Ok(self.tables.read().attendance_of(employee_id, range))
    }

    fn get_attendance(&self, id: Uuid) -> StoreResult<Option<AttendanceRecord>> {
        Ok(self.tables.read().attendance.get(&id).cloned())
    }

    fn insert_attendance(&self, record: AttendanceRecord) -> StoreResult<()> {
        let mut tables = self.tables.write();
        let duplicate = tables
            .attendance
            .values()
            .any(|a| a.employee_id == record.employee_id && a.date == record.date);
        if duplicate {
            return Err(StoreError::UniqueViolation {
                constraint: "attendance_employee_date",
                detail: format!("{}/{}", record.employee_id, record.date),
            });
        }
        tables.attendance.insert(record.id, record);
        Ok(())
    }

    fn update_attendance(&self, record: AttendanceRecord) -> StoreResult<()> {
        let mut tables = self.tables.write();
        if !tables.attendance.contains_key(&record.id) {
            return Err(StoreError::NotFound {
                entity: "attendance",
                id: record.id.to_string(),
            });
        }
        let duplicate = tables.attendance.values().any(|a| {
            a.id != record.id && a.employee_id == record.employee_id && a.date == record.date
        });
        if duplicate {
            return Err(StoreError::UniqueViolation {
                constraint: "attendance_employee_date",
                detail: format!("{}/{}", record.employee_id, record.date),
            });
        }
        tables.attendance.insert(record.id, record);
        Ok(())
    }
}

impl LeaveRepository for InMemoryStore {
    fn find_leave(&self, employee_id: &str, range: DateRange) -> StoreResult<Vec<LeaveRequest>> {
        Ok(self.tables.read().leave_of(employee_id, range))
    }

    fn get_leave(&self, id: Uuid) -> StoreResult<Option<LeaveRequest>> {
        Ok(self.tables.read().leaves.get(&id).cloned())
    }

    fn count_approved_leave(
        &self,
        employee_id: &str,
        leave_type: LeaveType,
        range: DateRange,
        exclude_id: Option<Uuid>,
    ) -> StoreResult<u32> {
        Ok(self
            .tables
            .read()
            .approved_leave_count(employee_id, leave_type, range, exclude_id))
    }

    fn insert_leave(&self, request: LeaveRequest) -> StoreResult<()> {
        let mut tables = self.tables.write();
        let duplicate = tables.leaves.values().any(|l| {
            is_live(l) && l.employee_id == request.employee_id && l.date == request.date
        });
        if duplicate {
            return Err(StoreError::UniqueViolation {
                constraint: "leave_employee_date",
                detail: format!("{}/{}", request.employee_id, request.date),
            });
        }
        tables.leaves.insert(request.id, request);
        Ok(())
    }

    fn update_leave(&self, request: LeaveRequest, guard: LeaveGuard) -> StoreResult<()> {
        let mut tables = self.tables.write();
        let current = tables
            .leaves
            .get(&request.id)
            .map(|l| l.status)
            .ok_or_else(|| StoreError::NotFound {
                entity: "leave request",
                id: request.id.to_string(),
            })?;
        if current != guard.expected {
            return Err(status_changed(
                "leave request",
                request.id,
                current,
                request.status,
            ));
        }
        if let Some(quota) = guard.quota {
            let approved = tables.approved_leave_count(
                &request.employee_id,
                request.leave_type,
                quota.window,
                Some(request.id),
            );
            if approved >= quota.limit {
                return Err(StoreError::QuotaReached {
                    current: approved,
                    limit: quota.limit,
                });
            }
        }
        if is_live(&request) {
            let duplicate = tables.leaves.values().any(|l| {
                l.id != request.id
                    && is_live(l)
                    && l.employee_id == request.employee_id
                    && l.date == request.date
            });
            if duplicate {
                return Err(StoreError::UniqueViolation {
                    constraint: "leave_employee_date",
                    detail: format!("{}/{}", request.employee_id, request.date),
                });
            }
        }
        tables.leaves.insert(request.id, request);
        Ok(())
    }
}

impl SessionRepository for InMemoryStore {
    fn get_work_session(&self, id: &str) -> StoreResult<Option<WorkSession>> {
        Ok(self.tables.read().work_sessions.get(id).cloned())
    }

    fn find_realizations(
        &self,
        employee_id: &str,
        range: DateRange,
    ) -> StoreResult<Vec<ResolvedRealization>> {
        Ok(self.tables.read().realizations_of(employee_id, range))
    }

    fn get_realization(&self, id: Uuid) -> StoreResult<Option<SessionRealization>> {
        Ok(self.tables.read().realizations.get(&id).cloned())
    }

    fn insert_realization(&self, realization: SessionRealization) -> StoreResult<()> {
        let mut tables = self.tables.write();
        let duplicate = tables.realizations.values().any(|r| {
            r.date == realization.date && r.work_session_id == realization.work_session_id
        });
        if duplicate {
            return Err(StoreError::UniqueViolation {
                constraint: "realization_slot",
                detail: format!("{}/{}", realization.date, realization.work_session_id),
            });
        }
        tables.realizations.insert(realization.id, realization);
        Ok(())
    }

    fn update_realization(
        &self,
        realization: SessionRealization,
        expected: RealizationStatus,
    ) -> StoreResult<()> {
        let mut tables = self.tables.write();
        match tables.realizations.get_mut(&realization.id) {
            Some(existing) if existing.status == expected => {
                *existing = realization;
                Ok(())
            }
            Some(existing) => Err(status_changed(
                "session realization",
                realization.id,
                existing.status,
                realization.status,
            )),
            None => Err(StoreError::NotFound {
                entity: "session realization",
                id: realization.id.to_string(),
            }),
        }
    }
}

impl RecapRepository for InMemoryStore {
    fn rebuild_recap(
        &self,
        employee_id: &str,
        period: Period,
        build: &dyn Fn(&RecapSources) -> MonthlyRecap,
    ) -> StoreResult<MonthlyRecap> {
        let mut tables = self.tables.write();
        let range = period.date_range();
        let sources = RecapSources {
            attendance: tables.attendance_of(employee_id, range),
            leaves: tables.leave_of(employee_id, range),
            realizations: tables.realizations_of(employee_id, range),
        };
        let mut recap = build(&sources);

        let existing = tables
            .recaps
            .values()
            .find(|r| r.employee_id == recap.employee_id && r.period == recap.period)
            .map(|r| r.id);
        if let Some(id) = existing {
            recap.id = id;
        }
        tables.recaps.insert(recap.id, recap.clone());
        Ok(recap)
    }

    fn get_recap(&self, id: Uuid) -> StoreResult<Option<MonthlyRecap>> {
        Ok(self.tables.read().recaps.get(&id).cloned())
    }

    fn find_recaps(&self, period: Period) -> StoreResult<Vec<MonthlyRecap>> {
        let tables = self.tables.read();
        let mut rows: Vec<MonthlyRecap> = tables
            .recaps
            .values()
            .filter(|r| r.period == period)
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.employee_id.cmp(&b.employee_id));
        Ok(rows)
    }
}

impl PayrollRepository for InMemoryStore {
    fn save_payroll(&self, mut payroll: Payroll) -> StoreResult<Payroll> {
        let mut tables = self.tables.write();
        let existing = tables
            .payrolls
            .values()
            .find(|p| p.employee_id == payroll.employee_id && p.period == payroll.period)
            .map(|p| (p.id, p.status, p.created_by.clone()));
        if let Some((id, status, created_by)) = existing {
            if status != PayrollStatus::Draft {
                return Err(status_changed("payroll", id, status, payroll.status));
            }
            payroll.id = id;
            payroll.created_by = created_by;
        }
        tables.payrolls.insert(payroll.id, payroll.clone());
        Ok(payroll)
    }

    fn get_payroll(&self, id: Uuid) -> StoreResult<Option<Payroll>> {
        Ok(self.tables.read().payrolls.get(&id).cloned())
    }

    fn update_payroll(&self, payroll: Payroll, expected: PayrollStatus) -> StoreResult<()> {
        let mut tables = self.tables.write();
        match tables.payrolls.get_mut(&payroll.id) {
            Some(existing) if existing.status == expected => {
                *existing = payroll;
                Ok(())
            }
            Some(existing) => Err(status_changed(
                "payroll",
                payroll.id,
                existing.status,
                payroll.status,
            )),
            None => Err(StoreError::NotFound {
                entity: "payroll",
                id: payroll.id.to_string(),
            }),
        }
    }
}
