//! Input records, filters, and the view structs returned by the store.

use std::{fmt, str::FromStr};

use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, Utc};
use entity::{
    attendance, benefit, department, dependent, document, employee, employee_benefit,
    employee_training, evaluation, position, training, users, vacation,
};
use rust_decimal::Decimal;
use sea_orm::FromQueryResult;
use serde::Serialize;
use uuid::Uuid;

use crate::error::{HrError, HrResult};

pub const MAX_PAGE_SIZE: u64 = 100;

/// 1-based page request. Sizes are clamped to `1..=MAX_PAGE_SIZE`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageRequest {
    page: u64,
    page_size: u64,
}

impl PageRequest {
    pub fn new(page: u64, page_size: u64) -> Self {
        Self {
            page: page.max(1),
            page_size: page_size.clamp(1, MAX_PAGE_SIZE),
        }
    }

    pub fn page(&self) -> u64 {
        self.page
    }

    pub fn page_size(&self) -> u64 {
        self.page_size
    }

    pub(crate) fn index(&self) -> u64 {
        self.page.saturating_sub(1)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(1, 20)
    }
}

#[derive(Clone, Debug)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u64,
    pub page_size: u64,
}

impl<T> Page<T> {
    pub fn total_pages(&self) -> u64 {
        self.total.div_ceil(self.page_size.max(1))
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages()
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            page_size: self.page_size,
        }
    }
}

/// A calendar month, used for attendance windows.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct YearMonth {
    year: i32,
    month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> HrResult<Self> {
        if !(1..=12).contains(&month) || NaiveDate::from_ymd_opt(year, month, 1).is_none() {
            return Err(HrError::validation(format!("invalid month {year}-{month}")));
        }
        Ok(Self { year, month })
    }

    pub fn of(day: NaiveDate) -> Self {
        Self {
            year: day.year(),
            month: day.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// First day of the month.
    pub fn first_day(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    /// First day of the following month (exclusive upper bound).
    pub fn next_first_day(&self) -> NaiveDate {
        let (year, month) = if self.month == 12 {
            (self.year + 1, 1)
        } else {
            (self.year, self.month + 1)
        };
        NaiveDate::from_ymd_opt(year, month, 1).unwrap_or(NaiveDate::MAX)
    }

    pub fn contains(&self, day: NaiveDate) -> bool {
        day >= self.first_day() && day < self.next_first_day()
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for YearMonth {
    type Err = HrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (year, month) = s
            .trim()
            .split_once('-')
            .ok_or_else(|| HrError::validation(format!("expected YYYY-MM, got {s:?}")))?;
        let year = year
            .parse()
            .map_err(|_| HrError::validation(format!("bad year in {s:?}")))?;
        let month = month
            .parse()
            .map_err(|_| HrError::validation(format!("bad month in {s:?}")))?;
        Self::new(year, month)
    }
}

// ---------------------------------------------------------------------------
// Employees
// ---------------------------------------------------------------------------

/// Identity and personal fields captured when hiring.
#[derive(Clone, Debug)]
pub struct PersonalData {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub national_id: String,
    pub id_document: Option<String>,
    pub birth_date: NaiveDate,
    pub gender: employee::Gender,
    pub marital_status: Option<employee::MaritalStatus>,
    pub phone: Option<String>,
    pub mobile: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
}

/// Contract and payroll fields captured when hiring.
#[derive(Clone, Debug)]
pub struct ProfessionalData {
    pub employee_code: String,
    pub position_id: Uuid,
    pub department_id: Uuid,
    pub hire_date: NaiveDate,
    pub current_salary: Decimal,
    /// Weekly hours; 40 when omitted.
    pub work_hours: Option<i32>,
    pub contract_type: employee::ContractType,
    pub bank: Option<String>,
    pub agency: Option<String>,
    pub account: Option<String>,
    pub pix_key: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EmployeeStatus {
    /// Neither on vacation nor on leave.
    Active,
    OnVacation,
    OnLeave,
}

#[derive(Clone, Debug, Default)]
pub struct EmployeeFilter {
    pub search: Option<String>,
    pub department_id: Option<Uuid>,
    pub status: Option<EmployeeStatus>,
    /// Also return retired (`active = false`) employees.
    pub include_inactive: bool,
}

/// An employee together with its identity record.
#[derive(Clone, Debug, PartialEq)]
pub struct EmployeeRow {
    pub employee: employee::Model,
    pub user: users::Model,
}

impl EmployeeRow {
    pub fn full_name(&self) -> String {
        self.user.full_name()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct BenefitLink {
    pub link: employee_benefit::Model,
    pub benefit: benefit::Model,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TrainingLink {
    pub link: employee_training::Model,
    pub training: training::Model,
}

/// Everything the employee page shows, loaded in one call.
#[derive(Clone, Debug)]
pub struct EmployeeDetail {
    pub employee: employee::Model,
    pub user: users::Model,
    pub position: Option<position::Model>,
    pub department: Option<department::Model>,
    pub dependents: Vec<dependent::Model>,
    pub vacations: Vec<vacation::Model>,
    pub attendance: Vec<attendance::Model>,
    pub benefits: Vec<BenefitLink>,
    pub trainings: Vec<TrainingLink>,
    pub evaluations: Vec<evaluation::Model>,
    pub documents: Vec<document::Model>,
}

#[derive(Clone, Debug)]
pub struct NewDependent {
    pub name: String,
    pub national_id: Option<String>,
    pub birth_date: NaiveDate,
    pub relationship: dependent::Relationship,
}

// ---------------------------------------------------------------------------
// Departments and positions
// ---------------------------------------------------------------------------

#[derive(Clone, Debug)]
pub struct NewDepartment {
    pub name: String,
    pub description: Option<String>,
    pub budget: Decimal,
    pub manager_id: Option<Uuid>,
}

#[derive(Clone, Debug)]
pub struct NewPosition {
    pub name: String,
    pub department_id: Uuid,
    pub description: Option<String>,
    pub base_salary: Decimal,
    pub contract_type: position::ContractType,
    pub hierarchy_level: i32,
    pub requirements: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, FromQueryResult, Serialize)]
pub struct DepartmentCounts {
    pub id: Uuid,
    pub name: String,
    pub total_employees: i64,
    pub active_employees: i64,
}

#[derive(Clone, Debug)]
pub struct DepartmentDetail {
    pub department: department::Model,
    pub manager: Option<EmployeeRow>,
    pub employees: Vec<EmployeeRow>,
    pub positions: Vec<position::Model>,
    pub total_employees: u64,
    pub on_vacation: u64,
    pub on_leave: u64,
}

// ---------------------------------------------------------------------------
// Vacations
// ---------------------------------------------------------------------------

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VacationDecision {
    Approve,
    Reject,
}

#[derive(Clone, Debug, PartialEq)]
pub struct VacationRow {
    pub vacation: vacation::Model,
    pub employee_name: String,
}

/// Counts reported by the vacation expiry job.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct RefreshOutcome {
    pub started: u64,
    pub completed: u64,
    pub flags_set: u64,
    pub flags_cleared: u64,
}

// ---------------------------------------------------------------------------
// Attendance
// ---------------------------------------------------------------------------

/// The four time stamps of a working day.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Punches {
    pub check_in: Option<NaiveTime>,
    pub lunch_out: Option<NaiveTime>,
    pub lunch_in: Option<NaiveTime>,
    pub check_out: Option<NaiveTime>,
}

#[derive(Clone, Debug)]
pub struct AttendanceEntry {
    pub employee_id: Uuid,
    pub date: NaiveDate,
    pub punches: Punches,
    /// Derived from the punches when omitted.
    pub hours_worked: Option<Decimal>,
    /// Hours above the employee's daily share of weekly hours when omitted.
    pub overtime_hours: Option<Decimal>,
    pub notes: Option<String>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AttendanceFilter {
    pub employee_id: Option<Uuid>,
    pub department_id: Option<Uuid>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct AttendanceRow {
    pub record: attendance::Model,
    pub employee_name: String,
}

#[derive(Clone, Debug, Default, PartialEq, FromQueryResult, Serialize)]
pub struct AttendanceSummary {
    pub avg_hours_worked: Option<f64>,
    pub avg_overtime_hours: Option<f64>,
    pub records: i64,
}

// ---------------------------------------------------------------------------
// Benefits, trainings, evaluations, documents
// ---------------------------------------------------------------------------

#[derive(Clone, Debug)]
pub struct NewBenefit {
    pub name: String,
    pub benefit_type: benefit::BenefitType,
    pub value: Decimal,
    pub description: Option<String>,
}

#[derive(Clone, Debug)]
pub struct BenefitAssignment {
    pub employee_id: Uuid,
    pub benefit_id: Uuid,
    /// Falls back to the benefit's own value.
    pub value: Option<Decimal>,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
}

#[derive(Clone, Debug)]
pub struct NewTraining {
    pub name: String,
    pub description: String,
    pub instructor: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub duration_hours: i32,
    pub location: String,
    pub cost: Decimal,
    /// 20 when omitted.
    pub max_participants: Option<i32>,
}

#[derive(Clone, Debug)]
pub struct TrainingResult {
    pub status: employee_training::Status,
    pub grade: Option<Decimal>,
    pub certificate: bool,
    pub notes: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Participant {
    pub link: employee_training::Model,
    pub employee: EmployeeRow,
}

#[derive(Clone, Debug)]
pub struct TrainingDetail {
    pub training: training::Model,
    pub participants: Vec<Participant>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, FromQueryResult, Serialize)]
pub struct TrainingStats {
    pub total: i64,
    pub completed: i64,
}

#[derive(Clone, Debug)]
pub struct NewEvaluation {
    pub employee_id: Uuid,
    pub evaluation_type: evaluation::EvaluationType,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub evaluator_id: Uuid,
    pub overall_grade: Option<Decimal>,
    pub comments: Option<String>,
    pub strengths: Option<String>,
    pub improvement_points: Option<String>,
}

#[derive(Clone, Debug)]
pub struct NewDocument {
    pub employee_id: Uuid,
    pub document_type: document::DocumentType,
    pub name: String,
    pub file_ref: String,
    pub description: Option<String>,
}

// ---------------------------------------------------------------------------
// Reports
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, Default, PartialEq, FromQueryResult, Serialize)]
pub struct PerformanceReport {
    pub average_grade: Option<f64>,
    pub evaluations: i64,
}

#[derive(Clone, Debug)]
pub struct DashboardOverview {
    pub active_employees: u64,
    pub active_departments: u64,
    pub employees_on_vacation: u64,
    pub pending_vacation_requests: u64,
    pub recent_employees: Vec<EmployeeRow>,
    pub recent_approved_vacations: Vec<VacationRow>,
    pub upcoming_trainings: Vec<training::Model>,
    pub departments_by_headcount: Vec<DepartmentCounts>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_request_is_clamped() {
        assert_eq!(PageRequest::new(0, 0), PageRequest::new(1, 1));
        assert_eq!(PageRequest::new(3, 500).page_size(), MAX_PAGE_SIZE);
        assert_eq!(PageRequest::new(3, 10).index(), 2);
    }

    #[test]
    fn total_pages_rounds_up() {
        let page = Page::<u8> {
            items: vec![],
            total: 21,
            page: 2,
            page_size: 10,
        };
        assert_eq!(page.total_pages(), 3);
        assert!(page.has_next());
    }

    #[test]
    fn zero_sized_page_counts_one_row_per_page() {
        let page = Page::<u8> {
            items: vec![],
            total: 5,
            page: 1,
            page_size: 0,
        };
        assert_eq!(page.total_pages(), 5);
    }

    #[test]
    fn december_rolls_into_next_year() {
        let dec = YearMonth::new(2024, 12).unwrap();
        assert_eq!(dec.next_first_day(), NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
        assert!(dec.contains(NaiveDate::from_ymd_opt(2024, 12, 31).unwrap()));
        assert!(!dec.contains(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()));
    }

    #[test]
    fn year_month_parses_and_rejects() {
        let ym: YearMonth = "2025-02".parse().unwrap();
        assert_eq!((ym.year(), ym.month()), (2025, 2));
        assert_eq!(ym.to_string(), "2025-02");
        assert!("2025-13".parse::<YearMonth>().is_err());
        assert!("202502".parse::<YearMonth>().is_err());
    }
}
