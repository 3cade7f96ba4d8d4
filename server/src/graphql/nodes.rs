use async_graphql::{Enum, ID, InputObject, OutputType, SimpleObject};
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime};
use entity::{attendance, department, dependent, document, position, training, vacation};
use platform_api::{ApiResult, parse_id};
use products_hr::{
    AttendanceEntry, AttendanceSummary, DashboardOverview, DepartmentCounts, DepartmentDetail,
    EmployeeDetail, EmployeeFilter, EmployeeRow, EmployeeStatus, NewDepartment, NewPosition, Page,
    PerformanceReport, PersonalData, ProfessionalData, Punches, RefreshOutcome, TrainingStats,
    VacationRow,
};
use rust_decimal::Decimal;

fn id_of(uuid: uuid::Uuid) -> ID {
    ID::from(uuid.to_string())
}

fn optional_id(id: Option<&ID>, field: &str) -> ApiResult<Option<uuid::Uuid>> {
    id.map(|id| parse_id(id, field)).transpose()
}

// Enums mirrored from the entity crate.

#[derive(Enum, Copy, Clone, Debug, Eq, PartialEq)]
#[graphql(remote = "entity::employee::Gender")]
pub enum Gender {
    Male,
    Female,
    Other,
}

#[derive(Enum, Copy, Clone, Debug, Eq, PartialEq)]
#[graphql(remote = "entity::employee::MaritalStatus")]
pub enum MaritalStatus {
    Single,
    Married,
    Divorced,
    Widowed,
    StableUnion,
}

#[derive(Enum, Copy, Clone, Debug, Eq, PartialEq)]
#[graphql(remote = "entity::position::ContractType")]
pub enum ContractType {
    Clt,
    Pj,
    Internship,
    Temporary,
    Outsourced,
}

#[derive(Enum, Copy, Clone, Debug, Eq, PartialEq)]
#[graphql(remote = "entity::vacation::Status")]
pub enum VacationStatus {
    Requested,
    Approved,
    Rejected,
    InProgress,
    Completed,
}

#[derive(Enum, Copy, Clone, Debug, Eq, PartialEq)]
#[graphql(remote = "entity::training::Status")]
pub enum TrainingStatus {
    Planned,
    InProgress,
    Completed,
    Cancelled,
}

#[derive(Enum, Copy, Clone, Debug, Eq, PartialEq)]
#[graphql(remote = "entity::dependent::Relationship")]
pub enum Relationship {
    Child,
    Spouse,
    Father,
    Mother,
    Sibling,
    Other,
}

#[derive(Enum, Copy, Clone, Debug, Eq, PartialEq)]
#[graphql(remote = "products_hr::EmployeeStatus")]
pub enum EmployeeStatusFilter {
    Active,
    OnVacation,
    OnLeave,
}

#[derive(Enum, Copy, Clone, Debug, Eq, PartialEq)]
#[graphql(remote = "products_hr::VacationDecision")]
pub enum Decision {
    Approve,
    Reject,
}

// Pages

#[derive(Clone, Debug, SimpleObject)]
#[graphql(concrete(name = "EmployeePage", params(EmployeeNode)))]
#[graphql(concrete(name = "VacationPage", params(VacationNode)))]
pub struct PageNode<T: OutputType> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u64,
    pub page_size: u64,
    pub total_pages: u64,
    pub has_next: bool,
}

impl<T: OutputType> PageNode<T> {
    pub fn from_page<U>(page: Page<U>, f: impl FnMut(U) -> T) -> Self {
        let (total_pages, has_next) = (page.total_pages(), page.has_next());
        let page = page.map(f);
        Self {
            items: page.items,
            total: page.total,
            page: page.page,
            page_size: page.page_size,
            total_pages,
            has_next,
        }
    }
}

// Employees

#[derive(Clone, Debug, SimpleObject)]
pub struct EmployeeNode {
    pub id: ID,
    pub user_id: ID,
    pub full_name: String,
    pub email: String,
    pub national_id: String,
    pub employee_code: String,
    pub gender: Gender,
    pub birth_date: NaiveDate,
    pub mobile: Option<String>,
    pub city: Option<String>,
    pub department_id: ID,
    pub position_id: ID,
    pub hire_date: NaiveDate,
    pub termination_date: Option<NaiveDate>,
    pub current_salary: Decimal,
    pub work_hours: i32,
    pub contract_type: ContractType,
    pub active: bool,
    pub on_vacation: bool,
    pub on_leave: bool,
}

impl From<EmployeeRow> for EmployeeNode {
    fn from(row: EmployeeRow) -> Self {
        let full_name = row.full_name();
        let e = row.employee;
        Self {
            id: id_of(e.id),
            user_id: id_of(e.user_id),
            full_name,
            email: row.user.email,
            national_id: e.national_id,
            employee_code: e.employee_code,
            gender: e.gender.into(),
            birth_date: e.birth_date,
            mobile: e.mobile,
            city: e.city,
            department_id: id_of(e.department_id),
            position_id: id_of(e.position_id),
            hire_date: e.hire_date,
            termination_date: e.termination_date,
            current_salary: e.current_salary,
            work_hours: e.work_hours,
            contract_type: e.contract_type.into(),
            active: e.active,
            on_vacation: e.on_vacation,
            on_leave: e.on_leave,
        }
    }
}

#[derive(Clone, Debug, SimpleObject)]
pub struct DependentNode {
    pub id: ID,
    pub name: String,
    pub birth_date: NaiveDate,
    pub relationship: Relationship,
}

impl From<dependent::Model> for DependentNode {
    fn from(model: dependent::Model) -> Self {
        Self {
            id: id_of(model.id),
            name: model.name,
            birth_date: model.birth_date,
            relationship: model.relationship.into(),
        }
    }
}

#[derive(Clone, Debug, SimpleObject)]
pub struct DocumentNode {
    pub id: ID,
    pub name: String,
    pub file_ref: String,
    pub upload_date: DateTime<FixedOffset>,
}

impl From<document::Model> for DocumentNode {
    fn from(model: document::Model) -> Self {
        Self {
            id: id_of(model.id),
            name: model.name,
            file_ref: model.file_ref,
            upload_date: model.upload_date,
        }
    }
}

#[derive(Clone, Debug, SimpleObject)]
pub struct EmployeeDetailNode {
    pub employee: EmployeeNode,
    pub department: Option<DepartmentNode>,
    pub position: Option<PositionNode>,
    pub dependents: Vec<DependentNode>,
    pub vacations: Vec<VacationNode>,
    pub attendance: Vec<AttendanceNode>,
    pub documents: Vec<DocumentNode>,
    pub trainings: Vec<TrainingNode>,
}

impl From<EmployeeDetail> for EmployeeDetailNode {
    fn from(detail: EmployeeDetail) -> Self {
        Self {
            employee: EmployeeRow {
                employee: detail.employee,
                user: detail.user,
            }
            .into(),
            department: detail.department.map(Into::into),
            position: detail.position.map(Into::into),
            dependents: detail.dependents.into_iter().map(Into::into).collect(),
            vacations: detail.vacations.into_iter().map(Into::into).collect(),
            attendance: detail.attendance.into_iter().map(Into::into).collect(),
            documents: detail.documents.into_iter().map(Into::into).collect(),
            trainings: detail
                .trainings
                .into_iter()
                .map(|link| link.training.into())
                .collect(),
        }
    }
}

#[derive(Clone, Debug, Default, InputObject)]
pub struct EmployeeFilterInput {
    pub search: Option<String>,
    pub department_id: Option<ID>,
    pub status: Option<EmployeeStatusFilter>,
    #[graphql(default)]
    pub include_inactive: bool,
}

impl EmployeeFilterInput {
    pub fn into_filter(self) -> ApiResult<EmployeeFilter> {
        Ok(EmployeeFilter {
            search: self.search,
            department_id: optional_id(self.department_id.as_ref(), "departmentId")?,
            status: self.status.map(EmployeeStatus::from),
            include_inactive: self.include_inactive,
        })
    }
}

#[derive(Clone, Debug, InputObject)]
pub struct CreateEmployeeInput {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub national_id: String,
    pub birth_date: NaiveDate,
    pub gender: Gender,
    pub marital_status: Option<MaritalStatus>,
    pub phone: Option<String>,
    pub mobile: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub employee_code: String,
    pub department_id: ID,
    pub position_id: ID,
    pub hire_date: NaiveDate,
    pub current_salary: Decimal,
    pub work_hours: Option<i32>,
    pub contract_type: ContractType,
}

impl CreateEmployeeInput {
    pub fn into_parts(self) -> ApiResult<(PersonalData, ProfessionalData)> {
        let professional = ProfessionalData {
            employee_code: self.employee_code,
            position_id: parse_id(&self.position_id, "positionId")?,
            department_id: parse_id(&self.department_id, "departmentId")?,
            hire_date: self.hire_date,
            current_salary: self.current_salary,
            work_hours: self.work_hours,
            contract_type: self.contract_type.into(),
            bank: None,
            agency: None,
            account: None,
            pix_key: None,
        };
        let personal = PersonalData {
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            national_id: self.national_id,
            id_document: None,
            birth_date: self.birth_date,
            gender: self.gender.into(),
            marital_status: self.marital_status.map(Into::into),
            phone: self.phone,
            mobile: self.mobile,
            address: None,
            city: self.city,
            state: self.state,
            zip_code: None,
        };
        Ok((personal, professional))
    }
}

// Departments and positions

#[derive(Clone, Debug, SimpleObject)]
pub struct DepartmentNode {
    pub id: ID,
    pub name: String,
    pub description: Option<String>,
    pub budget: Decimal,
    pub manager_id: Option<ID>,
    pub active: bool,
}

impl From<department::Model> for DepartmentNode {
    fn from(model: department::Model) -> Self {
        Self {
            id: id_of(model.id),
            name: model.name,
            description: model.description,
            budget: model.budget,
            manager_id: model.manager_id.map(id_of),
            active: model.active,
        }
    }
}

#[derive(Clone, Debug, SimpleObject)]
pub struct DepartmentCountsNode {
    pub id: ID,
    pub name: String,
    pub total_employees: i64,
    pub active_employees: i64,
}

impl From<DepartmentCounts> for DepartmentCountsNode {
    fn from(counts: DepartmentCounts) -> Self {
        Self {
            id: id_of(counts.id),
            name: counts.name,
            total_employees: counts.total_employees,
            active_employees: counts.active_employees,
        }
    }
}

#[derive(Clone, Debug, SimpleObject)]
pub struct DepartmentDetailNode {
    pub department: DepartmentNode,
    pub manager: Option<EmployeeNode>,
    pub employees: Vec<EmployeeNode>,
    pub positions: Vec<PositionNode>,
    pub total_employees: u64,
    pub on_vacation: u64,
    pub on_leave: u64,
}

impl From<DepartmentDetail> for DepartmentDetailNode {
    fn from(detail: DepartmentDetail) -> Self {
        Self {
            department: detail.department.into(),
            manager: detail.manager.map(Into::into),
            employees: detail.employees.into_iter().map(Into::into).collect(),
            positions: detail.positions.into_iter().map(Into::into).collect(),
            total_employees: detail.total_employees,
            on_vacation: detail.on_vacation,
            on_leave: detail.on_leave,
        }
    }
}

#[derive(Clone, Debug, InputObject)]
pub struct CreateDepartmentInput {
    pub name: String,
    pub description: Option<String>,
    pub budget: Decimal,
    pub manager_id: Option<ID>,
}

impl CreateDepartmentInput {
    pub fn into_new(self) -> ApiResult<NewDepartment> {
        Ok(NewDepartment {
            manager_id: optional_id(self.manager_id.as_ref(), "managerId")?,
            name: self.name,
            description: self.description,
            budget: self.budget,
        })
    }
}

#[derive(Clone, Debug, SimpleObject)]
pub struct PositionNode {
    pub id: ID,
    pub name: String,
    pub department_id: ID,
    pub base_salary: Decimal,
    pub contract_type: ContractType,
    pub hierarchy_level: i32,
    pub active: bool,
}

impl From<position::Model> for PositionNode {
    fn from(model: position::Model) -> Self {
        Self {
            id: id_of(model.id),
            name: model.name,
            department_id: id_of(model.department_id),
            base_salary: model.base_salary,
            contract_type: model.contract_type.into(),
            hierarchy_level: model.hierarchy_level,
            active: model.active,
        }
    }
}

#[derive(Clone, Debug, InputObject)]
pub struct CreatePositionInput {
    pub name: String,
    pub department_id: ID,
    pub description: Option<String>,
    pub base_salary: Decimal,
    pub contract_type: ContractType,
    pub hierarchy_level: i32,
    pub requirements: Option<String>,
}

impl CreatePositionInput {
    pub fn into_new(self) -> ApiResult<NewPosition> {
        Ok(NewPosition {
            department_id: parse_id(&self.department_id, "departmentId")?,
            name: self.name,
            description: self.description,
            base_salary: self.base_salary,
            contract_type: self.contract_type.into(),
            hierarchy_level: self.hierarchy_level,
            requirements: self.requirements,
        })
    }
}

// Vacations

#[derive(Clone, Debug, SimpleObject)]
pub struct VacationNode {
    pub id: ID,
    pub employee_id: ID,
    pub employee_name: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub days_requested: i32,
    pub status: VacationStatus,
    pub notes: Option<String>,
    pub approved_by: Option<ID>,
    pub approval_date: Option<DateTime<FixedOffset>>,
    pub request_date: DateTime<FixedOffset>,
}

impl From<vacation::Model> for VacationNode {
    fn from(model: vacation::Model) -> Self {
        Self {
            id: id_of(model.id),
            employee_id: id_of(model.employee_id),
            employee_name: None,
            start_date: model.start_date,
            end_date: model.end_date,
            days_requested: model.days_requested,
            status: model.status.into(),
            notes: model.notes,
            approved_by: model.approved_by.map(id_of),
            approval_date: model.approval_date,
            request_date: model.request_date,
        }
    }
}

impl From<VacationRow> for VacationNode {
    fn from(row: VacationRow) -> Self {
        Self {
            employee_name: Some(row.employee_name),
            ..row.vacation.into()
        }
    }
}

#[derive(Clone, Debug, InputObject)]
pub struct RequestVacationInput {
    pub employee_id: ID,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub days_requested: i32,
    pub notes: Option<String>,
}

#[derive(Clone, Debug, SimpleObject)]
pub struct RefreshOutcomeNode {
    pub started: u64,
    pub completed: u64,
    pub flags_set: u64,
    pub flags_cleared: u64,
}

impl From<RefreshOutcome> for RefreshOutcomeNode {
    fn from(outcome: RefreshOutcome) -> Self {
        Self {
            started: outcome.started,
            completed: outcome.completed,
            flags_set: outcome.flags_set,
            flags_cleared: outcome.flags_cleared,
        }
    }
}

// Attendance

#[derive(Clone, Debug, SimpleObject)]
pub struct AttendanceNode {
    pub id: ID,
    pub employee_id: ID,
    pub date: NaiveDate,
    pub check_in: Option<NaiveTime>,
    pub lunch_out: Option<NaiveTime>,
    pub lunch_in: Option<NaiveTime>,
    pub check_out: Option<NaiveTime>,
    pub hours_worked: Decimal,
    pub overtime_hours: Decimal,
    pub notes: Option<String>,
}

impl From<attendance::Model> for AttendanceNode {
    fn from(model: attendance::Model) -> Self {
        Self {
            id: id_of(model.id),
            employee_id: id_of(model.employee_id),
            date: model.date,
            check_in: model.check_in,
            lunch_out: model.lunch_out,
            lunch_in: model.lunch_in,
            check_out: model.check_out,
            hours_worked: model.hours_worked,
            overtime_hours: model.overtime_hours,
            notes: model.notes,
        }
    }
}

#[derive(Clone, Debug, InputObject)]
pub struct RecordAttendanceInput {
    pub employee_id: ID,
    pub date: NaiveDate,
    pub check_in: Option<NaiveTime>,
    pub lunch_out: Option<NaiveTime>,
    pub lunch_in: Option<NaiveTime>,
    pub check_out: Option<NaiveTime>,
    pub hours_worked: Option<Decimal>,
    pub overtime_hours: Option<Decimal>,
    pub notes: Option<String>,
}

impl RecordAttendanceInput {
    pub fn into_entry(self) -> ApiResult<AttendanceEntry> {
        Ok(AttendanceEntry {
            employee_id: parse_id(&self.employee_id, "employeeId")?,
            date: self.date,
            punches: Punches {
                check_in: self.check_in,
                lunch_out: self.lunch_out,
                lunch_in: self.lunch_in,
                check_out: self.check_out,
            },
            hours_worked: self.hours_worked,
            overtime_hours: self.overtime_hours,
            notes: self.notes,
        })
    }
}

#[derive(Clone, Debug, SimpleObject)]
pub struct AttendanceSummaryNode {
    pub month: String,
    pub avg_hours_worked: Option<f64>,
    pub avg_overtime_hours: Option<f64>,
    pub records: i64,
}

impl AttendanceSummaryNode {
    pub fn new(month: String, summary: AttendanceSummary) -> Self {
        Self {
            month,
            avg_hours_worked: summary.avg_hours_worked,
            avg_overtime_hours: summary.avg_overtime_hours,
            records: summary.records,
        }
    }
}

// Training, evaluations and the dashboard

#[derive(Clone, Debug, SimpleObject)]
pub struct TrainingNode {
    pub id: ID,
    pub name: String,
    pub instructor: String,
    pub location: String,
    pub start_date: DateTime<FixedOffset>,
    pub end_date: DateTime<FixedOffset>,
    pub status: TrainingStatus,
    pub max_participants: i32,
}

impl From<training::Model> for TrainingNode {
    fn from(model: training::Model) -> Self {
        Self {
            id: id_of(model.id),
            name: model.name,
            instructor: model.instructor,
            location: model.location,
            start_date: model.start_date,
            end_date: model.end_date,
            status: model.status.into(),
            max_participants: model.max_participants,
        }
    }
}

#[derive(Clone, Debug, SimpleObject)]
pub struct TrainingStatsNode {
    pub total: i64,
    pub completed: i64,
}

impl From<TrainingStats> for TrainingStatsNode {
    fn from(stats: TrainingStats) -> Self {
        Self {
            total: stats.total,
            completed: stats.completed,
        }
    }
}

#[derive(Clone, Debug, SimpleObject)]
pub struct PerformanceReportNode {
    pub average_grade: Option<f64>,
    pub evaluations: i64,
}

impl From<PerformanceReport> for PerformanceReportNode {
    fn from(report: PerformanceReport) -> Self {
        Self {
            average_grade: report.average_grade,
            evaluations: report.evaluations,
        }
    }
}

#[derive(Clone, Debug, SimpleObject)]
pub struct DashboardNode {
    pub active_employees: u64,
    pub active_departments: u64,
    pub employees_on_vacation: u64,
    pub pending_vacation_requests: u64,
    pub recent_employees: Vec<EmployeeNode>,
    pub recent_approved_vacations: Vec<VacationNode>,
    pub upcoming_trainings: Vec<TrainingNode>,
    pub departments_by_headcount: Vec<DepartmentCountsNode>,
}

impl From<DashboardOverview> for DashboardNode {
    fn from(overview: DashboardOverview) -> Self {
        Self {
            active_employees: overview.active_employees,
            active_departments: overview.active_departments,
            employees_on_vacation: overview.employees_on_vacation,
            pending_vacation_requests: overview.pending_vacation_requests,
            recent_employees: overview
                .recent_employees
                .into_iter()
                .map(Into::into)
                .collect(),
            recent_approved_vacations: overview
                .recent_approved_vacations
                .into_iter()
                .map(Into::into)
                .collect(),
            upcoming_trainings: overview
                .upcoming_trainings
                .into_iter()
                .map(Into::into)
                .collect(),
            departments_by_headcount: overview
                .departments_by_headcount
                .into_iter()
                .map(Into::into)
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use entity::employee;

    #[test]
    fn employee_filter_input_rejects_bad_department_id() {
        let input = EmployeeFilterInput {
            department_id: Some(ID::from("not-a-uuid")),
            ..Default::default()
        };
        let err = input.into_filter().unwrap_err();
        assert_eq!(err.code(), "VALIDATION");
    }

    #[test]
    fn status_filter_maps_onto_store_status() {
        let input = EmployeeFilterInput {
            status: Some(EmployeeStatusFilter::OnLeave),
            ..Default::default()
        };
        let filter = input.into_filter().unwrap();
        assert_eq!(filter.status, Some(EmployeeStatus::OnLeave));
        assert!(!filter.include_inactive);
    }

    #[test]
    fn entity_enums_round_trip_through_graphql_enums() {
        let status: VacationStatus = vacation::Status::InProgress.into();
        assert_eq!(status, VacationStatus::InProgress);
        let back: employee::Gender = Gender::Other.into();
        assert_eq!(back, employee::Gender::Other);
    }
}
