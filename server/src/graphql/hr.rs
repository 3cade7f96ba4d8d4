use async_graphql::{Context, ErrorExtensions, ID, Object, Result};
use chrono::NaiveDate;
use platform_api::{ApiError, parse_id};
use products_hr::{AttendanceFilter, HrError, HrStore, PageRequest, YearMonth};
use tracing::instrument;

use super::{
    GraphqlData,
    nodes::{
        AttendanceNode, AttendanceSummaryNode, CreateDepartmentInput, CreateEmployeeInput,
        CreatePositionInput, DashboardNode, Decision, DepartmentCountsNode, DepartmentDetailNode,
        DepartmentNode, EmployeeDetailNode, EmployeeFilterInput, EmployeeNode, PageNode,
        PerformanceReportNode, PositionNode, RecordAttendanceInput, RefreshOutcomeNode,
        RequestVacationInput, TrainingStatsNode, VacationNode, VacationStatus,
    },
};

fn gql(err: HrError) -> async_graphql::Error {
    ApiError::from(err).extend()
}

fn bad_input(err: ApiError) -> async_graphql::Error {
    err.extend()
}

fn data<'a>(ctx: &'a Context<'_>) -> Result<&'a GraphqlData> {
    ctx.data::<GraphqlData>()
}

fn store<'a>(ctx: &'a Context<'_>) -> Result<&'a HrStore> {
    Ok(&data(ctx)?.store)
}

fn page_request(
    ctx: &Context<'_>,
    page: Option<u64>,
    page_size: Option<u64>,
) -> Result<PageRequest> {
    let default_size = data(ctx)?.default_page_size;
    Ok(PageRequest::new(
        page.unwrap_or(1),
        page_size.unwrap_or(default_size),
    ))
}

#[derive(Default)]
pub struct HrQuery;

#[Object]
impl HrQuery {
    #[instrument(name = "graphql.hr.employees", skip_all)]
    async fn employees(
        &self,
        ctx: &Context<'_>,
        filter: Option<EmployeeFilterInput>,
        page: Option<u64>,
        page_size: Option<u64>,
    ) -> Result<PageNode<EmployeeNode>> {
        let filter = filter
            .unwrap_or_default()
            .into_filter()
            .map_err(bad_input)?;
        let request = page_request(ctx, page, page_size)?;
        let page = store(ctx)?
            .list_employees(filter, request)
            .await
            .map_err(gql)?;
        Ok(PageNode::from_page(page, EmployeeNode::from))
    }

    #[instrument(name = "graphql.hr.employee", skip_all)]
    async fn employee(&self, ctx: &Context<'_>, id: ID) -> Result<EmployeeDetailNode> {
        let id = parse_id(&id, "id").map_err(bad_input)?;
        let detail = store(ctx)?.get_employee_detail(id).await.map_err(gql)?;
        Ok(detail.into())
    }

    #[instrument(name = "graphql.hr.departments", skip_all)]
    async fn departments(&self, ctx: &Context<'_>) -> Result<Vec<DepartmentCountsNode>> {
        let rows = store(ctx)?
            .list_departments_with_counts()
            .await
            .map_err(gql)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    #[instrument(name = "graphql.hr.department", skip_all)]
    async fn department(&self, ctx: &Context<'_>, id: ID) -> Result<DepartmentDetailNode> {
        let id = parse_id(&id, "id").map_err(bad_input)?;
        let detail = store(ctx)?.get_department_detail(id).await.map_err(gql)?;
        Ok(detail.into())
    }

    #[instrument(name = "graphql.hr.positions", skip_all)]
    async fn positions(
        &self,
        ctx: &Context<'_>,
        department_id: Option<ID>,
    ) -> Result<Vec<PositionNode>> {
        let department_id = department_id
            .map(|id| parse_id(&id, "departmentId"))
            .transpose()
            .map_err(bad_input)?;
        let rows = store(ctx)?
            .list_positions(department_id)
            .await
            .map_err(gql)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    #[instrument(name = "graphql.hr.vacations", skip_all)]
    async fn vacations(
        &self,
        ctx: &Context<'_>,
        status: Option<VacationStatus>,
        page: Option<u64>,
        page_size: Option<u64>,
    ) -> Result<PageNode<VacationNode>> {
        let request = page_request(ctx, page, page_size)?;
        let page = store(ctx)?
            .list_vacations(status.map(Into::into), request)
            .await
            .map_err(gql)?;
        Ok(PageNode::from_page(page, VacationNode::from))
    }

    /// `month` is `YYYY-MM`.
    #[instrument(name = "graphql.hr.attendance_summary", skip_all)]
    async fn attendance_summary(
        &self,
        ctx: &Context<'_>,
        month: String,
        employee_id: Option<ID>,
        department_id: Option<ID>,
    ) -> Result<AttendanceSummaryNode> {
        let parsed: YearMonth = month.parse().map_err(gql)?;
        let filter = AttendanceFilter {
            employee_id: employee_id
                .map(|id| parse_id(&id, "employeeId"))
                .transpose()
                .map_err(bad_input)?,
            department_id: department_id
                .map(|id| parse_id(&id, "departmentId"))
                .transpose()
                .map_err(bad_input)?,
        };
        let summary = store(ctx)?
            .monthly_attendance_summary(parsed, filter)
            .await
            .map_err(gql)?;
        Ok(AttendanceSummaryNode::new(parsed.to_string(), summary))
    }

    #[instrument(name = "graphql.hr.performance_report", skip_all)]
    async fn performance_report(&self, ctx: &Context<'_>) -> Result<PerformanceReportNode> {
        let report = store(ctx)?.performance_report().await.map_err(gql)?;
        Ok(report.into())
    }

    #[instrument(name = "graphql.hr.dashboard", skip_all)]
    async fn dashboard(&self, ctx: &Context<'_>) -> Result<DashboardNode> {
        let overview = store(ctx)?.dashboard_overview().await.map_err(gql)?;
        Ok(overview.into())
    }

    #[instrument(name = "graphql.hr.training_stats", skip_all)]
    async fn training_stats(&self, ctx: &Context<'_>) -> Result<TrainingStatsNode> {
        let stats = store(ctx)?.training_stats().await.map_err(gql)?;
        Ok(stats.into())
    }
}

#[derive(Default)]
pub struct HrMutation;

#[Object]
impl HrMutation {
    #[instrument(name = "graphql.hr.create_department", skip_all)]
    async fn create_department(
        &self,
        ctx: &Context<'_>,
        input: CreateDepartmentInput,
    ) -> Result<DepartmentNode> {
        let input = input.into_new().map_err(bad_input)?;
        let created = store(ctx)?.create_department(input).await.map_err(gql)?;
        Ok(created.into())
    }

    #[instrument(name = "graphql.hr.create_position", skip_all)]
    async fn create_position(
        &self,
        ctx: &Context<'_>,
        input: CreatePositionInput,
    ) -> Result<PositionNode> {
        let input = input.into_new().map_err(bad_input)?;
        let created = store(ctx)?.create_position(input).await.map_err(gql)?;
        Ok(created.into())
    }

    #[instrument(name = "graphql.hr.create_employee", skip_all)]
    async fn create_employee(
        &self,
        ctx: &Context<'_>,
        input: CreateEmployeeInput,
    ) -> Result<EmployeeNode> {
        let (personal, professional) = input.into_parts().map_err(bad_input)?;
        let row = store(ctx)?
            .create_employee(personal, professional)
            .await
            .map_err(gql)?;
        Ok(row.into())
    }

    #[instrument(name = "graphql.hr.set_employee_leave", skip_all)]
    async fn set_employee_leave(
        &self,
        ctx: &Context<'_>,
        id: ID,
        on_leave: bool,
    ) -> Result<EmployeeDetailNode> {
        let id = parse_id(&id, "id").map_err(bad_input)?;
        let store = store(ctx)?;
        store.set_employee_leave(id, on_leave).await.map_err(gql)?;
        Ok(store.get_employee_detail(id).await.map_err(gql)?.into())
    }

    #[instrument(name = "graphql.hr.terminate_employee", skip_all)]
    async fn terminate_employee(
        &self,
        ctx: &Context<'_>,
        id: ID,
        termination_date: NaiveDate,
    ) -> Result<EmployeeDetailNode> {
        let id = parse_id(&id, "id").map_err(bad_input)?;
        let store = store(ctx)?;
        store
            .terminate_employee(id, termination_date)
            .await
            .map_err(gql)?;
        Ok(store.get_employee_detail(id).await.map_err(gql)?.into())
    }

    #[instrument(name = "graphql.hr.request_vacation", skip_all)]
    async fn request_vacation(
        &self,
        ctx: &Context<'_>,
        input: RequestVacationInput,
    ) -> Result<VacationNode> {
        let employee_id = parse_id(&input.employee_id, "employeeId").map_err(bad_input)?;
        let created = store(ctx)?
            .request_vacation(
                employee_id,
                input.start_date,
                input.end_date,
                input.days_requested,
                input.notes,
            )
            .await
            .map_err(gql)?;
        Ok(created.into())
    }

    #[instrument(name = "graphql.hr.decide_vacation", skip_all)]
    async fn decide_vacation(
        &self,
        ctx: &Context<'_>,
        id: ID,
        approver_id: ID,
        decision: Decision,
    ) -> Result<VacationNode> {
        let id = parse_id(&id, "id").map_err(bad_input)?;
        let approver_id = parse_id(&approver_id, "approverId").map_err(bad_input)?;
        let decided = store(ctx)?
            .decide_vacation(id, approver_id, decision.into())
            .await
            .map_err(gql)?;
        Ok(decided.into())
    }

    #[instrument(name = "graphql.hr.record_attendance", skip_all)]
    async fn record_attendance(
        &self,
        ctx: &Context<'_>,
        input: RecordAttendanceInput,
    ) -> Result<AttendanceNode> {
        let entry = input.into_entry().map_err(bad_input)?;
        let recorded = store(ctx)?.record_attendance(entry).await.map_err(gql)?;
        Ok(recorded.into())
    }

    /// Runs the vacation expiry job; `today` defaults to the store clock.
    #[instrument(name = "graphql.hr.refresh_vacation_states", skip_all)]
    async fn refresh_vacation_states(
        &self,
        ctx: &Context<'_>,
        today: Option<NaiveDate>,
    ) -> Result<RefreshOutcomeNode> {
        let store = store(ctx)?;
        let today = today.unwrap_or_else(|| store.clock().today());
        let outcome = store.refresh_vacation_states(today).await.map_err(gql)?;
        Ok(outcome.into())
    }
}
