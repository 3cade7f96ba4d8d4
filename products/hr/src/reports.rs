use entity::{department, employee, training, vacation};
use sea_orm::{
    ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
    sea_query::{Expr, Order},
};
use tracing::instrument;

use crate::{
    departments::department_counts_query,
    error::HrResult,
    model::{DashboardOverview, DepartmentCounts, VacationRow},
    store::{HrStore, employee_names, with_users},
};

const DASHBOARD_RECENT: u64 = 5;

impl HrStore {
    /// Headline counters and short activity lists for the HR landing page.
    #[instrument(name = "hr.dashboard_overview", skip(self))]
    pub async fn dashboard_overview(&self) -> HrResult<DashboardOverview> {
        let active_employees = employee::Entity::find()
            .filter(employee::Column::Active.eq(true))
            .count(&self.db)
            .await?;
        let active_departments = department::Entity::find()
            .filter(department::Column::Active.eq(true))
            .count(&self.db)
            .await?;
        let employees_on_vacation = employee::Entity::find()
            .filter(employee::Column::OnVacation.eq(true))
            .count(&self.db)
            .await?;
        let pending_vacation_requests = vacation::Entity::find()
            .filter(vacation::Column::Status.eq(vacation::Status::Requested))
            .count(&self.db)
            .await?;

        let recent = employee::Entity::find()
            .filter(employee::Column::Active.eq(true))
            .order_by_desc(employee::Column::CreatedAt)
            .limit(DASHBOARD_RECENT)
            .all(&self.db)
            .await?;
        let recent_employees = with_users(&self.db, recent).await?;

        let approved = vacation::Entity::find()
            .filter(vacation::Column::Status.eq(vacation::Status::Approved))
            .order_by_desc(vacation::Column::ApprovalDate)
            .limit(DASHBOARD_RECENT)
            .all(&self.db)
            .await?;
        let names = employee_names(&self.db, approved.iter().map(|v| v.employee_id)).await?;
        let recent_approved_vacations = approved
            .into_iter()
            .map(|vacation| VacationRow {
                employee_name: names.get(&vacation.employee_id).cloned().unwrap_or_default(),
                vacation,
            })
            .collect();

        let upcoming_trainings = training::Entity::find()
            .filter(training::Column::Status.eq(training::Status::Planned))
            .filter(training::Column::StartDate.gte(self.now()))
            .order_by_asc(training::Column::StartDate)
            .limit(DASHBOARD_RECENT)
            .all(&self.db)
            .await?;

        let departments_by_headcount = department_counts_query()
            .order_by(Expr::cust("total_employees"), Order::Desc)
            .order_by_asc(department::Column::Name)
            .into_model::<DepartmentCounts>()
            .all(&self.db)
            .await?;

        Ok(DashboardOverview {
            active_employees,
            active_departments,
            employees_on_vacation,
            pending_vacation_requests,
            recent_employees,
            recent_approved_vacations,
            upcoming_trainings,
            departments_by_headcount,
        })
    }
}
