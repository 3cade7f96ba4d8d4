use chrono::NaiveDate;
use entity::{employee, users, vacation};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
    sea_query::{Expr, Query},
};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::{
    error::{HrError, HrResult},
    model::{Page, PageRequest, RefreshOutcome, VacationDecision, VacationRow},
    store::{HrStore, employee_names, referenced_employee},
};

impl HrStore {
    #[instrument(name = "hr.request_vacation", skip(self, notes))]
    pub async fn request_vacation(
        &self,
        employee_id: Uuid,
        start_date: NaiveDate,
        end_date: NaiveDate,
        days_requested: i32,
        notes: Option<String>,
    ) -> HrResult<vacation::Model> {
        if end_date < start_date {
            return Err(HrError::validation(format!(
                "end date {end_date} is before start date {start_date}"
            )));
        }
        if days_requested <= 0 {
            return Err(HrError::validation("days requested must be positive"));
        }
        referenced_employee(&self.db, employee_id).await?;

        let model = vacation::ActiveModel {
            id: Set(Uuid::new_v4()),
            employee_id: Set(employee_id),
            start_date: Set(start_date),
            end_date: Set(end_date),
            days_requested: Set(days_requested),
            status: Set(vacation::Status::Requested),
            notes: Set(notes),
            approved_by: Set(None),
            approval_date: Set(None),
            request_date: Set(self.now()),
        }
        .insert(&self.db)
        .await?;
        info!(vacation_id = %model.id, %employee_id, "vacation requested");
        Ok(model)
    }

    /// Approve or reject a pending request. Approval also flags the employee
    /// as on vacation; both writes share one transaction.
    #[instrument(name = "hr.decide_vacation", skip(self))]
    pub async fn decide_vacation(
        &self,
        vacation_id: Uuid,
        approver_id: Uuid,
        decision: VacationDecision,
    ) -> HrResult<vacation::Model> {
        let txn = self.db.begin().await?;

        let current = vacation::Entity::find_by_id(vacation_id)
            .one(&txn)
            .await?
            .ok_or_else(|| HrError::not_found("vacation", vacation_id))?;
        if current.status != vacation::Status::Requested {
            warn!(%vacation_id, status = current.status.as_str(), "vacation already decided");
            return Err(HrError::InvalidTransition(format!(
                "vacation {vacation_id} is {}, not REQUESTED",
                current.status.as_str()
            )));
        }
        if users::Entity::find_by_id(approver_id)
            .one(&txn)
            .await?
            .is_none()
        {
            return Err(HrError::missing_reference("user", approver_id));
        }

        let now = self.now();
        let employee_id = current.employee_id;
        let status = match decision {
            VacationDecision::Approve => vacation::Status::Approved,
            VacationDecision::Reject => vacation::Status::Rejected,
        };
        // Only a still-REQUESTED row moves; a concurrent decision leaves zero rows.
        let moved = vacation::Entity::update_many()
            .col_expr(vacation::Column::Status, Expr::value(status))
            .col_expr(vacation::Column::ApprovedBy, Expr::value(approver_id))
            .col_expr(vacation::Column::ApprovalDate, Expr::value(now))
            .filter(vacation::Column::Id.eq(vacation_id))
            .filter(vacation::Column::Status.eq(vacation::Status::Requested))
            .exec(&txn)
            .await?;
        if moved.rows_affected == 0 {
            warn!(%vacation_id, "vacation decided concurrently");
            return Err(HrError::InvalidTransition(format!(
                "vacation {vacation_id} is no longer REQUESTED"
            )));
        }
        let updated = vacation::Entity::find_by_id(vacation_id)
            .one(&txn)
            .await?
            .ok_or_else(|| HrError::not_found("vacation", vacation_id))?;

        if decision == VacationDecision::Approve {
            let res = employee::Entity::update_many()
                .col_expr(employee::Column::OnVacation, Expr::value(true))
                .col_expr(employee::Column::UpdatedAt, Expr::value(now))
                .filter(employee::Column::Id.eq(employee_id))
                .exec(&txn)
                .await?;
            if res.rows_affected == 0 {
                return Err(HrError::missing_reference("employee", employee_id));
            }
        }

        txn.commit().await?;
        info!(%vacation_id, ?decision, "vacation decided");
        Ok(updated)
    }

    /// Newest requests first, optionally narrowed to one status.
    #[instrument(name = "hr.list_vacations", skip(self))]
    pub async fn list_vacations(
        &self,
        status: Option<vacation::Status>,
        page: PageRequest,
    ) -> HrResult<Page<VacationRow>> {
        let mut query = vacation::Entity::find();
        if let Some(status) = status {
            query = query.filter(vacation::Column::Status.eq(status));
        }
        let paginator = query
            .order_by_desc(vacation::Column::RequestDate)
            .order_by_asc(vacation::Column::Id)
            .paginate(&self.db, page.page_size());
        let total = paginator.num_items().await?;
        let vacations = paginator.fetch_page(page.index()).await?;

        let names = employee_names(&self.db, vacations.iter().map(|v| v.employee_id)).await?;
        let items = vacations
            .into_iter()
            .map(|vacation| VacationRow {
                employee_name: names.get(&vacation.employee_id).cloned().unwrap_or_default(),
                vacation,
            })
            .collect();
        Ok(Page {
            items,
            total,
            page: page.page(),
            page_size: page.page_size(),
        })
    }

    /// Expiry job: advance approved vacations through IN_PROGRESS to
    /// COMPLETED as of `today`, then make `on_vacation` match exactly the
    /// employees with an IN_PROGRESS vacation.
    #[instrument(name = "hr.refresh_vacation_states", skip(self))]
    pub async fn refresh_vacation_states(&self, today: NaiveDate) -> HrResult<RefreshOutcome> {
        let txn = self.db.begin().await?;
        let now = self.now();

        let completed = vacation::Entity::update_many()
            .col_expr(vacation::Column::Status, Expr::value(vacation::Status::Completed))
            .filter(
                vacation::Column::Status
                    .is_in([vacation::Status::Approved, vacation::Status::InProgress]),
            )
            .filter(vacation::Column::EndDate.lt(today))
            .exec(&txn)
            .await?
            .rows_affected;

        let started = vacation::Entity::update_many()
            .col_expr(vacation::Column::Status, Expr::value(vacation::Status::InProgress))
            .filter(vacation::Column::Status.eq(vacation::Status::Approved))
            .filter(vacation::Column::StartDate.lte(today))
            .filter(vacation::Column::EndDate.gte(today))
            .exec(&txn)
            .await?
            .rows_affected;

        let in_progress = Query::select()
            .column(vacation::Column::EmployeeId)
            .from(vacation::Entity)
            .and_where(vacation::Column::Status.eq(vacation::Status::InProgress))
            .to_owned();

        let flags_set = employee::Entity::update_many()
            .col_expr(employee::Column::OnVacation, Expr::value(true))
            .col_expr(employee::Column::UpdatedAt, Expr::value(now))
            .filter(employee::Column::OnVacation.eq(false))
            .filter(employee::Column::Id.in_subquery(in_progress.clone()))
            .exec(&txn)
            .await?
            .rows_affected;

        let flags_cleared = employee::Entity::update_many()
            .col_expr(employee::Column::OnVacation, Expr::value(false))
            .col_expr(employee::Column::UpdatedAt, Expr::value(now))
            .filter(employee::Column::OnVacation.eq(true))
            .filter(employee::Column::Id.not_in_subquery(in_progress))
            .exec(&txn)
            .await?
            .rows_affected;

        txn.commit().await?;
        let outcome = RefreshOutcome {
            started,
            completed,
            flags_set,
            flags_cleared,
        };
        info!(%today, ?outcome, "vacation states refreshed");
        Ok(outcome)
    }
}
