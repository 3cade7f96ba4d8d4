use entity::{employee, employee_training, training, users};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, IntoActiveModel, JoinType, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set, TransactionTrait,
    sea_query::Expr,
};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::{
    error::{HrError, HrResult},
    model::{
        NewTraining, Page, PageRequest, Participant, TrainingDetail, TrainingResult,
        TrainingStats,
    },
    policy::{self, DeleteReport, EntityKind},
    store::{HrStore, referenced_employee, require_text, with_users},
};

const DEFAULT_MAX_PARTICIPANTS: i32 = 20;

/// Allowed status moves for a training session.
fn can_move(from: training::Status, to: training::Status) -> bool {
    use training::Status::*;
    matches!(
        (from, to),
        (Planned, InProgress)
            | (Planned, Cancelled)
            | (InProgress, Completed)
            | (InProgress, Cancelled)
    )
}

impl HrStore {
    #[instrument(name = "hr.create_training", skip_all, fields(name = %input.name))]
    pub async fn create_training(&self, input: NewTraining) -> HrResult<training::Model> {
        let name = require_text(&input.name, "training name")?;
        if input.end < input.start {
            return Err(HrError::validation("training ends before it starts"));
        }
        if input.duration_hours <= 0 {
            return Err(HrError::validation("duration must be positive"));
        }
        let max_participants = input.max_participants.unwrap_or(DEFAULT_MAX_PARTICIPANTS);
        if max_participants <= 0 {
            return Err(HrError::validation("max participants must be positive"));
        }
        if input.cost < Decimal::ZERO {
            return Err(HrError::validation("cost must not be negative"));
        }

        let model = training::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name),
            description: Set(input.description),
            instructor: Set(input.instructor),
            start_date: Set(input.start.into()),
            end_date: Set(input.end.into()),
            duration_hours: Set(input.duration_hours),
            location: Set(input.location),
            status: Set(training::Status::Planned),
            cost: Set(input.cost),
            max_participants: Set(max_participants),
        }
        .insert(&self.db)
        .await?;
        info!(training_id = %model.id, "training created");
        Ok(model)
    }

    /// Newest start first.
    #[instrument(name = "hr.list_trainings", skip(self))]
    pub async fn list_trainings(
        &self,
        status: Option<training::Status>,
        page: PageRequest,
    ) -> HrResult<Page<training::Model>> {
        let mut query = training::Entity::find();
        if let Some(status) = status {
            query = query.filter(training::Column::Status.eq(status));
        }
        let paginator = query
            .order_by_desc(training::Column::StartDate)
            .order_by_asc(training::Column::Id)
            .paginate(&self.db, page.page_size());
        let total = paginator.num_items().await?;
        let items = paginator.fetch_page(page.index()).await?;
        Ok(Page {
            items,
            total,
            page: page.page(),
            page_size: page.page_size(),
        })
    }

    #[instrument(name = "hr.set_training_status", skip(self))]
    pub async fn set_training_status(
        &self,
        id: Uuid,
        status: training::Status,
    ) -> HrResult<training::Model> {
        let current = training::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| HrError::not_found("training", id))?;
        if !can_move(current.status, status) {
            warn!(
                training_id = %id,
                from = ?current.status,
                to = ?status,
                "training transition rejected"
            );
            return Err(HrError::InvalidTransition(format!(
                "training {id} cannot move from {:?} to {status:?}",
                current.status
            )));
        }
        let mut active = current.into_active_model();
        active.status = Set(status);
        Ok(active.update(&self.db).await?)
    }

    /// Enrol an employee; rejects duplicates and full or closed sessions.
    #[instrument(name = "hr.enroll_in_training", skip(self))]
    pub async fn enroll_in_training(
        &self,
        training_id: Uuid,
        employee_id: Uuid,
    ) -> HrResult<employee_training::Model> {
        let txn = self.db.begin().await?;
        let training = training::Entity::find_by_id(training_id)
            .one(&txn)
            .await?
            .ok_or_else(|| HrError::missing_reference("training", training_id))?;
        referenced_employee(&txn, employee_id).await?;

        if matches!(
            training.status,
            training::Status::Completed | training::Status::Cancelled
        ) {
            return Err(HrError::InvalidTransition(format!(
                "training {training_id} is closed for enrolment"
            )));
        }

        let existing = employee_training::Entity::find()
            .filter(employee_training::Column::TrainingId.eq(training_id))
            .filter(employee_training::Column::EmployeeId.eq(employee_id))
            .count(&txn)
            .await?;
        if existing > 0 {
            return Err(HrError::DuplicateKey(format!(
                "employee {employee_id} already enrolled in training {training_id}"
            )));
        }

        let enrolled = employee_training::Entity::find()
            .filter(employee_training::Column::TrainingId.eq(training_id))
            .count(&txn)
            .await?;
        if enrolled >= training.max_participants.max(0) as u64 {
            warn!(%training_id, enrolled, "training is full");
            return Err(HrError::validation(format!(
                "training {} is full ({} participants)",
                training.name, training.max_participants
            )));
        }

        let model = employee_training::ActiveModel {
            id: Set(Uuid::new_v4()),
            employee_id: Set(employee_id),
            training_id: Set(training_id),
            status: Set(employee_training::Status::Enrolled),
            grade: Set(None),
            certificate: Set(false),
            notes: Set(None),
        }
        .insert(&txn)
        .await?;
        txn.commit().await?;
        info!(%training_id, %employee_id, "employee enrolled");
        Ok(model)
    }

    #[instrument(name = "hr.record_training_result", skip(self, result))]
    pub async fn record_training_result(
        &self,
        training_id: Uuid,
        employee_id: Uuid,
        result: TrainingResult,
    ) -> HrResult<employee_training::Model> {
        if let Some(grade) = result.grade {
            if grade < Decimal::ZERO || grade > Decimal::TEN {
                return Err(HrError::validation("grade must be between 0 and 10"));
            }
        }
        let link = employee_training::Entity::find()
            .filter(employee_training::Column::TrainingId.eq(training_id))
            .filter(employee_training::Column::EmployeeId.eq(employee_id))
            .one(&self.db)
            .await?
            .ok_or_else(|| HrError::not_found("enrolment", employee_id))?;

        let mut active = link.into_active_model();
        active.status = Set(result.status);
        active.grade = Set(result.grade);
        active.certificate = Set(result.certificate);
        active.notes = Set(result.notes);
        let updated = active.update(&self.db).await?;
        info!(%training_id, %employee_id, status = ?updated.status, "training result recorded");
        Ok(updated)
    }

    #[instrument(name = "hr.get_training_detail", skip(self))]
    pub async fn get_training_detail(&self, id: Uuid) -> HrResult<TrainingDetail> {
        let training = training::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| HrError::not_found("training", id))?;

        let links = employee_training::Entity::find()
            .filter(employee_training::Column::TrainingId.eq(id))
            .find_also_related(employee::Entity)
            .join(JoinType::InnerJoin, employee::Relation::User.def())
            .order_by_asc(users::Column::FirstName)
            .all(&self.db)
            .await?;

        let (links, employees): (Vec<_>, Vec<_>) = links
            .into_iter()
            .filter_map(|(link, employee)| employee.map(|e| (link, e)))
            .unzip();
        let people = with_users(&self.db, employees).await?;
        let participants = links
            .into_iter()
            .zip(people)
            .map(|(link, employee)| Participant { link, employee })
            .collect();

        Ok(TrainingDetail {
            training,
            participants,
        })
    }

    /// Total sessions and completed sessions, one query.
    #[instrument(name = "hr.training_stats", skip(self))]
    pub async fn training_stats(&self) -> HrResult<TrainingStats> {
        let stats = training::Entity::find()
            .select_only()
            .column_as(
                Expr::col((training::Entity, training::Column::Id)).count(),
                "total",
            )
            .column_as(
                Expr::cust("COUNT(CASE WHEN training.status = 'COMPLETED' THEN 1 END)"),
                "completed",
            )
            .into_model::<TrainingStats>()
            .one(&self.db)
            .await?;
        Ok(stats.unwrap_or_default())
    }

    #[instrument(name = "hr.delete_training", skip(self))]
    pub async fn delete_training(&self, id: Uuid) -> HrResult<DeleteReport> {
        let txn = self.db.begin().await?;
        let report = policy::delete_with_policy(&txn, EntityKind::Training, id).await?;
        txn.commit().await?;
        info!(training_id = %id, cascaded = report.cascaded_rows(), "training deleted");
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use training::Status::*;

    #[test]
    fn sessions_only_move_forward() {
        assert!(can_move(Planned, InProgress));
        assert!(can_move(InProgress, Completed));
        assert!(can_move(Planned, Cancelled));
        assert!(!can_move(Completed, InProgress));
        assert!(!can_move(Cancelled, Planned));
        assert!(!can_move(Planned, Completed));
    }
}
