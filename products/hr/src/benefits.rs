use entity::{benefit, employee_benefit};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    error::{HrError, HrResult},
    model::{BenefitAssignment, NewBenefit},
    policy::{self, DeleteReport, EntityKind},
    store::{HrStore, referenced_employee, require_text},
};

impl HrStore {
    #[instrument(name = "hr.create_benefit", skip_all, fields(name = %input.name))]
    pub async fn create_benefit(&self, input: NewBenefit) -> HrResult<benefit::Model> {
        let name = require_text(&input.name, "benefit name")?;
        if input.value < Decimal::ZERO {
            return Err(HrError::validation("benefit value must not be negative"));
        }
        let model = benefit::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name),
            benefit_type: Set(input.benefit_type),
            value: Set(input.value),
            description: Set(input.description),
            active: Set(true),
        }
        .insert(&self.db)
        .await?;
        info!(benefit_id = %model.id, "benefit created");
        Ok(model)
    }

    #[instrument(name = "hr.list_active_benefits", skip(self))]
    pub async fn list_active_benefits(&self) -> HrResult<Vec<benefit::Model>> {
        Ok(benefit::Entity::find()
            .filter(benefit::Column::Active.eq(true))
            .order_by_asc(benefit::Column::Name)
            .all(&self.db)
            .await?)
    }

    /// Link an employee to a benefit; one link per pair.
    #[instrument(
        name = "hr.assign_benefit",
        skip_all,
        fields(employee_id = %input.employee_id, benefit_id = %input.benefit_id)
    )]
    pub async fn assign_benefit(
        &self,
        input: BenefitAssignment,
    ) -> HrResult<employee_benefit::Model> {
        if let Some(end) = input.end_date {
            if end < input.start_date {
                return Err(HrError::validation("benefit ends before it starts"));
            }
        }
        if input.value.is_some_and(|v| v < Decimal::ZERO) {
            return Err(HrError::validation("benefit value must not be negative"));
        }

        let txn = self.db.begin().await?;
        referenced_employee(&txn, input.employee_id).await?;
        let benefit = benefit::Entity::find_by_id(input.benefit_id)
            .one(&txn)
            .await?
            .ok_or_else(|| HrError::missing_reference("benefit", input.benefit_id))?;
        if !benefit.active {
            return Err(HrError::validation(format!(
                "benefit {} is not active",
                benefit.name
            )));
        }
        let existing = employee_benefit::Entity::find()
            .filter(employee_benefit::Column::EmployeeId.eq(input.employee_id))
            .filter(employee_benefit::Column::BenefitId.eq(input.benefit_id))
            .count(&txn)
            .await?;
        if existing > 0 {
            return Err(HrError::DuplicateKey(format!(
                "benefit {} already assigned to employee {}",
                benefit.name, input.employee_id
            )));
        }

        let model = employee_benefit::ActiveModel {
            id: Set(Uuid::new_v4()),
            employee_id: Set(input.employee_id),
            benefit_id: Set(input.benefit_id),
            value: Set(input.value.unwrap_or(benefit.value)),
            start_date: Set(input.start_date),
            end_date: Set(input.end_date),
            active: Set(true),
        }
        .insert(&txn)
        .await?;
        txn.commit().await?;
        info!(link_id = %model.id, "benefit assigned");
        Ok(model)
    }

    /// Removes the benefit and every assignment of it.
    #[instrument(name = "hr.delete_benefit", skip(self))]
    pub async fn delete_benefit(&self, id: Uuid) -> HrResult<DeleteReport> {
        let txn = self.db.begin().await?;
        let report = policy::delete_with_policy(&txn, EntityKind::Benefit, id).await?;
        txn.commit().await?;
        info!(benefit_id = %id, cascaded = report.cascaded_rows(), "benefit deleted");
        Ok(report)
    }
}
