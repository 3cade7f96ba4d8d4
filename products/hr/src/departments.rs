use entity::{department, employee, position, users};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, IntoActiveModel, JoinType,
    ModelTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, RelationTrait, Select, Set,
    TransactionTrait,
    sea_query::Expr,
};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    error::{HrError, HrResult},
    model::{DepartmentCounts, DepartmentDetail, EmployeeRow, NewDepartment, NewPosition},
    policy::{self, DeleteReport, EntityKind},
    store::{HrStore, referenced_employee, require_text, with_users},
};

/// Active departments with total and active headcount, one grouped query.
pub(crate) fn department_counts_query() -> Select<department::Entity> {
    department::Entity::find()
        .select_only()
        .column(department::Column::Id)
        .column(department::Column::Name)
        .column_as(
            Expr::col((employee::Entity, employee::Column::Id)).count(),
            "total_employees",
        )
        .column_as(
            Expr::cust("COUNT(CASE WHEN employee.active THEN 1 END)"),
            "active_employees",
        )
        .join(JoinType::LeftJoin, department::Relation::Employee.def())
        .filter(department::Column::Active.eq(true))
        .group_by(department::Column::Id)
        .group_by(department::Column::Name)
}

impl HrStore {
    #[instrument(name = "hr.create_department", skip_all, fields(name = %input.name))]
    pub async fn create_department(&self, input: NewDepartment) -> HrResult<department::Model> {
        let name = require_text(&input.name, "department name")?;
        if input.budget < Decimal::ZERO {
            return Err(HrError::validation("budget must not be negative"));
        }
        if department::Entity::find()
            .filter(department::Column::Name.eq(name.as_str()))
            .one(&self.db)
            .await?
            .is_some()
        {
            return Err(HrError::DuplicateKey(format!("department name {name}")));
        }
        if let Some(manager_id) = input.manager_id {
            referenced_employee(&self.db, manager_id).await?;
        }

        let model = department::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name),
            description: Set(input.description),
            budget: Set(input.budget),
            manager_id: Set(input.manager_id),
            active: Set(true),
            created_at: Set(self.now()),
        }
        .insert(&self.db)
        .await?;
        info!(department_id = %model.id, "department created");
        Ok(model)
    }

    /// Point the department at a manager, or clear it with `None`.
    #[instrument(name = "hr.set_department_manager", skip(self))]
    pub async fn set_department_manager(
        &self,
        department_id: Uuid,
        manager_id: Option<Uuid>,
    ) -> HrResult<department::Model> {
        let current = department::Entity::find_by_id(department_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| HrError::not_found("department", department_id))?;
        if let Some(manager_id) = manager_id {
            let manager = referenced_employee(&self.db, manager_id).await?;
            if !manager.active {
                return Err(HrError::validation(format!(
                    "employee {manager_id} is not active"
                )));
            }
        }
        let mut active = current.into_active_model();
        active.manager_id = Set(manager_id);
        let updated = active.update(&self.db).await?;
        info!(%department_id, manager = ?manager_id, "department manager changed");
        Ok(updated)
    }

    #[instrument(name = "hr.list_departments_with_counts", skip(self))]
    pub async fn list_departments_with_counts(&self) -> HrResult<Vec<DepartmentCounts>> {
        let rows = department_counts_query()
            .order_by_asc(department::Column::Name)
            .into_model::<DepartmentCounts>()
            .all(&self.db)
            .await?;
        Ok(rows)
    }

    #[instrument(name = "hr.get_department_detail", skip(self))]
    pub async fn get_department_detail(&self, id: Uuid) -> HrResult<DepartmentDetail> {
        let department = department::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| HrError::not_found("department", id))?;

        let members = department
            .find_related(employee::Entity)
            .filter(employee::Column::Active.eq(true))
            .join(JoinType::InnerJoin, employee::Relation::User.def())
            .order_by_asc(users::Column::FirstName)
            .order_by_asc(employee::Column::EmployeeCode)
            .all(&self.db)
            .await?;
        let on_vacation = members.iter().filter(|e| e.on_vacation).count() as u64;
        let on_leave = members.iter().filter(|e| e.on_leave).count() as u64;
        let employees = with_users(&self.db, members).await?;

        let positions = department
            .find_related(position::Entity)
            .filter(position::Column::Active.eq(true))
            .order_by_desc(position::Column::HierarchyLevel)
            .order_by_asc(position::Column::Name)
            .all(&self.db)
            .await?;

        let manager = match department.manager_id {
            Some(manager_id) => load_manager(&self.db, manager_id).await?,
            None => None,
        };

        Ok(DepartmentDetail {
            total_employees: employees.len() as u64,
            on_vacation,
            on_leave,
            manager,
            employees,
            positions,
            department,
        })
    }

    /// Blocked while positions or employees still point at the department.
    #[instrument(name = "hr.delete_department", skip(self))]
    pub async fn delete_department(&self, id: Uuid) -> HrResult<DeleteReport> {
        let txn = self.db.begin().await?;
        let report = policy::delete_with_policy(&txn, EntityKind::Department, id).await?;
        txn.commit().await?;
        info!(department_id = %id, "department deleted");
        Ok(report)
    }

    #[instrument(name = "hr.create_position", skip_all, fields(name = %input.name))]
    pub async fn create_position(&self, input: NewPosition) -> HrResult<position::Model> {
        let name = require_text(&input.name, "position name")?;
        if !(1..=10).contains(&input.hierarchy_level) {
            return Err(HrError::validation("hierarchy level must be between 1 and 10"));
        }
        if input.base_salary < Decimal::ZERO {
            return Err(HrError::validation("base salary must not be negative"));
        }
        if department::Entity::find_by_id(input.department_id)
            .one(&self.db)
            .await?
            .is_none()
        {
            return Err(HrError::missing_reference("department", input.department_id));
        }

        let model = position::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name),
            department_id: Set(input.department_id),
            description: Set(input.description),
            base_salary: Set(input.base_salary),
            contract_type: Set(input.contract_type),
            hierarchy_level: Set(input.hierarchy_level),
            requirements: Set(input.requirements),
            active: Set(true),
            created_at: Set(self.now()),
        }
        .insert(&self.db)
        .await?;
        info!(position_id = %model.id, department_id = %model.department_id, "position created");
        Ok(model)
    }

    /// Active positions, optionally within one department.
    #[instrument(name = "hr.list_positions", skip(self))]
    pub async fn list_positions(
        &self,
        department_id: Option<Uuid>,
    ) -> HrResult<Vec<position::Model>> {
        let mut query = position::Entity::find().filter(position::Column::Active.eq(true));
        if let Some(department_id) = department_id {
            query = query.filter(position::Column::DepartmentId.eq(department_id));
        }
        Ok(query
            .order_by_asc(position::Column::Name)
            .all(&self.db)
            .await?)
    }

    #[instrument(name = "hr.delete_position", skip(self))]
    pub async fn delete_position(&self, id: Uuid) -> HrResult<DeleteReport> {
        let txn = self.db.begin().await?;
        let report = policy::delete_with_policy(&txn, EntityKind::Position, id).await?;
        txn.commit().await?;
        info!(position_id = %id, "position deleted");
        Ok(report)
    }

    pub async fn count_active_employees(&self) -> HrResult<u64> {
        Ok(employee::Entity::find()
            .filter(employee::Column::Active.eq(true))
            .count(&self.db)
            .await?)
    }
}

async fn load_manager<C: ConnectionTrait>(conn: &C, id: Uuid) -> HrResult<Option<EmployeeRow>> {
    let Some(manager) = employee::Entity::find_by_id(id).one(conn).await? else {
        return Ok(None);
    };
    Ok(with_users(conn, vec![manager]).await?.pop())
}
