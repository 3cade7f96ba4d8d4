use std::{collections::HashMap, sync::Arc};

use entity::{employee, users};
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    prelude::DateTimeWithTimeZone,
};
use uuid::Uuid;

use crate::{
    clock::{Clock, SystemClock},
    error::{HrError, HrResult},
    model::EmployeeRow,
};

/// Handle to the HR schema. Cheap to clone; share one per process.
#[derive(Clone, Debug)]
pub struct HrStore {
    pub(crate) db: DatabaseConnection,
    pub(crate) clock: Arc<dyn Clock>,
}

impl HrStore {
    pub fn new(db: DatabaseConnection, clock: Arc<dyn Clock>) -> Self {
        Self { db, clock }
    }

    /// Store backed by the wall clock.
    pub fn with_system_clock(db: DatabaseConnection) -> Self {
        Self::new(db, Arc::new(SystemClock))
    }

    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }

    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    pub(crate) fn now(&self) -> DateTimeWithTimeZone {
        self.clock.now().into()
    }
}

/// Load an employee that the caller refers to from another record.
pub(crate) async fn referenced_employee<C: ConnectionTrait>(
    conn: &C,
    id: Uuid,
) -> HrResult<employee::Model> {
    employee::Entity::find_by_id(id)
        .one(conn)
        .await?
        .ok_or_else(|| HrError::missing_reference("employee", id))
}

/// Pair employees with their identity rows, keeping the input order.
pub(crate) async fn with_users<C: ConnectionTrait>(
    conn: &C,
    employees: Vec<employee::Model>,
) -> HrResult<Vec<EmployeeRow>> {
    if employees.is_empty() {
        return Ok(Vec::new());
    }
    let ids: Vec<Uuid> = employees.iter().map(|e| e.user_id).collect();
    let by_id: HashMap<Uuid, users::Model> = users::Entity::find()
        .filter(users::Column::Id.is_in(ids))
        .all(conn)
        .await?
        .into_iter()
        .map(|u| (u.id, u))
        .collect();

    employees
        .into_iter()
        .map(|employee| {
            let user = by_id
                .get(&employee.user_id)
                .cloned()
                .ok_or_else(|| HrError::not_found("user", employee.user_id))?;
            Ok(EmployeeRow { employee, user })
        })
        .collect()
}

/// Display names keyed by employee id.
pub(crate) async fn employee_names<C: ConnectionTrait>(
    conn: &C,
    employee_ids: impl IntoIterator<Item = Uuid>,
) -> HrResult<HashMap<Uuid, String>> {
    let mut ids: Vec<Uuid> = employee_ids.into_iter().collect();
    ids.sort_unstable();
    ids.dedup();
    if ids.is_empty() {
        return Ok(HashMap::new());
    }
    let rows = employee::Entity::find()
        .filter(employee::Column::Id.is_in(ids))
        .find_also_related(users::Entity)
        .all(conn)
        .await?;
    Ok(rows
        .into_iter()
        .map(|(e, u)| {
            let name = u.map(|u| u.full_name()).unwrap_or_else(|| e.employee_code.clone());
            (e.id, name)
        })
        .collect())
}

pub(crate) fn require_text(value: &str, field: &str) -> HrResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(HrError::validation(format!("{field} must not be empty")));
    }
    Ok(trimmed.to_string())
}
