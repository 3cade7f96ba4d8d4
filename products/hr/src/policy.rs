//! Deletion policy: one row per (parent, child) edge, consulted by every
//! delete operation in the store.

use entity::{
    attendance, benefit, department, dependent, document, employee, employee_benefit,
    employee_training, evaluation, position, training, vacation,
};
use sea_orm::{
    ColumnTrait, ConnectionTrait, DbErr, EntityTrait, PaginatorTrait, QueryFilter,
    sea_query::Expr,
};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::{HrError, HrResult};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Department,
    Position,
    Employee,
    Dependent,
    Vacation,
    Attendance,
    Benefit,
    EmployeeBenefit,
    Training,
    EmployeeTraining,
    Evaluation,
    Document,
}

impl EntityKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EntityKind::Department => "department",
            EntityKind::Position => "position",
            EntityKind::Employee => "employee",
            EntityKind::Dependent => "dependent",
            EntityKind::Vacation => "vacation",
            EntityKind::Attendance => "attendance",
            EntityKind::Benefit => "benefit",
            EntityKind::EmployeeBenefit => "employee_benefit",
            EntityKind::Training => "training",
            EntityKind::EmployeeTraining => "employee_training",
            EntityKind::Evaluation => "evaluation",
            EntityKind::Document => "document",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OnDelete {
    /// Child rows are removed with the parent.
    Cascade,
    /// The parent cannot go while child rows exist.
    Block,
    /// The child's reference is cleared.
    SetNull,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DeleteRule {
    pub parent: EntityKind,
    pub child: EntityKind,
    pub on_delete: OnDelete,
}

const fn rule(parent: EntityKind, child: EntityKind, on_delete: OnDelete) -> DeleteRule {
    DeleteRule {
        parent,
        child,
        on_delete,
    }
}

pub const DELETION_POLICY: &[DeleteRule] = &[
    rule(EntityKind::Department, EntityKind::Position, OnDelete::Block),
    rule(EntityKind::Department, EntityKind::Employee, OnDelete::Block),
    rule(EntityKind::Position, EntityKind::Employee, OnDelete::Block),
    rule(EntityKind::Employee, EntityKind::Department, OnDelete::SetNull),
    rule(EntityKind::Employee, EntityKind::Dependent, OnDelete::Cascade),
    rule(EntityKind::Employee, EntityKind::Vacation, OnDelete::Cascade),
    rule(EntityKind::Employee, EntityKind::Attendance, OnDelete::Cascade),
    rule(EntityKind::Employee, EntityKind::EmployeeBenefit, OnDelete::Cascade),
    rule(EntityKind::Employee, EntityKind::EmployeeTraining, OnDelete::Cascade),
    rule(EntityKind::Employee, EntityKind::Evaluation, OnDelete::Cascade),
    rule(EntityKind::Employee, EntityKind::Document, OnDelete::Cascade),
    rule(EntityKind::Benefit, EntityKind::EmployeeBenefit, OnDelete::Cascade),
    rule(EntityKind::Training, EntityKind::EmployeeTraining, OnDelete::Cascade),
];

pub fn rules_for(parent: EntityKind) -> impl Iterator<Item = &'static DeleteRule> {
    DELETION_POLICY.iter().filter(move |r| r.parent == parent)
}

/// What a successful policy-driven delete touched.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DeleteReport {
    pub cascaded: Vec<(EntityKind, u64)>,
    pub nulled: Vec<(EntityKind, u64)>,
}

impl DeleteReport {
    pub fn cascaded_rows(&self) -> u64 {
        self.cascaded.iter().map(|(_, n)| n).sum()
    }
}

/// Apply the policy for `parent`/`id` on `conn`, then remove the parent row.
///
/// Callers pass an open transaction; nothing here commits.
pub(crate) async fn delete_with_policy<C: ConnectionTrait>(
    conn: &C,
    parent: EntityKind,
    id: Uuid,
) -> HrResult<DeleteReport> {
    if !parent_exists(conn, parent, id).await? {
        return Err(HrError::not_found(parent.as_str(), id));
    }

    for rule in rules_for(parent).filter(|r| r.on_delete == OnDelete::Block) {
        let live = count_children(conn, rule, id).await?;
        if live > 0 {
            warn!(
                parent = parent.as_str(),
                child = rule.child.as_str(),
                %id,
                live,
                "delete blocked"
            );
            return Err(HrError::DeleteBlocked(format!(
                "{} {id} is still referenced by {live} {} row(s)",
                parent.as_str(),
                rule.child.as_str()
            )));
        }
    }

    let mut report = DeleteReport::default();
    for rule in rules_for(parent) {
        match rule.on_delete {
            OnDelete::Block => {}
            OnDelete::SetNull => {
                let rows = clear_reference(conn, rule, id).await?;
                report.nulled.push((rule.child, rows));
            }
            OnDelete::Cascade => {
                let rows = delete_children(conn, rule, id).await?;
                report.cascaded.push((rule.child, rows));
            }
        }
    }

    remove_parent(conn, parent, id).await?;
    debug!(parent = parent.as_str(), %id, cascaded = report.cascaded_rows(), "deleted");
    Ok(report)
}

async fn parent_exists<C: ConnectionTrait>(
    conn: &C,
    parent: EntityKind,
    id: Uuid,
) -> Result<bool, DbErr> {
    let found = match parent {
        EntityKind::Department => department::Entity::find_by_id(id).count(conn).await?,
        EntityKind::Position => position::Entity::find_by_id(id).count(conn).await?,
        EntityKind::Employee => employee::Entity::find_by_id(id).count(conn).await?,
        EntityKind::Benefit => benefit::Entity::find_by_id(id).count(conn).await?,
        EntityKind::Training => training::Entity::find_by_id(id).count(conn).await?,
        other => return Err(unsupported(other)),
    };
    Ok(found > 0)
}

async fn count_children<C: ConnectionTrait>(
    conn: &C,
    rule: &DeleteRule,
    id: Uuid,
) -> Result<u64, DbErr> {
    match (rule.parent, rule.child) {
        (EntityKind::Department, EntityKind::Position) => {
            position::Entity::find()
                .filter(position::Column::DepartmentId.eq(id))
                .count(conn)
                .await
        }
        (EntityKind::Department, EntityKind::Employee) => {
            employee::Entity::find()
                .filter(employee::Column::DepartmentId.eq(id))
                .count(conn)
                .await
        }
        (EntityKind::Position, EntityKind::Employee) => {
            employee::Entity::find()
                .filter(employee::Column::PositionId.eq(id))
                .count(conn)
                .await
        }
        _ => Err(unsupported_edge(rule)),
    }
}

async fn clear_reference<C: ConnectionTrait>(
    conn: &C,
    rule: &DeleteRule,
    id: Uuid,
) -> Result<u64, DbErr> {
    match (rule.parent, rule.child) {
        (EntityKind::Employee, EntityKind::Department) => {
            let res = department::Entity::update_many()
                .col_expr(department::Column::ManagerId, Expr::value(Option::<Uuid>::None))
                .filter(department::Column::ManagerId.eq(id))
                .exec(conn)
                .await?;
            Ok(res.rows_affected)
        }
        _ => Err(unsupported_edge(rule)),
    }
}

async fn delete_children<C: ConnectionTrait>(
    conn: &C,
    rule: &DeleteRule,
    id: Uuid,
) -> Result<u64, DbErr> {
    let res = match (rule.parent, rule.child) {
        (EntityKind::Employee, EntityKind::Dependent) => {
            dependent::Entity::delete_many()
                .filter(dependent::Column::EmployeeId.eq(id))
                .exec(conn)
                .await?
        }
        (EntityKind::Employee, EntityKind::Vacation) => {
            vacation::Entity::delete_many()
                .filter(vacation::Column::EmployeeId.eq(id))
                .exec(conn)
                .await?
        }
        (EntityKind::Employee, EntityKind::Attendance) => {
            attendance::Entity::delete_many()
                .filter(attendance::Column::EmployeeId.eq(id))
                .exec(conn)
                .await?
        }
        (EntityKind::Employee, EntityKind::EmployeeBenefit) => {
            employee_benefit::Entity::delete_many()
                .filter(employee_benefit::Column::EmployeeId.eq(id))
                .exec(conn)
                .await?
        }
        (EntityKind::Employee, EntityKind::EmployeeTraining) => {
            employee_training::Entity::delete_many()
                .filter(employee_training::Column::EmployeeId.eq(id))
                .exec(conn)
                .await?
        }
        (EntityKind::Employee, EntityKind::Evaluation) => {
            evaluation::Entity::delete_many()
                .filter(evaluation::Column::EmployeeId.eq(id))
                .exec(conn)
                .await?
        }
        (EntityKind::Employee, EntityKind::Document) => {
            document::Entity::delete_many()
                .filter(document::Column::EmployeeId.eq(id))
                .exec(conn)
                .await?
        }
        (EntityKind::Benefit, EntityKind::EmployeeBenefit) => {
            employee_benefit::Entity::delete_many()
                .filter(employee_benefit::Column::BenefitId.eq(id))
                .exec(conn)
                .await?
        }
        (EntityKind::Training, EntityKind::EmployeeTraining) => {
            employee_training::Entity::delete_many()
                .filter(employee_training::Column::TrainingId.eq(id))
                .exec(conn)
                .await?
        }
        _ => return Err(unsupported_edge(rule)),
    };
    Ok(res.rows_affected)
}

async fn remove_parent<C: ConnectionTrait>(
    conn: &C,
    parent: EntityKind,
    id: Uuid,
) -> Result<(), DbErr> {
    match parent {
        EntityKind::Department => department::Entity::delete_by_id(id).exec(conn).await?,
        EntityKind::Position => position::Entity::delete_by_id(id).exec(conn).await?,
        EntityKind::Employee => employee::Entity::delete_by_id(id).exec(conn).await?,
        EntityKind::Benefit => benefit::Entity::delete_by_id(id).exec(conn).await?,
        EntityKind::Training => training::Entity::delete_by_id(id).exec(conn).await?,
        other => return Err(unsupported(other)),
    };
    Ok(())
}

fn unsupported(kind: EntityKind) -> DbErr {
    DbErr::Custom(format!("no delete policy for {}", kind.as_str()))
}

fn unsupported_edge(rule: &DeleteRule) -> DbErr {
    DbErr::Custom(format!(
        "no handler for {} -> {} ({:?})",
        rule.parent.as_str(),
        rule.child.as_str(),
        rule.on_delete
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cascaded_children_are_leaves() {
        for rule in DELETION_POLICY
            .iter()
            .filter(|r| r.on_delete == OnDelete::Cascade)
        {
            assert_eq!(
                rules_for(rule.child).count(),
                0,
                "{:?} cascades into {:?}, which has its own rules",
                rule.parent,
                rule.child
            );
        }
    }

    #[test]
    fn department_and_position_deletes_block() {
        let blocked: Vec<_> = DELETION_POLICY
            .iter()
            .filter(|r| r.on_delete == OnDelete::Block)
            .map(|r| (r.parent, r.child))
            .collect();
        assert_eq!(
            blocked,
            vec![
                (EntityKind::Department, EntityKind::Position),
                (EntityKind::Department, EntityKind::Employee),
                (EntityKind::Position, EntityKind::Employee),
            ]
        );
    }

    #[test]
    fn employee_delete_covers_every_owned_table() {
        let children: Vec<_> = rules_for(EntityKind::Employee)
            .filter(|r| r.on_delete == OnDelete::Cascade)
            .map(|r| r.child)
            .collect();
        for kind in [
            EntityKind::Dependent,
            EntityKind::Vacation,
            EntityKind::Attendance,
            EntityKind::EmployeeBenefit,
            EntityKind::EmployeeTraining,
            EntityKind::Evaluation,
            EntityKind::Document,
        ] {
            assert!(children.contains(&kind), "{kind:?} missing");
        }
    }
}
