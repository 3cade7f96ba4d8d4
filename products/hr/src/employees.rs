use chrono::NaiveDate;
use entity::{
    attendance, benefit, department, dependent, document, employee, employee_benefit,
    employee_training, evaluation, position, training, users, vacation,
};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, IntoActiveModel, ModelTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
    sea_query::{Expr, Func, LikeExpr},
};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    error::{HrError, HrResult},
    model::{
        BenefitLink, EmployeeDetail, EmployeeFilter, EmployeeRow, EmployeeStatus, NewDependent,
        Page, PageRequest, PersonalData, ProfessionalData, TrainingLink,
    },
    policy::{self, DeleteReport, EntityKind},
    store::{HrStore, referenced_employee, require_text},
};

const DEFAULT_WORK_HOURS: i32 = 40;
const RECENT_LIMIT: u64 = 10;
const RECENT_EVALUATIONS: u64 = 5;

impl HrStore {
    /// Hire: creates the identity row and the employee row together.
    #[instrument(name = "hr.create_employee", skip_all, fields(code = %professional.employee_code))]
    pub async fn create_employee(
        &self,
        personal: PersonalData,
        professional: ProfessionalData,
    ) -> HrResult<EmployeeRow> {
        let first_name = require_text(&personal.first_name, "first name")?;
        let last_name = personal.last_name.trim().to_string();
        let email = require_text(&personal.email, "email")?.to_lowercase();
        if !email.contains('@') {
            return Err(HrError::validation(format!("{email} is not an email address")));
        }
        let national_id = require_text(&personal.national_id, "national id")?;
        let employee_code = require_text(&professional.employee_code, "employee code")?;
        if professional.current_salary < Decimal::ZERO {
            return Err(HrError::validation("current salary must not be negative"));
        }
        let work_hours = professional.work_hours.unwrap_or(DEFAULT_WORK_HOURS);
        if !(1..=168).contains(&work_hours) {
            return Err(HrError::validation("work hours must be between 1 and 168"));
        }

        let txn = self.db.begin().await?;

        if position::Entity::find_by_id(professional.position_id)
            .one(&txn)
            .await?
            .is_none()
        {
            return Err(HrError::missing_reference("position", professional.position_id));
        }
        if department::Entity::find_by_id(professional.department_id)
            .one(&txn)
            .await?
            .is_none()
        {
            return Err(HrError::missing_reference(
                "department",
                professional.department_id,
            ));
        }

        let clash = employee::Entity::find()
            .filter(
                Condition::any()
                    .add(employee::Column::NationalId.eq(national_id.as_str()))
                    .add(employee::Column::EmployeeCode.eq(employee_code.as_str())),
            )
            .one(&txn)
            .await?;
        if let Some(existing) = clash {
            let field = if existing.national_id == national_id {
                format!("national id {national_id}")
            } else {
                format!("employee code {employee_code}")
            };
            return Err(HrError::DuplicateKey(field));
        }
        if users::Entity::find()
            .filter(users::Column::Email.eq(email.as_str()))
            .one(&txn)
            .await?
            .is_some()
        {
            return Err(HrError::DuplicateKey(format!("email {email}")));
        }

        let now = self.now();
        let user = users::ActiveModel {
            id: Set(Uuid::new_v4()),
            email: Set(email),
            first_name: Set(first_name),
            last_name: Set(last_name),
            created_at: Set(now),
        }
        .insert(&txn)
        .await?;

        let employee = employee::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user.id),
            national_id: Set(national_id),
            id_document: Set(personal.id_document),
            birth_date: Set(personal.birth_date),
            gender: Set(personal.gender),
            marital_status: Set(personal.marital_status),
            phone: Set(personal.phone),
            mobile: Set(personal.mobile),
            address: Set(personal.address),
            city: Set(personal.city),
            state: Set(personal.state),
            zip_code: Set(personal.zip_code),
            employee_code: Set(employee_code),
            position_id: Set(professional.position_id),
            department_id: Set(professional.department_id),
            hire_date: Set(professional.hire_date),
            termination_date: Set(None),
            current_salary: Set(professional.current_salary),
            work_hours: Set(work_hours),
            contract_type: Set(professional.contract_type),
            bank: Set(professional.bank),
            agency: Set(professional.agency),
            account: Set(professional.account),
            pix_key: Set(professional.pix_key),
            active: Set(true),
            on_vacation: Set(false),
            on_leave: Set(false),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;
        info!(employee_id = %employee.id, "employee created");
        Ok(EmployeeRow { employee, user })
    }

    /// Filtered, paginated listing ordered by first name then employee code.
    #[instrument(
        name = "hr.list_employees",
        skip_all,
        fields(search = ?filter.search, department = ?filter.department_id, status = ?filter.status)
    )]
    pub async fn list_employees(
        &self,
        filter: EmployeeFilter,
        page: PageRequest,
    ) -> HrResult<Page<EmployeeRow>> {
        let mut query = employee::Entity::find().find_also_related(users::Entity);

        if !filter.include_inactive {
            query = query.filter(employee::Column::Active.eq(true));
        }
        if let Some(term) = filter.search.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
            query = query.filter(search_condition(term));
        }
        if let Some(department_id) = filter.department_id {
            query = query.filter(employee::Column::DepartmentId.eq(department_id));
        }
        match filter.status {
            Some(EmployeeStatus::Active) => {
                query = query
                    .filter(employee::Column::OnVacation.eq(false))
                    .filter(employee::Column::OnLeave.eq(false));
            }
            Some(EmployeeStatus::OnVacation) => {
                query = query.filter(employee::Column::OnVacation.eq(true));
            }
            Some(EmployeeStatus::OnLeave) => {
                query = query.filter(employee::Column::OnLeave.eq(true));
            }
            None => {}
        }

        let paginator = query
            .order_by_asc(users::Column::FirstName)
            .order_by_asc(employee::Column::EmployeeCode)
            .paginate(&self.db, page.page_size());
        let total = paginator.num_items().await?;
        let rows = paginator.fetch_page(page.index()).await?;

        let items = rows
            .into_iter()
            .map(|(employee, user)| {
                let user = user.ok_or_else(|| HrError::not_found("user", employee.user_id))?;
                Ok(EmployeeRow { employee, user })
            })
            .collect::<HrResult<Vec<_>>>()?;

        Ok(Page {
            items,
            total,
            page: page.page(),
            page_size: page.page_size(),
        })
    }

    #[instrument(name = "hr.get_employee_detail", skip(self))]
    pub async fn get_employee_detail(&self, id: Uuid) -> HrResult<EmployeeDetail> {
        let (employee, user) = employee::Entity::find_by_id(id)
            .find_also_related(users::Entity)
            .one(&self.db)
            .await?
            .ok_or_else(|| HrError::not_found("employee", id))?;
        let user = user.ok_or_else(|| HrError::not_found("user", employee.user_id))?;

        let position = employee.find_related(position::Entity).one(&self.db).await?;
        let department = employee.find_related(department::Entity).one(&self.db).await?;

        let dependents = employee
            .find_related(dependent::Entity)
            .filter(dependent::Column::Active.eq(true))
            .order_by_asc(dependent::Column::Name)
            .all(&self.db)
            .await?;

        let vacations = employee
            .find_related(vacation::Entity)
            .order_by_desc(vacation::Column::RequestDate)
            .limit(RECENT_LIMIT)
            .all(&self.db)
            .await?;

        let attendance = employee
            .find_related(attendance::Entity)
            .order_by_desc(attendance::Column::Date)
            .limit(RECENT_LIMIT)
            .all(&self.db)
            .await?;

        let benefits = employee_benefit::Entity::find()
            .filter(employee_benefit::Column::EmployeeId.eq(id))
            .filter(employee_benefit::Column::Active.eq(true))
            .find_also_related(benefit::Entity)
            .order_by_asc(benefit::Column::Name)
            .all(&self.db)
            .await?
            .into_iter()
            .filter_map(|(link, benefit)| benefit.map(|benefit| BenefitLink { link, benefit }))
            .collect();

        let trainings = employee_training::Entity::find()
            .filter(employee_training::Column::EmployeeId.eq(id))
            .find_also_related(training::Entity)
            .order_by_desc(training::Column::StartDate)
            .limit(RECENT_LIMIT)
            .all(&self.db)
            .await?
            .into_iter()
            .filter_map(|(link, training)| training.map(|training| TrainingLink { link, training }))
            .collect();

        let evaluations = employee
            .find_related(evaluation::Entity)
            .order_by_desc(evaluation::Column::EvaluationDate)
            .limit(RECENT_EVALUATIONS)
            .all(&self.db)
            .await?;

        let documents = employee
            .find_related(document::Entity)
            .order_by_desc(document::Column::UploadDate)
            .limit(RECENT_LIMIT)
            .all(&self.db)
            .await?;

        Ok(EmployeeDetail {
            employee,
            user,
            position,
            department,
            dependents,
            vacations,
            attendance,
            benefits,
            trainings,
            evaluations,
            documents,
        })
    }

    #[instrument(name = "hr.set_employee_leave", skip(self))]
    pub async fn set_employee_leave(&self, id: Uuid, on_leave: bool) -> HrResult<employee::Model> {
        let current = employee::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| HrError::not_found("employee", id))?;
        if !current.active {
            return Err(HrError::InvalidTransition(format!(
                "employee {id} is no longer active"
            )));
        }
        let mut active = current.into_active_model();
        active.on_leave = Set(on_leave);
        active.updated_at = Set(self.now());
        let updated = active.update(&self.db).await?;
        info!(employee_id = %id, on_leave, "leave flag changed");
        Ok(updated)
    }

    /// Logical retirement: the row stays, flagged inactive with a termination date.
    #[instrument(name = "hr.terminate_employee", skip(self))]
    pub async fn terminate_employee(
        &self,
        id: Uuid,
        termination_date: NaiveDate,
    ) -> HrResult<employee::Model> {
        let current = employee::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| HrError::not_found("employee", id))?;
        if !current.active || current.termination_date.is_some() {
            tracing::warn!(employee_id = %id, "termination of retired employee rejected");
            return Err(HrError::InvalidTransition(format!(
                "employee {id} is already terminated"
            )));
        }
        if termination_date < current.hire_date {
            return Err(HrError::validation(format!(
                "termination date {termination_date} precedes hire date {}",
                current.hire_date
            )));
        }
        let mut active = current.into_active_model();
        active.active = Set(false);
        active.termination_date = Set(Some(termination_date));
        active.on_vacation = Set(false);
        active.on_leave = Set(false);
        active.updated_at = Set(self.now());
        let updated = active.update(&self.db).await?;
        info!(employee_id = %id, %termination_date, "employee terminated");
        Ok(updated)
    }

    /// Physical delete, cascading to everything the employee owns.
    #[instrument(name = "hr.delete_employee", skip(self))]
    pub async fn delete_employee(&self, id: Uuid) -> HrResult<DeleteReport> {
        let txn = self.db.begin().await?;
        let report = policy::delete_with_policy(&txn, EntityKind::Employee, id).await?;
        txn.commit().await?;
        info!(employee_id = %id, cascaded = report.cascaded_rows(), "employee deleted");
        Ok(report)
    }

    #[instrument(name = "hr.add_dependent", skip(self, input))]
    pub async fn add_dependent(
        &self,
        employee_id: Uuid,
        input: NewDependent,
    ) -> HrResult<dependent::Model> {
        let name = require_text(&input.name, "dependent name")?;
        if input.birth_date > self.clock.today() {
            return Err(HrError::validation("birth date is in the future"));
        }
        referenced_employee(&self.db, employee_id).await?;
        let model = dependent::ActiveModel {
            id: Set(Uuid::new_v4()),
            employee_id: Set(employee_id),
            name: Set(name),
            national_id: Set(input.national_id),
            birth_date: Set(input.birth_date),
            relationship: Set(input.relationship),
            active: Set(true),
        }
        .insert(&self.db)
        .await?;
        info!(%employee_id, dependent_id = %model.id, "dependent added");
        Ok(model)
    }
}

/// Case-insensitive substring match over name, email, code and national id.
/// `%` and `_` in the term match themselves.
fn search_condition(term: &str) -> Condition {
    let pattern = format!("%{}%", escape_like(&term.to_lowercase()));
    let contains = |col: Expr| {
        Expr::expr(Func::lower(col)).like(LikeExpr::new(pattern.as_str()).escape('\\'))
    };
    Condition::any()
        .add(contains(Expr::col((users::Entity, users::Column::FirstName))))
        .add(contains(Expr::col((users::Entity, users::Column::LastName))))
        .add(contains(Expr::col((users::Entity, users::Column::Email))))
        .add(contains(Expr::col((employee::Entity, employee::Column::EmployeeCode))))
        .add(contains(Expr::col((employee::Entity, employee::Column::NationalId))))
}

fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for ch in term.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::escape_like;

    #[test]
    fn like_wildcards_are_escaped() {
        assert_eq!(escape_like("a_i"), "a\\_i");
        assert_eq!(escape_like("100%"), "100\\%");
        assert_eq!(escape_like(r"c:\tmp"), r"c:\\tmp");
        assert_eq!(escape_like("plain"), "plain");
    }
}
