use sea_orm::entity::prelude::*;

pub use super::position::ContractType;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "employee")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub user_id: Uuid,
    #[sea_orm(unique)]
    pub national_id: String,
    pub id_document: Option<String>,
    pub birth_date: Date,
    pub gender: Gender,
    pub marital_status: Option<MaritalStatus>,
    pub phone: Option<String>,
    pub mobile: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    #[sea_orm(unique)]
    pub employee_code: String,
    #[sea_orm(indexed)]
    pub position_id: Uuid,
    #[sea_orm(indexed)]
    pub department_id: Uuid,
    pub hire_date: Date,
    pub termination_date: Option<Date>,
    pub current_salary: Decimal,
    pub work_hours: i32,
    pub contract_type: ContractType,
    pub bank: Option<String>,
    pub agency: Option<String>,
    pub account: Option<String>,
    pub pix_key: Option<String>,
    pub active: bool,
    pub on_vacation: bool,
    pub on_leave: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id",
        on_delete = "Cascade"
    )]
    User,
    #[sea_orm(
        belongs_to = "super::position::Entity",
        from = "Column::PositionId",
        to = "super::position::Column::Id",
        on_delete = "Restrict"
    )]
    Position,
    #[sea_orm(
        belongs_to = "super::department::Entity",
        from = "Column::DepartmentId",
        to = "super::department::Column::Id",
        on_delete = "Restrict"
    )]
    Department,
    #[sea_orm(has_many = "super::dependent::Entity")]
    Dependent,
    #[sea_orm(has_many = "super::vacation::Entity")]
    Vacation,
    #[sea_orm(has_many = "super::attendance::Entity")]
    Attendance,
    #[sea_orm(has_many = "super::employee_benefit::Entity")]
    EmployeeBenefit,
    #[sea_orm(has_many = "super::employee_training::Entity")]
    EmployeeTraining,
    #[sea_orm(has_many = "super::evaluation::Entity")]
    Evaluation,
    #[sea_orm(has_many = "super::document::Entity")]
    Document,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::position::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Position.def()
    }
}

impl Related<super::department::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Department.def()
    }
}

impl Related<super::dependent::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Dependent.def()
    }
}

impl Related<super::vacation::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Vacation.def()
    }
}

impl Related<super::attendance::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Attendance.def()
    }
}

impl Related<super::employee_benefit::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::EmployeeBenefit.def()
    }
}

impl Related<super::employee_training::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::EmployeeTraining.def()
    }
}

impl Related<super::evaluation::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Evaluation.def()
    }
}

impl Related<super::document::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Document.def()
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveActiveEnum, Eq, PartialEq)]
#[sea_orm(rs_type = "String", db_type = "String(Some(1))")]
pub enum Gender {
    #[sea_orm(string_value = "M")]
    Male,
    #[sea_orm(string_value = "F")]
    Female,
    #[sea_orm(string_value = "O")]
    Other,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveActiveEnum, Eq, PartialEq)]
#[sea_orm(rs_type = "String", db_type = "String(Some(20))")]
pub enum MaritalStatus {
    #[sea_orm(string_value = "SINGLE")]
    Single,
    #[sea_orm(string_value = "MARRIED")]
    Married,
    #[sea_orm(string_value = "DIVORCED")]
    Divorced,
    #[sea_orm(string_value = "WIDOWED")]
    Widowed,
    #[sea_orm(string_value = "STABLE_UNION")]
    StableUnion,
}

impl Model {
    /// Time with the company, up to the termination date when there is one.
    pub fn tenure(&self, today: Date) -> chrono::Duration {
        self.termination_date.unwrap_or(today) - self.hire_date
    }
}

impl ActiveModelBehavior for ActiveModel {}
