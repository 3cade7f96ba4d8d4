use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "document")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(indexed)]
    pub employee_id: Uuid,
    pub document_type: DocumentType,
    pub name: String,
    /// Path or key understood by the file-storage service; bytes never land here.
    pub file_ref: String,
    pub description: Option<String>,
    pub upload_date: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::employee::Entity",
        from = "Column::EmployeeId",
        to = "super::employee::Column::Id",
        on_delete = "Cascade"
    )]
    Employee,
}

impl Related<super::employee::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Employee.def()
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveActiveEnum, Eq, PartialEq)]
#[sea_orm(rs_type = "String", db_type = "String(Some(20))")]
pub enum DocumentType {
    #[sea_orm(string_value = "CONTRACT")]
    Contract,
    #[sea_orm(string_value = "ADDENDUM")]
    Addendum,
    #[sea_orm(string_value = "TERMINATION")]
    Termination,
    #[sea_orm(string_value = "VACATION")]
    Vacation,
    #[sea_orm(string_value = "MEDICAL_LEAVE")]
    MedicalLeave,
    #[sea_orm(string_value = "CERTIFICATE")]
    Certificate,
    #[sea_orm(string_value = "OTHER")]
    Other,
}

impl ActiveModelBehavior for ActiveModel {}
