use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Users::Id).uuid().not_null().primary_key())
                    .col(
                        ColumnDef::new(Users::Email)
                            .string_len(254)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Users::FirstName).string_len(150).not_null())
                    .col(ColumnDef::new(Users::LastName).string_len(150).not_null())
                    .col(
                        ColumnDef::new(Users::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // manager_id stays a plain column: department and employee reference each other.
        manager
            .create_table(
                Table::create()
                    .table(Department::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Department::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Department::Name)
                            .string_len(100)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Department::Description).text())
                    .col(
                        ColumnDef::new(Department::Budget)
                            .decimal_len(15, 2)
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Department::ManagerId).uuid())
                    .col(
                        ColumnDef::new(Department::Active)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Department::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-department-manager_id")
                    .table(Department::Table)
                    .col(Department::ManagerId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Position::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Position::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Position::Name).string_len(100).not_null())
                    .col(ColumnDef::new(Position::DepartmentId).uuid().not_null())
                    .col(ColumnDef::new(Position::Description).text())
                    .col(
                        ColumnDef::new(Position::BaseSalary)
                            .decimal_len(12, 2)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Position::ContractType)
                            .string_len(20)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Position::HierarchyLevel)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .col(ColumnDef::new(Position::Requirements).text())
                    .col(
                        ColumnDef::new(Position::Active)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Position::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-position-department_id")
                            .from(Position::Table, Position::DepartmentId)
                            .to(Department::Table, Department::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Employee::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Employee::Id).uuid().not_null().primary_key())
                    .col(
                        ColumnDef::new(Employee::UserId)
                            .uuid()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Employee::NationalId)
                            .string_len(14)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Employee::IdDocument).string_len(20))
                    .col(ColumnDef::new(Employee::BirthDate).date().not_null())
                    .col(ColumnDef::new(Employee::Gender).string_len(1).not_null())
                    .col(ColumnDef::new(Employee::MaritalStatus).string_len(20))
                    .col(ColumnDef::new(Employee::Phone).string_len(20))
                    .col(ColumnDef::new(Employee::Mobile).string_len(20))
                    .col(ColumnDef::new(Employee::Address).text())
                    .col(ColumnDef::new(Employee::City).string_len(100))
                    .col(ColumnDef::new(Employee::State).string_len(2))
                    .col(ColumnDef::new(Employee::ZipCode).string_len(10))
                    .col(
                        ColumnDef::new(Employee::EmployeeCode)
                            .string_len(20)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Employee::PositionId).uuid().not_null())
                    .col(ColumnDef::new(Employee::DepartmentId).uuid().not_null())
                    .col(ColumnDef::new(Employee::HireDate).date().not_null())
                    .col(ColumnDef::new(Employee::TerminationDate).date())
                    .col(
                        ColumnDef::new(Employee::CurrentSalary)
                            .decimal_len(12, 2)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Employee::WorkHours)
                            .integer()
                            .not_null()
                            .default(40),
                    )
                    .col(
                        ColumnDef::new(Employee::ContractType)
                            .string_len(20)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Employee::Bank).string_len(100))
                    .col(ColumnDef::new(Employee::Agency).string_len(10))
                    .col(ColumnDef::new(Employee::Account).string_len(20))
                    .col(ColumnDef::new(Employee::PixKey).string_len(100))
                    .col(
                        ColumnDef::new(Employee::Active)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Employee::OnVacation)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Employee::OnLeave)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Employee::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Employee::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-employee-user_id")
                            .from(Employee::Table, Employee::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-employee-position_id")
                            .from(Employee::Table, Employee::PositionId)
                            .to(Position::Table, Position::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-employee-department_id")
                            .from(Employee::Table, Employee::DepartmentId)
                            .to(Department::Table, Department::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        for (name, column) in [
            ("idx-employee-position_id", Employee::PositionId),
            ("idx-employee-department_id", Employee::DepartmentId),
        ] {
            manager
                .create_index(
                    Index::create()
                        .name(name)
                        .table(Employee::Table)
                        .col(column)
                        .to_owned(),
                )
                .await?;
        }

        manager
            .create_table(
                Table::create()
                    .table(Dependent::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Dependent::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Dependent::EmployeeId).uuid().not_null())
                    .col(ColumnDef::new(Dependent::Name).string_len(200).not_null())
                    .col(ColumnDef::new(Dependent::NationalId).string_len(14))
                    .col(ColumnDef::new(Dependent::BirthDate).date().not_null())
                    .col(
                        ColumnDef::new(Dependent::Relationship)
                            .string_len(20)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Dependent::Active)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-dependent-employee_id")
                            .from(Dependent::Table, Dependent::EmployeeId)
                            .to(Employee::Table, Employee::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Vacation::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Vacation::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Vacation::EmployeeId).uuid().not_null())
                    .col(ColumnDef::new(Vacation::StartDate).date().not_null())
                    .col(ColumnDef::new(Vacation::EndDate).date().not_null())
                    .col(ColumnDef::new(Vacation::DaysRequested).integer().not_null())
                    .col(ColumnDef::new(Vacation::Status).string_len(20).not_null())
                    .col(ColumnDef::new(Vacation::Notes).text())
                    .col(ColumnDef::new(Vacation::ApprovedBy).uuid())
                    .col(ColumnDef::new(Vacation::ApprovalDate).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(Vacation::RequestDate)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-vacation-employee_id")
                            .from(Vacation::Table, Vacation::EmployeeId)
                            .to(Employee::Table, Employee::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-vacation-approved_by")
                            .from(Vacation::Table, Vacation::ApprovedBy)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-vacation-employee_id-status")
                    .table(Vacation::Table)
                    .col(Vacation::EmployeeId)
                    .col(Vacation::Status)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Vacation::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Dependent::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Employee::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Position::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Department::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).if_exists().to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
pub(crate) enum Users {
    Table,
    Id,
    Email,
    FirstName,
    LastName,
    CreatedAt,
}

#[derive(DeriveIden)]
pub(crate) enum Department {
    Table,
    Id,
    Name,
    Description,
    Budget,
    ManagerId,
    Active,
    CreatedAt,
}

#[derive(DeriveIden)]
pub(crate) enum Position {
    Table,
    Id,
    Name,
    DepartmentId,
    Description,
    BaseSalary,
    ContractType,
    HierarchyLevel,
    Requirements,
    Active,
    CreatedAt,
}

#[derive(DeriveIden)]
pub(crate) enum Employee {
    Table,
    Id,
    UserId,
    NationalId,
    IdDocument,
    BirthDate,
    Gender,
    MaritalStatus,
    Phone,
    Mobile,
    Address,
    City,
    State,
    ZipCode,
    EmployeeCode,
    PositionId,
    DepartmentId,
    HireDate,
    TerminationDate,
    CurrentSalary,
    WorkHours,
    ContractType,
    Bank,
    Agency,
    Account,
    PixKey,
    Active,
    OnVacation,
    OnLeave,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Dependent {
    Table,
    Id,
    EmployeeId,
    Name,
    NationalId,
    BirthDate,
    Relationship,
    Active,
}

#[derive(DeriveIden)]
enum Vacation {
    Table,
    Id,
    EmployeeId,
    StartDate,
    EndDate,
    DaysRequested,
    Status,
    Notes,
    ApprovedBy,
    ApprovalDate,
    RequestDate,
}
