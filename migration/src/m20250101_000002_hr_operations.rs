use sea_orm_migration::prelude::*;

use crate::m20250101_000001_hr_core::{Employee, Users};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Attendance::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Attendance::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Attendance::EmployeeId).uuid().not_null())
                    .col(ColumnDef::new(Attendance::Date).date().not_null())
                    .col(ColumnDef::new(Attendance::CheckIn).time())
                    .col(ColumnDef::new(Attendance::LunchOut).time())
                    .col(ColumnDef::new(Attendance::LunchIn).time())
                    .col(ColumnDef::new(Attendance::CheckOut).time())
                    .col(
                        ColumnDef::new(Attendance::HoursWorked)
                            .decimal_len(5, 2)
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Attendance::OvertimeHours)
                            .decimal_len(5, 2)
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Attendance::Notes).text())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-attendance-employee_id")
                            .from(Attendance::Table, Attendance::EmployeeId)
                            .to(Employee::Table, Employee::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uq-attendance-employee_id-date")
                    .table(Attendance::Table)
                    .col(Attendance::EmployeeId)
                    .col(Attendance::Date)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Benefit::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Benefit::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Benefit::Name).string_len(100).not_null())
                    .col(
                        ColumnDef::new(Benefit::BenefitType)
                            .string_len(20)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Benefit::Value).decimal_len(10, 2).not_null())
                    .col(ColumnDef::new(Benefit::Description).text())
                    .col(
                        ColumnDef::new(Benefit::Active)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(EmployeeBenefit::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(EmployeeBenefit::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(EmployeeBenefit::EmployeeId).uuid().not_null())
                    .col(ColumnDef::new(EmployeeBenefit::BenefitId).uuid().not_null())
                    .col(
                        ColumnDef::new(EmployeeBenefit::Value)
                            .decimal_len(10, 2)
                            .not_null(),
                    )
                    .col(ColumnDef::new(EmployeeBenefit::StartDate).date().not_null())
                    .col(ColumnDef::new(EmployeeBenefit::EndDate).date())
                    .col(
                        ColumnDef::new(EmployeeBenefit::Active)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-employee_benefit-employee_id")
                            .from(EmployeeBenefit::Table, EmployeeBenefit::EmployeeId)
                            .to(Employee::Table, Employee::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-employee_benefit-benefit_id")
                            .from(EmployeeBenefit::Table, EmployeeBenefit::BenefitId)
                            .to(Benefit::Table, Benefit::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uq-employee_benefit-employee_id-benefit_id")
                    .table(EmployeeBenefit::Table)
                    .col(EmployeeBenefit::EmployeeId)
                    .col(EmployeeBenefit::BenefitId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Training::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Training::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Training::Name).string_len(200).not_null())
                    .col(ColumnDef::new(Training::Description).text().not_null())
                    .col(ColumnDef::new(Training::Instructor).string_len(200).not_null())
                    .col(
                        ColumnDef::new(Training::StartDate)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Training::EndDate)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Training::DurationHours).integer().not_null())
                    .col(ColumnDef::new(Training::Location).string_len(200).not_null())
                    .col(ColumnDef::new(Training::Status).string_len(20).not_null())
                    .col(
                        ColumnDef::new(Training::Cost)
                            .decimal_len(10, 2)
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Training::MaxParticipants)
                            .integer()
                            .not_null()
                            .default(20),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(EmployeeTraining::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(EmployeeTraining::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(EmployeeTraining::EmployeeId).uuid().not_null())
                    .col(ColumnDef::new(EmployeeTraining::TrainingId).uuid().not_null())
                    .col(
                        ColumnDef::new(EmployeeTraining::Status)
                            .string_len(20)
                            .not_null(),
                    )
                    .col(ColumnDef::new(EmployeeTraining::Grade).decimal_len(4, 2))
                    .col(
                        ColumnDef::new(EmployeeTraining::Certificate)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(EmployeeTraining::Notes).text())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-employee_training-employee_id")
                            .from(EmployeeTraining::Table, EmployeeTraining::EmployeeId)
                            .to(Employee::Table, Employee::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-employee_training-training_id")
                            .from(EmployeeTraining::Table, EmployeeTraining::TrainingId)
                            .to(Training::Table, Training::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uq-employee_training-employee_id-training_id")
                    .table(EmployeeTraining::Table)
                    .col(EmployeeTraining::EmployeeId)
                    .col(EmployeeTraining::TrainingId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Evaluation::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Evaluation::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Evaluation::EmployeeId).uuid().not_null())
                    .col(
                        ColumnDef::new(Evaluation::EvaluationType)
                            .string_len(20)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Evaluation::PeriodStart).date().not_null())
                    .col(ColumnDef::new(Evaluation::PeriodEnd).date().not_null())
                    .col(ColumnDef::new(Evaluation::EvaluatorId).uuid().not_null())
                    .col(ColumnDef::new(Evaluation::OverallGrade).decimal_len(4, 2))
                    .col(ColumnDef::new(Evaluation::Comments).text())
                    .col(ColumnDef::new(Evaluation::Strengths).text())
                    .col(ColumnDef::new(Evaluation::ImprovementPoints).text())
                    .col(
                        ColumnDef::new(Evaluation::EvaluationDate)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-evaluation-employee_id")
                            .from(Evaluation::Table, Evaluation::EmployeeId)
                            .to(Employee::Table, Employee::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-evaluation-evaluator_id")
                            .from(Evaluation::Table, Evaluation::EvaluatorId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Document::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Document::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Document::EmployeeId).uuid().not_null())
                    .col(
                        ColumnDef::new(Document::DocumentType)
                            .string_len(20)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Document::Name).string_len(200).not_null())
                    .col(ColumnDef::new(Document::FileRef).string_len(500).not_null())
                    .col(ColumnDef::new(Document::Description).text())
                    .col(
                        ColumnDef::new(Document::UploadDate)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-document-employee_id")
                            .from(Document::Table, Document::EmployeeId)
                            .to(Employee::Table, Employee::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Document::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Evaluation::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(
                Table::drop()
                    .table(EmployeeTraining::Table)
                    .if_exists()
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(Table::drop().table(Training::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(
                Table::drop()
                    .table(EmployeeBenefit::Table)
                    .if_exists()
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(Table::drop().table(Benefit::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Attendance::Table).if_exists().to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Attendance {
    Table,
    Id,
    EmployeeId,
    Date,
    CheckIn,
    LunchOut,
    LunchIn,
    CheckOut,
    HoursWorked,
    OvertimeHours,
    Notes,
}

#[derive(DeriveIden)]
enum Benefit {
    Table,
    Id,
    Name,
    BenefitType,
    Value,
    Description,
    Active,
}

#[derive(DeriveIden)]
enum EmployeeBenefit {
    Table,
    Id,
    EmployeeId,
    BenefitId,
    Value,
    StartDate,
    EndDate,
    Active,
}

#[derive(DeriveIden)]
enum Training {
    Table,
    Id,
    Name,
    Description,
    Instructor,
    StartDate,
    EndDate,
    DurationHours,
    Location,
    Status,
    Cost,
    MaxParticipants,
}

#[derive(DeriveIden)]
enum EmployeeTraining {
    Table,
    Id,
    EmployeeId,
    TrainingId,
    Status,
    Grade,
    Certificate,
    Notes,
}

#[derive(DeriveIden)]
enum Evaluation {
    Table,
    Id,
    EmployeeId,
    EvaluationType,
    PeriodStart,
    PeriodEnd,
    EvaluatorId,
    OverallGrade,
    Comments,
    Strengths,
    ImprovementPoints,
    EvaluationDate,
}

#[derive(DeriveIden)]
enum Document {
    Table,
    Id,
    EmployeeId,
    DocumentType,
    Name,
    FileRef,
    Description,
    UploadDate,
}
