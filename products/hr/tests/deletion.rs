mod common;

use common::{date, hire, org, setup};
use entity::{attendance, benefit, department, dependent, vacation};
use products_hr::{
    AttendanceEntry, BenefitAssignment, EntityKind, HrError, NewBenefit, NewDependent, Punches,
    VacationDecision,
};
use rust_decimal::Decimal;
use sea_orm::{EntityTrait, PaginatorTrait};

#[tokio::test]
async fn department_with_positions_cannot_be_deleted() {
    let ctx = setup().await;
    let (department_id, position_id) = org(&ctx.store, "Engineering", "Backend Developer").await;

    let err = ctx.store.delete_department(department_id).await.unwrap_err();
    assert!(matches!(err, HrError::DeleteBlocked(_)));

    ctx.store.delete_position(position_id).await.unwrap();
    ctx.store.delete_department(department_id).await.unwrap();
    assert!(
        department::Entity::find_by_id(department_id)
            .one(ctx.store.connection())
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
async fn position_with_employees_cannot_be_deleted() {
    let ctx = setup().await;
    let ids = org(&ctx.store, "Engineering", "Backend Developer").await;
    hire(&ctx.store, "Jane", "Doe", "1", "E1", ids).await;

    let err = ctx.store.delete_position(ids.1).await.unwrap_err();
    assert!(matches!(err, HrError::DeleteBlocked(_)));
}

#[tokio::test]
async fn deleting_an_employee_cascades_and_clears_manager() {
    let ctx = setup().await;
    let ids = org(&ctx.store, "Engineering", "Backend Developer").await;
    let jane = hire(&ctx.store, "Jane", "Doe", "1", "E1", ids).await;
    let john = hire(&ctx.store, "John", "Roe", "2", "E2", ids).await;
    ctx.store
        .set_department_manager(ids.0, Some(jane.employee.id))
        .await
        .unwrap();

    ctx.store
        .add_dependent(
            jane.employee.id,
            NewDependent {
                name: "Lia Doe".into(),
                national_id: None,
                birth_date: date(2018, 4, 2),
                relationship: dependent::Relationship::Child,
            },
        )
        .await
        .unwrap();
    let trip = ctx
        .store
        .request_vacation(jane.employee.id, date(2025, 2, 1), date(2025, 2, 3), 3, None)
        .await
        .unwrap();
    ctx.store
        .decide_vacation(trip.id, john.user.id, VacationDecision::Approve)
        .await
        .unwrap();
    for employee_id in [jane.employee.id, john.employee.id] {
        ctx.store
            .record_attendance(AttendanceEntry {
                employee_id,
                date: date(2025, 1, 2),
                punches: Punches::default(),
                hours_worked: Some(Decimal::from(8)),
                overtime_hours: None,
                notes: None,
            })
            .await
            .unwrap();
    }
    let meal = ctx
        .store
        .create_benefit(NewBenefit {
            name: "Meal voucher".into(),
            benefit_type: benefit::BenefitType::MealVoucher,
            value: Decimal::from(600),
            description: None,
        })
        .await
        .unwrap();
    ctx.store
        .assign_benefit(BenefitAssignment {
            employee_id: jane.employee.id,
            benefit_id: meal.id,
            value: None,
            start_date: date(2025, 1, 1),
            end_date: None,
        })
        .await
        .unwrap();

    let report = ctx.store.delete_employee(jane.employee.id).await.unwrap();
    assert!(report.nulled.contains(&(EntityKind::Department, 1)));
    assert!(report.cascaded.contains(&(EntityKind::Dependent, 1)));
    assert!(report.cascaded.contains(&(EntityKind::Vacation, 1)));
    assert!(report.cascaded.contains(&(EntityKind::Attendance, 1)));
    assert!(report.cascaded.contains(&(EntityKind::EmployeeBenefit, 1)));

    let db = ctx.store.connection();
    assert_eq!(vacation::Entity::find().count(db).await.unwrap(), 0);
    // John's attendance is untouched
    assert_eq!(attendance::Entity::find().count(db).await.unwrap(), 1);
    let dept = department::Entity::find_by_id(ids.0)
        .one(db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(dept.manager_id, None);

    let gone = ctx.store.get_employee_detail(jane.employee.id).await.unwrap_err();
    assert!(matches!(gone, HrError::NotFound { .. }));
}

#[tokio::test]
async fn deleting_a_benefit_removes_its_assignments() {
    let ctx = setup().await;
    let ids = org(&ctx.store, "Engineering", "Backend Developer").await;
    let jane = hire(&ctx.store, "Jane", "Doe", "1", "E1", ids).await;
    let health = ctx
        .store
        .create_benefit(NewBenefit {
            name: "Health plan".into(),
            benefit_type: benefit::BenefitType::HealthPlan,
            value: Decimal::from(450),
            description: None,
        })
        .await
        .unwrap();
    ctx.store
        .assign_benefit(BenefitAssignment {
            employee_id: jane.employee.id,
            benefit_id: health.id,
            value: Some(Decimal::from(500)),
            start_date: date(2025, 1, 1),
            end_date: None,
        })
        .await
        .unwrap();

    let listed: Vec<_> = ctx
        .store
        .list_active_benefits()
        .await
        .unwrap()
        .into_iter()
        .map(|b| b.name)
        .collect();
    assert_eq!(listed, vec!["Health plan"]);

    let report = ctx.store.delete_benefit(health.id).await.unwrap();
    assert_eq!(report.cascaded_rows(), 1);
    assert!(ctx.store.list_active_benefits().await.unwrap().is_empty());
    let detail = ctx.store.get_employee_detail(jane.employee.id).await.unwrap();
    assert!(detail.benefits.is_empty());
}

#[tokio::test]
async fn deleting_nothing_is_not_found() {
    let ctx = setup().await;
    let err = ctx.store.delete_training(uuid::Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, HrError::NotFound { entity: "training", .. }));
}
