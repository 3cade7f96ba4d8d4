mod common;

use common::{hire, org, setup};
use entity::{department, employee};
use products_hr::{HrError, NewDepartment};
use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};

#[tokio::test]
async fn counts_come_back_per_department_in_name_order() {
    let ctx = setup().await;
    let eng = org(&ctx.store, "Engineering", "Backend Developer").await;
    let ops = org(&ctx.store, "Operations", "Analyst").await;
    org(&ctx.store, "Accounting", "Clerk").await;

    hire(&ctx.store, "Jane", "Doe", "1", "E1", eng).await;
    hire(&ctx.store, "John", "Roe", "2", "E2", eng).await;
    let leaver = hire(&ctx.store, "Ana", "Lima", "3", "E3", ops).await;
    ctx.store
        .terminate_employee(leaver.employee.id, common::date(2025, 1, 1))
        .await
        .unwrap();

    let counts = ctx.store.list_departments_with_counts().await.unwrap();
    let view: Vec<_> = counts
        .iter()
        .map(|c| (c.name.as_str(), c.total_employees, c.active_employees))
        .collect();
    assert_eq!(
        view,
        vec![
            ("Accounting", 0, 0),
            ("Engineering", 2, 2),
            ("Operations", 1, 0),
        ]
    );

    let per_department: i64 = counts.iter().map(|c| c.active_employees).sum();
    let global = ctx.store.count_active_employees().await.unwrap();
    assert_eq!(per_department as u64, global);
}

#[tokio::test]
async fn inactive_departments_are_not_listed() {
    let ctx = setup().await;
    let (archived, _) = org(&ctx.store, "Archive", "Keeper").await;
    org(&ctx.store, "Engineering", "Backend Developer").await;

    department::Entity::update_many()
        .col_expr(department::Column::Active, sea_orm::sea_query::Expr::value(false))
        .filter(department::Column::Id.eq(archived))
        .exec(ctx.store.connection())
        .await
        .unwrap();

    let counts = ctx.store.list_departments_with_counts().await.unwrap();
    assert_eq!(counts.len(), 1);
    assert_eq!(counts[0].name, "Engineering");
}

#[tokio::test]
async fn department_names_are_unique() {
    let ctx = setup().await;
    org(&ctx.store, "Engineering", "Backend Developer").await;
    let err = ctx
        .store
        .create_department(NewDepartment {
            name: "Engineering".into(),
            description: None,
            budget: Decimal::ZERO,
            manager_id: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, HrError::DuplicateKey(_)));
}

#[tokio::test]
async fn detail_counts_flags_and_shows_manager() {
    let ctx = setup().await;
    let eng = org(&ctx.store, "Engineering", "Backend Developer").await;
    let jane = hire(&ctx.store, "Jane", "Doe", "1", "E1", eng).await;
    let john = hire(&ctx.store, "John", "Roe", "2", "E2", eng).await;
    ctx.store.set_employee_leave(john.employee.id, true).await.unwrap();
    ctx.store
        .set_department_manager(eng.0, Some(jane.employee.id))
        .await
        .unwrap();

    let detail = ctx.store.get_department_detail(eng.0).await.unwrap();
    assert_eq!(detail.total_employees, 2);
    assert_eq!(detail.on_leave, 1);
    assert_eq!(detail.on_vacation, 0);
    assert_eq!(detail.positions.len(), 1);
    assert_eq!(
        detail.manager.map(|m| m.employee.id),
        Some(jane.employee.id)
    );
    let names: Vec<_> = detail.employees.iter().map(|e| e.full_name()).collect();
    assert_eq!(names, vec!["Jane Doe", "John Roe"]);

    let still_there = employee::Entity::find()
        .filter(employee::Column::DepartmentId.eq(eng.0))
        .all(ctx.store.connection())
        .await
        .unwrap();
    assert_eq!(still_there.len(), 2);
}

#[tokio::test]
async fn hierarchy_level_is_bounded() {
    let ctx = setup().await;
    let (department_id, _) = org(&ctx.store, "Engineering", "Backend Developer").await;
    let err = ctx
        .store
        .create_position(products_hr::NewPosition {
            name: "Overlord".into(),
            department_id,
            description: None,
            base_salary: Decimal::from(1),
            contract_type: entity::position::ContractType::Pj,
            hierarchy_level: 11,
            requirements: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, HrError::Validation(_)));
}

#[tokio::test]
async fn positions_list_by_department() {
    let ctx = setup().await;
    let (eng, _) = org(&ctx.store, "Engineering", "Backend Developer").await;
    org(&ctx.store, "Operations", "Analyst").await;

    let all = ctx.store.list_positions(None).await.unwrap();
    let names: Vec<_> = all.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["Analyst", "Backend Developer"]);

    let engineering = ctx.store.list_positions(Some(eng)).await.unwrap();
    assert_eq!(engineering.len(), 1);
    assert_eq!(engineering[0].department_id, eng);
}
