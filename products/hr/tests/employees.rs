mod common;

use common::{date, hire, org, personal, professional, setup};
use products_hr::{EmployeeFilter, EmployeeStatus, HrError, NewDependent, PageRequest};
use entity::dependent;
use uuid::Uuid;

#[tokio::test]
async fn jane_doe_starts_with_an_empty_record() {
    let ctx = setup().await;
    let ids = org(&ctx.store, "Engineering", "Backend Developer").await;
    let jane = hire(&ctx.store, "Jane", "Doe", "123-45-6789", "EMP001", ids).await;

    let detail = ctx.store.get_employee_detail(jane.employee.id).await.unwrap();
    assert!(detail.employee.active);
    assert!(!detail.employee.on_vacation);
    assert_eq!(detail.user.full_name(), "Jane Doe");
    assert_eq!(detail.employee.work_hours, 40);
    assert_eq!(detail.position.map(|p| p.name).as_deref(), Some("Backend Developer"));
    assert!(detail.dependents.is_empty());
    assert!(detail.vacations.is_empty());
    assert!(detail.attendance.is_empty());
    assert!(detail.benefits.is_empty());
    assert!(detail.trainings.is_empty());
    assert!(detail.evaluations.is_empty());
    assert!(detail.documents.is_empty());
}

#[tokio::test]
async fn national_id_and_code_stay_unique() {
    let ctx = setup().await;
    let ids = org(&ctx.store, "Engineering", "Backend Developer").await;
    hire(&ctx.store, "Jane", "Doe", "123-45-6789", "EMP001", ids).await;

    let same_national_id = ctx
        .store
        .create_employee(
            personal("John", "Roe", "123-45-6789"),
            professional("EMP002", ids.0, ids.1),
        )
        .await
        .unwrap_err();
    assert!(matches!(same_national_id, HrError::DuplicateKey(_)));

    let same_code = ctx
        .store
        .create_employee(
            personal("John", "Roe", "987-65-4321"),
            professional("EMP001", ids.0, ids.1),
        )
        .await
        .unwrap_err();
    assert!(matches!(same_code, HrError::DuplicateKey(_)));

    let page = ctx
        .store
        .list_employees(EmployeeFilter::default(), PageRequest::default())
        .await
        .unwrap();
    assert_eq!(page.total, 1);
}

#[tokio::test]
async fn unknown_position_is_a_missing_reference() {
    let ctx = setup().await;
    let (department_id, _) = org(&ctx.store, "Engineering", "Backend Developer").await;
    let err = ctx
        .store
        .create_employee(
            personal("Jane", "Doe", "123-45-6789"),
            professional("EMP001", department_id, Uuid::new_v4()),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, HrError::ReferenceNotFound(_)));
}

#[tokio::test]
async fn search_is_case_insensitive_across_fields() {
    let ctx = setup().await;
    let ids = org(&ctx.store, "Engineering", "Backend Developer").await;
    hire(&ctx.store, "Jane", "Doe", "111", "EMP001", ids).await;
    hire(&ctx.store, "Alice", "Smith", "222", "EMP002", ids).await;
    hire(&ctx.store, "Bob", "Janeway", "333", "XYZ003", ids).await;

    let search = |term: &str| EmployeeFilter {
        search: Some(term.into()),
        ..EmployeeFilter::default()
    };

    let page = ctx
        .store
        .list_employees(search("JANE"), PageRequest::default())
        .await
        .unwrap();
    let names: Vec<_> = page.items.iter().map(|r| r.full_name()).collect();
    assert_eq!(names, vec!["Bob Janeway", "Jane Doe"]);

    let by_code = ctx
        .store
        .list_employees(search("xyz"), PageRequest::default())
        .await
        .unwrap();
    assert_eq!(by_code.total, 1);
    assert_eq!(by_code.items[0].employee.employee_code, "XYZ003");

    let by_email = ctx
        .store
        .list_employees(search("alice.smith@"), PageRequest::default())
        .await
        .unwrap();
    assert_eq!(by_email.total, 1);

    let by_national_id = ctx
        .store
        .list_employees(search("22"), PageRequest::default())
        .await
        .unwrap();
    let names: Vec<_> = by_national_id.items.iter().map(|r| r.full_name()).collect();
    assert_eq!(names, vec!["Alice Smith"]);
}

#[tokio::test]
async fn search_treats_wildcards_as_text() {
    let ctx = setup().await;
    let ids = org(&ctx.store, "Engineering", "Backend Developer").await;
    hire(&ctx.store, "Jane", "Doe", "111", "EMP001", ids).await;
    hire(&ctx.store, "Alice", "Smith", "222", "EMP002", ids).await;

    let total = |term: &'static str| {
        let store = ctx.store.clone();
        async move {
            store
                .list_employees(
                    EmployeeFilter {
                        search: Some(term.into()),
                        ..EmployeeFilter::default()
                    },
                    PageRequest::default(),
                )
                .await
                .unwrap()
                .total
        }
    };

    assert_eq!(total("a_i").await, 0);
    assert_eq!(total("%").await, 0);
    assert_eq!(total("_").await, 0);

    hire(&ctx.store, "Carl", "Berg", "333", "OPS_7", ids).await;
    assert_eq!(total("s_7").await, 1);
    assert_eq!(total("_").await, 1);
    assert_eq!(total("ps_").await, 1);
}

#[tokio::test]
async fn status_filters_are_exclusive() {
    let ctx = setup().await;
    let ids = org(&ctx.store, "Engineering", "Backend Developer").await;
    let a = hire(&ctx.store, "Ana", "Lima", "1", "E1", ids).await;
    hire(&ctx.store, "Bruno", "Costa", "2", "E2", ids).await;
    ctx.store.set_employee_leave(a.employee.id, true).await.unwrap();

    let with_status = |status| EmployeeFilter {
        status: Some(status),
        ..EmployeeFilter::default()
    };

    let active = ctx
        .store
        .list_employees(with_status(EmployeeStatus::Active), PageRequest::default())
        .await
        .unwrap();
    assert_eq!(active.total, 1);
    assert!(active.items.iter().all(|r| !r.employee.on_leave && !r.employee.on_vacation));

    let on_leave = ctx
        .store
        .list_employees(with_status(EmployeeStatus::OnLeave), PageRequest::default())
        .await
        .unwrap();
    assert_eq!(on_leave.items[0].employee.id, a.employee.id);
}

#[tokio::test]
async fn listing_is_ordered_and_paged() {
    let ctx = setup().await;
    let ids = org(&ctx.store, "Engineering", "Backend Developer").await;
    for (i, first) in ["Carla", "Ana", "Bruno", "Ana"].iter().enumerate() {
        hire(
            &ctx.store,
            first,
            &format!("N{i}"),
            &format!("ID{i}"),
            &format!("EMP{:03}", 10 - i),
            ids,
        )
        .await;
    }

    let first_page = ctx
        .store
        .list_employees(EmployeeFilter::default(), PageRequest::new(1, 3))
        .await
        .unwrap();
    assert_eq!(first_page.total, 4);
    assert_eq!(first_page.total_pages(), 2);
    let codes: Vec<_> = first_page
        .items
        .iter()
        .map(|r| r.employee.employee_code.as_str())
        .collect();
    assert_eq!(codes, vec!["EMP007", "EMP009", "EMP008"]);

    let second_page = ctx
        .store
        .list_employees(EmployeeFilter::default(), PageRequest::new(2, 3))
        .await
        .unwrap();
    assert_eq!(second_page.items.len(), 1);
    assert_eq!(second_page.items[0].user.first_name, "Carla");
}

#[tokio::test]
async fn terminated_employees_leave_the_default_listing() {
    let ctx = setup().await;
    let ids = org(&ctx.store, "Engineering", "Backend Developer").await;
    let jane = hire(&ctx.store, "Jane", "Doe", "1", "E1", ids).await;

    let too_early = ctx
        .store
        .terminate_employee(jane.employee.id, date(2020, 1, 1))
        .await
        .unwrap_err();
    assert!(matches!(too_early, HrError::Validation(_)));

    let retired = ctx
        .store
        .terminate_employee(jane.employee.id, date(2025, 1, 31))
        .await
        .unwrap();
    assert!(!retired.active);
    assert_eq!(retired.termination_date, Some(date(2025, 1, 31)));

    let again = ctx
        .store
        .terminate_employee(jane.employee.id, date(2025, 2, 1))
        .await
        .unwrap_err();
    assert!(matches!(again, HrError::InvalidTransition(_)));

    let listed = ctx
        .store
        .list_employees(EmployeeFilter::default(), PageRequest::default())
        .await
        .unwrap();
    assert_eq!(listed.total, 0);

    let everyone = ctx
        .store
        .list_employees(
            EmployeeFilter {
                include_inactive: true,
                ..EmployeeFilter::default()
            },
            PageRequest::default(),
        )
        .await
        .unwrap();
    assert_eq!(everyone.total, 1);
}

#[tokio::test]
async fn detail_shows_only_active_dependents() {
    let ctx = setup().await;
    let ids = org(&ctx.store, "Engineering", "Backend Developer").await;
    let jane = hire(&ctx.store, "Jane", "Doe", "1", "E1", ids).await;

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

    let future_child = ctx
        .store
        .add_dependent(
            jane.employee.id,
            NewDependent {
                name: "Not Yet".into(),
                national_id: None,
                birth_date: date(2030, 1, 1),
                relationship: dependent::Relationship::Child,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(future_child, HrError::Validation(_)));

    let detail = ctx.store.get_employee_detail(jane.employee.id).await.unwrap();
    assert_eq!(detail.dependents.len(), 1);
    assert_eq!(detail.dependents[0].name, "Lia Doe");
}

#[tokio::test]
async fn missing_employee_detail_is_not_found() {
    let ctx = setup().await;
    let err = ctx.store.get_employee_detail(Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, HrError::NotFound { entity: "employee", .. }));
}
