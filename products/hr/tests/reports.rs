mod common;

use chrono::{Duration, TimeZone, Utc};
use common::{date, hire, org, setup};
use entity::{document, employee_training, evaluation, training};
use products_hr::{
    HrError, NewDocument, NewEvaluation, NewTraining, PageRequest, TrainingResult,
    VacationDecision,
};
use rust_decimal::Decimal;

fn session(name: &str, days_from_now: i64, max: Option<i32>) -> NewTraining {
    let start = Utc.with_ymd_and_hms(2025, 1, 2, 9, 0, 0).unwrap() + Duration::days(days_from_now);
    NewTraining {
        name: name.into(),
        description: "hands-on".into(),
        instructor: "R. Alves".into(),
        start,
        end: start + Duration::hours(8),
        duration_hours: 8,
        location: "Room 2".into(),
        cost: Decimal::from(1_200),
        max_participants: max,
    }
}

#[tokio::test]
async fn performance_report_averages_graded_evaluations() {
    let ctx = setup().await;
    let ids = org(&ctx.store, "Engineering", "Backend Developer").await;
    let jane = hire(&ctx.store, "Jane", "Doe", "1", "E1", ids).await;
    let boss = hire(&ctx.store, "Mark", "Boss", "2", "E2", ids).await;

    let empty = ctx.store.performance_report().await.unwrap();
    assert_eq!(empty.evaluations, 0);
    assert_eq!(empty.average_grade, None);

    for grade in [Some(Decimal::new(80, 1)), Some(Decimal::new(90, 1)), None] {
        ctx.store
            .create_evaluation(NewEvaluation {
                employee_id: jane.employee.id,
                evaluation_type: evaluation::EvaluationType::Annual,
                period_start: date(2024, 1, 1),
                period_end: date(2024, 12, 31),
                evaluator_id: boss.user.id,
                overall_grade: grade,
                comments: None,
                strengths: None,
                improvement_points: None,
            })
            .await
            .unwrap();
    }

    let report = ctx.store.performance_report().await.unwrap();
    assert_eq!(report.evaluations, 3);
    assert!((report.average_grade.unwrap() - 8.5).abs() < 1e-9);

    let annual = ctx
        .store
        .list_evaluations(Some(evaluation::EvaluationType::Annual), PageRequest::default())
        .await
        .unwrap();
    assert_eq!(annual.total, 3);
    let probation = ctx
        .store
        .list_evaluations(Some(evaluation::EvaluationType::Probation), PageRequest::default())
        .await
        .unwrap();
    assert_eq!(probation.total, 0);
}

#[tokio::test]
async fn evaluation_period_must_be_ordered() {
    let ctx = setup().await;
    let ids = org(&ctx.store, "Engineering", "Backend Developer").await;
    let jane = hire(&ctx.store, "Jane", "Doe", "1", "E1", ids).await;
    let err = ctx
        .store
        .create_evaluation(NewEvaluation {
            employee_id: jane.employee.id,
            evaluation_type: evaluation::EvaluationType::Probation,
            period_start: date(2024, 6, 1),
            period_end: date(2024, 1, 1),
            evaluator_id: jane.user.id,
            overall_grade: None,
            comments: None,
            strengths: None,
            improvement_points: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, HrError::Validation(_)));
}

#[tokio::test]
async fn trainings_fill_up_and_report_stats() {
    let ctx = setup().await;
    let ids = org(&ctx.store, "Engineering", "Backend Developer").await;
    let jane = hire(&ctx.store, "Jane", "Doe", "1", "E1", ids).await;
    let john = hire(&ctx.store, "John", "Roe", "2", "E2", ids).await;

    let rust = ctx.store.create_training(session("Rust 101", 7, Some(1))).await.unwrap();
    assert_eq!(rust.status, training::Status::Planned);
    let sql = ctx.store.create_training(session("SQL", 14, None)).await.unwrap();
    assert_eq!(sql.max_participants, 20);

    ctx.store.enroll_in_training(rust.id, jane.employee.id).await.unwrap();
    let twice = ctx
        .store
        .enroll_in_training(rust.id, jane.employee.id)
        .await
        .unwrap_err();
    assert!(matches!(twice, HrError::DuplicateKey(_)));
    let full = ctx
        .store
        .enroll_in_training(rust.id, john.employee.id)
        .await
        .unwrap_err();
    assert!(matches!(full, HrError::Validation(_)));

    ctx.store
        .record_training_result(
            rust.id,
            jane.employee.id,
            TrainingResult {
                status: employee_training::Status::Passed,
                grade: Some(Decimal::new(95, 1)),
                certificate: true,
                notes: None,
            },
        )
        .await
        .unwrap();
    ctx.store
        .set_training_status(rust.id, training::Status::InProgress)
        .await
        .unwrap();
    ctx.store
        .set_training_status(rust.id, training::Status::Completed)
        .await
        .unwrap();
    let reopen = ctx
        .store
        .set_training_status(rust.id, training::Status::Planned)
        .await
        .unwrap_err();
    assert!(matches!(reopen, HrError::InvalidTransition(_)));

    let stats = ctx.store.training_stats().await.unwrap();
    assert_eq!((stats.total, stats.completed), (2, 1));

    let detail = ctx.store.get_training_detail(rust.id).await.unwrap();
    assert_eq!(detail.participants.len(), 1);
    assert_eq!(detail.participants[0].employee.full_name(), "Jane Doe");
    assert!(detail.participants[0].link.certificate);

    let jane_detail = ctx.store.get_employee_detail(jane.employee.id).await.unwrap();
    assert_eq!(jane_detail.trainings.len(), 1);
    assert_eq!(jane_detail.trainings[0].training.name, "Rust 101");

    let listed = ctx
        .store
        .list_trainings(None, PageRequest::default())
        .await
        .unwrap();
    let names: Vec<_> = listed.items.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["SQL", "Rust 101"]);

    let removed = ctx.store.delete_training(rust.id).await.unwrap();
    assert_eq!(removed.cascaded_rows(), 1);
}

#[tokio::test]
async fn dashboard_reflects_store_state() {
    let ctx = setup().await;
    let eng = org(&ctx.store, "Engineering", "Backend Developer").await;
    let ops = org(&ctx.store, "Operations", "Analyst").await;
    let jane = hire(&ctx.store, "Jane", "Doe", "1", "E1", eng).await;
    ctx.clock.advance(Duration::minutes(1));
    let john = hire(&ctx.store, "John", "Roe", "2", "E2", eng).await;
    ctx.clock.advance(Duration::minutes(1));
    hire(&ctx.store, "Ana", "Lima", "3", "E3", ops).await;

    let trip = ctx
        .store
        .request_vacation(jane.employee.id, date(2025, 1, 10), date(2025, 1, 20), 10, None)
        .await
        .unwrap();
    ctx.store
        .decide_vacation(trip.id, john.user.id, VacationDecision::Approve)
        .await
        .unwrap();
    ctx.store
        .request_vacation(john.employee.id, date(2025, 5, 1), date(2025, 5, 10), 10, None)
        .await
        .unwrap();

    ctx.store.create_training(session("Upcoming", 3, None)).await.unwrap();
    ctx.store.create_training(session("Past", -3, None)).await.unwrap();

    ctx.store
        .attach_document(NewDocument {
            employee_id: jane.employee.id,
            document_type: document::DocumentType::Contract,
            name: "Employment contract".into(),
            file_ref: "hr/contracts/e1.pdf".into(),
            description: None,
        })
        .await
        .unwrap();

    let dashboard = ctx.store.dashboard_overview().await.unwrap();
    assert_eq!(dashboard.active_employees, 3);
    assert_eq!(dashboard.active_departments, 2);
    assert_eq!(dashboard.employees_on_vacation, 1);
    assert_eq!(dashboard.pending_vacation_requests, 1);
    assert_eq!(dashboard.recent_employees[0].full_name(), "Ana Lima");
    assert_eq!(dashboard.recent_approved_vacations.len(), 1);
    assert_eq!(dashboard.recent_approved_vacations[0].employee_name, "Jane Doe");
    let upcoming: Vec<_> = dashboard
        .upcoming_trainings
        .iter()
        .map(|t| t.name.as_str())
        .collect();
    assert_eq!(upcoming, vec!["Upcoming"]);
    let headcount: Vec<_> = dashboard
        .departments_by_headcount
        .iter()
        .map(|d| (d.name.as_str(), d.total_employees))
        .collect();
    assert_eq!(headcount, vec![("Engineering", 2), ("Operations", 1)]);

    let detail = ctx.store.get_employee_detail(jane.employee.id).await.unwrap();
    assert_eq!(detail.documents.len(), 1);
    assert_eq!(detail.documents[0].file_ref, "hr/contracts/e1.pdf");
}
