#![allow(dead_code)]

use std::sync::Arc;

use chrono::NaiveDate;
use entity::{employee, position};
use migration::{Migrator, MigratorTrait};
use products_hr::{
    EmployeeRow, FixedClock, HrStore, NewDepartment, NewPosition, PersonalData, ProfessionalData,
};
use rust_decimal::Decimal;
use sea_orm::Database;
use uuid::Uuid;

pub struct TestContext {
    pub store: HrStore,
    pub clock: Arc<FixedClock>,
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub async fn setup() -> TestContext {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    Migrator::up(&db, None).await.unwrap();
    let clock = Arc::new(FixedClock::at_date(date(2025, 1, 2)));
    let store = HrStore::new(db, clock.clone());
    TestContext { store, clock }
}

/// Department plus one position inside it.
pub async fn org(store: &HrStore, department: &str, position: &str) -> (Uuid, Uuid) {
    let dept = store
        .create_department(NewDepartment {
            name: department.into(),
            description: None,
            budget: Decimal::from(100_000),
            manager_id: None,
        })
        .await
        .unwrap();
    let pos = store
        .create_position(NewPosition {
            name: position.into(),
            department_id: dept.id,
            description: None,
            base_salary: Decimal::from(5_000),
            contract_type: position::ContractType::Clt,
            hierarchy_level: 3,
            requirements: None,
        })
        .await
        .unwrap();
    (dept.id, pos.id)
}

pub fn personal(first: &str, last: &str, national_id: &str) -> PersonalData {
    PersonalData {
        first_name: first.into(),
        last_name: last.into(),
        email: format!("{}.{}@bytenest.test", first, last).to_lowercase(),
        national_id: national_id.into(),
        id_document: None,
        birth_date: date(1990, 5, 17),
        gender: employee::Gender::Female,
        marital_status: None,
        phone: None,
        mobile: Some("+55 11 99999-0000".into()),
        address: None,
        city: Some("Sao Paulo".into()),
        state: Some("SP".into()),
        zip_code: None,
    }
}

pub fn professional(code: &str, department_id: Uuid, position_id: Uuid) -> ProfessionalData {
    ProfessionalData {
        employee_code: code.into(),
        position_id,
        department_id,
        hire_date: date(2024, 3, 1),
        current_salary: Decimal::from(5_000),
        work_hours: None,
        contract_type: employee::ContractType::Clt,
        bank: None,
        agency: None,
        account: None,
        pix_key: None,
    }
}

pub async fn hire(
    store: &HrStore,
    first: &str,
    last: &str,
    national_id: &str,
    code: &str,
    (department_id, position_id): (Uuid, Uuid),
) -> EmployeeRow {
    store
        .create_employee(
            personal(first, last, national_id),
            professional(code, department_id, position_id),
        )
        .await
        .unwrap()
}
