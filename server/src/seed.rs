use anyhow::Result;
use chrono::NaiveDate;
use entity::{benefit, employee, position};
use products_hr::{
    BenefitAssignment, HrStore, NewBenefit, NewDepartment, NewPosition, PersonalData,
    ProfessionalData,
};
use rust_decimal::Decimal;
use tracing::info;

struct Person {
    first: &'static str,
    last: &'static str,
    national_id: &'static str,
    code: &'static str,
    gender: employee::Gender,
    salary: i64,
}

static ENGINEERING: [Person; 2] = [
    Person {
        first: "Jane",
        last: "Doe",
        national_id: "52998224725",
        code: "ENG-001",
        gender: employee::Gender::Female,
        salary: 9_500,
    },
    Person {
        first: "Rafael",
        last: "Souza",
        national_id: "11144477735",
        code: "ENG-002",
        gender: employee::Gender::Male,
        salary: 7_200,
    },
];

static PEOPLE_OPS: [Person; 1] = [Person {
    first: "Camila",
    last: "Ferreira",
    national_id: "39053344705",
    code: "HR-001",
    gender: employee::Gender::Female,
    salary: 6_800,
}];

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

/// Demo organisation: two departments, three employees and a meal voucher.
/// Does nothing when employees already exist.
pub async fn run(store: &HrStore) -> Result<()> {
    if store.count_active_employees().await? > 0 {
        info!("database already has employees; seed skipped");
        return Ok(());
    }

    let voucher = store
        .create_benefit(NewBenefit {
            name: "Meal voucher".into(),
            benefit_type: benefit::BenefitType::MealVoucher,
            value: Decimal::from(800),
            description: Some("Monthly meal allowance".into()),
        })
        .await?;

    let mut hired = 0;
    for (department, role, people) in [
        ("Engineering", "Software Engineer", &ENGINEERING[..]),
        ("People Operations", "HR Analyst", &PEOPLE_OPS[..]),
    ] {
        let dept = store
            .create_department(NewDepartment {
                name: department.into(),
                description: None,
                budget: Decimal::from(250_000),
                manager_id: None,
            })
            .await?;
        let pos = store
            .create_position(NewPosition {
                name: role.into(),
                department_id: dept.id,
                description: None,
                base_salary: Decimal::from(6_000),
                contract_type: position::ContractType::Clt,
                hierarchy_level: 2,
                requirements: None,
            })
            .await?;

        let mut manager = None;
        for person in people {
            let row = store
                .create_employee(
                    PersonalData {
                        first_name: person.first.into(),
                        last_name: person.last.into(),
                        email: format!("{}.{}@bytenest.example", person.first, person.last)
                            .to_lowercase(),
                        national_id: person.national_id.into(),
                        id_document: None,
                        birth_date: day(1991, 4, 12),
                        gender: person.gender,
                        marital_status: None,
                        phone: None,
                        mobile: None,
                        address: None,
                        city: Some("Sao Paulo".into()),
                        state: Some("SP".into()),
                        zip_code: None,
                    },
                    ProfessionalData {
                        employee_code: person.code.into(),
                        position_id: pos.id,
                        department_id: dept.id,
                        hire_date: day(2024, 2, 1),
                        current_salary: Decimal::from(person.salary),
                        work_hours: None,
                        contract_type: employee::ContractType::Clt,
                        bank: None,
                        agency: None,
                        account: None,
                        pix_key: None,
                    },
                )
                .await?;
            store
                .assign_benefit(BenefitAssignment {
                    employee_id: row.employee.id,
                    benefit_id: voucher.id,
                    value: None,
                    start_date: row.employee.hire_date,
                    end_date: None,
                })
                .await?;
            manager.get_or_insert(row.employee.id);
            hired += 1;
        }
        store.set_department_manager(dept.id, manager).await?;
    }

    info!(employees = hired, "demo organisation seeded");
    Ok(())
}
