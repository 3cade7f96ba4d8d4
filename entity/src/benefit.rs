use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "benefit")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub benefit_type: BenefitType,
    pub value: Decimal,
    pub description: Option<String>,
    pub active: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::employee_benefit::Entity")]
    EmployeeBenefit,
}

impl Related<super::employee_benefit::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::EmployeeBenefit.def()
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveActiveEnum, Eq, PartialEq)]
#[sea_orm(rs_type = "String", db_type = "String(Some(20))")]
pub enum BenefitType {
    #[sea_orm(string_value = "MEAL_VOUCHER")]
    MealVoucher,
    #[sea_orm(string_value = "FOOD_VOUCHER")]
    FoodVoucher,
    #[sea_orm(string_value = "TRANSPORT_VOUCHER")]
    TransportVoucher,
    #[sea_orm(string_value = "HEALTH_PLAN")]
    HealthPlan,
    #[sea_orm(string_value = "DENTAL_PLAN")]
    DentalPlan,
    #[sea_orm(string_value = "LIFE_INSURANCE")]
    LifeInsurance,
    #[sea_orm(string_value = "EDUCATION_AID")]
    EducationAid,
    #[sea_orm(string_value = "OTHER")]
    Other,
}

impl ActiveModelBehavior for ActiveModel {}
