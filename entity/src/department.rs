use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "department")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub name: String,
    pub description: Option<String>,
    pub budget: Decimal,
    /// Not a database-level foreign key: department and employee reference
    /// each other, so the store keeps this column consistent itself.
    #[sea_orm(indexed)]
    pub manager_id: Option<Uuid>,
    pub active: bool,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Position,
    Employee,
    Manager,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Self::Position => Entity::has_many(super::position::Entity).into(),
            Self::Employee => Entity::has_many(super::employee::Entity).into(),
            Self::Manager => Entity::belongs_to(super::employee::Entity)
                .from(Column::ManagerId)
                .to(super::employee::Column::Id)
                .into(),
        }
    }
}

impl Related<super::position::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Position.def()
    }
}

impl Related<super::employee::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Employee.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
