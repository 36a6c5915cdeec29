use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "classroom")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    #[sea_orm(unique)]
    pub name: String,
    pub grade: i32,
    pub major: String,
    pub description: Option<String>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::pmp::Entity")]
    Pmp,
}

impl Related<super::pmp::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Pmp.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
