use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "question_category")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    pub pmp_id: String,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::pmp::Entity",
        from = "Column::PmpId",
        to = "super::pmp::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Pmp,
    #[sea_orm(has_many = "super::question::Entity")]
    Question,
}

impl Related<super::pmp::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Pmp.def()
    }
}

impl Related<super::question::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Question.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
