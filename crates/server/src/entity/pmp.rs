use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "pmp")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub title: String,
    pub description: String,
    pub annonce_of_the_problem: String,
    pub professor_id: Option<String>,
    pub classroom_id: String,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::classroom::Entity",
        from = "Column::ClassroomId",
        to = "super::classroom::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Classroom,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::ProfessorId",
        to = "super::user::Column::Id",
        on_update = "NoAction",
        on_delete = "SetNull"
    )]
    Professor,
    #[sea_orm(has_many = "super::question_category::Entity")]
    QuestionCategory,
}

impl Related<super::classroom::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Classroom.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Professor.def()
    }
}

impl Related<super::question_category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::QuestionCategory.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
