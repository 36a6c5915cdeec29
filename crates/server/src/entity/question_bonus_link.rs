//! Directed join rows behind a question's linked questions (source -> target).

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "question_bonus_link")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub source_question_id: String,
    pub target_question_id: String,
    pub bonus_type: i16,
    #[sea_orm(column_type = "Double")]
    pub bonus_value: f64,
    pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::question::Entity",
        from = "Column::SourceQuestionId",
        to = "super::question::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    SourceQuestion,
    #[sea_orm(
        belongs_to = "super::question::Entity",
        from = "Column::TargetQuestionId",
        to = "super::question::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    TargetQuestion,
}

impl ActiveModelBehavior for ActiveModel {}
