use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "question")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    #[sea_orm(column_type = "Text")]
    pub question_text: String,
    pub question_type: i16,
    #[sea_orm(column_type = "Text")]
    pub response: String,
    pub medical_picture_url: Option<String>,
    #[sea_orm(column_type = "Double")]
    pub score: f64,
    pub question_category_id: String,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::question_category::Entity",
        from = "Column::QuestionCategoryId",
        to = "super::question_category::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    QuestionCategory,
}

impl Related<super::question_category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::QuestionCategory.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
