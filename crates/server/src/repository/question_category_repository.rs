use crate::entity::{pmp, question, question_category};
use crate::error::{RepositoryError, Result};
use crate::repository::question_repository::{QuestionRecord, SeaOrmQuestionRepository};
use async_trait::async_trait;
use chrono::{NaiveDateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder,
};
use std::collections::HashMap;
use std::str::FromStr;
use vpmp_core::domain::{CategoryId, PmpId};

const ENTITY: &str = "Question Category";

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryRecord {
    pub id: CategoryId,
    pub name: String,
    pub pmp_id: PmpId,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryDetail {
    pub category: CategoryRecord,
    pub questions: Vec<QuestionRecord>,
}

#[derive(Debug, Clone)]
pub struct NewCategory {
    pub name: String,
    pub pmp_id: PmpId,
}

#[derive(Debug, Clone, Default)]
pub struct CategoryChanges {
    pub name: Option<String>,
    pub pmp_id: Option<PmpId>,
}

#[async_trait]
pub trait QuestionCategoryRepository: Send + Sync {
    async fn create(&self, new_category: NewCategory) -> Result<CategoryRecord>;
    async fn find_all(&self, pmp_id: Option<PmpId>) -> Result<Vec<CategoryDetail>>;
    async fn find_by_id(&self, category_id: CategoryId) -> Result<CategoryDetail>;
    async fn update(&self, category_id: CategoryId, changes: CategoryChanges)
    -> Result<CategoryRecord>;
    async fn delete(&self, category_id: CategoryId) -> Result<()>;
}

#[derive(Clone)]
pub struct SeaOrmQuestionCategoryRepository {
    db: DatabaseConnection,
}

impl SeaOrmQuestionCategoryRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub(crate) fn map_model(model: question_category::Model) -> Result<CategoryRecord> {
        let id = CategoryId::from_str(&model.id).map_err(|e| {
            RepositoryError::Corrupt(format!("invalid question_category.id '{}': {e}", model.id))
        })?;
        let pmp_id = PmpId::from_str(&model.pmp_id).map_err(|e| {
            RepositoryError::Corrupt(format!(
                "invalid question_category.pmp_id '{}': {e}",
                model.pmp_id
            ))
        })?;

        Ok(CategoryRecord {
            id,
            name: model.name,
            pmp_id,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }

    /// Attaches each category's questions, loaded with a single query.
    pub(crate) async fn with_questions(
        db: &DatabaseConnection,
        categories: Vec<question_category::Model>,
    ) -> Result<Vec<CategoryDetail>> {
        if categories.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<String> = categories.iter().map(|category| category.id.clone()).collect();
        let mut questions: HashMap<String, Vec<QuestionRecord>> = HashMap::new();
        for model in question::Entity::find()
            .filter(question::Column::QuestionCategoryId.is_in(ids))
            .order_by_asc(question::Column::CreatedAt)
            .order_by_asc(question::Column::Id)
            .all(db)
            .await?
        {
            let category_id = model.question_category_id.clone();
            let record = SeaOrmQuestionRepository::map_model(model)?;
            questions.entry(category_id).or_default().push(record);
        }

        categories
            .into_iter()
            .map(|model| {
                let category_questions = questions.remove(&model.id).unwrap_or_default();
                Self::map_model(model).map(|category| CategoryDetail {
                    category,
                    questions: category_questions,
                })
            })
            .collect()
    }

    async fn ensure_pmp_exists(&self, pmp_id: PmpId) -> Result<()> {
        pmp::Entity::find_by_id(pmp_id.to_string())
            .one(&self.db)
            .await?
            .ok_or_else(|| RepositoryError::not_found("PMP", pmp_id))?;
        Ok(())
    }

    async fn find_model(&self, category_id: CategoryId) -> Result<question_category::Model> {
        question_category::Entity::find_by_id(category_id.to_string())
            .one(&self.db)
            .await?
            .ok_or_else(|| RepositoryError::not_found(ENTITY, category_id))
    }
}

#[async_trait]
impl QuestionCategoryRepository for SeaOrmQuestionCategoryRepository {
    #[tracing::instrument(skip(self, new_category), fields(pmp_id = %new_category.pmp_id))]
    async fn create(&self, new_category: NewCategory) -> Result<CategoryRecord> {
        self.ensure_pmp_exists(new_category.pmp_id).await?;

        let id = CategoryId::new();
        let now = Utc::now().naive_utc();
        let active_model = question_category::ActiveModel {
            id: Set(id.to_string()),
            name: Set(new_category.name),
            pmp_id: Set(new_category.pmp_id.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = active_model.insert(&self.db).await?;
        Self::map_model(model)
    }

    async fn find_all(&self, pmp_id: Option<PmpId>) -> Result<Vec<CategoryDetail>> {
        let mut query = question_category::Entity::find();
        if let Some(pmp_id) = pmp_id {
            query = query.filter(question_category::Column::PmpId.eq(pmp_id.to_string()));
        }

        let models = query
            .order_by_asc(question_category::Column::CreatedAt)
            .order_by_asc(question_category::Column::Id)
            .all(&self.db)
            .await?;

        Self::with_questions(&self.db, models).await
    }

    async fn find_by_id(&self, category_id: CategoryId) -> Result<CategoryDetail> {
        let model = self.find_model(category_id).await?;

        let mut details = Self::with_questions(&self.db, vec![model]).await?;
        details
            .pop()
            .ok_or_else(|| RepositoryError::not_found(ENTITY, category_id))
    }

    #[tracing::instrument(skip(self, changes))]
    async fn update(
        &self,
        category_id: CategoryId,
        changes: CategoryChanges,
    ) -> Result<CategoryRecord> {
        let model = self.find_model(category_id).await?;
        if let Some(pmp_id) = changes.pmp_id {
            self.ensure_pmp_exists(pmp_id).await?;
        }

        let mut active_model: question_category::ActiveModel = model.into();
        if let Some(name) = changes.name {
            active_model.name = Set(name);
        }
        if let Some(pmp_id) = changes.pmp_id {
            active_model.pmp_id = Set(pmp_id.to_string());
        }
        active_model.updated_at = Set(Utc::now().naive_utc());

        let updated = active_model.update(&self.db).await?;
        Self::map_model(updated)
    }

    #[tracing::instrument(skip(self))]
    async fn delete(&self, category_id: CategoryId) -> Result<()> {
        let result = question_category::Entity::delete_by_id(category_id.to_string())
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(RepositoryError::not_found(ENTITY, category_id));
        }
        Ok(())
    }
}
