use crate::entity::{question, question_bonus_link, question_category};
use crate::error::{RepositoryError, Result};
use async_trait::async_trait;
use chrono::{NaiveDateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder,
};
use std::collections::{HashMap, HashSet};
use std::str::FromStr;
use tracing::{error, info};
use vpmp_core::domain::{
    BonusLinkId, BonusType, CategoryId, PmpId, QuestionId, QuestionScore, QuestionType,
};

const ENTITY: &str = "Question";

#[derive(Debug, Clone, PartialEq)]
pub struct QuestionRecord {
    pub id: QuestionId,
    pub question_text: String,
    pub question_type: QuestionType,
    pub response: String,
    pub medical_picture_url: Option<String>,
    pub score: QuestionScore,
    pub question_category_id: CategoryId,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// A question with the questions it links to (outgoing bonus links).
#[derive(Debug, Clone, PartialEq)]
pub struct QuestionDetail {
    pub question: QuestionRecord,
    pub linked_questions: Vec<QuestionRecord>,
}

#[derive(Debug, Clone)]
pub struct NewQuestion {
    pub question_text: String,
    pub question_type: QuestionType,
    pub response: String,
    pub medical_picture_url: Option<String>,
    pub score: QuestionScore,
    pub question_category_id: CategoryId,
}

#[derive(Debug, Clone, Default)]
pub struct QuestionChanges {
    pub question_text: Option<String>,
    pub question_type: Option<QuestionType>,
    pub response: Option<String>,
    /// `Some(None)` clears the stored picture.
    #[allow(clippy::option_option)]
    pub medical_picture_url: Option<Option<String>>,
    pub score: Option<QuestionScore>,
    pub question_category_id: Option<CategoryId>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BonusLinkRecord {
    pub id: BonusLinkId,
    pub source_question_id: QuestionId,
    pub target_question_id: QuestionId,
    pub bonus_type: BonusType,
    pub bonus_value: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct NewBonusLink {
    pub bonus_type: BonusType,
    pub bonus_value: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkDirection {
    /// Questions this question links to.
    Outgoing,
    /// Questions linking to this question.
    Incoming,
    /// Union of both directions, each question once.
    Both,
}

#[async_trait]
pub trait QuestionRepository: Send + Sync {
    async fn create(&self, new_question: NewQuestion) -> Result<QuestionRecord>;
    async fn find_all(&self, category_id: Option<CategoryId>) -> Result<Vec<QuestionDetail>>;
    async fn find_by_id(&self, question_id: QuestionId) -> Result<QuestionDetail>;
    async fn find_by_pmp(&self, pmp_id: PmpId) -> Result<Vec<QuestionDetail>>;
    async fn update(&self, question_id: QuestionId, changes: QuestionChanges)
    -> Result<QuestionDetail>;
    async fn delete(&self, question_id: QuestionId) -> Result<()>;
    async fn add_linked_question(
        &self,
        question_id: QuestionId,
        linked_question_id: QuestionId,
        bonus: NewBonusLink,
    ) -> Result<QuestionDetail>;
    async fn remove_linked_question(
        &self,
        question_id: QuestionId,
        linked_question_id: QuestionId,
    ) -> Result<QuestionDetail>;
    async fn find_linked(
        &self,
        question_id: QuestionId,
        direction: LinkDirection,
    ) -> Result<Vec<QuestionRecord>>;
    async fn list_bonus_links(&self, question_id: QuestionId) -> Result<Vec<BonusLinkRecord>>;
}

#[derive(Clone)]
pub struct SeaOrmQuestionRepository {
    db: DatabaseConnection,
}

impl SeaOrmQuestionRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn map_question_type(code: i16) -> Result<QuestionType> {
        match code {
            0 => Ok(QuestionType::NormalQuestion),
            1 => Ok(QuestionType::AskForMedicalPicture),
            _ => Err(RepositoryError::Corrupt(format!(
                "invalid question.question_type code: {code}"
            ))),
        }
    }

    fn map_question_type_code(question_type: QuestionType) -> i16 {
        match question_type {
            QuestionType::NormalQuestion => 0,
            QuestionType::AskForMedicalPicture => 1,
        }
    }

    fn map_bonus_type(code: i16) -> Result<BonusType> {
        match code {
            0 => Ok(BonusType::LinkedToPreviousResponse),
            1 => Ok(BonusType::LinkedToNextResponse),
            2 => Ok(BonusType::RelatedToTopic),
            _ => Err(RepositoryError::Corrupt(format!(
                "invalid question_bonus_link.bonus_type code: {code}"
            ))),
        }
    }

    fn map_bonus_type_code(bonus_type: BonusType) -> i16 {
        match bonus_type {
            BonusType::LinkedToPreviousResponse => 0,
            BonusType::LinkedToNextResponse => 1,
            BonusType::RelatedToTopic => 2,
        }
    }

    pub(crate) fn map_model(model: question::Model) -> Result<QuestionRecord> {
        let id = QuestionId::from_str(&model.id).map_err(|e| {
            RepositoryError::Corrupt(format!("invalid question.id '{}': {e}", model.id))
        })?;
        let question_category_id = CategoryId::from_str(&model.question_category_id).map_err(|e| {
            RepositoryError::Corrupt(format!(
                "invalid question.question_category_id '{}': {e}",
                model.question_category_id
            ))
        })?;
        let score = QuestionScore::new(model.score)
            .map_err(|e| RepositoryError::Corrupt(format!("question '{}': {e}", model.id)))?;

        Ok(QuestionRecord {
            id,
            question_text: model.question_text,
            question_type: Self::map_question_type(model.question_type)?,
            response: model.response,
            medical_picture_url: model.medical_picture_url,
            score,
            question_category_id,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }

    fn map_link(model: question_bonus_link::Model) -> Result<BonusLinkRecord> {
        let parse = |column: &str, value: &str| {
            QuestionId::from_str(value).map_err(|e| {
                RepositoryError::Corrupt(format!(
                    "invalid question_bonus_link.{column} '{value}': {e}"
                ))
            })
        };

        Ok(BonusLinkRecord {
            id: BonusLinkId::from_str(&model.id).map_err(|e| {
                RepositoryError::Corrupt(format!("invalid question_bonus_link.id '{}': {e}", model.id))
            })?,
            source_question_id: parse("source_question_id", &model.source_question_id)?,
            target_question_id: parse("target_question_id", &model.target_question_id)?,
            bonus_type: Self::map_bonus_type(model.bonus_type)?,
            bonus_value: model.bonus_value,
        })
    }

    fn ensure_picture(question_type: QuestionType, medical_picture_url: Option<&str>) -> Result<()> {
        let has_picture = medical_picture_url.is_some_and(|url| !url.trim().is_empty());
        if question_type.requires_medical_picture() && !has_picture {
            return Err(RepositoryError::Validation(format!(
                "medicalPictureUrl is required for {question_type} questions"
            )));
        }
        Ok(())
    }

    async fn ensure_category_exists(&self, category_id: CategoryId) -> Result<()> {
        question_category::Entity::find_by_id(category_id.to_string())
            .one(&self.db)
            .await?
            .ok_or_else(|| RepositoryError::not_found("Question Category", category_id))?;
        Ok(())
    }

    async fn find_model(&self, question_id: QuestionId) -> Result<question::Model> {
        question::Entity::find_by_id(question_id.to_string())
            .one(&self.db)
            .await?
            .ok_or_else(|| RepositoryError::not_found(ENTITY, question_id))
    }

    /// Loads the outgoing linked questions of every id in `source_ids`, keyed by
    /// source id, in link creation order.
    async fn load_linked(
        &self,
        source_ids: &[String],
    ) -> Result<HashMap<String, Vec<QuestionRecord>>> {
        if source_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let links = question_bonus_link::Entity::find()
            .filter(question_bonus_link::Column::SourceQuestionId.is_in(source_ids.to_vec()))
            .order_by_asc(question_bonus_link::Column::CreatedAt)
            .order_by_asc(question_bonus_link::Column::Id)
            .all(&self.db)
            .await?;

        let target_ids: HashSet<String> = links
            .iter()
            .map(|link| link.target_question_id.clone())
            .collect();
        let targets = self.records_by_id(target_ids).await?;

        let mut linked: HashMap<String, Vec<QuestionRecord>> = HashMap::new();
        for link in links {
            if let Some(target) = targets.get(&link.target_question_id) {
                linked
                    .entry(link.source_question_id)
                    .or_default()
                    .push(target.clone());
            }
        }
        Ok(linked)
    }

    async fn with_linked(&self, models: Vec<question::Model>) -> Result<Vec<QuestionDetail>> {
        let ids: Vec<String> = models.iter().map(|model| model.id.clone()).collect();
        let mut linked = self.load_linked(&ids).await?;

        models
            .into_iter()
            .map(|model| {
                let linked_questions = linked.remove(&model.id).unwrap_or_default();
                Self::map_model(model).map(|question| QuestionDetail {
                    question,
                    linked_questions,
                })
            })
            .collect()
    }

    async fn records_by_id(
        &self,
        ids: impl IntoIterator<Item = String>,
    ) -> Result<HashMap<String, QuestionRecord>> {
        let ids: Vec<String> = ids.into_iter().collect();
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        question::Entity::find()
            .filter(question::Column::Id.is_in(ids))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|model| {
                let id = model.id.clone();
                Self::map_model(model).map(|record| (id, record))
            })
            .collect()
    }

    async fn detail(&self, model: question::Model) -> Result<QuestionDetail> {
        let mut details = self.with_linked(vec![model]).await?;
        details
            .pop()
            .ok_or_else(|| RepositoryError::Corrupt("question detail lost while loading links".into()))
    }

    async fn incoming(&self, question_id: QuestionId) -> Result<Vec<QuestionRecord>> {
        let links = question_bonus_link::Entity::find()
            .filter(question_bonus_link::Column::TargetQuestionId.eq(question_id.to_string()))
            .order_by_asc(question_bonus_link::Column::CreatedAt)
            .order_by_asc(question_bonus_link::Column::Id)
            .all(&self.db)
            .await?;

        let source_ids: Vec<String> = links
            .iter()
            .map(|link| link.source_question_id.clone())
            .collect();
        let mut sources = self.records_by_id(source_ids.clone()).await?;

        Ok(source_ids
            .into_iter()
            .filter_map(|id| sources.remove(&id))
            .collect())
    }
}

#[async_trait]
impl QuestionRepository for SeaOrmQuestionRepository {
    #[tracing::instrument(skip(self, new_question), fields(category_id = %new_question.question_category_id))]
    async fn create(&self, new_question: NewQuestion) -> Result<QuestionRecord> {
        let category_id = new_question.question_category_id;
        Self::ensure_picture(
            new_question.question_type,
            new_question.medical_picture_url.as_deref(),
        )?;
        self.ensure_category_exists(category_id).await?;

        let id = QuestionId::new();
        let now = Utc::now().naive_utc();
        let active_model = question::ActiveModel {
            id: Set(id.to_string()),
            question_text: Set(new_question.question_text),
            question_type: Set(Self::map_question_type_code(new_question.question_type)),
            response: Set(new_question.response),
            medical_picture_url: Set(new_question.medical_picture_url),
            score: Set(new_question.score.value()),
            question_category_id: Set(category_id.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = active_model.insert(&self.db).await.map_err(|e| {
            if RepositoryError::is_foreign_key_violation(&e) {
                RepositoryError::not_found("Question Category", category_id)
            } else {
                error!(error = %e, "create question failed");
                RepositoryError::Database(e)
            }
        })?;
        Self::map_model(model)
    }

    async fn find_all(&self, category_id: Option<CategoryId>) -> Result<Vec<QuestionDetail>> {
        let mut query = question::Entity::find();
        if let Some(category_id) = category_id {
            query = query.filter(question::Column::QuestionCategoryId.eq(category_id.to_string()));
        }

        let models = query
            .order_by_asc(question::Column::CreatedAt)
            .order_by_asc(question::Column::Id)
            .all(&self.db)
            .await?;

        self.with_linked(models).await
    }

    async fn find_by_id(&self, question_id: QuestionId) -> Result<QuestionDetail> {
        let model = self.find_model(question_id).await?;
        self.detail(model).await
    }

    #[tracing::instrument(skip(self))]
    async fn find_by_pmp(&self, pmp_id: PmpId) -> Result<Vec<QuestionDetail>> {
        let category_ids: Vec<String> = question_category::Entity::find()
            .filter(question_category::Column::PmpId.eq(pmp_id.to_string()))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|category| category.id)
            .collect();

        if category_ids.is_empty() {
            return Ok(Vec::new());
        }

        let models = question::Entity::find()
            .filter(question::Column::QuestionCategoryId.is_in(category_ids))
            .order_by_asc(question::Column::CreatedAt)
            .order_by_asc(question::Column::Id)
            .all(&self.db)
            .await?;

        self.with_linked(models).await
    }

    #[tracing::instrument(skip(self, changes))]
    async fn update(
        &self,
        question_id: QuestionId,
        changes: QuestionChanges,
    ) -> Result<QuestionDetail> {
        let model = self.find_model(question_id).await?;

        let merged_type = changes.question_type.unwrap_or(
            Self::map_question_type(model.question_type)?,
        );
        let merged_picture = match &changes.medical_picture_url {
            Some(url) => url.as_deref(),
            None => model.medical_picture_url.as_deref(),
        };
        Self::ensure_picture(merged_type, merged_picture)?;

        if let Some(category_id) = changes.question_category_id {
            self.ensure_category_exists(category_id).await?;
        }

        let mut active_model: question::ActiveModel = model.into();
        if let Some(question_text) = changes.question_text {
            active_model.question_text = Set(question_text);
        }
        if let Some(question_type) = changes.question_type {
            active_model.question_type = Set(Self::map_question_type_code(question_type));
        }
        if let Some(response) = changes.response {
            active_model.response = Set(response);
        }
        if let Some(url) = changes.medical_picture_url {
            active_model.medical_picture_url = Set(url);
        }
        if let Some(score) = changes.score {
            active_model.score = Set(score.value());
        }
        if let Some(category_id) = changes.question_category_id {
            active_model.question_category_id = Set(category_id.to_string());
        }
        active_model.updated_at = Set(Utc::now().naive_utc());

        let updated = active_model.update(&self.db).await?;
        self.detail(updated).await
    }

    #[tracing::instrument(skip(self))]
    async fn delete(&self, question_id: QuestionId) -> Result<()> {
        let result = question::Entity::delete_by_id(question_id.to_string())
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(RepositoryError::not_found(ENTITY, question_id));
        }
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn add_linked_question(
        &self,
        question_id: QuestionId,
        linked_question_id: QuestionId,
        bonus: NewBonusLink,
    ) -> Result<QuestionDetail> {
        let model = self.find_model(question_id).await?;
        self.find_model(linked_question_id).await?;

        let link = question_bonus_link::ActiveModel {
            id: Set(BonusLinkId::new().to_string()),
            source_question_id: Set(question_id.to_string()),
            target_question_id: Set(linked_question_id.to_string()),
            bonus_type: Set(Self::map_bonus_type_code(bonus.bonus_type)),
            bonus_value: Set(bonus.bonus_value),
            created_at: Set(Utc::now().naive_utc()),
        };
        link.insert(&self.db).await?;
        info!(%question_id, %linked_question_id, "question linked");

        self.detail(model).await
    }

    #[tracing::instrument(skip(self))]
    async fn remove_linked_question(
        &self,
        question_id: QuestionId,
        linked_question_id: QuestionId,
    ) -> Result<QuestionDetail> {
        let model = self.find_model(question_id).await?;

        let result = question_bonus_link::Entity::delete_many()
            .filter(question_bonus_link::Column::SourceQuestionId.eq(question_id.to_string()))
            .filter(
                question_bonus_link::Column::TargetQuestionId.eq(linked_question_id.to_string()),
            )
            .exec(&self.db)
            .await?;
        info!(
            %question_id,
            %linked_question_id,
            removed = result.rows_affected,
            "question unlinked"
        );

        self.detail(model).await
    }

    async fn find_linked(
        &self,
        question_id: QuestionId,
        direction: LinkDirection,
    ) -> Result<Vec<QuestionRecord>> {
        let model = self.find_model(question_id).await?;

        match direction {
            LinkDirection::Outgoing => Ok(self.detail(model).await?.linked_questions),
            LinkDirection::Incoming => self.incoming(question_id).await,
            LinkDirection::Both => {
                let outgoing = self.detail(model).await?.linked_questions;
                let incoming = self.incoming(question_id).await?;

                let mut seen = HashSet::new();
                Ok(outgoing
                    .into_iter()
                    .chain(incoming)
                    .filter(|question| seen.insert(question.id))
                    .collect())
            }
        }
    }

    async fn list_bonus_links(&self, question_id: QuestionId) -> Result<Vec<BonusLinkRecord>> {
        self.find_model(question_id).await?;

        let links = question_bonus_link::Entity::find()
            .filter(question_bonus_link::Column::SourceQuestionId.eq(question_id.to_string()))
            .order_by_asc(question_bonus_link::Column::CreatedAt)
            .order_by_asc(question_bonus_link::Column::Id)
            .all(&self.db)
            .await?;

        links.into_iter().map(Self::map_link).collect()
    }
}
