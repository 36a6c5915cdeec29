use crate::entity::{classroom, pmp, question_category, user};
use crate::error::{RepositoryError, Result};
use crate::repository::classroom_repository::{ClassroomRecord, SeaOrmClassroomRepository};
use crate::repository::question_category_repository::{
    CategoryDetail, SeaOrmQuestionCategoryRepository,
};
use crate::repository::user_repository::SeaOrmUserRepository;
use async_trait::async_trait;
use chrono::{NaiveDateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder,
};
use std::str::FromStr;
use tracing::info;
use vpmp_core::domain::{ClassroomId, PmpId, UserId, UserRole};

const ENTITY: &str = "PMP";

#[derive(Debug, Clone, PartialEq)]
pub struct PmpRecord {
    pub id: PmpId,
    pub title: String,
    pub description: String,
    pub annonce_of_the_problem: String,
    pub professor_id: Option<UserId>,
    pub classroom_id: ClassroomId,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// A PMP with its classroom and every category with its questions.
#[derive(Debug, Clone, PartialEq)]
pub struct PmpDetail {
    pub pmp: PmpRecord,
    pub classroom: ClassroomRecord,
    pub categories: Vec<CategoryDetail>,
}

#[derive(Debug, Clone)]
pub struct NewPmp {
    pub title: String,
    pub description: String,
    pub annonce_of_the_problem: String,
    pub classroom_id: ClassroomId,
    pub professor_id: Option<UserId>,
}

#[derive(Debug, Clone, Default)]
pub struct PmpChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub annonce_of_the_problem: Option<String>,
    pub classroom_id: Option<ClassroomId>,
    pub professor_id: Option<UserId>,
}

#[async_trait]
pub trait PmpRepository: Send + Sync {
    async fn create(&self, new_pmp: NewPmp) -> Result<PmpRecord>;
    async fn find_all(&self, classroom_id: Option<ClassroomId>) -> Result<Vec<PmpRecord>>;
    async fn find_by_id(&self, pmp_id: PmpId) -> Result<PmpDetail>;
    async fn update(&self, pmp_id: PmpId, changes: PmpChanges) -> Result<PmpRecord>;
    async fn delete(&self, pmp_id: PmpId) -> Result<()>;
}

#[derive(Clone)]
pub struct SeaOrmPmpRepository {
    db: DatabaseConnection,
}

impl SeaOrmPmpRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn map_model(model: pmp::Model) -> Result<PmpRecord> {
        let id = PmpId::from_str(&model.id)
            .map_err(|e| RepositoryError::Corrupt(format!("invalid pmp.id '{}': {e}", model.id)))?;
        let classroom_id = ClassroomId::from_str(&model.classroom_id).map_err(|e| {
            RepositoryError::Corrupt(format!(
                "invalid pmp.classroom_id '{}': {e}",
                model.classroom_id
            ))
        })?;
        let professor_id = model
            .professor_id
            .as_deref()
            .map(UserId::from_str)
            .transpose()
            .map_err(|e| RepositoryError::Corrupt(format!("invalid pmp.professor_id: {e}")))?;

        Ok(PmpRecord {
            id,
            title: model.title,
            description: model.description,
            annonce_of_the_problem: model.annonce_of_the_problem,
            professor_id,
            classroom_id,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }

    async fn find_classroom(&self, classroom_id: &str) -> Result<classroom::Model> {
        classroom::Entity::find_by_id(classroom_id.to_string())
            .one(&self.db)
            .await?
            .ok_or_else(|| RepositoryError::not_found("Classroom", classroom_id))
    }

    async fn ensure_professor_exists(&self, professor_id: UserId) -> Result<()> {
        let model = user::Entity::find_by_id(professor_id.to_string())
            .one(&self.db)
            .await?
            .ok_or_else(|| RepositoryError::not_found("Professor", professor_id))?;
        if model.role != SeaOrmUserRepository::map_role_code(UserRole::Professor) {
            return Err(RepositoryError::Validation(format!(
                "User with ID \"{professor_id}\" is not a professor"
            )));
        }
        Ok(())
    }

    async fn find_model(&self, pmp_id: PmpId) -> Result<pmp::Model> {
        pmp::Entity::find_by_id(pmp_id.to_string())
            .one(&self.db)
            .await?
            .ok_or_else(|| RepositoryError::not_found(ENTITY, pmp_id))
    }
}

#[async_trait]
impl PmpRepository for SeaOrmPmpRepository {
    #[tracing::instrument(skip(self, new_pmp), fields(classroom_id = %new_pmp.classroom_id))]
    async fn create(&self, new_pmp: NewPmp) -> Result<PmpRecord> {
        self.find_classroom(&new_pmp.classroom_id.to_string())
            .await?;
        if let Some(professor_id) = new_pmp.professor_id {
            self.ensure_professor_exists(professor_id).await?;
        }

        let id = PmpId::new();
        let now = Utc::now().naive_utc();
        let active_model = pmp::ActiveModel {
            id: Set(id.to_string()),
            title: Set(new_pmp.title),
            description: Set(new_pmp.description),
            annonce_of_the_problem: Set(new_pmp.annonce_of_the_problem),
            professor_id: Set(new_pmp.professor_id.map(|id| id.to_string())),
            classroom_id: Set(new_pmp.classroom_id.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = active_model.insert(&self.db).await?;
        info!(pmp_id = %id, "pmp created");
        Self::map_model(model)
    }

    async fn find_all(&self, classroom_id: Option<ClassroomId>) -> Result<Vec<PmpRecord>> {
        let mut query = pmp::Entity::find();
        if let Some(classroom_id) = classroom_id {
            query = query.filter(pmp::Column::ClassroomId.eq(classroom_id.to_string()));
        }

        let models = query
            .order_by_asc(pmp::Column::CreatedAt)
            .order_by_asc(pmp::Column::Id)
            .all(&self.db)
            .await?;

        models.into_iter().map(Self::map_model).collect()
    }

    async fn find_by_id(&self, pmp_id: PmpId) -> Result<PmpDetail> {
        let model = self.find_model(pmp_id).await?;
        let classroom = self.find_classroom(&model.classroom_id).await?;

        let categories = question_category::Entity::find()
            .filter(question_category::Column::PmpId.eq(model.id.clone()))
            .order_by_asc(question_category::Column::CreatedAt)
            .order_by_asc(question_category::Column::Id)
            .all(&self.db)
            .await?;
        let categories =
            SeaOrmQuestionCategoryRepository::with_questions(&self.db, categories).await?;

        Ok(PmpDetail {
            pmp: Self::map_model(model)?,
            classroom: SeaOrmClassroomRepository::map_model(classroom)?,
            categories,
        })
    }

    #[tracing::instrument(skip(self, changes))]
    async fn update(&self, pmp_id: PmpId, changes: PmpChanges) -> Result<PmpRecord> {
        let model = self.find_model(pmp_id).await?;
        if let Some(classroom_id) = changes.classroom_id {
            self.find_classroom(&classroom_id.to_string()).await?;
        }
        if let Some(professor_id) = changes.professor_id {
            self.ensure_professor_exists(professor_id).await?;
        }

        let mut active_model: pmp::ActiveModel = model.into();
        if let Some(title) = changes.title {
            active_model.title = Set(title);
        }
        if let Some(description) = changes.description {
            active_model.description = Set(description);
        }
        if let Some(annonce) = changes.annonce_of_the_problem {
            active_model.annonce_of_the_problem = Set(annonce);
        }
        if let Some(classroom_id) = changes.classroom_id {
            active_model.classroom_id = Set(classroom_id.to_string());
        }
        if let Some(professor_id) = changes.professor_id {
            active_model.professor_id = Set(Some(professor_id.to_string()));
        }
        active_model.updated_at = Set(Utc::now().naive_utc());

        let updated = active_model.update(&self.db).await?;
        Self::map_model(updated)
    }

    /// Deletes the PMP; the database cascades to its categories and questions.
    #[tracing::instrument(skip(self))]
    async fn delete(&self, pmp_id: PmpId) -> Result<()> {
        let result = pmp::Entity::delete_by_id(pmp_id.to_string())
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(RepositoryError::not_found(ENTITY, pmp_id));
        }
        Ok(())
    }
}
