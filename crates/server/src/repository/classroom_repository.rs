use crate::entity::classroom;
use crate::error::{RepositoryError, Result};
use async_trait::async_trait;
use chrono::{NaiveDateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, DatabaseConnection, DbErr, EntityTrait, QueryOrder,
};
use std::str::FromStr;
use tracing::error;
use vpmp_core::domain::ClassroomId;

const ENTITY: &str = "Classroom";

#[derive(Debug, Clone, PartialEq)]
pub struct ClassroomRecord {
    pub id: ClassroomId,
    pub name: String,
    pub grade: i32,
    pub major: String,
    pub description: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone)]
pub struct NewClassroom {
    pub name: String,
    pub grade: i32,
    pub major: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ClassroomChanges {
    pub name: Option<String>,
    pub grade: Option<i32>,
    pub major: Option<String>,
    pub description: Option<String>,
}

#[async_trait]
pub trait ClassroomRepository: Send + Sync {
    async fn create(&self, new_classroom: NewClassroom) -> Result<ClassroomRecord>;
    async fn find_all(&self) -> Result<Vec<ClassroomRecord>>;
    async fn find_by_id(&self, classroom_id: ClassroomId) -> Result<ClassroomRecord>;
    async fn update(
        &self,
        classroom_id: ClassroomId,
        changes: ClassroomChanges,
    ) -> Result<ClassroomRecord>;
    async fn delete(&self, classroom_id: ClassroomId) -> Result<()>;
}

#[derive(Clone)]
pub struct SeaOrmClassroomRepository {
    db: DatabaseConnection,
}

impl SeaOrmClassroomRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub(crate) fn map_model(model: classroom::Model) -> Result<ClassroomRecord> {
        let id = ClassroomId::from_str(&model.id).map_err(|e| {
            RepositoryError::Corrupt(format!("invalid classroom.id '{}': {e}", model.id))
        })?;

        Ok(ClassroomRecord {
            id,
            name: model.name,
            grade: model.grade,
            major: model.major,
            description: model.description,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }

    fn map_write_error(err: DbErr, action: &str) -> RepositoryError {
        if RepositoryError::is_unique_violation(&err) {
            return RepositoryError::Conflict("Classroom already exists".to_string());
        }
        error!(error = %err, "{action} classroom failed");
        RepositoryError::Database(err)
    }
}

#[async_trait]
impl ClassroomRepository for SeaOrmClassroomRepository {
    #[tracing::instrument(skip(self, new_classroom), fields(name = %new_classroom.name))]
    async fn create(&self, new_classroom: NewClassroom) -> Result<ClassroomRecord> {
        let id = ClassroomId::new();
        let now = Utc::now().naive_utc();

        let active_model = classroom::ActiveModel {
            id: Set(id.to_string()),
            name: Set(new_classroom.name),
            grade: Set(new_classroom.grade),
            major: Set(new_classroom.major),
            description: Set(new_classroom.description),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = active_model
            .insert(&self.db)
            .await
            .map_err(|e| Self::map_write_error(e, "create"))?;
        Self::map_model(model)
    }

    async fn find_all(&self) -> Result<Vec<ClassroomRecord>> {
        let models = classroom::Entity::find()
            .order_by_asc(classroom::Column::CreatedAt)
            .order_by_asc(classroom::Column::Id)
            .all(&self.db)
            .await?;

        models.into_iter().map(Self::map_model).collect()
    }

    async fn find_by_id(&self, classroom_id: ClassroomId) -> Result<ClassroomRecord> {
        let model = classroom::Entity::find_by_id(classroom_id.to_string())
            .one(&self.db)
            .await?
            .ok_or_else(|| RepositoryError::not_found(ENTITY, classroom_id))?;

        Self::map_model(model)
    }

    #[tracing::instrument(skip(self, changes))]
    async fn update(
        &self,
        classroom_id: ClassroomId,
        changes: ClassroomChanges,
    ) -> Result<ClassroomRecord> {
        let model = classroom::Entity::find_by_id(classroom_id.to_string())
            .one(&self.db)
            .await?
            .ok_or_else(|| RepositoryError::not_found(ENTITY, classroom_id))?;

        let mut active_model: classroom::ActiveModel = model.into();
        if let Some(name) = changes.name {
            active_model.name = Set(name);
        }
        if let Some(grade) = changes.grade {
            active_model.grade = Set(grade);
        }
        if let Some(major) = changes.major {
            active_model.major = Set(major);
        }
        if let Some(description) = changes.description {
            active_model.description = Set(Some(description));
        }
        active_model.updated_at = Set(Utc::now().naive_utc());

        let updated = active_model
            .update(&self.db)
            .await
            .map_err(|e| Self::map_write_error(e, "update"))?;
        Self::map_model(updated)
    }

    #[tracing::instrument(skip(self))]
    async fn delete(&self, classroom_id: ClassroomId) -> Result<()> {
        let result = classroom::Entity::delete_by_id(classroom_id.to_string())
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(RepositoryError::not_found(ENTITY, classroom_id));
        }
        Ok(())
    }
}
