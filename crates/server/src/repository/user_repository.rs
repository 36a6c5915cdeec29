use crate::entity::user;
use crate::error::{RepositoryError, Result};
use crate::password::hash_password;
use async_trait::async_trait;
use chrono::{NaiveDateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
};
use std::str::FromStr;
use tracing::{error, info};
use vpmp_core::domain::{UserId, UserRole};

const EMAIL_TAKEN: &str = "User with this email already exists";

#[derive(Debug, Clone, PartialEq)]
pub struct UserRecord {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn register(&self, new_user: NewUser, role: UserRole) -> Result<UserRecord>;
    async fn find_by_id(&self, user_id: UserId) -> Result<UserRecord>;
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>>;
}

#[derive(Clone)]
pub struct SeaOrmUserRepository {
    db: DatabaseConnection,
}

impl SeaOrmUserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn normalize_email(email: &str) -> String {
        email.trim().to_lowercase()
    }

    fn map_role(code: i16) -> Result<UserRole> {
        match code {
            0 => Ok(UserRole::Admin),
            1 => Ok(UserRole::Professor),
            2 => Ok(UserRole::Student),
            3 => Ok(UserRole::Guest),
            _ => Err(RepositoryError::Corrupt(format!(
                "invalid user.role code: {code}"
            ))),
        }
    }

    pub(crate) fn map_role_code(role: UserRole) -> i16 {
        match role {
            UserRole::Admin => 0,
            UserRole::Professor => 1,
            UserRole::Student => 2,
            UserRole::Guest => 3,
        }
    }

    fn map_model(model: user::Model) -> Result<UserRecord> {
        let id = UserId::from_str(&model.id)
            .map_err(|e| RepositoryError::Corrupt(format!("invalid user.id '{}': {e}", model.id)))?;

        Ok(UserRecord {
            id,
            name: model.name,
            email: model.email,
            role: Self::map_role(model.role)?,
            created_at: model.created_at,
        })
    }
}

#[async_trait]
impl UserRepository for SeaOrmUserRepository {
    #[tracing::instrument(skip(self, new_user))]
    async fn register(&self, new_user: NewUser, role: UserRole) -> Result<UserRecord> {
        let email = Self::normalize_email(&new_user.email);
        if self.find_by_email(&email).await?.is_some() {
            return Err(RepositoryError::Validation(EMAIL_TAKEN.to_string()));
        }

        let password_hash = hash_password(&new_user.password).map_err(|e| {
            error!(error = %e, "password hashing failed");
            RepositoryError::Password(e.to_string())
        })?;

        let id = UserId::new();
        let now = Utc::now().naive_utc();
        let active_model = user::ActiveModel {
            id: Set(id.to_string()),
            name: Set(new_user.name),
            email: Set(email),
            password_hash: Set(password_hash),
            role: Set(Self::map_role_code(role)),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = active_model.insert(&self.db).await.map_err(|e| {
            if RepositoryError::is_unique_violation(&e) {
                RepositoryError::Validation(EMAIL_TAKEN.to_string())
            } else {
                error!(error = %e, "register user failed");
                RepositoryError::Database(e)
            }
        })?;
        info!(user_id = %id, "user registered");
        Self::map_model(model)
    }

    async fn find_by_id(&self, user_id: UserId) -> Result<UserRecord> {
        let model = user::Entity::find_by_id(user_id.to_string())
            .one(&self.db)
            .await?
            .ok_or_else(|| RepositoryError::not_found("User", user_id))?;

        Self::map_model(model)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>> {
        let model = user::Entity::find()
            .filter(user::Column::Email.eq(Self::normalize_email(email)))
            .one(&self.db)
            .await?;

        model.map(Self::map_model).transpose()
    }
}
