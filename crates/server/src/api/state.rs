//! 统一的应用状态。

use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::repository::{
    ClassroomRepository, PmpRepository, QuestionCategoryRepository, QuestionRepository,
    SeaOrmClassroomRepository, SeaOrmPmpRepository, SeaOrmQuestionCategoryRepository,
    SeaOrmQuestionRepository, SeaOrmUserRepository, UserRepository,
};

/// 统一的应用状态，包含所有路由共享的仓储。
#[derive(Clone)]
pub struct AppState {
    pub classrooms: Arc<dyn ClassroomRepository>,
    pub pmps: Arc<dyn PmpRepository>,
    pub categories: Arc<dyn QuestionCategoryRepository>,
    pub questions: Arc<dyn QuestionRepository>,
    pub users: Arc<dyn UserRepository>,
}

impl AppState {
    /// 基于同一个数据库连接创建全部 SeaORM 仓储。
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            classrooms: Arc::new(SeaOrmClassroomRepository::new(db.clone())),
            pmps: Arc::new(SeaOrmPmpRepository::new(db.clone())),
            categories: Arc::new(SeaOrmQuestionCategoryRepository::new(db.clone())),
            questions: Arc::new(SeaOrmQuestionRepository::new(db.clone())),
            users: Arc::new(SeaOrmUserRepository::new(db)),
        }
    }
}
