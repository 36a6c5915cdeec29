pub mod classroom_repository;
pub mod pmp_repository;
pub mod question_category_repository;
pub mod question_repository;
pub mod user_repository;

pub use classroom_repository::{
    ClassroomChanges, ClassroomRecord, ClassroomRepository, NewClassroom,
    SeaOrmClassroomRepository,
};
pub use pmp_repository::{
    NewPmp, PmpChanges, PmpDetail, PmpRecord, PmpRepository, SeaOrmPmpRepository,
};
pub use question_category_repository::{
    CategoryChanges, CategoryDetail, CategoryRecord, NewCategory, QuestionCategoryRepository,
    SeaOrmQuestionCategoryRepository,
};
pub use question_repository::{
    BonusLinkRecord, LinkDirection, NewBonusLink, NewQuestion, QuestionChanges, QuestionDetail,
    QuestionRecord, QuestionRepository, SeaOrmQuestionRepository,
};
pub use user_repository::{NewUser, SeaOrmUserRepository, UserRecord, UserRepository};
