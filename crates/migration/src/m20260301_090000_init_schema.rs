use sea_orm_migration::prelude::*;
use sea_orm_migration::schema::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(User::Table)
                    .if_not_exists()
                    .col(string_len(User::Id, 36).primary_key())
                    .col(string_len(User::Name, 100))
                    // One identity namespace for every role.
                    .col(string_len(User::Email, 255).unique_key())
                    .col(string_len(User::PasswordHash, 255))
                    // 0=admin, 1=professor, 2=student, 3=guest
                    .col(
                        small_integer(User::Role)
                            .check(Expr::col(User::Role).gte(0))
                            .check(Expr::col(User::Role).lte(3)),
                    )
                    .col(timestamp(User::CreatedAt).default(Expr::current_timestamp()))
                    .col(timestamp(User::UpdatedAt).default(Expr::current_timestamp()))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Classroom::Table)
                    .if_not_exists()
                    .col(string_len(Classroom::Id, 36).primary_key())
                    .col(string_len(Classroom::Name, 200).unique_key())
                    .col(integer(Classroom::Grade))
                    .col(string_len(Classroom::Major, 200))
                    .col(text_null(Classroom::Description))
                    .col(timestamp(Classroom::CreatedAt).default(Expr::current_timestamp()))
                    .col(timestamp(Classroom::UpdatedAt).default(Expr::current_timestamp()))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Pmp::Table)
                    .if_not_exists()
                    .col(string_len(Pmp::Id, 36).primary_key())
                    .col(string_len(Pmp::Title, 255))
                    .col(text(Pmp::Description))
                    .col(text(Pmp::AnnonceOfTheProblem))
                    .col(string_len_null(Pmp::ProfessorId, 36))
                    .col(string_len(Pmp::ClassroomId, 36))
                    .col(timestamp(Pmp::CreatedAt).default(Expr::current_timestamp()))
                    .col(timestamp(Pmp::UpdatedAt).default(Expr::current_timestamp()))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-pmp-classroom_id")
                            .from(Pmp::Table, Pmp::ClassroomId)
                            .to(Classroom::Table, Classroom::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-pmp-professor_id")
                            .from(Pmp::Table, Pmp::ProfessorId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(QuestionCategory::Table)
                    .if_not_exists()
                    .col(string_len(QuestionCategory::Id, 36).primary_key())
                    .col(string_len(QuestionCategory::Name, 200))
                    .col(string_len(QuestionCategory::PmpId, 36))
                    .col(timestamp(QuestionCategory::CreatedAt).default(Expr::current_timestamp()))
                    .col(timestamp(QuestionCategory::UpdatedAt).default(Expr::current_timestamp()))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-question_category-pmp_id")
                            .from(QuestionCategory::Table, QuestionCategory::PmpId)
                            .to(Pmp::Table, Pmp::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Question::Table)
                    .if_not_exists()
                    .col(string_len(Question::Id, 36).primary_key())
                    .col(text(Question::QuestionText))
                    // 0=normal_question, 1=ask_for_medical_picture
                    .col(
                        small_integer(Question::QuestionType)
                            .default(0)
                            .check(Expr::col(Question::QuestionType).gte(0))
                            .check(Expr::col(Question::QuestionType).lte(1)),
                    )
                    .col(text(Question::Response))
                    .col(string_len_null(Question::MedicalPictureUrl, 2048))
                    .col(double(Question::Score).check(Expr::col(Question::Score).gte(0.0)))
                    .col(string_len(Question::QuestionCategoryId, 36))
                    .col(timestamp(Question::CreatedAt).default(Expr::current_timestamp()))
                    .col(timestamp(Question::UpdatedAt).default(Expr::current_timestamp()))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-question-question_category_id")
                            .from(Question::Table, Question::QuestionCategoryId)
                            .to(QuestionCategory::Table, QuestionCategory::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(QuestionBonusLink::Table)
                    .if_not_exists()
                    .col(string_len(QuestionBonusLink::Id, 36).primary_key())
                    .col(string_len(QuestionBonusLink::SourceQuestionId, 36))
                    .col(string_len(QuestionBonusLink::TargetQuestionId, 36))
                    // 0=linked_to_previous_response, 1=linked_to_next_response, 2=related_to_topic
                    .col(
                        small_integer(QuestionBonusLink::BonusType)
                            .default(2)
                            .check(Expr::col(QuestionBonusLink::BonusType).gte(0))
                            .check(Expr::col(QuestionBonusLink::BonusType).lte(2)),
                    )
                    .col(double(QuestionBonusLink::BonusValue).default(0.0))
                    .col(timestamp(QuestionBonusLink::CreatedAt).default(Expr::current_timestamp()))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-question_bonus_link-source_question_id")
                            .from(QuestionBonusLink::Table, QuestionBonusLink::SourceQuestionId)
                            .to(Question::Table, Question::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-question_bonus_link-target_question_id")
                            .from(QuestionBonusLink::Table, QuestionBonusLink::TargetQuestionId)
                            .to(Question::Table, Question::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_pmp_classroom_id")
                    .table(Pmp::Table)
                    .col(Pmp::ClassroomId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_question_category_pmp_id")
                    .table(QuestionCategory::Table)
                    .col(QuestionCategory::PmpId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_question_question_category_id")
                    .table(Question::Table)
                    .col(Question::QuestionCategoryId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_question_bonus_link_source")
                    .table(QuestionBonusLink::Table)
                    .col(QuestionBonusLink::SourceQuestionId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_question_bonus_link_target")
                    .table(QuestionBonusLink::Table)
                    .col(QuestionBonusLink::TargetQuestionId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(QuestionBonusLink::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Question::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(QuestionCategory::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Pmp::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Classroom::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(User::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum User {
    Table,
    Id,
    Name,
    Email,
    PasswordHash,
    Role,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Classroom {
    Table,
    Id,
    Name,
    Grade,
    Major,
    Description,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Pmp {
    Table,
    Id,
    Title,
    Description,
    AnnonceOfTheProblem,
    ProfessorId,
    ClassroomId,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum QuestionCategory {
    Table,
    Id,
    Name,
    PmpId,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Question {
    Table,
    Id,
    QuestionText,
    QuestionType,
    Response,
    MedicalPictureUrl,
    Score,
    QuestionCategoryId,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum QuestionBonusLink {
    Table,
    Id,
    SourceQuestionId,
    TargetQuestionId,
    BonusType,
    BonusValue,
    CreatedAt,
}
