use sea_orm_migration::prelude::*;

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m20260801_000001_create_tournaments"
    }
}


#[derive(Iden)]
enum Tournament {
    Table,
    Uuid,
    StartTime,
    EndTime,
    NumberOfQuestions,
    CreatorId,
    CourseExecutionId,
    CourseId,
    QuizId,
    IsCanceled,
    IsPrivate,
    Password,
}


#[derive(Iden)]
enum TournamentParticipant {
    Table,
    TournamentId,
    UserId,
}


#[derive(Iden)]
enum TopicConjunction {
    Table,
    Uuid,
    TournamentId,
}


#[derive(Iden)]
enum TopicConjunctionTopic {
    Table,
    ConjunctionId,
    TopicId,
    CourseId,
    Name,
}


#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.create_table(
            sea_query::Table::create()
                .table(Tournament::Table)
                .if_not_exists()
                .col(ColumnDef::new(Tournament::Uuid).uuid().not_null().primary_key())
                .col(ColumnDef::new(Tournament::StartTime).timestamp().not_null())
                .col(ColumnDef::new(Tournament::EndTime).timestamp().not_null())
                .col(ColumnDef::new(Tournament::NumberOfQuestions).integer().not_null())
                .col(ColumnDef::new(Tournament::CreatorId).uuid())
                .col(ColumnDef::new(Tournament::CourseExecutionId).uuid())
                .col(ColumnDef::new(Tournament::CourseId).uuid())
                .col(ColumnDef::new(Tournament::QuizId).uuid())
                .col(ColumnDef::new(Tournament::IsCanceled).boolean().not_null())
                .col(ColumnDef::new(Tournament::IsPrivate).boolean().not_null())
                .col(ColumnDef::new(Tournament::Password).string())
                .to_owned()
        ).await?;

        manager.create_table(
            sea_query::Table::create()
                .table(TournamentParticipant::Table)
                .if_not_exists()
                .col(ColumnDef::new(TournamentParticipant::TournamentId).uuid().not_null())
                .col(ColumnDef::new(TournamentParticipant::UserId).uuid().not_null())
                .primary_key(
                    Index::create()
                        .col(TournamentParticipant::TournamentId)
                        .col(TournamentParticipant::UserId)
                )
                .foreign_key(
                    ForeignKeyCreateStatement::new()
                        .name("fk-tournament_participant-tournament")
                        .from_tbl(TournamentParticipant::Table)
                        .from_col(TournamentParticipant::TournamentId)
                        .to_tbl(Tournament::Table)
                        .to_col(Tournament::Uuid)
                        .on_delete(ForeignKeyAction::Cascade)
                        .on_update(ForeignKeyAction::Cascade)
                )
                .to_owned()
        ).await?;

        manager.create_table(
            sea_query::Table::create()
                .table(TopicConjunction::Table)
                .if_not_exists()
                .col(ColumnDef::new(TopicConjunction::Uuid).uuid().not_null().primary_key())
                .col(ColumnDef::new(TopicConjunction::TournamentId).uuid().not_null())
                .foreign_key(
                    ForeignKeyCreateStatement::new()
                        .name("fk-topic_conjunction-tournament")
                        .from_tbl(TopicConjunction::Table)
                        .from_col(TopicConjunction::TournamentId)
                        .to_tbl(Tournament::Table)
                        .to_col(Tournament::Uuid)
                        .on_delete(ForeignKeyAction::Cascade)
                        .on_update(ForeignKeyAction::Cascade)
                )
                .to_owned()
        ).await?;

        manager.create_table(
            sea_query::Table::create()
                .table(TopicConjunctionTopic::Table)
                .if_not_exists()
                .col(ColumnDef::new(TopicConjunctionTopic::ConjunctionId).uuid().not_null())
                .col(ColumnDef::new(TopicConjunctionTopic::TopicId).uuid().not_null())
                .col(ColumnDef::new(TopicConjunctionTopic::CourseId).uuid().not_null())
                .col(ColumnDef::new(TopicConjunctionTopic::Name).string().not_null())
                .primary_key(
                    Index::create()
                        .col(TopicConjunctionTopic::ConjunctionId)
                        .col(TopicConjunctionTopic::TopicId)
                )
                .foreign_key(
                    ForeignKeyCreateStatement::new()
                        .name("fk-topic_conjunction_topic-conjunction")
                        .from_tbl(TopicConjunctionTopic::Table)
                        .from_col(TopicConjunctionTopic::ConjunctionId)
                        .to_tbl(TopicConjunction::Table)
                        .to_col(TopicConjunction::Uuid)
                        .on_delete(ForeignKeyAction::Cascade)
                        .on_update(ForeignKeyAction::Cascade)
                )
                .to_owned()
        ).await?;

        manager.create_index(
            IndexCreateStatement::new()
                .name("idx-tournament-course_execution")
                .table(Tournament::Table)
                .col(Tournament::CourseExecutionId)
                .to_owned()
        ).await?;

        manager.create_index(
            IndexCreateStatement::new()
                .name("idx-tournament_participant-user")
                .table(TournamentParticipant::Table)
                .col(TournamentParticipant::UserId)
                .to_owned()
        ).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(sea_query::Table::drop().table(TopicConjunctionTopic::Table).to_owned()).await?;
        manager.drop_table(sea_query::Table::drop().table(TopicConjunction::Table).to_owned()).await?;
        manager.drop_table(sea_query::Table::drop().table(TournamentParticipant::Table).to_owned()).await?;
        manager.drop_table(sea_query::Table::drop().table(Tournament::Table).to_owned()).await?;
        Ok(())
    }
}
