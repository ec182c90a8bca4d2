use log::debug;
use sea_orm::{prelude::*, QuerySelect};
use uuid::Uuid;

use crate::domain::tournament::Tournament;
use crate::schema;

pub async fn query_all_for_course_executions<C>(db: &C, course_execution_ids: &[Uuid]) -> Result<Vec<Tournament>, anyhow::Error> where C: ConnectionTrait {
    debug!("loading all tournaments for {} course executions", course_execution_ids.len());
    let rows = schema::tournament::Entity::find()
        .filter(schema::tournament::Column::CourseExecutionId.is_in(course_execution_ids.iter().copied()))
        .all(db).await?;
    Tournament::load_from_rows(db, rows).await
}

// The open/closed cutoffs are computed against the caller-supplied instant,
// never against the wall clock.
pub async fn query_open_for_course_executions<C>(db: &C, course_execution_ids: &[Uuid], now: DateTime) -> Result<Vec<Tournament>, anyhow::Error> where C: ConnectionTrait {
    debug!("loading open tournaments for {} course executions", course_execution_ids.len());
    let rows = schema::tournament::Entity::find()
        .filter(schema::tournament::Column::CourseExecutionId.is_in(course_execution_ids.iter().copied()))
        .filter(schema::tournament::Column::StartTime.lte(now))
        .filter(schema::tournament::Column::EndTime.gt(now))
        .filter(schema::tournament::Column::IsCanceled.eq(false))
        .all(db).await?;
    Tournament::load_from_rows(db, rows).await
}

pub async fn query_closed_for_course_executions<C>(db: &C, course_execution_ids: &[Uuid], now: DateTime) -> Result<Vec<Tournament>, anyhow::Error> where C: ConnectionTrait {
    debug!("loading closed tournaments for {} course executions", course_execution_ids.len());
    let rows = schema::tournament::Entity::find()
        .filter(schema::tournament::Column::CourseExecutionId.is_in(course_execution_ids.iter().copied()))
        .filter(schema::tournament::Column::EndTime.lte(now))
        .filter(schema::tournament::Column::IsCanceled.eq(false))
        .all(db).await?;
    Tournament::load_from_rows(db, rows).await
}

pub async fn query_by_creator<C>(db: &C, user_id: Uuid) -> Result<Vec<Tournament>, anyhow::Error> where C: ConnectionTrait {
    let rows = schema::tournament::Entity::find()
        .filter(schema::tournament::Column::CreatorId.eq(user_id))
        .all(db).await?;
    Tournament::load_from_rows(db, rows).await
}

pub async fn query_by_participant<C>(db: &C, user_id: Uuid) -> Result<Vec<Tournament>, anyhow::Error> where C: ConnectionTrait {
    let rows = schema::tournament::Entity::find()
        .inner_join(schema::tournament_participant::Entity)
        .filter(schema::tournament_participant::Column::UserId.eq(user_id))
        .all(db).await?;
    Tournament::load_from_rows(db, rows).await
}

pub async fn query_for_course_execution<C>(db: &C, course_execution_id: Uuid) -> Result<Vec<Tournament>, anyhow::Error> where C: ConnectionTrait {
    let rows = schema::tournament::Entity::find()
        .filter(schema::tournament::Column::CourseExecutionId.eq(course_execution_id))
        .all(db).await?;
    Tournament::load_from_rows(db, rows).await
}

/// Narrow projection: only the course execution id of one tournament.
pub async fn query_course_execution_id<C>(db: &C, tournament_id: Uuid) -> Result<Option<Uuid>, DbErr> where C: ConnectionTrait {
    let course_execution_id: Option<Option<Uuid>> = schema::tournament::Entity::find()
        .select_only()
        .column(schema::tournament::Column::CourseExecutionId)
        .filter(schema::tournament::Column::Uuid.eq(tournament_id))
        .into_tuple()
        .one(db).await?;
    Ok(course_execution_id.flatten())
}
