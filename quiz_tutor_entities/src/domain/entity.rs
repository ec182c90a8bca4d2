use async_trait::async_trait;
use sea_orm::prelude::*;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EntityLoadError {
    #[error("entity {0} does not exist")]
    DoesNotExist(Uuid),
}

#[async_trait]
pub trait LoadEntity: Sized + Send {
    async fn try_get_many<C>(db: &C, uuids: Vec<Uuid>) -> Result<Vec<Option<Self>>, anyhow::Error> where C: ConnectionTrait;

    async fn get_many<C>(db: &C, uuids: Vec<Uuid>) -> Result<Vec<Self>, anyhow::Error> where C: ConnectionTrait {
        let entities = Self::try_get_many(db, uuids.clone()).await?;
        let entities: Result<Vec<Self>, EntityLoadError> = uuids
            .into_iter()
            .zip(entities)
            .map(|(uuid, entity)| entity.ok_or(EntityLoadError::DoesNotExist(uuid)))
            .collect();
        Ok(entities?)
    }

    async fn try_get<C>(db: &C, uuid: Uuid) -> Result<Option<Self>, anyhow::Error> where C: ConnectionTrait {
        Ok(Self::try_get_many(db, vec![uuid]).await?.pop().flatten())
    }

    async fn get<C>(db: &C, uuid: Uuid) -> Result<Self, anyhow::Error> where C: ConnectionTrait {
        Self::try_get(db, uuid)
            .await?
            .ok_or_else(|| EntityLoadError::DoesNotExist(uuid).into())
    }
}

/// An entity scoped to one course execution, persistable as a unit.
#[async_trait]
pub trait CourseExecutionEntity: Send + Sync {
    async fn save<C>(&self, db: &C, guarantee_insert: bool) -> Result<(), anyhow::Error> where C: ConnectionTrait;

    async fn save_many<C>(db: &C, guarantee_insert: bool, entities: &Vec<&Self>) -> Result<(), anyhow::Error> where C: ConnectionTrait {
        for entity in entities.iter() {
            entity.save(db, guarantee_insert).await?;
        }
        Ok(())
    }

    async fn get_course_execution<C>(&self, db: &C) -> Result<Option<Uuid>, anyhow::Error> where C: ConnectionTrait {
        Ok(Self::get_many_course_executions(db, &vec![self]).await?[0])
    }

    async fn get_many_course_executions<C>(db: &C, entities: &Vec<&Self>) -> Result<Vec<Option<Uuid>>, anyhow::Error> where C: ConnectionTrait;

    async fn delete_many<C>(db: &C, ids: Vec<Uuid>) -> Result<(), anyhow::Error> where C: ConnectionTrait;

    async fn delete<C>(db: &C, id: Uuid) -> Result<(), anyhow::Error> where C: ConnectionTrait {
        Self::delete_many(db, vec![id]).await
    }
}
