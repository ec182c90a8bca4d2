use std::collections::HashMap;

use async_trait::async_trait;
use sea_orm::prelude::*;
use sea_orm::Iterable;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BatchLoadError {
    #[error("row not found")]
    RowNotFound,
    #[error(transparent)]
    Db(#[from] DbErr),
}

/// Loads rows for the given uuids in input order. Every table in this
/// crate uses a single uuid primary key, so lookup is keyed on uuids
/// directly.
pub async fn load_many_by_uuid<E, Conn>(db: &Conn, uuids: Vec<Uuid>) -> Result<Vec<Option<E::Model>>, DbErr> where E: EntityTrait, Conn: ConnectionTrait {
    let keys: Vec<E::Column> = E::PrimaryKey::iter().map(|key| key.into_column()).collect();

    if keys.len() != 1 {
        panic!("load_many_by_uuid only supports entities with a single primary key");
    }

    let key = keys[0];

    let models = E::find().filter(key.is_in(uuids.clone())).all(db).await?;

    let by_uuid: HashMap<Uuid, E::Model> = models
        .into_iter()
        .map(|model| {
            let uuid = match model.get(key) {
                sea_orm::Value::Uuid(Some(uuid)) => *uuid,
                _ => panic!("load_many_by_uuid only supports uuid primary keys"),
            };
            (uuid, model)
        })
        .collect();

    Ok(uuids.into_iter().map(|uuid| by_uuid.get(&uuid).cloned()).collect())
}

#[async_trait]
pub trait BatchLoad {
    type M: Send;

    async fn batch_load<Conn>(db: &Conn, uuids: Vec<Uuid>) -> Result<Vec<Option<Self::M>>, DbErr> where Conn: ConnectionTrait;

    async fn batch_load_all<Conn>(db: &Conn, uuids: Vec<Uuid>) -> Result<Vec<Self::M>, BatchLoadError> where Conn: ConnectionTrait {
        let rows = Self::batch_load(db, uuids).await?;

        rows.into_iter().map(|row| {
            row.ok_or(BatchLoadError::RowNotFound)
        }).collect()
    }
}

#[async_trait]
impl<E: EntityTrait> BatchLoad for E {
    type M = E::Model;

    async fn batch_load<Conn>(db: &Conn, uuids: Vec<Uuid>) -> Result<Vec<Option<Self::M>>, DbErr> where Conn: ConnectionTrait {
        load_many_by_uuid::<E, Conn>(db, uuids).await
    }
}
