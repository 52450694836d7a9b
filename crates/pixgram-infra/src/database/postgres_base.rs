use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, DbConn, DbErr, EntityTrait, IntoActiveModel,
    PrimaryKeyTrait, SqlErr,
};

use pixgram_core::domain::{EntityKind, Validate};
use pixgram_core::error::RepoError;
use pixgram_core::ports::BaseRepository;

/// Generic PostgreSQL repository implementation.
///
/// Repositories of one store share a single pool; every call borrows a
/// connection from it for its own duration.
pub struct PostgresBaseRepository<E>
where
    E: EntityTrait,
{
    pub(crate) db: Arc<DbConn>,
    kind: EntityKind,
    _entity: PhantomData<E>,
}

impl<E> PostgresBaseRepository<E>
where
    E: EntityTrait,
{
    pub fn new(db: Arc<DbConn>, kind: EntityKind) -> Self {
        Self {
            db,
            kind,
            _entity: PhantomData,
        }
    }
}

/// Classify a database error into the store's error kinds.
pub(crate) fn map_db_err(err: DbErr) -> RepoError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(msg)) => RepoError::ConstraintViolation(msg),
        Some(SqlErr::ForeignKeyConstraintViolation(msg)) => RepoError::ReferentialIntegrity(msg),
        _ => {
            let err_str = err.to_string();
            if err_str.contains("foreign key constraint") {
                RepoError::ReferentialIntegrity(err_str)
            } else if err_str.contains("unique constraint")
                || err_str.contains("check constraint")
                || err_str.contains("null value")
            {
                RepoError::ConstraintViolation(err_str)
            } else if matches!(err, DbErr::Conn(_) | DbErr::ConnectionAcquire(_)) {
                RepoError::Connection(err_str)
            } else {
                RepoError::Query(err_str)
            }
        }
    }
}

#[async_trait]
impl<E, T, N> BaseRepository<T, N> for PostgresBaseRepository<E>
where
    E: EntityTrait,
    E::Model: IntoActiveModel<E::ActiveModel> + Sync + Send,
    E::ActiveModel: ActiveModelTrait<Entity = E> + ActiveModelBehavior + Send + Sync,
    E::PrimaryKey: PrimaryKeyTrait<ValueType = i64>,
    T: From<E::Model> + Send + Sync + 'static,
    N: Validate + Into<E::ActiveModel> + Send + Sync + 'static,
{
    async fn find_by_id(&self, id: i64) -> Result<Option<T>, RepoError> {
        let result = E::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }

    async fn insert(&self, new: N) -> Result<T, RepoError> {
        new.validate()?;

        let active_model: E::ActiveModel = new.into();
        let model = active_model
            .insert(self.db.as_ref())
            .await
            .map_err(map_db_err)?;
        tracing::debug!(table = %self.kind, "Inserted row");

        Ok(model.into())
    }

    async fn delete(&self, id: i64) -> Result<(), RepoError> {
        let result = E::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(map_db_err)?;

        if result.rows_affected == 0 {
            return Err(RepoError::NotFound {
                entity: self.kind,
                id,
            });
        }

        // Dependent rows go with it through ON DELETE CASCADE.
        tracing::info!(table = %self.kind, id, "Deleted row");
        Ok(())
    }
}
