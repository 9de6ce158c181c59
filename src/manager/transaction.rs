use sqlx::{Any, Row, Transaction};

use persimmon_unit::DbKind;

use super::sql;
use crate::{entity::Entity, error::Error};

/// An open database transaction, the only way to reach the write
/// operations. Dropping it without committing rolls everything back.
pub struct EntityTransaction {
    tx: Transaction<'static, Any>,
    kind: DbKind,
    show_sql: bool,
}

impl EntityTransaction {
    pub(crate) fn new(tx: Transaction<'static, Any>, kind: DbKind, show_sql: bool) -> Self {
        Self { tx, kind, show_sql }
    }

    /// Insert the entity as a new row. A primary key collision surfaces as
    /// the database's own constraint error.
    pub async fn persist<E: Entity>(&mut self, entity: &E) -> Result<(), Error> {
        let statement = sql::insert::<E>(self.kind);
        sql::log_statement(self.show_sql, &statement);

        entity
            .bind_insert(sqlx::query(&statement))
            .execute(&mut *self.tx)
            .await?;

        Ok(())
    }

    /// Update the entity's row, inserting it instead when it does not exist
    /// yet.
    pub async fn merge<E: Entity>(&mut self, entity: &E) -> Result<(), Error> {
        if sql::has_data_columns::<E>() {
            let statement = sql::update::<E>(self.kind);
            sql::log_statement(self.show_sql, &statement);

            let result = entity
                .bind_update(sqlx::query(&statement))
                .execute(&mut *self.tx)
                .await?;

            if result.rows_affected() > 0 {
                return Ok(());
            }
        } else if self.find::<E>(entity.id()).await?.is_some() {
            // An id-only entity carries nothing to update.
            return Ok(());
        }

        self.persist(entity).await
    }

    /// Delete the entity's row by primary key. Deleting an absent row is
    /// not an error.
    pub async fn remove<E: Entity>(&mut self, entity: &E) -> Result<(), Error> {
        let statement = sql::delete::<E>(self.kind);
        sql::log_statement(self.show_sql, &statement);

        sqlx::query(&statement)
            .bind(entity.id())
            .execute(&mut *self.tx)
            .await?;

        Ok(())
    }

    /// Look up an entity by primary key, seeing this transaction's own
    /// uncommitted writes.
    pub async fn find<E: Entity>(&mut self, id: E::Id) -> Result<Option<E>, Error> {
        let statement = sql::select_by_id::<E>(self.kind);
        sql::log_statement(self.show_sql, &statement);

        let row = sqlx::query(&statement)
            .bind(id)
            .fetch_optional(&mut *self.tx)
            .await?;

        Ok(row.as_ref().map(E::from_row).transpose()?)
    }

    pub async fn count<E: Entity>(&mut self) -> Result<i64, Error> {
        let statement = sql::count::<E>(self.kind);
        sql::log_statement(self.show_sql, &statement);

        let row = sqlx::query(&statement).fetch_one(&mut *self.tx).await?;

        Ok(row.try_get(0)?)
    }

    pub async fn commit(self) -> Result<(), Error> {
        self.tx.commit().await?;

        Ok(())
    }

    /// Roll back explicitly. Equivalent to dropping the transaction.
    pub async fn rollback(self) -> Result<(), Error> {
        self.tx.rollback().await?;

        Ok(())
    }
}
