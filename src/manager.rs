pub(crate) mod sql;
pub mod transaction;

use std::sync::Once;

use futures::TryStreamExt;
use sqlx::{
    AnyPool, Row,
    any::{AnyPoolOptions, AnyRow},
};

use persimmon_unit::{DbKind, PersistenceUnit, SchemaAction};

use crate::{
    entity::Entity,
    error::Error,
    schema::{self, EntityMapping},
};

pub use transaction::EntityTransaction;

/// Register the compiled-in `Any` drivers exactly once per process.
fn install_drivers() {
    static DRIVERS: Once = Once::new();

    DRIVERS.call_once(sqlx::any::install_default_drivers);
}

/// Collects entity registrations before connecting.
///
/// Every entity type that should take part in the unit's schema action has
/// to be registered here; managers themselves work with any [`Entity`].
pub struct EntityManagerFactoryBuilder {
    unit: PersistenceUnit,
    mappings: Vec<EntityMapping>,
}

impl EntityManagerFactoryBuilder {
    #[must_use]
    pub fn register<E: Entity>(mut self) -> Self {
        self.mappings.push(EntityMapping::of::<E>());
        self
    }

    /// Connect a pool for the unit and apply its schema action.
    pub async fn build(self) -> Result<EntityManagerFactory, Error> {
        install_drivers();

        let kind = self.unit.kind()?;

        if self.unit.schema == SchemaAction::Validate && kind != DbKind::Sqlite {
            return Err(Error::ValidateUnsupported(kind));
        }

        let url = self.unit.resolve_url()?;

        let mut options = AnyPoolOptions::new();

        if let Some(max_connections) = self.unit.max_connections {
            options = options.max_connections(max_connections);
        }

        let factory = EntityManagerFactory {
            pool: options.connect(&url).await?,
            kind,
            mappings: self.mappings,
            schema: self.unit.schema,
            show_sql: self.unit.show_sql,
        };

        factory.apply_startup_schema().await?;

        Ok(factory)
    }
}

/// The connection-owning half of the manager API, one per persistence unit.
pub struct EntityManagerFactory {
    pool: AnyPool,
    kind: DbKind,
    mappings: Vec<EntityMapping>,
    schema: SchemaAction,
    show_sql: bool,
}

impl EntityManagerFactory {
    #[must_use]
    pub fn builder(unit: PersistenceUnit) -> EntityManagerFactoryBuilder {
        EntityManagerFactoryBuilder {
            unit,
            mappings: Vec::new(),
        }
    }

    /// Hand out an entity manager backed by this factory's pool.
    #[must_use]
    pub fn entity_manager(&self) -> EntityManager {
        EntityManager {
            pool: self.pool.clone(),
            kind: self.kind,
            show_sql: self.show_sql,
        }
    }

    async fn apply_startup_schema(&self) -> Result<(), Error> {
        match self.schema {
            SchemaAction::None => Ok(()),
            SchemaAction::Create | SchemaAction::CreateDrop => {
                for mapping in &self.mappings {
                    self.execute_ddl(&mapping.drop_table_sql(self.kind)).await?;
                    self.execute_ddl(&mapping.create_table_sql(self.kind))
                        .await?;
                }

                Ok(())
            }
            // The backend was vetted before connecting.
            SchemaAction::Validate => {
                for mapping in &self.mappings {
                    schema::validate_sqlite(&self.pool, mapping).await?;
                }

                Ok(())
            }
        }
    }

    async fn execute_ddl(&self, statement: &str) -> Result<(), Error> {
        sql::log_statement(self.show_sql, statement);
        sqlx::query(statement).execute(&self.pool).await?;

        Ok(())
    }

    /// Apply the `create-drop` teardown and close the pool.
    pub async fn close(self) -> Result<(), Error> {
        if self.schema == SchemaAction::CreateDrop {
            for mapping in &self.mappings {
                self.execute_ddl(&mapping.drop_table_sql(self.kind)).await?;
            }
        }

        self.pool.close().await;

        Ok(())
    }
}

/// The read surface. Lookups run directly against the pool; writes require
/// an [`EntityTransaction`] obtained through [`EntityManager::begin`].
#[derive(Clone)]
pub struct EntityManager {
    pool: AnyPool,
    kind: DbKind,
    show_sql: bool,
}

impl EntityManager {
    /// Look up an entity by primary key. An absent key is `None`, not an
    /// error.
    pub async fn find<E: Entity>(&self, id: E::Id) -> Result<Option<E>, Error> {
        let statement = sql::select_by_id::<E>(self.kind);
        sql::log_statement(self.show_sql, &statement);

        let row = sqlx::query(&statement)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.as_ref().map(E::from_row).transpose()?)
    }

    /// Fetch every row of the entity's table, ordered by primary key.
    pub async fn find_all<E: Entity>(&self) -> Result<Vec<E>, Error> {
        let statement = sql::select_all::<E>(self.kind);
        sql::log_statement(self.show_sql, &statement);

        let rows: Vec<AnyRow> = sqlx::query(&statement)
            .fetch(&self.pool)
            .try_collect()
            .await?;

        Ok(rows.iter().map(E::from_row).collect::<Result<_, _>>()?)
    }

    pub async fn count<E: Entity>(&self) -> Result<i64, Error> {
        let statement = sql::count::<E>(self.kind);
        sql::log_statement(self.show_sql, &statement);

        let row = sqlx::query(&statement).fetch_one(&self.pool).await?;

        Ok(row.try_get(0)?)
    }

    /// Reload the entity's row from the database, replacing the in-memory
    /// state. Fails with [`Error::NotFound`] if the row is gone.
    pub async fn refresh<E: Entity>(&self, entity: &mut E) -> Result<(), Error> {
        match self.find::<E>(entity.id()).await? {
            Some(found) => {
                *entity = found;

                Ok(())
            }
            None => Err(Error::NotFound {
                table: E::TABLE_NAME.to_string(),
            }),
        }
    }

    /// Open a write transaction on a dedicated connection.
    pub async fn begin(&self) -> Result<EntityTransaction, Error> {
        Ok(EntityTransaction::new(
            self.pool.begin().await?,
            self.kind,
            self.show_sql,
        ))
    }
}
