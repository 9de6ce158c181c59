pub mod column;

use sqlx::{
    Any, Decode, Encode, Type,
    any::{AnyArguments, AnyRow},
};

use column::ColumnDef;

/// A query against the `Any` driver, as produced by [`sqlx::query`].
pub type AnyQuery<'q> = sqlx::query::Query<'q, Any, AnyArguments<'q>>;

/// A struct mapped to a database table, one field per column.
///
/// Implemented through `#[derive(Entity)]`; the manager assembles its
/// statements from the constants below and round-trips values through
/// [`Entity::from_row`] and the two bind methods.
pub trait Entity: Sized {
    /// The rust type of the primary key column.
    type Id: for<'a> Encode<'a, Any> + for<'a> Decode<'a, Any> + Type<Any> + Send + 'static;

    /// The name of this entity's table in the database.
    const TABLE_NAME: &'static str;

    /// The database name of the primary key column.
    const ID_COLUMN: &'static str;

    /// All columns, in declaration order.
    const COLUMNS: &'static [ColumnDef];

    /// The current primary key value.
    fn id(&self) -> Self::Id;

    /// Decode one database row into an entity, by column name.
    fn from_row(row: &AnyRow) -> Result<Self, sqlx::Error>;

    /// Bind every column value onto an INSERT, in declaration order.
    fn bind_insert<'q>(&self, query: AnyQuery<'q>) -> AnyQuery<'q>;

    /// Bind the non-key column values onto an UPDATE, followed by the
    /// primary key for the WHERE clause.
    fn bind_update<'q>(&self, query: AnyQuery<'q>) -> AnyQuery<'q>;
}
