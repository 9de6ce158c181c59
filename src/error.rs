use persimmon_unit::{DbKind, UnitError};
use thiserror::Error;

/// Errors surfaced by entity managers, transactions and schema actions.
#[derive(Debug, Error)]
pub enum Error {
    /// Loading or resolving the persistence unit failed.
    #[error(transparent)]
    Unit(#[from] UnitError),

    /// The database itself reported an error, including constraint
    /// violations such as a duplicate primary key.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The live schema does not match the registered entity mapping.
    #[error("schema of table \"{table}\" does not match its mapping: {problems}")]
    SchemaMismatch { table: String, problems: String },

    /// `schema = "validate"` on a backend whose schema Persimmon cannot
    /// introspect.
    #[error("schema validation is not supported on {0} connections")]
    ValidateUnsupported(DbKind),

    /// A refresh targeted a row that no longer exists.
    #[error("no row with the given primary key in \"{table}\"")]
    NotFound { table: String },
}
