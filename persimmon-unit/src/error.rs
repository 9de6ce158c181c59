use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading or interpreting persistence unit declarations.
#[derive(Debug, Error)]
pub enum UnitError {
    #[error("failed to read persistence config at {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse persistence config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("no persistence unit named `{0}`")]
    UnknownUnit(String),

    #[error("unit `{unit}` declares no url and `{var}` is not set")]
    MissingUrl { unit: String, var: String },

    #[error("cannot determine the database backend from the url of unit `{0}`")]
    UnknownBackend(String),

    #[error("failed to parse table definition: {0}")]
    Ddl(#[from] sqlparser::parser::ParserError),

    #[error("no CREATE TABLE statement found in the definition")]
    NoCreateTable,
}
