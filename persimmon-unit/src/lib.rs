pub mod config;
pub mod db;
pub mod error;
pub mod schema;

pub use config::{PersistenceConfig, PersistenceUnit, SchemaAction};
pub use db::DbKind;
pub use error::UnitError;
