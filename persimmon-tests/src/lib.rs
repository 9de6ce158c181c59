//! Fixture entities and persistence units shared by the integration tests.

use persimmon::unit::{PersistenceUnit, SchemaAction};

pub mod account {
    use persimmon::Entity;

    /// Covers the common column shapes: integer key, text, boolean,
    /// floating point and a nullable, renamed column.
    #[derive(Entity, Clone, Debug, PartialEq)]
    #[persimmon(table = "account")]
    pub struct Account {
        #[persimmon(id)]
        pub id: i64,
        pub holder: String,
        pub active: bool,
        pub balance: f64,
        #[persimmon(column = "closed_reason")]
        pub closure_note: Option<String>,
    }

    impl Account {
        #[must_use]
        pub fn open(id: i64, holder: impl Into<String>) -> Self {
            Self {
                id,
                holder: holder.into(),
                active: true,
                balance: 0.0,
                closure_note: None,
            }
        }
    }
}

pub mod gauge {
    use persimmon::Entity;

    /// Exercises the narrower numeric column types. Only used for metadata
    /// and DDL assertions, never round-tripped through a database.
    #[derive(Entity, Clone, Debug, PartialEq)]
    pub struct Gauge {
        #[persimmon(id)]
        pub id: i32,
        pub small: i16,
        pub ratio: f32,
        pub wide: i64,
    }
}

pub mod drift {
    use persimmon::Entity;

    /// Deliberately disagrees with [`super::account::Account`] about the
    /// `account` table: `holder` has the wrong type and most columns are
    /// missing.
    #[derive(Entity, Clone, Debug, PartialEq)]
    #[persimmon(table = "account")]
    pub struct Account {
        #[persimmon(id)]
        pub id: i64,
        pub holder: i64,
    }
}

/// A unit pointing at a fresh private in-memory SQLite database.
///
/// Capped at one connection, as every connection to `sqlite::memory:` would
/// otherwise get a database of its own.
#[must_use]
pub fn memory_unit(schema: SchemaAction) -> PersistenceUnit {
    PersistenceUnit::new("memtest", "sqlite::memory:")
        .with_schema(schema)
        .with_max_connections(1)
}

/// A unit pointing at a throwaway SQLite file, for tests that need the
/// database to outlive a factory.
#[must_use]
pub fn file_unit(tag: &str, schema: SchemaAction) -> (PersistenceUnit, std::path::PathBuf) {
    let path = std::env::temp_dir().join(format!("persimmon_{tag}_{}.db", std::process::id()));

    let unit = PersistenceUnit::new(tag, format!("sqlite://{}?mode=rwc", path.display()))
        .with_schema(schema)
        .with_max_connections(1);

    (unit, path)
}
