use itertools::Itertools;
use sqlx::{AnyPool, Row};

use persimmon_unit::{DbKind, schema::SqlTable};

use crate::{
    entity::{Entity, column::ColumnDef},
    error::Error,
};

/// An entity's table mapping, detached from its compile-time type so that a
/// factory can hold the mappings of all registered entities in one place.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EntityMapping {
    pub table: &'static str,
    pub columns: &'static [ColumnDef],
}

impl EntityMapping {
    #[must_use]
    pub fn of<E: Entity>() -> Self {
        Self {
            table: E::TABLE_NAME,
            columns: E::COLUMNS,
        }
    }

    /// `CREATE TABLE` DDL for this mapping on the given backend.
    #[must_use]
    pub fn create_table_sql(&self, kind: DbKind) -> String {
        format!(
            "CREATE TABLE {} ({})",
            kind.quote_ident(self.table),
            self.columns.iter().map(|e| e.render(kind)).join(", "),
        )
    }

    #[must_use]
    pub fn drop_table_sql(&self, kind: DbKind) -> String {
        format!("DROP TABLE IF EXISTS {}", kind.quote_ident(self.table))
    }

    /// Compare this mapping against a table introspected from the live
    /// database. Extra live columns are tolerated, drift in the declared
    /// ones is not.
    pub fn check_against(&self, live: &SqlTable) -> Result<(), Error> {
        let problems = self
            .columns
            .iter()
            .filter_map(|e| column_problem(e, live))
            .collect::<Vec<_>>();

        if problems.is_empty() {
            Ok(())
        } else {
            Err(Error::SchemaMismatch {
                table: self.table.to_string(),
                problems: problems.iter().join("; "),
            })
        }
    }
}

fn column_problem(declared: &ColumnDef, live: &SqlTable) -> Option<String> {
    let Some(found) = live.find_column(declared.name) else {
        return Some(format!("column \"{}\" is missing", declared.name));
    };

    if found.column_type != declared.sql_type.canonical() {
        return Some(format!(
            "column \"{}\" is declared {} but stored as {}",
            declared.name, declared.sql_type, found.column_type
        ));
    }

    if found.nullable != declared.nullable {
        return Some(format!(
            "column \"{}\" is declared {} but stored {}",
            declared.name,
            nullability(declared.nullable),
            nullability(found.nullable)
        ));
    }

    if found.primary_key != declared.primary_key {
        return Some(format!(
            "column \"{}\" is {} the primary key in the database",
            declared.name,
            if found.primary_key { "unexpectedly" } else { "not" }
        ));
    }

    None
}

const fn nullability(nullable: bool) -> &'static str {
    if nullable { "NULL" } else { "NOT NULL" }
}

/// Check a mapping against the DDL SQLite keeps in `sqlite_schema`.
pub(crate) async fn validate_sqlite(pool: &AnyPool, mapping: &EntityMapping) -> Result<(), Error> {
    let row = sqlx::query("SELECT \"sql\" FROM sqlite_schema WHERE type = 'table' AND name = ?")
        .bind(mapping.table)
        .fetch_optional(pool)
        .await?;

    let Some(row) = row else {
        return Err(Error::SchemaMismatch {
            table: mapping.table.to_string(),
            problems: "table does not exist".to_string(),
        });
    };

    let ddl = row.try_get::<String, _>("sql")?;
    let live = persimmon_unit::schema::parse_create_table(&ddl)?;

    mapping.check_against(&live)
}
