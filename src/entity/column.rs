use std::fmt::Display;

use persimmon_unit::DbKind;

/// The SQL type backing an entity column.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SqlType {
    SmallInt,
    Integer,
    BigInt,
    Real,
    Double,
    Boolean,
    Text,
}

impl SqlType {
    /// The canonical name used when comparing against an introspected
    /// schema, matching [`persimmon_unit::schema::normalize_type`].
    #[must_use]
    pub const fn canonical(self) -> &'static str {
        match self {
            Self::SmallInt => "SMALLINT",
            Self::Integer => "INTEGER",
            Self::BigInt => "BIGINT",
            Self::Real => "REAL",
            Self::Double => "DOUBLE",
            Self::Boolean => "BOOLEAN",
            Self::Text => "TEXT",
        }
    }

    /// Render this type as DDL for the given backend.
    ///
    /// Strings become `VARCHAR(255)` on MySQL so that they remain usable as
    /// key columns there.
    #[must_use]
    pub const fn render(self, kind: DbKind) -> &'static str {
        match self {
            Self::Double => match kind {
                DbKind::MySql => "DOUBLE",
                DbKind::Postgres | DbKind::Sqlite => "DOUBLE PRECISION",
            },
            Self::Text => match kind {
                DbKind::MySql => "VARCHAR(255)",
                DbKind::Postgres | DbKind::Sqlite => "TEXT",
            },
            other => other.canonical(),
        }
    }
}

impl Display for SqlType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.canonical())
    }
}

/// One column of an entity's table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ColumnDef {
    /// The name this column has in the database.
    pub name: &'static str,
    pub sql_type: SqlType,
    pub nullable: bool,
    pub primary_key: bool,
}

impl ColumnDef {
    /// Render this column as a `CREATE TABLE` fragment for the given backend.
    #[must_use]
    pub fn render(&self, kind: DbKind) -> String {
        let mut rendered = format!(
            "{} {}",
            kind.quote_ident(self.name),
            self.sql_type.render(kind)
        );

        if self.primary_key {
            rendered.push_str(" PRIMARY KEY");
        } else if !self.nullable {
            rendered.push_str(" NOT NULL");
        }

        rendered
    }
}
