use sqlparser::{
    ast::{ColumnDef, ColumnOption, CreateTable, ObjectNamePart, Statement},
    dialect::SQLiteDialect,
    parser::Parser,
};

use crate::error::UnitError;

/// A column as declared by a `CREATE TABLE` statement.
#[derive(Debug, Clone)]
pub struct SqlColumn {
    pub name: String,
    /// Normalized (uppercase, alias-folded) SQL type name, e.g. `INTEGER`.
    pub column_type: String,
    pub nullable: bool,
    pub primary_key: bool,
}

impl From<&ColumnDef> for SqlColumn {
    fn from(value: &ColumnDef) -> Self {
        let primary_key = value
            .options
            .iter()
            .find_map(|e| {
                if let ColumnOption::Unique {
                    is_primary: true,
                    characteristics: _,
                } = e.option
                {
                    Some(true)
                } else {
                    None
                }
            })
            .unwrap_or(false);

        // A primary key column is never nullable, whether or not the
        // statement spells out NOT NULL.
        let nullable = !primary_key
            && value
                .options
                .iter()
                .find_map(|e| {
                    if let ColumnOption::Null = e.option {
                        Some(true)
                    } else if let ColumnOption::NotNull = e.option {
                        Some(false)
                    } else {
                        None
                    }
                })
                .unwrap_or(true);

        Self {
            name: value.name.value.clone(),
            column_type: normalize_type(&value.data_type.to_string()),
            nullable,
            primary_key,
        }
    }
}

/// A table as declared by a `CREATE TABLE` statement.
///
/// Primary keys are recognized in column position (`"id" BIGINT PRIMARY
/// KEY`), which is how Persimmon renders them itself.
#[derive(Debug, Clone)]
pub struct SqlTable {
    pub name: String,
    pub columns: Vec<SqlColumn>,
}

impl SqlTable {
    #[must_use]
    pub fn find_column(&self, name: &str) -> Option<&SqlColumn> {
        self.columns.iter().find(|e| e.name.eq(name))
    }

    #[must_use]
    pub fn primary_key(&self) -> Option<&SqlColumn> {
        self.columns.iter().find(|e| e.primary_key)
    }
}

impl From<&CreateTable> for SqlTable {
    fn from(create_table: &CreateTable) -> Self {
        Self {
            name: create_table
                .name
                .0
                .iter()
                .map(|e| {
                    let ObjectNamePart::Identifier(ident) = e;

                    ident.value.clone()
                })
                .next()
                .unwrap_or_default(),
            columns: create_table.columns.iter().map(SqlColumn::from).collect(),
        }
    }
}

/// Parse a single `CREATE TABLE` statement, as stored by SQLite in
/// `sqlite_schema`, into an [`SqlTable`].
pub fn parse_create_table(ddl: &str) -> Result<SqlTable, UnitError> {
    let ast = Parser::parse_sql(&SQLiteDialect {}, ddl)?;

    ast.iter()
        .find_map(|e| {
            if let Statement::CreateTable(statement) = e {
                Some(SqlTable::from(statement))
            } else {
                None
            }
        })
        .ok_or(UnitError::NoCreateTable)
}

/// Fold common SQL type spellings onto one canonical uppercase name, so that
/// a declared mapping can be compared against whatever spelling the database
/// stored.
#[must_use]
pub fn normalize_type(input: &str) -> String {
    let upper = input.trim().to_uppercase();
    let base = upper.split('(').next().unwrap_or(&upper).trim();

    match base {
        "INT" | "INT4" => "INTEGER".to_string(),
        "INT8" => "BIGINT".to_string(),
        "INT2" => "SMALLINT".to_string(),
        "BOOL" => "BOOLEAN".to_string(),
        "DOUBLE PRECISION" | "FLOAT8" => "DOUBLE".to_string(),
        "FLOAT4" => "REAL".to_string(),
        "VARCHAR" | "CHAR" | "CHARACTER VARYING" | "CLOB" => "TEXT".to_string(),
        _ => base.to_string(),
    }
}
