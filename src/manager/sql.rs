use itertools::Itertools;

use persimmon_unit::DbKind;

use crate::entity::Entity;

/// Emit a statement under the `persimmon::sql` target, at info level when
/// the unit asked for `show-sql`.
pub(crate) fn log_statement(show_sql: bool, statement: &str) {
    if show_sql {
        tracing::info!(target: "persimmon::sql", "{statement}");
    } else {
        tracing::trace!(target: "persimmon::sql", "{statement}");
    }
}

pub(crate) fn has_data_columns<E: Entity>() -> bool {
    E::COLUMNS.iter().any(|e| !e.primary_key)
}

fn column_list<E: Entity>(kind: DbKind) -> String {
    E::COLUMNS
        .iter()
        .map(|e| kind.quote_ident(e.name))
        .join(", ")
}

pub(crate) fn insert<E: Entity>(kind: DbKind) -> String {
    let placeholders = (1..=E::COLUMNS.len()).map(|i| kind.placeholder(i)).join(", ");

    format!(
        "INSERT INTO {} ({}) VALUES ({placeholders})",
        kind.quote_ident(E::TABLE_NAME),
        column_list::<E>(kind),
    )
}

pub(crate) fn select_by_id<E: Entity>(kind: DbKind) -> String {
    format!(
        "SELECT {} FROM {} WHERE {} = {}",
        column_list::<E>(kind),
        kind.quote_ident(E::TABLE_NAME),
        kind.quote_ident(E::ID_COLUMN),
        kind.placeholder(1),
    )
}

pub(crate) fn select_all<E: Entity>(kind: DbKind) -> String {
    format!(
        "SELECT {} FROM {} ORDER BY {}",
        column_list::<E>(kind),
        kind.quote_ident(E::TABLE_NAME),
        kind.quote_ident(E::ID_COLUMN),
    )
}

/// Update all non-key columns by primary key. Only valid for entities that
/// have at least one non-key column, see [`has_data_columns`].
pub(crate) fn update<E: Entity>(kind: DbKind) -> String {
    let data_columns = E::COLUMNS
        .iter()
        .filter(|e| !e.primary_key)
        .collect::<Vec<_>>();

    let assignments = data_columns
        .iter()
        .enumerate()
        .map(|(i, e)| format!("{} = {}", kind.quote_ident(e.name), kind.placeholder(i + 1)))
        .join(", ");

    format!(
        "UPDATE {} SET {assignments} WHERE {} = {}",
        kind.quote_ident(E::TABLE_NAME),
        kind.quote_ident(E::ID_COLUMN),
        kind.placeholder(data_columns.len() + 1),
    )
}

pub(crate) fn delete<E: Entity>(kind: DbKind) -> String {
    format!(
        "DELETE FROM {} WHERE {} = {}",
        kind.quote_ident(E::TABLE_NAME),
        kind.quote_ident(E::ID_COLUMN),
        kind.placeholder(1),
    )
}

pub(crate) fn count<E: Entity>(kind: DbKind) -> String {
    format!("SELECT COUNT(*) FROM {}", kind.quote_ident(E::TABLE_NAME))
}
