use persimmon::{
    EntityManagerFactory, Error,
    schema::EntityMapping,
    unit::{DbKind, PersistenceUnit, SchemaAction},
};
use persimmon_tests::{account::Account, drift, file_unit, gauge::Gauge, memory_unit};

#[test]
fn create_table_ddl_follows_the_backend_dialect() {
    let mapping = EntityMapping::of::<Account>();

    assert_eq!(
        mapping.create_table_sql(DbKind::Sqlite),
        "CREATE TABLE \"account\" (\"id\" BIGINT PRIMARY KEY, \"holder\" TEXT NOT NULL, \
         \"active\" BOOLEAN NOT NULL, \"balance\" DOUBLE PRECISION NOT NULL, \
         \"closed_reason\" TEXT)"
    );
    assert_eq!(
        mapping.create_table_sql(DbKind::Postgres),
        "CREATE TABLE \"account\" (\"id\" BIGINT PRIMARY KEY, \"holder\" TEXT NOT NULL, \
         \"active\" BOOLEAN NOT NULL, \"balance\" DOUBLE PRECISION NOT NULL, \
         \"closed_reason\" TEXT)"
    );
    assert_eq!(
        mapping.create_table_sql(DbKind::MySql),
        "CREATE TABLE `account` (`id` BIGINT PRIMARY KEY, `holder` VARCHAR(255) NOT NULL, \
         `active` BOOLEAN NOT NULL, `balance` DOUBLE NOT NULL, `closed_reason` VARCHAR(255))"
    );
}

#[test]
fn narrow_numeric_types_render_as_declared() {
    let mapping = EntityMapping::of::<Gauge>();

    assert_eq!(
        mapping.create_table_sql(DbKind::Sqlite),
        "CREATE TABLE \"gauge\" (\"id\" INTEGER PRIMARY KEY, \"small\" SMALLINT NOT NULL, \
         \"ratio\" REAL NOT NULL, \"wide\" BIGINT NOT NULL)"
    );
}

#[test]
fn drop_table_ddl_is_idempotent() {
    let mapping = EntityMapping::of::<Account>();

    assert_eq!(
        mapping.drop_table_sql(DbKind::Sqlite),
        "DROP TABLE IF EXISTS \"account\""
    );
    assert_eq!(
        mapping.drop_table_sql(DbKind::MySql),
        "DROP TABLE IF EXISTS `account`"
    );
}

#[tokio::test]
async fn validate_passes_against_a_schema_created_by_create() {
    let (unit, path) = file_unit("validate_pass", SchemaAction::Create);
    let _ = std::fs::remove_file(&path);

    let factory = EntityManagerFactory::builder(unit)
        .register::<Account>()
        .build()
        .await
        .expect("Failed to build the creating factory");
    factory.close().await.expect("Failed to close");

    let (unit, _) = file_unit("validate_pass", SchemaAction::Validate);

    let factory = EntityManagerFactory::builder(unit)
        .register::<Account>()
        .build()
        .await
        .expect("Validation rejected a freshly created schema");
    factory.close().await.expect("Failed to close");

    let _ = std::fs::remove_file(&path);
}

#[tokio::test]
async fn validate_reports_drift_in_a_divergent_table() {
    let (unit, path) = file_unit("validate_drift", SchemaAction::Create);
    let _ = std::fs::remove_file(&path);

    let factory = EntityManagerFactory::builder(unit)
        .register::<drift::Account>()
        .build()
        .await
        .expect("Failed to build the creating factory");
    factory.close().await.expect("Failed to close");

    let (unit, _) = file_unit("validate_drift", SchemaAction::Validate);

    let outcome = EntityManagerFactory::builder(unit)
        .register::<Account>()
        .build()
        .await;

    let _ = std::fs::remove_file(&path);

    match outcome {
        Err(Error::SchemaMismatch { table, problems }) => {
            assert_eq!(table, "account");
            assert!(problems.contains("holder"), "unexpected report: {problems}");
        }
        Err(e) => panic!("Expected a schema mismatch, got {e}"),
        Ok(_) => panic!("Expected a schema mismatch, validation passed"),
    }
}

#[tokio::test]
async fn validate_fails_when_the_table_was_never_created() {
    let outcome = EntityManagerFactory::builder(memory_unit(SchemaAction::Validate))
        .register::<Account>()
        .build()
        .await;

    assert!(matches!(outcome, Err(Error::SchemaMismatch { .. })));
}

#[tokio::test]
async fn validate_is_rejected_on_backends_without_introspection() {
    let unit = PersistenceUnit::new("remote", "postgres://localhost/never")
        .with_schema(SchemaAction::Validate);

    let outcome = EntityManagerFactory::builder(unit)
        .register::<Account>()
        .build()
        .await;

    assert!(matches!(
        outcome,
        Err(Error::ValidateUnsupported(DbKind::Postgres))
    ));
}

#[tokio::test]
async fn create_drop_removes_the_tables_on_close() {
    let (unit, path) = file_unit("create_drop", SchemaAction::CreateDrop);
    let _ = std::fs::remove_file(&path);

    let factory = EntityManagerFactory::builder(unit)
        .register::<Account>()
        .build()
        .await
        .expect("Failed to build factory");
    factory.close().await.expect("Failed to close");

    let (unit, _) = file_unit("create_drop", SchemaAction::Validate);

    let outcome = EntityManagerFactory::builder(unit)
        .register::<Account>()
        .build()
        .await;

    let _ = std::fs::remove_file(&path);

    assert!(matches!(outcome, Err(Error::SchemaMismatch { .. })));
}
