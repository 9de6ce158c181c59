use persimmon::{EntityManagerFactory, Error, unit::SchemaAction};
use persimmon_tests::{account::Account, memory_unit};

async fn fresh_factory() -> EntityManagerFactory {
    EntityManagerFactory::builder(memory_unit(SchemaAction::Create))
        .register::<Account>()
        .build()
        .await
        .expect("Failed to build factory")
}

#[tokio::test]
async fn a_committed_insert_is_visible_to_the_manager() {
    let factory = fresh_factory().await;
    let manager = factory.entity_manager();

    let account = Account::open(7, "Ada");

    let mut tx = manager.begin().await.expect("Failed to begin");
    tx.persist(&account).await.expect("Failed to persist");
    tx.commit().await.expect("Failed to commit");

    assert_eq!(
        manager.count::<Account>().await.expect("Failed to count"),
        1
    );
    assert_eq!(
        manager.find::<Account>(7).await.expect("Failed to find"),
        Some(account)
    );
}

#[tokio::test]
async fn find_on_an_absent_key_is_none() {
    let factory = fresh_factory().await;
    let manager = factory.entity_manager();

    assert_eq!(
        manager.find::<Account>(404).await.expect("Failed to find"),
        None
    );
}

#[tokio::test]
async fn a_transaction_sees_its_own_uncommitted_writes() {
    let factory = fresh_factory().await;
    let manager = factory.entity_manager();

    let account = Account::open(7, "Ada");

    let mut tx = manager.begin().await.expect("Failed to begin");
    tx.persist(&account).await.expect("Failed to persist");

    assert_eq!(
        tx.find::<Account>(7).await.expect("Failed to find"),
        Some(account)
    );
    assert_eq!(tx.count::<Account>().await.expect("Failed to count"), 1);
}

#[tokio::test]
async fn a_dropped_transaction_rolls_back() {
    let factory = fresh_factory().await;
    let manager = factory.entity_manager();

    let mut tx = manager.begin().await.expect("Failed to begin");
    tx.persist(&Account::open(1, "Gone")).await.expect("Failed to persist");
    drop(tx);

    assert_eq!(
        manager.count::<Account>().await.expect("Failed to count"),
        0
    );
}

#[tokio::test]
async fn an_explicit_rollback_discards_the_insert() {
    let factory = fresh_factory().await;
    let manager = factory.entity_manager();

    let mut tx = manager.begin().await.expect("Failed to begin");
    tx.persist(&Account::open(1, "Gone")).await.expect("Failed to persist");
    tx.rollback().await.expect("Failed to roll back");

    assert_eq!(
        manager.find::<Account>(1).await.expect("Failed to find"),
        None
    );
}

#[tokio::test]
async fn a_duplicate_primary_key_surfaces_the_database_error() {
    let factory = fresh_factory().await;
    let manager = factory.entity_manager();

    let mut tx = manager.begin().await.expect("Failed to begin");
    tx.persist(&Account::open(7, "Ada")).await.expect("Failed to persist");

    let second = tx.persist(&Account::open(7, "Copy")).await;

    assert!(matches!(second, Err(Error::Database(_))));
}

#[tokio::test]
async fn merge_updates_an_existing_row_in_place() {
    let factory = fresh_factory().await;
    let manager = factory.entity_manager();

    let mut tx = manager.begin().await.expect("Failed to begin");
    tx.persist(&Account::open(3, "Nadia")).await.expect("Failed to persist");
    tx.commit().await.expect("Failed to commit");

    let updated = Account {
        id: 3,
        holder: "Nadia".to_string(),
        active: false,
        balance: 12.5,
        closure_note: Some("dormant".to_string()),
    };

    let mut tx = manager.begin().await.expect("Failed to begin");
    tx.merge(&updated).await.expect("Failed to merge");
    tx.commit().await.expect("Failed to commit");

    assert_eq!(
        manager.count::<Account>().await.expect("Failed to count"),
        1
    );
    assert_eq!(
        manager.find::<Account>(3).await.expect("Failed to find"),
        Some(updated)
    );
}

#[tokio::test]
async fn merge_inserts_a_missing_row() {
    let factory = fresh_factory().await;
    let manager = factory.entity_manager();

    let account = Account::open(9, "Kim");

    let mut tx = manager.begin().await.expect("Failed to begin");
    tx.merge(&account).await.expect("Failed to merge");
    tx.commit().await.expect("Failed to commit");

    assert_eq!(
        manager.find::<Account>(9).await.expect("Failed to find"),
        Some(account)
    );
}

#[tokio::test]
async fn remove_deletes_by_primary_key() {
    let factory = fresh_factory().await;
    let manager = factory.entity_manager();

    let account = Account::open(5, "Lee");

    let mut tx = manager.begin().await.expect("Failed to begin");
    tx.persist(&account).await.expect("Failed to persist");
    tx.commit().await.expect("Failed to commit");

    let mut tx = manager.begin().await.expect("Failed to begin");
    tx.remove(&account).await.expect("Failed to remove");
    tx.commit().await.expect("Failed to commit");

    assert_eq!(
        manager.find::<Account>(5).await.expect("Failed to find"),
        None
    );
}

#[tokio::test]
async fn removing_an_absent_row_is_not_an_error() {
    let factory = fresh_factory().await;
    let manager = factory.entity_manager();

    let mut tx = manager.begin().await.expect("Failed to begin");
    tx.remove(&Account::open(55, "Ghost")).await.expect("Failed to remove");
    tx.commit().await.expect("Failed to commit");
}

#[tokio::test]
async fn refresh_reloads_the_row_and_errors_once_it_is_gone() {
    let factory = fresh_factory().await;
    let manager = factory.entity_manager();

    let account = Account::open(4, "Rei");

    let mut tx = manager.begin().await.expect("Failed to begin");
    tx.persist(&account).await.expect("Failed to persist");
    tx.commit().await.expect("Failed to commit");

    let mut stale = account.clone();

    let mut refreshed = account.clone();
    refreshed.balance = 99.25;

    let mut tx = manager.begin().await.expect("Failed to begin");
    tx.merge(&refreshed).await.expect("Failed to merge");
    tx.commit().await.expect("Failed to commit");

    manager.refresh(&mut stale).await.expect("Failed to refresh");
    assert_eq!(stale, refreshed);

    let mut tx = manager.begin().await.expect("Failed to begin");
    tx.remove(&refreshed).await.expect("Failed to remove");
    tx.commit().await.expect("Failed to commit");

    let gone = manager.refresh(&mut stale).await;

    assert!(matches!(gone, Err(Error::NotFound { .. })));
}

#[tokio::test]
async fn find_all_returns_rows_ordered_by_key() {
    let factory = fresh_factory().await;
    let manager = factory.entity_manager();

    let mut tx = manager.begin().await.expect("Failed to begin");

    for id in [3, 1, 2] {
        tx.persist(&Account::open(id, format!("Holder {id}")))
            .await
            .expect("Failed to persist");
    }

    tx.commit().await.expect("Failed to commit");

    let all = manager
        .find_all::<Account>()
        .await
        .expect("Failed to fetch all rows");

    assert_eq!(all.iter().map(|e| e.id).collect::<Vec<_>>(), vec![1, 2, 3]);
}
