use eyre::Context;
use persimmon::EntityManagerFactory;
use persimmon_quickstart::{Student, load_unit};
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::{
    fmt::{format, layer},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[tokio::main]
async fn main() -> eyre::Result<()> {
    tracing_subscriber::registry()
        .with(LevelFilter::INFO)
        .with(layer().event_format(format().without_time().with_target(false).compact()))
        .init();

    let unit = load_unit().context("Failed to load the quickstart unit")?;

    let factory = EntityManagerFactory::builder(unit)
        .register::<Student>()
        .build()
        .await
        .context("Failed to build the entity manager factory")?;

    let manager = factory.entity_manager();

    let student = Student::new(1, "Jack");

    let mut tx = manager
        .begin()
        .await
        .context("Failed to begin a transaction")?;
    tx.persist(&student)
        .await
        .context("Failed to persist the student")?;
    tx.commit().await.context("Failed to commit")?;

    let found = manager
        .find::<Student>(1)
        .await
        .context("Failed to look up the student")?
        .ok_or_else(|| eyre::eyre!("No student with id 1 after the commit"))?;

    info!("Found {found}");

    factory.close().await.context("Failed to close the factory")?;

    Ok(())
}
