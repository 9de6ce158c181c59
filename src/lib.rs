pub mod entity;
pub mod error;
pub mod manager;
pub mod schema;

/// Derive macro to implement [`Entity`](entity::Entity).
pub use persimmon_macros::Entity;

pub use error::Error;
pub use manager::{EntityManager, EntityManagerFactory, EntityTransaction};
pub use persimmon_unit as unit;

pub use sqlx;
