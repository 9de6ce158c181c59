//! The quickstart lesson: one mapped entity, one persistence unit, and two
//! driver binaries that persist a row and look it up again.

pub mod student;

use persimmon::unit::{PersistenceConfig, PersistenceUnit, UnitError};

pub use student::Student;

/// Name of the unit the lesson uses in `persistence.toml`.
pub const UNIT_NAME: &str = "quickstart";

/// Load the quickstart unit from the crate's own `persistence.toml`.
pub fn load_unit() -> Result<PersistenceUnit, UnitError> {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/persistence.toml");

    Ok(PersistenceConfig::load(path)?.unit(UNIT_NAME)?.clone())
}
