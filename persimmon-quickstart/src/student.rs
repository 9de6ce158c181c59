use std::fmt::Display;

use persimmon::Entity;

/// The demo entity: one row per student, keyed by an externally assigned id.
#[derive(Entity, Clone, Debug, PartialEq, Eq)]
pub struct Student {
    #[persimmon(id)]
    pub id: i64,
    pub name: String,
}

impl Student {
    #[must_use]
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

impl Display for Student {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Student{{id={}, name='{}'}}", self.id, self.name)
    }
}
