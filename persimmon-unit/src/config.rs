use std::{collections::BTreeMap, fs, path::Path};

use serde::Deserialize;

use crate::{
    db::{self, DbKind},
    error::UnitError,
};

/// Environment variable consulted when a unit declares no `url` and no
/// `url-env` of its own.
pub const DEFAULT_URL_ENV: &str = "DATABASE_URL";

/// What the factory does to the schema of registered entities at startup.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SchemaAction {
    /// Leave the schema alone.
    #[default]
    None,
    /// Drop and re-create the tables of all registered entities.
    Create,
    /// Like `create`, and drop the tables again when the factory closes.
    CreateDrop,
    /// Check the live schema against the registered entities and fail on
    /// drift.
    Validate,
}

/// A single named connection declaration.
///
/// ```toml
/// [unit.quickstart]
/// url = "sqlite://quickstart.db?mode=rwc"
/// schema = "create"
/// show-sql = true
/// max-connections = 1
/// ```
///
/// Credentials travel inside the URL (or inside the environment variable it
/// is resolved from); there are no separate user/password fields.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct PersistenceUnit {
    /// The unit's name, taken from the table key in the config file.
    #[serde(skip)]
    pub name: String,
    #[serde(default)]
    pub url: Option<String>,
    /// Environment variable consulted when `url` is unset.
    #[serde(default)]
    pub url_env: Option<String>,
    #[serde(default)]
    pub schema: SchemaAction,
    /// Log every statement the manager issues.
    #[serde(default)]
    pub show_sql: bool,
    #[serde(default)]
    pub max_connections: Option<u32>,
}

impl PersistenceUnit {
    #[must_use]
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: Some(url.into()),
            url_env: None,
            schema: SchemaAction::None,
            show_sql: false,
            max_connections: None,
        }
    }

    #[must_use]
    pub fn with_schema(mut self, schema: SchemaAction) -> Self {
        self.schema = schema;
        self
    }

    #[must_use]
    pub fn with_show_sql(mut self, show_sql: bool) -> Self {
        self.show_sql = show_sql;
        self
    }

    #[must_use]
    pub fn with_max_connections(mut self, max_connections: u32) -> Self {
        self.max_connections = Some(max_connections);
        self
    }

    /// Resolve the connection URL, falling back to the environment when the
    /// unit declares none.
    pub fn resolve_url(&self) -> Result<String, UnitError> {
        if let Some(url) = &self.url {
            return Ok(url.clone());
        }

        let var = self.url_env.as_deref().unwrap_or(DEFAULT_URL_ENV);

        db::url_from_env(var).ok_or_else(|| UnitError::MissingUrl {
            unit: self.name.clone(),
            var: var.to_string(),
        })
    }

    /// The backend kind this unit points at, detected from the URL scheme.
    pub fn kind(&self) -> Result<DbKind, UnitError> {
        let url = self.resolve_url()?;

        DbKind::from_connection_string(&url)
            .ok_or_else(|| UnitError::UnknownBackend(self.name.clone()))
    }
}

/// A persistence config file: any number of named units.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct PersistenceConfig {
    #[serde(default)]
    unit: BTreeMap<String, PersistenceUnit>,
}

impl PersistenceConfig {
    /// Parse a config from TOML text.
    pub fn parse(raw: &str) -> Result<Self, UnitError> {
        let mut config: Self = toml::from_str(raw)?;

        for (name, unit) in &mut config.unit {
            unit.name.clone_from(name);
        }

        Ok(config)
    }

    /// Load a config file from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, UnitError> {
        let path = path.as_ref();

        let raw = fs::read_to_string(path).map_err(|source| UnitError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        Self::parse(&raw)
    }

    /// Look up a unit by name.
    pub fn unit(&self, name: &str) -> Result<&PersistenceUnit, UnitError> {
        self.unit
            .get(name)
            .ok_or_else(|| UnitError::UnknownUnit(name.to_string()))
    }

    /// All declared units, in name order.
    pub fn units(&self) -> impl Iterator<Item = &PersistenceUnit> {
        self.unit.values()
    }
}
