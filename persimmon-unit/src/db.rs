use std::fmt::Display;

use dotenvy::dotenv;

/// The database backends a persistence unit may point at.
///
/// The kind decides the SQL dialect details Persimmon has to care about
/// itself: identifier quoting and bind placeholder syntax. Everything else is
/// delegated to the driver picked by the connection URL.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DbKind {
    MySql,
    Postgres,
    Sqlite,
}

impl DbKind {
    #[must_use]
    pub fn from_connection_string(input: &str) -> Option<Self> {
        let lower = input.to_lowercase();

        if lower.starts_with("postgres") {
            Some(Self::Postgres)
        } else if lower.starts_with("sqlite") {
            Some(Self::Sqlite)
        } else if lower.starts_with("mysql") {
            Some(Self::MySql)
        } else {
            None
        }
    }

    /// Quote an identifier the way this backend expects.
    #[must_use]
    pub fn quote_ident(self, ident: &str) -> String {
        match self {
            Self::MySql => format!("`{ident}`"),
            Self::Postgres | Self::Sqlite => format!("\"{ident}\""),
        }
    }

    /// The bind placeholder for the 1-based parameter `position`.
    ///
    /// The `Any` driver passes statements through to the backend verbatim, so
    /// the placeholder syntax has to match the backend rather than a neutral
    /// form.
    #[must_use]
    pub fn placeholder(self, position: usize) -> String {
        match self {
            Self::Postgres => format!("${position}"),
            Self::MySql | Self::Sqlite => "?".to_string(),
        }
    }
}

impl Display for DbKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::MySql => "mysql",
                Self::Postgres => "postgres",
                Self::Sqlite => "sqlite",
            }
        )
    }
}

/// Attempt to retrieve a connection URL from the environment variable `var`,
/// honoring a `.env` file if one is present.
#[must_use]
pub fn url_from_env(var: &str) -> Option<String> {
    let _ = dotenv();

    std::env::var(var).ok()
}
