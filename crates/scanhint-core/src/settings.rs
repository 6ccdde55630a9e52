//! Connection settings

use serde::{Deserialize, Serialize};

/// Default MySQL port
pub const DEFAULT_MYSQL_PORT: u16 = 3306;

/// Where and how to reach the database server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionSettings {
    /// Host address
    pub host: String,
    /// Port number (0 means the driver default)
    pub port: u16,
    /// Username
    pub user: Option<String>,
    /// Password
    pub password: Option<String>,
    /// Database to select after connecting
    pub database: Option<String>,
}

impl Default for ConnectionSettings {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: DEFAULT_MYSQL_PORT,
            user: None,
            password: None,
            database: None,
        }
    }
}

impl ConnectionSettings {
    /// Port to dial, falling back to the MySQL default for 0
    pub fn effective_port(&self) -> u16 {
        if self.port > 0 {
            self.port
        } else {
            DEFAULT_MYSQL_PORT
        }
    }

    /// Builds a `mysql://` URL.
    ///
    /// The password is replaced by `***` unless `include_password` is set, so
    /// the result can be logged.
    pub fn connection_url(&self, include_password: bool) -> String {
        let mut url = String::from("mysql://");

        if let Some(user) = &self.user {
            url.push_str(user);
            if self.password.is_some() {
                url.push(':');
                match (&self.password, include_password) {
                    (Some(password), true) => url.push_str(password),
                    _ => url.push_str("***"),
                }
            }
            url.push('@');
        }

        url.push_str(&format!("{}:{}", self.host, self.effective_port()));

        if let Some(db) = &self.database {
            url.push('/');
            url.push_str(db);
        }

        url
    }
}
