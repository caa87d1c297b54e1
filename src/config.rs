use std::env;
use std::path::PathBuf;

const DEFAULT_DATABASE_URL: &str = "app.db";
const DEFAULT_ADDRESS: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_DOMAIN: &str = "localhost";
const DEFAULT_TEMPLATES: &str = "templates/**/*";
const DEFAULT_STORAGE_PATH: &str = "invoices";

/// Where rendered invoices are persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvoiceStorageConfig {
    /// Objects are written below a local directory.
    Local { root: PathBuf },
    /// Objects are sent to an S3-compatible HTTP endpoint.
    Http {
        endpoint: String,
        bucket: String,
        token: Option<String>,
    },
}

/// Runtime settings read from the environment (and `.env` when present).
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub database_url: String,
    pub address: String,
    pub port: u16,
    /// Session signing key; `None` means a random key is generated at start-up.
    pub secret: Option<String>,
    pub domain: String,
    pub templates: String,
    pub invoice_storage: InvoiceStorageConfig,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let port = non_empty("PORT")
            .and_then(|value| value.trim().parse::<u16>().ok())
            .unwrap_or(DEFAULT_PORT);

        let invoice_storage = match (
            non_empty("INVOICE_STORAGE_URL"),
            non_empty("INVOICE_STORAGE_BUCKET"),
        ) {
            (Some(endpoint), Some(bucket)) => InvoiceStorageConfig::Http {
                endpoint,
                bucket,
                token: non_empty("INVOICE_STORAGE_TOKEN"),
            },
            _ => InvoiceStorageConfig::Local {
                root: PathBuf::from(
                    non_empty("INVOICE_STORAGE_PATH")
                        .unwrap_or_else(|| DEFAULT_STORAGE_PATH.to_string()),
                ),
            },
        };

        Self {
            database_url: non_empty("DATABASE_URL")
                .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
            address: non_empty("ADDRESS").unwrap_or_else(|| DEFAULT_ADDRESS.to_string()),
            port,
            secret: non_empty("SECRET_KEY"),
            domain: non_empty("DOMAIN").unwrap_or_else(|| DEFAULT_DOMAIN.to_string()),
            templates: non_empty("INVOICE_TEMPLATES")
                .unwrap_or_else(|| DEFAULT_TEMPLATES.to_string()),
            invoice_storage,
        }
    }
}
