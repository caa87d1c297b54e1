use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Component, Path, PathBuf};
use std::sync::OnceLock;
use std::thread;

use reqwest::StatusCode;
use reqwest::blocking::Client;
use tempfile::NamedTempFile;

use crate::invoice::InvoiceError;
use crate::invoice::retry::RetryPolicy;

/// Object storage for rendered invoices, addressed by slash-separated keys.
pub trait InvoiceStore {
    fn put(&self, key: &str, bytes: &[u8]) -> Result<(), InvoiceError>;
    fn get(&self, key: &str) -> Result<Vec<u8>, InvoiceError>;
}

/// Store keeping objects as files below a root directory.
#[derive(Debug, Clone)]
pub struct LocalInvoiceStore {
    root: PathBuf,
}

impl LocalInvoiceStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, InvoiceError> {
        let relative = Path::new(key);
        let is_plain = !key.is_empty()
            && relative
                .components()
                .all(|component| matches!(component, Component::Normal(_)));
        if !is_plain {
            return Err(InvoiceError::InvalidKey(key.to_string()));
        }
        Ok(self.root.join(relative))
    }
}

impl InvoiceStore for LocalInvoiceStore {
    fn put(&self, key: &str, bytes: &[u8]) -> Result<(), InvoiceError> {
        let target = self.path_for(key)?;
        let parent = target
            .parent()
            .ok_or_else(|| InvoiceError::InvalidKey(key.to_string()))?;
        fs::create_dir_all(parent)?;

        // Readers never observe a half-written file: write aside, then rename.
        let mut staged = NamedTempFile::new_in(parent)?;
        staged.write_all(bytes)?;
        staged.as_file().sync_all()?;
        staged.persist(&target).map_err(|err| err.error)?;

        Ok(())
    }

    fn get(&self, key: &str) -> Result<Vec<u8>, InvoiceError> {
        let path = self.path_for(key)?;
        fs::read(&path).map_err(|err| match err.kind() {
            ErrorKind::NotFound => InvoiceError::NotFound(key.to_string()),
            _ => InvoiceError::Io(err),
        })
    }
}

/// Store talking to an S3-compatible endpoint with plain `PUT`/`GET` requests.
///
/// The blocking client is created on the first request. Requests must run
/// off the async executor (for example inside `web::block`), while the
/// store itself can be built and dropped anywhere.
pub struct HttpInvoiceStore {
    endpoint: String,
    bucket: String,
    bearer_token: Option<String>,
    retry: RetryPolicy,
    client: OnceLock<Client>,
}

impl HttpInvoiceStore {
    #[must_use]
    pub fn new(endpoint: String, bucket: String) -> Self {
        Self {
            endpoint,
            bucket,
            bearer_token: None,
            retry: RetryPolicy::default(),
            client: OnceLock::new(),
        }
    }

    #[must_use]
    pub fn with_bearer_token(mut self, token: Option<String>) -> Self {
        self.bearer_token = token;
        self
    }

    #[must_use]
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    fn client(&self) -> Result<&Client, InvoiceError> {
        if let Some(client) = self.client.get() {
            return Ok(client);
        }
        let client = Client::builder()
            .build()
            .map_err(|err| InvoiceError::Http(format!("failed to build client: {err}")))?;
        Ok(self.client.get_or_init(|| client))
    }

    fn object_url(&self, key: &str) -> String {
        format!(
            "{}/{}/{}",
            self.endpoint.trim_end_matches('/'),
            self.bucket,
            key.trim_start_matches('/')
        )
    }

    /// Run `request` until it succeeds, fails permanently or the attempts run out.
    fn with_retry_loop<T>(
        &self,
        key: &str,
        mut request: impl FnMut() -> Result<T, Attempt>,
    ) -> Result<T, InvoiceError> {
        let mut attempt = 0usize;
        loop {
            match request() {
                Ok(value) => return Ok(value),
                Err(Attempt::Fatal(err)) => return Err(err),
                Err(Attempt::Retry(message)) => {
                    attempt += 1;
                    if attempt >= self.retry.max_attempts {
                        return Err(InvoiceError::Http(message));
                    }
                    log::warn!("storage request for {key} failed ({message}), retrying");
                    thread::sleep(self.retry.delay_for_attempt(attempt));
                }
            }
        }
    }
}

/// Outcome of a single failed storage request.
enum Attempt {
    Retry(String),
    Fatal(InvoiceError),
}

fn classify(status: StatusCode, key: &str) -> Attempt {
    if status == StatusCode::NOT_FOUND {
        Attempt::Fatal(InvoiceError::NotFound(key.to_string()))
    } else if status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS {
        Attempt::Retry(format!("status {status}"))
    } else {
        Attempt::Fatal(InvoiceError::Http(format!("status {status}")))
    }
}

impl InvoiceStore for HttpInvoiceStore {
    fn put(&self, key: &str, bytes: &[u8]) -> Result<(), InvoiceError> {
        let client = self.client()?;
        let url = self.object_url(key);
        self.with_retry_loop(key, || {
            let mut req = client.put(&url).body(bytes.to_vec());
            if let Some(token) = &self.bearer_token {
                req = req.bearer_auth(token);
            }
            let resp = req.send().map_err(|err| Attempt::Retry(err.to_string()))?;
            if resp.status().is_success() {
                Ok(())
            } else {
                Err(classify(resp.status(), key))
            }
        })
    }

    fn get(&self, key: &str) -> Result<Vec<u8>, InvoiceError> {
        let client = self.client()?;
        let url = self.object_url(key);
        self.with_retry_loop(key, || {
            let mut req = client.get(&url);
            if let Some(token) = &self.bearer_token {
                req = req.bearer_auth(token);
            }
            let resp = req.send().map_err(|err| Attempt::Retry(err.to_string()))?;
            if !resp.status().is_success() {
                return Err(classify(resp.status(), key));
            }
            resp.bytes()
                .map(|body| body.to_vec())
                .map_err(|err| Attempt::Retry(err.to_string()))
        })
    }
}
