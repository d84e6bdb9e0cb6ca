//! Backend notification after column changes.
//!
//! Delivery is fire-and-forget and at-most-once: each request runs on a
//! detached worker thread, success bodies are discarded and failures are
//! written to the log with their error chain and a backtrace. Nothing is
//! retried and nothing is reported back to the caller.

use anyhow::{bail, Context, Result};
use reqwest::Url;
use std::backtrace::Backtrace;
use std::fmt;
use std::sync::Mutex;
use std::thread::{self, JoinHandle};
use tracing::{debug, error, info, warn};

use crate::config::config::BackendConfig;

/// Backend routes that record column layout changes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    UpdateColumnPosition,
    UpdateLocked,
}

impl Route {
    pub fn as_str(&self) -> &'static str {
        match self {
            Route::UpdateColumnPosition => "update-column-position",
            Route::UpdateLocked => "update-locked",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A pending backend call: route, data id and ordered query parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub route: Route,
    pub data_id: String,
    pub params: Vec<(String, String)>,
}

impl Notification {
    pub fn new(route: Route, data_id: impl Into<String>) -> Self {
        Self {
            route,
            data_id: data_id.into(),
            params: Vec::new(),
        }
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((key.into(), value.into()));
        self
    }

    /// `update-column-position` with `col` and `action`
    pub fn column_position(data_id: &str, column: &str, action: &str) -> Self {
        Self::new(Route::UpdateColumnPosition, data_id)
            .with_param("col", column)
            .with_param("action", action)
    }

    /// `update-locked` with `col` and `action`
    pub fn locked(data_id: &str, column: &str, action: &str) -> Self {
        Self::new(Route::UpdateLocked, data_id)
            .with_param("col", column)
            .with_param("action", action)
    }

    pub fn param(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Sink for backend notifications. Implementations must not block the caller
/// on delivery and must never surface delivery errors.
pub trait Notifier: Send + Sync {
    fn dispatch(&self, notification: Notification);
}

/// Sends notifications as HTTP GET requests on detached worker threads
pub struct HttpNotifier {
    base_url: String,
    namespace: String,
    client: reqwest::blocking::Client,
    workers: Mutex<Vec<JoinHandle<()>>>,
}

impl HttpNotifier {
    /// Requests run until they complete or fail; the client has no timeout.
    pub fn new(base_url: &str, namespace: &str) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(None)
            .build()
            .context("Failed to build notification HTTP client")?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            namespace: namespace.trim_matches('/').to_string(),
            client,
            workers: Mutex::new(Vec::new()),
        })
    }

    pub fn from_config(config: &BackendConfig) -> Result<Self> {
        Self::new(&config.base_url, &config.namespace)
    }

    /// `<base>/<namespace>/<route>/<data_id>?<params>`
    pub fn endpoint(&self, notification: &Notification) -> Result<Url> {
        let path = format!(
            "{}/{}/{}/{}",
            self.base_url, self.namespace, notification.route, notification.data_id
        );
        Url::parse_with_params(&path, &notification.params)
            .with_context(|| format!("Invalid notification URL '{}'", path))
    }

    /// Block until every notification dispatched so far has finished.
    /// Only useful for short-lived processes that would otherwise exit first.
    pub fn wait_idle(&self) {
        let handles: Vec<JoinHandle<()>> = match self.workers.lock() {
            Ok(mut workers) => workers.drain(..).collect(),
            Err(_) => return,
        };
        for handle in handles {
            if handle.join().is_err() {
                warn!(target: "notify", "Notification worker panicked");
            }
        }
    }

    fn track(&self, handle: JoinHandle<()>) {
        if let Ok(mut workers) = self.workers.lock() {
            workers.retain(|h| !h.is_finished());
            workers.push(handle);
        }
    }
}

fn send(client: &reqwest::blocking::Client, url: Url) -> Result<()> {
    let response = client
        .get(url.clone())
        .send()
        .with_context(|| format!("Request to {} failed", url))?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().unwrap_or_default();
        bail!("{} returned HTTP {}: {}", url.path(), status, body.trim());
    }

    // Response body carries nothing we use
    let _ = response.bytes();
    Ok(())
}

fn report_failure(notification: &Notification, err: &anyhow::Error) {
    let backtrace = Backtrace::force_capture();
    error!(
        target: "notify",
        route = %notification.route,
        data_id = %notification.data_id,
        "Notification failed: {:#}\n{}",
        err,
        backtrace
    );
}

impl Notifier for HttpNotifier {
    fn dispatch(&self, notification: Notification) {
        let url = match self.endpoint(&notification) {
            Ok(url) => url,
            Err(e) => {
                report_failure(&notification, &e);
                return;
            }
        };

        debug!(target: "notify", "Dispatching {}", url);

        // Carry the caller's subscriber into the worker so failures land in the same sink
        let dispatch = tracing::dispatcher::get_default(|current| current.clone());
        let client = self.client.clone();
        let handle = thread::spawn(move || {
            tracing::dispatcher::with_default(&dispatch, || {
                if let Err(e) = send(&client, url) {
                    report_failure(&notification, &e);
                }
            });
        });
        self.track(handle);
    }
}

/// Logs notifications instead of sending them (backend disabled)
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingNotifier;

impl Notifier for LoggingNotifier {
    fn dispatch(&self, notification: Notification) {
        info!(
            target: "notify",
            "Backend disabled, skipping {} for {} {:?}",
            notification.route,
            notification.data_id,
            notification.params
        );
    }
}

/// Keeps every dispatched notification in memory
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.sent.lock().map(|sent| sent.clone()).unwrap_or_default()
    }

    pub fn count(&self) -> usize {
        self.sent.lock().map(|sent| sent.len()).unwrap_or(0)
    }
}

impl Notifier for RecordingNotifier {
    fn dispatch(&self, notification: Notification) {
        if let Ok(mut sent) = self.sent.lock() {
            sent.push(notification);
        }
    }
}
