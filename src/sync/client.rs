use chrono::NaiveDate;
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::{COOKIE, SET_COOKIE};
use serde::{Deserialize, Serialize};
use std::sync::{mpsc, Arc, Mutex};
use std::thread;
use std::time::Duration;
use tracing::{debug, warn};

use super::Backend;
use super::csrf::{csrf_from_set_cookie, CSRF_COOKIE, CSRF_HEADER};
use crate::config::Config;
use crate::error::SyncError;
use crate::todo::Task;

pub const SAVE_TASKS_PATH: &str = "/save-tasks/";
pub const SAVE_EMAIL_PATH: &str = "/save-email/";
pub const TASKS_BY_DATE_PATH: &str = "/get-tasks-by-date/";

#[derive(Debug, Serialize)]
struct SaveTasksRequest<'a> {
    user_id: &'a str,
    tasks: &'a [Task],
}

#[derive(Debug, Serialize)]
struct SaveEmailRequest<'a> {
    user_id: &'a str,
    email: &'a str,
}

#[derive(Debug, Deserialize)]
struct TasksByDateResponse {
    #[serde(default)]
    tasks: Vec<Task>,
}

/// Work handed to the background sync thread, processed in send order.
#[derive(Debug)]
enum SyncJob {
    Push { user_id: String, tasks: Vec<Task> },
    /// Answered once every job queued before it has finished.
    Flush(mpsc::Sender<()>),
}

/// Connection details shared between the caller and the sync thread.
#[derive(Debug, Clone)]
struct Endpoint {
    client: Client,
    base_url: String,
    /// Only a token actually handed out by the server (or configured) is
    /// cached; until then every mutating request retries the lookup.
    csrf_token: Arc<Mutex<Option<String>>>,
}

impl Endpoint {
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn cached_csrf_token(&self) -> Option<String> {
        self.csrf_token.lock().ok()?.clone()
    }

    /// CSRF token for mutating requests, read from the server's `csrftoken`
    /// cookie. Empty if the server is unreachable or sets no cookie.
    fn csrf_token(&self) -> String {
        if let Some(token) = self.cached_csrf_token() {
            return token;
        }

        let url = self.url("/");
        let token = match self.client.get(&url).send() {
            Ok(response) => csrf_from_set_cookie(
                response
                    .headers()
                    .get_all(SET_COOKIE)
                    .iter()
                    .filter_map(|value| value.to_str().ok()),
            ),
            Err(e) => {
                warn!(error = %e, url = %url, "Could not fetch CSRF cookie");
                None
            }
        };
        debug!(found = token.is_some(), "Resolved CSRF token");

        match token {
            Some(token) => {
                if let Ok(mut cached) = self.csrf_token.lock() {
                    *cached = Some(token.clone());
                }
                token
            }
            None => String::new(),
        }
    }

    fn post_json<T: Serialize + ?Sized>(&self, path: &str, body: &T) -> RequestBuilder {
        let token = self.csrf_token();
        let mut request = self
            .client
            .post(self.url(path))
            .header(CSRF_HEADER, token.as_str())
            .json(body);
        if !token.is_empty() {
            request = request.header(COOKIE, format!("{CSRF_COOKIE}={token}"));
        }
        request
    }

    fn send(&self, url: String, request: RequestBuilder) -> Result<Response, SyncError> {
        let response = request.send().map_err(|source| SyncError::Transport {
            url: url.clone(),
            source,
        })?;

        let status = response.status();
        debug!(status = %status, url = %url, "Received HTTP response");
        if !status.is_success() {
            return Err(SyncError::Status { url, status });
        }
        Ok(response)
    }

    fn post_tasks(&self, user_id: &str, tasks: &[Task]) -> Result<(), SyncError> {
        let request = self.post_json(SAVE_TASKS_PATH, &SaveTasksRequest { user_id, tasks });
        self.send(self.url(SAVE_TASKS_PATH), request)?;
        Ok(())
    }
}

fn run_sync_worker(endpoint: Endpoint, jobs: mpsc::Receiver<SyncJob>) {
    for job in jobs {
        match job {
            SyncJob::Push { user_id, tasks } => match endpoint.post_tasks(&user_id, &tasks) {
                Ok(()) => debug!(count = tasks.len(), "Synced tasks to backend"),
                Err(e) => warn!(error = %e, "Task sync failed"),
            },
            SyncJob::Flush(done) => {
                let _ = done.send(());
            }
        }
    }
    debug!("Sync worker stopped");
}

/// Blocking HTTP client for the task backend.
///
/// Task pushes go through a single background thread, started on first use,
/// so they reach the server in the order they were made.
#[derive(Debug)]
pub struct HttpBackend {
    endpoint: Endpoint,
    worker: Mutex<Option<mpsc::Sender<SyncJob>>>,
}

impl HttpBackend {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, SyncError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("task-sync/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(SyncError::Client)?;

        Ok(Self {
            endpoint: Endpoint {
                client,
                base_url: base_url.trim_end_matches('/').to_string(),
                csrf_token: Arc::default(),
            },
            worker: Mutex::new(None),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, SyncError> {
        let backend = Self::new(
            &config.server_url,
            Duration::from_secs(config.request_timeout_secs),
        )?;
        if let Some(token) = config.csrf_token.as_ref().filter(|t| !t.is_empty())
            && let Ok(mut cached) = backend.endpoint.csrf_token.lock()
        {
            *cached = Some(token.clone());
        }
        Ok(backend)
    }

    /// Posts the full task list as the client's truth. Blocks until the
    /// backend answers.
    pub fn post_tasks(&self, user_id: &str, tasks: &[Task]) -> Result<(), SyncError> {
        self.endpoint.post_tasks(user_id, tasks)
    }

    fn worker(&self) -> Option<mpsc::Sender<SyncJob>> {
        let mut worker = self.worker.lock().ok()?;
        let sender = worker.get_or_insert_with(|| {
            let (tx, rx) = mpsc::channel();
            let endpoint = self.endpoint.clone();
            thread::spawn(move || run_sync_worker(endpoint, rx));
            tx
        });
        Some(sender.clone())
    }
}

impl Backend for HttpBackend {
    fn sync_tasks(&self, user_id: &str, tasks: Vec<Task>) {
        let job = SyncJob::Push {
            user_id: user_id.to_string(),
            tasks,
        };
        let sent = self.worker().is_some_and(|worker| worker.send(job).is_ok());
        if !sent {
            warn!("Sync worker unavailable, task push dropped");
        }
    }

    fn wait_for_pending(&self) {
        let Some(worker) = self.worker.lock().ok().and_then(|w| w.as_ref().cloned()) else {
            return;
        };
        let (done_tx, done_rx) = mpsc::channel();
        if worker.send(SyncJob::Flush(done_tx)).is_ok() {
            let _ = done_rx.recv();
        }
    }

    fn save_email(&self, user_id: &str, email: &str) -> Result<(), SyncError> {
        let request = self
            .endpoint
            .post_json(SAVE_EMAIL_PATH, &SaveEmailRequest { user_id, email });
        self.endpoint.send(self.endpoint.url(SAVE_EMAIL_PATH), request)?;
        Ok(())
    }

    fn tasks_for_date(&self, user_id: &str, date: NaiveDate) -> Result<Vec<Task>, SyncError> {
        let url = self.endpoint.url(TASKS_BY_DATE_PATH);
        let date = date.format("%Y-%m-%d").to_string();
        let request = self
            .endpoint
            .client
            .get(&url)
            .query(&[("user_id", user_id), ("date", date.as_str())]);

        let response = self.endpoint.send(url.clone(), request)?;
        let body: TasksByDateResponse = response
            .json()
            .map_err(|source| SyncError::Decode { url, source })?;
        Ok(body.tasks)
    }
}
