//! Single-worker FIFO file queue
//!
//! Jobs run strictly one at a time in arrival order. A job attempt is
//! bounded by a hard timeout; retryable failures re-enqueue the job at the
//! back with linear backoff (`base_delay * attempt`) until the attempt
//! ceiling, while fatal failures record an error immediately without
//! consuming the retry budget.

use crate::config::QueueSettings;
use crate::domain::{AnonymError, Result};
use futures::future::BoxFuture;
use serde::Serialize;
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{error, info, warn};

/// Terminal outcome of one job attempt.
pub enum JobOutcome {
    /// Job finished; the value is stored as the job result.
    Success(Value),
    /// Transient failure; the job is retried until the attempt ceiling.
    Retryable(String),
    /// Permanent failure; recorded immediately, no retries.
    Fatal(String),
}

/// A queued unit of work. Each invocation is one attempt.
pub type JobFn = Arc<dyn Fn() -> BoxFuture<'static, JobOutcome> + Send + Sync>;

/// Externally visible job state.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum JobStatus {
    Queued {
        /// 1-based place in the queue.
        position: usize,
        estimated_wait_secs: u64,
    },
    Processing {
        elapsed_secs: u64,
    },
    Completed {
        result: Value,
    },
    Error {
        message: String,
    },
}

struct QueuedJob {
    file_id: String,
    job: JobFn,
    attempts: u32,
}

#[derive(Default)]
struct QueueState {
    queue: VecDeque<QueuedJob>,
    /// Currently running job and its attempt start time.
    processing: Option<(String, Instant)>,
    results: HashMap<String, std::result::Result<Value, String>>,
    worker_running: bool,
}

/// FIFO queue with a single background worker.
pub struct FileQueueManager {
    settings: QueueSettings,
    state: Arc<Mutex<QueueState>>,
}

impl FileQueueManager {
    pub fn new(settings: QueueSettings) -> Self {
        Self {
            settings,
            state: Arc::new(Mutex::new(QueueState::default())),
        }
    }

    /// Adds a job to the back of the queue and starts the worker if idle.
    ///
    /// A file id that is still queued or processing is rejected; a finished
    /// id may be enqueued again, replacing its old result.
    pub async fn enqueue(&self, file_id: impl Into<String>, job: JobFn) -> Result<()> {
        let file_id = file_id.into();
        let mut state = self.state.lock().await;

        let pending = state.queue.iter().any(|j| j.file_id == file_id)
            || state
                .processing
                .as_ref()
                .is_some_and(|(id, _)| *id == file_id);
        if pending {
            return Err(AnonymError::Queue(format!(
                "Job '{file_id}' is already pending"
            )));
        }

        state.results.remove(&file_id);
        state.queue.push_back(QueuedJob {
            file_id: file_id.clone(),
            job,
            attempts: 0,
        });
        info!(file_id = %file_id, queued = state.queue.len(), "Job enqueued");

        if !state.worker_running {
            state.worker_running = true;
            let settings = self.settings.clone();
            let shared = Arc::clone(&self.state);
            tokio::spawn(async move {
                run_worker(settings, shared).await;
            });
        }

        Ok(())
    }

    /// Returns the current state of a job, or `None` for unknown ids.
    pub async fn get_status(&self, file_id: &str) -> Option<JobStatus> {
        let state = self.state.lock().await;

        if let Some(result) = state.results.get(file_id) {
            return Some(match result {
                Ok(value) => JobStatus::Completed {
                    result: value.clone(),
                },
                Err(message) => JobStatus::Error {
                    message: message.clone(),
                },
            });
        }

        if let Some((id, started)) = &state.processing {
            if id == file_id {
                return Some(JobStatus::Processing {
                    elapsed_secs: started.elapsed().as_secs(),
                });
            }
        }

        state
            .queue
            .iter()
            .position(|j| j.file_id == file_id)
            .map(|index| JobStatus::Queued {
                position: index + 1,
                estimated_wait_secs: (index as u64 + 1) * self.settings.average_job_seconds,
            })
    }

    /// Waits for a job to finish and removes its result.
    ///
    /// Polls at the configured interval, bounded by the configured wait
    /// ceiling. Returns an error when the job failed, the id is unknown to
    /// the queue, or the wait ceiling elapses before a terminal state.
    pub async fn get_result(&self, file_id: &str) -> Result<Value> {
        let wait = Duration::from_secs(self.settings.result_wait_timeout_seconds.max(1));
        match tokio::time::timeout(wait, self.wait_for_result(file_id)).await {
            Ok(result) => result,
            Err(_) => Err(AnonymError::Queue(format!(
                "Timed out after {}s waiting for job '{file_id}'",
                wait.as_secs()
            ))),
        }
    }

    async fn wait_for_result(&self, file_id: &str) -> Result<Value> {
        let poll = Duration::from_secs(self.settings.poll_interval_seconds.max(1));

        loop {
            {
                let mut state = self.state.lock().await;
                if let Some(result) = state.results.remove(file_id) {
                    return result.map_err(AnonymError::Queue);
                }

                let pending = state.queue.iter().any(|j| j.file_id == file_id)
                    || state
                        .processing
                        .as_ref()
                        .is_some_and(|(id, _)| id == file_id);
                if !pending {
                    return Err(AnonymError::Queue(format!("Unknown job '{file_id}'")));
                }
            }
            tokio::time::sleep(poll).await;
        }
    }
}

async fn run_worker(settings: QueueSettings, state: Arc<Mutex<QueueState>>) {
    let job_timeout = Duration::from_secs(settings.job_timeout_seconds);

    loop {
        let mut job = {
            let mut state = state.lock().await;
            match state.queue.pop_front() {
                Some(job) => {
                    state.processing = Some((job.file_id.clone(), Instant::now()));
                    job
                }
                None => {
                    state.worker_running = false;
                    return;
                }
            }
        };

        job.attempts += 1;
        let attempt = job.attempts;

        // Each attempt runs in its own task, so a panicking job body cannot
        // take the worker loop down with it; the panic surfaces as a join
        // error and becomes a terminal outcome like any other failure.
        let job_fn = Arc::clone(&job.job);
        let mut attempt_task = tokio::spawn(async move { (job_fn)().await });

        let outcome = match tokio::time::timeout(job_timeout, &mut attempt_task).await {
            Ok(Ok(outcome)) => outcome,
            Ok(Err(e)) if e.is_panic() => JobOutcome::Fatal(format!("Job panicked: {e}")),
            Ok(Err(e)) => JobOutcome::Retryable(format!("Job attempt aborted: {e}")),
            Err(_) => {
                attempt_task.abort();
                JobOutcome::Retryable(format!(
                    "Attempt timed out after {}s",
                    settings.job_timeout_seconds
                ))
            }
        };

        match outcome {
            JobOutcome::Success(value) => {
                let mut state = state.lock().await;
                state.processing = None;
                state.results.insert(job.file_id.clone(), Ok(value));
                info!(file_id = %job.file_id, attempt, "Job completed");
            }
            JobOutcome::Fatal(message) => {
                let mut state = state.lock().await;
                state.processing = None;
                error!(file_id = %job.file_id, attempt, %message, "Job failed permanently");
                state.results.insert(job.file_id.clone(), Err(message));
            }
            JobOutcome::Retryable(message) => {
                if attempt >= settings.max_attempts {
                    let mut state = state.lock().await;
                    state.processing = None;
                    error!(file_id = %job.file_id, attempt, %message, "Job exhausted retries");
                    state.results.insert(
                        job.file_id.clone(),
                        Err(format!("Failed after {attempt} attempts: {message}")),
                    );
                } else {
                    let backoff =
                        Duration::from_secs(settings.retry_base_delay_seconds * u64::from(attempt));
                    warn!(
                        file_id = %job.file_id,
                        attempt,
                        backoff_secs = backoff.as_secs(),
                        %message,
                        "Job attempt failed, re-enqueueing"
                    );
                    {
                        let mut state = state.lock().await;
                        state.processing = None;
                        state.queue.push_back(job);
                    }
                    // the single worker pauses here, preserving FIFO order
                    tokio::time::sleep(backoff).await;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn fast_settings() -> QueueSettings {
        QueueSettings {
            max_attempts: 3,
            job_timeout_seconds: 2,
            retry_base_delay_seconds: 0,
            poll_interval_seconds: 1,
            result_wait_timeout_seconds: 60,
            average_job_seconds: 30,
        }
    }

    fn success_job(value: Value) -> JobFn {
        Arc::new(move || {
            let value = value.clone();
            Box::pin(async move { JobOutcome::Success(value) })
        })
    }

    #[tokio::test]
    async fn test_enqueue_and_get_result() {
        let queue = FileQueueManager::new(fast_settings());
        queue
            .enqueue("f1", success_job(serde_json::json!({"ok": true})))
            .await
            .unwrap();

        let result = queue.get_result("f1").await.unwrap();
        assert_eq!(result, serde_json::json!({"ok": true}));
    }

    #[tokio::test]
    async fn test_unknown_job_is_an_error() {
        let queue = FileQueueManager::new(fast_settings());
        assert!(queue.get_result("missing").await.is_err());
        assert!(queue.get_status("missing").await.is_none());
    }

    #[tokio::test]
    async fn test_duplicate_pending_id_rejected() {
        let queue = FileQueueManager::new(fast_settings());
        let slow: JobFn = Arc::new(|| {
            Box::pin(async {
                tokio::time::sleep(Duration::from_millis(200)).await;
                JobOutcome::Success(Value::Null)
            })
        });
        queue.enqueue("f1", slow.clone()).await.unwrap();
        assert!(queue.enqueue("f1", slow).await.is_err());
    }

    #[tokio::test]
    async fn test_retryable_failure_retries_until_success() {
        let queue = FileQueueManager::new(fast_settings());
        let calls = Arc::new(AtomicU32::new(0));

        let counter = Arc::clone(&calls);
        let job: JobFn = Arc::new(move || {
            let counter = Arc::clone(&counter);
            Box::pin(async move {
                if counter.fetch_add(1, Ordering::SeqCst) < 2 {
                    JobOutcome::Retryable("transient".to_string())
                } else {
                    JobOutcome::Success(serde_json::json!("done"))
                }
            })
        });

        queue.enqueue("f1", job).await.unwrap();
        let result = queue.get_result("f1").await.unwrap();
        assert_eq!(result, serde_json::json!("done"));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_retry_budget_exhausted() {
        let queue = FileQueueManager::new(fast_settings());
        let job: JobFn =
            Arc::new(|| Box::pin(async { JobOutcome::Retryable("always down".to_string()) }));

        queue.enqueue("f1", job).await.unwrap();
        let err = queue.get_result("f1").await.unwrap_err();
        assert!(err.to_string().contains("3 attempts"));
    }

    #[tokio::test]
    async fn test_fatal_fails_fast() {
        let queue = FileQueueManager::new(fast_settings());
        let calls = Arc::new(AtomicU32::new(0));

        let counter = Arc::clone(&calls);
        let job: JobFn = Arc::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Box::pin(async { JobOutcome::Fatal("bad input".to_string()) })
        });

        queue.enqueue("f1", job).await.unwrap();
        let err = queue.get_result("f1").await.unwrap_err();
        assert!(err.to_string().contains("bad input"));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_fifo_order() {
        let queue = FileQueueManager::new(fast_settings());
        let order = Arc::new(Mutex::new(Vec::new()));

        for id in ["a", "b", "c"] {
            let order = Arc::clone(&order);
            let job: JobFn = Arc::new(move || {
                let order = Arc::clone(&order);
                Box::pin(async move {
                    order.lock().await.push(id.to_string());
                    JobOutcome::Success(Value::Null)
                })
            });
            queue.enqueue(id, job).await.unwrap();
        }

        queue.get_result("c").await.unwrap();
        let observed = order.lock().await.clone();
        assert_eq!(observed, vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_queued_status_reports_position_and_eta() {
        let queue = FileQueueManager::new(fast_settings());
        let slow: JobFn = Arc::new(|| {
            Box::pin(async {
                tokio::time::sleep(Duration::from_millis(500)).await;
                JobOutcome::Success(Value::Null)
            })
        });

        queue.enqueue("running", slow).await.unwrap();
        queue
            .enqueue("waiting", success_job(Value::Null))
            .await
            .unwrap();

        // give the worker a moment to pick up the first job
        tokio::time::sleep(Duration::from_millis(100)).await;

        match queue.get_status("waiting").await {
            Some(JobStatus::Queued {
                position,
                estimated_wait_secs,
            }) => {
                assert_eq!(position, 1);
                assert_eq!(estimated_wait_secs, 30);
            }
            other => panic!("unexpected status: {other:?}"),
        }

        match queue.get_status("running").await {
            Some(JobStatus::Processing { .. }) => {}
            other => panic!("unexpected status: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_panicking_job_records_error_and_worker_survives() {
        let queue = FileQueueManager::new(fast_settings());

        let job: JobFn = Arc::new(|| Box::pin(async { panic!("recognizer blew up") }));
        queue.enqueue("bad", job).await.unwrap();

        let err = queue.get_result("bad").await.unwrap_err();
        assert!(err.to_string().contains("panicked"));

        // the worker must still accept and run later jobs
        queue
            .enqueue("good", success_job(serde_json::json!("ok")))
            .await
            .unwrap();
        let result = queue.get_result("good").await.unwrap();
        assert_eq!(result, serde_json::json!("ok"));
    }

    #[tokio::test]
    async fn test_get_result_wait_ceiling_expires() {
        let mut settings = fast_settings();
        settings.result_wait_timeout_seconds = 1;
        settings.job_timeout_seconds = 30;
        let queue = FileQueueManager::new(settings);

        let job: JobFn = Arc::new(|| {
            Box::pin(async {
                tokio::time::sleep(Duration::from_secs(10)).await;
                JobOutcome::Success(Value::Null)
            })
        });

        queue.enqueue("slow", job).await.unwrap();
        let err = queue.get_result("slow").await.unwrap_err();
        assert!(err.to_string().contains("Timed out after 1s"));
    }

    #[tokio::test]
    async fn test_timeout_counts_as_retryable() {
        let mut settings = fast_settings();
        settings.job_timeout_seconds = 1;
        settings.max_attempts = 2;
        let queue = FileQueueManager::new(settings);

        let job: JobFn = Arc::new(|| {
            Box::pin(async {
                tokio::time::sleep(Duration::from_secs(10)).await;
                JobOutcome::Success(Value::Null)
            })
        });

        queue.enqueue("f1", job).await.unwrap();
        let err = queue.get_result("f1").await.unwrap_err();
        assert!(err.to_string().contains("timed out"));
    }
}
