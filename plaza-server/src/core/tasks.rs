//! Background task management
//!
//! Central registry for the server's background tasks (dispatch worker,
//! periodic sweeps) with a shared cancellation token and panic
//! containment per task.

use futures::FutureExt;
use std::fmt;
use std::panic::AssertUnwindSafe;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Task kind (logging only)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskKind {
    /// Long-running background worker
    Worker,
    /// Interval-driven task
    Periodic,
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskKind::Worker => write!(f, "Worker"),
            TaskKind::Periodic => write!(f, "Periodic"),
        }
    }
}

struct RegisteredTask {
    name: &'static str,
    kind: TaskKind,
    handle: JoinHandle<()>,
}

/// Background task registry
///
/// ```ignore
/// let mut tasks = BackgroundTasks::new();
/// let shutdown = tasks.shutdown_token();
/// tasks.spawn("dispatch_worker", TaskKind::Worker, async move {
///     worker.run(rx, shutdown).await;
/// });
/// // ...
/// tasks.shutdown().await;
/// ```
pub struct BackgroundTasks {
    tasks: Vec<RegisteredTask>,
    shutdown: CancellationToken,
}

impl BackgroundTasks {
    pub fn new() -> Self {
        Self {
            tasks: Vec::new(),
            shutdown: CancellationToken::new(),
        }
    }

    /// Token the spawned futures should select on
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    /// Register and start a task. A panic inside the task is caught and
    /// logged; it never takes the process down.
    pub fn spawn<F>(&mut self, name: &'static str, kind: TaskKind, fut: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        tracing::info!(task = name, kind = %kind, "Background task started");
        let handle = tokio::spawn(async move {
            if AssertUnwindSafe(fut).catch_unwind().await.is_err() {
                tracing::error!(task = name, "Background task panicked");
            }
        });
        self.tasks.push(RegisteredTask { name, kind, handle });
    }

    /// Cancel all tasks and wait for them to finish (bounded per task)
    pub async fn shutdown(self) {
        self.shutdown.cancel();
        for task in self.tasks {
            let result = tokio::time::timeout(std::time::Duration::from_secs(10), task.handle).await;
            match result {
                Ok(_) => tracing::info!(task = task.name, kind = %task.kind, "Background task stopped"),
                Err(_) => {
                    tracing::warn!(task = task.name, "Background task did not stop in time")
                }
            }
        }
    }
}

impl Default for BackgroundTasks {
    fn default() -> Self {
        Self::new()
    }
}
