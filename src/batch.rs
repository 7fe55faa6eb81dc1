//! Concurrent batch execution with all-success/any-failure reduction

use crate::error::{Error, Result};
use futures::future::{join_all, BoxFuture};
use std::future::Future;

/// Runs a set of fallible tasks concurrently and reduces their outcomes into
/// a single result.
///
/// `exec` returns `Ok(())` only when every task returned `Ok(())`. When one
/// or more tasks fail, the error collected last wins; which one that is
/// depends on completion order and callers must not rely on it.
///
/// Tasks are spawned, not merely polled: a caller that stops awaiting `exec`
/// leaves the already-started tasks running to completion in the background,
/// where the runtime reaps them. There is no per-task cancellation.
pub struct BatchRunner {
    tasks: Vec<BoxFuture<'static, Result<()>>>,
}

impl BatchRunner {
    pub fn new() -> Self {
        Self { tasks: Vec::new() }
    }

    /// Queue a task for the next `exec` call.
    pub fn add_task<F>(&mut self, task: F)
    where
        F: Future<Output = Result<()>> + Send + 'static,
    {
        self.tasks.push(Box::pin(task));
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Start all queued tasks concurrently and wait for every one of them.
    ///
    /// An empty batch succeeds immediately. A panicking task is reported as
    /// an error rather than unwinding into the caller.
    pub async fn exec(self) -> Result<()> {
        if self.tasks.is_empty() {
            return Ok(());
        }

        let handles: Vec<_> = self.tasks.into_iter().map(tokio::spawn).collect();

        let mut failure = None;
        for outcome in join_all(handles).await {
            match outcome {
                Ok(Ok(())) => {}
                Ok(Err(e)) => failure = Some(e),
                Err(e) => failure = Some(Error::Other(format!("batch task panicked: {e}"))),
            }
        }

        match failure {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

impl Default for BatchRunner {
    fn default() -> Self {
        Self::new()
    }
}
