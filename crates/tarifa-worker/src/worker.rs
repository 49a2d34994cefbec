use std::any::Any;
use std::time::Instant;

use tarifa_diff::{compare_grids, Comparison, DiffConfig, DiffResult};
use tokio::sync::watch;
use tokio::time;
use tracing::{debug, info, warn};

use crate::config::WorkerConfig;
use crate::error::{WorkerError, WorkerResult};
use crate::message::{ComparisonReply, ComparisonRequest};

/// Runs comparisons off the async executor, latest request wins.
///
/// Each submission takes the next generation number and publishes it on a
/// `watch` channel. A request still running when a newer generation appears
/// resolves to [`WorkerError::Superseded`]; its computation is left to
/// finish on the blocking pool and the result is discarded.
pub struct ComparisonWorker {
    config: WorkerConfig,
    diff_config: DiffConfig,
    generation: watch::Sender<u64>,
}

impl ComparisonWorker {
    pub fn new(config: WorkerConfig, diff_config: DiffConfig) -> Self {
        let (generation, _) = watch::channel(0);
        Self {
            config,
            diff_config,
            generation,
        }
    }

    pub fn config(&self) -> &WorkerConfig {
        &self.config
    }

    /// Generation of the most recent submission (0 before any).
    pub fn current_generation(&self) -> u64 {
        *self.generation.borrow()
    }

    /// Compare `request.base_data` against `request.new_data`.
    ///
    /// The base list is the subject: the returned display data and every
    /// difference coordinate index its rows.
    pub async fn submit(&self, request: ComparisonRequest) -> WorkerResult<Comparison> {
        let diff_config = self.diff_config.clone();
        self.run(move || compare_grids(&request.base_data, &request.new_data, &diff_config))
            .await
    }

    /// [`submit`](Self::submit), folded into a serializable reply.
    pub async fn reply(&self, request: ComparisonRequest) -> ComparisonReply {
        ComparisonReply::from(self.submit(request).await)
    }

    fn next_generation(&self) -> u64 {
        let mut generation = 0;
        self.generation.send_modify(|current| {
            *current += 1;
            generation = *current;
        });
        generation
    }

    async fn run<F>(&self, job: F) -> WorkerResult<Comparison>
    where
        F: FnOnce() -> DiffResult<Comparison> + Send + 'static,
    {
        let generation = self.next_generation();
        let mut newer = self.generation.subscribe();
        let limit = self.config.timeout();
        let started = Instant::now();
        debug!(generation, "comparison submitted");

        let superseded = async move {
            let closed = newer.wait_for(|latest| *latest != generation).await.is_err();
            if closed {
                std::future::pending::<()>().await;
            }
        };

        let outcome = tokio::select! {
            joined = time::timeout(limit, tokio::task::spawn_blocking(job)) => match joined {
                Err(_) => Err(WorkerError::Timeout(limit)),
                Ok(Err(join_error)) if join_error.is_panic() => {
                    Err(WorkerError::Crashed(panic_message(join_error.into_panic())))
                }
                Ok(Err(join_error)) => Err(WorkerError::Crashed(join_error.to_string())),
                Ok(Ok(result)) => result.map_err(WorkerError::from),
            },
            _ = superseded => Err(WorkerError::Superseded { generation }),
        };

        // A result that lands after a newer submission is stale.
        let outcome = match outcome {
            Ok(_) if self.current_generation() != generation => {
                Err(WorkerError::Superseded { generation })
            }
            other => other,
        };

        let elapsed_ms = started.elapsed().as_millis() as u64;
        match &outcome {
            Ok(comparison) => info!(
                generation,
                elapsed_ms,
                differences = comparison.differences.len(),
                "comparison finished"
            ),
            Err(WorkerError::Superseded { .. }) => {
                debug!(generation, elapsed_ms, "comparison superseded")
            }
            Err(e) => warn!(generation, elapsed_ms, error = %e, "comparison failed"),
        }
        outcome
    }
}

impl std::fmt::Debug for ComparisonWorker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComparisonWorker")
            .field("timeout_ms", &self.config.timeout_ms)
            .field("generation", &self.current_generation())
            .finish()
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
