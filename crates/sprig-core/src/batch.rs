use std::sync::Arc;

use tokio::sync::{Mutex, mpsc};
use tokio_util::sync::CancellationToken;

use crate::error::AppError;
use crate::scrape::{ImageOutcome, ScrapeOutcome, ScrapeService};
use crate::traits::{AssetDownloader, Fetcher, ProfileStore};

/// Events emitted by batch workers for monitoring/logging.
#[derive(Debug, Clone)]
pub enum BatchEvent<'a> {
    WorkerStarted {
        worker: usize,
    },
    ProfileStarted {
        worker: usize,
        identifier: &'a str,
    },
    ProfileCompleted {
        worker: usize,
        outcome: &'a ScrapeOutcome,
    },
    ProfileFailed {
        worker: usize,
        identifier: &'a str,
        error: &'a AppError,
    },
    WorkerStopped {
        worker: usize,
        cancelled: bool,
    },
}

/// Trait for receiving batch events (decoupled logging).
pub trait BatchReporter: Send + Sync {
    fn report(&self, event: BatchEvent<'_>) {
        let _ = event;
    }
}

/// Reporter that uses the `tracing` crate.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingBatchReporter;

impl BatchReporter for TracingBatchReporter {
    fn report(&self, event: BatchEvent<'_>) {
        match event {
            BatchEvent::WorkerStarted { worker } => {
                tracing::debug!(%worker, "Worker started");
            }
            BatchEvent::ProfileStarted { worker, identifier } => {
                tracing::info!(%worker, %identifier, "Scraping profile");
            }
            BatchEvent::ProfileCompleted { worker, outcome } => {
                tracing::info!(
                    %worker,
                    identifier = %outcome.identifier,
                    path = %outcome.json_path.display(),
                    "Profile completed"
                );
            }
            BatchEvent::ProfileFailed {
                worker,
                identifier,
                error,
            } => {
                tracing::warn!(%worker, %identifier, %error, "Profile failed");
            }
            BatchEvent::WorkerStopped { worker, cancelled } => {
                tracing::debug!(%worker, %cancelled, "Worker stopped");
            }
        }
    }
}

/// Per-identifier result sent from workers to the aggregator.
#[derive(Debug)]
pub struct BatchEntry {
    pub identifier: String,
    pub result: Result<ScrapeOutcome, AppError>,
}

/// Aggregated results of a batch run, in completion order.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub entries: Vec<BatchEntry>,
}

impl BatchReport {
    pub fn succeeded(&self) -> usize {
        self.entries.iter().filter(|e| e.result.is_ok()).count()
    }

    pub fn failed(&self) -> usize {
        self.entries.len() - self.succeeded()
    }

    /// Profiles whose JSON was written but whose image download failed.
    pub fn image_failures(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| {
                matches!(
                    &e.result,
                    Ok(ScrapeOutcome {
                        image: ImageOutcome::Failed(_),
                        ..
                    })
                )
            })
            .count()
    }
}

/// Scrapes many profiles with a bounded pool of workers.
///
/// Workers pull identifiers from a shared queue and run the full pipeline
/// independently; results flow back over a channel. Cancellation stops
/// workers from taking new identifiers; in-flight scrapes finish.
pub struct BatchRunner<F, S, D>
where
    F: Fetcher,
    S: ProfileStore,
    D: AssetDownloader,
{
    service: Arc<ScrapeService<F, S, D>>,
    concurrency: usize,
}

impl<F, S, D> BatchRunner<F, S, D>
where
    F: Fetcher + 'static,
    S: ProfileStore + 'static,
    D: AssetDownloader + 'static,
{
    pub fn new(service: ScrapeService<F, S, D>, concurrency: usize) -> Self {
        Self {
            service: Arc::new(service),
            concurrency: concurrency.max(1),
        }
    }

    pub async fn run<R>(
        &self,
        identifiers: Vec<String>,
        cancel_token: CancellationToken,
        reporter: Arc<R>,
    ) -> BatchReport
    where
        R: BatchReporter + 'static,
    {
        let workers = self.concurrency.min(identifiers.len());
        let (job_tx, job_rx) = mpsc::channel::<String>(identifiers.len().max(1));
        for identifier in identifiers {
            // Capacity covers every identifier, so this never waits.
            if job_tx.send(identifier).await.is_err() {
                break;
            }
        }
        drop(job_tx);

        let job_rx = Arc::new(Mutex::new(job_rx));
        let (result_tx, mut result_rx) = mpsc::channel::<BatchEntry>(workers.max(1));

        for worker in 0..workers {
            let service = Arc::clone(&self.service);
            let job_rx = Arc::clone(&job_rx);
            let result_tx = result_tx.clone();
            let cancel_token = cancel_token.clone();
            let reporter = Arc::clone(&reporter);

            tokio::spawn(async move {
                reporter.report(BatchEvent::WorkerStarted { worker });
                let cancelled = loop {
                    let next = tokio::select! {
                        biased;
                        () = cancel_token.cancelled() => break true,
                        next = async { job_rx.lock().await.recv().await } => next,
                    };
                    let Some(identifier) = next else {
                        break false;
                    };

                    reporter.report(BatchEvent::ProfileStarted {
                        worker,
                        identifier: &identifier,
                    });
                    let result = service.scrape(&identifier).await;
                    match &result {
                        Ok(outcome) => reporter.report(BatchEvent::ProfileCompleted { worker, outcome }),
                        Err(error) => reporter.report(BatchEvent::ProfileFailed {
                            worker,
                            identifier: &identifier,
                            error,
                        }),
                    }

                    if result_tx.send(BatchEntry { identifier, result }).await.is_err() {
                        break false;
                    }
                };
                reporter.report(BatchEvent::WorkerStopped { worker, cancelled });
            });
        }
        drop(result_tx);

        let mut report = BatchReport::default();
        while let Some(entry) = result_rx.recv().await {
            report.entries.push(entry);
        }
        report
    }
}
