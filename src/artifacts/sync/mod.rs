//! Transfer scheduling and per-object reporting for push and pull
//!
//! Transfers run through a bounded pool (`buffer_unordered`) and stop at the first
//! failure: objects still in flight are dropped, objects already transferred stay
//! where they are. The report records what happened to every object that was
//! settled before the stop, so a failed run still tells the user which subset
//! made it.

use crate::artifacts::core::error::OrbitError;
use colored::Colorize;
use derive_new::new;
use futures::StreamExt;
use futures::stream;
use std::future::Future;
use std::io::Write;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransferOutcome {
    Transferred,
    /// Already present at the destination
    Skipped,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct ObjectReport {
    pub key: String,
    pub bytes: usize,
    pub outcome: TransferOutcome,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    objects: Vec<ObjectReport>,
}

impl SyncReport {
    pub fn record(&mut self, object: ObjectReport) {
        self.objects.push(object);
    }

    /// Per-object outcomes, sorted by key
    pub fn objects(&self) -> &[ObjectReport] {
        &self.objects
    }

    pub fn transferred(&self) -> usize {
        self.count(|outcome| *outcome == TransferOutcome::Transferred)
    }

    pub fn skipped(&self) -> usize {
        self.count(|outcome| *outcome == TransferOutcome::Skipped)
    }

    pub fn failed(&self) -> usize {
        self.count(|outcome| matches!(outcome, TransferOutcome::Failed(_)))
    }

    fn count(&self, predicate: impl Fn(&TransferOutcome) -> bool) -> usize {
        self.objects
            .iter()
            .filter(|object| predicate(&object.outcome))
            .count()
    }

    /// Fold the outcomes of a later phase into this report
    pub fn absorb(&mut self, other: SyncReport) {
        self.objects.extend(other.objects);
        self.sort();
    }

    fn sort(&mut self) {
        self.objects.sort_by(|a, b| a.key.cmp(&b.key));
    }

    /// One line per object, in key order
    pub fn write_to(&self, writer: &mut dyn Write) -> std::io::Result<()> {
        for object in &self.objects {
            match &object.outcome {
                TransferOutcome::Transferred => {
                    writeln!(writer, "{} {} ({} bytes)", "ok".green(), object.key, object.bytes)?
                }
                TransferOutcome::Skipped => {
                    writeln!(writer, "{} {}", "up-to-date".dimmed(), object.key)?
                }
                TransferOutcome::Failed(reason) => {
                    writeln!(writer, "{} {}: {}", "failed".red(), object.key, reason)?
                }
            }
        }

        Ok(())
    }
}

/// A failed transfer: the object key plus the cause
pub type TransferFailure = (String, OrbitError);

/// Run `work` for every item with at most `workers` in flight
///
/// Returns the report of every settled object and, when a transfer failed, the
/// error that stopped the run.
pub async fn run_bounded<T, F, Fut>(
    items: Vec<T>,
    workers: usize,
    work: F,
) -> (SyncReport, Option<OrbitError>)
where
    F: FnMut(T) -> Fut,
    Fut: Future<Output = Result<ObjectReport, TransferFailure>>,
{
    let mut report = SyncReport::default();
    let mut results = stream::iter(items).map(work).buffer_unordered(workers.max(1));
    let mut failure = None;

    while let Some(result) = results.next().await {
        match result {
            Ok(object) => report.record(object),
            Err((key, error)) => {
                tracing::warn!(%key, "transfer failed: {}", error);
                report.record(ObjectReport::new(
                    key,
                    0,
                    TransferOutcome::Failed(error.to_string()),
                ));
                failure = Some(error);
                break;
            }
        }
    }
    report.sort();

    (report, failure)
}

/// Bound a single remote call by `timeout`
pub async fn with_timeout<T>(
    key: &str,
    timeout: Duration,
    call: impl Future<Output = Result<T, OrbitError>>,
) -> Result<T, OrbitError> {
    tokio::time::timeout(timeout, call).await.map_err(|_| {
        OrbitError::network(key, format!("timed out after {}s", timeout.as_secs()))
    })?
}
