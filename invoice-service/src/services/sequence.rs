//! Year-scoped sequential invoice numbering with a file-persisted counter.
//!
//! The counter record is a small JSON document `{ "year": .., "counter": .. }`
//! that is read and overwritten as a whole on every allocation. It survives
//! process restarts; when the calendar year rolls over the counter restarts
//! at 1. The read-modify-write is guarded by an in-process mutex so that
//! concurrent requests cannot observe the same stale counter. Cross-process
//! coordination is out of scope: the file must be owned by one instance.

use chrono::{Datelike, Local};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tokio::sync::Mutex;

use crate::error::AppError;

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct CounterState {
    year: i32,
    counter: u32,
}

impl CounterState {
    fn starting(year: i32) -> Self {
        Self { year, counter: 0 }
    }
}

/// Allocator for `"{year}-{counter:04}"` invoice numbers.
pub struct InvoiceSequence {
    path: PathBuf,
    lock: Mutex<()>,
}

impl InvoiceSequence {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Allocate the next invoice number for the current calendar year.
    ///
    /// The updated counter is persisted before the number is returned, so a
    /// crash after return cannot lose the allocation. A missing or corrupt
    /// counter file starts a fresh sequence; a write failure is fatal for
    /// the request, since handing out a non-durable number is worse than
    /// failing.
    pub async fn allocate(&self) -> Result<String, AppError> {
        self.allocate_in(Local::now().year()).await
    }

    pub(crate) async fn allocate_in(&self, current_year: i32) -> Result<String, AppError> {
        let _guard = self.lock.lock().await;

        let mut state = match tokio::fs::read(&self.path).await {
            Ok(bytes) => serde_json::from_slice(&bytes).unwrap_or_else(|e| {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "unreadable counter state, starting a fresh sequence"
                );
                CounterState::starting(current_year)
            }),
            Err(e) => {
                if e.kind() != std::io::ErrorKind::NotFound {
                    tracing::warn!(
                        path = %self.path.display(),
                        error = %e,
                        "failed to read counter state, starting a fresh sequence"
                    );
                }
                CounterState::starting(current_year)
            }
        };

        if state.year != current_year {
            tracing::info!(
                from_year = state.year,
                to_year = current_year,
                "calendar year changed, resetting invoice counter"
            );
            state = CounterState::starting(current_year);
        }

        state.counter += 1;

        let json = serde_json::to_vec_pretty(&state)
            .map_err(|e| AppError::NumberingError(anyhow::Error::new(e)))?;
        tokio::fs::write(&self.path, json)
            .await
            .map_err(|e| AppError::NumberingError(anyhow::Error::new(e)))?;

        Ok(format!("{}-{:04}", state.year, state.counter))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sequence_in(dir: &tempfile::TempDir) -> InvoiceSequence {
        InvoiceSequence::new(dir.path().join("invoice-counter.json"))
    }

    #[tokio::test]
    async fn counters_start_at_one_and_increase_without_gaps() {
        let dir = tempfile::tempdir().unwrap();
        let seq = sequence_in(&dir);

        assert_eq!(seq.allocate_in(2026).await.unwrap(), "2026-0001");
        assert_eq!(seq.allocate_in(2026).await.unwrap(), "2026-0002");
        assert_eq!(seq.allocate_in(2026).await.unwrap(), "2026-0003");
    }

    #[tokio::test]
    async fn year_change_resets_the_counter() {
        let dir = tempfile::tempdir().unwrap();
        let seq = sequence_in(&dir);

        assert_eq!(seq.allocate_in(2026).await.unwrap(), "2026-0001");
        assert_eq!(seq.allocate_in(2026).await.unwrap(), "2026-0002");
        assert_eq!(seq.allocate_in(2027).await.unwrap(), "2027-0001");
    }

    #[tokio::test]
    async fn persistence_is_transparent_across_reloads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("invoice-counter.json");

        let seq = InvoiceSequence::new(&path);
        assert_eq!(seq.allocate_in(2026).await.unwrap(), "2026-0001");
        drop(seq);

        // A fresh instance over the same file continues the sequence.
        let reloaded = InvoiceSequence::new(&path);
        assert_eq!(reloaded.allocate_in(2026).await.unwrap(), "2026-0002");
    }

    #[tokio::test]
    async fn corrupt_counter_file_starts_a_fresh_sequence() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("invoice-counter.json");
        tokio::fs::write(&path, b"not json at all").await.unwrap();

        let seq = InvoiceSequence::new(&path);
        assert_eq!(seq.allocate_in(2026).await.unwrap(), "2026-0001");
    }

    #[tokio::test]
    async fn unwritable_counter_path_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        // A directory component that does not exist makes the write fail.
        let seq = InvoiceSequence::new(dir.path().join("missing").join("counter.json"));

        let err = seq.allocate_in(2026).await.unwrap_err();
        assert!(matches!(err, AppError::NumberingError(_)));
    }

    #[tokio::test]
    async fn counter_file_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("invoice-counter.json");

        let seq = InvoiceSequence::new(&path);
        seq.allocate_in(2026).await.unwrap();
        seq.allocate_in(2026).await.unwrap();

        let bytes = tokio::fs::read(&path).await.unwrap();
        let state: CounterState = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(state.year, 2026);
        assert_eq!(state.counter, 2);
    }
}
