// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! What people search for, and what they do not find.
//!
//! Samples live in a bounded ring buffer. Persistence is optional and
//! best-effort: a store failure is logged and otherwise ignored. Writes run
//! on a dedicated thread fed through a channel, in the order the buffer
//! changed, so `track` never waits on the store.

use std::collections::{HashMap, HashSet, VecDeque};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::build::snapshot::write_atomically;
use crate::clock::Clock;
use crate::config::AnalyticsConfig;
use crate::error::PersistError;
use crate::utils::normalize_query;

pub const DEFAULT_ANALYTICS_CAPACITY: usize = 1000;
pub const DEFAULT_PERSIST_RECENT: usize = 100;

/// Entries in the top-N lists of [`AnalyticsStats`].
const STATS_TOP_N: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSample {
    /// Lowercased and trimmed.
    pub query: String,
    pub result_count: usize,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_tag: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermCount {
    pub term: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsStats {
    pub total_searches: usize,
    pub unique_queries: usize,
    pub average_result_count: f64,
    /// Fraction of samples with zero results, in `[0, 1]`.
    pub no_result_rate: f64,
    pub popular_terms: Vec<TermCount>,
    pub no_result_queries: Vec<TermCount>,
}

/// Somewhere to keep recent samples between runs.
pub trait AnalyticsStore: Send + Sync {
    fn save(&self, samples: &[AnalyticsSample]) -> Result<(), PersistError>;

    /// Empty when nothing has been saved yet.
    fn load(&self) -> Result<Vec<AnalyticsSample>, PersistError>;

    fn clear(&self) -> Result<(), PersistError>;
}

/// Samples as a JSON array in one file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> PersistError {
        PersistError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl AnalyticsStore for JsonFileStore {
    fn save(&self, samples: &[AnalyticsSample]) -> Result<(), PersistError> {
        let json = serde_json::to_string(samples)?;
        write_atomically(&self.path, json.as_bytes())
    }

    fn load(&self) -> Result<Vec<AnalyticsSample>, PersistError> {
        match fs::read_to_string(&self.path) {
            Ok(raw) => Ok(serde_json::from_str(&raw)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(self.io_error(e)),
        }
    }

    fn clear(&self) -> Result<(), PersistError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.io_error(e)),
        }
    }
}

/// Count occurrences, most frequent first, ties by first appearance.
fn frequencies<'a>(queries: impl Iterator<Item = &'a str>, limit: usize) -> Vec<TermCount> {
    let mut counts: Vec<TermCount> = Vec::new();
    let mut slots: HashMap<&str, usize> = HashMap::new();
    for query in queries.filter(|q| q.chars().count() > 1) {
        match slots.get(query) {
            Some(&slot) => counts[slot].count += 1,
            None => {
                slots.insert(query, counts.len());
                counts.push(TermCount {
                    term: query.to_string(),
                    count: 1,
                });
            }
        }
    }
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts.truncate(limit);
    counts
}

enum WriteJob {
    Save(Vec<AnalyticsSample>),
    Clear,
    /// Acknowledged once every earlier job has run.
    Flush(flume::Sender<()>),
}

fn spawn_writer(store: Arc<dyn AnalyticsStore>) -> Option<flume::Sender<WriteJob>> {
    let (jobs, queue) = flume::unbounded();
    let spawned = thread::Builder::new()
        .name("lectern-analytics".into())
        .spawn(move || run_writer(store.as_ref(), &queue));
    match spawned {
        Ok(_) => Some(jobs),
        Err(e) => {
            warn!(error = %e, "failed to start analytics writer, persistence disabled");
            None
        }
    }
}

/// Runs until every sender is gone and the queue is drained.
fn run_writer(store: &dyn AnalyticsStore, queue: &flume::Receiver<WriteJob>) {
    let mut next = queue.recv().ok();
    while let Some(job) = next.take() {
        match job {
            WriteJob::Save(mut tail) => {
                // A backlog of saves collapses into the newest tail.
                loop {
                    match queue.try_recv() {
                        Ok(WriteJob::Save(newer)) => tail = newer,
                        Ok(other) => {
                            next = Some(other);
                            break;
                        }
                        Err(_) => break,
                    }
                }
                if let Err(e) = store.save(&tail) {
                    warn!(error = %e, "failed to persist search analytics");
                }
            }
            WriteJob::Clear => {
                if let Err(e) = store.clear() {
                    warn!(error = %e, "failed to clear stored search analytics");
                }
            }
            WriteJob::Flush(done) => {
                let _ = done.send(());
            }
        }
        if next.is_none() {
            next = queue.recv().ok();
        }
    }
    debug!("analytics writer stopped");
}

pub struct AnalyticsRecorder {
    samples: Mutex<VecDeque<AnalyticsSample>>,
    capacity: usize,
    persist_recent: usize,
    store: Option<Arc<dyn AnalyticsStore>>,
    writer: Option<flume::Sender<WriteJob>>,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for AnalyticsRecorder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnalyticsRecorder")
            .field("capacity", &self.capacity)
            .field("samples", &self.len())
            .field("persistent", &self.store.is_some())
            .finish()
    }
}

impl AnalyticsRecorder {
    pub fn new(capacity: usize, clock: Arc<dyn Clock>) -> Self {
        Self {
            samples: Mutex::new(VecDeque::new()),
            capacity,
            persist_recent: DEFAULT_PERSIST_RECENT,
            store: None,
            writer: None,
            clock,
        }
    }

    /// Recorder sized from config, backed by a [`JsonFileStore`] when a
    /// persist path is set.
    pub fn from_config(config: &AnalyticsConfig, clock: Arc<dyn Clock>) -> Self {
        let recorder = Self::new(config.capacity, clock).with_persist_recent(config.persist_recent);
        match &config.persist_path {
            Some(path) => recorder.with_store(Arc::new(JsonFileStore::new(path))),
            None => recorder,
        }
    }

    /// Persist through `store` on a background writer thread.
    pub fn with_store(mut self, store: Arc<dyn AnalyticsStore>) -> Self {
        self.writer = spawn_writer(Arc::clone(&store));
        self.store = Some(store);
        self
    }

    pub fn with_persist_recent(mut self, n: usize) -> Self {
        self.persist_recent = n;
        self
    }

    /// Record one query. Never fails and never waits on the store.
    pub fn track(&self, query: &str, result_count: usize, client_tag: Option<&str>) {
        let sample = AnalyticsSample {
            query: normalize_query(query),
            result_count,
            timestamp: self.clock.now(),
            client_tag: client_tag.map(str::to_string),
        };

        let mut samples = self.samples.lock();
        samples.push_back(sample);
        while samples.len() > self.capacity {
            samples.pop_front();
        }
        // Queued under the lock so the writer sees tails in buffer order.
        if let Some(writer) = &self.writer {
            let _ = writer.send(WriteJob::Save(self.tail(&samples)));
        }
    }

    fn tail(&self, samples: &VecDeque<AnalyticsSample>) -> Vec<AnalyticsSample> {
        let skip = samples.len().saturating_sub(self.persist_recent);
        samples.iter().skip(skip).cloned().collect()
    }

    /// Write the most recent samples to the store and wait until every
    /// queued write has landed.
    pub fn flush(&self) {
        let Some(writer) = &self.writer else {
            return;
        };
        {
            let samples = self.samples.lock();
            let _ = writer.send(WriteJob::Save(self.tail(&samples)));
        }
        self.wait_for_writer(writer);
    }

    fn wait_for_writer(&self, writer: &flume::Sender<WriteJob>) {
        let (done, acked) = flume::bounded(1);
        if writer.send(WriteJob::Flush(done)).is_ok() {
            let _ = acked.recv();
        }
    }

    /// Replace the buffer with whatever the store holds.
    pub fn load_from_store(&self) {
        let Some(store) = &self.store else {
            return;
        };
        match store.load() {
            Ok(loaded) => {
                let skip = loaded.len().saturating_sub(self.capacity);
                *self.samples.lock() = loaded.into_iter().skip(skip).collect();
            }
            Err(e) => warn!(error = %e, "failed to load search analytics"),
        }
    }

    /// Empty the buffer and the store. Waits for the store.
    pub fn clear(&self) {
        let mut samples = self.samples.lock();
        samples.clear();
        let Some(writer) = &self.writer else {
            return;
        };
        let _ = writer.send(WriteJob::Clear);
        drop(samples);
        self.wait_for_writer(writer);
    }

    pub fn len(&self) -> usize {
        self.samples.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn samples(&self) -> Vec<AnalyticsSample> {
        self.samples.lock().iter().cloned().collect()
    }

    /// Most frequent queries, ignoring 1-char ones.
    pub fn popular_terms(&self, limit: usize) -> Vec<TermCount> {
        let samples = self.samples.lock();
        frequencies(samples.iter().map(|s| s.query.as_str()), limit)
    }

    /// Most frequent queries that found nothing.
    pub fn zero_result_queries(&self, limit: usize) -> Vec<TermCount> {
        let samples = self.samples.lock();
        frequencies(
            samples
                .iter()
                .filter(|s| s.result_count == 0)
                .map(|s| s.query.as_str()),
            limit,
        )
    }

    pub fn stats(&self) -> AnalyticsStats {
        let samples = self.samples.lock();
        let total = samples.len();
        let unique: HashSet<&str> = samples.iter().map(|s| s.query.as_str()).collect();
        let results: usize = samples.iter().map(|s| s.result_count).sum();
        let zero = samples.iter().filter(|s| s.result_count == 0).count();

        let ratio = |n: usize| if total == 0 { 0.0 } else { n as f64 / total as f64 };

        AnalyticsStats {
            total_searches: total,
            unique_queries: unique.len(),
            average_result_count: ratio(results),
            no_result_rate: ratio(zero),
            popular_terms: frequencies(samples.iter().map(|s| s.query.as_str()), STATS_TOP_N),
            no_result_queries: frequencies(
                samples
                    .iter()
                    .filter(|s| s.result_count == 0)
                    .map(|s| s.query.as_str()),
                STATS_TOP_N,
            ),
        }
    }
}
