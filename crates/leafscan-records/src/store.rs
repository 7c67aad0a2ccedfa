use std::sync::{Arc, RwLock};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use leafscan_types::{DiseaseClass, RecordId, RequesterId};

use crate::error::{RecordError, RecordResult};
use crate::mirror::RecordMirror;
use crate::record::AnalysisRecord;
use crate::stats::RecordStats;

/// Upper bound on a single mirror write unless configured otherwise.
pub const DEFAULT_MIRROR_TIMEOUT: Duration = Duration::from_secs(5);

/// Append-only store of analysis records.
pub struct RecordStore {
    records: RwLock<Vec<AnalysisRecord>>,
    mirror: Option<Arc<dyn RecordMirror>>,
    mirror_timeout: Duration,
}

impl RecordStore {
    /// A purely local store.
    pub fn new() -> Self {
        Self {
            records: RwLock::new(Vec::new()),
            mirror: None,
            mirror_timeout: DEFAULT_MIRROR_TIMEOUT,
        }
    }

    /// A store that also submits each record to `mirror`, giving every write
    /// at most `timeout` to complete.
    pub fn with_mirror(mirror: Arc<dyn RecordMirror>, timeout: Duration) -> Self {
        Self {
            records: RwLock::new(Vec::new()),
            mirror: Some(mirror),
            mirror_timeout: timeout,
        }
    }

    pub fn mirror_enabled(&self) -> bool {
        self.mirror.is_some()
    }

    /// Append a record with a fresh id and return it.
    ///
    /// The mirror write, if any, runs on a background task; its outcome never
    /// reaches the caller.
    pub fn add_record(
        &self,
        requester_id: &RequesterId,
        prediction_label: DiseaseClass,
        confidence: f64,
        timestamp: DateTime<Utc>,
    ) -> RecordResult<AnalysisRecord> {
        let record = AnalysisRecord {
            record_id: RecordId::new(),
            requester_id: requester_id.clone(),
            prediction_label,
            confidence,
            timestamp,
        };

        {
            let mut records = self.records.write().map_err(|_| RecordError::LockPoisoned)?;
            records.push(record.clone());
            debug!(
                record = %record.record_id.short_id(),
                label = %prediction_label,
                total = records.len(),
                "stored analysis record"
            );
        }

        if let Some(mirror) = &self.mirror {
            self.mirror_in_background(Arc::clone(mirror), record.clone());
        }

        Ok(record)
    }

    /// Snapshot of all records in insertion order.
    pub fn list_records(&self) -> RecordResult<Vec<AnalysisRecord>> {
        Ok(self
            .records
            .read()
            .map_err(|_| RecordError::LockPoisoned)?
            .clone())
    }

    pub fn len(&self) -> RecordResult<usize> {
        Ok(self.records.read().map_err(|_| RecordError::LockPoisoned)?.len())
    }

    pub fn is_empty(&self) -> RecordResult<bool> {
        Ok(self.len()? == 0)
    }

    /// Distribution and summary figures over the current records.
    pub fn stats(&self) -> RecordResult<RecordStats> {
        let records = self.records.read().map_err(|_| RecordError::LockPoisoned)?;
        Ok(RecordStats::from_records(&records))
    }

    fn mirror_in_background(&self, mirror: Arc<dyn RecordMirror>, record: AnalysisRecord) {
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            warn!(
                mirror = mirror.name(),
                record = %record.record_id,
                "no async runtime available; record not mirrored"
            );
            return;
        };

        let timeout = self.mirror_timeout;
        runtime.spawn(async move {
            match tokio::time::timeout(timeout, mirror.persist(&record)).await {
                Ok(Ok(())) => {
                    debug!(mirror = mirror.name(), record = %record.record_id, "record mirrored");
                }
                Ok(Err(e)) => {
                    warn!(
                        mirror = mirror.name(),
                        record = %record.record_id,
                        error = %e,
                        "failed to mirror record"
                    );
                }
                Err(_) => {
                    warn!(
                        mirror = mirror.name(),
                        record = %record.record_id,
                        timeout_ms = timeout.as_millis() as u64,
                        "mirror write timed out"
                    );
                }
            }
        });
    }
}

impl Default for RecordStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use tokio::sync::mpsc;

    use super::*;
    use crate::error::MirrorError;

    struct ChannelMirror(mpsc::UnboundedSender<AnalysisRecord>);

    #[async_trait]
    impl RecordMirror for ChannelMirror {
        fn name(&self) -> &str {
            "channel"
        }

        async fn persist(&self, record: &AnalysisRecord) -> Result<(), MirrorError> {
            self.0
                .send(record.clone())
                .map_err(|e| MirrorError::Unavailable(e.to_string()))
        }
    }

    struct DownMirror;

    #[async_trait]
    impl RecordMirror for DownMirror {
        fn name(&self) -> &str {
            "down"
        }

        async fn persist(&self, _record: &AnalysisRecord) -> Result<(), MirrorError> {
            Err(MirrorError::Unavailable("connection refused".into()))
        }
    }

    struct StalledMirror;

    #[async_trait]
    impl RecordMirror for StalledMirror {
        fn name(&self) -> &str {
            "stalled"
        }

        async fn persist(&self, _record: &AnalysisRecord) -> Result<(), MirrorError> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok(())
        }
    }

    fn add(store: &RecordStore, who: &str, label: DiseaseClass) -> AnalysisRecord {
        store
            .add_record(&RequesterId::new(who), label, 80.0, Utc::now())
            .unwrap()
    }

    #[test]
    fn records_keep_insertion_order() {
        let store = RecordStore::new();
        let a = add(&store, "a", DiseaseClass::Anthracnose);
        let b = add(&store, "b", DiseaseClass::PowderyMildew);
        let c = add(&store, "c", DiseaseClass::Anthracnose);

        assert_eq!(store.list_records().unwrap(), vec![a, b, c]);
        assert_eq!(store.len().unwrap(), 3);
        assert!(!store.mirror_enabled());
    }

    #[test]
    fn record_fields_are_copied_from_arguments() {
        let store = RecordStore::new();
        let at = Utc::now();
        let record = store
            .add_record(&RequesterId::new("userA"), DiseaseClass::ShotHoleDisease, 42.5, at)
            .unwrap();

        assert_eq!(record.requester_id.as_str(), "userA");
        assert_eq!(record.prediction_label, DiseaseClass::ShotHoleDisease);
        assert_eq!(record.confidence, 42.5);
        assert_eq!(record.timestamp, at);
    }

    #[test]
    fn record_ids_are_unique() {
        let store = RecordStore::new();
        let a = add(&store, "a", DiseaseClass::Anthracnose);
        let b = add(&store, "a", DiseaseClass::Anthracnose);
        assert_ne!(a.record_id, b.record_id);
    }

    #[tokio::test]
    async fn mirror_receives_a_copy() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let store = RecordStore::with_mirror(Arc::new(ChannelMirror(tx)), DEFAULT_MIRROR_TIMEOUT);
        assert!(store.mirror_enabled());

        let record = add(&store, "userA", DiseaseClass::CercosporaLeafSpot);
        let mirrored = tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(mirrored, record);
    }

    #[tokio::test]
    async fn mirror_failure_is_not_surfaced() {
        let store = RecordStore::with_mirror(Arc::new(DownMirror), DEFAULT_MIRROR_TIMEOUT);
        let a = add(&store, "a", DiseaseClass::BacterialBlight);
        let b = add(&store, "b", DiseaseClass::BacterialBlight);
        tokio::task::yield_now().await;
        assert_eq!(store.list_records().unwrap(), vec![a, b]);
    }

    #[tokio::test]
    async fn stalled_mirror_does_not_block_append() {
        let store =
            RecordStore::with_mirror(Arc::new(StalledMirror), Duration::from_millis(20));
        let started = std::time::Instant::now();
        add(&store, "a", DiseaseClass::Anthracnose);
        add(&store, "b", DiseaseClass::Anthracnose);
        assert!(started.elapsed() < Duration::from_secs(1));
        assert_eq!(store.len().unwrap(), 2);
    }

    #[test]
    fn mirror_without_runtime_still_stores() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let store = RecordStore::with_mirror(Arc::new(ChannelMirror(tx)), DEFAULT_MIRROR_TIMEOUT);
        add(&store, "a", DiseaseClass::PowderyMildew);
        assert_eq!(store.len().unwrap(), 1);
    }

    #[test]
    fn stats_reflect_records() {
        let store = RecordStore::new();
        assert!(store.is_empty().unwrap());
        add(&store, "a", DiseaseClass::PowderyMildew);
        add(&store, "b", DiseaseClass::PowderyMildew);
        let stats = store.stats().unwrap();
        assert_eq!(stats.total_analyses, 2);
        assert_eq!(stats.distribution[&DiseaseClass::PowderyMildew], 2);
    }
}
