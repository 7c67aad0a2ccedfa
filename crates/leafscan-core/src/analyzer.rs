use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use leafscan_crypto::digest;
use leafscan_ledger::{InMemoryLedger, LedgerReader, LedgerWriter};
use leafscan_records::RecordStore;
use leafscan_types::RequesterId;

use crate::classifier::{ClassificationError, Classifier};
use crate::error::{AnalyzeError, AnalyzeResult};
use crate::result::PredictionResult;

/// Tunables for [`Analyzer`].
#[derive(Clone, Debug)]
pub struct AnalyzerConfig {
    /// Length of `all_predictions` in each result.
    pub top_predictions: usize,
    /// Upper bound on a single classifier call.
    pub classify_timeout: Duration,
    /// Requester used when the caller supplies none.
    pub fallback_requester: String,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            top_predictions: 3,
            classify_timeout: Duration::from_secs(10),
            fallback_requester: "anonymous".into(),
        }
    }
}

/// Headline figures for the landing page.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Overview {
    pub total_analyses: usize,
    pub blockchain_blocks: u64,
    pub total_transactions: u64,
    /// Whether records are mirrored to an external store.
    pub cloud_enabled: bool,
}

/// The prediction entry point, wired to its collaborators at startup.
pub struct Analyzer {
    ledger: Arc<InMemoryLedger>,
    records: Arc<RecordStore>,
    classifier: Arc<dyn Classifier>,
    config: AnalyzerConfig,
}

impl Analyzer {
    pub fn new(
        ledger: Arc<InMemoryLedger>,
        records: Arc<RecordStore>,
        classifier: Arc<dyn Classifier>,
        config: AnalyzerConfig,
    ) -> Self {
        Self {
            ledger,
            records,
            classifier,
            config,
        }
    }

    pub fn ledger(&self) -> &Arc<InMemoryLedger> {
        &self.ledger
    }

    pub fn records(&self) -> &Arc<RecordStore> {
        &self.records
    }

    pub fn classifier(&self) -> &Arc<dyn Classifier> {
        &self.classifier
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Analyze `image` on behalf of `requester`, or the configured fallback
    /// when `requester` is absent or blank.
    pub async fn predict(
        &self,
        image: &[u8],
        requester: Option<&str>,
    ) -> AnalyzeResult<PredictionResult> {
        let requester = RequesterId::or_fallback(requester, &self.config.fallback_requester);
        self.predict_for(image, &requester).await
    }

    /// Analyze `image` on behalf of an already resolved requester.
    ///
    /// - Empty input is rejected with [`AnalyzeError::EmptyImage`].
    /// - A classifier failure or timeout yields a result flagged as an error
    ///   and leaves the ledger and record store untouched.
    /// - Otherwise one ledger transaction and one record are appended.
    pub async fn predict_for(
        &self,
        image: &[u8],
        requester: &RequesterId,
    ) -> AnalyzeResult<PredictionResult> {
        if image.is_empty() {
            return Err(AnalyzeError::EmptyImage);
        }

        let timeout = self.config.classify_timeout;
        let outcome = match tokio::time::timeout(timeout, self.classifier.classify(image)).await {
            Ok(outcome) => outcome,
            Err(_) => Err(ClassificationError::TimedOut(timeout)),
        };
        let classification = match outcome {
            Ok(c) => c,
            Err(e) => {
                warn!(
                    classifier = self.classifier.name(),
                    requester = %requester,
                    bytes = image.len(),
                    error = %e,
                    "prediction error"
                );
                return Ok(PredictionResult::failed(e));
            }
        };

        let label = classification.label;
        let confidence = classification.confidence();
        let image_hash = digest(image);

        let receipt = self.ledger.add_transaction(requester, image_hash, label)?;
        self.records
            .add_record(requester, label, confidence, Utc::now())?;

        info!(
            requester = %requester,
            label = %label,
            confidence,
            image = %image_hash.short_hex(),
            block = receipt.block_index,
            "leaf analyzed"
        );

        Ok(PredictionResult {
            prediction: label.to_string(),
            confidence,
            image_hash: Some(image_hash),
            blockchain_index: Some(receipt.block_index),
            all_predictions: classification.top(self.config.top_predictions),
            disease_info: Some(label.description().to_string()),
            error: None,
        })
    }

    pub fn overview(&self) -> AnalyzeResult<Overview> {
        Ok(Overview {
            total_analyses: self.records.len()?,
            blockchain_blocks: self.ledger.block_count()?,
            total_transactions: self.ledger.transaction_count()?,
            cloud_enabled: self.records.mirror_enabled(),
        })
    }
}
