use serde::{Deserialize, Serialize};

use leafscan_types::{Digest, DiseaseClass};

use crate::classifier::ClassProbability;

/// `prediction` text of a failed analysis.
pub const ERROR_PREDICTION: &str = "Error in processing";

/// Outcome of one analysis, in the shape returned to HTTP clients.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    /// Model label on success, [`ERROR_PREDICTION`] on failure.
    pub prediction: String,
    /// Percentage for the predicted label; zero on failure.
    pub confidence: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_hash: Option<Digest>,
    /// Index of the ledger block holding the transaction.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blockchain_index: Option<u64>,
    /// Best classes, highest first.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub all_predictions: Vec<ClassProbability>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disease_info: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PredictionResult {
    pub(crate) fn failed(error: impl ToString) -> Self {
        Self {
            prediction: ERROR_PREDICTION.to_string(),
            confidence: 0.0,
            image_hash: None,
            blockchain_index: None,
            all_predictions: Vec::new(),
            disease_info: None,
            error: Some(error.to_string()),
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    /// The predicted class, if the analysis succeeded.
    pub fn label(&self) -> Option<DiseaseClass> {
        if self.is_error() {
            return None;
        }
        self.prediction.parse().ok()
    }
}
