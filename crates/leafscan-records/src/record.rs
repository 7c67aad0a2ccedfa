use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use leafscan_types::{DiseaseClass, RecordId, RequesterId};

/// One stored diagnosis.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRecord {
    pub record_id: RecordId,
    pub requester_id: RequesterId,
    pub prediction_label: DiseaseClass,
    /// Percentage in `0.0..=100.0`.
    pub confidence: f64,
    pub timestamp: DateTime<Utc>,
}
