use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use leafscan_types::DiseaseClass;

use crate::record::AnalysisRecord;

/// Summary figures over the record store, as shown on the dashboard.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RecordStats {
    pub total_analyses: usize,
    /// Count per class; every class is present, zero-filled.
    pub distribution: BTreeMap<DiseaseClass, usize>,
    /// `None` when there are no records.
    pub mean_confidence: Option<f64>,
}

impl RecordStats {
    pub fn from_records(records: &[AnalysisRecord]) -> Self {
        let mut distribution: BTreeMap<DiseaseClass, usize> =
            DiseaseClass::ALL.iter().map(|c| (*c, 0)).collect();
        let mut confidence_sum = 0.0;

        for record in records {
            *distribution.entry(record.prediction_label).or_default() += 1;
            confidence_sum += record.confidence;
        }

        let mean_confidence = if records.is_empty() {
            None
        } else {
            Some(confidence_sum / records.len() as f64)
        };

        Self {
            total_analyses: records.len(),
            distribution,
            mean_confidence,
        }
    }

    /// The most frequently diagnosed class, earliest in catalogue order on ties.
    pub fn most_common(&self) -> Option<DiseaseClass> {
        self.distribution
            .iter()
            .filter(|(_, n)| **n > 0)
            .fold(None, |best: Option<(DiseaseClass, usize)>, (class, n)| match best {
                Some((_, top)) if top >= *n => best,
                _ => Some((*class, *n)),
            })
            .map(|(class, _)| class)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use leafscan_types::{RecordId, RequesterId};

    use super::*;

    fn record(label: DiseaseClass, confidence: f64) -> AnalysisRecord {
        AnalysisRecord {
            record_id: RecordId::new(),
            requester_id: RequesterId::new("u"),
            prediction_label: label,
            confidence,
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn empty_store_is_zero_filled() {
        let stats = RecordStats::from_records(&[]);
        assert_eq!(stats.total_analyses, 0);
        assert_eq!(stats.distribution.len(), DiseaseClass::ALL.len());
        assert!(stats.distribution.values().all(|n| *n == 0));
        assert_eq!(stats.mean_confidence, None);
        assert_eq!(stats.most_common(), None);
    }

    #[test]
    fn counts_and_mean() {
        let stats = RecordStats::from_records(&[
            record(DiseaseClass::Anthracnose, 90.0),
            record(DiseaseClass::PowderyMildew, 60.0),
            record(DiseaseClass::PowderyMildew, 30.0),
        ]);
        assert_eq!(stats.total_analyses, 3);
        assert_eq!(stats.distribution[&DiseaseClass::Anthracnose], 1);
        assert_eq!(stats.distribution[&DiseaseClass::PowderyMildew], 2);
        assert_eq!(stats.distribution[&DiseaseClass::ShotHoleDisease], 0);
        assert_eq!(stats.mean_confidence, Some(60.0));
        assert_eq!(stats.most_common(), Some(DiseaseClass::PowderyMildew));
    }

    #[test]
    fn ties_resolve_to_catalogue_order() {
        let stats = RecordStats::from_records(&[
            record(DiseaseClass::ShotHoleDisease, 50.0),
            record(DiseaseClass::BacterialBlight, 50.0),
        ]);
        assert_eq!(stats.most_common(), Some(DiseaseClass::BacterialBlight));
    }

    #[test]
    fn distribution_serializes_with_model_labels() {
        let stats = RecordStats::from_records(&[record(DiseaseClass::CercosporaLeafSpot, 70.0)]);
        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["distribution"]["Cercospora_Leaf_Spot"], 1);
    }
}
