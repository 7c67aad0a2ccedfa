use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use leafscan_types::DiseaseClass;

/// Errors from a classifier backend.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ClassificationError {
    #[error("unreadable image: {0}")]
    UnreadableImage(String),

    #[error("classifier unavailable: {0}")]
    BackendUnavailable(String),

    #[error("classifier returned unusable output: {0}")]
    InvalidOutput(String),

    #[error("classification timed out after {0:?}")]
    TimedOut(Duration),
}

/// One class with its percentage score, as reported in ranked listings.
///
/// Serialized as a `[label, percentage]` pair.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClassProbability(pub DiseaseClass, pub f64);

impl ClassProbability {
    pub fn class(&self) -> DiseaseClass {
        self.0
    }

    /// Percentage in `0.0..=100.0`.
    pub fn confidence(&self) -> f64 {
        self.1
    }
}

/// Output of a classifier: the winning label plus a score for every class.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub label: DiseaseClass,
    /// Percentage per class.
    pub scores: BTreeMap<DiseaseClass, f64>,
}

impl Classification {
    /// Build from per-class percentages, choosing the highest as the label.
    ///
    /// Ties go to the class earliest in [`DiseaseClass::ALL`].
    pub fn from_scores(scores: BTreeMap<DiseaseClass, f64>) -> Result<Self, ClassificationError> {
        if let Some((class, score)) = scores.iter().find(|(_, s)| !s.is_finite()) {
            return Err(ClassificationError::InvalidOutput(format!(
                "non-finite score {score} for {class}"
            )));
        }

        let label = scores
            .iter()
            .fold(None, |best: Option<(DiseaseClass, f64)>, (class, score)| match best {
                Some((_, top)) if top >= *score => best,
                _ => Some((*class, *score)),
            })
            .map(|(class, _)| class)
            .ok_or_else(|| ClassificationError::InvalidOutput("no class scores".into()))?;

        Ok(Self { label, scores })
    }

    /// Score of the winning label.
    pub fn confidence(&self) -> f64 {
        self.scores.get(&self.label).copied().unwrap_or_default()
    }

    /// The `n` best classes, highest score first.
    pub fn top(&self, n: usize) -> Vec<ClassProbability> {
        let mut ranked: Vec<ClassProbability> = self
            .scores
            .iter()
            .map(|(class, confidence)| ClassProbability(*class, *confidence))
            .collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
        ranked.truncate(n);
        ranked
    }
}

/// Maps image bytes to a disease label and per-class confidence.
#[async_trait]
pub trait Classifier: Send + Sync {
    /// Short backend name used in logs and `/v1/info`.
    fn name(&self) -> &str;

    async fn classify(&self, image: &[u8]) -> Result<Classification, ClassificationError>;
}

/// Classifier that ignores its input and returns a fixed outcome.
///
/// Useful as an offline fixture and for exercising the error path.
pub struct StaticClassifier {
    outcome: Result<Classification, ClassificationError>,
}

impl StaticClassifier {
    pub fn returning(classification: Classification) -> Self {
        Self {
            outcome: Ok(classification),
        }
    }

    pub fn failing(error: ClassificationError) -> Self {
        Self { outcome: Err(error) }
    }

    /// Convenience for `(class, percentage)` pairs.
    pub fn with_scores(
        scores: impl IntoIterator<Item = (DiseaseClass, f64)>,
    ) -> Result<Self, ClassificationError> {
        Classification::from_scores(scores.into_iter().collect()).map(Self::returning)
    }
}

#[async_trait]
impl Classifier for StaticClassifier {
    fn name(&self) -> &str {
        "static"
    }

    async fn classify(&self, _image: &[u8]) -> Result<Classification, ClassificationError> {
        self.outcome.clone()
    }
}
