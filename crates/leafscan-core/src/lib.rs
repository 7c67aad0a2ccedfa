//! Leaf analysis pipeline for Leafscan.
//!
//! [`Analyzer::predict`] is the single entry point that turns an uploaded
//! image into a diagnosis: it asks the injected [`Classifier`], fingerprints
//! the image, appends a ledger transaction and an analysis record, and
//! assembles a [`PredictionResult`]. A failed classification writes nothing.

pub mod analyzer;
pub mod classifier;
pub mod error;
pub mod fingerprint;
pub mod result;

pub use analyzer::{Analyzer, AnalyzerConfig, Overview};
pub use classifier::{
    ClassProbability, Classification, ClassificationError, Classifier, StaticClassifier,
};
pub use error::{AnalyzeError, AnalyzeResult};
pub use fingerprint::{FingerprintClassifier, ImageFormat};
pub use result::{PredictionResult, ERROR_PREDICTION};
