use std::collections::BTreeMap;
use std::fmt;

use async_trait::async_trait;

use leafscan_crypto::digest;
use leafscan_types::DiseaseClass;

use crate::classifier::{Classification, ClassificationError, Classifier};

/// Image container formats accepted for analysis.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ImageFormat {
    Jpeg,
    Png,
    Gif,
    Bmp,
    Webp,
}

impl ImageFormat {
    /// Identify the container from its leading magic bytes.
    pub fn sniff(bytes: &[u8]) -> Option<Self> {
        match bytes {
            [0xFF, 0xD8, 0xFF, ..] => Some(Self::Jpeg),
            [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, ..] => Some(Self::Png),
            [b'G', b'I', b'F', b'8', b'7' | b'9', b'a', ..] => Some(Self::Gif),
            [b'B', b'M', ..] if bytes.len() >= 26 => Some(Self::Bmp),
            [b'R', b'I', b'F', b'F', _, _, _, _, b'W', b'E', b'B', b'P', ..] => Some(Self::Webp),
            _ => None,
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::Gif => "image/gif",
            Self::Bmp => "image/bmp",
            Self::Webp => "image/webp",
        }
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mime_type())
    }
}

/// Demonstration backend standing in for a trained model.
///
/// Rejects anything that is not a recognised image container, then turns
/// the image digest into per-class scores with a softmax. The output is
/// deterministic for a given image and carries no diagnostic meaning.
pub struct FingerprintClassifier {
    temperature: f64,
}

impl FingerprintClassifier {
    pub fn new() -> Self {
        Self { temperature: 32.0 }
    }

    /// Lower temperatures give more peaked scores. Non-positive values are
    /// replaced by the default.
    pub fn with_temperature(temperature: f64) -> Self {
        if temperature > 0.0 && temperature.is_finite() {
            Self { temperature }
        } else {
            Self::new()
        }
    }

    fn scores(&self, image: &[u8]) -> BTreeMap<DiseaseClass, f64> {
        let fingerprint = digest(image);
        let logits: Vec<f64> = DiseaseClass::ALL
            .iter()
            .map(|class| f64::from(fingerprint.as_bytes()[class.index()]) / self.temperature)
            .collect();

        let max = logits.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let exps: Vec<f64> = logits.iter().map(|l| (l - max).exp()).collect();
        let total: f64 = exps.iter().sum();

        DiseaseClass::ALL
            .iter()
            .zip(exps)
            .map(|(class, e)| (*class, e / total * 100.0))
            .collect()
    }
}

impl Default for FingerprintClassifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Classifier for FingerprintClassifier {
    fn name(&self) -> &str {
        "fingerprint"
    }

    async fn classify(&self, image: &[u8]) -> Result<Classification, ClassificationError> {
        if ImageFormat::sniff(image).is_none() {
            return Err(ClassificationError::UnreadableImage(
                "cannot identify image file".into(),
            ));
        }
        Classification::from_scores(self.scores(image))
    }
}
