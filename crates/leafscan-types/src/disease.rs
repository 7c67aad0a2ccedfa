use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Fallback text for a label with no catalogue entry.
pub const NO_DISEASE_INFO: &str = "No additional information available.";

/// The leaf diseases the classifier distinguishes.
///
/// The serialized form is the underscore-joined name (`"Powdery_Mildew"`),
/// which is also the label the model emits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DiseaseClass {
    #[serde(rename = "Anthracnose")]
    Anthracnose,
    #[serde(rename = "Bacterial_Blight")]
    BacterialBlight,
    #[serde(rename = "Cercospora_Leaf_Spot")]
    CercosporaLeafSpot,
    #[serde(rename = "Powdery_Mildew")]
    PowderyMildew,
    #[serde(rename = "Shot_Hole_Disease")]
    ShotHoleDisease,
}

impl DiseaseClass {
    /// All classes, in the model's output order.
    pub const ALL: [Self; 5] = [
        Self::Anthracnose,
        Self::BacterialBlight,
        Self::CercosporaLeafSpot,
        Self::PowderyMildew,
        Self::ShotHoleDisease,
    ];

    /// The model label, e.g. `"Cercospora_Leaf_Spot"`.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Anthracnose => "Anthracnose",
            Self::BacterialBlight => "Bacterial_Blight",
            Self::CercosporaLeafSpot => "Cercospora_Leaf_Spot",
            Self::PowderyMildew => "Powdery_Mildew",
            Self::ShotHoleDisease => "Shot_Hole_Disease",
        }
    }

    /// Human-readable name with spaces instead of underscores.
    pub fn display_name(&self) -> String {
        self.as_str().replace('_', " ")
    }

    /// Position of this class in [`Self::ALL`].
    pub fn index(&self) -> usize {
        Self::ALL.iter().position(|c| c == self).unwrap_or_default()
    }

    /// Short description shown alongside a diagnosis.
    pub const fn description(&self) -> &'static str {
        match self {
            Self::Anthracnose => {
                "A fungal disease that causes dark, sunken lesions on leaves, stems, flowers and fruits."
            }
            Self::BacterialBlight => {
                "A bacterial infection causing water-soaked lesions that eventually turn brown."
            }
            Self::CercosporaLeafSpot => {
                "A fungal disease characterized by circular spots with gray centers and dark borders."
            }
            Self::PowderyMildew => {
                "A fungal disease that appears as a white or gray powdery coating on leaf surfaces."
            }
            Self::ShotHoleDisease => {
                "A fungal disease where small circular lesions fall out of leaves creating a \"shot hole\" appearance."
            }
        }
    }
}

impl fmt::Display for DiseaseClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DiseaseClass {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| TypeError::UnknownDisease(s.to_string()))
    }
}
